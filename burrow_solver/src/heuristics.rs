//! Interchangeable strategies guiding the search.
//!
//! Two independent knobs exist: a [`MoveOrdering`](MoveOrdering) decides in
//! which order the engine tries the legal moves of a state, an
//! [`EnergyEstimate`](EnergyEstimate) bounds the remaining cost of a state
//! from below so hopeless branches can be discarded early. Orderings only
//! influence how fast a good bound is found; estimates influence how much is
//! pruned; neither may change the optimum a solver reports.

use std::cmp::Reverse;

use burrow_board::{Burrow, Energy, Move};

/// Decides the order in which the candidate moves of a state are explored.
///
/// Any total order is legal. A good ordering reaches a cheap complete
/// solution early, which tightens the bound and shrinks the remainder of the
/// search; a bad one merely makes the search slower.
pub trait MoveOrdering {
    /// Reorders `moves` in place; the engine tries them front to back.
    fn order(&self, burrow: &Burrow, moves: &mut [Move]);
}

/// Keeps the generated move order untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOrdering;

impl MoveOrdering for NoOrdering {
    fn order(&self, _burrow: &Burrow, _moves: &mut [Move]) {}
}

/// Tries cheap moves before expensive ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestFirst;

impl MoveOrdering for CheapestFirst {
    fn order(&self, _burrow: &Burrow, moves: &mut [Move]) {
        moves.sort_by_key(Move::energy);
    }
}

/// Tries expensive moves before cheap ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostliestFirst;

impl MoveOrdering for CostliestFirst {
    fn order(&self, _burrow: &Burrow, moves: &mut [Move]) {
        moves.sort_by_key(|mv| Reverse(mv.energy()));
    }
}

/// A lower bound on the energy still needed to sort a burrow.
///
/// The estimate has to be admissible: for every reachable state it must not
/// exceed the true remaining optimal cost. An estimate that overestimates
/// makes the engine prune branches holding the optimum and silently costs
/// correctness, so any replacement needs an admissibility argument.
pub trait EnergyEstimate {
    /// Estimates the minimal energy still required from this state on.
    fn lower_bound(&self, burrow: &Burrow) -> Energy;
}

/// Ignores every movement rule and walks each misplaced amphipod straight to
/// its room.
///
/// Per amphipod that has not arrived yet this charges the corridor distance
/// between its current offset and its own doorway, plus the steps to climb
/// out of its current room, plus a single step into its room. Blocking,
/// detours and the true entry depth are all ignored, which keeps the bound
/// below the real cost everywhere: deliberately loose, but admissible.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLine;

impl EnergyEstimate for StraightLine {
    fn lower_bound(&self, burrow: &Burrow) -> Energy {
        let mut energy = 0;
        for (id, pod) in burrow.pods() {
            if burrow.is_home(id) {
                continue;
            }
            let door = burrow[pod.family()].door();
            let offset = pod.spot().offset();
            let across = if door > offset {
                door - offset
            } else {
                offset - door
            };
            let out_and_in = pod.spot().depth() + 1;
            energy += pod.family().energy() * (across + out_and_in) as Energy;
        }
        energy
    }
}
