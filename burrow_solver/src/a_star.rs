use std::cmp::Reverse;
use std::fmt;

use fxhash::FxBuildHasher;
use priority_queue::PriorityQueue;
use tracing::debug;

use burrow_board::{Burrow, Energy, StateKey};

use crate::heuristics::{EnergyEstimate, StraightLine};
use crate::util::VisitedStates;
use crate::{Solution, Solver};

/// A best-first solver expanding whole burrow states in order of their
/// estimated total energy.
///
/// States are identified by their identity-free snapshot and prioritized by
/// the energy spent to reach them plus an admissible estimate of what is
/// still missing, so the first solution whose total no popped state can beat
/// is the optimum. The burrow of a popped state is rebuilt by replaying the
/// cheapest recorded move chain onto a clone of the start; solution move
/// sequences stay short, which keeps the replay cheaper than storing a
/// burrow per state.
///
/// [`BranchBound`](crate::BranchBound) is the engine of choice; this solver
/// arrives at the same optimum along a completely different route and serves
/// as a cross-check and benchmark partner.
pub struct BestFirst {
    estimator: Box<dyn EnergyEstimate>,
}

impl BestFirst {
    /// Creates a new solver using the [`StraightLine`](StraightLine)
    /// estimate.
    pub fn new() -> Self {
        Self {
            estimator: Box::new(StraightLine),
        }
    }

    /// Replaces the energy estimate. The replacement must be admissible, see
    /// [`EnergyEstimate`](EnergyEstimate).
    pub fn with_estimator(mut self, estimator: impl EnergyEstimate + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }
}

impl Solver for BestFirst {
    fn solve(&mut self, burrow: &mut Burrow) -> Option<Solution> {
        if burrow.all_home() {
            return Some(Solution::already_sorted());
        }

        let start = burrow.clone();
        let start_key = start.state_key();
        let mut visited = VisitedStates::new(start_key.clone());

        // the not yet expanded states, cheapest estimated total first
        let mut open = PriorityQueue::<StateKey, EnergyCounter, FxBuildHasher>::
            with_capacity_and_hasher(4096, Default::default());
        open.push(
            start_key,
            EnergyCounter::new(0, self.estimator.lower_bound(&start)),
        );

        let mut found: Option<(Energy, StateKey)> = None;

        while let Some((key, counter)) = open.pop() {
            if let Some((best, _)) = &found {
                if counter.total() >= *best {
                    // nothing left in the queue can beat the solution
                    break;
                }
            }

            let mut probe = visited.replay(&start, &key);
            for mv in probe.legal_moves(Energy::MAX) {
                let spent = counter.spent() + mv.energy();
                probe.execute(&mv, false);

                let reached = probe.state_key();
                if visited
                    .record(reached.clone(), &key, spent, mv)
                    .was_discarded()
                {
                    // this state is already reachable at no higher cost
                    probe.execute(&mv, true);
                    continue;
                }

                if probe.all_home() {
                    if found.as_ref().map_or(true, |(best, _)| spent < *best) {
                        debug!(energy = spent, "solution candidate");
                        found = Some((spent, reached));
                    }
                } else {
                    let estimate = self.estimator.lower_bound(&probe);
                    open.push_increase(reached, EnergyCounter::new(spent, estimate));
                }
                probe.execute(&mv, true);
            }
        }

        found.map(|(energy, key)| Solution::new(energy, visited.moves_to(&key)))
    }
}

impl Default for BestFirst {
    fn default() -> Self {
        BestFirst::new()
    }
}

impl fmt::Debug for BestFirst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BestFirst").finish()
    }
}

/// Holds the energy spent to reach a state and the estimated total of a
/// solution through it.
///
/// Counters are ordered from high to low by the estimated total; between
/// equal totals the one with less energy spent is considered higher, so a
/// max-priority queue pops the most promising state first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct EnergyCounter {
    // Reordering these fields changes the derived `Ord` implementation.
    total: Reverse<Energy>,
    spent: Reverse<Energy>,
}

impl EnergyCounter {
    fn new(spent: Energy, remaining: Energy) -> Self {
        Self {
            total: Reverse(spent + remaining),
            spent: Reverse(spent),
        }
    }

    fn spent(&self) -> Energy {
        self.spent.0
    }

    fn total(&self) -> Energy {
        self.total.0
    }
}
