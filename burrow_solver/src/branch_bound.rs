use std::fmt;
use std::time::Instant;

use fxhash::FxHashMap;
use tracing::debug;

use burrow_board::{Burrow, Energy, Move, StateKey};

use crate::heuristics::{EnergyEstimate, MoveOrdering, NoOrdering, StraightLine};
use crate::{SearchStats, Solution, Solver};

/// The branch and bound solver.
///
/// A depth-first search over in-place mutations of a single burrow: every
/// move executed on the way down is reversed on the way back up, so no state
/// is ever copied. A branch is abandoned as soon as its spent energy, plus
/// the configured lower bound on what is still missing, can no longer beat
/// the best complete solution found so far. Moves priced beyond that budget
/// are already discarded at generation time, which is the engine's primary
/// pruning lever.
///
/// Two further knobs shape the search without ever changing its result: a
/// [`MoveOrdering`](MoveOrdering) decides which branch to dive into first,
/// and dearer-revisit pruning drops a state that was reached before at no
/// higher cost (any completion of the dearer visit costs at least as much as
/// the same completion of the recorded one, so nothing optimal is lost).
pub struct BranchBound {
    ordering: Box<dyn MoveOrdering>,
    estimator: Option<Box<dyn EnergyEstimate>>,
    revisit_pruning: bool,
    least_spent: FxHashMap<StateKey, Energy>,
    stats: SearchStats,
}

/// The best complete solution found so far.
struct Best {
    energy: Energy,
    moves: Option<Vec<Move>>,
}

impl BranchBound {
    /// Creates a new solver with the default strategies: moves are tried in
    /// generation order, branches are bounded by the
    /// [`StraightLine`](StraightLine) estimate, and dearer revisits are
    /// pruned.
    pub fn new() -> Self {
        Self {
            ordering: Box::new(NoOrdering),
            estimator: Some(Box::new(StraightLine)),
            revisit_pruning: true,
            least_spent: FxHashMap::default(),
            stats: SearchStats::default(),
        }
    }

    /// Replaces the move-ordering heuristic.
    pub fn with_ordering(mut self, ordering: impl MoveOrdering + 'static) -> Self {
        self.ordering = Box::new(ordering);
        self
    }

    /// Replaces the energy estimate. The replacement must be admissible, see
    /// [`EnergyEstimate`](EnergyEstimate).
    pub fn with_estimator(mut self, estimator: impl EnergyEstimate + 'static) -> Self {
        self.estimator = Some(Box::new(estimator));
        self
    }

    /// Removes the energy estimate; branches are then bounded by the best
    /// known solution alone.
    pub fn without_estimator(mut self) -> Self {
        self.estimator = None;
        self
    }

    /// Disables dearer-revisit pruning, leaving a pure depth-first branch
    /// and bound search.
    pub fn without_revisit_pruning(mut self) -> Self {
        self.revisit_pruning = false;
        self
    }

    /// Returns the statistics of the most recent [`solve`](Solver::solve)
    /// run.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn descend(&mut self, burrow: &mut Burrow, best: &mut Best, trace: &mut Vec<Move>, spent: Energy) {
        self.stats.states += 1;

        // fail-safe; the budget passed to the move generation should keep
        // every branch below the best on its own
        if spent >= best.energy {
            return;
        }
        if let Some(estimator) = &self.estimator {
            if spent + estimator.lower_bound(burrow) >= best.energy {
                self.stats.pruned_by_estimate += 1;
                return;
            }
        }
        if self.revisit_pruning {
            use std::collections::hash_map::Entry;
            match self.least_spent.entry(burrow.state_key()) {
                Entry::Occupied(known) if *known.get() <= spent => {
                    self.stats.pruned_by_revisit += 1;
                    return;
                }
                Entry::Occupied(mut known) => *known.get_mut() = spent,
                Entry::Vacant(vacant) => {
                    vacant.insert(spent);
                }
            }
        }

        let mut moves = burrow.legal_moves(best.energy - spent);
        if moves.is_empty() {
            if burrow.all_home() {
                best.energy = spent;
                best.moves = Some(trace.clone());
                self.stats.solutions += 1;
                debug!(energy = spent, moves = trace.len(), "new best solution");
            } else {
                self.stats.dead_ends += 1;
            }
            return;
        }

        self.ordering.order(burrow, &mut moves);
        for mv in moves {
            burrow.execute(&mv, false);
            trace.push(mv);
            self.stats.executed += 1;

            self.descend(burrow, best, trace, spent + mv.energy());

            trace.pop();
            burrow.execute(&mv, true);
        }
    }
}

impl Solver for BranchBound {
    fn solve(&mut self, burrow: &mut Burrow) -> Option<Solution> {
        self.stats = SearchStats::default();
        self.least_spent.clear();

        let started = Instant::now();
        let mut best = Best {
            energy: Energy::MAX,
            moves: None,
        };
        let mut trace = Vec::new();
        self.descend(burrow, &mut best, &mut trace, 0);
        self.stats.elapsed = started.elapsed();
        debug!(
            states = self.stats.states,
            executed = self.stats.executed,
            "search space exhausted"
        );

        let energy = best.energy;
        best.moves.map(|moves| Solution::new(energy, moves))
    }
}

impl Default for BranchBound {
    fn default() -> Self {
        BranchBound::new()
    }
}

impl fmt::Debug for BranchBound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BranchBound")
            .field("estimator", &self.estimator.is_some())
            .field("revisit_pruning", &self.revisit_pruning)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use burrow_board::{Burrow, Spot};

    use crate::heuristics::{CheapestFirst, CostliestFirst};
    use crate::{BranchBound, Solver};

    fn solve(burrow: &mut Burrow) -> u64 {
        let mut solver = BranchBound::new().with_ordering(CheapestFirst);
        solver
            .solve(burrow)
            .expect("a well formed burrow has a solution")
            .energy()
    }

    #[test]
    fn sorts_the_canonical_example() {
        let mut burrow = Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap();
        assert_eq!(solve(&mut burrow), 12521);
    }

    #[test]
    fn solving_restores_the_burrow() {
        let mut burrow = Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap();
        let before = burrow.clone();
        solve(&mut burrow);
        assert_eq!(burrow, before);
        burrow.assert_consistent();
    }

    #[test]
    fn sorted_burrow_costs_nothing() {
        let mut burrow = Burrow::standard(["AA", "BB", "CC", "DD"]).unwrap();
        let solution = BranchBound::new().solve(&mut burrow).unwrap();
        assert_eq!(solution.energy(), 0);
        assert!(solution.is_empty());
    }

    #[test]
    fn single_stray_amphipod_walks_straight_home() {
        // the A on the doorway cell of its own room: one single step down
        let mut burrow = Burrow::from_diagram(&[
            "#############",
            "#..A........#",
            "###.#B#C#D###",
            "  #A#B#C#D#",
            "  #########",
        ])
        .unwrap();
        let solution = BranchBound::new().solve(&mut burrow).unwrap();
        assert_eq!(solution.energy(), 1);
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.moves()[0].to(), Spot::new(2, 1));

        // the same amphipod parked further out pays the corridor distance
        let mut burrow = Burrow::from_diagram(&[
            "#############",
            "#.........A.#",
            "###.#B#C#D###",
            "  #A#B#C#D#",
            "  #########",
        ])
        .unwrap();
        let solution = BranchBound::new().solve(&mut burrow).unwrap();
        assert_eq!(solution.energy(), 8);
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn foreign_blocker_must_move_first() {
        // the B sits on top of a homed A; nothing can move until the B has
        // stepped aside, and the cheapest full plan costs 48
        let mut burrow = Burrow::from_diagram(&[
            "#############",
            "#.........A.#",
            "###B#.#C#D###",
            "  #A#B#C#D#",
            "  #########",
        ])
        .unwrap();

        let opening = burrow.legal_moves(u64::MAX);
        assert!(opening.iter().all(|mv| mv.room() == burrow_board::Family::Amber));
        assert!(opening.iter().all(|mv| mv.to_corridor()));

        assert_eq!(solve(&mut burrow), 48);
    }

    #[test]
    fn optimum_is_invariant_to_the_strategies() {
        let energies: Vec<u64> = vec![
            BranchBound::new()
                .with_ordering(CheapestFirst)
                .solve(&mut Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap()),
            BranchBound::new()
                .with_ordering(CostliestFirst)
                .solve(&mut Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap()),
            BranchBound::new().solve(&mut Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap()),
        ]
        .into_iter()
        .map(|solution| solution.unwrap().energy())
        .collect();

        assert_eq!(energies, vec![12521, 12521, 12521]);
    }

    #[test]
    fn optimum_is_invariant_to_the_prunes() {
        // a small board keeps the unpruned searches affordable
        let diagram = [
            "#############",
            "#.........A.#",
            "###B#.#C#D###",
            "  #A#B#C#D#",
            "  #########",
        ];
        let mut with_everything = Burrow::from_diagram(&diagram).unwrap();
        let mut without_memo = Burrow::from_diagram(&diagram).unwrap();
        let mut without_estimate = Burrow::from_diagram(&diagram).unwrap();

        let full = BranchBound::new()
            .solve(&mut with_everything)
            .unwrap()
            .energy();
        let plain = BranchBound::new()
            .without_revisit_pruning()
            .solve(&mut without_memo)
            .unwrap()
            .energy();
        let unestimated = BranchBound::new()
            .without_estimator()
            .solve(&mut without_estimate)
            .unwrap()
            .energy();

        assert_eq!(full, 48);
        assert_eq!(plain, 48);
        assert_eq!(unestimated, 48);
    }

    #[test]
    fn solution_moves_replay_to_a_sorted_burrow() {
        let mut burrow = Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap();
        let solution = BranchBound::new()
            .with_ordering(CheapestFirst)
            .solve(&mut burrow)
            .unwrap();

        for mv in solution.moves() {
            burrow.execute(mv, false);
        }
        assert!(burrow.all_home());
        burrow.assert_consistent();
    }

    #[test]
    fn stats_reflect_the_run() {
        let mut solver = BranchBound::new().with_ordering(CheapestFirst);
        let mut burrow = Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap();
        solver.solve(&mut burrow).unwrap();

        let stats = solver.stats();
        assert!(stats.states() > 0);
        assert!(stats.executed() > 0);
        assert!(stats.solutions() > 0);
    }
}
