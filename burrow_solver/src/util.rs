use fxhash::FxHashMap;

use burrow_board::{Burrow, Energy, Move, StateKey};

/// The possible outcomes of recording a way to reach a state.
pub(crate) enum RecordOutcome {
    /// The state had not been reached before.
    New,
    /// The state was known, but the new way to reach it is cheaper and
    /// replaced the recorded one.
    Cheaper,
    /// The state was known and can be reached at no higher cost; the new way
    /// has been discarded.
    Dearer,
}

impl RecordOutcome {
    /// Returns `true` if the new way to the state has been discarded.
    pub fn was_discarded(&self) -> bool {
        match self {
            RecordOutcome::New | RecordOutcome::Cheaper => false,
            RecordOutcome::Dearer => true,
        }
    }
}

/// How a state was reached: its predecessor and the move in between.
struct VisitedState {
    spent: Energy,
    previous: StateKey,
    reached_by: Move,
}

/// The cheapest known way to reach each seen state, keyed by the state's
/// identity-free snapshot.
///
/// This is the bookkeeping of the best-first solver: every state stores the
/// energy spent to reach it, the state it was reached from and the move in
/// between, so a complete move sequence can be read back once the search is
/// done.
pub(crate) struct VisitedStates {
    start: StateKey,
    nodes: FxHashMap<StateKey, VisitedState>,
}

impl VisitedStates {
    /// Creates a new collection rooted at the start state.
    pub fn new(start: StateKey) -> Self {
        Self {
            start,
            nodes: FxHashMap::with_capacity_and_hasher(4096, Default::default()),
        }
    }

    /// Records reaching `key` from `from` with `spent` total energy.
    ///
    /// If the state is already known at no higher cost the new way is
    /// discarded, otherwise it replaces the recorded one. The start state is
    /// reachable with zero energy by definition, so every way back into it
    /// is discarded outright.
    pub fn record(
        &mut self,
        key: StateKey,
        from: &StateKey,
        spent: Energy,
        reached_by: Move,
    ) -> RecordOutcome {
        use std::collections::hash_map::Entry;

        if key == self.start {
            return RecordOutcome::Dearer;
        }
        let node = VisitedState {
            spent,
            previous: from.clone(),
            reached_by,
        };
        match self.nodes.entry(key) {
            Entry::Occupied(known) if known.get().spent <= spent => RecordOutcome::Dearer,
            Entry::Occupied(mut known) => {
                known.insert(node);
                RecordOutcome::Cheaper
            }
            Entry::Vacant(vacant) => {
                vacant.insert(node);
                RecordOutcome::New
            }
        }
    }

    /// Returns the cheapest known move sequence from the start to `key`.
    ///
    /// # Panics
    /// Panics if `key` has not been recorded.
    pub fn moves_to(&self, key: &StateKey) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);
        let mut current = key.clone();
        while current != self.start {
            let node = self
                .nodes
                .get(&current)
                .expect("walked past an unrecorded state");
            moves.push(node.reached_by);
            current = node.previous.clone();
        }
        moves.reverse();
        moves
    }

    /// Replays the cheapest known way to `key` onto a clone of the start
    /// burrow.
    pub fn replay(&self, start: &Burrow, key: &StateKey) -> Burrow {
        let mut burrow = start.clone();
        for mv in self.moves_to(key) {
            burrow.execute(&mv, false);
        }
        burrow
    }
}

#[cfg(test)]
mod tests {
    use burrow_board::{Burrow, Energy};

    use super::VisitedStates;

    #[test]
    fn records_cheapest_ways() {
        let burrow = Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap();
        let start = burrow.state_key();
        let mut visited = VisitedStates::new(start.clone());

        let mv = burrow.legal_moves(Energy::MAX)[0];
        let mut stepped = burrow.clone();
        stepped.execute(&mv, false);
        let key = stepped.state_key();

        assert!(!visited
            .record(key.clone(), &start, mv.energy(), mv)
            .was_discarded());
        // the same state again, but dearer
        assert!(visited
            .record(key.clone(), &start, mv.energy() + 10, mv)
            .was_discarded());
        // and cheaper, which replaces the known way
        assert!(!visited
            .record(key.clone(), &start, mv.energy() - 1, mv)
            .was_discarded());

        assert_eq!(visited.moves_to(&key), vec![mv]);
        assert_eq!(visited.replay(&burrow, &key), stepped);
    }

    #[test]
    fn ways_back_to_the_start_are_discarded() {
        let burrow = Burrow::standard(["BA", "CD", "BC", "DA"]).unwrap();
        let start = burrow.state_key();
        let mut visited = VisitedStates::new(start.clone());

        let mv = burrow.legal_moves(Energy::MAX)[0];
        let mut stepped = burrow.clone();
        stepped.execute(&mv, false);
        let key = stepped.state_key();

        visited.record(key.clone(), &start, mv.energy(), mv);
        assert!(visited
            .record(start.clone(), &key, mv.energy() * 2, mv.inverse())
            .was_discarded());
        assert!(visited.moves_to(&start).is_empty());
    }
}
