use crate::{Burrow, Energy, Family, PodId, Spot, SpotEncoding};

/// One legal relocation of a single amphipod.
///
/// A move either climbs out of a room into a corridor cell or descends from
/// the corridor into a room; there are no other kinds. The energy price is
/// computed once at generation time: the per-step cost of the family times
/// the number of corridor steps plus the number of room steps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Move {
    pod: PodId,
    from: Spot,
    to: Spot,
    room: Family,
    energy: Energy,
}

impl Move {
    pub(crate) fn new(pod: PodId, from: Spot, to: Spot, room: Family, energy: Energy) -> Self {
        Self {
            pod,
            from,
            to,
            room,
            energy,
        }
    }

    /// Returns the amphipod performing the move.
    pub fn pod(&self) -> PodId {
        self.pod
    }

    /// Returns the spot the move starts from.
    pub fn from(&self) -> Spot {
        self.from
    }

    /// Returns the spot the move ends on.
    pub fn to(&self) -> Spot {
        self.to
    }

    /// Returns the room involved in the move: the room being entered for a
    /// corridor move, the room being left for a room exit.
    pub fn room(&self) -> Family {
        self.room
    }

    /// Returns the energy the move costs.
    pub fn energy(&self) -> Energy {
        self.energy
    }

    /// Returns `true` if the move ends in the corridor.
    pub fn to_corridor(&self) -> bool {
        self.to.in_corridor()
    }

    /// Returns the move with the opposite effect, used to backtrack.
    pub fn inverse(&self) -> Move {
        Move {
            pod: self.pod,
            from: self.to,
            to: self.from,
            room: self.room,
            energy: self.energy,
        }
    }
}

/// Number of steps between two corridor offsets.
fn span(a: SpotEncoding, b: SpotEncoding) -> Energy {
    if a > b {
        (a - b) as Energy
    } else {
        (b - a) as Energy
    }
}

impl Burrow {
    /// Generates every move that is legal in the current configuration and
    /// priced strictly below `budget`.
    ///
    /// Amphipods that have arrived in their room never move again. An
    /// amphipod at the door-most occupied slot of a room may climb out to
    /// any reachable corridor cell that is not a doorway; an amphipod in the
    /// corridor has exactly one candidate, the next open slot of its own
    /// room, and only while that room is receptive and the way to its door
    /// is free.
    ///
    /// An empty result on a burrow that is not fully sorted means the
    /// configuration is a dead end under the given budget.
    pub fn legal_moves(&self, budget: Energy) -> Vec<Move> {
        let mut moves = Vec::new();
        for (id, pod) in self.pods() {
            if self.is_home(id) {
                continue;
            }
            if pod.in_corridor() {
                if let Some(mv) = self.homecoming_move(id) {
                    if mv.energy < budget {
                        moves.push(mv);
                    }
                }
            } else {
                if self.blocked_in_room(id) {
                    continue;
                }
                for offset in 0..self.corridor_len() {
                    if let Some(mv) = self.corridor_move(id, offset) {
                        if mv.energy < budget {
                            moves.push(mv);
                        }
                    }
                }
            }
        }
        moves
    }

    /// The single candidate of a corridor amphipod: entering its own room.
    fn homecoming_move(&self, id: PodId) -> Option<Move> {
        let pod = &self.pods[id.0];
        let room = &self.rooms[pod.family.index()];
        if !room.can_enter(pod.family, &self.pods) {
            return None;
        }
        if !self.path_clear(pod.spot.offset(), room.door()) {
            return None;
        }

        let slot = room
            .first_available()
            .expect("a receptive room has an open slot");
        let depth = slot as SpotEncoding + 1;
        let steps = span(room.door(), pod.spot.offset()) + depth as Energy;
        Some(Move::new(
            id,
            pod.spot,
            Spot::new(room.door(), depth),
            pod.family,
            pod.family.energy() * steps,
        ))
    }

    /// A candidate exit of a room amphipod to the given corridor cell.
    fn corridor_move(&self, id: PodId, offset: SpotEncoding) -> Option<Move> {
        let pod = &self.pods[id.0];
        if self.is_door(offset) {
            return None;
        }
        if !self.path_clear(pod.spot.offset(), offset) {
            return None;
        }

        let room = pod
            .room
            .expect("an amphipod outside the corridor is in a room");
        let steps = span(offset, pod.spot.offset()) + pod.spot.depth() as Energy;
        Some(Move::new(
            id,
            pod.spot,
            Spot::new(offset, 0),
            room,
            pod.family.energy() * steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::EXAMPLE;
    use crate::{Burrow, Energy, Family, Spot};

    fn example() -> Burrow {
        Burrow::from_diagram(&EXAMPLE).unwrap()
    }

    #[test]
    fn opening_moves_of_the_example() {
        let burrow = example();
        let moves = burrow.legal_moves(Energy::MAX);

        // four door-most amphipods, each with seven reachable corridor cells
        assert_eq!(moves.len(), 28);
        assert!(moves.iter().all(|mv| mv.to_corridor()));
        for mv in &moves {
            assert!(!burrow.is_door(mv.to().offset()));
            assert_eq!(mv.from().depth(), 1);
        }
    }

    #[test]
    fn moves_are_priced_per_step() {
        let burrow = example();
        let moves = burrow.legal_moves(Energy::MAX);

        // the B on top of the Amber room exits one step up, one step left
        let mv = moves
            .iter()
            .find(|mv| mv.room() == Family::Amber && mv.to() == Spot::new(1, 0))
            .unwrap();
        assert_eq!(mv.energy(), 20);

        // the D on top of the Desert room exits one step up, two steps right
        let mv = moves
            .iter()
            .find(|mv| mv.room() == Family::Desert && mv.to() == Spot::new(10, 0))
            .unwrap();
        assert_eq!(mv.energy(), 3000);
    }

    #[test]
    fn budget_discards_expensive_moves() {
        let burrow = example();
        let all = burrow.legal_moves(Energy::MAX);
        let cheap = burrow.legal_moves(100);
        assert!(cheap.len() < all.len());
        assert!(cheap.iter().all(|mv| mv.energy() < 100));

        // a budget of zero discards everything
        assert!(burrow.legal_moves(0).is_empty());
    }

    #[test]
    fn homecoming_requires_a_receptive_room() {
        // the B at offset 0 may enter its room, the A at offset 10 may not:
        // the Amber room still holds a foreign B
        let burrow = Burrow::from_diagram(&[
            "#############",
            "#B.........A#",
            "###B#.#C#D###",
            "  #A#.#C#D#",
            "  #########",
        ])
        .unwrap();

        let moves = burrow.legal_moves(Energy::MAX);
        let homecomings: Vec<_> = moves.iter().filter(|mv| !mv.to_corridor()).collect();
        assert_eq!(homecomings.len(), 1);
        let mv = homecomings[0];
        assert_eq!(burrow.pod(mv.pod()).family(), Family::Bronze);
        assert_eq!(mv.room(), Family::Bronze);
        // four corridor steps to the door, two steps down to the room floor
        assert_eq!(mv.to(), Spot::new(4, 2));
        assert_eq!(mv.energy(), 60);
    }

    #[test]
    fn a_doorway_occupant_can_step_straight_down() {
        let burrow = Burrow::from_diagram(&[
            "#############",
            "#..A........#",
            "###.#B#C#D###",
            "  #A#B#C#D#",
            "  #########",
        ])
        .unwrap();

        let moves = burrow.legal_moves(Energy::MAX);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to(), Spot::new(2, 1));
        assert_eq!(moves[0].energy(), 1);
    }

    #[test]
    fn blocked_paths_cut_candidates() {
        // the A parked at offset 10 takes that cell out of every exit
        let burrow = Burrow::from_diagram(&[
            "#############",
            "#..........A#",
            "###B#C#D#.###",
            "  #A#B#C#D#",
            "  #########",
        ])
        .unwrap();

        let moves = burrow.legal_moves(Energy::MAX);
        assert!(moves.iter().all(|mv| mv.to() != Spot::new(10, 0)));
        // three movable amphipods with six open cells each, and the parked A
        // cannot come home past the foreign occupants of the Amber room
        assert_eq!(moves.len(), 18);
        for family in [Family::Amber, Family::Bronze, Family::Copper].iter() {
            assert_eq!(moves.iter().filter(|mv| mv.room() == *family).count(), 6);
        }
    }

    #[test]
    fn inverse_swaps_endpoints() {
        let burrow = example();
        let mv = burrow.legal_moves(Energy::MAX)[0];
        let inverse = mv.inverse();
        assert_eq!(inverse.from(), mv.to());
        assert_eq!(inverse.to(), mv.from());
        assert_eq!(inverse.energy(), mv.energy());
        assert_eq!(inverse.inverse(), mv);
    }
}
