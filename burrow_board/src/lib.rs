#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

//! Basic components of the amphipod burrow sorting puzzle.
//!
//! A burrow consists of one corridor and four rooms, each room opening onto
//! the corridor through a doorway and belonging to one amphipod family. The
//! amphipods start out scattered over the rooms and have to be rearranged
//! until every room holds only its own family. Moving costs energy: one unit
//! per step for Amber amphipods, ten for Bronze, a hundred for Copper and a
//! thousand for Desert. Movement is tightly restricted: an amphipod never
//! steps over another one, a room is only accessible at its door-most slot,
//! and the corridor cells directly in front of a doorway are not legal
//! stopping points. An amphipod in the corridor may only move again to enter
//! its own room, and only once that room holds no foreign family members.
//!
//! The main components are the [`Burrow`](Burrow), the aggregate state of
//! corridor and rooms, [`Room`](Room) and [`Amphipod`](Amphipod), its parts,
//! and [`Move`](Move), a single priced relocation. A `Burrow` is built from
//! its textual diagram with [`Burrow::from_diagram`](Burrow::from_diagram)
//! or [`Burrow::standard`](Burrow::standard), mutated in place with
//! [`Burrow::execute`](Burrow::execute) (which also reverses moves for
//! backtracking searches) and queried for all currently legal moves with
//! [`Burrow::legal_moves`](Burrow::legal_moves).

mod draw;
pub mod generator;
mod moves;
mod parse;
mod spot;

use std::{fmt, ops};

pub use crate::draw::draw_burrow;
pub use crate::moves::Move;
pub use crate::parse::ParseBurrowError;
pub use crate::spot::{Spot, SpotEncoding};

/// Total movement energy, summed over the per-step costs of a family.
pub type Energy = u64;

/// All amphipod families in room order, cheapest first.
pub const FAMILIES: [Family; 4] = [
    Family::Amber,
    Family::Bronze,
    Family::Copper,
    Family::Desert,
];

/// The amphipod families identified by their classification letter.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Amber,
    Bronze,
    Copper,
    Desert,
}

impl Family {
    /// Returns the energy this family spends on a single step.
    pub fn energy(self) -> Energy {
        match self {
            Family::Amber => 1,
            Family::Bronze => 10,
            Family::Copper => 100,
            Family::Desert => 1000,
        }
    }

    /// Returns the classification letter of the family.
    pub fn letter(self) -> char {
        match self {
            Family::Amber => 'A',
            Family::Bronze => 'B',
            Family::Copper => 'C',
            Family::Desert => 'D',
        }
    }

    /// Returns the family with the given classification letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Family::Amber),
            'B' => Some(Family::Bronze),
            'C' => Some(Family::Copper),
            'D' => Some(Family::Desert),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string = self.letter().to_string();
        f.pad(&string)
    }
}

/// The index of an amphipod in the arena owned by its burrow.
///
/// Identity is structural: two ids are the same amphipod exactly if the
/// indices are equal. Ids stay valid for the lifetime of the burrow, moves
/// never create or destroy amphipods.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PodId(usize);

/// One amphipod: its family, its current spot and the room it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amphipod {
    family: Family,
    spot: Spot,
    room: Option<Family>,
}

impl Amphipod {
    /// Returns the family the amphipod belongs to.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the current spot of the amphipod.
    pub fn spot(&self) -> Spot {
        self.spot
    }

    /// Returns the family owning the room the amphipod currently occupies,
    /// `None` while it stands in the corridor.
    pub fn room(&self) -> Option<Family> {
        self.room
    }

    /// Returns `true` if the amphipod currently stands in the corridor.
    pub fn in_corridor(&self) -> bool {
        self.room.is_none()
    }
}

/// A room of the burrow: a fixed-depth stack of slots opening onto the
/// corridor through a doorway.
///
/// Slot `0` lies directly below the door, higher indices lie deeper. The
/// occupied slots are always the deepest ones, amphipods slide all the way
/// down when entering and are only accessible at the door-most occupied
/// slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    family: Family,
    door: SpotEncoding,
    slots: Vec<Option<PodId>>,
    occupants: usize,
}

impl Room {
    pub(crate) fn new(family: Family, capacity: usize, door: SpotEncoding) -> Self {
        Self {
            family,
            door,
            slots: vec![None; capacity],
            occupants: 0,
        }
    }

    /// Returns the family this room is reserved for.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the corridor offset of the doorway.
    pub fn door(&self) -> SpotEncoding {
        self.door
    }

    /// Returns the number of slots in the room.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of amphipods currently in the room.
    pub fn occupants(&self) -> usize {
        self.occupants
    }

    /// Returns the amphipod at the given slot, `None` for an open slot.
    ///
    /// # Panics
    /// Panics if `slot` is not within the room.
    pub fn pod_at(&self, slot: usize) -> Option<PodId> {
        assert!(
            slot < self.capacity(),
            "invalid room slot: {} (room holds {})",
            slot,
            self.capacity()
        );
        self.slots[slot]
    }

    /// Returns the occupant of the door-most occupied slot, `None` for an
    /// empty room.
    pub fn door_most(&self) -> Option<PodId> {
        if self.occupants == 0 {
            return None;
        }
        self.slots[self.capacity() - self.occupants]
    }

    /// Returns the next open slot, `None` when the room is full.
    ///
    /// Entering the room means descending to this slot, so the entry depth
    /// of a move into the room is the returned index plus one.
    pub fn first_available(&self) -> Option<usize> {
        (self.capacity() - self.occupants).checked_sub(1)
    }

    /// Checks whether an amphipod of `family` is allowed to enter this room:
    /// the family has to match, the room must not be full and every occupied
    /// slot has to hold the room's own family. Foreign amphipods therefore
    /// never enter, a sealed room stays pure by construction.
    pub fn can_enter(&self, family: Family, pods: &[Amphipod]) -> bool {
        if family != self.family || self.occupants >= self.capacity() {
            return false;
        }
        self.slots[self.capacity() - self.occupants..]
            .iter()
            .all(|slot| slot.map_or(false, |id| pods[id.0].family == self.family))
    }

    /// Checks whether the given amphipod can leave the room, i.e. whether it
    /// occupies the door-most occupied slot.
    pub fn can_leave(&self, pod: PodId) -> bool {
        self.door_most() == Some(pod)
    }

    /// Checks whether every slot strictly deeper than `slot` holds an
    /// amphipod of this room's family.
    pub(crate) fn homed_below(&self, slot: usize, pods: &[Amphipod]) -> bool {
        self.slots[slot + 1..]
            .iter()
            .all(|deeper| deeper.map_or(false, |id| pods[id.0].family == self.family))
    }

    /// Drops the amphipod into the next open slot and returns that slot.
    ///
    /// # Panics
    /// Panics if the room is full.
    pub(crate) fn add(&mut self, pod: PodId) -> usize {
        let slot = self.first_available().unwrap_or_else(|| {
            panic!("failed to add {:?} to room {}: it is full", pod, self.family)
        });
        self.slots[slot] = Some(pod);
        self.occupants += 1;
        slot
    }

    /// Removes the amphipod from the room.
    ///
    /// # Panics
    /// Panics if the amphipod does not occupy the door-most occupied slot.
    pub(crate) fn remove(&mut self, pod: PodId) {
        if !self.can_leave(pod) {
            panic!(
                "cannot remove {:?} from room {}: it is not next to the door",
                pod, self.family
            );
        }
        let idx = self.capacity() - self.occupants;
        self.slots[idx] = None;
        self.occupants -= 1;
    }
}

/// The burrow: one corridor plus one room per family.
///
/// The burrow owns the arena of all amphipods; every other structure refers
/// to them through their [`PodId`](PodId). It is constructed once, mutated
/// in place by [`execute`](Burrow::execute) and never copied during a
/// search; moves are reversible instead.
#[derive(Clone, PartialEq, Eq)]
pub struct Burrow {
    corridor: Vec<Option<PodId>>,
    pods: Vec<Amphipod>,
    rooms: [Room; 4],
}

/// An identity-free snapshot of which family occupies every cell of a
/// burrow.
///
/// Amphipods of the same family are interchangeable, so two burrows with
/// equal state keys are the same search state even if the arena indices
/// differ cell by cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(Box<[u8]>);

impl Burrow {
    /// Cell marker for an empty cell in a [`StateKey`](StateKey).
    const EMPTY_CELL: u8 = 4;

    /// Creates an empty burrow skeleton; occupants are placed afterwards.
    pub(crate) fn assemble(corridor_len: usize, depth: usize, doors: [SpotEncoding; 4]) -> Self {
        let rooms = [
            Room::new(Family::Amber, depth, doors[0]),
            Room::new(Family::Bronze, depth, doors[1]),
            Room::new(Family::Copper, depth, doors[2]),
            Room::new(Family::Desert, depth, doors[3]),
        ];
        Self {
            corridor: vec![None; corridor_len],
            pods: Vec::with_capacity(4 * depth),
            rooms,
        }
    }

    /// Creates a new amphipod and drops it into `room`, filling the room
    /// bottom-up. Used during construction only.
    pub(crate) fn place_in_room(&mut self, family: Family, room: Family) {
        let id = PodId(self.pods.len());
        let slot = self.rooms[room.index()].add(id);
        let door = self.rooms[room.index()].door;
        self.pods.push(Amphipod {
            family,
            spot: Spot::new(door, slot as SpotEncoding + 1),
            room: Some(room),
        });
    }

    /// Creates a new amphipod standing in the corridor. Used during
    /// construction only.
    pub(crate) fn place_in_corridor(&mut self, family: Family, offset: SpotEncoding) {
        let id = PodId(self.pods.len());
        self.corridor[offset as usize] = Some(id);
        self.pods.push(Amphipod {
            family,
            spot: Spot::new(offset, 0),
            room: None,
        });
    }

    /// Returns the length of the corridor.
    pub fn corridor_len(&self) -> SpotEncoding {
        self.corridor.len() as SpotEncoding
    }

    /// Returns the depth of the rooms.
    pub fn room_depth(&self) -> usize {
        self.rooms[0].capacity()
    }

    /// Returns the amphipod with the given id.
    pub fn pod(&self, id: PodId) -> &Amphipod {
        &self.pods[id.0]
    }

    /// Iterates over all amphipods in the burrow along with their ids.
    pub fn pods(&self) -> impl Iterator<Item = (PodId, &Amphipod)> {
        self.pods
            .iter()
            .enumerate()
            .map(|(index, pod)| (PodId(index), pod))
    }

    /// Returns the occupant of the given corridor cell, if any.
    pub fn corridor(&self, offset: SpotEncoding) -> Option<PodId> {
        self.corridor[offset as usize]
    }

    /// Checks whether the given corridor offset lies directly in front of a
    /// doorway. Doorway cells are never legal stopping points.
    pub fn is_door(&self, offset: SpotEncoding) -> bool {
        self.rooms.iter().any(|room| room.door == offset)
    }

    /// Checks whether the corridor stretch from `from` to `to` is free: all
    /// cells strictly after `from` up to and including `to` are empty.
    pub fn path_clear(&self, from: SpotEncoding, to: SpotEncoding) -> bool {
        if from == to {
            return true;
        }
        let cells = if to > from {
            from + 1..=to
        } else {
            to..=from - 1
        };
        cells
            .into_iter()
            .all(|offset| self.corridor[offset as usize].is_none())
    }

    /// Checks whether the amphipod has arrived: it stands in its own room
    /// and no foreign amphipod sits below it. Amphipods nearer to the door
    /// may still be missing.
    pub fn is_home(&self, id: PodId) -> bool {
        let pod = &self.pods[id.0];
        match pod.room {
            Some(family) if family == pod.family => {
                let slot = pod.spot.depth() as usize - 1;
                self.rooms[family.index()].homed_below(slot, &self.pods)
            }
            _ => false,
        }
    }

    /// Checks whether every amphipod has arrived in its room. This is the
    /// terminal test of the sorting problem.
    pub fn all_home(&self) -> bool {
        self.pods().all(|(id, _)| self.is_home(id))
    }

    /// Checks whether an amphipod inside a room is buried under others and
    /// therefore unable to leave.
    ///
    /// # Panics
    /// Panics if the amphipod stands in the corridor.
    pub fn blocked_in_room(&self, id: PodId) -> bool {
        let pod = &self.pods[id.0];
        let room = pod
            .room
            .unwrap_or_else(|| panic!("{:?} is not in any room", id));
        !self.rooms[room.index()].can_leave(id)
    }

    /// Applies a move, or reverses it when `undo` is set.
    ///
    /// This is the single point of mutation: the corridor cell, the room
    /// slots and the amphipod's own spot and room reference change together,
    /// so the burrow is consistent again after every call. An undo applies
    /// the [inverse](Move::inverse) of the move and skips the receptiveness
    /// check, since undoing an exit puts a foreign amphipod back into the
    /// room it came from.
    ///
    /// # Panics
    /// Panics if the move is inconsistent with the current state: entering
    /// a non-receptive room on a forward move, leaving a slot away from the
    /// door, or overfilling a room. Such a move is a bug in the caller, not
    /// a runtime condition.
    pub fn execute(&mut self, mv: &Move, undo: bool) {
        let step = if undo { mv.inverse() } else { *mv };
        let id = step.pod();
        if step.to().in_corridor() {
            // out of the room and into the corridor
            self.rooms[step.room().index()].remove(id);
            self.corridor[step.to().offset() as usize] = Some(id);
            let pod = &mut self.pods[id.0];
            pod.room = None;
            pod.spot = step.to();
        } else {
            // out of the corridor and into the room
            if !undo {
                let family = self.pods[id.0].family;
                if !self.rooms[step.room().index()].can_enter(family, &self.pods) {
                    panic!("{:?} cannot enter room {}", id, step.room());
                }
            }
            self.corridor[step.from().offset() as usize] = None;
            let slot = self.rooms[step.room().index()].add(id);
            debug_assert_eq!(slot as SpotEncoding + 1, step.to().depth());
            let pod = &mut self.pods[id.0];
            pod.room = Some(step.room());
            pod.spot = step.to();
        }
    }

    /// Returns the identity-free snapshot of the current configuration.
    pub fn state_key(&self) -> StateKey {
        let mut cells = Vec::with_capacity(self.corridor.len() + 4 * self.room_depth());
        let family_of = |slot: &Option<PodId>| {
            slot.map_or(Self::EMPTY_CELL, |id| self.pods[id.0].family as u8)
        };
        cells.extend(self.corridor.iter().map(family_of));
        for room in &self.rooms {
            cells.extend(room.slots.iter().map(family_of));
        }
        StateKey(cells.into_boxed_slice())
    }

    /// Validates every cross-structure invariant of the burrow.
    ///
    /// # Panics
    /// Panics with a description of the violation if the corridor array, the
    /// room slots and the amphipod arena disagree with each other, or if a
    /// room violates its gravity-stack shape. Intended for tests and for
    /// diagnosing engine bugs; `execute` keeps these invariants by itself.
    pub fn assert_consistent(&self) {
        let mut placed = vec![0usize; self.pods.len()];
        for (offset, slot) in self.corridor.iter().enumerate() {
            if let Some(id) = *slot {
                placed[id.0] += 1;
                let pod = &self.pods[id.0];
                if pod.spot != Spot::new(offset as SpotEncoding, 0) || pod.room.is_some() {
                    panic!(
                        "corridor cell {} holds {:?} but that amphipod reports {:?} in {:?}",
                        offset, id, pod.spot, pod.room
                    );
                }
            }
        }
        for room in &self.rooms {
            let mut seen_occupied = false;
            for (slot, cell) in room.slots.iter().enumerate() {
                match *cell {
                    None => {
                        if seen_occupied {
                            panic!("room {} has a gap below an occupant", room.family);
                        }
                    }
                    Some(id) => {
                        seen_occupied = true;
                        placed[id.0] += 1;
                        let pod = &self.pods[id.0];
                        let expected = Spot::new(room.door, slot as SpotEncoding + 1);
                        if pod.spot != expected || pod.room != Some(room.family) {
                            panic!(
                                "room {} slot {} holds {:?} but that amphipod reports {:?} in {:?}",
                                room.family, slot, id, pod.spot, pod.room
                            );
                        }
                    }
                }
            }
            let count = room.slots.iter().filter(|slot| slot.is_some()).count();
            if count != room.occupants {
                panic!(
                    "room {} counts {} occupants but holds {}",
                    room.family, room.occupants, count
                );
            }
        }
        for (index, count) in placed.iter().enumerate() {
            if *count != 1 {
                panic!(
                    "amphipod {:?} is placed {} times on the board",
                    PodId(index),
                    count
                );
            }
        }
    }
}

impl ops::Index<Family> for Burrow {
    type Output = Room;

    fn index(&self, index: Family) -> &Self::Output {
        &self.rooms[index.index()]
    }
}

impl fmt::Debug for Burrow {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", draw_burrow(self))
    }
}
