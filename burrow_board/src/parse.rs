use itertools::Itertools;
use thiserror::Error;

use crate::{Burrow, Family, SpotEncoding, FAMILIES};

/// Largest value one half of a [`Spot`](crate::Spot) encoding can hold.
const MAX_COORDINATE: usize = (1 << (std::mem::size_of::<SpotEncoding>() * 8 / 2)) - 1;

/// Errors detected while building a [`Burrow`](Burrow) from its diagram.
///
/// Construction fails fast: the first violation is returned and nothing is
/// retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseBurrowError {
    /// The diagram has fewer rows than walls, corridor and one room row
    /// need.
    #[error("a burrow diagram needs at least 4 rows, got {0}")]
    TooFewRows(usize),

    /// The corridor does not fit the position encoding.
    #[error("a corridor of length {0} does not fit the position encoding")]
    CorridorTooLong(usize),

    /// The rooms do not fit the position encoding.
    #[error("rooms of depth {0} do not fit the position encoding")]
    RoomsTooDeep(usize),

    /// The row below the corridor opens the wrong number of rooms.
    #[error("expected 4 doorways below the corridor, found {0}")]
    WrongRoomCount(usize),

    /// A row is too short or places a wall opening at the burrow edge.
    #[error("row {0} of the diagram is malformed")]
    MalformedRow(usize),

    /// A cell holds a letter that is not one of the four families.
    #[error("'{0}' is not an amphipod family letter")]
    UnknownFamily(char),

    /// A room holds an occupant above an open slot.
    #[error("room {0} has an occupant floating above an open slot")]
    FloatingOccupant(Family),

    /// A family's population does not match its room.
    #[error("family {family} has {found} members but its room holds {capacity}")]
    WrongPopulation {
        /// The family with the wrong headcount.
        family: Family,
        /// How many members the diagram contains.
        found: usize,
        /// How many members the family room can hold.
        capacity: usize,
    },
}

impl Burrow {
    /// Creates a new burrow from the rows of a diagram like
    ///
    /// ```txt
    /// #############
    /// #...........#
    /// ###B#C#B#D###
    ///   #A#D#C#A#
    ///   #########
    /// ```
    ///
    /// The corridor length is taken from the top wall, the room depth from
    /// the number of rows, and the doorways from the openings in the row
    /// directly below the corridor; rooms belong to the families `A` to `D`
    /// from left to right. Corridor cells may hold amphipods as well, so
    /// layouts captured mid-rearrangement round-trip through their diagram.
    /// An amphipod drawn on a doorway cell is accepted here: the move rules
    /// never produce one, but such an amphipod can still step down into its
    /// room.
    pub fn from_diagram<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParseBurrowError> {
        if rows.len() < 4 {
            return Err(ParseBurrowError::TooFewRows(rows.len()));
        }
        let rows: Vec<Vec<char>> = rows.iter().map(|row| row.as_ref().chars().collect()).collect();

        let corridor_len = rows[0].len().saturating_sub(2);
        if corridor_len > MAX_COORDINATE + 1 {
            return Err(ParseBurrowError::CorridorTooLong(corridor_len));
        }
        let depth = rows.len() - 3;
        if depth > MAX_COORDINATE {
            return Err(ParseBurrowError::RoomsTooDeep(depth));
        }

        // doorways sit wherever the row below the corridor is not a wall
        let door_columns: Vec<usize> = rows[2]
            .iter()
            .positions(|&c| c != '#' && c != ' ')
            .collect();
        if door_columns.len() != FAMILIES.len() {
            return Err(ParseBurrowError::WrongRoomCount(door_columns.len()));
        }
        let mut doors = [0 as SpotEncoding; 4];
        for (door, &column) in doors.iter_mut().zip(door_columns.iter()) {
            if column < 1 || column > corridor_len {
                return Err(ParseBurrowError::MalformedRow(2));
            }
            *door = (column - 1) as SpotEncoding;
        }

        let mut burrow = Burrow::assemble(corridor_len, depth, doors);

        // rooms are read per column; gaps may only appear on the door side
        for (family, &column) in FAMILIES.iter().zip(door_columns.iter()) {
            let mut cells = Vec::with_capacity(depth);
            for (y, row) in rows[2..2 + depth].iter().enumerate() {
                match row.get(column).copied() {
                    None | Some('#') | Some(' ') => {
                        return Err(ParseBurrowError::MalformedRow(2 + y));
                    }
                    Some('.') => cells.push(None),
                    Some(letter) => match Family::from_letter(letter) {
                        Some(occupant) => cells.push(Some(occupant)),
                        None => return Err(ParseBurrowError::UnknownFamily(letter)),
                    },
                }
            }
            if cells.iter().skip_while(|cell| cell.is_none()).any(Option::is_none) {
                return Err(ParseBurrowError::FloatingOccupant(*family));
            }
            for occupant in cells.iter().rev().filter_map(|cell| *cell) {
                burrow.place_in_room(occupant, *family);
            }
        }

        // the corridor row may hold amphipods of a partially sorted layout
        for offset in 0..corridor_len {
            match rows[1].get(offset + 1).copied() {
                None | Some('#') | Some(' ') => return Err(ParseBurrowError::MalformedRow(1)),
                Some('.') => {}
                Some(letter) => match Family::from_letter(letter) {
                    Some(family) => burrow.place_in_corridor(family, offset as SpotEncoding),
                    None => return Err(ParseBurrowError::UnknownFamily(letter)),
                },
            }
        }

        for family in FAMILIES.iter() {
            let found = burrow
                .pods()
                .filter(|(_, pod)| pod.family() == *family)
                .count();
            if found != depth {
                return Err(ParseBurrowError::WrongPopulation {
                    family: *family,
                    found,
                    capacity: depth,
                });
            }
        }

        burrow.assert_consistent();
        Ok(burrow)
    }

    /// Creates the standard burrow: an 11-cell corridor and four rooms with
    /// doorways at offsets 2, 4, 6 and 8.
    ///
    /// Each element of `rooms` lists one room's occupants from the door
    /// down, `.` for an open slot, so `["BA", "CD", "BC", "DA"]` builds the
    /// well-known example layout. All four strings must have the same
    /// length, the room depth.
    pub fn standard(rooms: [&str; 4]) -> Result<Self, ParseBurrowError> {
        let depth = rooms[0].chars().count();
        if rooms.iter().any(|room| room.chars().count() != depth) {
            return Err(ParseBurrowError::MalformedRow(2));
        }

        let mut diagram = vec!["#############".to_string(), "#...........#".to_string()];
        for y in 0..depth {
            let outside = if y == 0 { "##" } else { "  " };
            let slots = rooms
                .iter()
                .map(|room| room.chars().nth(y).unwrap())
                .join("#");
            diagram.push(format!("{}#{}#{}", outside, slots, outside.trim_end()));
        }
        diagram.push("  #########".to_string());
        Self::from_diagram(&diagram)
    }
}
