use itertools::Itertools;

use crate::{Burrow, PodId, FAMILIES};

/// Creates the canonical diagram of the burrow, e.g.
///
/// ```txt
/// #############
/// #...........#
/// ###B#C#B#D###
///   #A#D#C#A#
///   #########
/// ```
///
/// The output round-trips through [`Burrow::from_diagram`](Burrow::from_diagram).
pub fn draw_burrow(burrow: &Burrow) -> String {
    let width = burrow.corridor_len() as usize + 2;
    let letter =
        |cell: Option<PodId>| cell.map_or('.', |id| burrow.pod(id).family().letter());

    let mut rows = Vec::with_capacity(burrow.room_depth() + 3);
    rows.push("#".repeat(width));

    let corridor: String = (0..burrow.corridor_len())
        .map(|offset| letter(burrow.corridor(offset)))
        .collect();
    rows.push(format!("#{}#", corridor));

    // room rows, plus one extra pass drawing the bottom wall
    for slot in 0..=burrow.room_depth() {
        let filler = if slot == 0 { '#' } else { ' ' };
        let mut row = vec![filler; width];
        for family in FAMILIES.iter() {
            let room = &burrow[*family];
            let column = room.door() as usize + 1;
            row[column - 1] = '#';
            row[column + 1] = '#';
            row[column] = if slot < room.capacity() {
                letter(room.pod_at(slot))
            } else {
                '#'
            };
        }
        let row: String = row.into_iter().collect();
        rows.push(row.trim_end().to_string());
    }

    rows.iter().join("\n")
}
