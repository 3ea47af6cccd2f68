use rand::Rng;

use crate::maze::{Floorplan, Room};

/// Tries to place up to `rooms` rectangular rooms within `attempts` random draws.
///
/// A draw that overlaps an earlier room is skipped. Rooms never touch the outer
/// border and carving only removes interior wallboards, so a connected floorplan
/// stays connected and keeps its single exit. Returns how many rooms were placed.
pub fn carve_rooms<R: Rng>(
    floorplan: &mut Floorplan,
    rng: &mut R,
    rooms: usize,
    attempts: usize,
    max_size: u16,
) -> usize {
    let (width, height) = (floorplan.width(), floorplan.height());
    // A 2x2 room plus a one cell margin on every side
    let min_extent = Room::MIN_SIZE + 2;
    if rooms == 0 || width < min_extent || height < min_extent || max_size < Room::MIN_SIZE {
        return 0;
    }

    let max_width = max_size.min(width - 2);
    let max_height = max_size.min(height - 2);
    let mut placed = 0;

    for _ in 0..attempts {
        if placed == rooms {
            break;
        }
        let room_width = rng.random_range(Room::MIN_SIZE..=max_width);
        let room_height = rng.random_range(Room::MIN_SIZE..=max_height);
        let x = rng.random_range(1..=width - 1 - room_width);
        let y = rng.random_range(1..=height - 1 - room_height);

        match floorplan.add_room(Room::new(x, y, room_width, room_height)) {
            Ok(()) => placed += 1,
            Err(e) => tracing::trace!("[generator] skipping room: {}", e),
        }
    }
    tracing::debug!("[generator] placed {} of {} rooms", placed, rooms);
    placed
}
