/// Blast shape: the origin cell plus four cardinal rays.
///
/// Each ray walks outward one cell at a time up to the blast radius and
/// stops in that direction as soon as a cell reports `Blocked`. What a
/// cell does when hit (kill, destroy, record) is up to the caller; this
/// module only owns the propagation order and the stopping law.

use super::entity::{Direction, CARDINALS};

pub const ENEMY_KILL_SCORE: u32 = 100;
pub const WALL_SCORE: u32 = 10;

/// Result of applying a blast to one cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlastStop {
    /// The ray may continue past this cell.
    Continue,
    /// The ray ends here (bounds, pillar, or a wall that was just destroyed).
    Blocked,
}

/// Cells along one ray, nearest first, excluding the origin.
pub fn ray_cells(origin: (i32, i32), dir: Direction, radius: u32) -> impl Iterator<Item = (i32, i32)> {
    let (dx, dy) = dir.delta();
    (1..=radius as i32).map(move |i| (origin.0 + dx * i, origin.1 + dy * i))
}

/// Apply a blast of `radius` at `origin`, calling `apply` for every reached
/// cell in order: origin first, then each ray until it is blocked.
///
/// The origin's own result does not gate the rays.
pub fn propagate<F>(origin: (i32, i32), radius: u32, mut apply: F)
where
    F: FnMut(i32, i32) -> BlastStop,
{
    apply(origin.0, origin.1);
    for dir in CARDINALS {
        for (x, y) in ray_cells(origin, dir, radius) {
            if apply(x, y) == BlastStop::Blocked {
                break;
            }
        }
    }
}
