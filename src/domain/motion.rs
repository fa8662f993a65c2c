/// Entity motion model: continuous position, grid-cell collision.
///
/// One frame of movement:
///   1. candidate = position + direction × speed × dt
///   2. target cell = floor(candidate + bias) on each axis
///   3. commit only if the target cell is Empty
///
/// The bias decides which cell is "being entered". Moving positive, the
/// sample sits near the far edge so the next cell is tested early; moving
/// negative, near the near edge; on a still axis, the cell center.
/// Without it an entity would be stopped by the cell it is leaving.
///
/// No sub-stepping: a very large dt can carry an entity past a thin wall.

use super::entity::Direction;
use super::grid::Grid;

/// Sampling offsets for one entity kind.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MotionBias {
    pub positive: f32,
    pub negative: f32,
    pub still: f32,
}

impl MotionBias {
    fn offset(&self, component: i32) -> f32 {
        match component.signum() {
            1 => self.positive,
            -1 => self.negative,
            _ => self.still,
        }
    }
}

/// Player samples inside its own footprint so it can slide along corridors.
pub const PLAYER_BIAS: MotionBias = MotionBias { positive: 0.8, negative: 0.2, still: 0.5 };

/// Enemies look a full cell ahead, so they turn around flush with a wall.
pub const ENEMY_BIAS: MotionBias = MotionBias { positive: 1.0, negative: 0.0, still: 0.0 };

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum MoveOutcome {
    Moved { x: f32, y: f32 },
    Blocked,
}

/// Try to advance (x, y) one frame in `dir`. Pure: the caller commits.
pub fn try_advance(
    grid: &Grid,
    x: f32, y: f32,
    dir: Direction,
    speed: f32,
    dt: f32,
    bias: &MotionBias,
) -> MoveOutcome {
    let (dx, dy) = dir.delta();
    let step = speed * dt;
    let nx = x + dx as f32 * step;
    let ny = y + dy as f32 * step;

    let tx = (nx + bias.offset(dx)).floor() as i32;
    let ty = (ny + bias.offset(dy)).floor() as i32;

    if grid.is_walkable(tx, ty) {
        MoveOutcome::Moved { x: nx, y: ny }
    } else {
        MoveOutcome::Blocked
    }
}
