/// Enemy AI: straight-line patrol that bounces off obstacles.
///
/// No pathfinding and no interest in the player. Each frame the enemy
/// tries one step along its heading; when the step is refused it turns
/// around and snaps to the nearest cell on that axis, so repeated bumps
/// against a wall never accumulate fractional drift.

use super::entity::Enemy;
use super::grid::Grid;
use super::motion::{self, MoveOutcome, ENEMY_BIAS};

/// Advance one enemy by `dt` seconds. Returns true if it bounced.
pub fn patrol(grid: &Grid, enemy: &mut Enemy, dt: f32) -> bool {
    match motion::try_advance(grid, enemy.x, enemy.y, enemy.dir, enemy.speed, dt, &ENEMY_BIAS) {
        MoveOutcome::Moved { x, y } => {
            enemy.x = x;
            enemy.y = y;
            false
        }
        MoveOutcome::Blocked => {
            if enemy.dir.is_horizontal() {
                enemy.x = enemy.x.round();
            } else {
                enemy.y = enemy.y.round();
            }
            enemy.dir = enemy.dir.reversed();
            true
        }
    }
}
