/// The step function: advances the world by one frame of `dt` seconds.
///
/// Processing order:
///   1. Bomb placement (edge-triggered input)
///   2. Player movement
///   3. Enemy patrol
///   4. Fuse countdown → detonation → blast resolution
///   5. Collision / death handling
///   6. Win check
///   7. Explosion expiry
///
/// Everything is a function of (world, input, dt). Fuses count down with
/// the same dt as movement, so a detonation always lands inside a frame
/// and never races the next one.

use crate::domain::ai;
use crate::domain::blast::{self, BlastStop, ENEMY_KILL_SCORE, WALL_SCORE};
use crate::domain::entity::{Bomb, Direction, Explosion, FrameInput};
use crate::domain::motion::{self, MoveOutcome, PLAYER_BIAS};
use crate::domain::tile::Tile;
use super::clock::sanitize_dt;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput, dt: f32) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused { return vec![]; }

    let dt = sanitize_dt(dt);
    let mut events: Vec<GameEvent> = Vec::new();
    let status_before = (world.lives(), world.score);
    world.frame += 1;
    world.clock += dt as f64;

    if input.place_bomb && place_bomb(world) {
        let (x, y) = world.player.cell();
        events.push(GameEvent::BombPlaced { x, y });
    }
    resolve_player_movement(world, input.movement, dt);
    resolve_enemy_movement(world, dt);
    resolve_fuses(world, dt, &mut events);
    resolve_collisions(world, &mut events);
    resolve_win(world, &mut events);
    expire_explosions(world);

    let status_after = (world.lives(), world.score);
    if status_after != status_before {
        events.push(GameEvent::StatusChanged { lives: status_after.0, score: status_after.1 });
    }

    events
}

/// Full reinitialization after a finished round (or on demand).
pub fn restart(world: &mut WorldState) {
    let pending = world.bombs.len();
    world.reset();
    log::info!("Round restarted ({pending} pending bombs dropped)");
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(world: &mut WorldState, movement: Option<Direction>, dt: f32) {
    let dir = match movement { Some(d) => d, None => return };
    let p = &world.player;
    if let MoveOutcome::Moved { x, y } =
        motion::try_advance(&world.grid, p.x, p.y, dir, p.speed, dt, &PLAYER_BIAS)
    {
        world.player.x = x;
        world.player.y = y;
    }
}

fn resolve_enemy_movement(world: &mut WorldState, dt: f32) {
    for enemy in world.enemies.iter_mut() {
        ai::patrol(&world.grid, enemy, dt);
    }
}

// ══════════════════════════════════════════════════════════════
// Bombs
// ══════════════════════════════════════════════════════════════

/// Place a bomb on the player's current (rounded) cell.
pub fn place_bomb(world: &mut WorldState) -> bool {
    let cell = world.player.cell();
    place_bomb_at(world, cell)
}

/// Place a bomb on `cell`. No-op (returns false) if one is already there
/// or the round is over.
pub fn place_bomb_at(world: &mut WorldState, (x, y): (i32, i32)) -> bool {
    if world.phase != Phase::Playing { return false; }
    if world.bomb_at(x, y) { return false; }
    let fuse = world.tuning.fuse_secs();
    world.bombs.push(Bomb::new(x, y, world.clock, fuse));
    log::debug!("Bomb placed at ({x}, {y})");
    true
}

fn resolve_fuses(world: &mut WorldState, dt: f32, events: &mut Vec<GameEvent>) {
    let mut any_due = false;
    for bomb in world.bombs.iter_mut() {
        if bomb.burn(dt) { any_due = true; }
    }
    if !any_due { return; }

    // Placement order
    while let Some(i) = world.bombs.iter().position(|b| b.fuse_remaining <= 0.0) {
        let bomb = world.bombs[i].clone();
        detonate(world, &bomb, events);
    }
}

/// Remove `bomb` from the live set and blast its cross.
pub fn detonate(world: &mut WorldState, bomb: &Bomb, events: &mut Vec<GameEvent>) {
    world.bombs.retain(|b| !(b.x == bomb.x && b.y == bomb.y));
    events.push(GameEvent::BombDetonated { x: bomb.x, y: bomb.y });
    log::debug!("Bomb at ({}, {}) detonated", bomb.x, bomb.y);

    let radius = world.tuning.blast_radius;
    blast::propagate((bomb.x, bomb.y), radius, |x, y| apply_explosion(world, x, y, events));
}

/// Blast one cell. Pillars and off-grid cells are untouched and block.
/// Otherwise: record the explosion, kill enemies standing here, and break
/// a wall if there is one (which also blocks the ray).
pub fn apply_explosion(world: &mut WorldState, x: i32, y: i32, events: &mut Vec<GameEvent>) -> BlastStop {
    let tile = match world.grid.cell_at(x, y) {
        Some(t) if !t.absorbs_blast() => t,
        _ => return BlastStop::Blocked,
    };

    world.explosions.push(Explosion { x, y, created_at: world.clock });

    let before = world.enemies.len();
    world.enemies.retain(|e| e.blast_cell() != (x, y));
    for _ in world.enemies.len()..before {
        world.score += ENEMY_KILL_SCORE;
        events.push(GameEvent::EnemyKilled { x, y });
    }

    if tile.is_destructible() {
        world.grid.set(x, y, Tile::Empty);
        world.score += WALL_SCORE;
        events.push(GameEvent::WallDestroyed { x, y });
        BlastStop::Blocked
    } else {
        BlastStop::Continue
    }
}

fn expire_explosions(world: &mut WorldState) {
    let now = world.clock;
    let lifetime = world.tuning.explosion_secs();
    world.explosions.retain(|e| !e.is_expired(now, lifetime));
}

// ══════════════════════════════════════════════════════════════
// Collisions / outcome
// ══════════════════════════════════════════════════════════════

fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let (px, py) = world.player.cell();
    let in_blast = world.explosion_at(px, py);
    let touched = world.enemies.iter().any(|e| e.contact_cell() == (px, py));
    // At most one life per frame, even when both apply
    if in_blast || touched {
        player_die(world, events);
    }
}

fn player_die(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Playing { return; }

    world.player.lives = world.player.lives.saturating_sub(1);
    let lives_left = world.player.lives;
    events.push(GameEvent::PlayerKilled { lives_left });
    log::debug!("Player killed, {lives_left} lives left");

    if lives_left == 0 {
        world.phase = Phase::Lost;
        events.push(GameEvent::GameLost { score: world.score });
        log::info!("Game lost with score {}", world.score);
    } else {
        world.respawn_player();
    }
}

fn resolve_win(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.phase == Phase::Playing && world.enemies.is_empty() {
        world.phase = Phase::Won;
        events.push(GameEvent::GameWon { score: world.score });
        log::info!("Game won with score {}", world.score);
    }
}
