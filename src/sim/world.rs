/// WorldState: the complete snapshot of a running game.
///
/// One owner (the game loop) holds it by value and hands `&mut` to
/// `step()`. Nothing lives in globals, so several worlds can run side by
/// side and tests can build one, poke it, and step it deterministically.
///
/// `reset()` rebuilds everything from the tuning config: grid, enemies,
/// bombs, explosions, score, lives, phase. Pending fuses live inside the
/// bomb records, so dropping the bombs is all it takes to cancel them.

use crate::config::TuningConfig;
use crate::domain::entity::{Bomb, Enemy, Explosion, Player};
use crate::domain::grid::{Grid, GRID_HEIGHT, GRID_WIDTH, SPAWN};
use crate::domain::tile::Tile;

/// Enemy starting cells of the classic layout.
pub const ENEMY_SPAWNS: [(usize, usize); 4] = [(13, 1), (1, 11), (13, 11), (7, 5)];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

impl Phase {
    /// Banner shown over the board once the round is decided.
    pub fn banner(self) -> Option<&'static str> {
        match self {
            Phase::Playing => None,
            Phase::Won => Some("YOU WIN!"),
            Phase::Lost => Some("GAME OVER"),
        }
    }

    pub fn is_over(self) -> bool {
        self != Phase::Playing
    }
}

#[derive(Clone, Debug)]
pub struct WorldState {
    // ── Terrain ──
    pub grid: Grid,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,

    // ── Tuning ──
    pub tuning: TuningConfig,

    // ── Meta ──
    pub phase: Phase,
    pub score: u32,
    /// Simulation time in seconds, advanced by `step()`.
    pub clock: f64,
    pub frame: u64,

    // ── Host ──
    pub paused: bool,
    pub player_spawn: (usize, usize),
}

impl WorldState {
    pub fn new(tuning: TuningConfig) -> Self {
        let mut world = WorldState {
            grid: Grid::classic(GRID_WIDTH, GRID_HEIGHT),
            player: Player::new(0.0, 0.0, tuning.player_speed, tuning.start_lives),
            enemies: vec![],
            bombs: vec![],
            explosions: vec![],
            tuning,
            phase: Phase::Playing,
            score: 0,
            clock: 0.0,
            frame: 0,
            paused: false,
            player_spawn: SPAWN,
        };
        world.reset();
        world
    }

    /// Full reinitialization back to a fresh `Playing` round.
    pub fn reset(&mut self) {
        self.grid = Grid::classic(GRID_WIDTH, GRID_HEIGHT);
        self.bombs.clear();
        self.explosions.clear();
        self.spawn_enemies(&ENEMY_SPAWNS);
        self.player = Player::new(0.0, 0.0, self.tuning.player_speed, self.tuning.start_lives);
        self.player.move_to(self.player_spawn);
        self.score = 0;
        self.phase = Phase::Playing;
        self.paused = false;
    }

    /// Replace the enemy list. Breakable walls under a spawn are cleared.
    pub fn spawn_enemies(&mut self, cells: &[(usize, usize)]) {
        self.enemies.clear();
        for &(x, y) in cells {
            if self.grid.cell_at(x as i32, y as i32) == Some(Tile::Destructible) {
                self.grid.set(x as i32, y as i32, Tile::Empty);
            }
            self.enemies.push(Enemy::new(x, y, self.tuning.enemy_speed));
        }
    }

    /// Put the player back on spawn after a lost life.
    pub fn respawn_player(&mut self) {
        self.player.move_to(self.player_spawn);
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn bomb_at(&self, x: i32, y: i32) -> bool {
        self.bombs.iter().any(|b| b.x == x && b.y == y)
    }

    pub fn explosion_at(&self, x: i32, y: i32) -> bool {
        self.explosions.iter().any(|e| e.x == x && e.y == y)
    }
}

impl Default for WorldState {
    fn default() -> Self {
        WorldState::new(TuningConfig::default())
    }
}
