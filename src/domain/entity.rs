/// Entities: Player, Enemy, Bomb, Explosion.
///
/// Positions of moving actors are continuous (fractional grid units);
/// bombs and blast cells live on integer cells.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit axis-aligned vector (screen coordinates, +y is down).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

pub const CARDINALS: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// Held state of the four direction controls, as sampled this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Collapse held directions into one movement.
///
/// Opposite keys cancel. If both axes are still active, vertical wins:
/// motion only evaluates one axis meaningfully, so the choice is fixed here
/// instead of falling out of evaluation order.
pub fn resolve_direction(held: HeldDirections) -> Option<Direction> {
    let vertical = match (held.up, held.down) {
        (true, false) => Some(Direction::Up),
        (false, true) => Some(Direction::Down),
        _ => None,
    };
    let horizontal = match (held.left, held.right) {
        (true, false) => Some(Direction::Left),
        (false, true) => Some(Direction::Right),
        _ => None,
    };
    vertical.or(horizontal)
}

/// Frame input: movement is continuous (held), the bomb is edge-triggered.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub movement: Option<Direction>,
    pub place_bomb: bool,
}

/// Nearest cell to a continuous coordinate (halves round up).
#[inline]
pub fn round_cell(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Cell containing a continuous coordinate.
#[inline]
pub fn trunc_cell(v: f32) -> i32 {
    v.floor() as i32
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Tiles per second.
    pub speed: f32,
    pub lives: u32,
}

impl Player {
    pub fn new(x: f32, y: f32, speed: f32, lives: u32) -> Self {
        Player { x, y, speed, lives }
    }

    /// Occupied cell (rounded).
    pub fn cell(&self) -> (i32, i32) {
        (round_cell(self.x), round_cell(self.y))
    }

    pub fn move_to(&mut self, (x, y): (usize, usize)) {
        self.x = x as f32;
        self.y = y as f32;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub dir: Direction,
}

impl Enemy {
    pub fn new(x: usize, y: usize, speed: f32) -> Self {
        Enemy { x: x as f32, y: y as f32, speed, dir: Direction::Right }
    }

    /// Cell used for contact with the player (rounded).
    pub fn contact_cell(&self) -> (i32, i32) {
        (round_cell(self.x), round_cell(self.y))
    }

    /// Cell used for blast hits (truncated).
    pub fn blast_cell(&self) -> (i32, i32) {
        (trunc_cell(self.x), trunc_cell(self.y))
    }
}

/// A placed bomb. The fuse counts down with the frame time.
#[derive(Clone, Debug, PartialEq)]
pub struct Bomb {
    pub x: i32,
    pub y: i32,
    /// Simulation clock at placement (seconds).
    pub placed_at: f64,
    /// Seconds until detonation.
    pub fuse_remaining: f32,
}

impl Bomb {
    pub fn new(x: i32, y: i32, placed_at: f64, fuse: f32) -> Self {
        Bomb { x, y, placed_at, fuse_remaining: fuse }
    }

    /// Burn `dt` seconds of fuse. Returns true once the fuse is spent.
    pub fn burn(&mut self, dt: f32) -> bool {
        self.fuse_remaining -= dt;
        self.fuse_remaining <= 0.0
    }

    /// Fuse burnt so far, 0.0 (fresh) to 1.0 (about to blow).
    pub fn progress(&self, fuse: f32) -> f32 {
        if fuse <= 0.0 { return 1.0; }
        (1.0 - self.fuse_remaining / fuse).clamp(0.0, 1.0)
    }
}

/// One blasted cell, alive for a fixed lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: i32,
    pub y: i32,
    /// Simulation clock at creation (seconds).
    pub created_at: f64,
}

impl Explosion {
    pub fn is_expired(&self, now: f64, lifetime: f64) -> bool {
        now - self.created_at > lifetime
    }
}
