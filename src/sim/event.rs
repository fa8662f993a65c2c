/// Events emitted during a simulation step.
/// The presentation layer consumes these for the status readout and logging.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    BombPlaced { x: i32, y: i32 },
    BombDetonated { x: i32, y: i32 },
    WallDestroyed { x: i32, y: i32 },
    EnemyKilled { x: i32, y: i32 },
    PlayerKilled { lives_left: u32 },
    StatusChanged { lives: u32, score: u32 },
    GameWon { score: u32 },
    GameLost { score: u32 },
}
