/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub tuning: TuningConfig,
    pub gamepad: GamepadConfig,
}

/// Simulation tuning. Times are in milliseconds, speeds in tiles/second.
#[derive(Clone, Debug, PartialEq)]
pub struct TuningConfig {
    pub frame_ms: u64,
    pub max_frame_ms: u64,   // dt cap after a stall (debugger, suspended terminal)
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub fuse_ms: u64,
    pub explosion_ms: u64,
    pub blast_radius: u32,
    pub start_lives: u32,
}

impl TuningConfig {
    pub fn fuse_secs(&self) -> f32 {
        self.fuse_ms as f32 / 1000.0
    }

    pub fn explosion_secs(&self) -> f64 {
        self.explosion_ms as f64 / 1000.0
    }
}

impl Default for TuningConfig {
    fn default() -> Self {
        TomlTuning::default().into()
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub bomb: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        TomlGamepad::default().into()
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    tuning: TomlTuning,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTuning {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_max_frame_ms")]
    max_frame_ms: u64,
    #[serde(default = "default_player_speed")]
    player_speed: f32,
    #[serde(default = "default_enemy_speed")]
    enemy_speed: f32,
    #[serde(default = "default_fuse_ms")]
    fuse_ms: u64,
    #[serde(default = "default_explosion_ms")]
    explosion_ms: u64,
    #[serde(default = "default_blast_radius")]
    blast_radius: u32,
    #[serde(default = "default_start_lives")]
    start_lives: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_bomb")]
    bomb: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }
fn default_max_frame_ms() -> u64 { 250 }
fn default_player_speed() -> f32 { 4.0 }
fn default_enemy_speed() -> f32 { 2.0 }
fn default_fuse_ms() -> u64 { 3000 }
fn default_explosion_ms() -> u64 { 500 }
fn default_blast_radius() -> u32 { 2 }
fn default_start_lives() -> u32 { 3 }

fn default_bomb() -> Vec<String> { vec!["A".into(), "X".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTuning {
    fn default() -> Self {
        TomlTuning {
            frame_ms: default_frame_ms(),
            max_frame_ms: default_max_frame_ms(),
            player_speed: default_player_speed(),
            enemy_speed: default_enemy_speed(),
            fuse_ms: default_fuse_ms(),
            explosion_ms: default_explosion_ms(),
            blast_radius: default_blast_radius(),
            start_lives: default_start_lives(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            bomb: default_bomb(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl From<TomlTuning> for TuningConfig {
    fn from(t: TomlTuning) -> Self {
        TuningConfig {
            frame_ms: t.frame_ms.max(1),
            max_frame_ms: t.max_frame_ms.max(1),
            player_speed: t.player_speed,
            enemy_speed: t.enemy_speed,
            fuse_ms: t.fuse_ms,
            explosion_ms: t.explosion_ms,
            blast_radius: t.blast_radius,
            start_lives: t.start_lives.max(1),
        }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(g: TomlGamepad) -> Self {
        GamepadConfig { bomb: g.bomb, confirm: g.confirm, cancel: g.cancel }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    /// Parse config text directly. Errors fall back to defaults.
    #[cfg(test)]
    pub fn parse(text: &str) -> Self {
        Self::from_toml(parse_toml(text, "config.toml"))
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        GameConfig {
            tuning: cfg.tuning.into(),
            gamepad: cfg.gamepad.into(),
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    log::info!("Loading {}", path.display());
                    return parse_toml(&text, &path.display().to_string());
                }
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    log::debug!("No config.toml found, using defaults");
    TomlConfig::default()
}

fn parse_toml(text: &str, origin: &str) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{origin} parse error: {e}; using default settings");
            TomlConfig::default()
        }
    }
}
