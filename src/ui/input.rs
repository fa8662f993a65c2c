/// Keyboard state tracker.
///
/// The simulation wants a snapshot each frame (which directions are held,
/// was the bomb key pressed) rather than an event queue. This collects
/// crossterm events and answers those questions:
///   - held keys drive continuous movement
///   - fresh presses drive one-shot actions (bomb, confirm, pause)
///
/// Terminals that report Release events get exact key-up handling; the
/// rest fall back to a hold timeout refreshed by key-repeat.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

use crate::domain::entity::HeldDirections;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_BOMB: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Char('x'), KeyCode::Char('X')];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
pub const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain. Used for edge-triggered actions.
    fresh_presses: Vec<KeyCode>,

    ctrl_c: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation step.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.begin_frame();
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.record(key, Instant::now());
            }
        }
        self.expire(Instant::now());
        Ok(())
    }

    /// Start a new frame: forget last frame's edge triggers.
    pub fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;
    }

    /// Feed one key event observed at `now`.
    pub fn record(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Rely on timeout-based expiry instead
            }
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Drop keys whose hold timeout has passed.
    pub fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    /// Convenience: was any of these keys freshly pressed this frame?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    /// Directions held right now. A fresh press counts as held, so a
    /// tap shorter than one frame still moves the player.
    pub fn held_directions(&self) -> HeldDirections {
        let held = |keys: &[KeyCode]| self.any_held(keys) || self.any_pressed(keys);
        HeldDirections {
            up: held(KEYS_UP),
            down: held(KEYS_DOWN),
            left: held(KEYS_LEFT),
            right: held(KEYS_RIGHT),
        }
    }

    pub fn bomb_pressed(&self) -> bool {
        self.any_pressed(KEYS_BOMB)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_pressed(KEYS_CONFIRM)
    }

    pub fn pause_pressed(&self) -> bool {
        self.any_pressed(KEYS_PAUSE)
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c || self.any_pressed(KEYS_QUIT)
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.saturating_duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn press_is_fresh_only_once() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.begin_frame();
        kb.record(press(KeyCode::Char(' ')), now);
        assert!(kb.bomb_pressed());

        // Key repeat next frame: held, not fresh
        kb.begin_frame();
        kb.record(press(KeyCode::Char(' ')), now);
        assert!(!kb.bomb_pressed());
        assert!(kb.any_held(KEYS_BOMB));
    }

    #[test]
    fn held_arrows_map_to_snapshot() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.begin_frame();
        kb.record(press(KeyCode::Up), now);
        kb.record(press(KeyCode::Char('d')), now);
        let held = kb.held_directions();
        assert!(held.up && held.right);
        assert!(!held.down && !held.left);
    }

    #[test]
    fn release_honored_when_enabled() {
        let mut kb = InputState::new();
        kb.honor_release = true;
        let now = Instant::now();
        kb.record(press(KeyCode::Left), now);
        kb.record(release(KeyCode::Left), now);
        kb.begin_frame();
        assert!(!kb.held_directions().left);
    }

    #[test]
    fn release_ignored_without_enhancement() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.record(press(KeyCode::Left), now);
        kb.record(release(KeyCode::Left), now);
        kb.begin_frame();
        assert!(kb.held_directions().left);
    }

    #[test]
    fn hold_times_out() {
        let mut kb = InputState::new();
        let then = Instant::now();
        kb.record(press(KeyCode::Down), then);
        kb.expire(then + HOLD_TIMEOUT * 2);
        kb.begin_frame();
        assert!(!kb.held_directions().down);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut kb = InputState::new();
        kb.begin_frame();
        kb.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(kb.quit_pressed());
        assert!(!kb.any_pressed(&[KeyCode::Char('c')]));
    }
}
