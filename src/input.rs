use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Input state for one frame, as the scenes see it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// Space went down this frame
    pub fire: bool,
    /// Space or Enter went down this frame; confirms menu screens
    pub confirm: bool,
    pub quit: bool,
}

/// Frames a key stays held after its last press when the terminal
/// never reports releases (about half a second at 60 FPS)
const HOLD_FRAMES: u32 = 30;

#[derive(Debug, Default, Clone, Copy)]
struct HeldKey {
    down: bool,
    frames_left: u32,
}

impl HeldKey {
    fn press(&mut self) {
        self.down = true;
        self.frames_left = HOLD_FRAMES;
    }

    fn release(&mut self) {
        self.down = false;
        self.frames_left = 0;
    }

    fn decay(&mut self) {
        if self.down {
            self.frames_left = self.frames_left.saturating_sub(1);
            if self.frames_left == 0 {
                self.down = false;
            }
        }
    }
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: HeldKey,
    right: HeldKey,
}

/// Manages input polling and translates raw key events into per-frame snapshots
pub struct InputManager {
    key_state: KeyState,
    fire: bool,
    confirm: bool,
    quit: bool,
    /// Whether the terminal sends key release events
    reports_release: bool,
}

impl InputManager {
    pub fn new(reports_release: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            fire: false,
            confirm: false,
            quit: false,
            reports_release,
        }
    }

    /// Polls for all pending terminal events without blocking.
    /// Should be called once per frame before taking a snapshot.
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        self.begin_frame();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event);
            }
        }

        Ok(())
    }

    /// Clears one-shot presses and ages held keys
    pub fn begin_frame(&mut self) {
        self.fire = false;
        self.confirm = false;
        self.quit = false;

        if !self.reports_release {
            self.key_state.left.decay();
            self.key_state.right.decay();
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, false),
            KeyEventKind::Repeat => self.handle_key_press(key_event, true),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, repeat: bool) {
        // Quit keys work in every scene
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.quit = true;
            return;
        }

        match key_event.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left.press();
                self.key_state.right.release();
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right.press();
                self.key_state.left.release();
            }
            // Held fire does not auto-repeat
            KeyCode::Char(' ') if !repeat => {
                self.fire = true;
                self.confirm = true;
            }
            KeyCode::Enter if !repeat => {
                self.confirm = true;
            }
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left.release();
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right.release();
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.key_state.left.down,
            right: self.key_state.right.down,
            fire: self.fire,
            confirm: self.confirm,
            quit: self.quit,
        }
    }
}
