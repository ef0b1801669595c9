use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::input::InputManager;
use crate::renderer::GameRenderer;
use crate::scene::SceneManager;

/// Longest simulated step; a stalled terminal must not teleport bullets through enemies
pub const MAX_FRAME_MS: u64 = 100;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    scenes: SceneManager,
    /// Frame pacing
    frame_duration: Duration,
    last_frame_time: Instant,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        config: GameConfig,
        audio_manager: AudioManager,
        reports_release: bool,
        fps: u32,
    ) -> Self {
        Self {
            running: true,
            scenes: SceneManager::new(config),
            frame_duration: Duration::from_secs(1) / fps.max(1),
            last_frame_time: Instant::now(),
            input_manager: InputManager::new(reports_release),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            let frame_start = Instant::now();

            terminal.draw(|frame| self.renderer.render(frame, &self.scenes))?;

            self.input_manager.poll_events()?;
            let input = self.input_manager.snapshot();
            if input.quit {
                debug!("quit requested");
                self.running = false;
                continue;
            }

            let dt_ms = self.take_elapsed_ms(frame_start);
            self.scenes.update(dt_ms, &input);

            for cue in self.scenes.drain_sound_cues() {
                self.audio_manager.play(cue);
            }

            std::thread::sleep(self.frame_duration.saturating_sub(frame_start.elapsed()));
        }

        Ok(())
    }

    /// Whole milliseconds since the last update. The sub-millisecond remainder
    /// is carried into the next frame so simulated time does not drift.
    fn take_elapsed_ms(&mut self, now: Instant) -> u64 {
        let (dt_ms, last) = frame_delta(self.last_frame_time, now);
        self.last_frame_time = last;
        dt_ms
    }
}

/// Splits the time between `last` and `now` into a clamped whole-millisecond step
/// and the instant the next step should be measured from.
fn frame_delta(last: Instant, now: Instant) -> (u64, Instant) {
    let elapsed_ms = now.saturating_duration_since(last).as_millis() as u64;
    if elapsed_ms > MAX_FRAME_MS {
        (MAX_FRAME_MS, now)
    } else {
        (elapsed_ms, last + Duration::from_millis(elapsed_ms))
    }
}
