use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use space_defense::app::App;
use space_defense::audio::AudioManager;
use space_defense::config::GameConfig;

#[derive(Parser, Debug)]
#[command(name = "space_defense", about = "Wave-based arcade shooter for the terminal")]
struct Cli {
    /// Seed for enemy fire timing; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Start without sound
    #[arg(long)]
    mute: bool,

    /// Log destination (the terminal is taken by the game)
    #[arg(long, default_value = "space_defense.log")]
    log_file: PathBuf,

    /// Directory holding shoot.wav and explode.wav
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(10..=240))]
    fps: u32,
}

fn init_logging(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = match cli.seed {
        Some(seed) => GameConfig::with_seed(seed),
        None => GameConfig::with_seed(rand::random()),
    };
    info!(seed = config.seed, fps = cli.fps, mute = cli.mute, "starting");

    let audio_manager = AudioManager::open_or_mute(&cli.assets, cli.mute);

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!(supports_keyboard_enhancement, "terminal capabilities");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Release events need the enhancement flags, pushed after entering the alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = App::new(config, audio_manager, supports_keyboard_enhancement, cli.fps)
        .run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}
