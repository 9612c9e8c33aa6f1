use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};

use raumkukan::app::App;
use raumkukan::audio;
use raumkukan::config::GameConfig;
use raumkukan::game::Game;
use raumkukan::input::InputManager;

/// Survive waves of homing asteroids in your terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run without audio
    #[arg(long)]
    mute: bool,
    /// Seed for asteroid spawning
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "raumkukan.log")]
    log_file: PathBuf,
    /// Log filter, e.g. `debug` or `raumkukan=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_logging(&cli)?;

    let mut config = GameConfig::load(cli.config.as_deref())?;
    if cli.mute {
        config.audio.muted = true;
    }
    log::info!(
        "starting: screen {}x{}, round 1 quota {}, audio {}",
        config.screen.width,
        config.screen.height,
        config.rounds.initial_quota,
        if config.audio.muted { "muted" } else { "on" }
    );

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::info!("keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Audio before the terminal switch so device errors land in the log only
    let sounds = audio::open(&config.audio);
    let game = match cli.seed {
        Some(seed) => Game::with_rng(config.clone(), sounds, StdRng::seed_from_u64(seed)),
        None => Game::new(config.clone(), sounds),
    };

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Enable keyboard enhancement AFTER entering alternate screen
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
    terminal.clear()?;

    let input_manager = InputManager::new(supports_keyboard_enhancement);
    let result = App::new(&config, game, input_manager).run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    let file = File::create(&cli.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", cli.log_file.display()))?;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = &cli.log_level {
        builder.parse_filters(level);
    }
    builder
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("failed to initialize logging")?;
    Ok(())
}
