use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, event, execute, terminal};
use flappy_session::audio::{Audio, Cue};
use flappy_session::highscore::{self, FileStore};
use flappy_session::input::{self, Command};
use flappy_session::render::Renderer;
use flappy_session::session::Session;
use flappy_session::tuning::Tuning;
use log::{info, warn};
use std::fs::File;
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Flappy bird in the terminal: space to jump, p to pause, b for boss mode.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI file overriding the gameplay constants.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where the high score is kept.
    #[arg(long, value_name = "PATH", default_value = highscore::DEFAULT_PATH)]
    high_score_file: PathBuf,

    /// Seed for obstacle heights, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable sound.
    #[arg(long)]
    mute: bool,

    /// Start with boss mode on.
    #[arg(long)]
    boss: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    // stderr shares the screen with the game, so keep it quiet by default
    let default_filter = if log_file.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            event::EnableMouseCapture,
        )?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn run(session: &mut Session<FileStore>, audio: Option<&Audio>) -> Result<()> {
    let mut term = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows);
    let frame_dur = session.tuning().frame_period;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let event::Event::Resize(c, r) = ev {
                renderer.resize(c, r);
                continue;
            }
            match input::command_for(&ev) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Press) => session.press(),
                Some(Command::Pause) => session.toggle_pause(),
                Some(Command::BossMode) => session.toggle_boss_mode(),
                Some(Command::Restart) => session.start(),
                None => {}
            }
        }

        let now = Instant::now();
        session.advance(now - last);
        last = now;

        for ev in session.drain_events() {
            if let (Some(audio), Some(cue)) = (audio, Cue::for_event(&ev)) {
                audio.play(cue);
            }
        }

        renderer.draw(&session.render_state(), &mut term.out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let tuning = match &cli.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let store = FileStore::new(&cli.high_score_file);
    let mut session = Session::new(tuning, store, cli.seed);
    if cli.boss {
        session.toggle_boss_mode();
    }

    let audio = if cli.mute {
        None
    } else {
        match Audio::open() {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Sound disabled: {:#}", e);
                None
            }
        }
    };

    run(&mut session, audio.as_ref())?;
    info!("Quit with best score {}", session.high_score());
    Ok(())
}
