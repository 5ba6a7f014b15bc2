//! WFX - terminal preview for procedural LED effects
//!
//! Drives one effect at a time on a virtual LED grid and shows it with
//! true-color half blocks. Audio-reactive effects listen to the default
//! microphone when one is available.

mod config;
mod host;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use crossbeam_channel::{Receiver, Sender};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use host::Host;
use wfx_analysis::{AnalysisPipeline, LoudnessMode, MicCapture};
use wfx_core::{AudioFeed, AudioSource};
use wfx_effects::EffectRegistry;
use wfx_input::{Command, InputHandler};
use wfx_tui::{App, AudioStatus, HelpWidget, MatrixWidget, SpectrumWidget, StatusBarWidget};

/// Messages from the audio thread to the UI
enum AudioEvent {
    Started { sample_rate: u32 },
    Unavailable(String),
}

fn main() -> anyhow::Result<()> {
    let mut config = Config::load();

    let mut args = std::env::args().skip(1);
    if let Some(arg) = args.next() {
        let registry = EffectRegistry::builtin();
        if arg == "--list" || arg == "-l" {
            for name in registry.names() {
                println!("{}", name);
            }
            return Ok(());
        }
        let name = registry.canonical_name(&arg).ok_or_else(|| {
            anyhow!(
                "unknown effect '{}', available: {}",
                arg,
                registry.names().join(", ")
            )
        })?;
        config.effect = name.to_string();
    }

    init_logging();
    info!(effect = %config.effect, width = config.width, height = config.height, "starting");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let feed = Arc::new(AudioFeed::new());
    let shutdown = Arc::new(AtomicBool::new(false));
    let (evt_tx, evt_rx) = crossbeam_channel::unbounded();

    let audio_handle = if config.audio {
        let feed = Arc::clone(&feed);
        let shutdown = Arc::clone(&shutdown);
        let mode = config.loudness;
        Some(thread::spawn(move || {
            run_audio_thread(feed, mode, evt_tx, shutdown);
        }))
    } else {
        None
    };

    let result = run_app(&mut terminal, &mut config, feed, evt_rx);

    // Cleanup
    shutdown.store(true, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(handle) = audio_handle {
        let _ = handle.join();
    }

    result
}

/// Log to a file in the data dir; the terminal belongs to the UI
fn init_logging() {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wfx");
    let file = fs::create_dir_all(&dir).and_then(|_| File::create(dir.join("wfx.log")));
    let Ok(file) = file else {
        return;
    };

    let filter = EnvFilter::try_from_env("WFX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_audio_thread(
    feed: Arc<AudioFeed>,
    mode: LoudnessMode,
    evt_tx: Sender<AudioEvent>,
    shutdown: Arc<AtomicBool>,
) {
    let mut capture = match MicCapture::open_default() {
        Ok(c) => c,
        Err(e) => {
            warn!("audio capture unavailable: {}", e);
            let _ = evt_tx.send(AudioEvent::Unavailable(e.to_string()));
            return;
        }
    };

    let sample_rate = capture.sample_rate();
    let mut pipeline = AnalysisPipeline::new(sample_rate, Arc::clone(&feed));
    pipeline.set_loudness_mode(mode);
    let _ = evt_tx.send(AudioEvent::Started { sample_rate });

    let mut scratch = vec![0.0f32; 4096];
    while !shutdown.load(Ordering::Relaxed) {
        let read = capture.read(&mut scratch);
        if read == 0 {
            thread::sleep(Duration::from_millis(5));
            continue;
        }
        pipeline.push(&scratch[..read]);
    }

    if capture.dropped() > 0 {
        warn!(dropped = capture.dropped(), "audio samples dropped");
    }
    feed.reset();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &mut Config,
    feed: Arc<AudioFeed>,
    audio_events: Receiver<AudioEvent>,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let mut input = InputHandler::new();
    let mut host = Host::new(config, Arc::clone(&feed), Instant::now());

    app.state.target_fps = config.fps;

    let frame_duration = Duration::from_secs_f64(1.0 / config.fps.max(1) as f64);
    let mut last_frame = Instant::now();
    let mut finished = false;

    loop {
        let frame_start = Instant::now();

        // Audio thread status
        while let Ok(event) = audio_events.try_recv() {
            match event {
                AudioEvent::Started { sample_rate } => {
                    app.state.audio = AudioStatus::Live(sample_rate);
                }
                AudioEvent::Unavailable(reason) => {
                    app.state.audio = AudioStatus::Unavailable;
                    app.state.set_warning(format!("no audio: {}", reason));
                }
            }
        }

        let keep_running = host.tick(frame_start);
        if !keep_running && !finished {
            info!(effect = host.effect_name(), "effect finished");
        }
        finished = !keep_running;

        let grid = host.player().grid();
        app.state.sync_effect(host.animation());
        app.state.paused = host.is_paused();
        app.state.frame.clear();
        app.state.frame.extend_from_slice(host.frame());
        app.state.grid_width = grid.width();
        app.state.grid_height = grid.height();
        app.state.audio_snapshot = feed.snapshot();
        app.state.mode = input.mode();
        app.state.record_frame(frame_start.saturating_duration_since(last_frame));
        app.state.expire_message(frame_start);
        last_frame = frame_start;

        terminal.draw(|frame| render_ui(frame, &app))?;

        // Wait for input until the next frame is due
        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout).context("polling terminal events")? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = input.handle_key(key) {
                    handle_command(&mut app, &mut host, command);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    host.shutdown();
    host.write_back(config);
    if let Err(e) = config.save() {
        warn!("failed to save config: {}", e);
    }
    Ok(())
}

fn handle_command(app: &mut App, host: &mut Host, command: Command) {
    match command {
        Command::Quit => app.quit(),
        Command::ToggleHelp => app.state.toggle_help(),
        other => {
            if let Some(message) = host.apply(other, Instant::now()) {
                app.state.set_message(message);
            }
        }
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let state = &app.state;
    let theme = &state.theme;

    let background = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(background, area);

    let show_spectrum = state.capabilities.audio_reactive || state.audio != AudioStatus::Off;
    let chunks = Layout::vertical([
        Constraint::Min(3),                                    // Matrix
        Constraint::Length(if show_spectrum { 6 } else { 0 }), // Audio
        Constraint::Length(1),                                 // Status bar
    ])
    .split(area);

    let title = format!("{} {}x{}", state.effect_name, state.grid_width, state.grid_height);
    let matrix = MatrixWidget::new(&state.frame, state.grid_width, state.grid_height, theme)
        .title(&title);
    frame.render_widget(matrix, chunks[0]);

    if show_spectrum {
        frame.render_widget(SpectrumWidget::new(&state.audio_snapshot, theme), chunks[1]);
    }

    frame.render_widget(StatusBarWidget::new(state, theme), chunks[2]);

    if state.show_help {
        let lines = HelpWidget::help_lines().len() as u16;
        let help_area = centered_rect(HelpWidget::width(), lines, area);
        frame.render_widget(HelpWidget::new(theme), help_area);
    }
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
