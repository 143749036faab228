//! Weathervane terminal front end
//!
//! 1. Resolve configuration, open the log and feedback files
//! 2. Start the location provider and the state machine
//! 3. Render every `UiState` the machine publishes
//! 4. Feed like/dislike keys back into the machine
//!
//! ```sh
//! OPENWEATHER_API_KEY=... weathervane --city Nizbor --locale cs
//! weathervane --lat 49.98 --lon 14.0 --refresh-interval 600
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use weathervane::components::{WeatherView, WeatherViewProps};
use weathervane::config::Args;
use weathervane::{
    Action, Geocoder, JsonlFeedbackSink, LocationProvider, MachineConfig, OpenWeatherClient,
    UiState, WeatherStateMachine,
};
use weathervane_core::{process_raw_event, spawn_event_poller, Component, PollerConfig};

/// Spinner frame period
const TICK_MS: u64 = 120;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config.log_file)?;
    info!(source = ?config.source, locale = %config.locale, "Starting weathervane");

    let sink = JsonlFeedbackSink::open(&config.feedback_file).with_context(|| {
        format!(
            "opening feedback file {}",
            config.feedback_file.display()
        )
    })?;
    let fetcher = OpenWeatherClient::new(&config.api_key)?.with_base_url(&config.base_url);
    let geocoder = Geocoder::new()?.with_base_url(&config.geocoding_url);

    let provider = LocationProvider::new();
    let machine = WeatherStateMachine::spawn(
        fetcher,
        sink,
        provider.current_location(),
        MachineConfig {
            locale: config.locale.clone(),
            superseded: config.superseded,
        },
    );

    let cancel = CancellationToken::new();
    let locator = provider.spawn(config.source.clone(), geocoder, config.refresh, cancel.clone());

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &machine, cancel.clone()).await;

    // ===== Cleanup =====
    cancel.cancel();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = locator.await {
        warn!(error = %err, "Location task failed");
    }
    machine.shutdown().await;
    info!("Bye");

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    machine: &WeatherStateMachine,
    cancel: CancellationToken,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let _poller = spawn_event_poller(event_tx, PollerConfig::default(), cancel);

    let mut states = machine.state();
    let mut ui = machine.current();
    let mut view = WeatherView;
    let mut tick: u32 = 0;
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|frame| {
                let props = WeatherViewProps {
                    ui: &ui,
                    tick,
                    is_focused: true,
                };
                view.render(frame, frame.area(), props);
            })?;
            dirty = false;
        }

        tokio::select! {
            Some(raw) = event_rx.recv() => {
                let event = process_raw_event(raw);
                if event.is_quit() {
                    break;
                }
                let props = WeatherViewProps {
                    ui: &ui,
                    tick,
                    is_focused: true,
                };
                for action in view.handle_event(&event, props) {
                    match action {
                        Action::FeedbackLike => machine.like(),
                        Action::FeedbackDislike => machine.dislike(),
                        Action::Quit => return Ok(()),
                        other => debug!(?other, "Ignoring view action"),
                    }
                }
                dirty = true;
            }

            next = states.next() => match next {
                Some(state) => {
                    ui = state;
                    dirty = true;
                }
                None => break,
            },

            _ = ticker.tick() => {
                tick = tick.wrapping_add(1);
                dirty = matches!(ui, UiState::Loading);
            }
        }
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weathervane=info,weathervane_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
