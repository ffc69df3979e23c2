use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::KeyEventKind;
use tracing::{info, warn};

use procpulse::app::App;
use procpulse::config::{self, Config, load_config, load_config_from_path};
use procpulse::event::{Event, EventHandler};
use procpulse::logging;
use procpulse::system::scheduler::RefreshScheduler;
use procpulse::system::source::SysinfoSource;
use procpulse::ui;

#[derive(Parser)]
#[command(
    name = "procpulse",
    about = "Terminal dashboard for processes and CPU/memory utilization"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process table refresh interval in milliseconds
    #[arg(long)]
    process_interval: Option<u64>,

    /// Utilization graph refresh interval in milliseconds
    #[arg(long)]
    graph_interval: Option<u64>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    // Logging problems must not keep the dashboard from starting.
    let log_path = match logging::init(&config.logging) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("procpulse: logging disabled: {err}");
            None
        }
    };
    if let Some(path) = &log_path {
        info!(log_file = %path.display(), "procpulse starting");
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();
    if let Err(err) = &result {
        warn!(%err, "procpulse exited with error");
    }
    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: Config) -> Result<()> {
    let mut app = App::new(&config);
    let mut scheduler = RefreshScheduler::start(
        SysinfoSource::new(),
        SysinfoSource::new(),
        &config.refresh_config(),
    );
    let mut events = EventHandler::new();

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        tokio::select! {
            tick = scheduler.next_tick() => match tick {
                Some(tick) => scheduler.dispatch(tick, &mut app),
                None => break,
            },
            event = events.next() => match event {
                Some(Event::Key(key)) => {
                    if key.kind == KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                    }
                }
                Some(Event::Resize) => {}
                None => break,
            },
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    scheduler.stop().await;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.process_interval {
        config.refresh.process_interval_ms = rate;
    }
    if let Some(rate) = cli.graph_interval {
        config.refresh.graph_interval_ms = rate;
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = Some(path.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    config
}
