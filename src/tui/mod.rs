mod draw;
mod help;
mod keys;
mod layout;

use crate::app::{Action, AppState, Controller, Outcome, Request};
use crate::backend::{BlogClient, PostRepository};
use crate::cli::{build_config, Cli};
use crate::model::ClientConfig;
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use keys::{map_key, KeyCommand};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let repo: Arc<dyn PostRepository> = Arc::new(BlogClient::new(&cfg)?);

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // Terminal I/O blocks, so the UI gets its own thread.
    let ui_handle = std::thread::spawn(move || run_threaded(cfg, outcome_rx, cmd_tx));

    let res = orchestrator::run_controller(repo, outcome_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Forward a controller request to the dispatcher.
fn submit(cmd_tx: &UnboundedSender<UiCommand>, req: Option<Request>) {
    if let Some(req) = req {
        if cmd_tx.send(UiCommand::Perform(req)).is_err() {
            warn!("dispatcher gone; request dropped");
        }
    }
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    cfg: ClientConfig,
    mut outcome_rx: UnboundedReceiver<Outcome>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let controller = Controller::new(&cfg);
    let mut state = AppState {
        info: format!("Connected to {}", cfg.base_url),
        ..Default::default()
    };
    let mut show_help = false;

    submit(&cmd_tx, controller.begin(&mut state, Action::ShowHome));

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    let res = loop {
        while let Ok(outcome) = outcome_rx.try_recv() {
            submit(&cmd_tx, controller.finish(&mut state, outcome));
            dirty = true;
        }

        if dirty || last_tick.elapsed() >= tick_rate {
            terminal
                .draw(|f| draw::draw(f, &state, &cfg.nav_pages, show_help))
                .ok();
            last_tick = Instant::now();
            dirty = false;
        }

        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                dirty = true;
                if show_help {
                    show_help = false;
                    continue;
                }
                match map_key(&state, &cfg.nav_pages, k) {
                    KeyCommand::Quit => {
                        info!("quit requested");
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    KeyCommand::ToggleHelp => show_help = true,
                    KeyCommand::Act(action) => {
                        submit(&cmd_tx, controller.begin(&mut state, action));
                    }
                    KeyCommand::Ignore => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}
