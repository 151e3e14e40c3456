//! Confab entrypoint: logging, config, terminal setup, and the event loop.
//!
//! Threading model: `main` owns every piece of mutable state. One detached
//! poll thread blocks on terminal reads and forwards raw events over a
//! bounded channel; the loop below consumes them and drives the UI. Shutdown
//! sets the stop flag and drops the receiver — a poll thread parked inside a
//! blocking read notices on its next wake, so it is detached rather than
//! joined.

use anyhow::Result;
use clap::Parser;
use core_chat::Line;
use core_chat::buffers::HOME_MESSAGES;
use core_events::{StopFlag, event_channel, spawn_poll_thread};
use core_screen::{CrosstermScreen, Screen};
use core_ui::Ui;
use crossbeam_channel::Receiver;
use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::sync::Once;
use std::time::SystemTime;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod config;
use config::{Config, load_from};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "confab", version, about = "Terminal chat client")]
struct Args {
    /// Configuration file path (overrides discovery of `confab.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Nick shown on sent messages (overrides the config file).
    #[arg(long = "nick")]
    nick: Option<String>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = std::path::Path::new(".");
    let log_path = log_dir.join("confab.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let appender = tracing_appender::rolling::never(log_dir, "confab.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; drop the guard so the writer
        // shuts down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn pick_greeting(config: &Config) -> String {
    if let Some(g) = &config.greeting {
        return g.clone();
    }
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    HOME_MESSAGES[nanos % HOME_MESSAGES.len()].to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    Escape,
    CommandQuit,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::Escape => "escape",
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    let args = Args::parse();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config)?;
    if let Some(nick) = args.nick {
        config.nick = nick;
    }

    let screen = CrosstermScreen::new()?;
    let mut ui = Ui::new(screen, pick_greeting(&config), config.scrollback.limit)?;

    let (tx, rx) = event_channel();
    let stop = StopFlag::new();
    let _poll = spawn_poll_thread(tx, stop.clone());

    let reason = run_loop(&mut ui, &rx, &config.nick)?;
    stop.request_stop();
    drop(rx);
    info!(target: "runtime.shutdown", reason = reason.as_str(), "shutdown_complete");
    Ok(())
}

fn run_loop<S: Screen>(
    ui: &mut Ui<S>,
    rx: &Receiver<TermEvent>,
    nick: &str,
) -> Result<ShutdownReason> {
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(ShutdownReason::ChannelClosed);
        };
        match event {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                if let Some(reason) = handle_key(ui, nick, key)? {
                    return Ok(reason);
                }
            }
            TermEvent::Resize(w, h) => ui.resize(w as usize, h as usize)?,
            _ => {}
        }
    }
}

fn handle_key<S: Screen>(
    ui: &mut Ui<S>,
    nick: &str,
    key: KeyEvent,
) -> Result<Option<ShutdownReason>> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Ok(Some(ShutdownReason::CtrlC)),
            KeyCode::Char('n') => ui.next_buffer()?,
            KeyCode::Char('p') => ui.previous_buffer()?,
            _ => {}
        }
        return Ok(None);
    }
    match key.code {
        KeyCode::Esc => return Ok(Some(ShutdownReason::Escape)),
        KeyCode::Char(c) => ui.input_rune(c)?,
        KeyCode::Left => ui.input_left()?,
        KeyCode::Right => ui.input_right()?,
        KeyCode::Backspace => ui.input_backspace()?,
        KeyCode::Enter => {
            let content = ui.input_enter()?;
            if let Some(reason) = submit(ui, nick, content.trim())? {
                return Ok(Some(reason));
            }
        }
        KeyCode::PageUp => ui.scroll_up()?,
        KeyCode::PageDown => ui.scroll_down()?,
        _ => {}
    }
    Ok(None)
}

/// Route one submitted input line: `/`-prefixed text is a command, anything
/// else is echoed into the current buffer with the nick in bold.
fn submit<S: Screen>(ui: &mut Ui<S>, nick: &str, content: &str) -> Result<Option<ShutdownReason>> {
    if content.is_empty() {
        return Ok(None);
    }
    if let Some(rest) = content.strip_prefix('/') {
        return run_command(ui, rest);
    }
    let idx = ui.current_buffer_idx();
    ui.add_line(idx, Line::now(format!("\u{02}{nick}\u{02} {content}")), false)?;
    Ok(None)
}

fn run_command<S: Screen>(ui: &mut Ui<S>, input: &str) -> Result<Option<ShutdownReason>> {
    let mut parts = input.splitn(2, ' ');
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or("");
    tracing::debug!(target: "runtime.command", command = name, "command_submitted");
    match name {
        "quit" | "q" => return Ok(Some(ShutdownReason::CommandQuit)),
        "join" => {
            if arg.is_empty() {
                status(ui, "usage: /join <buffer>")?;
            } else {
                ui.add_buffer(arg)?;
            }
        }
        "close" => {
            let title = ui.current_buffer_title().to_string();
            if !ui.remove_buffer(&title)? {
                status(ui, "the home buffer stays open")?;
            }
        }
        "next" => ui.next_buffer()?,
        "prev" => ui.previous_buffer()?,
        _ => status(ui, &format!("unknown command: /{name}"))?,
    }
    Ok(None)
}

fn status<S: Screen>(ui: &mut Ui<S>, text: &str) -> Result<()> {
    let idx = ui.current_buffer_idx();
    ui.add_line(idx, Line::status_now(text), false)
}
