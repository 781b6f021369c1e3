//! Entry point for **snaptile**.
//!
//! Two mutually exclusive modes:
//!
//! * One-shot: each command-line argument is executed in order and the
//!   process exits.
//! * Daemon (`--bindkeys`): the keypad hotkeys are grabbed and commands
//!   are dispatched serially from the key-press stream, one at a time.
//!
//! Exit codes: `0` on success, `2` for unknown commands and for
//! `--bindkeys` without a usable X hotkey backend, `1` for other runtime
//! failures.

use clap::Parser;
use log::{debug, error, info};
use snaptile::config::Config;
use snaptile::dispatcher::{CommandDispatcher, DispatchError};
use snaptile::engine::GeometryEngine;
use snaptile::keys::DEFAULT_BINDINGS;
use snaptile::layout::LayoutTable;
use snaptile::traits::CommandSource;
use snaptile::x11::{HotkeyListener, X11WindowSystem};
use std::sync::mpsc;

/// Exit code for "not found": unknown commands, missing hotkey backend.
const EXIT_NOT_FOUND: i32 = 2;

#[derive(Parser)]
#[command(name = "snaptile")]
#[command(version)]
#[command(about = "Tile the active X11 window with positioning commands")]
struct Cli {
    /// Grab the keypad hotkeys (Ctrl+Alt+KP0..9, Ctrl+Alt+KP-Enter) and
    /// run as a daemon.
    #[arg(short = 'b', long)]
    bindkeys: bool,

    /// List valid positioning commands and exit.
    #[arg(long)]
    valid_args: bool,

    /// Show debug output.
    #[arg(short = 'd', long)]
    debug: bool,

    /// Positioning commands, executed left to right.
    #[arg(value_name = "COMMAND")]
    commands: Vec<String>,
}

/// Resolve the config file path (`$XDG_CONFIG_HOME/snaptile/config.json`).
fn config_path() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("snaptile").join("config.json")
}

/// Build the layout table from the built-in entries plus config overrides.
///
/// A missing config file falls back to defaults; a file that exists but is
/// invalid is fatal — silently ignoring a broken layout override would make
/// the keybindings lie.
fn build_table() -> Result<LayoutTable, String> {
    let path = config_path();
    if !path.exists() {
        debug!("no config file at {}, using defaults", path.display());
        return Ok(LayoutTable::builtin());
    }
    let config = Config::load(&path).map_err(|e| e.to_string())?;
    info!("loaded config from {}", path.display());
    LayoutTable::with_overrides(config.layouts).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
        debug!("debug enabled");
    } else {
        env_logger::init();
    }

    let table = match build_table() {
        Ok(table) => table,
        Err(e) => {
            error!("bad configuration: {}", e);
            std::process::exit(1);
        }
    };

    if cli.valid_args {
        for name in table.command_names() {
            println!("{}", name);
        }
        return;
    }

    if cli.bindkeys {
        run_daemon(table);
    } else {
        run_one_shot(table, &cli.commands);
    }
}

/// One-shot mode: validate all arguments up front, then execute in order.
fn run_one_shot(table: LayoutTable, commands: &[String]) {
    let bad: Vec<&String> = commands
        .iter()
        .filter(|c| table.get(c).is_none())
        .collect();
    if commands.is_empty() || !bad.is_empty() {
        if !bad.is_empty() {
            let names: Vec<&str> = bad.iter().map(|s| s.as_str()).collect();
            eprintln!("Invalid argument(s): {}", names.join(" "));
        }
        eprintln!("Valid arguments are:");
        for name in table.command_names() {
            eprintln!("\t{}", name);
        }
        eprintln!("\nUse --help for a list of valid options.");
        std::process::exit(EXIT_NOT_FOUND);
    }

    let dispatcher = match connect_dispatcher(table) {
        Ok(d) => d,
        Err(e) => {
            error!("cannot connect to the X server: {}", e);
            std::process::exit(1);
        }
    };

    for command in commands {
        if let Err(e) = dispatcher.execute(command) {
            error!("{}: {}", command, e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

/// Daemon mode: grab the hotkeys, then execute commands serially as key
/// presses arrive.  Command failures are logged and the loop continues.
fn run_daemon(table: LayoutTable) {
    let mut listener = match HotkeyListener::new(&DEFAULT_BINDINGS) {
        Ok(l) => l,
        Err(e) => {
            error!("{}", e);
            std::process::exit(EXIT_NOT_FOUND);
        }
    };

    let dispatcher = match connect_dispatcher(table) {
        Ok(d) => d,
        Err(e) => {
            error!("cannot connect to the X server: {}", e);
            std::process::exit(1);
        }
    };

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        if let Err(e) = listener.run(tx) {
            error!("hotkey listener error: {}", e);
        }
    });

    info!("snaptile running, waiting for hotkeys");
    for command in rx {
        if let Err(e) = dispatcher.execute(&command) {
            error!("{}: {}", command, e);
        }
    }
    info!("hotkey source closed, exiting");
}

/// Connect to X and assemble the dispatcher.
fn connect_dispatcher(
    table: LayoutTable,
) -> Result<CommandDispatcher<X11WindowSystem>, snaptile::x11::adapter::X11Error> {
    let ws = X11WindowSystem::connect()?;
    Ok(CommandDispatcher::new(table, GeometryEngine::new(ws)))
}

/// Map a dispatch failure to the process exit code.
fn exit_code_for(err: &DispatchError) -> i32 {
    match err {
        DispatchError::UnknownCommand(_) => EXIT_NOT_FOUND,
        _ => 1,
    }
}
