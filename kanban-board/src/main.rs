mod commands;
mod config;
mod export;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use kanban_core::markup::skeleton;
use kanban_core::session::{Dispatch, Session};
use kanban_core::storage::local::FileStore;
use kanban_core::storage::KeyValueStore;
use kanban_core::types::KanbanColumn;

use commands::{Command, CommandError};

/// Terminal host for a kanban board persisted on disk.
#[derive(Debug, Parser)]
#[command(name = "kanban-board", version, about)]
struct Args {
    /// Config file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the persisted board
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write the rendered board as HTML after every change
    #[arg(long)]
    html: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let cfg = config::load_config(&config_path);

    let data_dir = args
        .data_dir
        .or(cfg.data_dir)
        .unwrap_or_else(config::default_data_dir);
    let html_output = args.html.or(cfg.html_output);

    let mut session = match start(&cfg.columns, &data_dir) {
        Ok(session) => session,
        Err(e) => {
            log::error!("[kanban.board] Board not started: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "[kanban.board] Board ready ({:?}) from {}",
        session.model().load_outcome(),
        data_dir.display()
    );
    export_html(html_output.as_deref(), &session);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    match run(&mut session, stdin.lock(), &mut stdout, html_output.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[kanban.board] Failed to read command: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read commands from `input` until end of input or `quit`.
///
/// Output that can no longer be written (a closed pipe) ends the loop
/// quietly; only input errors are returned.
fn run<S: KeyValueStore>(
    session: &mut Session<S>,
    mut input: impl BufRead,
    output: &mut impl Write,
    html_output: Option<&Path>,
) -> io::Result<()> {
    if let Err(e) = write!(output, "{}", commands::summary(session)) {
        log::trace!("[kanban.board] Output closed: {}", e);
        return Ok(());
    }

    loop {
        if let Err(e) = write!(output, "> ").and_then(|()| output.flush()) {
            log::trace!("[kanban.board] Output closed: {}", e);
            return Ok(());
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        let shown = match command {
            Command::Quit => return Ok(()),
            Command::Help => writeln!(output, "{}", commands::HELP),
            Command::Show => write!(output, "{}", commands::summary(session)),
            other => match execute(session, &other, html_output) {
                Ok(_) => write!(output, "{}", commands::summary(session)),
                Err(e) => {
                    eprintln!("{}", e);
                    Ok(())
                }
            },
        };
        if let Err(e) = shown {
            log::trace!("[kanban.board] Output closed: {}", e);
            return Ok(());
        }
    }
}

/// Open the on-disk store and start a board for `columns` on it.
fn start(columns: &[KanbanColumn], data_dir: &Path) -> kanban_core::Result<Session<FileStore>> {
    let store = FileStore::open(data_dir)?;
    Session::init(skeleton(columns), store)
}

/// Apply a board command and refresh the exported page when the board changed.
fn execute<S: KeyValueStore>(
    session: &mut Session<S>,
    command: &Command,
    html_output: Option<&Path>,
) -> Result<Dispatch, CommandError> {
    let result = commands::apply(session, command)?;
    if result.changed || result.rendered {
        export_html(html_output, session);
    }
    Ok(result)
}

fn export_html<S: KeyValueStore>(path: Option<&Path>, session: &Session<S>) {
    let Some(path) = path else {
        return;
    };
    if let Err(e) = export::write_board_html(path, session.root()) {
        log::warn!("[kanban.board] Failed to write {}: {}", path.display(), e);
    }
}
