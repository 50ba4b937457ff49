//! main.rs
//! Entry point for mediascope

use mediascope::app::Session;
use mediascope::config::Config;
use mediascope::core::mediainfo::MediaInfoCli;
use mediascope::core::terminal;
use mediascope::core::worker::Workers;
use mediascope::utils::cli::{CliAction, handle_args};
use mediascope::utils::{expand_home_path, log_file_path};

use std::error::Error;
use std::fs::File;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::event::DisableBracketedPaste,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        log::error!("panic: {}", info);
        eprintln!("\n[mediascope] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();

    let initial_path = match action {
        CliAction::Exit => return Ok(()),
        CliAction::RunApp => None,
        CliAction::RunAppAtPath(path_arg) => {
            let target = expand_home_path(&path_arg);
            if !target.exists() {
                eprintln!("\n[mediascope] Error: Path '{}' cannot be opened.", path_arg);
                std::process::exit(1);
            }
            Some(target)
        }
    };

    if let Err(e) = init_logging() {
        eprintln!("[mediascope] Warning: logging disabled ({})", e);
    }

    let config = Config::load();
    let backend = match MediaInfoCli::locate(config.general().clone(), Config::default_path()) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("\n[mediascope] Error: {}", e);
            std::process::exit(1);
        }
    };

    let workers = Workers::spawn(backend);
    let mut session = Session::new(config, workers);
    if let Some(path) = initial_path {
        session.add_paths(vec![path], false);
    }
    log::info!("mediascope {} started", env!("CARGO_PKG_VERSION"));

    terminal::run_terminal(&mut session)
}

/// Writes the log to the temp directory, the terminal belongs to the UI.
fn init_logging() -> Result<(), Box<dyn Error>> {
    use simplelog::{LevelFilter, WriteLogger};

    let level = match std::env::var("MSCOPE_LOG").as_deref() {
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    WriteLogger::init(
        level,
        simplelog::Config::default(),
        File::create(log_file_path())?,
    )?;
    Ok(())
}
