//! Command-line interface entry point for `StudyDashboard`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use study_dashboard::config::Config;
use study_dashboard::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use study_dashboard::{error, info};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
            Ok(())
        }
        Command::Status => load(&config).map(|dashboard| commands::status::run(&dashboard)),
        Command::Open => load(&config).map(|dashboard| commands::status::run_open(&dashboard)),
        Command::Grade { module, mark, date } => load(&config)
            .and_then(|mut dashboard| commands::grade::run(&mut dashboard, &module, &mark, &date)),
        Command::Report { format, output } => load(&config).and_then(|dashboard| {
            commands::report::run(&dashboard, &format, output.as_deref(), &config)
                .map(|path| println!("✓ Report generated: {}", path.display()))
        }),
    };

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

/// Open the dashboard, turning a load failure into a printable message
fn load(config: &Config) -> Result<commands::CliDashboard, String> {
    commands::open_dashboard(config).map_err(|e| {
        error!("Failed to load study data: {e}");
        format!("✗ {e}\n  (data directory: {})", config.paths.data_dir)
    })
}
