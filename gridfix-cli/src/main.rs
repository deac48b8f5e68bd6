//! Command-line interface for gridfix
//! Rewrites the table layout of an HTML file into 12-column grid markup, in place.
//!
//! Usage:
//!   gridfix `<path>`                       - Fix the file, keeping a backup copy
//!   gridfix `<path>` --describe            - Print the sized layout tree, change nothing
//!   gridfix `<path>` --stdout              - Print the fixed document instead of saving
//!
//! Configuration is read from the built-in defaults, then `./gridfix.toml`, then
//! the file given with `--config`; `--strategy` and `--root` override the result.

use clap::{Arg, ArgAction, ArgMatches, Command};
use gridfix_config::{GridfixConfig, Loader, PROJECT_CONFIG_FILE};
use gridfix_engine::{FileFixer, GridStrategy};
use std::fmt::Display;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("You must provide a file to parse!");
        std::process::exit(1);
    };

    let config = load_cli_config(&matches).unwrap_or_else(|err| fail(err));
    let make_backup = config.document.backup && !matches.get_flag("no-backup");

    let mut fixer = FileFixer::new(path, config.to_engine_options())
        .with_backup_suffix(config.document.backup_suffix.clone());
    fixer.open().unwrap_or_else(|err| fail(err));

    if matches.get_flag("describe") {
        let report = fixer.describe().unwrap_or_else(|err| fail(err));
        print!("{}", report);
        return;
    }

    let stats = fixer.fix().unwrap_or_else(|err| fail(err));
    log::info!(
        "rewrote {} rows and {} columns, removed {} tables",
        stats.rows,
        stats.columns,
        stats.tables_removed
    );

    if matches.get_flag("stdout") {
        let html = fixer.to_html().unwrap_or_else(|err| fail(err));
        print!("{}", html);
        return;
    }

    match fixer.save(make_backup) {
        Ok(Some(backup)) => log::info!("backup written to {}", backup.display()),
        Ok(None) => {}
        Err(err) => fail(err),
    }
    println!("Done.");
}

fn build_cli() -> Command {
    Command::new("gridfix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrites HTML table layouts into a 12-column grid")
        .arg(
            Arg::new("path")
                .help("Path to the HTML file")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file layered over ./gridfix.toml"),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .short('s')
                .value_parser(["by-row", "by-container"])
                .help("How grid values are derived for table cells"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .value_name("SELECTOR")
                .help("Element to process: a tag name, optionally tag#id"),
        )
        .arg(
            Arg::new("no-backup")
                .long("no-backup")
                .help("Overwrite the file without keeping a backup copy")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("describe")
                .long("describe")
                .help("Print the sized layout tree and leave the file untouched")
                .action(ArgAction::SetTrue)
                .conflicts_with("stdout"),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print the fixed document instead of saving it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v for info, -vv for debug); RUST_LOG takes precedence")
                .action(ArgAction::Count),
        )
}

/// `RUST_LOG` wins when set; otherwise the level follows `-v`
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load_cli_config(matches: &ArgMatches) -> Result<GridfixConfig, String> {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(strategy) = matches.get_one::<String>("strategy") {
        let strategy: GridStrategy = strategy.parse()?;
        loader = loader
            .set_override("layout.strategy", strategy.to_string())
            .map_err(|err| err.to_string())?;
    }
    if let Some(root) = matches.get_one::<String>("root") {
        loader = loader
            .set_override("tags.root_selector", root.as_str())
            .map_err(|err| err.to_string())?;
    }
    loader
        .build()
        .map_err(|err| format!("invalid configuration: {}", err))
}

fn fail(err: impl Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
