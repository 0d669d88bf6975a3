#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! # norinori-sat
//!
//! Command-line front end of the NoriNori encoder and the DPLL solver.
//!
//! ## Usage
//!
//! ```sh
//! norinori-sat [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! A bare `PATH` is solved as a DIMACS `.cnf` file.
//!
//! ### Subcommands
//!
//! 1.  **`file`**: solve a DIMACS file.
//!     ```sh
//!     norinori-sat file --path problem.cnf
//!     ```
//! 2.  **`text`**: solve a formula given inline.
//!     ```sh
//!     norinori-sat text --input "1 -2 0\n2 3 0"
//!     ```
//! 3.  **`puzzle`**: encode and solve a board, the built-in 6x6 example when
//!     no board is given.
//!     ```sh
//!     norinori-sat puzzle --path board.nori --encoding exact --export-dimacs board.cnf
//!     norinori-sat puzzle --grid 11223344 --width 4
//!     ```
//! 4.  **`generate`**: generate a random board and optionally solve it.
//!     ```sh
//!     norinori-sat generate --width 8 --height 8 --seed 7 --solve
//!     ```
//! 5.  **`dir`**: solve every `.cnf` and `.nori` file below a directory.
//! 6.  **`completions`**: print a shell completion script.
//!
//! ### Common options
//!
//! -   `-d, --debug`: log at debug level (`RUST_LOG` overrides the level).
//! -   `--verify <BOOL>`: check the model against the formula (default `true`).
//! -   `--stats <BOOL>`: print statistics (default `true`).
//! -   `-p, --print-solution`: print the model.
//! -   `--max-decisions <N>`, `--time-limit-ms <MS>`: search budgets.
//! -   `--print-tree`: print the decision tree of the search.

use crate::command_line::cli::{
    Cli, CliError, Commands, generate_command, solve_dir, solve_file, solve_puzzle_command,
    solve_text,
};
use clap::{CommandFactory, Parser};
use log::{LevelFilter, error};
use norinori_sat::norinori::generator::GeneratorOptions;
use std::io::Write;

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();
    configure_logging(debug_requested(&cli));

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn debug_requested(cli: &Cli) -> bool {
    cli.common.debug
        || match &cli.command {
            Some(
                Commands::File { common, .. }
                | Commands::Text { common, .. }
                | Commands::Puzzle { common, .. }
                | Commands::Generate { common, .. }
                | Commands::Dir { common, .. },
            ) => common.debug,
            Some(Commands::Completions { .. }) | None => false,
        }
}

/// Log lines are DIMACS comments so they can be interleaved with solver
/// output on stdout.
fn configure_logging(debug: bool) {
    let level_filter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "c {}: {}", record.level(), record.args()))
        .filter_level(level_filter)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => {
            let path = cli.path.ok_or(CliError::MissingInput)?;
            solve_file(&path, &cli.common)?;
        }
        Some(Commands::File { path, common }) => {
            solve_file(&path, &common)?;
        }
        Some(Commands::Text { input, common }) => {
            solve_text(&input, &common)?;
        }
        Some(Commands::Puzzle {
            path,
            grid,
            width,
            encoding,
            export_dimacs,
            common,
        }) => {
            solve_puzzle_command(
                path.as_deref(),
                grid.as_deref(),
                width,
                encoding,
                export_dimacs.as_deref(),
                &common,
            )?;
        }
        Some(Commands::Generate {
            width,
            height,
            regions,
            seed,
            output,
            solve,
            encoding,
            common,
        }) => {
            let mut options = GeneratorOptions::new(width, height);
            options.regions = regions;
            options.seed = seed;
            generate_command(&options, output.as_deref(), solve, encoding, &common)?;
        }
        Some(Commands::Dir {
            path,
            encoding,
            common,
        }) => {
            solve_dir(&path, encoding, &common)?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }
    Ok(())
}
