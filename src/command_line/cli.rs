#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use log::debug;
use norinori_sat::norinori::encoder::{EncodeError, Encoding, RegionEncoding};
use norinori_sat::norinori::generator::{GeneratorError, GeneratorOptions, generate};
use norinori_sat::norinori::grid::{EXAMPLE_SIX, Grid, GridError};
use norinori_sat::norinori::marking::Marking;
use norinori_sat::sat::assignment::Solutions;
use norinori_sat::sat::cnf::{Cnf, CnfError};
use norinori_sat::sat::config::SolverOptions;
use norinori_sat::sat::decision_tree::DecisionTree;
use norinori_sat::sat::dimacs::{DimacsError, parse_dimacs, parse_file, write_file};
use norinori_sat::sat::dpll::Dpll;
use norinori_sat::sat::solver::{SolutionStats, SolveOutcome, Solver};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface of the puzzle solver.
#[derive(Parser, Debug)]
#[command(
    name = "norinori-sat",
    version,
    about = "Solves NoriNori puzzles and DIMACS formulas with a DPLL SAT solver"
)]
pub(crate) struct Cli {
    /// Path to a DIMACS .cnf file, solved when no subcommand is given.
    pub path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// DIMACS text, or one clause per line when there is no `p cnf` line
        /// (e.g. "1 -2 0\n2 3 0").
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a NoriNori puzzle. Without `--path` or `--grid` the built-in
    /// 6x6 example is used.
    Puzzle {
        /// Grid file, one row of region labels per line.
        #[arg(long, conflicts_with = "grid")]
        path: Option<PathBuf>,

        /// Region labels as one base-36 string, `--width` per row.
        #[arg(long)]
        grid: Option<String>,

        /// Row width for `--grid`.
        #[arg(long, default_value_t = 6)]
        width: usize,

        #[arg(long, value_enum, default_value_t)]
        encoding: RegionEncoding,

        /// Write the DIMACS encoding of the puzzle to this file.
        #[arg(short, long)]
        export_dimacs: Option<PathBuf>,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a random puzzle board.
    Generate {
        #[arg(long, default_value_t = 6)]
        width: usize,

        #[arg(long, default_value_t = 6)]
        height: usize,

        /// Number of regions; as many as the pairing produces if omitted.
        #[arg(long)]
        regions: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        /// Write the board to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also solve the generated board.
        #[arg(long, default_value_t = false)]
        solve: bool,

        #[arg(long, value_enum, default_value_t)]
        encoding: RegionEncoding,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.cnf` and `.nori` file below a directory.
    Dir {
        #[arg(long)]
        path: PathBuf,

        /// Region encoding used for `.nori` files.
        #[arg(long, value_enum, default_value_t)]
        encoding: RegionEncoding,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by every solving subcommand.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Log at debug level.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a found model against the formula.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the model if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// Give up after this many branch attempts.
    #[arg(long)]
    pub(crate) max_decisions: Option<usize>,

    /// Give up after this many milliseconds.
    #[arg(long)]
    pub(crate) time_limit_ms: Option<u64>,

    /// Print the decision tree of the search.
    #[arg(long, default_value_t = false)]
    pub(crate) print_tree: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            debug: false,
            verify: true,
            stats: true,
            print_solution: false,
            max_decisions: None,
            time_limit_ms: None,
            print_tree: false,
        }
    }
}

impl CommonOptions {
    pub(crate) fn solver_options(&self) -> SolverOptions {
        let mut options = SolverOptions::default().with_decision_tree(self.print_tree);
        if let Some(max) = self.max_decisions {
            options = options.with_max_decisions(max);
        }
        if let Some(ms) = self.time_limit_ms {
            options = options.with_time_limit(Duration::from_millis(ms));
        }
        options
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Dimacs(#[from] DimacsError),

    #[error(transparent)]
    Cnf(#[from] CnfError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("i/o error")]
    Io(#[from] std::io::Error),

    #[error("`{0}` is not a valid clause literal")]
    InvalidLiteral(String),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("the model returned by the solver does not satisfy the formula")]
    VerificationFailed,

    #[error("no input given, pass a .cnf path or a subcommand (see --help)")]
    MissingInput,
}

/// What one solver run produced.
pub(crate) struct Run {
    pub(crate) outcome: SolveOutcome,
    pub(crate) elapsed: Duration,
    pub(crate) stats: SolutionStats,
    pub(crate) tree: Option<DecisionTree>,
}

pub(crate) fn solve(cnf: &Cnf, common: &CommonOptions) -> Run {
    let time = Instant::now();

    let mut solver: Dpll = Dpll::with_options(cnf.clone(), common.solver_options());
    let outcome = solver.solve();

    let elapsed = time.elapsed();
    debug!("{outcome} after {elapsed:?}");

    Run {
        outcome,
        elapsed,
        stats: solver.stats(),
        tree: solver.decision_tree().cloned(),
    }
}

/// Solves `cnf` and prints the verdict, verification and statistics.
///
/// # Errors
///
/// [`CliError::VerificationFailed`] if verification is on and the model does
/// not satisfy `cnf`.
pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<SolveOutcome, CliError> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    debug!(
        "{} variables, {} clauses, {} literals",
        cnf.num_vars(),
        cnf.num_clauses(),
        cnf.num_literals()
    );

    let run = solve(cnf, common);

    if common.verify {
        verify_solution(cnf, run.outcome.solutions())?;
    }

    if common.print_tree {
        if let Some(tree) = &run.tree {
            println!("Decision tree ({} nodes, depth {}):", tree.len(), tree.depth());
            print!("{tree}");
        }
    }

    if common.stats {
        print_stats(parse_time, &run, cnf, memory_usage());
    }

    if let Some(solutions) = run.outcome.solutions() {
        if common.print_solution {
            println!("Solutions: {solutions}");
        }
    }
    println!("\n{}", run.outcome);

    Ok(run.outcome)
}

/// Checks a model against the formula; nothing to check without one.
///
/// # Errors
///
/// [`CliError::VerificationFailed`] if the model falsifies a clause.
pub(crate) fn verify_solution(cnf: &Cnf, solutions: Option<&Solutions>) -> Result<(), CliError> {
    if let Some(solutions) = solutions {
        let ok = cnf.verify(solutions);
        println!("Verified: {ok:?}");
        if !ok {
            return Err(CliError::VerificationFailed);
        }
    }
    Ok(())
}

/// Allocated and resident memory in MiB, if jemalloc reports them.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

pub(crate) fn print_stats(parse_time: Duration, run: &Run, cnf: &Cnf, memory: Option<(f64, f64)>) {
    let elapsed_secs = run.elapsed.as_secs_f64();
    let s = &run.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.num_clauses());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line("Pure literals", s.pure_literals);
    stat_line("Max depth", s.max_depth);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

/// Parses the `text` subcommand input.
///
/// Input with a `p cnf` line is read as DIMACS. Otherwise every `0` ends a
/// clause and so does the end of a non-comment line. Empty clauses are
/// skipped, as the DIMACS reader does.
///
/// # Errors
///
/// A [`DimacsError`] for malformed DIMACS, [`CliError::InvalidLiteral`] for a
/// non-integer token in the line form.
pub(crate) fn parse_textual_cnf(input: &str) -> Result<Cnf, CliError> {
    if input.lines().any(|line| line.trim_start().starts_with('p')) {
        return Ok(parse_dimacs(Cursor::new(input))?);
    }

    let mut cnf = Cnf::new();
    for line in input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('c'))
    {
        let mut literals = Vec::new();
        for token in line.split_whitespace() {
            let value: i32 = token
                .parse()
                .map_err(|_| CliError::InvalidLiteral(token.to_owned()))?;

            if value != 0 {
                literals.push(value);
            } else if !literals.is_empty() {
                cnf.add_clause(std::mem::take(&mut literals))?;
            }
        }
        if !literals.is_empty() {
            cnf.add_clause(literals)?;
        }
    }
    Ok(cnf)
}

pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<SolveOutcome, CliError> {
    let time = Instant::now();
    let cnf = parse_file(path)?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, Some(path), parse_time)
}

pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<SolveOutcome, CliError> {
    let time = Instant::now();
    let cnf = parse_textual_cnf(input)?;
    let parse_time = time.elapsed();

    solve_and_report(&cnf, common, None, parse_time)
}

/// Loads a board from a file, a compact string, or the built-in example.
pub(crate) fn load_grid(
    path: Option<&Path>,
    compact: Option<&str>,
    width: usize,
) -> Result<Grid, CliError> {
    let grid = match (path, compact) {
        (Some(path), _) => Grid::parse_file(path)?,
        (None, Some(compact)) => Grid::from_compact(compact, width)?,
        (None, None) => Grid::from_compact(EXAMPLE_SIX, 6)?,
    };
    Ok(grid)
}

/// Encodes and solves a board, then prints the marked cells and any rule
/// the model breaks.
pub(crate) fn solve_grid(
    grid: &Grid,
    encoding: RegionEncoding,
    export_dimacs: Option<&Path>,
    label: Option<&Path>,
    common: &CommonOptions,
) -> Result<SolveOutcome, CliError> {
    let time = Instant::now();
    println!("Puzzle:\n{grid}");

    let encoded = Encoding::new(grid, encoding)?;
    if let Some(dimacs_path) = export_dimacs {
        write_file(dimacs_path, &encoded)?;
        println!("DIMACS written to: {}", dimacs_path.display());
    }

    let cnf = encoded.to_cnf();
    let parse_time = time.elapsed();
    let outcome = solve_and_report(&cnf, common, label, parse_time)?;

    match outcome.solutions() {
        Some(solutions) => {
            let marking = Marking::from_solutions(grid, solutions);
            println!("Marked cells:\n{marking}");

            let violations = marking.violations();
            if violations.is_empty() {
                println!("All puzzle rules hold.");
            } else {
                println!(
                    "The model breaks {} puzzle rule(s) under the {encoding} encoding:",
                    violations.len()
                );
                for violation in &violations {
                    println!("  {violation}");
                }
            }
        }
        None if outcome.is_unsat() => println!("No solution found"),
        None => {}
    }
    Ok(outcome)
}

pub(crate) fn solve_puzzle_command(
    path: Option<&Path>,
    compact: Option<&str>,
    width: usize,
    encoding: RegionEncoding,
    export_dimacs: Option<&Path>,
    common: &CommonOptions,
) -> Result<SolveOutcome, CliError> {
    let grid = load_grid(path, compact, width)?;
    solve_grid(&grid, encoding, export_dimacs, path, common)
}

pub(crate) fn generate_command(
    options: &GeneratorOptions,
    output: Option<&Path>,
    solve: bool,
    encoding: RegionEncoding,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let grid = generate(options)?;
    println!(
        "Generated {}x{} board with {} regions:\n{grid}",
        grid.width(),
        grid.height(),
        grid.num_regions()
    );

    if let Some(output) = output {
        std::fs::write(output, grid.to_string())?;
        println!("Board written to: {}", output.display());
    }

    if solve {
        solve_grid(&grid, encoding, None, None, common)?;
    }
    Ok(())
}

/// Solves every `.cnf` and `.nori` file below `path`.
///
/// # Errors
///
/// [`CliError::NotADirectory`] if `path` is not a directory; the first error
/// of any file otherwise.
pub(crate) fn solve_dir(
    path: &Path,
    encoding: RegionEncoding,
    common: &CommonOptions,
) -> Result<(), CliError> {
    if !path.is_dir() {
        return Err(CliError::NotADirectory(path.to_path_buf()));
    }

    let files = walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect_vec();

    for file_path in files {
        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("cnf") => {
                solve_file(&file_path, common)?;
            }
            Some("nori") => {
                let grid = Grid::parse_file(&file_path)?;
                solve_grid(&grid, encoding, None, Some(&file_path), common)?;
            }
            _ => debug!("Skipping {}", file_path.display()),
        }
    }

    Ok(())
}
