#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader and writer for the DIMACS CNF file format.
//!
//! The format accepted here:
//! - Lines starting with `c` are comments.
//! - Exactly one problem line `p cnf <num_variables> <num_clauses>` precedes
//!   the first clause.
//! - Clauses are whitespace-separated non-zero integers terminated by `0`. A
//!   clause may span several lines.
//! - A line starting with `%` ends the data, as in the SATLIB competition
//!   files.
//!
//! Deviations that still leave a usable formula (clause-count mismatch,
//! variables beyond the declared count, stray `0`s, a missing final `0`) are
//! collected as [`DimacsWarning`]s instead of failing the parse.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use log::warn;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DimacsError {
    #[error("failed to read DIMACS input")]
    Io(#[from] io::Error),

    #[error("no `p cnf` problem line found")]
    MissingProblemLine,

    #[error("line {line}: malformed problem line `{content}`")]
    MalformedProblemLine { line: usize, content: String },

    #[error("line {line}: duplicate problem line")]
    DuplicateProblemLine { line: usize },

    #[error("line {line}: `{token}` is not a literal")]
    InvalidLiteral { line: usize, token: String },

    #[error("line {line}: clause before the problem line")]
    ClauseBeforeProblemLine { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimacsWarning {
    ClauseCountMismatch { declared: usize, actual: usize },
    VariableOutOfRange { line: usize, variable: u32, declared: usize },
    /// A `0` with no literals before it. The empty clause is dropped.
    EmptyClause { line: usize },
    /// The input ended inside a clause. The clause is kept.
    UnterminatedClause { line: usize },
}

impl Display for DimacsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClauseCountMismatch { declared, actual } => {
                write!(f, "problem line declares {declared} clauses, found {actual}")
            }
            Self::VariableOutOfRange {
                line,
                variable,
                declared,
            } => write!(
                f,
                "line {line}: variable {variable} exceeds the declared {declared} variables"
            ),
            Self::EmptyClause { line } => write!(f, "line {line}: empty clause ignored"),
            Self::UnterminatedClause { line } => {
                write!(f, "line {line}: clause not terminated by 0")
            }
        }
    }
}

/// A parsed formula together with everything that looked off in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimacsReport {
    pub cnf: Cnf,
    pub warnings: Vec<DimacsWarning>,
}

/// Parses DIMACS text into a formula and the list of warnings.
///
/// # Errors
///
/// A [`DimacsError`] if reading fails, if the problem line is missing,
/// malformed or repeated, if a clause precedes it, or if a token is not an
/// integer.
pub fn parse_dimacs_report<R: BufRead>(reader: R) -> Result<DimacsReport, DimacsError> {
    let mut declared: Option<(usize, usize)> = None;
    let mut cnf = Cnf::new();
    let mut warnings = Vec::new();
    let mut pending: Vec<Literal> = Vec::new();
    let mut pending_line = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let mut tokens = line.split_whitespace().peekable();
        let first = tokens.peek().copied();

        match first {
            None => {}
            Some("%") => break,
            Some(token) if token.starts_with('c') => {}
            Some("p") => {
                if declared.is_some() {
                    return Err(DimacsError::DuplicateProblemLine { line: number });
                }
                let (num_vars, num_clauses) = parse_problem_line(&line, number)?;
                declared = Some((num_vars, num_clauses));
                cnf = Cnf::with_vars(num_vars);
            }
            Some(_) => {
                let Some((num_vars, _)) = declared else {
                    return Err(DimacsError::ClauseBeforeProblemLine { line: number });
                };

                for token in tokens {
                    let value = token
                        .parse::<i32>()
                        .ok()
                        .filter(|&v| v != i32::MIN)
                        .ok_or_else(|| DimacsError::InvalidLiteral {
                            line: number,
                            token: token.to_owned(),
                        })?;

                    let Some(lit) = Literal::from_i32(value) else {
                        if pending.is_empty() {
                            warnings.push(DimacsWarning::EmptyClause { line: number });
                        } else {
                            cnf.push_clause(Clause::new(pending.drain(..)));
                        }
                        continue;
                    };

                    if lit.variable() as usize > num_vars {
                        warnings.push(DimacsWarning::VariableOutOfRange {
                            line: number,
                            variable: lit.variable(),
                            declared: num_vars,
                        });
                    }
                    if pending.is_empty() {
                        pending_line = number;
                    }
                    pending.push(lit);
                }
            }
        }
    }

    let Some((_, num_clauses)) = declared else {
        return Err(DimacsError::MissingProblemLine);
    };

    if !pending.is_empty() {
        warnings.push(DimacsWarning::UnterminatedClause { line: pending_line });
        cnf.push_clause(Clause::new(pending));
    }

    if cnf.num_clauses() != num_clauses {
        warnings.push(DimacsWarning::ClauseCountMismatch {
            declared: num_clauses,
            actual: cnf.num_clauses(),
        });
    }

    Ok(DimacsReport { cnf, warnings })
}

fn parse_problem_line(line: &str, number: usize) -> Result<(usize, usize), DimacsError> {
    let malformed = || DimacsError::MalformedProblemLine {
        line: number,
        content: line.trim().to_owned(),
    };

    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["p", "cnf", vars, clauses] => {
            // Every variable must fit in a signed literal.
            let vars = vars
                .parse::<i32>()
                .ok()
                .and_then(|vars| usize::try_from(vars).ok())
                .ok_or_else(malformed)?;
            let clauses = clauses.parse().map_err(|_| malformed())?;
            Ok((vars, clauses))
        }
        _ => Err(malformed()),
    }
}

/// Parses DIMACS text, logging any warnings.
///
/// # Errors
///
/// See [`parse_dimacs_report`].
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, DimacsError> {
    let report = parse_dimacs_report(reader)?;
    for warning in &report.warnings {
        warn!("{warning}");
    }
    Ok(report.cnf)
}

/// Parses the DIMACS file at `path`.
///
/// # Errors
///
/// [`DimacsError::Io`] if the file cannot be opened, otherwise as
/// [`parse_dimacs_report`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf, DimacsError> {
    let file = File::open(path)?;
    parse_dimacs(BufReader::new(file))
}

/// Writes any DIMACS rendering (a [`Cnf`] or an encoded puzzle) to `path`.
///
/// # Errors
///
/// [`DimacsError::Io`] if the file cannot be written.
pub fn write_file(path: impl AsRef<Path>, dimacs: &impl Display) -> Result<(), DimacsError> {
    std::fs::write(path, dimacs.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::io::Cursor;

    fn report(content: &str) -> DimacsReport {
        parse_dimacs_report(Cursor::new(content)).unwrap()
    }

    fn clause_values(cnf: &Cnf, index: usize) -> Vec<i32> {
        cnf.clauses()[index].iter().map(|l| l.to_i32()).collect_vec()
    }

    #[test]
    fn test_parse_simple_dimacs() {
        let report = report(
            "c This is a comment\n\
             p cnf 3 2\n\
             1 -2 0\n\
             2 3 0\n",
        );

        assert!(report.warnings.is_empty());
        assert_eq!(report.cnf.num_vars(), 3);
        assert_eq!(report.cnf.num_clauses(), 2);
        assert_eq!(clause_values(&report.cnf, 0), vec![1, -2]);
        assert_eq!(clause_values(&report.cnf, 1), vec![2, 3]);
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let report = report(
            "p cnf 2 2\n\
             \n\
             1 0\n\
             \n\
             -2 0\n\
             %\n\
             0\n\
             c this should be ignored",
        );

        assert!(report.warnings.is_empty());
        assert_eq!(report.cnf.num_clauses(), 2);
        assert_eq!(clause_values(&report.cnf, 0), vec![1]);
        assert_eq!(clause_values(&report.cnf, 1), vec![-2]);
    }

    #[test]
    fn test_clause_spanning_lines() {
        let report = report("p cnf 4 2\n1 2\n3 0 -4\n0\n");
        assert!(report.warnings.is_empty());
        assert_eq!(clause_values(&report.cnf, 0), vec![1, 2, 3]);
        assert_eq!(clause_values(&report.cnf, 1), vec![-4]);
    }

    #[test]
    fn test_several_clauses_on_one_line() {
        let report = report("p cnf 2 2\n1 0 -2 0\n");
        assert_eq!(report.cnf.num_clauses(), 2);
    }

    #[test]
    fn test_no_clauses() {
        let report = report("p cnf 0 0\n");
        assert!(report.warnings.is_empty());
        assert!(report.cnf.is_empty());
        assert_eq!(report.cnf.num_vars(), 0);
    }

    #[test]
    fn test_declared_variables_are_kept() {
        let report = report("p cnf 5 1\n1 0\n");
        assert_eq!(report.cnf.num_vars(), 5);
    }

    #[test]
    fn test_empty_clause_is_dropped_with_warning() {
        let report = report("p cnf 1 1\n0\n");
        assert_eq!(report.cnf.num_clauses(), 0);
        assert_eq!(
            report.warnings,
            vec![
                DimacsWarning::EmptyClause { line: 2 },
                DimacsWarning::ClauseCountMismatch {
                    declared: 1,
                    actual: 0
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_clause_is_kept() {
        let report = report("p cnf 2 1\n1\n-2");
        assert_eq!(clause_values(&report.cnf, 0), vec![1, -2]);
        assert_eq!(
            report.warnings,
            vec![DimacsWarning::UnterminatedClause { line: 2 }]
        );
    }

    #[test]
    fn test_variable_out_of_range_grows_formula() {
        let report = report("p cnf 2 1\n1 -3 0\n");
        assert_eq!(report.cnf.num_vars(), 3);
        assert_eq!(
            report.warnings,
            vec![DimacsWarning::VariableOutOfRange {
                line: 2,
                variable: 3,
                declared: 2
            }]
        );
    }

    #[test]
    fn test_missing_problem_line() {
        let err = parse_dimacs(Cursor::new("c nothing\n")).unwrap_err();
        assert!(matches!(err, DimacsError::MissingProblemLine));
    }

    #[test]
    fn test_clause_before_problem_line() {
        let err = parse_dimacs(Cursor::new("1 2 0\np cnf 2 1\n")).unwrap_err();
        assert!(matches!(err, DimacsError::ClauseBeforeProblemLine { line: 1 }));
    }

    #[test]
    fn test_malformed_problem_line() {
        for content in [
            "p cnf 3\n",
            "p dnf 3 1\n",
            "p cnf x 1\n",
            "p cnf 3 -1\n",
            "p cnf -3 1\n",
            "p cnf 2147483648 0\n",
            "p cnf 4000000000 0\n",
        ] {
            let err = parse_dimacs(Cursor::new(content)).unwrap_err();
            assert!(
                matches!(err, DimacsError::MalformedProblemLine { line: 1, .. }),
                "{content:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_duplicate_problem_line() {
        let err = parse_dimacs(Cursor::new("p cnf 1 1\n1 0\np cnf 1 1\n")).unwrap_err();
        assert!(matches!(err, DimacsError::DuplicateProblemLine { line: 3 }));
    }

    #[test]
    fn test_malformed_literal() {
        let err = parse_dimacs(Cursor::new("p cnf 2 1\n1 abc 0\n")).unwrap_err();
        match err {
            DimacsError::InvalidLiteral { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_rendering_parses_back() {
        let cnf = Cnf::try_from(vec![vec![1, -2], vec![2, 3], vec![-3]]).unwrap();
        let parsed = parse_dimacs(Cursor::new(cnf.to_string())).unwrap();
        assert_eq!(parsed, cnf);
    }

    #[test]
    fn test_write_and_parse_file() {
        let cnf = Cnf::try_from(vec![vec![1, 2], vec![-1, -2]]).unwrap();
        let path = std::env::temp_dir().join(format!("norinori-dimacs-{}.cnf", std::process::id()));

        write_file(&path, &cnf).unwrap();
        let parsed = parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(parsed, cnf);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file("/definitely/not/here.cnf").unwrap_err();
        assert!(matches!(err, DimacsError::Io(_)));
    }
}
