//! Encodes NoriNori puzzles as Boolean satisfiability problems and decides
//! them with a DPLL solver.

/// The `norinori` module models the puzzle grid, compiles its rules into CNF
/// and decodes solver models back into marked cells.
pub mod norinori;

/// The `sat` module implements the CNF model, the DIMACS codec and the DPLL
/// solver.
pub mod sat;
