#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod clause;
pub mod cnf;
pub mod config;
pub mod decision_tree;
pub mod dimacs;
pub mod dpll;
pub mod literal;
pub mod propagation;
pub mod solver;
pub mod variable_selection;
