#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) SAT solver.
//!
//! The solver takes a CNF formula and decides whether it is satisfiable. If
//! it is, it also returns a complete model.
//!
//! Each recursive call works on its own copy of the clause set and of the
//! assignment, so backtracking needs no undo log:
//! 1.  **Base cases:** an empty clause set is satisfied; a set containing an
//!     empty clause is a conflict.
//! 2.  **Unit propagation:** the literal of the first unit clause is fixed and
//!     the clause set simplified, until no unit clause is left.
//! 3.  **Pure-literal elimination:** variables occurring with a single
//!     polarity are fixed to that polarity.
//! 4.  **Decision:** the lowest-numbered undecided variable is tried `true`,
//!     then `false`. The first branch that succeeds hands its assignment back
//!     up the call chain.
//!
//! Every branch attempt can be recorded in a [`DecisionTree`] for diagnostics.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::config::SolverOptions;
use crate::sat::decision_tree::{DecisionTree, NodeId};
use crate::sat::literal::Literal;
use crate::sat::propagation::{eliminate_pure_literals, simplify, unit_propagate};
use crate::sat::solver::{AbortReason, SolutionStats, SolveOutcome, Solver};
use crate::sat::variable_selection::{FixedOrder, VariableSelection};
use log::{debug, trace};
use std::time::Instant;

/// Result of one recursive search call.
enum Search {
    Satisfied(Assignment),
    Conflict,
    Aborted(AbortReason),
}

/// A DPLL SAT solver.
///
/// The formula is never mutated; `solve` can be called repeatedly and always
/// starts from the all-undecided state.
#[derive(Debug, Clone)]
pub struct Dpll<S: VariableSelection = FixedOrder> {
    /// The formula being solved.
    pub cnf: Cnf,
    /// Picks the next variable to branch on.
    pub selector: S,
    pub options: SolverOptions,
    stats: SolutionStats,
    tree: Option<DecisionTree>,
    started: Instant,
}

impl<S: VariableSelection> Solver for Dpll<S> {
    fn new(cnf: Cnf) -> Self {
        Self::with_options(cnf, SolverOptions::default())
    }

    fn solve(&mut self) -> SolveOutcome {
        self.stats = SolutionStats::default();
        self.tree = self.options.record_tree.then(DecisionTree::new);
        self.started = Instant::now();

        let clauses = self.cnf.clauses().to_vec();
        let assignment = Assignment::new(self.cnf.num_vars());
        let root = self.tree.as_ref().map(DecisionTree::root);

        let outcome = match self.search(clauses, assignment, root, 0) {
            Search::Satisfied(assignment) => SolveOutcome::Satisfiable(assignment.extend()),
            Search::Conflict => SolveOutcome::Unsatisfiable,
            Search::Aborted(reason) => SolveOutcome::Aborted(reason),
        };

        debug!(
            "dpll finished in {:?}: {outcome}, {} decisions, {} propagations, {} conflicts",
            self.started.elapsed(),
            self.stats.decisions,
            self.stats.propagations,
            self.stats.conflicts,
        );
        outcome
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl<S: VariableSelection> Dpll<S> {
    #[must_use]
    pub fn with_options(cnf: Cnf, options: SolverOptions) -> Self {
        let selector = S::new(cnf.num_vars());
        Self {
            cnf,
            selector,
            options,
            stats: SolutionStats::default(),
            tree: None,
            started: Instant::now(),
        }
    }

    /// The tree of the last search, if `record_tree` was set.
    #[must_use]
    pub const fn decision_tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    fn search(
        &mut self,
        mut clauses: Vec<Clause>,
        mut assignment: Assignment,
        node: Option<NodeId>,
        depth: usize,
    ) -> Search {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if clauses.is_empty() {
            return self.satisfied(node, assignment);
        }

        if clauses.iter().any(Clause::is_empty) {
            self.stats.conflicts += 1;
            return Search::Conflict;
        }

        match unit_propagate(&mut clauses, &mut assignment) {
            Ok(propagated) => self.stats.propagations += propagated,
            Err(conflict) => {
                trace!("depth {depth}: conflict propagating {}", conflict.literal);
                self.stats.conflicts += 1;
                return Search::Conflict;
            }
        }

        self.stats.pure_literals += eliminate_pure_literals(&mut clauses, &mut assignment);

        if clauses.is_empty() {
            return self.satisfied(node, assignment);
        }

        let Some(var) = self.selector.pick(&assignment) else {
            return self.satisfied(node, assignment);
        };

        for value in [true, false] {
            if let Some(reason) = self.exhausted_budget() {
                return Search::Aborted(reason);
            }

            let lit = Literal::new(var, value);
            self.stats.decisions += 1;
            let child = self
                .tree
                .as_mut()
                .zip(node)
                .map(|(tree, parent)| tree.add_child(parent, var, value));
            trace!("depth {depth}: deciding {lit}");

            let Some(reduced) = simplify(&clauses, lit) else {
                self.stats.conflicts += 1;
                continue;
            };

            let mut branch = assignment.clone();
            branch.assign_literal(lit);

            match self.search(reduced, branch, child, depth + 1) {
                Search::Satisfied(model) => return self.satisfied(node, model),
                Search::Conflict => {}
                aborted @ Search::Aborted(_) => return aborted,
            }
        }

        Search::Conflict
    }

    fn satisfied(&mut self, node: Option<NodeId>, assignment: Assignment) -> Search {
        if let (Some(tree), Some(id)) = (self.tree.as_mut(), node) {
            tree.mark_solution(id);
        }
        Search::Satisfied(assignment)
    }

    fn exhausted_budget(&self) -> Option<AbortReason> {
        if !self.options.is_bounded() {
            return None;
        }
        if let Some(limit) = self.options.max_decisions {
            if self.stats.decisions >= limit {
                return Some(AbortReason::DecisionLimit(limit));
            }
        }
        if let Some(limit) = self.options.time_limit {
            if self.started.elapsed() >= limit {
                return Some(AbortReason::TimeLimit(limit));
            }
        }
        None
    }
}
