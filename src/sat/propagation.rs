#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clause-set simplification used by the DPLL engine.
//!
//! All functions work on a *working copy* of the clause set: clauses that
//! become satisfied are dropped and falsified literals are deleted, so the
//! remaining set only ever mentions undecided variables.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use itertools::Itertools;
use rustc_hash::FxHashSet;

/// Propagating `literal` emptied a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub literal: Literal,
}

/// Simplifies `clauses` under the assumption that `lit` is true.
///
/// Every clause containing `lit` is removed and `¬lit` is deleted from the
/// others. Returns `None` if some clause ends up empty, including a clause
/// that was already empty.
#[must_use]
pub fn simplify(clauses: &[Clause], lit: Literal) -> Option<Vec<Clause>> {
    let falsified = lit.negated();
    let mut simplified = Vec::with_capacity(clauses.len());

    for clause in clauses {
        if clause.contains(lit) {
            continue;
        }

        let clause = if clause.contains(falsified) {
            clause.without(falsified)
        } else {
            clause.clone()
        };

        if clause.is_empty() {
            return None;
        }
        simplified.push(clause);
    }

    Some(simplified)
}

/// Repeatedly fixes the first unit clause until none is left.
///
/// Returns the number of literals fixed.
///
/// # Errors
///
/// [`Conflict`] when fixing a unit literal empties another clause. The clause
/// set and assignment are then left in their partially propagated state and
/// the caller discards them.
pub fn unit_propagate(
    clauses: &mut Vec<Clause>,
    assignment: &mut Assignment,
) -> Result<usize, Conflict> {
    let mut propagated = 0;

    loop {
        let Some(lit) = clauses.iter().find(|c| c.is_unit()).map(|unit| unit[0]) else {
            break;
        };
        assignment.assign_literal(lit);
        propagated += 1;

        *clauses = simplify(clauses, lit).ok_or(Conflict { literal: lit })?;

        if clauses.is_empty() {
            break;
        }
    }

    Ok(propagated)
}

/// Literals whose negation does not occur anywhere in `clauses`, ordered by
/// variable.
#[must_use]
pub fn pure_literals(clauses: &[Clause]) -> Vec<Literal> {
    let occurring: FxHashSet<Literal> = clauses.iter().flat_map(Clause::iter).copied().collect();

    occurring
        .iter()
        .copied()
        .filter(|lit| !occurring.contains(&lit.negated()))
        .sorted_by_key(|lit| lit.variable())
        .collect()
}

/// Fixes every pure literal whose variable is still undecided and drops the
/// clauses it satisfies. Returns the number of variables fixed.
pub fn eliminate_pure_literals(clauses: &mut Vec<Clause>, assignment: &mut Assignment) -> usize {
    let mut eliminated = 0;

    for lit in pure_literals(clauses) {
        if assignment.is_assigned(lit.variable()) {
            continue;
        }
        assignment.assign_literal(lit);
        clauses.retain(|clause| !clause.contains(lit));
        eliminated += 1;
    }

    eliminated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::cnf::Cnf;

    fn clauses(raw: &[&[i32]]) -> Vec<Clause> {
        raw.iter()
            .map(|c| c.iter().filter_map(|&l| Literal::from_i32(l)).collect())
            .collect()
    }

    fn lit(value: i32) -> Literal {
        Literal::from_i32(value).unwrap()
    }

    #[test]
    fn test_simplify() {
        let cs = clauses(&[&[1, 2], &[-1, 3], &[2, 3]]);
        let simplified = simplify(&cs, lit(1)).unwrap();
        assert_eq!(simplified, clauses(&[&[3], &[2, 3]]));
    }

    #[test]
    fn test_simplify_conflict() {
        let cs = clauses(&[&[1, 2], &[-1]]);
        assert_eq!(simplify(&cs, lit(1)), None);
    }

    #[test]
    fn test_simplify_keeps_tautologies_out() {
        let cs = clauses(&[&[1, -1], &[2]]);
        assert_eq!(simplify(&cs, lit(-1)).unwrap(), clauses(&[&[2]]));
    }

    #[test]
    fn test_unit_propagate_chain() {
        let mut cs = clauses(&[&[1], &[-1, 2], &[-2, 3], &[3, 4, 5]]);
        let mut a = Assignment::new(5);

        let n = unit_propagate(&mut cs, &mut a).unwrap();

        assert_eq!(n, 3);
        assert!(cs.is_empty());
        assert_eq!(a.var_value(1), Some(true));
        assert_eq!(a.var_value(2), Some(true));
        assert_eq!(a.var_value(3), Some(true));
        assert_eq!(a.var_value(4), None);
    }

    #[test]
    fn test_unit_propagate_conflict() {
        let mut cs = clauses(&[&[1], &[-1]]);
        let mut a = Assignment::new(1);

        let err = unit_propagate(&mut cs, &mut a).unwrap_err();
        assert_eq!(err.literal, lit(1));
    }

    #[test]
    fn test_unit_propagate_is_idempotent() {
        let mut cs = clauses(&[&[-2], &[1, 2, 3], &[2, -3, 4], &[-1, 4]]);
        let mut a = Assignment::new(4);

        let n = unit_propagate(&mut cs, &mut a).unwrap();
        assert_eq!(n, 1);
        assert_eq!(a.var_value(2), Some(false));

        let (before, before_assignment) = (cs.clone(), a.clone());
        assert_eq!(unit_propagate(&mut cs, &mut a), Ok(0));
        assert_eq!(cs, before);
        assert_eq!(a, before_assignment);
    }

    #[test]
    fn test_unit_propagate_fixes_units_consistently() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);

        for _ in 0..200 {
            let raw: Vec<Vec<i32>> = (0..rng.usize(1..6))
                .map(|_| {
                    (0..rng.usize(1..4))
                        .map(|_| {
                            let var = rng.i32(1..=4);
                            if rng.bool() { var } else { -var }
                        })
                        .collect()
                })
                .collect();
            let cnf = Cnf::try_from(raw).unwrap();
            let mut cs = cnf.clauses().to_vec();
            let mut a = Assignment::new(cnf.num_vars());

            if unit_propagate(&mut cs, &mut a).is_ok() {
                // Every original clause is either satisfied or still present
                // in reduced form over undecided variables.
                assert!(cs.iter().all(|c| !c.is_unit()));
                assert!(cs.iter().flat_map(Clause::iter).all(|l| !a.is_assigned(l.variable())));
                for clause in cnf.iter() {
                    assert!(!clause.is_falsified(&a));
                }
            }
        }
    }

    #[test]
    fn test_pure_literals() {
        let cs = clauses(&[&[1, -2], &[-1, -2, 3], &[3, 4]]);
        assert_eq!(pure_literals(&cs), vec![lit(-2), lit(3), lit(4)]);
    }

    #[test]
    fn test_eliminate_pure_literals() {
        let mut cs = clauses(&[&[1, -2], &[-1, -2], &[1, 3]]);
        let mut a = Assignment::new(3);

        let n = eliminate_pure_literals(&mut cs, &mut a);

        assert_eq!(n, 2);
        assert!(cs.is_empty());
        assert_eq!(a.var_value(2), Some(false));
        assert_eq!(a.var_value(3), Some(true));
        assert_eq!(a.var_value(1), None);
    }

    #[test]
    fn test_eliminate_pure_literals_skips_assigned() {
        let mut cs = clauses(&[&[2, 3]]);
        let mut a = Assignment::new(3);
        a.assign(2, false);

        let n = eliminate_pure_literals(&mut cs, &mut a);

        assert_eq!(n, 1);
        assert_eq!(a.var_value(2), Some(false));
        assert_eq!(a.var_value(3), Some(true));
        assert!(cs.is_empty());
    }

    fn brute_force_sat(cs: &[Clause], num_vars: usize) -> bool {
        (0..1u32 << num_vars).any(|mask| {
            cs.iter().all(|c| {
                c.iter()
                    .any(|l| (((mask >> (l.variable() - 1)) & 1) == 1) == l.polarity())
            })
        })
    }

    #[test]
    fn test_pure_literal_elimination_preserves_satisfiability() {
        let mut rng = fastrand::Rng::with_seed(42);

        for _ in 0..300 {
            let mut cs: Vec<Clause> = (0..rng.usize(1..8))
                .map(|_| {
                    (0..rng.usize(1..4))
                        .map(|_| Literal::new(rng.u32(1..=4), rng.bool()))
                        .collect()
                })
                .collect();
            let before = brute_force_sat(&cs, 4);
            let mut a = Assignment::new(4);

            eliminate_pure_literals(&mut cs, &mut a);

            assert_eq!(before, brute_force_sat(&cs, 4));
            for (var, state) in a.iter() {
                if let Some(value) = state.value() {
                    let fixed = Literal::new(var, value);
                    assert!(cs.iter().all(|c| !c.contains(fixed) && !c.contains(!fixed)));
                }
            }
        }
    }
}
