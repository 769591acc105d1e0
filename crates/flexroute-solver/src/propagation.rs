//! Bound propagation over linear rows.
//!
//! Every row is kept as `sum a_i * x_i <= rhs` (equalities become two
//! rows). For each term the minimum activity of the rest of the row bounds
//! what the term may contribute, which tightens one side of its domain.
//! Rows are revisited through per-variable watch lists until nothing
//! changes.

use std::collections::VecDeque;

use tracing::trace;

use crate::domain::Domain;

/// A `<=` row over dense variable indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub terms: Vec<(usize, i64)>,
    pub rhs: i64,
}

impl Row {
    pub fn new(terms: Vec<(usize, i64)>, rhs: i64) -> Self {
        Self { terms, rhs }
    }

    /// Smallest value the left-hand side can take over `domains`.
    pub fn min_activity(&self, domains: &[Domain]) -> i128 {
        self.terms
            .iter()
            .map(|&(var, coefficient)| min_term(coefficient, domains[var]))
            .sum()
    }
}

fn min_term(coefficient: i64, domain: Domain) -> i128 {
    let coefficient = i128::from(coefficient);
    if coefficient > 0 {
        coefficient * i128::from(domain.lo)
    } else {
        coefficient * i128::from(domain.hi)
    }
}

fn clamp(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Rows plus the rows each variable appears in.
#[derive(Debug, Clone)]
pub struct Propagator {
    rows: Vec<Row>,
    watches: Vec<Vec<usize>>,
}

impl Propagator {
    pub fn new(rows: Vec<Row>, var_count: usize) -> Self {
        let mut watches = vec![Vec::new(); var_count];
        for (index, row) in rows.iter().enumerate() {
            for &(var, _) in &row.terms {
                if watches[var].last() != Some(&index) {
                    watches[var].push(index);
                }
            }
        }
        Self { rows, watches }
    }

    /// Tightens `domains` until every row is bounds consistent.
    ///
    /// Starts from the rows watching `changed`, or from every row when
    /// `changed` is `None`. Returns false as soon as a row cannot be
    /// satisfied or a domain becomes empty.
    pub fn propagate(&self, domains: &mut [Domain], changed: Option<usize>) -> bool {
        let mut queued = vec![false; self.rows.len()];
        let mut queue: VecDeque<usize> = match changed {
            Some(var) => self.watches[var].iter().copied().collect(),
            None => (0..self.rows.len()).collect(),
        };
        for &row in &queue {
            queued[row] = true;
        }

        while let Some(index) = queue.pop_front() {
            queued[index] = false;
            let row = &self.rows[index];
            let min_activity = row.min_activity(domains);
            let rhs = i128::from(row.rhs);
            if min_activity > rhs {
                trace!(event = "row_conflict", row = index);
                return false;
            }

            for &(var, coefficient) in &row.terms {
                let domain = domains[var];
                // coefficient * x <= slack
                let slack = rhs - (min_activity - min_term(coefficient, domain));
                let a = i128::from(coefficient);
                let tightened = if a > 0 {
                    let hi = slack.div_euclid(a);
                    if hi < i128::from(domain.hi) {
                        domains[var].hi = clamp(hi);
                        true
                    } else {
                        false
                    }
                } else {
                    let lo = -slack.div_euclid(-a);
                    if lo > i128::from(domain.lo) {
                        domains[var].lo = clamp(lo);
                        true
                    } else {
                        false
                    }
                };
                if !tightened {
                    continue;
                }
                if domains[var].is_empty() {
                    return false;
                }
                for &other in &self.watches[var] {
                    if other != index && !queued[other] {
                        queued[other] = true;
                        queue.push_back(other);
                    }
                }
            }
        }
        true
    }
}
