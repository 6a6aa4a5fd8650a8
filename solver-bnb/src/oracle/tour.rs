//! Combinatorial bound oracle for the travelling-salesman problem.

use std::fmt;

use solver_lp::Sense;

use super::{Evaluation, Inspection, RelaxationOracle};
use crate::error::BnbResult;
use crate::model::TspProblem;

/// Restriction that extends a partial tour by one city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit(pub usize);

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visit {}", self.0)
    }
}

/// Lower-bounds tours extending a fixed visitation prefix.
///
/// The region of a node is every tour that starts at the start city and
/// then follows its `Visit` restrictions in order. Its bound is
///
/// * the cost of the prefix,
/// * plus the cheapest edge from the last city into an unvisited city
///   (or back to the start when only one city is left),
/// * plus, for every unvisited city, its cheapest edge to another
///   unvisited city or to the start.
///
/// Any completion pays at least one such edge out of each of these cities,
/// so the sum never exceeds the true cost. A complete prefix is priced
/// exactly, including the return edge.
pub struct TourOracle<'a> {
    problem: &'a TspProblem,
}

impl<'a> TourOracle<'a> {
    /// Create an oracle for `problem`.
    pub fn new(problem: &'a TspProblem) -> Self {
        Self { problem }
    }

    /// The visitation prefix: start city followed by the visits.
    pub fn path(&self, restrictions: &[Visit]) -> Vec<usize> {
        std::iter::once(self.problem.start())
            .chain(restrictions.iter().map(|v| v.0))
            .collect()
    }

    fn cheapest(&self, from: usize, targets: impl Iterator<Item = usize>) -> Option<f64> {
        targets
            .filter_map(|to| self.problem.distance(from, to))
            .min_by(f64::total_cmp)
    }

    /// Lower bound for a partial path, or None when some city on it can no
    /// longer be left.
    fn completion_bound(&self, path: &[usize], cost: f64) -> Option<f64> {
        let n = self.problem.num_cities();
        let start = self.problem.start();
        let mut visited = vec![false; n];
        for &c in path {
            visited[c] = true;
        }
        let unvisited: Vec<usize> = (0..n).filter(|&c| !visited[c]).collect();
        let last = *path.last()?;

        let return_allowed = unvisited.len() == 1;
        let out_of_last = self.cheapest(
            last,
            (0..n).filter(|&j| !visited[j] || (return_allowed && j == start)),
        )?;

        let mut bound = cost + out_of_last;
        for &i in &unvisited {
            let out = self.cheapest(
                i,
                (0..n).filter(|&j| j != i && (!visited[j] || j == start)),
            )?;
            bound += out;
        }
        Some(bound)
    }
}

impl RelaxationOracle for TourOracle<'_> {
    type Restriction = Visit;
    type Candidate = Vec<usize>;

    fn sense(&self) -> Sense {
        Sense::Minimize
    }

    fn evaluate(&self, restrictions: &[Visit]) -> BnbResult<Evaluation<Vec<usize>>> {
        let n = self.problem.num_cities();
        let mut path = self.path(restrictions);

        let Some(cost) = self.problem.tour_cost(&path) else {
            return Ok(Evaluation::infeasible(Sense::Minimize, 0));
        };

        if path.len() == n {
            let last = path[n - 1];
            let Some(back) = self.problem.distance(last, self.problem.start()) else {
                log::debug!("no return edge from {}", self.problem.city_name(last));
                return Ok(Evaluation::infeasible(Sense::Minimize, 0));
            };
            let total = cost + back;
            path.push(self.problem.start());
            return Ok(Evaluation::feasible(total, total, path, 0));
        }

        match self.completion_bound(&path, cost) {
            Some(bound) => Ok(Evaluation::feasible(bound, cost, path, 0)),
            None => Ok(Evaluation::infeasible(Sense::Minimize, 0)),
        }
    }

    fn inspect(
        &self,
        restrictions: &[Visit],
        candidate: &Vec<usize>,
        objective: f64,
    ) -> Inspection<Visit> {
        let n = self.problem.num_cities();
        if restrictions.len() + 1 == n {
            return Inspection::Integral { objective };
        }

        let mut visited = vec![false; n];
        for &c in candidate {
            visited[c] = true;
        }
        let Some(&last) = candidate.last() else {
            return Inspection::Branch(Vec::new());
        };

        let children = (0..n)
            .filter(|&j| !visited[j] && self.problem.distance(last, j).is_some())
            .map(Visit)
            .collect();
        Inspection::Branch(children)
    }

    fn describe(&self, restriction: &Visit) -> String {
        format!("→ {}", self.problem.city_name(restriction.0))
    }
}
