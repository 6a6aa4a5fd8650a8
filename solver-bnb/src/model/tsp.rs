//! Travelling-salesman instances over a (possibly incomplete) distance matrix.

use crate::error::{BnbError, BnbResult};

/// A TSP instance. `distances[i][j]` is the cost of travelling from city
/// `i` to city `j`; `None` marks a missing edge. The diagonal is always
/// missing.
#[derive(Debug, Clone)]
pub struct TspProblem {
    distances: Vec<Vec<Option<f64>>>,
    start: usize,
    city_names: Vec<String>,
}

impl TspProblem {
    /// Create an instance from an explicit matrix of optional edges.
    pub fn new(distances: Vec<Vec<Option<f64>>>, start: usize) -> BnbResult<Self> {
        let n = distances.len();
        if n < 2 {
            return Err(BnbError::InvalidProblem(format!(
                "need at least 2 cities, got {}",
                n
            )));
        }
        if let Some((i, row)) = distances.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(BnbError::InvalidProblem(format!(
                "distance row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        if start >= n {
            return Err(BnbError::InvalidProblem(format!(
                "start city {} out of range ({} cities)",
                start, n
            )));
        }
        let bad_edge = distances
            .iter()
            .flatten()
            .flatten()
            .find(|d| !d.is_finite() || **d < 0.0);
        if let Some(d) = bad_edge {
            return Err(BnbError::InvalidProblem(format!(
                "distance {} must be finite and non-negative",
                d
            )));
        }

        let mut distances = distances;
        for (i, row) in distances.iter_mut().enumerate() {
            row[i] = None;
        }

        Ok(Self {
            distances,
            start,
            city_names: (1..=n).map(|i| format!("City{}", i)).collect(),
        })
    }

    /// Create an instance from a dense matrix, where zero and non-finite
    /// entries mean "no connection".
    pub fn from_matrix(matrix: Vec<Vec<f64>>, start: usize) -> BnbResult<Self> {
        if let Some(d) = matrix.iter().flatten().find(|d| **d < 0.0) {
            return Err(BnbError::InvalidProblem(format!(
                "distance {} cannot be negative",
                d
            )));
        }
        let distances = matrix
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|d| (d.is_finite() && d > 0.0).then_some(d))
                    .collect()
            })
            .collect();
        Self::new(distances, start)
    }

    /// Create a symmetric instance from undirected `(from, to, distance)` edges.
    pub fn symmetric(n: usize, edges: &[(usize, usize, f64)], start: usize) -> BnbResult<Self> {
        let mut distances = vec![vec![None; n]; n];
        for &(i, j, d) in edges {
            if i >= n || j >= n {
                return Err(BnbError::InvalidProblem(format!(
                    "edge ({}, {}) out of range ({} cities)",
                    i, j, n
                )));
            }
            if i == j {
                return Err(BnbError::InvalidProblem(format!(
                    "cannot connect city {} to itself",
                    i
                )));
            }
            if !(d.is_finite() && d > 0.0) {
                return Err(BnbError::InvalidProblem(format!(
                    "edge distance {} must be positive",
                    d
                )));
            }
            distances[i][j] = Some(d);
            distances[j][i] = Some(d);
        }
        Self::new(distances, start)
    }

    /// Replace the default `City1..CityN` names.
    pub fn with_city_names<S: Into<String>>(mut self, names: Vec<S>) -> BnbResult<Self> {
        if names.len() != self.num_cities() {
            return Err(BnbError::InvalidProblem(format!(
                "{} names for {} cities",
                names.len(),
                self.num_cities()
            )));
        }
        self.city_names = names.into_iter().map(Into::into).collect();
        Ok(self)
    }

    /// Number of cities.
    pub fn num_cities(&self) -> usize {
        self.distances.len()
    }

    /// Start (and end) city of every tour.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Cost of edge `from -> to`, if it exists.
    pub fn distance(&self, from: usize, to: usize) -> Option<f64> {
        self.distances.get(from)?.get(to).copied().flatten()
    }

    /// Display name of a city.
    pub fn city_name(&self, city: usize) -> &str {
        self.city_names.get(city).map(String::as_str).unwrap_or("?")
    }

    /// Total cost of consecutive edges along `route`, or `None` if an edge
    /// is missing. Pass a closed tour (ending at its first city) to include
    /// the return leg.
    pub fn tour_cost(&self, route: &[usize]) -> Option<f64> {
        route
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }

    /// Check that `tour` starts and ends at the start city and visits every
    /// other city exactly once.
    pub fn is_tour(&self, tour: &[usize]) -> bool {
        let n = self.num_cities();
        if tour.len() != n + 1 || tour.first() != Some(&self.start) || tour.last() != Some(&self.start) {
            return false;
        }
        let mut seen = vec![false; n];
        for &c in &tour[..n] {
            if c >= n || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }

    /// Render a route as `A -> B -> C`.
    pub fn format_route(&self, route: &[usize]) -> String {
        route
            .iter()
            .map(|&c| self.city_name(c))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
