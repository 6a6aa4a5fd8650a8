//! Linear program data structures and validation.
//!
//! The solver works with the formulation:
//!
//! ```text
//! maximize / minimize   c^T x
//! subject to            a_i^T x  (<= | >= | =)  b_i     for every row i
//!                       x >= 0
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{LpError, LpResult};

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    /// Maximize the objective.
    #[default]
    Maximize,

    /// Minimize the objective.
    Minimize,
}

impl Sense {
    /// The value every real objective improves on (−∞ for max, +∞ for min).
    pub fn worst(self) -> f64 {
        match self {
            Sense::Maximize => f64::NEG_INFINITY,
            Sense::Minimize => f64::INFINITY,
        }
    }

    /// Returns true if `a` is better than `b` by more than `tol`.
    pub fn is_better(self, a: f64, b: f64, tol: f64) -> bool {
        match self {
            Sense::Maximize => a > b + tol,
            Sense::Minimize => a < b - tol,
        }
    }

    /// Map an objective value onto a scale where larger is always better.
    pub fn signed(self, value: f64) -> f64 {
        match self {
            Sense::Maximize => value,
            Sense::Minimize => -value,
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Maximize => write!(f, "Maximize"),
            Sense::Minimize => write!(f, "Minimize"),
        }
    }
}

/// Relation between a constraint row and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a^T x <= b`
    Le,
    /// `a^T x >= b`
    Ge,
    /// `a^T x = b`
    Eq,
}

impl Relation {
    /// The relation obtained by multiplying both sides by −1.
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }

    /// Textual symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Le => "≤",
            Relation::Ge => "≥",
            Relation::Eq => "=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Relation {
    type Err = LpError;

    /// Strict inequalities are accepted and read as their non-strict form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" | "≤" | "<" => Ok(Relation::Le),
            ">=" | "≥" | ">" => Ok(Relation::Ge),
            "=" | "==" => Ok(Relation::Eq),
            other => Err(LpError::InvalidProblem(format!(
                "malformed relation kind '{}'",
                other
            ))),
        }
    }
}

/// A single constraint row.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficient vector (dense, length n).
    pub coefs: Vec<f64>,

    /// Relation kind.
    pub relation: Relation,

    /// Right-hand side.
    pub rhs: f64,
}

impl Constraint {
    /// Create a new constraint row.
    pub fn new(coefs: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            coefs,
            relation,
            rhs,
        }
    }

    /// `a^T x <= rhs`
    pub fn le(coefs: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefs, Relation::Le, rhs)
    }

    /// `a^T x >= rhs`
    pub fn ge(coefs: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefs, Relation::Ge, rhs)
    }

    /// `a^T x = rhs`
    pub fn eq(coefs: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefs, Relation::Eq, rhs)
    }

    /// Single-variable row `x_var (rel) rhs` over `n` variables.
    pub fn unit(n: usize, var: usize, relation: Relation, rhs: f64) -> Self {
        let mut coefs = vec![0.0; n];
        coefs[var] = 1.0;
        Self::new(coefs, relation, rhs)
    }

    /// Left-hand side value `a^T x`.
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coefs.iter().zip(x.iter()).map(|(a, x)| a * x).sum()
    }

    /// Amount by which `x` violates the row (0 when satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let lhs = self.lhs(x);
        match self.relation {
            Relation::Le => (lhs - self.rhs).max(0.0),
            Relation::Ge => (self.rhs - lhs).max(0.0),
            Relation::Eq => (lhs - self.rhs).abs(),
        }
    }

    /// Row with both sides negated when the right-hand side is negative.
    pub fn normalized(&self) -> Self {
        if self.rhs < 0.0 {
            Self {
                coefs: self.coefs.iter().map(|c| -c).collect(),
                relation: self.relation.flipped(),
                rhs: -self.rhs,
            }
        } else {
            self.clone()
        }
    }
}

/// Linear program with non-negative variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    /// Optimization direction.
    pub sense: Sense,

    /// Objective coefficients c (length n).
    pub objective: Vec<f64>,

    /// Constraint rows.
    pub constraints: Vec<Constraint>,
}

impl LinearProgram {
    /// Create a program with no constraints yet.
    pub fn new(sense: Sense, objective: Vec<f64>) -> Self {
        Self {
            sense,
            objective,
            constraints: Vec::new(),
        }
    }

    /// Shorthand for a maximization program.
    pub fn maximize(objective: Vec<f64>) -> Self {
        Self::new(Sense::Maximize, objective)
    }

    /// Shorthand for a minimization program.
    pub fn minimize(objective: Vec<f64>) -> Self {
        Self::new(Sense::Minimize, objective)
    }

    /// Append a constraint row.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Get the number of structural variables (n)
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Get the number of constraint rows (m)
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value `c^T x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x.iter()).map(|(c, x)| c * x).sum()
    }

    /// Check every row and the sign restriction within `tol`.
    pub fn is_satisfied_by(&self, x: &[f64], tol: f64) -> bool {
        x.len() == self.num_vars()
            && x.iter().all(|&v| v >= -tol)
            && self.constraints.iter().all(|c| c.violation(x) <= tol)
    }

    /// Validate problem dimensions and coefficients.
    pub fn validate(&self) -> LpResult<()> {
        let n = self.num_vars();
        if n == 0 {
            return Err(LpError::InvalidProblem(
                "objective must have at least one variable".to_string(),
            ));
        }
        if self.constraints.is_empty() {
            return Err(LpError::InvalidProblem(
                "problem must have at least one constraint".to_string(),
            ));
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(LpError::InvalidProblem(
                "objective coefficients must be finite".to_string(),
            ));
        }

        for (i, row) in self.constraints.iter().enumerate() {
            if row.coefs.len() != n {
                return Err(LpError::InvalidProblem(format!(
                    "constraint {} has {} coefficients but the objective has {}",
                    i + 1,
                    row.coefs.len(),
                    n
                )));
            }
            if row.coefs.iter().any(|c| !c.is_finite()) || !row.rhs.is_finite() {
                return Err(LpError::InvalidProblem(format!(
                    "constraint {} has a non-finite entry",
                    i + 1
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parsing() {
        assert_eq!("<=".parse::<Relation>().unwrap(), Relation::Le);
        assert_eq!("<".parse::<Relation>().unwrap(), Relation::Le);
        assert_eq!("≥".parse::<Relation>().unwrap(), Relation::Ge);
        assert_eq!(" > ".parse::<Relation>().unwrap(), Relation::Ge);
        assert_eq!("==".parse::<Relation>().unwrap(), Relation::Eq);
        assert!("=>".parse::<Relation>().is_err());
        assert!("".parse::<Relation>().is_err());
    }

    #[test]
    fn test_sense_comparisons() {
        assert!(Sense::Maximize.is_better(3.0, 2.0, 1e-9));
        assert!(!Sense::Maximize.is_better(2.0, 2.0, 1e-9));
        assert!(Sense::Minimize.is_better(2.0, 3.0, 1e-9));
        assert!(!Sense::Minimize.is_better(3.0, 3.0, 1e-9));

        // Everything beats the initial incumbent
        assert!(Sense::Maximize.is_better(-1e12, Sense::Maximize.worst(), 1e-9));
        assert!(Sense::Minimize.is_better(1e12, Sense::Minimize.worst(), 1e-9));
    }

    #[test]
    fn test_normalization() {
        // -x - y >= -4  becomes  x + y <= 4
        let row = Constraint::ge(vec![-1.0, -1.0], -4.0).normalized();
        assert_eq!(row.coefs, vec![1.0, 1.0]);
        assert_eq!(row.relation, Relation::Le);
        assert_eq!(row.rhs, 4.0);

        let row = Constraint::eq(vec![2.0], 3.0).normalized();
        assert_eq!(row, Constraint::eq(vec![2.0], 3.0));
    }

    #[test]
    fn test_violation() {
        let le = Constraint::le(vec![1.0, 1.0], 1.0);
        assert_eq!(le.violation(&[0.5, 0.5]), 0.0);
        assert!((le.violation(&[0.6, 0.6]) - 0.2).abs() < 1e-12);

        let ge = Constraint::ge(vec![1.0, 0.0], 2.0);
        assert!((ge.violation(&[1.5, 0.0]) - 0.5).abs() < 1e-12);

        let eq = Constraint::eq(vec![1.0, 0.0], 2.0);
        assert!((eq.violation(&[2.5, 0.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        let lp = LinearProgram::maximize(vec![1.0, 1.0])
            .with_constraint(Constraint::le(vec![1.0, 1.0], 4.0));
        assert!(lp.validate().is_ok());

        let empty = LinearProgram::maximize(vec![]);
        assert!(empty.validate().is_err());

        let no_rows = LinearProgram::maximize(vec![1.0]);
        assert!(no_rows.validate().is_err());

        let mismatched = LinearProgram::maximize(vec![1.0, 1.0])
            .with_constraint(Constraint::le(vec![1.0], 4.0));
        assert!(matches!(
            mismatched.validate(),
            Err(LpError::InvalidProblem(_))
        ));

        let nan = LinearProgram::minimize(vec![1.0])
            .with_constraint(Constraint::ge(vec![f64::NAN], 1.0));
        assert!(nan.validate().is_err());
    }
}
