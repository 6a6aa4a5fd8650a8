//! Dense simplex tableau with Big-M artificial columns.
//!
//! Layout of the `(m + 1) × (k + 1)` matrix:
//!
//! ```text
//!            structural | slack/surplus | artificial | rhs
//! row 0..m   a_ij       | ±1            | +1         | b_i
//! row m      -c_j       | 0             | ±M         | z
//! ```
//!
//! The objective row holds `z_j - c_j` for both directions. After
//! construction and after every pivot each basic column is a unit vector
//! with a zero entry in the objective row.

use nalgebra::DMatrix;

use crate::problem::{Constraint, LinearProgram, Relation, Sense};
use crate::settings::SimplexSettings;

/// Role of a tableau column. Row indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Decision variable `x_j`.
    Structural(usize),

    /// Slack of a `≤` row.
    Slack(usize),

    /// Surplus of a `≥` row.
    Surplus(usize),

    /// Artificial variable of a `≥` or `=` row.
    Artificial(usize),
}

impl ColumnKind {
    /// Short display label (`x1`, `s2`, `e3`, `a3`).
    pub fn label(&self) -> String {
        match self {
            ColumnKind::Structural(j) => format!("x{}", j + 1),
            ColumnKind::Slack(i) => format!("s{}", i + 1),
            ColumnKind::Surplus(i) => format!("e{}", i + 1),
            ColumnKind::Artificial(i) => format!("a{}", i + 1),
        }
    }

    /// Returns true for artificial columns.
    pub fn is_artificial(&self) -> bool {
        matches!(self, ColumnKind::Artificial(_))
    }
}

/// Pivot position chosen in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pivot {
    /// Leaving row.
    pub row: usize,

    /// Entering column.
    pub col: usize,
}

/// Copy of the tableau state after a discrete simplex step.
#[derive(Debug, Clone)]
pub struct TableauSnapshot {
    /// Number of pivots performed so far.
    pub iteration: usize,

    /// Pivot that produced this state (None for the initial tableau).
    pub pivot: Option<Pivot>,

    /// Basic column of every constraint row.
    pub basis: Vec<usize>,

    /// Full tableau matrix including objective row and rhs column.
    pub matrix: DMatrix<f64>,
}

/// Dense simplex tableau owned by a single solve.
#[derive(Debug, Clone)]
pub struct Tableau {
    matrix: DMatrix<f64>,
    columns: Vec<ColumnKind>,
    basis: Vec<usize>,
    sense: Sense,
    num_structural: usize,
}

impl Tableau {
    /// Build the initial tableau, already reduced with respect to its basis.
    ///
    /// Rows with a negative right-hand side are negated first so every
    /// initial basic value is non-negative.
    pub fn new(lp: &LinearProgram, settings: &SimplexSettings) -> Self {
        let n = lp.num_vars();
        let rows: Vec<Constraint> = lp.constraints.iter().map(Constraint::normalized).collect();
        let m = rows.len();

        let mut columns: Vec<ColumnKind> = (0..n).map(ColumnKind::Structural).collect();
        columns.extend(rows.iter().enumerate().filter_map(|(i, row)| match row.relation {
            Relation::Le => Some(ColumnKind::Slack(i)),
            Relation::Ge => Some(ColumnKind::Surplus(i)),
            Relation::Eq => None,
        }));
        let num_aux = columns.len() - n;
        columns.extend(
            rows.iter()
                .enumerate()
                .filter(|(_, row)| row.relation != Relation::Le)
                .map(|(i, _)| ColumnKind::Artificial(i)),
        );

        let rhs_col = columns.len();
        let mut matrix = DMatrix::zeros(m + 1, rhs_col + 1);
        let mut basis = Vec::with_capacity(m);

        let mut next_aux = n;
        let mut next_art = n + num_aux;
        for (i, row) in rows.iter().enumerate() {
            for (j, &a) in row.coefs.iter().enumerate() {
                matrix[(i, j)] = a;
            }
            match row.relation {
                Relation::Le => {
                    matrix[(i, next_aux)] = 1.0;
                    basis.push(next_aux);
                    next_aux += 1;
                }
                Relation::Ge => {
                    matrix[(i, next_aux)] = -1.0;
                    matrix[(i, next_art)] = 1.0;
                    basis.push(next_art);
                    next_aux += 1;
                    next_art += 1;
                }
                Relation::Eq => {
                    matrix[(i, next_art)] = 1.0;
                    basis.push(next_art);
                    next_art += 1;
                }
            }
            matrix[(i, rhs_col)] = row.rhs;
        }

        // Objective row: z_j - c_j
        for (j, &c) in lp.objective.iter().enumerate() {
            matrix[(m, j)] = -c;
        }
        let penalty = match lp.sense {
            Sense::Maximize => settings.big_m,
            Sense::Minimize => -settings.big_m,
        };
        for (j, kind) in columns.iter().enumerate() {
            if kind.is_artificial() {
                matrix[(m, j)] = penalty;
            }
        }

        let mut tableau = Self {
            matrix,
            columns,
            basis,
            sense: lp.sense,
            num_structural: n,
        };

        // Price out the penalty of every initially basic artificial
        for i in 0..m {
            let col = tableau.basis[i];
            let factor = tableau.matrix[(m, col)];
            if factor != 0.0 {
                tableau.subtract_row(m, i, factor);
            }
        }

        tableau
    }

    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Number of variable columns (excluding rhs).
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column roles.
    pub fn columns(&self) -> &[ColumnKind] {
        &self.columns
    }

    /// Basic column of every constraint row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Right-hand side of row `i` (row `num_rows()` is the objective row).
    pub fn rhs(&self, i: usize) -> f64 {
        self.matrix[(i, self.num_columns())]
    }

    /// Objective-row coefficient of column `j`.
    pub fn reduced_cost(&self, j: usize) -> f64 {
        self.matrix[(self.num_rows(), j)]
    }

    /// Entering column: most negative (max) / most positive (min) reduced cost
    /// beyond `tol`. Ties go to the lowest column index.
    pub fn entering_column(&self, tol: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for j in 0..self.num_columns() {
            let score = match self.sense {
                Sense::Maximize => -self.reduced_cost(j),
                Sense::Minimize => self.reduced_cost(j),
            };
            if score > tol && best.map_or(true, |(_, s)| score > s) {
                best = Some((j, score));
            }
        }
        best.map(|(j, _)| j)
    }

    /// Leaving row by minimum ratio over rows with a positive entry in `col`.
    /// Ties go to the lowest row index. None means the column is unbounded.
    pub fn leaving_row(&self, col: usize, tol: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.num_rows() {
            let a = self.matrix[(i, col)];
            if a > tol {
                let ratio = self.rhs(i) / a;
                if best.map_or(true, |(_, r)| ratio < r) {
                    best = Some((i, ratio));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Pivot on `(row, col)`: normalize the pivot row, then eliminate `col`
    /// from every other row including the objective row.
    pub fn pivot(&mut self, pivot: Pivot) {
        let Pivot { row, col } = pivot;
        let element = self.matrix[(row, col)];
        self.matrix.row_mut(row).scale_mut(1.0 / element);

        for i in 0..self.matrix.nrows() {
            if i == row {
                continue;
            }
            let factor = self.matrix[(i, col)];
            if factor != 0.0 {
                self.subtract_row(i, row, factor);
            }
        }

        self.basis[row] = col;
    }

    /// Returns true if some artificial variable is basic above `tol`.
    pub fn has_artificial_residue(&self, tol: f64) -> bool {
        self.basis
            .iter()
            .enumerate()
            .any(|(i, &col)| self.columns[col].is_artificial() && self.rhs(i) > tol)
    }

    /// Values of the structural variables (non-basic ones are 0).
    pub fn structural_solution(&self) -> Vec<f64> {
        let mut x = vec![0.0; self.num_structural];
        for (i, &col) in self.basis.iter().enumerate() {
            if let ColumnKind::Structural(j) = self.columns[col] {
                x[j] = self.rhs(i);
            }
        }
        x
    }

    /// Capture the current state.
    pub fn snapshot(&self, iteration: usize, pivot: Option<Pivot>) -> TableauSnapshot {
        TableauSnapshot {
            iteration,
            pivot,
            basis: self.basis.clone(),
            matrix: self.matrix.clone(),
        }
    }

    /// row[target] -= factor * row[source]
    fn subtract_row(&mut self, target: usize, source: usize, factor: f64) {
        for j in 0..self.matrix.ncols() {
            let v = self.matrix[(source, j)];
            self.matrix[(target, j)] -= factor * v;
        }
    }
}
