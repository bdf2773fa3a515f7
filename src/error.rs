//! Error types for map loading and planning.
use grid_util::Point;
use thiserror::Error;

/// A map description could not be turned into a [GridMap](crate::grid_map::GridMap).
/// No partially initialised map is ever returned alongside one of these.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("bad header line {header:?}: expected `sizeX sizeY cellSize_mm` with positive values")]
    BadHeader { header: String },

    #[error("expected {expected} connection rows, found {found}")]
    BadRowCount { expected: usize, found: usize },

    #[error("line {line}: expected {expected} values, found {found}")]
    BadRowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: connection value {token:?} is not 0 or 1")]
    BadValue { line: usize, token: String },

    #[error("could not read map description: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A cell lies outside `[0, size_x) x [0, size_y)`.
    #[error("cell {cell} is outside the {size_x}x{size_y} map")]
    Bounds {
        cell: Point,
        size_x: usize,
        size_y: usize,
    },

    /// The start cell cannot reach the goal the field was computed for.
    #[error("no path from cell {start} to cell {goal}")]
    Unreachable { start: Point, goal: Point },

    /// Descent got stuck at a position that is not the goal: the field is
    /// defective or was computed for a different goal.
    #[error("cost field has a local minimum at position {position} (cost {cost}) short of the goal")]
    InconsistentField { position: Point, cost: u32 },

    #[error("no cost field has been computed yet")]
    NoCostField,
}

pub type Result<T, E = PlanError> = std::result::Result<T, E>;
