//! # wavefront_planner
//!
//! Grid path planning for a mobile robot in a discretised indoor map. A [GridMap] stores which
//! connections between adjacent cells are open in a doubled-resolution connectivity grid.
//! [compute_cost_field] expands a wavefront from a goal cell over that grid, giving every
//! reachable position its hop distance to the goal, and [extract_path] walks the resulting
//! [CostField] downhill from a start cell. Diagonal moves are only taken when both orthogonal
//! connections beside them are open, so paths never cut a corner between two walls.
//!
//! ```
//! use grid_util::Point;
//! use wavefront_planner::{compute_cost_field, extract_path, load_map};
//!
//! let map = load_map(
//!     "3 3 400
//! 0 0 0 0 0 0 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 0 0 0 0 0 0",
//! )
//! .unwrap();
//! let goal = Point::new(1, 1);
//! let field = compute_cost_field(&map, goal).unwrap();
//! let path = extract_path(&map, Point::new(0, 0), goal, &field).unwrap();
//! assert_eq!(path.hops(), 2);
//! assert_eq!(path.cells(), vec![Point::new(0, 0), goal]);
//! ```
pub mod components;
pub mod config;
pub mod cost_field;
pub mod direction;
pub mod error;
pub mod grid_map;
pub mod map_loader;
pub mod path;
pub mod planner;

use fxhash::FxBuildHasher;
use grid_util::Point;
use indexmap::IndexSet;

pub use crate::components::Components;
pub use crate::config::PlannerConfig;
pub use crate::cost_field::{compute_cost_field, compute_cost_field_with, Cost, CostField};
pub use crate::direction::NeighborDirection;
pub use crate::error::{LoadError, PlanError};
pub use crate::grid_map::GridMap;
pub use crate::map_loader::{load_map, load_map_file};
pub use crate::path::{extract_path, extract_path_with, Path};
pub use crate::planner::{Planner, PlannerState};

/// A cell of the map, `(x, y)` with `0 <= x < size_x` and `0 <= y < size_y`. The same [Point]
/// type also addresses connectivity grid positions; functions say which one they expect.
pub type Cell = Point;

pub(crate) type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

pub const N_SMALLVEC_SIZE: usize = 8;
