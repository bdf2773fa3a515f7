//! Greedy descent over a [CostField] from a start cell to the goal it was computed for.
use crate::config::PlannerConfig;
use crate::cost_field::{Cost, CostField};
use crate::direction::NeighborDirection;
use crate::error::{PlanError, Result};
use crate::grid_map::GridMap;
use crate::Cell;
use core::fmt;
use grid_util::Point;
use itertools::Itertools;
use log::{debug, warn};

/// Connectivity grid positions from the start cell's centre to the goal cell's centre, both
/// included. Consecutive positions are one step apart and their costs strictly decrease.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    positions: Vec<Point>,
}

impl Path {
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Number of steps, equal to the start's value in the field the path was extracted from.
    pub fn hops(&self) -> usize {
        self.positions.len() - 1
    }

    pub fn start(&self) -> Point {
        self.positions[0]
    }

    pub fn end(&self) -> Point {
        self.positions[self.positions.len() - 1]
    }

    /// The cells whose centres the path passes through, in order. Start and goal cells are always
    /// included.
    pub fn cells(&self) -> Vec<Cell> {
        self.positions
            .iter()
            .filter_map(|p| GridMap::position_to_cell(*p))
            .collect()
    }

    /// Direction of every step.
    pub fn directions(&self) -> Vec<NeighborDirection> {
        self.positions
            .iter()
            .tuple_windows()
            .filter_map(|(a, b)| NeighborDirection::from_delta(b.x - a.x, b.y - a.y))
            .collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.positions.iter().join(" -> "))
    }
}

/// Extracts the path from `start` to `end` with the default [PlannerConfig].
pub fn extract_path(map: &GridMap, start: Cell, end: Cell, field: &CostField) -> Result<Path> {
    extract_path_with(map, start, end, field, &PlannerConfig::default())
}

/// Walks `field` downhill from `start`, one connectivity grid step at a time, until it reaches
/// `end`. Each step goes to the neighbour with the lowest value, trying orthogonal neighbours
/// before diagonal ones so that ties favour straight moves. `field` must have been computed for
/// `end`; anything else is reported as [PlanError::InconsistentField].
pub fn extract_path_with(
    map: &GridMap,
    start: Cell,
    end: Cell,
    field: &CostField,
    config: &PlannerConfig,
) -> Result<Path> {
    map.check_cell(start)?;
    map.check_cell(end)?;
    let end_position = GridMap::cell_to_position(end);
    let mut current = GridMap::cell_to_position(start);
    let start_cost = match field.cost(current) {
        Cost::Hops(h) => h,
        _ => return Err(PlanError::Unreachable { start, goal: end }),
    };

    let mut current_cost = start_cost;
    let mut positions = Vec::with_capacity(start_cost as usize + 1);
    positions.push(current);
    // Every step lowers the cost by at least one.
    for _ in 0..start_cost {
        match lowest_neighbour(field, current, config.allow_diagonal_move) {
            Some((next, cost)) if cost < current_cost => {
                current = next;
                current_cost = cost;
                positions.push(current);
            }
            _ => break,
        }
        if current_cost == 0 {
            break;
        }
    }

    if current != end_position || current_cost != 0 {
        warn!(
            "Descent from {} stopped at {} with cost {}, expected to reach {}",
            start, current, current_cost, end
        );
        return Err(PlanError::InconsistentField {
            position: current,
            cost: current_cost,
        });
    }
    debug!("Extracted {} hop path from {} to {}", positions.len() - 1, start, end);
    Ok(Path { positions })
}

/// The lowest valued neighbour of `position`, first in descent order on ties. A diagonal
/// neighbour only counts if neither orthogonal position it passes between is blocked.
fn lowest_neighbour(
    field: &CostField,
    position: Point,
    allow_diagonal_move: bool,
) -> Option<(Point, u32)> {
    let mut best: Option<(Point, u32)> = None;
    for dir in NeighborDirection::DESCENT_ORDER {
        if let Some((a, b)) = dir.adjoining() {
            if !allow_diagonal_move
                || field.cost(a.step(position)) == Cost::Blocked
                || field.cost(b.step(position)) == Cost::Blocked
            {
                continue;
            }
        }
        let neighbour = dir.step(position);
        if let Cost::Hops(h) = field.cost(neighbour) {
            if best.map_or(true, |(_, best_cost)| h < best_cost) {
                best = Some((neighbour, h));
            }
        }
    }
    best
}
