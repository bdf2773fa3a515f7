//! Wavefront propagation of hop distances from a goal cell.
//!
//! Propagation runs over the whole connectivity grid, edges and corners included, so a move
//! between two adjacent cell centres costs two hops. All values are in these doubled-grid units;
//! [CostField::cell_distance] converts a cell's value back to whole cells.
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::grid_map::{in_extent, GridMap};
use crate::{Cell, FxIndexSet};
use core::fmt;
use grid_util::{Point, SimpleValueGrid, ValueGrid};
use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cost {
    /// Open but not reached by the wavefront. Treated as unreachable once propagation is done.
    #[default]
    Unvisited,
    /// Closed in the connectivity grid. Never changes after initialisation.
    Blocked,
    /// Hop distance to the goal.
    Hops(u32),
}

impl Cost {
    pub fn hops(self) -> Option<u32> {
        match self {
            Cost::Hops(h) => Some(h),
            _ => None,
        }
    }
    /// [Cost::Blocked] or [Cost::Unvisited]: no path to the goal starts here.
    pub fn is_unreachable(self) -> bool {
        !matches!(self, Cost::Hops(_))
    }
}

/// Hop distances to a single goal over a [GridMap]'s connectivity grid. Immutable once computed;
/// compute a new one when the goal or the map changes.
#[derive(Clone, Debug)]
pub struct CostField {
    costs: SimpleValueGrid<Cost>,
    goal: Cell,
    rounds: usize,
}

impl CostField {
    /// The cell this field leads to.
    pub fn goal(&self) -> Cell {
        self.goal
    }
    pub fn goal_position(&self) -> Point {
        GridMap::cell_to_position(self.goal)
    }
    pub fn width(&self) -> usize {
        self.costs.width()
    }
    pub fn height(&self) -> usize {
        self.costs.height()
    }
    /// Number of propagation rounds that changed at least one value.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Value at a connectivity grid position. Positions outside the grid read as [Cost::Blocked].
    pub fn cost(&self, position: Point) -> Cost {
        if in_extent(position, self.width(), self.height()) {
            self.costs.get_point(position)
        } else {
            Cost::Blocked
        }
    }

    /// Hop distance from the centre of `cell` to the goal, if it was reached.
    pub fn cell_cost(&self, cell: Cell) -> Option<u32> {
        self.cost(GridMap::cell_to_position(cell)).hops()
    }

    /// Distance from `cell` to the goal in whole cells, counting a diagonal move as one.
    pub fn cell_distance(&self, cell: Cell) -> Option<u32> {
        self.cell_cost(cell).map(|h| h / 2)
    }

    pub fn is_reachable(&self, cell: Cell) -> bool {
        self.cell_cost(cell).is_some()
    }

    /// Number of positions holding a hop distance.
    pub fn reached_count(&self) -> usize {
        self.positions()
            .filter(|p| self.costs.get_point(*p).hops().is_some())
            .count()
    }

    fn positions(&self) -> impl Iterator<Item = Point> {
        let height = self.height() as i32;
        itertools::iproduct!(0..self.width() as i32, 0..height).map(|(x, y)| Point::new(x, y))
    }
}

impl fmt::Display for CostField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height() as i32).rev() {
            let row = (0..self.width() as i32)
                .map(|x| match self.costs.get(x, y) {
                    Cost::Blocked => format!("{:>3}", "#"),
                    Cost::Unvisited => format!("{:>3}", "."),
                    Cost::Hops(h) => format!("{:>3}", h),
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Computes the cost field for `goal` with the default [PlannerConfig].
pub fn compute_cost_field(map: &GridMap, goal: Cell) -> Result<CostField> {
    compute_cost_field_with(map, goal, &PlannerConfig::default())
}

/// Computes hop distances from every open position to `goal` by expanding a wavefront one hop per
/// round. Each round relaxes the neighbours of the current wavefront; the positions it set make up
/// the next wavefront. Stops after the first round without updates.
pub fn compute_cost_field_with(
    map: &GridMap,
    goal: Cell,
    config: &PlannerConfig,
) -> Result<CostField> {
    map.check_cell(goal)?;
    let goal_position = GridMap::cell_to_position(goal);

    let mut costs: SimpleValueGrid<Cost> =
        SimpleValueGrid::new(map.width(), map.height(), Cost::Unvisited);
    for x in 0..map.width() as i32 {
        for y in 0..map.height() as i32 {
            if !map.grid.get(x, y) {
                costs.set(x, y, Cost::Blocked);
            }
        }
    }
    // A closed goal centre still seeds the wavefront; only its open neighbours are expanded.
    costs.set_point(goal_position, Cost::Hops(0));

    let max_rounds = config.max_rounds.unwrap_or(map.width() * map.height());
    let mut wavefront: FxIndexSet<Point> = FxIndexSet::default();
    wavefront.insert(goal_position);
    let mut front_cost = 0;
    let mut rounds = 0;

    loop {
        if rounds >= max_rounds {
            warn!(
                "Stopped propagating towards {} after {} rounds, field may be incomplete",
                goal, rounds
            );
            break;
        }
        let next_cost = front_cost + 1;
        let mut updated: FxIndexSet<Point> = FxIndexSet::default();
        for &position in &wavefront {
            for neighbour in map.open_neighbours(position, config.allow_diagonal_move) {
                let relax = match costs.get_point(neighbour) {
                    Cost::Unvisited => true,
                    Cost::Hops(h) => h > next_cost,
                    Cost::Blocked => false,
                };
                if relax {
                    costs.set_point(neighbour, Cost::Hops(next_cost));
                    updated.insert(neighbour);
                }
            }
        }
        if updated.is_empty() {
            break;
        }
        rounds += 1;
        debug!(
            "Round {}: {} positions settled at {} hops",
            rounds,
            updated.len(),
            next_cost
        );
        wavefront = updated
            .into_iter()
            .filter(|p| costs.get_point(*p) == Cost::Hops(next_cost))
            .collect();
        front_cost = next_cost;
    }

    let field = CostField {
        costs,
        goal,
        rounds,
    };
    info!(
        "Cost field towards {} finished after {} rounds, {} positions reached",
        goal,
        rounds,
        field.reached_count()
    );
    Ok(field)
}
