use crate::components::Components;
use crate::config::PlannerConfig;
use crate::cost_field::{compute_cost_field_with, CostField};
use crate::direction::NeighborDirection;
use crate::error::{LoadError, PlanError, Result};
use crate::grid_map::GridMap;
use crate::map_loader::load_map;
use crate::path::{extract_path_with, Path};
use crate::Cell;
use log::info;
use std::sync::Arc;

/// Where a [Planner] is in its lifecycle. A planner only exists once a map is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerState {
    Loaded,
    CostFieldComputed { goal: Cell },
    PathReady { start: Cell, end: Cell },
}

/// Owns a [GridMap] together with the cost field and path most recently computed over it.
///
/// Cost fields are handed out as [Arc]s and never modified after they are built: computing a field
/// for a new goal, or changing the map, swaps in a new field (or none) while anyone still holding
/// the old [Arc] keeps a complete, consistent copy. Connected components are kept alongside and
/// regenerated lazily after the map changes, so that queries without a path fail fast.
#[derive(Clone, Debug)]
pub struct Planner {
    map: GridMap,
    config: PlannerConfig,
    field: Option<Arc<CostField>>,
    path: Option<(Cell, Path)>,
    components: Option<Components>,
}

impl Planner {
    pub fn new(map: GridMap) -> Planner {
        Planner::with_config(map, PlannerConfig::default())
    }

    pub fn with_config(map: GridMap, config: PlannerConfig) -> Planner {
        Planner {
            map,
            config,
            field: None,
            path: None,
            components: None,
        }
    }

    /// Parses a map description and wraps the result.
    pub fn load(source: &str) -> Result<Planner, LoadError> {
        load_map(source).map(Planner::new)
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn state(&self) -> PlannerState {
        match (&self.field, &self.path) {
            (Some(field), Some((start, _))) => PlannerState::PathReady {
                start: *start,
                end: field.goal(),
            },
            (Some(field), None) => PlannerState::CostFieldComputed { goal: field.goal() },
            _ => PlannerState::Loaded,
        }
    }

    /// The current cost field, if one has been computed since the map last changed.
    pub fn cost_field(&self) -> Option<Arc<CostField>> {
        self.field.clone()
    }

    /// The path most recently extracted from the current cost field.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref().map(|(_, path)| path)
    }

    /// Opens a connection and drops the cost field, path and components computed for the old map.
    pub fn set_connection(&mut self, cell: Cell, direction: NeighborDirection) -> Result<()> {
        self.map.set_connection(cell, direction)?;
        self.invalidate();
        Ok(())
    }

    /// Closes a connection and drops the cost field, path and components computed for the old map.
    pub fn delete_connection(&mut self, cell: Cell, direction: NeighborDirection) -> Result<()> {
        self.map.delete_connection(cell, direction)?;
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        if self.field.is_some() {
            info!("Map changed: discarding cost field and path");
        }
        self.field = None;
        self.path = None;
        self.components = None;
    }

    /// Regenerates the components if the map changed since they were last generated.
    pub fn update(&mut self) -> &Components {
        let (map, config) = (&self.map, &self.config);
        self.components
            .get_or_insert_with(|| Components::generate(map, config))
    }

    /// Computes a fresh cost field towards `goal` and makes it current. Any previous path is
    /// discarded since it led to the old goal.
    pub fn compute_cost_field(&mut self, goal: Cell) -> Result<Arc<CostField>> {
        let field = Arc::new(compute_cost_field_with(&self.map, goal, &self.config)?);
        self.field = Some(field.clone());
        self.path = None;
        Ok(field)
    }

    /// Extracts the path from `start` to the goal of the current cost field.
    pub fn extract_path(&mut self, start: Cell) -> Result<&Path> {
        let field = self.field.clone().ok_or(PlanError::NoCostField)?;
        let path = extract_path_with(&self.map, start, field.goal(), &field, &self.config)?;
        Ok(&self.path.insert((start, path)).1)
    }

    /// Plans from `start` to `end`, reusing the current cost field if it already leads to `end`.
    /// Fails with [PlanError::Unreachable] without computing a field when the two cells are on
    /// different components.
    pub fn plan_path(&mut self, start: Cell, end: Cell) -> Result<&Path> {
        self.map.check_cell(start)?;
        self.map.check_cell(end)?;
        if self.update().unreachable(&start, &end) {
            info!("{} is not reachable from {}", end, start);
            return Err(PlanError::Unreachable { start, goal: end });
        }
        let current_goal = self.field.as_ref().map(|f| f.goal());
        if current_goal != Some(end) {
            self.compute_cost_field(end)?;
        }
        self.extract_path(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_util::Point;
    use NeighborDirection::*;

    #[test]
    fn lifecycle() {
        let mut planner = Planner::new(GridMap::open(3, 3, 400));
        assert_eq!(planner.state(), PlannerState::Loaded);
        assert_eq!(planner.extract_path(Point::new(0, 0)), Err(PlanError::NoCostField));

        let goal = Point::new(1, 1);
        planner.compute_cost_field(goal).unwrap();
        assert_eq!(planner.state(), PlannerState::CostFieldComputed { goal });

        let start = Point::new(0, 0);
        assert_eq!(planner.extract_path(start).unwrap().hops(), 2);
        assert_eq!(planner.state(), PlannerState::PathReady { start, end: goal });

        let new_goal = Point::new(2, 0);
        planner.compute_cost_field(new_goal).unwrap();
        assert_eq!(planner.state(), PlannerState::CostFieldComputed { goal: new_goal });
        assert!(planner.path().is_none());

        planner.delete_connection(Point::new(1, 0), East).unwrap();
        assert_eq!(planner.state(), PlannerState::Loaded);
        assert!(planner.cost_field().is_none());
    }

    #[test]
    fn plan_path_reuses_field_for_same_goal() {
        let mut planner = Planner::new(GridMap::open(4, 4, 400));
        let goal = Point::new(3, 3);
        planner.plan_path(Point::new(0, 0), goal).unwrap();
        let first = planner.cost_field().unwrap();
        let hops = planner.plan_path(Point::new(0, 3), goal).unwrap().hops();
        assert_eq!(hops, 6);
        assert!(Arc::ptr_eq(&first, &planner.cost_field().unwrap()));
    }

    #[test]
    fn plan_path_fails_fast_when_unreachable() {
        let mut planner = Planner::new(GridMap::open(3, 1, 400));
        planner.delete_connection(Point::new(1, 0), East).unwrap();
        let (start, goal) = (Point::new(0, 0), Point::new(2, 0));
        assert_eq!(
            planner.plan_path(start, goal),
            Err(PlanError::Unreachable { start, goal })
        );
        assert!(planner.cost_field().is_none());

        planner.set_connection(Point::new(1, 0), East).unwrap();
        assert_eq!(planner.plan_path(start, goal).unwrap().hops(), 4);
    }

    #[test]
    fn closed_goal_centre_agrees_with_extraction() {
        let mut planner = Planner::load("2 1 100\n0 0 0 0 0\n0 1 1 0 0\n0 0 0 0 0\n").unwrap();
        let (start, goal) = (Point::new(0, 0), Point::new(1, 0));
        let field = crate::cost_field::compute_cost_field(planner.map(), goal).unwrap();
        let extracted = crate::path::extract_path(planner.map(), start, goal, &field).unwrap();
        assert_eq!(extracted.hops(), 2);
        assert_eq!(planner.plan_path(start, goal), Ok(&extracted));

        assert_eq!(
            planner.plan_path(goal, start),
            Err(PlanError::Unreachable { start: goal, goal: start })
        );
    }

    #[test]
    fn old_field_survives_recompute() {
        let mut planner = Planner::new(GridMap::open(5, 5, 400));
        let old = planner.compute_cost_field(Point::new(0, 0)).unwrap();
        let reader = {
            let old = old.clone();
            let map = planner.map().clone();
            std::thread::spawn(move || {
                crate::path::extract_path(&map, Point::new(4, 4), Point::new(0, 0), &old)
                    .map(|p| p.hops())
            })
        };
        planner.compute_cost_field(Point::new(4, 4)).unwrap();
        planner.delete_connection(Point::new(2, 2), North).unwrap();
        assert_eq!(reader.join().unwrap(), Ok(8));
        assert_eq!(old.goal(), Point::new(0, 0));
    }

    #[test]
    fn loads_from_description() {
        let planner = Planner::load("1 1 100\n0 0 0\n0 1 0\n0 0 0\n").unwrap();
        assert_eq!(planner.map().open_position_count(), 1);
        assert!(Planner::load("1 1\n").is_err());
    }
}
