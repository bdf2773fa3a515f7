use crate::config::PlannerConfig;
use crate::grid_map::{in_extent, GridMap};
use crate::{Cell, N_SMALLVEC_SIZE};
use fxhash::FxHashMap;
use grid_util::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Connected components of the open positions of a [GridMap], joined by the same moves that cost
/// field propagation makes. Two cells are in the same component exactly when a path exists between
/// them. Becomes stale when the map changes.
///
/// A cell whose centre is closed still seeds a wavefront when it is the goal, so for such cells
/// the open positions a wavefront would leave through are kept as well.
#[derive(Clone, Debug)]
pub struct Components {
    components: UnionFind<usize>,
    closed_centres: FxHashMap<usize, SmallVec<[usize; N_SMALLVEC_SIZE]>>,
    width: usize,
    height: usize,
}

impl Components {
    /// Generates a new [UnionFind] structure and links up open neighbours to the same components.
    pub fn generate(map: &GridMap, config: &PlannerConfig) -> Components {
        let (width, height) = (map.width(), map.height());
        let mut components = UnionFind::new(width * height);
        let mut closed_centres = FxHashMap::default();
        let ix = |p: Point| p.y as usize * width + p.x as usize;
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                let point = Point::new(x, y);
                if !map.is_open(point) {
                    if GridMap::position_to_cell(point).is_some() {
                        let exits: SmallVec<[usize; N_SMALLVEC_SIZE]> = map
                            .open_neighbours(point, config.allow_diagonal_move)
                            .into_iter()
                            .map(ix)
                            .collect();
                        if !exits.is_empty() {
                            closed_centres.insert(ix(point), exits);
                        }
                    }
                    continue;
                }
                // Moves are symmetric, so every pair gets joined from both sides.
                for n in map.open_neighbours(point, config.allow_diagonal_move) {
                    components.union(ix(point), ix(n));
                }
            }
        }
        info!("Generated connected components for {}x{} grid", width, height);
        Components {
            components,
            closed_centres,
            width,
            height,
        }
    }

    /// Component id of a connectivity grid position.
    pub fn get_component(&self, position: Point) -> usize {
        self.components.find(self.ix(position))
    }

    /// Whether `start` and `goal` are cells of the map and a wavefront from `goal` reaches
    /// `start`.
    pub fn reachable(&self, start: &Cell, goal: &Cell) -> bool {
        let start = GridMap::cell_to_position(*start);
        let goal = GridMap::cell_to_position(*goal);
        if !self.in_bounds(start) || !self.in_bounds(goal) {
            return false;
        }
        let (start, goal) = (self.ix(start), self.ix(goal));
        self.components.equiv(start, goal)
            || self.closed_centres.get(&goal).map_or(false, |exits| {
                exits.iter().any(|&exit| self.components.equiv(start, exit))
            })
    }

    pub fn unreachable(&self, start: &Cell, goal: &Cell) -> bool {
        !self.reachable(start, goal)
    }

    fn in_bounds(&self, p: Point) -> bool {
        in_extent(p, self.width, self.height)
    }

    fn ix(&self, p: Point) -> usize {
        p.y as usize * self.width + p.x as usize
    }
}
