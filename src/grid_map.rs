use crate::direction::NeighborDirection;
use crate::error::{PlanError, Result};
use crate::{Cell, N_SMALLVEC_SIZE};
use grid_util::{BoolGrid, Point, ValueGrid};
use smallvec::SmallVec;

/// [GridMap] stores the connectivity grid of a `size_x` by `size_y` cell map in a [BoolGrid] of
/// shape `(2 * size_x + 1, 2 * size_y + 1)`, where [true] marks an open position.
///
/// Cell `(x, y)` has its centre at position `(2x + 1, 2y + 1)`. Positions with an even
/// coordinate are the edges between orthogonally adjacent centres, and positions with both
/// coordinates even are the corners between four cells. The outer ring is the map boundary and is
/// normally closed, but keeping it that way is up to whoever fills the grid.
#[derive(Clone, Debug)]
pub struct GridMap {
    pub(crate) size_x: usize,
    pub(crate) size_y: usize,
    pub(crate) cell_size: u32,
    pub(crate) grid: BoolGrid,
}

impl GridMap {
    /// A map with every position closed.
    pub fn new(size_x: usize, size_y: usize, cell_size: u32) -> GridMap {
        GridMap {
            size_x,
            size_y,
            cell_size,
            grid: BoolGrid::new(2 * size_x + 1, 2 * size_y + 1, false),
        }
    }

    /// A map in which every interior position is open and the boundary ring is closed, so all
    /// cells are mutually connected.
    pub fn open(size_x: usize, size_y: usize, cell_size: u32) -> GridMap {
        let mut map = GridMap::new(size_x, size_y, cell_size);
        for x in 1..map.width() as i32 - 1 {
            for y in 1..map.height() as i32 - 1 {
                map.grid.set(x, y, true);
            }
        }
        map
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }
    pub fn size_y(&self) -> usize {
        self.size_y
    }
    /// Side length of a cell in millimetres.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }
    /// Width of the connectivity grid, `2 * size_x + 1`.
    pub fn width(&self) -> usize {
        self.grid.width()
    }
    /// Height of the connectivity grid, `2 * size_y + 1`.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.size_x
            && (cell.y as usize) < self.size_y
    }

    pub fn check_cell(&self, cell: Cell) -> Result<()> {
        if self.contains_cell(cell) {
            Ok(())
        } else {
            Err(PlanError::Bounds {
                cell,
                size_x: self.size_x,
                size_y: self.size_y,
            })
        }
    }

    pub fn position_in_bounds(&self, position: Point) -> bool {
        in_extent(position, self.width(), self.height())
    }

    /// Centre of `cell` in the connectivity grid. Does not check bounds.
    pub fn cell_to_position(cell: Cell) -> Point {
        Point::new(2 * cell.x + 1, 2 * cell.y + 1)
    }

    /// The cell whose centre is `position`, if `position` is a cell centre.
    pub fn position_to_cell(position: Point) -> Option<Cell> {
        if position.x > 0 && position.y > 0 && position.x % 2 == 1 && position.y % 2 == 1 {
            Some(Point::new((position.x - 1) / 2, (position.y - 1) / 2))
        } else {
            None
        }
    }

    /// Position of the connection leaving `cell` towards `direction`.
    fn connection_position(&self, cell: Cell, direction: NeighborDirection) -> Result<Point> {
        self.check_cell(cell)?;
        Ok(direction.step(Self::cell_to_position(cell)))
    }

    /// Whether the connection from `cell` towards `direction` is open. For diagonals this is the
    /// stored corner flag only; planning additionally requires both adjoining orthogonal
    /// connections to be open.
    pub fn is_connected(&self, cell: Cell, direction: NeighborDirection) -> Result<bool> {
        let position = self.connection_position(cell, direction)?;
        Ok(self.grid.get_point(position))
    }

    /// Opens the connection from `cell` towards `direction`. Any cost field computed before this
    /// call no longer describes the map.
    pub fn set_connection(&mut self, cell: Cell, direction: NeighborDirection) -> Result<()> {
        let position = self.connection_position(cell, direction)?;
        self.grid.set_point(position, true);
        Ok(())
    }

    /// Closes the connection from `cell` towards `direction`. Any cost field computed before this
    /// call no longer describes the map.
    pub fn delete_connection(&mut self, cell: Cell, direction: NeighborDirection) -> Result<()> {
        let position = self.connection_position(cell, direction)?;
        self.grid.set_point(position, false);
        Ok(())
    }

    /// Raw open flag of a connectivity grid position; [false] outside the grid.
    pub fn is_open(&self, position: Point) -> bool {
        self.position_in_bounds(position) && self.grid.get_point(position)
    }

    pub(crate) fn set_open(&mut self, position: Point, open: bool) {
        self.grid.set_point(position, open);
    }

    /// Number of open positions in the connectivity grid.
    pub fn open_position_count(&self) -> usize {
        let mut count = 0;
        for x in 0..self.width() as i32 {
            for y in 0..self.height() as i32 {
                if self.grid.get(x, y) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Whether a move from `position` one step towards `direction` stays on the map and lands on an
    /// open position. Diagonal moves also need both positions they pass between to be open, which
    /// rules out cutting a corner between two closed walls.
    pub fn can_step(&self, position: Point, direction: NeighborDirection) -> bool {
        if !self.is_open(direction.step(position)) {
            return false;
        }
        match direction.adjoining() {
            Some((a, b)) => self.is_open(a.step(position)) && self.is_open(b.step(position)),
            None => true,
        }
    }

    /// Open positions reachable from `position` in one step, orthogonal directions first.
    pub fn open_neighbours(
        &self,
        position: Point,
        allow_diagonal_move: bool,
    ) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NeighborDirection::DESCENT_ORDER
            .into_iter()
            .filter(|d| allow_diagonal_move || !d.diagonal())
            .filter(|d| self.can_step(position, *d))
            .map(|d| d.step(position))
            .collect()
    }

    /// Cell containing the odometry coordinate `(x_mm, y_mm)`. The result may lie outside the map.
    pub fn pos_to_cell(&self, x_mm: f64, y_mm: f64) -> Cell {
        let size = self.cell_size as f64;
        Point::new((x_mm / size).floor() as i32, (y_mm / size).floor() as i32)
    }

    /// Centre of `cell` in millimetres.
    pub fn cell_center_mm(&self, cell: Cell) -> (f64, f64) {
        let size = self.cell_size as f64;
        ((cell.x as f64 + 0.5) * size, (cell.y as f64 + 0.5) * size)
    }
}

/// Whether `position` lies inside a `width` by `height` grid.
pub(crate) fn in_extent(position: Point, width: usize, height: usize) -> bool {
    position.x >= 0
        && position.y >= 0
        && (position.x as usize) < width
        && (position.y as usize) < height
}

impl PartialEq for GridMap {
    fn eq(&self, other: &Self) -> bool {
        self.size_x == other.size_x
            && self.size_y == other.size_y
            && self.cell_size == other.cell_size
            && (0..self.width() as i32).all(|x| {
                (0..self.height() as i32).all(|y| self.grid.get(x, y) == other.grid.get(x, y))
            })
    }
}

impl Eq for GridMap {}

#[cfg(test)]
mod tests {
    use super::*;
    use NeighborDirection::*;

    #[test]
    fn open_map_is_closed_on_the_boundary() {
        let map = GridMap::open(3, 3, 400);
        assert_eq!((map.width(), map.height()), (7, 7));
        assert!(!map.is_open(Point::new(0, 3)));
        assert!(!map.is_open(Point::new(6, 6)));
        assert!(map.is_open(Point::new(1, 1)));
        assert!(map.is_open(Point::new(2, 2)));
        assert_eq!(map.open_position_count(), 25);
    }

    #[test]
    fn connection_queries() {
        let map = GridMap::open(3, 3, 400);
        let corner = Point::new(0, 0);
        assert!(map.is_connected(corner, North).unwrap());
        assert!(map.is_connected(corner, NorthEast).unwrap());
        assert!(!map.is_connected(corner, South).unwrap());
        assert!(!map.is_connected(corner, West).unwrap());
        assert!(!map.is_connected(corner, SouthWest).unwrap());
    }

    #[test]
    fn connection_is_shared_with_the_neighbour() {
        let mut map = GridMap::open(3, 3, 400);
        map.delete_connection(Point::new(1, 1), East).unwrap();
        assert!(!map.is_connected(Point::new(2, 1), West).unwrap());
        assert!(map.is_connected(Point::new(1, 1), North).unwrap());
    }

    #[test]
    fn set_then_delete_restores_connection() {
        let mut map = GridMap::open(3, 3, 400);
        let original = map.clone();
        for cell in [Point::new(0, 0), Point::new(1, 2), Point::new(2, 1)] {
            for dir in NeighborDirection::ALL {
                let before = map.is_connected(cell, dir).unwrap();
                map.set_connection(cell, dir).unwrap();
                assert!(map.is_connected(cell, dir).unwrap());
                map.delete_connection(cell, dir).unwrap();
                assert!(!map.is_connected(cell, dir).unwrap());
                if before {
                    map.set_connection(cell, dir).unwrap();
                }
                assert_eq!(map.is_connected(cell, dir).unwrap(), before);
            }
        }
        assert_eq!(map, original);
    }

    #[test]
    fn out_of_bounds_cells_are_rejected() {
        let mut map = GridMap::open(3, 2, 400);
        for cell in [Point::new(-1, 0), Point::new(3, 0), Point::new(0, 2)] {
            assert_eq!(
                map.is_connected(cell, North),
                Err(PlanError::Bounds {
                    cell,
                    size_x: 3,
                    size_y: 2
                })
            );
            assert!(map.set_connection(cell, North).is_err());
            assert!(map.delete_connection(cell, North).is_err());
        }
    }

    #[test]
    fn cell_position_conversion() {
        assert_eq!(GridMap::cell_to_position(Point::new(2, 0)), Point::new(5, 1));
        assert_eq!(GridMap::position_to_cell(Point::new(5, 1)), Some(Point::new(2, 0)));
        assert_eq!(GridMap::position_to_cell(Point::new(4, 1)), None);
        assert_eq!(GridMap::position_to_cell(Point::new(-1, 1)), None);
    }

    #[test]
    fn diagonal_steps_need_both_orthogonals() {
        let mut map = GridMap::open(2, 2, 400);
        let center = GridMap::cell_to_position(Point::new(0, 0));
        assert!(map.can_step(center, NorthEast));
        map.delete_connection(Point::new(0, 0), North).unwrap();
        assert!(!map.can_step(center, NorthEast));
        assert!(map.can_step(center, East));
        assert_eq!(
            map.open_neighbours(center, true).as_slice(),
            &[Point::new(2, 1)]
        );
    }

    #[test]
    fn millimetre_conversion() {
        let map = GridMap::open(3, 3, 400);
        assert_eq!(map.pos_to_cell(0.0, 0.0), Point::new(0, 0));
        assert_eq!(map.pos_to_cell(799.9, 400.0), Point::new(1, 1));
        assert_eq!(map.pos_to_cell(-1.0, 10.0), Point::new(-1, 0));
        assert_eq!(map.cell_center_mm(Point::new(1, 2)), (600.0, 1000.0));
    }
}
