//! The eight neighbour directions of a cell, numbered clockwise from north:
//!
//! ```text
//! 7     0     1
//! 6   (x,y)   2
//! 5     4     3
//! ```
//!
//! This numbering is a fixed contract shared with anything that draws or
//! follows a [Path](crate::path::Path), so the discriminants must never change.
use core::fmt;
use grid_util::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum NeighborDirection {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

use NeighborDirection::*;

/// Offsets `(dx, dy)` indexed by direction number. Positive `y` is north.
pub const OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

impl NeighborDirection {
    /// All directions in canonical order.
    pub const ALL: [NeighborDirection; 8] = [
        North, NorthEast, East, SouthEast, South, SouthWest, West, NorthWest,
    ];
    /// The orthogonal directions in canonical order.
    pub const ORTHOGONAL: [NeighborDirection; 4] = [North, East, South, West];
    /// The diagonal directions in canonical order.
    pub const DIAGONAL: [NeighborDirection; 4] = [NorthEast, SouthEast, SouthWest, NorthWest];
    /// Orthogonal directions first, then diagonals. This is the order in which
    /// path extraction considers candidates, and so the order that breaks ties.
    pub const DESCENT_ORDER: [NeighborDirection; 8] = [
        North, East, South, West, NorthEast, SouthEast, SouthWest, NorthWest,
    ];

    pub fn num(self) -> usize {
        self as usize
    }

    pub fn from_num(num: usize) -> Option<NeighborDirection> {
        Self::ALL.get(num).copied()
    }

    pub fn offset(self) -> (i32, i32) {
        OFFSETS[self.num()]
    }

    pub fn diagonal(self) -> bool {
        self.num() % 2 == 1
    }

    pub fn opposite(self) -> NeighborDirection {
        Self::ALL[(self.num() + 4) % 8]
    }

    /// The two orthogonal directions a diagonal move passes between, e.g.
    /// north and east for north-east. `None` for orthogonal directions.
    pub fn adjoining(self) -> Option<(NeighborDirection, NeighborDirection)> {
        if self.diagonal() {
            Some((Self::ALL[self.num() - 1], Self::ALL[(self.num() + 1) % 8]))
        } else {
            None
        }
    }

    /// Direction whose offset matches the sign of `(dx, dy)`; `None` for `(0, 0)`.
    pub fn from_delta(dx: i32, dy: i32) -> Option<NeighborDirection> {
        let signum = (dx.signum(), dy.signum());
        OFFSETS
            .iter()
            .position(|&o| o == signum)
            .and_then(Self::from_num)
    }

    /// Neighbour of `point` one step in this direction, in whichever grid
    /// `point` lives in.
    pub fn step(self, point: Point) -> Point {
        let (dx, dy) = self.offset();
        Point::new(point.x + dx, point.y + dy)
    }
}

impl fmt::Display for NeighborDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            North => "N",
            NorthEast => "NE",
            East => "E",
            SouthEast => "SE",
            South => "S",
            SouthWest => "SW",
            West => "W",
            NorthWest => "NW",
        };
        write!(f, "{}", name)
    }
}
