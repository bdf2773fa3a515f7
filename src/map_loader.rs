//! Reading and writing the map description text format:
//!
//! ```text
//! 3 3 400
//! 0 0 0 0 0 0 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 1 1 1 1 1 0
//! 0 0 0 0 0 0 0
//! ```
//!
//! The header holds `sizeX sizeY cellSize_mm`. It is followed by `2 * sizeY + 1` rows of
//! `2 * sizeX + 1` connection flags, topmost row first, so the last row is row 0 of the
//! connectivity grid. Blank lines are skipped.
use crate::error::LoadError;
use crate::grid_map::GridMap;
use core::fmt;
use grid_util::{Point, ValueGrid};
use itertools::Itertools;
use log::info;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Parses a map description. Either every row is valid and a complete map is returned, or nothing
/// is. The grid is only allocated once the rows have been checked against the header.
pub fn load_map(source: &str) -> Result<GridMap, LoadError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| LoadError::BadHeader {
        header: String::new(),
    })?;
    let (size_x, size_y, cell_size) = parse_header(header)?;
    let (width, height) = (2 * size_x + 1, 2 * size_y + 1);

    let rows = lines.collect::<Vec<_>>();
    if rows.len() != height {
        return Err(LoadError::BadRowCount {
            expected: height,
            found: rows.len(),
        });
    }
    let flags = rows
        .into_iter()
        .map(|(line_no, line)| parse_row(line_no, line, width))
        .collect::<Result<Vec<_>, _>>()?;

    let mut map = GridMap::new(size_x, size_y, cell_size);
    for (row_ix, row) in flags.into_iter().enumerate() {
        let y = (height - 1 - row_ix) as i32;
        for (x, open) in row.into_iter().enumerate() {
            map.set_open(Point::new(x as i32, y), open);
        }
    }
    info!(
        "Loaded {}x{} map with {} mm cells, {} open positions",
        size_x,
        size_y,
        cell_size,
        map.open_position_count()
    );
    Ok(map)
}

/// Reads and parses a map description file.
pub fn load_map_file<P: AsRef<Path>>(path: P) -> Result<GridMap, LoadError> {
    let source = fs::read_to_string(path.as_ref())?;
    load_map(&source)
}

/// Sizes must be positive, and the connectivity grid they imply must be addressable with `i32`
/// coordinates.
fn parse_header(header: &str) -> Result<(usize, usize, u32), LoadError> {
    let bad_header = || LoadError::BadHeader {
        header: header.to_owned(),
    };
    let values = header
        .split_whitespace()
        .map(|t| t.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| bad_header())?;
    let (size_x, size_y, cell_size) = match values.as_slice() {
        &[size_x, size_y, cell_size] if size_x > 0 && size_y > 0 && cell_size > 0 => {
            (size_x, size_y, cell_size)
        }
        _ => return Err(bad_header()),
    };
    let width = grid_extent(size_x).ok_or_else(bad_header)?;
    let height = grid_extent(size_y).ok_or_else(bad_header)?;
    if width.checked_mul(height).is_none() {
        return Err(bad_header());
    }
    Ok((size_x as usize, size_y as usize, cell_size))
}

/// `2 * size + 1`, if it fits in an `i32` coordinate.
fn grid_extent(size: u32) -> Option<usize> {
    size.checked_mul(2)?
        .checked_add(1)
        .filter(|&extent| extent <= i32::MAX as u32)
        .map(|extent| extent as usize)
}

fn parse_row(line_no: usize, line: &str, width: usize) -> Result<Vec<bool>, LoadError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    if tokens.len() != width {
        return Err(LoadError::BadRowWidth {
            line: line_no,
            expected: width,
            found: tokens.len(),
        });
    }
    tokens
        .into_iter()
        .map(|token| match token {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(LoadError::BadValue {
                line: line_no,
                token: token.to_owned(),
            }),
        })
        .collect()
}

impl FromStr for GridMap {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        load_map(s)
    }
}

impl GridMap {
    /// The map in the description format accepted by [load_map].
    pub fn to_description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {} {}", self.size_x, self.size_y, self.cell_size)?;
        for y in (0..self.height() as i32).rev() {
            let row = (0..self.width() as i32)
                .map(|x| if self.grid.get(x, y) { "1" } else { "0" })
                .join(" ");
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::NeighborDirection;

    const MAPA0: &str = "3 3 400
0 0 0 0 0 0 0
0 1 1 1 1 1 0
0 1 1 1 1 1 0
0 1 1 1 1 1 0
0 1 1 1 1 1 0
0 1 1 1 1 1 0
0 0 0 0 0 0 0
";

    #[test]
    fn loads_documented_map() {
        let map = load_map(MAPA0).unwrap();
        assert_eq!((map.size_x(), map.size_y(), map.cell_size()), (3, 3, 400));
        assert_eq!(map, GridMap::open(3, 3, 400));
    }

    #[test]
    fn last_line_is_row_zero() {
        // Only the top-left edge of cell (0, 1) is open, towards the north.
        let source = "1 2 100\n\n0 1 0\n0 0 0\n0 0 0\n0 0 0\n0 0 0\n";
        let map = load_map(source).unwrap();
        assert!(map.is_connected(Point::new(0, 1), NeighborDirection::North).unwrap());
        assert!(!map.is_connected(Point::new(0, 0), NeighborDirection::South).unwrap());
        assert_eq!(map.open_position_count(), 1);
    }

    #[test]
    fn description_round_trip() {
        let mut map = GridMap::open(4, 2, 250);
        map.delete_connection(Point::new(1, 1), NeighborDirection::East)
            .unwrap();
        let text = map.to_description();
        assert_eq!(text.lines().count(), 6);
        assert_eq!(text.parse::<GridMap>().unwrap(), map);
    }

    #[test]
    fn bad_header() {
        for source in ["", "3 3\n", "3 3 400 1\n", "3 x 400\n", "0 3 400\n", "3 3 -4\n"] {
            assert!(
                matches!(load_map(source), Err(LoadError::BadHeader { .. })),
                "{source:?}"
            );
        }
    }

    #[test]
    fn bad_row_count() {
        let short = MAPA0.lines().take(7).join("\n");
        assert!(matches!(
            load_map(&short),
            Err(LoadError::BadRowCount {
                expected: 7,
                found: 6
            })
        ));
        let long = format!("{MAPA0}0 0 0 0 0 0 0\n");
        assert!(matches!(
            load_map(&long),
            Err(LoadError::BadRowCount {
                expected: 7,
                found: 8
            })
        ));
    }

    #[test]
    fn oversized_header() {
        for source in ["4294967295 1 400\n0 0 0\n", "1073741824 1 400\n0 0 0\n"] {
            assert!(
                matches!(load_map(source), Err(LoadError::BadHeader { .. })),
                "{source:?}"
            );
        }
    }

    #[test]
    fn huge_header_with_short_body() {
        assert!(matches!(
            load_map("100000 100000 1\n0 0 0\n"),
            Err(LoadError::BadRowCount {
                expected: 200001,
                found: 1
            })
        ));
    }

    #[test]
    fn bad_row_width() {
        let source = MAPA0.replacen("0 1 1 1 1 1 0", "0 1 1 1 1 0", 1);
        assert!(matches!(
            load_map(&source),
            Err(LoadError::BadRowWidth {
                line: 3,
                expected: 7,
                found: 6
            })
        ));
    }

    #[test]
    fn bad_value() {
        let source = MAPA0.replacen("0 1 1 1 1 1 0", "0 1 2 1 1 1 0", 1);
        assert!(matches!(
            load_map(&source),
            Err(LoadError::BadValue { line: 3, .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_map_file("does/not/exist.map"),
            Err(LoadError::Io(_))
        ));
    }
}
