use grid_util::point::Point;
use wavefront_planner::{compute_cost_field, extract_path, GridMap, NeighborDirection};

// In this example a path is found on a 3x3 map with a wall east of the middle cell
//  _____
// |    G|
// |  |  |
// |S    |
//  -----
// S marks the start
// G marks the goal
fn main() {
    let mut map = GridMap::open(3, 3, 400);
    map.delete_connection(Point::new(1, 1), NeighborDirection::East)
        .unwrap();
    let start = Point::new(0, 0);
    let goal = Point::new(2, 2);
    let field = compute_cost_field(&map, goal).unwrap();
    println!("{}", field);
    match extract_path(&map, start, goal, &field) {
        Ok(path) => {
            println!("A path of {} hops has been found:", path.hops());
            for cell in path.cells() {
                println!("{:?} at {:?} mm", cell, map.cell_center_mm(cell));
            }
            println!("Directions: {:?}", path.directions());
        }
        Err(e) => println!("No path: {}", e),
    }
}
