use grid_util::point::Point;
use std::env;
use std::process;
use wavefront_planner::{load_map_file, Planner};

// Loads a map description file and plans between two cells:
//
//     cargo run --example plan_from_file -- map.txt 0 0 2 2
fn main() {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() != 5 {
        eprintln!("usage: plan_from_file <map> <start_x> <start_y> <goal_x> <goal_y>");
        process::exit(2);
    }
    let coords = args[1..]
        .iter()
        .map(|a| a.parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("bad coordinate: {}", e);
            process::exit(2);
        });
    let map = load_map_file(&args[0]).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    println!("{}", map);
    let start = Point::new(coords[0], coords[1]);
    let goal = Point::new(coords[2], coords[3]);
    let mut planner = Planner::new(map);
    match planner.plan_path(start, goal) {
        Ok(path) => println!("{}", path),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
