//! Map description fixtures and scenario tables for testing and benchmarking `wavefront_planner`.
//!
//! Maps live in `maps/<name>.map` in the map description format. Each map has a scenario table in
//! `scenarios/<name>.map.scen`: a `version` line followed by tab separated records of
//! `map start_x start_y goal_x goal_y hops`, where `hops` is the expected cost field value at the
//! start cell, or `-1` if the goal cannot be reached.
use csv::ReaderBuilder;
use grid_util::point::Point;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[allow(unused)]
#[derive(Debug, Deserialize)]
pub struct Scenario {
    map_name: String,
    start_x: i32,
    start_y: i32,
    goal_x: i32,
    goal_y: i32,
    hops: i64,
}

/// Start cell, goal cell and expected hop count ([None] when unreachable).
pub type ScenarioCase = (Point, Point, Option<u32>);

fn fixture_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(dir)
}

fn load_scenario(name: &str) -> (String, Vec<ScenarioCase>) {
    let map_str = fs::read_to_string(fixture_dir("maps").join(format!("{}.map", name)))
        .expect("Could not read map file");

    let file = File::open(fixture_dir("scenarios").join(format!("{}.map.scen", name)))
        .expect("Could not open scenario file");

    // Create a buffer reader to read lines
    let reader = io::BufReader::new(file);
    let mut lines = reader.lines();

    // Skip the version line
    lines.next();

    let remaining_data = lines.collect::<Result<Vec<_>, _>>().unwrap().join("\n");

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(remaining_data.as_bytes());
    let mut cases: Vec<ScenarioCase> = Vec::new();

    for result in csv_reader.deserialize() {
        let record: Scenario = result.expect("Could not parse scenario record");
        let start = Point::new(record.start_x, record.start_y);
        let goal = Point::new(record.goal_x, record.goal_y);
        let hops = u32::try_from(record.hops).ok();
        cases.push((start, goal, hops));
    }
    (map_str, cases)
}

/// Names of all maps that have a fixture file.
pub fn get_scenario_names() -> Vec<String> {
    let root = fixture_dir("maps");
    let mut names = Vec::new();
    for entry in WalkDir::new(&root).into_iter() {
        let entry = entry.expect("Could not get dir entry");
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "map") {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .expect("Map file name is not valid UTF-8");
            names.push(name.to_owned());
        }
    }
    names.sort();
    names
}

/// The map description text and scenario cases for the map called `name`.
pub fn get_scenario(name: &str) -> (String, Vec<ScenarioCase>) {
    let scenario_names = get_scenario_names();
    if scenario_names.iter().any(|n| n == name) {
        load_scenario(name)
    } else {
        panic!("Could not load scenario {}!", name);
    }
}
