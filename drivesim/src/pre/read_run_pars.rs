use crate::core::vehicle::VehiclePars;
use anyhow::Context;
use helpers::geometry::Point2d;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// * `name` - Display name of the course
/// * `reference` - The drawn course path the attempts are rated against
/// * `attempts` - One or more attempt paths to drive and rate
#[derive(Debug, Deserialize, Clone)]
pub struct CoursePars {
    pub name: String,
    pub reference: Vec<Point2d>,
    pub attempts: Vec<Vec<Point2d>>,
}

/// * `score_threshold` - (px) Distance above which an attempt point no longer counts
/// * `score_points` - Score awarded for a perfect trace
/// * `max_path_length_factor` - Distance allowance as a multiple of the reference path length
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameplayPars {
    pub score_threshold: f64,
    pub score_points: f64,
    pub max_path_length_factor: f64,
}

impl Default for GameplayPars {
    fn default() -> Self {
        GameplayPars {
            score_threshold: 20.0,
            score_points: 100.0,
            max_path_length_factor: 1.2,
        }
    }
}

/// RunPars is used to store all other parameter structs.
#[derive(Debug, Deserialize, Clone)]
pub struct RunPars {
    pub course_pars: CoursePars,
    #[serde(default)]
    pub gameplay_pars: GameplayPars,
    #[serde(default)]
    pub vehicle_pars: VehiclePars,
}

/// read_run_pars reads the JSON file and decodes the JSON string into the run parameters struct.
pub fn read_run_pars(filepath: &Path) -> anyhow::Result<RunPars> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.to_str().unwrap()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.to_str().unwrap()
    ))?;
    Ok(pars)
}
