use helpers::geometry::Point2d;

/// Outcome of a completed run.
///
/// * `Finished` -> the vehicle reached the end of the attempt path
/// * `OutOfFuel` -> the distance allowance was exhausted before the finish
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    Finished,
    OutOfFuel,
}

/// RunResult contains all run information that is required for post-processing the results.
#[derive(Debug)]
pub struct RunResult {
    pub course_name: String,
    pub course_id: String,
    pub outcome: RunOutcome,
    pub score: u32,
    pub fuel_consumed: f64,
    pub fuel_allowance: f64,
    pub no_ticks: u32,
    pub no_trail_points: usize,
    pub no_tire_marks: usize,
    pub attempt: Vec<Point2d>,
}

impl RunResult {
    /// print_summary prints the resulting score and run statistics to the console output.
    pub fn print_summary(&self) {
        println!(
            "RESULT: Course {} ({}): {}",
            self.course_name,
            self.course_id,
            match self.outcome {
                RunOutcome::Finished => format!("finished with a score of {}", self.score),
                RunOutcome::OutOfFuel => String::from("ran out of fuel (score 0)"),
            }
        );
        println!(
            "RESULT: Fuel consumed: {:.1} px of {:.1} px allowed ({:.1}%)",
            self.fuel_consumed,
            self.fuel_allowance,
            if self.fuel_allowance > 0.0 {
                self.fuel_consumed / self.fuel_allowance * 100.0
            } else {
                0.0
            }
        );
        println!(
            "RESULT: Ticks: {}, trail points: {}, tire marks: {}",
            self.no_ticks, self.no_trail_points, self.no_tire_marks
        );
    }
}
