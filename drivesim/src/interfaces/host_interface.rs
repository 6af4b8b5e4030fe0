use helpers::geometry::Point2d;

pub const MAX_HOST_UPDATE_FREQUENCY: f64 = 20.0;

/// VehicleView contains the per-tick vehicle data that a host application (e.g. a renderer)
/// needs to draw the vehicle.
#[derive(Debug, Clone)]
pub struct VehicleView {
    pub position: Point2d,
    pub heading: f64,
    pub wheel_angle: f64,
    pub speed: f64,
    pub is_skidding: bool,
}

/// RunState is the snapshot that is sent to the host during a real-time run.
#[derive(Debug, Clone)]
pub struct RunState {
    pub vehicle: VehicleView,
    pub progress: f64,
    pub remaining_fuel_frac: f64,
    pub no_trail_points: usize,
    pub no_tire_marks: usize,
}
