use crate::core::drift::DriftState;
use helpers::geometry::{Point2d, Vector2d};
use helpers::polyline::point_at_progress;
use serde::Deserialize;

/// * `pixel_speed` - (px/tick) Nominal top speed on a straight line
/// * `tick_interval` - (ms) Simulated wall-clock duration of one tick
/// * `smoothing_window` - Window size of the moving-average path smoothing (1 disables smoothing)
/// * `max_curvature` - Cap of the normalized curvature measure, within (0.0, 1.0]
/// * `acceleration_rate` - (px/tick^2) Base acceleration toward the target speed
/// * `base_deceleration_rate` - Base braking factor applied when above the target speed
/// * `max_deceleration_rate` - Braking factor reached ahead of the sharpest corners
/// * `curve_look_ahead` - Arc-length fraction between the vehicle and the curvature look-ahead
/// point
/// * `curve_preparation_distance` - Arc-length fraction over which braking is phased in before a
/// corner
/// * `finish_preparation_distance` - Arc-length fraction before the finish over which the speed
/// ramps down
/// * `min_finish_speed` - Fraction of pixel_speed that the finish ramp converges to
/// * `wheel_turn_speed` - (rad/tick) Maximum change of the wheel angle per tick
/// * `max_wheel_angle` - (rad) Steering lock, within (0.0, pi/2)
/// * `wheelbase` - (px) Distance between the axles for the bicycle steering model
/// * `skid_turn_rate_multiplier` - Fraction of the steering angle applied per tick while skidding
/// * `width` - (px) Track width of the vehicle (tire-mark placement)
/// * `length` - (px) Length of the vehicle (tire-mark placement)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VehiclePars {
    pub pixel_speed: f64,
    pub tick_interval: f64,
    pub smoothing_window: usize,
    pub max_curvature: f64,
    pub acceleration_rate: f64,
    pub base_deceleration_rate: f64,
    pub max_deceleration_rate: f64,
    pub curve_look_ahead: f64,
    pub curve_preparation_distance: f64,
    pub finish_preparation_distance: f64,
    pub min_finish_speed: f64,
    pub wheel_turn_speed: f64,
    pub max_wheel_angle: f64,
    pub wheelbase: f64,
    pub skid_turn_rate_multiplier: f64,
    pub width: f64,
    pub length: f64,
}

impl Default for VehiclePars {
    fn default() -> Self {
        VehiclePars {
            pixel_speed: 2.0,
            tick_interval: 16.0,
            smoothing_window: 10,
            max_curvature: 0.9,
            acceleration_rate: 0.005,
            base_deceleration_rate: 0.8,
            max_deceleration_rate: 1.2,
            curve_look_ahead: 0.15,
            curve_preparation_distance: 0.1,
            finish_preparation_distance: 0.2,
            min_finish_speed: 0.3,
            wheel_turn_speed: 0.15,
            max_wheel_angle: std::f64::consts::FRAC_PI_4,
            wheelbase: 20.0,
            skid_turn_rate_multiplier: 0.15,
            width: 20.0,
            length: 50.0,
        }
    }
}

/// A single tire mark stroke emitted during one skidding tick (one per tire corner).
#[derive(Debug, Clone, PartialEq)]
pub struct TireMark {
    pub start: Point2d,
    pub end: Point2d,
}

#[derive(Debug)]
pub struct Vehicle {
    pub position: Point2d,
    pub previous_position: Option<Point2d>,
    pub previous_heading: f64,
    pub progress: f64,
    pub heading: f64,
    pub wheel_angle: f64,
    pub speed: f64,
    pub is_skidding: bool,
    pub is_finishing: bool,
    pub drift: Option<DriftState>,
    pub fuel_consumed: f64,
    pub(crate) trail: Vec<Point2d>,
    pub(crate) tire_marks: Vec<TireMark>,
}

impl Vehicle {
    /// The method places a fresh vehicle at the start of the inserted path, headed along its first
    /// segment (heading 0.0 if the path start is degenerate).
    pub fn new(path: &[Point2d]) -> Vehicle {
        let start = point_at_progress(0.0, path);
        let ahead = point_at_progress(0.01, path);
        let direction = start.vector_to(&ahead);

        let heading = if direction.abs() > 0.0 {
            direction.dy.atan2(direction.dx)
        } else {
            0.0
        };

        Vehicle {
            position: start,
            previous_position: None,
            previous_heading: heading,
            progress: 0.0,
            heading,
            wheel_angle: 0.0,
            speed: 0.0,
            is_skidding: false,
            is_finishing: false,
            drift: None,
            fuel_consumed: 0.0,
            trail: vec![],
            tire_marks: vec![],
        }
    }

    pub fn trail(&self) -> &[Point2d] {
        &self.trail
    }

    pub fn tire_marks(&self) -> &[TireMark] {
        &self.tire_marks
    }

    /// The method returns the world positions of the four tire contact points for a vehicle
    /// centered at the inserted position with the inserted visual angle (heading plus drift
    /// angle).
    pub fn tire_corners(center: &Point2d, angle: f64, pars: &VehiclePars) -> [Point2d; 4] {
        let half_length = pars.length / 2.0;
        let half_width = pars.width / 2.0;
        let cos_a = angle.cos();
        let sin_a = angle.sin();

        let corner = |dx: f64, dy: f64| {
            center.shift(&Vector2d {
                dx: dx * cos_a - dy * sin_a,
                dy: dx * sin_a + dy * cos_a,
            })
        };

        [
            corner(half_length, half_width),
            corner(half_length, -half_width),
            corner(-half_length, half_width),
            corner(-half_length, -half_width),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{Vehicle, VehiclePars};
    use helpers::geometry::Point2d;
    use approx::assert_ulps_eq;
    use std::f64::consts::FRAC_PI_2;

    fn pt(x: f64, y: f64) -> Point2d {
        Point2d { x, y }
    }

    #[test]
    fn test_new_vehicle_heading_along_first_segment() {
        let vehicle = Vehicle::new(&[pt(0.0, 0.0), pt(0.0, 100.0)]);
        assert_eq!(vehicle.position, pt(0.0, 0.0));
        assert_ulps_eq!(vehicle.heading, FRAC_PI_2);
        assert_ulps_eq!(vehicle.speed, 0.0);
    }

    #[test]
    fn test_new_vehicle_degenerate_path() {
        let vehicle = Vehicle::new(&[pt(5.0, 5.0), pt(5.0, 5.0)]);
        assert_ulps_eq!(vehicle.heading, 0.0);
    }

    #[test]
    fn test_tire_corners_axis_aligned() {
        let pars = VehiclePars::default();
        let corners = Vehicle::tire_corners(&pt(0.0, 0.0), 0.0, &pars);
        assert_eq!(corners[0], pt(25.0, 10.0));
        assert_eq!(corners[1], pt(25.0, -10.0));
        assert_eq!(corners[2], pt(-25.0, 10.0));
        assert_eq!(corners[3], pt(-25.0, -10.0));
    }

    #[test]
    fn test_tire_corners_rotated() {
        let pars = VehiclePars::default();
        let corners = Vehicle::tire_corners(&pt(0.0, 0.0), FRAC_PI_2, &pars);
        assert_ulps_eq!(corners[0].x, -10.0);
        assert_ulps_eq!(corners[0].y, 25.0, max_ulps = 8);
    }
}
