use crate::core::curvature::{calc_curvature, deceleration_rate, speed_multiplier};
use crate::core::drift::{
    classify_turn, detect_skid, normalize_angle, steering_target, TurnClass,
};
use crate::core::vehicle::{TireMark, Vehicle, VehiclePars};
use helpers::geometry::Point2d;
use helpers::polyline::{dist, dist_sq, point_at_progress, polyline_length};

/// Outcome of a single simulation tick.
///
/// * `Continuing` -> the vehicle moved and has not reached the finish yet
/// * `Finished` -> the vehicle reached (or passed) the end of the path during this tick
/// * `Stopped` -> the fuel check vetoed the movement, the vehicle state was not committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Continuing,
    Finished,
    Stopped,
}

/// update_vehicle advances the vehicle by one tick along the inserted path. The tick runs through
/// speed control (curvature-based target speed with anticipatory braking and the finish ramp),
/// steering (wheel angle chasing the steering target, turned into a heading change by either the
/// skid rule, the drift behavior or the bicycle model), drift classification and position
/// perturbation, and finally the fuel check. The fuel check sees the pending movement before it
/// is committed, so a vetoed tick leaves the vehicle exactly where it was.
pub fn update_vehicle<F>(
    vehicle: &mut Vehicle,
    path: &[Point2d],
    pars: &VehiclePars,
    fuel_check: &mut F,
) -> StepOutcome
where
    F: FnMut(&Point2d, f64, bool) -> bool,
{
    if vehicle.is_finishing {
        return StepOutcome::Finished;
    }

    // initialize the per-tick memory on the first tick
    if vehicle.previous_position.is_none() {
        vehicle.previous_position = Some(vehicle.position.clone());
        vehicle.previous_heading = vehicle.heading;
    }
    let mut drift = vehicle.drift.take().unwrap_or_default();

    let dt = pars.tick_interval / 1000.0;

    // speed control
    let current_curvature = calc_curvature(vehicle.progress, path, pars.max_curvature);
    let upcoming_progress = (vehicle.progress + pars.curve_look_ahead).min(1.0);
    let upcoming_curvature = calc_curvature(upcoming_progress, path, pars.max_curvature);

    let mut target_speed =
        pars.pixel_speed * speed_multiplier(current_curvature, pars.max_curvature);

    let distance_to_finish = 1.0 - vehicle.progress;
    if distance_to_finish < pars.finish_preparation_distance {
        let finish_factor = distance_to_finish / pars.finish_preparation_distance;
        let min_speed = pars.pixel_speed * pars.min_finish_speed;
        target_speed = min_speed + (target_speed - min_speed) * finish_factor;
    }

    if target_speed > vehicle.speed {
        let speed_diff = target_speed - vehicle.speed;
        let acceleration_rate = pars.acceleration_rate * (1.0 + speed_diff / pars.pixel_speed);
        vehicle.speed = (vehicle.speed + pars.pixel_speed * acceleration_rate).min(target_speed);
    } else {
        let braking_rate = deceleration_rate(
            current_curvature,
            upcoming_curvature,
            pars.base_deceleration_rate,
            pars.max_deceleration_rate,
            pars.curve_look_ahead,
            pars.curve_preparation_distance,
        );
        vehicle.speed = (vehicle.speed - pars.pixel_speed * braking_rate).max(target_speed);
    }

    let total_length = polyline_length(path);
    let progress_increment = if total_length > 0.0 {
        vehicle.speed / total_length
    } else {
        1.0
    };
    let next_progress = vehicle.progress + progress_increment;

    // steering
    let steering_angle =
        steering_target(&vehicle.position, vehicle.heading, vehicle.progress, path);

    let wheel_angle_diff = steering_angle - vehicle.wheel_angle;
    vehicle.wheel_angle +=
        wheel_angle_diff.signum() * wheel_angle_diff.abs().min(pars.wheel_turn_speed);
    vehicle.wheel_angle = vehicle
        .wheel_angle
        .max(-pars.max_wheel_angle)
        .min(pars.max_wheel_angle);

    vehicle.is_skidding = detect_skid(steering_angle, vehicle.speed, pars.pixel_speed);

    let turn = classify_turn(
        vehicle.progress,
        path,
        &vehicle.position,
        pars.curve_look_ahead,
        pars.max_curvature,
    );
    let drift_delta = drift.apply_turn(&turn, steering_angle, vehicle.speed, dt);
    let drift_active = matches!(turn.class, TurnClass::Drifting | TurnClass::Handbrake);

    let delta_heading = if vehicle.is_skidding {
        steering_angle * pars.skid_turn_rate_multiplier
    } else if drift_active {
        drift_delta
    } else if vehicle.wheel_angle.abs() > 0.01 && pars.wheelbase > 0.0 {
        // bicycle steering model
        let speed_pixels_per_second = vehicle.speed * (1000.0 / pars.tick_interval);
        speed_pixels_per_second * vehicle.wheel_angle.tan() / pars.wheelbase * dt
    } else {
        0.0
    };
    vehicle.heading = normalize_angle(vehicle.heading + delta_heading);

    // pending movement, subject to the fuel check
    let path_position = point_at_progress(next_progress.min(1.0), path);
    let next_position = drift.perturb_position(&path_position, vehicle.heading, dt);
    let distance_moved = dist(&vehicle.position, &next_position);

    if fuel_check(&vehicle.position, distance_moved, false) {
        vehicle.drift = Some(drift);
        return StepOutcome::Stopped;
    }

    // commit the movement
    vehicle.previous_position = Some(vehicle.position.clone());
    vehicle.position = next_position;
    vehicle.progress = next_progress;
    vehicle.trail.push(vehicle.position.clone());
    vehicle.fuel_consumed += distance_moved;

    // marks are tied to the coarse skid flag, not to the drift classification
    if vehicle.is_skidding {
        emit_tire_marks(vehicle, drift.drift_angle, pars);
    }

    vehicle.previous_heading = vehicle.heading;
    vehicle.drift = Some(drift);

    if vehicle.progress >= 1.0 {
        // terminal latch, further ticks leave the state untouched
        vehicle.is_finishing = true;
        StepOutcome::Finished
    } else {
        StepOutcome::Continuing
    }
}

/// emit_tire_marks pushes one tire mark per tire corner that moved noticeably during this tick.
/// The visual angle includes the drift angle so the marks follow the swung-out rear.
fn emit_tire_marks(vehicle: &mut Vehicle, drift_angle: f64, pars: &VehiclePars) {
    let previous_position = match &vehicle.previous_position {
        Some(p) => p.clone(),
        None => return,
    };

    let current_corners =
        Vehicle::tire_corners(&vehicle.position, vehicle.heading + drift_angle, pars);
    let previous_corners =
        Vehicle::tire_corners(&previous_position, vehicle.previous_heading + drift_angle, pars);

    for (previous, current) in previous_corners.iter().zip(current_corners.iter()) {
        if dist_sq(previous, current) > 0.1 {
            vehicle.tire_marks.push(TireMark {
                start: previous.clone(),
                end: current.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{update_vehicle, StepOutcome};
    use crate::core::vehicle::{Vehicle, VehiclePars};
    use helpers::geometry::Point2d;

    fn pt(x: f64, y: f64) -> Point2d {
        Point2d { x, y }
    }

    fn no_fuel_limit() -> impl FnMut(&Point2d, f64, bool) -> bool {
        |_: &Point2d, _: f64, _: bool| false
    }

    fn drive_to_completion(
        vehicle: &mut Vehicle,
        path: &[Point2d],
        pars: &VehiclePars,
        max_ticks: usize,
    ) -> StepOutcome {
        let mut check = no_fuel_limit();
        for _ in 0..max_ticks {
            match update_vehicle(vehicle, path, pars, &mut check) {
                StepOutcome::Continuing => continue,
                outcome => return outcome,
            }
        }
        StepOutcome::Continuing
    }

    #[test]
    fn test_progress_is_monotonic() {
        let path = vec![pt(0.0, 0.0), pt(200.0, 0.0)];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);
        let mut check = no_fuel_limit();

        let mut last_progress = 0.0;
        for _ in 0..50 {
            update_vehicle(&mut vehicle, &path, &pars, &mut check);
            assert!(vehicle.progress >= last_progress);
            last_progress = vehicle.progress;
        }
    }

    #[test]
    fn test_straight_line_finishes_without_skidding() {
        let path = vec![pt(0.0, 0.0), pt(100.0, 0.0)];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);

        let outcome = drive_to_completion(&mut vehicle, &path, &pars, 10_000);
        assert_eq!(outcome, StepOutcome::Finished);
        assert!(vehicle.tire_marks().is_empty());
        assert!(!vehicle.trail().is_empty());
    }

    #[test]
    fn test_speed_stays_within_bounds() {
        let path = vec![pt(0.0, 0.0), pt(500.0, 0.0)];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);
        let mut check = no_fuel_limit();

        for _ in 0..500 {
            update_vehicle(&mut vehicle, &path, &pars, &mut check);
            assert!(vehicle.speed >= 0.0);
            assert!(vehicle.speed <= pars.pixel_speed);
        }
    }

    #[test]
    fn test_sharp_corner_leaves_tire_marks() {
        // right-angle corner taken without smoothing provokes a skid
        let path = vec![
            pt(0.0, 0.0),
            pt(50.0, 0.0),
            pt(100.0, 0.0),
            pt(100.0, 50.0),
            pt(100.0, 100.0),
        ];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);

        let outcome = drive_to_completion(&mut vehicle, &path, &pars, 10_000);
        assert_eq!(outcome, StepOutcome::Finished);
        assert!(!vehicle.tire_marks().is_empty());
    }

    #[test]
    fn test_drift_without_skid_leaves_no_tire_marks() {
        // near hairpin just past the look-ahead point; positioned so the drift classification
        // engages while the steering target is still straight ahead (no skid)
        let path = vec![pt(0.0, 0.0), pt(20.0, 0.0), pt(2.0, 4.0)];
        let mut pars = VehiclePars::default();
        pars.pixel_speed = 1000.0;
        let mut vehicle = Vehicle::new(&path);
        vehicle.progress = 0.37;
        vehicle.position = helpers::polyline::point_at_progress(0.37, &path);
        let mut check = no_fuel_limit();

        update_vehicle(&mut vehicle, &path, &pars, &mut check);
        assert!(!vehicle.is_skidding);
        assert!(vehicle.drift.as_ref().unwrap().is_drifting);
        assert!(vehicle.tire_marks().is_empty());
    }

    #[test]
    fn test_fuel_veto_stops_without_moving() {
        let path = vec![pt(0.0, 0.0), pt(100.0, 0.0)];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);
        let mut check = no_fuel_limit();

        // a few regular ticks first
        for _ in 0..5 {
            update_vehicle(&mut vehicle, &path, &pars, &mut check);
        }
        let position_before = vehicle.position.clone();
        let progress_before = vehicle.progress;

        let mut veto = |_: &Point2d, _: f64, _: bool| true;
        let outcome = update_vehicle(&mut vehicle, &path, &pars, &mut veto);
        assert_eq!(outcome, StepOutcome::Stopped);
        assert_eq!(vehicle.position, position_before);
        assert!((vehicle.progress - progress_before).abs() < 1e-12);
    }

    #[test]
    fn test_finished_vehicle_stays_finished() {
        let path = vec![pt(0.0, 0.0), pt(100.0, 0.0)];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);
        let mut check = no_fuel_limit();

        drive_to_completion(&mut vehicle, &path, &pars, 10_000);
        let trail_len = vehicle.trail().len();
        assert_eq!(
            update_vehicle(&mut vehicle, &path, &pars, &mut check),
            StepOutcome::Finished
        );
        assert_eq!(vehicle.trail().len(), trail_len);
    }

    #[test]
    fn test_degenerate_path_finishes_immediately() {
        let path = vec![pt(5.0, 5.0), pt(5.0, 5.0)];
        let pars = VehiclePars::default();
        let mut vehicle = Vehicle::new(&path);
        let mut check = no_fuel_limit();

        // zero total length maps any movement onto full progress
        let mut outcome = StepOutcome::Continuing;
        for _ in 0..10 {
            outcome = update_vehicle(&mut vehicle, &path, &pars, &mut check);
            if outcome == StepOutcome::Finished {
                break;
            }
        }
        assert_eq!(outcome, StepOutcome::Finished);
    }
}
