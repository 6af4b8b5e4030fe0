use helpers::geometry::Point2d;
use helpers::polyline::point_at_progress;

// arc-length fraction between the curvature sample points
const SAMPLE_DELTA: f64 = 0.01;

/// calc_curvature estimates the local curvature of the path at the inserted progress. The path is
/// sampled slightly before and after the current position, and the angle between the incoming and
/// outgoing direction vectors is mapped onto [0.0, 1.0] (0.0 for a straight line, 1.0 for a full
/// reversal) and capped at max_curvature. Degenerate geometry (less than three points, duplicate
/// sample points) yields 0.0 instead of an error since freehand input routinely produces it.
pub fn calc_curvature(progress: f64, path: &[Point2d], max_curvature: f64) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }

    let current_point = point_at_progress(progress, path);
    let prev_point = point_at_progress((progress - SAMPLE_DELTA).max(0.0), path);
    let next_point = point_at_progress((progress + SAMPLE_DELTA).min(1.0), path);

    let v1 = prev_point.vector_to(&current_point);
    let v2 = current_point.vector_to(&next_point);

    let mag1 = v1.abs();
    let mag2 = v2.abs();

    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    // clamp the cosine before acos to stay inside its domain under floating point drift
    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).max(-1.0).min(1.0);
    let angle = cos_angle.acos();

    (angle / std::f64::consts::PI).min(max_curvature)
}

/// speed_multiplier maps a curvature in [0.0, max_curvature] linearly onto a target speed
/// multiplier: 1.0 on a straight line down to 0.05 at the curvature cap.
pub fn speed_multiplier(curvature: f64, max_curvature: f64) -> f64 {
    1.0 - (curvature / max_curvature) * 0.95
}

/// deceleration_rate returns the braking rate for the current tick. The base rate is boosted by
/// the positive curvature gap between the upcoming and the current curvature and by an extra
/// penalty once the upcoming curvature exceeds 0.7, both scaled by a preparation factor derived
/// from the look-ahead and preparation distances. This brakes the vehicle smoothly ahead of sharp
/// corners instead of reactively at the corner itself.
pub fn deceleration_rate(
    current_curvature: f64,
    upcoming_curvature: f64,
    base_deceleration_rate: f64,
    max_deceleration_rate: f64,
    curve_look_ahead: f64,
    curve_preparation_distance: f64,
) -> f64 {
    let curve_factor = (upcoming_curvature - current_curvature).max(0.0);

    let distance_to_curve = curve_look_ahead - curve_preparation_distance;
    let preparation_factor = (distance_to_curve / curve_preparation_distance)
        .max(0.0)
        .min(1.0);

    let extra_sharp_curve_factor = ((upcoming_curvature - 0.7) / 0.2).max(0.0);
    let combined_factor = (curve_factor + extra_sharp_curve_factor) * preparation_factor;

    base_deceleration_rate + combined_factor * (max_deceleration_rate - base_deceleration_rate)
}

#[cfg(test)]
mod tests {
    use super::{calc_curvature, deceleration_rate, speed_multiplier};
    use helpers::geometry::Point2d;
    use approx::assert_ulps_eq;

    fn pt(x: f64, y: f64) -> Point2d {
        Point2d { x, y }
    }

    #[test]
    fn test_calc_curvature_straight_line() {
        let path = vec![pt(0.0, 0.0), pt(50.0, 0.0), pt(100.0, 0.0)];
        assert_ulps_eq!(calc_curvature(0.5, &path, 0.9), 0.0);
    }

    #[test]
    fn test_calc_curvature_right_angle() {
        let path = vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)];
        // at the corner the direction vectors differ by 90 degrees -> angle / pi = 0.5
        let c = calc_curvature(0.5, &path, 0.9);
        assert!(0.4 < c && c < 0.6);
    }

    #[test]
    fn test_calc_curvature_capped_at_max() {
        // near reversal, angle / pi approaches 1.0 and must be capped
        let path = vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(1.0, 0.5)];
        let c = calc_curvature(0.5, &path, 0.9);
        assert!(c <= 0.9);
    }

    #[test]
    fn test_calc_curvature_degenerate() {
        assert_ulps_eq!(calc_curvature(0.5, &[pt(0.0, 0.0), pt(1.0, 0.0)], 0.9), 0.0);
        // duplicate points collapse a sample vector to zero magnitude
        let path = vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(0.0, 0.0)];
        assert_ulps_eq!(calc_curvature(0.5, &path, 0.9), 0.0);
    }

    #[test]
    fn test_speed_multiplier_endpoints() {
        assert_ulps_eq!(speed_multiplier(0.0, 0.9), 1.0);
        assert_ulps_eq!(speed_multiplier(0.9, 0.9), 0.05);
    }

    #[test]
    fn test_deceleration_rate_no_upcoming_curve() {
        // on a straight road only the base rate applies
        assert_ulps_eq!(deceleration_rate(0.0, 0.0, 0.8, 1.2, 0.15, 0.1), 0.8);
    }

    #[test]
    fn test_deceleration_rate_increases_before_sharp_curve() {
        let flat = deceleration_rate(0.0, 0.0, 0.8, 1.2, 0.15, 0.1);
        let sharp = deceleration_rate(0.0, 0.8, 0.8, 1.2, 0.15, 0.1);
        assert!(sharp > flat);
    }
}
