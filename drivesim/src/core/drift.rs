use crate::core::curvature::calc_curvature;
use helpers::geometry::{Point2d, Vector2d};
use helpers::polyline::point_at_progress;
use std::f64::consts::PI;

// drift tuning (fixed table, not exposed as user configuration)
pub const DRIFT_THRESHOLD: f64 = 0.55;
pub const HANDBRAKE_THRESHOLD: f64 = 0.75;
const DRIFT_FACTOR: f64 = 0.8;
const HANDBRAKE_FACTOR: f64 = 1.5;
const REAR_SWING_FACTOR: f64 = 0.6;
const GRIP_RECOVERY_RATE: f64 = 0.05;
const MOMENTUM_FACTOR: f64 = 0.85;
const LATERAL_FRICTION: f64 = 0.85;
const MOMENTUM_DECAY: f64 = 0.9;

// arc-length fraction between the current position and the steering target point
const STEER_LOOK_AHEAD: f64 = 0.05;

/// Classification of the upcoming path segment. The class is recomputed every tick purely from
/// local path geometry, never from the previous classification, so grip, drift angle and momentum
/// are the only quantities that carry memory across ticks.
///
/// * `Normal` -> no significant turn ahead, grip recovers
/// * `PreDrift` -> a sharp turn is visible at the far look-ahead, the rear starts swinging out
/// * `Drifting` -> the upcoming curvature exceeds the drift threshold
/// * `Handbrake` -> near-reversal ahead, rapid rotation with heavy grip loss
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnClass {
    Normal,
    PreDrift,
    Drifting,
    Handbrake,
}

/// TurnInfo carries the per-tick classification together with the signed direction-change angles
/// it was derived from (the drift effects need the turn sign).
#[derive(Debug)]
pub struct TurnInfo {
    pub class: TurnClass,
    pub direction_change: f64,
    pub far_direction_change: f64,
}

/// classify_turn inspects the path ahead of the vehicle and classifies the upcoming segment.
/// The upcoming curvature is sampled one look-ahead distance ahead, the far curvature at 1.2x
/// that distance. Direction changes are measured between the immediate forward vector and the
/// vectors from the current position to the two look-ahead points, signed by the cross product.
pub fn classify_turn(
    progress: f64,
    path: &[Point2d],
    position: &Point2d,
    curve_look_ahead: f64,
    max_curvature: f64,
) -> TurnInfo {
    let upcoming_progress = (progress + curve_look_ahead).min(1.0);
    let far_progress = (progress + 1.2 * curve_look_ahead).min(1.0);

    let upcoming_curvature = calc_curvature(upcoming_progress, path, max_curvature);
    let far_curvature = calc_curvature(far_progress, path, max_curvature);

    let forward = point_at_progress(progress, path)
        .vector_to(&point_at_progress((progress + 0.01).min(1.0), path));
    let to_upcoming = position.vector_to(&point_at_progress(upcoming_progress, path));
    let to_far = position.vector_to(&point_at_progress(far_progress, path));

    let direction_change = signed_angle(&forward, &to_upcoming);
    let far_direction_change = signed_angle(&forward, &to_far);

    let class = if upcoming_curvature.abs() > HANDBRAKE_THRESHOLD
        && direction_change.abs() > PI / 4.0
    {
        TurnClass::Handbrake
    } else if upcoming_curvature.abs() > DRIFT_THRESHOLD {
        TurnClass::Drifting
    } else if far_curvature.abs() > 0.9 * DRIFT_THRESHOLD && far_direction_change.abs() > PI / 6.0
    {
        TurnClass::PreDrift
    } else {
        TurnClass::Normal
    };

    TurnInfo {
        class,
        direction_change,
        far_direction_change,
    }
}

/// signed_angle returns the angle between two vectors, signed by the cross product (positive for
/// a left turn). Zero-magnitude vectors yield 0.0.
fn signed_angle(v1: &Vector2d, v2: &Vector2d) -> f64 {
    let mag1 = v1.abs();
    let mag2 = v2.abs();

    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    let cos_angle = (v1.dot(v2) / (mag1 * mag2)).max(-1.0).min(1.0);
    cos_angle.acos() * v1.cross(v2).signum()
}

/// normalize_angle wraps an angle into (-pi, pi].
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// steering_target returns the steering angle toward the point slightly ahead on the path,
/// relative to the current heading and normalized into [-pi, pi).
pub fn steering_target(position: &Point2d, heading: f64, progress: f64, path: &[Point2d]) -> f64 {
    let target = point_at_progress((progress + STEER_LOOK_AHEAD).min(1.0), path);
    let angle_to_target = (target.y - position.y).atan2(target.x - position.x);
    normalize_angle(angle_to_target - heading)
}

/// detect_skid returns true when a sharp turn is taken fast: the instantaneous steering angle
/// exceeds pi/6 while the speed is above half the nominal top speed. This is the coarse flag that
/// drives tire-mark emission and the screeching sound, distinct from the drift classification.
pub fn detect_skid(steering_angle: f64, speed: f64, pixel_speed: f64) -> bool {
    steering_angle.abs() > PI / 6.0 && speed > 0.5 * pixel_speed
}

/// DriftState carries the lateral-slide memory of the vehicle across ticks.
///
/// * `drift_angle` - (rad) visual rear-swing angle added to the heading for rendering/tire marks
/// * `pre_drift_angle` - (rad) small slowly-integrating anticipation angle before a drift engages
/// * `lateral_velocity` - (px/s) sideways velocity perpendicular to the heading
/// * `momentum` - (px) positional deviation carried over from the previous tick
/// * `grip` - blending factor in [0.0, 1.0] between the drift-perturbed and path-locked position
#[derive(Debug, Clone)]
pub struct DriftState {
    pub is_drifting: bool,
    pub is_handbrake: bool,
    pub is_pre_drift: bool,
    pub drift_angle: f64,
    pub pre_drift_angle: f64,
    pub lateral_velocity: f64,
    pub momentum: Vector2d,
    pub grip: f64,
}

impl Default for DriftState {
    fn default() -> Self {
        DriftState {
            is_drifting: false,
            is_handbrake: false,
            is_pre_drift: false,
            drift_angle: 0.0,
            pre_drift_angle: 0.0,
            lateral_velocity: 0.0,
            momentum: Vector2d { dx: 0.0, dy: 0.0 },
            grip: 1.0,
        }
    }
}

impl DriftState {
    /// apply_turn updates the drift memory for one tick according to the inserted classification
    /// and returns the heading delta contributed by the drift behavior (0.0 for the normal and
    /// pre-drift classes, where the bicycle model steers the vehicle instead).
    pub fn apply_turn(
        &mut self,
        turn: &TurnInfo,
        steering_angle: f64,
        forward_speed: f64,
        dt: f64,
    ) -> f64 {
        self.is_handbrake = turn.class == TurnClass::Handbrake;
        self.is_drifting = turn.class == TurnClass::Drifting;
        self.is_pre_drift = turn.class == TurnClass::PreDrift;

        match turn.class {
            TurnClass::Handbrake => {
                // rear snaps out immediately, grip collapses toward its floor
                self.drift_angle = steering_angle * REAR_SWING_FACTOR;
                self.grip = (self.grip - 0.2).max(0.2);
                self.lateral_velocity = 0.7 * forward_speed * -steering_angle.signum();
                steering_angle * HANDBRAKE_FACTOR * dt * 10.0
            }

            TurnClass::Drifting => {
                self.drift_angle += (steering_angle * DRIFT_FACTOR - self.drift_angle) * 0.1;
                self.grip = (self.grip - 0.1).max(0.4);
                self.lateral_velocity = 0.5 * forward_speed * -steering_angle.signum();
                steering_angle * DRIFT_FACTOR * dt * 5.0
            }

            TurnClass::PreDrift => {
                // cosmetic anticipation only, the actual drift physics are not engaged yet
                self.drift_angle *= 0.9;
                let target_angle = turn.far_direction_change * 0.3;
                self.pre_drift_angle += (target_angle - self.pre_drift_angle) * 0.03;
                self.lateral_velocity = 0.1 * forward_speed * turn.far_direction_change.signum();
                self.grip = self.grip.max(0.7);
                0.0
            }

            TurnClass::Normal => {
                self.grip = (self.grip + GRIP_RECOVERY_RATE).min(1.0);
                self.drift_angle *= 0.9;
                self.pre_drift_angle *= 0.9;
                self.lateral_velocity *= LATERAL_FRICTION;
                0.0
            }
        }
    }

    /// perturb_position derives the actual vehicle position for this tick from the pure
    /// path-follow position. While drifting, handbraking or carrying residual lateral velocity,
    /// the position is offset perpendicular to the heading, shifted by the carried momentum, and
    /// blended back toward the path by grip^1.5 (low grip leaves the position dominated by the
    /// drift offset, grip 1.0 snaps it onto the path). The deviation that actually materialized
    /// is recorded as momentum for the next tick; outside of drifts the momentum decays
    /// geometrically instead of resetting, which avoids a visible pop.
    pub fn perturb_position(&mut self, path_position: &Point2d, heading: f64, dt: f64) -> Point2d {
        if self.is_drifting || self.is_handbrake || self.lateral_velocity.abs() > 0.1 {
            let lateral_direction = Vector2d {
                dx: -heading.sin(),
                dy: heading.cos(),
            };
            let offset = lateral_direction
                .mult(self.lateral_velocity * dt)
                .add(&self.momentum);
            let drift_position = path_position.shift(&offset);

            let blend = self.grip.powf(1.5);
            let actual = Point2d {
                x: drift_position.x + (path_position.x - drift_position.x) * blend,
                y: drift_position.y + (path_position.y - drift_position.y) * blend,
            };

            self.momentum = path_position.vector_to(&actual).mult(MOMENTUM_FACTOR);
            actual
        } else {
            self.momentum = self.momentum.mult(MOMENTUM_DECAY);
            path_position.clone()
        }
    }
}
