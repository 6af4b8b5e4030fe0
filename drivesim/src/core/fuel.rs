use helpers::geometry::Point2d;
use helpers::polyline::{polyline_length, progress_along};

/// FuelGauge tracks the distance allowance of a run. The allowance is the reference path length
/// times the overage factor, and the gauge latches once it is exceeded (a run that ran out of
/// fuel stays out of fuel).
#[derive(Debug)]
pub struct FuelGauge {
    reference: Vec<Point2d>,
    reference_length: f64,
    max_allowed: f64,
    consumed: f64,
    defeated: bool,
}

impl FuelGauge {
    pub fn new(reference: &[Point2d], max_path_length_factor: f64) -> FuelGauge {
        let reference_length = polyline_length(reference);

        FuelGauge {
            reference: reference.to_vec(),
            reference_length,
            max_allowed: reference_length * max_path_length_factor,
            consumed: 0.0,
            defeated: false,
        }
    }

    /// The method checks whether the distance allowance would be exceeded by the inserted
    /// movement and returns true in that case (latched). During the drawing phase the effective
    /// consumption is estimated from the projection of the position onto the reference path,
    /// during the driving phase it is the accumulated driven distance plus the pending movement.
    pub fn check(&mut self, position: &Point2d, distance_moved: f64, is_drawing_phase: bool) -> bool {
        if self.defeated {
            return true;
        }

        let effective_consumption = if is_drawing_phase {
            progress_along(position, &self.reference) * self.reference_length
        } else {
            self.consumed + distance_moved
        };

        if effective_consumption > self.max_allowed {
            self.defeated = true;
        }

        self.defeated
    }

    /// The method syncs the gauge with the distance the vehicle actually drove (called once per
    /// tick after the movement was committed).
    pub fn set_consumed(&mut self, consumed: f64) {
        self.consumed = consumed;
    }

    pub fn consumed(&self) -> f64 {
        self.consumed
    }

    pub fn max_allowed(&self) -> f64 {
        self.max_allowed
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// The method returns the remaining fraction of the allowance, within [0.0, 1.0].
    pub fn remaining_frac(&self) -> f64 {
        if self.max_allowed == 0.0 {
            return 0.0;
        }

        (1.0 - self.consumed / self.max_allowed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::FuelGauge;
    use helpers::geometry::Point2d;
    use approx::assert_ulps_eq;

    fn pt(x: f64, y: f64) -> Point2d {
        Point2d { x, y }
    }

    fn straight_reference() -> Vec<Point2d> {
        vec![pt(0.0, 0.0), pt(100.0, 0.0)]
    }

    #[test]
    fn test_within_allowance() {
        let mut gauge = FuelGauge::new(&straight_reference(), 1.2);
        assert_ulps_eq!(gauge.max_allowed(), 120.0);
        gauge.set_consumed(100.0);
        assert!(!gauge.check(&pt(100.0, 0.0), 2.0, false));
        assert!(!gauge.is_defeated());
    }

    #[test]
    fn test_exceeding_allowance_latches() {
        let mut gauge = FuelGauge::new(&straight_reference(), 1.2);
        gauge.set_consumed(119.0);
        assert!(gauge.check(&pt(100.0, 0.0), 2.0, false));
        // the gauge stays defeated even for a harmless follow-up movement
        gauge.set_consumed(0.0);
        assert!(gauge.check(&pt(0.0, 0.0), 0.0, false));
    }

    #[test]
    fn test_drawing_phase_uses_projection() {
        let mut gauge = FuelGauge::new(&straight_reference(), 1.2);
        // halfway along the reference, far below the allowance
        assert!(!gauge.check(&pt(50.0, 0.0), 0.0, true));
    }

    #[test]
    fn test_remaining_frac() {
        let mut gauge = FuelGauge::new(&straight_reference(), 1.2);
        assert_ulps_eq!(gauge.remaining_frac(), 1.0);
        gauge.set_consumed(60.0);
        assert_ulps_eq!(gauge.remaining_frac(), 0.5);
        gauge.set_consumed(200.0);
        assert_ulps_eq!(gauge.remaining_frac(), 0.0);
    }
}
