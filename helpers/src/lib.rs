pub mod general;
pub mod geometry;
pub mod polyline;


#[cfg(test)]
mod polyline_tests {
    use crate::geometry::Point2d;
    use crate::polyline::{
        dist, hash_polyline, point_at_progress, point_segment_distance, point_within,
        polyline_length, progress_along, smooth,
    };
    use approx::assert_ulps_eq;

    fn pt(x: f64, y: f64) -> Point2d {
        Point2d { x, y }
    }

    #[test]
    fn test_dist() {
        assert_ulps_eq!(dist(&pt(0.0, 0.0), &pt(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_point_segment_distance_interior() {
        let d = point_segment_distance(&pt(5.0, 3.0), &pt(0.0, 0.0), &pt(10.0, 0.0));
        assert_ulps_eq!(d, 3.0);
    }
    #[test]
    fn test_point_segment_distance_beyond_end() {
        let d = point_segment_distance(&pt(14.0, 3.0), &pt(0.0, 0.0), &pt(10.0, 0.0));
        assert_ulps_eq!(d, 5.0);
    }
    #[test]
    fn test_point_segment_distance_degenerate() {
        let d = point_segment_distance(&pt(3.0, 4.0), &pt(0.0, 0.0), &pt(0.0, 0.0));
        assert_ulps_eq!(d, 5.0);
    }

    #[test]
    fn test_polyline_length() {
        let path = vec![pt(0.0, 0.0), pt(3.0, 4.0), pt(3.0, 10.0)];
        assert_ulps_eq!(polyline_length(&path), 11.0);
    }
    #[test]
    fn test_polyline_length_single_point() {
        assert_ulps_eq!(polyline_length(&[pt(1.0, 1.0)]), 0.0);
    }
    #[test]
    fn test_polyline_length_duplicate_points() {
        // zero-length segments must not change the total length
        let path = vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)];
        assert_ulps_eq!(polyline_length(&path), 10.0);
    }

    #[test]
    fn test_point_at_progress_start_and_end() {
        let path = vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0)];
        assert_eq!(point_at_progress(0.0, &path), pt(0.0, 0.0));
        assert_eq!(point_at_progress(1.0, &path), pt(4.0, 4.0));
    }
    #[test]
    fn test_point_at_progress_interpolation() {
        let path = vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0)];
        assert_eq!(point_at_progress(0.5, &path), pt(4.0, 0.0));
        assert_eq!(point_at_progress(0.25, &path), pt(2.0, 0.0));
    }
    #[test]
    fn test_point_at_progress_clamps() {
        let path = vec![pt(0.0, 0.0), pt(4.0, 0.0)];
        assert_eq!(point_at_progress(1.5, &path), pt(4.0, 0.0));
    }
    #[test]
    fn test_point_at_progress_degenerate() {
        assert_eq!(point_at_progress(0.7, &[pt(2.0, 3.0)]), pt(2.0, 3.0));
        assert_eq!(point_at_progress(0.7, &[]), pt(0.0, 0.0));
    }

    #[test]
    fn test_progress_along() {
        let path = vec![pt(0.0, 0.0), pt(10.0, 0.0)];
        assert_ulps_eq!(progress_along(&pt(5.0, 2.0), &path), 0.5);
        assert_ulps_eq!(progress_along(&pt(12.0, 0.0), &path), 1.0);
    }
    #[test]
    fn test_progress_along_degenerate() {
        assert_ulps_eq!(progress_along(&pt(5.0, 2.0), &[pt(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_point_within() {
        let path = vec![pt(0.0, 0.0), pt(10.0, 0.0)];
        assert!(point_within(&pt(5.0, 2.0), &path, 3.0));
        assert!(!point_within(&pt(5.0, 5.0), &path, 3.0));
    }
    #[test]
    fn test_point_within_degenerate() {
        assert!(point_within(&pt(100.0, 100.0), &[pt(0.0, 0.0)], 1.0));
    }

    #[test]
    fn test_smooth_window_one_is_identity() {
        let path = vec![pt(0.0, 0.0), pt(3.0, 7.0), pt(5.0, 1.0), pt(9.0, 4.0)];
        assert_eq!(smooth(&path, 1), path);
    }
    #[test]
    fn test_smooth_preserves_point_count() {
        let path = vec![pt(0.0, 0.0), pt(2.0, 8.0), pt(4.0, 0.0), pt(6.0, 8.0), pt(8.0, 0.0)];
        assert_eq!(smooth(&path, 5).len(), path.len());
    }
    #[test]
    fn test_smooth_straight_line_unchanged() {
        let path = vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 0.0), pt(4.0, 0.0)];
        let smoothed = smooth(&path, 3);
        for p in smoothed.iter() {
            assert_ulps_eq!(p.y, 0.0);
        }
    }
    #[test]
    fn test_smooth_short_path_untouched() {
        let path = vec![pt(0.0, 0.0), pt(5.0, 5.0)];
        assert_eq!(smooth(&path, 10), path);
    }

    #[test]
    fn test_hash_polyline_deterministic() {
        let path = vec![pt(1.0, 2.0), pt(3.0, 4.0)];
        assert_eq!(hash_polyline(&path), hash_polyline(&path));
    }
    #[test]
    fn test_hash_polyline_stable_against_jitter() {
        let path1 = vec![pt(1.0, 2.0), pt(3.0, 4.0)];
        let path2 = vec![pt(1.0 + 1e-7, 2.0), pt(3.0, 4.0 - 1e-7)];
        assert_eq!(hash_polyline(&path1), hash_polyline(&path2));
    }
    #[test]
    fn test_hash_polyline_distinguishes_paths() {
        let path1 = vec![pt(1.0, 2.0), pt(3.0, 4.0)];
        let path2 = vec![pt(1.0, 2.0), pt(3.0, 5.0)];
        assert_ne!(hash_polyline(&path1), hash_polyline(&path2));
    }
    #[test]
    fn test_hash_polyline_empty() {
        assert_eq!(hash_polyline(&[]), "h_empty");
    }
}
