use crate::geometry::Point2d;

/// dist_sq returns the squared Euclidean distance between two points.
pub fn dist_sq(p1: &Point2d, p2: &Point2d) -> f64 {
    (p1.x - p2.x).powf(2.0) + (p1.y - p2.y).powf(2.0)
}

/// dist returns the Euclidean distance between two points.
pub fn dist(p1: &Point2d, p2: &Point2d) -> f64 {
    dist_sq(p1, p2).sqrt()
}

/// point_segment_distance returns the distance from p to the closest point on the segment [a, b].
/// If a and b coincide, the segment degenerates to a point and the point distance is returned.
pub fn point_segment_distance(p: &Point2d, a: &Point2d, b: &Point2d) -> f64 {
    let l2 = dist_sq(a, b);
    if l2 == 0.0 {
        return dist(p, a);
    }

    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / l2;
    let t = t.max(0.0).min(1.0);
    let projection = Point2d {
        x: a.x + t * (b.x - a.x),
        y: a.y + t * (b.y - a.y),
    };
    dist(p, &projection)
}

/// polyline_length returns the summed length of all consecutive segments. Paths with less than two
/// points have no extent and return 0.0 (zero-length segments contribute nothing).
pub fn polyline_length(path: &[Point2d]) -> f64 {
    let mut length = 0.0;
    for i in 0..path.len().saturating_sub(1) {
        length += dist(&path[i], &path[i + 1]);
    }
    length
}

/// point_at_progress returns the point at the given arc-length fraction along the path. The
/// fraction is clamped to [0.0, 1.0]. Degenerate paths return their sole point (or the origin for
/// an empty path), and a path of zero total length returns its first point.
pub fn point_at_progress(progress: f64, path: &[Point2d]) -> Point2d {
    if path.len() < 2 {
        return path
            .first()
            .cloned()
            .unwrap_or(Point2d { x: 0.0, y: 0.0 });
    }

    let total_length = polyline_length(path);
    if total_length == 0.0 {
        return path[0].clone();
    }

    let target_distance = progress * total_length;
    let mut accumulated_length = 0.0;

    for i in 0..path.len() - 1 {
        let segment_length = dist(&path[i], &path[i + 1]);

        if accumulated_length + segment_length >= target_distance || i == path.len() - 2 {
            // a zero-length segment has no interior to interpolate in
            if segment_length == 0.0 {
                return path[i].clone();
            }

            // clamp against float drift so the interpolation never leaves the segment
            let clamped_target = target_distance.min(total_length);
            let t = (clamped_target - accumulated_length) / segment_length;
            let t = t.max(0.0).min(1.0);

            return Point2d {
                x: path[i].x + t * (path[i + 1].x - path[i].x),
                y: path[i].y + t * (path[i + 1].y - path[i].y),
            };
        }
        accumulated_length += segment_length;
    }

    path[path.len() - 1].clone()
}

/// progress_along returns the arc-length fraction of the path at the closest projection of the
/// inserted point onto the path (the final vertex is checked as well). Returns 0.0 for paths with
/// less than two points or zero total length.
pub fn progress_along(point: &Point2d, path: &[Point2d]) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }

    let mut min_distance_sq = f64::INFINITY;
    let mut length_up_to_projection = 0.0;
    let mut accumulated_length = 0.0;

    for i in 0..path.len() - 1 {
        let a = &path[i];
        let b = &path[i + 1];
        let segment_length = dist(a, b);
        let l2 = dist_sq(a, b);
        let mut projection = a.clone();
        let mut t = 0.0;

        if l2 != 0.0 {
            t = ((point.x - a.x) * (b.x - a.x) + (point.y - a.y) * (b.y - a.y)) / l2;
            t = t.max(0.0).min(1.0);
            projection = Point2d {
                x: a.x + t * (b.x - a.x),
                y: a.y + t * (b.y - a.y),
            };
        }

        let d_sq = dist_sq(point, &projection);

        if d_sq < min_distance_sq {
            min_distance_sq = d_sq;
            length_up_to_projection = accumulated_length + t * segment_length;
        }
        accumulated_length += segment_length;
    }

    // the projection onto the final vertex beats any segment projection if it is closer
    if dist_sq(point, &path[path.len() - 1]) < min_distance_sq {
        length_up_to_projection = accumulated_length;
    }

    if accumulated_length == 0.0 {
        return 0.0;
    }

    length_up_to_projection / accumulated_length
}

/// point_within checks whether the inserted point lies within the given distance threshold of the
/// path (segments and both endpoints). Paths with less than two points accept everything.
pub fn point_within(point: &Point2d, path: &[Point2d], threshold: f64) -> bool {
    if path.len() < 2 {
        return true;
    }

    let mut min_distance = f64::INFINITY;

    for i in 0..path.len() - 1 {
        min_distance = min_distance.min(point_segment_distance(point, &path[i], &path[i + 1]));
    }

    min_distance = min_distance.min(dist(point, &path[0]));
    min_distance = min_distance.min(dist(point, &path[path.len() - 1]));

    min_distance <= threshold
}

/// smooth applies a triangular-weighted moving average over a symmetric window to the path. The
/// half-window is window / 2 (integer division) and the weight of a neighbor at offset j is
/// 1 - |j| / (half + 1), so points closer to the center have more influence. The number of points
/// is preserved (no resampling). Paths with less than three points are returned unchanged, as is
/// any path for a window of 1 (half-window 0).
pub fn smooth(path: &[Point2d], window: usize) -> Vec<Point2d> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let half_window = (window / 2) as i64;
    let mut smoothed = Vec::with_capacity(path.len());

    for i in 0..path.len() as i64 {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut weight_sum = 0.0;

        for j in -half_window..=half_window {
            let idx = i + j;
            if 0 <= idx && idx < path.len() as i64 {
                let weight = 1.0 - j.abs() as f64 / (half_window + 1) as f64;
                sum_x += path[idx as usize].x * weight;
                sum_y += path[idx as usize].y * weight;
                weight_sum += weight;
            }
        }

        smoothed.push(Point2d {
            x: sum_x / weight_sum,
            y: sum_y / weight_sum,
        });
    }

    smoothed
}

/// hash_polyline returns a deterministic fingerprint of the path that is used to de-duplicate
/// saved courses. Coordinates are rounded to three decimals before hashing, which makes the
/// fingerprint stable against floating point jitter below the sub-millimeter level.
pub fn hash_polyline(path: &[Point2d]) -> String {
    if path.is_empty() {
        return String::from("h_empty");
    }

    let mut path_string = String::with_capacity(path.len() * 16);
    for p in path.iter() {
        path_string.push_str(&format!("{:.3},{:.3};", p.x, p.y));
    }

    // simple 32-bit string hash (char + (hash << 6) + (hash << 16) - hash)
    let mut hash: i64 = 0;
    for ch in path_string.chars() {
        let h32 = hash as i32;
        hash = ch as i64 + ((h32 << 6) as i64) + ((h32 << 16) as i64) - hash;
    }

    format!("h_{:x}", hash as u32)
}
