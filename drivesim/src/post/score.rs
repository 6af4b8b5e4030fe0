use helpers::geometry::Point2d;
use helpers::polyline::{dist, point_segment_distance};

/// calc_score rates how closely the attempt path traces the reference path. For every attempt
/// point the distance to the nearest reference segment (the final reference vertex counts as
/// well) is taken. Points farther away than the threshold are dropped entirely instead of
/// penalized, so a detour does not wreck the score of an otherwise clean trace. The average
/// distance of the remaining points is mapped linearly onto [0, score_points]: a perfect trace
/// scores full points, an average right at the threshold scores zero. If either path has fewer
/// than two points, or no attempt point lies within the threshold, the score is 0.
pub fn calc_score(
    attempt: &[Point2d],
    reference: &[Point2d],
    score_threshold: f64,
    score_points: f64,
) -> u32 {
    if attempt.len() < 2 || reference.len() < 2 {
        return 0;
    }

    let mut total_distance = 0.0;
    let mut no_valid_points = 0u32;

    for point in attempt {
        let mut min_distance = f64::INFINITY;

        for segment in reference.windows(2) {
            min_distance =
                min_distance.min(point_segment_distance(point, &segment[0], &segment[1]));
        }
        min_distance = min_distance.min(dist(point, &reference[reference.len() - 1]));

        if min_distance <= score_threshold {
            total_distance += min_distance;
            no_valid_points += 1;
        }
    }

    if no_valid_points == 0 {
        return 0;
    }

    let avg_distance = total_distance / f64::from(no_valid_points);
    (score_points * (1.0 - avg_distance / score_threshold))
        .round()
        .max(0.0) as u32
}
