use crate::pre::read_run_pars::RunPars;
use crate::pre::run_opts::RunOpts;
use anyhow::Context;
use helpers::general::InputValueError;
use std::f64::consts::FRAC_PI_2;

/// check_run_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not.
pub fn check_run_opts_pars(run_opts: &RunOpts, run_pars: &RunPars) -> anyhow::Result<()> {
    // PART 1: RUN OPTIONS
    if run_opts.realtime && run_pars.course_pars.attempts.len() != 1 {
        return Err(InputValueError)
            .context("If realtime is activated, exactly one attempt must be inserted!");
    }

    if run_opts.realtime
        && !(0.1 <= run_opts.realtime_factor && run_opts.realtime_factor <= 100.0)
    {
        return Err(InputValueError).context(format!(
            "realtime_factor is {:.3}, which is not within the reasonable range of [0.1, 100.0]!",
            run_opts.realtime_factor
        ));
    }

    // PART 2: RUN PARAMETERS
    // COURSE --------------------------------------------------------------------------------------
    if run_pars.course_pars.reference.len() < 2 {
        return Err(InputValueError).context("The reference path must contain at least two points!");
    }

    if run_pars.course_pars.attempts.is_empty() {
        return Err(InputValueError).context("At least one attempt path must be inserted!");
    }

    if run_pars
        .course_pars
        .attempts
        .iter()
        .any(|attempt| attempt.len() < 2)
    {
        return Err(InputValueError).context("Every attempt path must contain at least two points!");
    }

    // VEHICLE -------------------------------------------------------------------------------------
    let vp = &run_pars.vehicle_pars;

    if vp.pixel_speed <= 0.0 {
        return Err(InputValueError).context("pixel_speed must be positive!");
    }
    if !(1.0 <= vp.tick_interval && vp.tick_interval <= 1000.0) {
        return Err(InputValueError).context(format!(
            "tick_interval is {:.1}ms, which is not within the reasonable range of [1.0, 1000.0]ms!",
            vp.tick_interval
        ));
    }
    if vp.smoothing_window < 1 {
        return Err(InputValueError).context("smoothing_window must be at least equal to one!");
    }
    if !(0.0 < vp.max_curvature && vp.max_curvature <= 1.0) {
        return Err(InputValueError)
            .context("max_curvature is not within the required range (0.0, 1.0]!");
    }
    if vp.acceleration_rate <= 0.0 {
        return Err(InputValueError).context("acceleration_rate must be positive!");
    }
    if vp.base_deceleration_rate <= 0.0 {
        return Err(InputValueError).context("base_deceleration_rate must be positive!");
    }
    if vp.max_deceleration_rate < vp.base_deceleration_rate {
        return Err(InputValueError)
            .context("max_deceleration_rate must not be less than base_deceleration_rate!");
    }
    if !(0.0 < vp.curve_look_ahead && vp.curve_look_ahead < 1.0) {
        return Err(InputValueError)
            .context("curve_look_ahead is not within the required range (0.0, 1.0)!");
    }
    if !(0.0 < vp.curve_preparation_distance && vp.curve_preparation_distance < 1.0) {
        return Err(InputValueError)
            .context("curve_preparation_distance is not within the required range (0.0, 1.0)!");
    }
    if !(0.0 < vp.finish_preparation_distance && vp.finish_preparation_distance < 1.0) {
        return Err(InputValueError)
            .context("finish_preparation_distance is not within the required range (0.0, 1.0)!");
    }
    if !(0.0 < vp.min_finish_speed && vp.min_finish_speed <= 1.0) {
        return Err(InputValueError)
            .context("min_finish_speed is not within the required range (0.0, 1.0]!");
    }
    if vp.wheel_turn_speed <= 0.0 {
        return Err(InputValueError).context("wheel_turn_speed must be positive!");
    }
    if !(0.0 < vp.max_wheel_angle && vp.max_wheel_angle < FRAC_PI_2) {
        return Err(InputValueError)
            .context("max_wheel_angle is not within the required range (0.0, pi/2)!");
    }
    if vp.wheelbase <= 0.0 {
        return Err(InputValueError).context("wheelbase must be positive!");
    }
    if vp.skid_turn_rate_multiplier <= 0.0 {
        return Err(InputValueError).context("skid_turn_rate_multiplier must be positive!");
    }
    if vp.width <= 0.0 || vp.length <= 0.0 {
        return Err(InputValueError).context("Vehicle width and length must be positive!");
    }

    // GAMEPLAY ------------------------------------------------------------------------------------
    let gp = &run_pars.gameplay_pars;

    if gp.score_threshold <= 0.0 {
        return Err(InputValueError).context("score_threshold must be positive!");
    }
    if gp.score_points <= 0.0 {
        return Err(InputValueError).context("score_points must be positive!");
    }
    if gp.max_path_length_factor < 1.0 {
        return Err(InputValueError)
            .context("max_path_length_factor must be at least equal to 1.0!");
    }

    Ok(())
}
