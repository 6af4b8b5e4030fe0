use crate::core::fuel::FuelGauge;
use crate::core::step::{update_vehicle, StepOutcome};
use crate::core::vehicle::Vehicle;
use crate::interfaces::host_interface::{
    RunState, VehicleView, MAX_HOST_UPDATE_FREQUENCY,
};
use crate::post::run_result::{RunOutcome, RunResult};
use crate::post::score::calc_score;
use crate::pre::read_run_pars::RunPars;
use anyhow::Context;
use flume::Sender;
use helpers::geometry::Point2d;
use helpers::polyline::{hash_polyline, polyline_length, smooth};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// handle_run simulates one attempt on the inserted course and returns the result for
/// post-processing. The attempt path is smoothed before the run and the vehicle drives the
/// smoothed attempt; the reference path stays raw and keys the distance allowance, the score
/// baseline and the course fingerprint. If a sender is inserted, the run is simulated in
/// real-time and run states are streamed to the host.
pub fn handle_run(
    run_pars: &RunPars,
    attempt: &[Point2d],
    print_debug: bool,
    tx: Option<&Sender<RunState>>,
    realtime_factor: f64,
) -> anyhow::Result<RunResult> {
    let vehicle_pars = &run_pars.vehicle_pars;
    let gameplay_pars = &run_pars.gameplay_pars;

    let reference = &run_pars.course_pars.reference;
    let smoothed_attempt = smooth(attempt, vehicle_pars.smoothing_window);

    let mut gauge = FuelGauge::new(reference, gameplay_pars.max_path_length_factor);
    let mut vehicle = Vehicle::new(&smoothed_attempt);
    let mut no_ticks = 0u32;

    // check if sender was inserted -> in that case use real-time simulation for the host
    let sim_realtime = tx.is_some();

    let outcome;

    if !sim_realtime {
        // NORMAL SIMULATION ---------------------------------------------------------------------
        loop {
            let step_outcome = {
                let mut fuel_check =
                    |p: &Point2d, d: f64, phase: bool| gauge.check(p, d, phase);
                update_vehicle(&mut vehicle, &smoothed_attempt, vehicle_pars, &mut fuel_check)
            };
            no_ticks += 1;
            gauge.set_consumed(vehicle.fuel_consumed);

            match step_outcome {
                StepOutcome::Continuing => continue,
                StepOutcome::Finished => {
                    outcome = RunOutcome::Finished;
                    break;
                }
                StepOutcome::Stopped => {
                    outcome = RunOutcome::OutOfFuel;
                    break;
                }
            }
        }
    } else {
        // REAL-TIME SIMULATION ------------------------------------------------------------------
        let mut t_run_update_print = 0.0;
        let mut t_run_update_host = 0.0;

        loop {
            let t_start = Instant::now();

            let step_outcome = {
                let mut fuel_check =
                    |p: &Point2d, d: f64, phase: bool| gauge.check(p, d, phase);
                update_vehicle(&mut vehicle, &smoothed_attempt, vehicle_pars, &mut fuel_check)
            };
            no_ticks += 1;
            gauge.set_consumed(vehicle.fuel_consumed);

            let cur_runtime = f64::from(no_ticks) * vehicle_pars.tick_interval / 1000.0;

            // print status (with a maximum of 1 Hz)
            if cur_runtime > t_run_update_print + 0.9999 {
                println!(
                    "INFO: Simulating... Current run time is {:.3}s, current progress is {:.1}%",
                    cur_runtime,
                    vehicle.progress * 100.0
                );
                t_run_update_print = cur_runtime;
            }

            // update host
            if cur_runtime > t_run_update_host + 1.0 / MAX_HOST_UPDATE_FREQUENCY - 0.001 {
                let run_state = RunState {
                    vehicle: VehicleView {
                        position: vehicle.position.clone(),
                        heading: vehicle.heading,
                        wheel_angle: vehicle.wheel_angle,
                        speed: vehicle.speed,
                        is_skidding: vehicle.is_skidding,
                    },
                    progress: vehicle.progress.min(1.0),
                    remaining_fuel_frac: gauge.remaining_frac(),
                    no_trail_points: vehicle.trail().len(),
                    no_tire_marks: vehicle.tire_marks().len(),
                };

                tx.unwrap()
                    .send(run_state)
                    .context("Failed to send run state to host!")?;
                t_run_update_host = cur_runtime;
            }

            match step_outcome {
                StepOutcome::Continuing => {}
                StepOutcome::Finished => {
                    outcome = RunOutcome::Finished;
                    break;
                }
                StepOutcome::Stopped => {
                    outcome = RunOutcome::OutOfFuel;
                    break;
                }
            }

            // sleep until the tick is finished in real-time as well (calculation in ms)
            let t_sleep = (vehicle_pars.tick_interval / realtime_factor) as i64
                - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                println!("WARNING: Could not keep up with real-time!")
            }
        }
    }

    // print debug information if indicated
    if print_debug {
        println!(
            "DEBUG: Reference length is {:.1} px, smoothed attempt length is {:.1} px, \
            distance allowance is {:.1} px",
            polyline_length(reference),
            polyline_length(&smoothed_attempt),
            gauge.max_allowed()
        )
    }

    let score = match outcome {
        RunOutcome::Finished => calc_score(
            attempt,
            reference,
            gameplay_pars.score_threshold,
            gameplay_pars.score_points,
        ),
        RunOutcome::OutOfFuel => 0,
    };

    Ok(RunResult {
        course_name: run_pars.course_pars.name.to_owned(),
        course_id: hash_polyline(reference),
        outcome,
        score,
        fuel_consumed: vehicle.fuel_consumed,
        fuel_allowance: gauge.max_allowed(),
        no_ticks,
        no_trail_points: vehicle.trail().len(),
        no_tire_marks: vehicle.tire_marks().len(),
        attempt: attempt.to_vec(),
    })
}
