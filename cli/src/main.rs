use clap::Clap;
use drivesim::post::run_result::RunResult;
use drivesim::pre::check_run_opts_pars::check_run_opts_pars;
use drivesim::pre::read_run_pars::read_run_pars;
use drivesim::pre::run_opts::RunOpts;
use rayon::prelude::*;
use std::thread;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get run options from the command line arguments and read run parameters
    let run_opts: RunOpts = RunOpts::parse();
    let mut run_pars = read_run_pars(run_opts.parfile_path.as_path())?;

    // apply the smoothing window override if inserted
    if let Some(smoothing_window) = run_opts.smoothing_window {
        run_pars.vehicle_pars.smoothing_window = smoothing_window;
    }

    // check run options and parameters
    check_run_opts_pars(&run_opts, &run_pars)?;

    // create vector for the run results and simulate attempt(s)
    let mut run_results: Vec<RunResult> =
        Vec::with_capacity(run_pars.course_pars.attempts.len());

    // print run details
    println!(
        "INFO: Simulating {} attempt(s) on course {} with a tick interval of {:.1}ms",
        run_pars.course_pars.attempts.len(),
        run_pars.course_pars.name,
        run_pars.vehicle_pars.tick_interval
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if !run_opts.realtime {
        // NON-REAL-TIME CASE ----------------------------------------------------------------------
        let t_start = Instant::now();

        if run_pars.course_pars.attempts.len() == 1 {
            // SINGLE THREAD -----------------------------------------------------------------------
            run_results.push(
                drivesim::core::handle_run::handle_run(
                    &run_pars,
                    &run_pars.course_pars.attempts[0],
                    run_opts.debug,
                    None,
                    1.0,
                )
                .unwrap(),
            );
        } else {
            // MULTIPLE THREADS --------------------------------------------------------------------
            run_results.par_extend(run_pars.course_pars.attempts.par_iter().map(|attempt| {
                drivesim::core::handle_run::handle_run(&run_pars, attempt, false, None, 1.0)
                    .unwrap()
            }));
        }

        println!(
            "INFO: Execution time (total): {}ms",
            t_start.elapsed().as_millis()
        );
    } else {
        // REAL-TIME CASE --------------------------------------------------------------------------
        // create channel for communication between the host output and the simulation
        let (tx, rx) = flume::unbounded();

        // create a separate thread for the simulation (executed in real-time) -> run_opts and
        // run_pars get moved and must therefore be copied to be still available afterwards
        let run_opts_thread = run_opts.clone();
        let run_pars_thread = run_pars.clone();

        let handle = thread::spawn(move || {
            drivesim::core::handle_run::handle_run(
                &run_pars_thread,
                &run_pars_thread.course_pars.attempts[0],
                run_opts_thread.debug,
                Some(&tx),
                run_opts_thread.realtime_factor,
            )
        });

        // consume the streamed run states in the main thread
        for run_state in rx.iter() {
            println!(
                "INFO: Progress {:5.1}%, speed {:.2} px/tick, fuel left {:5.1}%{}",
                run_state.progress * 100.0,
                run_state.vehicle.speed,
                run_state.remaining_fuel_frac * 100.0,
                if run_state.vehicle.is_skidding {
                    ", skidding!"
                } else {
                    ""
                }
            );
        }

        run_results.push(
            handle
                .join()
                .expect("Simulation thread panicked!")?,
        );
    }

    // POST-PROCESSING -----------------------------------------------------------------------------
    // print results
    for run_result in run_results.iter() {
        run_result.print_summary();
    }

    Ok(())
}
