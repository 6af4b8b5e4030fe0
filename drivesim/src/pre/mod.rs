pub mod check_run_opts_pars;
pub mod read_run_pars;
pub mod run_opts;
