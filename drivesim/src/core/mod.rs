pub mod curvature;
pub mod drift;
pub mod fuel;
pub mod handle_run;
pub mod step;
pub mod vehicle;
