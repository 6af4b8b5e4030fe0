pub mod run_result;
pub mod score;
