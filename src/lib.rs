pub mod cli;
pub mod discovery;
pub mod errors;
pub mod runner;
pub mod runtime;
pub mod utils;
