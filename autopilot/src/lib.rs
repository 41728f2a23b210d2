pub mod benchmark;
pub mod pilot;
pub mod runner;
pub mod util;
