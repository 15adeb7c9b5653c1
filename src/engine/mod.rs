pub mod hold;
pub mod scramble;
pub mod stats;
pub mod stopwatch;
