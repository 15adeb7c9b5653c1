pub mod input;
pub mod solve;
pub mod timer;
