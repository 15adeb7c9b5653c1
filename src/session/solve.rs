use serde::{Deserialize, Serialize};

/// A completed solve as it is sent to the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRecord {
    pub puzzle_type: String,
    pub scramble: String,
    pub time: f64,
}

impl SolveRecord {
    pub fn new(puzzle_type: &str, scramble: &str, time: f64) -> Self {
        Self {
            puzzle_type: puzzle_type.to_string(),
            scramble: scramble.to_string(),
            time,
        }
    }
}
