use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Best/worst/averages. A missing or non-positive value means there is not
/// enough data yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub best: Option<f64>,
    #[serde(default)]
    pub worst: Option<f64>,
    #[serde(default)]
    pub avg5: Option<f64>,
    #[serde(default)]
    pub avg12: Option<f64>,
}

pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("{v:.2}s"),
        _ => "--".to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveTime {
    pub secs: f64,
    pub finished_at: DateTime<Local>,
}

/// One row of the recent-times list. `ordinal` counts from the oldest solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecentTime {
    pub ordinal: usize,
    pub secs: f64,
    pub finished_at: DateTime<Local>,
}

/// Times recorded since the program started. Independent of the backend.
#[derive(Clone, Debug, Default)]
pub struct SessionTimes {
    times: Vec<SolveTime>,
}

impl SessionTimes {
    pub fn push(&mut self, secs: f64) {
        self.times.push(SolveTime {
            secs,
            finished_at: Local::now(),
        });
    }

    pub fn clear(&mut self) {
        self.times.clear();
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.iter().map(|t| t.secs)
    }

    pub fn last(&self) -> Option<f64> {
        self.times.last().map(|t| t.secs)
    }

    /// The last `limit` solves, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<RecentTime> {
        let total = self.times.len();
        self.times
            .iter()
            .rev()
            .take(limit)
            .enumerate()
            .map(|(index, t)| RecentTime {
                ordinal: total - index,
                secs: t.secs,
                finished_at: t.finished_at,
            })
            .collect()
    }

    pub fn best(&self) -> Option<f64> {
        self.times().reduce(f64::min)
    }

    pub fn worst(&self) -> Option<f64> {
        self.times().reduce(f64::max)
    }

    /// Mean of the last `n` times, or `None` with fewer than `n`.
    pub fn average_of(&self, n: usize) -> Option<f64> {
        if n == 0 || self.times.len() < n {
            return None;
        }
        let window = &self.times[self.times.len() - n..];
        Some(window.iter().map(|t| t.secs).sum::<f64>() / n as f64)
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            best: self.best(),
            worst: self.worst(),
            avg5: self.average_of(5),
            avg12: self.average_of(12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(times: &[f64]) -> SessionTimes {
        let mut s = SessionTimes::default();
        for &t in times {
            s.push(t);
        }
        s
    }

    #[test]
    fn test_empty_session_has_no_data() {
        let s = SessionTimes::default();
        assert!(s.recent(DEFAULT_RECENT_LIMIT).is_empty());
        assert_eq!(s.summary(), StatsSummary::default());
    }

    #[test]
    fn test_best_and_worst_bound_every_time() {
        let s = session(&[12.5, 9.81, 15.02, 11.0, 10.4]);
        let best = s.best().unwrap();
        let worst = s.worst().unwrap();
        assert_eq!(best, 9.81);
        assert_eq!(worst, 15.02);
        for t in s.times() {
            assert!(best <= t && t <= worst);
        }
    }

    #[test]
    fn test_average_needs_enough_samples() {
        let s = session(&[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(s.average_of(5), None);
        assert_eq!(s.average_of(12), None);
    }

    #[test]
    fn test_average_uses_most_recent_window() {
        let s = session(&[100.0, 10.0, 11.0, 12.0, 13.0, 14.0]);
        let avg5 = s.average_of(5).unwrap();
        assert!((avg5 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg12() {
        let times: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let s = session(&times);
        assert!((s.summary().avg12.unwrap() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_recent_is_newest_first_with_ordinals() {
        let times: Vec<f64> = (1..=14).map(|i| i as f64).collect();
        let s = session(&times);
        let recent = s.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].ordinal, 14);
        assert_eq!(recent[0].secs, 14.0);
        assert_eq!(recent[9].ordinal, 5);
        assert_eq!(recent[9].secs, 5.0);
    }

    #[test]
    fn test_clear_empties_and_resets_summary() {
        let mut s = session(&[8.0, 9.0]);
        s.clear();
        assert!(s.is_empty());
        assert!(s.recent(10).is_empty());
        assert_eq!(s.best(), None);
        assert_eq!(s.worst(), None);
    }

    #[test]
    fn test_format_stat_sentinels() {
        assert_eq!(format_stat(None), "--");
        assert_eq!(format_stat(Some(0.0)), "--");
        assert_eq!(format_stat(Some(3.47)), "3.47s");
    }

    #[test]
    fn test_summary_deserializes_nulls_and_missing_fields() {
        let json = r#"{"best": 9.5, "worst": null, "avg5": 0}"#;
        let summary: StatsSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.best, Some(9.5));
        assert_eq!(summary.worst, None);
        assert_eq!(summary.avg5, Some(0.0));
        assert_eq!(summary.avg12, None);
        assert_eq!(format_stat(summary.avg5), "--");
    }
}
