use serde::{Deserialize, Serialize};
use strum::Display;

/// Lifecycle state reported alongside every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// The monitor was reset and no progress has been reported yet.
    #[default]
    Ready,

    /// At least one progress update arrived since the last reset.
    Running,

    /// The worker reported an error.
    Error,

    /// The worker finished and its result is attached to the record.
    Completed,
}

/// Immutable point-in-time copy of a monitor's progress.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current: u64,

    /// Total amount of work, 0 when unknown.
    pub total: u64,

    /// Always derived from `current` and `total`, in the range `0..=100`.
    pub percentage: f64,

    pub description: String,
    pub status: Status,
}

impl ProgressSnapshot {
    /// Build a snapshot, deriving the percentage from `current` and `total`.
    #[must_use]
    pub fn new(current: u64, total: u64, description: impl Into<String>, status: Status) -> Self {
        Self {
            current,
            total,
            percentage: percentage(current, total),
            description: description.into(),
            status,
        }
    }

    /// The snapshot of a freshly reset monitor.
    #[must_use]
    pub fn ready() -> Self {
        Self::new(0, 0, String::new(), Status::Ready)
    }

    /// Returns a copy of this snapshot with a different status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Compute `100 * current / total`, or 0 when the total is unknown.
///
/// Overshooting the total reports 100.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "progress counts stay far below 2^52 in practice")]
pub fn percentage(current: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (current as f64 / total as f64 * 100.0).min(100.0)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_with_known_total() {
        for total in [1_u64, 3, 7, 100, 1_000_003] {
            for current in [0, 1, total / 2, total] {
                let expected = 100.0 * current as f64 / total as f64;
                assert!((percentage(current, total) - expected).abs() < 1e-9, "{current}/{total}");
            }
        }
    }

    #[test]
    fn test_percentage_with_unknown_total_is_zero() {
        assert!(percentage(0, 0).abs() < f64::EPSILON);
        assert!(percentage(42, 0).abs() < f64::EPSILON);
        assert!(percentage(u64::MAX, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_overshoot_is_clamped() {
        assert!((percentage(150, 100) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ready_snapshot() {
        let snapshot = ProgressSnapshot::ready();
        assert_eq!(snapshot.current, 0);
        assert_eq!(snapshot.total, 0);
        assert!(snapshot.percentage.abs() < f64::EPSILON);
        assert_eq!(snapshot.status, Status::Ready);
        assert!(snapshot.description.is_empty());
    }

    #[test]
    fn test_status_display_is_lowercase() {
        assert_eq!(Status::Ready.to_string(), "ready");
        assert_eq!(Status::Running.to_string(), "running");
        assert_eq!(Status::Error.to_string(), "error");
        assert_eq!(Status::Completed.to_string(), "completed");
    }

    #[test]
    fn test_snapshot_serializes_as_flat_mapping() {
        let snapshot = ProgressSnapshot::new(1, 4, "pages", Status::Running);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["current"], 1);
        assert_eq!(json["total"], 4);
        assert_eq!(json["percentage"], 25.0);
        assert_eq!(json["description"], "pages");
        assert_eq!(json["status"], "running");
    }
}
