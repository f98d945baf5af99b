//! Job lifecycle types.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                  │           │
//!                  │           ├──→ Failed(reason)
//!                  │           │
//!                  └───────────┴──→ Cancelled
//! ```
//!
//! Transitions only move forward and terminal states are permanent. A
//! [`Job`] records when each transition happened so the timings can travel
//! with the sample set that answers it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Waiting for the solver.
    Queued,
    /// Being solved.
    Running,
    /// Answer available.
    Completed,
    /// Solver rejected or aborted the problem.
    Failed(String),
    /// Cancelled before completion.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Check if the job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A submitted problem and its timeline.
#[derive(Debug, Clone)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Problem label supplied at submission.
    pub label: String,
    /// Solver the problem went to.
    pub solver: String,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// First time the job was seen running.
    pub started_at: Option<DateTime<Utc>>,
    /// Time the job reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Record a fresh submission.
    pub fn submitted(id: JobId, label: impl Into<String>, solver: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            label: label.into(),
            solver: solver.into(),
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Move to `status`, stamping start and finish times.
    ///
    /// Ignored once the job is terminal. Jumping straight to a terminal
    /// state also stamps the start.
    pub fn advance(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        let now = Utc::now();
        if status != JobStatus::Queued && self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if status.is_terminal() {
            self.finished_at = Some(now);
        }
        self.status = status;
    }

    /// Wall-clock time from submission to completion, in milliseconds.
    pub fn turnaround_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|done| (done - self.submitted_at).num_milliseconds())
    }

    /// Job metadata as sample-set info entries.
    pub fn info(&self) -> serde_json::Map<String, serde_json::Value> {
        let stamp = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut info = serde_json::Map::new();
        info.insert("job_id".into(), self.id.0.clone().into());
        info.insert("solver".into(), self.solver.clone().into());
        info.insert("submitted_at".into(), stamp(self.submitted_at).into());
        if let Some(t) = self.finished_at {
            info.insert("finished_at".into(), stamp(t).into());
        }
        if let Some(ms) = self.turnaround_ms() {
            info.insert("turnaround_ms".into(), ms.into());
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::submitted(JobId::new("job-123"), "RAP", "exact")
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("error".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_advance_stamps_times() {
        let mut job = job();
        assert!(job.started_at.is_none());

        job.advance(JobStatus::Running);
        assert!(job.started_at.is_some());
        assert!(job.finished_at.is_none());

        job.advance(JobStatus::Completed);
        assert!(job.finished_at.is_some());
        assert!(job.turnaround_ms().is_some_and(|ms| ms >= 0));
    }

    #[test]
    fn test_terminal_is_permanent() {
        let mut job = job();
        job.advance(JobStatus::Completed);
        let finished = job.finished_at;
        job.advance(JobStatus::Cancelled);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.finished_at, finished);
        assert!(job.started_at.is_some());
    }

    #[test]
    fn test_info_entries() {
        let mut job = job();
        let info = job.info();
        assert_eq!(info["job_id"], serde_json::json!("job-123"));
        assert_eq!(info["solver"], serde_json::json!("exact"));
        assert!(!info.contains_key("finished_at"));

        job.advance(JobStatus::Completed);
        let info = job.info();
        assert!(info["finished_at"].as_str().is_some_and(|s| s.ends_with('Z')));
        assert!(info.contains_key("turnaround_ms"));
    }
}
