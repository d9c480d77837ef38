//! Result shapes of the Codeforces API methods the services use.
//!
//! Field names follow the upstream's camelCase JSON. Unknown fields are ignored so new
//! upstream attributes never break decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verdict the upstream reports for a submission that failed to compile.
pub const COMPILATION_ERROR_VERDICT: &str = "COMPILATION_ERROR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub contest_id: Option<i64>,
    #[serde(default)]
    pub problemset_name: Option<String>,
    pub index: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Problem {
    /// Identifier such as `1850A`, or just the index for problems without a contest.
    pub fn id(&self) -> String {
        match self.contest_id {
            Some(contest_id) => format!("{}{}", contest_id, self.index),
            None => self.index.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatistics {
    #[serde(default)]
    pub contest_id: Option<i64>,
    pub index: String,
    pub solved_count: i64,
}

/// Result of `problemset.problems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problemset {
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub problem_statistics: Vec<ProblemStatistics>,
}

/// One entry of `contest.ratingChanges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub contest_id: i64,
    pub contest_name: String,
    pub handle: String,
    pub rank: i64,
    pub rating_update_time_seconds: i64,
    pub old_rating: i32,
    pub new_rating: i32,
}

impl RatingChange {
    pub fn delta(&self) -> i32 {
        self.new_rating - self.old_rating
    }
}

/// One entry of `user.status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    #[serde(default)]
    pub contest_id: Option<i64>,
    pub creation_time_seconds: i64,
    pub problem: Problem,
    #[serde(default)]
    pub programming_language: Option<String>,
    /// Absent while the submission is still in the queue.
    #[serde(default)]
    pub verdict: Option<String>,
}

impl Submission {
    pub fn is_compilation_error(&self) -> bool {
        self.verdict.as_deref() == Some(COMPILATION_ERROR_VERDICT)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.creation_time_seconds, 0)
    }
}

/// One entry of `contest.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub phase: String,
    #[serde(default)]
    pub frozen: bool,
    pub duration_seconds: i64,
    #[serde(default)]
    pub start_time_seconds: Option<i64>,
    #[serde(default)]
    pub relative_time_seconds: Option<i64>,
}

impl Contest {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time_seconds
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
    }

    /// Contest has not started yet.
    pub fn is_upcoming(&self) -> bool {
        self.phase == "BEFORE"
    }
}

/// One entry of `user.info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub handle: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub max_rating: Option<i32>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub max_rank: Option<String>,
}
