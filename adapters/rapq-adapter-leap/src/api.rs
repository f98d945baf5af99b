//! Leap Solver API (SAPI) client.
//!
//! This module implements the subset of the SAPI v2 REST API the adapter
//! needs:
//! - Listing remote solvers and their properties
//! - Submitting a constrained quadratic model
//! - Polling problem status and fetching the answer
//! - Cancelling a pending problem
//!
//! Models travel inline as JSON (`data.format = "json"`).

use std::fmt;
use std::time::Duration;

use rapq_cqm::ConstrainedQuadraticModel;
use reqwest::{Client, Response, StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::error::{LeapError, LeapResult};

/// Default SAPI endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://na-west-1.cloud.dwavesys.com/sapi/v2";

/// Default hybrid CQM solver.
pub const DEFAULT_SOLVER: &str = "hybrid_constrained_quadratic_model_version1p";

/// Authentication header expected by SAPI.
const AUTH_HEADER: &str = "x-auth-token";

/// User-Agent sent with requests.
const USER_AGENT: &str = concat!("rapq/", env!("CARGO_PKG_VERSION"));

/// Leap SAPI client.
pub struct LeapClient {
    /// HTTP client with the auth header preset.
    client: Client,
    /// API endpoint URL, without trailing slash.
    endpoint: String,
}

impl fmt::Debug for LeapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeapClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl LeapClient {
    /// Create a client for an endpoint with an API token.
    pub fn new(endpoint: impl Into<String>, token: &str) -> LeapResult<Self> {
        if token.trim().is_empty() {
            return Err(LeapError::MissingToken);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::HeaderName::from_static(AUTH_HEADER),
            header::HeaderValue::from_str(token).map_err(|_| LeapError::InvalidToken)?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self { client, endpoint })
    }

    /// API endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List remote solvers.
    pub async fn list_solvers(&self) -> LeapResult<Vec<SolverInfo>> {
        let url = format!("{}/solvers/remote/", self.endpoint);
        let response = self.client.get(&url).send().await?;
        let response = check(response, None).await?;
        Ok(response.json().await?)
    }

    /// Fetch one solver by name.
    pub async fn get_solver(&self, name: &str) -> LeapResult<SolverInfo> {
        let url = format!("{}/solvers/remote/{}/", self.endpoint, name);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LeapError::SolverUnavailable(name.to_string()));
        }
        let response = check(response, None).await?;
        Ok(response.json().await?)
    }

    /// Submit a model and return the initial problem status.
    pub async fn submit_problem(
        &self,
        solver: &str,
        label: &str,
        cqm: &ConstrainedQuadraticModel,
        time_limit: Option<f64>,
    ) -> LeapResult<ProblemStatus> {
        let url = format!("{}/problems/", self.endpoint);
        let body = [Submission {
            solver,
            label,
            problem_type: "cqm",
            data: ProblemData {
                format: "json",
                data: cqm,
            },
            params: ProblemParams { time_limit },
        }];

        let response = self.client.post(&url).json(&body).send().await?;
        let response = check(response, None).await?;

        let mut statuses: Vec<ProblemStatus> = response.json().await?;
        if statuses.is_empty() {
            return Err(LeapError::ApiError {
                status: 200,
                message: "submission returned no problem".into(),
            });
        }
        Ok(statuses.swap_remove(0))
    }

    /// Get the status of a problem.
    pub async fn problem_status(&self, id: &str) -> LeapResult<ProblemStatus> {
        let url = format!("{}/problems/{}/", self.endpoint, id);
        let response = self.client.get(&url).send().await?;
        let response = check(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    /// Get the answer of a completed problem.
    pub async fn answer(&self, id: &str) -> LeapResult<Answer> {
        let url = format!("{}/problems/{}/answer/", self.endpoint, id);
        let response = self.client.get(&url).send().await?;
        let response = check(response, Some(id)).await?;
        let body: AnswerResponse = response.json().await?;
        Ok(body.answer)
    }

    /// Cancel a pending problem.
    pub async fn cancel_problem(&self, id: &str) -> LeapResult<()> {
        let url = format!("{}/problems/{}/", self.endpoint, id);
        let response = self.client.delete(&url).send().await?;
        check(response, Some(id)).await?;
        Ok(())
    }
}

/// Turn a non-success response into an error.
async fn check(response: Response, problem_id: Option<&str>) -> LeapResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = problem_id {
            return Err(LeapError::ProblemNotFound(id.to_string()));
        }
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error_msg)
        .unwrap_or(body);

    Err(LeapError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// Error body returned by SAPI.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(alias = "error_message")]
    error_msg: String,
}

/// One entry of a problem submission.
#[derive(Debug, Serialize)]
struct Submission<'a> {
    solver: &'a str,
    label: &'a str,
    #[serde(rename = "type")]
    problem_type: &'a str,
    data: ProblemData<'a>,
    params: ProblemParams,
}

/// Inline problem payload.
#[derive(Debug, Serialize)]
struct ProblemData<'a> {
    format: &'a str,
    data: &'a ConstrainedQuadraticModel,
}

/// Solver parameters.
#[derive(Debug, Serialize)]
struct ProblemParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    time_limit: Option<f64>,
}

/// A remote solver as listed by SAPI.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverInfo {
    /// Solver name.
    pub id: String,
    /// `ONLINE` or `OFFLINE`.
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Solver properties.
    #[serde(default)]
    pub properties: SolverProperties,
}

impl SolverInfo {
    /// Whether the solver reports itself online.
    pub fn is_online(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case("ONLINE"))
    }

    /// Whether the solver accepts constrained quadratic models.
    pub fn supports_cqm(&self) -> bool {
        self.properties
            .supported_problem_types
            .iter()
            .any(|t| t == "cqm")
    }
}

/// Properties of a remote solver.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolverProperties {
    /// Solver family (`hybrid`, `qpu`, ...).
    #[serde(default)]
    pub category: Option<String>,
    /// Problem types the solver accepts.
    #[serde(default)]
    pub supported_problem_types: Vec<String>,
    /// Maximum variables per problem.
    #[serde(default)]
    pub maximum_number_of_variables: Option<usize>,
    /// Maximum constraints per problem.
    #[serde(default)]
    pub maximum_number_of_constraints: Option<usize>,
    /// `(num_variables, seconds)` breakpoints of the minimum time limit.
    #[serde(default)]
    pub minimum_time_limit: Vec<(f64, f64)>,
}

impl SolverProperties {
    /// Minimum time limit in seconds for a model of `num_variables`.
    ///
    /// Linear interpolation between breakpoints, clamped at both ends.
    pub fn min_time_limit(&self, num_variables: usize) -> Option<f64> {
        let points = &self.minimum_time_limit;
        let (first, last) = (points.first()?, points.last()?);
        let n = num_variables as f64;

        if n <= first.0 {
            return Some(first.1);
        }
        if n >= last.0 {
            return Some(last.1);
        }
        points.windows(2).find_map(|w| {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            (n >= x0 && n <= x1).then(|| {
                if x1 > x0 {
                    y0 + (y1 - y0) * (n - x0) / (x1 - x0)
                } else {
                    y1
                }
            })
        })
    }
}

/// Problem status as reported by SAPI.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemStatus {
    /// Problem id.
    pub id: String,
    /// `PENDING`, `IN_PROGRESS`, `COMPLETED`, `FAILED` or `CANCELLED`.
    pub status: String,
    /// Solver the problem runs on.
    #[serde(default)]
    pub solver: Option<String>,
    /// Problem label.
    #[serde(default)]
    pub label: Option<String>,
    /// Submission timestamp.
    #[serde(default)]
    pub submitted_on: Option<String>,
    /// Completion timestamp.
    #[serde(default)]
    pub solved_on: Option<String>,
    /// Failure reason.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ProblemStatus {
    /// Check if the problem is still waiting for the solver.
    pub fn is_pending(&self) -> bool {
        self.status.eq_ignore_ascii_case("PENDING")
    }

    /// Check if the problem completed.
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("COMPLETED")
    }

    /// Check if the problem failed.
    pub fn is_failed(&self) -> bool {
        self.status.eq_ignore_ascii_case("FAILED")
    }

    /// Check if the problem was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("CANCELLED")
    }
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    answer: Answer,
}

/// Answer of a completed problem in JSON sample-set form.
///
/// `samples[i][j]` is the value of `variables[j]` in sample `i`.
#[derive(Debug, Clone, Deserialize)]
pub struct Answer {
    /// Answer encoding, always `"json"` here.
    #[serde(default)]
    pub format: Option<String>,
    /// Variable labels, column order of `samples`.
    pub variables: Vec<String>,
    /// Sample rows.
    pub samples: Vec<Vec<u8>>,
    /// Energy per sample.
    #[serde(default)]
    pub energies: Vec<f64>,
    /// Occurrences per sample.
    #[serde(default)]
    pub num_occurrences: Vec<u32>,
    /// Feasibility per sample.
    #[serde(default)]
    pub is_feasible: Vec<bool>,
    /// Solver timing and metadata.
    #[serde(default)]
    pub info: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug_redacts_token() {
        let client = LeapClient::new("https://sapi.example.com/", "DEV-secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("DEV-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(client.endpoint(), "https://sapi.example.com");
    }

    #[test]
    fn test_client_rejects_empty_token() {
        assert!(matches!(
            LeapClient::new(DEFAULT_ENDPOINT, "  "),
            Err(LeapError::MissingToken)
        ));
    }

    #[test]
    fn test_parse_solver_info() {
        let json = r#"{
            "id": "hybrid_constrained_quadratic_model_version1p",
            "status": "ONLINE",
            "description": "Hybrid CQM solver",
            "properties": {
                "category": "hybrid",
                "supported_problem_types": ["cqm"],
                "maximum_number_of_variables": 500000,
                "maximum_number_of_constraints": 100000,
                "minimum_time_limit": [[1, 5.0], [1024, 5.0], [100000, 20.0]]
            }
        }"#;
        let info: SolverInfo = serde_json::from_str(json).unwrap();
        assert!(info.is_online());
        assert!(info.supports_cqm());
        assert_eq!(info.properties.maximum_number_of_variables, Some(500_000));
        assert_eq!(info.properties.min_time_limit(4), Some(5.0));
    }

    #[test]
    fn test_min_time_limit_interpolates() {
        let props = SolverProperties {
            minimum_time_limit: vec![(0.0, 5.0), (100.0, 15.0)],
            ..SolverProperties::default()
        };
        assert_eq!(props.min_time_limit(50), Some(10.0));
        assert_eq!(props.min_time_limit(1000), Some(15.0));
        assert_eq!(SolverProperties::default().min_time_limit(10), None);
    }

    #[test]
    fn test_parse_problem_status() {
        let json = r#"{"id": "p-1", "status": "FAILED", "error_message": "bad model"}"#;
        let status: ProblemStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_failed());
        assert!(!status.is_completed());
        assert_eq!(status.error_message.as_deref(), Some("bad model"));
    }

    #[test]
    fn test_parse_answer() {
        let json = r#"{"answer": {
            "format": "json",
            "variables": ["a", "b"],
            "samples": [[1, 0], [0, 1]],
            "energies": [-1.0, -2.0],
            "num_occurrences": [3, 1],
            "is_feasible": [true, false],
            "info": {"run_time": 5000000}
        }}"#;
        let body: AnswerResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.answer.variables, vec!["a", "b"]);
        assert_eq!(body.answer.samples.len(), 2);
        assert_eq!(body.answer.num_occurrences, vec![3, 1]);
        assert!(body.answer.info.contains_key("run_time"));
    }

    #[test]
    fn test_submission_body_shape() {
        let cqm = ConstrainedQuadraticModel::new();
        let body = [Submission {
            solver: DEFAULT_SOLVER,
            label: "RAP",
            problem_type: "cqm",
            data: ProblemData {
                format: "json",
                data: &cqm,
            },
            params: ProblemParams { time_limit: None },
        }];
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value[0]["type"], "cqm");
        assert_eq!(value[0]["label"], "RAP");
        assert_eq!(value[0]["data"]["format"], "json");
        assert!(value[0]["params"].get("time_limit").is_none());
    }
}
