use std::time::Duration;

use chrono::{Local, TimeZone as _};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{error::*, http, model::*};

pub const DEFAULT_HOST: &str = "https://codeforces.com";

const API_REQUEST_INTERVAL: Duration = Duration::from_millis(1000);
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

//---------------------------------------------------------
// Raw API objects (https://codeforces.com/apiHelp/objects)

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "OK")]
    Ok { result: T },
    #[serde(rename = "FAILED")]
    Failed { comment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmission {
    pub id: u64,
    pub creation_time_seconds: i64,
    pub problem: ApiProblem,
    pub programming_language: String,
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub testset: Option<String>,
    #[serde(default)]
    pub passed_test_count: u32,
    #[serde(default)]
    pub time_consumed_millis: u64,
    #[serde(default)]
    pub memory_consumed_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProblem {
    pub index: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStandings {
    pub problems: Vec<ApiProblem>,
    pub rows: Vec<ApiRanklistRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRanklistRow {
    pub problem_results: Vec<ApiProblemResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProblemResult {
    pub points: f64,
    pub rejected_attempt_count: u32,
    #[serde(default)]
    pub best_submission_time_seconds: Option<i64>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self, requested_url: &str) -> Result<T> {
        match self {
            ApiResponse::Ok { result } => Ok(result),
            ApiResponse::Failed { comment } => Err(Error::ApiFailed {
                comment,
                requested_url: requested_url.to_owned(),
            }),
        }
    }
}

impl ApiSubmission {
    /// The judge has not finished with this submission yet.
    pub fn is_waiting(&self) -> bool {
        matches!(self.verdict.as_deref(), None | Some("TESTING"))
    }

    /// Human readable verdict, in the wording of the submission page.
    pub fn verdict_text(&self) -> String {
        let on_test = |s: &str| format!("{} on test {}", s, self.passed_test_count + 1);
        let Some(verdict) = self.verdict.as_deref() else {
            return "In queue".to_owned();
        };
        match verdict {
            "OK" if self.testset.as_deref() == Some("PRETESTS") => "Pretests passed".to_owned(),
            "OK" => "Accepted".to_owned(),
            "TESTING" if self.passed_test_count == 0 => "In queue".to_owned(),
            "TESTING" => on_test("Running"),
            "WRONG_ANSWER" => on_test("Wrong answer"),
            "TIME_LIMIT_EXCEEDED" => on_test("Time limit exceeded"),
            "MEMORY_LIMIT_EXCEEDED" => on_test("Memory limit exceeded"),
            "RUNTIME_ERROR" => on_test("Runtime error"),
            "IDLENESS_LIMIT_EXCEEDED" => on_test("Idleness limit exceeded"),
            "PRESENTATION_ERROR" => on_test("Presentation error"),
            "COMPILATION_ERROR" => "Compilation error".to_owned(),
            "CHALLENGED" => "Hacked".to_owned(),
            "SKIPPED" => "Skipped".to_owned(),
            "PARTIAL" => "Partial result".to_owned(),
            "CRASHED" | "FAILED" | "INPUT_PREPARATION_CRASHED" => {
                "Denial of judgement".to_owned()
            }
            other => other.replace('_', " ").to_lowercase(),
        }
    }

    pub fn into_submission(self) -> Submission {
        let when = Local
            .timestamp_opt(self.creation_time_seconds, 0)
            .single()
            .unwrap_or_else(Local::now);
        Submission {
            id: self.id,
            when,
            verdict: self.verdict_text(),
            is_waiting: self.is_waiting(),
            problem_index: self.problem.index,
            problem_name: self.problem.name,
            lang: self.programming_language,
            time_ms: self.time_consumed_millis,
            memory_bytes: self.memory_consumed_bytes,
        }
    }
}

impl ApiStandings {
    /// Per-problem state of the first (only) requested party.
    pub fn into_problem_standings(self, handle: &str) -> Result<Vec<ProblemStanding>> {
        let Some(row) = self.rows.into_iter().next() else {
            return Err(Error::NotParticipated(handle.to_owned()));
        };
        Ok(self
            .problems
            .into_iter()
            .zip(row.problem_results)
            .map(|(problem, res)| {
                let state = if res.points > 0.0 {
                    SolveState::Accepted
                } else if res.rejected_attempt_count > 0 {
                    SolveState::Rejected
                } else {
                    SolveState::Untried
                };
                ProblemStanding {
                    index: problem.index,
                    name: problem.name,
                    state,
                    rejected_attempts: res.rejected_attempt_count,
                }
            })
            .collect())
    }
}

//---------------------------------------------------------

pub struct CodeforcesClient {
    http: http::Client,
    host: Url,
}

impl CodeforcesClient {
    pub fn new(host: &str) -> Result<Self> {
        let host = Url::parse(host).map_err(|e| Error::InvalidSyntaxUrl {
            url: host.to_owned(),
            source: e,
        })?;
        let api_glob = http::UrlGlob::new(&format!(
            "{}api/*",
            http::UrlGlob::escape(host.as_str())
        ))?;
        Ok(Self {
            http: http::Client::new(HTTP_TIMEOUT, [(api_glob, API_REQUEST_INTERVAL)]),
            host,
        })
    }

    fn api_url(&self, method: &str) -> Result<Url> {
        self.host
            .join(&format!("api/{}", method))
            .map_err(|e| Error::InvalidSyntaxUrl {
                url: method.to_owned(),
                source: e,
            })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.api_url(method)?;
        let resp = self.http.get(url.clone()).query(query).send().await?;

        // The API answers FAILED with 400, so the body is decoded regardless of status.
        let status = resp.status();
        let body = resp.text().await?;
        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(res) => res.into_result(url.as_str()),
            Err(_) if !status.is_success() => Err(Error::UnexpectedResponseCode {
                got: status,
                requested_url: url.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Latest submissions of `handle` in the contest, newest first.
    /// When `target.index` is set only that problem's submissions are kept.
    pub async fn fetch_submissions(
        &self,
        target: &ProblemRef,
        handle: &str,
        count: usize,
    ) -> Result<Vec<Submission>> {
        // Fetch a wider window when filtering by problem so that `count` rows survive.
        let window = if target.index.is_some() {
            count.max(1) * 10
        } else {
            count.max(1)
        };
        let subs: Vec<ApiSubmission> = self
            .call(
                "contest.status",
                &[
                    ("contestId", target.contest.to_string()),
                    ("handle", handle.to_owned()),
                    ("from", "1".to_owned()),
                    ("count", window.to_string()),
                ],
            )
            .await?;
        Ok(filter_submissions(subs, target, count))
    }

    pub async fn fetch_problem_standings(
        &self,
        target: &ProblemRef,
        handle: &str,
    ) -> Result<Vec<ProblemStanding>> {
        let standings: ApiStandings = self
            .call(
                "contest.standings",
                &[
                    ("contestId", target.contest.to_string()),
                    ("handles", handle.to_owned()),
                    ("showUnofficial", "true".to_owned()),
                ],
            )
            .await?;
        standings.into_problem_standings(handle)
    }
}

pub fn filter_submissions(
    subs: Vec<ApiSubmission>,
    target: &ProblemRef,
    count: usize,
) -> Vec<Submission> {
    subs.into_iter()
        .filter(|s| match &target.index {
            Some(index) => s.problem.index.eq_ignore_ascii_case(index),
            None => true,
        })
        .take(count)
        .map(ApiSubmission::into_submission)
        .collect()
}
