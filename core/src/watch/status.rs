use async_trait::async_trait;
use cfkit_webclient::{CodeforcesClient, LocalDateTime, ProblemRef, Submission};

/// One remote submission as shown in the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStatus {
    pub id: u64,
    pub when: LocalDateTime,
    pub problem: String,
    pub lang: String,
    pub verdict_text: String,
    pub is_waiting: bool,
    pub time_ms: u64,
    pub memory_kb: u64,
}

impl From<Submission> for RemoteStatus {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            when: s.when,
            problem: format!("{} - {}", s.problem_index, s.problem_name),
            lang: s.lang,
            verdict_text: s.verdict,
            is_waiting: s.is_waiting,
            time_ms: s.time_ms,
            memory_kb: s.memory_bytes / 1024,
        }
    }
}

/// The result of one fetch: zero or more submissions, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBoard {
    pub rows: Vec<RemoteStatus>,
}

impl StatusBoard {
    /// True while any submission still awaits a final verdict.
    pub fn is_waiting(&self) -> bool {
        self.rows.iter().any(|r| r.is_waiting)
    }
}

#[async_trait]
pub trait StatusSource: Send {
    async fn fetch(&mut self) -> anyhow::Result<StatusBoard>;
}

/// Latest submissions of one user for a contest or a single problem.
pub struct SubmissionFeed {
    client: CodeforcesClient,
    target: ProblemRef,
    handle: String,
    count: usize,
}

impl SubmissionFeed {
    pub fn new(client: CodeforcesClient, target: ProblemRef, handle: &str, count: usize) -> Self {
        Self {
            client,
            target,
            handle: handle.to_owned(),
            count,
        }
    }
}

#[async_trait]
impl StatusSource for SubmissionFeed {
    async fn fetch(&mut self) -> anyhow::Result<StatusBoard> {
        let subs = self
            .client
            .fetch_submissions(&self.target, &self.handle, self.count)
            .await?;
        log::debug!("Fetched {} submissions of {}", subs.len(), self.handle);
        Ok(StatusBoard {
            rows: subs.into_iter().map(RemoteStatus::from).collect(),
        })
    }
}
