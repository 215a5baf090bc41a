use std::{path::Path, time::Duration};

use anyhow::{bail, Context as _};

use super::{
    harness::{Failure, Harness},
    normalize::Tolerance,
    testcase::{load_testcases, TestCase},
    verdict::{judge_one, TestReport},
};

/// Fully resolved command lines of one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scripts {
    pub pre: Option<String>,
    pub main: String,
    pub post: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ScriptStage {
    #[strum(serialize = "pre-script")]
    Pre,
    #[strum(serialize = "post-script")]
    Post,
}

/// Receives progress of a judging run.
pub trait Reporter {
    fn on_script_start(&mut self, _stage: ScriptStage, _cmd: &str) {}
    fn on_script_finish(&mut self, _stage: ScriptStage) {}

    fn on_test_start(&mut self, _testcase: &TestCase) {}
    fn on_verdict(&mut self, testcase: &TestCase, report: &TestReport);
    fn on_finish(&mut self, _reports: &[TestReport]) {}

    fn on_interactive_start(&mut self, _cmd: &str) {}
    fn on_interactive_finish(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct Judge {
    harness: Harness,
    time_limit: Duration,
    tolerance: Tolerance,
}

impl Judge {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(2);
    pub const SCRIPT_TIME_LIMIT: Duration = Duration::from_secs(60);

    pub fn new(harness: Harness) -> Self {
        Self {
            harness,
            time_limit: Self::DEFAULT_TIME_LIMIT,
            tolerance: Tolerance::default(),
        }
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Judges the main script against every sample test in `testcase_dir`.
    ///
    /// Per-test failures (WA, TLE, RE) are reported and the run goes on;
    /// fixture errors, script failures and a main script that cannot be
    /// spawned abort the run.
    pub async fn run<R>(
        &self,
        scripts: &Scripts,
        testcase_dir: impl AsRef<Path>,
        reporter: &mut R,
    ) -> anyhow::Result<Vec<TestReport>>
    where
        R: Reporter + ?Sized,
    {
        if let Some(cmd) = &scripts.pre {
            self.run_script(ScriptStage::Pre, cmd, reporter).await?;
        }

        let testcases = load_testcases(&testcase_dir).context("Failed to load sample tests")?;

        log::info!("Running: {}", scripts.main);
        let mut reports = Vec::with_capacity(testcases.len());
        for t in &testcases {
            reporter.on_test_start(t);
            let outcome = self
                .harness
                .execute(&scripts.main, &t.input, self.time_limit)
                .await;
            if let Some(Failure::SpawnError(msg)) = &outcome.failure {
                bail!("Cannot run '{}': {}", scripts.main, msg);
            }
            let report = judge_one(t, &outcome, &self.tolerance, self.time_limit);
            log::debug!(
                "Test #{} ({}.in): {:?} in {}ms",
                t.index,
                t.fixture_id,
                outcome.failure,
                outcome.elapsed.as_millis()
            );
            reporter.on_verdict(t, &report);
            reports.push(report);
        }
        reporter.on_finish(&reports);

        if let Some(cmd) = &scripts.post {
            self.run_script(ScriptStage::Post, cmd, reporter).await?;
        }
        Ok(reports)
    }

    /// Runs the main script once, attached to the terminal. No verdict is given.
    pub async fn run_interactive<R>(
        &self,
        scripts: &Scripts,
        reporter: &mut R,
    ) -> anyhow::Result<()>
    where
        R: Reporter + ?Sized,
    {
        if let Some(cmd) = &scripts.pre {
            self.run_script(ScriptStage::Pre, cmd, reporter).await?;
        }

        reporter.on_interactive_start(&scripts.main);
        let status = self.harness.execute_attached(&scripts.main).await?;
        reporter.on_interactive_finish();
        if !status.success() {
            log::warn!("'{}' exited with {}", scripts.main, status);
        }

        if let Some(cmd) = &scripts.post {
            self.run_script(ScriptStage::Post, cmd, reporter).await?;
        }
        Ok(())
    }

    async fn run_script<R>(
        &self,
        stage: ScriptStage,
        cmd: &str,
        reporter: &mut R,
    ) -> anyhow::Result<()>
    where
        R: Reporter + ?Sized,
    {
        reporter.on_script_start(stage, cmd);
        let outcome = self
            .harness
            .execute(cmd, "", Self::SCRIPT_TIME_LIMIT)
            .await;
        reporter.on_script_finish(stage);

        if !outcome.stdout.is_empty() {
            log::debug!("{} stdout:\n{}", stage, outcome.stdout.trim_end());
        }
        match outcome.failure {
            None => Ok(()),
            Some(Failure::Timeout) => bail!(
                "{} timed out after {}s: {}",
                stage,
                Self::SCRIPT_TIME_LIMIT.as_secs(),
                cmd
            ),
            Some(Failure::NonZeroExit { code: Some(code) }) => {
                bail!("{} failed with exit code {}: {}", stage, code, cmd)
            }
            Some(Failure::NonZeroExit { code: None }) => {
                bail!("{} terminated by signal: {}", stage, cmd)
            }
            Some(Failure::SpawnError(msg)) => bail!("{} could not be started: {}", stage, msg),
        }
    }
}
