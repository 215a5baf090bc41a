use std::time::Duration;

use super::{
    harness::{ExecutionOutcome, Failure},
    normalize::{normalize, Tolerance},
    testcase::TestCase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
pub enum Verdict {
    #[strum(serialize = "AC")]
    Accepted,
    #[strum(serialize = "WA")]
    WrongAnswer,
    #[strum(serialize = "TLE")]
    TimeLimitExceeded,
    #[strum(serialize = "RE")]
    RuntimeError,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Result of judging one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub index: usize,
    pub fixture_id: u64,
    pub verdict: Verdict,
    pub elapsed: Duration,
    /// Normalized stdout of the program.
    pub actual: String,
    /// Normalized expected output.
    pub expected: String,
}

/// Decides the verdict of one execution. Time limit wins over runtime error,
/// which wins over the output comparison.
pub fn classify(
    outcome: &ExecutionOutcome,
    expected: &str,
    tol: &Tolerance,
    time_limit: Duration,
) -> Verdict {
    if outcome.elapsed >= time_limit || outcome.failure == Some(Failure::Timeout) {
        return Verdict::TimeLimitExceeded;
    }
    match outcome.failure {
        Some(Failure::NonZeroExit { .. } | Failure::SpawnError(_)) => Verdict::RuntimeError,
        Some(Failure::Timeout) => Verdict::TimeLimitExceeded,
        None if normalize(&outcome.stdout, tol) == normalize(expected, tol) => Verdict::Accepted,
        None => Verdict::WrongAnswer,
    }
}

pub fn judge_one(
    testcase: &TestCase,
    outcome: &ExecutionOutcome,
    tol: &Tolerance,
    time_limit: Duration,
) -> TestReport {
    TestReport {
        index: testcase.index,
        fixture_id: testcase.fixture_id,
        verdict: classify(outcome, &testcase.expected_output, tol, time_limit),
        elapsed: outcome.elapsed,
        actual: normalize(&outcome.stdout, tol),
        expected: normalize(&testcase.expected_output, tol),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(2);

    fn outcome(ms: u64, stdout: &str, failure: Option<Failure>) -> ExecutionOutcome {
        ExecutionOutcome {
            elapsed: Duration::from_millis(ms),
            stdout: stdout.to_owned(),
            failure,
        }
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Accepted.to_string(), "AC");
        assert_eq!(Verdict::WrongAnswer.to_string(), "WA");
        assert_eq!(Verdict::TimeLimitExceeded.to_string(), "TLE");
        assert_eq!(Verdict::RuntimeError.to_string(), "RE");
    }

    #[test]
    fn accepted_modulo_tolerance() {
        let tol = Tolerance {
            case_insensitive: true,
            float_digits: 2,
        };
        let out = outcome(12, "YES\r\n3.14159\n", None);
        assert_eq!(classify(&out, "yes\n3.14\n", &tol, LIMIT), Verdict::Accepted);
    }

    #[test]
    fn wrong_answer() {
        let out = outcome(12, "4\n", None);
        assert_eq!(classify(&out, "5\n", &Tolerance::default(), LIMIT), Verdict::WrongAnswer);
    }

    #[test]
    fn time_limit_has_priority() {
        let tol = Tolerance::default();
        let out = outcome(2000, "5\n", None);
        assert_eq!(classify(&out, "5\n", &tol, LIMIT), Verdict::TimeLimitExceeded);

        let out = outcome(2000, "", Some(Failure::NonZeroExit { code: Some(1) }));
        assert_eq!(classify(&out, "5\n", &tol, LIMIT), Verdict::TimeLimitExceeded);

        let out = outcome(100, "", Some(Failure::Timeout));
        assert_eq!(classify(&out, "5\n", &tol, LIMIT), Verdict::TimeLimitExceeded);
    }

    #[test]
    fn runtime_error_ignores_output() {
        let tol = Tolerance::default();
        let out = outcome(5, "5\n", Some(Failure::NonZeroExit { code: Some(3) }));
        assert_eq!(classify(&out, "5\n", &tol, LIMIT), Verdict::RuntimeError);

        let out = outcome(0, "", Some(Failure::SpawnError("nope".into())));
        assert_eq!(classify(&out, "", &tol, LIMIT), Verdict::RuntimeError);
    }

    #[test]
    fn report_carries_normalized_texts() {
        let tc = TestCase {
            index: 1,
            fixture_id: 7,
            input: "1 2\n".into(),
            expected_output: "3 \n".into(),
        };
        let report = judge_one(&tc, &outcome(20, "4\r\n", None), &Tolerance::default(), LIMIT);
        assert_eq!(report.verdict, Verdict::WrongAnswer);
        assert_eq!((report.index, report.fixture_id), (1, 7));
        assert_eq!(report.actual, "4");
        assert_eq!(report.expected, "3");
        assert_eq!(report.elapsed, Duration::from_millis(20));
    }
}
