use std::io::Write;

use colored::Colorize as _;
use indicatif::ProgressBar;

use super::{
    judge::{Reporter, ScriptStage},
    testcase::TestCase,
    verdict::{TestReport, Verdict},
};
use crate::{interactive, style, watch::LiveRender};

/// Prints the judging progress for a human: a verdict line per test on
/// stdout, a diff for each wrong answer on stderr and a closing summary.
///
/// Nothing is drawn while a test runs. The program's stderr goes straight to
/// the terminal, so a line drawn before it ran could not be erased safely.
pub struct ConsoleReporter<'a, W: Write> {
    live: &'a mut LiveRender<W>,
    spinner: Option<ProgressBar>,
}

impl<'a, W: Write> ConsoleReporter<'a, W> {
    pub fn new(live: &'a mut LiveRender<W>) -> Self {
        Self {
            live,
            spinner: None,
        }
    }

    fn render(&mut self, text: &str) {
        self.live
            .render(text)
            .unwrap_or_else(|e| log::warn!("Failed to write to terminal: {}", e));
    }
}

impl<W: Write> Reporter for ConsoleReporter<'_, W> {
    fn on_script_start(&mut self, stage: ScriptStage, cmd: &str) {
        log::info!("{}: {}", stage, cmd);
        if !self.live.is_plain() {
            self.spinner = Some(interactive::spinner(format!("Running {} ...", stage)));
        }
    }

    fn on_script_finish(&mut self, _stage: ScriptStage) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn on_test_start(&mut self, _testcase: &TestCase) {
        self.live.begin();
    }

    fn on_verdict(&mut self, testcase: &TestCase, report: &TestReport) {
        self.render(&style::verdict_line(report));
        if report.verdict == Verdict::WrongAnswer {
            eprintln!(
                "{}",
                style::wrong_answer_detail(&testcase.input, &report.actual, &report.expected)
            );
        }
    }

    fn on_finish(&mut self, reports: &[TestReport]) {
        self.live.begin();
        self.render(&style::test_summary(reports));
    }

    fn on_interactive_start(&mut self, cmd: &str) {
        log::info!("Running: {}", cmd);
        eprintln!("{}", "-----Judge begins-----".green().bold());
    }

    fn on_interactive_finish(&mut self) {
        eprintln!("\n{}", "-----Judge closed-----".green().bold());
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    fn report(index: usize, verdict: Verdict) -> TestReport {
        TestReport {
            index,
            fixture_id: index as u64,
            verdict,
            elapsed: Duration::from_millis(7),
            actual: "1".into(),
            expected: if verdict == Verdict::WrongAnswer { "2" } else { "1" }.into(),
        }
    }

    fn testcase(index: usize) -> TestCase {
        TestCase {
            index,
            fixture_id: index as u64,
            input: "0\n".into(),
            expected_output: "1\n".into(),
        }
    }

    #[test]
    fn plain_mode_prints_one_line_per_test() {
        colored::control::set_override(false);
        let mut live = LiveRender::new(Vec::new(), true);
        {
            let mut reporter = ConsoleReporter::new(&mut live);
            let reports = [report(0, Verdict::Accepted), report(1, Verdict::TimeLimitExceeded)];
            for r in &reports {
                let t = testcase(r.index);
                reporter.on_test_start(&t);
                reporter.on_verdict(&t, r);
            }
            reporter.on_finish(&reports);
        }
        let out = String::from_utf8(live.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3, "{}", out);
        assert!(lines[0].starts_with("#0: AC"), "{}", lines[0]);
        assert!(lines[1].starts_with("#1: TLE"), "{}", lines[1]);
        assert!(lines[2].contains("1/2 tests failed"), "{}", lines[2]);
    }

    #[test]
    fn verdicts_never_erase_lines_above() {
        colored::control::set_override(false);
        let mut live = LiveRender::new(Vec::new(), false);
        {
            let mut reporter = ConsoleReporter::new(&mut live);
            let reports = [report(0, Verdict::Accepted), report(1, Verdict::RuntimeError)];
            for r in &reports {
                let t = testcase(r.index);
                reporter.on_test_start(&t);
                // the program's stderr would land here
                reporter.on_verdict(&t, r);
            }
            reporter.on_finish(&reports);
        }
        let out = String::from_utf8(live.into_inner()).unwrap();
        assert!(!out.contains('\x1b'), "{:?}", out);
        assert_eq!(out.lines().count(), 3, "{}", out);
    }
}
