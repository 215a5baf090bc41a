use std::collections::BTreeMap;

use cfkit_webclient::{ProblemStanding, SolveState};
use colored::{Color, ColoredString, Colorize};

use crate::{
    testing::{TestReport, Verdict},
    watch::StatusBoard,
};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                Accepted => Color::Green,
                WrongAnswer => Color::Red,
                TimeLimitExceeded => Color::Yellow,
                RuntimeError => Color::Magenta,
            };
        }

        match self {
            Accepted => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            WrongAnswer => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
            TimeLimitExceeded => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            RuntimeError => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
        }
    }
}

pub fn verdict_icon(verdict: Verdict) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", verdict)
        .on_color(verdict.color())
        .bold()
        .color(fg)
}

/// `#3: WA .... 12ms`
pub fn verdict_line(report: &TestReport) -> String {
    format!(
        "#{}: {} .... {}ms",
        report.index,
        report.verdict.to_string().color(report.verdict.color()).bold(),
        report.elapsed.as_millis()
    )
}

pub fn test_summary(reports: &[TestReport]) -> String {
    let bar = "-".repeat(5);

    let count: BTreeMap<Verdict, usize> = reports.iter().fold(BTreeMap::new(), |mut count, r| {
        *count.entry(r.verdict).or_default() += 1;
        count
    });

    let num_total_test = reports.len();
    let num_passed = *count.get(&Verdict::Accepted).unwrap_or(&0);
    let num_failed = num_total_test - num_passed;

    let body = if num_passed == num_total_test {
        format!("All {} tests passed ✨", num_total_test)
            .green()
            .to_string()
    } else {
        let summary_msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_total_test)
        } else {
            format!("All {} tests failed 💀", num_total_test)
        };

        let detail_msg = count
            .iter()
            .filter(|(&verdict, _)| !verdict.is_accepted())
            .map(|(&verdict, &cnt)| {
                format!(
                    "{}{}{}",
                    self::verdict_icon(verdict),
                    "x".dimmed(),
                    cnt.to_string().bold().bright_white(),
                )
            })
            .collect::<Vec<String>>()
            .join(", ");

        format!("{} ({})", summary_msg.bright_red(), detail_msg)
    };

    format!("{} {} {}", bar, body, bar)
}

fn header(s: &str) -> ColoredString {
    s.blue().underline()
}

/// The input of a failed test followed by the actual and expected outputs side by side.
pub fn wrong_answer_detail(input: &str, actual: &str, expected: &str) -> String {
    format!(
        "{}\n{}\n{}",
        header("Input"),
        input.trim_end(),
        diff_table(actual, expected)
    )
}

/// Two-column `Actual Output | Expected Output` table, one row per line.
/// The shorter side is padded with blank rows.
pub fn diff_table(actual: &str, expected: &str) -> String {
    let mut left: Vec<&str> = actual.split('\n').collect();
    let mut right: Vec<&str> = expected.split('\n').collect();
    let rows = left.len().max(right.len());
    left.resize(rows, "");
    right.resize(rows, "");

    let mut table = Table::new(&["Actual Output", "Expected Output"]);
    for (l, r) in left.into_iter().zip(right) {
        table.add_row(vec![Cell::plain(l), Cell::plain(r)]);
    }
    table.render()
}

/// "Wrong answer on test 3" -> "WA on test 3", coloured by outcome.
pub fn compact_verdict(verdict: &str) -> (String, Option<Color>) {
    let compact = verdict
        .replace("Wrong answer", "WA")
        .replace("Time limit exceeded", "TLE")
        .replace("Memory limit exceeded", "MLE");

    let color = if compact.starts_with("TLE") {
        Some(Color::Yellow)
    } else if compact.starts_with("MLE") || compact.starts_with("WA") {
        Some(Color::Red)
    } else if compact.starts_with("Accepted") || compact.starts_with("Pretests passed") {
        Some(Color::Green)
    } else {
        None
    };
    (compact, color)
}

pub fn status_table(board: &StatusBoard) -> String {
    let mut table = Table::new(&["#", "When", "Name", "Lang", "Verdict", "Time", "Memory"])
        .max_col_width(20);
    for row in &board.rows {
        let (verdict, color) = compact_verdict(&row.verdict_text);
        table.add_row(vec![
            Cell::plain(&row.id.to_string()),
            Cell::plain(&row.when.format("%b/%d/%Y %H:%M").to_string()),
            Cell::plain(&row.problem),
            Cell::plain(&row.lang),
            Cell {
                text: verdict,
                color,
            },
            Cell::plain(&format!("{} ms", row.time_ms)),
            Cell::plain(&format!("{} KB", row.memory_kb)),
        ]);
    }
    table.render()
}

pub fn standings_table(problems: &[ProblemStanding]) -> String {
    let mut table = Table::new(&["#", "Name", "  ", "Count"]).max_col_width(40);
    for p in problems {
        let (state, color) = match p.state {
            SolveState::Accepted => ("AC", Some(Color::Green)),
            SolveState::Rejected => ("RE", Some(Color::Red)),
            SolveState::Untried => ("NA", None),
        };
        let count = match p.rejected_attempts {
            0 => String::new(),
            n => format!("-{}", n),
        };
        table.add_row(vec![
            Cell::plain(&p.index),
            Cell::plain(&p.name),
            Cell {
                text: state.to_owned(),
                color,
            },
            Cell::plain(&count),
        ]);
    }
    table.render()
}

struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            color: None,
        }
    }
}

/// Left-aligned text table with ` | ` between columns.
/// Widths are computed on the uncoloured text.
struct Table {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
    max_col_width: usize,
}

impl Table {
    const SEPARATOR: &str = " | ";

    fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
            max_col_width: usize::MAX,
        }
    }

    fn max_col_width(mut self, width: usize) -> Self {
        self.max_col_width = width;
        self
    }

    fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn truncate(&self, s: &str) -> String {
        if s.chars().count() <= self.max_col_width {
            s.to_owned()
        } else {
            let mut t: String = s.chars().take(self.max_col_width.saturating_sub(3)).collect();
            t.push_str("...");
            t
        }
    }

    fn render(&self) -> String {
        let rows: Vec<Vec<(String, Option<Color>)>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| (self.truncate(&c.text), c.color))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (i, (text, _)) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(text.chars().count());
                }
            }
        }

        let pad = |s: &str, width: usize| {
            let n = width.saturating_sub(s.chars().count());
            format!("{}{}", s, " ".repeat(n))
        };
        let is_last = |i: usize| i + 1 == widths.len();

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(
            self.header
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let rest = if is_last(i) { 0 } else { widths[i] - h.chars().count() };
                    format!("{}{}", header(h), " ".repeat(rest))
                })
                .collect::<Vec<_>>()
                .join(Self::SEPARATOR),
        );
        for row in &rows {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, (text, color))| {
                    let padded = if is_last(i) {
                        text.clone()
                    } else {
                        pad(text, widths[i])
                    };
                    match color {
                        Some(c) => padded.color(*c).to_string(),
                        None => padded,
                    }
                })
                .collect::<Vec<_>>()
                .join(Self::SEPARATOR);
            lines.push(line.trim_end().to_owned());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use chrono::TimeZone as _;

    use super::*;
    use crate::watch::RemoteStatus;

    fn uncolored<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn diff_table_pads_shorter_side() {
        let table = uncolored(|| diff_table("1\n2\n3", "1\n2"));
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(
            lines,
            [
                "Actual Output | Expected Output",
                "1             | 1",
                "2             | 2",
                "3             |",
            ]
        );

        let table = uncolored(|| diff_table("", "a\nb"));
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn verdict_line_format() {
        let report = TestReport {
            index: 3,
            fixture_id: 4,
            verdict: Verdict::WrongAnswer,
            elapsed: Duration::from_millis(12),
            actual: String::new(),
            expected: String::new(),
        };
        assert_eq!(uncolored(|| verdict_line(&report)), "#3: WA .... 12ms");
    }

    #[test]
    fn summary_counts_failures() {
        let report = |verdict| TestReport {
            index: 0,
            fixture_id: 0,
            verdict,
            elapsed: Duration::ZERO,
            actual: String::new(),
            expected: String::new(),
        };
        let all_ok = uncolored(|| test_summary(&[report(Verdict::Accepted)]));
        assert!(all_ok.contains("All 1 tests passed"));

        let mixed = uncolored(|| {
            test_summary(&[
                report(Verdict::Accepted),
                report(Verdict::WrongAnswer),
                report(Verdict::WrongAnswer),
            ])
        });
        assert!(mixed.contains("2/3 tests failed"), "{}", mixed);
        assert!(mixed.contains(" WA x2"), "{}", mixed);

        let none = uncolored(|| test_summary(&[report(Verdict::RuntimeError)]));
        assert!(none.contains("All 1 tests failed"));
    }

    #[test]
    fn verdicts_are_compacted() {
        assert_eq!(
            compact_verdict("Wrong answer on test 3"),
            ("WA on test 3".to_owned(), Some(Color::Red))
        );
        assert_eq!(
            compact_verdict("Time limit exceeded on test 12"),
            ("TLE on test 12".to_owned(), Some(Color::Yellow))
        );
        assert_eq!(
            compact_verdict("Memory limit exceeded on test 1"),
            ("MLE on test 1".to_owned(), Some(Color::Red))
        );
        assert_eq!(compact_verdict("Accepted").1, Some(Color::Green));
        assert_eq!(compact_verdict("Running on test 5").1, None);
    }

    #[test]
    fn status_table_lists_rows() {
        let board = StatusBoard {
            rows: vec![RemoteStatus {
                id: 200000002,
                when: chrono::Local.with_ymd_and_hms(2023, 11, 14, 22, 13, 0).unwrap(),
                problem: "B - A rather long problem name".into(),
                lang: "Rust 2021".into(),
                verdict_text: "Wrong answer on test 3".into(),
                is_waiting: false,
                time_ms: 124,
                memory_kb: 1000,
            }],
        };
        let table = uncolored(|| status_table(&board));
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#         | When"), "{}", lines[0]);
        assert!(lines[1].contains("Nov/14/2023 22:13"));
        assert!(lines[1].contains("B - A rather long..."));
        assert!(lines[1].contains("WA on test 3"));
        assert!(lines[1].ends_with("124 ms | 1000 KB"));
    }

    #[test]
    fn standings_table_marks_states() {
        let problems = [
            ProblemStanding {
                index: "A".into(),
                name: "Alpha".into(),
                state: SolveState::Accepted,
                rejected_attempts: 0,
            },
            ProblemStanding {
                index: "B".into(),
                name: "Beta".into(),
                state: SolveState::Rejected,
                rejected_attempts: 2,
            },
        ];
        let table = uncolored(|| standings_table(&problems));
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[1], "A | Alpha | AC |");
        assert_eq!(lines[2], "B | Beta  | RE | -2");
    }
}
