/// Comparison knobs applied to both actual and expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    pub case_insensitive: bool,
    /// Number of fractional digits that decimal tokens are rounded to.
    pub float_digits: u32,
}

impl Tolerance {
    /// Larger `float_digits` are treated as this many.
    pub const MAX_FLOAT_DIGITS: u32 = 30;
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            float_digits: 10,
        }
    }
}

/// Canonical form of a program output. Two outputs are judged equal
/// exactly when their normalized forms are byte-equal.
///
/// - surrounding whitespace of the text and of each line is dropped
///   (so `\r\n` and `\n` compare equal)
/// - the text is lowercased when `case_insensitive` is set
/// - every space-separated token that parses as a finite decimal number is
///   rounded to `float_digits` places, with trailing zeros removed
pub fn normalize(text: &str, tol: &Tolerance) -> String {
    let text = text.trim();
    let lowered;
    let text = if tol.case_insensitive {
        lowered = text.to_lowercase();
        lowered.as_str()
    } else {
        text
    };

    let float_digits = tol.float_digits.min(Tolerance::MAX_FLOAT_DIGITS);
    text.lines()
        .map(|line| {
            line.trim()
                .split(' ')
                .map(|token| normalize_token(token, float_digits))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_token(token: &str, float_digits: u32) -> String {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => format_rounded(v, float_digits as usize),
        _ => token.to_owned(),
    }
}

fn format_rounded(v: f64, digits: usize) -> String {
    let mut s = format!("{:.*}", digits, v);
    if s.contains('.') {
        let trimmed_len = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed_len);
    }
    if s == "-0" {
        s = "0".to_owned();
    }
    s
}
