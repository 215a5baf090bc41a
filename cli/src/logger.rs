use std::io::Write as _;

use cfkit_core::style::ColorTheme as _;
use colored::Colorize as _;
use env_logger::Env;

/// Logs to stderr as `[LEVEL] message`, coloured by level.
/// The filter defaults to `info` and can be changed with `RUST_LOG`.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "{} {}",
                format!("[{}]", level).color(level.color()).bold(),
                record.args()
            )
        })
        .init();
}
