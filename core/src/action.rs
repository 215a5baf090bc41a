pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use cfkit_webclient::{CodeforcesClient, ProblemRef};
use error::*;

use crate::config::{Config, Template};
use crate::interactive;
use crate::placeholder::Placeholders;
use crate::style;
use crate::testing::{ConsoleReporter, Judge, Scripts, TestReport};
use crate::watch::{LiveRender, PollOutcome, Poller, StatusSource};

pub fn init_workspace(dir: impl AsRef<Path>) -> Result<PathBuf> {
    Config::init_with_example(dir).context("Failed to init cfkit workspace")
}

/// The file to test: `explicit` if given, otherwise the single file in `dir`
/// matched by some template (the user is asked when there are several).
pub fn select_source_file(
    cfg: &Config,
    dir: &Path,
    explicit: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(file) = explicit {
        ensure!(file.is_file(), "No such file: {}", file.to_string_lossy());
        return Ok(file.to_owned());
    }
    let files = cfg
        .find_source_files(dir)
        .context("Failed to find source files")?;
    let chosen = interactive::select_one("Source file", &files, |p| {
        p.to_string_lossy().into_owned()
    })?;
    chosen.map(|p| dir.join(p)).with_context(|| {
        format!(
            "No source files found in {} (no file matches any `[[template]]` pattern)",
            dir.to_string_lossy()
        )
    })
}

/// The template to test `source_file` with, by alias or by pattern match.
pub fn select_template<'c>(
    cfg: &'c Config,
    source_file: &Path,
    alias: Option<&str>,
) -> Result<&'c Template> {
    if let Some(alias) = alias {
        return cfg
            .templates
            .iter()
            .find(|t| t.alias == alias)
            .with_context(|| format!("No template named '{}'", alias));
    }
    let candidates = cfg.find_templates_for(source_file);
    let chosen = interactive::select_one("Template", &candidates, |t| {
        format!("{} ({})", t.alias, t.pattern)
    })?;
    chosen.copied().with_context(|| {
        format!(
            "Unconfigured template for '{}' (No `[[template]]` pattern matched)",
            source_file.to_string_lossy()
        )
    })
}

pub fn resolve_scripts(template: &Template, vars: &Placeholders) -> Result<Scripts> {
    let resolve = |script: &str| {
        vars.resolve(script)
            .with_context(|| {
                format!("Invalid script in template '{}': {}", template.alias, script)
            })
    };
    Ok(Scripts {
        pre: template.pre_script.as_deref().map(resolve).transpose()?,
        main: resolve(&template.script)?,
        post: template.post_script.as_deref().map(resolve).transpose()?,
    })
}

pub async fn do_test<W: Write>(
    judge: &Judge,
    scripts: &Scripts,
    testcase_dir: impl AsRef<Path>,
    live: &mut LiveRender<W>,
) -> Result<Vec<TestReport>> {
    let mut reporter = ConsoleReporter::new(live);
    judge.run(scripts, testcase_dir, &mut reporter).await
}

pub async fn do_custom_test<W: Write>(
    judge: &Judge,
    scripts: &Scripts,
    live: &mut LiveRender<W>,
) -> Result<()> {
    let mut reporter = ConsoleReporter::new(live);
    judge.run_interactive(scripts, &mut reporter).await
}

pub async fn watch_submissions<S, W, C>(
    poller: &Poller,
    source: &mut S,
    live: &mut LiveRender<W>,
    cancel: C,
) -> Result<PollOutcome>
where
    S: StatusSource + ?Sized,
    W: Write,
    C: Future<Output = ()>,
{
    let outcome = poller
        .run(source, live, style::status_table, cancel)
        .await?;
    match outcome {
        PollOutcome::Settled => log::debug!("All verdicts are final"),
        PollOutcome::Cancelled => log::info!("Stopped watching"),
        PollOutcome::BudgetExhausted => log::warn!("Gave up waiting for the final verdict"),
    }
    Ok(outcome)
}

pub async fn show_problem_standings(
    cli: &CodeforcesClient,
    target: &ProblemRef,
    handle: &str,
) -> Result<String> {
    let mut problems = cli
        .fetch_problem_standings(target, handle)
        .await
        .with_context(|| {
            format!("Failed to fetch solve status of contest {}", target.contest)
        })?;
    if let Some(index) = &target.index {
        problems.retain(|p| p.index.eq_ignore_ascii_case(index));
    }
    Ok(style::standings_table(&problems))
}
