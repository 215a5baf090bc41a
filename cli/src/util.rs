use std::{
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::Context as _;
use cfkit_webclient::{ProblemRef, Url};

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

pub fn replace_homedir_to_tilde(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let Some(home_dir) = ::dirs::home_dir() else {
        return path
    };
    path.strip_prefix(home_dir)
        .map(|path| Path::new("~").join(path))
        .unwrap_or(path)
}

/// `Error: <context>: <cause>: ...` on a single line.
pub fn error_line(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}

/// Contest (and problem) addressed by command line words: a URL, `<contest> [<problem>]`,
/// or nothing, in which case it is inferred from `cwd`.
pub fn resolve_target(words: &[String], cwd: &Path) -> anyhow::Result<ProblemRef> {
    match words {
        [] => ProblemRef::from_workspace_path(cwd).with_context(|| {
            format!(
                "No contest id given and none found in the current path '{}' \
                 (expected .../contest/<id>/<problem> or .../gym/<id>/<problem>)",
                replace_homedir_to_tilde(cwd).to_string_lossy()
            )
        }),
        [first, ..] if first.starts_with("http://") || first.starts_with("https://") => {
            let url = Url::parse(first).with_context(|| format!("Invalid URL: {}", first))?;
            Ok(ProblemRef::from_url(&url)?)
        }
        _ => Ok(ProblemRef::from_args(words)?),
    }
}
