use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::serdable::GlobPattern;
use crate::testing::Tolerance;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    #[serde(default)]
    pub test: TestConfig,
    #[serde(default, rename = "template")]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// seconds
    pub time_limit: f64,
    pub ignore_case: bool,
    pub float_digits: u32,
    pub shell: Option<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            time_limit: 2.0,
            ignore_case: false,
            float_digits: 10,
            shell: None,
        }
    }
}

impl TestConfig {
    pub fn time_limit(&self) -> anyhow::Result<Duration> {
        Duration::try_from_secs_f64(self.time_limit)
            .with_context(|| format!("Invalid time limit: {}", self.time_limit))
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            case_insensitive: self.ignore_case,
            float_digits: self.float_digits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    pub alias: String,
    pub pattern: GlobPattern,
    pub pre_script: Option<String>,
    pub script: String,
    pub post_script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub interval_ms: u64,
    pub budget_secs: Option<u64>,
    pub submissions: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            budget_secs: None,
            submissions: 5,
        }
    }
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget_secs.map(Duration::from_secs)
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "cfkit.toml";

    pub fn example_toml() -> String {
        match Asset::get(Self::FILENAME) {
            Some(file) => String::from_utf8_lossy(file.data.as_ref()).into_owned(),
            None => String::new(),
        }
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let cur_dir = cur_dir.as_ref();
        cur_dir
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
            .with_context(|| {
                format!(
                    "Not in a cfkit workspace: Cannot find '{}' (run `cf init` to create one)",
                    Self::FILENAME
                )
            })
    }

    pub fn from_file_finding_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_filepath = Config::find_file_in_ancestors(cur_dir)?;
        Self::from_toml_file(config_filepath)
    }

    /// Writes the example config into `dir` unless one already exists there.
    pub fn init_with_example(dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let path = dir.as_ref().join(Self::FILENAME);
        anyhow::ensure!(
            !path.exists(),
            "'{}' already exists",
            path.to_string_lossy()
        );
        fsutil::write_with_mkdir(&path, Self::example_toml())?;
        Ok(path)
    }

    /// Templates whose pattern matches the file name of `source_file`, in config order.
    pub fn find_templates_for(&self, source_file: impl AsRef<Path>) -> Vec<&Template> {
        let Some(filename) = source_file.as_ref().file_name() else {
            return Vec::new();
        };
        let filename = filename.to_string_lossy();
        self.templates
            .iter()
            .filter(|t| t.pattern.matches(&filename))
            .collect()
    }

    /// Files directly inside `dir` that some template can test.
    pub fn find_source_files(&self, dir: impl AsRef<Path>) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for t in &self.templates {
            for name in fsutil::list_filenames_matching(&dir, &t.pattern)? {
                let path = PathBuf::from(name);
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}
