use serde::Deserialize;
use std::{fs::File, io, path::PathBuf};

use anyhow::Context as _;
use cfkit_webclient::codeforces::DEFAULT_HOST;

use crate::{cmd::GlobalArgs, util};

pub const APP_NAME: &str = "cfkit-cli";

/// Per-user settings, read from `<config dir>/cfkit-cli/cfkit-cli.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default = "GlobalConfig::default_host")]
    pub host: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            handle: None,
            host: Self::default_host(),
        }
    }
}

impl GlobalConfig {
    pub const FILENAME: &str = "cfkit-cli.toml";

    pub fn filepath() -> Option<PathBuf> {
        let dir = dirs::config_dir()?;
        Some(dir.join(APP_NAME).join(Self::FILENAME))
    }

    fn default_host() -> String {
        DEFAULT_HOST.to_owned()
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn from_file_or_default() -> anyhow::Result<Self> {
        let Some(path) = Self::filepath() else {
            log::debug!("No user config dir; using default settings");
            return Ok(GlobalConfig::default());
        };
        let toml_str = match File::open(&path).and_then(io::read_to_string) {
            Ok(toml) => toml,
            _ => return Ok(GlobalConfig::default()),
        };
        Self::from_toml(&toml_str).with_context(|| {
            format!(
                "Invalid config '{}'",
                util::replace_homedir_to_tilde(&path).to_string_lossy()
            )
        })
    }

    pub fn with_args(mut self, args: &GlobalArgs) -> Self {
        let GlobalArgs {
            subcmd: _,
            handle,
            host,
        } = args;

        if let Some(h) = handle {
            self.handle = Some(h.clone());
        }
        if let Some(h) = host {
            self.host = h.clone();
        }
        self
    }

    pub fn from_file_and_args(args: &GlobalArgs) -> anyhow::Result<Self> {
        Ok(Self::from_file_or_default()?.with_args(args))
    }

    pub fn require_handle(&self) -> anyhow::Result<&str> {
        self.handle.as_deref().with_context(|| {
            format!(
                "Codeforces handle is not set: pass --handle or set `handle` in {}",
                Self::filepath()
                    .map(|p| util::replace_homedir_to_tilde(p).to_string_lossy().into_owned())
                    .unwrap_or_else(|| Self::FILENAME.to_owned())
            )
        })
    }
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn parse_and_override() {
        let cfg = GlobalConfig::from_toml(r#"handle = "tourist""#).unwrap();
        assert_eq!(cfg.handle.as_deref(), Some("tourist"));
        assert_eq!(cfg.host, DEFAULT_HOST);

        let args = GlobalArgs::parse_from(["cf", "--handle", "petr", "init"]);
        let cfg = cfg.with_args(&args);
        assert_eq!(cfg.require_handle().unwrap(), "petr");
        assert_eq!(cfg.host, DEFAULT_HOST);
    }

    #[test]
    fn missing_handle_is_an_error() {
        let cfg = GlobalConfig::from_toml("").unwrap();
        assert_eq!(cfg, GlobalConfig::default());
        assert!(cfg.require_handle().is_err());
    }
}
