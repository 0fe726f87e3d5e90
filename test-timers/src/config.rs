// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for test timers.
//!
//! Configuration is layered, with later sources overriding earlier ones:
//!
//! 1. The defaults embedded in this crate (`default-config.toml`).
//! 2. A TOML config file, either passed in explicitly or found at
//!    [`TimerConfig::CONFIG_PATH`] relative to the working directory.
//! 3. Command-line overrides, applied by the caller.

use crate::{errors::ConfigParseError, reporter::ReportLayout};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, File, FileFormat};
use serde::Deserialize;

/// Settings that control whether and how test timings are recorded.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimerConfig {
    /// Whether timing is enabled for this run.
    #[serde(default)]
    pub with_test_timers: bool,

    /// The layout of the final report.
    #[serde(default)]
    pub layout: ReportLayout,
}

impl TimerConfig {
    /// The config file looked up relative to the working directory if none is specified.
    pub const CONFIG_PATH: &'static str = ".config/test-timers.toml";

    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Returns a config with timers enabled and the default layout.
    pub fn enabled() -> Self {
        Self {
            with_test_timers: true,
            layout: ReportLayout::default(),
        }
    }

    /// Reads the config from the default config, then `config_file` if given.
    ///
    /// If `config_file` is `None`, [`Self::CONFIG_PATH`] under `dir` is read if it exists. An
    /// explicitly specified file must exist.
    pub fn from_sources(
        dir: &Utf8Path,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = dir.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        Self::build(&config_file, source)
    }

    /// Reads the config from the default config, then the given TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigParseError> {
        Self::build(
            Utf8Path::new("<inline>"),
            File::from_str(contents, FileFormat::Toml),
        )
    }

    fn build(
        config_file: &Utf8Path,
        source: impl config::Source + Send + Sync + 'static,
    ) -> Result<Self, ConfigParseError> {
        let config = Config::builder()
            .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(source)
            .build()
            .and_then(|config| config.try_deserialize::<ConfigFile>())
            .map_err(|err| ConfigParseError::new(Utf8PathBuf::from(config_file), err))?;

        tracing::debug!(%config_file, config = ?config.timers, "loaded test-timers config");
        Ok(config.timers)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConfigFile {
    timers: TimerConfig,
}
