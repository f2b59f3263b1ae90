//! Generator profiles stored as YAML.
//!
//! A profile names any subset of the generator settings; whatever it leaves out falls back to
//! [`GeneratorConfig::default`]. Command line flags are layered on top with [`Settings::merge`].
//!
//! ```yaml
//! template-count: 4
//! global-channel: 10
//! cc-mode: continuous
//! output-prefix: Serum
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CcDirection, CcMode, ChannelMode, Error, GeneratorConfig, Result};

#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    pub template_count: Option<u8>,
    /// 1..=16. Absent means one channel per template
    pub global_channel: Option<u8>,
    pub cc_mode: Option<CcMode>,
    pub first_cc: Option<u8>,
    pub direction: Option<CcDirection>,
    pub output_prefix: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    /// Layer `overrides` on top of `self`. Every value `overrides` sets wins.
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            template_count: overrides.template_count.or(self.template_count),
            global_channel: overrides.global_channel.or(self.global_channel),
            cc_mode: overrides.cc_mode.or(self.cc_mode),
            first_cc: overrides.first_cc.or(self.first_cc),
            direction: overrides.direction.or(self.direction),
            output_prefix: overrides.output_prefix.or(self.output_prefix),
            output_dir: overrides.output_dir.or(self.output_dir),
        }
    }

    /// Fill in the defaults and check the result
    pub fn into_config(self) -> Result<GeneratorConfig> {
        let default = GeneratorConfig::default();
        let config = GeneratorConfig {
            template_count: self.template_count.unwrap_or(default.template_count),
            channel_mode: self
                .global_channel
                .map_or(default.channel_mode, ChannelMode::Global),
            cc_mode: self.cc_mode.unwrap_or(default.cc_mode),
            first_cc: self.first_cc.or(default.first_cc),
            direction: self.direction.unwrap_or(default.direction),
            output_prefix: self.output_prefix.unwrap_or(default.output_prefix),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Load a profile from a YAML file
pub fn load(path: &Path) -> Result<Settings> {
    log::debug!("loading generator profile from {:?}", path);

    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let settings = serde_yaml::from_str::<Settings>(&contents).map_err(|e| {
        Error::invalid_config(format!("can't parse profile {}: {}", path.display(), e))
    })?;

    log::debug!("profile: {:?}", settings);
    Ok(settings)
}

/// Write a profile as YAML, creating parent directories if needed
pub fn save(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let yaml = serde_yaml::to_string(settings)
        .map_err(|e| Error::invalid_config(format!("can't serialize profile: {}", e)))?;
    std::fs::write(path, yaml).map_err(|e| Error::io(path, e))
}
