//! Generation of numbered templates from a [`GeneratorConfig`].
//!
//! ```rust
//! use lcxl3::{assign, ChannelMode, CcMode, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     template_count: 3,
//!     channel_mode: ChannelMode::PerTemplate,
//!     cc_mode: CcMode::RestartPerTemplate,
//!     ..Default::default()
//! };
//! let templates = assign::generate(&config, lcxl3::factory::image()?)?;
//!
//! assert_eq!(templates.len(), 3);
//! assert_eq!(templates[1].controls()[0].channel, 1);
//! assert_eq!(templates[1].controls()[0].cc, Some(13));
//! # Ok::<(), lcxl3::Error>(())
//! ```

use std::path::PathBuf;

use crate::layout::cc_addressable;
use crate::validate::{MAX_TEMPLATES, SAFE_CC_MAX, SAFE_CC_MIN};
use crate::{sysex, validate, Error, Mode, Result, Template};

/// Number of CC numbers in the safe range
const SAFE_CC_SPAN: u32 = (SAFE_CC_MAX - SAFE_CC_MIN + 1) as u32;

/// Which MIDI channel a template's controls send on
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ChannelMode {
    /// Template 1 on channel 1, template 2 on channel 2 and so on
    PerTemplate,
    /// Every template on the same channel, given as 1..=16
    Global(u8),
}

/// How CC numbers continue from one template to the next
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CcMode {
    /// Every template starts over at the first CC number
    RestartPerTemplate,
    /// Numbering carries on across templates, wrapping inside the safe range
    Continuous,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CcDirection {
    Ascending,
    /// Count down from the top of the safe range
    Descending,
}

impl Default for CcDirection {
    fn default() -> Self {
        Self::Ascending
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GeneratorConfig {
    pub template_count: u8,
    pub channel_mode: ChannelMode,
    pub cc_mode: CcMode,
    /// CC number of the first numbered control. Defaults to the bottom of the safe range, or the
    /// top when counting down
    pub first_cc: Option<u8>,
    pub direction: CcDirection,
    pub output_prefix: String,
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_count: MAX_TEMPLATES,
            channel_mode: ChannelMode::PerTemplate,
            cc_mode: CcMode::RestartPerTemplate,
            first_cc: None,
            direction: CcDirection::Ascending,
            output_prefix: "LCXL3".to_owned(),
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TEMPLATES).contains(&self.template_count) {
            return Err(Error::invalid_config(format!(
                "template count must be 1..={}, got {}",
                MAX_TEMPLATES, self.template_count
            )));
        }
        if let ChannelMode::Global(channel) = self.channel_mode {
            if !(1..=16).contains(&channel) {
                return Err(Error::invalid_config(format!(
                    "global channel must be 1..=16, got {}",
                    channel
                )));
            }
        }
        if let Some(cc) = self.first_cc {
            if !(SAFE_CC_MIN..=SAFE_CC_MAX).contains(&cc) {
                return Err(Error::invalid_config(format!(
                    "first CC must be {}..={}, got {}",
                    SAFE_CC_MIN, SAFE_CC_MAX, cc
                )));
            }
        }
        Ok(())
    }

    /// Zero-based channel for the given 1-based template number
    pub fn channel_for(&self, template: u8) -> u8 {
        match self.channel_mode {
            ChannelMode::PerTemplate => template.saturating_sub(1) % 16,
            ChannelMode::Global(channel) => channel.saturating_sub(1),
        }
    }

    /// CC number for the `position`-th numbered control of the given 1-based template.
    ///
    /// The result is always inside the safe range: positions past the end wrap around.
    pub fn cc_for(&self, template: u8, position: usize) -> u8 {
        let per_template = cc_addressable().count() as u32;
        let offset = match self.cc_mode {
            CcMode::RestartPerTemplate => position as u32,
            CcMode::Continuous => {
                (template.saturating_sub(1) as u32) * per_template + position as u32
            }
        };

        let wrapped = match self.direction {
            CcDirection::Ascending => {
                let start = self.first_cc.unwrap_or(SAFE_CC_MIN).saturating_sub(SAFE_CC_MIN);
                (start as u32 + offset) % SAFE_CC_SPAN
            }
            CcDirection::Descending => {
                let start = SAFE_CC_MAX.saturating_sub(self.first_cc.unwrap_or(SAFE_CC_MAX));
                (start as u32 + offset) % SAFE_CC_SPAN
            }
        } as u8;

        match self.direction {
            CcDirection::Ascending => SAFE_CC_MIN + wrapped,
            CcDirection::Descending => SAFE_CC_MAX - wrapped,
        }
    }

    /// File name for a template of this pass, e.g. `LCXL3_T03.syx`
    pub fn file_name(&self, template: u8) -> String {
        crate::store::file_name(&self.output_prefix, template)
    }
}

fn assign(config: &GeneratorConfig, template: &mut Template) -> Result<()> {
    let number = template.number();
    let channel = config.channel_for(number);

    let mut position = 0;
    for control in template.controls_mut() {
        let slot = control.slot();

        control.channel = channel;
        control.mode = if slot.defaults_to_toggle() {
            Mode::Toggle
        } else {
            Mode::Continuous
        };
        if slot.is_cc_addressable() {
            control.cc = Some(config.cc_for(number, position));
            position += 1;
        }
    }

    validate::controls(template)?;
    template.commit()
}

/// Generate `config.template_count` templates, each patched from a copy of `base`.
///
/// Fails with [`Error::InvalidConfig`] for an unusable configuration or a `base` that doesn't
/// decode. Nothing is returned unless every template passed validation.
pub fn generate(config: &GeneratorConfig, base: &[u8]) -> Result<Vec<Template>> {
    config.validate()?;

    let base = sysex::decode(base)
        .map_err(|e| Error::invalid_config(format!("base template doesn't decode: {}", e)))?;

    log::info!(
        "generating {} templates (channels {:?}, CCs {:?} {:?})",
        config.template_count,
        config.channel_mode,
        config.cc_mode,
        config.direction
    );

    let mut templates = Vec::with_capacity(config.template_count as usize);
    for number in 1..=config.template_count {
        let mut template = base.clone().with_number(number);
        assign(config, &mut template)?;

        log::debug!(
            "T{:02}: channel {}, CCs start at {}",
            number,
            config.channel_for(number) + 1,
            config.cc_for(number, 0)
        );
        templates.push(template);
    }

    validate::batch(&templates)?;
    Ok(templates)
}
