//! Decoding and encoding of custom mode templates.
//!
//! A [`Template`] keeps the complete raw image next to its 48 logical [`Control`]s. Encoding only
//! ever writes the bytes the [layout table](crate::layout::LAYOUT) assigns to a control field;
//! everything else (headers, mode name, device-internal record bytes, label tails) is copied from
//! the raw image untouched. As a consequence decoding and re-encoding an unchanged template gives
//! back the exact input:
//!
//! ```rust
//! let bytes = lcxl3::factory::image()?;
//! let template = lcxl3::sysex::decode(bytes)?;
//! assert_eq!(lcxl3::sysex::encode(&template)?, bytes);
//! # Ok::<(), lcxl3::Error>(())
//! ```

use crate::layout::{ControlSlot, Role, LAYOUT, NAME_RANGE};
use crate::{validate, Error, LedColor, Result};

/// How a control reports its value
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Mode {
    /// Momentary buttons, and everything that isn't a button
    Continuous,
    /// Buttons that latch on and off
    Toggle,
    /// Any other byte, kept verbatim. Older generators write `0x00` here for every control
    Other(u8),
}

impl Mode {
    pub fn byte(self) -> u8 {
        match self {
            Self::Continuous => 0x40,
            Self::Toggle => 0x50,
            Self::Other(byte) => byte,
        }
    }

    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x40 => Self::Continuous,
            0x50 => Self::Toggle,
            other => Self::Other(other),
        }
    }
}

/// The logical settings of one control.
///
/// Fields that don't exist for a control (see [`crate::layout::FieldOffsets`]) are `None`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Control {
    index: u8,
    pub cc: Option<u8>,
    /// Zero-based MIDI channel
    pub channel: u8,
    pub mode: Mode,
    pub color: Option<LedColor>,
}

impl Control {
    pub fn index(&self) -> u8 {
        self.index
    }

    /// The layout table entry of this control
    pub fn slot(&self) -> &'static ControlSlot {
        &LAYOUT[self.index as usize]
    }

    pub fn role(&self) -> Role {
        self.slot().role
    }

    pub fn row(&self) -> usize {
        self.slot().row as usize
    }

    pub fn col(&self) -> usize {
        self.slot().col as usize
    }

    pub fn is_selectable(&self) -> bool {
        self.slot().is_selectable()
    }
}

/// One complete custom mode: 48 controls plus the raw image they are encoded into
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Template {
    number: u8,
    controls: Vec<Control>,
    raw: Vec<u8>,
}

impl Template {
    /// Template slot number, 1-based. Decoded templates start out as number 1
    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn set_number(&mut self, number: u8) {
        self.number = number;
    }

    pub fn with_number(mut self, number: u8) -> Self {
        self.number = number;
        self
    }

    /// All controls in layout order
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// All controls in layout order. The logical fields may be changed freely; they are checked
    /// when the template is encoded.
    pub fn controls_mut(&mut self) -> &mut [Control] {
        &mut self.controls
    }

    pub fn control(&self, index: usize) -> Option<&Control> {
        self.controls.get(index)
    }

    pub fn control_mut(&mut self, index: usize) -> Option<&mut Control> {
        self.controls.get_mut(index)
    }

    /// The raw image as of the last decode or [`commit`](Self::commit)
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Mode name as shown by the device
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.raw[NAME_RANGE])
            .trim_end()
            .to_owned()
    }

    /// Re-encode the logical fields into the raw image. On error the raw image is left as it was.
    pub fn commit(&mut self) -> Result<()> {
        self.raw = encode(self)?;
        Ok(())
    }
}

fn read_control(bytes: &[u8], slot: &ControlSlot) -> Result<Control> {
    let fields = slot.fields;

    let mode = Mode::from_byte(bytes[fields.mode]);
    if let Mode::Other(byte) = mode {
        log::debug!("control {} keeps unrecognized mode byte {:#04x}", slot.index, byte);
    }

    let color = match fields.color {
        Some(offset) => {
            let code = bytes[offset];
            let color = LedColor::from_code(code).ok_or_else(|| {
                Error::malformed(
                    offset,
                    format!("control {} has unknown LED color {:#04x}", slot.index, code),
                )
            })?;
            Some(color)
        }
        None => None,
    };

    Ok(Control {
        index: slot.index,
        cc: fields.cc.map(|offset| bytes[offset]),
        channel: bytes[fields.channel],
        mode,
        color,
    })
}

fn write_control(bytes: &mut [u8], control: &Control) {
    let fields = control.slot().fields;

    if let (Some(offset), Some(cc)) = (fields.cc, control.cc) {
        bytes[offset] = cc;
    }
    bytes[fields.channel] = control.channel;
    bytes[fields.mode] = control.mode.byte();
    if let (Some(offset), Some(color)) = (fields.color, control.color) {
        bytes[offset] = color.code();
    }
}

/// Parse a raw template image.
///
/// Fails with [`Error::MalformedTemplate`] if the bytes don't have the fixed template structure.
/// Value ranges are not checked here; see [`validate::template`].
pub fn decode(bytes: &[u8]) -> Result<Template> {
    validate::structure(bytes)?;

    let controls = LAYOUT
        .iter()
        .map(|slot| read_control(bytes, slot))
        .collect::<Result<Vec<_>>>()?;

    Ok(Template {
        number: 1,
        controls,
        raw: bytes.to_vec(),
    })
}

/// Produce the raw image for a template.
///
/// Every control is checked before anything is written, so this either fails with
/// [`Error::OutOfRangeValue`] or returns a complete image.
pub fn encode(template: &Template) -> Result<Vec<u8>> {
    validate::controls(template)?;

    let mut bytes = template.raw.clone();
    for control in &template.controls {
        write_control(&mut bytes, control);
    }
    Ok(bytes)
}
