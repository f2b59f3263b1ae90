//! Checks that run before a template is exposed to the editor or written to storage.

use std::collections::{HashMap, HashSet};

use crate::errors::Field;
use crate::layout::{
    HEADER, LAYOUT, MESSAGE_LEN, PAGE_IDS, PAGE_OFFSET, RECORD_MARKER, TEMPLATE_LEN, TERMINATOR,
};
use crate::{Control, Error, Mode, Result, Role, Template};

/// Lowest CC number the engine hands out. Everything below is reserved for standard controllers
pub const SAFE_CC_MIN: u8 = 13;
/// Highest CC number the engine hands out. Everything above is channel mode messages
pub const SAFE_CC_MAX: u8 = 120;
/// Highest zero-based MIDI channel
pub const MAX_CHANNEL: u8 = 15;
/// Most templates a single generation pass may produce
pub const MAX_TEMPLATES: u8 = 15;

/// Structural checks on a raw template image: length, message framing, 7-bit data and the record
/// marker and id of every control.
pub fn structure(bytes: &[u8]) -> Result<()> {
    if bytes.len() != TEMPLATE_LEN {
        return Err(Error::malformed(
            bytes.len().min(TEMPLATE_LEN),
            format!("expected {} bytes, got {}", TEMPLATE_LEN, bytes.len()),
        ));
    }

    for (index, message) in bytes.chunks_exact(MESSAGE_LEN).enumerate() {
        let base = index * MESSAGE_LEN;

        if let Some(i) = (0..HEADER.len()).find(|&i| message[i] != HEADER[i]) {
            return Err(Error::malformed(
                base + i,
                format!("message {} doesn't start with the custom mode header", index),
            ));
        }
        if message[PAGE_OFFSET] != PAGE_IDS[index] {
            return Err(Error::malformed(
                base + PAGE_OFFSET,
                format!(
                    "message {} has page id {:#04x}, expected {:#04x}",
                    index, message[PAGE_OFFSET], PAGE_IDS[index]
                ),
            ));
        }
        if message[MESSAGE_LEN - 1] != TERMINATOR {
            return Err(Error::malformed(
                base + MESSAGE_LEN - 1,
                format!("message {} isn't terminated by {:#04x}", index, TERMINATOR),
            ));
        }
        if let Some(i) = message[1..MESSAGE_LEN - 1].iter().position(|&b| b >= 0x80) {
            return Err(Error::malformed(
                base + 1 + i,
                format!("data byte {:#04x} has its high bit set", message[1 + i]),
            ));
        }
    }

    for slot in &LAYOUT {
        if bytes[slot.record] != RECORD_MARKER || bytes[slot.record + 1] != slot.id {
            return Err(Error::malformed(
                slot.record,
                format!(
                    "expected record for control {} (id {:#04x})",
                    slot.index, slot.id
                ),
            ));
        }
    }

    Ok(())
}

fn out_of_range(
    template: u8,
    control: &Control,
    field: Field,
    value: Option<u8>,
    allowed: &'static str,
) -> Error {
    Error::OutOfRangeValue {
        template,
        control: control.index(),
        field,
        value,
        allowed,
    }
}

/// Range checks on the logical fields of a single control
pub fn control(template: u8, control: &Control) -> Result<()> {
    let slot = control.slot();

    match (slot.is_cc_addressable(), control.cc) {
        (true, Some(cc)) if (SAFE_CC_MIN..=SAFE_CC_MAX).contains(&cc) => {}
        (true, cc) => return Err(out_of_range(template, control, Field::Cc, cc, "13..=120")),
        (false, None) => {}
        (false, cc) => {
            return Err(out_of_range(template, control, Field::Cc, cc, "nothing (no CC byte)"))
        }
    }

    if control.channel > MAX_CHANNEL {
        return Err(out_of_range(
            template,
            control,
            Field::Channel,
            Some(control.channel),
            "0..=15",
        ));
    }

    if control.mode == Mode::Toggle && slot.role != Role::Button {
        return Err(out_of_range(
            template,
            control,
            Field::Mode,
            Some(control.mode.byte()),
            "continuous for knobs and sliders",
        ));
    }

    if let Mode::Other(byte) = control.mode {
        if byte >= 0x80 {
            return Err(out_of_range(
                template,
                control,
                Field::Mode,
                Some(byte),
                "a 7-bit mode byte",
            ));
        }
    }

    match (slot.is_selectable(), control.color) {
        (true, Some(_)) | (false, None) => {}
        (true, None) => {
            return Err(out_of_range(template, control, Field::Color, None, "the LED palette"))
        }
        (false, Some(color)) => {
            return Err(out_of_range(
                template,
                control,
                Field::Color,
                Some(color.code()),
                "nothing (no LED)",
            ))
        }
    }

    Ok(())
}

/// Range checks on every control of a template
pub fn controls(template: &Template) -> Result<()> {
    template
        .controls()
        .iter()
        .try_for_each(|c| control(template.number(), c))
}

/// All checks on a single template: raw structure and every control
pub fn template(template: &Template) -> Result<()> {
    structure(template.raw_bytes())?;
    controls(template)
}

/// Checks on the output of one generation pass: a sane template count, unique template numbers,
/// every template valid, and no two controls of a template sending the same CC on the same channel.
pub fn batch(templates: &[Template]) -> Result<()> {
    if templates.is_empty() || templates.len() > MAX_TEMPLATES as usize {
        return Err(Error::invalid_config(format!(
            "{} templates in one pass, expected 1..={}",
            templates.len(),
            MAX_TEMPLATES
        )));
    }

    let mut numbers = HashSet::new();
    for t in templates {
        if !numbers.insert(t.number()) {
            return Err(Error::invalid_config(format!(
                "template number {} used twice",
                t.number()
            )));
        }

        template(t)?;

        let mut seen = HashMap::new();
        for c in t.controls() {
            let Some(cc) = c.cc else { continue };
            if let Some(other) = seen.insert((c.channel, cc), c.index()) {
                return Err(Error::invalid_config(format!(
                    "template {}: controls {} and {} both send CC {} on channel {}",
                    t.number(),
                    other,
                    c.index(),
                    cc,
                    c.channel + 1
                )));
            }
        }
    }

    Ok(())
}
