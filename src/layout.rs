//! Where every control of the Launch Control XL 3 lives inside a custom mode template.
//!
//! A template consists of two SysEx messages of [`MESSAGE_LEN`] bytes each. Every control owns an
//! 11-byte record inside one of them:
//!
//! | byte | content                            |
//! |------|------------------------------------|
//! | +0   | record marker `0x49`               |
//! | +1   | control id (`0x10 + index`)        |
//! | +3   | LED color palette code             |
//! | +5   | MIDI channel, zero-based           |
//! | +6   | behavior mode (`0x40` / `0x50`)    |
//! | +8   | CC number                          |
//!
//! The remaining record bytes are device-internal and never touched. Not every field applies to
//! every control: sliders have no LED, and their CC bytes hold the device's fixed slider
//! assignment, so the table leaves those offsets out.
//!
//! All offsets in this module are absolute positions in the concatenated template image.

/// Number of controls on the device
pub const CONTROL_COUNT: usize = 48;
/// Grid height: three knob rows, one slider row, two button rows
pub const ROWS: usize = 6;
/// Grid width
pub const COLS: usize = 8;

/// Length of a single SysEx message in a template
pub const MESSAGE_LEN: usize = 342;
/// Number of SysEx messages in a template
pub const MESSAGE_COUNT: usize = 2;
/// Total length of a template image
pub const TEMPLATE_LEN: usize = MESSAGE_LEN * MESSAGE_COUNT;

/// First bytes of every message: SysEx start, Novation manufacturer id, device and command bytes
pub const HEADER: [u8; 9] = [0xF0, 0x00, 0x20, 0x29, 0x02, 0x15, 0x05, 0x00, 0x45];
/// Offset of the page identifier inside a message, right after [`HEADER`]
pub const PAGE_OFFSET: usize = HEADER.len();
/// Page identifier expected for each message
pub const PAGE_IDS: [u8; MESSAGE_COUNT] = [0x00, 0x03];
/// SysEx end byte that terminates each message
pub const TERMINATOR: u8 = 0xF7;
/// Offset and length of the mode name inside the first message
pub const NAME_RANGE: std::ops::Range<usize> = 14..29;

/// First byte of every control record
pub const RECORD_MARKER: u8 = 0x49;
/// Length of a control record
pub const RECORD_LEN: usize = 11;
/// Control id of control 0
pub const FIRST_CONTROL_ID: u8 = 0x10;

const COLOR_FIELD: usize = 3;
const CHANNEL_FIELD: usize = 5;
const MODE_FIELD: usize = 6;
const CC_FIELD: usize = 8;

/// Index of the slider row in the grid
pub const SLIDER_ROW: usize = 3;
/// Rows that hold buttons
pub const BUTTON_ROWS: [usize; 2] = [4, 5];

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Role {
    Knob,
    Slider,
    Button,
}

impl Role {
    const fn for_row(row: usize) -> Self {
        match row {
            0..=2 => Self::Knob,
            SLIDER_ROW => Self::Slider,
            _ => Self::Button,
        }
    }
}

/// Absolute byte offsets of the fields of a control record. `None` where a field doesn't exist
/// for that kind of control.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct FieldOffsets {
    pub cc: Option<usize>,
    pub channel: usize,
    pub mode: usize,
    pub color: Option<usize>,
}

/// Static description of one control
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct ControlSlot {
    pub index: u8,
    pub role: Role,
    pub row: u8,
    pub col: u8,
    /// Which SysEx message the record lives in
    pub message: u8,
    /// Absolute offset of the record marker
    pub record: usize,
    pub id: u8,
    pub fields: FieldOffsets,
}

impl ControlSlot {
    /// Whether the grid editor can put the cursor on this control
    pub fn is_selectable(&self) -> bool {
        self.fields.color.is_some()
    }

    /// Whether the assignment engine numbers this control
    pub fn is_cc_addressable(&self) -> bool {
        self.fields.cc.is_some()
    }

    /// Buttons below the slider row latch by default
    pub fn defaults_to_toggle(&self) -> bool {
        self.role == Role::Button
    }

    const fn build(index: usize) -> Self {
        let row = index / COLS;
        let role = Role::for_row(row);

        let (message, start) = match role {
            Role::Knob => (0, 29 + RECORD_LEN * index),
            Role::Slider => (1, 29 + RECORD_LEN * (index - 24)),
            Role::Button => (1, 133 + RECORD_LEN * (index - 32)),
        };
        let record = message * MESSAGE_LEN + start;

        let has_led = !matches!(role, Role::Slider);

        Self {
            index: index as u8,
            role,
            row: row as u8,
            col: (index % COLS) as u8,
            message: message as u8,
            record,
            id: FIRST_CONTROL_ID + index as u8,
            fields: FieldOffsets {
                cc: if has_led { Some(record + CC_FIELD) } else { None },
                channel: record + CHANNEL_FIELD,
                mode: record + MODE_FIELD,
                color: if has_led { Some(record + COLOR_FIELD) } else { None },
            },
        }
    }
}

const fn build_layout() -> [ControlSlot; CONTROL_COUNT] {
    let mut slots = [ControlSlot::build(0); CONTROL_COUNT];
    let mut i = 1;
    while i < CONTROL_COUNT {
        slots[i] = ControlSlot::build(i);
        i += 1;
    }
    slots
}

/// The layout table, indexed by control index
pub static LAYOUT: [ControlSlot; CONTROL_COUNT] = build_layout();

/// Look up the control at a grid position
pub fn slot_at(row: usize, col: usize) -> Option<&'static ControlSlot> {
    if row >= ROWS || col >= COLS {
        return None;
    }
    Some(&LAYOUT[row * COLS + col])
}

/// All controls the assignment engine numbers, in layout order
pub fn cc_addressable() -> impl Iterator<Item = &'static ControlSlot> {
    LAYOUT.iter().filter(|slot| slot.is_cc_addressable())
}

/// Role of every control in a grid row
pub fn row_role(row: usize) -> Role {
    Role::for_row(row)
}
