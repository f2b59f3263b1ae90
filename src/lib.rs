/*!
Custom mode templates for the Novation Launch Control XL 3: generate whole banks of them, and
recolor their LEDs in a terminal grid editor.

A custom mode is a 684-byte SysEx image describing all 48 controls of the device. This crate
never builds one from scratch. Instead every template is a patched copy of a known-good image
(normally the [factory default](factory)), and only the bytes that hold a control's CC number,
MIDI channel, mode and LED color are ever rewritten. The [layout table](layout::LAYOUT) says where
those bytes are.

# Generating templates

[`assign::generate`] turns a [`GeneratorConfig`] into a list of [`Template`]s, each with its own
channel and CC numbers, and [`store::write_batch`] writes them out as `.syx` files:

```no_run
use lcxl3::{assign, store, GeneratorConfig, ChannelMode, CcMode};

let config = GeneratorConfig {
    template_count: 4,
    channel_mode: ChannelMode::Global(10),
    cc_mode: CcMode::Continuous,
    ..Default::default()
};
let templates = assign::generate(&config, lcxl3::factory::image()?)?;
let paths = store::write_batch(&config.output_dir, &config.output_prefix, &templates)?;
# Ok::<(), lcxl3::Error>(())
```

Nothing is written unless every template passed [validation](validate); a batch either lands on
disk completely or not at all.

# Editing LED colors

The [`editor`] module holds a terminal-independent state machine over the 6×8 control grid plus
an interactive crossterm/ratatui front end:

```no_run
let template = lcxl3::store::read_template("outputs/LCXL3_T01.syx".as_ref())?;
if let Some(edited) = lcxl3::editor::terminal::edit(template)?.saved() {
    lcxl3::store::write_template("outputs/LCXL3_T01.syx".as_ref(), &edited)?;
}
# Ok::<(), lcxl3::Error>(())
```
*/

pub mod util;

mod errors;
pub use errors::*;

mod color;
pub use color::*;

pub mod layout;
pub use layout::{ControlSlot, Role};

pub mod factory;

pub mod sysex;
pub use sysex::{Control, Mode, Template};

pub mod validate;

pub mod assign;
pub use assign::{CcDirection, CcMode, ChannelMode, GeneratorConfig};

pub mod store;

pub mod config;

pub mod editor;

pub mod prelude {
    pub use crate::assign::{CcDirection, CcMode, ChannelMode, GeneratorConfig};
    pub use crate::color::LedColor;
    pub use crate::editor::{Editor, EditorEvent, EventSource};
    pub use crate::sysex::{Control, Mode, Template};
}
