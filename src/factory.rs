//! The factory default custom mode, embedded at build time.
//!
//! Every generated template starts out as a copy of this image. It is never patched in place.

use std::sync::OnceLock;

use crate::layout::TEMPLATE_LEN;

/// Revision of the embedded image. Bump together with [`CHECKSUM`] when the asset changes
pub const VERSION: u16 = 1;

/// FNV-1a (32 bit) of the embedded image
pub const CHECKSUM: u32 = 0x9D52_F81C;

static IMAGE: &[u8] = include_bytes!("../assets/factory_default.syx");

pub(crate) fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811C_9DC5, |hash: u32, &byte| {
        (hash ^ byte as u32).wrapping_mul(0x0100_0193)
    })
}

/// The verified factory image.
///
/// Length and checksum are checked the first time this is called; later calls reuse that result.
pub fn image() -> crate::Result<&'static [u8]> {
    static VERIFIED: OnceLock<Option<u32>> = OnceLock::new();

    let mismatch = VERIFIED.get_or_init(|| {
        let actual = fnv1a(IMAGE);
        if IMAGE.len() == TEMPLATE_LEN && actual == CHECKSUM {
            log::debug!("factory template v{} verified ({} bytes)", VERSION, IMAGE.len());
            None
        } else {
            Some(actual)
        }
    });

    match mismatch {
        None => Ok(IMAGE),
        Some(actual) => Err(crate::Error::malformed(
            0,
            format!(
                "embedded factory template v{} is corrupt: {} bytes, checksum {:#010x} (expected {} bytes, {:#010x})",
                VERSION,
                IMAGE.len(),
                actual,
                TEMPLATE_LEN,
                CHECKSUM
            ),
        )),
    }
}

/// The factory image decoded into a template
pub fn template() -> crate::Result<crate::Template> {
    crate::sysex::decode(image()?)
}
