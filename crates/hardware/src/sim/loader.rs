//! Hex Program Loader.
//!
//! Program images are plain text with one 32-bit instruction word per line, written
//! in hexadecimal. This module performs:
//! 1. **Parsing:** Blank lines and `#` comments are skipped; a `0x`/`0X` prefix is optional.
//! 2. **Placement:** Words are written to consecutive word addresses starting at `base`.

use std::fs;
use std::path::Path;

use crate::common::constants::WORD_SIZE;
use crate::common::error::{Result, SimError};
use crate::soc::traits::MainMemory;

/// Parses `text` and writes its words into `memory` from `base` upwards.
///
/// # Arguments
///
/// * `text` - Program image, one hex word per line.
/// * `base` - Address of the first word.
/// * `memory` - Destination store.
///
/// # Returns
///
/// The number of words written.
///
/// # Errors
///
/// `SimError::MalformedProgram` for the first line that is not a 32-bit hex word.
///
/// # Examples
///
/// ```
/// use pipesim_core::sim::loader::load_hex_program;
/// use pipesim_core::soc::{FlatMemory, MainMemory};
///
/// let mut mem = FlatMemory::new();
/// let n = load_hex_program("# exit\n2402000a\n0x0000000c\n", 0x0040_0000, &mut mem).unwrap();
/// assert_eq!(n, 2);
/// assert_eq!(mem.read_word(0x0040_0004), 0x0000_000C);
/// ```
pub fn load_hex_program(text: &str, base: u32, memory: &mut dyn MainMemory) -> Result<usize> {
    let mut addr = base;
    let mut count = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let digits = line
            .strip_prefix("0x")
            .or_else(|| line.strip_prefix("0X"))
            .unwrap_or(line);
        let word = u32::from_str_radix(digits, 16).map_err(|_| SimError::MalformedProgram {
            line: idx + 1,
            text: line.to_owned(),
        })?;
        memory.write_word(addr, word);
        addr = addr.wrapping_add(WORD_SIZE);
        count += 1;
    }

    tracing::debug!(words = count, base = format_args!("{base:#010x}"), "program loaded");
    Ok(count)
}

/// Reads a program image from disk and loads it with [`load_hex_program`].
///
/// # Errors
///
/// `SimError::Io` if the file cannot be read, otherwise as [`load_hex_program`].
pub fn load_hex_file(path: impl AsRef<Path>, base: u32, memory: &mut dyn MainMemory) -> Result<usize> {
    let text = fs::read_to_string(path.as_ref())?;
    load_hex_program(&text, base, memory)
}
