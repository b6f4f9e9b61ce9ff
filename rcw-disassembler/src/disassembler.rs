//! Recover field values from an RCW or PBL image

use rcw_spec::image::{length_byte, TRAILER_SIZE};
use rcw_spec::{
    crc32, Assignment, BitWord, FormatMode, Layout, PbiCommand, Preamble, RcwError, Variables,
    END_COMMAND, PBL_MAGIC,
};
use tracing::{debug, warn};

use crate::decoder::decode_all;
use crate::error::{DisassemblerError, Result};

/// Everything recovered from an image
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Disassembly {
    /// Non-zero fields, in layout order
    pub assignments: Vec<Assignment>,
    /// Set bits that no field claims (MSB-first positions)
    pub residual_bits: Vec<usize>,
    /// Commands found between the word and the end command
    pub pbi: Vec<PbiCommand>,
    pub warnings: Vec<DisassemblerError>,
}

impl Disassembly {
    fn warn(&mut self, warning: impl Into<DisassemblerError>) {
        let warning = warning.into();
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Disassemble `image` against a field layout.
///
/// `vars` must carry `%size`. An image longer than the word is treated as
/// PBL framed. The word then follows the 4-byte magic, the length byte and
/// the system address, so its offset depends on the length of `%sysaddr`
/// in `vars`: 8 when it is absent (a 3-byte address is assumed) or 3 bytes
/// long, 9 for a 4-byte address. A layout that omits `%sysaddr` cannot
/// decode an image built with a 4-byte one.
pub fn disassemble(image: &[u8], layout: &Layout, vars: &Variables) -> Result<Disassembly> {
    let size = vars.size()?;
    let mut disassembly = Disassembly::default();

    let mut word = match FormatMode::detect(image, size) {
        FormatMode::Raw => {
            debug!("Raw image of {} bytes", image.len());
            BitWord::from_bytes(size, image)?
        }
        FormatMode::Pbl => {
            let sysaddr = vars.sysaddr()?.unwrap_or_else(|| vec![0; 3]);
            let start = Preamble::new(size, sysaddr).len();
            let end = start + size / 8;
            if image.len() < end {
                return Err(RcwError::Truncated {
                    expected: end,
                    found: image.len(),
                }
                .into());
            }

            debug!("PBL image, RCW word at offset {}", start);
            check_frame(image, size, end, &mut disassembly);
            BitWord::from_bytes(size, &image[start..end])?
        }
    };

    for field in layout {
        let value = match word.extract(field) {
            Ok(value) => value,
            Err(err) => {
                disassembly.warn(err);
                continue;
            }
        };

        if value.bits() != 0 {
            word.clear(field)?;
            disassembly.assignments.push(Assignment::new(field.name.clone(), value));
        }
    }

    disassembly.residual_bits = word.set_positions();
    if !disassembly.residual_bits.is_empty() {
        warn!("{} unclaimed bits set in RCW word", disassembly.residual_bits.len());
    }

    Ok(disassembly)
}

/// Check the magic, length byte and trailer of a framed image and pull out
/// its PBI commands. `word_end` is the offset just past the RCW word.
fn check_frame(image: &[u8], size: usize, word_end: usize, disassembly: &mut Disassembly) {
    if image[..PBL_MAGIC.len()] != PBL_MAGIC {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&image[..4]);
        disassembly.warn(DisassemblerError::BadMagic(magic));
    }

    let expected = length_byte(size);
    if image[PBL_MAGIC.len()] != expected {
        disassembly.warn(DisassemblerError::LengthMismatch {
            found: image[PBL_MAGIC.len()],
            expected,
        });
    }

    let tail = &image[word_end..];
    if tail.len() < TRAILER_SIZE {
        disassembly.warn(DisassemblerError::MissingEndCommand);
        return;
    }

    let (body, trailer) = tail.split_at(tail.len() - TRAILER_SIZE);
    if trailer[..4] != END_COMMAND.to_be_bytes() {
        disassembly.warn(DisassemblerError::MissingEndCommand);
        return;
    }

    let found = u32::from_be_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);
    let computed = crc32(&image[..image.len() - 4]);
    if found != computed {
        disassembly.warn(DisassemblerError::ChecksumMismatch { found, computed });
    } else {
        debug!("PBL checksum {:#010x} verified", found);
    }

    match decode_all(body) {
        Ok(commands) => disassembly.pbi = commands,
        Err(err) => disassembly.warn(err),
    }
}
