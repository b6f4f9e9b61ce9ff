//! PBI command decoder

use rcw_spec::pbi::{
    ADDR_MASK, AWRITE_OPCODE, COMMAND_SIZE, FLUSH_OPCODE, OPCODE_MASK, WAIT_OPCODE, WRITE_OPCODE,
};
use rcw_spec::PbiCommand;

use crate::error::{DisassemblerError, Result};

/// Decode one command from its opcode and value words.
///
/// `wait` and `flush` share the `0x09` prefix with `write`, so the exact
/// opcode words are matched before the write prefixes.
pub fn decode(opcode: u32, value: u32) -> Result<PbiCommand> {
    match opcode {
        WAIT_OPCODE => Ok(PbiCommand::Wait { cycles: value }),
        FLUSH_OPCODE => Ok(PbiCommand::Flush),
        _ => {
            let addr = opcode & ADDR_MASK;
            match opcode & OPCODE_MASK {
                WRITE_OPCODE => Ok(PbiCommand::Write { addr, value }),
                AWRITE_OPCODE => Ok(PbiCommand::AWrite { addr, value }),
                _ => Err(DisassemblerError::UnknownCommand(opcode)),
            }
        }
    }
}

/// Decode one 8-byte record
pub fn decode_command(bytes: &[u8; COMMAND_SIZE]) -> Result<PbiCommand> {
    let opcode = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let value = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    decode(opcode, value)
}

/// Decode a run of back-to-back records
pub fn decode_all(bytes: &[u8]) -> Result<Vec<PbiCommand>> {
    if bytes.len() % COMMAND_SIZE != 0 {
        return Err(DisassemblerError::RaggedPbi(bytes.len()));
    }

    bytes
        .chunks_exact(COMMAND_SIZE)
        .map(|chunk| {
            let mut record = [0u8; COMMAND_SIZE];
            record.copy_from_slice(chunk);
            decode_command(&record)
        })
        .collect()
}
