//! PBI command encoding to 8-byte records

use rcw_spec::PbiCommand;
use rcw_spec::pbi::COMMAND_SIZE;

/// Encode a command as two big-endian 32-bit words
pub fn encode(command: &PbiCommand) -> [u8; COMMAND_SIZE] {
    let (opcode, value) = command.words();

    let mut bytes = [0u8; COMMAND_SIZE];
    bytes[0..4].copy_from_slice(&opcode.to_be_bytes());
    bytes[4..8].copy_from_slice(&value.to_be_bytes());
    bytes
}

/// Encode commands back to back, in order
pub fn encode_all(commands: &[PbiCommand]) -> Vec<u8> {
    commands.iter().flat_map(encode).collect()
}
