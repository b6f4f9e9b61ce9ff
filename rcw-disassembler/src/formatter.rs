//! Render a disassembly as RCW source text

use rcw_spec::pbi::PBI_BLOCK;
use rcw_spec::PbiCommand;

use crate::disassembler::Disassembly;

/// Format a PBI command the way it is written inside a `.pbi` block
pub fn format_command(command: &PbiCommand) -> String {
    match *command {
        PbiCommand::Wait { cycles } => format!("wait {}", cycles),
        PbiCommand::Write { addr, value } => format!("write 0x{:06x} 0x{:08x}", addr, value),
        PbiCommand::AWrite { addr, value } => format!("awrite 0x{:06x} 0x{:08x}", addr, value),
        PbiCommand::Flush => "flush".to_string(),
    }
}

/// The residual-bit diagnostic line, if any bits are left over
pub fn format_residual(positions: &[usize]) -> Option<String> {
    if positions.is_empty() {
        return None;
    }

    let list: Vec<String> = positions.iter().map(usize::to_string).collect();
    Some(format!("Unknown bits in positions: {}", list.join(" ")))
}

/// Render recovered assignments and PBI commands as source text.
///
/// With `include` set, the output starts with `#include <include>` and a
/// blank line so it can be fed straight back through the preprocessor.
pub fn format_source(disassembly: &Disassembly, include: Option<&str>) -> String {
    let mut output = String::new();

    if let Some(name) = include {
        output.push_str(&format!("#include <{}>\n\n", name));
    }

    for assignment in &disassembly.assignments {
        output.push_str(&format!("{}\n", assignment));
    }

    if !disassembly.pbi.is_empty() {
        output.push_str(&format!("\n.{}\n", PBI_BLOCK));
        for command in &disassembly.pbi {
            output.push_str(&format_command(command));
            output.push('\n');
        }
        output.push_str(".end\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcw_spec::{Assignment, BigUint};

    #[test]
    fn test_format_commands() {
        assert_eq!(format_command(&PbiCommand::Wait { cycles: 100 }), "wait 100");
        assert_eq!(
            format_command(&PbiCommand::Write {
                addr: 0x0E0040,
                value: 1
            }),
            "write 0x0e0040 0x00000001"
        );
        assert_eq!(
            format_command(&PbiCommand::AWrite {
                addr: 0x100,
                value: 0xDEAD_BEEF
            }),
            "awrite 0x000100 0xdeadbeef"
        );
        assert_eq!(format_command(&PbiCommand::Flush), "flush");
    }

    #[test]
    fn test_format_residual() {
        assert_eq!(format_residual(&[]), None);
        assert_eq!(
            format_residual(&[0, 1, 7, 511]).unwrap(),
            "Unknown bits in positions: 0 1 7 511"
        );
    }

    #[test]
    fn test_format_source_with_include() {
        let disassembly = Disassembly {
            assignments: vec![Assignment::new("SYS_PLL_RAT", 8u32), Assignment::new("BOOT_HO", 1u32)],
            ..Default::default()
        };
        assert_eq!(
            format_source(&disassembly, Some("t1040.rcwi")),
            "#include <t1040.rcwi>\n\nSYS_PLL_RAT=8\nBOOT_HO=1\n"
        );
    }

    #[test]
    fn test_format_source_with_pbi() {
        let disassembly = Disassembly {
            assignments: vec![Assignment::new("A", 5u32)],
            pbi: vec![PbiCommand::Wait { cycles: 10 }, PbiCommand::Flush],
            ..Default::default()
        };
        assert_eq!(
            format_source(&disassembly, None),
            "A=5\n\n.pbi\nwait 10\nflush\n.end\n"
        );
    }

    #[test]
    fn test_format_wide_value_in_decimal() {
        let disassembly = Disassembly {
            assignments: vec![Assignment::new("WIDE", BigUint::from(1u8) << 70u32)],
            ..Default::default()
        };
        assert_eq!(format_source(&disassembly, None), "WIDE=1180591620717411303424\n");
    }
}
