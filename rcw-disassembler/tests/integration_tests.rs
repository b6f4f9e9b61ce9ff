//! Integration tests for the RCW disassembler
//!
//! Tests the complete disassembly workflow including:
//! - Field recovery from raw and PBL images
//! - PBI command recovery
//! - Source text output

use rcw_assembler::{assemble, AssembleOptions, Source};
use rcw_disassembler::{disassemble, format_source, DisassemblerError};
use rcw_spec::{Assignment, PbiCommand, RcwError};

const LAYOUT: &str = r#"
    %size=512
    SYS_PLL_RAT[2:6]
    MEM_PLL_RAT[10:15]
    CGA_PLL1_RAT[26:31]
    BOOT_LOC[192:196]
    BOOT_HO[201]
"#;

fn layout_with(extra: &str) -> Source {
    Source::parse(&format!("{}{}", LAYOUT, extra))
}

// ============================================================================
// Raw Image Tests
// ============================================================================

#[test]
fn test_recover_typical_rcw() {
    let values = "SYS_PLL_RAT=8\nMEM_PLL_RAT=16\nBOOT_LOC=24\nBOOT_HO=1\n";
    let image = assemble(&format!("{}{}", LAYOUT, values), &AssembleOptions { pbl: false })
        .unwrap()
        .bytes;

    let layout = layout_with("");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();

    // CGA_PLL1_RAT is zero and therefore omitted
    assert_eq!(
        disassembly.assignments,
        vec![
            Assignment::new("SYS_PLL_RAT", 8u32),
            Assignment::new("MEM_PLL_RAT", 16u32),
            Assignment::new("BOOT_LOC", 24u32),
            Assignment::new("BOOT_HO", 1u32),
        ]
    );
    assert!(disassembly.residual_bits.is_empty());
    assert!(disassembly.pbi.is_empty());
}

#[test]
fn test_unclaimed_bits_are_reported() {
    let mut image = vec![0u8; 64];
    image[0] = 0b1000_0000; // bit 0, no field
    image[1] = 0b0010_0000; // bit 10, MEM_PLL_RAT msb
    image[63] = 0b0000_0001; // bit 511, no field

    let layout = layout_with("");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();
    assert_eq!(disassembly.assignments, vec![Assignment::new("MEM_PLL_RAT", 32u32)]);
    assert_eq!(disassembly.residual_bits, vec![0, 511]);
}

#[test]
fn test_short_buffer_is_right_aligned() {
    // Two bytes land at the end of the 512-bit word
    let layout = Source::parse("%size=512\nLOW[496:511]\n");
    let disassembly = disassemble(&[0x12, 0x34], &layout.layout, &layout.vars).unwrap();
    assert_eq!(disassembly.assignments, vec![Assignment::new("LOW", 0x1234u32)]);
}

// ============================================================================
// PBL Image Tests
// ============================================================================

#[test]
fn test_recover_pbl_image() {
    let source = r#"
        %sysaddr=0e0040
        BOOT_LOC=24
        .pbi
        write 0x0e0040 0x1
        awrite 0x100 0xdeadbeef
        wait 100
        flush
        .end
    "#;
    let image = assemble(&format!("{}{}", LAYOUT, source), &AssembleOptions { pbl: true })
        .unwrap()
        .bytes;

    // The layout file does not define %sysaddr: the default offset applies
    let layout = layout_with("");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();

    assert_eq!(disassembly.assignments, vec![Assignment::new("BOOT_LOC", 24u32)]);
    assert_eq!(
        disassembly.pbi,
        vec![
            PbiCommand::Write { addr: 0x0E0040, value: 1 },
            PbiCommand::AWrite {
                addr: 0x100,
                value: 0xDEAD_BEEF
            },
            PbiCommand::Wait { cycles: 100 },
            PbiCommand::Flush,
        ]
    );
    assert!(disassembly.warnings.is_empty());
}

#[test]
fn test_corrupted_checksum_is_a_warning() {
    let source = "%sysaddr=0e0040\nBOOT_HO=1\n";
    let mut image = assemble(&format!("{}{}", LAYOUT, source), &AssembleOptions::default())
        .unwrap()
        .bytes;
    let last = image.len() - 1;
    image[last] ^= 0xFF;

    let layout = layout_with("");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();
    assert_eq!(disassembly.assignments, vec![Assignment::new("BOOT_HO", 1u32)]);
    assert!(matches!(
        disassembly.warnings[..],
        [DisassemblerError::ChecksumMismatch { .. }]
    ));
}

#[test]
fn test_truncated_pbl_image() {
    let layout = layout_with("");
    // Longer than the word, so framed, but short of preamble + word
    let mut image = vec![0xAA, 0x55, 0xAA, 0x55, 0x81, 0x0E, 0x00, 0x40];
    image.resize(70, 0);
    let err = disassemble(&image, &layout.layout, &layout.vars).unwrap_err();
    assert_eq!(err, DisassemblerError::Rcw(RcwError::Truncated { expected: 72, found: 70 }));
    assert!(err.is_fatal());
}

#[test]
fn test_four_byte_sysaddr_in_layout() {
    let source = "%sysaddr=deadbeef\nSYS_PLL_RAT=8\nBOOT_HO=1\n.pbi\nflush\n.end\n";
    let image = assemble(&format!("{}{}", LAYOUT, source), &AssembleOptions::default())
        .unwrap()
        .bytes;
    // magic 4 + length 1 + sysaddr 4, so the word starts at 9
    assert_eq!(&image[5..9], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(image[9], 0b0001_0000);

    let layout = layout_with("%sysaddr=deadbeef\n");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();
    assert_eq!(
        disassembly.assignments,
        vec![Assignment::new("SYS_PLL_RAT", 8u32), Assignment::new("BOOT_HO", 1u32)]
    );
    assert_eq!(disassembly.pbi, vec![PbiCommand::Flush]);
    assert!(disassembly.residual_bits.is_empty());
    assert!(disassembly.warnings.is_empty());
}

// ============================================================================
// Wide Field Tests
// ============================================================================

#[test]
fn test_recover_field_wider_than_64_bits() {
    let wide = "%size=128\nWIDE[0:99]\n";
    let image = assemble(&format!("{}WIDE=1\n", wide), &AssembleOptions { pbl: false })
        .unwrap()
        .bytes;
    assert_eq!(image[12], 0x10);

    let layout = Source::parse(wide);
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();
    assert_eq!(disassembly.assignments, vec![Assignment::new("WIDE", 1u32)]);
    assert_eq!(format_source(&disassembly, None), "WIDE=1\n");
}

// ============================================================================
// Source Output Tests
// ============================================================================

#[test]
fn test_format_recovered_source() {
    let source = "%sysaddr=0e0040\nSYS_PLL_RAT=8\nBOOT_HO=1\n.pbi\nwait 10\n.end\n";
    let image = assemble(&format!("{}{}", LAYOUT, source), &AssembleOptions::default())
        .unwrap()
        .bytes;

    let layout = layout_with("");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();
    assert_eq!(
        format_source(&disassembly, Some("board.rcwi")),
        "#include <board.rcwi>\n\nSYS_PLL_RAT=8\nBOOT_HO=1\n\n.pbi\nwait 10\n.end\n"
    );
}

#[test]
fn test_formatted_source_reassembles() {
    let values = "SYS_PLL_RAT=31\nCGA_PLL1_RAT=12\nBOOT_HO=1\n";
    let raw = AssembleOptions { pbl: false };
    let image = assemble(&format!("{}{}", LAYOUT, values), &raw).unwrap().bytes;

    let layout = layout_with("");
    let disassembly = disassemble(&image, &layout.layout, &layout.vars).unwrap();
    let text = format_source(&disassembly, None);

    let rebuilt = assemble(&format!("{}{}", LAYOUT, text), &raw).unwrap().bytes;
    assert_eq!(rebuilt, image);
}
