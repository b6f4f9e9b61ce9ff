//! Numeric literals: `0x` hex, `0b` binary, leading-`0` octal, else decimal

use num_bigint::BigUint;

/// Parse an unsigned literal of any length, returning `None` if it is
/// malformed
pub fn parse_number(text: &str) -> Option<BigUint> {
    let text = text.trim();

    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (bin, 2)
    } else if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        (oct, 8)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    // parse_bytes accepts '+' and '_', literals don't
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    BigUint::parse_bytes(digits.as_bytes(), radix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Option<u64> {
        parse_number(text).map(|n| u64::try_from(n).unwrap())
    }

    #[test]
    fn test_decimal() {
        assert_eq!(number("0"), Some(0));
        assert_eq!(number("42"), Some(42));
        assert_eq!(number("18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn test_prefixed() {
        assert_eq!(number("0x1A"), Some(0x1A));
        assert_eq!(number("0XfF"), Some(0xFF));
        assert_eq!(number("0b1010"), Some(10));
        assert_eq!(number("017"), Some(15));
        assert_eq!(number("0o17"), Some(15));
    }

    #[test]
    fn test_longer_than_64_bits() {
        assert_eq!(
            parse_number("18446744073709551616"),
            Some(BigUint::from(u64::MAX) + 1u8)
        );
        let hex = parse_number("0x1000000000000000000000001").unwrap();
        assert_eq!(hex.bits(), 97);
        assert_eq!(hex, (BigUint::from(1u8) << 96u32) + 1u8);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("09"), None);
        assert_eq!(parse_number("12ab"), None);
        assert_eq!(parse_number("+5"), None);
        assert_eq!(parse_number("-1"), None);
        assert_eq!(parse_number("3.14"), None);
        assert_eq!(parse_number("1_000"), None);
    }
}
