//! # Source Variables
//!
//! `%name=value` lines set free-form variables. Two of them shape the
//! binary image:
//!
//! - `%size`: RCW width in bits (required, positive multiple of 8)
//! - `%sysaddr`: hex bytes placed after the PBL length byte (PBL only)

use std::collections::BTreeMap;

use crate::error::{RcwError, Result};
use crate::number::parse_number;

pub const SIZE_VAR: &str = "size";
pub const SYSADDR_VAR: &str = "sysaddr";

/// Variables collected from `%key=value` lines (last write wins)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Variables {
    vars: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// RCW width in bits
    pub fn size(&self) -> Result<usize> {
        let raw = self.get(SIZE_VAR).ok_or(RcwError::MissingSize)?;

        match parse_number(raw).map(usize::try_from) {
            Some(Ok(size)) if size > 0 && size % 8 == 0 => Ok(size),
            _ => Err(RcwError::InvalidSize(raw.to_string())),
        }
    }

    /// Raw bytes of `%sysaddr`, if defined
    pub fn sysaddr(&self) -> Result<Option<Vec<u8>>> {
        self.get(SYSADDR_VAR).map(parse_hex_bytes).transpose()
    }
}

/// Decode a hex string (optional `0x` prefix) into bytes
fn parse_hex_bytes(raw: &str) -> Result<Vec<u8>> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    if digits.is_empty() || digits.len() % 2 != 0 {
        return Err(RcwError::InvalidSysaddr(raw.to_string()));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| RcwError::InvalidSysaddr(raw.to_string()))
        })
        .collect()
}
