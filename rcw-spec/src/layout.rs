//! # RCW Layout
//!
//! The set of named bit fields declared by an `.rcwi` file, in declaration
//! order.

use std::collections::HashMap;
use std::fmt;

use num_bigint::BigUint;

use crate::error::{RcwError, Result};

/// Named, inclusive bit range (MSB-first positions)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitField {
    pub name: String,
    pub begin: usize,
    pub end: usize,
}

impl BitField {
    pub fn new(name: impl Into<String>, begin: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            begin,
            end,
        }
    }

    /// Number of bits in the field
    #[inline]
    pub fn width(&self) -> usize {
        (self.end - self.begin).saturating_add(1)
    }

    /// True if `pos` lies inside `[begin, end]`
    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.begin <= pos && pos <= self.end
    }
}

impl fmt::Display for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}[{}]", self.name, self.begin)
        } else {
            write!(f, "{}[{}:{}]", self.name, self.begin, self.end)
        }
    }
}

/// A value given to a field by a `NAME=value` line
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub name: String,
    pub value: BigUint,
}

impl Assignment {
    pub fn new(name: impl Into<String>, value: impl Into<BigUint>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Ordered registry of bit fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    fields: Vec<BitField>,
    index: HashMap<String, usize>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the layout.
    ///
    /// A field overlaps an existing one when either of its endpoints falls
    /// inside the existing range. Rejected fields are not added.
    pub fn define(&mut self, name: &str, begin: usize, end: usize) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(RcwError::DuplicateField(name.to_string()));
        }

        if begin > end {
            return Err(RcwError::InvalidRange {
                name: name.to_string(),
                begin,
                end,
            });
        }

        let field = BitField::new(name, begin, end);
        if let Some(other) = self
            .fields
            .iter()
            .find(|f| f.contains(begin) || f.contains(end))
        {
            return Err(RcwError::Overlap {
                name: name.to_string(),
                other: other.name.clone(),
            });
        }

        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&BitField> {
        self.index
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| RcwError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in declaration order
    pub fn ordered_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BitField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a BitField;
    type IntoIter = std::slice::Iter<'a, BitField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
