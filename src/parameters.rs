/// Parameter table and memory read-set.
///
/// Both only record intent. Nothing here knows about a program; the checks
/// against declared regions run once per dispatch in `validate`.
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use crate::compiler::ir::{Program, ScalarType};
use crate::error::Error;

/// `(name, index) → value` bindings for REAL regions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParameters {
    slots: BTreeMap<String, BTreeMap<usize, f64>>,
}

impl BoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name[index] = value`, overwriting any earlier binding.
    pub fn set(&mut self, name: impl Into<String>, index: usize, value: f64) {
        self.slots.entry(name.into()).or_default().insert(index, value);
    }

    pub fn get(&self, name: &str, index: usize) -> Option<f64> {
        self.slots.get(name)?.get(&index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bound region names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Dense values for `name` over a region of `length` cells. Gaps are
    /// `0.0`; bindings at or past `length` are left out.
    pub fn values(&self, name: &str, length: usize) -> Vec<f64> {
        let mut dense = vec![0.0; length];
        if let Some(slots) = self.slots.get(name) {
            for (&index, &value) in slots.range(..length) {
                dense[index] = value;
            }
        }
        dense
    }

    /// Check every binding against the program's REAL regions, in name
    /// order then index order. The first mismatch wins.
    pub fn validate(&self, program: &Program) -> Result<(), Error> {
        for (name, slots) in &self.slots {
            let region = program
                .region(name)
                .ok_or_else(|| Error::ParameterNotDeclared { name: name.clone() })?;
            if region.scalar_type != ScalarType::Real {
                return Err(Error::ParameterNotReal {
                    name: name.clone(),
                    scalar_type: region.scalar_type,
                });
            }
            if let Some(&index) = slots.keys().find(|&&index| index >= region.length) {
                return Err(Error::ParameterIndexOutOfRange {
                    name: name.clone(),
                    index,
                    length: region.length,
                });
            }
        }
        Ok(())
    }
}

/// Register read back when the caller never asked for one.
pub const DEFAULT_READOUT: &str = "ro";

/// Registers the caller wants back. Set semantics, sorted for stable
/// validation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSet {
    names: BTreeSet<String>,
}

impl ReadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The set a dispatch actually reads: `self`, or `{ro}` when empty.
    pub fn or_default_readout(&self) -> Cow<'_, ReadSet> {
        if self.is_empty() {
            let mut reads = ReadSet::new();
            reads.insert(DEFAULT_READOUT);
            Cow::Owned(reads)
        } else {
            Cow::Borrowed(self)
        }
    }

    pub fn validate(&self, program: &Program) -> Result<(), Error> {
        match self.iter().find(|name| program.region(name).is_none()) {
            Some(name) => Err(Error::RegisterNotDeclared { name: name.to_string() }),
            None => Ok(()),
        }
    }
}
