/// Dispatch outcomes and typed register data.
///
/// One `ExecutionResult` per dispatch. A successful one owns a
/// `ResultStore` that nothing else shares: rebinding parameters and
/// dispatching again produces a new store, never a view into this one.
use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, RawValues, ShotMemory};
use crate::compiler::Program;
use crate::error::Error;
use crate::parameters::ReadSet;

// ── Register data ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// BIT, OCTET and INTEGER registers.
    Byte,
    /// REAL registers.
    Real,
}

/// One register's values: one row per shot, shot 0 first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegisterData {
    Byte(Vec<Vec<i8>>),
    Real(Vec<Vec<f64>>),
}

impl RegisterData {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Byte(_) => ElementType::Byte,
            Self::Real(_) => ElementType::Real,
        }
    }

    pub fn number_of_shots(&self) -> usize {
        match self {
            Self::Byte(rows) => rows.len(),
            Self::Real(rows) => rows.len(),
        }
    }

    /// Elements per row. Every row has the same length.
    pub fn shot_length(&self) -> usize {
        match self {
            Self::Byte(rows) => rows.first().map_or(0, Vec::len),
            Self::Real(rows) => rows.first().map_or(0, Vec::len),
        }
    }

    pub fn as_byte(&self) -> Option<&[Vec<i8>]> {
        match self {
            Self::Byte(rows) => Some(rows),
            Self::Real(_) => None,
        }
    }

    pub fn as_real(&self) -> Option<&[Vec<f64>]> {
        match self {
            Self::Real(rows) => Some(rows),
            Self::Byte(_) => None,
        }
    }

    pub fn into_byte(self) -> Option<Vec<Vec<i8>>> {
        match self {
            Self::Byte(rows) => Some(rows),
            Self::Real(_) => None,
        }
    }

    pub fn into_real(self) -> Option<Vec<Vec<f64>>> {
        match self {
            Self::Real(rows) => Some(rows),
            Self::Byte(_) => None,
        }
    }
}

// ── Result store ──────────────────────────────────────────────────────────

/// Typed registers from one successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultStore {
    registers: BTreeMap<String, RegisterData>,
    number_of_shots: usize,
    duration: Duration,
}

impl ResultStore {
    /// Turn raw backend output into typed rows for every register in
    /// `reads`. All-or-nothing: the first register that fails to decode
    /// fails the whole store.
    pub(crate) fn decode(
        program: &Program,
        reads: &ReadSet,
        shots: Vec<ShotMemory>,
        expected_shots: usize,
        duration: Duration,
    ) -> Result<Self, Error> {
        if shots.len() != expected_shots {
            return Err(Error::Backend(BackendError::Failed(format!(
                "returned {} shots, expected {expected_shots}",
                shots.len()
            ))));
        }

        let mut registers = BTreeMap::new();
        for name in reads.iter() {
            let region = program.region(name).ok_or_else(|| Error::RegisterNotDeclared {
                name: name.to_string(),
            })?;
            let fail = |reason: String| Error::Decode { name: name.to_string(), reason };

            let mut rows_byte: Vec<Vec<i8>> = Vec::new();
            let mut rows_real: Vec<Vec<f64>> = Vec::new();
            for (shot, memory) in shots.iter().enumerate() {
                let raw = memory
                    .get(name)
                    .ok_or_else(|| fail(format!("shot {shot} never wrote to the register")))?;
                if raw.len() != region.length {
                    return Err(fail(format!(
                        "shot {shot} returned {} values, declared length is {}",
                        raw.len(),
                        region.length
                    )));
                }
                match (raw, region.scalar_type.is_integral()) {
                    (RawValues::Integer(values), true) => {
                        let row = values
                            .iter()
                            .map(|v| i8::try_from(*v))
                            .collect::<Result<Vec<i8>, _>>()
                            .map_err(|_| fail(format!("shot {shot} holds a value outside the byte range")))?;
                        rows_byte.push(row);
                    }
                    (RawValues::Real(values), false) => rows_real.push(values.clone()),
                    (_, integral) => {
                        return Err(fail(format!(
                            "backend returned {} values for a {} register",
                            if integral { "real" } else { "integer" },
                            region.scalar_type
                        )));
                    }
                }
            }

            let data = if region.scalar_type.is_integral() {
                RegisterData::Byte(rows_byte)
            } else {
                RegisterData::Real(rows_real)
            };
            registers.insert(name.to_string(), data);
        }

        Ok(Self { registers, number_of_shots: expected_shots, duration })
    }

    /// `None` when the register was not requested or not declared.
    pub fn get_data(&self, name: &str) -> Option<&RegisterData> {
        self.registers.get(name)
    }

    /// Requested registers, sorted.
    pub fn register_names(&self) -> impl Iterator<Item = &str> {
        self.registers.keys().map(String::as_str)
    }

    pub fn number_of_shots(&self) -> usize {
        self.number_of_shots
    }

    /// Wall time the backend spent running the shots.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }
}

// ── Execution result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Error(Error),
    Success(ResultStore),
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(err),
            Self::Success(_) => None,
        }
    }

    pub fn store(&self) -> Option<&ResultStore> {
        match self {
            Self::Success(store) => Some(store),
            Self::Error(_) => None,
        }
    }

    /// Typed rows for `name`; always `None` on an error result.
    pub fn get_data(&self, name: &str) -> Option<&RegisterData> {
        self.store()?.get_data(name)
    }

    pub fn into_result(self) -> Result<ResultStore, Error> {
        match self {
            Self::Success(store) => Ok(store),
            Self::Error(err) => Err(err),
        }
    }

    /// Drop the result and every buffer it owns.
    pub fn release(self) {}
}

impl From<Result<ResultStore, Error>> for ExecutionResult {
    fn from(result: Result<ResultStore, Error>) -> Self {
        match result {
            Ok(store) => Self::Success(store),
            Err(err) => Self::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn reads(names: &[&str]) -> ReadSet {
        let mut set = ReadSet::new();
        names.iter().for_each(|n| set.insert(*n));
        set
    }

    fn shot(entries: &[(&str, RawValues)]) -> ShotMemory {
        entries.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
    }

    fn program() -> Program {
        compile("DECLARE ro BIT[2]\nDECLARE x REAL\nDECLARE n INTEGER").unwrap()
    }

    #[test]
    fn test_decode_bytes_and_reals() {
        let shots = vec![
            shot(&[("ro", RawValues::Integer(vec![0, 0])), ("x", RawValues::Real(vec![3.141]))]),
            shot(&[("ro", RawValues::Integer(vec![1, 1])), ("x", RawValues::Real(vec![3.141]))]),
        ];
        let store = ResultStore::decode(&program(), &reads(&["ro", "x"]), shots, 2, Duration::ZERO).unwrap();
        assert_eq!(store.number_of_shots(), 2);
        assert_eq!(store.register_names().collect::<Vec<_>>(), vec!["ro", "x"]);

        let ro = store.get_data("ro").unwrap();
        assert_eq!(ro.element_type(), ElementType::Byte);
        assert_eq!(ro.shot_length(), 2);
        assert_eq!(ro.as_byte().unwrap(), &[vec![0i8, 0], vec![1, 1]]);

        let x = store.get_data("x").unwrap();
        assert_eq!(x.as_real().unwrap(), &[vec![3.141], vec![3.141]]);
        assert!(store.get_data("n").is_none());
    }

    #[test]
    fn test_missing_from_a_shot_fails_whole_decode() {
        let shots = vec![
            shot(&[("ro", RawValues::Integer(vec![0, 0]))]),
            shot(&[]),
        ];
        let err = ResultStore::decode(&program(), &reads(&["ro"]), shots, 2, Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::Decode { ref name, .. } if name == "ro"));
    }

    #[test]
    fn test_byte_range_enforced() {
        let shots = vec![shot(&[("n", RawValues::Integer(vec![300]))])];
        let err = ResultStore::decode(&program(), &reads(&["n"]), shots, 1, Duration::ZERO).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }

    #[test]
    fn test_wrong_row_length_rejected() {
        let shots = vec![shot(&[("ro", RawValues::Integer(vec![1]))])];
        assert!(ResultStore::decode(&program(), &reads(&["ro"]), shots, 1, Duration::ZERO).is_err());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let shots = vec![shot(&[("x", RawValues::Integer(vec![1]))])];
        assert!(ResultStore::decode(&program(), &reads(&["x"]), shots, 1, Duration::ZERO).is_err());
    }

    #[test]
    fn test_shot_count_mismatch_is_backend_error() {
        let err = ResultStore::decode(&program(), &reads(&[]), vec![], 3, Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::Backend(BackendError::Failed(_))));
    }

    #[test]
    fn test_execution_result_accessors() {
        let ok = ExecutionResult::from(ResultStore::decode(&program(), &reads(&[]), vec![ShotMemory::new()], 1, Duration::ZERO));
        assert!(ok.is_success());
        assert!(ok.error().is_none());
        assert!(ok.store().unwrap().is_empty());

        let failed = ExecutionResult::Error(Error::ShotsMustBePositive);
        assert!(!failed.is_success());
        assert!(failed.get_data("ro").is_none());
        assert_eq!(failed.into_result().unwrap_err(), Error::ShotsMustBePositive);
    }

    #[test]
    fn test_register_data_serializes_untagged() {
        let bytes = RegisterData::Byte(vec![vec![0, 1]]);
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(json, "[[0,1]]");
        assert_eq!(serde_json::from_str::<RegisterData>(&json).unwrap(), bytes);

        let reals: RegisterData = serde_json::from_str("[[1.5,2.5]]").unwrap();
        assert_eq!(reals.into_real().unwrap(), vec![vec![1.5, 2.5]]);
    }
}
