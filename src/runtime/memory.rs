/// Classical memory for one shot.
///
/// One zero-initialized cell array per declared region. BIT, OCTET and
/// INTEGER regions share `i64` storage with range checks on write; REAL
/// regions store `f64`. A region is reported back to the caller only once
/// something has written to it, so a declared-but-untouched register is
/// distinguishable from a register of zeros.
use std::collections::BTreeMap;
use crate::backend::{RawValues, ShotMemory};
use crate::compiler::ir::{ArithmeticOperator, MemoryReference, Operand, Program, ScalarType};
use super::RuntimeError;

#[derive(Debug, Clone, PartialEq)]
enum Storage {
    Integer(Vec<i64>),
    Real(Vec<f64>),
}

#[derive(Debug, Clone)]
struct Cell {
    scalar_type: ScalarType,
    storage: Storage,
    written: bool,
}

#[derive(Debug, Clone)]
pub struct ClassicalMemory {
    regions: BTreeMap<String, Cell>,
}

fn fault(msg: String) -> RuntimeError {
    RuntimeError::Fault { msg }
}

impl ClassicalMemory {
    /// Zeroed memory for every region the program declares.
    pub fn new(program: &Program) -> Self {
        let regions = program
            .memory_regions
            .iter()
            .map(|(name, region)| {
                let storage = match region.scalar_type {
                    ScalarType::Real => Storage::Real(vec![0.0; region.length]),
                    _ => Storage::Integer(vec![0; region.length]),
                };
                (name.clone(), Cell { scalar_type: region.scalar_type, storage, written: false })
            })
            .collect();
        Self { regions }
    }

    /// Load values into the leading cells of a REAL region. Marks it written.
    pub fn bind(&mut self, name: &str, values: &[f64]) -> Result<(), RuntimeError> {
        let cell = self.regions.get_mut(name).ok_or_else(|| fault(format!("no region '{name}'")))?;
        match &mut cell.storage {
            Storage::Real(cells) if values.len() <= cells.len() => {
                cells[..values.len()].copy_from_slice(values);
                cell.written = true;
                Ok(())
            }
            Storage::Real(cells) => Err(fault(format!(
                "{} values do not fit region '{name}' of length {}",
                values.len(),
                cells.len()
            ))),
            Storage::Integer(_) => Err(fault(format!("region '{name}' is not REAL"))),
        }
    }

    fn cell(&self, reference: &MemoryReference) -> Result<&Cell, RuntimeError> {
        self.regions
            .get(&reference.name)
            .ok_or_else(|| fault(format!("no region '{}'", reference.name)))
    }

    fn out_of_range(reference: &MemoryReference) -> RuntimeError {
        fault(format!("{reference} is out of range"))
    }

    /// Read a cell as a real number; integer cells widen.
    pub fn read_real(&self, reference: &MemoryReference) -> Result<f64, RuntimeError> {
        let value = match &self.cell(reference)?.storage {
            Storage::Real(cells) => cells.get(reference.index).copied(),
            Storage::Integer(cells) => cells.get(reference.index).map(|v| *v as f64),
        };
        value.ok_or_else(|| Self::out_of_range(reference))
    }

    pub fn read_integer(&self, reference: &MemoryReference) -> Result<i64, RuntimeError> {
        match &self.cell(reference)?.storage {
            Storage::Integer(cells) => {
                cells.get(reference.index).copied().ok_or_else(|| Self::out_of_range(reference))
            }
            Storage::Real(_) => Err(fault(format!("{reference} is REAL, expected an integer cell"))),
        }
    }

    pub fn write_integer(&mut self, reference: &MemoryReference, value: i64) -> Result<(), RuntimeError> {
        let cell = self
            .regions
            .get_mut(&reference.name)
            .ok_or_else(|| fault(format!("no region '{}'", reference.name)))?;
        let fits = match cell.scalar_type {
            ScalarType::Bit => (0..=1).contains(&value),
            ScalarType::Octet => (0..=255).contains(&value),
            ScalarType::Integer | ScalarType::Real => true,
        };
        if !fits {
            return Err(fault(format!("{} cell {reference} cannot hold {value}", cell.scalar_type)));
        }
        match &mut cell.storage {
            Storage::Integer(cells) => {
                let slot = cells.get_mut(reference.index).ok_or_else(|| Self::out_of_range(reference))?;
                *slot = value;
            }
            Storage::Real(cells) => {
                let slot = cells.get_mut(reference.index).ok_or_else(|| Self::out_of_range(reference))?;
                *slot = value as f64;
            }
        }
        cell.written = true;
        Ok(())
    }

    pub fn write_real(&mut self, reference: &MemoryReference, value: f64) -> Result<(), RuntimeError> {
        let cell = self
            .regions
            .get_mut(&reference.name)
            .ok_or_else(|| fault(format!("no region '{}'", reference.name)))?;
        match &mut cell.storage {
            Storage::Real(cells) => {
                let slot = cells.get_mut(reference.index).ok_or_else(|| Self::out_of_range(reference))?;
                *slot = value;
            }
            Storage::Integer(_) => {
                return Err(fault(format!("{reference} is an integer cell, cannot hold {value}")));
            }
        }
        cell.written = true;
        Ok(())
    }

    fn is_real(&self, reference: &MemoryReference) -> Result<bool, RuntimeError> {
        Ok(matches!(self.cell(reference)?.storage, Storage::Real(_)))
    }

    /// `MOVE destination source`
    pub fn move_value(&mut self, destination: &MemoryReference, source: &Operand) -> Result<(), RuntimeError> {
        if self.is_real(destination)? {
            let value = self.operand_real(source)?;
            self.write_real(destination, value)
        } else {
            let value = self.operand_integer(source)?;
            self.write_integer(destination, value)
        }
    }

    /// `ADD|SUB|MUL|DIV destination source`, storing into `destination`.
    pub fn arithmetic(
        &mut self,
        operator: ArithmeticOperator,
        destination: &MemoryReference,
        source: &Operand,
    ) -> Result<(), RuntimeError> {
        if self.is_real(destination)? {
            let (l, r) = (self.read_real(destination)?, self.operand_real(source)?);
            let value = match operator {
                ArithmeticOperator::Add => l + r,
                ArithmeticOperator::Sub => l - r,
                ArithmeticOperator::Mul => l * r,
                ArithmeticOperator::Div => l / r,
            };
            self.write_real(destination, value)
        } else {
            let (l, r) = (self.read_integer(destination)?, self.operand_integer(source)?);
            let value = match operator {
                ArithmeticOperator::Add => l.checked_add(r),
                ArithmeticOperator::Sub => l.checked_sub(r),
                ArithmeticOperator::Mul => l.checked_mul(r),
                ArithmeticOperator::Div => l.checked_div(r),
            }
            .ok_or_else(|| {
                fault(format!("{} {destination} {source} overflowed or divided by zero", operator.mnemonic()))
            })?;
            self.write_integer(destination, value)
        }
    }

    fn operand_real(&self, operand: &Operand) -> Result<f64, RuntimeError> {
        match operand {
            Operand::Integer(n) => Ok(*n as f64),
            Operand::Real(x) => Ok(*x),
            Operand::Address(reference) => self.read_real(reference),
        }
    }

    fn operand_integer(&self, operand: &Operand) -> Result<i64, RuntimeError> {
        match operand {
            Operand::Integer(n) => Ok(*n),
            Operand::Real(x) => Err(fault(format!("real value {x} used where an integer is required"))),
            Operand::Address(reference) => self.read_integer(reference),
        }
    }

    pub fn is_written(&self, name: &str) -> bool {
        self.regions.get(name).is_some_and(|cell| cell.written)
    }

    /// Raw contents of the named regions that were written during the shot.
    /// Names that were never written, or never declared, are omitted.
    pub fn snapshot(&self, names: &[&str]) -> ShotMemory {
        names
            .iter()
            .filter_map(|name| {
                let cell = self.regions.get(*name).filter(|cell| cell.written)?;
                let values = match &cell.storage {
                    Storage::Integer(cells) => RawValues::Integer(cells.clone()),
                    Storage::Real(cells) => RawValues::Real(cells.clone()),
                };
                Some((name.to_string(), values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn memory(src: &str) -> ClassicalMemory {
        ClassicalMemory::new(&compile(src).unwrap())
    }

    fn r(name: &str, index: usize) -> MemoryReference {
        MemoryReference::new(name, index)
    }

    #[test]
    fn test_starts_zeroed_and_unwritten() {
        let mem = memory("DECLARE ro BIT[2]\nDECLARE theta REAL");
        assert_eq!(mem.read_integer(&r("ro", 1)).unwrap(), 0);
        assert_eq!(mem.read_real(&r("theta", 0)).unwrap(), 0.0);
        assert!(!mem.is_written("ro"));
        assert!(mem.snapshot(&["ro", "theta"]).is_empty());
    }

    #[test]
    fn test_bind_marks_written() {
        let mut mem = memory("DECLARE theta REAL[3]");
        mem.bind("theta", &[1.5, 2.5]).unwrap();
        assert!(mem.is_written("theta"));
        let snap = mem.snapshot(&["theta"]);
        assert_eq!(snap["theta"], RawValues::Real(vec![1.5, 2.5, 0.0]));
    }

    #[test]
    fn test_bind_rejects_overflow_and_integer_regions() {
        let mut mem = memory("DECLARE theta REAL\nDECLARE ro BIT");
        assert!(mem.bind("theta", &[1.0, 2.0]).is_err());
        assert!(mem.bind("ro", &[1.0]).is_err());
    }

    #[test]
    fn test_bit_range_enforced() {
        let mut mem = memory("DECLARE ro BIT\nDECLARE oct OCTET");
        assert!(mem.write_integer(&r("ro", 0), 1).is_ok());
        assert!(mem.write_integer(&r("ro", 0), 2).is_err());
        assert!(mem.write_integer(&r("oct", 0), 255).is_ok());
        assert!(mem.write_integer(&r("oct", 0), 256).is_err());
    }

    #[test]
    fn test_move_and_arithmetic() {
        let mut mem = memory("DECLARE x REAL\nDECLARE n INTEGER[2]");
        mem.move_value(&r("x", 0), &Operand::Real(3.141)).unwrap();
        mem.arithmetic(ArithmeticOperator::Mul, &r("x", 0), &Operand::Integer(2)).unwrap();
        assert_eq!(mem.read_real(&r("x", 0)).unwrap(), 6.282);

        mem.move_value(&r("n", 1), &Operand::Integer(7)).unwrap();
        mem.move_value(&r("n", 0), &Operand::Address(r("n", 1))).unwrap();
        mem.arithmetic(ArithmeticOperator::Sub, &r("n", 0), &Operand::Integer(10)).unwrap();
        assert_eq!(mem.read_integer(&r("n", 0)).unwrap(), -3);
    }

    #[test]
    fn test_integer_divide_by_zero_faults() {
        let mut mem = memory("DECLARE n INTEGER");
        let err = mem.arithmetic(ArithmeticOperator::Div, &r("n", 0), &Operand::Integer(0)).unwrap_err();
        assert!(matches!(err, RuntimeError::Fault { .. }));
    }

    #[test]
    fn test_snapshot_only_requested_written_regions() {
        let mut mem = memory("DECLARE ro BIT[2]\nDECLARE aux BIT");
        mem.write_integer(&r("ro", 1), 1).unwrap();
        mem.write_integer(&r("aux", 0), 1).unwrap();
        let snap = mem.snapshot(&["ro", "missing"]);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap["ro"], RawValues::Integer(vec![0, 1]));
    }
}
