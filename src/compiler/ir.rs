/// Intermediate representation of a compiled program.
///
/// A `Program` is the immutable product of the compiler: the declared
/// classical memory regions plus a flat instruction sequence. Nothing
/// downstream re-parses source; parameter shapes and readable registers are
/// answered from `memory_regions` alone.
///
/// `Display` re-emits valid source, so a program survives a print/compile
/// round trip.
use std::collections::BTreeMap;
use std::fmt;

// ── Classical memory ──────────────────────────────────────────────────────

/// Element type of a declared memory region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bit,
    Octet,
    Integer,
    Real,
}

impl ScalarType {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "BIT" => Some(Self::Bit),
            "OCTET" => Some(Self::Octet),
            "INTEGER" => Some(Self::Integer),
            "REAL" => Some(Self::Real),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::Octet => "OCTET",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
        }
    }

    /// BIT, OCTET and INTEGER share integer storage at runtime.
    pub fn is_integral(self) -> bool {
        !matches!(self, Self::Real)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Shape of one `DECLARE`d region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub scalar_type: ScalarType,
    pub length: usize,
}

/// `name[index]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryReference {
    pub name: String,
    pub index: usize,
}

impl MemoryReference {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self { name: name.into(), index }
    }
}

impl fmt::Display for MemoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

// ── Expressions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Star,
    Slash,
}

impl InfixOperator {
    fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Star => '*',
            Self::Slash => '/',
        }
    }
}

/// Gate angle. Memory references are resolved against classical memory at
/// the moment the gate executes, which is how bound parameters reach gates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Pi,
    Address(MemoryReference),
    Negate(Box<Expression>),
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn evaluate<F>(&self, read: &F) -> f64
    where
        F: Fn(&MemoryReference) -> f64,
    {
        match self {
            Self::Number(n) => *n,
            Self::Pi => std::f64::consts::PI,
            Self::Address(reference) => read(reference),
            Self::Negate(inner) => -inner.evaluate(read),
            Self::Infix { left, operator, right } => {
                let (l, r) = (left.evaluate(read), right.evaluate(read));
                match operator {
                    InfixOperator::Plus => l + r,
                    InfixOperator::Minus => l - r,
                    InfixOperator::Star => l * r,
                    InfixOperator::Slash => l / r,
                }
            }
        }
    }

    /// Every memory reference the expression reads.
    pub fn addresses(&self) -> Vec<&MemoryReference> {
        match self {
            Self::Number(_) | Self::Pi => vec![],
            Self::Address(reference) => vec![reference],
            Self::Negate(inner) => inner.addresses(),
            Self::Infix { left, right, .. } => {
                let mut out = left.addresses();
                out.extend(right.addresses());
                out
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n:?}"),
            Self::Pi => f.write_str("pi"),
            Self::Address(reference) => write!(f, "{reference}"),
            Self::Negate(inner) => write!(f, "-({inner})"),
            Self::Infix { left, operator, right } => {
                write!(f, "({left} {} {right})", operator.symbol())
            }
        }
    }
}

// ── Classical operands ────────────────────────────────────────────────────

/// Right-hand side of MOVE and the arithmetic instructions.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f64),
    Address(MemoryReference),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(x) => write!(f, "{x:?}"),
            Self::Address(reference) => write!(f, "{reference}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOperator {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        }
    }
}

// ── Instruction ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // ── Single-qubit gates ──────────────────────────────────────────────
    I(usize),
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    S(usize),
    T(usize),
    Rx    { qubit: usize, theta: Expression },
    Ry    { qubit: usize, theta: Expression },
    Rz    { qubit: usize, theta: Expression },
    Phase { qubit: usize, theta: Expression },

    // ── Multi-qubit gates ───────────────────────────────────────────────
    Cnot    { control: usize, target: usize },
    Cz      { control: usize, target: usize },
    Swap    { qubit_a: usize, qubit_b: usize },
    Toffoli { control0: usize, control1: usize, target: usize },

    // ── Measurement and reset ───────────────────────────────────────────
    /// `target: None` measures and discards the outcome.
    Measure { qubit: usize, target: Option<MemoryReference> },
    /// `None` resets every qubit.
    Reset(Option<usize>),

    // ── Classical memory ────────────────────────────────────────────────
    Move { destination: MemoryReference, source: Operand },
    Arithmetic {
        operator: ArithmeticOperator,
        destination: MemoryReference,
        source: Operand,
    },

    // ── Control flow ────────────────────────────────────────────────────
    Label(String),
    Jump { label: String },
    /// Jump when the condition cell is non-zero.
    JumpWhen { label: String, condition: MemoryReference },
    /// Jump when the condition cell is zero.
    JumpUnless { label: String, condition: MemoryReference },
    Halt,
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::I(_)                  => "I",
            Self::H(_)                  => "H",
            Self::X(_)                  => "X",
            Self::Y(_)                  => "Y",
            Self::Z(_)                  => "Z",
            Self::S(_)                  => "S",
            Self::T(_)                  => "T",
            Self::Rx { .. }             => "RX",
            Self::Ry { .. }             => "RY",
            Self::Rz { .. }             => "RZ",
            Self::Phase { .. }          => "PHASE",
            Self::Cnot { .. }           => "CNOT",
            Self::Cz { .. }             => "CZ",
            Self::Swap { .. }           => "SWAP",
            Self::Toffoli { .. }        => "CCNOT",
            Self::Measure { .. }        => "MEASURE",
            Self::Reset(_)              => "RESET",
            Self::Move { .. }           => "MOVE",
            Self::Arithmetic { operator, .. } => operator.mnemonic(),
            Self::Label(_)              => "LABEL",
            Self::Jump { .. }           => "JUMP",
            Self::JumpWhen { .. }       => "JUMP-WHEN",
            Self::JumpUnless { .. }     => "JUMP-UNLESS",
            Self::Halt                  => "HALT",
        }
    }

    pub fn is_gate(&self) -> bool {
        matches!(self,
            Self::I(_) | Self::H(_) | Self::X(_) | Self::Y(_) | Self::Z(_) | Self::S(_) | Self::T(_)
            | Self::Rx { .. } | Self::Ry { .. } | Self::Rz { .. } | Self::Phase { .. }
            | Self::Cnot { .. } | Self::Cz { .. } | Self::Swap { .. } | Self::Toffoli { .. }
        )
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::Measure { .. })
    }

    pub fn is_control_flow(&self) -> bool {
        matches!(self,
            Self::Label(_) | Self::Jump { .. } | Self::JumpWhen { .. } | Self::JumpUnless { .. }
            | Self::Halt
        )
    }

    /// Qubit indices this instruction touches.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Self::I(q) | Self::H(q) | Self::X(q) | Self::Y(q) | Self::Z(q)
            | Self::S(q) | Self::T(q)                                => vec![*q],
            Self::Rx { qubit, .. } | Self::Ry { qubit, .. }
            | Self::Rz { qubit, .. } | Self::Phase { qubit, .. }
            | Self::Measure { qubit, .. }                            => vec![*qubit],
            Self::Cnot { control, target }
            | Self::Cz { control, target }                           => vec![*control, *target],
            Self::Swap { qubit_a, qubit_b }                          => vec![*qubit_a, *qubit_b],
            Self::Toffoli { control0, control1, target }             => vec![*control0, *control1, *target],
            Self::Reset(q)                                           => q.iter().copied().collect(),
            Self::Move { .. } | Self::Arithmetic { .. } | Self::Label(_) | Self::Jump { .. }
            | Self::JumpWhen { .. } | Self::JumpUnless { .. } | Self::Halt => vec![],
        }
    }

    /// Angle expression of a parametric gate.
    pub fn angle(&self) -> Option<&Expression> {
        match self {
            Self::Rx { theta, .. } | Self::Ry { theta, .. }
            | Self::Rz { theta, .. } | Self::Phase { theta, .. } => Some(theta),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I(q) | Self::H(q) | Self::X(q) | Self::Y(q) | Self::Z(q)
            | Self::S(q) | Self::T(q) => write!(f, "{} {q}", self.mnemonic()),
            Self::Rx { qubit, theta } | Self::Ry { qubit, theta }
            | Self::Rz { qubit, theta } | Self::Phase { qubit, theta } => {
                write!(f, "{}({theta}) {qubit}", self.mnemonic())
            }
            Self::Cnot { control, target } | Self::Cz { control, target } => {
                write!(f, "{} {control} {target}", self.mnemonic())
            }
            Self::Swap { qubit_a, qubit_b } => write!(f, "SWAP {qubit_a} {qubit_b}"),
            Self::Toffoli { control0, control1, target } => {
                write!(f, "CCNOT {control0} {control1} {target}")
            }
            Self::Measure { qubit, target: Some(target) } => write!(f, "MEASURE {qubit} {target}"),
            Self::Measure { qubit, target: None } => write!(f, "MEASURE {qubit}"),
            Self::Reset(Some(q)) => write!(f, "RESET {q}"),
            Self::Reset(None) => write!(f, "RESET"),
            Self::Move { destination, source } => write!(f, "MOVE {destination} {source}"),
            Self::Arithmetic { operator, destination, source } => {
                write!(f, "{} {destination} {source}", operator.mnemonic())
            }
            Self::Label(name) => write!(f, "LABEL @{name}"),
            Self::Jump { label } => write!(f, "JUMP @{label}"),
            Self::JumpWhen { label, condition } => write!(f, "JUMP-WHEN @{label} {condition}"),
            Self::JumpUnless { label, condition } => write!(f, "JUMP-UNLESS @{label} {condition}"),
            Self::Halt => write!(f, "HALT"),
        }
    }
}

// ── Program ───────────────────────────────────────────────────────────────

/// A compiled, validated program. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Highest qubit index used, plus one. Zero for purely classical programs.
    pub num_qubits: usize,
    pub instructions: Vec<Instruction>,
    /// Declared regions, ordered by name.
    pub memory_regions: BTreeMap<String, MemoryRegion>,
    pub gate_count: usize,
    pub measure_count: usize,
}

impl Program {
    pub(crate) fn new(
        memory_regions: BTreeMap<String, MemoryRegion>,
        instructions: Vec<Instruction>,
    ) -> Self {
        let num_qubits = instructions
            .iter()
            .flat_map(Instruction::qubits)
            .max()
            .map_or(0, |q| q + 1);
        let gate_count = instructions.iter().filter(|i| i.is_gate()).count();
        let measure_count = instructions.iter().filter(|i| i.is_measurement()).count();
        Self { num_qubits, instructions, memory_regions, gate_count, measure_count }
    }

    pub fn region(&self, name: &str) -> Option<&MemoryRegion> {
        self.memory_regions.get(name)
    }

    /// Regions that can receive bound parameter values: every REAL region.
    pub fn parameter_shapes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.memory_regions
            .iter()
            .filter(|(_, region)| region.scalar_type == ScalarType::Real)
            .map(|(name, region)| (name.as_str(), region.length))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, region) in &self.memory_regions {
            writeln!(f, "DECLARE {name} {}[{}]", region.scalar_type, region.length)?;
        }
        for instr in &self.instructions {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}
