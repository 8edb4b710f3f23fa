/// Parser: converts a token stream into a validated `Program`.
///
/// Grammar (simplified BNF):
///   statement   := declare | gate | measure | reset | classical | flow | 'PRAGMA' ANY*
///   declare     := 'DECLARE' IDENT TYPE ('[' INT ']')?
///   gate        := ('I'|'H'|'X'|'Y'|'Z'|'S'|'T') INT
///                | ('RX'|'RY'|'RZ'|'PHASE') '(' expr ')' INT
///                | ('CNOT'|'CZ'|'SWAP') INT INT
///                | 'CCNOT' INT INT INT
///   measure     := 'MEASURE' INT memref?
///   reset       := 'RESET' INT?
///   classical   := ('MOVE'|'ADD'|'SUB'|'MUL'|'DIV') memref operand
///   flow        := 'LABEL' LABEL | 'JUMP' LABEL
///                | ('JUMP-WHEN'|'JUMP-UNLESS') LABEL memref | 'HALT'
///   memref      := IDENT ('[' INT ']')?
///   expr        := term (('+'|'-') term)*
///   term        := unary (('*'|'/') unary)*
///   unary       := '-' unary | primary
///   primary     := INT | FLOAT | 'pi' | memref | '(' expr ')'
///
/// Validation runs after every line parsed, so declarations may follow use:
///   - regions declared once, with length >= 1
///   - every memory reference names a declared region, index in range
///   - MEASURE and jump conditions target BIT/OCTET/INTEGER regions
///   - gate angles read only REAL regions
///   - classical moves keep real and integer storage apart
///   - multi-qubit gates use distinct qubits, all below `MAX_QUBITS`
///   - labels unique, every jump target defined
use std::collections::{BTreeMap, HashSet};
use super::{
    CompileError,
    ir::{
        ArithmeticOperator, Expression, InfixOperator, Instruction, MemoryReference,
        MemoryRegion, Operand, Program, ScalarType,
    },
    lexer::{Spanned, Token},
};
use crate::core::MAX_QUBITS;

// A parsed line: a declaration, an instruction, or something to drop.
enum Item {
    Declare { name: String, region: MemoryRegion },
    Instr(Instruction),
    Skip,
}

// ── Public API ────────────────────────────────────────────────────────────

/// Parse a token stream (output of the lexer) into a validated Program.
pub fn parse(statements: Vec<Vec<Spanned>>) -> Result<Program, CompileError> {
    let mut regions: BTreeMap<String, MemoryRegion> = BTreeMap::new();
    let mut body: Vec<Instruction> = Vec::with_capacity(statements.len());

    for stmt in &statements {
        match parse_statement(stmt)? {
            Item::Declare { name, region } => {
                if region.length == 0 {
                    return Err(CompileError::Validation {
                        msg: format!("region '{name}' must have length of at least 1"),
                    });
                }
                if regions.contains_key(&name) {
                    return Err(CompileError::Validation {
                        msg: format!("region '{name}' declared more than once"),
                    });
                }
                regions.insert(name, region);
            }
            Item::Instr(instr) => body.push(instr),
            Item::Skip => {}
        }
    }

    validate_qubits(&body)?;
    validate_memory(&body, &regions)?;
    validate_labels(&body)?;

    Ok(Program::new(regions, body))
}

// ── Statement parser ──────────────────────────────────────────────────────

fn parse_statement(tokens: &[Spanned]) -> Result<Item, CompileError> {
    debug_assert!(!tokens.is_empty());
    let line = tokens[0].line;

    let mnemonic = match &tokens[0].token {
        Token::Ident(word) => word.to_ascii_uppercase(),
        other => {
            return Err(CompileError::Parse {
                line,
                msg: format!("expected an instruction, found '{}'", other.display()),
            });
        }
    };

    let mut cur = Cursor { tokens, pos: 1, line, mnemonic: mnemonic.clone() };

    let item = match mnemonic.as_str() {
        // ── Directives ─────────────────────────────────────────────────
        "PRAGMA" => return Ok(Item::Skip),
        "DECLARE" => {
            let name = cur.ident("region name")?;
            if name.eq_ignore_ascii_case("pi") {
                return Err(cur.error("'pi' is reserved and cannot name a region"));
            }
            let type_word = cur.ident("scalar type")?;
            let scalar_type = ScalarType::from_keyword(&type_word)
                .ok_or_else(|| cur.error(format!("unknown scalar type '{type_word}'")))?;
            let length = if cur.eat(&Token::LBracket) {
                let n = cur.index()?;
                cur.expect(Token::RBracket)?;
                n
            } else {
                1
            };
            Item::Declare { name, region: MemoryRegion { scalar_type, length } }
        }

        // ── Single-qubit gates ─────────────────────────────────────────
        "I" => Item::Instr(Instruction::I(cur.qubit()?)),
        "H" => Item::Instr(Instruction::H(cur.qubit()?)),
        "X" => Item::Instr(Instruction::X(cur.qubit()?)),
        "Y" => Item::Instr(Instruction::Y(cur.qubit()?)),
        "Z" => Item::Instr(Instruction::Z(cur.qubit()?)),
        "S" => Item::Instr(Instruction::S(cur.qubit()?)),
        "T" => Item::Instr(Instruction::T(cur.qubit()?)),

        // ── Parametric gates ───────────────────────────────────────────
        "RX" | "RY" | "RZ" | "PHASE" => {
            cur.expect(Token::LParen)?;
            let theta = cur.expression()?;
            cur.expect(Token::RParen)?;
            let qubit = cur.qubit()?;
            Item::Instr(match mnemonic.as_str() {
                "RX" => Instruction::Rx { qubit, theta },
                "RY" => Instruction::Ry { qubit, theta },
                "RZ" => Instruction::Rz { qubit, theta },
                _    => Instruction::Phase { qubit, theta },
            })
        }

        // ── Multi-qubit gates ──────────────────────────────────────────
        "CNOT" => Item::Instr(Instruction::Cnot { control: cur.qubit()?, target: cur.qubit()? }),
        "CZ"   => Item::Instr(Instruction::Cz { control: cur.qubit()?, target: cur.qubit()? }),
        "SWAP" => Item::Instr(Instruction::Swap { qubit_a: cur.qubit()?, qubit_b: cur.qubit()? }),
        "CCNOT" => Item::Instr(Instruction::Toffoli {
            control0: cur.qubit()?,
            control1: cur.qubit()?,
            target:   cur.qubit()?,
        }),

        // ── Measurement and reset ──────────────────────────────────────
        "MEASURE" => {
            let qubit = cur.qubit()?;
            let target = if cur.at_end() { None } else { Some(cur.memory_reference()?) };
            Item::Instr(Instruction::Measure { qubit, target })
        }
        "RESET" => {
            let qubit = if cur.at_end() { None } else { Some(cur.qubit()?) };
            Item::Instr(Instruction::Reset(qubit))
        }

        // ── Classical memory ───────────────────────────────────────────
        "MOVE" => {
            let destination = cur.memory_reference()?;
            let source = cur.operand()?;
            Item::Instr(Instruction::Move { destination, source })
        }
        "ADD" | "SUB" | "MUL" | "DIV" => {
            let operator = match mnemonic.as_str() {
                "ADD" => ArithmeticOperator::Add,
                "SUB" => ArithmeticOperator::Sub,
                "MUL" => ArithmeticOperator::Mul,
                _     => ArithmeticOperator::Div,
            };
            let destination = cur.memory_reference()?;
            let source = cur.operand()?;
            Item::Instr(Instruction::Arithmetic { operator, destination, source })
        }

        // ── Control flow ───────────────────────────────────────────────
        "LABEL" => Item::Instr(Instruction::Label(cur.label()?)),
        "JUMP" => Item::Instr(Instruction::Jump { label: cur.label()? }),
        "JUMP-WHEN" => {
            let label = cur.label()?;
            let condition = cur.memory_reference()?;
            Item::Instr(Instruction::JumpWhen { label, condition })
        }
        "JUMP-UNLESS" => {
            let label = cur.label()?;
            let condition = cur.memory_reference()?;
            Item::Instr(Instruction::JumpUnless { label, condition })
        }
        "HALT" => Item::Instr(Instruction::Halt),

        other => {
            return Err(CompileError::Parse {
                line,
                msg: format!("unknown instruction '{other}'"),
            });
        }
    };

    cur.finish()?;
    Ok(item)
}

// ── Cursor ────────────────────────────────────────────────────────────────

/// Argument reader over the tokens of one statement.
struct Cursor<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    line: usize,
    mnemonic: String,
}

impl<'a> Cursor<'a> {
    fn error(&self, msg: impl Into<String>) -> CompileError {
        CompileError::Parse { line: self.line, msg: msg.into() }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn next(&mut self, what: &str) -> Result<&'a Token, CompileError> {
        let token = self.peek().ok_or_else(|| {
            self.error(format!("'{}' expects {what}, found end of line", self.mnemonic))
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), CompileError> {
        let want = token.display();
        let found = self.next(&format!("'{want}'"))?;
        if *found == token {
            Ok(())
        } else {
            Err(self.error(format!("expected '{want}', found '{}'", found.display())))
        }
    }

    /// Reject anything left on the line.
    fn finish(&self) -> Result<(), CompileError> {
        match self.peek() {
            None => Ok(()),
            Some(extra) => Err(self.error(format!(
                "unexpected '{}' after '{}' arguments",
                extra.display(),
                self.mnemonic
            ))),
        }
    }

    fn unsigned(&mut self, what: &str) -> Result<usize, CompileError> {
        match self.next(what)? {
            Token::Int(n) => usize::try_from(*n)
                .map_err(|_| self.error(format!("{what} {n} is too large"))),
            other => Err(self.error(format!(
                "'{}' expects {what}, found '{}'",
                self.mnemonic,
                other.display()
            ))),
        }
    }

    fn qubit(&mut self) -> Result<usize, CompileError> {
        self.unsigned("a qubit index")
    }

    fn index(&mut self) -> Result<usize, CompileError> {
        self.unsigned("an integer index")
    }

    fn ident(&mut self, what: &str) -> Result<String, CompileError> {
        match self.next(what)? {
            Token::Ident(word) => Ok(word.clone()),
            other => Err(self.error(format!("expected {what}, found '{}'", other.display()))),
        }
    }

    fn label(&mut self) -> Result<String, CompileError> {
        match self.next("a label")? {
            Token::Label(name) => Ok(name.clone()),
            other => Err(self.error(format!("expected '@label', found '{}'", other.display()))),
        }
    }

    /// `name[index]`, or bare `name` meaning index 0.
    fn memory_reference(&mut self) -> Result<MemoryReference, CompileError> {
        let name = self.ident("a memory reference")?;
        self.finish_reference(name)
    }

    fn finish_reference(&mut self, name: String) -> Result<MemoryReference, CompileError> {
        let index = if self.eat(&Token::LBracket) {
            let i = self.index()?;
            self.expect(Token::RBracket)?;
            i
        } else {
            0
        };
        Ok(MemoryReference { name, index })
    }

    fn operand(&mut self) -> Result<Operand, CompileError> {
        let negative = self.eat(&Token::Minus);
        match self.next("a value or memory reference")? {
            Token::Int(n) => {
                let value = i64::try_from(*n)
                    .map_err(|_| self.error(format!("integer {n} is too large")))?;
                Ok(Operand::Integer(if negative { -value } else { value }))
            }
            Token::Float(x) => Ok(Operand::Real(if negative { -x } else { *x })),
            Token::Ident(name) if !negative => {
                Ok(Operand::Address(self.finish_reference(name.clone())?))
            }
            other => Err(self.error(format!(
                "expected a value or memory reference, found '{}'",
                other.display()
            ))),
        }
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn expression(&mut self) -> Result<Expression, CompileError> {
        let mut left = self.term()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Plus) => InfixOperator::Plus,
                Some(Token::Minus) => InfixOperator::Minus,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expression::Infix { left: Box::new(left), operator, right: Box::new(right) };
        }
    }

    fn term(&mut self) -> Result<Expression, CompileError> {
        let mut left = self.unary()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Star) => InfixOperator::Star,
                Some(Token::Slash) => InfixOperator::Slash,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expression::Infix { left: Box::new(left), operator, right: Box::new(right) };
        }
    }

    fn unary(&mut self) -> Result<Expression, CompileError> {
        if self.eat(&Token::Minus) {
            return Ok(Expression::Negate(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expression, CompileError> {
        match self.next("an expression")? {
            Token::Int(n) => Ok(Expression::Number(*n as f64)),
            Token::Float(x) => Ok(Expression::Number(*x)),
            Token::Ident(word) if word.eq_ignore_ascii_case("pi") => Ok(Expression::Pi),
            Token::Ident(name) => Ok(Expression::Address(self.finish_reference(name.clone())?)),
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(self.error(format!("unexpected '{}' in expression", other.display()))),
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────

/// Qubit indices fit the simulator and multi-qubit gates never repeat one.
fn validate_qubits(body: &[Instruction]) -> Result<(), CompileError> {
    for instr in body {
        let qubits = instr.qubits();
        for (i, q) in qubits.iter().enumerate() {
            if *q >= MAX_QUBITS {
                return Err(CompileError::Validation {
                    msg: format!("qubit index {q} exceeds maximum of {MAX_QUBITS} qubits"),
                });
            }
            if qubits[..i].contains(q) {
                return Err(CompileError::Validation {
                    msg: format!("'{instr}' uses qubit {q} more than once"),
                });
            }
        }
    }
    Ok(())
}

fn lookup<'r>(
    regions: &'r BTreeMap<String, MemoryRegion>,
    reference: &MemoryReference,
) -> Result<&'r MemoryRegion, CompileError> {
    let region = regions.get(&reference.name).ok_or_else(|| CompileError::Validation {
        msg: format!("memory region '{}' is not declared", reference.name),
    })?;
    if reference.index >= region.length {
        return Err(CompileError::Validation {
            msg: format!(
                "index {} out of range for region '{}' of length {}",
                reference.index, reference.name, region.length
            ),
        });
    }
    Ok(region)
}

fn validate_memory(
    body: &[Instruction],
    regions: &BTreeMap<String, MemoryRegion>,
) -> Result<(), CompileError> {
    for instr in body {
        if let Some(theta) = instr.angle() {
            for reference in theta.addresses() {
                let region = lookup(regions, reference)?;
                if region.scalar_type != ScalarType::Real {
                    return Err(CompileError::Validation {
                        msg: format!(
                            "'{instr}' reads '{}' of type {} in a gate angle, expected REAL",
                            reference.name, region.scalar_type
                        ),
                    });
                }
            }
        }

        match instr {
            Instruction::Measure { target: Some(target), .. } => {
                if !lookup(regions, target)?.scalar_type.is_integral() {
                    return Err(CompileError::Validation {
                        msg: format!("cannot MEASURE into REAL region '{}'", target.name),
                    });
                }
            }
            Instruction::JumpWhen { condition, .. } | Instruction::JumpUnless { condition, .. } => {
                if !lookup(regions, condition)?.scalar_type.is_integral() {
                    return Err(CompileError::Validation {
                        msg: format!("'{instr}' branches on REAL region '{}'", condition.name),
                    });
                }
            }
            Instruction::Move { destination, source }
            | Instruction::Arithmetic { destination, source, .. } => {
                let dest_integral = lookup(regions, destination)?.scalar_type.is_integral();
                let source_integral = match source {
                    Operand::Integer(_) => None,
                    Operand::Real(_) => Some(false),
                    Operand::Address(reference) => {
                        Some(lookup(regions, reference)?.scalar_type.is_integral())
                    }
                };
                // integer literals widen into REAL; everything else must match
                if let Some(src) = source_integral {
                    if src != dest_integral {
                        return Err(CompileError::Validation {
                            msg: format!("'{instr}' mixes REAL and integer memory"),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Labels are unique and every jump refers to one of them.
fn validate_labels(body: &[Instruction]) -> Result<(), CompileError> {
    let mut defined: HashSet<&str> = HashSet::new();
    for instr in body {
        if let Instruction::Label(name) = instr {
            if !defined.insert(name.as_str()) {
                return Err(CompileError::Validation {
                    msg: format!("label '@{name}' defined more than once"),
                });
            }
        }
    }

    for instr in body {
        let target = match instr {
            Instruction::Jump { label }
            | Instruction::JumpWhen { label, .. }
            | Instruction::JumpUnless { label, .. } => Some(label.as_str()),
            _ => None,
        };
        if let Some(t) = target {
            if !defined.contains(t) {
                return Err(CompileError::Validation {
                    msg: format!("jump to undefined label '@{t}'"),
                });
            }
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::{lexer, CompileError};
    use super::super::ir::{Expression, Instruction, MemoryReference, Operand, Program, ScalarType};

    fn compile(src: &str) -> Result<Program, CompileError> {
        let tokens = lexer::tokenize(src)?;
        super::parse(tokens)
    }

    fn validation_msg(src: &str) -> String {
        match compile(src) {
            Err(CompileError::Validation { msg }) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_bell_program() {
        let prog = compile(
            "DECLARE ro BIT[2]\nH 0\nCNOT 0 1\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]",
        ).unwrap();
        assert_eq!(prog.num_qubits, 2);
        assert_eq!(prog.instructions.len(), 4);
        assert_eq!(prog.gate_count, 2);
        assert_eq!(prog.measure_count, 2);
        let ro = prog.region("ro").unwrap();
        assert_eq!(ro.scalar_type, ScalarType::Bit);
        assert_eq!(ro.length, 2);
    }

    #[test]
    fn test_declare_defaults_to_length_one() {
        let prog = compile("DECLARE theta REAL").unwrap();
        assert_eq!(prog.region("theta").unwrap().length, 1);
        assert_eq!(prog.num_qubits, 0);
    }

    #[test]
    fn test_parametric_gate_reads_memory() {
        let prog = compile(
            "DECLARE ro BIT\nDECLARE theta REAL\nRX(pi/2) 0\nRZ(theta) 0\nRX(-pi/2) 0\nMEASURE 0 ro[0]",
        ).unwrap();
        match &prog.instructions[1] {
            Instruction::Rz { qubit: 0, theta: Expression::Address(r) } => {
                assert_eq!(r, &MemoryReference::new("theta", 0));
            }
            other => panic!("expected RZ(theta[0]), got {other:?}"),
        }
        let angle = prog.instructions[2].angle().unwrap().evaluate(&|_: &MemoryReference| 0.0);
        assert!((angle + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_expression_precedence() {
        let prog = compile("RX(1 + 2 * 3) 0\nRY(-(1 - 4) / 2) 0").unwrap();
        let eval = |i: usize| prog.instructions[i].angle().unwrap().evaluate(&|_: &MemoryReference| 0.0);
        assert!((eval(0) - 7.0).abs() < 1e-12);
        assert!((eval(1) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_move_operands() {
        let prog = compile(
            "DECLARE first REAL\nDECLARE n INTEGER[2]\nMOVE first[0] 3.141\nMOVE n[1] -4\nADD n[0] n[1]",
        ).unwrap();
        assert_eq!(prog.gate_count, 0);
        match &prog.instructions[0] {
            Instruction::Move { source: Operand::Real(x), .. } => assert_eq!(*x, 3.141),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(prog.instructions[1], Instruction::Move { source: Operand::Integer(-4), .. }));
    }

    #[test]
    fn test_control_flow_and_pragma() {
        let prog = compile(
            "PRAGMA INITIAL_REWIRING \"NAIVE\"\nDECLARE ro BIT\nLABEL @top\nMEASURE 0 ro\nJUMP-UNLESS @top ro[0]\nHALT",
        ).unwrap();
        assert_eq!(prog.instructions.len(), 4);
        assert!(matches!(prog.instructions[2], Instruction::JumpUnless { .. }));
    }

    #[test]
    fn test_mnemonics_case_insensitive() {
        let prog = compile("h 0\ncnot 0 1\nmeasure 1").unwrap();
        assert_eq!(prog.gate_count, 2);
        assert!(matches!(prog.instructions[2], Instruction::Measure { qubit: 1, target: None }));
    }

    #[test]
    fn test_reset_forms() {
        let prog = compile("RESET\nRESET 2").unwrap();
        assert_eq!(prog.instructions[0], Instruction::Reset(None));
        assert_eq!(prog.instructions[1], Instruction::Reset(Some(2)));
        assert_eq!(prog.num_qubits, 3);
    }

    #[test]
    fn test_display_round_trip() {
        let src = "DECLARE ro BIT[2]\nDECLARE theta REAL\nRX(-pi/2 + theta) 1\nCNOT 1 0\nMEASURE 1 ro[1]";
        let prog = compile(src).unwrap();
        let again = compile(&prog.to_string()).unwrap();
        assert_eq!(prog, again);
    }

    // ── Parse errors ────────────────────────────────────────────────────

    #[test]
    fn test_unknown_instruction() {
        assert!(matches!(compile("H 0\nFOO 1").unwrap_err(), CompileError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_argument() {
        assert!(matches!(compile("CNOT 0").unwrap_err(), CompileError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_trailing_tokens() {
        assert!(matches!(compile("H 0 1").unwrap_err(), CompileError::Parse { .. }));
    }

    #[test]
    fn test_unknown_scalar_type() {
        assert!(matches!(compile("DECLARE x FLOAT").unwrap_err(), CompileError::Parse { .. }));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(matches!(compile("RX(pi 0").unwrap_err(), CompileError::Parse { .. }));
    }

    // ── Validation errors ───────────────────────────────────────────────

    #[test]
    fn test_duplicate_declaration() {
        assert!(validation_msg("DECLARE ro BIT\nDECLARE ro REAL").contains("more than once"));
    }

    #[test]
    fn test_zero_length_region() {
        assert!(validation_msg("DECLARE ro BIT[0]").contains("length"));
    }

    #[test]
    fn test_undeclared_region() {
        assert!(validation_msg("MEASURE 0 ro[0]").contains("not declared"));
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(validation_msg("DECLARE ro BIT[2]\nMEASURE 0 ro[2]").contains("out of range"));
    }

    #[test]
    fn test_measure_into_real() {
        assert!(validation_msg("DECLARE x REAL\nMEASURE 0 x").contains("REAL"));
    }

    #[test]
    fn test_angle_reads_integer_region() {
        assert!(validation_msg("DECLARE ro BIT\nRX(ro) 0").contains("expected REAL"));
    }

    #[test]
    fn test_move_real_into_bit() {
        assert!(validation_msg("DECLARE ro BIT\nMOVE ro[0] 0.5").contains("mixes"));
    }

    #[test]
    fn test_repeated_qubit() {
        assert!(validation_msg("CNOT 1 1").contains("more than once"));
    }

    #[test]
    fn test_too_many_qubits() {
        assert!(validation_msg("H 30").contains("maximum"));
    }

    #[test]
    fn test_undefined_label() {
        assert!(validation_msg("JUMP @nowhere").contains("undefined label"));
    }

    #[test]
    fn test_duplicate_label() {
        assert!(validation_msg("LABEL @a\nLABEL @a").contains("more than once"));
    }
}
