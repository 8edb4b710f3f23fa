/// Lexer for the Quil subset accepted by the compiler.
///
/// The language is line-oriented: one instruction per line. Comments begin
/// with `#` and run to end of line. Within a line the lexer is character
/// driven so that `RX(-pi/2)` and `ro[0]` split without whitespace.
///
/// Identifiers may contain `-` when it is followed by a letter, which keeps
/// `JUMP-WHEN` a single word while `a-1` stays a subtraction.
use super::CompileError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Mnemonics, keywords, region names and `pi`.
    Ident(String),
    /// `@name` jump target.
    Label(String),
    Int(u64),
    Float(f64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
}

impl Token {
    /// Display string used in error messages.
    pub fn display(&self) -> String {
        match self {
            Token::Ident(word) => word.clone(),
            Token::Label(name) => format!("@{name}"),
            Token::Int(n)      => n.to_string(),
            Token::Float(x)    => x.to_string(),
            Token::LParen      => "(".into(),
            Token::RParen      => ")".into(),
            Token::LBracket    => "[".into(),
            Token::RBracket    => "]".into(),
            Token::Comma       => ",".into(),
            Token::Plus        => "+".into(),
            Token::Minus       => "-".into(),
            Token::Star        => "*".into(),
            Token::Slash       => "/".into(),
        }
    }
}

// ── Spanned token ─────────────────────────────────────────────────────────

/// A token annotated with its source line number (1-based).
#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

// ── Public API ────────────────────────────────────────────────────────────

/// Tokenize a source string into statements, one per non-empty line.
pub fn tokenize(source: &str) -> Result<Vec<Vec<Spanned>>, CompileError> {
    let mut statements: Vec<Vec<Spanned>> = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_num = idx + 1;
        let content = strip_comment(line).trim();
        if content.is_empty() {
            continue;
        }

        // PRAGMA bodies are free-form and never interpreted
        let first = content.split_whitespace().next().unwrap_or_default();
        if first.eq_ignore_ascii_case("PRAGMA") {
            statements.push(vec![Spanned { token: Token::Ident(first.to_string()), line: line_num }]);
            continue;
        }

        let tokens = lex_line(content, line_num)?;
        if !tokens.is_empty() {
            statements.push(tokens);
        }
    }

    Ok(statements)
}

// ── Internal helpers ──────────────────────────────────────────────────────

fn strip_comment(line: &str) -> &str {
    line.find('#').map_or(line, |p| &line[..p])
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex_line(content: &str, line: usize) -> Result<Vec<Spanned>, CompileError> {
    let chars: Vec<char> = content.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let token = match c {
            _ if c.is_whitespace() => {
                pos += 1;
                continue;
            }
            '(' => { pos += 1; Token::LParen }
            ')' => { pos += 1; Token::RParen }
            '[' => { pos += 1; Token::LBracket }
            ']' => { pos += 1; Token::RBracket }
            ',' => { pos += 1; Token::Comma }
            '+' => { pos += 1; Token::Plus }
            '-' => { pos += 1; Token::Minus }
            '*' => { pos += 1; Token::Star }
            '/' => { pos += 1; Token::Slash }
            '@' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos);
                if name.is_empty() {
                    return Err(CompileError::Lex { line, msg: "expected label name after '@'".into() });
                }
                Token::Label(name)
            }
            _ if is_ident_start(c) => Token::Ident(take_ident(&chars, &mut pos)),
            _ if c.is_ascii_digit() || c == '.' => lex_number(&chars, &mut pos, line)?,
            _ => {
                return Err(CompileError::Lex {
                    line,
                    msg: format!("unexpected character '{c}'"),
                });
            }
        };
        tokens.push(Spanned { token, line });
    }

    Ok(tokens)
}

fn take_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() {
        let c = chars[*pos];
        let hyphenated = c == '-'
            && *pos > start
            && chars.get(*pos + 1).is_some_and(|next| next.is_ascii_alphabetic());
        if is_ident_continue(c) || hyphenated {
            *pos += 1;
        } else {
            break;
        }
    }
    chars[start..*pos].iter().collect()
}

/// `123`, `1.5`, `.5`, `2e-3`. Anything with a point or exponent is a float.
fn lex_number(chars: &[char], pos: &mut usize, line: usize) -> Result<Token, CompileError> {
    let start = *pos;
    let mut is_float = false;

    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos < chars.len() && chars[*pos] == '.' {
        is_float = true;
        *pos += 1;
        while *pos < chars.len() && chars[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    if *pos < chars.len() && matches!(chars[*pos], 'e' | 'E') {
        let mut look = *pos + 1;
        if look < chars.len() && matches!(chars[look], '+' | '-') {
            look += 1;
        }
        if look < chars.len() && chars[look].is_ascii_digit() {
            is_float = true;
            *pos = look;
            while *pos < chars.len() && chars[*pos].is_ascii_digit() {
                *pos += 1;
            }
        }
    }

    let text: String = chars[start..*pos].iter().collect();
    let bad = || CompileError::Lex { line, msg: format!("malformed number '{text}'") };
    if is_float {
        text.parse::<f64>().map(Token::Float).map_err(|_| bad())
    } else {
        text.parse::<u64>().map(Token::Int).map_err(|_| bad())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(source: &str) -> Vec<Vec<Token>> {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .map(|stmt| stmt.into_iter().map(|s| s.token).collect())
            .collect()
    }

    fn ident(s: &str) -> Token {
        Token::Ident(s.into())
    }

    #[test]
    fn test_declare_and_measure() {
        let stmts = tok("DECLARE ro BIT[2]\nMEASURE 0 ro[0]");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], vec![
            ident("DECLARE"), ident("ro"), ident("BIT"),
            Token::LBracket, Token::Int(2), Token::RBracket,
        ]);
        assert_eq!(stmts[1], vec![
            ident("MEASURE"), Token::Int(0), ident("ro"),
            Token::LBracket, Token::Int(0), Token::RBracket,
        ]);
    }

    #[test]
    fn test_parametric_gate_without_spaces() {
        let stmts = tok("RX(-pi/2) 0");
        assert_eq!(stmts[0], vec![
            ident("RX"), Token::LParen, Token::Minus, ident("pi"),
            Token::Slash, Token::Int(2), Token::RParen, Token::Int(0),
        ]);
    }

    #[test]
    fn test_hyphenated_mnemonic_and_label() {
        let stmts = tok("JUMP-WHEN @loop ro[0]");
        assert_eq!(stmts[0][0], ident("JUMP-WHEN"));
        assert_eq!(stmts[0][1], Token::Label("loop".into()));
    }

    #[test]
    fn test_minus_before_digit_is_operator() {
        let stmts = tok("RZ(theta-1) 0");
        assert_eq!(&stmts[0][2..5], &[ident("theta"), Token::Minus, Token::Int(1)]);
    }

    #[test]
    fn test_floats() {
        let stmts = tok("MOVE x[0] 3.141\nMOVE x[0] .5\nMOVE x[0] 2e-3");
        assert_eq!(stmts[0][5], Token::Float(3.141));
        assert_eq!(stmts[1][5], Token::Float(0.5));
        assert_eq!(stmts[2][5], Token::Float(2e-3));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let stmts = tok("# header\n\nH 0 # trailing\n   \n");
        assert_eq!(stmts, vec![vec![ident("H"), Token::Int(0)]]);
    }

    #[test]
    fn test_pragma_body_not_lexed() {
        let stmts = tok("PRAGMA INITIAL_REWIRING \"PARTIAL\"");
        assert_eq!(stmts, vec![vec![ident("PRAGMA")]]);
    }

    #[test]
    fn test_line_numbers_preserved() {
        let stmts = tokenize("\n\nH 0").unwrap();
        assert_eq!(stmts[0][0].line, 3);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("H 0\nRX(%theta) 0").unwrap_err();
        assert!(matches!(err, CompileError::Lex { line: 2, .. }));
    }

    #[test]
    fn test_bare_at_sign() {
        assert!(matches!(tokenize("JUMP @").unwrap_err(), CompileError::Lex { line: 1, .. }));
    }
}
