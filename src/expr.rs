//! Arithmetic evaluator for the calculator display.
//!
//! Accepts decimal literals, `+ - * / %` and unary signs. Nothing else
//! parses, so display text can never reach anything but arithmetic.
//! `* / %` bind tighter than `+ -`; all binary operators are left
//! associative. `%` is the truncated remainder (sign follows the dividend).

pub const OPERATORS: [char; 5] = ['+', '-', '*', '/', '%'];

pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    UnexpectedChar { ch: char, at: usize },
    UnexpectedOperator { op: char, at: usize },
    UnexpectedEnd,
    InvalidNumber(String),
    TrailingInput { at: usize },
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::UnexpectedChar { ch, at } => {
                write!(f, "unexpected character {ch:?} at {at}")
            }
            ExprError::UnexpectedOperator { op, at } => {
                write!(f, "operator {op:?} at {at} is missing an operand")
            }
            ExprError::UnexpectedEnd => write!(f, "unexpected end of expression"),
            ExprError::InvalidNumber(text) => write!(f, "invalid number {text:?}"),
            ExprError::TrailingInput { at } => write!(f, "unexpected input at {at}"),
        }
    }
}

impl std::error::Error for ExprError {}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
}

/// Evaluates `input`. Non-finite results (division by zero, overflow) are
/// returned as-is; callers decide how to present them.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos < parser.tokens.len() {
        return Err(ExprError::TrailingInput { at: parser.pos });
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(at, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if is_operator(ch) {
            tokens.push(Token::Op(ch));
            chars.next();
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut literal = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() || c == '.' {
                    literal.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(parse_literal(&literal)?));
        } else {
            return Err(ExprError::UnexpectedChar { ch, at });
        }
    }
    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<f64, ExprError> {
    let invalid = || ExprError::InvalidNumber(literal.to_string());
    if literal == "." || literal.matches('.').count() > 1 {
        return Err(invalid());
    }
    literal.parse::<f64>().map_err(|_| invalid())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    // Signs are folded in a loop; input can carry arbitrarily long runs.
    fn unary(&mut self) -> Result<f64, ExprError> {
        let mut negate = false;
        loop {
            match self.peek() {
                Some(Token::Op('-')) => negate = !negate,
                Some(Token::Op('+')) => {}
                Some(Token::Number(value)) => {
                    self.pos += 1;
                    return Ok(if negate { -value } else { value });
                }
                Some(Token::Op(op)) => {
                    return Err(ExprError::UnexpectedOperator { op, at: self.pos });
                }
                None => return Err(ExprError::UnexpectedEnd),
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_arithmetic_and_precedence() {
        assert_eq!(evaluate("2+2"), Ok(4.0));
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("10-4-3"), Ok(3.0));
        assert_eq!(evaluate("8/4/2"), Ok(1.0));
        assert_eq!(evaluate("7%3"), Ok(1.0));
        assert_eq!(evaluate("-7%3"), Ok(-1.0));
        assert_eq!(evaluate("1+10%4*2"), Ok(5.0));
    }

    #[test]
    fn decimal_literal_forms() {
        assert_eq!(evaluate(".5+5."), Ok(5.5));
        assert_eq!(evaluate("1.25*4"), Ok(5.0));
        assert_eq!(evaluate("007"), Ok(7.0));
    }

    #[test]
    fn unary_signs() {
        assert_eq!(evaluate("-3+5"), Ok(2.0));
        assert_eq!(evaluate("2*-3"), Ok(-6.0));
        assert_eq!(evaluate("--2"), Ok(2.0));
        assert_eq!(evaluate("+4"), Ok(4.0));
        assert_eq!(evaluate("-+-5"), Ok(5.0));
    }

    #[test]
    fn long_sign_runs_do_not_exhaust_the_stack() {
        let even = format!("{}1", "-".repeat(100_000));
        assert_eq!(evaluate(&even), Ok(1.0));
        let odd = format!("2*{}3", "-".repeat(100_001));
        assert_eq!(evaluate(&odd), Ok(-6.0));
        assert_eq!(
            evaluate(&"-".repeat(50_000)),
            Err(ExprError::UnexpectedEnd)
        );
    }

    #[test]
    fn division_by_zero_is_not_finite() {
        assert!(evaluate("5/0").unwrap().is_infinite());
        assert!(evaluate("0/0").unwrap().is_nan());
        assert!(evaluate("5%0").unwrap().is_nan());
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(evaluate(""), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("2+"), Err(ExprError::UnexpectedEnd));
        assert_eq!(
            evaluate("*2"),
            Err(ExprError::UnexpectedOperator { op: '*', at: 0 })
        );
        assert_eq!(
            evaluate("2**3"),
            Err(ExprError::UnexpectedOperator { op: '*', at: 2 })
        );
        assert_eq!(
            evaluate("%"),
            Err(ExprError::UnexpectedOperator { op: '%', at: 0 })
        );
        assert_eq!(
            evaluate("1.2.3"),
            Err(ExprError::InvalidNumber("1.2.3".to_string()))
        );
        assert_eq!(
            evaluate("."),
            Err(ExprError::InvalidNumber(".".to_string()))
        );
        assert_eq!(evaluate("1 2"), Err(ExprError::TrailingInput { at: 1 }));
    }

    #[test]
    fn nothing_but_arithmetic_is_accepted() {
        assert_eq!(
            evaluate("alert(1)"),
            Err(ExprError::UnexpectedChar { ch: 'a', at: 0 })
        );
        assert_eq!(
            evaluate("2+(3)"),
            Err(ExprError::UnexpectedChar { ch: '(', at: 2 })
        );
        assert!(evaluate("Error").is_err());
        assert!(evaluate("1e5").is_err());
    }
}
