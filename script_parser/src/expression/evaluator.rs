//! Arithmetic evaluator for interpolated expressions
//!
//! Grammar (whitespace between tokens is allowed):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := '-' factor | '(' expr ')' | number | ['@'] name
//! ```
//!
//! Names use the same characters as `@variable` tokens, minus the operators
//! and parentheses, so `@a.b` can be read back as `@[a.b*2]`.
//!
//! Integer operands stay integers as long as the result is exact; any float
//! operand or an inexact division produces a float.

use crate::source::{Value, VariableTable};
use crate::syntax::{ParseError, ParseResult};

/// Deepest allowed nesting of parentheses and unary minus
const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Value),
    Name(String),
    Operator(char),
    Open,
    Close,
}

/// Evaluate an expression body (the text between the brackets)
pub fn evaluate(expression: &str, variables: &VariableTable) -> ParseResult<Value> {
    let tokens = tokenize(expression)?;
    let mut evaluator = Evaluator {
        expression,
        tokens,
        cursor: 0,
        depth: 0,
        variables,
    };
    let value = evaluator.expr()?;
    if evaluator.cursor != evaluator.tokens.len() {
        return Err(evaluator.error("unexpected trailing input"));
    }
    Ok(value)
}

fn tokenize(expression: &str) -> ParseResult<Vec<Token>> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
        } else if ch.is_ascii_digit()
            || (ch == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
        {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let number = match Value::infer(&text) {
                Value::Str(_) => {
                    return Err(ParseError::invalid_expression(
                        expression,
                        format!("malformed number '{}'", text),
                    ))
                }
                number => number,
            };
            tokens.push(Token::Number(number));
        } else if ch == '@' || ch == '_' || ch.is_alphabetic() {
            if ch == '@' {
                i += 1;
            }
            let start = i;
            while i < chars.len() && is_name_char(chars[i]) {
                i += 1;
            }
            if start == i {
                return Err(ParseError::invalid_expression(
                    expression,
                    "'@' without a variable name",
                ));
            }
            tokens.push(Token::Name(chars[start..i].iter().collect()));
        } else if matches!(ch, '+' | '-' | '*' | '/') {
            tokens.push(Token::Operator(ch));
            i += 1;
        } else if ch == '(' {
            tokens.push(Token::Open);
            i += 1;
        } else if ch == ')' {
            tokens.push(Token::Close);
            i += 1;
        } else {
            return Err(ParseError::invalid_expression(
                expression,
                format!("unexpected character '{}'", ch),
            ));
        }
    }

    Ok(tokens)
}

fn is_name_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !matches!(
            ch,
            '=' | '{' | '}' | '[' | ']' | '"' | '+' | '-' | '*' | '/' | '(' | ')'
        )
}

struct Evaluator<'a> {
    expression: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
    variables: &'a VariableTable,
}

impl<'a> Evaluator<'a> {
    fn error(&self, reason: &str) -> ParseError {
        ParseError::invalid_expression(self.expression, reason)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn nested<F>(&mut self, parse: F) -> ParseResult<Value>
    where
        F: FnOnce(&mut Self) -> ParseResult<Value>,
    {
        if self.depth >= MAX_NESTING {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> ParseResult<Value> {
        let mut left = self.term()?;
        while let Some(Token::Operator(op @ ('+' | '-'))) = self.peek().cloned() {
            self.cursor += 1;
            let right = self.term()?;
            left = self.apply(op, left, right)?;
        }
        Ok(left)
    }

    fn term(&mut self) -> ParseResult<Value> {
        let mut left = self.factor()?;
        while let Some(Token::Operator(op @ ('*' | '/'))) = self.peek().cloned() {
            self.cursor += 1;
            let right = self.factor()?;
            left = self.apply(op, left, right)?;
        }
        Ok(left)
    }

    fn factor(&mut self) -> ParseResult<Value> {
        match self.next() {
            Some(Token::Operator('-')) => {
                let value = self.nested(Self::factor)?;
                self.apply('-', Value::Int(0), value)
            }
            Some(Token::Open) => self.nested(|evaluator| {
                let value = evaluator.expr()?;
                match evaluator.next() {
                    Some(Token::Close) => Ok(value),
                    _ => Err(evaluator.error("unbalanced parentheses")),
                }
            }),
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Name(name)) => self
                .variables
                .get(&name)
                .cloned()
                .ok_or_else(|| ParseError::undefined_variable(&name)),
            Some(_) => Err(self.error("expected a number, variable or '('")),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn apply(&self, op: char, left: Value, right: Value) -> ParseResult<Value> {
        match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => {
                let (a, b) = (*a, *b);
                let result = match op {
                    '+' => a.checked_add(b),
                    '-' => a.checked_sub(b),
                    '*' => a.checked_mul(b),
                    _ => {
                        if b == 0 {
                            return Err(self.error("division by zero"));
                        }
                        if a % b != 0 {
                            return Ok(Value::Float(a as f64 / b as f64));
                        }
                        a.checked_div(b)
                    }
                };
                result
                    .map(Value::Int)
                    .ok_or_else(|| self.error("integer overflow"))
            }
            _ => {
                let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
                    return Err(self.error("arithmetic on a non-numeric value"));
                };
                let result = match op {
                    '+' => a + b,
                    '-' => a - b,
                    '*' => a * b,
                    _ => {
                        if b == 0.0 {
                            return Err(self.error("division by zero"));
                        }
                        a / b
                    }
                };
                Ok(Value::Float(result))
            }
        }
    }
}
