//! Small arithmetic expression language for formula nodes
//!
//! Supports `+ - * / %`, unary minus, parentheses, numeric literals,
//! identifiers, and calls to the reserved builtins (`sin(x)`, `pow(a, b)`,
//! zero-argument constants may be written bare: `pi`). Identifiers are
//! maximal runs of alphabetic characters; digits terminate an identifier, so
//! `a1` is the identifier `a` followed by the literal `1` and fails to
//! compile rather than naming a single variable.
//!
//! Division and modulo follow IEEE float semantics; nothing in evaluation
//! traps.

pub mod builtins;

pub use builtins::Builtins;

use std::collections::HashMap;
use thiserror::Error;

/// Errors from compiling expression text
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("malformed number '{0}'")]
    BadNumber(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("function '{name}' takes {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("function '{0}' used without arguments")]
    MissingArguments(String),
}

/// Errors from evaluating a compiled expression
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// A compiled expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f32),
    Var(String),
    Neg(Box<Expr>),
    Binary(BinOpExpr),
    Call(String, Vec<Expr>),
}

/// A binary operation node
#[derive(Debug, Clone, PartialEq)]
pub struct BinOpExpr {
    op: BinOp,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
}

impl Expr {
    /// Evaluates against a variable map and a builtin table
    pub fn eval(
        &self,
        vars: &HashMap<String, f32>,
        builtins: &Builtins,
    ) -> Result<f32, EvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Var(name) => vars
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            Expr::Neg(inner) => Ok(-inner.eval(vars, builtins)?),
            Expr::Binary(b) => {
                let lhs = b.lhs.eval(vars, builtins)?;
                let rhs = b.rhs.eval(vars, builtins)?;
                Ok(match b.op {
                    BinOp::Add => lhs + rhs,
                    BinOp::Sub => lhs - rhs,
                    BinOp::Mul => lhs * rhs,
                    BinOp::Div => lhs / rhs,
                    BinOp::Rem => lhs % rhs,
                })
            }
            Expr::Call(name, args) => {
                let builtin = builtins
                    .get(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval(vars, builtins)?);
                }
                Ok((builtin.call)(&values))
            }
        }
    }
}

/// Compiles expression text against a builtin table
pub fn compile(text: &str, builtins: &Builtins) -> Result<Expr, CompileError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        builtins,
    };
    let expr = parser.expression()?;
    match parser.peek() {
        None => Ok(expr),
        Some(t) => Err(CompileError::UnexpectedToken(t.describe())),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f32),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Ident(s) => s.clone(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            c if c.is_ascii_alphabetic() => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f32>()
                    .map_err(|_| CompileError::BadNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => return Err(CompileError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    builtins: &'a Builtins,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expression(&mut self) -> Result<Expr, CompileError> {
        self.additive()
    }

    fn additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(BinOpExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(BinOpExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CompileError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, CompileError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let args = self.arguments()?;
                    let builtin = self
                        .builtins
                        .get(&name)
                        .ok_or_else(|| CompileError::UnknownFunction(name.clone()))?;
                    if args.len() != builtin.arity {
                        return Err(CompileError::ArityMismatch {
                            name,
                            expected: builtin.arity,
                            found: args.len(),
                        });
                    }
                    Ok(Expr::Call(name, args))
                } else if let Some(builtin) = self.builtins.get(&name) {
                    // bare constants like `pi` compile to a zero-arg call
                    if builtin.arity == 0 {
                        Ok(Expr::Call(name, Vec::new()))
                    } else {
                        Err(CompileError::MissingArguments(name))
                    }
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.expression()?;
                if self.eat(&Token::RParen) {
                    Ok(expr)
                } else {
                    Err(CompileError::UnexpectedEnd)
                }
            }
            Some(other) => Err(CompileError::UnexpectedToken(other.describe())),
            None => Err(CompileError::UnexpectedEnd),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, CompileError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            return match self.peek() {
                Some(t) => Err(CompileError::UnexpectedToken(t.describe())),
                None => Err(CompileError::UnexpectedEnd),
            };
        }
    }
}
