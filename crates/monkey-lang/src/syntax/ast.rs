//! Syntax tree produced by the parser.
//!
//! `Display` renders the canonical, fully parenthesized form. Re-parsing that
//! form and rendering it again yields the same text.

use std::fmt;

// ─── Top level ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Code {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name = value`
    Let { name: String, value: Expression },
    /// `return value`
    Return { value: Expression },
    Expression { expr: Expression },
    /// A bare `{ ... }` at statement position.
    Block(Block),
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    BooleanLiteral(bool),
    StringLiteral(String),
    ArrayLiteral(Vec<Expression>),
    Prefix {
        op: PrefixOp,
        operand: Box<Expression>,
    },
    Infix {
        op: InfixOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Index {
        collection: Box<Expression>,
        index: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },
    While {
        condition: Box<Expression>,
        body: Block,
    },
    FunctionLiteral {
        params: Vec<String>,
        body: Block,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Bang,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
    And,
    Or,
}

// ─── Rendering ───────────────────────────────────────────────────────────────

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bang  => "!",
            Self::Minus => "-",
        })
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plus     => "+",
            Self::Minus    => "-",
            Self::Asterisk => "*",
            Self::Slash    => "/",
            Self::Lt       => "<",
            Self::Gt       => ">",
            Self::Eq       => "==",
            Self::NotEq    => "!=",
            Self::And      => "&&",
            Self::Or       => "||",
        })
    }
}

fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 { f.write_str(";\n")?; }
        write!(f, "{stmt}")?;
    }
    Ok(())
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 { f.write_str(",")?; }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Prefix, infix and index expressions render enclosed in one pair of
/// parentheses; every other condition gets wrapped so `if`/`while` re-parse.
fn write_condition(f: &mut fmt::Formatter<'_>, condition: &Expression) -> fmt::Result {
    match condition {
        Expression::Prefix { .. } | Expression::Infix { .. } | Expression::Index { .. } => {
            write!(f, "{condition}")
        }
        _ => write!(f, "({condition})"),
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{\n}");
        }
        f.write_str("{\n")?;
        write_statements(f, &self.statements)?;
        f.write_str("\n}")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { name, value } => write!(f, "let {name} = {value}"),
            Self::Return { value }    => write!(f, "return {value}"),
            Self::Expression { expr } => write!(f, "{expr}"),
            Self::Block(block)        => write!(f, "{block}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name)   => f.write_str(name),
            Self::IntegerLiteral(v)  => write!(f, "{v}"),
            Self::FloatLiteral(v)    => {
                let s = v.to_string();
                if s.contains('.') { f.write_str(&s) } else { write!(f, "{s}.0") }
            }
            Self::BooleanLiteral(v)  => write!(f, "{v}"),
            Self::StringLiteral(s)   => write!(f, "\"{s}\""),
            Self::ArrayLiteral(elements) => {
                f.write_str("[")?;
                write_joined(f, elements)?;
                f.write_str("]")
            }
            Self::Prefix { op, operand }       => write!(f, "({op}{operand})"),
            Self::Infix { op, left, right }    => write!(f, "({left} {op} {right})"),
            Self::Index { collection, index }  => write!(f, "({collection}[{index}])"),
            Self::If { condition, consequence, alternative } => {
                f.write_str("if")?;
                write_condition(f, condition)?;
                write!(f, " {consequence}")?;
                if let Some(alt) = alternative {
                    write!(f, "else{alt}")?;
                }
                Ok(())
            }
            Self::While { condition, body } => {
                f.write_str("while")?;
                write_condition(f, condition)?;
                write!(f, " {body}")
            }
            Self::FunctionLiteral { params, body } => {
                write!(f, "fn({}){body}", params.join(","))
            }
            Self::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_joined(f, args)?;
                f.write_str(")")
            }
        }
    }
}
