use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::environment::Env;
use crate::syntax::ast::Block;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    /// Shared and mutable: every binding of the same array sees `add`.
    Array(Rc<RefCell<Vec<Object>>>),
    Null,
    Function(Rc<Function>),
    Builtin(Builtin),
    /// Carries a `return` value up to the enclosing call or program.
    ReturnValue(Box<Object>),
    Error(String),
}

/// A user function together with the frame it was defined in.
pub struct Function {
    pub params: Vec<String>,
    pub body: Block,
    pub env: Env,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("params", &self.params).finish_non_exhaustive()
    }
}

pub type NativeFn = dyn Fn(&[Object]) -> Object;

/// A function implemented by the host rather than in the language.
#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    func: Rc<NativeFn>,
}

impl Builtin {
    pub fn new(name: &'static str, func: impl Fn(&[Object]) -> Object + 'static) -> Self {
        Self { name, func: Rc::new(func) }
    }

    pub fn call(&self, args: &[Object]) -> Object {
        (self.func)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl Object {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn array(items: Vec<Object>) -> Self {
        Self::Array(Rc::new(RefCell::new(items)))
    }

    /// Errors and pending returns both cut evaluation short.
    pub fn is_abrupt(&self) -> bool {
        matches!(self, Self::Error(_) | Self::ReturnValue(_))
    }

    /// Only `false` and integer zero are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_)     => "INTEGER",
            Self::Float(_)       => "FLOAT",
            Self::Boolean(_)     => "BOOLEAN",
            Self::String(_)      => "STRING",
            Self::Array(_)       => "ARRAY",
            Self::Null           => "NULL",
            Self::Function(_)    => "FUNCTION",
            Self::Builtin(_)     => "BUILTIN",
            Self::ReturnValue(_) => "RETURN_VALUE",
            Self::Error(_)       => "ERROR",
        }
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        if b { TRUE } else { FALSE }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b))         => a == b,
            (Self::Float(a), Self::Float(b))             => a == b,
            (Self::Boolean(a), Self::Boolean(b))         => a == b,
            (Self::String(a), Self::String(b))           => a == b,
            (Self::Array(a), Self::Array(b))             => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Null, Self::Null)                     => true,
            (Self::Function(a), Self::Function(b))       => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b))         => a.name == b.name,
            (Self::ReturnValue(a), Self::ReturnValue(b)) => a == b,
            (Self::Error(a), Self::Error(b))             => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v)     => write!(f, "{v}"),
            Self::Float(v)       => write!(f, "{v}"),
            Self::Boolean(v)     => write!(f, "{v}"),
            Self::String(s)      => f.write_str(s),
            Self::Array(items)   => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Null           => f.write_str("null"),
            Self::Function(func) => write!(f, "fn({}) {}", func.params.join(", "), func.body),
            Self::Builtin(_)     => f.write_str("builtin function"),
            Self::ReturnValue(v) => write!(f, "{v}"),
            Self::Error(msg)     => write!(f, "Error: {msg}"),
        }
    }
}
