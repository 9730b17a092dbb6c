//! Registry of native functions visible to scripts by name.
//!
//! The evaluator receives a registry instead of reaching for globals, so a
//! host can decide which functions a session gets. `standard()` holds the
//! pure, side-effect free set; hosts layer console and file access on top.

use std::collections::HashMap;

use crate::runtime::object::{Builtin, Object};

pub mod core;

// ─── Registry ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct Builtins {
    functions: HashMap<&'static str, Builtin>,
}

impl Builtins {
    /// A registry with nothing in it.
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, builtin: Builtin) {
        self.functions.insert(builtin.name, builtin);
    }

    /// Register a function whose failures are plain messages. An `Err`
    /// reaches the script as an error object.
    pub fn define<F>(&mut self, name: &'static str, func: F)
    where
        F: Fn(&[Object]) -> Result<Object, String> + 'static,
    {
        self.register(Builtin::new(name, move |args| func(args).unwrap_or_else(Object::Error)));
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.get(name)
    }

    pub fn standard() -> Self {
        let mut r = Self::new();
        core::register(&mut r);
        r
    }
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

pub fn check_argc(args: &[Object], n: usize) -> Result<(), String> {
    if args.len() != n {
        Err(format!("wrong number of arguments: expected {n}, got {}", args.len()))
    } else {
        Ok(())
    }
}

pub fn as_array(name: &str, v: &Object) -> Result<Vec<Object>, String> {
    match v {
        Object::Array(items) => Ok(items.borrow().clone()),
        other => Err(format!("argument to `{name}` must be ARRAY, got {}", other.type_name())),
    }
}

pub fn as_str<'a>(name: &str, v: &'a Object) -> Result<&'a str, String> {
    match v {
        Object::String(s) => Ok(s),
        other => Err(format!("argument to `{name}` must be STRING, got {}", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_core_functions() {
        let r = Builtins::standard();
        for name in ["len", "string", "first", "last", "rest", "push", "add"] {
            assert!(r.get(name).is_some(), "missing builtin `{name}`");
        }
        assert!(r.get("put").is_none());
    }

    #[test]
    fn define_turns_err_into_error_object() {
        let mut r = Builtins::new();
        r.define("fail", |_| Err("nope".into()));
        let Some(fail) = r.get("fail") else { panic!("not registered") };
        assert_eq!(fail.call(&[]), Object::error("nope"));
    }

    #[test]
    fn register_replaces_existing() {
        let mut r = Builtins::standard();
        r.define("len", |_| Ok(Object::Integer(-1)));
        assert_eq!(r.get("len").map(|b| b.call(&[])), Some(Object::Integer(-1)));
    }

    #[test]
    fn check_argc_message() {
        assert_eq!(
            check_argc(&[Object::Null], 2),
            Err("wrong number of arguments: expected 2, got 1".to_string())
        );
        assert!(check_argc(&[], 0).is_ok());
    }
}
