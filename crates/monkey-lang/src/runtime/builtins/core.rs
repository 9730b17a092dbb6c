//! Always-available built-ins: `len`, `string` and the array helpers.

use crate::runtime::object::{NULL, Object};
use super::{Builtins, as_array, check_argc};

pub fn register(r: &mut Builtins) {
    r.define("len", len);
    r.define("string", string);
    r.define("first", first);
    r.define("last", last);
    r.define("rest", rest);
    r.define("push", push);
    r.define("add", add);
}

fn len(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 1)?;
    let n = match &args[0] {
        Object::String(s)    => s.chars().count(),
        Object::Array(items) => items.borrow().len(),
        other => return Err(format!("argument to `len` not supported, got {}", other.type_name())),
    };
    Ok(Object::Integer(n as i64))
}

fn string(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 1)?;
    Ok(Object::String(args[0].to_string()))
}

fn first(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 1)?;
    Ok(as_array("first", &args[0])?.first().cloned().unwrap_or(NULL))
}

fn last(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 1)?;
    Ok(as_array("last", &args[0])?.last().cloned().unwrap_or(NULL))
}

/// Everything after the first element, as a new array. `null` for an empty array.
fn rest(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 1)?;
    let items = as_array("rest", &args[0])?;
    match items.split_first() {
        Some((_, tail)) => Ok(Object::array(tail.to_vec())),
        None => Ok(NULL),
    }
}

/// Copy-on-append: the argument array is left untouched.
fn push(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 2)?;
    let mut items = as_array("push", &args[0])?;
    items.push(args[1].clone());
    Ok(Object::array(items))
}

/// Appends in place, so every binding sharing the array sees the new element.
fn add(args: &[Object]) -> Result<Object, String> {
    check_argc(args, 2)?;
    match &args[0] {
        Object::Array(items) => {
            items.borrow_mut().push(args[1].clone());
            Ok(NULL)
        }
        other => Err(format!("argument to `add` must be ARRAY, got {}", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Object]) -> Object {
        match Builtins::standard().get(name) {
            Some(b) => b.call(args),
            None => panic!("no builtin `{name}`"),
        }
    }

    fn ints(values: &[i64]) -> Object {
        Object::array(values.iter().copied().map(Object::Integer).collect())
    }

    #[test]
    fn len_of_string_counts_chars() {
        assert_eq!(call("len", &[Object::String("".into())]), Object::Integer(0));
        assert_eq!(call("len", &[Object::String("four".into())]), Object::Integer(4));
        assert_eq!(call("len", &[Object::String("héllo".into())]), Object::Integer(5));
    }

    #[test]
    fn len_of_array() {
        assert_eq!(call("len", &[ints(&[1, 2, 3])]), Object::Integer(3));
    }

    #[test]
    fn len_errors() {
        assert_eq!(
            call("len", &[Object::Integer(1)]),
            Object::error("argument to `len` not supported, got INTEGER")
        );
        assert_eq!(
            call("len", &[Object::String("one".into()), Object::String("two".into())]),
            Object::error("wrong number of arguments: expected 1, got 2")
        );
    }

    #[test]
    fn string_uses_display_form() {
        assert_eq!(call("string", &[ints(&[1, 2])]), Object::String("[1, 2]".into()));
        assert_eq!(call("string", &[Object::Boolean(true)]), Object::String("true".into()));
    }

    #[test]
    fn first_last_rest() {
        assert_eq!(call("first", &[ints(&[1, 2, 3])]), Object::Integer(1));
        assert_eq!(call("last", &[ints(&[1, 2, 3])]), Object::Integer(3));
        assert_eq!(call("rest", &[ints(&[1, 2, 3])]), ints(&[2, 3]));
        assert_eq!(call("first", &[ints(&[])]), NULL);
        assert_eq!(call("last", &[ints(&[])]), NULL);
        assert_eq!(call("rest", &[ints(&[])]), NULL);
        assert_eq!(
            call("first", &[Object::Integer(1)]),
            Object::error("argument to `first` must be ARRAY, got INTEGER")
        );
    }

    #[test]
    fn push_returns_new_array() {
        let original = ints(&[1]);
        assert_eq!(call("push", &[original.clone(), Object::Integer(2)]), ints(&[1, 2]));
        assert_eq!(original, ints(&[1]));
    }

    #[test]
    fn add_mutates_in_place() {
        let shared = ints(&[1]);
        let alias = shared.clone();
        assert_eq!(call("add", &[shared, Object::Integer(2)]), NULL);
        assert_eq!(alias, ints(&[1, 2]));
    }
}
