use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::object::Object;

/// Shared handle to a scope frame. Closures keep the frame they were created
/// in alive through this handle.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// A fresh top-level frame.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    /// A frame whose lookups fall back to `outer`.
    pub fn new_child(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self { store: HashMap::new(), outer: Some(Rc::clone(outer)) }))
    }

    /// Walk outward through enclosing frames until `name` is found.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(v) => Some(v.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Bind in this frame only, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}
