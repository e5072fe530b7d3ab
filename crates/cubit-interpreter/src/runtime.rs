use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    rc::Rc,
};

use cubit_parser::Span;

use crate::Value;

pub type SharedTable<'src> = Rc<RefCell<SymbolTable<'src>>>;

/// Maps names to values. Lookups which miss fall through to the parent table.
#[derive(Debug, Default)]
pub struct SymbolTable<'src> {
    symbols: HashMap<String, Value<'src>>,
    parent: Option<SharedTable<'src>>,
}

impl<'src> SymbolTable<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: SharedTable<'src>) -> Self {
        Self {
            symbols: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Returns a copy of the value bound to `name` in this table or the nearest ancestor.
    pub fn get(&self, name: &str) -> Option<Value<'src>> {
        match self.symbols.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().get(name)),
        }
    }

    /// Binds `name` in this table, never in a parent.
    pub fn set(&mut self, name: impl Into<String>, value: Value<'src>) {
        self.symbols.insert(name.into(), value);
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}

/// A frame of execution, used to resolve names and to build tracebacks.
pub struct Context<'src> {
    pub name: String,
    pub symbol_table: SharedTable<'src>,
    pub parent: Option<Rc<Context<'src>>>,
    /// Where this context was entered from inside of `parent`
    pub parent_span: Option<Span<'src>>,
}

impl<'src> Context<'src> {
    pub fn new(name: impl Into<String>, symbol_table: SharedTable<'src>) -> Self {
        Self {
            name: name.into(),
            symbol_table,
            parent: None,
            parent_span: None,
        }
    }

    /// Creates a context for a call made from `parent` at `call_site`.
    ///
    /// The new context shares the symbol table of its parent, so bindings made inside of it
    /// are visible to the caller.
    pub fn child(name: impl Into<String>, parent: &Rc<Context<'src>>, call_site: Span<'src>) -> Self {
        Self {
            name: name.into(),
            symbol_table: Rc::clone(&parent.symbol_table),
            parent: Some(Rc::clone(parent)),
            parent_span: Some(call_site),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value<'src>> {
        self.symbol_table.borrow().get(name)
    }

    pub fn bind(&self, name: impl Into<String>, value: Value<'src>) {
        self.symbol_table.borrow_mut().set(name, value)
    }
}

impl Debug for Context<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| &parent.name))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(table: SymbolTable) -> SharedTable {
        Rc::new(RefCell::new(table))
    }

    #[test]
    fn lookup_falls_through_to_parent() {
        let globals = shared(SymbolTable::new());
        globals.borrow_mut().set("x", Value::number(1.0));

        let mut locals = SymbolTable::with_parent(Rc::clone(&globals));
        assert_eq!(locals.get("x").map(|v| v.kind), Some(Value::number(1.0).kind));
        assert!(locals.get("y").is_none());

        // writes shadow the parent but never modify it
        locals.set("x", Value::number(2.0));
        assert_eq!(locals.get("x").map(|v| v.kind), Some(Value::number(2.0).kind));
        assert_eq!(
            globals.borrow().get("x").map(|v| v.kind),
            Some(Value::number(1.0).kind)
        );
    }

    #[test]
    fn child_context_shares_the_table() {
        let root = Rc::new(Context::new("{ program }", shared(SymbolTable::new())));
        let child = Context::child("print", &root, Span::dummy());

        child.bind("value", Value::number(3.0));
        assert_eq!(root.lookup("value").map(|v| v.kind), Some(Value::number(3.0).kind));
        assert_eq!(child.parent.as_ref().map(|p| p.name.as_str()), Some("{ program }"));

        root.symbol_table.borrow_mut().clear();
        assert!(child.lookup("value").is_none());
    }
}
