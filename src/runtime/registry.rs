use crate::language::{descriptor::parse_signature, signature::Signature};
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    handle::Handle,
    value::Value,
};
use std::collections::HashMap;

/// Source of named handles. Combinators never resolve names themselves;
/// callers look handles up here and pass them in.
pub trait HandleResolver {
    fn resolve(&self, name: &str, signature: &Signature) -> RuntimeResult<Handle>;
}

/// Name-keyed handle table. One name may carry several overloads as long
/// as their signatures differ.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    handles: HashMap<String, Vec<Handle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under its own name.
    pub fn register(&mut self, handle: Handle) -> RuntimeResult<()> {
        let overloads = self.handles.entry(handle.name().to_string()).or_default();
        if overloads
            .iter()
            .any(|existing| existing.signature() == handle.signature())
        {
            return Err(RuntimeError::DuplicateSymbol {
                name: handle.name().to_string(),
                signature: handle.signature().to_string(),
            });
        }
        tracing::debug!(name = handle.name(), signature = %handle.signature(), "registered handle");
        overloads.push(handle);
        Ok(())
    }

    /// Registers a native function under `name` with the signature written
    /// in `descriptor`.
    pub fn define<F>(&mut self, name: &str, descriptor: &str, target: F) -> RuntimeResult<Handle>
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        let signature = parse_signature(descriptor)?;
        let handle = Handle::new(name, signature, target);
        self.register(handle.clone())?;
        Ok(handle)
    }

    /// Resolves `name` against a textual signature.
    pub fn find(&self, name: &str, descriptor: &str) -> RuntimeResult<Handle> {
        let signature = parse_signature(descriptor)?;
        self.resolve(name, &signature)
    }

    /// First registered overload of `name`.
    pub fn lookup(&self, name: &str) -> RuntimeResult<Handle> {
        self.handles
            .get(name)
            .and_then(|overloads| overloads.first())
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownSymbol {
                name: name.to_string(),
            })
    }

    pub fn overloads(&self, name: &str) -> &[Handle] {
        self.handles.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl HandleResolver for Registry {
    fn resolve(&self, name: &str, signature: &Signature) -> RuntimeResult<Handle> {
        let overloads = self
            .handles
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownSymbol {
                name: name.to_string(),
            })?;
        overloads
            .iter()
            .find(|handle| handle.signature() == signature)
            .cloned()
            .ok_or_else(|| RuntimeError::TypeMismatch {
                message: format!(
                    "`{name}` has no overload {signature}; available: {}",
                    overloads
                        .iter()
                        .map(|handle| handle.signature().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::kind::Kind;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .define("twice", "(int) -> int", |args| {
                Ok(Value::Int(args[0].as_int()? * 2))
            })
            .expect("int overload");
        registry
            .define("twice", "(J)J", |args| match args[0] {
                Value::Long(v) => Ok(Value::Long(v * 2)),
                _ => Ok(Value::Long(0)),
            })
            .expect("long overload");
        registry
    }

    #[test]
    fn resolves_overloads_by_signature() {
        let registry = registry();
        let long = registry.find("twice", "(long) -> long").expect("long");
        assert_eq!(long.invoke_exact(&[Value::Long(4)]).expect("call"), Value::Long(8));
        let int = registry
            .resolve("twice", &Signature::new([Kind::Int], Kind::Int))
            .expect("int");
        assert_eq!(int.invoke_exact(&[Value::Int(4)]).expect("call"), Value::Int(8));
        assert_eq!(registry.overloads("twice").len(), 2);
        assert_eq!(registry.names(), vec!["twice"]);
    }

    #[test]
    fn unknown_names_and_signatures() {
        let registry = registry();
        assert!(matches!(
            registry.lookup("thrice"),
            Err(RuntimeError::UnknownSymbol { .. })
        ));
        assert!(matches!(
            registry.find("twice", "(double) -> double"),
            Err(RuntimeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.find("twice", "(double -> double"),
            Err(RuntimeError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn duplicate_signatures_are_rejected() {
        let mut registry = registry();
        let err = registry
            .define("twice", "(I)I", |args| Ok(args[0].clone()))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateSymbol { .. }));
    }
}
