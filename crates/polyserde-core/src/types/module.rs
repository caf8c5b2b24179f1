use super::{TypeRef, TypeSpec, builtins};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// A named collection of types, the unit the resolver imports.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    members: IndexMap<String, TypeRef>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build `spec` inside this module and return its handle.
    ///
    /// Defining a name twice replaces the earlier member; handles to the old
    /// definition stay valid but no longer resolve.
    pub fn define(&mut self, spec: TypeSpec) -> TypeRef {
        let name = spec.name().to_string();
        let ty = spec.build(&self.name, None);
        self.members.insert(name, ty.clone());
        ty
    }

    pub fn get(&self, name: &str) -> Option<&TypeRef> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = &TypeRef> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The import mechanism consulted by the type resolver.
///
/// Implementations are read-only from the codec's point of view and must return
/// the same module for the same name for the lifetime of a dump or load.
pub trait ModuleSystem: Send + Sync {
    fn import(&self, name: &str) -> Option<Arc<Module>>;
}

impl<T: ModuleSystem + ?Sized> ModuleSystem for &T {
    fn import(&self, name: &str) -> Option<Arc<Module>> {
        (**self).import(name)
    }
}

impl<T: ModuleSystem + ?Sized> ModuleSystem for Arc<T> {
    fn import(&self, name: &str) -> Option<Arc<Module>> {
        (**self).import(name)
    }
}

/// In-memory module system. Always provides the `builtins` module.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        let builtins = builtins::module();
        let mut modules = HashMap::new();
        modules.insert(builtins.name().to_string(), builtins);
        Self { modules }
    }

    /// Make `module` importable under its name, replacing any previous module.
    pub fn register(&mut self, module: Module) -> Arc<Module> {
        let module = Arc::new(module);
        self.modules
            .insert(module.name().to_string(), Arc::clone(&module));
        module
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.register(module);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleSystem for ModuleRegistry {
    fn import(&self, name: &str) -> Option<Arc<Module>> {
        self.modules.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDef, FieldKind};

    #[test]
    fn test_registry_always_has_builtins() {
        let registry = ModuleRegistry::new();
        let builtins = registry.import("builtins").unwrap();
        assert!(builtins.get("dict").is_some());
        assert!(registry.import("missing").is_none());
    }

    #[test]
    fn test_register_and_import() {
        let mut module = Module::new("app.models");
        let person = module.define(TypeSpec::record(
            "Person",
            [FieldDef::required("name", FieldKind::Str)],
        ));
        let registry = ModuleRegistry::new().with_module(module);

        let imported = registry.import("app.models").unwrap();
        assert_eq!(imported.get("Person"), Some(&person));
        assert!(registry.contains("app.models"));
    }

    #[test]
    fn test_redefine_replaces_member() {
        let mut module = Module::new("m");
        let first = module.define(TypeSpec::builtin("T"));
        let second = module.define(TypeSpec::builtin("T"));
        assert_ne!(first, second);
        assert_eq!(module.get("T"), Some(&second));
        assert_eq!(module.len(), 1);
    }
}
