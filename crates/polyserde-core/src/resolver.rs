//! Dotted-path type resolution.
//!
//! `resolve("pkg.mod.Outer.Inner")` probes `pkg.mod.Outer`, then `pkg.mod`, then
//! `pkg` for an importable module. The first (longest) importable prefix is the
//! module; the remaining segments are walked as nested attributes.

use crate::error::ResolutionError;
use crate::naming::DottedPath;
use crate::types::{Module, ModuleSystem, TypeRef};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TypeResolver<S> {
    modules: S,
}

impl<S: ModuleSystem> TypeResolver<S> {
    pub fn new(modules: S) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &S {
        &self.modules
    }

    /// Stable identifier of `ty`; [`TypeResolver::resolve`] maps it back to `ty`.
    pub fn path_of(ty: &TypeRef) -> DottedPath {
        ty.path()
    }

    pub fn resolve(&self, path: &str) -> Result<TypeRef, ResolutionError> {
        self.resolve_path(&DottedPath::parse(path)?)
    }

    pub fn resolve_path(&self, path: &DottedPath) -> Result<TypeRef, ResolutionError> {
        for (module_name, attributes) in path.module_splits() {
            if let Some(module) = self.modules.import(&module_name) {
                debug!("Resolving {} in module {}", path, module_name);
                return lookup(&module, attributes);
            }
        }
        Err(ResolutionError::ModuleNotFound(path.to_string()))
    }
}

fn lookup(module: &Module, attributes: &[String]) -> Result<TypeRef, ResolutionError> {
    let not_found = |end: usize| ResolutionError::AttributeNotFound {
        module: module.name().to_string(),
        attribute: attributes[..end].join("."),
    };

    let (first, rest) = attributes.split_first().ok_or_else(|| not_found(0))?;
    let mut current = module.get(first).ok_or_else(|| not_found(1))?;
    for (i, name) in rest.iter().enumerate() {
        current = current.nested(name).ok_or_else(|| not_found(i + 2))?;
    }
    Ok(current.clone())
}
