//! Type objects: records, enumerations, and builtin classes.
//!
//! A [`TypeRef`] is a shared handle to an immutable [`TypeDef`]. Equality on
//! `TypeRef` is identity, so two handles are equal only when they point at the
//! same definition obtained from the same [`Module`].

pub mod builtins;
pub mod module;

use crate::error::ModelError;
use crate::model::{FieldDef, RecordSchema};
use crate::naming::DottedPath;
use crate::value::{EnumMember, Record, Value};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

pub use module::{Module, ModuleRegistry, ModuleSystem};

/// Shared handle to a type definition.
#[derive(Clone)]
pub struct TypeRef(Arc<TypeDef>);

/// Definition of a type living in a module.
#[derive(Debug)]
pub struct TypeDef {
    module: String,
    qualname: String,
    kind: TypeKind,
    base: Option<TypeRef>,
    nested: IndexMap<String, TypeRef>,
}

#[derive(Debug)]
pub enum TypeKind {
    Builtin,
    Record(RecordSchema),
    Enum(EnumDef),
}

/// Ordered enumeration members: name to value.
#[derive(Debug, Clone, Default)]
pub struct EnumDef {
    members: IndexMap<String, Value>,
}

impl EnumDef {
    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl TypeDef {
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Qualified name inside the module, `Outer.Inner` for nested types.
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    /// Unqualified name.
    pub fn name(&self) -> &str {
        self.qualname
            .rsplit('.')
            .next()
            .unwrap_or(self.qualname.as_str())
    }

    /// `<module>.<qualname>`, the stable identifier used in tagged trees.
    pub fn path(&self) -> DottedPath {
        DottedPath::new(&self.module, &self.qualname)
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn base(&self) -> Option<&TypeRef> {
        self.base.as_ref()
    }

    pub fn nested(&self, name: &str) -> Option<&TypeRef> {
        self.nested.get(name)
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.nested.values()
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    pub fn schema(&self) -> Option<&RecordSchema> {
        match &self.kind {
            TypeKind::Record(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn enum_def(&self) -> Option<&EnumDef> {
        match &self.kind {
            TypeKind::Enum(def) => Some(def),
            _ => None,
        }
    }
}

impl TypeRef {
    /// True when `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &TypeRef) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.base();
        }
        false
    }

    /// Member of this enumeration called `name`.
    pub fn member(&self, name: &str) -> Option<EnumMember> {
        self.enum_def()?
            .value_of(name)
            .map(|_| EnumMember::new(self.clone(), name))
    }

    pub fn members(&self) -> Vec<EnumMember> {
        self.enum_def()
            .map(|def| {
                def.names()
                    .map(|name| EnumMember::new(self.clone(), name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validate `fields` against the record schema and build an instance.
    pub fn instantiate<I, K, V>(&self, fields: I) -> Result<Record, ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let schema = self
            .schema()
            .ok_or_else(|| ModelError::NotARecordType(self.path().to_string()))?;
        let input = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let fields = schema.validate(&self.path().to_string(), input)?;
        Ok(Record::validated(self.clone(), fields))
    }
}

impl Deref for TypeRef {
    type Target = TypeDef;

    fn deref(&self) -> &TypeDef {
        &self.0
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.path().to_string()).finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Builder for a type definition, turned into a [`TypeRef`] by [`Module::define`].
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: String,
    kind: SpecKind,
    base: Option<TypeRef>,
    nested: Vec<TypeSpec>,
}

#[derive(Debug, Clone)]
enum SpecKind {
    Builtin,
    Record(Vec<FieldDef>),
    Enum(Vec<(String, Value)>),
}

impl TypeSpec {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::with_kind(name, SpecKind::Builtin)
    }

    pub fn record(name: impl Into<String>, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self::with_kind(name, SpecKind::Record(fields.into_iter().collect()))
    }

    pub fn enumeration<K, V>(name: impl Into<String>, members: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let members = members
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self::with_kind(name, SpecKind::Enum(members))
    }

    /// Inherit the fields of `base`; the base fields come first.
    pub fn extends(mut self, base: &TypeRef) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Declare a type nested inside this one (`Outer.Inner`).
    pub fn nest(mut self, spec: TypeSpec) -> Self {
        self.nested.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn with_kind(name: impl Into<String>, kind: SpecKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            nested: Vec::new(),
        }
    }

    pub(crate) fn build(self, module: &str, outer: Option<&str>) -> TypeRef {
        let qualname = match outer {
            Some(outer) => format!("{}.{}", outer, self.name),
            None => self.name,
        };

        let nested = self
            .nested
            .into_iter()
            .map(|spec| {
                let name = spec.name.clone();
                (name, spec.build(module, Some(&qualname)))
            })
            .collect();

        let kind = match self.kind {
            SpecKind::Builtin => TypeKind::Builtin,
            SpecKind::Record(own) => {
                let inherited = self
                    .base
                    .as_ref()
                    .and_then(|base| base.schema())
                    .map(|schema| schema.fields().to_vec())
                    .unwrap_or_default();
                TypeKind::Record(RecordSchema::inherit(inherited, own))
            }
            SpecKind::Enum(members) => TypeKind::Enum(EnumDef {
                members: members.into_iter().collect(),
            }),
        };

        TypeRef(Arc::new(TypeDef {
            module: module.to_string(),
            qualname,
            kind,
            base: self.base,
            nested,
        }))
    }
}
