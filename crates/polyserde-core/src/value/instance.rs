use super::Value;
use crate::naming::DottedPath;
use crate::types::TypeRef;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An instance of a record type with its fields in declared order.
///
/// Only produced by schema validation ([`TypeRef::instantiate`]), so the field
/// set always matches the type's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    ty: TypeRef,
    fields: IndexMap<String, Value>,
}

impl Record {
    pub(crate) fn validated(ty: TypeRef, fields: IndexMap<String, Value>) -> Self {
        Self { ty, fields }
    }

    /// The exact runtime type, which may be a subclass of a field's declared type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_fields(self) -> IndexMap<String, Value> {
        self.fields
    }

    pub fn is_instance_of(&self, ty: &TypeRef) -> bool {
        self.ty.is_subclass_of(ty)
    }
}

/// A member of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMember {
    ty: TypeRef,
    name: String,
}

impl EnumMember {
    pub(crate) fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&Value> {
        self.ty.enum_def()?.value_of(&self.name)
    }

    /// `<module>.<EnumType>.<MEMBER>`
    pub fn path(&self) -> DottedPath {
        DottedPath::new(self.ty.module(), &format!("{}.{}", self.ty.qualname(), self.name))
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ty.qualname(), self.name)
    }
}

/// A host value with no tagged representation: an open handle, a callable, and
/// similar. Carried through the graph so the encoder can reject it by name.
#[derive(Clone)]
pub struct Opaque {
    type_name: String,
    handle: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, handle: T) -> Self {
        Self {
            type_name: type_name.into(),
            handle: Arc::new(handle),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opaque")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }
}
