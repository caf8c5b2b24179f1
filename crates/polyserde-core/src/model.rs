//! Record model capability.
//!
//! The codec never looks inside record types itself. It asks a [`RecordModel`]
//! whether a value is a record, for the record's fields, and to construct a
//! record of a named type from decoded fields. [`SchemaModel`] is the default
//! implementation backed by the [`RecordSchema`] declared on each record type.

use crate::error::ModelError;
use crate::types::TypeRef;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Declared shape of a record field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Any,
    Bool,
    Int,
    /// Accepts floats and coerces ints.
    Float,
    Str,
    /// A class object.
    Type,
    List(Box<FieldKind>),
    Map,
    Optional(Box<FieldKind>),
    /// A member of the given enumeration.
    Enum(TypeRef),
    /// An instance of the given record type or one of its subclasses.
    Record(TypeRef),
}

impl FieldKind {
    pub fn list_of(kind: FieldKind) -> Self {
        FieldKind::List(Box::new(kind))
    }

    pub fn optional(kind: FieldKind) -> Self {
        FieldKind::Optional(Box::new(kind))
    }

    /// Check `value` against this kind, applying coercions. `None` on mismatch.
    pub fn coerce(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (FieldKind::Any, value) => Some(value),
            (FieldKind::Bool, value @ Value::Bool(_)) => Some(value),
            (FieldKind::Int, value @ Value::Int(_)) => Some(value),
            (FieldKind::Float, Value::Int(n)) => Some(Value::Float(n as f64)),
            (FieldKind::Float, value @ Value::Float(_)) => Some(value),
            (FieldKind::Str, value @ Value::Str(_)) => Some(value),
            (FieldKind::Type, value @ Value::Class(_)) => Some(value),
            (FieldKind::List(inner), Value::List(items)) => items
                .into_iter()
                .map(|item| inner.coerce(item))
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            (FieldKind::Map, value @ Value::Map(_)) => Some(value),
            (FieldKind::Optional(_), Value::Null) => Some(Value::Null),
            (FieldKind::Optional(inner), value) => inner.coerce(value),
            (FieldKind::Enum(ty), Value::Enum(member)) if member.ty() == ty => {
                Some(Value::Enum(member))
            }
            (FieldKind::Record(ty), Value::Record(record)) if record.is_instance_of(ty) => {
                Some(Value::Record(record))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Any => write!(f, "any"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Str => write!(f, "str"),
            FieldKind::Type => write!(f, "type"),
            FieldKind::List(inner) => write!(f, "list[{}]", inner),
            FieldKind::Map => write!(f, "dict"),
            FieldKind::Optional(inner) => write!(f, "optional[{}]", inner),
            FieldKind::Enum(ty) | FieldKind::Record(ty) => write!(f, "{}", ty.qualname()),
        }
    }
}

/// A named record field with an optional default.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    default: Option<Value>,
}

impl FieldDef {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Ordered field declarations of a record type.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    fields: Vec<FieldDef>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    /// Base fields first; an own field with a base field's name overrides it in place.
    pub fn inherit(base: Vec<FieldDef>, own: Vec<FieldDef>) -> Self {
        let mut fields = base;
        for field in own {
            match fields.iter_mut().find(|f| f.name == field.name) {
                Some(slot) => *slot = field,
                None => fields.push(field),
            }
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate `input` and return the fields in declared order, defaults filled in.
    pub fn validate(
        &self,
        ty: &str,
        mut input: IndexMap<String, Value>,
    ) -> Result<IndexMap<String, Value>, ModelError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for def in &self.fields {
            let value = match input.shift_remove(&def.name) {
                Some(value) => value,
                None => def.default.clone().ok_or_else(|| ModelError::MissingField {
                    ty: ty.to_string(),
                    field: def.name.clone(),
                })?,
            };
            let found = value.type_name();
            let value = def
                .kind
                .coerce(value)
                .ok_or_else(|| ModelError::InvalidField {
                    ty: ty.to_string(),
                    field: def.name.clone(),
                    expected: def.kind.to_string(),
                    found,
                })?;
            fields.insert(def.name.clone(), value);
        }

        if let Some(extra) = input.keys().next() {
            return Err(ModelError::UnknownField {
                ty: ty.to_string(),
                field: extra.clone(),
            });
        }
        Ok(fields)
    }
}

/// The structured-record capability the encoder and decoder depend on.
pub trait RecordModel: Send + Sync {
    /// The record type of `value`, or `None` when it is not a record instance.
    fn record_type<'a>(&self, value: &'a Value) -> Option<&'a TypeRef>;

    /// Field name to value pairs of a record instance, in declared order.
    fn fields<'a>(&self, value: &'a Value) -> Option<Vec<(&'a str, &'a Value)>>;

    /// Build an instance of `ty` from decoded fields, validating them.
    fn construct(&self, ty: &TypeRef, fields: IndexMap<String, Value>) -> Result<Value, ModelError>;
}

impl<T: RecordModel + ?Sized> RecordModel for &T {
    fn record_type<'a>(&self, value: &'a Value) -> Option<&'a TypeRef> {
        (**self).record_type(value)
    }

    fn fields<'a>(&self, value: &'a Value) -> Option<Vec<(&'a str, &'a Value)>> {
        (**self).fields(value)
    }

    fn construct(&self, ty: &TypeRef, fields: IndexMap<String, Value>) -> Result<Value, ModelError> {
        (**self).construct(ty, fields)
    }
}

impl<T: RecordModel + ?Sized> RecordModel for Arc<T> {
    fn record_type<'a>(&self, value: &'a Value) -> Option<&'a TypeRef> {
        (**self).record_type(value)
    }

    fn fields<'a>(&self, value: &'a Value) -> Option<Vec<(&'a str, &'a Value)>> {
        (**self).fields(value)
    }

    fn construct(&self, ty: &TypeRef, fields: IndexMap<String, Value>) -> Result<Value, ModelError> {
        (**self).construct(ty, fields)
    }
}

/// Record model backed by the schemas declared on record types.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaModel;

impl RecordModel for SchemaModel {
    fn record_type<'a>(&self, value: &'a Value) -> Option<&'a TypeRef> {
        value.as_record().map(|record| record.ty())
    }

    fn fields<'a>(&self, value: &'a Value) -> Option<Vec<(&'a str, &'a Value)>> {
        value.as_record().map(|record| record.fields().collect())
    }

    fn construct(&self, ty: &TypeRef, fields: IndexMap<String, Value>) -> Result<Value, ModelError> {
        ty.instantiate(fields).map(Value::Record)
    }
}
