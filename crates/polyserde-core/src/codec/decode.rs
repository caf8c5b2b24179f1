use super::trail::Trail;
use super::{CLASS_REF_TAG, CLASS_TAG, DEFAULT_MAX_DEPTH, DICT_TAG, ENUM_TAG, KEY_TAG, VALUE_KEY};
use crate::error::{DecodeError, ResolutionError};
use crate::model::{RecordModel, SchemaModel};
use crate::naming::DottedPath;
use crate::resolver::TypeResolver;
use crate::types::{ModuleSystem, TypeRef};
use crate::value::{Mapping, Value};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value as Json};

/// Walks a tagged JSON tree depth-first and rebuilds the original [`Value`].
#[derive(Debug, Clone)]
pub struct Decoder<S, M = SchemaModel> {
    resolver: TypeResolver<S>,
    model: M,
    max_depth: usize,
}

impl<S: ModuleSystem> Decoder<S> {
    pub fn new(modules: S) -> Self {
        Self {
            resolver: TypeResolver::new(modules),
            model: SchemaModel,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl<S: ModuleSystem, M: RecordModel> Decoder<S, M> {
    /// Use `model` to construct records instead of the schema model.
    pub fn with_model<N: RecordModel>(self, model: N) -> Decoder<S, N> {
        Decoder {
            resolver: self.resolver,
            model,
            max_depth: self.max_depth,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn resolver(&self) -> &TypeResolver<S> {
        &self.resolver
    }

    pub fn decode(&self, tree: &Json) -> Result<Value, DecodeError> {
        self.decode_node(tree, &Trail::Root, 0)
    }

    fn decode_node(&self, node: &Json, trail: &Trail<'_>, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                max_depth: self.max_depth,
                location: trail.to_string(),
            });
        }

        match node {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => decode_number(n, trail),
            Json::String(s) => Ok(Value::Str(s.clone())),
            Json::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.decode_node(item, &trail.index(i), depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Json::Object(object) => self.decode_object(object, trail, depth),
        }
    }

    fn decode_object(&self, object: &Map<String, Json>, trail: &Trail<'_>, depth: usize) -> Result<Value, DecodeError> {
        if let Some(tag) = object.get(CLASS_TAG) {
            return self.decode_record(tag, object, trail, depth);
        }
        if let Some(tag) = object.get(ENUM_TAG) {
            return self.decode_enum(tag, trail);
        }
        if let Some(tag) = object.get(CLASS_REF_TAG) {
            let path = tag_path(tag, CLASS_REF_TAG, trail)?;
            return self.resolve(path, trail).map(Value::Class);
        }
        if let Some(entries) = object.get(DICT_TAG) {
            return self.decode_entries(entries, trail, depth);
        }

        let mut map = Mapping::with_capacity(object.len());
        for (key, entry) in object {
            let value = self.decode_node(entry, &trail.key(key), depth + 1)?;
            map.insert_unique(key.as_str(), value);
        }
        Ok(Value::Map(map))
    }

    /// Every sibling of `__class__` is decoded and handed to the record model,
    /// which decides whether unexpected fields are acceptable.
    fn decode_record(
        &self,
        tag: &Json,
        object: &Map<String, Json>,
        trail: &Trail<'_>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let ty = self.resolve(tag_path(tag, CLASS_TAG, trail)?, trail)?;

        let mut fields = IndexMap::with_capacity(object.len().saturating_sub(1));
        for (key, entry) in object.iter().filter(|(key, _)| key.as_str() != CLASS_TAG) {
            let value = self.decode_node(entry, &trail.key(key), depth + 1)?;
            fields.insert(key.clone(), value);
        }

        self.model
            .construct(&ty, fields)
            .map_err(|source| DecodeError::Model {
                location: trail.to_string(),
                source,
            })
    }

    fn decode_enum(&self, tag: &Json, trail: &Trail<'_>) -> Result<Value, DecodeError> {
        let raw = tag_path(tag, ENUM_TAG, trail)?;
        let path = DottedPath::parse(raw).map_err(|source| unresolved(source, trail))?;
        let (owner, member) = path
            .split_last()
            .ok_or_else(|| reconstruction(trail, format!("enum path '{}' has no member name", raw)))?;

        let ty = self
            .resolver
            .resolve_path(&owner)
            .map_err(|source| unresolved(source, trail))?;
        if !ty.is_enum() {
            return Err(reconstruction(trail, format!("'{}' is not an enumeration", owner)));
        }
        ty.member(member)
            .map(Value::Enum)
            .ok_or_else(|| reconstruction(trail, format!("'{}' is not a member of {}", member, owner)))
    }

    fn decode_entries(&self, entries: &Json, trail: &Trail<'_>, depth: usize) -> Result<Value, DecodeError> {
        let dict_trail = trail.key(DICT_TAG);
        let entries = entries
            .as_array()
            .ok_or_else(|| reconstruction(&dict_trail, format!("expected a list of entries, found {}", kind_of(entries))))?;

        let mut map = Mapping::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let entry_trail = dict_trail.index(i);
            let (key, value) = entry
                .as_object()
                .and_then(|pair| Some((pair.get(KEY_TAG)?, pair.get(VALUE_KEY)?)))
                .ok_or_else(|| {
                    reconstruction(
                        &entry_trail,
                        format!("entry must be an object with '{}' and '{}'", KEY_TAG, VALUE_KEY),
                    )
                })?;
            let key = self.decode_node(key, &entry_trail.key(KEY_TAG), depth + 2)?;
            let value = self.decode_node(value, &entry_trail.key(VALUE_KEY), depth + 2)?;
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }

    fn resolve(&self, path: &str, trail: &Trail<'_>) -> Result<TypeRef, DecodeError> {
        self.resolver
            .resolve(path)
            .map_err(|source| unresolved(source, trail))
    }
}

fn decode_number(n: &Number, trail: &Trail<'_>) -> Result<Value, DecodeError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| reconstruction(trail, format!("unrepresentable number {}", n)))
}

fn tag_path<'j>(tag: &'j Json, name: &str, trail: &Trail<'_>) -> Result<&'j str, DecodeError> {
    tag.as_str().ok_or_else(|| {
        reconstruction(
            trail,
            format!("'{}' must be a dotted path string, found {}", name, kind_of(tag)),
        )
    })
}

fn kind_of(node: &Json) -> &'static str {
    match node {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn unresolved(source: ResolutionError, trail: &Trail<'_>) -> DecodeError {
    DecodeError::Unresolved {
        location: trail.to_string(),
        source,
    }
}

fn reconstruction(trail: &Trail<'_>, reason: String) -> DecodeError {
    DecodeError::Reconstruction {
        location: trail.to_string(),
        reason,
    }
}
