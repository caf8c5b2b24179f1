use super::trail::Trail;
use super::{CLASS_REF_TAG, CLASS_TAG, DEFAULT_MAX_DEPTH, DICT_TAG, ENUM_TAG, KEY_TAG, RESERVED_KEYS, VALUE_KEY};
use crate::error::EncodeError;
use crate::model::{RecordModel, SchemaModel};
use crate::types::TypeRef;
use crate::value::{Mapping, Value};
use serde_json::{Map, Number, Value as Json};
use tracing::debug;

/// Walks a [`Value`] depth-first and emits the tagged JSON tree.
#[derive(Debug, Clone)]
pub struct Encoder<M = SchemaModel> {
    model: M,
    max_depth: usize,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_model(SchemaModel)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RecordModel> Encoder<M> {
    pub fn with_model(model: M) -> Self {
        Self {
            model,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn encode(&self, value: &Value) -> Result<Json, EncodeError> {
        self.encode_node(value, &Trail::Root, 0)
    }

    fn encode_node(&self, value: &Value, trail: &Trail<'_>, depth: usize) -> Result<Json, EncodeError> {
        if depth > self.max_depth {
            return Err(EncodeError::DepthLimitExceeded {
                max_depth: self.max_depth,
                location: trail.to_string(),
            });
        }

        match value {
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Int(n) => Ok(Json::from(*n)),
            Value::Float(f) => Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| unsupported(value, trail)),
            Value::Str(s) => Ok(Json::String(s.clone())),
            Value::Enum(member) => Ok(tagged(ENUM_TAG, member.path().to_string())),
            Value::Class(ty) => Ok(tagged(CLASS_REF_TAG, ty.path().to_string())),
            _ => match self.model.record_type(value) {
                Some(ty) => self.encode_record(ty, value, trail, depth),
                None => self.encode_container(value, trail, depth),
            },
        }
    }

    fn encode_record(
        &self,
        ty: &TypeRef,
        value: &Value,
        trail: &Trail<'_>,
        depth: usize,
    ) -> Result<Json, EncodeError> {
        let fields = self
            .model
            .fields(value)
            .ok_or_else(|| unsupported(value, trail))?;

        let mut object = Map::with_capacity(fields.len() + 1);
        object.insert(CLASS_TAG.to_string(), Json::String(ty.path().to_string()));
        for (name, field) in fields {
            let encoded = self.encode_node(field, &trail.key(name), depth + 1)?;
            object.insert(name.to_string(), encoded);
        }
        Ok(Json::Object(object))
    }

    fn encode_container(&self, value: &Value, trail: &Trail<'_>, depth: usize) -> Result<Json, EncodeError> {
        match value {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.encode_node(item, &trail.index(i), depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Map(map) if is_plain_object(map) => {
                let mut object = Map::with_capacity(map.len());
                for (key, entry) in map {
                    if let Value::Str(key) = key {
                        let encoded = self.encode_node(entry, &trail.key(key), depth + 1)?;
                        object.insert(key.clone(), encoded);
                    }
                }
                Ok(Json::Object(object))
            }
            Value::Map(map) => self.encode_entries(map, trail, depth),
            _ => Err(unsupported(value, trail)),
        }
    }

    /// `{"__dict__": [{"__key__": k, "value": v}, ...]}` in source order.
    fn encode_entries(&self, map: &Mapping, trail: &Trail<'_>, depth: usize) -> Result<Json, EncodeError> {
        let dict_trail = trail.key(DICT_TAG);
        let mut entries = Vec::with_capacity(map.len());
        for (i, (key, entry)) in map.iter().enumerate() {
            let entry_trail = dict_trail.index(i);
            let mut pair = Map::with_capacity(2);
            pair.insert(
                KEY_TAG.to_string(),
                self.encode_node(key, &entry_trail.key(KEY_TAG), depth + 2)?,
            );
            pair.insert(
                VALUE_KEY.to_string(),
                self.encode_node(entry, &entry_trail.key(VALUE_KEY), depth + 2)?,
            );
            entries.push(Json::Object(pair));
        }
        Ok(tagged(DICT_TAG, Json::Array(entries)))
    }
}

/// A string-keyed mapping is written as a plain object unless one of its keys
/// would be read back as a tag; those go through the `__dict__` form instead.
fn is_plain_object(map: &Mapping) -> bool {
    if !map.is_string_keyed() {
        return false;
    }
    let collides = map
        .keys()
        .filter_map(Value::as_str)
        .any(|key| RESERVED_KEYS.contains(&key));
    if collides {
        debug!("String-keyed mapping uses a reserved key; writing it as {}", DICT_TAG);
    }
    !collides
}

fn tagged(tag: &str, payload: impl Into<Json>) -> Json {
    let mut object = Map::with_capacity(1);
    object.insert(tag.to_string(), payload.into());
    Json::Object(object)
}

fn unsupported(value: &Value, trail: &Trail<'_>) -> EncodeError {
    EncodeError::UnsupportedType {
        type_name: value.type_name(),
        location: trail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDef, FieldKind};
    use crate::types::{Module, TypeSpec, builtins};
    use crate::value::Opaque;
    use serde_json::json;

    #[test]
    fn test_primitives_pass_through() {
        let encoder = Encoder::new();
        assert_eq!(encoder.encode(&Value::Null).unwrap(), json!(null));
        assert_eq!(encoder.encode(&Value::from(true)).unwrap(), json!(true));
        assert_eq!(encoder.encode(&Value::from(-999999)).unwrap(), json!(-999999));
        assert_eq!(encoder.encode(&Value::from(-3.14)).unwrap(), json!(-3.14));
        assert_eq!(encoder.encode(&Value::from("中文")).unwrap(), json!("中文"));
    }

    #[test]
    fn test_enum_member_tag() {
        let mut module = Module::new("mod");
        let color = module.define(TypeSpec::enumeration("Color", [("RED", 1), ("GREEN", 2)]));
        let encoded = Encoder::new()
            .encode(&Value::from(color.member("RED").unwrap()))
            .unwrap();
        assert_eq!(encoded, json!({"__enum__": "mod.Color.RED"}));
    }

    #[test]
    fn test_class_ref_tag() {
        let encoded = Encoder::new().encode(&Value::from(builtins::list())).unwrap();
        assert_eq!(encoded, json!({"__class_ref__": "builtins.list"}));
    }

    #[test]
    fn test_record_fields_follow_class_tag() {
        let mut module = Module::new("tests.fixtures");
        let person = module.define(TypeSpec::record(
            "Person",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("age", FieldKind::Int),
            ],
        ));
        let alice = person
            .instantiate([("age", Value::from(30)), ("name", Value::from("Alice"))])
            .unwrap();

        let encoded = Encoder::new().encode(&Value::from(alice)).unwrap();
        let keys: Vec<&String> = encoded.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["__class__", "name", "age"]);
        assert_eq!(
            encoded,
            json!({"__class__": "tests.fixtures.Person", "name": "Alice", "age": 30})
        );
    }

    #[test]
    fn test_non_string_keys_use_dict_form() {
        let map: Mapping = [(Value::from(1), Value::from("a"))].into_iter().collect();
        let encoded = Encoder::new().encode(&Value::from(map)).unwrap();
        assert_eq!(encoded, json!({"__dict__": [{"__key__": 1, "value": "a"}]}));
    }

    #[test]
    fn test_reserved_string_key_uses_dict_form() {
        let map: Mapping = [("__class__", "not a tag")].into_iter().collect();
        let encoded = Encoder::new().encode(&Value::from(map)).unwrap();
        assert_eq!(
            encoded,
            json!({"__dict__": [{"__key__": "__class__", "value": "not a tag"}]})
        );
    }

    #[test]
    fn test_opaque_is_unsupported() {
        let value = Value::List(vec![Value::from(1), Value::from(Opaque::new("function", ()))]);
        let err = Encoder::new().encode(&value).unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnsupportedType {
                type_name: "function".to_string(),
                location: "$[1]".to_string(),
            }
        );
    }

    #[test]
    fn test_non_finite_float_is_unsupported() {
        let err = Encoder::new().encode(&Value::from(f64::NAN)).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedType { type_name, .. } if type_name == "float"));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::from(1);
        for _ in 0..10 {
            value = Value::List(vec![value]);
        }
        assert!(Encoder::new().with_max_depth(10).encode(&value).is_ok());
        let err = Encoder::new().with_max_depth(9).encode(&value).unwrap_err();
        assert!(matches!(err, EncodeError::DepthLimitExceeded { max_depth: 9, .. }));
    }
}
