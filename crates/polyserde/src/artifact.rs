//! Persisted artifacts.
//!
//! An artifact wraps an encoded tree with the name and version of the library
//! whose types it contains:
//!
//! ```json
//! {"__lib__": "zoolib", "__version__": "1.2.3", "data": {"__class__": "zoo.Zoo", ...}}
//! ```
//!
//! Loading decodes `data` and then runs the version guard once, when both
//! metadata keys are present.

use crate::config::PolyserdeConfig;
use crate::error::{Error, Result};
use crate::packages::{PackageLookup, PackageMetadata};
use crate::version::{VersionGuard, VersionWarning};
use polyserde_core::codec::CLASS_TAG;
use polyserde_core::{
    DEFAULT_MAX_DEPTH, DecodeError, Decoder, Encoder, ModuleSystem, RecordModel, SchemaModel, Value,
};
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::debug;

pub const LIB_KEY: &str = "__lib__";
pub const VERSION_KEY: &str = "__version__";
pub const DATA_KEY: &str = "data";

/// A reconstructed value together with the metadata it was stored with.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub value: Value,
    pub lib: Option<String>,
    pub version: Option<String>,
    /// Set when the recorded version may not match the installed library.
    pub warning: Option<VersionWarning>,
}

impl Loaded {
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Writes and reads versioned artifacts.
#[derive(Clone)]
pub struct Polyserde {
    modules: Arc<dyn ModuleSystem>,
    model: Arc<dyn RecordModel>,
    guard: VersionGuard,
    max_depth: usize,
    pretty: bool,
}

impl Polyserde {
    /// Resolve types in `modules`. No library is reported as installed until
    /// [`Polyserde::with_packages`] or [`Polyserde::with_config`] supplies
    /// versions, so every version check is skipped until then.
    pub fn new(modules: impl ModuleSystem + 'static) -> Self {
        Self {
            modules: Arc::new(modules),
            model: Arc::new(SchemaModel),
            guard: VersionGuard::new(PackageLookup::new()),
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }

    pub fn with_model(mut self, model: impl RecordModel + 'static) -> Self {
        self.model = Arc::new(model);
        self
    }

    pub fn with_packages(mut self, packages: impl PackageMetadata + 'static) -> Self {
        self.guard = VersionGuard::new(packages);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Apply codec settings and put the configured package versions in front
    /// of the current package lookup.
    pub fn with_config(mut self, config: &PolyserdeConfig) -> Self {
        self.max_depth = config.codec.max_depth;
        self.pretty = config.codec.pretty;
        if !config.packages.is_empty() {
            let lookup = PackageLookup::new()
                .then(config.installed_packages())
                .then_shared(Arc::clone(self.guard.packages()));
            self.guard = VersionGuard::new(lookup);
        }
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Encode `value` into an artifact tree. Metadata keys are written only
    /// when given.
    pub fn dump(&self, value: &Value, lib: Option<&str>, version: Option<&str>) -> Result<Json> {
        debug!("Dumping {} (lib {:?}, version {:?})", value.type_name(), lib, version);
        let data = Encoder::with_model(Arc::clone(&self.model))
            .with_max_depth(self.max_depth)
            .encode(value)?;

        let mut envelope = Map::with_capacity(3);
        if let Some(lib) = lib {
            envelope.insert(LIB_KEY.to_string(), Json::String(lib.to_string()));
        }
        if let Some(version) = version {
            envelope.insert(VERSION_KEY.to_string(), Json::String(version.to_string()));
        }
        envelope.insert(DATA_KEY.to_string(), data);
        Ok(Json::Object(envelope))
    }

    /// JSON text of the artifact, indented when configured to be pretty.
    pub fn dump_to_string(&self, value: &Value, lib: Option<&str>, version: Option<&str>) -> Result<String> {
        let artifact = self.dump(value, lib, version)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&artifact)?
        } else {
            serde_json::to_string(&artifact)?
        };
        Ok(text)
    }

    pub fn dump_to_writer<W: Write>(
        &self,
        writer: W,
        value: &Value,
        lib: Option<&str>,
        version: Option<&str>,
    ) -> Result<()> {
        let artifact = self.dump(value, lib, version)?;
        if self.pretty {
            serde_json::to_writer_pretty(writer, &artifact)?;
        } else {
            serde_json::to_writer(writer, &artifact)?;
        }
        Ok(())
    }

    /// Reconstruct the value in `artifact` and check its recorded version.
    ///
    /// Three shapes are accepted: the envelope written by [`Polyserde::dump`];
    /// a record tree carrying `__lib__`/`__version__` beside `__class__`; any
    /// other tree, which is decoded as-is with no version check.
    ///
    /// An object that has a `data` key and no keys besides `data`, `__lib__`
    /// and `__version__` is always read as an envelope. A bare tree such as
    /// `{"data": 5}` therefore loads as `5`; trees written by `dump` are not
    /// affected since the payload sits one level down.
    pub fn load(&self, artifact: &Json) -> Result<Loaded> {
        let (data, lib, version) = split_artifact(artifact)?;
        let value = Decoder::new(Arc::clone(&self.modules))
            .with_model(Arc::clone(&self.model))
            .with_max_depth(self.max_depth)
            .decode(&data)?;

        let warning = match (&lib, &version) {
            (Some(lib), Some(version)) => self.guard.check(lib, version),
            _ => None,
        };
        debug!("Loaded {} (lib {:?}, version {:?})", value.type_name(), lib, version);

        Ok(Loaded {
            value,
            lib,
            version,
            warning,
        })
    }

    /// Parse and load JSON text.
    ///
    /// Nesting is bounded by the codec depth limit rather than by the JSON
    /// parser's own limit, so anything `dump_to_string` wrote reads back.
    pub fn load_str(&self, text: &str) -> Result<Loaded> {
        check_nesting(text, self.max_depth)?;
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let artifact = Json::deserialize(&mut deserializer)?;
        deserializer.end()?;
        self.load(&artifact)
    }

    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<Loaded> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(serde_json::Error::io)?;
        self.load_str(&text)
    }
}

impl fmt::Debug for Polyserde {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polyserde")
            .field("max_depth", &self.max_depth)
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}

/// JSON levels one codec level may take: a `__dict__` value sits inside the
/// tag object, the entry list and the entry object.
const JSON_LEVELS_PER_DEPTH: usize = 3;

/// Reject text nested deeper than any tree the codec accepts at `max_depth`,
/// before the parser recurses into it.
fn check_nesting(text: &str, max_depth: usize) -> Result<()> {
    let limit = max_depth.saturating_mul(JSON_LEVELS_PER_DEPTH).saturating_add(2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return Err(DecodeError::DepthLimitExceeded {
                        max_depth,
                        location: "$".to_string(),
                    }
                    .into());
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Separate the payload from the metadata keys.
fn split_artifact(artifact: &Json) -> Result<(Json, Option<String>, Option<String>)> {
    let Some(object) = artifact.as_object() else {
        return Ok((artifact.clone(), None, None));
    };

    let is_envelope = object.contains_key(DATA_KEY)
        && object
            .keys()
            .all(|key| key == DATA_KEY || key == LIB_KEY || key == VERSION_KEY);
    let has_inline_metadata =
        object.contains_key(CLASS_TAG) && (object.contains_key(LIB_KEY) || object.contains_key(VERSION_KEY));

    if is_envelope {
        let data = object.get(DATA_KEY).cloned().unwrap_or(Json::Null);
        Ok((data, metadata(object, LIB_KEY)?, metadata(object, VERSION_KEY)?))
    } else if has_inline_metadata {
        let lib = metadata(object, LIB_KEY)?;
        let version = metadata(object, VERSION_KEY)?;
        let mut data = object.clone();
        data.shift_remove(LIB_KEY);
        data.shift_remove(VERSION_KEY);
        Ok((Json::Object(data), lib, version))
    } else {
        Ok((artifact.clone(), None, None))
    }
}

fn metadata(object: &Map<String, Json>, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::InvalidArtifact(format!(
            "'{}' must be a string, found {}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::InstalledPackages;
    use polyserde_core::{FieldDef, FieldKind, Mapping, Module, ModuleRegistry, TypeRef, TypeSpec};
    use rstest::rstest;
    use serde_json::json;

    fn setup() -> (ModuleRegistry, TypeRef) {
        let mut module = Module::new("tests.conftest");
        let person = module.define(TypeSpec::record(
            "Person",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("age", FieldKind::Int),
            ],
        ));
        (ModuleRegistry::new().with_module(module), person)
    }

    fn alice(person: &TypeRef) -> Value {
        person
            .instantiate([("name", Value::from("Alice")), ("age", Value::from(30))])
            .unwrap()
            .into()
    }

    #[test]
    fn test_dump_writes_only_given_metadata() {
        let (registry, person) = setup();
        let serde = Polyserde::new(registry);

        let artifact = serde.dump(&alice(&person), None, None).unwrap();
        assert_eq!(artifact.as_object().unwrap().len(), 1);

        let artifact = serde.dump(&alice(&person), Some("mylib"), None).unwrap();
        assert_eq!(artifact[LIB_KEY], "mylib");
        assert!(artifact.get(VERSION_KEY).is_none());

        let artifact = serde.dump(&alice(&person), None, Some("1.2.3")).unwrap();
        assert_eq!(artifact[VERSION_KEY], "1.2.3");
        assert!(artifact.get(LIB_KEY).is_none());
    }

    #[test]
    fn test_split_envelope() {
        let artifact = json!({"__lib__": "a", "__version__": "1.0", "data": [1, 2]});
        let (data, lib, version) = split_artifact(&artifact).unwrap();
        assert_eq!(data, json!([1, 2]));
        assert_eq!(lib.as_deref(), Some("a"));
        assert_eq!(version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_split_inline_record_metadata() {
        let artifact = json!({"__class__": "m.P", "__lib__": "a", "__version__": "1.0", "name": "x"});
        let (data, lib, _) = split_artifact(&artifact).unwrap();
        assert_eq!(data, json!({"__class__": "m.P", "name": "x"}));
        assert_eq!(lib.as_deref(), Some("a"));
        assert!(artifact.get(LIB_KEY).is_some());
    }

    #[test]
    fn test_plain_map_with_data_and_other_keys_is_bare() {
        let artifact = json!({"data": 1, "other": 2});
        let (data, lib, version) = split_artifact(&artifact).unwrap();
        assert_eq!(data, artifact);
        assert_eq!((lib, version), (None, None));
    }

    #[test]
    fn test_data_only_object_reads_as_envelope() {
        let (data, lib, version) = split_artifact(&json!({"data": 5})).unwrap();
        assert_eq!(data, json!(5));
        assert_eq!((lib, version), (None, None));
    }

    #[test]
    fn test_map_shaped_like_envelope_survives_dump() {
        let (registry, _) = setup();
        let serde = Polyserde::new(registry);
        let map: Value = Mapping::from_iter([("data", 5)]).into();

        let artifact = serde.dump(&map, None, None).unwrap();
        assert_eq!(artifact, json!({"data": {"data": 5}}));
        assert_eq!(serde.load(&artifact).unwrap().value, map);
    }

    #[rstest]
    #[case(r#"{"data": [[1]]}"#, 1, true)]
    #[case(r#"{"data": [[[[[[1]]]]]]}"#, 1, false)]
    #[case(r#"{"data": "[[[[[[[[[["}"#, 1, true)]
    #[case(r#"{"data": "\\\"[[[[[[[["}"#, 1, true)]
    fn test_check_nesting(#[case] text: &str, #[case] max_depth: usize, #[case] ok: bool) {
        assert_eq!(check_nesting(text, max_depth).is_ok(), ok);
    }

    #[test]
    fn test_non_string_metadata_is_rejected() {
        let err = split_artifact(&json!({"__lib__": 5, "data": null})).unwrap_err();
        assert!(matches!(err, Error::InvalidArtifact(_)));
    }

    #[test]
    fn test_config_packages_take_precedence() {
        let (registry, person) = setup();
        let config = PolyserdeConfig {
            packages: [("testlib".to_string(), "1.2.9".to_string())].into_iter().collect(),
            ..Default::default()
        };
        let serde = Polyserde::new(registry)
            .with_packages(InstalledPackages::new().with("testlib", "2.0.0"))
            .with_config(&config);

        let artifact = serde.dump(&alice(&person), Some("testlib"), Some("1.2.3")).unwrap();
        assert_eq!(serde.load(&artifact).unwrap().warning, None);
    }

    #[test]
    fn test_pretty_output() {
        let (registry, person) = setup();
        let text = Polyserde::new(registry)
            .with_pretty(true)
            .dump_to_string(&alice(&person), None, None)
            .unwrap();
        assert!(text.contains("\n  \"data\""));
    }
}
