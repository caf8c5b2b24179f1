#![allow(dead_code)]

use polyserde::{FieldDef, FieldKind, Module, ModuleRegistry, Polyserde, TypeRef, TypeSpec, Value};

pub struct Pipelines {
    pub registry: ModuleRegistry,
    pub person: TypeRef,
    pub priority: TypeRef,
    pub preprocessor: TypeRef,
    pub tokenizer: TypeRef,
    pub normalizer: TypeRef,
    pub transformer: TypeRef,
    pub pipeline: TypeRef,
    pub converter: TypeRef,
    pub pdf: TypeRef,
    pub docx: TypeRef,
    pub document_pipeline: TypeRef,
}

impl Pipelines {
    pub fn new() -> Self {
        let mut m = Module::new("tests.pipelines");

        let person = m.define(TypeSpec::record(
            "Person",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("age", FieldKind::Int),
            ],
        ));
        let priority = m.define(TypeSpec::enumeration(
            "Priority",
            [("LOW", 1), ("MEDIUM", 2), ("HIGH", 3)],
        ));
        let preprocessor = m.define(TypeSpec::record(
            "Preprocessor",
            [FieldDef::required("name", FieldKind::Str)],
        ));
        let tokenizer = m.define(
            TypeSpec::record(
                "Tokenizer",
                [
                    FieldDef::required("vocab_size", FieldKind::Int),
                    FieldDef::optional("max_length", FieldKind::Int, 512),
                ],
            )
            .extends(&preprocessor),
        );
        let normalizer = m.define(
            TypeSpec::record(
                "Normalizer",
                [
                    FieldDef::optional("mean", FieldKind::Float, 0.0),
                    FieldDef::optional("std", FieldKind::Float, 1.0),
                ],
            )
            .extends(&preprocessor),
        );
        let transformer = m.define(TypeSpec::record(
            "Transformer",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("layers", FieldKind::Int),
                FieldDef::required("attention_heads", FieldKind::Int),
            ],
        ));
        let pipeline = m.define(TypeSpec::record(
            "Pipeline",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required(
                    "preprocessors",
                    FieldKind::list_of(FieldKind::Record(preprocessor.clone())),
                ),
                FieldDef::required("model", FieldKind::Record(transformer.clone())),
                FieldDef::optional("batch_size", FieldKind::Int, 32),
            ],
        ));
        let converter = m.define(TypeSpec::record(
            "Converter",
            [FieldDef::required("name", FieldKind::Str)],
        ));
        let pdf = m.define(
            TypeSpec::record("PDFConverter", [FieldDef::optional("dpi", FieldKind::Int, 300)])
                .extends(&converter),
        );
        let docx = m.define(
            TypeSpec::record(
                "DOCXConverter",
                [FieldDef::optional("preserve_formatting", FieldKind::Bool, true)],
            )
            .extends(&converter),
        );
        let document_pipeline = m.define(TypeSpec::record(
            "DocumentPipeline",
            [
                FieldDef::required("converters", FieldKind::Map),
                FieldDef::required("priority", FieldKind::Enum(priority.clone())),
            ],
        ));

        Self {
            registry: ModuleRegistry::new().with_module(m),
            person,
            priority,
            preprocessor,
            tokenizer,
            normalizer,
            transformer,
            pipeline,
            converter,
            pdf,
            docx,
            document_pipeline,
        }
    }

    pub fn serde(&self) -> Polyserde {
        Polyserde::new(self.registry.clone())
    }

    pub fn person(&self, name: &str, age: i64) -> Value {
        self.person
            .instantiate([("name", Value::from(name)), ("age", Value::from(age))])
            .unwrap()
            .into()
    }

    pub fn text_classifier(&self) -> Value {
        let tokenizer = self
            .tokenizer
            .instantiate([
                ("name", Value::from("bert_tokenizer")),
                ("vocab_size", Value::from(30000)),
            ])
            .unwrap();
        let normalizer = self
            .normalizer
            .instantiate([("name", Value::from("feature_norm"))])
            .unwrap();
        let model = self
            .transformer
            .instantiate([
                ("name", Value::from("bert_base")),
                ("layers", Value::from(12)),
                ("attention_heads", Value::from(12)),
            ])
            .unwrap();
        self.pipeline
            .instantiate([
                ("name", Value::from("text_classifier")),
                (
                    "preprocessors",
                    Value::List(vec![tokenizer.into(), normalizer.into()]),
                ),
                ("model", model.into()),
            ])
            .unwrap()
            .into()
    }
}
