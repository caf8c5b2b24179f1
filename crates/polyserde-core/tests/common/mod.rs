#![allow(dead_code)]

use polyserde_core::{FieldDef, FieldKind, Module, ModuleRegistry, TypeRef, TypeSpec, Value};

pub const MODULE: &str = "tests.conftest";

pub struct Fixtures {
    pub registry: ModuleRegistry,
    pub color: TypeRef,
    pub priority: TypeRef,
    pub address: TypeRef,
    pub person: TypeRef,
    pub animal: TypeRef,
    pub cat: TypeRef,
    pub dog: TypeRef,
    pub bird: TypeRef,
    pub zoo: TypeRef,
    pub configuration: TypeRef,
    pub handlers: TypeRef,
    pub container: TypeRef,
    pub factory: TypeRef,
    pub node: TypeRef,
    pub graph_node: TypeRef,
    pub graph: TypeRef,
    pub storage: TypeRef,
}

impl Fixtures {
    pub fn new() -> Self {
        let mut m = Module::new(MODULE);

        let color = m.define(TypeSpec::enumeration(
            "Color",
            [("RED", "red"), ("GREEN", "green"), ("BLUE", "blue")],
        ));
        let priority = m.define(TypeSpec::enumeration(
            "Priority",
            [("LOW", 1), ("MEDIUM", 2), ("HIGH", 3)],
        ));
        let address = m.define(TypeSpec::record(
            "Address",
            [
                FieldDef::required("street", FieldKind::Str),
                FieldDef::required("city", FieldKind::Str),
                FieldDef::required("zipcode", FieldKind::Str),
            ],
        ));
        let person = m.define(TypeSpec::record(
            "Person",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("age", FieldKind::Int),
                FieldDef::optional("email", FieldKind::optional(FieldKind::Str), Value::Null),
            ],
        ));
        let animal = m.define(TypeSpec::record(
            "Animal",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("species", FieldKind::Str),
            ],
        ));
        let cat = m.define(
            TypeSpec::record(
                "Cat",
                [
                    FieldDef::optional("lives_left", FieldKind::Int, 9),
                    FieldDef::optional("favorite_toy", FieldKind::optional(FieldKind::Str), Value::Null),
                ],
            )
            .extends(&animal),
        );
        let dog = m.define(
            TypeSpec::record(
                "Dog",
                [
                    FieldDef::required("breed", FieldKind::Str),
                    FieldDef::optional("is_good_boy", FieldKind::Bool, true),
                ],
            )
            .extends(&animal),
        );
        let bird = m.define(
            TypeSpec::record(
                "Bird",
                [
                    FieldDef::optional("can_fly", FieldKind::Bool, true),
                    FieldDef::optional("wingspan_cm", FieldKind::optional(FieldKind::Float), Value::Null),
                ],
            )
            .extends(&animal),
        );
        let zoo = m.define(TypeSpec::record(
            "Zoo",
            [
                FieldDef::required("location", FieldKind::Str),
                FieldDef::required("animals", FieldKind::list_of(FieldKind::Record(animal.clone()))),
                FieldDef::required("staff", FieldKind::list_of(FieldKind::Record(person.clone()))),
                FieldDef::optional("metadata", FieldKind::Map, polyserde_core::Mapping::new()),
            ],
        ));
        let configuration = m.define(TypeSpec::record(
            "Configuration",
            [
                FieldDef::required("name", FieldKind::Str),
                FieldDef::required("priority", FieldKind::Enum(priority.clone())),
                FieldDef::required("colors", FieldKind::list_of(FieldKind::Enum(color.clone()))),
                FieldDef::required("settings", FieldKind::Map),
                FieldDef::optional("handler_class", FieldKind::Type, polyserde_core::builtins::dict()),
            ],
        ));
        let handlers = m.define(TypeSpec::record(
            "Handlers",
            [
                FieldDef::required("string_handler", FieldKind::Type),
                FieldDef::required("number_handler", FieldKind::Type),
                FieldDef::required("collection_handler", FieldKind::Type),
            ],
        ));
        let container = m.define(TypeSpec::record(
            "Container",
            [FieldDef::required("items", FieldKind::list_of(FieldKind::Any))],
        ));
        let factory = m.define(TypeSpec::record(
            "Factory",
            [FieldDef::required("model_class", FieldKind::Type)],
        ));
        let node = m.define(TypeSpec::record(
            "Node",
            [
                FieldDef::required("value", FieldKind::Int),
                FieldDef::optional("child", FieldKind::Any, Value::Null),
            ],
        ));
        let graph_node = m.define(TypeSpec::record(
            "GraphNode",
            [
                FieldDef::required("id", FieldKind::Int),
                FieldDef::required("value", FieldKind::Str),
                FieldDef::optional("neighbors", FieldKind::list_of(FieldKind::Int), Vec::<Value>::new()),
            ],
        ));
        let graph = m.define(TypeSpec::record(
            "Graph",
            [FieldDef::required("nodes", FieldKind::Map)],
        ));
        let storage = m.define(
            TypeSpec::record(
                "Storage",
                [FieldDef::required("containers", FieldKind::list_of(FieldKind::Any))],
            )
            .nest(TypeSpec::record(
                "Box",
                [
                    FieldDef::required("label", FieldKind::Str),
                    FieldDef::optional("fragile", FieldKind::Bool, false),
                    FieldDef::required("items", FieldKind::list_of(FieldKind::Any)),
                ],
            ))
            .nest(TypeSpec::enumeration("Kind", [("BOOK", "book"), ("DVD", "dvd")])),
        );

        Self {
            registry: ModuleRegistry::new().with_module(m),
            color,
            priority,
            address,
            person,
            animal,
            cat,
            dog,
            bird,
            zoo,
            configuration,
            handlers,
            container,
            factory,
            node,
            graph_node,
            graph,
            storage,
        }
    }

    pub fn person(&self, name: &str, age: i64) -> Value {
        self.person
            .instantiate([("name", Value::from(name)), ("age", Value::from(age))])
            .unwrap()
            .into()
    }

    pub fn cat(&self, name: &str, lives_left: i64) -> Value {
        self.cat
            .instantiate([
                ("name", Value::from(name)),
                ("species", Value::from("Felis catus")),
                ("lives_left", Value::from(lives_left)),
            ])
            .unwrap()
            .into()
    }

    pub fn dog(&self, name: &str, breed: &str) -> Value {
        self.dog
            .instantiate([
                ("name", Value::from(name)),
                ("species", Value::from("Canis familiaris")),
                ("breed", Value::from(breed)),
            ])
            .unwrap()
            .into()
    }

    pub fn bird(&self, name: &str, wingspan_cm: f64) -> Value {
        self.bird
            .instantiate([
                ("name", Value::from(name)),
                ("species", Value::from("Ara macao")),
                ("wingspan_cm", Value::from(wingspan_cm)),
            ])
            .unwrap()
            .into()
    }

    pub fn zoo(&self) -> Value {
        self.zoo
            .instantiate([
                ("location", Value::from("Berlin Zoo")),
                (
                    "animals",
                    Value::List(vec![
                        self.cat("Whiskers", 7),
                        self.dog("Rex", "Labrador"),
                        self.bird("Polly", 90.5),
                    ]),
                ),
                (
                    "staff",
                    Value::List(vec![self.person("Alice", 30), self.person("Bob", 45)]),
                ),
            ])
            .unwrap()
            .into()
    }

    pub fn member(&self, ty: &TypeRef, name: &str) -> Value {
        ty.member(name).unwrap().into()
    }
}
