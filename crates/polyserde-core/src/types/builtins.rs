//! The `builtins` module: class objects for the primitive value kinds.
//!
//! These are process-wide singletons so a decoded `builtins.dict` reference is
//! identical to [`dict()`].

use super::{Module, TypeRef, TypeSpec};
use std::sync::{Arc, LazyLock};

pub const MODULE: &str = "builtins";

struct Builtins {
    module: Arc<Module>,
    dict: TypeRef,
    list: TypeRef,
    tuple: TypeRef,
    string: TypeRef,
    int: TypeRef,
    float: TypeRef,
    boolean: TypeRef,
    none_type: TypeRef,
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(|| {
    let mut module = Module::new(MODULE);
    let dict = module.define(TypeSpec::builtin("dict"));
    let list = module.define(TypeSpec::builtin("list"));
    let tuple = module.define(TypeSpec::builtin("tuple"));
    let string = module.define(TypeSpec::builtin("str"));
    let int = module.define(TypeSpec::builtin("int"));
    let float = module.define(TypeSpec::builtin("float"));
    let boolean = module.define(TypeSpec::builtin("bool"));
    let none_type = module.define(TypeSpec::builtin("NoneType"));
    Builtins {
        module: Arc::new(module),
        dict,
        list,
        tuple,
        string,
        int,
        float,
        boolean,
        none_type,
    }
});

pub fn module() -> Arc<Module> {
    Arc::clone(&BUILTINS.module)
}

pub fn dict() -> TypeRef {
    BUILTINS.dict.clone()
}

pub fn list() -> TypeRef {
    BUILTINS.list.clone()
}

pub fn tuple() -> TypeRef {
    BUILTINS.tuple.clone()
}

/// `builtins.str`
pub fn string() -> TypeRef {
    BUILTINS.string.clone()
}

pub fn int() -> TypeRef {
    BUILTINS.int.clone()
}

pub fn float() -> TypeRef {
    BUILTINS.float.clone()
}

/// `builtins.bool`
pub fn boolean() -> TypeRef {
    BUILTINS.boolean.clone()
}

pub fn none_type() -> TypeRef {
    BUILTINS.none_type.clone()
}
