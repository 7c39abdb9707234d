//! A small slice of the JDK, enough for the evaluator's own tests and for embedders
//! without a real class path.

use crate::{ClassDef, FieldDef, MethodDef, PrimitiveType, Type, TypeParamDef, TypeStore};

fn class(name: &str) -> Type {
    Type::class(name, Vec::new())
}

fn generic(name: &str, args: Vec<Type>) -> Type {
    Type::class(name, args)
}

fn var(name: &str) -> Type {
    Type::type_var(name)
}

fn prim(p: PrimitiveType) -> Type {
    Type::Primitive(p)
}

const BOOLEAN: PrimitiveType = PrimitiveType::Boolean;
const BYTE: PrimitiveType = PrimitiveType::Byte;
const SHORT: PrimitiveType = PrimitiveType::Short;
const CHAR: PrimitiveType = PrimitiveType::Char;
const INT: PrimitiveType = PrimitiveType::Int;
const LONG: PrimitiveType = PrimitiveType::Long;
const FLOAT: PrimitiveType = PrimitiveType::Float;
const DOUBLE: PrimitiveType = PrimitiveType::Double;

fn string() -> Type {
    Type::string()
}

fn object() -> Type {
    Type::object()
}

fn m(name: &str, params: Vec<Type>, ret: Type) -> MethodDef {
    MethodDef::new(name, params, ret)
}

fn sm(name: &str, params: Vec<Type>, ret: Type) -> MethodDef {
    MethodDef::new_static(name, params, ret)
}

impl TypeStore {
    /// A store pre-populated with commonly used `java.lang`, `java.io`, `java.util` and
    /// `java.awt` classes.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::new();
        for def in java_lang()
            .into_iter()
            .chain(java_io())
            .chain(java_util())
            .chain(java_awt())
        {
            store.add_class(def);
        }
        store
    }
}

fn java_lang() -> Vec<ClassDef> {
    let mut out = vec![
        ClassDef::class("java.lang.Object")
            .constructor(vec![])
            .method(m("toString", vec![], string()))
            .method(m("hashCode", vec![], prim(INT)))
            .method(m("equals", vec![object()], prim(BOOLEAN)))
            .method(m(
                "getClass",
                vec![],
                generic("java.lang.Class", vec![Type::unbounded()]),
            ))
            .method(m("notify", vec![], Type::Void))
            .method(m("wait", vec![], Type::Void)),
        ClassDef::interface("java.lang.Cloneable"),
        ClassDef::interface("java.lang.Runnable").method(m("run", vec![], Type::Void)),
        ClassDef::interface("java.lang.Comparable")
            .type_params(vec![TypeParamDef::new("T")])
            .method(m("compareTo", vec![var("T")], prim(INT))),
        ClassDef::interface("java.lang.CharSequence")
            .method(m("length", vec![], prim(INT)))
            .method(m("charAt", vec![prim(INT)], prim(CHAR))),
        ClassDef::interface("java.lang.Iterable")
            .type_params(vec![TypeParamDef::new("T")])
            .method(m(
                "iterator",
                vec![],
                generic("java.util.Iterator", vec![var("T")]),
            )),
        ClassDef::class("java.lang.String")
            .implements(class("java.io.Serializable"))
            .implements(generic("java.lang.Comparable", vec![string()]))
            .implements(class("java.lang.CharSequence"))
            .constructor(vec![])
            .constructor(vec![string()])
            .constructor(vec![Type::array(prim(CHAR))])
            .method(m("length", vec![], prim(INT)))
            .method(m("charAt", vec![prim(INT)], prim(CHAR)))
            .method(m("isEmpty", vec![], prim(BOOLEAN)))
            .method(m("substring", vec![prim(INT)], string()))
            .method(m("substring", vec![prim(INT), prim(INT)], string()))
            .method(m("indexOf", vec![prim(INT)], prim(INT)))
            .method(m("indexOf", vec![string()], prim(INT)))
            .method(m("compareTo", vec![string()], prim(INT)))
            .method(m("concat", vec![string()], string()))
            .method(m(
                "contains",
                vec![class("java.lang.CharSequence")],
                prim(BOOLEAN),
            ))
            .method(m("toUpperCase", vec![], string()))
            .method(m("toLowerCase", vec![], string()))
            .method(m("trim", vec![], string()))
            .method(m("split", vec![string()], Type::array(string())))
            .method(m("toCharArray", vec![], Type::array(prim(CHAR))))
            .method(sm("valueOf", vec![object()], string()))
            .method(sm("valueOf", vec![prim(BOOLEAN)], string()))
            .method(sm("valueOf", vec![prim(CHAR)], string()))
            .method(sm("valueOf", vec![prim(INT)], string()))
            .method(sm("valueOf", vec![prim(LONG)], string()))
            .method(sm("valueOf", vec![prim(DOUBLE)], string())),
        ClassDef::class("java.lang.StringBuilder")
            .implements(class("java.io.Serializable"))
            .implements(class("java.lang.CharSequence"))
            .constructor(vec![])
            .constructor(vec![string()])
            .method(m("append", vec![string()], class("java.lang.StringBuilder")))
            .method(m("append", vec![object()], class("java.lang.StringBuilder")))
            .method(m("append", vec![prim(BOOLEAN)], class("java.lang.StringBuilder")))
            .method(m("append", vec![prim(CHAR)], class("java.lang.StringBuilder")))
            .method(m("append", vec![prim(INT)], class("java.lang.StringBuilder")))
            .method(m("append", vec![prim(LONG)], class("java.lang.StringBuilder")))
            .method(m("append", vec![prim(DOUBLE)], class("java.lang.StringBuilder")))
            .method(m(
                "insert",
                vec![prim(INT), string()],
                class("java.lang.StringBuilder"),
            ))
            .method(m("reverse", vec![], class("java.lang.StringBuilder")))
            .method(m("length", vec![], prim(INT)))
            .method(m("charAt", vec![prim(INT)], prim(CHAR))),
        ClassDef::class("java.lang.Number")
            .implements(class("java.io.Serializable"))
            .method(m("byteValue", vec![], prim(BYTE)))
            .method(m("shortValue", vec![], prim(SHORT)))
            .method(m("intValue", vec![], prim(INT)))
            .method(m("longValue", vec![], prim(LONG)))
            .method(m("floatValue", vec![], prim(FLOAT)))
            .method(m("doubleValue", vec![], prim(DOUBLE))),
        ClassDef::class("java.lang.Boolean")
            .implements(class("java.io.Serializable"))
            .implements(generic("java.lang.Comparable", vec![class("java.lang.Boolean")]))
            .constructor(vec![prim(BOOLEAN)])
            .field(FieldDef::constant("TRUE", class("java.lang.Boolean")))
            .field(FieldDef::constant("FALSE", class("java.lang.Boolean")))
            .method(m("booleanValue", vec![], prim(BOOLEAN)))
            .method(sm("valueOf", vec![prim(BOOLEAN)], class("java.lang.Boolean")))
            .method(sm("parseBoolean", vec![string()], prim(BOOLEAN))),
        ClassDef::class("java.lang.Character")
            .implements(class("java.io.Serializable"))
            .implements(generic(
                "java.lang.Comparable",
                vec![class("java.lang.Character")],
            ))
            .constructor(vec![prim(CHAR)])
            .field(FieldDef::constant("MAX_VALUE", prim(CHAR)))
            .field(FieldDef::constant("MIN_VALUE", prim(CHAR)))
            .method(m("charValue", vec![], prim(CHAR)))
            .method(sm("valueOf", vec![prim(CHAR)], class("java.lang.Character")))
            .method(sm("isDigit", vec![prim(CHAR)], prim(BOOLEAN)))
            .method(sm("isLetter", vec![prim(CHAR)], prim(BOOLEAN)))
            .method(sm("toUpperCase", vec![prim(CHAR)], prim(CHAR))),
        ClassDef::class("java.lang.Void"),
        ClassDef::class("java.lang.Math")
            .field(FieldDef::constant("PI", prim(DOUBLE)))
            .field(FieldDef::constant("E", prim(DOUBLE)))
            .method(sm("abs", vec![prim(INT)], prim(INT)))
            .method(sm("abs", vec![prim(LONG)], prim(LONG)))
            .method(sm("abs", vec![prim(FLOAT)], prim(FLOAT)))
            .method(sm("abs", vec![prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("max", vec![prim(INT), prim(INT)], prim(INT)))
            .method(sm("max", vec![prim(LONG), prim(LONG)], prim(LONG)))
            .method(sm("max", vec![prim(FLOAT), prim(FLOAT)], prim(FLOAT)))
            .method(sm("max", vec![prim(DOUBLE), prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("min", vec![prim(INT), prim(INT)], prim(INT)))
            .method(sm("min", vec![prim(LONG), prim(LONG)], prim(LONG)))
            .method(sm("min", vec![prim(DOUBLE), prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("sqrt", vec![prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("pow", vec![prim(DOUBLE), prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("floor", vec![prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("ceil", vec![prim(DOUBLE)], prim(DOUBLE)))
            .method(sm("round", vec![prim(FLOAT)], prim(INT)))
            .method(sm("round", vec![prim(DOUBLE)], prim(LONG)))
            .method(sm("random", vec![], prim(DOUBLE))),
        ClassDef::class("java.lang.System")
            .field(FieldDef::constant("out", class("java.io.PrintStream")))
            .field(FieldDef::constant("err", class("java.io.PrintStream")))
            .method(sm("currentTimeMillis", vec![], prim(LONG)))
            .method(sm("nanoTime", vec![], prim(LONG)))
            .method(sm("getProperty", vec![string()], string()))
            .method(sm("identityHashCode", vec![object()], prim(INT)))
            .method(sm("exit", vec![prim(INT)], Type::Void))
            .method(sm(
                "arraycopy",
                vec![object(), prim(INT), object(), prim(INT), prim(INT)],
                Type::Void,
            )),
        ClassDef::class("java.lang.Class")
            .type_params(vec![TypeParamDef::new("T")])
            .implements(class("java.io.Serializable"))
            .method(m("getName", vec![], string()))
            .method(m("getSimpleName", vec![], string()))
            .method(m("isArray", vec![], prim(BOOLEAN)))
            .method(m("isInstance", vec![object()], prim(BOOLEAN)))
            .method(m("cast", vec![object()], var("T")))
            .method(m("newInstance", vec![], var("T")))
            .method(m(
                "getSuperclass",
                vec![],
                generic("java.lang.Class", vec![Type::super_of(var("T"))]),
            ))
            .method(sm(
                "forName",
                vec![string()],
                generic("java.lang.Class", vec![Type::unbounded()]),
            )),
        ClassDef::class("java.lang.Enum")
            .type_params(vec![TypeParamDef::bounded(
                "E",
                vec![generic("java.lang.Enum", vec![var("E")])],
            )])
            .implements(generic("java.lang.Comparable", vec![var("E")]))
            .implements(class("java.io.Serializable"))
            .method(m("name", vec![], string()))
            .method(m("ordinal", vec![], prim(INT)))
            .method(m("compareTo", vec![var("E")], prim(INT))),
        ClassDef::class("java.lang.Thread")
            .implements(class("java.lang.Runnable"))
            .constructor(vec![])
            .constructor(vec![class("java.lang.Runnable")])
            .method(m("start", vec![], Type::Void))
            .method(m("run", vec![], Type::Void))
            .method(m("join", vec![], Type::Void))
            .method(m("getName", vec![], string()))
            .method(m("getState", vec![], class("java.lang.Thread$State")))
            .method(sm("sleep", vec![prim(LONG)], Type::Void))
            .method(sm("currentThread", vec![], class("java.lang.Thread"))),
        ClassDef::enumeration("java.lang.Thread$State")
            .nested_static()
            .field(FieldDef::constant("NEW", class("java.lang.Thread$State")))
            .field(FieldDef::constant("RUNNABLE", class("java.lang.Thread$State")))
            .field(FieldDef::constant("TERMINATED", class("java.lang.Thread$State"))),
    ];

    out.extend(boxed_numbers());
    out
}

fn boxed_numbers() -> Vec<ClassDef> {
    [BYTE, SHORT, INT, LONG, FLOAT, DOUBLE]
        .into_iter()
        .map(|p| {
            let boxed = class(p.box_class());
            let mut def = ClassDef::class(p.box_class())
                .extends(class("java.lang.Number"))
                .implements(generic("java.lang.Comparable", vec![boxed.clone()]))
                .constructor(vec![prim(p)])
                .constructor(vec![string()])
                .field(FieldDef::constant("MAX_VALUE", prim(p)))
                .field(FieldDef::constant("MIN_VALUE", prim(p)))
                .method(m("compareTo", vec![boxed.clone()], prim(INT)))
                .method(sm("valueOf", vec![prim(p)], boxed.clone()))
                .method(sm("valueOf", vec![string()], boxed.clone()))
                .method(sm("toString", vec![prim(p)], string()));
            if p == INT {
                def = def
                    .method(sm("parseInt", vec![string()], prim(INT)))
                    .method(sm("max", vec![prim(INT), prim(INT)], prim(INT)))
                    .method(sm("toHexString", vec![prim(INT)], string()));
            }
            if p == DOUBLE {
                def = def
                    .method(sm("parseDouble", vec![string()], prim(DOUBLE)))
                    .method(sm("isNaN", vec![prim(DOUBLE)], prim(BOOLEAN)));
            }
            def
        })
        .collect()
}

fn java_io() -> Vec<ClassDef> {
    let mut print_stream = ClassDef::class("java.io.PrintStream")
        .method(m("println", vec![], Type::Void))
        .method(m("flush", vec![], Type::Void));
    let printable = [
        prim(BOOLEAN),
        prim(CHAR),
        prim(INT),
        prim(LONG),
        prim(FLOAT),
        prim(DOUBLE),
        Type::array(prim(CHAR)),
        string(),
        object(),
    ];
    for ty in printable {
        print_stream = print_stream
            .method(m("println", vec![ty.clone()], Type::Void))
            .method(m("print", vec![ty], Type::Void));
    }

    vec![ClassDef::interface("java.io.Serializable"), print_stream]
}

fn java_util() -> Vec<ClassDef> {
    let e = || var("E");
    let e_param = || vec![TypeParamDef::new("E")];
    let coll_of = |name: &str| generic(name, vec![var("E")]);
    let k = || var("K");
    let v = || var("V");
    let kv_params = || vec![TypeParamDef::new("K"), TypeParamDef::new("V")];
    let kv_of = |name: &str| generic(name, vec![var("K"), var("V")]);

    vec![
        ClassDef::interface("java.util.Iterator")
            .type_params(e_param())
            .method(m("hasNext", vec![], prim(BOOLEAN)))
            .method(m("next", vec![], e()))
            .method(m("remove", vec![], Type::Void)),
        ClassDef::interface("java.util.Collection")
            .type_params(e_param())
            .implements(coll_of("java.lang.Iterable"))
            .method(m("size", vec![], prim(INT)))
            .method(m("isEmpty", vec![], prim(BOOLEAN)))
            .method(m("contains", vec![object()], prim(BOOLEAN)))
            .method(m("add", vec![e()], prim(BOOLEAN)))
            .method(m("remove", vec![object()], prim(BOOLEAN)))
            .method(m(
                "addAll",
                vec![generic("java.util.Collection", vec![Type::extends(e())])],
                prim(BOOLEAN),
            ))
            .method(m("clear", vec![], Type::Void))
            .method(m("iterator", vec![], coll_of("java.util.Iterator")))
            .method(m("toArray", vec![], Type::array(object()))),
        ClassDef::interface("java.util.List")
            .type_params(e_param())
            .implements(coll_of("java.util.Collection"))
            .method(m("get", vec![prim(INT)], e()))
            .method(m("set", vec![prim(INT), e()], e()))
            .method(m("add", vec![prim(INT), e()], Type::Void))
            .method(m("remove", vec![prim(INT)], e()))
            .method(m("indexOf", vec![object()], prim(INT)))
            .method(m(
                "subList",
                vec![prim(INT), prim(INT)],
                coll_of("java.util.List"),
            )),
        ClassDef::interface("java.util.Set")
            .type_params(e_param())
            .implements(coll_of("java.util.Collection")),
        ClassDef::interface("java.util.Queue")
            .type_params(e_param())
            .implements(coll_of("java.util.Collection"))
            .method(m("offer", vec![e()], prim(BOOLEAN)))
            .method(m("poll", vec![], e()))
            .method(m("peek", vec![], e())),
        ClassDef::interface("java.util.Deque")
            .type_params(e_param())
            .implements(coll_of("java.util.Queue"))
            .method(m("addFirst", vec![e()], Type::Void))
            .method(m("addLast", vec![e()], Type::Void))
            .method(m("peekFirst", vec![], e()))
            .method(m("pollLast", vec![], e()))
            .method(m("push", vec![e()], Type::Void))
            .method(m("pop", vec![], e())),
        ClassDef::interface("java.util.RandomAccess"),
        ClassDef::class("java.util.AbstractCollection")
            .type_params(e_param())
            .implements(coll_of("java.util.Collection")),
        ClassDef::class("java.util.AbstractList")
            .type_params(e_param())
            .extends(coll_of("java.util.AbstractCollection"))
            .implements(coll_of("java.util.List")),
        ClassDef::class("java.util.AbstractSequentialList")
            .type_params(e_param())
            .extends(coll_of("java.util.AbstractList")),
        ClassDef::class("java.util.AbstractSet")
            .type_params(e_param())
            .extends(coll_of("java.util.AbstractCollection"))
            .implements(coll_of("java.util.Set")),
        ClassDef::class("java.util.ArrayList")
            .type_params(e_param())
            .extends(coll_of("java.util.AbstractList"))
            .implements(coll_of("java.util.List"))
            .implements(class("java.util.RandomAccess"))
            .implements(class("java.lang.Cloneable"))
            .implements(class("java.io.Serializable"))
            .constructor(vec![])
            .constructor(vec![prim(INT)])
            .constructor(vec![generic(
                "java.util.Collection",
                vec![Type::extends(e())],
            )])
            .method(m("ensureCapacity", vec![prim(INT)], Type::Void))
            .method(m("trimToSize", vec![], Type::Void)),
        ClassDef::class("java.util.LinkedList")
            .type_params(e_param())
            .extends(coll_of("java.util.AbstractSequentialList"))
            .implements(coll_of("java.util.List"))
            .implements(coll_of("java.util.Deque"))
            .implements(class("java.lang.Cloneable"))
            .implements(class("java.io.Serializable"))
            .constructor(vec![])
            .constructor(vec![generic(
                "java.util.Collection",
                vec![Type::extends(e())],
            )])
            .method(m("getFirst", vec![], e()))
            .method(m("getLast", vec![], e())),
        ClassDef::class("java.util.HashSet")
            .type_params(e_param())
            .extends(coll_of("java.util.AbstractSet"))
            .implements(coll_of("java.util.Set"))
            .implements(class("java.lang.Cloneable"))
            .implements(class("java.io.Serializable"))
            .constructor(vec![]),
        ClassDef::interface("java.util.Map")
            .type_params(kv_params())
            .method(m("get", vec![object()], v()))
            .method(m("put", vec![k(), v()], v()))
            .method(m("remove", vec![object()], v()))
            .method(m("containsKey", vec![object()], prim(BOOLEAN)))
            .method(m("size", vec![], prim(INT)))
            .method(m("isEmpty", vec![], prim(BOOLEAN)))
            .method(m("keySet", vec![], generic("java.util.Set", vec![k()])))
            .method(m(
                "values",
                vec![],
                generic("java.util.Collection", vec![v()]),
            ))
            .method(m(
                "entrySet",
                vec![],
                generic("java.util.Set", vec![kv_of("java.util.Map$Entry")]),
            )),
        ClassDef::interface("java.util.Map$Entry")
            .type_params(kv_params())
            .nested_static()
            .method(m("getKey", vec![], k()))
            .method(m("getValue", vec![], v()))
            .method(m("setValue", vec![v()], v())),
        ClassDef::class("java.util.AbstractMap")
            .type_params(kv_params())
            .implements(kv_of("java.util.Map")),
        ClassDef::class("java.util.HashMap")
            .type_params(kv_params())
            .extends(kv_of("java.util.AbstractMap"))
            .implements(kv_of("java.util.Map"))
            .implements(class("java.lang.Cloneable"))
            .implements(class("java.io.Serializable"))
            .constructor(vec![])
            .constructor(vec![prim(INT)]),
        ClassDef::class("java.util.Random")
            .implements(class("java.io.Serializable"))
            .constructor(vec![])
            .constructor(vec![prim(LONG)])
            .method(m("nextInt", vec![], prim(INT)))
            .method(m("nextInt", vec![prim(INT)], prim(INT)))
            .method(m("nextDouble", vec![], prim(DOUBLE)))
            .method(m("nextBoolean", vec![], prim(BOOLEAN))),
        ClassDef::class("java.util.Collections")
            .field(FieldDef::constant("EMPTY_LIST", class("java.util.List")))
            .method(
                sm("emptyList", vec![], generic("java.util.List", vec![var("T")]))
                    .with_type_params(vec![TypeParamDef::new("T")]),
            )
            .method(
                sm(
                    "reverse",
                    vec![generic("java.util.List", vec![Type::unbounded()])],
                    Type::Void,
                ),
            ),
        ClassDef::enumeration("java.util.concurrent.TimeUnit")
            .field(FieldDef::constant(
                "SECONDS",
                class("java.util.concurrent.TimeUnit"),
            ))
            .field(FieldDef::constant(
                "MILLISECONDS",
                class("java.util.concurrent.TimeUnit"),
            ))
            .method(m("toMillis", vec![prim(LONG)], prim(LONG))),
    ]
}

fn java_awt() -> Vec<ClassDef> {
    let color = || class("java.awt.Color");
    vec![ClassDef::class("java.awt.Color")
        .implements(class("java.io.Serializable"))
        .constructor(vec![prim(INT), prim(INT), prim(INT)])
        .constructor(vec![prim(FLOAT), prim(FLOAT), prim(FLOAT)])
        .field(FieldDef::constant("BLACK", color()))
        .field(FieldDef::constant("WHITE", color()))
        .field(FieldDef::constant("RED", color()))
        .method(m("getRed", vec![], prim(INT)))
        .method(m("brighter", vec![], color()))]
}
