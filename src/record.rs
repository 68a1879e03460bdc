use serde_json::{Map, Value};

/// One decoded input line. Always the object variant when produced by a `Scan`.
pub type Record = Value;

/// String value of a top-level field. Absent, null and non-string values yield `None`.
pub fn str_field<'a>(v: &'a Record, field: &str) -> Option<&'a str> {
    v.get(field).and_then(|x| x.as_str())
}

/// String value of `outer.inner` (e.g. `user.username`).
pub fn nested_str<'a>(v: &'a Record, outer: &str, inner: &str) -> Option<&'a str> {
    v.get(outer)
        .and_then(|o| o.get(inner))
        .and_then(|x| x.as_str())
}

/// Elements of a top-level list field. Absent, null and non-list values yield `None`.
pub fn list_field<'a>(v: &'a Record, field: &str) -> Option<&'a [Value]> {
    v.get(field)
        .and_then(|x| x.as_array())
        .map(|a| a.as_slice())
}

/// Keep only `fields` of a record; everything else is dropped.
pub fn project(v: Record, fields: &[&str]) -> Record {
    match v {
        Value::Object(mut map) => {
            let mut out = Map::new();
            for k in fields {
                if let Some(x) = map.remove(*k) {
                    out.insert((*k).to_string(), x);
                }
            }
            Value::Object(out)
        }
        other => other,
    }
}

/// JSON type name used in diagnostics and profiles.
pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
