//! In-memory values and their TypeScript literal syntax.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::names::lower_camel;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").unwrap());

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A bare word printed verbatim, e.g. `null` or `undefined`.
    Atom(String),
}

/// A binding value or a decoded result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    /// Labeled fields, in order. Not a map: names may repeat.
    Record(Vec<(String, Value)>),
}

impl Scalar {
    /// Single-line TypeScript literal for this scalar.
    pub fn to_literal(&self) -> String {
        let text = match self {
            Scalar::Str(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}")),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) if f.is_nan() => "NaN".to_string(),
            Scalar::Float(f) if f.is_infinite() => {
                let word = if *f > 0.0 { "Infinity" } else { "-Infinity" };
                word.to_string()
            }
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Atom(a) => a.clone(),
        };
        // The script is parsed statement by statement; a raw newline inside a
        // literal would split it.
        text.replace('\n', "\\n")
    }
}

impl Value {
    pub fn atom(word: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Atom(word.into()))
    }

    /// Resolve array-versus-record rendering for this value.
    ///
    /// A sequence becomes a record only when `as_record` is set and field
    /// names were supplied; its elements are zipped positionally with the
    /// camel-cased names. Elements of a plain sequence are shaped with the
    /// same names, as records whenever names are present.
    pub fn shaped(self, field_names: &[String], as_record: bool) -> Value {
        match self {
            Value::Sequence(items) if as_record && !field_names.is_empty() => Value::Record(
                field_names
                    .iter()
                    .zip(items)
                    .map(|(name, item)| (lower_camel(name), item.shaped(&[], false)))
                    .collect(),
            ),
            Value::Sequence(items) => {
                let nested = !field_names.is_empty();
                Value::Sequence(
                    items
                        .into_iter()
                        .map(|item| item.shaped(field_names, nested))
                        .collect(),
                )
            }
            Value::Record(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(key, item)| (key, item.shaped(&[], false)))
                    .collect(),
            ),
            scalar @ Value::Scalar(_) => scalar,
        }
    }

    /// TypeScript literal for an already shaped value.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Scalar(s) => s.to_literal(),
            Value::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_literal).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Record(fields) if fields.is_empty() => "{}".to_string(),
            Value::Record(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(key, item)| format!("{}: {}", property_key(key), item.to_literal()))
                    .collect();
                format!("{{ {} }}", parts.join(", "))
            }
        }
    }
}

fn property_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        Scalar::Str(key.to_string()).to_literal()
    }
}

/// Render `value` as a literal, deciding record form from `field_names`.
pub fn render(value: &Value, field_names: &[String], as_record: bool) -> String {
    value.clone().shaped(field_names, as_record).to_literal()
}

/// Keyword introducing each injected declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariablePrefix {
    Const,
    #[default]
    Let,
    Var,
}

impl VariablePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariablePrefix::Const => "const",
            VariablePrefix::Let => "let",
            VariablePrefix::Var => "var",
        }
    }
}

impl fmt::Display for VariablePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariablePrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "const" => Ok(VariablePrefix::Const),
            "let" => Ok(VariablePrefix::Let),
            "var" => Ok(VariablePrefix::Var),
            other => Err(format!("expected const, let or var, got `{other}`")),
        }
    }
}

/// A variable injected ahead of the snippet body.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

impl Binding {
    /// Build a binding, fixing its shape from the supplied field names.
    pub fn new(name: impl Into<String>, value: Value, field_names: &[String]) -> Self {
        Self {
            name: name.into(),
            value: value.shaped(field_names, !field_names.is_empty()),
        }
    }

    /// `<prefix> <name> = <literal>;`
    pub fn declaration(&self, prefix: VariablePrefix) -> String {
        format!("{} {} = {};", prefix, self.name, self.value.to_literal())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::atom("null"),
            Json::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Scalar(Scalar::Int(i)),
                None => Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Json::String(s) => Value::Scalar(Scalar::Str(s)),
            Json::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Value::Scalar(Scalar::Str(s)) => Json::String(s.clone()),
            Value::Scalar(Scalar::Int(i)) => Json::from(*i),
            Value::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Scalar(Scalar::Bool(b)) => Json::Bool(*b),
            Value::Scalar(Scalar::Atom(a)) if a == "null" || a == "undefined" => Json::Null,
            Value::Scalar(Scalar::Atom(a)) => Json::String(a.clone()),
            Value::Sequence(items) => Json::Array(items.iter().map(Json::from).collect()),
            Value::Record(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Json::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_flat_sequence() {
        let v = Value::from(vec![1i64, 2, 3]);
        assert_eq!(render(&v, &[], false), "[1, 2, 3]");
    }

    #[test]
    fn test_render_nested_sequence() {
        let v = Value::from(json!([[1, "a"], [2, "b"]]));
        assert_eq!(render(&v, &[], false), r#"[[1, "a"], [2, "b"]]"#);
    }

    #[test]
    fn test_record_from_field_names() {
        let b = Binding::new("x", Value::from(vec![1i64, 2]), &names(&["a", "b"]));
        assert_eq!(b.declaration(VariablePrefix::Let), "let x = { a: 1, b: 2 };");
    }

    #[test]
    fn test_field_names_are_camel_cased() {
        let v = Value::from(json!(["Ada", 36]));
        assert_eq!(
            render(&v, &names(&["first_name", "Age In Years"]), true),
            r#"{ firstName: "Ada", ageInYears: 36 }"#
        );
    }

    #[test]
    fn test_zip_stops_at_shorter_list() {
        let v = Value::from(vec![1i64, 2, 3]);
        assert_eq!(render(&v, &names(&["a", "b"]), true), "{ a: 1, b: 2 }");
        let v = Value::from(vec![1i64]);
        assert_eq!(render(&v, &names(&["a", "b"]), true), "{ a: 1 }");
    }

    #[test]
    fn test_sequence_elements_become_records() {
        let v = Value::from(json!([[1, 2], [3, 4]]));
        assert_eq!(
            render(&v, &names(&["a", "b"]), false),
            "[{ a: 1, b: 2 }, { a: 3, b: 4 }]"
        );
    }

    #[test]
    fn test_no_field_names_never_records() {
        let v = Value::from(vec![1i64, 2]);
        assert_eq!(render(&v, &[], true), "[1, 2]");
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(Scalar::Str("hi \"there\"".into()).to_literal(), r#""hi \"there\"""#);
        assert_eq!(Scalar::Int(-7).to_literal(), "-7");
        assert_eq!(Scalar::Float(1.5).to_literal(), "1.5");
        assert_eq!(Scalar::Float(f64::NAN).to_literal(), "NaN");
        assert_eq!(Scalar::Float(f64::NEG_INFINITY).to_literal(), "-Infinity");
        assert_eq!(Scalar::Bool(true).to_literal(), "true");
        assert_eq!(Scalar::Atom("undefined".into()).to_literal(), "undefined");
    }

    #[test]
    fn test_newlines_stay_on_one_line() {
        let lit = Scalar::Str("a\nb".into()).to_literal();
        assert_eq!(lit, r#""a\nb""#);
        assert!(!lit.contains('\n'));
        assert_eq!(Scalar::Atom("x\ny".into()).to_literal(), "x\\ny");
    }

    #[test]
    fn test_json_object_record() {
        let v = Value::from(json!({"name": "deno", "needs quotes": true, "n": null}));
        assert_eq!(
            v.to_literal(),
            r#"{ name: "deno", "needs quotes": true, n: null }"#
        );
        assert_eq!(Value::Record(vec![]).to_literal(), "{}");
    }

    #[test]
    fn test_prefix_parse() {
        assert_eq!("const".parse::<VariablePrefix>(), Ok(VariablePrefix::Const));
        assert_eq!(" var ".parse::<VariablePrefix>(), Ok(VariablePrefix::Var));
        assert!("val".parse::<VariablePrefix>().is_err());
        assert_eq!(VariablePrefix::default(), VariablePrefix::Let);
    }

    #[test]
    fn test_json_roundtrip_through_value() {
        let json = json!([1, 2.5, "s", true, null, {"k": [1]}]);
        assert_eq!(serde_json::Value::from(&Value::from(json.clone())), json);
    }
}
