//! Minimal XML-RPC codec.
//!
//! Covers what the Gandi API needs: method call encoding, response/fault
//! decoding and typed access to the decoded [`Value`] tree.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

/// `dateTime.iso8601` layout used by Gandi (`20240131T08:15:00`).
pub const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<int>`, `<i4>` or `<i8>`.
    Int(i64),
    /// `<boolean>`.
    Bool(bool),
    /// `<string>` or an untyped `<value>`.
    String(String),
    /// `<double>`.
    Double(f64),
    /// `<dateTime.iso8601>`.
    DateTime(NaiveDateTime),
    /// `<base64>`, kept encoded.
    Base64(String),
    /// `<struct>`.
    Struct(BTreeMap<String, Value>),
    /// `<array>`.
    Array(Vec<Value>),
    /// `<nil/>` extension.
    Nil,
}

impl Value {
    /// Build a struct value from `(name, value)` pairs.
    pub fn structure<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            // Some Gandi methods answer 1/0 where a boolean is documented
            Self::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Struct member lookup; `None` for non-struct values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_struct().and_then(|m| m.get(key))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// A `<fault>` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub code: i64,
    pub message: String,
}

/// A decoded `<methodResponse>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Value),
    Fault(Fault),
}

// ============ Encoding ============

/// Encode a `<methodCall>` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\"?><methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(v) => {
            out.push_str("<int>");
            out.push_str(&v.to_string());
            out.push_str("</int>");
        }
        Value::Bool(v) => {
            out.push_str(if *v {
                "<boolean>1</boolean>"
            } else {
                "<boolean>0</boolean>"
            });
        }
        Value::String(v) => {
            out.push_str("<string>");
            out.push_str(&escape(v.as_str()));
            out.push_str("</string>");
        }
        Value::Double(v) => {
            out.push_str("<double>");
            out.push_str(&v.to_string());
            out.push_str("</double>");
        }
        Value::DateTime(v) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&v.format(DATETIME_FORMAT).to_string());
            out.push_str("</dateTime.iso8601>");
        }
        Value::Base64(v) => {
            out.push_str("<base64>");
            out.push_str(v);
            out.push_str("</base64>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

// ============ Decoding ============

/// Generic element tree, built before interpreting XML-RPC semantics.
#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn parse_tree(xml: &str) -> Result<Node, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(Node::named(name));
            }
            Ok(Event::Empty(e)) => {
                let node = Node::named(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or("unbalanced end tag")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Ok(Event::Eof) => return Err("unexpected end of document".to_string()),
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
    }
}

fn parse_value(node: &Node) -> Result<Value, String> {
    let Some(typed) = node.children.first() else {
        // An untyped <value> is a string
        return Ok(Value::String(node.text.clone()));
    };

    let text = typed.text.trim();
    match typed.name.as_str() {
        "int" | "i4" | "i8" => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("invalid integer '{text}': {e}")),
        "boolean" => match text {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(format!("invalid boolean '{other}'")),
        },
        // Strings keep their whitespace
        "string" => Ok(Value::String(typed.text.clone())),
        "double" => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|e| format!("invalid double '{text}': {e}")),
        "dateTime.iso8601" => NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|e| format!("invalid dateTime '{text}': {e}")),
        "base64" => Ok(Value::Base64(text.to_string())),
        "nil" => Ok(Value::Nil),
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children_named("member") {
                let name = member.child("name").ok_or("struct member without name")?;
                let value = member.child("value").ok_or("struct member without value")?;
                members.insert(name.text.clone(), parse_value(value)?);
            }
            Ok(Value::Struct(members))
        }
        "array" => {
            let Some(data) = typed.child("data") else {
                return Ok(Value::Array(Vec::new()));
            };
            data.children_named("value")
                .map(parse_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        other => Err(format!("unsupported value type <{other}>")),
    }
}

/// Decode a `<methodResponse>` document.
///
/// A well-formed fault is `Ok(Response::Fault(..))`; `Err` means the document
/// itself could not be understood.
pub fn parse_response(xml: &str) -> Result<Response, String> {
    let root = parse_tree(xml)?;
    if root.name != "methodResponse" {
        return Err(format!("expected <methodResponse>, found <{}>", root.name));
    }

    if let Some(fault) = root.child("fault") {
        let value = fault.child("value").ok_or("fault without value")?;
        let value = parse_value(value)?;
        let code = value
            .get("faultCode")
            .and_then(Value::as_i64)
            .ok_or("fault without faultCode")?;
        let message = value
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Ok(Response::Fault(Fault { code, message }));
    }

    let value = root
        .child("params")
        .and_then(|p| p.child("param"))
        .and_then(|p| p.child("value"))
        .ok_or("response without params/param/value")?;

    parse_value(value).map(Response::Success)
}
