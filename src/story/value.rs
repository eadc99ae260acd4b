//! The `$OBJECT`-tagged operand sum type and the instruction/script records emitted by
//! [`crate::story::compiler`].
//!
//! Operands are a sealed Rust enum internally; the `$OBJECT` tag is only attached at the JSON
//! boundary through `serde`'s externally-tagged representation, per the sealed-variant guidance
//! in the value-model design notes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single path segment: a dotted raw identifier, or a bracketed, quote-stripped string key.
pub type PathSegment = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$OBJECT", rename_all = "lowercase")]
pub enum Operand {
    Path {
        paths: Vec<PathSegment>,
    },
    String {
        string: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        values: Option<Vec<Operand>>,
    },
    Int {
        int: i64,
    },
    List {
        items: Vec<Value>,
    },
    Dict {
        items: Vec<(Value, Value)>,
    },
    File {
        string: String,
    },
    Mutation {
        mutation: String,
        arguments: Vec<Operand>,
    },
    Argument {
        name: String,
        argument: Box<Value>,
    },
    Expression {
        expression: String,
        values: Vec<Value>,
    },
    Condition {
        #[serde(rename = "if")]
        if_: (Box<Operand>, String),
        then: Box<Operand>,
        #[serde(skip_serializing_if = "Option::is_none")]
        else_: Option<Box<Operand>>,
    },
    Method {
        method: String,
        left: Box<Operand>,
        right: Box<Operand>,
    },
}

/// A native boolean is emitted as-is, not wrapped in an `$OBJECT` record — see
/// `spec.md` §3: "`boolean` (encoded as native boolean)". `Value` is the union of an `Operand`
/// and the handful of shapes that are not themselves `$OBJECT` records: native booleans, and
/// the bare values used as `for`/`command` arguments (a loop variable name, a container name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Operand(Operand),
    Raw(String),
}

impl From<Operand> for Value {
    fn from(op: Operand) -> Self {
        Value::Operand(op)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Raw(s)
    }
}

/// One compiled instruction, keyed by its decimal line number in the enclosing [`Script`].
///
/// `output` is reserved and always absent in the current emitter, per `spec.md` §4.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub method: String,
    pub ln: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
}

impl Instruction {
    pub fn new(
        method: &str,
        ln: usize,
        container: Option<String>,
        args: Option<Vec<Value>>,
        enter: Option<usize>,
        exit: Option<usize>,
    ) -> Self {
        Self {
            method: method.to_string(),
            ln: ln.to_string(),
            output: None,
            container,
            enter: enter.map(|l| l.to_string()),
            exit: exit.map(|l| l.to_string()),
            args,
        }
    }
}

/// The compiled script: an ordered mapping from line keys to instructions, plus `version` and
/// `entrypoint`. The mapping is a [`BTreeMap`] keyed by the decimal line string, but
/// lexicographic `BTreeMap` order is not numeric order (`"10"` sorts before `"2"`) — callers
/// that need ascending line order should sort by the parsed `usize`, as [`Script::entrypoint`]
/// already does internally rather than trusting map iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub version: String,
    pub script: BTreeMap<String, Instruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
}

impl Script {
    pub fn from_instructions(version: String, script: BTreeMap<String, Instruction>) -> Self {
        let entrypoint = script
            .keys()
            .filter_map(|k| k.parse::<usize>().ok())
            .min()
            .map(|l| l.to_string());
        Self {
            version,
            script,
            entrypoint,
        }
    }
}
