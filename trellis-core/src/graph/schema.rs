//! Node Type Schemas
//!
//! A schema is built once per concrete node type and describes the ports that
//! type exposes: which namespace each name lives in and what kind of value it
//! carries. Nodes validate every `add_*` call against their schema, and the
//! same description is what an editor renders as the node's port list.
//!
//! Schemas are either closed (every port must be declared up front) or open
//! (ports discovered at runtime, such as the uniforms of a compiled shader,
//! are accepted; declared ports are still checked).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaViolation;
use crate::value::ParamData;

/// The namespace a port lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortKind {
    /// Valued input.
    Parameter,
    /// Input that fires a callback and carries no value.
    TriggerParameter,
    /// Valued output.
    OutValue,
    /// Output that fires without a value.
    OutTrigger,
}

impl PortKind {
    /// Parameter or trigger parameter.
    pub fn is_input(self) -> bool {
        matches!(self, PortKind::Parameter | PortKind::TriggerParameter)
    }

    /// Valued output or output trigger.
    pub fn is_output(self) -> bool {
        !self.is_input()
    }

    /// Carries no value.
    pub fn is_trigger(self) -> bool {
        matches!(self, PortKind::TriggerParameter | PortKind::OutTrigger)
    }

    /// Carries a value.
    pub fn is_valued(self) -> bool {
        !self.is_trigger()
    }
}

/// The kind of value a valued port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    #[default]
    Any,
    Bool,
    Number,
    String,
    Handle,
}

impl ValueKind {
    /// Whether `value` fits this kind. `Null` fits every kind and stands for
    /// "no value yet".
    pub fn accepts(self, value: &ParamData) -> bool {
        match (self, value) {
            (ValueKind::Any, _) | (_, ParamData::Null) => true,
            (ValueKind::Bool, ParamData::Bool(_)) => true,
            (ValueKind::Number, ParamData::Number(_)) => true,
            (ValueKind::String, ParamData::String(_)) => true,
            (ValueKind::Handle, ParamData::Handle(_)) => true,
            _ => false,
        }
    }
}

/// Declaration of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub kind: PortKind,
    #[serde(default)]
    pub value: ValueKind,
}

/// Port layout of a node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    ports: IndexMap<String, PortSpec>,
    #[serde(default)]
    open: bool,
}

impl NodeSchema {
    /// An empty, closed schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept ports that were not declared.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Declare a valued parameter.
    pub fn parameter(self, name: impl Into<String>, value: ValueKind) -> Self {
        self.port(name, PortKind::Parameter, value)
    }

    /// Declare a trigger parameter.
    pub fn trigger(self, name: impl Into<String>) -> Self {
        self.port(name, PortKind::TriggerParameter, ValueKind::Any)
    }

    /// Declare a valued output.
    pub fn out_value(self, name: impl Into<String>, value: ValueKind) -> Self {
        self.port(name, PortKind::OutValue, value)
    }

    /// Declare an output trigger.
    pub fn out_trigger(self, name: impl Into<String>) -> Self {
        self.port(name, PortKind::OutTrigger, ValueKind::Any)
    }

    // Input and output names are separate namespaces, so the same name may be
    // declared once on each side. Redeclaring on the same side replaces.
    fn port(mut self, name: impl Into<String>, kind: PortKind, value: ValueKind) -> Self {
        let name = name.into();
        let key = Self::key(&name, kind);
        self.ports.insert(key, PortSpec { kind, value });
        self
    }

    fn key(name: &str, kind: PortKind) -> String {
        if kind.is_input() {
            format!("in:{name}")
        } else {
            format!("out:{name}")
        }
    }

    /// Whether undeclared ports are accepted.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Look up the declaration for `name` on the input or output side.
    pub fn get(&self, name: &str, output: bool) -> Option<&PortSpec> {
        let key = if output {
            format!("out:{name}")
        } else {
            format!("in:{name}")
        };
        self.ports.get(&key)
    }

    /// Declared ports as `(name, spec)` pairs, inputs and outputs interleaved
    /// in declaration order.
    pub fn ports(&self) -> impl Iterator<Item = (&str, &PortSpec)> {
        self.ports.iter().map(|(key, spec)| {
            let name = key.split_once(':').map_or(key.as_str(), |(_, name)| name);
            (name, spec)
        })
    }

    /// Check that registering `name` as `kind` with `value` fits the schema.
    pub fn validate(
        &self,
        name: &str,
        kind: PortKind,
        value: Option<&ParamData>,
    ) -> Result<(), SchemaViolation> {
        let Some(spec) = self.get(name, kind.is_output()) else {
            if self.open {
                return Ok(());
            }
            return Err(SchemaViolation::Undeclared { kind });
        };

        if spec.kind != kind {
            return Err(SchemaViolation::WrongKind {
                declared: spec.kind,
                requested: kind,
            });
        }

        if let Some(value) = value {
            if !spec.value.accepts(value) {
                return Err(SchemaViolation::WrongValue {
                    expected: spec.value,
                    found: value.kind_name(),
                });
            }
        }

        Ok(())
    }
}
