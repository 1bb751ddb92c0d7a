//! Parameter Values
//!
//! Everything that flows through a port is a [`ParamData`]. The engine treats
//! values as opaque: it stores them, copies them across valued links and
//! compares them for equality, nothing more.
//!
//! # Handles
//!
//! A [`Handle`] wraps a resource owned by some collaborator (a texture, a
//! compiled program, a device). Handles compare by pointer identity and cannot
//! be serialized; a project containing a live handle in its state fails to
//! save rather than silently dropping it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{self, Serialize, Serializer};

/// Committed or pending parameter values of a node, keyed by port name.
///
/// Ordered so that iteration (and therefore tick processing and saved
/// projects) is deterministic.
pub type State = IndexMap<String, ParamData>;

/// An opaque reference to an externally owned resource.
#[derive(Clone)]
pub struct Handle(Arc<dyn Any + Send + Sync>);

impl Handle {
    /// Wrap a resource.
    pub fn new<T: Any + Send + Sync>(resource: T) -> Self {
        Self(Arc::new(resource))
    }

    /// Wrap an already shared resource without re-allocating.
    pub fn from_arc(resource: Arc<dyn Any + Send + Sync>) -> Self {
        Self(resource)
    }

    /// Borrow the resource if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles point at the same resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p})", Arc::as_ptr(&self.0))
    }
}

/// A value carried by a parameter or a valued output.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamData {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Handle(Handle),
}

impl ParamData {
    /// Short name of the variant, used in schema diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamData::Null => "null",
            ParamData::Bool(_) => "bool",
            ParamData::Number(_) => "number",
            ParamData::String(_) => "string",
            ParamData::Handle(_) => "handle",
        }
    }

    /// Whether this is [`ParamData::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ParamData::Null)
    }

    /// The number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamData::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamData::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamData::String(s) => Some(s),
            _ => None,
        }
    }

    /// The opaque handle, if this is one.
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            ParamData::Handle(h) => Some(h),
            _ => None,
        }
    }
}

impl From<bool> for ParamData {
    fn from(value: bool) -> Self {
        ParamData::Bool(value)
    }
}

impl From<f64> for ParamData {
    fn from(value: f64) -> Self {
        ParamData::Number(value)
    }
}

impl From<i32> for ParamData {
    fn from(value: i32) -> Self {
        ParamData::Number(f64::from(value))
    }
}

impl From<&str> for ParamData {
    fn from(value: &str) -> Self {
        ParamData::String(value.to_owned())
    }
}

impl From<String> for ParamData {
    fn from(value: String) -> Self {
        ParamData::String(value)
    }
}

impl From<Handle> for ParamData {
    fn from(value: Handle) -> Self {
        ParamData::Handle(value)
    }
}

impl Serialize for ParamData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamData::Null => serializer.serialize_unit(),
            ParamData::Bool(b) => serializer.serialize_bool(*b),
            ParamData::Number(n) => serializer.serialize_f64(*n),
            ParamData::String(s) => serializer.serialize_str(s),
            ParamData::Handle(_) => Err(ser::Error::custom(
                "resource handles cannot be serialized",
            )),
        }
    }
}

struct ParamDataVisitor;

impl<'de> Visitor<'de> for ParamDataVisitor {
    type Value = ParamData;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a boolean, a number or a string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ParamData, E> {
        Ok(ParamData::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ParamData, E> {
        Ok(ParamData::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ParamData, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ParamData, E> {
        Ok(ParamData::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ParamData, E> {
        Ok(ParamData::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ParamData, E> {
        Ok(ParamData::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ParamData, E> {
        Ok(ParamData::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ParamData, E> {
        Ok(ParamData::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ParamData, E> {
        Ok(ParamData::String(v))
    }
}

impl<'de> Deserialize<'de> for ParamData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParamDataVisitor)
    }
}
