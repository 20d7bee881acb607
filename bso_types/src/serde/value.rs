use crate::types::{Asset, BinObject, SharedAsset};
use std::fmt;
use std::sync::Arc;

mod deser;
mod ser;

pub use deser::*;
pub use ser::*;

/// A self-describing field value: the in-memory side of one TaggedValue.
///
/// The set of variants is closed; every on-wire type tag corresponds to
/// exactly one variant, so encode and decode are exhaustive matches.
///
/// `Null` stands for "no value" — an empty object reference, an
/// unresolvable external reference, or a value the encoder refused.
/// `Enum` carries the underlying integer, wide enough for every supported
/// backing width; the narrowest width is chosen at encode time.
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Asset(SharedAsset),
    Array(Vec<Value>),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Object(Box<dyn BinObject>),
    Enum(i128),
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(slf), Self::Bool(oth)) => slf == oth,
            (Self::Char(slf), Self::Char(oth)) => slf == oth,
            (Self::I8(slf), Self::I8(oth)) => slf == oth,
            (Self::U8(slf), Self::U8(oth)) => slf == oth,
            (Self::I16(slf), Self::I16(oth)) => slf == oth,
            (Self::U16(slf), Self::U16(oth)) => slf == oth,
            (Self::I32(slf), Self::I32(oth)) => slf == oth,
            (Self::U32(slf), Self::U32(oth)) => slf == oth,
            (Self::I64(slf), Self::I64(oth)) => slf == oth,
            (Self::U64(slf), Self::U64(oth)) => slf == oth,
            (Self::F32(slf), Self::F32(oth)) => slf == oth,
            (Self::F64(slf), Self::F64(oth)) => slf == oth,
            (Self::Str(slf), Self::Str(oth)) => slf == oth,
            (Self::Asset(slf), Self::Asset(oth)) => Arc::ptr_eq(slf, oth),
            (Self::Array(slf), Self::Array(oth)) => slf == oth,
            (Self::List(slf), Self::List(oth)) => slf == oth,
            (Self::Dict(slf), Self::Dict(oth)) => slf == oth,
            (Self::Enum(slf), Self::Enum(oth)) => slf == oth,
            // Object snapshots carry no comparable identity.
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Char(c) => write!(f, "Char({c:?})"),
            Self::I8(i) => write!(f, "I8({i})"),
            Self::U8(i) => write!(f, "U8({i})"),
            Self::I16(i) => write!(f, "I16({i})"),
            Self::U16(i) => write!(f, "U16({i})"),
            Self::I32(i) => write!(f, "I32({i})"),
            Self::U32(i) => write!(f, "U32({i})"),
            Self::I64(i) => write!(f, "I64({i})"),
            Self::U64(i) => write!(f, "U64({i})"),
            Self::F32(x) => write!(f, "F32({x})"),
            Self::F64(x) => write!(f, "F64({x})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Asset(a) => write!(f, "Asset({})", a.type_label()),
            Self::Array(elems) => f.debug_tuple("Array").field(elems).finish(),
            Self::List(elems) => f.debug_tuple("List").field(elems).finish(),
            Self::Dict(entries) => f.debug_tuple("Dict").field(entries).finish(),
            Self::Object(obj) => write!(f, "Object({})", obj.schema().name),
            Self::Enum(v) => write!(f, "Enum({v})"),
        }
    }
}
