use crate::serde::Value;
use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;
use std::io::{self, Read};
use std::mem;

#[derive(From, Deref, Clone, Copy)]
pub struct ValueTypeInt(u16);
impl From<ValueType> for ValueTypeInt {
    fn from(val_type: ValueType) -> Self {
        let int = val_type.to_u16().unwrap();
        Self(int)
    }
}
impl ValueTypeInt {
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<u16>()];
        r.read_exact(&mut buf)?;
        let int = u16::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// We manually map enum members to on-wire integers because:
/// - An automatic discriminant may change w/ enum definition change, and
///   files written with the old numbering would be silently misread.
/// - The numbering is part of the format and must stay stable across
///   versions even if members are deprecated.
#[repr(u16)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ValueType {
    Null = 0,
    Bool = 1,
    Char = 2,
    I8 = 3,
    U8 = 4,
    I16 = 5,
    U16 = 6,
    I32 = 7,
    U32 = 8,
    I64 = 9,
    U64 = 10,
    F32 = 11,
    F64 = 12,
    Str = 13,
    Asset = 14,
    Array = 15,
    List = 16,
    Dict = 17,
    Class = 18,
    Enum = 19,
}
impl TryFrom<ValueTypeInt> for ValueType {
    type Error = anyhow::Error;
    fn try_from(int: ValueTypeInt) -> Result<Self> {
        ValueType::from_u16(int.0).ok_or(anyhow!(
            "Unknown {} {}",
            any::type_name::<ValueTypeInt>(),
            int.0
        ))
    }
}
impl From<&Value> for ValueType {
    fn from(val: &Value) -> Self {
        match val {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Char(_) => ValueType::Char,
            Value::I8(_) => ValueType::I8,
            Value::U8(_) => ValueType::U8,
            Value::I16(_) => ValueType::I16,
            Value::U16(_) => ValueType::U16,
            Value::I32(_) => ValueType::I32,
            Value::U32(_) => ValueType::U32,
            Value::I64(_) => ValueType::I64,
            Value::U64(_) => ValueType::U64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::Str(_) => ValueType::Str,
            Value::Asset(_) => ValueType::Asset,
            Value::Array(_) => ValueType::Array,
            Value::List(_) => ValueType::List,
            Value::Dict(_) => ValueType::Dict,
            Value::Object(_) => ValueType::Class,
            Value::Enum(_) => ValueType::Enum,
        }
    }
}
