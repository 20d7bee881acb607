use crate::serde::{EnumWidth, EnumWidthInt, StrLen, Value, ValueType};
use crate::types::ValueKind;
use anyhow::Result;
use std::io::{self, Read};

impl Value {
    /// Decodes the payload of a scalar `tag` when the destination `kind`
    /// agrees with it.
    ///
    /// The stored tag is authoritative: `Ok(None)` means the tag and the
    /// destination kind disagree (or the payload is unusable — a surrogate
    /// code unit, malformed UTF-8, an unknown enum width), which fails that
    /// one field only. The payload is not consumed on a kind mismatch; the
    /// enclosing object realigns through its field index.
    ///
    /// A `Null` tag decodes to `Value::Null` for any destination kind.
    pub fn deser_scalar<R: Read>(
        r: &mut R,
        tag: ValueType,
        kind: &ValueKind,
    ) -> Result<Option<Value>> {
        let val = match (tag, kind) {
            (ValueType::Null, _) => Value::Null,
            (ValueType::Bool, ValueKind::Bool) => {
                let buf: [u8; 1] = read_arr(r)?;
                Value::Bool(buf[0] != 0)
            }
            (ValueType::Char, ValueKind::Char) => {
                let unit = u16::from_le_bytes(read_arr(r)?);
                match char::from_u32(u32::from(unit)) {
                    Some(c) => Value::Char(c),
                    None => return Ok(None),
                }
            }
            (ValueType::I8, ValueKind::I8) => Value::I8(i8::from_le_bytes(read_arr(r)?)),
            (ValueType::U8, ValueKind::U8) => Value::U8(u8::from_le_bytes(read_arr(r)?)),
            (ValueType::I16, ValueKind::I16) => Value::I16(i16::from_le_bytes(read_arr(r)?)),
            (ValueType::U16, ValueKind::U16) => Value::U16(u16::from_le_bytes(read_arr(r)?)),
            (ValueType::I32, ValueKind::I32) => Value::I32(i32::from_le_bytes(read_arr(r)?)),
            (ValueType::U32, ValueKind::U32) => Value::U32(u32::from_le_bytes(read_arr(r)?)),
            (ValueType::I64, ValueKind::I64) => Value::I64(i64::from_le_bytes(read_arr(r)?)),
            (ValueType::U64, ValueKind::U64) => Value::U64(u64::from_le_bytes(read_arr(r)?)),
            (ValueType::F32, ValueKind::F32) => Value::F32(f32::from_le_bytes(read_arr(r)?)),
            (ValueType::F64, ValueKind::F64) => Value::F64(f64::from_le_bytes(read_arr(r)?)),
            (ValueType::Str, ValueKind::Str) => {
                let body_len = StrLen::deser(r)?;
                let mut buf = vec![0u8; *body_len as usize];
                r.read_exact(&mut buf)?;
                match String::from_utf8(buf) {
                    Ok(s) => Value::Str(s),
                    Err(_) => return Ok(None),
                }
            }
            (ValueType::Enum, ValueKind::Enum) => {
                let width_int = EnumWidthInt::deser(r)?;
                let width = match EnumWidth::try_from(width_int) {
                    Ok(width) => width,
                    Err(_) => return Ok(None),
                };
                Value::Enum(width.deser_value(r)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(val))
    }
}

/// Reads a bare length-prefixed string body (no tag), the mirror of
/// [`crate::serde::ser_str_body`].
pub fn deser_str_body<R: Read>(r: &mut R) -> Result<String> {
    let body_len = StrLen::deser(r)?;
    let mut buf = vec![0u8; *body_len as usize];
    r.read_exact(&mut buf)?;
    let s = String::from_utf8(buf)?;
    Ok(s)
}

fn read_arr<const LEN: usize>(r: &mut impl Read) -> Result<[u8; LEN], io::Error> {
    let mut buf = [0u8; LEN];
    r.read_exact(&mut buf)?;
    Ok(buf)
}
