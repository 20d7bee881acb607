use crate::serde::{EnumWidth, EnumWidthInt, StrLen, Value, ValueType, ValueTypeInt};
use anyhow::Result;
use std::io::Write;

impl Value {
    /// Writes tag and payload for the scalar variants (`Null`, the numeric
    /// primitives, `Bool`, `Char`, `Str`, `Enum`).
    ///
    /// Returns `false` for containers, nested objects, and external
    /// references, which the codec engine encodes itself.
    ///
    /// A value the wire cannot hold (a char outside the basic plane, an
    /// enum value outside every supported width) is written as `Null` so
    /// the record stays well-formed; the incident is logged.
    pub fn ser_scalar<W: Write>(&self, w: &mut W) -> Result<bool> {
        let tag = ValueTypeInt::from(ValueType::from(self));
        match self {
            Value::Null => {
                w.write_all(&tag.to_le_bytes())?;
            }
            Value::Bool(b) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&[*b as u8])?;
            }
            Value::Char(c) => match single_utf16_unit(*c) {
                Some(unit) => {
                    w.write_all(&tag.to_le_bytes())?;
                    w.write_all(&unit.to_le_bytes())?;
                }
                None => {
                    tracing::error!("Char {c:?} needs a surrogate pair; writing Null.");
                    Self::ser_null(w)?;
                }
            },
            Value::I8(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::U8(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::I16(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::U16(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::I32(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::U32(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::I64(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::U64(i) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&i.to_le_bytes())?;
            }
            Value::F32(x) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&x.to_le_bytes())?;
            }
            Value::F64(x) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&x.to_le_bytes())?;
            }
            Value::Str(s) => {
                w.write_all(&tag.to_le_bytes())?;
                w.write_all(&StrLen::from_body(s.as_bytes())?.to_le_bytes())?;
                w.write_all(s.as_bytes())?;
            }
            Value::Enum(v) => match EnumWidth::fitting(*v) {
                Some(width) => {
                    w.write_all(&tag.to_le_bytes())?;
                    w.write_all(&EnumWidthInt::from(width).to_le_bytes())?;
                    width.ser_value(w, *v)?;
                }
                None => {
                    tracing::error!("Enum value {v} fits no supported width; writing Null.");
                    Self::ser_null(w)?;
                }
            },
            Value::Asset(_)
            | Value::Array(_)
            | Value::List(_)
            | Value::Dict(_)
            | Value::Object(_) => return Ok(false),
        }
        Ok(true)
    }

    /// Writes a bare `Null` tag.
    pub fn ser_null<W: Write>(w: &mut W) -> Result<()> {
        let tag = ValueTypeInt::from(ValueType::Null);
        w.write_all(&tag.to_le_bytes())?;
        Ok(())
    }
}

/// Writes a bare length-prefixed string body (no tag). The envelope and
/// external references store their strings this way.
pub fn ser_str_body<W: Write>(w: &mut W, s: &str) -> Result<()> {
    w.write_all(&StrLen::from_body(s.as_bytes())?.to_le_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// The char as one UTF-16 code unit, or `None` if it needs two.
fn single_utf16_unit(c: char) -> Option<u16> {
    let mut units = [0u16; 2];
    match c.encode_utf16(&mut units) {
        [unit] => Some(*unit),
        _ => None,
    }
}
