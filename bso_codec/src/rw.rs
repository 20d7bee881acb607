//! Full TaggedValue dispatch: scalars defer to `bso_types`, containers are
//! encoded here, nested objects go through the block codec, and external
//! references through the resolver.

use crate::{block, resolver};
use anyhow::Result;
use bso_types::serde::{ElemCount, Value, ValueType, ValueTypeInt};
use bso_types::types::{AssetStore, BinObject, ValueKind};
use std::io::{Read, Seek, Write};

/// What the decoder reads from: the top-level file stream, or the
/// random-access field blob of one object block. Read hooks see their
/// reader through this trait.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Per-field write override. Called before the default encode of every
/// field (including fields of nested object blocks, but not container
/// elements) with the writer, the field's current value, and its declared
/// kind. `Ok(true)` means the hook wrote the field's complete TaggedValue
/// and the default encode is skipped; `Ok(false)` declines, having written
/// nothing.
pub type OnFieldWrite<'h> = dyn FnMut(&mut dyn Write, &Value, &ValueKind) -> Result<bool> + 'h;

/// Per-field read override, the write hook's mirror. `Ok(Some(..))` is the
/// decoded value; `Ok(None)` declines, having consumed nothing, and the
/// default decode runs; `Err` fails that one field (logged and left at its
/// default, like any other per-field failure).
pub type OnFieldRead<'h> = dyn FnMut(&mut dyn ReadSeek, &ValueKind) -> Result<Option<Value>> + 'h;

pub(crate) struct SaveCx<'a, 'h> {
    pub(crate) store: &'a dyn AssetStore,
    pub(crate) hook: Option<&'a mut OnFieldWrite<'h>>,
}

pub(crate) struct LoadCx<'a, 'h> {
    pub(crate) store: &'a dyn AssetStore,
    pub(crate) hook: Option<&'a mut OnFieldRead<'h>>,
}

/// Writes one complete TaggedValue.
///
/// Never refuses a value: anything unencodable inside has already been
/// degraded to a logged `Null` by the scalar codec or the resolver.
pub(crate) fn write_value<W: Write>(cx: &mut SaveCx, w: &mut W, val: &Value) -> Result<()> {
    match val {
        Value::Asset(asset) => resolver::write_asset_ref(cx, w, asset),
        Value::Array(elems) => write_elems(cx, w, ValueType::Array, elems),
        Value::List(elems) => write_elems(cx, w, ValueType::List, elems),
        Value::Dict(entries) => write_dict(cx, w, entries),
        Value::Object(obj) => block::write_class(cx, w, obj.as_ref(), obj.schema()),
        scalar => {
            scalar.ser_scalar(w)?;
            Ok(())
        }
    }
}

/// Reads one complete TaggedValue against the destination `kind`.
///
/// The stored tag is authoritative. `Ok(None)` is a per-field failure:
/// the tag and kind disagree, or the payload is unusable. An unknown tag
/// is also `Ok(None)` — the enclosing block realigns via its field index.
pub(crate) fn read_value<R: Read + Seek>(
    cx: &mut LoadCx,
    r: &mut R,
    kind: &ValueKind,
) -> Result<Option<Value>> {
    let tag_int = ValueTypeInt::deser(r)?;
    let tag = match ValueType::try_from(tag_int) {
        Ok(tag) => tag,
        Err(_) => return Ok(None),
    };

    match tag {
        ValueType::Asset => match kind {
            ValueKind::Asset { type_label } => resolver::read_asset_ref(cx, r, type_label),
            _ => Ok(None),
        },
        ValueType::Array => match kind {
            ValueKind::Array(elem_kind) => Ok(read_elems(cx, r, elem_kind)?.map(Value::Array)),
            _ => Ok(None),
        },
        ValueType::List => match kind {
            ValueKind::List(elem_kind) => Ok(read_elems(cx, r, elem_kind)?.map(Value::List)),
            _ => Ok(None),
        },
        ValueType::Dict => match kind {
            ValueKind::Dict(key_kind, val_kind) => {
                Ok(read_dict(cx, r, key_kind, val_kind)?.map(Value::Dict))
            }
            _ => Ok(None),
        },
        ValueType::Class => match kind {
            ValueKind::Object(schema) => {
                let mut obj = (schema.construct)();
                block::read_class(cx, r, obj.as_mut(), schema)?;
                Ok(Some(Value::Object(obj)))
            }
            _ => {
                // Structural mismatch at a block boundary: skip the whole
                // block through its length prefix so sibling data stays
                // aligned.
                block::skip_class(r)?;
                Ok(None)
            }
        },
        scalar_tag => Value::deser_scalar(r, scalar_tag, kind),
    }
}

fn write_elems<W: Write>(
    cx: &mut SaveCx,
    w: &mut W,
    tag: ValueType,
    elems: &[Value],
) -> Result<()> {
    w.write_all(&ValueTypeInt::from(tag).to_le_bytes())?;
    w.write_all(&ElemCount::from_len(elems.len())?.to_le_bytes())?;
    for elem in elems {
        write_value(cx, w, elem)?;
    }
    Ok(())
}

/// An element failure fails the whole container: `Ok(None)`.
/// A zero count decodes to an empty container, distinct from `Null`.
fn read_elems<R: Read + Seek>(
    cx: &mut LoadCx,
    r: &mut R,
    elem_kind: &ValueKind,
) -> Result<Option<Vec<Value>>> {
    let count = ElemCount::deser(r)?;
    let count = match count.to_usize() {
        Ok(count) => count,
        Err(_) => return Ok(None),
    };
    let mut elems = Vec::with_capacity(count);
    for _ in 0..count {
        match read_value(cx, r, elem_kind)? {
            None => return Ok(None),
            Some(elem) => elems.push(elem),
        }
    }
    Ok(Some(elems))
}

fn write_dict<W: Write>(cx: &mut SaveCx, w: &mut W, entries: &[(Value, Value)]) -> Result<()> {
    w.write_all(&ValueTypeInt::from(ValueType::Dict).to_le_bytes())?;
    w.write_all(&ElemCount::from_len(entries.len())?.to_le_bytes())?;
    for (key, val) in entries {
        write_value(cx, w, key)?;
        write_value(cx, w, val)?;
    }
    Ok(())
}

/// Duplicate keys pass through undisturbed; the destination container's
/// own key semantics apply when the setter rebuilds it.
fn read_dict<R: Read + Seek>(
    cx: &mut LoadCx,
    r: &mut R,
    key_kind: &ValueKind,
    val_kind: &ValueKind,
) -> Result<Option<Vec<(Value, Value)>>> {
    let count = ElemCount::deser(r)?;
    let count = match count.to_usize() {
        Ok(count) => count,
        Err(_) => return Ok(None),
    };
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let key = match read_value(cx, r, key_kind)? {
            None => return Ok(None),
            Some(key) => key,
        };
        let val = match read_value(cx, r, val_kind)? {
            None => return Ok(None),
            Some(val) => val,
        };
        entries.push((key, val));
    }
    Ok(Some(entries))
}
