//! # Object block codec
//!
//! One block holds one schema level's fields plus its base level's own
//! block, recursively. The below pseudocode depicts the layout following a
//! block's `Class` tag:
//!
//! ```text
//! struct ObjectBlock {
//!     block_len:      i32,    // everything after this field
//!     base_len:       i32,
//!     base_bytes:     [u8; base_len],    // a tagged ObjectBlock, or empty
//!     field_count:    u16,
//!     field_idx_len:  i32,    // written for future use, unused on read
//!     field_idx:      [(field_id: u16, blob_offset: i32); field_count],
//!     blob_len:       i32,
//!     field_blob:     [u8; blob_len],
//!         // field_count x (field_id: u16, TaggedValue)
//! }
//! ```
//!
//! The index maps stable field IDs to byte offsets inside the blob, so the
//! reader matches fields by ID instead of by position: fields added,
//! removed, or reordered across schema versions leave the surviving fields
//! readable. Each indexed record repeats its field ID; the reader verifies
//! it before decoding, so a corrupt index entry costs one field, not the
//! block.
//!
//! Base bytes and the field blob are materialized into their own in-memory
//! buffers on both sides. On write that is what makes the offsets and the
//! four length prefixes knowable; on read it is what contains a failure to
//! the section it occurred in.

use crate::rw::{self, LoadCx, SaveCx};
use anyhow::{anyhow, Result};
use bso_types::serde::{BlobOffset, BlockLen, FieldCount, SectionLen, ValueType, ValueTypeInt};
use bso_types::types::{BinObject, ClassSchema, FieldId, FieldSpec};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::mem;

/// Writes `obj`'s block for one schema level: `Class` tag, then the base
/// level's block (through the parent projection), then the indexed fields.
pub(crate) fn write_class<W: Write>(
    cx: &mut SaveCx,
    w: &mut W,
    obj: &dyn BinObject,
    schema: &ClassSchema,
) -> Result<()> {
    w.write_all(&ValueTypeInt::from(ValueType::Class).to_le_bytes())?;

    /* base_bytes */
    let mut base_buf: Vec<u8> = vec![];
    if let Some(link) = &schema.parent {
        write_class(cx, &mut base_buf, (link.project)(obj), link.schema)?;
    }

    /* field_idx and field_blob */
    let mut idx_buf: Vec<u8> = vec![];
    let mut blob_buf: Vec<u8> = vec![];
    let mut field_count: u16 = 0;
    for spec in schema.fields {
        idx_buf.write_all(&spec.id.to_le_bytes())?;
        idx_buf.write_all(&BlobOffset::from_position(blob_buf.len())?.to_le_bytes())?;

        blob_buf.write_all(&spec.id.to_le_bytes())?;
        write_one_field(cx, &mut blob_buf, obj, spec)?;

        field_count += 1;
    }

    /* lengths, then sections */
    let block_len = mem::size_of::<u16>()
        + 3 * mem::size_of::<i32>()
        + base_buf.len()
        + idx_buf.len()
        + blob_buf.len();
    w.write_all(&BlockLen::from_sections(block_len)?.to_le_bytes())?;
    w.write_all(&SectionLen::from_section(&base_buf)?.to_le_bytes())?;
    w.write_all(&base_buf)?;
    w.write_all(&field_count.to_le_bytes())?;
    w.write_all(&SectionLen::from_section(&idx_buf)?.to_le_bytes())?;
    w.write_all(&idx_buf)?;
    w.write_all(&SectionLen::from_section(&blob_buf)?.to_le_bytes())?;
    w.write_all(&blob_buf)?;

    Ok(())
}

fn write_one_field(
    cx: &mut SaveCx,
    blob_buf: &mut Vec<u8>,
    obj: &dyn BinObject,
    spec: &FieldSpec,
) -> Result<()> {
    let val = (spec.get)(obj);

    let mut handled = false;
    if let Some(hook) = cx.hook.take() {
        let res = hook(&mut *blob_buf, &val, &spec.kind);
        cx.hook = Some(hook);
        handled = res?;
    }
    if !handled {
        rw::write_value(cx, blob_buf, &val)?;
    }
    Ok(())
}

/// Decodes one block into `obj`, assuming the `Class` tag was consumed.
///
/// Fields present in the file but not in the schema are ignored; fields in
/// the schema but not in the file keep their current values. A field that
/// fails to decode is logged and left as it was; nothing here aborts the
/// sibling fields.
pub(crate) fn read_class<R: Read + Seek>(
    cx: &mut LoadCx,
    r: &mut R,
    obj: &mut dyn BinObject,
    schema: &ClassSchema,
) -> Result<()> {
    let _block_len = BlockLen::deser(r)?;

    /* base_bytes */
    let base_len = SectionLen::deser(r)?.to_usize()?;
    if base_len > 0 {
        let mut base_buf = vec![0u8; base_len];
        r.read_exact(&mut base_buf)?;
        let mut base_r = Cursor::new(base_buf);

        let tag_int = ValueTypeInt::deser(&mut base_r)?;
        match ValueType::try_from(tag_int) {
            Ok(ValueType::Class) => {
                if let Some(link) = &schema.parent {
                    read_class(cx, &mut base_r, (link.project_mut)(obj), link.schema)?;
                }
                // Base bytes with no registered parent link: a base level
                // this schema no longer declares. Dropped, like any
                // unmatched field.
            }
            _ => {
                tracing::error!(
                    "Base block of {} does not open with an object block; base fields keep their defaults.",
                    schema.name
                );
            }
        }
    }

    /* field_idx: the first entry wins a duplicated ID */
    let field_count = FieldCount::deser(r)?;
    let _field_idx_len = SectionLen::deser(r)?;
    let mut index: HashMap<FieldId, BlobOffset> = HashMap::with_capacity(usize::from(*field_count));
    for _ in 0..*field_count {
        let id = FieldId::deser(r)?;
        let offset = BlobOffset::deser(r)?;
        index.entry(id).or_insert(offset);
    }

    /* field_blob */
    let blob_len = SectionLen::deser(r)?.to_usize()?;
    let mut blob_buf = vec![0u8; blob_len];
    r.read_exact(&mut blob_buf)?;
    let mut blob_r = Cursor::new(blob_buf);

    for spec in schema.fields {
        let offset = match index.get(&spec.id) {
            None => continue, // written by neither this schema version nor a prior one
            Some(offset) => *offset,
        };
        if let Err(e) = read_one_field(cx, &mut blob_r, obj, spec, offset) {
            tracing::error!(
                "Could not read field {} \"{}\" of {}: {e:#}",
                *spec.id,
                spec.name,
                schema.name
            );
        }
    }

    Ok(())
}

/// One indexed field: seek, verify the recorded ID, decode, assign.
/// Any failure is this field's alone — the caller logs it and moves on.
fn read_one_field<R: Read + Seek>(
    cx: &mut LoadCx,
    blob_r: &mut R,
    obj: &mut dyn BinObject,
    spec: &FieldSpec,
    offset: BlobOffset,
) -> Result<()> {
    blob_r.seek(SeekFrom::Start(offset.to_u64()?))?;

    let stored_id = FieldId::deser(blob_r)?;
    if stored_id != spec.id {
        return Err(anyhow!(
            "Recorded field ID {} does not match; the index entry is corrupt.",
            *stored_id
        ));
    }

    let mut val = None;
    if let Some(hook) = cx.hook.take() {
        let res = hook(&mut *blob_r, &spec.kind);
        cx.hook = Some(hook);
        val = res?;
    }
    if val.is_none() {
        val = rw::read_value(cx, blob_r, &spec.kind)?;
    }

    match val {
        None => Err(anyhow!(
            "Stored value is unusable for destination kind {:?}.",
            spec.kind
        )),
        Some(val) => {
            if (spec.set)(obj, val) {
                Ok(())
            } else {
                Err(anyhow!("Destination refused the decoded value."))
            }
        }
    }
}

/// Skips a whole block (positioned after its `Class` tag) through its
/// length prefix, keeping sibling data aligned.
pub(crate) fn skip_class<R: Read + Seek>(r: &mut R) -> Result<()> {
    let block_len = BlockLen::deser(r)?;
    r.seek(SeekFrom::Current(i64::from(*block_len)))?;
    Ok(())
}
