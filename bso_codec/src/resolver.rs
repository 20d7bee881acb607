//! External reference resolver.
//!
//! A reference stores where the asset lived at save time: its stable
//! identifier plus the human-readable path as a fallback. Load-time
//! resolution walks identifier, then path, then bare file name, each
//! delegated to the host's asset store; a total miss degrades the field to
//! no value rather than failing anything.

use crate::rw::{LoadCx, SaveCx};
use anyhow::Result;
use bso_types::serde::{deser_str_body, ser_str_body, Value, ValueType, ValueTypeInt};
use bso_types::types::{Asset, SharedAsset};
use std::io::{Read, Seek, Write};

/// Writes one external reference: `Asset` tag, identifier, path.
///
/// An asset the store cannot locate is written as `Null` (logged). An
/// asset that owns its own serialized file gets its cascade hook invoked
/// after the reference is written, so referencing a document keeps the
/// document itself fresh on disk.
pub(crate) fn write_asset_ref<W: Write>(
    cx: &mut SaveCx,
    w: &mut W,
    asset: &SharedAsset,
) -> Result<()> {
    let location = match cx.store.location_of(asset.as_ref()) {
        None => {
            tracing::error!(
                "Asset of type {} has no location in the store; writing Null.",
                asset.type_label()
            );
            return Value::ser_null(w);
        }
        Some(location) => location,
    };

    w.write_all(&ValueTypeInt::from(ValueType::Asset).to_le_bytes())?;
    ser_str_body(w, &location.guid)?;
    ser_str_body(w, &location.path)?;

    asset.referenced_save(cx.store, &location)?;

    Ok(())
}

/// Reads one external reference (positioned after its `Asset` tag) and
/// resolves it: identifier first, then path, then bare file name.
/// `Ok(None)` when every lookup misses — the field is left at its default.
pub(crate) fn read_asset_ref<R: Read + Seek>(
    cx: &mut LoadCx,
    r: &mut R,
    type_label: &str,
) -> Result<Option<Value>> {
    let guid = deser_str_body(r)?;
    let path = deser_str_body(r)?;

    let mut asset = cx.store.resolve_id(&guid);
    if asset.is_none() && !path.is_empty() {
        asset = cx.store.resolve_path(&path);
    }
    if asset.is_none() {
        if let Some(name) = bso_common::fs_utils::bare_name(&path) {
            asset = cx.store.resolve_bare_name(name, type_label);
        }
    }

    match asset {
        None => {
            tracing::info!("External reference unresolved (guid {guid:?}, path {path:?}).");
            Ok(None)
        }
        Some(asset) => Ok(Some(Value::Asset(asset))),
    }
}
