//! An in-memory asset store and the assets the tests reference.

use anyhow::Result;
use bso_codec::BsoFile;
use bso_common::fs_utils;
use bso_types::serde::Value;
use bso_types::types::{
    cast, cast_mut, Asset, AssetLocation, AssetStore, BinObject, ClassSchema, FieldId, FieldSpec,
    SharedAsset, ValueKind,
};
use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::ptr;
use std::sync::Arc;

/// A plain external asset with no file of its own.
pub struct IconAsset {
    pub key: String,
}
impl Asset for IconAsset {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_label(&self) -> &'static str {
        "IconAsset"
    }
}

/// An asset that is itself a codec root: referencing it cascades into a
/// save of its own file next to its registered location.
#[derive(Default)]
pub struct PaletteDoc {
    pub shade: i32,
    pub saves: Cell<u32>,
}
impl BinObject for PaletteDoc {
    fn schema(&self) -> &'static ClassSchema {
        &PALETTE_SCHEMA
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
impl Asset for PaletteDoc {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_label(&self) -> &'static str {
        "PaletteDoc"
    }
    fn referenced_save(&self, store: &dyn AssetStore, location: &AssetLocation) -> Result<()> {
        self.saves.set(self.saves.get() + 1);
        BsoFile::at_path(doc_file_path(&location.path)).save(self, store)
    }
}

/// The document file that backs an asset registered at `asset_path`.
pub fn doc_file_path(asset_path: &str) -> String {
    format!("{asset_path}.bso")
}

fn palette(obj: &dyn BinObject) -> &PaletteDoc {
    cast::<PaletteDoc>(obj).unwrap()
}
fn palette_mut(obj: &mut dyn BinObject) -> &mut PaletteDoc {
    cast_mut::<PaletteDoc>(obj).unwrap()
}
fn construct_palette() -> Box<dyn BinObject> {
    Box::new(PaletteDoc::default())
}

// `saves` is deliberately unregistered: bookkeeping, not data.
pub static PALETTE_SCHEMA: ClassSchema = ClassSchema {
    name: "PaletteDoc",
    parent: None,
    construct: construct_palette,
    fields: &[FieldSpec {
        id: FieldId(1),
        name: "shade",
        kind: ValueKind::I32,
        get: |obj| Value::I32(palette(obj).shade),
        set: |obj, val| match val {
            Value::I32(i) => {
                palette_mut(obj).shade = i;
                true
            }
            _ => false,
        },
    }],
};

#[derive(Default)]
pub struct FakeStore {
    assets: Vec<(AssetLocation, SharedAsset)>,
    paths_by_guid: HashMap<String, PathBuf>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, guid: &str, path: &str, asset: SharedAsset) {
        self.assets.push((
            AssetLocation {
                guid: String::from(guid),
                path: String::from(path),
            },
            asset,
        ));
    }

    pub fn bind_guid_path(&mut self, guid: &str, path: PathBuf) {
        self.paths_by_guid.insert(String::from(guid), path);
    }

    /// Drops the identifier of every registered asset, as if the files
    /// were re-imported and assigned fresh ids.
    pub fn forget_guids(&mut self) {
        for (location, _) in self.assets.iter_mut() {
            location.guid = String::new();
        }
    }

    /// Re-homes every asset to a different directory, keeping file names.
    pub fn scramble_paths(&mut self) {
        for (location, _) in self.assets.iter_mut() {
            location.path = format!("moved/{}", location.path);
        }
    }
}

impl AssetStore for FakeStore {
    fn resolve_id(&self, guid: &str) -> Option<SharedAsset> {
        if guid.is_empty() {
            return None;
        }
        self.assets
            .iter()
            .find(|(location, _)| location.guid == guid)
            .map(|(_, asset)| Arc::clone(asset))
    }

    fn resolve_path(&self, path: &str) -> Option<SharedAsset> {
        self.assets
            .iter()
            .find(|(location, _)| location.path == path)
            .map(|(_, asset)| Arc::clone(asset))
    }

    fn resolve_bare_name(&self, name: &str, type_label: &str) -> Option<SharedAsset> {
        self.assets
            .iter()
            .find(|(location, asset)| {
                fs_utils::bare_name(&location.path) == Some(name)
                    && asset.type_label() == type_label
            })
            .map(|(_, asset)| Arc::clone(asset))
    }

    fn location_of(&self, asset: &dyn Asset) -> Option<AssetLocation> {
        self.assets
            .iter()
            .find(|(_, candidate)| {
                ptr::eq(
                    candidate.as_ref() as *const dyn Asset as *const (),
                    asset as *const dyn Asset as *const (),
                )
            })
            .map(|(location, _)| location.clone())
    }

    fn path_of_id(&self, guid: &str) -> Option<PathBuf> {
        self.paths_by_guid.get(guid).cloned()
    }
}
