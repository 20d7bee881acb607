use anyhow::Result;
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

pub type SharedAsset = Arc<dyn Asset>;

/// An object that lives outside the binary block being written — the codec
/// stores a reference to it, never the object itself, and looks it up
/// again at load time through the [`AssetStore`].
pub trait Asset: Any {
    fn as_any(&self) -> &dyn Any;

    /// Label handed to [`AssetStore::resolve_bare_name`] so the store can
    /// filter same-named candidates by type.
    fn type_label(&self) -> &'static str;

    /// Called after a reference to this asset is written.
    ///
    /// An asset that is itself a root of this codec (it owns its own
    /// serialized file) uses this to bind a target location if it has none
    /// yet and run its own full save, in an independent stream scope. The
    /// default does nothing.
    fn referenced_save(&self, _store: &dyn AssetStore, _location: &AssetLocation) -> Result<()> {
        Ok(())
    }
}

/// Where an asset currently lives: a stable identifier plus the
/// human-readable path fallback. Both halves are always written; the
/// identifier is preferred at resolution time.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AssetLocation {
    pub guid: String,
    pub path: String,
}

/// The host asset-management system, seen from the codec's side.
///
/// Lookups return `None` rather than failing; the codec degrades an
/// unresolvable reference to "no value". Implementations own all identity
/// and typing decisions.
pub trait AssetStore {
    fn resolve_id(&self, guid: &str) -> Option<SharedAsset>;
    fn resolve_path(&self, path: &str) -> Option<SharedAsset>;
    /// Last-resort lookup by bare file name (no directory, no extension).
    fn resolve_bare_name(&self, name: &str, type_label: &str) -> Option<SharedAsset>;
    /// The current location of a live asset, or `None` if the store does
    /// not know the asset (in which case a reference to it is unwritable
    /// and encodes as null).
    fn location_of(&self, asset: &dyn Asset) -> Option<AssetLocation>;
    /// Maps a bound identifier to a filesystem path, for files bound by
    /// guid rather than by path.
    fn path_of_id(&self, guid: &str) -> Option<PathBuf>;
}

/// Store for object trees that reference no external assets.
pub struct NoAssets;
impl AssetStore for NoAssets {
    fn resolve_id(&self, _guid: &str) -> Option<SharedAsset> {
        None
    }
    fn resolve_path(&self, _path: &str) -> Option<SharedAsset> {
        None
    }
    fn resolve_bare_name(&self, _name: &str, _type_label: &str) -> Option<SharedAsset> {
        None
    }
    fn location_of(&self, _asset: &dyn Asset) -> Option<AssetLocation> {
        None
    }
    fn path_of_id(&self, _guid: &str) -> Option<PathBuf> {
        None
    }
}
