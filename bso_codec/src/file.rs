use crate::block;
use crate::envelope::Envelope;
use crate::rw::{LoadCx, OnFieldRead, OnFieldWrite, SaveCx};
use anyhow::{anyhow, Context, Result};
use bso_common::{fs_utils, FileBinding};
use bso_types::serde::{ValueType, ValueTypeInt};
use bso_types::types::{AssetStore, BinObject};
use shorthand::ShortHand;
use std::fs::File;
use std::io::{BufReader, BufWriter, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// One serialized object file: a location binding plus the save/load
/// operations against it.
///
/// Bind a location once (by path or by stable identifier), then save and
/// load against it repeatedly. Each operation opens its own scoped stream
/// and closes it on every path, success or failure.
#[derive(ShortHand, Clone, Default, Debug)]
#[shorthand(disable(set))]
pub struct BsoFile {
    binding: FileBinding,
}

impl BsoFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            binding: FileBinding::from_path(path),
        }
    }

    pub fn at_guid<S: Into<String>>(guid: S) -> Self {
        Self {
            binding: FileBinding::from_guid(guid),
        }
    }

    pub fn bind_path<P: AsRef<Path>>(&mut self, path: P) {
        self.binding = FileBinding::from_path(path);
    }

    pub fn bind_guid<S: Into<String>>(&mut self, guid: S) {
        self.binding = FileBinding::from_guid(guid);
    }

    /// Binds `path` and saves there; later argument-less calls reuse it.
    pub fn save_at<P: AsRef<Path>>(
        &mut self,
        path: P,
        obj: &dyn BinObject,
        store: &dyn AssetStore,
    ) -> Result<()> {
        self.bind_path(path);
        self.save(obj, store)
    }

    /// Binds `path` and loads from there; later argument-less calls reuse
    /// it.
    pub fn load_from<P: AsRef<Path>>(
        &mut self,
        path: P,
        obj: &mut dyn BinObject,
        store: &dyn AssetStore,
    ) -> Result<()> {
        self.bind_path(path);
        self.load_into(obj, store)
    }

    fn resolve_binding(&self, store: &dyn AssetStore) -> Result<PathBuf> {
        if self.binding.is_empty() {
            return Err(anyhow!("No file location bound."));
        }
        match &self.binding {
            FileBinding::Empty => Err(anyhow!("No file location bound.")),
            FileBinding::Path(path) => Ok(path.clone()),
            FileBinding::Guid(guid) => store
                .path_of_id(guid)
                .ok_or(anyhow!("No path for the bound identifier {guid:?}.")),
        }
    }

    /// Writes the envelope and `obj`'s whole object tree to the bound
    /// location, creating parent directories and the file as needed.
    pub fn save(&self, obj: &dyn BinObject, store: &dyn AssetStore) -> Result<()> {
        self.save_inner(obj, store, None)
    }

    /// [`Self::save`] with a per-field write override; see
    /// [`crate::OnFieldWrite`].
    pub fn save_with(
        &self,
        obj: &dyn BinObject,
        store: &dyn AssetStore,
        hook: &mut OnFieldWrite<'_>,
    ) -> Result<()> {
        self.save_inner(obj, store, Some(hook))
    }

    fn save_inner(
        &self,
        obj: &dyn BinObject,
        store: &dyn AssetStore,
        hook: Option<&mut OnFieldWrite<'_>>,
    ) -> Result<()> {
        let path = self.resolve_binding(store)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_utils::create_dir_all(parent)?;
            }
        }

        let file = fs_utils::open_for_write(&path, true)?;
        let res = Self::write_document(file, obj, store, hook);
        res.with_context(|| format!("save {path:?}"))
    }

    fn write_document(
        file: File,
        obj: &dyn BinObject,
        store: &dyn AssetStore,
        hook: Option<&mut OnFieldWrite<'_>>,
    ) -> Result<()> {
        let mut w = BufWriter::new(file);

        Envelope::current().ser(&mut w)?;

        let mut cx = SaveCx { store, hook };
        block::write_class(&mut cx, &mut w, obj, obj.schema())?;

        w.flush()?;
        Ok(())
    }

    /// Reads the file at the bound location into `obj`.
    ///
    /// A bad magic number (or an unopenable file) is an error and leaves
    /// `obj` untouched. Past the envelope, decoding degrades per field:
    /// whatever matches by ID is assigned, everything else keeps its
    /// current value.
    pub fn load_into(&self, obj: &mut dyn BinObject, store: &dyn AssetStore) -> Result<()> {
        self.load_inner(obj, store, None)
    }

    /// [`Self::load_into`] with a per-field read override; see
    /// [`crate::OnFieldRead`].
    pub fn load_into_with(
        &self,
        obj: &mut dyn BinObject,
        store: &dyn AssetStore,
        hook: &mut OnFieldRead<'_>,
    ) -> Result<()> {
        self.load_inner(obj, store, Some(hook))
    }

    /// Constructs a default `T` and reads the bound file into it.
    pub fn load<T: BinObject + Default>(&self, store: &dyn AssetStore) -> Result<T> {
        let mut obj = T::default();
        self.load_into(&mut obj, store)?;
        Ok(obj)
    }

    fn load_inner(
        &self,
        obj: &mut dyn BinObject,
        store: &dyn AssetStore,
        hook: Option<&mut OnFieldRead<'_>>,
    ) -> Result<()> {
        let path = self.resolve_binding(store)?;
        let file = fs_utils::open_for_read(&path)?;
        let mut r = BufReader::new(file);

        let envelope = Envelope::deser(&mut r).with_context(|| format!("load {path:?}"))?;
        fs_utils::seek(
            &mut r,
            SeekFrom::Start(u64::try_from(envelope.data_start())?),
            &path,
        )?;

        let tag_int = ValueTypeInt::deser(&mut r)?;
        match ValueType::try_from(tag_int) {
            Ok(ValueType::Class) => {
                let schema = obj.schema();
                let mut cx = LoadCx { store, hook };
                block::read_class(&mut cx, &mut r, obj, schema)
                    .with_context(|| format!("load {path:?}"))
            }
            _ => {
                tracing::error!("File {path:?} does not open with an object block; nothing read.");
                Ok(())
            }
        }
    }
}
