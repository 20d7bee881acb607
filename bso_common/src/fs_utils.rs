use anyhow::{Context, Result};
use fs2::FileExt;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Scratch parent dir for tests and demos.
pub const ENV_VAR_PARENT_DIR: &str = "BSO_PARENT_DIR";

pub fn default_data_dir() -> PathBuf {
    env::var(ENV_VAR_PARENT_DIR).map_or_else(|_| env::temp_dir().join("bso"), PathBuf::from)
}

pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).with_context(|| format!("create_dir_all {path:?}"))
}

pub fn open_file<P: AsRef<Path>>(path: P, oo: &OpenOptions) -> Result<File> {
    let path = path.as_ref();
    oo.open(path).with_context(|| format!("open {path:?}"))
}

pub fn open_for_read<P: AsRef<Path>>(path: P) -> Result<File> {
    open_file(path, OpenOptions::new().read(true))
}

/// Opens truncated for writing, holding an exclusive advisory lock for the
/// lifetime of the handle. Parent dirs must exist.
pub fn open_for_write<P: AsRef<Path>>(path: P, create: bool) -> Result<File> {
    let path = path.as_ref();
    let file = open_file(
        path,
        OpenOptions::new().write(true).create(create).truncate(true),
    )?;
    file.try_lock_exclusive()
        .context(format!("try_lock_exclusive {path:?}"))?;
    Ok(file)
}

pub fn seek<P: AsRef<Path>>(
    mut seekable: impl Seek,
    sf: SeekFrom,
    implicit_path: P,
) -> Result<u64> {
    seekable
        .seek(sf)
        .with_context(|| format!("seek {:?}", implicit_path.as_ref()))
}

pub fn remove_dir_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::remove_dir_all(path).with_context(|| format!("remove_dir_all {path:?}"))
}

/// The file name a path string points at, minus directories and extension.
/// Separators may be either slash. Empty input gives `None`.
pub fn bare_name(path: &str) -> Option<&str> {
    let name_pos = path.rfind(['/', '\\']).map_or(0, |pos| pos + 1);
    let name = &path[name_pos..];
    let name = match name.rfind('.') {
        Some(0) | None => name,
        Some(ext_pos) => &name[..ext_pos],
    };
    (!name.is_empty()).then_some(name)
}
