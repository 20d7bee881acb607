use std::path::{Path, PathBuf};

/// Where a serialized object file lives.
///
/// A binding is set once (by path or by stable identifier) and then reused
/// by argument-less save/load calls. Identifier bindings are mapped to a
/// concrete path by the host asset store at the moment of use, so a file
/// that moves on disk stays reachable.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum FileBinding {
    #[default]
    Empty,
    Path(PathBuf),
    Guid(String),
}

impl FileBinding {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    pub fn from_guid<S: Into<String>>(guid: S) -> Self {
        Self::Guid(guid.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Path(path) => path.as_os_str().is_empty(),
            Self::Guid(guid) => guid.is_empty(),
        }
    }
}
