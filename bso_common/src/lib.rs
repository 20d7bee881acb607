mod binding;
pub mod fs_utils;

pub use binding::*;
