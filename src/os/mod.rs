//! OS-level helpers: environment snapshots and home directory lookup.

use std::{env::home_dir, path::PathBuf};

pub mod env;

/// Wrapper around [`std::env::home_dir`].
pub fn home() -> Option<PathBuf> {
    home_dir()
}
