//! Environment-driven construction of base directory lists.
//!
//! A list is resolved from a pair of environment variables: one naming the role's
//! home directory, one holding a platform path list of secondary search directories.
//! Overrides taken from the environment are trusted literally; only the built-in
//! home default is tilde-expanded.

use std::path::PathBuf;

use crate::dir::BaseDir;
use crate::os::{self, env::Env};

impl BaseDir {
    /// Resolve the base directory list for one role from an environment snapshot.
    ///
    /// The home entry comes from `home_var` when set and non-empty, verbatim.
    /// Otherwise `home_default` is used, with a leading `~/` expanded to `HOME` from
    /// the same snapshot, falling back to the current user's home directory and
    /// finally to `.`.
    ///
    /// The secondary entries come from `dirs_var` when it names a variable that is
    /// set and non-empty: the value is split on the platform path-list separator and
    /// the non-empty segments are used *exclusively*, discarding `dirs_defaults`
    /// even when every segment turns out empty. A variable that is unset or set to
    /// the empty string counts as absent and `dirs_defaults` are used verbatim,
    /// with no expansion.
    ///
    /// The result is never empty; see [`BaseDir::from_paths`] for the last resort.
    pub fn from_env(
        env: &Env,
        home_var: &str,
        home_default: &str,
        dirs_var: Option<&str>,
        dirs_defaults: &[&str],
    ) -> Self {
        let home = match env.get_nonempty(home_var) {
            Some(value) => PathBuf::from(value),
            None => PathBuf::from(expand_tilde(env, home_default)),
        };

        let mut paths = vec![home];
        match dirs_var.and_then(|var| env.get_nonempty(var)) {
            Some(list) => paths.extend(std::env::split_paths(list)),
            None => paths.extend(dirs_defaults.iter().map(PathBuf::from)),
        }
        Self::from_paths(paths)
    }
}

/// Expand a leading `~/` in `raw` against the snapshot's `HOME`.
///
/// When `HOME` is unset or empty the current user's home directory is used, and
/// when that cannot be determined either, `~` degrades to `.` with a diagnostic.
fn expand_tilde(env: &Env, raw: &str) -> String {
    shellexpand::tilde_with_context(raw, || expansion_home(env)).into_owned()
}

fn expansion_home(env: &Env) -> Option<String> {
    if let Some(home) = env.get_nonempty("HOME") {
        return Some(home.to_owned());
    }
    if let Some(dir) = os::home()
        && let Some(utf8) = dir.to_str()
    {
        return Some(utf8.to_owned());
    }
    tracing::warn!("unable to determine the user home directory, substituting \".\"");
    Some(String::from("."))
}
