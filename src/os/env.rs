use std::collections::HashMap;
use std::ffi::{OsStr, OsString};

use thiserror::Error;

/// Immutable snapshot of the process environment, taken at construction.
///
/// Directory resolution reads environment variables exactly once, through a snapshot,
/// so later `set_var` calls never change an already built directory list. A snapshot
/// can also be built from an arbitrary map, which is how tests inject a synthetic
/// environment without touching process-global state.
///
/// On Windows, lookups that miss fall back to case-insensitive matching, since the OS
/// treats variable names case-insensitively.
#[derive(Debug, Clone)]
pub struct Env {
    vars: HashMap<OsString, OsString>,

    folded_vars: HashMap<OsString, OsString>,
}

/// Errors encountered when reading an environment variable as UTF-8.
#[derive(Debug, Clone, Error)]
pub enum EnvError {
    /// This variant indicates, that variable `$Missing.0` is not set.
    #[error("there is no environment variable `${0:?}`")]
    Missing(OsString),

    /// This variant indicates, that variable `$NotUnicode.0` is not an UTF-8 string.
    #[error("environment variable `${0:?}` is not an UTF-8 string")]
    NotUnicode(OsString),
}

impl Env {
    /// Snapshot the current process environment via [`std::env::vars_os`].
    pub fn new() -> Self {
        Self::from_vars(std::env::vars_os().collect())
    }

    /// Build a snapshot from `vars` instead of the process environment.
    pub fn from_vars(vars: HashMap<OsString, OsString>) -> Self {
        let folded_vars = vars
            .iter()
            .map(|(key, value)| (Env::fold_key(key), value.clone()))
            .collect();
        Self { vars, folded_vars }
    }

    fn fold_key(key: impl AsRef<OsStr>) -> OsString {
        key.as_ref().to_ascii_uppercase()
    }

    /// Get the raw value of the variable `key`.
    ///
    /// # Returns
    /// `Option<&OsStr>`. `None` variant indicates a missing key, `Some`: an existing key.
    pub fn get_os(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        match self.vars.get(key) {
            Some(value) => Some(value),
            None => {
                if cfg!(target_os = "windows") {
                    self.folded_vars
                        .get(&Env::fold_key(key))
                        .map(|value| value.as_ref())
                } else {
                    None
                }
            }
        }
    }

    /// Get the value of the variable `key` as UTF-8.
    ///
    /// # Returns
    /// `Result<&str, EnvError>`. `Ok` variant indicates an existing UTF-8 variable,
    /// `Err` a missing or non-UTF-8 one. See [`EnvError`] for details.
    ///
    /// # Examples
    /// ```rust
    /// use dirstack::os::env::Env;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let env = Env::new();
    /// let _path = env.get("PATH")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, key: impl AsRef<OsStr>) -> Result<&str, EnvError> {
        let key = key.as_ref();
        self.get_os(key)
            .ok_or_else(|| EnvError::Missing(key.to_os_string()))?
            .to_str()
            .ok_or_else(|| EnvError::NotUnicode(key.to_os_string()))
    }

    /// Lookup used by path resolution: a variable that is unset, empty, or not UTF-8
    /// counts as absent.
    pub fn get_nonempty(&self, key: impl AsRef<OsStr>) -> Option<&str> {
        self.get(key).ok().filter(|value| !value.is_empty())
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_none, assert_ok_eq, assert_some_eq};

    fn env_of(pairs: &[(&str, &str)]) -> Env {
        Env::from_vars(
            pairs
                .iter()
                .map(|(key, value)| (OsString::from(key), OsString::from(value)))
                .collect(),
        )
    }

    #[test]
    fn missing_variable_is_an_error() {
        let env = env_of(&[]);
        assert_err!(env.get("NO_SUCH_VARIABLE"));
        assert_none!(env.get_os("NO_SUCH_VARIABLE"));
    }

    #[test]
    fn existing_variable_is_returned() {
        let env = env_of(&[("SOME_DIR", "/srv/some")]);
        assert_ok_eq!(env.get("SOME_DIR"), "/srv/some");
    }

    #[test]
    fn empty_variable_counts_as_absent_for_nonempty_lookup() {
        let env = env_of(&[("SOME_DIR", "")]);
        assert_ok_eq!(env.get("SOME_DIR"), "");
        assert_none!(env.get_nonempty("SOME_DIR"));
    }

    #[test]
    fn set_variable_is_returned_by_nonempty_lookup() {
        let env = env_of(&[("SOME_DIR", "/srv/some")]);
        assert_some_eq!(env.get_nonempty("SOME_DIR"), "/srv/some");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_variable_counts_as_absent_for_nonempty_lookup() {
        use std::os::unix::ffi::OsStringExt;
        let mut vars = HashMap::new();
        vars.insert(
            OsString::from("SOME_DIR"),
            OsString::from_vec(vec![0x2f, 0xff, 0xfe]),
        );
        let env = Env::from_vars(vars);
        assert_err!(env.get("SOME_DIR"));
        assert_none!(env.get_nonempty("SOME_DIR"));
    }

    #[cfg(windows)]
    #[test]
    fn lookup_is_case_insensitive() {
        let env = env_of(&[("Path", "C:\\Windows")]);
        assert_ok_eq!(env.get("PATH"), "C:\\Windows");
    }
}
