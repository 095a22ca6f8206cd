//! Per-platform default tables and role initialization.
//!
//! The resolution algorithm itself is platform-independent; what varies per
//! operating system is only the table of environment variable names and fallback
//! defaults below. [`BaseDirs::resolve`] selects the host table once and returns the
//! per-role [`BaseDir`] instances as plain values, to be passed around explicitly by
//! the embedding application.

use crate::dir::BaseDir;
use crate::os::env::Env;

/// Operating systems with distinct default tables.
///
/// Unixes other than macOS follow the Linux table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// The platform this build is running on.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    const fn defaults(self) -> &'static PlatformDefaults {
        match self {
            Self::Linux => &LINUX,
            Self::MacOs => &MACOS,
            Self::Windows => &WINDOWS,
        }
    }
}

/// Environment variable names and fallback defaults for one role.
struct RoleDefaults {
    home_var: &'static str,
    home_default: &'static str,
    dirs_var: Option<&'static str>,
    dirs_defaults: &'static [&'static str],
}

impl RoleDefaults {
    fn resolve(&self, env: &Env) -> BaseDir {
        BaseDir::from_env(
            env,
            self.home_var,
            self.home_default,
            self.dirs_var,
            self.dirs_defaults,
        )
    }
}

struct PlatformDefaults {
    config: RoleDefaults,
    data: RoleDefaults,
    cache: RoleDefaults,
}

const LINUX: PlatformDefaults = PlatformDefaults {
    config: RoleDefaults {
        home_var: "XDG_CONFIG_HOME",
        home_default: "~/.config",
        dirs_var: Some("XDG_CONFIG_DIRS"),
        dirs_defaults: &["/etc/xdg"],
    },
    data: RoleDefaults {
        home_var: "XDG_DATA_HOME",
        home_default: "~/.local/share",
        dirs_var: Some("XDG_DATA_DIRS"),
        dirs_defaults: &["/usr/local/share/", "/usr/share/"],
    },
    cache: RoleDefaults {
        home_var: "XDG_CACHE_HOME",
        home_default: "~/.cache",
        dirs_var: None,
        dirs_defaults: &[],
    },
};

const MACOS: PlatformDefaults = PlatformDefaults {
    config: RoleDefaults {
        home_var: "XDG_CONFIG_HOME",
        home_default: "~/.config",
        dirs_var: Some("XDG_CONFIG_DIRS"),
        dirs_defaults: &["/etc/xdg"],
    },
    data: RoleDefaults {
        home_var: "XDG_DATA_HOME",
        home_default: "~/Library/Application Support",
        dirs_var: Some("XDG_DATA_DIRS"),
        dirs_defaults: &["/usr/local/share/", "/usr/share/"],
    },
    cache: RoleDefaults {
        home_var: "XDG_CACHE_HOME",
        home_default: "~/Library/Caches",
        dirs_var: None,
        dirs_defaults: &[],
    },
};

const WINDOWS: PlatformDefaults = PlatformDefaults {
    config: RoleDefaults {
        home_var: "XDG_CONFIG_HOME",
        home_default: "~/.config",
        dirs_var: Some("XDG_CONFIG_DIRS"),
        dirs_defaults: &[],
    },
    data: RoleDefaults {
        home_var: "XDG_DATA_HOME",
        home_default: "~/.local/share",
        dirs_var: Some("XDG_DATA_DIRS"),
        dirs_defaults: &[],
    },
    cache: RoleDefaults {
        home_var: "XDG_CACHE_HOME",
        home_default: "~/.cache",
        dirs_var: None,
        dirs_defaults: &[],
    },
};

// Toolchain roots are resolved the same way everywhere.
const TOOLCHAIN: RoleDefaults = RoleDefaults {
    home_var: "GOROOT",
    home_default: "",
    dirs_var: Some("GOPATH"),
    dirs_defaults: &[],
};

/// The resolved base directories for every role.
///
/// Construct once at process startup from an environment snapshot and hand the
/// instances (or the whole struct) to whoever needs them; the lists never change
/// afterwards.
#[derive(Debug, Clone)]
pub struct BaseDirs {
    /// Configuration files.
    pub config: BaseDir,
    /// Application data files.
    pub data: BaseDir,
    /// Non-essential data files.
    pub cache: BaseDir,
    /// Toolchain root search paths (`GOROOT`/`GOPATH`).
    pub toolchain: BaseDir,
}

impl BaseDirs {
    /// Resolve every role for the platform this build is running on.
    pub fn resolve(env: &Env) -> Self {
        Self::resolve_for(env, Platform::current())
    }

    /// Resolve every role against a specific platform's default table.
    pub fn resolve_for(env: &Env, platform: Platform) -> Self {
        let defaults = platform.defaults();
        Self {
            config: defaults.config.resolve(env),
            data: defaults.data.resolve(env),
            cache: defaults.cache.resolve(env),
            toolchain: TOOLCHAIN.resolve(env),
        }
    }
}
