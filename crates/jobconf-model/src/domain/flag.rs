use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Boolean switch read from a property value.
///
/// Property values are strings; a flag accepts `true`/`false` in any case,
/// surrounding whitespace ignored. Unset flags are disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(bool);

impl Flag {
    pub const fn enabled() -> Self {
        Self(true)
    }

    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    pub const fn is_disabled(&self) -> bool {
        !self.0
    }
}

impl FromStr for Flag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim();
        if norm.eq_ignore_ascii_case("true") {
            Ok(Self(true))
        } else if norm.eq_ignore_ascii_case("false") {
            Ok(Self(false))
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "true" } else { "false" })
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<Flag> for bool {
    fn from(f: Flag) -> Self {
        f.0
    }
}
