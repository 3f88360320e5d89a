//! Trace identifier generation.
//!
//! # Responsibilities
//! - Map configured scheme spellings onto a closed set of algorithms
//! - Produce `prefix + canonical + suffix` tokens
//!
//! # Schemes
//! | Spelling | Scheme          | Canonical form                  | Length |
//! |----------|-----------------|---------------------------------|--------|
//! | `4`      | `RandomV4`      | hyphenated lowercase hex        | 36     |
//! | `7`      | `TimeOrderedV7` | hyphenated lowercase hex        | 36     |
//! | `L`      | `Ulid`          | uppercase Crockford base-32     | 26     |
//!
//! Randomness for UUIDs comes from the OS CSPRNG (`getrandom` via `uuid`);
//! ULIDs draw from the thread-local `rand` CSPRNG. Both are safe to call from
//! any number of tasks at once.

use std::fmt;
use std::str::FromStr;

use ulid::Ulid;
use uuid::Uuid;

use crate::trace::error::InjectorError;

/// Length of a hyphenated UUID.
pub const UUID_LEN: usize = 36;

/// Length of a base-32 ULID.
pub const ULID_LEN: usize = 26;

/// Configuration systems that cannot express an empty string write `""`.
const EMPTY_LITERAL: &str = "\"\"";

/// Identifier algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScheme {
    /// UUID version 4, 122 random bits.
    #[default]
    RandomV4,
    /// UUID version 7, millisecond timestamp followed by random bits.
    TimeOrderedV7,
    /// ULID, millisecond timestamp followed by 80 random bits.
    Ulid,
}

impl IdScheme {
    /// Length of the canonical encoding, without prefix or suffix.
    pub fn canonical_len(self) -> usize {
        match self {
            IdScheme::RandomV4 | IdScheme::TimeOrderedV7 => UUID_LEN,
            IdScheme::Ulid => ULID_LEN,
        }
    }
}

impl FromStr for IdScheme {
    type Err = InjectorError;

    /// Accepts `4`, `7` and `L` in any case; an empty value means `4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "" | "4" => Ok(IdScheme::RandomV4),
            "7" => Ok(IdScheme::TimeOrderedV7),
            "L" => Ok(IdScheme::Ulid),
            _ => Err(InjectorError::InvalidScheme(s.to_string())),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::RandomV4 => write!(f, "4"),
            IdScheme::TimeOrderedV7 => write!(f, "7"),
            IdScheme::Ulid => write!(f, "L"),
        }
    }
}

/// Produces decorated trace identifiers.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    /// `None` when built from an unrecognized spelling.
    scheme: Option<IdScheme>,
    prefix: String,
    suffix: String,
}

impl IdGenerator {
    /// Create a generator for a validated scheme.
    pub fn new(scheme: IdScheme, prefix: &str, suffix: &str) -> Self {
        Self {
            scheme: Some(scheme),
            prefix: normalize_literal(prefix),
            suffix: normalize_literal(suffix),
        }
    }

    /// Create a generator straight from a scheme spelling.
    ///
    /// Boundary API for callers holding an unvalidated spelling; the
    /// injector itself always goes through [`IdGenerator::new`]. Unlike
    /// [`IdScheme::from_str`] this never fails: an unrecognized spelling
    /// produces a generator that emits empty tokens, and this constructor is
    /// the only way to reach that state.
    pub fn from_spelling(scheme: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            scheme: scheme.parse().ok(),
            prefix: normalize_literal(prefix),
            suffix: normalize_literal(suffix),
        }
    }

    pub fn scheme(&self) -> Option<IdScheme> {
        self.scheme
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Generate a new token.
    pub fn generate(&self) -> String {
        let canonical = match self.scheme {
            Some(IdScheme::RandomV4) => Uuid::new_v4().to_string(),
            Some(IdScheme::TimeOrderedV7) => Uuid::now_v7().to_string(),
            Some(IdScheme::Ulid) => Ulid::new().to_string(),
            // Permissive on purpose: no scheme means no token, never a failure.
            None => return String::new(),
        };

        let mut token =
            String::with_capacity(self.prefix.len() + canonical.len() + self.suffix.len());
        token.push_str(&self.prefix);
        token.push_str(&canonical);
        token.push_str(&self.suffix);
        token
    }
}

fn normalize_literal(value: &str) -> String {
    if value == EMPTY_LITERAL {
        String::new()
    } else {
        value.to_string()
    }
}
