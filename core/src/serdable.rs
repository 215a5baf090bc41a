use std::{fmt, ops::Deref};

use ::glob::PatternError;
use ::serde::{
    de::{self, Visitor},
    Deserialize,
};

/// A file name glob (`*.cpp`, `[mM]ain.*`) that can be read from config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern(::glob::Pattern);

impl GlobPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        ::glob::Pattern::new(pattern).map(Self)
    }
}

impl Deref for GlobPattern {
    type Target = ::glob::Pattern;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for GlobPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct GlobPatternVisitor;

        impl<'de> Visitor<'de> for GlobPatternVisitor {
            type Value = GlobPattern;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a glob pattern string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Self::Value::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(GlobPatternVisitor)
    }
}
