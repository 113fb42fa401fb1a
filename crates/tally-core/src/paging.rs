//! Page size type shared by queries and settings.

use std::fmt;
use std::num::NonZeroUsize;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Number of rows per page.
///
/// Serialized as an integer, or the string `"all"`. Zero also reads as `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// Every matched row on a single page.
    All,
    /// A fixed number of rows per page.
    Fixed(NonZeroUsize),
}

impl PageSize {
    /// Create a fixed page size; zero means all.
    pub fn rows(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(PageSize::All, PageSize::Fixed)
    }

    /// The fixed size, if any.
    pub fn limit(&self) -> Option<usize> {
        match self {
            PageSize::All => None,
            PageSize::Fixed(n) => Some(n.get()),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::rows(10)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::All => f.write_str("all"),
            PageSize::Fixed(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::All => serializer.serialize_str("all"),
            PageSize::Fixed(n) => serializer.serialize_u64(n.get() as u64),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PageSizeVisitor;

        impl Visitor<'_> for PageSizeVisitor {
            type Value = PageSize;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or \"all\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PageSize, E> {
                Ok(PageSize::rows(v as usize))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PageSize, E> {
                if v < 0 {
                    return Err(E::custom("page size cannot be negative"));
                }
                Ok(PageSize::rows(v as usize))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PageSize, E> {
                if v.eq_ignore_ascii_case("all") {
                    Ok(PageSize::All)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(PageSizeVisitor)
    }
}
