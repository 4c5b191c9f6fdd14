//! Cache key definitions.
//!
//! Keys are plain strings of the form `prefix:param:param`. Each content
//! resource owns one prefix, and the prefixes never occur inside one another,
//! so substring invalidation by prefix only touches that resource's keys.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use super::tier::TierName;

const SEPARATOR: &str = ":";

/// One parameter of a cache key. `Missing` parameters are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParam<'a> {
    Text(Cow<'a, str>),
    Missing,
}

impl<'a> From<&'a str> for KeyParam<'a> {
    fn from(value: &'a str) -> Self {
        KeyParam::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for KeyParam<'a> {
    fn from(value: &'a String) -> Self {
        KeyParam::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for KeyParam<'_> {
    fn from(value: String) -> Self {
        KeyParam::Text(Cow::Owned(value))
    }
}

impl From<Uuid> for KeyParam<'_> {
    fn from(value: Uuid) -> Self {
        KeyParam::Text(Cow::Owned(value.to_string()))
    }
}

macro_rules! key_param_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for KeyParam<'_> {
                fn from(value: $ty) -> Self {
                    KeyParam::Text(Cow::Owned(value.to_string()))
                }
            }
        )*
    };
}

key_param_from_number!(i32, i64, u32, u64, usize);

impl<'a, T> From<Option<T>> for KeyParam<'a>
where
    T: Into<KeyParam<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(KeyParam::Missing, Into::into)
    }
}

/// Build a cache key from a prefix and ordered parameters, dropping missing ones.
///
/// Prefer the [`cache_key!`](crate::cache_key) macro at call sites.
pub fn cache_key(prefix: &str, params: &[KeyParam<'_>]) -> String {
    let mut key = String::from(prefix);
    for param in params {
        if let KeyParam::Text(text) = param {
            key.push_str(SEPARATOR);
            key.push_str(text);
        }
    }
    key
}

/// Variadic form of [`cache_key`](crate::cache::cache_key).
///
/// ```
/// use bandstand::cache_key;
///
/// let missing: Option<u32> = None;
/// assert_eq!(cache_key!("inventory", "all", missing), "inventory:all");
/// assert_eq!(cache_key!("events", "city", "Oslo", 2), "events:city:Oslo:2");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr $(, $param:expr)* $(,)?) => {
        $crate::cache::cache_key($prefix, &[$($crate::cache::KeyParam::from($param)),*])
    };
}

/// Content resources served through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Events,
    Videos,
    Lyrics,
    Bio,
    Inventory,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Events,
        Resource::Videos,
        Resource::Lyrics,
        Resource::Bio,
        Resource::Inventory,
    ];

    /// Key prefix, also the invalidation pattern for the resource.
    pub fn prefix(self) -> &'static str {
        match self {
            Resource::Events => "events",
            Resource::Videos => "videos",
            Resource::Lyrics => "lyrics",
            Resource::Bio => "bio",
            Resource::Inventory => "inventory",
        }
    }

    /// Tier holding this resource's keys.
    pub fn tier(self) -> TierName {
        match self {
            Resource::Inventory => TierName::Dynamic,
            Resource::Events => TierName::SemiStatic,
            Resource::Videos | Resource::Lyrics | Resource::Bio => TierName::Static,
        }
    }

    /// Key for the full listing of this resource (`events:all`, `bio:main`, ...).
    pub fn hot_key(self) -> String {
        match self {
            Resource::Bio => cache_key!(self.prefix(), "main"),
            _ => cache_key!(self.prefix(), "all"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Error)]
#[error("unknown resource `{0}`")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.prefix() == value)
            .ok_or_else(|| UnknownResource(value.to_string()))
    }
}
