use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque registration token backed by ULID.
///
/// Identifies the registering unit (typically a controller instance)
/// that contributed a [`RouteSet`](crate::route::RouteSet). Owners are
/// compared only for equality and grouping; the registry never
/// introspects them. A fresh token per registration avoids leaning on
/// reference identity.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct OwnerId(pub ulid::Ulid);

impl OwnerId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn from_ulid(id: ulid::Ulid) -> Self {
        Self(id)
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(OwnerId(id))
    }
}

impl Serialize for OwnerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OwnerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<OwnerId>()
            .map_err(|_| serde::de::Error::custom("invalid owner id"))
    }
}
