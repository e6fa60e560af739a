pub mod ack;
pub mod post;

use bson::oid::ObjectId;
use derive_where::derive_where;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    marker::PhantomData,
    str::FromStr,
};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error("Stored document has a non-ObjectId _id: {0}")]
    ForeignId(String),
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Not a valid 24 character hex object id: {0:?}")]
pub struct InvalidIdError(String);

/// A store-assigned document id, tagged with the kind of document it refers to.
///
/// Renders as the lowercase hex form of the underlying [`ObjectId`], both in
/// JSON and in URLs.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Id<Marker>(ObjectId, PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(object_id: ObjectId) -> Self {
        Self(object_id, PhantomData)
    }

    #[must_use]
    pub fn generate() -> Self {
        Self::new(ObjectId::new())
    }

    #[must_use]
    pub fn object_id(self) -> ObjectId {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> FromStr for Id<Marker> {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self::new)
            .map_err(|_| InvalidIdError(s.to_owned()))
    }
}

impl<Marker> From<ObjectId> for Id<Marker> {
    fn from(value: ObjectId) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for ObjectId {
    fn from(value: Id<Marker>) -> Self {
        value.0
    }
}

impl<Marker> Serialize for Id<Marker> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de, Marker> Deserialize<'de> for Id<Marker> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        inner
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(&inner), &"a hex object id"))
    }
}
