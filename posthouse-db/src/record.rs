use mongodb::bson::Bson;
use posthouse_common::model::{
    ModelValidationError,
    post::{Post, PostFields},
};
use serde::Deserialize;

/// A post as read back from the store.
///
/// `_id` is kept loose here so a document inserted by some other client with a
/// non-ObjectId id surfaces as a data error instead of a decode failure.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub(crate) struct PostRecord {
    #[serde(rename = "_id")]
    pub id: Bson,
    #[serde(flatten)]
    pub fields: PostFields,
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        let Bson::ObjectId(object_id) = value.id else {
            return Err(ModelValidationError::ForeignId(value.id.to_string()));
        };

        Ok(Self {
            id: object_id.into(),
            fields: value.fields,
        })
    }
}
