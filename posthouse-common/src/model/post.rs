use crate::model::Id;
use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Id<PostMarker>,
    #[serde(flatten)]
    pub fields: PostFields,
}

/// The five named fields of a post.
///
/// Values are kept exactly as given, whatever their type. `None` means the key
/// was absent; an explicit `null` is kept as [`Bson::Null`].
#[derive(Clone, PartialEq, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Bson>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Bson>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub content: Option<Bson>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub author: Option<Bson>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date_created: Option<Bson>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Bson>, D::Error>
where
    D: Deserializer<'de>,
{
    Bson::deserialize(deserializer).map(Some)
}

impl PostFields {
    /// The values an update writes: all five fields, with absent ones as null.
    #[must_use]
    pub fn replacement(&self) -> [(&'static str, Bson); 5] {
        let value = |field: &Option<Bson>| field.clone().unwrap_or(Bson::Null);

        [
            ("title", value(&self.title)),
            ("description", value(&self.description)),
            ("content", value(&self.content)),
            ("author", value(&self.author)),
            ("dateCreated", value(&self.date_created)),
        ]
    }

    /// Replaces all five fields with `update`, absent ones becoming null.
    ///
    /// Returns whether any stored value actually changed.
    pub fn replace_with(&mut self, update: &PostFields) -> bool {
        let [title, description, content, author, date_created] =
            update.replacement().map(|(_, value)| Some(value));
        let replaced = PostFields {
            title,
            description,
            content,
            author,
            date_created,
        };

        let changed = *self != replaced;
        *self = replaced;
        changed
    }
}
