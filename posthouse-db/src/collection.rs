use crate::{client::Result, record::PostRecord};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Bson, Document, doc},
};
use posthouse_common::model::{
    Id, ModelValidationError,
    ack::{DeleteAck, InsertAck, UpdateAck},
    post::{Post, PostFields, PostMarker},
};
use std::fmt::Debug;
use tracing::debug;

/// The store operations the post routes are built on.
///
/// Reads report absence as an empty `Vec` or `None`; writes always report
/// counts, including zero.
#[async_trait]
pub trait PostCollection: Debug + Send + Sync {
    /// Every post, in store order.
    async fn find_all(&self) -> Result<Vec<Post>>;

    async fn find_by_id(&self, id: Id<PostMarker>) -> Result<Option<Post>>;

    /// Stores a new post with exactly the present fields and lets the store assign its id.
    async fn insert(&self, fields: &PostFields) -> Result<InsertAck>;

    /// Sets all five fields on the post with the given id, writing null for
    /// the ones absent from `fields`. Other stored keys are left alone.
    async fn update_fields(&self, id: Id<PostMarker>, fields: &PostFields) -> Result<UpdateAck>;

    async fn delete_by_id(&self, id: Id<PostMarker>) -> Result<DeleteAck>;
}

#[derive(Clone, Debug)]
pub struct MongoPostCollection {
    collection: Collection<PostRecord>,
}

impl MongoPostCollection {
    #[must_use]
    pub(crate) fn new(collection: Collection<PostRecord>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl PostCollection for MongoPostCollection {
    async fn find_all(&self) -> Result<Vec<Post>> {
        let records: Vec<PostRecord> = self.collection.find(doc! {}).await?.try_collect().await?;
        debug!(count = records.len(), "Fetched all posts");

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn find_by_id(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn insert(&self, fields: &PostFields) -> Result<InsertAck> {
        let result = self
            .collection
            .clone_with_type::<PostFields>()
            .insert_one(fields)
            .await?;

        let Bson::ObjectId(object_id) = result.inserted_id else {
            return Err(ModelValidationError::ForeignId(result.inserted_id.to_string()).into());
        };
        debug!(id = %object_id, "Inserted post");

        Ok(InsertAck::new(object_id.into()))
    }

    async fn update_fields(&self, id: Id<PostMarker>, fields: &PostFields) -> Result<UpdateAck> {
        let set: Document = fields
            .replacement()
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect();

        let result = self
            .collection
            .update_one(doc! { "_id": id.object_id() }, doc! { "$set": set })
            .await?;
        debug!(%id, matched = result.matched_count, modified = result.modified_count, "Updated post");

        Ok(UpdateAck::new(result.matched_count, result.modified_count))
    }

    async fn delete_by_id(&self, id: Id<PostMarker>) -> Result<DeleteAck> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        debug!(%id, deleted = result.deleted_count, "Deleted post");

        Ok(DeleteAck::new(result.deleted_count))
    }
}
