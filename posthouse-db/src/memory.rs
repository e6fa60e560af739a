use crate::{client::Result, collection::PostCollection};
use async_trait::async_trait;
use posthouse_common::model::{
    Id,
    ack::{DeleteAck, InsertAck, UpdateAck},
    post::{Post, PostFields, PostMarker},
};
use tokio::sync::RwLock;
use tracing::debug;

/// A [`PostCollection`] kept in process memory, in insertion order.
///
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPostCollection {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostCollection for MemoryPostCollection {
    async fn find_all(&self) -> Result<Vec<Post>> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_by_id(&self, id: Id<PostMarker>) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn insert(&self, fields: &PostFields) -> Result<InsertAck> {
        let id = Id::generate();
        self.posts.write().await.push(Post {
            id,
            fields: fields.clone(),
        });
        debug!(%id, "Inserted post");

        Ok(InsertAck::new(id))
    }

    async fn update_fields(&self, id: Id<PostMarker>, fields: &PostFields) -> Result<UpdateAck> {
        let mut posts = self.posts.write().await;

        let ack = match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => UpdateAck::new(1, post.fields.replace_with(fields).into()),
            None => UpdateAck::new(0, 0),
        };
        debug!(%id, matched = ack.matched_count, modified = ack.modified_count, "Updated post");

        Ok(ack)
    }

    async fn delete_by_id(&self, id: Id<PostMarker>) -> Result<DeleteAck> {
        let mut posts = self.posts.write().await;

        let before = posts.len();
        posts.retain(|post| post.id != id);
        let deleted = before - posts.len();
        debug!(%id, deleted, "Deleted post");

        Ok(DeleteAck::new(deleted as u64))
    }
}

#[cfg(test)]
mod tests {
    use crate::{collection::PostCollection, memory::MemoryPostCollection};
    use mongodb::bson::Bson;
    use posthouse_common::model::{
        Id,
        ack::{DeleteAck, UpdateAck},
        post::{PostFields, PostMarker},
    };

    fn full_fields() -> PostFields {
        PostFields {
            title: Some("A".into()),
            description: Some("B".into()),
            content: Some("C".into()),
            author: Some("D".into()),
            date_created: Some("2024-01-01".into()),
        }
    }

    #[tokio::test]
    async fn insert_assigns_fresh_ids_and_keeps_order() {
        let posts = MemoryPostCollection::new();

        let first = posts.insert(&full_fields()).await.unwrap();
        let second = posts.insert(&PostFields::default()).await.unwrap();
        assert_ne!(first.inserted_id, second.inserted_id);
        assert!(first.acknowledged);

        let all = posts.find_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|post| post.id).collect();
        assert_eq!(ids, [first.inserted_id, second.inserted_id]);
        assert_eq!(all[0].fields, full_fields());
        assert_eq!(all[1].fields, PostFields::default());
    }

    #[tokio::test]
    async fn find_by_id_misses_unknown_ids() {
        let posts = MemoryPostCollection::new();
        posts.insert(&full_fields()).await.unwrap();

        let found = posts.find_by_id(Id::generate()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn update_replaces_all_five_fields() {
        let posts = MemoryPostCollection::new();
        let id = posts.insert(&full_fields()).await.unwrap().inserted_id;

        let update = PostFields {
            title: Some("X".into()),
            ..PostFields::default()
        };
        assert_eq!(
            posts.update_fields(id, &update).await.unwrap(),
            UpdateAck::new(1, 1)
        );

        let stored = posts.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(
            stored.fields,
            PostFields {
                title: Some("X".into()),
                description: Some(Bson::Null),
                content: Some(Bson::Null),
                author: Some(Bson::Null),
                date_created: Some(Bson::Null),
            }
        );
    }

    #[tokio::test]
    async fn update_reports_zero_counts_without_error() {
        let posts = MemoryPostCollection::new();
        let id = posts.insert(&full_fields()).await.unwrap().inserted_id;

        let unknown: Id<PostMarker> = Id::generate();
        assert_eq!(
            posts.update_fields(unknown, &full_fields()).await.unwrap(),
            UpdateAck::new(0, 0)
        );
        assert_eq!(
            posts.update_fields(id, &full_fields()).await.unwrap(),
            UpdateAck::new(1, 0)
        );
        assert_eq!(
            posts.update_fields(id, &PostFields::default()).await.unwrap(),
            UpdateAck::new(1, 1)
        );
        assert_eq!(
            posts.update_fields(id, &PostFields::default()).await.unwrap(),
            UpdateAck::new(1, 0)
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let posts = MemoryPostCollection::new();
        let id = posts.insert(&full_fields()).await.unwrap().inserted_id;

        assert_eq!(posts.delete_by_id(id).await.unwrap(), DeleteAck::new(1));
        assert_eq!(posts.delete_by_id(id).await.unwrap(), DeleteAck::new(0));
        assert!(posts.find_by_id(id).await.unwrap().is_none());
        assert!(posts.find_all().await.unwrap().is_empty());
    }
}
