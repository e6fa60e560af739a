use crate::server::{Result, ServerError, ServerRouter};
use axum::{Json, extract::State};
use axum_extra::{
    extract::WithRejection,
    routing::{RouterExt, TypedPath},
};
use posthouse_common::model::{
    Id,
    ack::{DeleteAck, InsertAck, UpdateAck},
    post::{Post, PostFields, PostMarker},
};
use posthouse_db::collection::PostCollection;
use serde::Deserialize;
use std::sync::Arc;

type Posts = State<Arc<dyn PostCollection>>;
type Body = WithRejection<Json<PostFields>, ServerError>;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_get(get_post)
        .typed_post(create_post)
        .typed_put(update_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

/// The id stays a plain string until the handler parses it, so a malformed id
/// is reported as such instead of as a generic path rejection.
#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: String,
}

impl PostPath {
    fn post_id(&self) -> Result<Id<PostMarker>> {
        Ok(self.id.parse()?)
    }
}

async fn list_posts(PostsPath(): PostsPath, State(posts): Posts) -> Result<Json<Vec<Post>>> {
    let all = posts.find_all().await?;
    if all.is_empty() {
        return Err(ServerError::NoPosts);
    }

    Ok(Json(all))
}

async fn get_post(path: PostPath, State(posts): Posts) -> Result<Json<Post>> {
    let id = path.post_id()?;
    let post = posts
        .find_by_id(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(posts): Posts,
    WithRejection(Json(fields), _): Body,
) -> Result<Json<InsertAck>> {
    let ack = posts.insert(&fields).await?;

    Ok(Json(ack))
}

// Replaces all five fields. Matching nothing is not an error here, unlike the
// reads above.
async fn update_post(
    path: PostPath,
    State(posts): Posts,
    WithRejection(Json(fields), _): Body,
) -> Result<Json<UpdateAck>> {
    let id = path.post_id()?;
    let ack = posts.update_fields(id, &fields).await?;

    Ok(Json(ack))
}

async fn delete_post(path: PostPath, State(posts): Posts) -> Result<Json<DeleteAck>> {
    let id = path.post_id()?;
    let ack = posts.delete_by_id(id).await?;

    Ok(Json(ack))
}
