//! Plain-post routes over the in-memory repository.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use amigo_core::domain::{Post, PostBody};
use amigo_shared::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(post: &Post) -> PostResponse {
    let (post_type, content, title, country, cover_url) = match &post.body {
        PostBody::Plain { content } => ("plain", Some(content.clone()), None, None, None),
        PostBody::Blog(blog) => (
            "blog",
            None,
            Some(blog.title.clone()),
            Some(blog.country.clone()),
            blog.blocks.first().and_then(|b| b.url.clone()),
        ),
    };
    PostResponse {
        id: post.id.to_string(),
        user_id: post.user_id.to_string(),
        post_type: post_type.to_owned(),
        created_at: post.created_at.to_rfc3339(),
        content,
        title,
        country,
        cover_url,
    }
}

/// GET /api/posts - the feed listing, newest first, served through the
/// invalidation cache.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.clone();
    let listing = state
        .feed_cache
        .get_or_fetch("posts", move || async move {
            let posts = posts
                .list()
                .await
                .map_err(|e| amigo_core::ports::CacheError::Operation(e.to_string()))?;
            let responses: Vec<PostResponse> = posts.iter().map(to_response).collect();
            serde_json::to_string(&responses)
                .map_err(|e| amigo_core::ports::CacheError::Serialization(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(listing))
}

/// POST /api/posts - publish a plain post.
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user_id = Uuid::parse_str(&req.user_id)
        .map_err(|_| AppError::BadRequest("user_id is not a valid id".to_owned()))?;

    let post = Post::new_plain(user_id, req.content)?;
    let saved = state.posts.save(post).await?;
    Ok(HttpResponse::Created().json(to_response(&saved)))
}

/// PUT /api/posts/{id} - targeted edit of a plain post's content.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    amigo_core::domain::post::validate_plain_content(&req.content)?;
    state.posts.update_content(id, req.content).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
