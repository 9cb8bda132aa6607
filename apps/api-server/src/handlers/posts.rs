//! Post resource handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use postbox_core::RepoError;
use postbox_core::domain::{NewPost, Page, Post, PostId};
use postbox_core::ports::BaseRepository;
use postbox_shared::dto::{PageMeta, PageQuery, PaginatedResponse, PostRequest, PostResponse};
use postbox_shared::field_errors;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u64 = 100;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn paginated_response(page: Page<Post>) -> PaginatedResponse<PostResponse> {
    let page = page.map(post_response);
    let meta = PageMeta {
        current_page: page.page,
        per_page: page.per_page,
        total: page.total,
        last_page: page.last_page(),
        from: page.first_item(),
        to: page.last_item(),
    };

    PaginatedResponse {
        data: page.items,
        meta,
    }
}

fn not_found(id: PostId) -> AppError {
    AppError::NotFound(format!("Post {id} not found"))
}

/// Missing rows surface as 404 for this post rather than a generic message.
fn repo_error(id: PostId) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound => not_found(id),
        other => other.into(),
    }
}

/// Validate the request body and return the trimmed title.
fn validated_title(req: &PostRequest) -> AppResult<String> {
    req.validate()
        .map_err(|e| AppError::Validation(field_errors(&e)))?;

    Ok(req.trimmed_title().unwrap_or_default().to_string())
}

async fn find_post(state: &AppState, id: PostId) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/posts
pub async fn index(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(state.per_page).clamp(1, MAX_PER_PAGE);

    let posts = state.posts.paginate(page, per_page).await?;
    tracing::debug!(
        subject = %identity.subject,
        page,
        per_page,
        total = posts.total,
        "Listed posts"
    );

    Ok(HttpResponse::Ok().json(paginated_response(posts)))
}

/// POST /api/posts
pub async fn store(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let title = validated_title(&body)?;

    let post = state.posts.create(NewPost::new(title)).await?;
    tracing::info!(
        subject = %identity.subject,
        roles = ?identity.roles,
        post_id = post.id,
        "Post created"
    );

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/posts/{id}
pub async fn show(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = find_post(&state, id).await?;
    tracing::debug!(subject = %identity.subject, post_id = id, "Post fetched");

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut post = find_post(&state, id).await?;
    let title = validated_title(&body)?;

    post.retitle(title);
    let post = state.posts.save(post).await.map_err(repo_error(id))?;
    tracing::info!(subject = %identity.subject, post_id = id, "Post updated");

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await.map_err(repo_error(id))?;
    tracing::info!(subject = %identity.subject, post_id = id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
