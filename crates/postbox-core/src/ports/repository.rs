use async_trait::async_trait;

use crate::domain::{NewPost, Page, Post, PostId};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist changes to an existing entity.
    ///
    /// Returns `RepoError::NotFound` if the entity no longer exists.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Returns `RepoError::NotFound` if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Insert a new post, letting the store assign id and timestamps.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Fetch one page of posts ordered by ascending id. `page` is 1-based.
    async fn paginate(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError>;
}
