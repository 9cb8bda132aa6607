//! In-memory post repository - used when no database is configured, and in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use postbox_core::domain::{NewPost, Page, Post, PostId, page_offset};
use postbox_core::error::RepoError;
use postbox_core::ports::{BaseRepository, PostRepository};

/// Post store backed by an ordered map with async RwLock.
///
/// Ids are assigned from a monotonically increasing counter starting at 1
/// and are never reused. Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<BTreeMap<PostId, Post>>,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored posts.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let post = Post {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: new_post.title,
            created_at: now,
            updated_at: now,
        };

        let mut store = self.store.write().await;
        store.insert(post.id, post.clone());

        Ok(post)
    }

    async fn paginate(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let store = self.store.read().await;
        let skip = page_offset(page, per_page)
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);

        let items = store.values().skip(skip).take(take).cloned().collect();

        Ok(Page {
            items,
            total: store.len() as u64,
            page,
            per_page,
        })
    }
}
