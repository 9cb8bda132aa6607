//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};

use postbox_core::domain::{NewPost, Page, Post, page_offset};
use postbox_core::error::RepoError;
use postbox_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let active = post::ActiveModel {
            title: Set(new_post.title),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(post_id = model.id, "Inserted post");

        Ok(model.into())
    }

    async fn paginate(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let paginator = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await.map_err(map_db_err)?;

        // Past the end, or an offset the paginator would overflow computing.
        match page_offset(page, per_page) {
            Some(offset) if offset < total => {}
            _ => return Ok(Page::empty(total, page, per_page)),
        }

        let models = paginator.fetch_page(page - 1).await.map_err(map_db_err)?;

        Ok(Page {
            items: models.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }
}
