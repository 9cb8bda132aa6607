//! Domain entities - the core business objects.

mod page;
mod post;

pub use page::{Page, page_offset};
pub use post::{NewPost, Post, PostId};
