pub use super::post::Entity as Post;
pub use super::post_click::Entity as PostClick;
