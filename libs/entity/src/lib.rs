pub mod post;
pub mod post_click;
pub mod post_filter;
pub mod prefecture;

pub mod prelude {
    pub use crate::post::Post as PostEntity;
    pub use crate::post::PostDraft;
    pub use crate::post::PostType;
    pub use crate::post_click::PostClick as PostClickEntity;
    pub use crate::post_filter::PostFilter;
    pub use crate::prefecture::{Prefecture, Region};
}
