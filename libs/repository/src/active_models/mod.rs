//! sea-orm models of the tables created by `migration`.

pub mod prelude;

pub mod post;
pub mod post_click;
