use chrono::NaiveDateTime;

#[derive(Debug, Default, PartialEq, Clone)]
pub struct PostClick {
    pub id: i32,
    pub post_id: i32,
    pub clicked_at: NaiveDateTime,
}
