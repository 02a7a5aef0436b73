use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub image_url: String,
    pub instagram_url: String,
    pub shop_url: Option<String>,
    pub reserve_url: Option<String>,
    pub prefecture: String,
    pub post_type: PostType,
    pub address: Option<String>,
    pub tags: Vec<String>,
    pub parking: bool,
    pub price_range: Option<String>,
    pub entrance_fee: bool,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Writable part of a post, shared by create and update.
///
/// `posted_at` is only honoured on create; `None` means "now".
#[derive(Debug, Default, PartialEq, Clone)]
pub struct PostDraft {
    pub title: String,
    pub image_url: String,
    pub instagram_url: String,
    pub shop_url: Option<String>,
    pub reserve_url: Option<String>,
    pub prefecture: String,
    pub post_type: PostType,
    pub address: Option<String>,
    pub tags: Vec<String>,
    pub parking: bool,
    pub price_range: Option<String>,
    pub entrance_fee: bool,
    pub posted_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostType {
    #[default]
    Food,
    TouristSpot,
}

/// Trims every tag and drops the blank ones. Duplicates are kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Union of the tags of `posts` without duplicates, in first-seen order.
pub fn distinct_tags(posts: &[Post]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    posts
        .iter()
        .flat_map(|post| post.tags.iter())
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_post_type_wire_names() {
        assert_eq!(PostType::Food.to_string(), "food");
        assert_eq!(PostType::TouristSpot.as_ref(), "tourist_spot");
        assert_eq!(
            PostType::from_str("tourist_spot").unwrap(),
            PostType::TouristSpot
        );
        assert!(PostType::from_str("hotel").is_err());
        assert_eq!(
            serde_json::to_string(&PostType::TouristSpot).unwrap(),
            "\"tourist_spot\""
        );
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags([" 夜景 ", "", "  ", "グルメ", "夜景"]);

        assert_eq!(tags, vec!["夜景", "グルメ", "夜景"]);
    }

    #[test]
    fn test_distinct_tags_keeps_first_seen_order() {
        let posts = vec![
            Post {
                tags: vec!["寺社".into(), "観光地".into()],
                ..Default::default()
            },
            Post {
                tags: vec!["夜景".into(), "寺社".into()],
                ..Default::default()
            },
            Post::default(),
        ];

        assert_eq!(distinct_tags(&posts), vec!["寺社", "観光地", "夜景"]);
    }
}
