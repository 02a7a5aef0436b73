//! Builds the parameterized `SELECT` behind the post search endpoints.
//!
//! Every filter value is bound as a `$n` placeholder, never spliced into the
//! SQL text, and only the filters that are present add a predicate.

use entity::prelude::*;
use sea_orm::{DbBackend, Statement, Value};

const SELECT_POSTS: &str = "SELECT * FROM posts WHERE 1=1";

/// The two flavours of post search exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Prefecture page listing. Free-text search covers the title and every
    /// tag; newest `posted_at` first.
    Listing,
    /// Lightweight search. Free-text search covers the title only; newest
    /// `created_at` first.
    Quick,
}

impl Dialect {
    fn order_by(self) -> &'static str {
        match self {
            Dialect::Listing => " ORDER BY posted_at DESC",
            Dialect::Quick => " ORDER BY created_at DESC",
        }
    }

    fn contains(self, column: &str, index: usize) -> String {
        match self {
            Dialect::Listing => {
                format!(" AND LOWER({column}) LIKE LOWER(${index})")
            }
            Dialect::Quick => format!(" AND {column} ILIKE ${index}"),
        }
    }
}

#[derive(Debug, Default)]
struct QueryBuf {
    sql: String,
    values: Vec<Value>,
}

impl QueryBuf {
    /// Binds `value` and returns its placeholder index.
    fn bind(&mut self, value: impl Into<Value>) -> usize {
        self.values.push(value.into());
        self.values.len()
    }

    fn eq(&mut self, column: &str, value: impl Into<Value>) {
        let index = self.bind(value);
        self.sql.push_str(&format!(" AND {column} = ${index}"));
    }

    fn contains(&mut self, dialect: Dialect, column: &str, needle: &str) {
        let index = self.bind(like_pattern(needle));
        self.sql.push_str(&dialect.contains(column, index));
    }

    fn has_tag(&mut self, tag: &str) {
        let index = self.bind(tag.to_string());
        self.sql.push_str(&format!(" AND ${index} = ANY(tags)"));
    }

    fn title_or_tag_contains(&mut self, needle: &str) {
        let index = self.bind(like_pattern(needle));
        self.sql.push_str(&format!(
            " AND (LOWER(title) LIKE LOWER(${index}) OR EXISTS \
             (SELECT 1 FROM unnest(tags) t WHERE LOWER(t) LIKE LOWER(${index})))"
        ));
    }
}

fn like_pattern(needle: &str) -> String {
    format!("%{needle}%")
}

/// Returns the SQL text and its bound values, in placeholder order.
pub fn build(filter: &PostFilter, dialect: Dialect) -> (String, Vec<Value>) {
    let mut buf = QueryBuf {
        sql: SELECT_POSTS.to_string(),
        values: vec![],
    };

    if let Some(prefecture) = &filter.prefecture {
        buf.eq("prefecture", prefecture.clone());
    }
    if let Some(category) = &filter.category {
        buf.eq("post_type", category.clone());
    }

    match dialect {
        Dialect::Listing => {
            if let Some(address) = &filter.address {
                buf.contains(dialect, "address", address);
            }
            if let Some(parking) = filter.parking {
                buf.eq("parking", parking);
            }
            if let Some(price_range) = &filter.price_range {
                buf.eq("price_range", price_range.clone());
            }
            if let Some(entrance_fee) = filter.entrance_fee {
                buf.eq("entrance_fee", entrance_fee);
            }
            if let Some(tag) = &filter.tag {
                buf.has_tag(tag);
            }
            if let Some(search) = &filter.search {
                buf.title_or_tag_contains(search);
            }
        }
        Dialect::Quick => {
            if let Some(price_range) = &filter.price_range {
                buf.eq("price_range", price_range.clone());
            }
            if let Some(parking) = filter.parking {
                buf.eq("parking", parking);
            }
            if let Some(entrance_fee) = filter.entrance_fee {
                buf.eq("entrance_fee", entrance_fee);
            }
            if let Some(address) = &filter.address {
                buf.contains(dialect, "address", address);
            }
            if let Some(search) = &filter.search {
                buf.contains(dialect, "title", search);
            }
            if let Some(tag) = &filter.tag {
                buf.has_tag(tag);
            }
        }
    }

    buf.sql.push_str(dialect.order_by());

    (buf.sql, buf.values)
}

pub fn statement(filter: &PostFilter, dialect: Dialect) -> Statement {
    let (sql, values) = build(filter, dialect);
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}
