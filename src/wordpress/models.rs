// src/wordpress/models.rs

/// Number of posts requested per page.
pub const PAGE_SIZE: usize = 100;

/// Status value the content store uses for published posts.
pub const PUBLISHED_STATUS: &str = "publish";

/// Post types that carry user-authored content.
pub const CONTENT_TYPES: [&str; 2] = ["post", "page"];

/// A post or page row as read from the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub slug: String,
    pub body: String,
}

/// One page request against the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub offset: usize,
    pub limit: usize,
    pub status: &'static str,
    pub post_types: [&'static str; 2],
}

impl PageQuery {
    /// Builds the query for a zero-based page counter.
    pub fn for_page(page: usize) -> Self {
        Self {
            offset: page * PAGE_SIZE,
            limit: PAGE_SIZE,
            status: PUBLISHED_STATUS,
            post_types: CONTENT_TYPES,
        }
    }
}

/// A resolved site in a multisite network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDetails {
    pub blog_id: i64,
    pub domain: String,
    pub path: String,
}

impl SiteDetails {
    /// Name of the posts table for this site. The main site keeps the unnumbered table.
    pub fn posts_table(&self, prefix: &str) -> String {
        if self.blog_id == 1 {
            format!("{}posts", prefix)
        } else {
            format!("{}{}_posts", prefix, self.blog_id)
        }
    }
}
