// src/wordpress/client.rs
use crate::utils::error::StoreError;
use crate::wordpress::models::{Document, PageQuery, SiteDetails};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

pub const DEFAULT_TABLE_PREFIX: &str = "wp_";

/// Anything that can hand out pages of posts.
pub trait ContentSource {
    fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Document>, StoreError>;
}

/// Read-only access to a WordPress-layout SQLite database.
pub struct SqliteContentStore {
    conn: Connection,
    prefix: String,
    posts_table: String,
}

/// Table prefixes are interpolated into SQL, so only identifier characters are allowed.
fn validate_prefix(prefix: &str) -> Result<(), StoreError> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Escapes `LIKE` wildcards so the value only matches literally under `ESCAPE '\'`.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn is_missing_table(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such table"))
}

impl SqliteContentStore {
    /// Opens the database at `path`. Queries target the main site until `switch_to_site` is called.
    pub fn open<P: AsRef<Path>>(path: P, prefix: &str) -> Result<Self, StoreError> {
        validate_prefix(prefix)?;

        let path = path.as_ref();
        tracing::info!("Opening content database: {}", path.display());
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self {
            conn,
            prefix: prefix.to_string(),
            posts_table: format!("{}posts", prefix),
        })
    }

    pub fn posts_table(&self) -> &str {
        &self.posts_table
    }

    /// Points subsequent queries at the posts table of another site in the network.
    ///
    /// `site` is either a numeric blog id, a path slug (`news` or `/news/`), or a domain.
    pub fn switch_to_site(&mut self, site: &str) -> Result<SiteDetails, StoreError> {
        let details = match self.lookup_site(site) {
            Ok(Some(details)) => details,
            Ok(None) => return Err(StoreError::SiteNotFound(site.to_string())),
            // Single-site installs have no blogs table
            Err(e) if is_missing_table(&e) => {
                tracing::debug!("Site lookup for {} failed: {}", site, e);
                return Err(StoreError::SiteNotFound(site.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        self.posts_table = details.posts_table(&self.prefix);
        tracing::info!(
            "Switched to site {} ({}{}), reading {}",
            details.blog_id,
            details.domain,
            details.path,
            self.posts_table()
        );
        Ok(details)
    }

    fn lookup_site(&self, site: &str) -> Result<Option<SiteDetails>, rusqlite::Error> {
        let sql = format!(
            "SELECT blog_id, domain, path FROM {}blogs
             WHERE blog_id = ?1 OR path = ?2 OR path = ?3 OR domain = ?3 OR domain LIKE ?4 ESCAPE '\\'
             ORDER BY blog_id LIMIT 1",
            self.prefix
        );
        let blog_id: Option<i64> = site.parse().ok();
        let slug_path = format!("/{}/", site.trim_matches('/'));
        let subdomain = format!("{}.%", escape_like(site));

        self.conn
            .query_row(&sql, params![blog_id, slug_path, site, subdomain], |row| {
                Ok(SiteDetails {
                    blog_id: row.get(0)?,
                    domain: row.get(1)?,
                    path: row.get(2)?,
                })
            })
            .optional()
    }
}

impl ContentSource for SqliteContentStore {
    fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Document>, StoreError> {
        let sql = format!(
            "SELECT ID, post_name, post_content FROM {}
             WHERE post_status = ?1 AND post_type IN (?2, ?3)
             LIMIT ?4 OFFSET ?5",
            self.posts_table
        );
        tracing::debug!("Fetching {} posts at offset {} from {}", query.limit, query.offset, self.posts_table);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                query.status,
                query.post_types[0],
                query.post_types[1],
                query.limit as i64,
                query.offset as i64
            ],
            |row| {
                Ok(Document {
                    id: row.get(0)?,
                    slug: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    body: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            },
        )?;

        let documents = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(documents)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::{params, Connection};
    use std::path::Path;

    /// Creates a posts table with the given (status, type, slug, content) rows.
    pub fn seed_posts(path: &Path, table: &str, posts: &[(&str, &str, &str, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    ID INTEGER PRIMARY KEY AUTOINCREMENT,
                    post_name TEXT NOT NULL DEFAULT '',
                    post_content TEXT NOT NULL DEFAULT '',
                    post_status TEXT NOT NULL DEFAULT 'publish',
                    post_type TEXT NOT NULL DEFAULT 'post'
                )",
                table
            ),
            [],
        )
        .unwrap();
        for (status, post_type, slug, content) in posts {
            conn.execute(
                &format!(
                    "INSERT INTO {} (post_name, post_content, post_status, post_type) VALUES (?1, ?2, ?3, ?4)",
                    table
                ),
                params![slug, content, status, post_type],
            )
            .unwrap();
        }
    }

    pub fn seed_blogs(path: &Path, blogs: &[(i64, &str, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS wp_blogs (blog_id INTEGER PRIMARY KEY, domain TEXT, path TEXT)",
            [],
        )
        .unwrap();
        for (id, domain, path) in blogs {
            conn.execute(
                "INSERT INTO wp_blogs (blog_id, domain, path) VALUES (?1, ?2, ?3)",
                params![id, domain, path],
            )
            .unwrap();
        }
    }
}
