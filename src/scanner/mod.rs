// src/scanner/mod.rs
use crate::extractors::shortcode::ShortcodeExtractor;
use crate::report::ReportRow;
use crate::utils::error::{AppError, ExtractError};
use crate::utils::progress::ProgressReporter;
use crate::wordpress::client::ContentSource;
use crate::wordpress::models::{Document, PageQuery};

/// Walks the content store page by page until an empty page comes back.
///
/// Rows are returned in page order, then post order, then text order within a post.
/// A failed page query aborts the scan.
pub fn scan<S, P>(
    source: &S,
    extractor: &ShortcodeExtractor,
    progress: &mut P,
) -> Result<Vec<ReportRow>, AppError>
where
    S: ContentSource + ?Sized,
    P: ProgressReporter + ?Sized,
{
    let mut rows = Vec::new();
    let mut page = 0;

    loop {
        let query = PageQuery::for_page(page);
        let posts = source.fetch_page(&query)?;
        if posts.is_empty() {
            tracing::debug!("Page {} (offset {}) is empty, stopping", page, query.offset);
            break;
        }

        progress.start(posts.len(), &format!("Processing {} Post Objects.", posts.len()));
        let page_rows = process_page(&posts, extractor, progress)?;
        progress.finish();

        tracing::info!("Page {}: {} posts, {} shortcodes", page, posts.len(), page_rows.len());
        rows.extend(page_rows);
        page += 1;
    }

    tracing::info!("Scan complete: {} shortcodes across {} pages", rows.len(), page);
    Ok(rows)
}

/// Turns one page of posts into report rows.
pub fn process_page<P: ProgressReporter + ?Sized>(
    posts: &[Document],
    extractor: &ShortcodeExtractor,
    progress: &mut P,
) -> Result<Vec<ReportRow>, ExtractError> {
    let mut rows = Vec::new();
    for post in posts {
        progress.tick();
        for code in extractor.extract(post) {
            rows.push(ReportRow::from_shortcode(&code)?);
        }
    }
    Ok(rows)
}
