//! Cursor-paginated feed pages.
//!
//! These replace raw row lists at the engine boundary: a page carries its
//! own resume cursors so callers never construct pagination bounds
//! themselves. Pages are also what the cache stores, as their JSON
//! serialization.

use serde::{Deserialize, Serialize};

use super::cursor;
use super::notification::Notification;

/// One notification plus the cursor that resumes the feed after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEdge {
    /// The notification itself.
    pub node: Notification,
    /// Opaque token for fetching items older than this one.
    pub cursor: String,
}

/// Pagination summary for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether older items exist beyond this page.
    pub has_next_page: bool,
    /// Cursor of the last edge; absent on an empty page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
}

/// A page of the feed: newest first, visible states only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedConnection {
    /// The page's notifications, newest first.
    pub edges: Vec<FeedEdge>,
    /// Derived pagination state.
    pub page_info: PageInfo,
}

impl FeedConnection {
    /// Assemble a page from an over-fetched row set.
    ///
    /// `rows` holds up to `limit + 1` notifications, newest first; the extra
    /// row only proves another page exists and is never emitted as an edge.
    pub fn from_rows(mut rows: Vec<Notification>, limit: usize) -> Self {
        let has_next_page = rows.len() > limit;
        rows.truncate(limit);
        let edges: Vec<FeedEdge> = rows
            .into_iter()
            .map(|node| FeedEdge {
                cursor: cursor::encode(node.created_at),
                node,
            })
            .collect();
        let end_cursor = edges.last().map(|edge| edge.cursor.clone());
        Self {
            edges,
            page_info: PageInfo {
                has_next_page,
                end_cursor,
            },
        }
    }

    /// Number of edges on this page.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether this page carries no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
