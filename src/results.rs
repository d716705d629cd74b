use crate::semantics::{ActionCatalog, SemanticStructure, TaskDescriptor};
use serde::{Deserialize, Serialize};

/// Everything extracted from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnalysis {
    /// Actionable elements grouped by purpose
    pub actions: ActionCatalog,

    /// Hierarchical description of the page
    pub structure: SemanticStructure,

    /// Tasks a user could perform on the page
    pub possible_tasks: Vec<TaskDescriptor>,

    /// Absolute URLs of every hyperlink, in document order
    pub all_links: Vec<String>,
}

/// One page of a crawl and the pages reached from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlNode {
    /// URL of the page
    pub url: String,

    /// Title of the page (if available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Pages first reached from this one, in link order
    #[serde(default)]
    pub children: Vec<CrawlNode>,

    /// Why the page could not be processed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlNode {
    /// Create a node for a successfully processed page
    pub fn new(url: String, title: Option<String>) -> Self {
        Self {
            url,
            title,
            children: Vec::new(),
            error: None,
        }
    }

    /// Create a node for a page that failed; it never has children
    pub fn failed(url: String, error: impl ToString) -> Self {
        Self {
            url,
            title: None,
            children: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(CrawlNode::page_count).sum::<usize>()
    }

    /// Every URL in this subtree, depth first
    pub fn urls(&self) -> Vec<&str> {
        let mut urls = vec![self.url.as_str()];
        for child in &self.children {
            urls.extend(child.urls());
        }
        urls
    }
}

/// Counters collected during one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_visited: usize,
    pub errors: usize,
    pub elapsed_ms: u64,
}

/// Result of a crawl: the page tree (absent when nothing was admitted) and stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub root: Option<CrawlNode>,
    pub stats: CrawlStats,
}
