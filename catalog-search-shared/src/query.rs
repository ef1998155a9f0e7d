//! Search query and response types.

/// Default number of hits a search returns when the caller does not say
/// otherwise.
pub const DEFAULT_SEARCH_SIZE: usize = 20;

/// How the query text is matched against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Weighted multi-field match with fuzzy typo tolerance, ranked by
    /// relevance score.
    #[default]
    Relevance,
    /// Case-insensitive substring containment on the title (and
    /// category), no relevance scoring.
    Wildcard,
}

/// A query against the search index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// The query text. Must be non-blank; the gateway rejects blank
    /// queries before the index is contacted.
    pub query: String,
    /// Maximum number of hits to return.
    pub size: usize,
    /// Matching mode.
    pub mode: SearchMode,
}

impl SearchQuery {
    /// Build a relevance-ranked query.
    pub fn relevance(query: impl Into<String>, size: usize) -> Self {
        Self {
            query: query.into(),
            size,
            mode: SearchMode::Relevance,
        }
    }

    /// Build a substring-containment query.
    pub fn wildcard(query: impl Into<String>, size: usize) -> Self {
        Self {
            query: query.into(),
            size,
            mode: SearchMode::Wildcard,
        }
    }

    /// Whether the query text is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// A single index hit: the product identity plus its relevance score.
/// Field values are never read from the index; hits only carry what
/// hydration needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: i64,
    pub score: f64,
}

/// The index's answer to a query, hits ordered by relevance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

impl SearchResponse {
    /// An empty response.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The hit identifiers in relevance order.
    pub fn hit_ids(&self) -> Vec<i64> {
        self.hits.iter().map(|hit| hit.id).collect()
    }
}
