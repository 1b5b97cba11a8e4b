/// Marker shown for any text field the service did not provide.
pub const UNAVAILABLE: &str = "N/A";

/// Summary shown for a reference with no summary in any known field.
pub const NO_SUMMARY: &str = "No summary available";

/// Display model of a successful analysis. Every field is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub url: String,
    pub article: ArticleInfo,
    pub claims: Vec<String>,
    pub verdict: ReliabilityVerdict,
    pub references: Vec<ReferenceEntry>,
    pub skipped: Vec<SkippedReference>,
    pub max_references_used: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInfo {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub published_date: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReliabilityVerdict {
    pub is_misleading: bool,
    /// Always within `0.0..=1.0` when present.
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub url: String,
    pub source: String,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub summary: String,
    pub claims: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReference {
    pub url: String,
    pub title: String,
    pub reason: String,
}
