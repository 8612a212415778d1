use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vector configurations a Q&A collection can be built and queried with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Dense embeddings only, cosine distance.
    #[default]
    Dense,
    /// Sparse BM25 vectors only, IDF-weighted.
    Sparse,
    /// Both, fused with reciprocal rank fusion at query time.
    Hybrid,
}

impl SearchMode {
    pub fn uses_dense(self) -> bool {
        matches!(self, SearchMode::Dense | SearchMode::Hybrid)
    }

    pub fn uses_sparse(self) -> bool {
        matches!(self, SearchMode::Sparse | SearchMode::Hybrid)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchMode::Dense => "dense",
            SearchMode::Sparse => "sparse",
            SearchMode::Hybrid => "hybrid",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSearchMode(pub String);

impl fmt::Display for UnknownSearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown search mode '{}', expected one of: dense, sparse, hybrid",
            self.0
        )
    }
}

impl std::error::Error for UnknownSearchMode {}

impl FromStr for SearchMode {
    type Err = UnknownSearchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Ok(SearchMode::Dense),
            "sparse" => Ok(SearchMode::Sparse),
            // Older collections and scripts spell it "hyprid".
            "hybrid" | "hyprid" => Ok(SearchMode::Hybrid),
            _ => Err(UnknownSearchMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes_case_insensitively() {
        assert_eq!("Dense".parse::<SearchMode>(), Ok(SearchMode::Dense));
        assert_eq!(" sparse ".parse::<SearchMode>(), Ok(SearchMode::Sparse));
        assert_eq!("hybrid".parse::<SearchMode>(), Ok(SearchMode::Hybrid));
        assert_eq!("hyprid".parse::<SearchMode>(), Ok(SearchMode::Hybrid));
        assert!("lexical".parse::<SearchMode>().is_err());
    }

    #[test]
    fn vector_usage_per_mode() {
        assert!(SearchMode::Dense.uses_dense() && !SearchMode::Dense.uses_sparse());
        assert!(!SearchMode::Sparse.uses_dense() && SearchMode::Sparse.uses_sparse());
        assert!(SearchMode::Hybrid.uses_dense() && SearchMode::Hybrid.uses_sparse());
        assert_eq!(SearchMode::Hybrid.to_string(), "hybrid");
    }

    #[test]
    fn default_mode_is_dense() {
        assert_eq!(SearchMode::default(), SearchMode::Dense);
    }
}
