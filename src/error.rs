use std::fmt;

/// Error types for configuring a derivative-free search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    UnknownMethod(String),
    MissingMethod,
    MalformedConfig(String),
    InvalidParameter(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::UnknownMethod(name) => write!(f, "Unknown method: {}", name),
            SearchError::MissingMethod => write!(f, "Configuration has no \"method\" key"),
            SearchError::MalformedConfig(msg) => write!(f, "Malformed configuration: {}", msg),
            SearchError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_display_carries_offending_value() {
        let e = SearchError::UnknownMethod("simanneal".to_string());
        assert!(e.to_string().contains("simanneal"));

        let e = SearchError::InvalidParameter("expansion = 0.5 (must be > 1)".to_string());
        assert!(e.to_string().contains("expansion"));
    }
}
