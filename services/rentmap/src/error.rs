use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a dataset from the listing file.
///
/// Per-field parse problems are not errors; they are coerced during
/// normalization.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("listing file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read listing file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("listing file has no '{0}' column")]
    MissingColumn(String),
}

impl LoadError {
    /// Message shown to the user in place of the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::NotFound(_) => {
                "Error loading data. Check if the CSV file exists.".to_string()
            }
            other => format!("Error loading data: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::error::PolarsError;

    #[test]
    fn test_user_message() {
        let missing = LoadError::NotFound(PathBuf::from("data/oferty_geo.csv"));
        assert_eq!(
            missing.user_message(),
            "Error loading data. Check if the CSV file exists."
        );

        let unreadable = LoadError::Unreadable {
            path: PathBuf::from("data/oferty_geo.csv"),
            source: PolarsError::NoData("empty CSV".into()),
        };
        let message = unreadable.user_message();
        assert!(message.starts_with("Error loading data: failed to read listing file"));
        assert!(message.contains("empty CSV"));

        let column = LoadError::MissingColumn("id".to_string());
        assert_eq!(
            column.user_message(),
            "Error loading data: listing file has no 'id' column"
        );
    }
}
