use thiserror::Error;

use crate::io::{ItemId, UserId};

/// Failures of the batch evaluation pipeline. All of them are terminal for a
/// single run: callers propagate them to `main` and exit non-zero.
#[derive(Debug, Error)]
pub enum NocturneError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rating record at {path}:{line}: {detail}")]
    MalformedRecord {
        path: String,
        line: usize,
        detail: String,
    },

    /// A mean or an error metric was requested over zero ratings.
    #[error("{0} contains no ratings")]
    EmptyDataset(&'static str),

    /// A ground-truth cell has no corresponding entry in the prediction table.
    #[error("no prediction for user {user}, item {item}")]
    MissingPrediction { user: UserId, item: ItemId },
}
