use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::routes::RouteID;
use crate::shapes::ShapeID;

/// Faults that abort a load or signal broken references in the data set.
///
/// A query miss (unknown route or shape ID at the lookup boundary) is not
/// an error; those come back as `None`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("couldn't open {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error partway through a source")]
    Io(#[from] io::Error),

    #[error("unterminated quoted field")]
    UnterminatedQuote,

    #[error("line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("malformed well-known-text point {text:?}")]
    MalformedPoint { text: String },

    #[error("invalid date {text:?}")]
    InvalidDate {
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("route {0} isn't in the trips data")]
    UnknownRoute(RouteID),

    #[error("shape {0} is referenced but missing from the shapes data")]
    UnknownShape(ShapeID),

    #[error("unreadable snapshot")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
