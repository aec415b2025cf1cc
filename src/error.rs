//! Unified error type.

use std::path::PathBuf;

/// The error type returned by stitch's fallible operations.
///
/// Application-level failures (404, 500, a form that does not validate) are
/// expressed as [`Response`](crate::Response) values or [`Errors`](crate::forms::Errors),
/// not as `Error`s. This type surfaces infrastructure failures: binding a
/// port, decoding a form body, loading templates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("form: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("template: {0}")]
    Template(#[from] tera::Error),

    #[error("template directory {}: {source}", path.display())]
    TemplateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template {0} does not exist")]
    TemplateNotFound(String),
}
