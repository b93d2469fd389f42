// CV rendering: résumé record → styled flow document → DOCX bytes.
// Rendering is synchronous and CPU-bound; async callers must use tokio::task::spawn_blocking.

pub mod document;
pub mod docx;
pub mod handlers;
pub mod renderer;
pub mod styles;
pub mod validation;

use thiserror::Error;

pub use docx::DOCX_MIME_TYPE;
pub use renderer::render;
pub use validation::ValidationError;

/// Failure of a single render call. No bytes are produced in any case.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to write document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to write document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error while assembling document: {0}")]
    Io(#[from] std::io::Error),
}
