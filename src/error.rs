// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Decoding the surface image failed
    #[error("Image load error ({}): {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Configuration values rejected at construction time
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config read error ({}): {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error ({}): {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A collaborator the dropper needs (surface, overlay container, host events)
    /// was not attached when the tool tried to become active.
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}
