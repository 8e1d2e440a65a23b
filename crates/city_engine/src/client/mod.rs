//! Scene transport
//!
//! The generator is an external process; this module only knows how to ask
//! it for a [`SceneDocument`] and a few auxiliary reports. Fetches run on a
//! worker thread and hand their result back over a channel so the tick loop
//! never blocks.

pub mod scene_client;
pub mod file_source;

use std::sync::mpsc::{self, Receiver};
use std::thread;

use thiserror::Error;

use crate::scene::SceneDocument;

pub use scene_client::{HttpSceneSource, SceneClient};
pub use file_source::FileSceneSource;

/// Scene load failures; all terminal for the attempt
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP client failure (connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("generator returned HTTP {0}")]
    Status(u16),

    /// Body is not a scene document
    #[error("malformed scene document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch worker went away without reporting
    #[error("scene fetch worker exited without a result")]
    WorkerGone,
}

/// Something that can produce a scene document
pub trait SceneSource: Send {
    /// Fetch the document; blocking
    fn fetch(&self) -> Result<SceneDocument, LoadError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Run `source.fetch()` on a worker thread
///
/// The receiver yields exactly one result.
pub fn spawn_fetch(source: Box<dyn SceneSource>) -> Receiver<Result<SceneDocument, LoadError>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        log::info!("Fetching scene from {}", source.describe());
        let result = source.fetch();
        if let Err(err) = &result {
            log::error!("Scene fetch failed: {}", err);
        }
        let _ = tx.send(result);
    });

    rx
}
