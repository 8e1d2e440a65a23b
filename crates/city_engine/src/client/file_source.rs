//! Scene source reading a saved document from disk

use std::path::PathBuf;

use super::{LoadError, SceneSource};
use crate::scene::SceneDocument;

/// Loads a scene document from a JSON file
#[derive(Debug, Clone)]
pub struct FileSceneSource {
    path: PathBuf,
}

impl FileSceneSource {
    /// Source for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SceneSource for FileSceneSource {
    fn fetch(&self) -> Result<SceneDocument, LoadError> {
        let bytes = std::fs::read(&self.path)?;
        Ok(SceneDocument::from_json_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
