use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app::models::{Keyword, MarkerPosition};

const SAVED_KEYWORDS: &str = "saved_keywords.json";
const LAST_MARKER: &str = "last_marker.json";

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    ParseError(#[from] serde_json::Error),
}

// Small key-value store, one JSON file per key
#[derive(Clone, Debug)]
pub struct PrefsStore {
    root: PathBuf,
}

impl PrefsStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, PrefsError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PrefsError> {
        match fs::read(self.path(key)) {
            Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PrefsError> {
        let content = serde_json::to_vec(value)?;
        let tmp = self.path(&format!("{}.tmp", key));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }
}

impl PrefsStore {
    /// Saved keywords, most recent first.
    pub fn saved_keywords(&self) -> Result<Vec<Keyword>, PrefsError> {
        Ok(self.read(SAVED_KEYWORDS)?.unwrap_or_default())
    }

    pub fn save_keyword(&self, keyword: &Keyword) -> Result<(), PrefsError> {
        let mut keywords = self.saved_keywords()?;
        if keywords.contains(keyword) {
            return Ok(());
        }
        keywords.insert(0, keyword.clone());
        self.write(SAVED_KEYWORDS, &keywords)
    }

    pub fn delete_keyword(&self, keyword: &Keyword) -> Result<(), PrefsError> {
        let mut keywords = self.saved_keywords()?;
        if let Some(index) = keywords.iter().position(|k| k == keyword) {
            keywords.remove(index);
            self.write(SAVED_KEYWORDS, &keywords)?;
        }
        Ok(())
    }

    pub fn save_last_marker(&self, marker: &MarkerPosition) -> Result<(), PrefsError> {
        self.write(LAST_MARKER, marker)
    }

    pub fn last_marker(&self) -> Result<Option<Keyword>, PrefsError> {
        let marker: Option<MarkerPosition> = self.read(LAST_MARKER)?;
        Ok(marker.map(Keyword::from))
    }
}
