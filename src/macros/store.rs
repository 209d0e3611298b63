//! Dictionary storage backends.
//!
//! `load` never fails: missing or malformed stored state reads as "no macros
//! configured". `save_raw` validates first and leaves the stored state untouched
//! when validation fails.

use super::{validate_str, MacroDictionary};
use crate::{Error, ErrorContext, Result};
use arc_swap::ArcSwapOption;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub trait DictionaryStore: Send + Sync {
    /// Current snapshot, read fresh on every call.
    fn load(&self) -> Option<MacroDictionary>;
    /// Validate and persist editor text.
    fn save_raw(&self, raw: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

impl<S: DictionaryStore + ?Sized> DictionaryStore for Arc<S> {
    fn load(&self) -> Option<MacroDictionary> {
        (**self).load()
    }
    fn save_raw(&self, raw: &str) -> Result<()> {
        (**self).save_raw(raw)
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// In-process store holding an immutable snapshot.
pub struct MemoryStore {
    current: ArcSwapOption<MacroDictionary>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    pub fn with_dictionary(dictionary: MacroDictionary) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(dictionary),
        }
    }

    /// Replace the snapshot without validation (programmatic setup).
    pub fn replace(&self, dictionary: Option<MacroDictionary>) {
        self.current.store(dictionary.map(Arc::new));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryStore for MemoryStore {
    fn load(&self) -> Option<MacroDictionary> {
        self.current.load_full().map(|d| d.as_ref().clone())
    }
    fn save_raw(&self, raw: &str) -> Result<()> {
        let dict = validate_str(raw)?;
        self.current.store(Some(Arc::new(dict)));
        Ok(())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

/// JSON file on disk, re-read on every load so external edits apply immediately.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw stored text, for seeding an editor.
    pub fn read_raw(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DictionaryStore for FileStore {
    fn load(&self) -> Option<MacroDictionary> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read macro dictionary");
                return None;
            }
        };
        let dict = MacroDictionary::from_json_str(&raw);
        if dict.is_none() {
            tracing::warn!(path = %self.path.display(), "stored macro dictionary is malformed, ignoring");
        }
        dict
    }

    fn save_raw(&self, raw: &str) -> Result<()> {
        validate_str(raw)?;
        if self.path.file_name().is_none() {
            return Err(Error::configuration_with_context(
                "macro dictionary path has no file name",
                ErrorContext::new()
                    .with_details(self.path.display().to_string())
                    .with_source("file_store"),
            ));
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, raw)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::info!(path = %self.path.display(), "macros updated");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Store with nothing configured.
pub struct NullStore;

impl DictionaryStore for NullStore {
    fn load(&self) -> Option<MacroDictionary> {
        None
    }
    fn save_raw(&self, raw: &str) -> Result<()> {
        validate_str(raw).map(|_| ())
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
