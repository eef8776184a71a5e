//! Source files as handed over by the host editor.

use std::sync::Arc;

use parking_lot::RwLock;
use smol_str::SmolStr;

use crate::base::FileId;

/// One tab of a sketch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub id: FileId,
    pub name: SmolStr,
    pub text: Arc<str>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<SmolStr>, text: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Read access to the current text of every file.
///
/// Called once at the start of each analysis cycle; the returned list is
/// the snapshot the whole cycle works from. Files must be returned in
/// order, with `files()[i].id == FileId::from(i)`.
pub trait SourceProvider: Send + Sync {
    fn files(&self) -> Vec<SourceFile>;
}

/// In-memory [`SourceProvider`] a host can update from its edit handler.
#[derive(Debug, Default)]
pub struct SharedSources {
    files: RwLock<Vec<SourceFile>>,
}

impl SharedSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, text)` pairs in tab order.
    pub fn from_files<N, T>(files: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<SmolStr>,
        T: Into<Arc<str>>,
    {
        let sources = Self::new();
        for (name, text) in files {
            sources.add_file(name, text);
        }
        sources
    }

    pub fn add_file(&self, name: impl Into<SmolStr>, text: impl Into<Arc<str>>) -> FileId {
        let mut files = self.files.write();
        let id = FileId::from(files.len());
        files.push(SourceFile::new(id, name, text));
        id
    }

    /// Replace the text of `file`. Returns `false` for an unknown file.
    pub fn set_text(&self, file: FileId, text: impl Into<Arc<str>>) -> bool {
        match self.files.write().get_mut(file.index()) {
            Some(source) => {
                source.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn text(&self, file: FileId) -> Option<Arc<str>> {
        self.files.read().get(file.index()).map(|f| f.text.clone())
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl SourceProvider for SharedSources {
    fn files(&self) -> Vec<SourceFile> {
        self.files.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_tab_order() {
        let sources = SharedSources::from_files([("main", "a"), ("Ball", "b")]);
        let files = sources.files();
        assert_eq!(files[0].id, FileId::new(0));
        assert_eq!(files[1].id, FileId::new(1));
        assert_eq!(&*files[1].text, "b");
    }

    #[test]
    fn test_set_text_unknown_file() {
        let sources = SharedSources::from_files([("main", "a")]);
        assert!(sources.set_text(FileId::new(0), "changed"));
        assert!(!sources.set_text(FileId::new(3), "nope"));
        assert_eq!(sources.text(FileId::new(0)).as_deref(), Some("changed"));
    }
}
