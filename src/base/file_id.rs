/// Identifier of one source file of a sketch.
///
/// The id is the file's position in the ordered file list, so file 0 is
/// always the main tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileId(u32);

impl FileId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The ordered index of the file.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for FileId {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
