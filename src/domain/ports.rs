use crate::utils::error::Result;
use std::path::Path;

pub trait Storage {
    fn exists(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Writes the whole file or nothing: a failed write leaves no partial
    /// output behind.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait Pipeline {
    type Extracted;
    type Transformed;

    fn name(&self) -> &str;
    fn extract(&self) -> Result<Self::Extracted>;
    fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    /// Returns the path the output was written to.
    fn load(&self, result: Self::Transformed) -> Result<String>;
}
