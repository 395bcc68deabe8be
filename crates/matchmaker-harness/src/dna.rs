//! Application artifact descriptor.
//!
//! The compiled application definition is opaque to the harness: it is
//! resolved on disk at configuration time and carried around as a name plus
//! a path. The behavior behind it is injected separately as a
//! [`ZomeHandler`](crate::conductor::ZomeHandler).

use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};

/// A compiled application definition, shared by every configured instance
#[derive(Debug, Clone)]
pub struct Dna {
    name: String,
    path: PathBuf,
}

impl Dna {
    /// Resolve an artifact path relative to a base directory.
    ///
    /// A missing artifact is a configuration error and surfaces here, not
    /// at first call time.
    pub fn from_file(base: &Path, relative: impl AsRef<Path>, name: &str) -> HarnessResult<Self> {
        let path = base.join(relative.as_ref());
        if !path.exists() {
            return Err(HarnessError::ArtifactNotFound(path.display().to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            path,
        })
    }

    /// Name of the application definition
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved artifact path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
