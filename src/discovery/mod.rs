//! Feature file discovery
//!
//! Recursively enumerates every non-directory entry under the feature root.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::models::TestUnit;

/// Discovery errors; any of these aborts the run
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("failed to walk directory \"{}\": {source}", .root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

/// Collect every file below `root`, sorted for a stable dispatch order
pub fn discover(root: &Path) -> Result<Vec<TestUnit>, DiscoveryError> {
    let mut units = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            debug!("Discovered {}", entry.path().display());
            units.push(entry.into_path());
        }
    }

    units.sort();
    info!("Discovered {} feature files under {}", units.len(), root.display());
    Ok(units)
}
