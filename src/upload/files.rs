use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Lists every regular file under `folder`, skipping hidden and gitignored
/// entries. Paths come back sorted.
///
/// `.gitignore` files apply whether or not `folder` is inside a git repository.
pub fn collect_folder(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for result in WalkBuilder::new(folder).require_git(false).build() {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                tracing::warn!("Error walking {}: {}", folder.display(), e);
            }
        }
    }

    files.sort();
    files
}
