//! ManifestFile - apply 用の manifest ファイル
//!
//! 固定名のファイルに書き出し、guard が Drop されたときに必ず削除します。
//! apply の成否や早期 return に関係なく、古い manifest が次の実行に残りません。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    /// Write `contents` to `path`, replacing any file left behind earlier.
    pub fn create(path: impl Into<PathBuf>, contents: &str) -> io::Result<Self> {
        let path = path.into();
        remove_if_exists(&path)?;
        fs::write(&path, contents)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ManifestFile {
    fn drop(&mut self) {
        if let Err(e) = remove_if_exists(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove manifest file");
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
