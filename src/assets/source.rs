use std::path::PathBuf;

use anyhow::Context;
use futures::future::{FutureExt, LocalBoxFuture};

/// Resolves asset URLs to bytes
pub trait AssetSource {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, anyhow::Result<Vec<u8>>>;
}

/// Serves asset URLs as paths relative to a root directory
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let relative = url
            .strip_prefix("file://")
            .unwrap_or(url)
            .trim_start_matches('/');
        self.root.join(relative)
    }
}

impl AssetSource for FileAssetSource {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, anyhow::Result<Vec<u8>>> {
        let path = self.resolve(url);
        async move {
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_resolve_under_root() {
        let source = FileAssetSource::new("/srv/assets");
        assert_eq!(
            source.resolve("/models/cube.obj"),
            PathBuf::from("/srv/assets/models/cube.obj")
        );
        assert_eq!(
            source.resolve("file://models/cube.obj"),
            PathBuf::from("/srv/assets/models/cube.obj")
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = FileAssetSource::new(std::env::temp_dir());
        let result = pollster::block_on(source.fetch("arview-definitely-missing.obj"));
        assert!(result.is_err());
    }
}
