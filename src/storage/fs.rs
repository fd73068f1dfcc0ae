//! Filesystem-backed origin store.
//!
//! Buckets are directories under a fixed root; objects are the regular
//! files inside them. Enumeration sorts by file name so that
//! `sequence_index` assignment is deterministic across calls.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use tokio::fs;
use tokio::io::AsyncReadExt;

use super::{ObjectEntry, ObjectStream, OriginError, OriginStore};

const FETCH_CHUNK_BYTES: usize = 64 * 1024;

/// Origin store rooted at a local directory.
#[derive(Debug)]
pub struct FsOriginStore {
    root: PathBuf,
}

impl FsOriginStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a bucket-relative path, rejecting anything that would
    /// escape the store root.
    fn resolve(&self, bucket: &str, name: &str) -> Result<PathBuf, OriginError> {
        let relative = Path::new(bucket).join(name);
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(OriginError::fetch(name, "path escapes the store root"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl OriginStore for FsOriginStore {
    async fn list(&self, bucket: &str) -> Result<Vec<ObjectEntry>, OriginError> {
        let dir = self
            .resolve(bucket, "")
            .map_err(|_| OriginError::list(bucket, "bucket name escapes the store root"))?;

        let mut reader = fs::read_dir(&dir)
            .await
            .map_err(|err| OriginError::list(bucket, err))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|err| OriginError::list(bucket, err))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|err| OriginError::list(bucket, err))?;
            if !metadata.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let content_type = mime_guess::from_path(entry.path())
                .first_raw()
                .map(str::to_string);
            entries.push(ObjectEntry {
                name,
                size: metadata.len(),
                content_type,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn fetch(&self, bucket: &str, name: &str) -> Result<ObjectStream, OriginError> {
        let absolute = self.resolve(bucket, name)?;
        let file = fs::File::open(&absolute)
            .await
            .map_err(|err| OriginError::fetch(name, err))?;

        let name = name.to_string();
        let chunks = stream::try_unfold((file, name), |(mut file, name)| async move {
            let mut chunk = vec![0u8; FETCH_CHUNK_BYTES];
            let read = file
                .read(&mut chunk)
                .await
                .map_err(|err| OriginError::fetch(name.as_str(), err))?;
            if read == 0 {
                return Ok(None);
            }
            chunk.truncate(read);
            Ok(Some((Bytes::from(chunk), (file, name))))
        });

        Ok(Box::pin(chunks))
    }
}
