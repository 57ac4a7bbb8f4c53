//! Block blob upload from a local file.
//!
//! Small files go up in one request. Larger files are cut into fixed-size
//! blocks that a fixed pool of tasks uploads in parallel; the block list is
//! then committed in file order and the blob's properties are returned.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::task::JoinSet;
use uuid::Uuid;

use azrm_core::{AzureError, AzureErrorKind, AzureResult};

use crate::service::StorageService;
use crate::types::Blob;

pub const SINGLE_BLOB_PUT_THRESHOLD: u64 = 32 * 1024 * 1024;
pub const BLOCK_SIZE: u64 = 4 * 1024 * 1024;
pub const WORKER_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Files up to this size are sent with a single put.
    pub single_put_threshold: u64,
    pub block_size: u64,
    pub worker_count: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            single_put_threshold: SINGLE_BLOB_PUT_THRESHOLD,
            block_size: BLOCK_SIZE,
            worker_count: WORKER_COUNT,
        }
    }
}

/// One block of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub index: usize,
    pub offset: u64,
    pub len: usize,
    pub id: String,
}

/// Base64 of a 32-character hex uuid; every id has the same length.
pub fn new_block_id() -> String {
    BASE64.encode(Uuid::new_v4().simple().to_string())
}

/// Cut `size` bytes into consecutive blocks of `block_size` (the last may be shorter).
pub fn file_blocks(size: u64, block_size: u64) -> Vec<FileBlock> {
    let block_size = block_size.max(1);
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset < size {
        let len = block_size.min(size - offset);
        blocks.push(FileBlock {
            index: blocks.len(),
            offset,
            len: len as usize,
            id: new_block_id(),
        });
        offset += len;
    }
    blocks
}

/// Split `items` into at most `workers` disjoint, contiguous, non-empty runs.
///
/// Sizes differ by at most one; earlier runs take the remainder.
pub fn divide_blocks<T: Clone>(items: &[T], workers: usize) -> Vec<Vec<T>> {
    let workers = workers.max(1).min(items.len().max(1));
    let base = items.len() / workers;
    let extra = items.len() % workers;
    let mut out = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let len = base + usize::from(w < extra);
        if len == 0 {
            continue;
        }
        out.push(items[start..start + len].to_vec());
        start += len;
    }
    out
}

/// Upload `path` as block blob `container/blob`; `None` creates an empty blob.
pub async fn upload_block_blob_from_file(
    service: Arc<dyn StorageService>,
    container: &str,
    blob: &str,
    path: Option<&Path>,
    config: &UploadConfig,
) -> AzureResult<Blob> {
    let Some(path) = path else {
        debug!("creating empty blob {}/{}", container, blob);
        return service.create_block_blob(container, blob, Vec::new()).await;
    };

    let size = tokio::fs::metadata(path).await?.len();
    debug!("uploading {} ({} bytes) as blob {}/{}", path.display(), size, container, blob);
    if size <= config.single_put_threshold {
        let body = tokio::fs::read(path).await?;
        return service.create_block_blob(container, blob, body).await;
    }

    let blocks = file_blocks(size, config.block_size);
    let mut workers = JoinSet::new();
    for subset in divide_blocks(&blocks, config.worker_count) {
        workers.spawn(upload_blocks(
            service.clone(),
            container.to_string(),
            blob.to_string(),
            path.to_path_buf(),
            subset,
        ));
    }

    let mut failures = Vec::new();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => failures.push(e.to_string()),
            Err(e) => failures.push(format!("worker aborted: {e}")),
        }
    }
    if !failures.is_empty() {
        warn!(
            "upload of {} to {}/{} failed in {} worker(s)",
            path.display(),
            container,
            blob,
            failures.len()
        );
        return Err(AzureError::new(
            AzureErrorKind::Upload,
            format!("uploading {} failed: {}", path.display(), failures.join("; ")),
        ));
    }

    let ids: Vec<String> = blocks.into_iter().map(|b| b.id).collect();
    service.commit_blob_blocks(container, blob, &ids).await?;
    service.get_blob_properties(container, blob).await
}

async fn upload_blocks(
    service: Arc<dyn StorageService>,
    container: String,
    blob: String,
    path: PathBuf,
    blocks: Vec<FileBlock>,
) -> AzureResult<()> {
    let mut file = tokio::fs::File::open(&path).await?;
    for block in blocks {
        let mut data = vec![0u8; block.len];
        file.seek(SeekFrom::Start(block.offset)).await?;
        file.read_exact(&mut data).await?;
        service.put_blob_block(&container, &blob, &block.id, data).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockStorageService;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    fn small_config() -> UploadConfig {
        UploadConfig {
            single_put_threshold: 1024,
            block_size: 1024,
            worker_count: 3,
        }
    }

    /// Block `i` is filled with byte `i`.
    fn striped_file(blocks: usize, last_len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..blocks {
            let len = if i + 1 == blocks { last_len } else { 1024 };
            file.write_all(&vec![i as u8; len]).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn block_ids_have_equal_length() {
        let a = new_block_id();
        let b = new_block_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), b.len());
        assert_eq!(BASE64.decode(&a).unwrap().len(), 32);
    }

    #[test]
    fn file_blocks_cover_the_file() {
        let blocks = file_blocks(2500, 1024);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].offset, 2048);
        assert_eq!(blocks[2].len, 452);
        assert!(blocks.iter().enumerate().all(|(i, b)| b.index == i));
        assert!(file_blocks(0, 1024).is_empty());
    }

    #[test]
    fn divide_blocks_is_disjoint_and_ordered() {
        let items: Vec<usize> = (0..10).collect();
        let runs = divide_blocks(&items, 3);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 3, 3]);
        assert_eq!(runs.concat(), items);

        let few: Vec<usize> = (0..2).collect();
        assert_eq!(divide_blocks(&few, 8), vec![vec![0], vec![1]]);
        assert!(divide_blocks::<usize>(&[], 8).is_empty());
        assert_eq!(divide_blocks(&items, 0).len(), 1);
    }

    #[tokio::test]
    async fn missing_path_creates_empty_blob() {
        let mut mock = MockStorageService::new();
        mock.expect_create_block_blob()
            .withf(|c: &str, b: &str, body: &Vec<u8>| c == "dir" && b == "empty" && body.is_empty())
            .times(1)
            .returning(|_, b, _| {
                Ok(Blob {
                    name: b.to_string(),
                    ..Default::default()
                })
            });
        let blob = upload_block_blob_from_file(Arc::new(mock), "dir", "empty", None, &UploadConfig::default())
            .await
            .unwrap();
        assert_eq!(blob.name, "empty");
    }

    #[tokio::test]
    async fn small_file_uses_single_put() {
        let file = striped_file(1, 600);
        let mut mock = MockStorageService::new();
        mock.expect_create_block_blob()
            .withf(|_: &str, _: &str, body: &Vec<u8>| body.len() == 600)
            .times(1)
            .returning(|_, b, _| {
                Ok(Blob {
                    name: b.to_string(),
                    ..Default::default()
                })
            });
        mock.expect_put_blob_block().times(0);
        mock.expect_commit_blob_blocks().times(0);
        upload_block_blob_from_file(Arc::new(mock), "dir", "small", Some(file.path()), &small_config())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn large_file_commits_in_file_order() {
        let file = striped_file(10, 100);
        let uploaded: Arc<Mutex<HashMap<String, (u8, usize)>>> = Arc::new(Mutex::new(HashMap::new()));
        let committed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let mut mock = MockStorageService::new();
        let seen = uploaded.clone();
        mock.expect_put_blob_block()
            .times(10)
            .returning(move |_, _, id, data| {
                seen.lock().unwrap().insert(id.to_string(), (data[0], data.len()));
                Ok(())
            });
        let order = committed.clone();
        mock.expect_commit_blob_blocks()
            .times(1)
            .returning(move |_, _, ids| {
                *order.lock().unwrap() = ids.to_vec();
                Ok(())
            });
        mock.expect_get_blob_properties()
            .times(1)
            .returning(|_, b| {
                Ok(Blob {
                    name: b.to_string(),
                    ..Default::default()
                })
            });

        let blob = upload_block_blob_from_file(Arc::new(mock), "dir", "big.bin", Some(file.path()), &small_config())
            .await
            .unwrap();
        assert_eq!(blob.name, "big.bin");

        let uploaded = uploaded.lock().unwrap();
        let committed = committed.lock().unwrap();
        assert_eq!(committed.len(), 10);
        let stripes: Vec<u8> = committed.iter().map(|id| uploaded[id].0).collect();
        assert_eq!(stripes, (0..10u8).collect::<Vec<_>>());
        assert_eq!(uploaded[&committed[9]].1, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn commit_order_ignores_completion_order() {
        let file = striped_file(12, 1024);
        let uploaded: Arc<Mutex<HashMap<String, u8>>> = Arc::new(Mutex::new(HashMap::new()));
        let completed: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let committed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let mut mock = MockStorageService::new();
        let (seen, done) = (uploaded.clone(), completed.clone());
        mock.expect_put_blob_block()
            .times(12)
            .returning(move |_, _, id, data| {
                // later blocks finish sooner
                let stripe = data[0];
                std::thread::sleep(std::time::Duration::from_millis(10 * (12 - stripe as u64)));
                seen.lock().unwrap().insert(id.to_string(), stripe);
                done.lock().unwrap().push(stripe);
                Ok(())
            });
        let order = committed.clone();
        mock.expect_commit_blob_blocks()
            .times(1)
            .returning(move |_, _, ids| {
                *order.lock().unwrap() = ids.to_vec();
                Ok(())
            });
        mock.expect_get_blob_properties()
            .times(1)
            .returning(|_, b| {
                Ok(Blob {
                    name: b.to_string(),
                    ..Default::default()
                })
            });

        upload_block_blob_from_file(Arc::new(mock), "dir", "big.bin", Some(file.path()), &small_config())
            .await
            .unwrap();

        let completed = completed.lock().unwrap();
        assert_eq!(completed.len(), 12);
        assert_eq!(completed.first(), Some(&8));
        assert_eq!(completed.last(), Some(&3));

        let uploaded = uploaded.lock().unwrap();
        let stripes: Vec<u8> = committed.lock().unwrap().iter().map(|id| uploaded[id]).collect();
        assert_eq!(stripes, (0..12u8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn worker_failure_is_aggregated_and_nothing_is_committed() {
        let file = striped_file(6, 1024);
        let mut mock = MockStorageService::new();
        mock.expect_put_blob_block().returning(|_, _, _, data| {
            if data[0] == 4 {
                Err(AzureError::from_status(500, "InternalError"))
            } else {
                Ok(())
            }
        });
        mock.expect_commit_blob_blocks().times(0);
        mock.expect_get_blob_properties().times(0);

        let err = upload_block_blob_from_file(Arc::new(mock), "dir", "big.bin", Some(file.path()), &small_config())
            .await
            .unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Upload);
        assert!(err.message.contains("InternalError"));
    }

    #[tokio::test]
    async fn unreadable_path_is_io_error() {
        let mock = MockStorageService::new();
        let err = upload_block_blob_from_file(
            Arc::new(mock),
            "dir",
            "b",
            Some(Path::new("/definitely/not/here.bin")),
            &UploadConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Io);
    }
}
