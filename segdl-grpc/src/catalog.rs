use dashmap::DashMap;
use segdl_core::error::{Result, SegdlError};
use segdl_core::mime::content_type_for;
use segdl_core::plan::{MIB, recommended_segments};
use segdl_core::RemoteFile;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const SAMPLE_NAME: &str = "sample.txt";
const SAMPLE_TEXT: &str = "This is a sample file for testing segmented downloads.";

/// File id -> validated absolute path, shared by every request of the server.
pub trait FileRegistry: Send + Sync {
    fn insert(&self, file_id: String, path: PathBuf);
    fn get(&self, file_id: &str) -> Option<PathBuf>;
    fn evict(&self, file_id: &str) -> Option<PathBuf>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct DashMapRegistry {
    entries: DashMap<String, PathBuf>,
}

impl DashMapRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileRegistry for DashMapRegistry {
    fn insert(&self, file_id: String, path: PathBuf) {
        self.entries.insert(file_id, path);
    }

    fn get(&self, file_id: &str) -> Option<PathBuf> {
        self.entries.get(file_id).map(|e| e.value().clone())
    }

    fn evict(&self, file_id: &str) -> Option<PathBuf> {
        self.entries.remove(file_id).map(|(_, p)| p)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Resolves client-supplied paths under a fixed root and hands out file ids.
#[derive(Clone)]
pub struct FileCatalog {
    root: PathBuf,
    registry: Arc<dyn FileRegistry>,
}

impl FileCatalog {
    pub fn new(root: &Path, registry: Arc<dyn FileRegistry>) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| {
            SegdlError::NotFound(format!("download root {}: {e}", root.display()))
        })?;
        Ok(Self { root, registry })
    }

    pub fn open(root: &Path) -> Result<Self> {
        Self::new(root, Arc::new(DashMapRegistry::new()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &Arc<dyn FileRegistry> {
        &self.registry
    }

    /// Validates `requested` (relative, `/` or `\` separated) and registers a fresh id for it.
    pub fn lookup(&self, requested: &str) -> Result<RemoteFile> {
        let rel = sanitize(requested)?;
        let not_found = || SegdlError::NotFound(requested.to_string());

        let path = self.root.join(rel).canonicalize().map_err(|_| not_found())?;
        // symlinks may still point outside the root
        if !path.starts_with(&self.root) {
            return Err(not_found());
        }
        let md = fs::metadata(&path).map_err(|_| not_found())?;
        if !md.is_file() {
            return Err(not_found());
        }

        let file_id = Uuid::new_v4().to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = content_type_for(&path).to_string();
        debug!(file_id = %file_id, path = %path.display(), "registered file");
        self.registry.insert(file_id.clone(), path);

        Ok(RemoteFile {
            file_id,
            file_name,
            file_size: md.len(),
            content_type,
            recommended_segments: recommended_segments(md.len()),
        })
    }

    /// Path and current size behind `file_id`; a vanished file is evicted.
    pub fn resolve(&self, file_id: &str) -> Result<(PathBuf, u64)> {
        let path = self
            .registry
            .get(file_id)
            .ok_or_else(|| SegdlError::NotFound(format!("unknown file id: {file_id}")))?;
        match fs::metadata(&path) {
            Ok(md) if md.is_file() => Ok((path, md.len())),
            _ => {
                self.registry.evict(file_id);
                debug!(file_id, "evicted vanished file");
                Err(SegdlError::NotFound(format!(
                    "file no longer exists: {}",
                    path.display()
                )))
            }
        }
    }
}

fn sanitize(requested: &str) -> Result<PathBuf> {
    let normalized = requested.replace('\\', "/");
    let mut out = PathBuf::new();
    for comp in Path::new(&normalized).components() {
        match comp {
            Component::Normal(c) => out.push(c),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(SegdlError::InvalidArgument(format!(
                    "invalid file path: {requested}"
                )));
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(SegdlError::InvalidArgument("empty file path".into()));
    }
    Ok(out)
}

/// Creates `root` if missing, optionally seeding it with a 1 MiB `sample.txt`.
pub fn prepare_root(root: &Path, seed_sample: bool) -> Result<()> {
    if root.exists() {
        return Ok(());
    }
    fs::create_dir_all(root)?;
    if seed_sample {
        let mut text = String::with_capacity(MIB as usize);
        text.push_str(SAMPLE_TEXT);
        text.extend(std::iter::repeat_n('X', MIB as usize - SAMPLE_TEXT.len()));
        fs::write(root.join(SAMPLE_NAME), text)?;
    }
    Ok(())
}
