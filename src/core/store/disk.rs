//! Filesystem-backed note storage
//!
//! Layout under the storage root:
//!
//! ```text
//! {root}/notes_metadata.json           descriptions, keyed by "grade/subject/filename"
//! {root}/{grade}/{subject}/{filename}  PDF bytes
//! ```
//!
//! The metadata object keeps insertion order, which is the listing order.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use super::{NoteRecord, NoteStore, StoreError};
use crate::core::catalog::{Grade, NoteKey, Subject};
use crate::core::config::StorageBackend;

/// Name of the metadata file inside the storage root
pub const METADATA_FILE: &str = "notes_metadata.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredMeta {
    #[serde(default)]
    description: String,
}

/// Descriptions in first-insertion order
#[derive(Debug, Clone, Default)]
struct MetadataIndex {
    order: Vec<NoteKey>,
    descriptions: HashMap<NoteKey, String>,
}

impl MetadataIndex {
    fn insert(&mut self, key: NoteKey, description: String) {
        if !self.descriptions.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.descriptions.insert(key, description);
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut map = Map::new();
        for key in &self.order {
            let description = self.descriptions.get(key).cloned().unwrap_or_default();
            map.insert(key.storage_key(), serde_json::to_value(StoredMeta { description })?);
        }
        serde_json::to_string_pretty(&Value::Object(map))
    }

    fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let map: Map<String, Value> = serde_json::from_str(content)?;
        let mut index = Self::default();

        for (raw_key, value) in map {
            let key = match NoteKey::parse(&raw_key) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping metadata entry: {}", e);
                    continue;
                }
            };
            let meta: StoredMeta = serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Unreadable metadata for {}: {}", raw_key, e);
                StoredMeta::default()
            });
            index.insert(key, meta.description);
        }

        Ok(index)
    }
}

/// Note store persisted under a root directory
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
    index: MetadataIndex,
}

impl FsStore {
    /// Open the store at `root`, creating the folder layout and an empty
    /// metadata file when they are missing.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        Self::init_layout(root)?;

        let metadata_path = root.join(METADATA_FILE);
        let mut index = match Self::load_metadata(&metadata_path) {
            Ok(index) => index,
            Err(e @ StoreError::Metadata { .. }) => {
                tracing::warn!("{}; starting with empty metadata", e);
                MetadataIndex::default()
            }
            Err(e) => return Err(e),
        };

        let adopted = Self::adopt_orphans(root, &mut index);
        if adopted > 0 {
            tracing::info!("Adopted {} PDF files without metadata", adopted);
        }

        tracing::info!("Note storage ready at: {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            index,
        })
    }

    fn init_layout(root: &Path) -> Result<(), StoreError> {
        for grade in Grade::ALL {
            for subject in Subject::ALL {
                let dir = root.join(grade.as_str()).join(subject.as_str());
                fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
            }
        }

        let metadata_path = root.join(METADATA_FILE);
        if !metadata_path.exists() {
            fs::write(&metadata_path, "{}").map_err(|e| StoreError::io(&metadata_path, e))?;
        }
        Ok(())
    }

    fn load_metadata(path: &Path) -> Result<MetadataIndex, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(MetadataIndex::default()),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        MetadataIndex::from_json(&content).map_err(|source| StoreError::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Index PDFs found in grade/subject folders that have no metadata entry
    fn adopt_orphans(root: &Path, index: &mut MetadataIndex) -> usize {
        let mut adopted = 0;

        let entries = WalkDir::new(root)
            .min_depth(3)
            .max_depth(3)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in entries {
            let Some(key) = Self::key_for_path(root, entry.path()) else {
                continue;
            };
            if !index.descriptions.contains_key(&key) {
                tracing::debug!("Adopting {}", key);
                index.insert(key, String::new());
                adopted += 1;
            }
        }

        adopted
    }

    /// Map `{root}/{grade}/{subject}/{file}.pdf` back to its key
    fn key_for_path(root: &Path, path: &Path) -> Option<NoteKey> {
        if !is_pdf(path) {
            return None;
        }
        let relative = path.strip_prefix(root).ok()?;
        let mut components = relative.iter().map(|c| c.to_str());
        let grade: Grade = components.next()??.parse().ok()?;
        let subject: Subject = components.next()??.parse().ok()?;
        let filename = components.next()??;
        if filename.starts_with('.') {
            return None;
        }
        Some(NoteKey::new(grade, subject, filename))
    }

    fn payload_path(&self, key: &NoteKey) -> PathBuf {
        self.root
            .join(key.grade.as_str())
            .join(key.subject.as_str())
            .join(&key.filename)
    }

    fn read_payload(&self, key: &NoteKey) -> Option<Vec<u8>> {
        let path = self.payload_path(key);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_metadata(&self, index: &MetadataIndex) -> Result<(), StoreError> {
        let path = self.root.join(METADATA_FILE);
        let content = index.to_json().map_err(|source| StoreError::Metadata {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, content.as_bytes())
    }
}

impl NoteStore for FsStore {
    fn put(&mut self, key: NoteKey, description: String, payload: Option<Vec<u8>>) -> Result<(), StoreError> {
        validate_filename(&key.filename)?;

        let path = self.payload_path(&key);
        let backup = stash_payload(&path)?;

        let mut next = self.index.clone();
        next.insert(key.clone(), description);

        let result = match &payload {
            Some(bytes) => write_atomic(&path, bytes),
            None => Ok(()),
        }
        .and_then(|()| self.write_metadata(&next));

        if let Err(e) = result {
            restore_payload(&path, backup.as_deref());
            return Err(e);
        }

        if let Some(backup) = backup {
            if let Err(e) = fs::remove_file(&backup) {
                tracing::warn!("Failed to remove {}: {}", backup.display(), e);
            }
        }
        self.index = next;

        tracing::info!("Saved note: {}", key);
        Ok(())
    }

    fn get(&self, key: &NoteKey) -> NoteRecord {
        match self.index.descriptions.get(key) {
            Some(description) => NoteRecord::new(description.clone(), self.read_payload(key)),
            None => NoteRecord::default(),
        }
    }

    fn list_keys(&self, grade: Grade, subject: Subject) -> Vec<String> {
        self.index
            .order
            .iter()
            .filter(|key| key.is_in(grade, subject))
            .map(|key| key.filename.clone())
            .collect()
    }

    fn contains(&self, key: &NoteKey) -> bool {
        self.index.descriptions.contains_key(key)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Filesystem
    }
}

/// Whether the path has a `.pdf` extension, ignoring case
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Reject filenames that could leave their grade/subject folder
fn validate_filename(filename: &str) -> Result<(), StoreError> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);

    if invalid {
        return Err(StoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Move an existing payload file aside so a failed put can put it back
fn stash_payload(path: &Path) -> Result<Option<PathBuf>, StoreError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    }

    let backup = sibling(path, "bak");
    fs::rename(path, &backup).map_err(|e| StoreError::io(path, e))?;
    Ok(Some(backup))
}

/// Undo a partial put: drop whatever was written and bring back the stashed payload
fn restore_payload(path: &Path, backup: Option<&Path>) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::debug!("Nothing to remove at {}: {}", path.display(), e),
    }

    if let Some(backup) = backup {
        if let Err(e) = fs::rename(backup, path) {
            tracing::error!("Failed to restore {}: {}", path.display(), e);
        }
    }
}

/// Hidden sibling `.{name}.{suffix}`, skipped by the orphan scan
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}", file_name, suffix))
}

/// Write through a temporary sibling file and rename it into place
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp_path = sibling(path, "tmp");

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        tracing::warn!("Write to {} failed: {}", path.display(), e);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::conformance;
    use tempfile::tempdir;

    fn waves() -> NoteKey {
        NoteKey::new(Grade::Ten, Subject::Physics, "waves.pdf")
    }

    #[test]
    fn test_fs_store_conformance() {
        let dir = tempdir().unwrap();
        let mut n = 0;
        conformance::run_all(|| {
            n += 1;
            Box::new(FsStore::open(&dir.path().join(format!("root{}", n))).unwrap())
        });
    }

    #[test]
    fn test_open_creates_layout() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("NotesApp_Uploads");

        FsStore::open(&root).unwrap();

        for grade in Grade::ALL {
            for subject in Subject::ALL {
                assert!(root.join(grade.as_str()).join(subject.as_str()).is_dir());
            }
        }
        assert_eq!(fs::read_to_string(root.join(METADATA_FILE)).unwrap(), "{}");
    }

    #[test]
    fn test_payload_and_metadata_on_disk() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();

        store
            .put(waves(), "chapter on waves".to_string(), Some(b"<pdf-bytes>".to_vec()))
            .unwrap();

        let payload = fs::read(dir.path().join("10/Physics/waves.pdf")).unwrap();
        assert_eq!(payload, b"<pdf-bytes>");

        let metadata: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap()).unwrap();
        assert_eq!(metadata["10/Physics/waves.pdf"]["description"], "chapter on waves");
    }

    #[test]
    fn test_reopen_preserves_records_and_order() {
        let dir = tempdir().unwrap();
        {
            let mut store = FsStore::open(dir.path()).unwrap();
            for name in ["z.pdf", "a.pdf", "m.pdf"] {
                let key = NoteKey::new(Grade::Twelve, Subject::Chemistry, name);
                store.put(key, format!("about {}", name), Some(vec![1, 2, 3])).unwrap();
            }
        }

        let store = FsStore::open(dir.path()).unwrap();
        assert_eq!(
            store.list_keys(Grade::Twelve, Subject::Chemistry),
            vec!["z.pdf", "a.pdf", "m.pdf"]
        );
        let record = store.get(&NoteKey::new(Grade::Twelve, Subject::Chemistry, "a.pdf"));
        assert_eq!(record, NoteRecord::new("about a.pdf", Some(vec![1, 2, 3])));
    }

    #[test]
    fn test_put_without_payload_removes_old_file() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();

        store.put(waves(), "v1".to_string(), Some(b"old".to_vec())).unwrap();
        store.put(waves(), "v2".to_string(), None).unwrap();

        assert!(!dir.path().join("10/Physics/waves.pdf").exists());
        assert_eq!(store.get(&waves()), NoteRecord::new("v2", None));
    }

    #[test]
    fn test_adopts_orphan_pdfs() {
        let dir = tempdir().unwrap();
        {
            let mut store = FsStore::open(dir.path()).unwrap();
            store.put(waves(), "indexed".to_string(), Some(b"w".to_vec())).unwrap();
        }
        fs::write(dir.path().join("10/Physics/optics.pdf"), b"o").unwrap();
        fs::write(dir.path().join("10/Physics/acoustics.PDF"), b"a").unwrap();
        fs::write(dir.path().join("10/Physics/readme.txt"), b"skip").unwrap();

        let store = FsStore::open(dir.path()).unwrap();

        assert_eq!(
            store.list_keys(Grade::Ten, Subject::Physics),
            vec!["waves.pdf", "acoustics.PDF", "optics.pdf"]
        );
        let orphan = store.get(&NoteKey::new(Grade::Ten, Subject::Physics, "optics.pdf"));
        assert_eq!(orphan, NoteRecord::new("", Some(b"o".to_vec())));
    }

    #[test]
    fn test_corrupt_metadata_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "not json").unwrap();

        let mut store = FsStore::open(dir.path()).unwrap();
        assert!(store.list_keys(Grade::Ten, Subject::Physics).is_empty());
        assert_eq!(fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap(), "not json");

        store.put(waves(), "fresh".to_string(), None).unwrap();
        let reopened = FsStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(&waves()).description, "fresh");
    }

    #[test]
    fn test_unknown_metadata_keys_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILE),
            r#"{"13/Art/x.pdf": {"description": "bad"}, "9/Tamil/ok.pdf": {"description": "good", "content": null}}"#,
        )
        .unwrap();

        let store = FsStore::open(dir.path()).unwrap();
        assert_eq!(store.list_keys(Grade::Nine, Subject::Tamil), vec!["ok.pdf"]);
        assert_eq!(
            store.get(&NoteKey::new(Grade::Nine, Subject::Tamil, "ok.pdf")).description,
            "good"
        );
    }

    #[test]
    fn test_rejects_escaping_filenames() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();

        for name in ["", ".", "..", "../escape.pdf", "a/b.pdf", "a\\b.pdf"] {
            let key = NoteKey::new(Grade::Nine, Subject::English, name);
            let result = store.put(key.clone(), "x".to_string(), Some(b"x".to_vec()));
            assert!(matches!(result, Err(StoreError::InvalidFilename(_))), "{name:?}");
            assert!(!store.contains(&key));
        }
    }

    #[test]
    fn test_failed_write_aborts_put() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();
        // A directory where the payload should go makes the rename fail
        fs::create_dir(dir.path().join("10/Physics/waves.pdf")).unwrap();

        let result = store.put(waves(), "blocked".to_string(), Some(b"x".to_vec()));

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(!store.contains(&waves()));
        assert!(!dir.path().join("10/Physics/.waves.pdf.tmp").exists());
    }

    /// Swap the metadata file for a directory so the next metadata write fails
    fn block_metadata(root: &Path) {
        let path = root.join(METADATA_FILE);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
    }

    #[test]
    fn test_failed_metadata_write_restores_old_payload() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();
        store.put(waves(), "v1".to_string(), Some(b"old".to_vec())).unwrap();
        block_metadata(dir.path());

        let replaced = store.put(waves(), "v2".to_string(), Some(b"new".to_vec()));
        assert!(matches!(replaced, Err(StoreError::Io { .. })));
        assert_eq!(store.get(&waves()), NoteRecord::new("v1", Some(b"old".to_vec())));

        let cleared = store.put(waves(), "v3".to_string(), None);
        assert!(cleared.is_err());
        assert_eq!(store.get(&waves()), NoteRecord::new("v1", Some(b"old".to_vec())));
        assert!(!dir.path().join("10/Physics/.waves.pdf.bak").exists());
    }

    #[test]
    fn test_failed_metadata_write_leaves_no_new_file() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();
        block_metadata(dir.path());
        let fresh = NoteKey::new(Grade::Ten, Subject::Physics, "fresh.pdf");

        let result = store.put(fresh.clone(), "never stored".to_string(), Some(b"f".to_vec()));

        assert!(result.is_err());
        assert!(!store.contains(&fresh));
        assert!(!dir.path().join("10/Physics/fresh.pdf").exists());

        fs::remove_dir(dir.path().join(METADATA_FILE)).unwrap();
        let reopened = FsStore::open(dir.path()).unwrap();
        assert!(reopened.list_keys(Grade::Ten, Subject::Physics).is_empty());
    }

    #[test]
    fn test_successful_overwrite_leaves_no_backup() {
        let dir = tempdir().unwrap();
        let mut store = FsStore::open(dir.path()).unwrap();

        store.put(waves(), "v1".to_string(), Some(b"old".to_vec())).unwrap();
        store.put(waves(), "v2".to_string(), Some(b"new".to_vec())).unwrap();

        assert!(!dir.path().join("10/Physics/.waves.pdf.bak").exists());
        assert_eq!(store.get(&waves()), NoteRecord::new("v2", Some(b"new".to_vec())));
    }

    #[test]
    fn test_open_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("occupied");
        fs::write(&root, b"file").unwrap();

        assert!(matches!(FsStore::open(&root), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("notes.pdf")));
        assert!(is_pdf(Path::new("NOTES.PDF")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
