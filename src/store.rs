//! Directory-backed entity store
//!
//! One namespace directory per kind, one JSON file per record:
//!
//! ```text
//! <root>/
//! ├── Application/
//! │   ├── 46545b7a-1840-4e34-a26f-aef5eb954b25.json
//! │   └── 9293510b-534b-4dd0-b7c5-78d92e279400.json
//! ├── Device/
//! └── Relationship/
//!     └── relationship--82ca4ed1-a053-4fc1-b1cc-f4b58b4dbf8c.json
//! ```
//!
//! The store is single-process and unindexed. Writes go through a temporary
//! file and a rename so readers never observe a half-written record, but there
//! is no locking between concurrent writers.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::OutputFormat;
use crate::entity::{validate_id, Entity};
use crate::error::{Error, Result, ValidationError};
use crate::query::{self, QueryResult};
use crate::registry::KindRegistry;
use crate::schema::Kind;

/// File extension of record files
pub const RECORD_EXTENSION: &str = "json";

/// Behavioural switches for a [`Store`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub output_format: OutputFormat,
    pub atomic_writes: bool,
    /// Reject records whose enum values are not canonically cased
    pub strict_enum_case: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
            atomic_writes: true,
            strict_enum_case: false,
        }
    }
}

/// Outcome of a multi-id lookup
///
/// Ids that matched no record are reported in `missing` instead of silently
/// shrinking `found`.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    pub found: Vec<Entity>,
    pub missing: Vec<String>,
}

impl Lookup {
    /// True when every requested id was found
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The found entities, or `NotFound` naming every missing id
    pub fn into_result(self) -> Result<Vec<Entity>> {
        if self.missing.is_empty() {
            Ok(self.found)
        } else {
            Err(Error::NotFound { ids: self.missing })
        }
    }
}

/// The record store
pub struct Store {
    root: PathBuf,
    options: StoreOptions,
    registry: &'static KindRegistry,
}

impl Store {
    /// Open an existing store or create a new one with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open an existing store or create a new one
    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let registry = KindRegistry::global();

        let store = if root.is_dir() {
            let store = Self { root, options, registry };
            let namespaces = store.namespaces()?;
            info!(
                path = %store.root.display(),
                namespaces = namespaces.len(),
                "Using existing store"
            );
            store
        } else {
            fs::create_dir_all(&root)?;
            info!(path = %root.display(), "Creating new store");
            Self { root, options, registry }
        };

        Ok(store)
    }

    /// Get the root path of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn registry(&self) -> &'static KindRegistry {
        self.registry
    }

    /// Kind namespaces currently present on disk, in taxonomy order
    ///
    /// Directories that do not name a known kind are skipped with a warning.
    pub fn namespaces(&self) -> Result<Vec<Kind>> {
        let mut kinds = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            match self.registry.get(&name) {
                Some(descriptor) => kinds.push(descriptor.kind()),
                None => warn!(directory = %name, "Ignoring directory that is not a known kind"),
            }
        }
        kinds.sort();
        Ok(kinds)
    }

    /// Path of the namespace directory for `kind`
    pub fn namespace_path(&self, kind: Kind) -> PathBuf {
        self.root.join(kind.as_str())
    }

    /// Path of the record file for `(kind, id)`
    pub fn record_path(&self, kind: Kind, id: &str) -> PathBuf {
        self.namespace_path(kind)
            .join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    /// Whether a record exists for `(kind, id)`
    pub fn contains(&self, kind: Kind, id: &str) -> bool {
        validate_id(kind, id).is_ok() && self.record_path(kind, id).is_file()
    }

    /// Save a single entity
    pub fn save(&self, entity: &Entity, overwrite: bool) -> Result<()> {
        self.save_all(std::slice::from_ref(entity), overwrite)
    }

    /// Save a batch of entities
    ///
    /// Every entity is checked and serialized before anything is written, so a
    /// conflict or validation failure leaves the store untouched.
    pub fn save_all(&self, entities: &[Entity], overwrite: bool) -> Result<()> {
        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(entities.len());

        for entity in entities {
            if self.options.strict_enum_case {
                if let Some(diag) = entity.case_diagnostics().into_iter().next() {
                    return Err(ValidationError::NonCanonicalCase {
                        enumeration: diag.enumeration,
                        given: diag.given,
                        canonical: diag.canonical,
                    }
                    .into());
                }
            }

            let path = self.record_path(entity.kind(), entity.id());
            let duplicate = !seen.insert(path.clone());
            if !overwrite && (duplicate || path.exists()) {
                return Err(Error::StoreConflict {
                    kind: entity.kind().to_string(),
                    id: entity.id().to_string(),
                });
            }

            let content = self.encode(&entity.to_record())?;
            pending.push((entity, path, content));
        }

        for (entity, path, content) in pending {
            let dir = self.namespace_path(entity.kind());
            if !dir.is_dir() {
                fs::create_dir_all(&dir)?;
                debug!(kind = %entity.kind(), "Created namespace");
            }
            self.write_record(&dir, &path, &content)?;
            debug!(kind = %entity.kind(), id = %entity.id(), "Saved record");
        }

        Ok(())
    }

    fn encode(&self, record: &Map<String, Value>) -> Result<Vec<u8>> {
        let bytes = match self.options.output_format {
            OutputFormat::Pretty => serde_json::to_vec_pretty(record)?,
            OutputFormat::Compact => serde_json::to_vec(record)?,
        };
        Ok(bytes)
    }

    fn write_record(&self, dir: &Path, path: &Path, content: &[u8]) -> Result<()> {
        if self.options.atomic_writes {
            // Leading dot and .tmp suffix keep in-flight files out of scans
            let mut tmp = tempfile::Builder::new()
                .prefix(".")
                .suffix(".tmp")
                .tempfile_in(dir)?;
            tmp.write_all(content)?;
            tmp.as_file().sync_all()?;
            tmp.persist(path).map_err(|e| e.error)?;
        } else {
            fs::write(path, content)?;
        }
        Ok(())
    }

    /// Get one entity by id; `None` when no record matches
    ///
    /// With a kind the lookup goes straight to that namespace. Without one,
    /// every namespace is searched and the first match wins.
    pub fn get(&self, id: &str, kind: Option<Kind>) -> Result<Option<Entity>> {
        match self.locate(id, kind)? {
            Some(path) => Ok(Some(self.read_record(&path)?)),
            None => Ok(None),
        }
    }

    /// Get several entities, reporting which ids were not found
    pub fn get_many<S: AsRef<str>>(&self, ids: &[S], kind: Option<Kind>) -> Result<Lookup> {
        let namespaces = match kind {
            Some(kind) => vec![kind],
            None => self.namespaces()?,
        };

        let mut lookup = Lookup::default();
        for id in ids {
            let id = id.as_ref();
            match self.locate_in(id, &namespaces) {
                Some(path) => lookup.found.push(self.read_record(&path)?),
                None => lookup.missing.push(id.to_string()),
            }
        }
        Ok(lookup)
    }

    fn locate(&self, id: &str, kind: Option<Kind>) -> Result<Option<PathBuf>> {
        let namespaces = match kind {
            Some(kind) => vec![kind],
            None => self.namespaces()?,
        };
        Ok(self.locate_in(id, &namespaces))
    }

    fn locate_in(&self, id: &str, namespaces: &[Kind]) -> Option<PathBuf> {
        namespaces
            .iter()
            .filter(|kind| validate_id(**kind, id).is_ok())
            .map(|kind| self.record_path(*kind, id))
            .find(|path| path.is_file())
    }

    /// Load every record in one namespace; empty if the namespace does not exist
    ///
    /// Order follows the directory listing and is unspecified.
    pub fn list(&self, kind: Kind) -> Result<Vec<Entity>> {
        self.record_paths(kind)?
            .iter()
            .map(|path| self.read_record(path))
            .collect()
    }

    fn record_paths(&self, kind: Kind) -> Result<Vec<PathBuf>> {
        let dir = self.namespace_path(kind);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(walk_error)?;
            let path = entry.path();
            let is_record = entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == RECORD_EXTENSION)
                && !entry.file_name().to_string_lossy().starts_with('.');
            if is_record {
                paths.push(path.to_path_buf());
            }
        }
        debug!(kind = %kind, records = paths.len(), "Scanned namespace");
        Ok(paths)
    }

    fn read_record(&self, path: &Path) -> Result<Entity> {
        let corrupt = |reason: String| Error::CorruptRecord {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path)?;
        let record: Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
        let entity = self
            .registry
            .reconstruct(&record)
            .map_err(|e| corrupt(e.to_string()))?;

        // The file must live where its own kind and id say it does
        if self.record_path(entity.kind(), entity.id()) != path {
            return Err(corrupt(format!(
                "record {} of kind {} is stored in the wrong place",
                entity.id(),
                entity.kind()
            )));
        }
        debug!(kind = %entity.kind(), id = %entity.id(), "Loaded record");
        Ok(entity)
    }

    /// Run a query string against the store
    pub fn query(&self, query_string: &str) -> Result<QueryResult> {
        let parsed = query::parse(query_string)?;
        query::execute(self, &parsed)
    }
}

fn walk_error(err: walkdir::Error) -> Error {
    match err.into_io_error() {
        Some(io) => Error::Io(io),
        None => Error::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "filesystem loop while scanning store",
        )),
    }
}
