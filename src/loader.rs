//! Dataset loading
//!
//! Loads the four static documents (tags, tools, objectives, guide) from a
//! data directory or from the dataset embedded in the binary, normalizes the
//! legacy shapes at this boundary, and joins them fail-fast: if any document
//! is missing or unparseable the whole load errors and the caller degrades
//! to the guide view. The tools document has gone through several
//! generations (`tools.yaml`, `tools_v5.yaml`, ...); discovery picks the
//! newest by version suffix.

use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::catalog::{Catalog, ObjectivesDocument, ToolsDocument};
use crate::error::{Result, ToolkitError};
use crate::taxonomy::{TagsDocument, Taxonomy};

/// The authored dataset compiled into the binary
static EMBEDDED_DATA: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

const TAGS_DOCUMENT: &str = "tags_list.yaml";
const OBJECTIVES_DOCUMENTS: [&str; 2] = ["objectives_grouped.yaml", "objectives.yaml"];
const GUIDE_DOCUMENTS: [&str; 2] = ["guide.md", "guide.html"];

/// The fully loaded, immutable dataset
#[derive(Debug)]
pub struct Toolkit {
    pub taxonomy: Taxonomy,
    pub catalog: Catalog,
    /// Pre-rendered guide markup, emitted verbatim
    pub guide: String,
    /// SHA-256 over the raw documents, for determinism checks
    pub bundle_hash: String,
}

/// Raw document texts, before parsing
struct RawDocuments {
    tags: String,
    tools: String,
    objectives: String,
    guide: String,
}

impl RawDocuments {
    fn bundle_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.tags.as_bytes());
        hasher.update(self.tools.as_bytes());
        hasher.update(self.objectives.as_bytes());
        hasher.update(self.guide.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl Toolkit {
    /// Load from a data directory on disk
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_directory(data_dir)?;
        Self::from_raw(raw)
    }

    /// Load the dataset embedded in the binary
    pub fn from_embedded() -> Result<Self> {
        let raw = read_embedded(&EMBEDDED_DATA)?;
        Self::from_raw(raw)
    }

    /// The embedded guide markup, available even when a directory load fails
    pub fn embedded_guide() -> &'static str {
        for name in GUIDE_DOCUMENTS {
            if let Some(file) = EMBEDDED_DATA.get_file(name) {
                if let Some(text) = file.contents_utf8() {
                    return text;
                }
            }
        }
        ""
    }

    fn from_raw(raw: RawDocuments) -> Result<Self> {
        let tags: TagsDocument =
            serde_yaml::from_str(&raw.tags).map_err(|source| ToolkitError::DocumentParse {
                name: TAGS_DOCUMENT.to_string(),
                source,
            })?;
        let tools: ToolsDocument =
            serde_yaml::from_str(&raw.tools).map_err(|source| ToolkitError::DocumentParse {
                name: "tools document".to_string(),
                source,
            })?;
        let objectives: ObjectivesDocument = serde_yaml::from_str(&raw.objectives).map_err(
            |source| ToolkitError::DocumentParse {
                name: "objectives document".to_string(),
                source,
            },
        )?;

        let bundle_hash = raw.bundle_hash();
        let taxonomy = Taxonomy::from_document(tags);
        let catalog = Catalog::new(tools.tools, objectives.into_groups())?;

        info!(
            tools = catalog.tool_count(),
            objectives = catalog.objective_count(),
            tags = taxonomy.tag_count(),
            bundle = %bundle_hash,
            "dataset loaded"
        );

        Ok(Self {
            taxonomy,
            catalog,
            guide: raw.guide,
            bundle_hash,
        })
    }
}

fn read_directory(data_dir: &Path) -> Result<RawDocuments> {
    let missing = |name: &str| ToolkitError::DocumentMissing {
        dir: data_dir.to_path_buf(),
        name: name.to_string(),
    };

    let tags_path = data_dir.join(TAGS_DOCUMENT);
    if !tags_path.is_file() {
        return Err(missing(TAGS_DOCUMENT));
    }
    let tags = fs::read_to_string(&tags_path)?;

    let tools_name = discover_tools_document(data_dir).ok_or_else(|| missing("tools.yaml"))?;
    debug!(document = %tools_name, "selected tools document");
    let tools = fs::read_to_string(data_dir.join(&tools_name))?;

    let objectives_name = OBJECTIVES_DOCUMENTS
        .iter()
        .find(|name| data_dir.join(name).is_file())
        .ok_or_else(|| missing(OBJECTIVES_DOCUMENTS[0]))?;
    let objectives = fs::read_to_string(data_dir.join(objectives_name))?;

    let guide_name = GUIDE_DOCUMENTS
        .iter()
        .find(|name| data_dir.join(name).is_file())
        .ok_or_else(|| missing(GUIDE_DOCUMENTS[0]))?;
    let guide = fs::read_to_string(data_dir.join(guide_name))?;

    Ok(RawDocuments {
        tags,
        tools,
        objectives,
        guide,
    })
}

fn read_embedded(dir: &Dir<'_>) -> Result<RawDocuments> {
    let read = |name: &str| -> Option<String> {
        dir.get_file(name)
            .and_then(|f| f.contents_utf8())
            .map(str::to_string)
    };
    let missing = |name: &str| ToolkitError::DocumentMissing {
        dir: "<embedded>".into(),
        name: name.to_string(),
    };

    let tools_name = dir
        .files()
        .filter_map(|f| f.path().to_str())
        .filter(|name| is_tools_document(name))
        .max_by_key(|name| tools_generation(name))
        .map(str::to_string)
        .ok_or_else(|| missing("tools.yaml"))?;

    Ok(RawDocuments {
        tags: read(TAGS_DOCUMENT).ok_or_else(|| missing(TAGS_DOCUMENT))?,
        tools: read(&tools_name).ok_or_else(|| missing(&tools_name))?,
        objectives: OBJECTIVES_DOCUMENTS
            .iter()
            .find_map(|name| read(name))
            .ok_or_else(|| missing(OBJECTIVES_DOCUMENTS[0]))?,
        guide: GUIDE_DOCUMENTS
            .iter()
            .find_map(|name| read(name))
            .ok_or_else(|| missing(GUIDE_DOCUMENTS[0]))?,
    })
}

fn is_tools_document(name: &str) -> bool {
    name.starts_with("tools") && name.ends_with(".yaml")
}

/// Version rank of a tools document: `tools.yaml` is generation 0,
/// `tools_v5.yaml` generation 5.
fn tools_generation(name: &str) -> u32 {
    name.strip_prefix("tools_v")
        .and_then(|rest| rest.strip_suffix(".yaml"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Pick the newest tools document in a directory
fn discover_tools_document(data_dir: &Path) -> Option<String> {
    WalkDir::new(data_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| is_tools_document(name))
        .max_by_key(|name| tools_generation(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_generation_ordering() {
        assert_eq!(tools_generation("tools.yaml"), 0);
        assert_eq!(tools_generation("tools_v5.yaml"), 5);
        assert!(tools_generation("tools_v12.yaml") > tools_generation("tools_v5.yaml"));
    }

    #[test]
    fn test_discovery_prefers_newest_generation() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["tools.yaml", "tools_v5.yaml", "tools_v3.yaml"] {
            fs::write(dir.path().join(name), "tools: []\n").unwrap();
        }
        assert_eq!(
            discover_tools_document(dir.path()).as_deref(),
            Some("tools_v5.yaml")
        );
    }

    #[test]
    fn test_missing_document_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tools.yaml"), "tools: []\n").unwrap();
        let err = Toolkit::load(dir.path()).unwrap_err();
        assert!(matches!(err, ToolkitError::DocumentMissing { .. }));
    }

    #[test]
    fn test_parse_failure_names_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TAGS_DOCUMENT), "tags: [broken\n").unwrap();
        fs::write(dir.path().join("tools.yaml"), "tools: []\n").unwrap();
        fs::write(dir.path().join("objectives.yaml"), "objectives: []\n").unwrap();
        fs::write(dir.path().join("guide.md"), "# Guide\n").unwrap();

        let err = Toolkit::load(dir.path()).unwrap_err();
        assert!(matches!(err, ToolkitError::DocumentParse { .. }));
    }

    #[test]
    fn test_embedded_dataset_loads() {
        let toolkit = Toolkit::from_embedded().unwrap();
        assert!(toolkit.catalog.tool_count() > 0);
        assert!(toolkit.catalog.objective_count() > 0);
        assert!(toolkit.taxonomy.tag_count() > 0);
        assert!(!toolkit.guide.is_empty());
        assert_eq!(toolkit.bundle_hash.len(), 64);
    }

    #[test]
    fn test_embedded_guide_always_available() {
        assert!(!Toolkit::embedded_guide().is_empty());
    }
}
