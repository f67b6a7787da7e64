//! UK R&D Policy Toolkit
//!
//! A browsable reference engine for UK R&D policy instruments ("tools") and
//! policy goals ("objectives"), loaded from static YAML documents.
//!
//! ## Features
//!
//! - **Taxonomy Store**: six fixed tag categories with slug → display-name
//!   resolution that degrades gracefully on misses
//! - **Catalog Store**: immutable tool/objective records with slug indexes
//!   and legacy-shape tolerance at the load boundary
//! - **Filter Engine**: pure AND-composed tag filtering plus case-insensitive
//!   substring search
//! - **Relationship Graph**: deduplicated tool↔objective network for the
//!   force-directed map, exported as DOT or node/link JSON
//! - **Dataset Lint**: advisory diagnostics for stale references and slug
//!   collisions
//!
//! ## Architecture
//!
//! ```text
//! data/
//! ├── tags_list.yaml           # taxonomy: {tags: {<category>: [{tag, name}]}}
//! ├── tools_v5.yaml            # catalog: {tools: [...]} (newest generation wins)
//! ├── objectives_grouped.yaml  # {objective_groups: [...]} or flat {objectives: [...]}
//! └── guide.md                 # pre-rendered guide markup, emitted verbatim
//! ```
//!
//! All documents load once, fail-fast, into an immutable [`Toolkit`]; every
//! filter/resolve/graph operation afterwards is synchronous and pure.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod lint;
pub mod loader;
pub mod slug;
pub mod state;
pub mod taxonomy;

pub use catalog::{Catalog, EntityKind, Objective, ObjectiveGroup, SearchHit, Tool};
pub use error::{Result, ToolkitError};
pub use filter::{filter_objective_groups, filter_tools};
pub use graph::{RelationEdge, RelationGraph, RelationNode};
pub use lint::{lint_dataset, LintWarning, Severity};
pub use loader::Toolkit;
pub use slug::slugify;
pub use state::{SelectionState, View};
pub use taxonomy::{Tag, TagCategory, Taxonomy};
