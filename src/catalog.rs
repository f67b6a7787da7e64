//! Catalog of tools and objectives
//!
//! In-memory store for the two entity kinds, loaded once from the tools and
//! objectives documents and immutable afterwards. Handles the legacy document
//! shapes at the load boundary so downstream logic sees one canonical
//! representation: tool slugs are authored (`id`, or the older `tag` alias)
//! or synthesized from the display name, and objectives arrive either flat or
//! grouped.
//!
//! The one non-trivial invariant lives here: a tool and an objective are
//! related if *either* side names the other. The tool side uses the
//! `objectives` tag association; the objective side uses `related_tools`,
//! resolved by exact slug match with a fallback that re-derives a slug from
//! the tool display name for pre-migration data.

use std::collections::HashMap;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolkitError};
use crate::slug::slugify;
use crate::taxonomy::TagCategory;

/// Entity kind, used by search results and graph nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Tool,
    Objective,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Tool => f.write_str("tool"),
            EntityKind::Objective => f.write_str("objective"),
        }
    }
}

/// Per-category tag slug associations of a tool
///
/// Every field is optional in the documents; an absent list is an empty set,
/// never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagAssociations {
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub innovation_stage: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub delivery_mechanism: Vec<String>,
    #[serde(default)]
    pub targeting: Vec<String>,
    #[serde(default)]
    pub timeline: Vec<String>,
}

impl TagAssociations {
    /// Slugs for one category
    pub fn get(&self, category: TagCategory) -> &[String] {
        match category {
            TagCategory::Objectives => &self.objectives,
            TagCategory::InnovationStage => &self.innovation_stage,
            TagCategory::Sectors => &self.sectors,
            TagCategory::DeliveryMechanism => &self.delivery_mechanism,
            TagCategory::Targeting => &self.targeting,
            TagCategory::Timeline => &self.timeline,
        }
    }

    /// Union of slugs across all categories, in category order
    pub fn all_slugs(&self) -> impl Iterator<Item = &str> {
        TagCategory::ALL
            .into_iter()
            .flat_map(|c| self.get(c).iter().map(String::as_str))
    }

    /// Whether any category carries the slug
    pub fn contains(&self, slug: &str) -> bool {
        self.all_slugs().any(|s| s == slug)
    }
}

/// A further-reading citation on a tool page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FurtherReading {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A policy instrument record
///
/// The narrative sections (`how_it_works`, `effectiveness`, ...) vary between
/// dataset generations, so they are kept as opaque YAML values keyed by
/// section name rather than modelled field by field. Rendering flattens them;
/// nothing else inspects them.
#[derive(Debug, Clone, Deserialize)]
pub struct Tool {
    pub name: String,
    /// Authored slug; older records use `tag`, missing slugs are synthesized
    /// from `name` during catalog construction.
    #[serde(default, alias = "tag")]
    pub id: Option<String>,
    #[serde(default)]
    pub tags: TagAssociations,
    #[serde(default)]
    pub further_reading: Vec<FurtherReading>,
    /// All remaining document fields, in the order serde_yaml yields them
    #[serde(flatten)]
    pub narrative: serde_yaml::Mapping,
}

impl Tool {
    /// The canonical slug (always present after catalog construction)
    pub fn slug(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// A policy-goal record
#[derive(Debug, Clone, Deserialize)]
pub struct Objective {
    pub name: String,
    #[serde(rename = "tag")]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Tool references authored on the objective side. Entries may be tool
    /// slugs or legacy name-derived slugs.
    #[serde(default, alias = "related_tool_slugs")]
    pub related_tools: Vec<String>,
}

/// A named group of objectives for sidebar display
///
/// Grouping is presentational only; it does not affect objective identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveGroup {
    #[serde(rename = "group")]
    pub label: String,
    pub objectives: Vec<Objective>,
}

/// Wire shape of the tools document
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ToolsDocument {
    #[serde(default)]
    pub tools: Vec<Tool>,
}

/// Wire shape of the objectives document: flat or grouped
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ObjectivesDocument {
    Grouped {
        objective_groups: Vec<ObjectiveGroup>,
    },
    Flat {
        objectives: Vec<Objective>,
    },
}

impl ObjectivesDocument {
    /// Normalize either shape into the grouped representation
    pub fn into_groups(self) -> Vec<ObjectiveGroup> {
        match self {
            ObjectivesDocument::Grouped { objective_groups } => objective_groups,
            ObjectivesDocument::Flat { objectives } => vec![ObjectiveGroup {
                label: "Objectives".to_string(),
                objectives,
            }],
        }
    }
}

/// A scored fuzzy-search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub slug: String,
    pub name: String,
    pub kind: EntityKind,
    pub score: i64,
}

/// The catalog store: ordered tools and objective groups with slug indexes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tools: Vec<Tool>,
    groups: Vec<ObjectiveGroup>,
    tool_index: HashMap<String, usize>,
    /// slug -> (group index, index within group)
    objective_index: HashMap<String, (usize, usize)>,
}

impl Catalog {
    /// Build the catalog from normalized document contents.
    ///
    /// Synthesizes missing tool slugs and builds the slug indexes. Duplicate
    /// slugs are a dataset authoring error and fail the load.
    pub fn new(mut tools: Vec<Tool>, groups: Vec<ObjectiveGroup>) -> Result<Self> {
        let mut tool_index = HashMap::with_capacity(tools.len());
        for (idx, tool) in tools.iter_mut().enumerate() {
            if tool.id.is_none() {
                tool.id = Some(slugify(&tool.name));
            }
            let slug = tool.slug().to_string();
            if tool_index.insert(slug.clone(), idx).is_some() {
                return Err(ToolkitError::DuplicateToolSlug(slug));
            }
        }

        let mut objective_index = HashMap::new();
        for (g, group) in groups.iter().enumerate() {
            for (o, objective) in group.objectives.iter().enumerate() {
                if objective_index
                    .insert(objective.slug.clone(), (g, o))
                    .is_some()
                {
                    return Err(ToolkitError::DuplicateObjectiveSlug(objective.slug.clone()));
                }
            }
        }

        Ok(Self {
            tools,
            groups,
            tool_index,
            objective_index,
        })
    }

    /// Parse a catalog from YAML document texts
    pub fn from_yaml(tools_yaml: &str, objectives_yaml: &str) -> Result<Self> {
        let tools: ToolsDocument = serde_yaml::from_str(tools_yaml)?;
        let objectives: ObjectivesDocument = serde_yaml::from_str(objectives_yaml)?;
        Self::new(tools.tools, objectives.into_groups())
    }

    /// All tools in document order
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Objective groups in document order
    pub fn objective_groups(&self) -> &[ObjectiveGroup] {
        &self.groups
    }

    /// All objectives flattened across groups, group order preserved
    pub fn objectives(&self) -> impl Iterator<Item = &Objective> {
        self.groups.iter().flat_map(|g| g.objectives.iter())
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn objective_count(&self) -> usize {
        self.objective_index.len()
    }

    /// Exact-match tool lookup. Stale references return `None`, not an error.
    pub fn tool_by_slug(&self, slug: &str) -> Option<&Tool> {
        self.tool_index.get(slug).map(|&idx| &self.tools[idx])
    }

    /// Exact-match objective lookup
    pub fn objective_by_slug(&self, slug: &str) -> Option<&Objective> {
        self.objective_index
            .get(slug)
            .map(|&(g, o)| &self.groups[g].objectives[o])
    }

    /// Resolve a tool reference from an objective's `related_tools` list:
    /// exact slug first, then a re-derived slug from the display name for
    /// legacy entries.
    pub fn resolve_tool_reference(&self, reference: &str) -> Option<&Tool> {
        self.tool_by_slug(reference)
            .or_else(|| self.tools.iter().find(|t| slugify(&t.name) == reference))
    }

    /// Whether the tool and objective are related in either direction
    pub fn are_related(&self, tool: &Tool, objective: &Objective) -> bool {
        if tool.tags.objectives.iter().any(|s| s == &objective.slug) {
            return true;
        }
        objective.related_tools.iter().any(|r| {
            self.resolve_tool_reference(r)
                .map(|t| t.slug() == tool.slug())
                .unwrap_or(false)
        })
    }

    /// Tools related to an objective: the objective's authored list first
    /// (resolved, in authored order), then tools that tag the objective but
    /// are not already listed. Unresolvable entries are skipped.
    pub fn related_tools(&self, objective: &Objective) -> Vec<&Tool> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();

        for reference in &objective.related_tools {
            if let Some(tool) = self.resolve_tool_reference(reference) {
                if !seen.contains(&tool.slug()) {
                    seen.push(tool.slug());
                    out.push(tool);
                }
            }
        }
        for tool in &self.tools {
            if tool.tags.objectives.iter().any(|s| s == &objective.slug)
                && !seen.contains(&tool.slug())
            {
                seen.push(tool.slug());
                out.push(tool);
            }
        }

        out
    }

    /// Objectives related to a tool, in group order, deduplicated
    pub fn related_objectives(&self, tool: &Tool) -> Vec<&Objective> {
        self.objectives()
            .filter(|o| self.are_related(tool, o))
            .collect()
    }

    /// Fuzzy search across tool and objective names, best matches first.
    ///
    /// This is a convenience lookup for the CLI; the filter engine's
    /// substring contract is separate and unchanged.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let matcher = SkimMatcherV2::default();
        let mut hits: Vec<SearchHit> = Vec::new();

        for tool in &self.tools {
            if let Some(score) = matcher.fuzzy_match(&tool.name, query) {
                hits.push(SearchHit {
                    slug: tool.slug().to_string(),
                    name: tool.name.clone(),
                    kind: EntityKind::Tool,
                    score,
                });
            }
        }
        for objective in self.objectives() {
            if let Some(score) = matcher.fuzzy_match(&objective.name, query) {
                hits.push(SearchHit {
                    slug: objective.slug.clone(),
                    name: objective.name.clone(),
                    kind: EntityKind::Objective,
                    score,
                });
            }
        }

        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(limit);
        hits
    }
}
