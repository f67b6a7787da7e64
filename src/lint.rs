//! Dataset diagnostics
//!
//! Data-quality checks over a loaded dataset. Everything here is advisory:
//! the runtime silently tolerates stale references and echoes unknown slugs,
//! so these warnings are how authoring mistakes get noticed.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::taxonomy::{TagCategory, Taxonomy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
}

/// One diagnostic about the dataset
#[derive(Debug, Clone, Serialize)]
pub struct LintWarning {
    pub code: &'static str,
    pub message: String,
    pub severity: Severity,
}

impl LintWarning {
    fn warning(code: &'static str, message: String) -> Self {
        Self {
            code,
            message,
            severity: Severity::Warning,
        }
    }

    fn info(code: &'static str, message: String) -> Self {
        Self {
            code,
            message,
            severity: Severity::Info,
        }
    }
}

/// Run all dataset checks
pub fn lint_dataset(taxonomy: &Taxonomy, catalog: &Catalog) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_cross_category_collisions(taxonomy, &mut warnings);
    check_tool_objective_collisions(catalog, &mut warnings);
    check_tool_tag_slugs(taxonomy, catalog, &mut warnings);
    check_related_tool_references(catalog, &mut warnings);
    check_objective_tag_targets(catalog, &mut warnings);
    warnings
}

/// Tag slugs are treated as globally unique for chip labelling; a slug
/// appearing in two categories makes the category-agnostic lookup ambiguous.
fn check_cross_category_collisions(taxonomy: &Taxonomy, warnings: &mut Vec<LintWarning>) {
    let mut seen: HashMap<&str, TagCategory> = HashMap::new();
    for category in TagCategory::ALL {
        for tag in taxonomy.tags(category) {
            match seen.get(tag.slug.as_str()) {
                Some(first) => warnings.push(LintWarning::warning(
                    "CROSS_CATEGORY_SLUG",
                    format!(
                        "tag slug '{}' appears in both '{}' and '{}'",
                        tag.slug, first, category
                    ),
                )),
                None => {
                    seen.insert(&tag.slug, category);
                }
            }
        }
    }
}

/// Tools and objectives share one node-id namespace on the map; a slug used
/// by both kinds collapses two entities into one node.
fn check_tool_objective_collisions(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    for objective in catalog.objectives() {
        if catalog.tool_by_slug(&objective.slug).is_some() {
            warnings.push(LintWarning::warning(
                "TOOL_OBJECTIVE_SLUG_COLLISION",
                format!(
                    "slug '{}' names both a tool and an objective",
                    objective.slug
                ),
            ));
        }
    }
}

/// Every slug a tool associates should exist in the matching taxonomy
/// category.
fn check_tool_tag_slugs(taxonomy: &Taxonomy, catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    for tool in catalog.tools() {
        for category in TagCategory::ALL {
            for slug in tool.tags.get(category) {
                let known = taxonomy.tags(category).iter().any(|t| &t.slug == slug);
                // `objectives` tags may point at catalog objectives rather
                // than taxonomy entries.
                let known = known
                    || (category == TagCategory::Objectives
                        && catalog.objective_by_slug(slug).is_some());
                if !known {
                    warnings.push(LintWarning::warning(
                        "UNKNOWN_TAG_SLUG",
                        format!(
                            "tool '{}' references unknown {} slug '{}'",
                            tool.slug(),
                            category,
                            slug
                        ),
                    ));
                }
            }
        }
    }
}

/// `related_tools` entries that resolve to no tool are dropped from the
/// graph; report them here instead.
fn check_related_tool_references(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    for objective in catalog.objectives() {
        for reference in &objective.related_tools {
            if catalog.resolve_tool_reference(reference).is_none() {
                warnings.push(LintWarning::warning(
                    "DANGLING_TOOL_REFERENCE",
                    format!(
                        "objective '{}' references unresolvable tool '{}'",
                        objective.slug, reference
                    ),
                ));
            }
        }
    }
}

/// An objective no tool tags and which lists no tools is an isolated node on
/// the map; worth knowing, not necessarily wrong.
fn check_objective_tag_targets(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    for objective in catalog.objectives() {
        let tagged = catalog
            .tools()
            .iter()
            .any(|t| t.tags.objectives.iter().any(|s| s == &objective.slug));
        if !tagged && objective.related_tools.is_empty() {
            warnings.push(LintWarning::info(
                "ISOLATED_OBJECTIVE",
                format!("objective '{}' is connected to no tools", objective.slug),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::taxonomy::Taxonomy;

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_yaml(
            r#"
tags:
  sectors:
    - tag: ict
      name: ICT
  timeline:
    - tag: ict
      name: Duplicate Slug
    - tag: short_term
      name: Short Term
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_cross_category_collision_reported() {
        let catalog = Catalog::from_yaml("tools: []\n", "objectives: []\n").unwrap();
        let warnings = lint_dataset(&taxonomy(), &catalog);
        assert!(warnings.iter().any(|w| w.code == "CROSS_CATEGORY_SLUG"));
    }

    #[test]
    fn test_tool_objective_slug_collision_reported() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Boost R&D\n    id: boost_rd\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n",
        )
        .unwrap();
        let warnings = lint_dataset(&taxonomy(), &catalog);
        assert!(warnings
            .iter()
            .any(|w| w.code == "TOOL_OBJECTIVE_SLUG_COLLISION" && w.message.contains("boost_rd")));
    }

    #[test]
    fn test_unknown_tag_slug_reported() {
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    tags:\n      sectors: [agritech]\n",
            "objectives: []\n",
        )
        .unwrap();
        let warnings = lint_dataset(&taxonomy(), &catalog);
        assert!(warnings
            .iter()
            .any(|w| w.code == "UNKNOWN_TAG_SLUG" && w.message.contains("agritech")));
    }

    #[test]
    fn test_objective_tag_satisfied_by_catalog_objective() {
        // The objective exists only in the catalog, not the taxonomy.
        let catalog = Catalog::from_yaml(
            "tools:\n  - name: Grants\n    tags:\n      objectives: [boost_rd]\n",
            "objectives:\n  - name: Boost R&D\n    tag: boost_rd\n    description: d\n",
        )
        .unwrap();
        let warnings = lint_dataset(&taxonomy(), &catalog);
        assert!(!warnings.iter().any(|w| w.code == "UNKNOWN_TAG_SLUG"));
    }

    #[test]
    fn test_dangling_reference_reported() {
        let catalog = Catalog::from_yaml(
            "tools: []\n",
            "objectives:\n  - name: O\n    tag: o\n    description: d\n    related_tools: [ghost]\n",
        )
        .unwrap();
        let warnings = lint_dataset(&taxonomy(), &catalog);
        assert!(warnings.iter().any(|w| w.code == "DANGLING_TOOL_REFERENCE"));
    }

    #[test]
    fn test_isolated_objective_is_info() {
        let catalog = Catalog::from_yaml(
            "tools: []\n",
            "objectives:\n  - name: O\n    tag: o\n    description: d\n",
        )
        .unwrap();
        let warnings = lint_dataset(&taxonomy(), &catalog);
        let isolated = warnings.iter().find(|w| w.code == "ISOLATED_OBJECTIVE").unwrap();
        assert_eq!(isolated.severity, Severity::Info);
    }
}
