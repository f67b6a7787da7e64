//! Filter engine
//!
//! Pure functions over the catalog: no state, no errors, rerun in full on
//! every change. Filters AND together across categories; a single filter is
//! satisfied by a match in any category. Search is a case-insensitive
//! substring test against display names.

use crate::catalog::{ObjectiveGroup, Tool};

/// Case-insensitive substring test; an empty needle always passes
fn name_matches(name: &str, search_text: &str) -> bool {
    search_text.is_empty() || name.to_lowercase().contains(&search_text.to_lowercase())
}

/// The visible subset of tools for the active filters and search text.
///
/// A tool passes the tag test iff every active slug appears somewhere in its
/// tag associations (empty filter set passes everything), and the search test
/// iff its display name contains `search_text` case-insensitively. Input
/// order is preserved.
pub fn filter_tools<'a>(
    tools: &'a [Tool],
    active_filters: &[String],
    search_text: &str,
) -> Vec<&'a Tool> {
    tools
        .iter()
        .filter(|tool| active_filters.iter().all(|slug| tool.tags.contains(slug)))
        .filter(|tool| name_matches(&tool.name, search_text))
        .collect()
}

/// Objective groups narrowed by search text.
///
/// Within each group, keeps objectives whose display name matches; groups
/// left empty are dropped. Group order and intra-group order are preserved.
pub fn filter_objective_groups(groups: &[ObjectiveGroup], search_text: &str) -> Vec<ObjectiveGroup> {
    groups
        .iter()
        .filter_map(|group| {
            let objectives: Vec<_> = group
                .objectives
                .iter()
                .filter(|o| name_matches(&o.name, search_text))
                .cloned()
                .collect();
            if objectives.is_empty() {
                None
            } else {
                Some(ObjectiveGroup {
                    label: group.label.clone(),
                    objectives,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_yaml(
            r#"
tools:
  - name: Tax Credits
    id: tax_credits
    tags:
      sectors: [ict]
      innovation_stage: [early_stage]
  - name: R&D TAX Relief
    id: rd_tax_relief
    tags:
      sectors: [ict]
  - name: Innovation Grants
    id: innovation_grants
    tags:
      innovation_stage: [early_stage]
  - name: Prizes
    id: prizes
"#,
            r#"
objective_groups:
  - group: Investment
    objectives:
      - name: Boost R&D
        tag: boost_rd
        description: d
  - group: Diffusion
    objectives:
      - name: Spread Technology
        tag: spread_tech
        description: d
"#,
        )
        .unwrap()
    }

    fn slugs<'a>(tools: &[&'a Tool]) -> Vec<&'a str> {
        tools.iter().map(|t| t.slug()).collect()
    }

    #[test]
    fn test_empty_filters_and_search_is_identity() {
        let catalog = catalog();
        let visible = filter_tools(catalog.tools(), &[], "");
        assert_eq!(visible.len(), catalog.tools().len());
        assert_eq!(
            slugs(&visible),
            vec!["tax_credits", "rd_tax_relief", "innovation_grants", "prizes"]
        );
    }

    #[test]
    fn test_filters_and_together_across_categories() {
        let catalog = catalog();
        let active = vec!["ict".to_string(), "early_stage".to_string()];
        let visible = filter_tools(catalog.tools(), &active, "");
        // Each filter alone matches a larger, different set.
        assert_eq!(slugs(&visible), vec!["tax_credits"]);
        assert_eq!(filter_tools(catalog.tools(), &["ict".to_string()], "").len(), 2);
        assert_eq!(
            filter_tools(catalog.tools(), &["early_stage".to_string()], "").len(),
            2
        );
    }

    #[test]
    fn test_unmatched_filter_empties_result() {
        let catalog = catalog();
        let visible = filter_tools(catalog.tools(), &["no_such_tag".to_string()], "");
        assert!(visible.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = catalog();
        let visible = filter_tools(catalog.tools(), &[], "tax");
        assert_eq!(slugs(&visible), vec!["tax_credits", "rd_tax_relief"]);
    }

    #[test]
    fn test_search_only_narrows() {
        let catalog = catalog();
        let active = vec!["ict".to_string()];
        let unsearched = filter_tools(catalog.tools(), &active, "");
        let searched = filter_tools(catalog.tools(), &active, "relief");
        for tool in &searched {
            assert!(unsearched.iter().any(|t| t.slug() == tool.slug()));
        }
        assert_eq!(slugs(&searched), vec!["rd_tax_relief"]);
    }

    #[test]
    fn test_both_tests_must_pass() {
        let catalog = catalog();
        let active = vec!["early_stage".to_string()];
        let visible = filter_tools(catalog.tools(), &active, "grants");
        assert_eq!(slugs(&visible), vec!["innovation_grants"]);
    }

    #[test]
    fn test_group_filter_drops_emptied_groups() {
        let catalog = catalog();
        let groups = filter_objective_groups(catalog.objective_groups(), "boost");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Investment");
        assert_eq!(groups[0].objectives.len(), 1);
    }

    #[test]
    fn test_group_filter_empty_search_keeps_everything() {
        let catalog = catalog();
        let groups = filter_objective_groups(catalog.objective_groups(), "");
        assert_eq!(groups.len(), 2);
    }
}
