//! Tag taxonomy
//!
//! Six fixed tag categories, each holding an ordered controlled vocabulary of
//! `{slug, display name}` pairs loaded once from the tags document. The
//! category set is closed: the dataset cannot introduce new ones.

use serde::{Deserialize, Serialize};

/// The fixed set of tag categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Objectives,
    InnovationStage,
    Sectors,
    DeliveryMechanism,
    Targeting,
    Timeline,
}

impl TagCategory {
    /// All categories, in the order they are declared in the tags document
    /// and rendered in filter panels. Category-agnostic slug lookups scan in
    /// this order.
    pub const ALL: [TagCategory; 6] = [
        TagCategory::Objectives,
        TagCategory::InnovationStage,
        TagCategory::Sectors,
        TagCategory::DeliveryMechanism,
        TagCategory::Targeting,
        TagCategory::Timeline,
    ];

    /// Wire name used in the YAML documents
    pub fn key(&self) -> &'static str {
        match self {
            TagCategory::Objectives => "objectives",
            TagCategory::InnovationStage => "innovation_stage",
            TagCategory::Sectors => "sectors",
            TagCategory::DeliveryMechanism => "delivery_mechanism",
            TagCategory::Targeting => "targeting",
            TagCategory::Timeline => "timeline",
        }
    }

    /// Human-readable label for filter panel headings
    pub fn label(&self) -> &'static str {
        match self {
            TagCategory::Objectives => "Objectives",
            TagCategory::InnovationStage => "Innovation Stage",
            TagCategory::Sectors => "Sectors",
            TagCategory::DeliveryMechanism => "Delivery Mechanism",
            TagCategory::Targeting => "Targeting",
            TagCategory::Timeline => "Timeline",
        }
    }

    /// Parse a wire name back into a category
    pub fn from_key(key: &str) -> Option<TagCategory> {
        TagCategory::ALL.iter().copied().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One controlled-vocabulary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique slug within the category (globally unique in a lint-clean
    /// dataset)
    #[serde(rename = "tag")]
    pub slug: String,
    /// Display name shown on chips and filter panels
    pub name: String,
}

/// Wire shape of the tags document: `{tags: {<category>: [{tag, name}, ...]}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TagsDocument {
    #[serde(default)]
    pub tags: TagSections,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TagSections {
    #[serde(default)]
    pub objectives: Vec<Tag>,
    #[serde(default)]
    pub innovation_stage: Vec<Tag>,
    #[serde(default)]
    pub sectors: Vec<Tag>,
    #[serde(default)]
    pub delivery_mechanism: Vec<Tag>,
    #[serde(default)]
    pub targeting: Vec<Tag>,
    #[serde(default)]
    pub timeline: Vec<Tag>,
}

/// In-memory taxonomy store
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    objectives: Vec<Tag>,
    innovation_stage: Vec<Tag>,
    sectors: Vec<Tag>,
    delivery_mechanism: Vec<Tag>,
    targeting: Vec<Tag>,
    timeline: Vec<Tag>,
}

impl Taxonomy {
    pub(crate) fn from_document(doc: TagsDocument) -> Self {
        Self {
            objectives: doc.tags.objectives,
            innovation_stage: doc.tags.innovation_stage,
            sectors: doc.tags.sectors,
            delivery_mechanism: doc.tags.delivery_mechanism,
            targeting: doc.tags.targeting,
            timeline: doc.tags.timeline,
        }
    }

    /// Parse a taxonomy from YAML text
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let doc: TagsDocument = serde_yaml::from_str(yaml)?;
        Ok(Self::from_document(doc))
    }

    /// Ordered tags for one category
    pub fn tags(&self, category: TagCategory) -> &[Tag] {
        match category {
            TagCategory::Objectives => &self.objectives,
            TagCategory::InnovationStage => &self.innovation_stage,
            TagCategory::Sectors => &self.sectors,
            TagCategory::DeliveryMechanism => &self.delivery_mechanism,
            TagCategory::Targeting => &self.targeting,
            TagCategory::Timeline => &self.timeline,
        }
    }

    /// Total tag count across all categories
    pub fn tag_count(&self) -> usize {
        TagCategory::ALL.iter().map(|c| self.tags(*c).len()).sum()
    }

    /// Resolve a slug to its display name within one category.
    ///
    /// A miss echoes the slug back unchanged so a stale reference renders as
    /// its raw slug rather than failing.
    pub fn tag_display_name<'a>(&'a self, category: TagCategory, slug: &'a str) -> &'a str {
        self.tags(category)
            .iter()
            .find(|t| t.slug == slug)
            .map(|t| t.name.as_str())
            .unwrap_or(slug)
    }

    /// Category-agnostic display-name lookup, used for filter chips where
    /// only the slug is known. Scans categories in declaration order; slugs
    /// are expected to be globally unique (`lint` flags violations).
    pub fn display_name<'a>(&'a self, slug: &'a str) -> &'a str {
        for category in TagCategory::ALL {
            if let Some(tag) = self.tags(category).iter().find(|t| t.slug == slug) {
                return &tag.name;
            }
        }
        slug
    }

    /// The category a slug belongs to, if any
    pub fn category_of(&self, slug: &str) -> Option<TagCategory> {
        TagCategory::ALL
            .into_iter()
            .find(|c| self.tags(*c).iter().any(|t| t.slug == slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Taxonomy {
        Taxonomy::from_yaml(
            r#"
tags:
  objectives:
    - tag: boost_rd
      name: Boost R&D Investment
  sectors:
    - tag: ict
      name: Information & Communication Technology
  innovation_stage:
    - tag: early_stage
      name: Early Stage
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_hit() {
        let tax = sample();
        assert_eq!(
            tax.tag_display_name(TagCategory::Sectors, "ict"),
            "Information & Communication Technology"
        );
    }

    #[test]
    fn test_lookup_miss_echoes_slug() {
        let tax = sample();
        assert_eq!(tax.tag_display_name(TagCategory::Sectors, "unknown_slug"), "unknown_slug");
        assert_eq!(tax.display_name("unknown_slug"), "unknown_slug");
    }

    #[test]
    fn test_category_agnostic_lookup() {
        let tax = sample();
        assert_eq!(tax.display_name("early_stage"), "Early Stage");
        assert_eq!(tax.category_of("early_stage"), Some(TagCategory::InnovationStage));
        assert_eq!(tax.category_of("nope"), None);
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in TagCategory::ALL {
            assert_eq!(TagCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(TagCategory::from_key("bogus"), None);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let tax = Taxonomy::from_yaml("tags:\n  objectives: []\n").unwrap();
        assert!(tax.tags(TagCategory::Timeline).is_empty());
        assert_eq!(tax.tag_count(), 0);
    }
}
