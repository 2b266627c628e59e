//! Typed knowledge records and their ingestion format.
//!
//! The on-disk knowledge format is a collection keyed by category, each
//! entry a mapping from name to its fields. Ingestion converts that
//! loosely-typed shape into [`KnowledgeRecord`], a sum type tagged by
//! category, validating required fields up front.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{KnowledgeError, Result};

/// Category of a knowledge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Sights and activities.
    Attraction,
    /// Dining.
    Restaurant,
    /// Getting there and around.
    Transport,
    /// Places to stay.
    Lodging,
}

impl Category {
    /// Stable string form, used in record identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Attraction => "attraction",
            Category::Restaurant => "restaurant",
            Category::Transport => "transport",
            Category::Lodging => "lodging",
        }
    }
}

/// Fields shared by every record category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCore {
    /// Unique identifier, derived from category and name.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-text description; this is the text that gets embedded.
    pub description: String,

    /// Street address, if known.
    pub address: Option<String>,

    /// Website, if known.
    pub website: Option<String>,

    /// Practical tips.
    pub tips: Vec<String>,
}

/// A single entry in the knowledge base, tagged by category.
///
/// Records are immutable once constructed and owned exclusively by the
/// [`KnowledgeStore`](crate::store::KnowledgeStore) after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum KnowledgeRecord {
    /// A sight or activity.
    Attraction {
        core: RecordCore,
        /// Things to do at the attraction.
        activities: Vec<String>,
    },
    /// A dining option.
    Restaurant {
        core: RecordCore,
        /// Rough price bracket, e.g. "$$$".
        price_range: Option<String>,
    },
    /// A way of getting there or around.
    Transport {
        core: RecordCore,
        /// Routes or lines served.
        routes: Vec<String>,
    },
    /// A place to stay.
    Lodging {
        core: RecordCore,
        /// Rough nightly price bracket.
        price_range: Option<String>,
    },
}

impl KnowledgeRecord {
    /// The fields shared by all categories.
    pub fn core(&self) -> &RecordCore {
        match self {
            KnowledgeRecord::Attraction { core, .. }
            | KnowledgeRecord::Restaurant { core, .. }
            | KnowledgeRecord::Transport { core, .. }
            | KnowledgeRecord::Lodging { core, .. } => core,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> &str {
        &self.core().id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.core().name
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.core().description
    }

    /// The record's category tag.
    pub fn category(&self) -> Category {
        match self {
            KnowledgeRecord::Attraction { .. } => Category::Attraction,
            KnowledgeRecord::Restaurant { .. } => Category::Restaurant,
            KnowledgeRecord::Transport { .. } => Category::Transport,
            KnowledgeRecord::Lodging { .. } => Category::Lodging,
        }
    }
}

/// Derive a stable identifier from a category and display name.
fn record_id(category: Category, name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}/{}", category.as_str(), slug.trim_matches('-'))
}

/// A raw entry as it appears in the knowledge file.
///
/// Every field except `description` is optional; ingestion rejects
/// entries without one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    pub description: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub price_range: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub routes: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl RawEntry {
    /// Validate and convert into a typed record.
    fn into_record(self, category: Category, name: &str) -> Result<KnowledgeRecord> {
        let description = match self.description {
            Some(d) if !d.trim().is_empty() => d,
            _ => {
                return Err(KnowledgeError::Validation(format!(
                    "record '{name}' has no description"
                )));
            }
        };

        let core = RecordCore {
            id: record_id(category, name),
            name: name.to_string(),
            description,
            address: self.address,
            website: self.website,
            tips: self.tips,
        };

        Ok(match category {
            Category::Attraction => KnowledgeRecord::Attraction {
                core,
                activities: self.activities,
            },
            Category::Restaurant => KnowledgeRecord::Restaurant {
                core,
                price_range: self.price_range,
            },
            Category::Transport => KnowledgeRecord::Transport {
                core,
                routes: self.routes,
            },
            Category::Lodging => KnowledgeRecord::Lodging {
                core,
                price_range: self.price_range,
            },
        })
    }
}

/// The knowledge ingestion format: categories mapping name to entry.
///
/// `BTreeMap` keeps ingestion order deterministic, which matters because
/// the store and index stay positionally aligned with load order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeFile {
    #[serde(default)]
    pub attractions: BTreeMap<String, RawEntry>,
    #[serde(default)]
    pub restaurants: BTreeMap<String, RawEntry>,
    #[serde(default)]
    pub transport: BTreeMap<String, RawEntry>,
    #[serde(default)]
    pub lodging: BTreeMap<String, RawEntry>,
}

impl KnowledgeFile {
    /// Parse a knowledge file from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert all entries into typed records.
    ///
    /// Fails on the first entry without a description; no records are
    /// produced from a partially valid file.
    pub fn into_records(self) -> Result<Vec<KnowledgeRecord>> {
        let mut records = Vec::new();

        for (name, entry) in self.attractions {
            records.push(entry.into_record(Category::Attraction, &name)?);
        }
        for (name, entry) in self.restaurants {
            records.push(entry.into_record(Category::Restaurant, &name)?);
        }
        for (name, entry) in self.transport {
            records.push(entry.into_record(Category::Transport, &name)?);
        }
        for (name, entry) in self.lodging {
            records.push(entry.into_record(Category::Lodging, &name)?);
        }

        Ok(records)
    }
}
