//! Skill ranking — turns the loosely shaped `skills` mapping into a bounded,
//! de-duplicated, ordered list of pills for the sidebar.
//!
//! Ordering rules:
//! 1. `important` labels first, in document order, with no per-category cap.
//! 2. Then every other category in document order; each contributes from its
//!    first `MAX_PER_CATEGORY` labels only, skipping labels already placed.
//! 3. The whole list stops at `MAX_PILLS`.
//!
//! Label comparison is exact and case-sensitive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_PILLS: usize = 24;
pub const MAX_PER_CATEGORY: usize = 6;
pub const IMPORTANT_CATEGORY: &str = "important";

/// Visual grouping for a pill. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillKind {
    Highlight,
    Backend,
    Frontend,
    Ai,
    Cloud,
    Tooling,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPill {
    pub label: String,
    pub kind: PillKind,
}

impl SkillPill {
    pub fn new(label: impl Into<String>, kind: PillKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Category name → pill kind. Anything not listed is `PillKind::General`.
const CATEGORY_KINDS: &[(&str, PillKind)] = &[
    (IMPORTANT_CATEGORY, PillKind::Highlight),
    ("backend", PillKind::Backend),
    ("programmingLanguages", PillKind::Backend),
    ("frameworks", PillKind::Frontend),
    ("frontend", PillKind::Frontend),
    ("aiSkills", PillKind::Ai),
    ("cloud", PillKind::Cloud),
    ("tools", PillKind::Tooling),
    ("practices", PillKind::Tooling),
    ("additional", PillKind::General),
];

/// Shown only once loading has finished and nothing could be derived.
const PLACEHOLDER_PILLS: &[(&str, PillKind)] = &[
    ("Backend", PillKind::Backend),
    ("Frontend", PillKind::Frontend),
    ("AI", PillKind::Ai),
    ("Cloud", PillKind::Cloud),
];

pub fn kind_for_category(category: &str) -> PillKind {
    CATEGORY_KINDS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, kind)| *kind)
        .unwrap_or(PillKind::General)
}

pub fn placeholder_pills() -> Vec<SkillPill> {
    PLACEHOLDER_PILLS
        .iter()
        .map(|(label, kind)| SkillPill::new(*label, *kind))
        .collect()
}

/// Derives the pill list from a `skills` value.
///
/// Never fails: a non-object value yields an empty list, and a category whose
/// value is not an array contributes nothing. Non-string entries are skipped.
pub fn derive_pills(skills: &Value) -> Vec<SkillPill> {
    let Some(categories) = skills.as_object() else {
        return Vec::new();
    };

    let mut ranker = PillRanker::default();

    if let Some(important) = categories.get(IMPORTANT_CATEGORY) {
        ranker.extend(labels(important), PillKind::Highlight);
    }

    for (category, value) in categories {
        if category == IMPORTANT_CATEGORY {
            continue;
        }
        ranker.extend(
            labels(value).take(MAX_PER_CATEGORY),
            kind_for_category(category),
        );
    }

    ranker.pills
}

/// String entries of a category array; empty for any other shape.
fn labels(value: &Value) -> impl Iterator<Item = &str> {
    value
        .as_array()
        .map(|items| items.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_str)
}

#[derive(Default)]
struct PillRanker {
    pills: Vec<SkillPill>,
    seen: HashSet<String>,
}

impl PillRanker {
    fn extend<'a>(&mut self, labels: impl Iterator<Item = &'a str>, kind: PillKind) {
        for label in labels {
            if self.pills.len() >= MAX_PILLS {
                return;
            }
            // Blank labels are dropped; everything else is kept and compared verbatim.
            if label.trim().is_empty() || !self.seen.insert(label.to_string()) {
                continue;
            }
            self.pills.push(SkillPill::new(label, kind));
        }
    }
}
