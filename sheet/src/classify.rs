//! Animation type inference from frame names.
//!
//! Frame names follow a loose `<unit>_<animation>_<index>` convention, for
//! example `f1_general_attack_003.png` or `boss_cast-loop_02_001.png`. The
//! animation type is the section just before the frame index.

use std::collections::BTreeSet;

/// Category a lone unrecognized animation is renamed to.
pub const DEFAULT_CATEGORY: &str = "default";

/// Animation type tokens recognized out of the box.
pub const DEFAULT_ANIMATIONS: &[&str] = &[
    "active",
    "appear",
    "attack",
    "breath",
    "breathing",
    "cast",
    "caststart",
    "casting",
    "castend",
    "castloop",
    "crawl",
    "damage",
    "death",
    "disappear",
    "hit",
    "hurt",
    "idle",
    "move",
    "movement",
    "open",
    "projectile",
    "run",
];

/// How categories outside the vocabulary are treated after grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassificationPolicy {
    /// Rename a sole unrecognized category to [`DEFAULT_CATEGORY`].
    #[default]
    Collapse,
    /// Like `Collapse`, but reject sheets with more than one unrecognized category.
    Strict,
}

/// The set of recognized animation type tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        DEFAULT_ANIMATIONS.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocabulary = Self::empty();
        vocabulary.extend(iter);
        vocabulary
    }
}

impl<S: Into<String>> Extend<S> for Vocabulary {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

impl Vocabulary {
    pub fn empty() -> Self {
        Self {
            tokens: BTreeSet::new(),
        }
    }

    /// Parse a newline-separated token list. Blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Tokens are stored lower-cased, matching normalized frame names.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.tokens.insert(token.into().to_lowercase())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Infer the category of a frame and whether it is a known animation type.
    pub fn classify(&self, frame_name: &str) -> Option<Classification> {
        let category = animation_type(frame_name)?;
        let recognized = self.contains(&category);
        Some(Classification {
            category,
            recognized,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub recognized: bool,
}

/// Extract the animation type section from a frame name.
///
/// Returns `None` when the name has too few sections.
pub fn animation_type(frame_name: &str) -> Option<String> {
    let normalized = frame_name.replace('-', "_").to_lowercase();
    let sections: Vec<&str> = normalized.split('_').collect();

    let candidate = *sections.iter().rev().nth(1)?;
    if !is_numeric(candidate) {
        return Some(candidate.to_string());
    }
    // Sequenced animations put a second index before the frame index.
    sections.iter().rev().nth(2).map(|s| s.to_string())
}

fn is_numeric(section: &str) -> bool {
    !section.is_empty() && section.chars().all(char::is_numeric)
}
