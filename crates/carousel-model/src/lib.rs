//! Slide deck data shared by the carousel runtime and anything that produces
//! decks for it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One carousel entry. URIs are carried verbatim; nothing here checks that
/// they are well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Slide {
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Slide {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Link target, ignoring blank values.
    pub fn link_target(&self) -> Option<&str> {
        self.href
            .as_deref()
            .map(str::trim)
            .filter(|href| !href.is_empty())
    }
}

/// Ordered slide list; list order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideDeck(Vec<Slide>);

impl SlideDeck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self(slides)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.0.get(index)
    }

    pub fn extend(&mut self, other: SlideDeck) {
        self.0.extend(other.0);
    }

    /// The deck followed by itself once. Entry `i` is slide `i mod N`; the
    /// second copy only pads the strip so the wrap from the last slide to the
    /// first never exposes blank space.
    pub fn duplicated(&self) -> impl Iterator<Item = (usize, &Slide)> + '_ {
        let n = self.0.len();
        (0..n * 2).map(move |i| (i % n, &self.0[i % n]))
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Loads a deck file. `.json` files are read as JSON, everything else as
    /// YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read slide deck {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        };
        parsed.with_context(|| format!("failed to parse slide deck {}", path.display()))
    }
}

impl From<Vec<Slide>> for SlideDeck {
    fn from(slides: Vec<Slide>) -> Self {
        Self(slides)
    }
}

impl FromIterator<Slide> for SlideDeck {
    fn from_iter<I: IntoIterator<Item = Slide>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
