//! Per-site configuration blocks.

use serde_yaml::{Mapping, Value};

use super::requirement::Requirement;

/// A site's configuration block: hook-kind name → requirement.
#[derive(Debug, Clone, Copy)]
pub struct SiteConfig<'a> {
    name: &'a str,
    block: Option<&'a Mapping>,
}

impl<'a> SiteConfig<'a> {
    pub(crate) fn new(name: &'a str, block: &'a Mapping) -> Self {
        Self {
            name,
            block: Some(block),
        }
    }

    /// A block for a site declared without any entries.
    pub(crate) fn empty(name: &'a str) -> Self {
        Self { name, block: None }
    }

    /// Site name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Requirement configured for a hook kind. Absent keys yield an empty
    /// requirement.
    pub fn requirement(&self, hook: &str) -> Requirement {
        self.block
            .and_then(|block| block.get(hook))
            .cloned()
            .map(Requirement::new)
            .unwrap_or_default()
    }

    /// Whether the block mentions the hook kind at all.
    pub fn contains(&self, hook: &str) -> bool {
        self.block.is_some_and(|block| block.contains_key(hook))
    }

    /// Hook-kind names in file order.
    pub fn hook_names(&self) -> Vec<String> {
        self.block
            .map(|block| {
                block
                    .keys()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw block, `None` when the site was declared without entries.
    pub fn as_mapping(&self) -> Option<&'a Mapping> {
        self.block
    }

    /// Whether the block is empty.
    pub fn is_empty(&self) -> bool {
        self.block.is_none_or(Mapping::is_empty)
    }
}

/// Result of looking up a site, without exception-style control flow.
#[derive(Debug, Clone)]
pub enum SiteLookup<'a> {
    /// The site is defined.
    Found(SiteConfig<'a>),
    /// `sites` exists but does not define the requested site.
    NotFound {
        /// The requested site name.
        site: String,
        /// Sites that are defined, in file order.
        known: Vec<String>,
    },
    /// The configuration is structurally broken.
    Malformed(String),
}
