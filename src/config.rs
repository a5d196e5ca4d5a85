use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::Notice;
use crate::markers::MarkerType;
use crate::toggle::MarkerPair;

/// Category used for custom tags saved without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A user-defined marker pair written as `prefix|postfix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTagSpec {
    pub tag: String,
    #[serde(default)]
    pub category: String,
}

impl CustomTagSpec {
    pub fn new(tag: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            category: category.into(),
        }
    }

    /// The marker pair described by `tag`, if it is well formed.
    pub fn marker_pair(&self) -> Option<MarkerPair> {
        parse_custom_tag(&self.tag)
    }

    /// The category name shown to the user.
    pub fn category_name(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() {
            UNCATEGORIZED
        } else {
            category
        }
    }
}

/// A category name and its tags, each paired with its index in the tag list.
pub type TagGroup<'a> = (&'a str, Vec<(usize, &'a CustomTagSpec)>);

/// Errors from editing the custom tag list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("custom tag {0:?} must have the form prefix|postfix")]
    Malformed(String),

    #[error("no custom tag at index {index} (have {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Persisted settings.
///
/// Missing keys fall back to their defaults when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub default_marker: MarkerType,
    pub custom_tags: Vec<CustomTagSpec>,
}

impl Settings {
    /// Validate and append a custom tag. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Malformed`] if the tag is not `prefix|postfix`.
    pub fn add_custom_tag(&mut self, tag: &str, category: &str) -> Result<(), TagError> {
        let tag = tag.trim();
        if !is_valid_custom_tag(tag) {
            return Err(TagError::Malformed(tag.to_string()));
        }
        self.custom_tags.push(CustomTagSpec::new(tag, category.trim()));
        self.log_invalid_tags();
        Ok(())
    }

    /// Remove the custom tag at `index` in list order.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::OutOfRange`] if there is no such tag.
    pub fn remove_custom_tag(&mut self, index: usize) -> Result<CustomTagSpec, TagError> {
        let len = self.custom_tags.len();
        if index >= len {
            return Err(TagError::OutOfRange { index, len });
        }
        let removed = self.custom_tags.remove(index);
        self.log_invalid_tags();
        Ok(removed)
    }

    /// Custom tags grouped by category, groups in order of first appearance.
    pub fn custom_tags_by_category(&self) -> Vec<TagGroup<'_>> {
        group_tags_by_category(&self.custom_tags)
    }

    /// Indices of stored tags that are not well formed.
    pub fn invalid_tags(&self) -> Vec<usize> {
        self.custom_tags
            .iter()
            .enumerate()
            .filter(|(_, spec)| !is_valid_custom_tag(&spec.tag))
            .map(|(i, _)| i)
            .collect()
    }

    fn log_invalid_tags(&self) {
        for index in self.invalid_tags() {
            tracing::warn!(
                index,
                tag = %self.custom_tags[index].tag,
                "invalid custom tag in settings"
            );
        }
    }
}

/// Returns true if `tag` splits on `|` into exactly two non-empty parts.
pub fn is_valid_custom_tag(tag: &str) -> bool {
    parse_custom_tag(tag).is_some()
}

/// Parse `prefix|postfix` into a marker pair. Parts are trimmed.
pub fn parse_custom_tag(tag: &str) -> Option<MarkerPair> {
    let mut parts = tag.split('|').map(str::trim);
    let (prefix, postfix) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || prefix.is_empty() || postfix.is_empty() {
        return None;
    }
    Some(MarkerPair::new(prefix, postfix))
}

/// Group tags by category, keeping first-appearance order of categories
/// and list order within each category.
///
/// Each tag is paired with its index in `tags`, the index `remove_custom_tag`
/// expects.
pub fn group_tags_by_category(tags: &[CustomTagSpec]) -> Vec<TagGroup<'_>> {
    let mut groups: Vec<TagGroup<'_>> = Vec::new();
    for (index, spec) in tags.iter().enumerate() {
        let category = spec.category_name();
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push((index, spec)),
            None => groups.push((category, vec![(index, spec)])),
        }
    }
    groups
}

pub fn global_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("marktoggle").join("settings.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("marktoggle")
                .join("settings.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("marktoggle").join("settings.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("marktoggle")
                .join("settings.json");
        }
    }

    PathBuf::from(".marktoggle.json")
}

/// Load settings, merging stored values over defaults.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid settings JSON.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings {}", path.display()))?;
    settings.log_invalid_tags();
    Ok(settings)
}

/// Load settings, falling back to defaults on any failure.
///
/// The returned notice explains the fallback to the user.
pub fn load_settings_or_default(path: &Path) -> (Settings, Option<Notice>) {
    match load_settings(path) {
        Ok(settings) => (settings, None),
        Err(err) => {
            tracing::error!(path = %path.display(), error = ?err, "failed to load settings");
            (
                Settings::default(),
                Some(Notice::warning(format!(
                    "Could not load settings, using defaults: {err:#}"
                ))),
            )
        }
    }
}

/// Write the full settings object to `path`.
///
/// # Errors
///
/// Fails if the directory or file cannot be written.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write settings {}", path.display()))
}
