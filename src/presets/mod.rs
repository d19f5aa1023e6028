//! Saved queries.
//!
//! A preset is a named [`FilterCriteria`] stored as a TOML file, e.g.
//! "recent-videos" or "grandmas-stories". Criteria are validated at load
//! time so a bad preset is reported once, at startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::criteria::{CriteriaInput, FilterCriteria};
use crate::error::{Error, Result};

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetFile {
    preset: PresetMeta,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetMeta {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    criteria: CriteriaInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub description: Option<String>,
    /// The criteria as written, before validation. Lets callers replace
    /// individual fields and re-validate.
    pub input: CriteriaInput,
    pub criteria: FilterCriteria,
}

/// Registry of loaded presets, indexed by name.
#[derive(Debug, Default)]
pub struct PresetRegistry {
    presets: BTreeMap<String, Preset>,
}

impl PresetRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load all `.toml` files from a directory.
    ///
    /// # Errors
    ///
    /// `Config` if the directory cannot be read, a file is not valid TOML,
    /// or two files share a name. `InvalidCriteria` if a preset's criteria
    /// do not validate.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::Config(format!("cannot read preset dir {}: {e}", dir.display()))
        })?;

        let mut registry = Self::empty();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)?;
                let preset = parse_preset(&content)
                    .map_err(|e| with_path(e, &path))?;
                registry.insert(preset)?;
            }
        }

        tracing::debug!(dir = %dir.display(), count = registry.len(), "loaded presets");
        Ok(registry)
    }

    /// Add a preset. Names must be unique.
    pub fn insert(&mut self, preset: Preset) -> Result<()> {
        if self.presets.contains_key(&preset.name) {
            return Err(Error::Config(format!(
                "duplicate preset name '{}'",
                preset.name
            )));
        }
        self.presets.insert(preset.name.clone(), preset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Presets in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Parse one preset file's contents.
pub fn parse_preset(content: &str) -> Result<Preset> {
    let file: PresetFile =
        toml::from_str(content).map_err(|e| Error::Config(format!("bad preset: {e}")))?;
    let meta = file.preset;

    let criteria = meta.criteria.validate().map_err(|e| match e {
        Error::InvalidCriteria(msg) => {
            Error::InvalidCriteria(format!("preset '{}': {msg}", meta.name))
        }
        other => other,
    })?;

    Ok(Preset {
        name: meta.name,
        description: meta.description,
        input: meta.criteria,
        criteria,
    })
}

fn with_path(e: Error, path: &Path) -> Error {
    match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        Error::InvalidCriteria(msg) => {
            Error::InvalidCriteria(format!("{}: {msg}", path.display()))
        }
        other => other,
    }
}
