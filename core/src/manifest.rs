//! Command manifests: a whole tree declared as data.
//!
//! A manifest holds everything about a CLI except its handlers. It is the
//! static configuration a tool loads at startup; handlers are bound to it by
//! command path afterwards.
//!
//! # Example YAML
//!
//! ```yaml
//! description: Operations toolkit
//! commands:
//!   status:
//!     description: Show service status
//!   db:
//!     description: Database maintenance
//!     commands:
//!       reset:
//!         description: Drop and recreate the database
//!         dangerous: true
//!         flags:
//!           env:
//!             type: value
//!             description: Target environment
//!             required: true
//!             allowed:
//!               choices: [dev, staging]
//! ```
//!
//! A node with a `commands` key is a group, anything else is a command.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::{CommandSpec, validate_manifest};

/// Root of a declared command tree.
///
/// # Examples
///
/// ```
/// use cmdtree_core::*;
///
/// let yaml = r#"
/// description: Operations toolkit
/// commands:
///   status:
///     description: Show service status
/// "#;
/// let manifest = CommandManifest::from_yaml_str(yaml).unwrap();
/// assert_eq!(manifest.description, "Operations toolkit");
/// assert!(matches!(manifest.commands["status"], NodeManifest::Command(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandManifest {
    /// CLI-wide description, shown in the root listing
    pub description: String,
    /// Top-level commands and groups, in declaration order
    #[serde(default)]
    pub commands: IndexMap<String, NodeManifest>,
}

/// A declared group: a description and its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupManifest {
    pub description: String,
    pub commands: IndexMap<String, NodeManifest>,
}

/// One node of a declared tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeManifest {
    Group(GroupManifest),
    Command(CommandSpec),
}

impl GroupManifest {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            commands: IndexMap::new(),
        }
    }

    /// Adds a command child.
    pub fn with_command(mut self, name: &str, spec: CommandSpec) -> Self {
        self.commands.insert(name.to_string(), NodeManifest::Command(spec));
        self
    }

    /// Adds a nested group.
    pub fn with_group(mut self, name: &str, group: GroupManifest) -> Self {
        self.commands.insert(name.to_string(), NodeManifest::Group(group));
        self
    }
}

impl CommandManifest {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            commands: IndexMap::new(),
        }
    }

    /// Adds a top-level command.
    pub fn with_command(mut self, name: &str, spec: CommandSpec) -> Self {
        self.commands.insert(name.to_string(), NodeManifest::Command(spec));
        self
    }

    /// Adds a top-level group.
    pub fn with_group(mut self, name: &str, group: GroupManifest) -> Self {
        self.commands.insert(name.to_string(), NodeManifest::Group(group));
        self
    }

    /// Parses and validates a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](ManifestError::YamlError) on malformed input and
    /// [`Invalid`](ManifestError::Invalid) if the tree fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validated()
    }

    /// Parses and validates a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](ManifestError::JsonError) on malformed input and
    /// [`Invalid`](ManifestError::Invalid) if the tree fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validated()
    }

    /// Loads a manifest file, choosing the format from its extension
    /// (`.json`, `.yml` or `.yaml`).
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ManifestError::UnsupportedFormat) for other
    /// extensions, [`IoError`](ManifestError::IoError) if the file can't be
    /// read, and parse or validation errors as for the `from_*_str` functions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        debug!(path = %path.display(), ?format, "loading command manifest");

        let reader = BufReader::new(std::fs::File::open(path)?);
        let manifest: Self = match format {
            ManifestFormat::Json => serde_json::from_reader(reader)?,
            ManifestFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        manifest.validated()
    }

    /// Writes the manifest, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ManifestError::UnsupportedFormat),
    /// [`IoError`](ManifestError::IoError) or a serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            ManifestFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            ManifestFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    fn validated(self) -> Result<Self> {
        validate_manifest(&self)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy)]
enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            _ => Err(ManifestError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
