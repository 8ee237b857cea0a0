//! Machine-readable export of a declared tree.

use crate::dispatch::Cli;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl std::str::FromStr for SchemaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown schema format: {other}")),
        }
    }
}

/// Serializes the tree of `cli`, handlers excluded, in the requested format.
///
/// The output parses back with
/// [`CommandManifest::from_json_str`](cmdtree_core::CommandManifest::from_json_str)
/// or [`from_yaml_str`](cmdtree_core::CommandManifest::from_yaml_str).
pub fn export_schema<T>(cli: &Cli<T>, format: SchemaFormat) -> Result<String, String> {
    let schema = cli.schema();
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(&schema)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        SchemaFormat::Yaml => {
            serde_yaml::to_string(&schema).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
