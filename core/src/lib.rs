//! Declaration types and manifests for cmdtree command trees.
//!
//! This crate defines the data half of a command-line interface:
//!
//! - [`CommandSpec`]: an executable command's description, accepted
//!   positional argument shapes, flags, danger marker and example.
//! - [`FlagSpec`]: a boolean or value flag, with an optional short alias
//!   (boolean) or required marker and [`AllowedValues`] constraint (value).
//! - [`CommandManifest`]: a whole tree of groups and commands, loadable from
//!   YAML or JSON.
//!
//! Validation ([`validate_manifest`], [`validate_command`]) rejects trees the
//! engine could never serve, such as flags named `force` or `help`.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let manifest = CommandManifest::new("Operations toolkit").with_group(
//!     "db",
//!     GroupManifest::new("Database maintenance").with_command(
//!         "reset",
//!         CommandSpec::new("Drop and recreate the database")
//!             .dangerous()
//!             .with_flag("env", FlagSpec::value("Target environment").required()),
//!     ),
//! );
//!
//! assert!(validate_manifest(&manifest).is_ok());
//! ```

mod error;
mod manifest;
mod types;
mod validate;

pub use error::{ManifestError, Result};
pub use manifest::{CommandManifest, GroupManifest, NodeManifest};
pub use types::*;
pub use validate::{
    ValidationError, validate_command, validate_group, validate_manifest, validate_name,
};
