//! Structural validation of declared command trees.
//!
//! Catches declarations the engine could never honour before they reach a
//! user: names that can't be typed as a path segment, flags that collide with
//! the engine-owned `--help`/`--force`, short aliases swallowed by `-h`/`-f`,
//! and groups with nothing in them.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let spec = CommandSpec::new("Deploy").with_flag("verbose", FlagSpec::boolean("Verbose"));
//! assert!(validate_command("deploy", &spec).is_ok());
//!
//! // `force` belongs to the engine
//! let bad = CommandSpec::new("Deploy").with_flag("force", FlagSpec::boolean("Force"));
//! assert!(validate_command("deploy", &bad).is_err());
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{AllowedValues, CommandManifest, CommandSpec, NodeManifest, RESERVED_FLAG_NAMES};

/// Tree declaration errors.
///
/// Paths are the space-joined command path; the root is shown as `<root>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A command or group name is empty or whitespace-only.
    #[error("command name cannot be empty (under {0})")]
    EmptyName(String),
    /// A name starts with `-` or contains whitespace, so it can never be resolved.
    #[error("invalid command name: {0:?}")]
    InvalidName(String),
    /// A nested group declares no children.
    #[error("group has no subcommands: {0}")]
    EmptyGroup(String),
    /// A flag name is empty, starts with `-`, or contains `=` or whitespace.
    #[error("invalid flag name {flag:?} on command {command}")]
    InvalidFlagName { command: String, flag: String },
    /// A command declares `--force` or `--help`.
    #[error("flag --{flag} on command {command} is reserved")]
    ReservedFlag { command: String, flag: String },
    /// A short alias is not a letter or digit.
    #[error("invalid short alias {short:?} on command {command}")]
    InvalidShortAlias { command: String, short: char },
    /// A short alias is `h`, or `f` on a dangerous command.
    #[error("short alias -{short} on command {command} is reserved")]
    ReservedShortAlias { command: String, short: char },
    /// Two flags of one command share a short alias.
    #[error("duplicate short alias -{short} on command {command}")]
    DuplicateShortAlias { command: String, short: char },
    /// A value flag allows an empty set of choices.
    #[error("flag --{flag} on command {command} allows no values")]
    EmptyChoices { command: String, flag: String },
}

/// Validates a whole manifest.
///
/// Walks the tree depth-first in declaration order and stops at the first
/// problem found. The root may be empty; nested groups may not.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
///
/// # Examples
///
/// ```
/// use cmdtree_core::*;
///
/// let manifest = CommandManifest::new("ops")
///     .with_group("db", GroupManifest::new("Database"));
/// assert_eq!(
///     validate_manifest(&manifest),
///     Err(ValidationError::EmptyGroup("db".to_string()))
/// );
///
/// assert!(validate_manifest(&CommandManifest::new("ops")).is_ok());
/// ```
pub fn validate_manifest(manifest: &CommandManifest) -> Result<(), ValidationError> {
    let mut path = Vec::new();
    validate_level(&manifest.commands, &mut path)
}

fn validate_level(
    commands: &IndexMap<String, NodeManifest>,
    path: &mut Vec<String>,
) -> Result<(), ValidationError> {
    validate_group(path, commands.len())?;

    for (name, node) in commands {
        validate_name(path, name)?;

        path.push(name.clone());
        let result = match node {
            NodeManifest::Group(group) => validate_level(&group.commands, path),
            NodeManifest::Command(spec) => validate_command(&path.join(" "), spec),
        };
        path.pop();
        result?;
    }

    Ok(())
}

/// Checks that a nested group at `path` has at least one child. The root
/// (empty `path`) is exempt.
pub fn validate_group(path: &[String], child_count: usize) -> Result<(), ValidationError> {
    if child_count == 0 && !path.is_empty() {
        return Err(ValidationError::EmptyGroup(display_path(path)));
    }
    Ok(())
}

/// Checks that `name` can be typed as a path segment below `parent`.
pub fn validate_name(parent: &[String], name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName(display_path(parent)));
    }
    if name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Validates the flag schema of one command.
pub fn validate_command(path: &str, spec: &CommandSpec) -> Result<(), ValidationError> {
    let mut shorts: HashSet<char> = HashSet::new();
    let command = || path.to_string();

    for (name, flag) in &spec.flags {
        if name.is_empty()
            || name.starts_with('-')
            || name.contains('=')
            || name.chars().any(char::is_whitespace)
        {
            return Err(ValidationError::InvalidFlagName {
                command: command(),
                flag: name.clone(),
            });
        }

        if RESERVED_FLAG_NAMES.contains(&name.as_str()) {
            return Err(ValidationError::ReservedFlag {
                command: command(),
                flag: name.clone(),
            });
        }

        if let Some(short) = flag.short() {
            if !short.is_alphanumeric() {
                return Err(ValidationError::InvalidShortAlias {
                    command: command(),
                    short,
                });
            }
            if short == 'h' || (short == 'f' && spec.dangerous) {
                return Err(ValidationError::ReservedShortAlias {
                    command: command(),
                    short,
                });
            }
            if !shorts.insert(short) {
                return Err(ValidationError::DuplicateShortAlias {
                    command: command(),
                    short,
                });
            }
        }

        if matches!(flag.allowed(), Some(AllowedValues::Choices(choices)) if choices.is_empty()) {
            return Err(ValidationError::EmptyChoices {
                command: command(),
                flag: name.clone(),
            });
        }
    }

    Ok(())
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use crate::{FlagSpec, GroupManifest};

    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_manifest_accepts_nested_tree() {
        let manifest = CommandManifest::new("ops").with_group(
            "db",
            GroupManifest::new("Database")
                .with_command("migrate", CommandSpec::new("Run migrations")),
        );

        assert_eq!(validate_manifest(&manifest), Ok(()));
    }

    #[test]
    fn test_validate_manifest_accepts_empty_root() {
        assert_eq!(validate_manifest(&CommandManifest::new("ops")), Ok(()));
    }

    #[test]
    fn test_validate_manifest_rejects_empty_nested_group() {
        let manifest =
            CommandManifest::new("ops").with_group("db", GroupManifest::new("Database"));

        assert_eq!(
            validate_manifest(&manifest),
            Err(ValidationError::EmptyGroup("db".to_string()))
        );
    }

    #[test]
    fn test_validate_manifest_rejects_flag_like_name() {
        let manifest =
            CommandManifest::new("ops").with_command("--status", CommandSpec::new("Status"));

        assert_eq!(
            validate_manifest(&manifest),
            Err(ValidationError::InvalidName("--status".to_string()))
        );
    }

    #[test]
    fn test_validate_name_rejects_whitespace() {
        assert_eq!(
            validate_name(&path(&["db"]), "back up"),
            Err(ValidationError::InvalidName("back up".to_string()))
        );
    }

    #[test]
    fn test_validate_name_rejects_empty_name() {
        assert_eq!(
            validate_name(&path(&["db"]), "  "),
            Err(ValidationError::EmptyName("db".to_string()))
        );
        assert_eq!(
            validate_name(&[], ""),
            Err(ValidationError::EmptyName("<root>".to_string()))
        );
    }

    #[test]
    fn test_validate_command_rejects_reserved_flag() {
        let spec = CommandSpec::new("Reset").with_flag("help", FlagSpec::value("Help text"));

        assert_eq!(
            validate_command("db reset", &spec),
            Err(ValidationError::ReservedFlag {
                command: "db reset".to_string(),
                flag: "help".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_command_rejects_h_alias() {
        let spec = CommandSpec::new("Show")
            .with_flag("human", FlagSpec::boolean("Human sizes").with_short('h'));

        assert_eq!(
            validate_command("show", &spec),
            Err(ValidationError::ReservedShortAlias {
                command: "show".to_string(),
                short: 'h',
            })
        );
    }

    #[test]
    fn test_validate_command_rejects_non_alphanumeric_alias() {
        let spec =
            CommandSpec::new("Show").with_flag("all", FlagSpec::boolean("All").with_short('?'));

        assert_eq!(
            validate_command("show", &spec),
            Err(ValidationError::InvalidShortAlias {
                command: "show".to_string(),
                short: '?',
            })
        );
    }

    #[test]
    fn test_validate_command_rejects_f_alias_only_when_dangerous() {
        let spec = CommandSpec::new("Fetch")
            .with_flag("fast", FlagSpec::boolean("Fast").with_short('f'));
        assert_eq!(validate_command("fetch", &spec), Ok(()));

        let dangerous = spec.dangerous();
        assert_eq!(
            validate_command("fetch", &dangerous),
            Err(ValidationError::ReservedShortAlias {
                command: "fetch".to_string(),
                short: 'f',
            })
        );
    }

    #[test]
    fn test_validate_command_rejects_duplicate_short_alias() {
        let spec = CommandSpec::new("Build")
            .with_flag("verbose", FlagSpec::boolean("Verbose").with_short('v'))
            .with_flag("vendor", FlagSpec::boolean("Vendor").with_short('v'));

        assert_eq!(
            validate_command("build", &spec),
            Err(ValidationError::DuplicateShortAlias {
                command: "build".to_string(),
                short: 'v',
            })
        );
    }

    #[test]
    fn test_validate_command_rejects_empty_choices() {
        let spec = CommandSpec::new("Build").with_flag(
            "target",
            FlagSpec::value("Target").with_allowed(AllowedValues::Choices(Vec::new())),
        );

        assert!(matches!(
            validate_command("build", &spec),
            Err(ValidationError::EmptyChoices { .. })
        ));
    }

    #[test]
    fn test_validate_command_rejects_malformed_flag_names() {
        for name in ["a=b", "-v", "dry run", ""] {
            let spec = CommandSpec::new("Build").with_flag(name, FlagSpec::boolean("Odd"));

            assert_eq!(
                validate_command("build", &spec),
                Err(ValidationError::InvalidFlagName {
                    command: "build".to_string(),
                    flag: name.to_string(),
                }),
                "{name:?}"
            );
        }
    }
}
