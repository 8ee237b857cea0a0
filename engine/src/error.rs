//! Error types for dispatch and handler binding.

use cmdtree_core::ValidationError;
use thiserror::Error;

/// Every way a single run can abort.
///
/// Each message is a single line pointing the user at the relevant `--help`
/// invocation where one exists. None of these are recoverable: the runner
/// prints the message and exits with [`EXIT_FAILURE`](crate::EXIT_FAILURE).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// No tokens were given at the root.
    #[error("No command specified. Run \"--help\" to get a list of valid commands.")]
    NoCommandSpecified,

    /// The first token names no top-level command.
    #[error("The command \"{0}\" doesn't exist. Run \"--help\" to get a list of valid commands.")]
    UnknownCommand(String),

    /// Tokens ran out while standing on a group.
    #[error("No subcommand specified. Run \"{path} --help\" to get a list of valid subcommands.")]
    NoSubcommandSpecified { path: String },

    /// A token names no child of the current group.
    #[error(
        "The subcommand \"{name}\" doesn't exist. Run \"{path} --help\" to get a list of valid subcommands."
    )]
    UnknownSubcommand { name: String, path: String },

    #[error("Unknown flag \"--{0}\". Run command with \"--help\" for valid flags.")]
    UnknownFlag(String),

    #[error("Unknown short flag \"-{0}\". Run command with \"--help\" for valid flags.")]
    UnknownShortFlag(char),

    /// A value flag was the last token and had no inline `=value`.
    #[error("Missing value for flag \"--{0}\".")]
    MissingFlagValue(String),

    #[error(
        "Invalid value \"{value}\" for flag \"--{name}\". Run command with \"--help\" for allowed values."
    )]
    InvalidFlagValue { name: String, value: String },

    /// All required value flags that were not supplied, in declaration order.
    #[error(
        "Missing required flags: {}. Run command with \"--help\" for valid flags.",
        .0.join(", ")
    )]
    MissingRequiredFlags(Vec<String>),

    #[error(
        "Invalid argument count ({0}). Run command with \"--help\" for valid argument combinations."
    )]
    InvalidArgumentCount(usize),

    /// A dangerous command was declined at the confirmation prompt.
    #[error("Aborted")]
    Aborted,
}

/// Errors binding handlers to a declared tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A declared command has no handler.
    #[error("no handler bound for command: {0}")]
    MissingHandler(String),

    /// A handler was bound to a path that is not a declared command.
    #[error("handler bound to unknown command: {0}")]
    UnknownPath(String),

    /// The tree itself is malformed.
    #[error("invalid command tree: {0}")]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_nested_messages_differ() {
        assert_eq!(
            CliError::UnknownCommand("unknownCmd".to_string()).to_string(),
            "The command \"unknownCmd\" doesn't exist. Run \"--help\" to get a list of valid commands."
        );
        assert_eq!(
            CliError::UnknownSubcommand {
                name: "nope".to_string(),
                path: "db backup".to_string(),
            }
            .to_string(),
            "The subcommand \"nope\" doesn't exist. Run \"db backup --help\" to get a list of valid subcommands."
        );
    }

    #[test]
    fn test_no_command_message() {
        assert_eq!(
            CliError::NoCommandSpecified.to_string(),
            "No command specified. Run \"--help\" to get a list of valid commands."
        );
    }

    #[test]
    fn test_flag_messages() {
        assert_eq!(
            CliError::UnknownShortFlag('x').to_string(),
            "Unknown short flag \"-x\". Run command with \"--help\" for valid flags."
        );
        assert_eq!(
            CliError::MissingFlagValue("env".to_string()).to_string(),
            "Missing value for flag \"--env\"."
        );
        assert_eq!(
            CliError::UnknownFlag("nope".to_string()).to_string(),
            "Unknown flag \"--nope\". Run command with \"--help\" for valid flags."
        );
    }

    #[test]
    fn test_missing_required_flags_are_comma_joined() {
        let err = CliError::MissingRequiredFlags(vec!["env".to_string(), "tag".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required flags: env, tag. Run command with \"--help\" for valid flags."
        );
    }

    #[test]
    fn test_argument_count_message() {
        assert_eq!(
            CliError::InvalidArgumentCount(1).to_string(),
            "Invalid argument count (1). Run command with \"--help\" for valid argument combinations."
        );
    }
}
