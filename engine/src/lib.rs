//! Declarative command tree engine.
//!
//! Resolves a raw argument vector against a tree of named commands and
//! groups, validates flags and positional arguments, and either calls the
//! command's handler or renders a help report.
//!
//! # Pipeline
//!
//! 1. **Help detection**: any `--help` or `-h` token turns on help mode and
//!    drops all dash-prefixed tokens.
//! 2. **Path resolution**: leading tokens name groups, then a command.
//! 3. **Confirmation**: dangerous commands ask the [`Console`] first, unless
//!    `--force` or a short group containing `f` is present.
//! 4. **Validation**: [`parse_flags`] then [`check_arity`].
//! 5. **Invocation**: the handler receives an [`Invocation`].
//!
//! Errors are [`CliError`] values; [`Cli::run`] is the single place that
//! prints one and exits the process.
//!
//! # Example
//!
//! ```
//! use cmdtree::{BufferedConsole, Cli, CliError, Command, Group, Outcome};
//! use cmdtree_core::{CommandSpec, FlagSpec};
//!
//! let cli = Cli::builder("Operations toolkit")
//!     .group(
//!         "db",
//!         Group::new("Database maintenance").with_command(
//!             "reset",
//!             Command::new(
//!                 CommandSpec::new("Drop and recreate the database")
//!                     .dangerous()
//!                     .with_flag("env", FlagSpec::value("Target environment").required()),
//!                 |inv| inv.flags.value("env").unwrap_or_default().to_string(),
//!             ),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! // Declined at the prompt
//! let mut console = BufferedConsole::with_answers([false]);
//! assert_eq!(
//!     cli.dispatch(["db", "reset", "--env", "dev"], &mut console),
//!     Err(CliError::Aborted)
//! );
//!
//! // Forced: no prompt
//! let mut console = BufferedConsole::new();
//! let outcome = cli.dispatch(["db", "reset", "--env=dev", "--force"], &mut console);
//! assert_eq!(outcome, Ok(Outcome::Handled("dev".to_string())));
//! assert!(console.prompts.is_empty());
//! ```

mod arity;
mod console;
mod dispatch;
mod error;
mod export;
mod flags;
mod help;
mod table;
mod tree;

pub use arity::check_arity;
pub use console::{BufferedConsole, Console, TerminalConsole};
pub use dispatch::{CONFIRM_PROMPT, Cli, CliBuilder, EXIT_FAILURE, Handlers, Outcome};
pub use error::{BindError, CliError};
pub use export::{SchemaFormat, export_schema};
pub use flags::{FlagValue, FlagValues, Invocation, parse_flags};
pub use help::{render_command_help, render_group_help, render_help};
pub use table::Table;
pub use tree::{Command, CommandNode, Group, Handler};
