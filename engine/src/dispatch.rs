//! Path resolution and dispatch.
//!
//! [`Cli::dispatch`] walks the tree one token at a time, then either renders
//! help or validates the remaining tokens and calls the command's handler.
//! Every failure comes back as a [`CliError`]; only [`Cli::run`] and
//! [`Cli::run_with`] turn one into process termination.

use cmdtree_core::{
    CommandManifest, NodeManifest, ValidationError, validate_command, validate_group,
    validate_name,
};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::arity::check_arity;
use crate::console::{Console, TerminalConsole};
use crate::error::{BindError, CliError};
use crate::flags::{Invocation, is_forced, parse_flags};
use crate::help::{render_command_help, render_group_help};
use crate::tree::{Command, CommandNode, Group, Handler};

/// Question asked before running a dangerous command.
pub const CONFIRM_PROMPT: &str = "Are you sure you want to proceed?";

/// Process exit status for every aborted run.
pub const EXIT_FAILURE: i32 = 1;

const HELP_FLAGS: &[&str] = &["--help", "-h"];

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The handler ran and returned this value.
    Handled(T),
    /// A help report was written.
    Help,
}

/// A complete command-line interface: an anonymous root group.
///
/// # Examples
///
/// ```
/// use cmdtree::{BufferedConsole, Cli, Command, Outcome};
/// use cmdtree_core::CommandSpec;
///
/// let cli = Cli::builder("Greeter")
///     .command(
///         "hello",
///         Command::new(CommandSpec::new("Say hello").with_shape(["name"]), |inv| {
///             format!("hello {}", inv.args[0])
///         }),
///     )
///     .build()
///     .unwrap();
///
/// let mut console = BufferedConsole::new();
/// let outcome = cli.dispatch(["hello", "world"], &mut console).unwrap();
/// assert_eq!(outcome, Outcome::Handled("hello world".to_string()));
/// ```
#[derive(Debug)]
pub struct Cli<T> {
    root: Group<T>,
}

/// Builds a [`Cli`] from commands and groups declared in code.
#[derive(Debug)]
pub struct CliBuilder<T> {
    root: Group<T>,
}

impl<T> CliBuilder<T> {
    /// Adds a top-level command.
    pub fn command(mut self, name: &str, command: Command<T>) -> Self {
        self.root = self.root.with_command(name, command);
        self
    }

    /// Adds a top-level group.
    pub fn group(mut self, name: &str, group: Group<T>) -> Self {
        self.root = self.root.with_group(name, group);
        self
    }

    /// Validates the tree and builds the CLI.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in the tree.
    pub fn build(self) -> Result<Cli<T>, ValidationError> {
        let cli = Cli { root: self.root };
        cli.validate()?;
        Ok(cli)
    }
}

/// Handlers keyed by space-joined command path, for [`Cli::from_manifest`].
///
/// # Examples
///
/// ```
/// use cmdtree::Handlers;
///
/// let handlers: Handlers<()> = Handlers::new()
///     .on("status", |_| println!("ok"))
///     .on("db reset", |_| println!("reset"));
/// assert_eq!(handlers.len(), 2);
/// ```
pub struct Handlers<T> {
    handlers: IndexMap<String, Handler<T>>,
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }
}

impl<T> Handlers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to the command at `path` (e.g. `"db backup create"`).
    pub fn on(mut self, path: &str, handler: impl Fn(&Invocation) -> T + 'static) -> Self {
        self.handlers.insert(path.to_string(), Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn take(&mut self, path: &str) -> Option<Handler<T>> {
        self.handlers.shift_remove(path)
    }
}

impl<T> Cli<T> {
    /// Starts a CLI whose root listing shows `description`.
    pub fn builder(description: &str) -> CliBuilder<T> {
        CliBuilder {
            root: Group::new(description),
        }
    }

    /// Binds handlers to a declared tree.
    ///
    /// # Errors
    ///
    /// Returns [`MissingHandler`](BindError::MissingHandler) for a command no
    /// handler was bound to, [`UnknownPath`](BindError::UnknownPath) for a
    /// handler whose path is not a declared command, and
    /// [`Invalid`](BindError::Invalid) if the tree fails validation.
    pub fn from_manifest(
        manifest: CommandManifest,
        mut handlers: Handlers<T>,
    ) -> Result<Self, BindError> {
        let mut path = Vec::new();
        let children = bind_level(manifest.commands, &mut path, &mut handlers)?;

        if let Some(unbound) = handlers.handlers.keys().next() {
            return Err(BindError::UnknownPath(unbound.clone()));
        }

        let cli = Self {
            root: Group {
                description: manifest.description,
                children,
            },
        };
        cli.validate()?;
        Ok(cli)
    }

    /// The root group.
    pub fn root(&self) -> &Group<T> {
        &self.root
    }

    /// The declared tree without handlers.
    pub fn schema(&self) -> CommandManifest {
        let root = self.root.to_manifest();
        CommandManifest {
            description: root.description,
            commands: root.commands,
        }
    }

    /// Checks the whole tree, stopping at the first problem.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, depth-first in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut path = Vec::new();
        validate_tree(&self.root, &mut path)
    }

    /// Resolves `tokens` and runs the command, or renders help.
    ///
    /// Help mode is on when any token is `--help` or `-h`; every
    /// dash-prefixed token is then dropped before the path is resolved.
    ///
    /// # Errors
    ///
    /// Returns the [`CliError`] that aborts the run. Nothing has been written
    /// to the console for it yet.
    pub fn dispatch<I, S>(
        &self,
        tokens: I,
        console: &mut dyn Console,
    ) -> Result<Outcome<T>, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let help = tokens.iter().any(|t| HELP_FLAGS.contains(&t.as_str()));
        if help {
            tokens.retain(|t| !t.starts_with('-'));
        }
        debug!(help, ?tokens, "dispatching");

        let mut level = &self.root;
        let mut path: Vec<&str> = Vec::new();
        let mut rest = tokens.as_slice();

        loop {
            let Some((name, tail)) = rest.split_first() else {
                if help {
                    console.out(&render_group_help(level, &path));
                    return Ok(Outcome::Help);
                }
                return Err(if path.is_empty() {
                    CliError::NoCommandSpecified
                } else {
                    CliError::NoSubcommandSpecified {
                        path: path.join(" "),
                    }
                });
            };

            let Some(node) = level.child(name) else {
                return Err(if path.is_empty() {
                    CliError::UnknownCommand(name.clone())
                } else {
                    CliError::UnknownSubcommand {
                        name: name.clone(),
                        path: path.join(" "),
                    }
                });
            };

            path.push(name);
            rest = tail;
            debug!(segment = %name, kind = node.kind(), "resolved path segment");

            match node {
                CommandNode::Group(group) => level = group,
                CommandNode::Command(command) => {
                    return execute(command, &path, rest, help, console);
                }
            }
        }
    }

    /// Dispatches `tokens` against the real terminal.
    ///
    /// Prints the error and exits with [`EXIT_FAILURE`] if the run aborts.
    /// Returns `None` when help was rendered.
    pub fn run_with<I, S>(&self, tokens: I) -> Option<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut console = TerminalConsole;
        match self.dispatch(tokens, &mut console) {
            Ok(Outcome::Handled(value)) => Some(value),
            Ok(Outcome::Help) => None,
            Err(err) => abort(&mut console, &err),
        }
    }

    /// Dispatches the process arguments (without the program name).
    pub fn run(&self) -> Option<T> {
        self.run_with(std::env::args().skip(1))
    }
}

fn execute<T>(
    command: &Command<T>,
    path: &[&str],
    rest: &[String],
    help: bool,
    console: &mut dyn Console,
) -> Result<Outcome<T>, CliError> {
    let spec = command.spec();
    if help {
        console.out(&render_command_help(spec, path));
        return Ok(Outcome::Help);
    }

    if spec.dangerous {
        if is_forced(rest) {
            info!(command = %path.join(" "), "confirmation skipped by force override");
        } else if console.confirm(CONFIRM_PROMPT) {
            info!(command = %path.join(" "), "dangerous command confirmed");
        } else {
            info!(command = %path.join(" "), "dangerous command declined");
            return Err(CliError::Aborted);
        }
    }

    let invocation = parse_flags(rest, &spec.flags, spec.dangerous)?;
    check_arity(invocation.args.len(), &spec.arguments)?;

    debug!(command = %path.join(" "), args = invocation.args.len(), "invoking handler");
    Ok(Outcome::Handled(command.call(&invocation)))
}

fn abort(console: &mut dyn Console, err: &CliError) -> ! {
    console.err(&err.to_string());
    std::process::exit(EXIT_FAILURE)
}

fn bind_level<T>(
    commands: IndexMap<String, NodeManifest>,
    path: &mut Vec<String>,
    handlers: &mut Handlers<T>,
) -> Result<IndexMap<String, CommandNode<T>>, BindError> {
    let mut children = IndexMap::new();

    for (name, node) in commands {
        path.push(name.clone());
        let bound = match node {
            NodeManifest::Group(group) => CommandNode::Group(Group {
                description: group.description,
                children: bind_level(group.commands, path, handlers)?,
            }),
            NodeManifest::Command(spec) => {
                let key = path.join(" ");
                let handler = handlers
                    .take(&key)
                    .ok_or_else(|| BindError::MissingHandler(key.clone()))?;
                CommandNode::Command(Command::from_boxed(spec, handler))
            }
        };
        path.pop();
        children.insert(name, bound);
    }

    Ok(children)
}

fn validate_tree<T>(group: &Group<T>, path: &mut Vec<String>) -> Result<(), ValidationError> {
    validate_group(path, group.children.len())?;

    for (name, node) in &group.children {
        validate_name(path, name)?;

        path.push(name.clone());
        let result = match node {
            CommandNode::Group(child) => validate_tree(child, path),
            CommandNode::Command(command) => validate_command(&path.join(" "), command.spec()),
        };
        path.pop();
        result?;
    }

    Ok(())
}
