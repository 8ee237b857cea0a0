//! The executable command tree: declarations bound to handlers.

use std::fmt;

use cmdtree_core::{CommandSpec, GroupManifest, NodeManifest};
use indexmap::IndexMap;

use crate::flags::Invocation;

/// A command handler. Receives the resolved invocation and returns the run's result.
pub type Handler<T> = Box<dyn Fn(&Invocation) -> T>;

/// An executable leaf: a declaration plus the handler that runs it.
pub struct Command<T> {
    spec: CommandSpec,
    handler: Handler<T>,
}

impl<T> Command<T> {
    pub fn new(spec: CommandSpec, handler: impl Fn(&Invocation) -> T + 'static) -> Self {
        Self {
            spec,
            handler: Box::new(handler),
        }
    }

    pub(crate) fn from_boxed(spec: CommandSpec, handler: Handler<T>) -> Self {
        Self { spec, handler }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub(crate) fn call(&self, invocation: &Invocation) -> T {
        (self.handler)(invocation)
    }
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// An internal node owning named children in declaration order.
#[derive(Debug)]
pub struct Group<T> {
    pub description: String,
    pub children: IndexMap<String, CommandNode<T>>,
}

impl<T> Group<T> {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            children: IndexMap::new(),
        }
    }

    /// Adds a command child.
    pub fn with_command(mut self, name: &str, command: Command<T>) -> Self {
        self.children.insert(name.to_string(), CommandNode::Command(command));
        self
    }

    /// Adds a nested group.
    pub fn with_group(mut self, name: &str, group: Group<T>) -> Self {
        self.children.insert(name.to_string(), CommandNode::Group(group));
        self
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode<T>> {
        self.children.get(name)
    }

    /// Declaration of this group and everything below it, without handlers.
    pub fn to_manifest(&self) -> GroupManifest {
        GroupManifest {
            description: self.description.clone(),
            commands: self
                .children
                .iter()
                .map(|(name, node)| (name.clone(), node.to_manifest()))
                .collect(),
        }
    }
}

/// A node of the tree.
#[derive(Debug)]
pub enum CommandNode<T> {
    Command(Command<T>),
    Group(Group<T>),
}

impl<T> CommandNode<T> {
    pub fn description(&self) -> &str {
        match self {
            Self::Command(command) => &command.spec.description,
            Self::Group(group) => &group.description,
        }
    }

    /// `"command"` or `"group"`, as shown in help listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Group(_) => "group",
        }
    }

    pub fn to_manifest(&self) -> NodeManifest {
        match self {
            Self::Command(command) => NodeManifest::Command(command.spec.clone()),
            Self::Group(group) => NodeManifest::Group(group.to_manifest()),
        }
    }
}
