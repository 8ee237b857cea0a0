//! Help reports for commands and groups.
//!
//! A report is plain text: an optional header naming the path, then titled
//! sections. Tables are aligned with [`Table`](crate::Table) and indented two
//! spaces under their title.

use cmdtree_core::{CommandSpec, FlagKind, FlagSpec};

use crate::table::Table;
use crate::tree::{CommandNode, Group};

const INDENT: &str = "  ";

/// Placeholder for an empty section.
const NONE: &str = "NONE";

/// Renders help for any node reached at `path`.
pub fn render_help<T>(node: &CommandNode<T>, path: &[&str]) -> String {
    match node {
        CommandNode::Command(command) => render_command_help(command.spec(), path),
        CommandNode::Group(group) => render_group_help(group, path),
    }
}

/// Renders help for an executable command.
///
/// # Examples
///
/// ```
/// use cmdtree::render_command_help;
/// use cmdtree_core::{CommandSpec, FlagSpec};
///
/// let spec = CommandSpec::new("Show status")
///     .with_flag("verbose", FlagSpec::boolean("Print more"));
/// let help = render_command_help(&spec, &["status"]);
///
/// assert!(help.starts_with("Help for command \"status\":"));
/// assert!(help.contains("  verbose  bool  Print more"));
/// ```
pub fn render_command_help(spec: &CommandSpec, path: &[&str]) -> String {
    let mut sections: Vec<String> = header("command", path).into_iter().collect();
    sections.push(section("Description:", [spec.description.clone()]));

    let arguments: Vec<String> = if spec.arguments.is_empty() {
        vec![NONE.to_string()]
    } else {
        spec.arguments
            .iter()
            .map(|shape| {
                if shape.is_empty() {
                    "(none)".to_string()
                } else {
                    shape.join(" ")
                }
            })
            .collect()
    };
    sections.push(section("Arguments:", arguments));

    let mut flags = Table::new();
    for (name, flag) in &spec.flags {
        let label = if flag.is_required() {
            format!("{name}*")
        } else {
            name.clone()
        };
        flags.row([label, value_label(flag), flag.description.clone()]);
    }
    sections.push(section("Flags:", table_or_none(&flags)));

    if let Some(example) = &spec.example {
        sections.push(section("Example:", example.lines().map(String::from)));
    }

    join(sections)
}

/// Renders help for a group: its description and one row per child.
pub fn render_group_help<T>(group: &Group<T>, path: &[&str]) -> String {
    let mut sections: Vec<String> = header("group", path).into_iter().collect();
    sections.push(section("Description:", [group.description.clone()]));

    let mut children = Table::new();
    for (name, node) in &group.children {
        children.row([name.as_str(), node.kind(), node.description()]);
    }
    sections.push(section("Subcommands:", table_or_none(&children)));

    join(sections)
}

/// Second column of the flags table.
fn value_label(flag: &FlagSpec) -> String {
    match &flag.kind {
        FlagKind::Boolean { .. } => "bool".to_string(),
        FlagKind::Value { allowed: None, .. } => "string".to_string(),
        FlagKind::Value {
            allowed: Some(allowed),
            ..
        } => allowed.to_string(),
    }
}

fn header(kind: &str, path: &[&str]) -> Option<String> {
    if path.is_empty() {
        None
    } else {
        Some(format!("Help for {kind} \"{}\":", path.join(" ")))
    }
}

fn section<I, S>(title: &str, body: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = title.to_string();
    for line in body {
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(line.as_ref());
    }
    out
}

fn table_or_none(table: &Table) -> Vec<String> {
    if table.is_empty() {
        vec![NONE.to_string()]
    } else {
        table.lines()
    }
}

fn join(sections: Vec<String>) -> String {
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use cmdtree_core::{AllowedValues, ValuePattern};

    use super::*;
    use crate::tree::Command;

    fn deploy() -> CommandSpec {
        CommandSpec::new("Deploy a service")
            .with_shape(["service"])
            .with_shape(["service", "region"])
            .with_flag(
                "env",
                FlagSpec::value("Target environment")
                    .required()
                    .with_allowed(AllowedValues::choices(["dev", "prod"])),
            )
            .with_flag(
                "tag",
                FlagSpec::value("Release tag")
                    .with_allowed(AllowedValues::Pattern(ValuePattern::new(r"^v\d+$").unwrap())),
            )
            .with_flag("note", FlagSpec::value("Free text"))
            .with_flag("verbose", FlagSpec::boolean("Print more").with_short('v'))
            .with_example("deploy api eu-west --env prod")
    }

    #[test]
    fn test_command_help_layout() {
        let help = render_command_help(&deploy(), &["deploy"]);

        let expected = [
            "Help for command \"deploy\":",
            "",
            "Description:",
            "  Deploy a service",
            "",
            "Arguments:",
            "  service",
            "  service region",
            "",
            "Flags:",
            "  env*     \"dev\"/\"prod\"  Target environment",
            "  tag      /^v\\d+$/      Release tag",
            "  note     string        Free text",
            "  verbose  bool          Print more",
            "",
            "Example:",
            "  deploy api eu-west --env prod",
        ]
        .join("\n");
        assert_eq!(help, expected);
    }

    #[test]
    fn test_command_without_arguments_or_flags() {
        let help = render_command_help(&CommandSpec::new("Show status"), &["status"]);

        assert_eq!(
            help,
            "Help for command \"status\":\n\nDescription:\n  Show status\n\nArguments:\n  NONE\n\nFlags:\n  NONE"
        );
    }

    #[test]
    fn test_empty_shape_is_labelled() {
        let spec = CommandSpec::new("List")
            .with_shape(Vec::<String>::new())
            .with_shape(["filter"]);
        let help = render_command_help(&spec, &["list"]);

        assert!(help.contains("Arguments:\n  (none)\n  filter"));
    }

    #[test]
    fn test_group_help_lists_children_in_order() {
        let group: Group<()> = Group::new("Database maintenance")
            .with_command("reset", Command::new(CommandSpec::new("Reset the database"), |_| ()))
            .with_group("backup", Group::new("Backups"));

        let help = render_group_help(&group, &["db"]);
        assert_eq!(
            help,
            "Help for group \"db\":\n\nDescription:\n  Database maintenance\n\nSubcommands:\n  reset   command  Reset the database\n  backup  group    Backups"
        );
    }

    #[test]
    fn test_root_listing_has_no_header() {
        let root: Group<()> = Group::new("Ops toolkit")
            .with_command("status", Command::new(CommandSpec::new("Status"), |_| ()));

        let help = render_group_help(&root, &[]);
        assert!(help.starts_with("Description:\n  Ops toolkit"));
        assert!(!help.contains("Help for"));
    }

    #[test]
    fn test_nested_path_is_space_joined() {
        let node: CommandNode<()> =
            CommandNode::Command(Command::new(CommandSpec::new("List"), |_| ()));

        let help = render_help(&node, &["db", "backup", "list"]);
        assert!(help.starts_with("Help for command \"db backup list\":"));
    }
}
