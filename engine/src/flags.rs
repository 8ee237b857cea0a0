//! Flag parsing for a resolved command.
//!
//! Consumes the tokens left after the command path against one command's flag
//! schema. Long flags take `--name`, `--name=value` or `--name value`; short
//! flags are single-dash groups of boolean aliases (`-vn`). Every other token
//! is a positional argument, kept in input order.

use std::collections::HashMap;

use cmdtree_core::{FlagKind, FlagSpec};
use indexmap::IndexMap;
use tracing::trace;

use crate::error::CliError;

/// Long name of the engine-owned confirmation override.
pub(crate) const FORCE_FLAG: &str = "force";

/// Short alias of the confirmation override.
pub(crate) const FORCE_SHORT: char = 'f';

/// A resolved flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Value(String),
}

/// Resolved flags of one invocation, keyed by long name.
///
/// Boolean flags are always present. Value flags are present only when
/// supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues(IndexMap<String, FlagValue>);

impl FlagValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// Returns `true` if the boolean flag `name` was set.
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(FlagValue::Bool(true)))
    }

    /// Returns the value of the value flag `name`, if supplied.
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FlagValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn set(&mut self, name: &str, value: FlagValue) {
        self.0.insert(name.to_string(), value);
    }
}

/// What a handler receives: positional arguments and flag values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    pub flags: FlagValues,
}

/// Parses `tokens` against a command's flag schema.
///
/// `dangerous` enables the `--force` / `-f` carve-out: on a dangerous command
/// those tokens are skipped silently, anywhere else they are unknown flags.
///
/// # Errors
///
/// Returns the first [`UnknownFlag`](CliError::UnknownFlag),
/// [`UnknownShortFlag`](CliError::UnknownShortFlag),
/// [`MissingFlagValue`](CliError::MissingFlagValue) or
/// [`InvalidFlagValue`](CliError::InvalidFlagValue) met while scanning, then
/// [`MissingRequiredFlags`](CliError::MissingRequiredFlags) naming every
/// required flag not supplied.
///
/// # Examples
///
/// ```
/// use cmdtree::parse_flags;
/// use cmdtree_core::FlagSpec;
/// use indexmap::IndexMap;
///
/// let mut schema = IndexMap::new();
/// schema.insert("verbose".to_string(), FlagSpec::boolean("Verbose").with_short('v'));
/// schema.insert("env".to_string(), FlagSpec::value("Environment"));
///
/// let tokens: Vec<String> = ["api", "-v", "--env=prod"].iter().map(|t| t.to_string()).collect();
/// let invocation = parse_flags(&tokens, &schema, false).unwrap();
///
/// assert_eq!(invocation.args, vec!["api"]);
/// assert!(invocation.flags.is_set("verbose"));
/// assert_eq!(invocation.flags.value("env"), Some("prod"));
/// ```
pub fn parse_flags(
    tokens: &[String],
    schema: &IndexMap<String, FlagSpec>,
    dangerous: bool,
) -> Result<Invocation, CliError> {
    let mut flags = FlagValues::new();
    let mut aliases: HashMap<char, &str> = HashMap::new();
    let mut missing: Vec<&str> = Vec::new();

    for (name, spec) in schema {
        match &spec.kind {
            FlagKind::Boolean { short } => {
                flags.set(name, FlagValue::Bool(false));
                if let Some(short) = short {
                    aliases.insert(*short, name);
                }
            }
            FlagKind::Value { required: true, .. } => missing.push(name),
            FlagKind::Value { .. } => {}
        }
    }

    let mut args = Vec::new();
    let mut tokens = tokens.iter();

    while let Some(token) = tokens.next() {
        if let Some(body) = token.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            if name == FORCE_FLAG && dangerous {
                continue;
            }

            let spec = schema
                .get(name)
                .ok_or_else(|| CliError::UnknownFlag(name.to_string()))?;

            match &spec.kind {
                // An inline value on a boolean flag is discarded.
                FlagKind::Boolean { .. } => flags.set(name, FlagValue::Bool(true)),
                FlagKind::Value { allowed, .. } => {
                    let value = match inline {
                        Some(value) => value.to_string(),
                        None => tokens
                            .next()
                            .cloned()
                            .ok_or_else(|| CliError::MissingFlagValue(name.to_string()))?,
                    };

                    if let Some(allowed) = allowed {
                        if !allowed.permits(&value) {
                            return Err(CliError::InvalidFlagValue {
                                name: name.to_string(),
                                value,
                            });
                        }
                    }

                    trace!(flag = name, value = %value, "value flag resolved");
                    missing.retain(|m| *m != name);
                    flags.set(name, FlagValue::Value(value));
                }
            }
        } else if let Some(group) = token.strip_prefix('-') {
            for short in group.chars() {
                if short == FORCE_SHORT && dangerous {
                    continue;
                }
                let name = aliases
                    .get(&short)
                    .ok_or(CliError::UnknownShortFlag(short))?;
                flags.set(name, FlagValue::Bool(true));
            }
        } else {
            args.push(token.clone());
        }
    }

    if !missing.is_empty() {
        return Err(CliError::MissingRequiredFlags(
            missing.into_iter().map(String::from).collect(),
        ));
    }

    Ok(Invocation { args, flags })
}

/// Returns `true` if the tokens carry a confirmation override: a bare
/// `--force`, or any single-dash group containing `f`.
pub(crate) fn is_forced(tokens: &[String]) -> bool {
    tokens.iter().any(|token| {
        token == "--force"
            || (!token.starts_with("--")
                && token
                    .strip_prefix('-')
                    .is_some_and(|group| group.contains(FORCE_SHORT)))
    })
}

#[cfg(test)]
mod tests {
    use cmdtree_core::{AllowedValues, ValuePattern};

    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    fn schema() -> IndexMap<String, FlagSpec> {
        let mut schema = IndexMap::new();
        schema.insert(
            "verbose".to_string(),
            FlagSpec::boolean("Verbose").with_short('v'),
        );
        schema.insert(
            "dry-run".to_string(),
            FlagSpec::boolean("Dry run").with_short('n'),
        );
        schema.insert("quiet".to_string(), FlagSpec::boolean("Quiet"));
        schema.insert(
            "env".to_string(),
            FlagSpec::value("Environment")
                .required()
                .with_allowed(AllowedValues::choices(["dev", "prod"])),
        );
        schema.insert(
            "tag".to_string(),
            FlagSpec::value("Tag")
                .with_allowed(AllowedValues::Pattern(ValuePattern::new(r"^v\d+$").unwrap())),
        );
        schema.insert("note".to_string(), FlagSpec::value("Note"));
        schema
    }

    #[test]
    fn test_booleans_default_to_false() {
        let invocation = parse_flags(&tokens(&["--env", "dev"]), &schema(), false).unwrap();

        assert_eq!(invocation.flags.get("verbose"), Some(&FlagValue::Bool(false)));
        assert_eq!(invocation.flags.get("dry-run"), Some(&FlagValue::Bool(false)));
        assert_eq!(invocation.flags.get("quiet"), Some(&FlagValue::Bool(false)));
        assert!(invocation.flags.get("note").is_none());
        assert!(invocation.args.is_empty());
    }

    #[test]
    fn test_inline_and_separate_values_agree() {
        let inline = parse_flags(&tokens(&["--env=prod"]), &schema(), false).unwrap();
        let separate = parse_flags(&tokens(&["--env", "prod"]), &schema(), false).unwrap();

        assert_eq!(inline, separate);
        assert_eq!(inline.flags.value("env"), Some("prod"));
    }

    #[test]
    fn test_inline_value_splits_on_first_equals() {
        let invocation =
            parse_flags(&tokens(&["--env=dev", "--note=a=b"]), &schema(), false).unwrap();
        assert_eq!(invocation.flags.value("note"), Some("a=b"));
    }

    #[test]
    fn test_stacked_short_flags_in_any_order() {
        for group in ["-vn", "-nv"] {
            let invocation =
                parse_flags(&tokens(&[group, "--env", "dev"]), &schema(), false).unwrap();
            assert!(invocation.flags.is_set("verbose"));
            assert!(invocation.flags.is_set("dry-run"));
            assert!(!invocation.flags.is_set("quiet"));
        }
    }

    #[test]
    fn test_flags_and_positionals_interleave() {
        let invocation = parse_flags(
            &tokens(&["one", "-v", "two", "--env", "dev", "three", "one"]),
            &schema(),
            false,
        )
        .unwrap();

        assert_eq!(invocation.args, vec!["one", "two", "three", "one"]);
    }

    #[test]
    fn test_value_token_is_never_positional() {
        let invocation =
            parse_flags(&tokens(&["--note", "-v", "--env", "dev"]), &schema(), false).unwrap();

        assert_eq!(invocation.flags.value("note"), Some("-v"));
        assert!(!invocation.flags.is_set("verbose"));
        assert!(invocation.args.is_empty());
    }

    #[test]
    fn test_unknown_long_flag() {
        let err = parse_flags(&tokens(&["--nope"]), &schema(), false).unwrap_err();
        assert_eq!(err, CliError::UnknownFlag("nope".to_string()));
    }

    #[test]
    fn test_unknown_short_flag_names_the_character() {
        let err = parse_flags(&tokens(&["-vx"]), &schema(), false).unwrap_err();
        assert_eq!(err, CliError::UnknownShortFlag('x'));
    }

    #[test]
    fn test_missing_value_at_end_of_input() {
        let err = parse_flags(&tokens(&["--env"]), &schema(), false).unwrap_err();
        assert_eq!(err, CliError::MissingFlagValue("env".to_string()));
    }

    #[test]
    fn test_choice_constraint() {
        let err = parse_flags(&tokens(&["--env", "qa"]), &schema(), false).unwrap_err();
        assert_eq!(
            err,
            CliError::InvalidFlagValue {
                name: "env".to_string(),
                value: "qa".to_string(),
            }
        );
    }

    #[test]
    fn test_pattern_constraint() {
        let ok = parse_flags(&tokens(&["--env=dev", "--tag=v12"]), &schema(), false).unwrap();
        assert_eq!(ok.flags.value("tag"), Some("v12"));

        let err = parse_flags(&tokens(&["--env=dev", "--tag=latest"]), &schema(), false);
        assert!(matches!(err, Err(CliError::InvalidFlagValue { .. })));
    }

    #[test]
    fn test_all_missing_required_flags_reported_in_declaration_order() {
        let mut schema = schema();
        schema.insert("region".to_string(), FlagSpec::value("Region").required());
        schema.insert("owner".to_string(), FlagSpec::value("Owner").required());

        let err = parse_flags(&tokens(&["--region", "eu"]), &schema, false).unwrap_err();
        assert_eq!(
            err,
            CliError::MissingRequiredFlags(vec!["env".to_string(), "owner".to_string()])
        );
    }

    #[test]
    fn test_inline_value_on_boolean_is_discarded() {
        let invocation =
            parse_flags(&tokens(&["--verbose=no", "--env", "dev"]), &schema(), false).unwrap();
        assert_eq!(invocation.flags.get("verbose"), Some(&FlagValue::Bool(true)));
    }

    #[test]
    fn test_force_is_skipped_only_on_dangerous_commands() {
        let dangerous =
            parse_flags(&tokens(&["--force", "-fv", "--env", "dev"]), &schema(), true).unwrap();
        assert!(dangerous.flags.is_set("verbose"));
        assert!(dangerous.flags.get("force").is_none());

        assert_eq!(
            parse_flags(&tokens(&["--force"]), &schema(), false).unwrap_err(),
            CliError::UnknownFlag("force".to_string())
        );
        assert_eq!(
            parse_flags(&tokens(&["-f"]), &schema(), false).unwrap_err(),
            CliError::UnknownShortFlag('f')
        );
    }

    #[test]
    fn test_is_forced() {
        assert!(is_forced(&tokens(&["a", "--force"])));
        assert!(is_forced(&tokens(&["-vf"])));
        assert!(!is_forced(&tokens(&["--forceful"])));
        assert!(!is_forced(&tokens(&["--fast"])));
        assert!(!is_forced(&tokens(&["file"])));
    }
}
