//! Declaration types for command trees.
//!
//! These types describe *what* a command accepts: its flags, the positional
//! argument shapes it takes, whether it is dangerous, and an optional usage
//! example. They carry no behaviour and round-trip through JSON and YAML, so a
//! tree can be declared in code or loaded from a
//! [`CommandManifest`](crate::CommandManifest).

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Flag names owned by the engine. They may never be declared by a command.
pub const RESERVED_FLAG_NAMES: &[&str] = &["force", "help"];

/// One accepted list of positional argument names.
///
/// Names are documentary: only the length of a shape is checked at runtime,
/// the names appear in help output.
pub type ArgumentShape = Vec<String>;

/// A regular expression constraint on a value flag.
///
/// Keeps the source text next to the compiled expression so the pattern can be
/// shown in help output and serialized back out unchanged. Matching is
/// unanchored; anchor the pattern with `^`/`$` to constrain the whole value.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ValuePattern;
///
/// let tag = ValuePattern::new(r"^v\d+$").unwrap();
/// assert!(tag.is_match("v12"));
/// assert!(!tag.is_match("latest"));
/// assert_eq!(tag.to_string(), r"/^v\d+$/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValuePattern {
    source: String,
    regex: Regex,
}

impl ValuePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if `source` is not a valid expression.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    /// The pattern's source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if `value` satisfies the pattern.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for ValuePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for ValuePattern {}

impl TryFrom<String> for ValuePattern {
    type Error = regex::Error;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        let regex = Regex::new(&source)?;
        Ok(Self { source, regex })
    }
}

impl From<ValuePattern> for String {
    fn from(pattern: ValuePattern) -> Self {
        pattern.source
    }
}

impl fmt::Display for ValuePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// Constraint on the values a value flag accepts.
///
/// # Examples
///
/// ```
/// use cmdtree_core::AllowedValues;
///
/// let env = AllowedValues::choices(["dev", "prod"]);
/// assert!(env.permits("prod"));
/// assert!(!env.permits("qa"));
/// assert_eq!(env.to_string(), r#""dev"/"prod""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedValues {
    /// The value must be one of these strings.
    Choices(Vec<String>),
    /// The value must match this pattern.
    Pattern(ValuePattern),
}

impl AllowedValues {
    /// Builds an explicit set of choices.
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `value` satisfies the constraint.
    pub fn permits(&self, value: &str) -> bool {
        match self {
            Self::Choices(choices) => choices.iter().any(|c| c == value),
            Self::Pattern(pattern) => pattern.is_match(value),
        }
    }
}

impl fmt::Display for AllowedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choices(choices) => {
                let quoted: Vec<String> = choices.iter().map(|c| format!("\"{c}\"")).collect();
                f.write_str(&quoted.join("/"))
            }
            Self::Pattern(pattern) => write!(f, "{pattern}"),
        }
    }
}

/// The closed set of flag kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlagKind {
    /// Present or absent. May carry a single-character alias (`-v`).
    Boolean {
        #[serde(skip_serializing_if = "Option::is_none")]
        short: Option<char>,
    },
    /// Carries a string value, given as `--name value` or `--name=value`.
    Value {
        #[serde(skip_serializing_if = "is_false")]
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        allowed: Option<AllowedValues>,
    },
}

/// Declaration of one flag a command recognizes.
///
/// The flag's name is the key it is stored under in
/// [`CommandSpec::flags`]; it is written on the command line as `--name`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{AllowedValues, FlagSpec};
///
/// let verbose = FlagSpec::boolean("Print more output").with_short('v');
/// assert!(verbose.is_boolean());
/// assert_eq!(verbose.short(), Some('v'));
///
/// let env = FlagSpec::value("Target environment")
///     .required()
///     .with_allowed(AllowedValues::choices(["dev", "prod"]));
/// assert!(env.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagDeclaration")]
pub struct FlagSpec {
    pub description: String,
    #[serde(flatten)]
    pub kind: FlagKind,
}

/// A flag as written in a manifest. Every key is known up front, so typos and
/// keys that don't fit the flag's type are load errors.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FlagDeclaration {
    #[serde(rename = "type")]
    flag_type: FlagType,
    description: String,
    short: Option<char>,
    required: Option<bool>,
    allowed: Option<AllowedValues>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum FlagType {
    Boolean,
    Value,
}

impl TryFrom<FlagDeclaration> for FlagSpec {
    type Error = String;

    fn try_from(decl: FlagDeclaration) -> Result<Self, Self::Error> {
        let kind = match decl.flag_type {
            FlagType::Boolean => {
                if decl.required.is_some() {
                    return Err("`required` only applies to value flags".to_string());
                }
                if decl.allowed.is_some() {
                    return Err("`allowed` only applies to value flags".to_string());
                }
                FlagKind::Boolean { short: decl.short }
            }
            FlagType::Value => {
                if decl.short.is_some() {
                    return Err("`short` only applies to boolean flags".to_string());
                }
                FlagKind::Value {
                    required: decl.required.unwrap_or(false),
                    allowed: decl.allowed,
                }
            }
        };

        Ok(Self {
            description: decl.description,
            kind,
        })
    }
}

impl FlagSpec {
    /// Creates a boolean flag without a short alias.
    pub fn boolean(description: &str) -> Self {
        Self {
            description: description.to_string(),
            kind: FlagKind::Boolean { short: None },
        }
    }

    /// Creates an optional, unconstrained value flag.
    pub fn value(description: &str) -> Self {
        Self {
            description: description.to_string(),
            kind: FlagKind::Value {
                required: false,
                allowed: None,
            },
        }
    }

    /// Sets the short alias. Value flags have no short form; for them this is a no-op.
    pub fn with_short(mut self, alias: char) -> Self {
        if let FlagKind::Boolean { short } = &mut self.kind {
            *short = Some(alias);
        }
        self
    }

    /// Marks a value flag as required. No-op for boolean flags.
    pub fn required(mut self) -> Self {
        if let FlagKind::Value { required, .. } = &mut self.kind {
            *required = true;
        }
        self
    }

    /// Constrains a value flag. No-op for boolean flags.
    pub fn with_allowed(mut self, constraint: AllowedValues) -> Self {
        if let FlagKind::Value { allowed, .. } = &mut self.kind {
            *allowed = Some(constraint);
        }
        self
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, FlagKind::Boolean { .. })
    }

    /// Short alias of a boolean flag.
    pub fn short(&self) -> Option<char> {
        match self.kind {
            FlagKind::Boolean { short } => short,
            FlagKind::Value { .. } => None,
        }
    }

    /// Returns `true` for value flags declared `required`.
    pub fn is_required(&self) -> bool {
        matches!(self.kind, FlagKind::Value { required: true, .. })
    }

    /// Value constraint of a value flag, if any.
    pub fn allowed(&self) -> Option<&AllowedValues> {
        match &self.kind {
            FlagKind::Value { allowed, .. } => allowed.as_ref(),
            FlagKind::Boolean { .. } => None,
        }
    }
}

/// Declaration of an executable command, minus its handler.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{CommandSpec, FlagSpec};
///
/// let deploy = CommandSpec::new("Deploy a service")
///     .with_shape(["service"])
///     .with_shape(["service", "region"])
///     .with_flag("verbose", FlagSpec::boolean("Print more output").with_short('v'))
///     .with_example("deploy api eu-west --verbose");
///
/// assert_eq!(deploy.arguments.len(), 2);
/// assert!(deploy.flag("verbose").is_some());
/// assert!(!deploy.dangerous);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Short description shown in help output
    pub description: String,
    /// Requires confirmation unless forced
    #[serde(default, skip_serializing_if = "is_false")]
    pub dangerous: bool,
    /// Accepted positional argument shapes (none = no positionals)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentShape>,
    /// Flags keyed by long name, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub flags: IndexMap<String, FlagSpec>,
    /// Literal usage example
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl CommandSpec {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Marks the command as dangerous.
    pub fn dangerous(mut self) -> Self {
        self.dangerous = true;
        self
    }

    /// Adds an accepted argument shape.
    pub fn with_shape<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Declares a flag. A later declaration with the same name replaces the earlier one.
    pub fn with_flag(mut self, name: &str, flag: FlagSpec) -> Self {
        self.flags.insert(name.to_string(), flag);
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    /// Looks up a flag by long name.
    pub fn flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.get(name)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
