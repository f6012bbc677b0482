//! Declarative command description and the values handed to its handlers.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::progress::Loader;

// ============================================================================
// Handler inputs
// ============================================================================

/// Value of one positional slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    One(String),
    /// Variadic positional (`<files...>`)
    Many(Vec<String>),
}

impl ArgValue {
    /// Single value, or the first one of a variadic slot.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::One(value) => Some(value.as_str()),
            ArgValue::Many(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            ArgValue::One(value) => vec![value.as_str()],
            ArgValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Positional values in usage order; `None` for an omitted optional slot.
pub type CliArgs = Vec<Option<ArgValue>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

impl FlagValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(value) => *value,
            FlagValue::Str(value) => !value.is_empty(),
        }
    }
}

/// Flag name -> value. A missing key means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(BTreeMap<String, FlagValue>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a flag. An empty string value counts as a bare boolean flag.
    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        let value = match value {
            FlagValue::Str(s) if s.is_empty() => FlagValue::Bool(true),
            other => other,
        };
        self.0.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: FlagValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FlagValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// True when the flag is present and truthy.
    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(FlagValue::is_truthy)
    }

    pub fn json(&self) -> bool {
        self.is_set("json")
    }

    pub fn log(&self) -> bool {
        self.is_set("log")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlagValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a handler receives for one invocation.
#[derive(Debug, Clone)]
pub struct CommandInput {
    pub args: CliArgs,
    pub flags: Flags,
    pub loader: Loader,
}

impl CommandInput {
    /// Positional value at `index` (first value for variadic slots).
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index)?.as_ref()?.as_str()
    }
}

// ============================================================================
// Handler outputs
// ============================================================================

/// Result of a report handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Plain text, exit code 0
    Text(String),
    /// Text plus an explicit exit code
    Coded { code: i32, message: String },
}

impl Report {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Report::Coded {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Report::Text(_) => 0,
            Report::Coded { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Report::Text(message) | Report::Coded { message, .. } => message,
        }
    }
}

impl From<String> for Report {
    fn from(message: String) -> Self {
        Report::Text(message)
    }
}

impl From<&str> for Report {
    fn from(message: &str) -> Self {
        Report::Text(message.to_string())
    }
}

pub type ReportHandler =
    Arc<dyn Fn(CommandInput) -> BoxFuture<'static, anyhow::Result<Report>> + Send + Sync>;

pub type JsonHandler = Arc<
    dyn Fn(CommandInput) -> BoxFuture<'static, anyhow::Result<serde_json::Value>> + Send + Sync,
>;

/// Output modes a command can serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputModes {
    pub report: bool,
    pub json: bool,
}

impl OutputModes {
    pub fn is_empty(&self) -> bool {
        !self.report && !self.json
    }
}

// ============================================================================
// Descriptor parts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub cmd: String,
    pub description: String,
}

/// Description of one positional argument. The usage string stays the
/// source of truth for which positionals exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    pub name: String,
    pub description: Option<String>,
}

/// `[alias, flag syntax, description]`, e.g. `["f", "force", "force update"]`
/// or `["", "depth <n>", "max depth"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub alias: String,
    pub flag: String,
    pub description: String,
}

impl From<(&str, &str, &str)> for CommandOption {
    fn from((alias, flag, description): (&str, &str, &str)) -> Self {
        Self {
            alias: alias.to_string(),
            flag: flag.to_string(),
            description: description.to_string(),
        }
    }
}

/// Help-layout grouping tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CommandGroup {
    General,
    #[default]
    Ungrouped,
    Other(String),
}

impl CommandGroup {
    pub fn tag(&self) -> &str {
        match self {
            CommandGroup::General => "general",
            CommandGroup::Ungrouped => "ungrouped",
            CommandGroup::Other(tag) => tag,
        }
    }

    /// Title shown above the group's commands in the top-level help.
    pub fn description(&self) -> String {
        match self {
            CommandGroup::General => "General commands".to_string(),
            CommandGroup::Ungrouped => "Ungrouped".to_string(),
            CommandGroup::Other(tag) => capitalize(tag),
        }
    }
}

impl From<&str> for CommandGroup {
    fn from(tag: &str) -> Self {
        match tag {
            "general" => CommandGroup::General,
            "ungrouped" => CommandGroup::Ungrouped,
            other => CommandGroup::Other(other.to_string()),
        }
    }
}

/// `"dev-TOOLS"` -> `"Dev-tools"`
fn capitalize(tag: &str) -> String {
    let lower = tag.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// Declarative definition of one command.
///
/// ```
/// use cmdkit::cli::command::{CommandDescriptor, CommandGroup, Report};
///
/// let hello = CommandDescriptor::new("hello")
///     .usage("hello <name>")
///     .description("say hello")
///     .group(CommandGroup::General)
///     .option(("l", "loud", "shout it"))
///     .report(|input| async move {
///         let name = input.arg(0).unwrap_or("world").to_string();
///         Ok(Report::from(format!("hello {name}")))
///     });
/// assert!(hello.output_modes().report);
/// ```
#[derive(Clone, Default)]
pub struct CommandDescriptor {
    pub name: String,
    pub alias: Option<String>,
    usage: Option<String>,
    pub description: Option<String>,
    pub extended_description: Option<String>,
    pub group: CommandGroup,
    pub options: Vec<CommandOption>,
    pub arguments: Vec<CommandArg>,
    pub examples: Vec<Example>,
    report: Option<ReportHandler>,
    json: Option<JsonHandler>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Usage string, e.g. `add <path> [message]`. Defaults to the bare name.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Shown only in the command's own help, right after the description.
    pub fn extended_description(mut self, text: impl Into<String>) -> Self {
        self.extended_description = Some(text.into());
        self
    }

    pub fn group(mut self, group: impl Into<CommandGroup>) -> Self {
        self.group = group.into();
        self
    }

    pub fn option(mut self, option: impl Into<CommandOption>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.arguments.push(CommandArg {
            name: name.into(),
            description: Some(description.into()),
        });
        self
    }

    pub fn example(mut self, cmd: impl Into<String>, description: impl Into<String>) -> Self {
        self.examples.push(Example {
            cmd: cmd.into(),
            description: description.into(),
        });
        self
    }

    /// Handler producing human-readable output.
    pub fn report<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(CommandInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Report>> + Send + 'static,
    {
        let handler: ReportHandler = Arc::new(move |input| handler(input).boxed());
        self.report = Some(handler);
        self
    }

    /// Handler producing a JSON document, selected by `--json`.
    pub fn json<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(CommandInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
    {
        let handler: JsonHandler = Arc::new(move |input| handler(input).boxed());
        self.json = Some(handler);
        self
    }

    pub fn usage_str(&self) -> &str {
        self.usage.as_deref().unwrap_or(&self.name)
    }

    pub fn output_modes(&self) -> OutputModes {
        OutputModes {
            report: self.report.is_some(),
            json: self.json.is_some(),
        }
    }

    pub fn report_handler(&self) -> Option<&ReportHandler> {
        self.report.as_ref()
    }

    pub fn json_handler(&self) -> Option<&JsonHandler> {
        self.json.as_ref()
    }

    /// Whether `token` names this command (name or alias).
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.alias.as_deref() == Some(token)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("usage", &self.usage_str())
            .field("description", &self.description)
            .field("group", &self.group)
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .field("examples", &self.examples)
            .field("output_modes", &self.output_modes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_flag_becomes_true() {
        let mut flags = Flags::new();
        flags.insert("all", FlagValue::Str(String::new()));
        flags.insert("name", FlagValue::Str("x".into()));
        assert_eq!(flags.get("all"), Some(&FlagValue::Bool(true)));
        assert_eq!(flags.get_str("name"), Some("x"));
        assert!(flags.is_set("all"));
        assert!(!flags.is_set("missing"));
    }

    #[test]
    fn test_json_and_log_accessors() {
        let flags = Flags::new()
            .with("json", FlagValue::Bool(true))
            .with("log", FlagValue::Bool(false));
        assert!(flags.json());
        assert!(!flags.log());
    }

    #[test]
    fn test_report_code_and_message() {
        assert_eq!(Report::from("Hello").code(), 0);
        assert_eq!(Report::from("Hello").message(), "Hello");
        let coded = Report::new(2, "Bad");
        assert_eq!(coded.code(), 2);
        assert_eq!(coded.message(), "Bad");
    }

    #[test]
    fn test_group_descriptions() {
        assert_eq!(CommandGroup::General.description(), "General commands");
        assert_eq!(CommandGroup::Ungrouped.description(), "Ungrouped");
        assert_eq!(CommandGroup::from("workspace").description(), "Workspace");
        assert_eq!(CommandGroup::from("dev-TOOLS").description(), "Dev-tools");
        assert_eq!(CommandGroup::from("general"), CommandGroup::General);
    }

    #[test]
    fn test_output_modes_follow_handlers() {
        let none = CommandDescriptor::new("noop");
        assert!(none.output_modes().is_empty());

        let both = CommandDescriptor::new("both")
            .report(|_| async { Ok(Report::from("r")) })
            .json(|_| async { Ok(serde_json::json!({})) });
        assert_eq!(
            both.output_modes(),
            OutputModes {
                report: true,
                json: true
            }
        );
    }

    #[test]
    fn test_usage_defaults_to_name() {
        let cmd = CommandDescriptor::new("build");
        assert_eq!(cmd.usage_str(), "build");
        let cmd = cmd.usage("build <target>").alias("b");
        assert_eq!(cmd.usage_str(), "build <target>");
        assert!(cmd.matches("b"));
        assert!(cmd.matches("build"));
        assert!(!cmd.matches("bu"));
    }

    #[test]
    fn test_command_input_arg_lookup() {
        let input = CommandInput {
            args: vec![
                Some(ArgValue::One("web".into())),
                None,
                Some(ArgValue::Many(vec!["a".into(), "b".into()])),
            ],
            flags: Flags::new(),
            loader: Loader::hidden(),
        };
        assert_eq!(input.arg(0), Some("web"));
        assert_eq!(input.arg(1), None);
        assert_eq!(input.arg(2), Some("a"));
        assert_eq!(input.arg(9), None);
    }
}
