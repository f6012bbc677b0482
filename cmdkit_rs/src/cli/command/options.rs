//! Option tuples to parser-agnostic option specifications.
//!
//! A descriptor declares options as `(alias, flag syntax, description)`.
//! The flag syntax is the long name optionally followed by a value
//! placeholder: `force` is a boolean, `depth <n>` takes a required value and
//! `color [when]` takes an optional one.

use super::types::{CommandDescriptor, CommandOption};

/// Help heading for options declared by the command.
pub const STANDARD_GROUP: &str = "Options";

/// Help heading for flags every command receives.
pub const GLOBAL_GROUP: &str = "Global";

pub const LOG_FLAG: &str = "log";
pub const JSON_FLAG: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub alias: Option<String>,
    pub description: String,
    pub group: &'static str,
    /// Placeholder contains `<`: the value must be given.
    pub requires_arg: bool,
    pub value_type: ValueType,
    /// Placeholder text without brackets, for help output.
    pub value_name: Option<String>,
}

impl OptionSpec {
    pub fn takes_value(&self) -> bool {
        self.value_type == ValueType::String
    }
}

/// Derive the spec for one declared option.
pub fn option_spec(option: &CommandOption) -> OptionSpec {
    let flag = option.flag.trim();
    let (name, placeholder) = match flag.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim())),
        None => (flag, None),
    };

    let value_name = placeholder
        .map(|p| p.trim_matches(|c| matches!(c, '<' | '>' | '[' | ']')))
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    OptionSpec {
        name: name.to_string(),
        alias: Some(option.alias.trim())
            .filter(|alias| !alias.is_empty())
            .map(str::to_string),
        description: option.description.clone(),
        group: STANDARD_GROUP,
        requires_arg: flag.contains('<'),
        value_type: if placeholder.is_some() {
            ValueType::String
        } else {
            ValueType::Boolean
        },
        value_name,
    }
}

/// All option specs for a descriptor, injected global flags included.
///
/// `log` is always present. `json` is added when the command has a JSON
/// handler and does not declare its own `json` option.
pub fn options_to_specs(descriptor: &CommandDescriptor) -> Vec<OptionSpec> {
    let mut specs: Vec<OptionSpec> = descriptor
        .options
        .iter()
        .map(option_spec)
        .filter(|spec| spec.name != LOG_FLAG)
        .collect();

    if descriptor.output_modes().json && !specs.iter().any(|spec| spec.name == JSON_FLAG) {
        specs.push(global_flag(JSON_FLAG, Some("j"), "return the output as JSON"));
    }
    specs.push(global_flag(
        LOG_FLAG,
        None,
        "print log/debug messages to the screen",
    ));
    specs
}

fn global_flag(name: &str, alias: Option<&str>, description: &str) -> OptionSpec {
    OptionSpec {
        name: name.to_string(),
        alias: alias.map(str::to_string),
        description: description.to_string(),
        group: GLOBAL_GROUP,
        requires_arg: false,
        value_type: ValueType::Boolean,
        value_name: None,
    }
}
