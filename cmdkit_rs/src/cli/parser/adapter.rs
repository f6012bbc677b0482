//! Binding between a [`CommandDescriptor`] and clap.
//!
//! This is the only place that turns descriptors into `clap::Command`s and
//! reads values back out of `ArgMatches`.

use std::collections::HashSet;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches};
use heck::ToLowerCamelCase;

use crate::cli::command::help::POSITIONALS_HEADING;
use crate::cli::command::{
    ArgValue, CliArgs, CommandDescriptor, FlagValue, Flags, OptionSpec, Positional,
    options_to_specs, parse_usage,
};
use crate::cli::dispatch::Dispatcher;
use crate::context::CliContext;
use crate::error::CliError;

/// Layout of a subcommand's help as rendered by clap; re-segmented later by
/// [`format_command_help`](crate::cli::command::format_command_help).
pub(crate) const COMMAND_HELP_TEMPLATE: &str = "{usage}\n\n{about}\n\n{all-args}\n\n{after-help}";

/// Ids and shorts owned by the root command.
const RESERVED_IDS: &[&str] = &["help", "version"];
const RESERVED_SHORTS: &[char] = &['h'];

#[derive(Debug, Clone)]
pub struct CommandAdapter {
    descriptor: Arc<CommandDescriptor>,
    positionals: Vec<Positional>,
    options: Vec<OptionSpec>,
}

impl CommandAdapter {
    /// Validate the descriptor and derive its positionals and options.
    pub fn new(descriptor: Arc<CommandDescriptor>) -> Result<Self, CliError> {
        let positionals = parse_usage(descriptor.usage_str())?;
        check_positional_order(&descriptor, &positionals)?;
        let options = options_to_specs(&descriptor);
        check_arg_names(&descriptor, &positionals, &options)?;
        Ok(Self {
            descriptor,
            positionals,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &Arc<CommandDescriptor> {
        &self.descriptor
    }

    pub fn positionals(&self) -> &[Positional] {
        &self.positionals
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// The clap subcommand for this descriptor.
    pub fn builder(&self, bin: &str) -> clap::Command {
        let descriptor = &self.descriptor;
        let mut cmd = clap::Command::new(descriptor.name.clone())
            .override_usage(format!("{} {}", bin, descriptor.usage_str()))
            .help_template(COMMAND_HELP_TEMPLATE)
            .disable_help_flag(true)
            .disable_version_flag(true);

        if let Some(description) = &descriptor.description {
            cmd = cmd.about(description.clone());
        }
        if let Some(alias) = &descriptor.alias {
            cmd = cmd.visible_alias(alias.clone());
        }

        // clap sorts a custom heading by display order, then by name
        for (index, positional) in self.positionals.iter().enumerate() {
            cmd = cmd.arg(self.positional_arg(positional).display_order(index));
        }
        for (index, spec) in self.options.iter().enumerate() {
            cmd = cmd.arg(option_arg(spec).display_order(index));
        }

        if !descriptor.examples.is_empty() {
            let width = descriptor
                .examples
                .iter()
                .map(|example| example.cmd.chars().count())
                .max()
                .unwrap_or(0);
            let lines: Vec<String> = descriptor
                .examples
                .iter()
                .map(|example| {
                    format!(
                        "  {:<width$}  {}",
                        example.cmd,
                        example.description,
                        width = width
                    )
                })
                .collect();
            cmd = cmd.after_help(format!("Examples:\n{}", lines.join("\n")));
        }

        cmd
    }

    fn positional_arg(&self, positional: &Positional) -> Arg {
        let description = self
            .descriptor
            .arguments
            .iter()
            .find(|arg| arg.name.to_lower_camel_case() == positional.id)
            .and_then(|arg| arg.description.clone());

        let mut arg = Arg::new(positional.id.clone())
            .value_name(positional.value_name.clone())
            .required(positional.required)
            .help_heading(POSITIONALS_HEADING);
        arg = if positional.variadic {
            arg.num_args(1..).action(ArgAction::Append)
        } else {
            arg.action(ArgAction::Set)
        };
        if let Some(description) = description {
            arg = arg.help(description);
        }
        arg
    }

    /// Positional values in usage order plus the declared/injected flags.
    pub fn extract(&self, matches: &ArgMatches) -> (CliArgs, Flags) {
        let args = self
            .positionals
            .iter()
            .map(|positional| {
                if positional.variadic {
                    matches
                        .get_many::<String>(&positional.id)
                        .map(|values| ArgValue::Many(values.cloned().collect()))
                } else {
                    matches
                        .get_one::<String>(&positional.id)
                        .cloned()
                        .map(ArgValue::One)
                }
            })
            .collect();

        let mut flags = Flags::new();
        for spec in &self.options {
            if spec.takes_value() {
                if let Some(value) = matches.get_one::<String>(&spec.name) {
                    flags.insert(spec.name.clone(), FlagValue::Str(value.clone()));
                }
            } else if matches.get_flag(&spec.name) {
                flags.insert(spec.name.clone(), FlagValue::Bool(true));
            }
        }

        (args, flags)
    }

    /// Dispatcher for one invocation of this command.
    pub fn handler(&self, matches: &ArgMatches, ctx: CliContext) -> Dispatcher {
        let (args, flags) = self.extract(matches);
        Dispatcher::new(self.descriptor.clone(), args, flags, ctx)
    }
}

fn option_arg(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(spec.description.clone())
        .help_heading(spec.group);

    if let Some(alias) = &spec.alias {
        let mut chars = alias.chars();
        arg = match (chars.next(), chars.next()) {
            (Some(short), None) => arg.short(short),
            _ => arg.visible_alias(alias.clone()),
        };
    }

    if spec.takes_value() {
        arg = arg
            .action(ArgAction::Set)
            .value_name(spec.value_name.clone().unwrap_or_else(|| "value".to_string()));
        if spec.requires_arg {
            arg.num_args(1)
        } else {
            // `--all` alone yields "", which Flags turns into `true`
            arg.num_args(0..=1).default_missing_value("")
        }
    } else {
        arg.action(ArgAction::SetTrue)
    }
}

/// clap needs required positionals before optional ones and at most one
/// trailing variadic.
fn check_positional_order(
    descriptor: &CommandDescriptor,
    positionals: &[Positional],
) -> Result<(), CliError> {
    let mut seen_optional = false;
    for (index, positional) in positionals.iter().enumerate() {
        if positional.required && seen_optional {
            return Err(CliError::configuration(format!(
                "required arg \"{}\" of \"{}\" follows an optional one",
                positional.value_name,
                descriptor.usage_str()
            )));
        }
        if positional.variadic && index + 1 != positionals.len() {
            return Err(CliError::configuration(format!(
                "variadic arg \"{}\" of \"{}\" must be the last one",
                positional.value_name,
                descriptor.usage_str()
            )));
        }
        seen_optional |= !positional.required;
    }
    Ok(())
}

/// Every clap id in a command must be unique: positional ids, option names
/// and the root's own flags share one namespace.
fn check_arg_names(
    descriptor: &CommandDescriptor,
    positionals: &[Positional],
    options: &[OptionSpec],
) -> Result<(), CliError> {
    let mut ids: HashSet<&str> = RESERVED_IDS.iter().copied().collect();
    for positional in positionals {
        if !ids.insert(&positional.id) {
            return Err(CliError::configuration(format!(
                "arg \"{}\" of \"{}\" clashes with another argument",
                positional.value_name,
                descriptor.usage_str()
            )));
        }
    }

    let mut shorts: HashSet<char> = RESERVED_SHORTS.iter().copied().collect();
    for spec in options {
        let short = spec
            .alias
            .as_deref()
            .filter(|alias| alias.chars().count() == 1)
            .and_then(|alias| alias.chars().next());
        let duplicate_short = short.is_some_and(|c| !shorts.insert(c));
        if !ids.insert(&spec.name) || duplicate_short {
            return Err(CliError::configuration(format!(
                "option \"{}\" of command \"{}\" clashes with another argument",
                spec.name, descriptor.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::Report;
    use pretty_assertions::assert_eq;

    fn start() -> CommandDescriptor {
        CommandDescriptor::new("start")
            .usage("start <project> [component]")
            .description("start a workspace project")
            .argument("project", "project name")
            .option(("f", "force", "force update this component"))
            .option(("", "depth <n>", "how deep"))
            .option(("a", "all [version]", "everything"))
            .report(|_| async { Ok(Report::from("ok")) })
    }

    fn parse(adapter: &CommandAdapter, args: &[&str]) -> Result<ArgMatches, clap::Error> {
        adapter
            .builder("cmdkit")
            .try_get_matches_from(std::iter::once("start").chain(args.iter().copied()))
    }

    #[test]
    fn test_extracts_positionals_in_usage_order() {
        let adapter = CommandAdapter::new(Arc::new(start())).unwrap();
        let matches = parse(&adapter, &["web"]).unwrap();
        let (args, flags) = adapter.extract(&matches);
        assert_eq!(args, vec![Some(ArgValue::One("web".into())), None]);
        assert!(flags.is_empty());

        let matches = parse(&adapter, &["web", "api", "-f", "--depth", "3"]).unwrap();
        let (args, flags) = adapter.extract(&matches);
        assert_eq!(
            args,
            vec![
                Some(ArgValue::One("web".into())),
                Some(ArgValue::One("api".into()))
            ]
        );
        assert_eq!(flags.get("force"), Some(&FlagValue::Bool(true)));
        assert_eq!(flags.get_str("depth"), Some("3"));
    }

    #[test]
    fn test_optional_value_without_value_is_true() {
        let adapter = CommandAdapter::new(Arc::new(start())).unwrap();
        let matches = parse(&adapter, &["web", "--all"]).unwrap();
        let (_, flags) = adapter.extract(&matches);
        assert_eq!(flags.get("all"), Some(&FlagValue::Bool(true)));

        let matches = parse(&adapter, &["web", "-a", "2.0"]).unwrap();
        let (_, flags) = adapter.extract(&matches);
        assert_eq!(flags.get_str("all"), Some("2.0"));
    }

    #[test]
    fn test_log_flag_is_always_accepted() {
        let adapter = CommandAdapter::new(Arc::new(start())).unwrap();
        let matches = parse(&adapter, &["web", "--log"]).unwrap();
        let (_, flags) = adapter.extract(&matches);
        assert!(flags.log());
    }

    #[test]
    fn test_strict_parsing() {
        let adapter = CommandAdapter::new(Arc::new(start())).unwrap();
        assert!(parse(&adapter, &[]).is_err());
        assert!(parse(&adapter, &["web", "--bogus"]).is_err());
        assert!(parse(&adapter, &["web", "--depth"]).is_err());
        assert!(parse(&adapter, &["web", "--json"]).is_err());
    }

    #[test]
    fn test_variadic_positional() {
        let cmd = CommandDescriptor::new("add")
            .usage("add <target> [files...]")
            .report(|_| async { Ok(Report::from("ok")) });
        let adapter = CommandAdapter::new(Arc::new(cmd)).unwrap();
        let matches = adapter
            .builder("cmdkit")
            .try_get_matches_from(["add", "lib", "a.rs", "b.rs"])
            .unwrap();
        let (args, _) = adapter.extract(&matches);
        assert_eq!(
            args,
            vec![
                Some(ArgValue::One("lib".into())),
                Some(ArgValue::Many(vec!["a.rs".into(), "b.rs".into()]))
            ]
        );
    }

    #[test]
    fn test_invalid_usage_fails_registration() {
        let cmd = CommandDescriptor::new("start").usage("start project");
        assert!(matches!(
            CommandAdapter::new(Arc::new(cmd)),
            Err(CliError::Configuration(_))
        ));

        let cmd = CommandDescriptor::new("mv").usage("mv [from] <to>");
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());

        let cmd = CommandDescriptor::new("cp").usage("cp <from...> <to>");
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());
    }

    #[test]
    fn test_clashing_options_fail_registration() {
        let cmd = CommandDescriptor::new("x").option(("h", "hidden", "clashes with help"));
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());

        let cmd = CommandDescriptor::new("x")
            .option(("f", "force", ""))
            .option(("f", "fast", ""));
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());
    }

    #[test]
    fn test_positional_clashing_with_flags_fails_registration() {
        // `log` is injected into every command
        let cmd = CommandDescriptor::new("tail")
            .usage("tail <log>")
            .report(|_| async { Ok(Report::from("ok")) });
        assert!(matches!(
            CommandAdapter::new(Arc::new(cmd)),
            Err(CliError::Configuration(_))
        ));

        let cmd = CommandDescriptor::new("get")
            .usage("get <json>")
            .json(|_| async { Ok(serde_json::Value::Null) });
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());

        let cmd = CommandDescriptor::new("x").usage("x [help]");
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());

        let cmd = CommandDescriptor::new("x")
            .usage("x <target>")
            .option(("", "target <name>", "same id as the positional"));
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());

        let cmd = CommandDescriptor::new("cp").usage("cp <path> <path>");
        assert!(CommandAdapter::new(Arc::new(cmd)).is_err());
    }

    #[test]
    fn test_positionals_keep_usage_order_in_help() {
        let adapter = CommandAdapter::new(Arc::new(start().argument("component", "component name")))
            .unwrap();
        let help = adapter.builder("cmdkit").render_help().to_string();
        assert!(help.contains(
            "Positionals:\n  <project>    project name\n  [component]  component name\n"
        ));
        let force = help.find("--force").unwrap();
        let depth = help.find("--depth").unwrap();
        let all = help.find("--all").unwrap();
        assert!(force < depth && depth < all);
    }

    #[test]
    fn test_help_lists_sections() {
        let cmd = start().example("cmdkit start web", "start the web project");
        let adapter = CommandAdapter::new(Arc::new(cmd)).unwrap();
        let help = adapter.builder("cmdkit").render_help().to_string();
        assert!(help.starts_with("cmdkit start <project> [component]"));
        assert!(help.contains("Positionals:"));
        assert!(help.contains("project name"));
        assert!(help.contains("Options:"));
        assert!(help.contains("--force"));
        assert!(help.contains("Global:"));
        assert!(help.contains("--log"));
        assert!(help.contains("Examples:\n  cmdkit start web  start the web project"));
    }
}
