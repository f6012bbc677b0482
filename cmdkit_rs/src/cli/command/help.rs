//! Help text generation for CLI commands.
//!
//! The top-level listing is built here from the registered descriptors. A
//! single command's help starts from the parser's own rendering, which is
//! split on its section headings and reassembled in a fixed layout with
//! flags and argument names highlighted.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::options::{GLOBAL_GROUP, STANDARD_GROUP};
use super::types::{CommandDescriptor, CommandGroup};
use crate::colors::Painter;

const TITLE_INDENT: usize = 2;
const COMMAND_INDENT: usize = 4;
const NAME_WIDTH: usize = 15;

/// Heading the parser uses for positionals we tagged ourselves.
pub const POSITIONALS_HEADING: &str = "Positionals";
/// Heading the parser uses for untagged positionals.
const ARGUMENTS_HEADING: &str = "Arguments";
const EXAMPLES_HEADING: &str = "Examples";

static FLAG_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-{1,2})([\w-]+)").expect("valid flag regex"));
static POSITIONAL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {2}\S+").expect("valid positional regex"));

/// `name` padded with spaces or cut to exactly `width` characters.
pub fn right_pad(name: &str, width: usize) -> String {
    format!("{:<width$}", name, width = width)
        .chars()
        .take(width)
        .collect()
}

// ============================================================================
// Top-level help
// ============================================================================

/// Grouped listing of every command that has a description.
pub fn format_help(commands: &[Arc<CommandDescriptor>], bin: &str, painter: &Painter) -> String {
    let mut groups: Vec<(CommandGroup, Vec<(&str, &str)>)> = Vec::new();

    for command in commands {
        let Some(description) = command.description.as_deref() else {
            continue;
        };
        let entry = (command.name.as_str(), description);
        let index = match groups.iter().position(|(g, _)| *g == command.group) {
            Some(index) => index,
            None => {
                groups.push((command.group.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        let listed = &mut groups[index].1;
        match listed.iter_mut().find(|(name, _)| *name == entry.0) {
            Some(existing) => *existing = entry,
            None => listed.push(entry),
        }
    }

    let sections = groups
        .iter()
        .map(|(group, commands)| {
            let mut section = format!(
                "{}{}",
                " ".repeat(TITLE_INDENT),
                painter.title(&group.description())
            );
            for (name, description) in commands {
                section.push('\n');
                section.push_str(&format!(
                    "{}{}{}",
                    " ".repeat(COMMAND_INDENT),
                    painter.ok(&right_pad(name, NAME_WIDTH)),
                    description
                ));
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let header = painter.header(&format!(
        "usage: {} [--version] [--help] <command> [<args>]",
        bin
    ));
    let footer = painter.warn(&format!(
        "Please use '{} <command> --help' for more information and guides on specific commands.",
        bin
    ));

    format!("{}\n\n{}\n\n{}", header, sections, footer)
}

// ============================================================================
// Per-command help
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    Options,
    Global,
    Positionals,
    Examples,
}

fn marker(line: &str) -> Option<Section> {
    let heading = line.strip_suffix(':')?;
    match heading {
        h if h == STANDARD_GROUP => Some(Section::Options),
        h if h == GLOBAL_GROUP => Some(Section::Global),
        POSITIONALS_HEADING | ARGUMENTS_HEADING => Some(Section::Positionals),
        EXAMPLES_HEADING => Some(Section::Examples),
        _ => None,
    }
}

/// Re-segment and re-color the parser's help for one command.
///
/// The first non-empty line is the usage line. Following lines are bucketed
/// by the last section heading seen; lines before any heading are the
/// description.
pub fn format_command_help(raw: &str, extended: Option<&str>, painter: &Painter) -> String {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
    let usage_line = lines.next().unwrap_or_default();

    let mut description = Vec::new();
    let mut options = Vec::new();
    let mut global = Vec::new();
    let mut positionals = Vec::new();
    let mut examples = Vec::new();

    let mut section = Section::Description;
    for line in lines {
        if let Some(next) = marker(line) {
            section = next;
            continue;
        }
        let bucket = match section {
            Section::Description => &mut description,
            Section::Options => &mut options,
            Section::Global => &mut global,
            Section::Positionals => &mut positionals,
            Section::Examples => &mut examples,
        };
        bucket.push(line.to_string());
    }

    let options: Vec<String> = options
        .iter()
        .map(|line| {
            FLAG_TOKEN
                .replace_all(line, |caps: &Captures| {
                    format!("{}{}", &caps[1], painter.ok(&caps[2]))
                })
                .into_owned()
        })
        .collect();
    let positionals: Vec<String> = positionals
        .iter()
        .map(|line| {
            POSITIONAL_NAME
                .replace(line, |caps: &Captures| painter.ok(&caps[0]))
                .into_owned()
        })
        .collect();

    let mut description: Vec<String> = description.iter().map(|d| painter.header(d)).collect();
    if let Some(extended) = extended {
        description.push(extended.to_string());
    }

    let block = |heading: &str, lines: &[String]| {
        if lines.is_empty() {
            String::new()
        } else {
            format!("\n{}:\n{}\n", heading, lines.join("\n"))
        }
    };

    format!(
        "{}\n\n{}\n{}{}{}\n{}:\n{}",
        usage_line,
        description.join("\n"),
        block(ARGUMENTS_HEADING, &positionals),
        block(STANDARD_GROUP, &options),
        block(EXAMPLES_HEADING, &examples),
        GLOBAL_GROUP,
        global.join("\n")
    )
}
