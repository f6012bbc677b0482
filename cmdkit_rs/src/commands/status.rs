use serde::Serialize;
use serde_json::json;

use crate::cli::command::{CommandDescriptor, CommandGroup, CommandInput, Report};

const DEFAULT_PROJECT: &str = "workspace";

#[derive(Debug, Serialize)]
struct ProjectStatus {
    project: String,
    state: &'static str,
}

/// `status [project]`, alias `st`
pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("status")
        .alias("st")
        .usage("status [project]")
        .description("show the state of a project")
        .extended_description("Without a project name the whole workspace is reported.")
        .group(CommandGroup::General)
        .argument("project", "project name")
        .option(("", "fail", "report the project as unhealthy (exit code 2)"))
        .example("cmdkit status web --json", "status of web as JSON")
        .report(report)
        .json(json)
}

fn project_status(input: &CommandInput) -> ProjectStatus {
    ProjectStatus {
        project: input.arg(0).unwrap_or(DEFAULT_PROJECT).to_string(),
        state: "idle",
    }
}

async fn report(input: CommandInput) -> anyhow::Result<Report> {
    let status = project_status(&input);
    let message = format!("project {} is {}", status.project, status.state);
    if input.flags.is_set("fail") {
        return Ok(Report::new(2, message));
    }
    Ok(Report::from(message))
}

async fn json(input: CommandInput) -> anyhow::Result<serde_json::Value> {
    Ok(json!({ "data": project_status(&input) }))
}
