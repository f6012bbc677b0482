use std::time::Duration;

use tracing::debug;

use crate::cli::command::{CommandDescriptor, CommandGroup, CommandInput, Report};

const WORK_DELAY: Duration = Duration::from_millis(200);

/// `start <project> [component]`
pub fn command() -> CommandDescriptor {
    CommandDescriptor::new("start")
        .usage("start <project> [component]")
        .description("start a workspace project")
        .group(CommandGroup::General)
        .argument("project", "project name")
        .argument("component", "component name")
        .option(("f", "force", "force update this component"))
        .option(("s", "silent", "no message output"))
        .example("cmdkit start web", "start every component of web")
        .example("cmdkit start web api --force", "force update the api component")
        .report(report)
}

async fn report(input: CommandInput) -> anyhow::Result<Report> {
    let project = input.arg(0).unwrap_or_default().to_string();
    let component = input.arg(1).map(str::to_string);

    input.loader.start("Staring...");
    debug!(
        "received args: project={} component={:?} force={} silent={}",
        project,
        component,
        input.flags.is_set("force"),
        input.flags.is_set("silent")
    );
    let data = load(&project).await;
    input.loader.succeed("Succeed...");

    Ok(Report::from(format!(
        "Final data is:\n{}",
        serde_json::to_string_pretty(&data)?
    )))
}

async fn load(_project: &str) -> String {
    tokio::time::sleep(WORK_DELAY).await;
    "Final Data".to_string()
}
