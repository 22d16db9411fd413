use super::{describe_age, AgeArgs};
use crate::output::print_json;
use onboard_core::compose::compose_comment;
use onboard_core::resolver::resolve;

pub fn run(project: &str, age: &AgeArgs, json: bool) -> anyhow::Result<()> {
    let time = age.time()?;
    let action = resolve(&time);
    let comment = action
        .as_ref()
        .map(|action| compose_comment(&time, action, project));

    if json {
        return print_json(&serde_json::json!({
            "project": project,
            "time": time,
            "action": action,
            "comment": comment,
        }));
    }

    match comment {
        Some(comment) => println!("{comment}"),
        None => println!(
            "No escalation for {project} at {}: no milestone reached yet.",
            describe_age(&time)
        ),
    }
    Ok(())
}
