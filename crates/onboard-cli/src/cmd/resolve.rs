use super::{describe_age, AgeArgs};
use crate::output::print_json;
use onboard_core::resolver::Resolver;

pub fn run(age: &AgeArgs, json: bool) -> anyhow::Result<()> {
    let time = age.time()?;
    let resolver = Resolver::default();
    let action = resolver.resolve(&time);

    if json {
        return print_json(&serde_json::json!({
            "time": time,
            "rule": resolver.rule_id(&time),
            "action": action,
        }));
    }

    println!("Age:    {}", describe_age(&time));
    match action {
        Some(action) => {
            println!("Action: {}", action.action);
            println!("Label:  {}", action.label);
            if let (Some(week), Some(day)) = (action.week_in_month, action.day_in_week) {
                println!("Window: week {week}, day {day}");
            }
        }
        None => println!("Action: none (no milestone reached yet)"),
    }
    Ok(())
}
