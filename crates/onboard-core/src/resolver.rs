use crate::age::TimeInfo;
use crate::rules::default_rules;
use crate::types::ActionKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActionInfo (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    pub label: String,
    pub action: ActionKind,
    /// Set for month-11 warnings only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_in_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_in_week: Option<u32>,
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A fn-pointer milestone rule.
pub struct Rule {
    pub id: &'static str,
    pub condition: fn(&TimeInfo) -> bool,
    pub action: ActionKind,
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

pub struct Resolver {
    rules: Vec<Rule>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Resolver {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// First matching rule wins; `None` when the issue is too young for any
    /// milestone.
    pub fn resolve(&self, time: &TimeInfo) -> Option<ActionInfo> {
        self.matching_rule(time).map(|rule| {
            let (week_in_month, day_in_week) = if rule.action.is_recurring() {
                (Some(time.week_in_month()), Some(time.day_in_week()))
            } else {
                (None, None)
            };
            ActionInfo {
                label: rule.label.to_string(),
                action: rule.action,
                week_in_month,
                day_in_week,
            }
        })
    }

    /// Id of the rule that fired, for logging and `onboard resolve`.
    pub fn rule_id(&self, time: &TimeInfo) -> Option<&'static str> {
        self.matching_rule(time).map(|rule| rule.id)
    }

    fn matching_rule(&self, time: &TimeInfo) -> Option<&Rule> {
        self.rules.iter().find(|rule| (rule.condition)(time))
    }
}

/// Resolve with the default milestone ladder.
pub fn resolve(time: &TimeInfo) -> Option<ActionInfo> {
    Resolver::default().resolve(time)
}
