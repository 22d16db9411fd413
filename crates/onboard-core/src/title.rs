use crate::error::{OnboardError, Result};
use regex::Regex;

/// Extracts project names from `<prefix> <project name>` issue titles.
#[derive(Debug, Clone)]
pub struct TitleParser {
    prefix: String,
    pattern: Regex,
}

impl TitleParser {
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"^{}\s*(.+)$", regex::escape(prefix)))
            .map_err(|e| OnboardError::Config(format!("bad title prefix '{prefix}': {e}")))?;
        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    /// Project name from `title`, trimmed; `None` if the title does not
    /// follow the format or names nothing.
    pub fn project_name<'t>(&self, title: &'t str) -> Option<&'t str> {
        let name = self.pattern.captures(title)?.get(1)?.as_str().trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn parse<'t>(&self, title: &'t str) -> Result<&'t str> {
        self.project_name(title)
            .ok_or_else(|| OnboardError::InvalidTitle(title.to_string()))
    }

    /// The canonical title for `project`.
    pub fn format(&self, project: &str) -> String {
        format!("{} {}", self.prefix, project)
    }
}
