use console::{style, StyledObject};

use crate::build::BuildStatus;

pub const DEFAULT_RECENT_EVENTS: usize = 8;

/// Styling choices for one dashboard, passed explicitly into every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub colors: bool,
    /// How many of the newest events the dashboard lists
    pub recent_events: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: true,
            recent_events: DEFAULT_RECENT_EVENTS,
        }
    }
}

impl Theme {
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            colors: false,
            ..Self::default()
        }
    }

    fn styled(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        style(text.to_string()).force_styling(self.colors)
    }

    pub fn bright_yellow(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        self.styled(text).bright().yellow()
    }

    pub fn bright_green(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        self.styled(text).bright().green()
    }

    pub fn bright_red(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        self.styled(text).bright().red()
    }

    pub fn cyan_bold(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        self.styled(text).cyan().bold()
    }

    pub fn dim(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        self.styled(text).dim()
    }

    pub fn bright(&self, text: impl std::fmt::Display) -> StyledObject<String> {
        self.styled(text).bright()
    }

    /// Overall build status, colored by outcome.
    pub fn status(&self, status: BuildStatus) -> StyledObject<String> {
        match status {
            BuildStatus::Succeeded => self.bright_green(status).bold(),
            BuildStatus::InProgress => self.bright_yellow(status).bold(),
            BuildStatus::Unknown => self.dim(status),
            _ => self.bright_red(status).bold(),
        }
    }
}

pub fn status_emoji(status: BuildStatus) -> &'static str {
    match status {
        BuildStatus::InProgress => "🟡",
        BuildStatus::Succeeded => "🟢",
        BuildStatus::Stopped => "🟠",
        BuildStatus::Failed | BuildStatus::Fault | BuildStatus::TimedOut => "🔴",
        BuildStatus::Unknown => "⚪",
    }
}
