use chrono::NaiveDate;

use crate::foundation::error::{HeatwallError, HeatwallResult};

/// Number of rows in the calendar grid (Sunday..=Saturday).
pub const DAYS_PER_WEEK: usize = 7;

/// One fetched contribution calendar, oldest week first.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalendarData {
    pub total_contributions: u32,
    pub weeks: Vec<Week>,
}

/// A grid column. Day order is positional: index 0 is Sunday.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Week {
    pub days: Vec<Day>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub contribution_count: u32,
    /// Upstream colour hint. The renderer recomputes colour from the count.
    pub color: Option<String>,
}

impl Day {
    pub fn new(date: NaiveDate, contribution_count: u32) -> Self {
        Self {
            date,
            contribution_count,
            color: None,
        }
    }
}

impl CalendarData {
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Check the grid shape the renderer indexes positionally.
    pub fn validate(&self) -> HeatwallResult<()> {
        if self.weeks.is_empty() {
            return Err(HeatwallError::render_precondition(
                "calendar must contain at least one week",
            ));
        }
        for (idx, week) in self.weeks.iter().enumerate() {
            if week.days.len() != DAYS_PER_WEEK {
                return Err(HeatwallError::render_precondition(format!(
                    "week {idx} has {} days, expected {DAYS_PER_WEEK}",
                    week.days.len()
                )));
            }
        }
        Ok(())
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    /// Largest single-day count, used in the cycle summary.
    pub fn busiest_day(&self) -> Option<&Day> {
        self.days()
            .filter(|d| d.contribution_count > 0)
            .max_by_key(|d| d.contribution_count)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/calendar/model.rs"]
mod tests;
