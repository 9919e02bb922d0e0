//! GitHub GraphQL contribution calendar fetcher.

use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

use crate::{
    calendar::model::{CalendarData, DAYS_PER_WEEK, Day, Week},
    foundation::error::FetchError,
};

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
    user(login: $username) {
        contributionsCollection(from: $from, to: $to) {
            contributionCalendar {
                totalContributions
                weeks {
                    contributionDays {
                        date
                        contributionCount
                        color
                    }
                }
            }
        }
    }
}
"#;

/// Anything that can produce a fresh calendar for one update cycle.
pub trait ContributionSource {
    fn fetch(&mut self) -> Result<CalendarData, FetchError>;
}

#[derive(Clone, Debug)]
pub struct FetchOpts {
    pub endpoint: String,
    pub username: String,
    pub token: String,
    pub window_days: u32,
    pub timeout: Duration,
}

impl FetchOpts {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: username.into(),
            token: token.into(),
            window_days: 365,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking fetcher backed by a single `reqwest` client.
pub struct GithubFetcher {
    opts: FetchOpts,
    client: reqwest::blocking::Client,
}

impl GithubFetcher {
    pub fn new(opts: FetchOpts) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.timeout)
            .user_agent(concat!("heatwall/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("build http client: {e}")))?;
        Ok(Self { opts, client })
    }

    pub fn opts(&self) -> &FetchOpts {
        &self.opts
    }

    #[tracing::instrument(skip(self), fields(user = %self.opts.username))]
    pub fn fetch_at(&self, now: DateTime<Utc>) -> Result<CalendarData, FetchError> {
        let body = request_body(&self.opts.username, now, self.opts.window_days);

        let resp = self
            .client
            .post(&self.opts.endpoint)
            .bearer_auth(&self.opts.token)
            .json(&body)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| FetchError::Transport(format!("read response body: {e}")))?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text.trim().to_string(),
            });
        }

        let calendar = parse_response(&text, &self.opts.username)?;
        tracing::info!(
            total = calendar.total_contributions,
            weeks = calendar.week_count(),
            "fetched contribution calendar"
        );
        Ok(calendar)
    }
}

impl ContributionSource for GithubFetcher {
    fn fetch(&mut self) -> Result<CalendarData, FetchError> {
        self.fetch_at(Utc::now())
    }
}

/// GraphQL request payload for the trailing `window_days` ending at `now`.
pub fn request_body(username: &str, now: DateTime<Utc>, window_days: u32) -> serde_json::Value {
    let from = now - chrono::Duration::days(i64::from(window_days));
    serde_json::json!({
        "query": CONTRIBUTIONS_QUERY,
        "variables": {
            "username": username,
            "from": from.to_rfc3339_opts(SecondsFormat::Secs, true),
            "to": now.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    })
}

#[derive(serde::Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(serde::Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(serde::Deserialize)]
struct ResponseData {
    user: Option<UserNode>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: ContributionsCollection,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: WireCalendar,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCalendar {
    total_contributions: u32,
    weeks: Vec<WireWeek>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWeek {
    contribution_days: Vec<WireDay>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDay {
    date: NaiveDate,
    contribution_count: u32,
    color: Option<String>,
}

/// Decode a GraphQL response body into a calendar of full 7-day weeks.
pub fn parse_response(body: &str, username: &str) -> Result<CalendarData, FetchError> {
    let resp: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Shape(e.to_string()))?;

    if let Some(errors) = resp.errors
        && !errors.is_empty()
    {
        return Err(FetchError::Query(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    let data = resp
        .data
        .ok_or_else(|| FetchError::Shape("response has neither data nor errors".to_string()))?;
    let user = data
        .user
        .ok_or_else(|| FetchError::UserNotFound(username.to_string()))?;
    let wire = user.contributions_collection.contribution_calendar;

    let mut weeks = Vec::with_capacity(wire.weeks.len());
    for w in wire.weeks {
        if let Some(week) = normalize_week(w.contribution_days)? {
            weeks.push(week);
        }
    }

    Ok(CalendarData {
        total_contributions: wire.total_contributions,
        weeks,
    })
}

// GitHub trims the first and last week to the queried window. Place every day at its
// weekday row and pad the gaps with empty days so each column has exactly seven cells.
fn normalize_week(days: Vec<WireDay>) -> Result<Option<Week>, FetchError> {
    let Some(first) = days.first() else {
        return Ok(None);
    };
    let row_of = |d: NaiveDate| d.weekday().num_days_from_sunday() as i64;
    let sunday = first.date - chrono::Duration::days(row_of(first.date));

    let mut slots: Vec<Option<Day>> = vec![None; DAYS_PER_WEEK];
    for d in days {
        let offset = (d.date - sunday).num_days();
        if !(0..DAYS_PER_WEEK as i64).contains(&offset) {
            return Err(FetchError::Shape(format!(
                "day {} does not belong to the week of {sunday}",
                d.date
            )));
        }
        let slot = &mut slots[offset as usize];
        if slot.is_some() {
            return Err(FetchError::Shape(format!("day {} appears twice", d.date)));
        }
        *slot = Some(Day {
            date: d.date,
            contribution_count: d.contribution_count,
            color: d.color,
        });
    }

    let days = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.unwrap_or_else(|| Day::new(sunday + chrono::Duration::days(i as i64), 0))
        })
        .collect();
    Ok(Some(Week { days }))
}

#[cfg(test)]
#[path = "../../tests/unit/calendar/fetch.rs"]
mod tests;
