use std::time::Duration;

use crate::{Roster, RosterError, RosterSource};

/// Roster served over HTTP as `{ "data": [employee, ...] }`.
#[derive(Debug, Clone)]
pub struct HttpRoster {
    url: String,
    timeout: Duration,
}

impl HttpRoster {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RosterSource for HttpRoster {
    fn fetch(&self) -> Result<Roster, RosterError> {
        let _span = tracing::debug_span!("roster_fetch", url = %self.url).entered();
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&self.url).send()?.error_for_status()?;
        let roster: Roster = response.json()?;
        tracing::debug!(employees = roster.len(), "roster received");
        Ok(roster)
    }
}
