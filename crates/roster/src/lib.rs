//! Staff roster: who works at the zoo (and who gets blamed when an animal dies).
//!
//! The roster is an injected capability. The simulation never depends on it;
//! a failed fetch degrades to an empty roster.

pub mod http;

pub use http::HttpRoster;

use serde::{Deserialize, Serialize};

/// Errors from fetching a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("roster source unavailable: {0}")]
    Unavailable(String),
}

/// One staff member, as served by the roster endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar: String,
}

/// Ordered list of employees. Empty when nobody could be hired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(rename = "data")]
    employees: Vec<Employee>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    /// Parse the `{ "data": [ ... ] }` payload. Extra top-level fields
    /// (paging info and the like) are ignored.
    pub fn from_payload(json: &str) -> Result<Self, RosterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// The first employee on the roster, blamed for every death.
    pub fn scapegoat(&self) -> Option<&Employee> {
        self.employees.first()
    }
}

/// Anything that can provide a roster.
pub trait RosterSource {
    fn fetch(&self) -> Result<Roster, RosterError>;
}

/// A roster known up front. Used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster(pub Roster);

impl RosterSource for StaticRoster {
    fn fetch(&self) -> Result<Roster, RosterError> {
        Ok(self.0.clone())
    }
}

/// Fetch from `source`, falling back to an empty roster on any failure.
pub fn fetch_or_default(source: &dyn RosterSource) -> Roster {
    match source.fetch() {
        Ok(roster) => {
            tracing::info!(employees = roster.len(), "roster fetched");
            roster
        }
        Err(e) => {
            tracing::warn!(error = %e, "roster fetch failed; continuing without staff");
            Roster::default()
        }
    }
}
