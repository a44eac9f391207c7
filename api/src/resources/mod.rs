pub mod folder;
pub mod group;
pub mod recorder;
pub mod user;

use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `Data.svc` endpoints wrap every response body in a `d` member.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DataSvcEnvelope<T> {
    pub d: T,
}

/// A page of a counted listing as returned by the `Data.svc` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Listing<T> {
    pub total_number: Option<usize>,

    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One page of records, with the server-declared total where the endpoint
/// reports one.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub total: Option<usize>,
    pub results: Vec<T>,
}

static DOTNET_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/Date\((-?\d+)\)/").expect("Date regex is well-formed"));

/// The WCF date encoding used throughout the console APIs, e.g.
/// `"/Date(1716552466000)/"`. Absent or malformed values render as empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DotNetDate(pub Option<String>);

impl DotNetDate {
    pub fn epoch_ms(&self) -> Option<i64> {
        let raw = self.0.as_deref()?;
        let captures = DOTNET_DATE.captures(raw)?;
        captures[1].parse().ok()
    }

    /// Renders as `YYYY-MM-DD HH:MM:SS` in the local time zone.
    pub fn format_local(&self) -> String {
        self.format_in(&Local)
    }

    pub fn format_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self
            .epoch_ms()
            .and_then(|ms| tz.timestamp_millis_opt(ms).single())
        {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::new(),
        }
    }
}
