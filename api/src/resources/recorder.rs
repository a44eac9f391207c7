use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::resources::DotNetDate;

pub const DEFAULT_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Id(pub String);

impl Display for Id {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.0)
    }
}

/// A remote recorder as returned by `Data.svc/GetRemoteRecorders`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RemoteRecorder {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub affiliation_name: Option<String>,
    pub available: Option<bool>,
    pub machine_ip: Option<String>,
    pub private_id: Option<String>,
    pub state: Option<i64>,
    pub version: Option<String>,
    pub audio_thumbnail: Option<Thumbnail>,
    pub video_thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Thumbnail {
    pub src: Option<String>,
    pub is_silent: Option<bool>,
    pub missing_data: Option<bool>,
    pub status: Option<i64>,
    pub timestamp: Option<String>,
}

/// The full device/config object returned by `Api/RemoteRecorders/<id>`,
/// fetched once per recorder after pagination completes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RemoteRecorderDetail {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub state: Option<String>,
    pub created_date: DotNetDate,
    pub last_heartbeat: DotNetDate,
    #[serde(rename = "RemoteRecorderDevices")]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Device {
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub device_type: Option<String>,
    pub is_capturing: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRequest {
    #[serde(rename = "queryParameters")]
    pub query_parameters: QueryParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub query: Option<String>,
    pub sort_column: i32,
    pub sort_ascending: bool,
    pub max_results: usize,
    pub page: u32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub state: Option<String>,
}

impl ListRequest {
    pub fn new(page: u32, max_results: usize) -> Self {
        ListRequest {
            query_parameters: QueryParameters {
                query: None,
                sort_column: 1,
                sort_ascending: true,
                max_results,
                page,
                start_date: None,
                end_date: None,
                state: None,
            },
        }
    }
}
