use serde::{Deserialize, Serialize};
use serde_json::Value;

// Number of folders requested per page by the admin console's own listing.
pub const DEFAULT_PAGE_SIZE: usize = 2000;

/// A folder as returned by `Data.svc/GetFolders`. The shape is owned by the
/// server; every field is optional so that schema drift degrades to empty
/// cells instead of a deserialisation failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Folder {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub folder_type: Option<i64>,
    pub parent_folder_id: Option<String>,
    pub parent_folder_name: Option<String>,
    pub can_create_folders: Option<bool>,
    pub can_create_sessions: Option<bool>,
    pub can_download: Option<bool>,
    pub department_id: Option<String>,
    pub is_creator: Option<bool>,
    pub is_dropbox: Option<bool>,
    pub session_count: Option<i64>,
    pub user_can_move_session_destination: Option<bool>,
    pub podcast_enabled: Option<bool>,
    pub affiliation_name: Option<String>,
    pub presenters: Option<Vec<Presenter>>,
    #[serde(rename = "Abstract")]
    pub abstract_text: Option<String>,
    /// Loosely-typed context entries; the server tags each with a `__type`
    /// discriminator that is stripped before export.
    pub context: Option<Vec<Value>>,
    pub deliveries_specified_order: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Presenter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRequest {
    #[serde(rename = "queryParameters")]
    pub query_parameters: QueryParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    #[serde(rename = "IncludeDeliveryCounts")]
    pub include_delivery_counts: bool,
    #[serde(rename = "IncludePresenters")]
    pub include_presenters: bool,
    pub end_date: Option<String>,
    pub include_sandboxes: bool,
    pub max_results: usize,
    pub page: u32,
    pub query: Option<String>,
    pub sort_ascending: bool,
    pub sort_column: i32,
    pub start_date: Option<String>,
}

impl ListRequest {
    pub fn new(page: u32, max_results: usize) -> Self {
        ListRequest {
            query_parameters: QueryParameters {
                include_delivery_counts: true,
                include_presenters: true,
                end_date: None,
                include_sandboxes: true,
                max_results,
                page,
                query: None,
                sort_ascending: true,
                sort_column: 0,
                start_date: None,
            },
        }
    }
}
