use serde::{Deserialize, Serialize};

use crate::resources::DotNetDate;

pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// A user as returned by `Data.svc/GetUsers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub user_key: Option<String>,
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub affiliation_name: Option<String>,
    pub is_internal: Option<bool>,
    pub date_added: DotNetDate,
    pub last_login: DotNetDate,
    pub system_role: Option<String>,
    pub creator_roles: Option<String>,
    pub viewer_roles: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Role {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "HideFromShareDropDown")]
    pub hide_from_share_drop_down: Option<bool>,
    pub system_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRequest {
    #[serde(rename = "queryParameters")]
    pub query_parameters: QueryParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub end_date: Option<String>,
    pub max_results: usize,
    pub page: u32,
    pub query: Option<String>,
    pub role: Option<String>,
    pub role_ids: Option<Vec<String>>,
    pub sort_ascending: bool,
    pub sort_column: i32,
    pub start_date: Option<String>,
}

impl ListRequest {
    pub fn new(page: u32, max_results: usize) -> Self {
        ListRequest {
            query_parameters: QueryParameters {
                end_date: None,
                max_results,
                page,
                query: None,
                role: None,
                role_ids: None,
                sort_ascending: true,
                sort_column: 0,
                start_date: None,
            },
        }
    }
}
