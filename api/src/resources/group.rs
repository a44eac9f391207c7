use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// A user group as returned by `Api/Groups`. The listing is a bare JSON
/// array with no declared total; exhaustion is inferred from a short page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Group {
    pub id: Option<String>,
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub member_count: Option<i64>,
    pub is_private: Option<bool>,
    pub is_editable: Option<bool>,
    pub is_access_editable: Option<bool>,
    pub is_membership_viewable: Option<bool>,
    pub group_type: Option<String>,
    pub provider: Option<Provider>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Provider {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Role {
    pub id: Option<String>,
    pub name: Option<String>,
    pub system_default: Option<bool>,
    #[serde(rename = "HideFromShareDropDown")]
    pub hide_from_share_drop_down: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub sort_descending: bool,
    pub sort: String,
    pub page_size: usize,
    pub search_term: String,
    pub compute_total_count: bool,
}

impl ListQuery {
    pub fn new(page: u32, page_size: usize) -> Self {
        ListQuery {
            page,
            sort_descending: false,
            sort: "Name".to_owned(),
            page_size,
            search_term: String::new(),
            compute_total_count: true,
        }
    }
}
