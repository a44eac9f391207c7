use panopto_client::{
    resources::group::{self, Role},
    Client, Group,
};
use serde_json::{json, Value};
use std::{path::PathBuf, sync::Arc};

use super::{drain_pages, fetch_progress, CancelToken, EntityArgs, Statistics};
use crate::{chunks::CsvChunkWriter, csv::Cell, errors::ExportError};

// Group listings can run into the hundreds of thousands, so the export is
// chunked by default.
const DEFAULT_CHUNK_SIZE: usize = 20_000;

const HEADERS: &[&str] = &[
    "group_id",
    "name",
    "external_id",
    "member_count",
    "is_private",
    "is_editable",
    "is_access_editable",
    "is_membership_viewable",
    "group_type",
    "provider_name",
    "provider_description",
    "roles",
];

pub fn run(
    client: &Client,
    args: &EntityArgs,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    let statistics = Arc::new(Statistics::new());
    let _progress = fetch_progress(&statistics, "groups", args.no_progress);
    let capacity = Some(args.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE));
    let mut writer = CsvChunkWriter::new("groups", HEADERS, &args.out_dir, capacity)?;
    let page_size = args.page_size.unwrap_or(group::DEFAULT_PAGE_SIZE);
    drain_pages(
        client.groups_iter(page_size),
        &statistics,
        cancel,
        |group| writer.push_row(to_row(&group)),
    )?;
    writer.finish()
}

fn to_row(group: &Group) -> Vec<Cell> {
    let provider = group.provider.clone().unwrap_or_default();
    vec![
        Cell::or_blank(group.id.clone()),
        Cell::or_blank(group.name.clone()),
        Cell::or_blank(group.external_id.clone()),
        or_blank_int(group.member_count),
        or_blank_bool(group.is_private),
        or_blank_bool(group.is_editable),
        or_blank_bool(group.is_access_editable),
        or_blank_bool(group.is_membership_viewable),
        Cell::or_blank(group.group_type.clone()),
        Cell::or_blank(provider.name),
        Cell::or_blank(provider.description),
        roles_json(&group.roles),
    ]
}

// Numeric and boolean columns fall back to a quoted empty string when the
// field is absent, unlike the bare empty cells of the other exports.
fn or_blank_int(value: Option<i64>) -> Cell {
    match value {
        Some(value) => Cell::Int(value),
        None => Cell::Text(String::new()),
    }
}

fn or_blank_bool(value: Option<bool>) -> Cell {
    match value {
        Some(value) => Cell::Bool(value),
        None => Cell::Text(String::new()),
    }
}

fn roles_json(roles: &[Role]) -> Cell {
    let items: Vec<Value> = roles
        .iter()
        .map(|role| {
            json!({
                "id": role.id.clone().unwrap_or_default(),
                "name": role.name.clone().unwrap_or_default(),
                "system_default": json_or_blank(role.system_default),
                "hide_from_share_dropdown": json_or_blank(role.hide_from_share_drop_down),
            })
        })
        .collect();
    Cell::json(&items)
}

fn json_or_blank(value: Option<bool>) -> Value {
    match value {
        Some(value) => Value::Bool(value),
        None => Value::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::to_csv;
    use pretty_assertions::assert_eq;

    fn group_from(value: Value) -> Group {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn a_full_record_maps_to_the_documented_columns() {
        let group = group_from(json!({
            "Id": "g-1",
            "Name": "comp0001-students",
            "ExternalId": "ldap:comp0001",
            "MemberCount": 250,
            "IsPrivate": true,
            "IsEditable": false,
            "IsAccessEditable": true,
            "IsMembershipViewable": false,
            "GroupType": "External",
            "Provider": {"Name": "LDAP", "Description": "Campus directory"},
            "Roles": [{
                "Id": "role-1",
                "Name": "Viewer",
                "SystemDefault": true,
                "HideFromShareDropDown": false
            }]
        }));
        let csv = to_csv(HEADERS, &[to_row(&group)]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(
            row,
            "\"g-1\",\"comp0001-students\",\"ldap:comp0001\",250,true,false,true,false,\
             \"External\",\"LDAP\",\"Campus directory\",\
             \"[{\"\"id\"\":\"\"role-1\"\",\"\"name\"\":\"\"Viewer\"\",\
             \"\"system_default\"\":true,\"\"hide_from_share_dropdown\"\":false}]\""
        );
    }

    #[test]
    fn an_empty_record_renders_quoted_blanks_throughout() {
        let group = group_from(json!({}));
        let csv = to_csv(HEADERS, &[to_row(&group)]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert!(!row.contains("null"));
        assert_eq!(
            row,
            "\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"[]\""
        );
    }

    #[test]
    fn role_fields_fall_back_to_blank_strings_inside_the_json() {
        let cell = roles_json(&[Role::default()]);
        assert_eq!(
            cell,
            Cell::Text(
                "[{\"id\":\"\",\"name\":\"\",\"system_default\":\"\",\
                 \"hide_from_share_dropdown\":\"\"}]"
                    .to_owned()
            )
        );
    }
}
