use panopto_client::{
    resources::user::{self, Role},
    Client, User,
};
use serde_json::{Map, Value};
use std::{path::PathBuf, sync::Arc};

use super::{drain_pages, fetch_progress, CancelToken, EntityArgs, Statistics};
use crate::{chunks::CsvChunkWriter, csv::Cell, errors::ExportError};

const HEADERS: &[&str] = &[
    "user_key",
    "user_id",
    "full_name",
    "email",
    "affiliation_name",
    "is_internal",
    "date_added",
    "last_login",
    "system_role",
    "creator_roles",
    "viewer_roles",
    "roles",
];

pub fn run(
    client: &Client,
    args: &EntityArgs,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    let statistics = Arc::new(Statistics::new());
    let _progress = fetch_progress(&statistics, "users", args.no_progress);
    let mut writer = CsvChunkWriter::new("users", HEADERS, &args.out_dir, args.chunk_size)?;
    let page_size = args.page_size.unwrap_or(user::DEFAULT_PAGE_SIZE);
    drain_pages(client.users_iter(page_size), &statistics, cancel, |user| {
        writer.push_row(to_row(&user))
    })?;
    writer.finish()
}

fn to_row(user: &User) -> Vec<Cell> {
    vec![
        Cell::or_blank(user.user_key.clone()),
        Cell::or_blank(user.id.clone()),
        Cell::or_blank(user.full_name.clone()),
        Cell::or_blank(user.email.clone()),
        Cell::or_blank(user.affiliation_name.clone()),
        Cell::Bool(user.is_internal.unwrap_or(false)),
        Cell::Text(user.date_added.format_local()),
        Cell::Text(user.last_login.format_local()),
        Cell::or_blank(user.system_role.clone()),
        Cell::or_blank(user.creator_roles.clone()),
        Cell::or_blank(user.viewer_roles.clone()),
        roles_json(&user.roles),
    ]
}

// Role objects always carry `id` and `name`; the two flags are only written
// when set, mirroring the shape consumers of these exports already parse.
fn roles_json(roles: &[Role]) -> Cell {
    let items: Vec<Value> = roles
        .iter()
        .map(|role| {
            let mut item = Map::new();
            item.insert(
                "id".to_owned(),
                Value::String(role.id.clone().unwrap_or_default()),
            );
            item.insert(
                "name".to_owned(),
                Value::String(role.name.clone().unwrap_or_default()),
            );
            if role.hide_from_share_drop_down == Some(true) {
                item.insert("hide_from_share_dropdown".to_owned(), Value::Bool(true));
            }
            if role.system_default == Some(true) {
                item.insert("system_default".to_owned(), Value::Bool(true));
            }
            Value::Object(item)
        })
        .collect();
    Cell::json(&items)
}
