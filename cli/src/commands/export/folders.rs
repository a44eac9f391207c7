use panopto_client::{resources::folder, Client, Folder};
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};

use super::{drain_pages, fetch_progress, CancelToken, EntityArgs, Statistics};
use crate::{chunks::CsvChunkWriter, csv::Cell, errors::ExportError};

const HEADERS: &[&str] = &[
    "folder_id",
    "folder_name",
    "folder_type",
    "parent_folder_id",
    "parent_folder_name",
    "can_create_folders",
    "can_create_sessions",
    "can_download",
    "department_id",
    "is_creator",
    "is_dropbox",
    "session_count",
    "user_can_move_session_destination",
    "podcast_enabled",
    "affiliation_name",
    "presenters",
    "abstract",
    "context",
    "deliveries_specified_order",
];

pub fn run(
    client: &Client,
    args: &EntityArgs,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    let statistics = Arc::new(Statistics::new());
    let _progress = fetch_progress(&statistics, "folders", args.no_progress);
    let mut writer = CsvChunkWriter::new("folders", HEADERS, &args.out_dir, args.chunk_size)?;
    let page_size = args.page_size.unwrap_or(folder::DEFAULT_PAGE_SIZE);
    drain_pages(
        client.folders_iter(page_size),
        &statistics,
        cancel,
        |folder| writer.push_row(to_row(&folder)),
    )?;
    writer.finish()
}

fn to_row(folder: &Folder) -> Vec<Cell> {
    vec![
        Cell::or_blank(folder.id.clone()),
        Cell::or_blank(folder.name.clone()),
        Cell::opt(folder.folder_type),
        Cell::or_blank(folder.parent_folder_id.clone()),
        Cell::or_blank(folder.parent_folder_name.clone()),
        Cell::opt(folder.can_create_folders),
        Cell::opt(folder.can_create_sessions),
        Cell::opt(folder.can_download),
        Cell::or_blank(folder.department_id.clone()),
        Cell::opt(folder.is_creator),
        Cell::opt(folder.is_dropbox),
        Cell::opt(folder.session_count),
        Cell::opt(folder.user_can_move_session_destination),
        Cell::opt(folder.podcast_enabled),
        Cell::or_blank(folder.affiliation_name.clone()),
        Cell::json(&folder.presenters.clone().unwrap_or_default()),
        Cell::or_blank(folder.abstract_text.clone()),
        context_json(folder.context.as_deref().unwrap_or_default()),
        Cell::opt(folder.deliveries_specified_order),
    ]
}

// Context entries carry a `__type` service discriminator that the export
// strips; everything else passes through untouched.
fn context_json(context: &[Value]) -> Cell {
    let stripped: Vec<Value> = context
        .iter()
        .cloned()
        .map(|mut item| {
            if let Some(object) = item.as_object_mut() {
                // remove() swap-removes under preserve_order; shift_remove
                // keeps the remaining keys in their original order.
                object.shift_remove("__type");
            }
            item
        })
        .collect();
    Cell::json(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::to_csv;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn folder_from(value: Value) -> Folder {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn a_full_record_maps_to_the_documented_columns() {
        let folder = folder_from(json!({
            "ID": "f-1",
            "Name": "All Sessions",
            "FolderType": 0,
            "ParentFolderId": "f-0",
            "ParentFolderName": "Root",
            "CanCreateFolders": true,
            "CanCreateSessions": false,
            "CanDownload": true,
            "DepartmentId": "d-9",
            "IsCreator": true,
            "IsDropbox": false,
            "SessionCount": 17,
            "UserCanMoveSessionDestination": true,
            "PodcastEnabled": false,
            "AffiliationName": "main",
            "Presenters": [{"FullName": "Ada Lovelace", "UserKey": "main\\ada"}],
            "Abstract": "Weekly \"lab\" sessions",
            "Context": [{"__type": "FolderContext:#Panopto", "Kind": "course", "Code": "COMP0001"}],
            "DeliveriesSpecifiedOrder": false
        }));
        let csv = to_csv(HEADERS, &[to_row(&folder)]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(
            row,
            "\"f-1\",\"All Sessions\",0,\"f-0\",\"Root\",true,false,true,\"d-9\",true,false,17,\
             true,false,\"main\",\
             \"[{\"\"FullName\"\":\"\"Ada Lovelace\"\",\"\"UserKey\"\":\"\"main\\\\ada\"\"}]\",\
             \"Weekly \"\"lab\"\" sessions\",\
             \"[{\"\"Kind\"\":\"\"course\"\",\"\"Code\"\":\"\"COMP0001\"\"}]\",false"
        );
    }

    #[test]
    fn an_empty_record_degrades_to_empty_cells_not_null() {
        let folder = folder_from(json!({}));
        let csv = to_csv(HEADERS, &[to_row(&folder)]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert!(!row.contains("null"));
        // String-guarded columns stay quoted-empty, bare columns stay bare.
        assert_eq!(row, "\"\",\"\",,\"\",\"\",,,,\"\",,,,,,\"\",\"[]\",\"\",\"[]\",");
    }

    #[test]
    fn the_type_discriminator_is_stripped_from_context_items() {
        let cell = context_json(&[json!({"__type": "X", "Kind": "course"})]);
        assert_eq!(cell, Cell::Text("[{\"Kind\":\"course\"}]".to_owned()));
    }
}
