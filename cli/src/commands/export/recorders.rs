use panopto_client::{
    resources::recorder::{self, Device, Thumbnail},
    Client, Error as ClientError, RecorderId, RemoteRecorder, RemoteRecorderDetail,
};
use std::{path::PathBuf, sync::Arc};

use super::{drain_pages, fetch_progress, CancelToken, EntityArgs, Statistics};
use crate::{
    chunks::CsvChunkWriter,
    csv::Cell,
    errors::ExportError,
    progress::{Progress, ProgressMessage},
    thousands::Thousands,
};

const HEADERS: &[&str] = &[
    "ID",
    "Name",
    "AffiliationName",
    "Available",
    "MachineIp",
    "PrivateId",
    "State",
    "Version",
    "AudioThumbnail_Src",
    "AudioThumbnail_IsSilent",
    "AudioThumbnail_MissingData",
    "AudioThumbnail_Status",
    "AudioThumbnail_Timestamp",
    "VideoThumbnail_Src",
    "VideoThumbnail_IsSilent",
    "VideoThumbnail_MissingData",
    "VideoThumbnail_Status",
    "VideoThumbnail_Timestamp",
    "Detail_State",
    "CreatedDate",
    "LastHeartbeat",
    "Device1_Name",
    "Device1_Type",
    "Device1_IsCapturing",
    "Device2_Name",
    "Device2_Type",
    "Device2_IsCapturing",
];

pub fn run(
    client: &Client,
    args: &EntityArgs,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    let statistics = Arc::new(Statistics::new());
    let page_size = args.page_size.unwrap_or(recorder::DEFAULT_PAGE_SIZE);

    // Phase one: collect every recorder from the paginated listing.
    let mut records = Vec::new();
    {
        let _progress = fetch_progress(&statistics, "remote recorders", args.no_progress);
        drain_pages(
            client.remote_recorders_iter(page_size),
            &statistics,
            cancel,
            |recorder| {
                records.push(recorder);
                Ok(())
            },
        )?;
    }

    // Phase two: one detail fetch per recorder. Any failure aborts the run.
    let mut writer =
        CsvChunkWriter::new("remote_recorders", HEADERS, &args.out_dir, args.chunk_size)?;
    {
        let _progress = enrich_progress(&statistics, records.len(), args.no_progress);
        enrich_and_write(&records, &mut writer, &statistics, cancel, |id| {
            client.get_remote_recorder(id)
        })?;
    }
    writer.finish()
}

fn enrich_and_write(
    records: &[RemoteRecorder],
    writer: &mut CsvChunkWriter,
    statistics: &Statistics,
    cancel: &CancelToken,
    fetch_detail: impl Fn(&RecorderId) -> Result<RemoteRecorderDetail, ClientError>,
) -> Result<(), ExportError> {
    for record in records {
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        let detail = match &record.id {
            Some(id) => fetch_detail(&RecorderId(id.clone()))?,
            None => RemoteRecorderDetail::default(),
        };
        writer.push_row(to_row(record, &detail))?;
        statistics.add_enriched(1);
    }
    Ok(())
}

fn enrich_progress(
    statistics: &Arc<Statistics>,
    num_records: usize,
    no_progress: bool,
) -> Option<Progress> {
    if no_progress {
        return None;
    }
    Some(Progress::new(
        move |statistics: &Statistics| -> ProgressMessage {
            let enriched = statistics.num_enriched() as u64;
            (
                enriched,
                format!("{} recorder details", Thousands(enriched)),
            )
        },
        statistics,
        Some(num_records as u64),
    ))
}

fn to_row(recorder: &RemoteRecorder, detail: &RemoteRecorderDetail) -> Vec<Cell> {
    let audio = recorder.audio_thumbnail.clone().unwrap_or_default();
    let video = recorder.video_thumbnail.clone().unwrap_or_default();
    let mut row = vec![
        Cell::or_blank(recorder.id.clone()),
        Cell::or_blank(recorder.name.clone()),
        Cell::or_blank(recorder.affiliation_name.clone()),
        Cell::opt(recorder.available),
        Cell::or_blank(recorder.machine_ip.clone()),
        Cell::opt(recorder.private_id.clone()),
        Cell::opt(recorder.state),
        Cell::or_blank(recorder.version.clone()),
    ];
    row.extend(thumbnail_cells(&audio));
    row.extend(thumbnail_cells(&video));
    row.push(Cell::or_blank(detail.state.clone()));
    row.push(Cell::Text(detail.created_date.format_local()));
    row.push(Cell::Text(detail.last_heartbeat.format_local()));
    row.extend(device_cells(detail.devices.first()));
    row.extend(device_cells(detail.devices.get(1)));
    row
}

fn thumbnail_cells(thumbnail: &Thumbnail) -> [Cell; 5] {
    [
        Cell::or_blank(thumbnail.src.clone()),
        Cell::opt(thumbnail.is_silent),
        Cell::opt(thumbnail.missing_data),
        Cell::opt(thumbnail.status),
        Cell::or_blank(thumbnail.timestamp.clone()),
    ]
}

// Devices come back as a list; the export flattens the first two into fixed
// columns and pads missing slots with empty strings.
fn device_cells(device: Option<&Device>) -> [Cell; 3] {
    match device {
        Some(device) => [
            Cell::or_blank(device.name.clone()),
            Cell::or_blank(device.device_type.clone()),
            Cell::opt(device.is_capturing),
        ],
        None => [
            Cell::Text(String::new()),
            Cell::Text(String::new()),
            Cell::Text(String::new()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::to_csv;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::{cell::RefCell, fs};
    use tempfile::tempdir;

    fn recorder_from(value: serde_json::Value) -> RemoteRecorder {
        serde_json::from_value(value).unwrap()
    }

    fn detail_from(value: serde_json::Value) -> RemoteRecorderDetail {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn a_full_record_flattens_listing_and_detail_fields() {
        let recorder = recorder_from(json!({
            "ID": "r-1",
            "Name": "Lecture Hall A",
            "AffiliationName": "main",
            "Available": true,
            "MachineIp": "10.0.0.5",
            "PrivateId": "LHA-01",
            "State": 2,
            "Version": "13.0.1",
            "AudioThumbnail": {
                "Src": "/audio.png",
                "IsSilent": false,
                "MissingData": false,
                "Status": 1,
                "Timestamp": "00:00:10"
            },
            "VideoThumbnail": {
                "Src": "/video.png",
                "IsSilent": true,
                "MissingData": false,
                "Status": 1,
                "Timestamp": "00:00:10"
            }
        }));
        let detail = detail_from(json!({
            "ID": "r-1",
            "State": "Previewing",
            "RemoteRecorderDevices": [
                {"Name": "Camera 1", "Type": "Video", "IsCapturing": true},
                {"Name": "Mic 1", "Type": "Audio", "IsCapturing": false}
            ]
        }));
        let csv = to_csv(HEADERS, &[to_row(&recorder, &detail)]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(
            row,
            "\"r-1\",\"Lecture Hall A\",\"main\",true,\"10.0.0.5\",\"LHA-01\",2,\"13.0.1\",\
             \"/audio.png\",false,false,1,\"00:00:10\",\
             \"/video.png\",true,false,1,\"00:00:10\",\
             \"Previewing\",\"\",\"\",\
             \"Camera 1\",\"Video\",true,\"Mic 1\",\"Audio\",false"
        );
    }

    #[test]
    fn absent_thumbnails_and_devices_degrade_to_empty_cells() {
        let recorder = recorder_from(json!({"ID": "r-2"}));
        let detail = RemoteRecorderDetail::default();
        let csv = to_csv(HEADERS, &[to_row(&recorder, &detail)]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert!(!row.contains("null"));
        assert_eq!(
            row,
            "\"r-2\",\"\",\"\",,\"\",,,\"\",\
             \"\",,,,\"\",\
             \"\",,,,\"\",\
             \"\",\"\",\"\",\
             \"\",\"\",\"\",\"\",\"\",\"\""
        );
    }

    #[test]
    fn a_mid_run_detail_failure_aborts_with_no_artifacts() {
        let dir = tempdir().expect("temp dir");
        let records: Vec<RemoteRecorder> = (1..=5)
            .map(|index| recorder_from(json!({"ID": format!("r-{index}")})))
            .collect();
        let mut writer =
            CsvChunkWriter::new("remote_recorders", HEADERS, dir.path(), None).expect("writer");
        let statistics = Statistics::new();
        let calls = RefCell::new(0usize);
        let result = enrich_and_write(
            &records,
            &mut writer,
            &statistics,
            &CancelToken::new(),
            |id| {
                *calls.borrow_mut() += 1;
                if id.0 == "r-3" {
                    Err(ClientError::Api {
                        status_code: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                        message: "boom".to_owned(),
                    })
                } else {
                    Ok(RemoteRecorderDetail::default())
                }
            },
        );
        assert!(matches!(result, Err(ExportError::Client(_))));
        // The failing fetch is the last one issued; the writer never
        // finishes, so nothing reaches the output directory.
        assert_eq!(*calls.borrow(), 3);
        assert_eq!(statistics.num_enriched(), 2);
        assert_eq!(fs::read_dir(dir.path()).expect("dir listing").count(), 0);
    }

    #[test]
    fn cancellation_stops_before_the_next_detail_fetch() {
        let dir = tempdir().expect("temp dir");
        let records: Vec<RemoteRecorder> = (1..=3)
            .map(|index| recorder_from(json!({"ID": format!("r-{index}")})))
            .collect();
        let mut writer =
            CsvChunkWriter::new("remote_recorders", HEADERS, dir.path(), None).expect("writer");
        let statistics = Statistics::new();
        let cancel = CancelToken::new();
        let calls = RefCell::new(0usize);
        let result = enrich_and_write(&records, &mut writer, &statistics, &cancel, |_id| {
            *calls.borrow_mut() += 1;
            cancel.cancel();
            Ok(RemoteRecorderDetail::default())
        });
        assert!(matches!(result, Err(ExportError::Cancelled)));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(fs::read_dir(dir.path()).expect("dir listing").count(), 0);
    }

    #[test]
    fn a_single_device_fills_only_the_first_slot() {
        let detail = detail_from(json!({
            "RemoteRecorderDevices": [{"Name": "Camera 1", "Type": "Video", "IsCapturing": false}]
        }));
        let first = device_cells(detail.devices.first());
        let second = device_cells(detail.devices.get(1));
        assert_eq!(first[0], Cell::Text("Camera 1".to_owned()));
        assert_eq!(second[0], Cell::Text(String::new()));
    }
}
