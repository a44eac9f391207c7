mod folders;
mod groups;
mod recorders;
mod users;

use panopto_client::{Client, ListPages};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};
use structopt::StructOpt;

use crate::{
    errors::ExportError,
    progress::{Progress, ProgressMessage},
    thousands::Thousands,
};

#[derive(Debug, StructOpt)]
pub enum ExportArgs {
    #[structopt(name = "folders")]
    /// Export all folders to CSV
    Folders(EntityArgs),

    #[structopt(name = "recorders")]
    /// Export all remote recorders to CSV, enriched with per-recorder detail
    Recorders(EntityArgs),

    #[structopt(name = "groups")]
    /// Export all user groups to CSV (chunked by default)
    Groups(EntityArgs),

    #[structopt(name = "users")]
    /// Export all users to CSV
    Users(EntityArgs),
}

#[derive(Debug, StructOpt)]
pub struct EntityArgs {
    #[structopt(
        short = "o",
        long = "out-dir",
        default_value = ".",
        parse(from_os_str)
    )]
    /// Directory where the CSV artifact(s) will be written
    out_dir: PathBuf,

    #[structopt(long = "page-size")]
    /// Number of records requested per page (defaults per entity)
    page_size: Option<usize>,

    #[structopt(long = "chunk-size")]
    /// Split the output into chunk files of at most this many rows
    chunk_size: Option<usize>,

    #[structopt(long = "no-progress")]
    /// Do not display a progress bar
    no_progress: bool,
}

pub fn run(
    args: &ExportArgs,
    client: &Client,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    match args {
        ExportArgs::Folders(entity_args) => folders::run(client, entity_args, cancel),
        ExportArgs::Recorders(entity_args) => recorders::run(client, entity_args, cancel),
        ExportArgs::Groups(entity_args) => groups::run(client, entity_args, cancel),
        ExportArgs::Users(entity_args) => users::run(client, entity_args, cancel),
    }
}

/// Cooperative cancellation flag, checked between page fetches and between
/// per-record detail fetches. A cancelled run fails with a dedicated error
/// instead of passing off whatever was written so far as a success.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

const UNKNOWN_TOTAL: usize = usize::MAX;

/// Shared counters polled by the progress thread while a run is in flight.
#[derive(Debug)]
pub struct Statistics {
    fetched: AtomicUsize,
    enriched: AtomicUsize,
    total: AtomicUsize,
}

impl Statistics {
    fn new() -> Self {
        Statistics {
            fetched: AtomicUsize::new(0),
            enriched: AtomicUsize::new(0),
            total: AtomicUsize::new(UNKNOWN_TOTAL),
        }
    }

    fn add_fetched(&self, num: usize) {
        self.fetched.fetch_add(num, Ordering::SeqCst);
    }

    fn add_enriched(&self, num: usize) {
        self.enriched.fetch_add(num, Ordering::SeqCst);
    }

    fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn num_fetched(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }

    fn num_enriched(&self) -> usize {
        self.enriched.load(Ordering::SeqCst)
    }

    fn total(&self) -> Option<usize> {
        match self.total.load(Ordering::SeqCst) {
            UNKNOWN_TOTAL => None,
            total => Some(total),
        }
    }
}

/// Drives a page iterator to completion, feeding every record to `on_record`
/// and keeping the shared statistics current. The declared total, when the
/// endpoint reports one, is latched after the first page.
fn drain_pages<T>(
    mut pages: ListPages<'_, T>,
    statistics: &Statistics,
    cancel: &CancelToken,
    mut on_record: impl FnMut(T) -> Result<(), ExportError>,
) -> Result<(), ExportError> {
    loop {
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        let batch = match pages.next() {
            Some(batch) => batch?,
            None => return Ok(()),
        };
        if let Some(total) = pages.total() {
            statistics.set_total(total);
        }
        statistics.add_fetched(batch.len());
        for record in batch {
            on_record(record)?;
        }
    }
}

fn fetch_progress(
    statistics: &Arc<Statistics>,
    noun: &'static str,
    no_progress: bool,
) -> Option<Progress> {
    if no_progress {
        return None;
    }
    Some(Progress::new(
        move |statistics: &Statistics| -> ProgressMessage {
            let fetched = statistics.num_fetched() as u64;
            let message = match statistics.total() {
                Some(total) => format!(
                    "{} of {} {}",
                    Thousands(fetched),
                    Thousands(total as u64),
                    noun
                ),
                None => format!("{} {}", Thousands(fetched), noun),
            };
            (fetched, message)
        },
        statistics,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use panopto_client::{ListPage, TotalPolicy};
    use pretty_assertions::assert_eq;

    fn pages_of(batches: Vec<Vec<u32>>) -> ListPages<'static, u32> {
        let total: usize = batches.iter().map(Vec::len).sum();
        ListPages::new(TotalPolicy::Declared, 10, 0, move |page| {
            Ok(ListPage {
                total: Some(total),
                results: batches.get(page as usize).cloned().unwrap_or_default(),
            })
        })
    }

    #[test]
    fn drain_pages_visits_every_record_in_order() {
        let statistics = Statistics::new();
        let cancel = CancelToken::new();
        let mut seen = Vec::new();
        drain_pages(
            pages_of(vec![vec![1, 2, 3], vec![4, 5]]),
            &statistics,
            &cancel,
            |record| {
                seen.push(record);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(statistics.num_fetched(), 5);
        assert_eq!(statistics.total(), Some(5));
    }

    #[test]
    fn cancellation_short_circuits_before_the_next_fetch() {
        let statistics = Statistics::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = drain_pages(
            pages_of(vec![vec![1, 2, 3]]),
            &statistics,
            &cancel,
            |_record| Ok(()),
        );
        assert!(matches!(result, Err(ExportError::Cancelled)));
        assert_eq!(statistics.num_fetched(), 0);
    }

    #[test]
    fn a_failed_record_sink_aborts_the_run() {
        let statistics = Statistics::new();
        let cancel = CancelToken::new();
        let result = drain_pages(
            pages_of(vec![vec![1, 2, 3]]),
            &statistics,
            &cancel,
            |_record| Err(ExportError::Cancelled),
        );
        assert!(result.is_err());
    }

    #[test]
    fn statistics_report_no_total_until_one_is_latched() {
        let statistics = Statistics::new();
        assert_eq!(statistics.total(), None);
        statistics.set_total(42);
        assert_eq!(statistics.total(), Some(42));
    }
}
