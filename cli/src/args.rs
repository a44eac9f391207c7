use crate::commands::{config::ConfigArgs, export::ExportArgs};
use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;

/// panoex exports Panopto admin listings to CSV files.
#[derive(Debug, StructOpt)]
#[structopt(
    global_settings = &[
        structopt::clap::AppSettings::ColoredHelp,
        structopt::clap::AppSettings::InferSubcommands,
    ]
)]
pub struct Args {
    #[structopt(long = "config-file", parse(from_os_str))]
    /// Path to the configuration file. Typically defaults to ~/.config/panoex on Linux.
    pub config: Option<PathBuf>,

    #[structopt(short = "c", long = "context")]
    /// Specify what context to use. Overrides the current context, if any.
    pub context: Option<String>,

    #[structopt(short = "v", long = "verbose")]
    /// Enable more verbose logging.
    pub verbose: bool,

    #[structopt(long = "endpoint", parse(try_from_str))]
    /// Specify what tenant endpoint to use. Overrides the one from the
    /// current context, if any.
    pub endpoint: Option<Url>,

    #[structopt(short = "k", long = "accept-invalid-certificates", parse(try_from_str))]
    pub accept_invalid_certificates: Option<bool>,

    #[structopt(long = "cookie")]
    /// Specify what session cookie (.ASPXAUTH value) to use. Overrides the
    /// one from the current context, if any.
    pub cookie: Option<String>,

    #[structopt(long = "proxy", parse(try_from_str))]
    /// URL for an HTTP proxy that will be used for all requests if specified.
    pub proxy: Option<Url>,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(name = "config")]
    /// Manage panoex endpoint and session contexts
    Config {
        #[structopt(subcommand)]
        config_args: ConfigArgs,
    },

    #[structopt(name = "export")]
    /// Export an admin listing to CSV files on the local filesystem
    Export {
        #[structopt(subcommand)]
        export_args: ExportArgs,
    },
}
