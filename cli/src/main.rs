#![deny(clippy::all)]

mod args;
mod chunks;
mod commands;
mod config;
mod csv;
mod errors;
mod progress;
mod thousands;
mod utils;

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use panopto_client::{Client, Config as ClientConfig, SessionCookie, DEFAULT_ENDPOINT};
use std::{fs, path::PathBuf, process};
use structopt::StructOpt;

use crate::{
    args::{Args, Command},
    commands::{config as config_command, export},
    config::PanoexConfig,
    errors::{client_exit_code, ExportError},
    utils::{init_env_logger, read_cookie_from_stdin},
};

fn run(args: Args) -> Result<()> {
    let config_path = find_configuration(&args)?;
    let cli_config = config::read_panoex_config(&config_path)?;

    match &args.command {
        Command::Config { config_args } => {
            config_command::run(config_args, cli_config, config_path).map(|_| ())
        }
        Command::Export { export_args } => {
            let client = client_from_args(&args, &cli_config)?;
            let cancel = export::CancelToken::new();
            let artifacts = export::run(export_args, &client, &cancel)?;
            for artifact in &artifacts {
                info!("Wrote `{}`.", artifact.display());
            }
            Ok(())
        }
    }
}

fn client_from_args(args: &Args, config: &PanoexConfig) -> Result<Client> {
    let current_context = if let Some(context_name) = args.context.as_ref() {
        let context = config.get_context(context_name);
        if context.is_none() {
            return Err(anyhow!("Unknown context `{}`.", context_name));
        }
        context
    } else {
        config.get_current_context()
    };

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| current_context.map(|context| context.endpoint.clone()))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.clone());

    let args_or_config_cookie = args
        .cookie
        .clone()
        .or_else(|| current_context.and_then(|context| context.session_cookie.clone()));

    let session_cookie = SessionCookie(if let Some(cookie) = args_or_config_cookie {
        cookie
    } else {
        read_cookie_from_stdin()?.unwrap_or_default()
    });

    let accept_invalid_certificates = args
        .accept_invalid_certificates
        .or_else(|| current_context.map(|context| context.accept_invalid_certificates))
        .unwrap_or(false);

    if accept_invalid_certificates {
        warn!(concat!(
            "TLS certificate verification is disabled. ",
            "Do NOT use this over an insecure network."
        ));
    }

    let proxy = args
        .proxy
        .clone()
        .or_else(|| current_context.and_then(|context| context.proxy.clone()));

    Client::new(ClientConfig {
        endpoint,
        session_cookie,
        accept_invalid_certificates,
        proxy,
    })
    .context("Failed to initialise the HTTP client.")
}

fn find_configuration(args: &Args) -> Result<PathBuf> {
    let config_path = if let Some(config_path) = args.config.clone() {
        if !config_path.exists() {
            warn!(
                "Configuration file `{}` doesn't exist.",
                config_path.display()
            );
        }
        config_path
    } else {
        let mut config_path =
            dirs::config_dir().context("Could not get path to the user's config directory")?;
        config_path.push("panoex");
        fs::create_dir_all(&config_path).with_context(|| {
            format!(
                "Could not create config directory {}",
                config_path.display()
            )
        })?;
        config_path.push("contexts.json");
        config_path
    };
    Ok(config_path)
}

fn exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(export_error) = cause.downcast_ref::<ExportError>() {
            return export_error.exit_code();
        }
        if let Some(client_error) = cause.downcast_ref::<panopto_client::Error>() {
            return client_exit_code(client_error);
        }
    }
    1
}

fn main() {
    let args = Args::from_args();
    init_env_logger(args.verbose);

    if let Err(error) = run(args) {
        error!("An error occurred:");
        for cause in error.chain() {
            error!(" |- {cause}");
        }

        process::exit(exit_code(&error));
    }
}
