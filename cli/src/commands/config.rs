use anyhow::Result;
use colored::Colorize;
use log::{error, info};
use panopto_client::DEFAULT_ENDPOINT;
use prettytable::{format, row, Table};
use std::path::Path;
use structopt::StructOpt;
use url::Url;

use crate::{
    config::{self, ContextConfig, PanoexConfig},
    utils::read_cookie_from_stdin,
};

#[derive(Debug, StructOpt)]
pub enum ConfigArgs {
    #[structopt(name = "add")]
    /// Add a new context to the panoex config file
    AddContext {
        #[structopt(long = "name", short = "n")]
        /// The name of the context that will be created or updated
        name: String,

        #[structopt(long = "endpoint", short = "e")]
        /// The tenant endpoint that will be used for this context
        endpoint: Option<Url>,

        #[structopt(long = "cookie", short = "t")]
        /// The session cookie (.ASPXAUTH value) that will be used for this
        /// context. Read from stdin when not provided.
        cookie: Option<String>,

        #[structopt(long = "accept-invalid-certificates", short = "k")]
        /// Whether to accept invalid TLS certificates
        accept_invalid_certificates: bool,

        #[structopt(long = "proxy")]
        /// URL for an HTTP proxy that will be used for all requests if specified
        proxy: Option<Url>,
    },

    #[structopt(name = "current")]
    /// Display the current context
    CurrentContext,

    #[structopt(name = "delete")]
    /// Delete the specified context from the panoex config file
    DeleteContext {
        /// The name(s) of the context(s) which will be deleted
        names: Vec<String>,
    },

    #[structopt(name = "ls")]
    /// List available contexts in a panoex config file
    ListContexts {
        #[structopt(long = "cookies")]
        /// Show session cookies (hidden by default).
        cookies: bool,
    },

    #[structopt(name = "use")]
    /// Set the current context in the panoex config file
    UseContext {
        /// The name of the context.
        name: String,
    },
}

pub fn run(
    args: &ConfigArgs,
    mut config: PanoexConfig,
    config_path: impl AsRef<Path>,
) -> Result<PanoexConfig> {
    match args {
        ConfigArgs::ListContexts { cookies } if config.num_contexts() > 0 => {
            let mut contexts = config.get_all_contexts().clone();
            contexts.sort_unstable_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
            let mut table = new_table();
            table.set_titles(
                row![bFg => "Active", "Context", "Endpoint", "Insecure", "Cookie", "Proxy"],
            );
            for context in contexts.iter() {
                let active = config
                    .get_current_context()
                    .is_some_and(|current_context| current_context.name == context.name);
                table.add_row(row![
                    if active { "    ->" } else { "" },
                    if active {
                        context.name.bold().bright_white()
                    } else {
                        context.name.normal()
                    },
                    context.endpoint,
                    if context.accept_invalid_certificates {
                        "Yes"
                    } else {
                        "No"
                    },
                    if *cookies {
                        context.session_cookie.clone().unwrap_or_default()
                    } else {
                        "<Hidden>".into()
                    },
                    context
                        .proxy
                        .clone()
                        .map(|url| url.to_string())
                        .unwrap_or_default()
                ]);
            }
            table.printstd();
        }
        ConfigArgs::ListContexts { .. } => {
            info!("No available contexts.");
        }
        ConfigArgs::AddContext {
            name,
            endpoint,
            cookie,
            accept_invalid_certificates,
            proxy,
        } => {
            let endpoint = endpoint.clone().unwrap_or_else(|| DEFAULT_ENDPOINT.clone());
            let session_cookie = match cookie {
                Some(cookie) => Some(cookie.clone()),
                None => read_cookie_from_stdin()?,
            };
            let updated = config.set_context(ContextConfig {
                name: name.clone(),
                endpoint,
                session_cookie,
                accept_invalid_certificates: *accept_invalid_certificates,
                proxy: proxy.clone(),
            });
            if config.num_contexts() == 1 {
                config.set_current_context(name);
            }
            config::write_panoex_config(&config_path, &config)?;
            if updated {
                info!("Updated context `{}`.", name);
            } else {
                info!("Added context `{}`.", name);
            }
        }
        ConfigArgs::UseContext { name } => {
            if !config.set_current_context(name) {
                error!(
                    "No such context `{}` exists in `{}`.",
                    name,
                    config_path.as_ref().display()
                );
            } else {
                config::write_panoex_config(&config_path, &config)?;
                info!("Switched to context `{}`.", name);
            }
        }
        ConfigArgs::CurrentContext => config.get_current_context().map_or_else(
            || info!("There is no default context in use."),
            |current_context| println!("{}", current_context.name),
        ),
        ConfigArgs::DeleteContext { names } => {
            for name in names {
                if config.delete_context(name) {
                    config::write_panoex_config(&config_path, &config)?;
                    info!(
                        "Deleted context `{}` from `{}`.",
                        name,
                        config_path.as_ref().display()
                    );
                } else {
                    error!(
                        "No such context `{}` exists in `{}`.",
                        name,
                        config_path.as_ref().display()
                    );
                }
            }
        }
    }
    Ok(config)
}

fn new_table() -> Table {
    let mut table = Table::new();
    let format = format::FormatBuilder::new()
        .column_separator(' ')
        .borders(' ')
        .separators(&[], format::LineSeparator::new('-', '+', '+', '+'))
        .padding(0, 1)
        .build();
    table.set_format(format);
    table
}
