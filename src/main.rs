//! Catalog client - command-line front end
//!
//! Drives the generic list view and record form against the configured
//! REST store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_client::{
    config::{AppConfig, LoggingConfig},
    models::{Entity, Kind, RecordId},
    services::{Catalog, ListDisplay, ListView, Navigator, RecordForm, ResourceGateway, Route},
    transport::HttpTransport,
};

#[derive(Parser)]
#[command(name = "catalog", about = "Manage the library catalog", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the managed record kinds
    Kinds,
    /// Work with books
    Books {
        #[command(subcommand)]
        action: Action,
    },
    /// Work with magazines
    Magazines {
        #[command(subcommand)]
        action: Action,
    },
    /// Work with DVDs
    Dvds {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand)]
enum Action {
    /// List every record
    List,
    /// Server-side search; only searchable fields are sent
    Search {
        /// Filter as name=value, repeatable
        #[arg(long = "field", value_parser = parse_assignment, conflicts_with = "by")]
        fields: Vec<(String, String)>,
        /// Single-field search as name=value, e.g. issueNumber=42
        #[arg(long, value_parser = parse_assignment)]
        by: Option<(String, String)>,
    },
    /// Show one record
    Show { id: RecordId },
    /// Create a record
    New {
        /// Field value as name=value, repeatable
        #[arg(long = "field", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Edit a record
    Edit {
        id: RecordId,
        /// Field value as name=value, repeatable
        #[arg(long = "field", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Delete a record after confirmation
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    Ok((name.trim().to_string(), value.to_string()))
}

struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &Route) {
        tracing::info!("Done, back to {}", route);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::debug!("Catalog client v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let transport = HttpTransport::new(&config.api).context("Failed to build HTTP client")?;
    let catalog = Catalog::new(Arc::new(transport));

    let ok = match cli.command {
        Commands::Kinds => {
            print_home();
            true
        }
        Commands::Books { action } => run(catalog.books, action).await?,
        Commands::Magazines { action } => run(catalog.magazines, action).await?,
        Commands::Dvds { action } => run(catalog.dvds, action).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("catalog={level},catalog_client={level}", level = logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_home() {
    for kind in Kind::all() {
        let descriptor = kind.descriptor();
        println!(
            "{:<10} {:<12} {}",
            descriptor.plural,
            Route::List(kind).path(),
            descriptor.summary
        );
    }
}

/// Run one action for a kind; returns false when the action failed
async fn run<E: Entity>(gateway: ResourceGateway<E>, action: Action) -> anyhow::Result<bool> {
    match action {
        Action::List => {
            let mut view = ListView::new(gateway);
            view.mount().await;
            print_list(&view)
        }
        Action::Search { fields, by } => {
            let mut view = ListView::new(gateway);
            if let Some((name, value)) = by {
                view.submit_field_search(&name, &value).await;
            } else {
                for (name, value) in &fields {
                    view.set_search_param(name, value);
                }
                view.submit_search().await;
            }
            print_list(&view)
        }
        Action::Show { id } => match gateway.get_by_id(id).await {
            Ok(record) => {
                print_record(&record)?;
                Ok(true)
            }
            Err(e) => {
                eprintln!("Could not load the {}: {}", E::DESCRIPTOR.singular, e.message());
                Ok(false)
            }
        },
        Action::New { fields } => {
            let route = Route::New(E::DESCRIPTOR.kind);
            submit_form(RecordForm::for_route(gateway, &route)?, &fields).await
        }
        Action::Edit { id, fields } => {
            let route = Route::Edit(E::DESCRIPTOR.kind, id);
            submit_form(RecordForm::for_route(gateway, &route)?, &fields).await
        }
        Action::Delete { id, yes } => {
            let mut view = ListView::new(gateway);
            view.mount().await;
            if !view.request_delete(id) {
                eprintln!(
                    "{}",
                    view.notification()
                        .error()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("No {} with id {}", E::DESCRIPTOR.singular, id))
                );
                return Ok(false);
            }

            if !yes && !confirm(&format!("Delete {} {}?", E::DESCRIPTOR.singular, id)).await? {
                view.cancel_delete();
                println!("Cancelled");
                return Ok(true);
            }

            if view.confirm_delete().await {
                println!("Deleted {} {}", E::DESCRIPTOR.singular, id);
                Ok(true)
            } else {
                report_error(view.notification().error());
                Ok(false)
            }
        }
    }
}

async fn submit_form<E: Entity>(
    mut form: RecordForm<E>,
    fields: &[(String, String)],
) -> anyhow::Result<bool> {
    form.mount().await;
    if let Some(error) = form.notification().error() {
        eprintln!("{}", error);
        return Ok(false);
    }

    for (name, value) in fields {
        if !form.set_field(name, value) {
            report_error(form.notification().error());
            return Ok(false);
        }
    }

    match form.submit(&LogNavigator).await {
        Some(saved) => {
            print_record(&saved)?;
            Ok(true)
        }
        None => {
            report_error(form.notification().error());
            Ok(false)
        }
    }
}

fn print_list<E: Entity>(view: &ListView<E>) -> anyhow::Result<bool> {
    if let Some(error) = view.notification().error() {
        eprintln!("{}", error);
    }
    match view.display() {
        ListDisplay::Records(records) => {
            for record in records {
                print_record(record)?;
            }
        }
        ListDisplay::Empty => println!("No {} available", E::DESCRIPTOR.plural),
        ListDisplay::Loading => eprintln!("Still loading {}", E::DESCRIPTOR.plural),
    }
    Ok(view.notification().error().is_none())
}

fn print_record<T: Serialize>(record: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}

fn report_error(error: Option<&str>) {
    eprintln!("{}", error.unwrap_or("Operation failed"));
}

async fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", question);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
