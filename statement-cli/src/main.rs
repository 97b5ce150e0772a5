use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use statement_client::{generate_and_deliver, ClientError, DirectorySink, StatementClient};
use statement_core::{BillingPeriod, StatementFormat, StatementRequest};
use std::fmt;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod form;
mod state;

use config::Config;
use form::StatementForm;

#[derive(Parser, Debug)]
#[command(
    name = "statement",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STATEMENT_BUILD_SHA"), ")"),
    about = "Request loan statements from the statement service"
)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a statement request from a form file, submit it and save the result
    Generate {
        /// Form file (TOML, or JSON when it ends in .json)
        #[arg(long)]
        form: PathBuf,

        /// Override the form's statement format (pdf, xlsx, txt)
        #[arg(long)]
        format: Option<StatementFormat>,

        /// Billing period start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Billing period end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Append loans from a CSV export (headers are loan field names)
        #[arg(long)]
        loans_csv: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Submit a ready-made JSON statement request and save the result
    Send {
        /// JSON document with either a `customer` or a `customers` key
        #[arg(long)]
        request: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Statement form helpers
    Form {
        #[command(subcommand)]
        command: FormCommand,
    },

    /// Manage ~/.statement-client/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct ServiceArgs {
    /// Statement service base URL (default: from config)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory to save the statement into (default: from config)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum FormCommand {
    /// Print a blank TOML form
    Template {
        /// Number of customer entries (1 = single statement, 2+ = joint)
        #[arg(long, default_value_t = 1)]
        customers: usize,

        #[arg(long, default_value_t = StatementFormat::Pdf)]
        format: StatementFormat,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

/// A submission failure whose user-facing message was already logged.
#[derive(Debug)]
struct Reported(ClientError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command).await {
        if err.downcast_ref::<Reported>().is_none() {
            eprintln!("Error: {err:#}");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            form: form_path,
            format,
            start,
            end,
            loans_csv,
            service,
        } => {
            let mut statement_form = form::load_form(&form_path)
                .with_context(|| format!("loading form {}", form_path.display()))?;

            if let Some(csv_path) = loans_csv {
                let loans = form::load_loans_csv(&csv_path)?;
                info!(count = loans.len(), path = %csv_path.display(), "imported loans");
                statement_form.loans.extend(loans);
            }
            apply_overrides(&mut statement_form, format, start, end);

            let request = statement_form
                .into_request()
                .context("building statement request")?;
            submit_and_save(request, service).await
        }

        Command::Send { request, service } => {
            let text = std::fs::read_to_string(&request)
                .with_context(|| format!("read {}", request.display()))?;
            let parsed: StatementRequest = serde_json::from_str(&text)
                .with_context(|| format!("parse {}", request.display()))?;
            submit_and_save(parsed, service).await
        }

        Command::Form { command } => match command {
            FormCommand::Template { customers, format } => {
                let template = StatementForm::template(customers, format);
                print!("{}", toml::to_string_pretty(&template).context("serialize form")?);
                Ok(())
            }
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                Ok(())
            }
        },
    }
}

/// Command-line values win over the form; a blank billing period falls back to last month.
fn apply_overrides(
    form: &mut StatementForm,
    format: Option<StatementFormat>,
    start: Option<String>,
    end: Option<String>,
) {
    if let Some(format) = format {
        form.statement_format = format;
    }
    if let Some(start) = start {
        form.billing_period_start = start;
    }
    if let Some(end) = end {
        form.billing_period_end = end;
    }
    if form.billing_period().is_blank() {
        let period = BillingPeriod::previous_month(Local::now().date_naive());
        info!(start = %period.start, end = %period.end, "no billing period given, using last month");
        form.set_billing_period(period);
    }
}

async fn submit_and_save(request: StatementRequest, service: ServiceArgs) -> Result<()> {
    let cfg: Config = config::load_config()?;
    let base_url = service.base_url.unwrap_or(cfg.server.base_url.clone());
    let out_dir = service.out_dir.unwrap_or(cfg.output.directory.clone());

    if base_url.trim().is_empty() {
        bail!("no statement service URL configured (pass --base-url or run: statement config init)");
    }

    let client = StatementClient::from_base_url(&base_url, cfg.server.timeout())
        .with_context(|| format!("configuring client for {base_url}"))?;
    let sink = DirectorySink::new(out_dir);

    let saved = generate_and_deliver(&client, &sink, &request)
        .await
        .map_err(Reported)?;

    println!("Saved {}", saved.display());
    Ok(())
}
