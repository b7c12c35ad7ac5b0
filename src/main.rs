use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

mod api;
mod error;
mod fields;
mod flatten;
mod models;
mod project;
mod report;
mod scores;

use api::ApiConfig;
use error::ReportError;

#[derive(Parser)]
#[command(name = "gradebook-export")]
#[command(about = "Per-submission gradebook export for Canvas LMS reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reportable field catalog as JSON
    Schema {
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
    /// Print the course query to run against the API
    Query {
        #[arg(long)]
        subdomain: Option<String>,
    },
    /// Flatten a saved course response into a per-submission table
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summarize a saved course response as markdown
    Summary {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "summary.md")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { fields } => {
            let catalog = match &fields {
                Some(ids) => {
                    let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                    fields::select(&ids)?
                }
                None => fields::catalog(),
            };
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Commands::Query { subdomain } => {
            let config = match subdomain {
                Some(subdomain) => ApiConfig::new(subdomain),
                None => ApiConfig::default(),
            };
            let request = api::query_request(&config);
            println!("POST {}", request.url);
            println!("{}", serde_json::to_string_pretty(&request.body)?);
            println!();
            println!(
                "Send with an `Authorization: Bearer <api token>` header and save the \
                 response for `report --input`."
            );
        }
        Commands::Report {
            input,
            fields,
            format,
            out,
        } => {
            let transport = api::FileTransport::new(&input);
            let requested: Option<Vec<&str>> = fields
                .as_ref()
                .map(|ids| ids.iter().map(String::as_str).collect());

            let report = report::run_report(&transport, &ApiConfig::default(), requested.as_deref())
                .map_err(describe)?;

            match format {
                OutputFormat::Csv => match &out {
                    Some(path) => {
                        let file = std::fs::File::create(path)
                            .with_context(|| format!("could not create {}", path.display()))?;
                        report::write_csv(&report, file)?;
                        println!(
                            "Report written to {} ({} rows).",
                            path.display(),
                            report.rows.len()
                        );
                    }
                    None => report::write_csv(&report, std::io::stdout().lock())?,
                },
                OutputFormat::Json => {
                    let rendered = serde_json::to_string_pretty(&report::to_json(&report))?;
                    match &out {
                        Some(path) => {
                            std::fs::write(path, rendered)?;
                            println!(
                                "Report written to {} ({} rows).",
                                path.display(),
                                report.rows.len()
                            );
                        }
                        None => println!("{rendered}"),
                    }
                }
            }
        }
        Commands::Summary { input, out } => {
            let transport = api::FileTransport::new(&input);
            let courses =
                api::fetch_courses(&transport, &ApiConfig::default()).map_err(describe)?;
            let summary = report::build_summary(&courses);
            std::fs::write(&out, summary)?;
            println!("Summary written to {}.", out.display());
        }
    }

    Ok(())
}

fn describe(err: ReportError) -> anyhow::Error {
    match err {
        ReportError::UnknownField { .. } => anyhow::Error::new(err),
        ReportError::AuthRejected { .. } => {
            anyhow::Error::new(err).context("authentication failed, re-issue the API token")
        }
        _ => anyhow::Error::new(err).context("data fetch failed, no report generated"),
    }
}
