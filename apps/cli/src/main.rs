use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpFormSubmitter, RegistrationForm, SubmitOutcome};
use shared::{
    domain::{RegistrationType, UPCOMING_EVENTS},
    form::FormSchema,
};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the upcoming events catalog.
    Events,
    /// Submit one registration to a form endpoint.
    Register {
        kind: RegistrationType,
        #[arg(long)]
        endpoint: Url,
        /// Address the endpoint forwards the registration to.
        #[arg(long)]
        to: String,
        /// A form field as `name=value`; repeat for each field.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    Ok((name.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Events => {
            for event in UPCOMING_EVENTS {
                println!(
                    "{:>2}  {}  {} {}  {} ({})  {}",
                    event.id,
                    event.title,
                    event.date,
                    event.time,
                    event.venue,
                    event.performer,
                    event.price
                );
            }
        }
        Command::Register {
            kind,
            endpoint,
            to,
            fields,
            timeout_secs,
        } => {
            let submitter = match timeout_secs {
                Some(secs) => HttpFormSubmitter::with_timeout(endpoint, Duration::from_secs(secs))
                    .context("failed to build HTTP client")?,
                None => HttpFormSubmitter::new(endpoint),
            };
            let schema = FormSchema::for_type(kind);
            let form = RegistrationForm::new(schema, to, Arc::new(submitter));
            for (name, value) in fields {
                form.set_field(&name, value).await?;
            }

            match form.submit().await {
                SubmitOutcome::Submitted { email } => {
                    println!("{}", schema.success_message(&email));
                }
                SubmitOutcome::Invalid(errors) => {
                    for violation in &errors.0 {
                        eprintln!("{}: {}", violation.field, violation.kind.message());
                    }
                    bail!("{kind} registration not sent: {errors}");
                }
                SubmitOutcome::Failed(error) => {
                    return Err(error).context(format!("{kind} registration failed"));
                }
                SubmitOutcome::AlreadySubmitting => {
                    bail!("{kind} registration already in flight");
                }
            }
        }
    }

    Ok(())
}
