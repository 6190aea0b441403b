//! `mailtriage` - classify the latest Gmail support tickets with an LLM.
//!
//! Reads configuration from the environment (and `.env`), fetches up to
//! three inbox messages, classifies each, and prints the results.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod report;

use anyhow::Context;
use mailtriage_core::{
    Classifier, Config, GmailTicketSource, OAuthCredentialProvider, OpenAiChatClient,
    Orchestrator, Session,
};
use mailtriage_gmail::GmailClient;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailtriage=info,mailtriage_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("mailtriage: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<mailtriage_core::Error>()
        .map_or(1, mailtriage_core::Error::exit_code)
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(mailtriage_core::Error::from)?;
    info!(model = %config.model, batch = config.batch_size.get(), "starting triage");

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?
        .block_on(triage(config))
}

async fn triage(config: Config) -> anyhow::Result<()> {
    let http = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .context("failed to build the HTTP client")?;

    let credentials =
        OAuthCredentialProvider::new(&config.credentials_path, &config.token_path, http.clone());
    let source = GmailTicketSource::new(GmailClient::new(http.clone()), Session::new(credentials));
    let chat = OpenAiChatClient::new(http, &config.api_key).with_api_base(&config.api_base);
    let mut orchestrator = Orchestrator::new(source, Classifier::new(chat, &config.model));

    let run = orchestrator
        .run(config.batch_size)
        .await
        .map_err(mailtriage_core::Error::from)?;

    let mut stdout = io::stdout().lock();
    report::write_run(&mut stdout, &run).context("failed to write the report")?;
    stdout.flush().context("failed to write the report")?;
    Ok(())
}
