//! Developer probe for a brackets server: watch a channel's event stream
//! or dispatch a single exchange the way the in-page runtime would.

use std::fs::File;
use std::sync::Arc;

use brx_runtime::runtime::options::DEFAULT_HINT_HEADER;
use brx_runtime::{Dispatcher, ExchangeContext, LogSink, MemoryDocument, Response, Subscriber};
use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "brx-probe", about = "Developer probe for a brackets server")]
struct Args {
    /// Server base URL
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Subscribe to a channel and print each message until interrupted
    Subscribe { channel: String },
    /// Perform one GET and dispatch its response envelope
    Exchange { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // File logger keeps stdout clean for the probed payloads.
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("brx-probe.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    match args.command {
        Command::Subscribe { channel } => {
            log::info!("subscribing to {channel:?} at {}", args.base_url);
            let subscriber = Subscriber::new(args.base_url);
            let subscription = subscriber.subscribe(&channel, |message| println!("{message}"));
            tokio::signal::ctrl_c().await?;
            subscription.dispose();
        }
        Command::Exchange { url } => {
            log::info!("probing exchange against {url}");
            let client = reqwest::Client::new();
            let response = client
                .get(&url)
                .header(DEFAULT_HINT_HEADER, "true")
                .send()
                .await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body = response.text().await?;

            let dispatcher = Dispatcher::new(Arc::new(LogSink));
            let mut doc = MemoryDocument::new();
            let mut cx = ExchangeContext::new();
            let outcome =
                dispatcher.handle(&Response::new(status, content_type, body), &mut doc, &mut cx);
            println!("{outcome:?}");
        }
    }

    Ok(())
}
