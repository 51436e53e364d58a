//! termcal entry point.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use termcal_core::{TracingConfig, init_tracing};
use tracing::info;

use termcal_server::{
    ServerConfig, ServerResult, SignalHandler, build_service, import_credentials, open_cache,
    serve,
};

use crate::cli::{Cli, Command, CredentialsAction};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing = match cli.command {
        Command::Serve => TracingConfig::server(),
        _ => TracingConfig::cli(),
    }
    .with_debug(cli.debug)
    .with_format(cli.log_format);
    if let Err(e) = init_tracing(tracing) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let config = ServerConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Serve => {
            let signals = SignalHandler::new();
            signals.spawn_listener();
            serve(&config, signals.shutdown()).await
        }
        Command::Render(args) => {
            let cache = open_cache(&config).await?;
            let service = build_service(&config, cache)?;
            let text = service.render(args.to_request()).await?;
            if text.ends_with('\n') {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
            Ok(())
        }
        Command::Credentials {
            action: CredentialsAction::Import { file },
        } => {
            let cache = open_cache(&config).await?;
            let record = import_credentials(Arc::as_ref(&cache), &file).await?;
            info!(id = %record.id, "imported credential");
            println!("imported credential for '{}'", record.id);
            Ok(())
        }
    }
}
