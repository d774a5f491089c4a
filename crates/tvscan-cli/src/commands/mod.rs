mod columns;
mod scan;

use std::sync::Arc;

use tvscan_core::{
    CancellationToken, HttpClient, NoopHttpClient, ReqwestHttpClient, ScreenerClient,
    ScreenerConfig, ScreenerResult,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command produced, handed to the renderer.
#[derive(Debug)]
pub enum CommandOutput {
    Scan {
        columns: Vec<String>,
        result: ScreenerResult,
    },
    /// Wire body of a scan that was not sent.
    Request(String),
    Columns(Vec<(&'static str, String)>),
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    match &cli.command {
        Command::Scan(args) => {
            let client = build_client(cli);
            let cancel = CancellationToken::new();
            let interrupt = cancel_on_interrupt(cancel.clone());
            let output = scan::run(args, &client, &cancel).await;
            interrupt.abort();
            output
        }
        Command::Columns => Ok(columns::run()),
    }
}

fn build_client(cli: &Cli) -> ScreenerClient {
    let mut config = ScreenerConfig::from_env();
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }

    let http_client: Arc<dyn HttpClient> = if cli.mock {
        Arc::new(NoopHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::default())
    };

    ScreenerClient::new(http_client, config)
}

/// Cancels `token` on Ctrl-C until the returned task is aborted.
fn cancel_on_interrupt(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling scan");
            token.cancel();
        }
    })
}
