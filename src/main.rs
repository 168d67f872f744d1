mod cli;
#[cfg(test)]
mod tests;

use clap::Parser;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cli::Cli;
use stern_tail::color::ColorRegistry;
use stern_tail::kubernetes::{container_names, initialize_client};
use stern_tail::session::{SessionState, TailSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the tailed logs, so diagnostics go to stderr
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = Arc::new(cli.tail_options()?);
    let (context, client) = initialize_client(cli.context.as_deref()).await?;
    let namespace = cli
        .namespace
        .clone()
        .unwrap_or_else(|| client.default_namespace().to_string());
    let pods: Arc<Api<Pod>> = Arc::new(Api::namespaced(client, &namespace));

    // Channel for formatted output
    let (sink, mut output) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(text) = output.recv().await {
            if stdout.write_all(text.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let colors = ColorRegistry::new();
    let cancel = CancellationToken::new();
    let mut sessions = Vec::new();
    let mut handles = Vec::new();

    for pod_name in &cli.pods {
        let containers = match container_names(&pods, pod_name, cli.container.as_deref()).await {
            Ok(containers) => containers,
            Err(e) => {
                warn!("[{}] {}", context, e);
                continue;
            }
        };

        for container in containers {
            let session = Arc::new(TailSession::new(
                namespace.as_str(),
                pod_name.as_str(),
                container,
                options.clone(),
                &colors,
                sink.clone(),
            ));
            handles.push(session.clone().start(pods.clone(), cancel.clone()));
            sessions.push(session);
        }
    }
    drop(sink);

    if sessions.is_empty() {
        anyhow::bail!("No containers to tail in namespace {}", namespace);
    }
    debug!(
        "[{}] Tailing {} containers across {} pods",
        context,
        sessions.len(),
        colors.len()
    );

    let all_done = futures::future::join_all(handles);
    tokio::pin!(all_done);
    let finished = tokio::select! {
        results = &mut all_done => Some(results),
        _ = tokio::signal::ctrl_c() => None,
    };
    let results = match finished {
        Some(results) => results,
        None => {
            info!("Interrupted, closing log streams");
            cancel.cancel();
            all_done.await
        }
    };

    for result in results {
        if let Err(e) = result {
            warn!("Tail task failed: {}", e);
        }
    }

    let failed = sessions
        .iter()
        .filter(|s| s.state() == SessionState::Failed)
        .count();
    let total = sessions.len();
    drop(sessions);
    printer.await?;

    if failed == total {
        anyhow::bail!("Could not open any log stream");
    }
    Ok(())
}
