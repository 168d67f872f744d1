use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client, api::LogParams, config};
use tracing::info;

use crate::error::BoxError;
use crate::session::{LogSource, LogStream};

impl LogSource for Api<Pod> {
    async fn open_stream<'a>(
        &'a self,
        pod_name: &'a str,
        params: &'a LogParams,
    ) -> Result<LogStream<'a>, BoxError> {
        let stream = self.log_stream(pod_name, params).await?;
        Ok(Box::pin(stream))
    }
}

/// Connect to the cluster named by `context`, falling back to whatever
/// `Config::infer` picks (kubeconfig current context, then in-cluster).
/// Returns a label for log messages along with the client.
pub async fn initialize_client(context: Option<&str>) -> anyhow::Result<(String, Client)> {
    let (label, config) = match context {
        Some(name) => {
            let kubeconfig = config::Kubeconfig::read()?;
            (name.to_string(), context_config(kubeconfig, name).await?)
        }
        None => {
            let label = config::Kubeconfig::read()
                .ok()
                .and_then(|kubeconfig| kubeconfig.current_context)
                .unwrap_or_else(|| "in-cluster".to_string());
            (label, config::Config::infer().await?)
        }
    };

    let client = Client::try_from(config)?;
    info!("[{}] Connected, default namespace {}", label, client.default_namespace());
    Ok((label, client))
}

async fn context_config(kubeconfig: config::Kubeconfig, name: &str) -> anyhow::Result<config::Config> {
    let options = config::KubeConfigOptions {
        context: Some(name.to_string()),
        ..Default::default()
    };
    config::Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| anyhow::anyhow!("cannot load kubeconfig context {}: {}", name, e))
}

/// Containers to tail for `pod_name`: the requested one, or every
/// container in the pod spec.
pub async fn container_names(
    api: &Api<Pod>,
    pod_name: &str,
    container: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    if let Some(cont) = container {
        return Ok(vec![cont.to_string()]);
    }

    let pod = api
        .get(pod_name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to get pod {} for containers: {}", pod_name, e))?;
    let names: Vec<String> = pod
        .spec
        .map(|spec| spec.containers.into_iter().map(|c| c.name).collect())
        .unwrap_or_default();
    if names.is_empty() {
        anyhow::bail!("Pod {} has no containers", pod_name);
    }
    Ok(names)
}
