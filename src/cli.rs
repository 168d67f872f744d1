use clap::Parser;
use std::time::Duration;

use stern_tail::filter::compile_patterns;
use stern_tail::types::TailOptions;

#[derive(Parser)]
#[command(name = "stern-tail")]
#[command(about = "Tail and colorize logs from every container of Kubernetes pods")]
pub struct Cli {
    /// Pods to tail
    #[arg(required = true)]
    pub pods: Vec<String>,

    /// Namespace (defaults to the kubeconfig namespace)
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Context
    #[arg(long)]
    pub context: Option<String>,

    /// Container name (defaults to every container in the pod)
    #[arg(short = 'c', long)]
    pub container: Option<String>,

    /// Print timestamps
    #[arg(short = 't', long)]
    pub timestamps: bool,

    /// Return logs newer than a relative duration like 5s, 2m, or 3h
    #[arg(short = 's', long, default_value = "48h", value_parser = parse_since)]
    pub since: Duration,

    /// Number of lines from the end of the logs to show
    #[arg(long)]
    pub tail: Option<i64>,

    /// Print the namespace in front of each line
    #[arg(long)]
    pub show_namespace: bool,

    /// Flatten JSON log lines into key=value pairs
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Regex of log lines to exclude (repeatable)
    #[arg(short = 'e', long)]
    pub exclude: Vec<String>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn tail_options(&self) -> anyhow::Result<TailOptions> {
        Ok(TailOptions {
            timestamps: self.timestamps,
            since_seconds: i64::try_from(self.since.as_secs())?,
            tail_lines: self.tail,
            show_namespace: self.show_namespace,
            structured: self.json,
            exclude: compile_patterns(&self.exclude)?,
        })
    }
}

pub fn parse_since(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| format!("invalid duration '{}': {}", s, e))
}
