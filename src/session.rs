use crossterm::style::{Color, Stylize};
use futures::io::{AsyncBufRead, AsyncBufReadExt};
use kube::api::LogParams;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::color::{ColorPair, ColorRegistry};
use crate::error::{BoxError, SessionError};
use crate::filter::should_keep;
use crate::flatten::flatten;
use crate::types::TailOptions;

/// Byte stream of newline-terminated log records. Dropping it closes it.
pub type LogStream<'a> = Pin<Box<dyn AsyncBufRead + Send + 'a>>;

/// Receives formatted, colorized text chunks from sessions.
pub type Sink = mpsc::UnboundedSender<String>;

/// Opens log streams for a container of a pod.
pub trait LogSource: Send + Sync {
    fn open_stream<'a>(
        &'a self,
        pod_name: &'a str,
        params: &'a LogParams,
    ) -> impl Future<Output = Result<LogStream<'a>, BoxError>> + Send + 'a;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Streaming,
    Closed,
    /// The stream could not be opened. Terminal.
    Failed,
}

/// Tails the logs of one container.
pub struct TailSession {
    pub namespace: String,
    pub pod_name: String,
    pub container_name: String,
    options: Arc<TailOptions>,
    colors: ColorPair,
    sink: Sink,
    closed: CancellationToken,
    close_once: AtomicBool,
    state: Mutex<SessionState>,
}

impl TailSession {
    pub fn new(
        namespace: impl Into<String>,
        pod_name: impl Into<String>,
        container_name: impl Into<String>,
        options: Arc<TailOptions>,
        registry: &ColorRegistry,
        sink: Sink,
    ) -> Self {
        let pod_name = pod_name.into();
        let colors = registry.color_for(&pod_name);
        Self {
            namespace: namespace.into(),
            pod_name,
            container_name: container_name.into(),
            options,
            colors,
            sink,
            closed: CancellationToken::new(),
            close_once: AtomicBool::new(false),
            state: Mutex::new(SessionState::Created),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    /// Spawn [`TailSession::run`] on the runtime.
    pub fn start<S>(
        self: Arc<Self>,
        source: Arc<S>,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<(), SessionError>>
    where
        S: LogSource + 'static,
    {
        tokio::spawn(async move { self.run(source.as_ref(), &cancel).await })
    }

    /// Announce the session, open the stream and forward lines to the sink
    /// until the stream ends, `cancel` fires or [`TailSession::close`] is
    /// called. A failure to open the stream is returned and not retried.
    pub async fn run<S: LogSource>(
        &self,
        source: &S,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        // Closed is absorbing: a session closed before it ran stays silent.
        if self.close_once.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.announce_open();

        let params = self.log_params();
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            _ = self.closed.cancelled() => None,
            opened = source.open_stream(&self.pod_name, &params) => Some(opened),
        };

        let stream = match opened {
            Some(Ok(stream)) => stream,
            Some(Err(cause)) => {
                *self.state.lock() = SessionState::Failed;
                let err = SessionError::Open {
                    namespace: self.namespace.clone(),
                    pod: self.pod_name.clone(),
                    container: self.container_name.clone(),
                    source: cause,
                };
                debug!("{}", err);
                self.emit(format!("{}\n", err));
                return Err(err);
            }
            None => {
                debug!(
                    "Cancelled before stream to {}/{}/{} opened",
                    self.namespace, self.pod_name, self.container_name
                );
                self.close();
                return Ok(());
            }
        };

        {
            let mut state = self.state.lock();
            if *state == SessionState::Created {
                *state = SessionState::Streaming;
            }
        }

        self.read_lines(stream, cancel).await;
        self.close();
        Ok(())
    }

    /// Stop tailing. Safe to call any number of times, before or after
    /// cancellation; the closing banner is printed once. A `Failed` session
    /// never streamed, so it gets no closing banner.
    pub fn close(&self) {
        if self.close_once.swap(true, Ordering::SeqCst) {
            return;
        }
        self.closed.cancel();

        {
            let mut state = self.state.lock();
            if *state == SessionState::Failed {
                return;
            }
            *state = SessionState::Closed;
        }

        let minus = "-".with(Color::Red).bold();
        let pod = self.pod_name.as_str().with(self.colors.pod);
        if self.options.show_namespace {
            let namespace = self.namespace.as_str().with(self.colors.pod);
            self.emit(format!("{} {} {}\n", minus, namespace, pod));
        } else {
            self.emit(format!("{} {}\n", minus, pod));
        }
    }

    /// Format one already filtered line and send it to the sink. Returns
    /// false if nobody is listening anymore.
    pub fn print(&self, msg: &str) -> bool {
        let msg = if self.options.structured {
            flatten(msg)
        } else {
            msg.to_string()
        };

        let pod = self.pod_name.as_str().with(self.colors.pod);
        let container = self.container_name.as_str().with(self.colors.container);
        let mut text = if self.options.show_namespace {
            let namespace = self.namespace.as_str().with(self.colors.pod);
            format!("{} {} {} {}", namespace, pod, container, msg)
        } else {
            format!("{} {} {}", pod, container, msg)
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.emit(text)
    }

    fn announce_open(&self) {
        let plus = "+".with(Color::Green).bold();
        let pod = self.pod_name.as_str().with(self.colors.pod);
        let container = self.container_name.as_str().with(self.colors.container);
        if self.options.show_namespace {
            let namespace = self.namespace.as_str().with(self.colors.pod);
            self.emit(format!("{} {} {} › {}\n", plus, namespace, pod, container));
        } else {
            self.emit(format!("{} {} › {}\n", plus, pod, container));
        }
    }

    fn log_params(&self) -> LogParams {
        LogParams {
            follow: true,
            timestamps: self.options.timestamps,
            container: Some(self.container_name.clone()),
            since_seconds: (self.options.since_seconds > 0).then_some(self.options.since_seconds),
            tail_lines: self.options.tail_lines,
            ..Default::default()
        }
    }

    async fn read_lines(&self, mut stream: LogStream<'_>, cancel: &CancellationToken) {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.closed.cancelled() => break,
                read = stream.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    if !should_keep(&line, &self.options.exclude) {
                        continue;
                    }
                    if !self.print(&line) {
                        break;
                    }
                }
                Err(e) => {
                    debug!(
                        "Log stream for {}/{}/{} ended: {}",
                        self.namespace, self.pod_name, self.container_name, e
                    );
                    break;
                }
            }
        }
        // The stream is dropped, and so closed, exactly once here.
        drop(stream);
    }

    fn emit(&self, text: String) -> bool {
        self.sink.send(text).is_ok()
    }
}
