use std::sync::Arc;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::{
    api::{PredictError, PredictRequest, PredictionService},
    domain::PredictionResult,
    infrastructure::shutdown::ShutdownListener,
};

use super::{form::FormState, render::render_view};

const HELP: &str = "Type your comment, then an empty line to analyze. \
Commands: :clear, :health, :quit. \
Start a line with \\ to enter it literally (a lone \\ adds a blank line).";

type PendingRequest = BoxFuture<'static, Result<Vec<PredictionResult>, PredictError>>;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Analyze,
    Clear,
    Health,
    Quit,
    Text(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches('\r');
    if let Some(literal) = line.strip_prefix('\\') {
        return Command::Text(literal.to_string());
    }
    match line.trim() {
        "" => Command::Analyze,
        ":clear" => Command::Clear,
        ":health" => Command::Health,
        ":quit" | ":q" => Command::Quit,
        _ => Command::Text(line.to_string()),
    }
}

/// Line-oriented rendition of the comment form. Reads input from `R`, writes
/// the rendered view to `W`, and keeps at most one prediction request in
/// flight.
pub struct TerminalView<R, W> {
    lines: Lines<R>,
    out: W,
    form: FormState,
    service: Arc<dyn PredictionService>,
}

impl<R, W> TerminalView<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, out: W, service: Arc<dyn PredictionService>) -> Self {
        Self {
            lines: input.lines(),
            out,
            form: FormState::new(),
            service,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    pub async fn run(&mut self, mut shutdown: ShutdownListener) -> Result<()> {
        let mut pending: Option<PendingRequest> = None;
        self.write_notice(HELP).await?;
        self.write_view().await?;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.notified() => {
                    tracing::info!(target: "view", in_flight = pending.is_some(), "shutdown requested");
                    break;
                }
                outcome = wait_for(&mut pending) => {
                    pending = None;
                    self.form.finish_submit(outcome);
                    self.write_view().await?;
                }
                line = self.lines.next_line() => {
                    let Some(line) = line? else {
                        if let Some(request) = pending.take() {
                            tokio::select! {
                                biased;
                                _ = shutdown.notified() => {}
                                outcome = request => {
                                    self.form.finish_submit(outcome);
                                    self.write_view().await?;
                                }
                            }
                        }
                        break;
                    };

                    match parse_command(&line) {
                        Command::Quit => break,
                        Command::Clear => {
                            self.form.clear_input();
                            self.write_view().await?;
                        }
                        Command::Health => {
                            if !self.report_health(&mut shutdown).await? {
                                break;
                            }
                        }
                        Command::Analyze => match self.form.begin_submit() {
                            Some(request) => {
                                pending = Some(self.dispatch(request));
                                self.write_view().await?;
                            }
                            None if self.form.is_loading() => {
                                self.write_notice("A request is already in flight; wait for it to finish.")
                                    .await?;
                            }
                            None => self.write_notice("Type a comment before analyzing.").await?,
                        },
                        Command::Text(text) => self.form.append_line(&text),
                    }
                }
            }
        }

        self.out.flush().await?;
        Ok(())
    }

    fn dispatch(&self, request: PredictRequest) -> PendingRequest {
        let service = Arc::clone(&self.service);
        async move { service.predict(&request).await }.boxed()
    }

    /// Returns `false` when shutdown interrupted the check.
    async fn report_health(&mut self, shutdown: &mut ShutdownListener) -> Result<bool> {
        let outcome = tokio::select! {
            biased;
            _ = shutdown.notified() => {
                tracing::info!(target: "view", "shutdown requested during health check");
                return Ok(false);
            }
            outcome = self.service.health() => outcome,
        };
        let notice = match outcome {
            Ok(status) if status.is_healthy() => {
                format!("Service is healthy ({})", status.message)
            }
            Ok(status) => format!("Service reports status {:?}", status.status),
            Err(err) => {
                tracing::warn!(target: "view", error = %err, "health check failed");
                "Service is unreachable.".to_string()
            }
        };
        self.write_notice(&notice).await?;
        Ok(true)
    }

    async fn write_view(&mut self) -> Result<()> {
        let view = render_view(&self.form);
        self.out.write_all(b"\n").await?;
        self.out.write_all(view.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn write_notice(&mut self, notice: &str) -> Result<()> {
        self.out.write_all(notice.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }
}

async fn wait_for(
    pending: &mut Option<PendingRequest>,
) -> Result<Vec<PredictionResult>, PredictError> {
    match pending {
        Some(request) => request.await,
        None => std::future::pending().await,
    }
}
