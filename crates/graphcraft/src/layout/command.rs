//! External layout process
//!
//! Runs a program that reads an ELK JSON graph on stdin and writes the laid
//! out graph on stdout, e.g. a small `elkjs` wrapper script. The process runs
//! on a helper thread and its answer comes back through a oneshot channel.

use anyhow::{anyhow, Result};
use futures::channel::oneshot;
use futures::future::BoxFuture;
use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, span, warn, Level};

use super::{LayoutBackend, LayoutRequest, LayoutResponse};
use crate::core::{CommandConfig, EdgeRouting, GraphError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Layout delegated to an external command
#[derive(Debug, Clone)]
pub struct CommandBackend {
    config: CommandConfig,
}

impl CommandBackend {
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }
}

fn read_pipe(pipe: Option<impl Read + Send + 'static>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut text);
        }
        text
    })
}

fn wait_with_deadline(child: &mut Child, config: &CommandConfig) -> Result<std::process::ExitStatus> {
    let Some(millis) = config.timeout_ms else {
        return Ok(child.wait()?);
    };

    let deadline = Instant::now() + Duration::from_millis(millis);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!(program = %config.program, millis, "Layout command timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(GraphError::LayoutTimeout {
                backend: config.program.clone(),
                millis,
            }
            .into());
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Run the command to completion on the current thread
fn run_command(config: &CommandConfig, payload: String) -> Result<LayoutResponse> {
    let run_span = span!(Level::INFO, "layout_command", program = %config.program);
    let _enter = run_span.enter();

    let mut child = Command::new(&config.program)
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GraphError::layout_error(format!("failed to start '{}': {}", config.program, e)))?;

    // Feed stdin from its own thread so a chatty child cannot fill stdout first
    let stdin = child.stdin.take();
    let writer = thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            let _ = stdin.write_all(payload.as_bytes());
        }
    });
    let stdout = read_pipe(child.stdout.take());
    let stderr = read_pipe(child.stderr.take());

    let status = match wait_with_deadline(&mut child, config) {
        Ok(status) => status,
        Err(err) => {
            // Pipe threads stay detached until every holder of the pipes exits
            drop((writer, stdout, stderr));
            return Err(err);
        }
    };
    let _ = writer.join();
    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();
    debug!(?status, stdout_len = stdout.len(), "Layout command finished");

    if !status.success() {
        return Err(GraphError::layout_error(format!(
            "'{}' exited with {}: {}",
            config.program,
            status,
            stderr.trim()
        ))
        .into());
    }

    LayoutResponse::from_json(&stdout)
        .map_err(|e| GraphError::layout_error(format!("invalid response from '{}': {}", config.program, e)).into())
}

impl LayoutBackend for CommandBackend {
    fn name(&self) -> &'static str {
        "command"
    }

    fn algorithm(&self) -> &'static str {
        "layered"
    }

    fn preferred_routing(&self) -> EdgeRouting {
        EdgeRouting::Curved
    }

    fn layout<'a>(&'a self, request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>> {
        let config = self.config.clone();
        let payload = request.to_json();

        Box::pin(async move {
            let payload = payload?;
            let (tx, rx) = oneshot::channel();
            thread::Builder::new()
                .name("graphcraft-layout".to_string())
                .spawn(move || {
                    let _ = tx.send(run_command(&config, payload));
                })?;

            rx.await
                .map_err(|_| anyhow!(GraphError::layout_error("layout worker exited without answering")))?
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::NodeSpec;
    use crate::layout::LayoutOptions;
    use futures::executor::block_on;

    fn request() -> LayoutRequest {
        LayoutRequest::new(&[NodeSpec::new("A")], &[], &LayoutOptions::default(), "layered")
    }

    fn shell(script: &str) -> CommandConfig {
        CommandConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            timeout_ms: Some(5_000),
        }
    }

    #[test]
    fn test_reads_response_from_stdout() {
        let backend = CommandBackend::new(shell(
            r#"cat > /dev/null; echo '{"children":[{"id":"A","x":3,"y":4}]}'"#,
        ));
        let response = block_on(backend.layout(&request())).unwrap();
        assert_eq!(response.children.len(), 1);
        assert_eq!(response.children[0].x, 3.0);
    }

    #[test]
    fn test_nonzero_exit_is_layout_error() {
        let backend = CommandBackend::new(shell("echo broken >&2; exit 3"));
        let err = block_on(backend.layout(&request())).unwrap_err();
        match err.downcast_ref::<GraphError>() {
            Some(GraphError::LayoutError { message }) => assert!(message.contains("broken")),
            other => panic!("Expected LayoutError, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_kills_the_process() {
        let mut config = shell("sleep 5");
        config.timeout_ms = Some(50);
        let err = block_on(CommandBackend::new(config).layout(&request())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::LayoutTimeout { millis: 50, .. })
        ));
    }

    #[test]
    fn test_timeout_does_not_wait_for_grandchild() {
        let mut config = shell("(sleep 3; echo late) & wait");
        config.timeout_ms = Some(50);
        let started = Instant::now();
        let err = block_on(CommandBackend::new(config).layout(&request())).unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::LayoutTimeout { .. })
        ));
    }

    #[test]
    fn test_missing_program() {
        let backend = CommandBackend::new(CommandConfig::new("graphcraft-no-such-program"));
        assert!(block_on(backend.layout(&request())).is_err());
    }
}
