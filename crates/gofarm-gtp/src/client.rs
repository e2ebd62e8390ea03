// ABOUTME: GTP client owning one engine subprocess and its stdio pipe pair
// ABOUTME: Implements blank-line-delimited exchanges with liveness detection and =/? status parsing

use crate::error::GtpError;
use crate::mirror::MirrorSink;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, trace, warn};

/// The GTP command that asks an engine to exit cleanly.
///
/// A successful exit observed while this was the outgoing command is
/// the expected termination, not a failure.
pub const QUIT_COMMAND: &str = "quit";

/// Logging configuration for a client, passed at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    /// Log every exchange at INFO instead of TRACE.
    pub verbose: bool,
}

/// Outcome of parsing an accumulated response body.
enum Parsed {
    /// Leading `=`: payload with the status character and one
    /// separator character stripped.
    Success(String),
    /// Leading `?`: the engine reported failure, message likewise
    /// stripped of the status prefix.
    Failure(String),
    /// Any other leading character.
    Malformed,
}

fn parse_body(body: &str) -> Parsed {
    let mut chars = body.chars();
    match chars.next() {
        Some('=') => {
            // Strip exactly one separator character after the status.
            chars.next();
            Parsed::Success(chars.as_str().to_string())
        }
        Some('?') => {
            // The message is the text after the status; tolerate a
            // missing separator rather than eat the first character.
            let message = chars.as_str();
            Parsed::Failure(message.strip_prefix(' ').unwrap_or(message).to_string())
        }
        _ => Parsed::Malformed,
    }
}

/// Client for a single GTP engine subprocess.
///
/// Owns the child process and both pipe ends exclusively. Requests are
/// written as a command line followed by a blank line; responses are
/// accumulated until a blank line. A subprocess exit observed at any
/// point other than directly after [`QUIT_COMMAND`] is fatal to this
/// client.
pub struct GtpClient {
    id: String,
    launch_command: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    last_command: String,
    last_result: String,
    alive: bool,
    mirrors: Vec<Box<dyn MirrorSink>>,
    options: ClientOptions,
}

impl std::fmt::Debug for GtpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GtpClient")
            .field("id", &self.id)
            .field("launch_command", &self.launch_command)
            .field("last_command", &self.last_command)
            .field("last_result", &self.last_result)
            .field("alive", &self.alive)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl GtpClient {
    /// Spawn the engine subprocess described by `launch_command`.
    ///
    /// The command line is split on whitespace; the first token is the
    /// program. stderr is inherited so engine diagnostics reach the
    /// operator's terminal directly.
    pub fn spawn(launch_command: &str, id: &str, options: ClientOptions) -> Result<Self, GtpError> {
        let mut tokens = launch_command.split_whitespace();
        let program = tokens.next().ok_or_else(|| GtpError::Spawn {
            command: launch_command.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty launch command"),
        })?;

        debug!(id, command = launch_command, "spawning engine process");

        let mut child = Command::new(program)
            .args(tokens)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GtpError::Spawn {
                command: launch_command.to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| GtpError::Spawn {
            command: launch_command.to_string(),
            source: std::io::Error::other("failed to capture engine stdin"),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| GtpError::Spawn {
            command: launch_command.to_string(),
            source: std::io::Error::other("failed to capture engine stdout"),
        })?;

        Ok(Self {
            id: id.to_string(),
            launch_command: launch_command.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            last_command: String::new(),
            last_result: String::new(),
            alive: true,
            mirrors: Vec::new(),
            options,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn launch_command(&self) -> &str {
        &self.launch_command
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn last_command(&self) -> &str {
        &self.last_command
    }

    /// The most recently parsed response payload. Only meaningful
    /// directly after a successful exchange.
    pub fn last_result(&self) -> &str {
        &self.last_result
    }

    /// Register a sink that receives a copy of every subsequent
    /// outgoing command. Audit only; mirror failures are logged and
    /// never fail an exchange.
    pub fn attach_mirror(&mut self, sink: impl MirrorSink + 'static) {
        self.mirrors.push(Box::new(sink));
    }

    /// Run one full exchange: write `command`, read one response.
    pub async fn exec(&mut self, command: &str) -> Result<String, GtpError> {
        self.send(command).await?;
        self.receive().await
    }

    /// Like [`exec`](Self::exec) but bounded by an optional deadline.
    ///
    /// `None` preserves the default behavior of blocking until the
    /// engine answers. When the deadline lapses the exchange is
    /// abandoned mid-stream, so the client is marked dead and the
    /// error surfaces as a `Transport` failure with a `TimedOut`
    /// source.
    pub async fn exec_with_deadline(
        &mut self,
        command: &str,
        deadline: Option<Duration>,
    ) -> Result<String, GtpError> {
        let Some(limit) = deadline else {
            return self.exec(command).await;
        };
        match tokio::time::timeout(limit, self.exec(command)).await {
            Ok(result) => result,
            Err(_) => {
                self.alive = false;
                Err(GtpError::Transport {
                    id: self.id.clone(),
                    command: command.to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("no response within {limit:?}"),
                    ),
                })
            }
        }
    }

    /// Write one command to the engine without reading the response.
    ///
    /// The farm writes to every member before reading from any, so the
    /// exchange is split into [`send`](Self::send) and
    /// [`receive`](Self::receive); `exec` is the two run back to back.
    pub async fn send(&mut self, command: &str) -> Result<(), GtpError> {
        if !self.alive {
            return Err(GtpError::AlreadyTerminated {
                id: self.id.clone(),
                command: command.to_string(),
            });
        }

        self.last_command = command.to_string();

        for mirror in &mut self.mirrors {
            if let Err(e) = mirror.record(command) {
                warn!(id = %self.id, error = %e, "mirror sink write failed");
            }
        }

        if self.options.verbose {
            info!(id = %self.id, command, "sending GTP command");
        } else {
            trace!(id = %self.id, command, "sending GTP command");
        }

        let wire = format!("{command}\n\n");
        self.stdin
            .write_all(wire.as_bytes())
            .await
            .map_err(|source| self.transport_error(source))?;
        self.stdin
            .flush()
            .await
            .map_err(|source| self.transport_error(source))?;

        Ok(())
    }

    /// Read one response, accumulating lines until a blank line.
    ///
    /// Engine liveness is checked before every line read. An exit is
    /// only tolerated directly after [`QUIT_COMMAND`] with a
    /// successful status; anywhere else it is `UnexpectedExit`.
    pub async fn receive(&mut self) -> Result<String, GtpError> {
        let mut body = String::new();
        loop {
            if let Some(status) = self
                .child
                .try_wait()
                .map_err(|source| self.transport_error(source))?
            {
                self.alive = false;
                if self.last_command == QUIT_COMMAND && status.success() {
                    trace!(id = %self.id, "engine exited cleanly after quit");
                    return Ok(String::new());
                }
                return Err(GtpError::UnexpectedExit {
                    id: self.id.clone(),
                    command: self.last_command.clone(),
                });
            }

            let mut line = String::new();
            let n = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|source| self.transport_error(source))?;

            if n == 0 {
                // Pipe closed: the engine exited while we were blocked.
                self.alive = false;
                let status = self
                    .child
                    .wait()
                    .await
                    .map_err(|source| self.transport_error(source))?;
                if self.last_command == QUIT_COMMAND && status.success() {
                    trace!(id = %self.id, "engine exited cleanly after quit");
                    return Ok(String::new());
                }
                return Err(GtpError::UnexpectedExit {
                    id: self.id.clone(),
                    command: self.last_command.clone(),
                });
            }

            let content = line.strip_suffix('\n').unwrap_or(&line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            if content.is_empty() {
                break;
            }
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(content);
        }

        // An empty body can only come from a desynchronized stream:
        // the previous exchange was interrupted before its terminator.
        if body.is_empty() {
            return Err(GtpError::InterruptedCommand {
                id: self.id.clone(),
                command: self.last_command.clone(),
            });
        }

        if self.options.verbose {
            info!(id = %self.id, response = %body, "received GTP response");
        } else {
            trace!(id = %self.id, response = %body, "received GTP response");
        }

        match parse_body(&body) {
            Parsed::Success(payload) => {
                self.last_result = payload.clone();
                Ok(payload)
            }
            Parsed::Failure(message) => Err(GtpError::CommandFailed {
                id: self.id.clone(),
                command: self.last_command.clone(),
                message,
            }),
            Parsed::Malformed => Err(GtpError::ProtocolViolation {
                id: self.id.clone(),
                command: self.last_command.clone(),
                response: body,
            }),
        }
    }

    fn transport_error(&self, source: std::io::Error) -> GtpError {
        GtpError::Transport {
            id: self.id.clone(),
            command: self.last_command.clone(),
            source,
        }
    }
}
