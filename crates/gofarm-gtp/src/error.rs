// ABOUTME: Error types for gofarm-gtp
// ABOUTME: Every protocol failure carries the member id and offending command as plain data

use thiserror::Error;

/// Errors that can occur on a single GTP exchange.
///
/// All variants carry owned data only, so an error stays valid after
/// the client that produced it has been torn down. None of these are
/// retried by the client; the farm treats each as session-fatal.
#[derive(Debug, Error)]
pub enum GtpError {
    #[error("failed to spawn engine process `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("engine {id} has already terminated, cannot send `{command}`")]
    AlreadyTerminated { id: String, command: String },

    #[error("engine {id}: pipe failure during `{command}`: {source}")]
    Transport {
        id: String,
        command: String,
        source: std::io::Error,
    },

    #[error("engine {id} exited unexpectedly during `{command}`")]
    UnexpectedExit { id: String, command: String },

    #[error("engine {id}: empty response to `{command}` - interrupted command?")]
    InterruptedCommand { id: String, command: String },

    #[error("engine {id}: command `{command}` failed: {message}")]
    CommandFailed {
        id: String,
        command: String,
        message: String,
    },

    #[error("engine {id}: unrecognized response to `{command}`: {response:?}")]
    ProtocolViolation {
        id: String,
        command: String,
        response: String,
    },
}
