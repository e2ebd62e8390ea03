// ABOUTME: GTP protocol client library for gofarm
// ABOUTME: Spawns one engine subprocess and runs blank-line-delimited request/response exchanges

mod client;
mod error;
mod mirror;

pub use client::{ClientOptions, GtpClient, QUIT_COMMAND};
pub use error::GtpError;
pub use mirror::MirrorSink;
