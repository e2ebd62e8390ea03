// ABOUTME: Test doubles for farm tests
// ABOUTME: MockMember records a global send/receive event log shared across members

use crate::member::{Exchange, Role};
use async_trait::async_trait;
use gofarm_gtp::GtpError;
use std::sync::{Arc, Mutex};

/// One observable step across the whole farm, in wall-clock order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Send(String, String),
    Receive(String),
}

pub(crate) type EventLog = Arc<Mutex<Vec<Event>>>;

pub(crate) struct MockMember {
    id: String,
    role: Role,
    log: EventLog,
    pending: Option<String>,
    responder: Box<dyn FnMut(&str) -> Result<String, GtpError> + Send>,
}

impl MockMember {
    pub(crate) fn new(
        id: &str,
        role: Role,
        log: EventLog,
        responder: impl FnMut(&str) -> Result<String, GtpError> + Send + 'static,
    ) -> Self {
        Self {
            id: id.to_string(),
            role,
            log,
            pending: None,
            responder: Box::new(responder),
        }
    }
}

#[async_trait]
impl Exchange for MockMember {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        self.role
    }

    async fn send(&mut self, command: &str) -> Result<(), GtpError> {
        self.log
            .lock()
            .unwrap()
            .push(Event::Send(self.id.clone(), command.to_string()));
        self.pending = Some(command.to_string());
        Ok(())
    }

    async fn receive(&mut self) -> Result<String, GtpError> {
        self.log.lock().unwrap().push(Event::Receive(self.id.clone()));
        let command = self.pending.take().expect("receive without a prior send");
        (self.responder)(&command)
    }
}

/// A responder for a well-behaved engine: canned move replies, empty
/// reply to everything else.
pub(crate) fn scripted(best_move: &'static str) -> impl FnMut(&str) -> Result<String, GtpError> {
    move |command: &str| {
        if command.starts_with("genmove") || command.starts_with("reg_genmove") {
            Ok(best_move.to_string())
        } else if command == gofarm_gtp::QUIT_COMMAND {
            Ok(String::new())
        } else {
            Ok("ok".to_string())
        }
    }
}
