// ABOUTME: Farm member types: the Master/Slave role tag and the Exchange seam
// ABOUTME: FarmMember pairs a GtpClient with the role it was assigned at construction

use async_trait::async_trait;
use gofarm_gtp::{GtpClient, GtpError};

/// Role of a farm member, assigned once at construction.
///
/// Broadcast logic branches on this tag rather than on member index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave,
}

/// One write-then-read participant in a farm broadcast.
///
/// The farm drives members through this trait so a broadcast can issue
/// every write before attempting any read. Implemented by
/// [`FarmMember`] in production and by scripted mocks in tests.
#[async_trait]
pub trait Exchange: Send {
    fn id(&self) -> &str;
    fn role(&self) -> Role;

    /// Write one command without reading its response.
    async fn send(&mut self, command: &str) -> Result<(), GtpError>;

    /// Read the response to the most recently sent command.
    async fn receive(&mut self) -> Result<String, GtpError>;
}

/// A [`GtpClient`] tagged with its farm role.
pub struct FarmMember {
    client: GtpClient,
    role: Role,
}

impl FarmMember {
    pub fn new(client: GtpClient, role: Role) -> Self {
        Self { client, role }
    }
}

#[async_trait]
impl Exchange for FarmMember {
    fn id(&self) -> &str {
        self.client.id()
    }

    fn role(&self) -> Role {
        self.role
    }

    async fn send(&mut self, command: &str) -> Result<(), GtpError> {
        self.client.send(command).await
    }

    async fn receive(&mut self) -> Result<String, GtpError> {
        self.client.receive().await
    }
}
