// ABOUTME: The Farm: an ordered collection of engine members behind one dispatch surface
// ABOUTME: Implements the genmove rewrite and write-all-then-read-all broadcasts

use crate::member::{Exchange, FarmMember, Role};
use anyhow::Context;
use gofarm_gtp::{ClientOptions, GtpClient, GtpError, QUIT_COMMAND};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const GENMOVE: &str = "genmove";
const REG_GENMOVE: &str = "reg_genmove";
const PLAY: &str = "play";

/// Configuration for building a farm of engine processes.
#[derive(Debug, Clone)]
pub struct FarmOptions {
    /// Number of engine processes; the first is the master.
    pub processes: usize,
    /// Launch command template for the master engine.
    pub master_command: String,
    /// Launch command template for slave engines.
    pub slave_command: String,
    /// Extra arguments appended to every launch command.
    pub engine_args: String,
    /// Log every exchange at INFO.
    pub verbose: bool,
    /// Base path for per-member command transcripts
    /// (`<path>.<ordinal>`); `None` disables transcripts.
    pub transcript: Option<PathBuf>,
}

/// An ordered farm of engine members. Member 0 is the master; the
/// order is fixed at construction and never changes.
pub struct Farm<E: Exchange> {
    members: Vec<E>,
    session_active: bool,
}

impl Farm<FarmMember> {
    /// Spawn one engine process per member. Construction is atomic:
    /// the first spawn failure aborts the whole farm.
    pub fn spawn(options: &FarmOptions) -> anyhow::Result<Self> {
        anyhow::ensure!(
            options.processes >= 1,
            "farm requires at least one engine process"
        );

        let mut members = Vec::with_capacity(options.processes);
        for ordinal in 0..options.processes {
            let role = if ordinal == 0 { Role::Master } else { Role::Slave };
            let template = match role {
                Role::Master => &options.master_command,
                Role::Slave => &options.slave_command,
            };

            // Each engine learns its ordinal and derives its random
            // seed from it, so the processes differentiate themselves.
            let mut launch = format!("{template} -Process {ordinal} -RandomSeed {ordinal}");
            if !options.engine_args.is_empty() {
                launch.push(' ');
                launch.push_str(&options.engine_args);
            }

            let id = format!("gofarm.{ordinal}");
            let mut client = GtpClient::spawn(
                &launch,
                &id,
                ClientOptions {
                    verbose: options.verbose,
                },
            )
            .with_context(|| format!("spawning farm member {ordinal}"))?;

            if let Some(base) = &options.transcript {
                let path = transcript_path(base, ordinal);
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("creating transcript {}", path.display()))?;
                client.attach_mirror(file);
            }

            members.push(FarmMember::new(client, role));
        }

        info!(processes = options.processes, "farm is ready");
        Ok(Self::from_members(members))
    }
}

impl<E: Exchange> Farm<E> {
    /// Build a farm from pre-constructed members. Member 0 must be the
    /// master.
    pub fn from_members(members: Vec<E>) -> Self {
        assert!(!members.is_empty(), "farm requires at least one member");
        Self {
            members,
            session_active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session_active
    }

    /// Map one operator line through the dispatch rule and return the
    /// master's result.
    ///
    /// `genmove` is rewritten per role: the master plays its move, the
    /// slaves produce a non-committing candidate via `reg_genmove`,
    /// and the master's move is then echoed to the slaves as a `play`
    /// so every board stays in lockstep. Everything else is broadcast
    /// verbatim. Any member error aborts the dispatch; a half-applied
    /// broadcast is not a valid state to continue from.
    pub async fn dispatch(&mut self, raw: &str) -> Result<String, GtpError> {
        let raw = raw.trim();
        let mut parts = raw.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let args = parts.next().map(str::trim).unwrap_or_default();

        if name == GENMOVE {
            let commands: Vec<String> = self
                .members
                .iter()
                .map(|member| match member.role() {
                    Role::Master => join_command(GENMOVE, args),
                    Role::Slave => join_command(REG_GENMOVE, args),
                })
                .collect();
            let mut results = self.broadcast(commands).await?;
            let chosen = results.swap_remove(0);

            let play = if args.is_empty() {
                format!("{PLAY} {chosen}")
            } else {
                format!("{PLAY} {args} {chosen}")
            };
            self.broadcast_slaves(&play).await?;

            Ok(chosen)
        } else {
            let commands = vec![raw.to_string(); self.members.len()];
            let mut results = self.broadcast(commands).await?;
            Ok(results.swap_remove(0))
        }
    }

    /// Send `quit` to every member, best effort. A clean exit after
    /// `quit` is the expected termination; anything else is logged and
    /// ignored.
    pub async fn quit(&mut self) {
        for member in &mut self.members {
            if let Err(e) = member.send(QUIT_COMMAND).await {
                warn!(id = member.id(), error = %e, "quit write failed");
            }
        }
        for member in &mut self.members {
            if let Err(e) = member.receive().await {
                warn!(id = member.id(), error = %e, "quit response failed");
            }
        }
        self.session_active = false;
    }

    /// Issue one command per member, writing to every member before
    /// reading from any, then collect results in member order.
    ///
    /// The write-all-then-read-all ordering is what lets the engines
    /// compute concurrently while the controller blocks on responses
    /// sequentially; a read before the last write would serialize
    /// them.
    async fn broadcast(&mut self, commands: Vec<String>) -> Result<Vec<String>, GtpError> {
        debug_assert_eq!(commands.len(), self.members.len());
        for (member, command) in self.members.iter_mut().zip(&commands) {
            member.send(command).await?;
        }
        let mut results = Vec::with_capacity(self.members.len());
        for member in &mut self.members {
            results.push(member.receive().await?);
        }
        Ok(results)
    }

    /// Broadcast one command to slave members only, same write-all
    /// ordering.
    async fn broadcast_slaves(&mut self, command: &str) -> Result<(), GtpError> {
        for member in self.members.iter_mut().filter(|m| m.role() == Role::Slave) {
            member.send(command).await?;
        }
        for member in self.members.iter_mut().filter(|m| m.role() == Role::Slave) {
            member.receive().await?;
        }
        Ok(())
    }
}

fn join_command(name: &str, args: &str) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{name} {args}")
    }
}

fn transcript_path(base: &Path, ordinal: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{ordinal}"));
    PathBuf::from(name)
}
