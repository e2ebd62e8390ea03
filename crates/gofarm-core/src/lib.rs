// ABOUTME: Farm multiplexer for GTP engine processes
// ABOUTME: Fans each operator command out to a master and N-1 slaves and returns the master's reply

mod farm;
mod member;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use farm::{Farm, FarmOptions};
pub use member::{Exchange, FarmMember, Role};
pub use session::run_session;
