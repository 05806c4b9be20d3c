//! Serial protocol spoken with the vision host.
//!
//! Inbound: single ASCII bytes, decoded by [`interpreter::CommandInterpreter`].
//! Outbound: newline-terminated status lines, rendered by [`status`].

pub mod interpreter;
pub mod status;
