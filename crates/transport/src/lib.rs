//! TCP transport for Typer: the sequential listener, the per-connection
//! session protocol, and a client for reading the stream back.
//!
//! There is no framing on the wire. A client sends one prompt of at most
//! [`PROMPT_BUFFER`] bytes and then receives raw chunk bytes until the
//! server closes the connection.

pub use {
    client::Connection,
    config::{ListenMode, ServerConfig},
    listener::{Listener, ServeStats},
    session::{Outcome, PROMPT_BUFFER, Session, SessionError, SessionPolicy},
    window::LineWindow,
};

pub mod client;
mod config;
mod listener;
mod session;
pub mod window;
