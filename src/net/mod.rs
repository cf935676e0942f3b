//! Wire protocol plumbing: the streaming line decoder, the inbound command
//! server, and the outbound direction dispatcher. Everything speaks ASCII,
//! one newline-terminated token per line, over long-lived TCP connections.

pub mod codec;
pub mod dispatcher;
pub mod server;

pub use codec::CommandDecoder;
pub use dispatcher::DirectionDispatcher;
pub use server::CommandServer;
