pub mod server;

pub use server::{CommandServer, CommandServerConfig};
