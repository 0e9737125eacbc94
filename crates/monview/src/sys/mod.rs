pub mod http;
pub mod runtime;
pub mod server;
pub mod sessions;
