//! HTTP/JSON and RPC transports over the ads board.

pub mod errors;
pub mod filters;
pub mod presenters;
pub mod routes;
pub mod rpc;
pub mod startup;
pub mod state;

pub use startup::run;
pub use state::ServerState;
