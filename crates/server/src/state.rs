use std::sync::Arc;

use service::InMemoryBoard;

/// Shared by every handler of both transports.
#[derive(Clone)]
pub struct ServerState {
    pub board: Arc<InMemoryBoard>,
}

impl ServerState {
    pub fn new(board: Arc<InMemoryBoard>) -> Self { Self { board } }

    /// State over a fresh, empty board.
    pub fn in_memory() -> Self { Self::new(Arc::new(InMemoryBoard::in_memory())) }
}
