#![cfg(test)]
use crate::board::InMemoryBoard;

/// Fresh board over empty stores; each test gets its own state.
pub fn board() -> InMemoryBoard {
    InMemoryBoard::in_memory()
}
