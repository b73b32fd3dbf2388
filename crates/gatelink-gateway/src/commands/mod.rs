//! Built-in slash commands.

pub mod location;

use std::sync::Arc;

use crate::dispatch::CommandRegistry;

pub use location::{AddLocalCommand, LocalCommand, LocationBook};

/// Register every built-in command against a shared location book.
pub fn register_builtin(registry: &CommandRegistry, book: Arc<LocationBook>) {
    registry.register(Arc::new(AddLocalCommand::new(Arc::clone(&book))));
    registry.register(Arc::new(LocalCommand::new(book)));
}
