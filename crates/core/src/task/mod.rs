//! Task grammar: the checkbox line format, content-hash identity, and the
//! selector policy.

mod codec;
mod selector;
mod types;

pub use selector::Selector;
pub use types::{DATE_FORMAT, Priority, Recurrence, Task};
