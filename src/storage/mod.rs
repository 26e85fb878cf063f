pub mod memory;
pub mod traits;

pub use memory::MemoryUserStore;
pub use traits::{SharedUserStore, UserStore};
