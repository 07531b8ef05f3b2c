pub mod atomic_writer;
pub mod local_storage;
pub mod memory_storage;

pub use atomic_writer::AtomicWriter;
pub use local_storage::LocalStorage;
pub use memory_storage::MemoryStorage;
