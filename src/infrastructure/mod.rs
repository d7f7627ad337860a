pub mod in_memory;
pub mod order_file;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod stripe;
