// storage/mod.rs
// SQLite persistence for discovered nodes

pub mod nodes;
pub mod pool;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use nodes::NodeStore;
pub use pool::init_db_pool_with_path;
