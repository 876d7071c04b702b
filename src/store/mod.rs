pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Local key-value storage. Every persisted feature (guestbook, visitor
/// counter) reads and writes through here under its own namespaced key.
/// Implementations: `SqliteStorage` (rusqlite/r2d2) and `MemoryStorage`.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    /// Removing a key that is not there is not an error.
    fn remove(&self, key: &str) -> Result<(), String>;

    fn get_i64(&self, key: &str) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Build a namespaced storage key, e.g. `kuranie_guestbook_v1`.
pub fn namespaced(namespace: &str, name: &str) -> String {
    format!("{}_{}_v1", namespace, name)
}
