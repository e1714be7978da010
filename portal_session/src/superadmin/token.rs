use std::sync::Mutex;

/// Where the superadmin bearer token lives between requests.
///
/// The console embeds this trait so hosts can plug in whatever persistence
/// they have (keyring, encrypted file); [`MemoryTokenStore`] keeps it for
/// the process lifetime only.
pub trait TokenStore: Send + Sync {
    fn set(&self, token: &str);
    fn get(&self) -> Option<String>;
    fn clear(&self);
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock only means a panicked writer; the token itself is valid.
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, token: &str) {
        *self.slot() = Some(token.to_string());
    }

    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        store.set("tok-1");
        assert_eq!(store.get().as_deref(), Some("tok-1"));

        store.set("tok-2");
        assert_eq!(store.get().as_deref(), Some("tok-2"));

        store.clear();
        assert!(store.get().is_none());

        // Clearing an empty store is fine
        store.clear();
        assert!(store.get().is_none());
    }
}
