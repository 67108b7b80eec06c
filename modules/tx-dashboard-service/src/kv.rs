//! Key-value persistence seam.
//!
//! Everything the dashboard keeps across restarts (transaction state, auth
//! tokens, the remembered user) lives under a handful of string keys, the same
//! way a browser keeps them in local storage.

#[cfg(test)]
pub use memory::MemoryKv;

pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), String>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("k").unwrap(), None);

        kv.set("k", "v1").unwrap();
        kv.set("k", "v2").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(kv.len(), 1);

        kv.remove("k").unwrap();
        kv.remove("k").unwrap();
        assert_eq!(kv.get("k").unwrap(), None);
    }

    #[test]
    fn test_failing_writes() {
        let kv = MemoryKv::new();
        kv.fail_writes(true);
        assert!(kv.set("k", "v").is_err());
        kv.fail_writes(false);
        assert!(kv.set("k", "v").is_ok());

        kv.fail_reads(true);
        assert!(kv.get("k").is_err());
    }
}
