use crate::errors::Result;

/// Key/value storage for user preferences that outlive a session.
pub trait PreferenceStore: Send + Sync {
    /// `None` when the key was never written.
    fn get_preference(&self, key: &str) -> Result<Option<String>>;

    fn set_preference(&self, key: &str, value: &str) -> Result<()>;
}
