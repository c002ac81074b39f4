//! Explicit UI context replacing an ambient global locale.
//!
//! Lifecycle: [`UiContext::load`] reads the stored preference, subscribers
//! follow [`UiContext::set_locale`] through a `watch` channel, and
//! [`UiContext::dispose`] closes that channel so every subscription ends.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use tokio::sync::watch;

use super::messages::Messages;
use super::settings_model::{Locale, LOCALE_PREFERENCE_KEY};
use super::settings_traits::PreferenceStore;
use crate::errors::{Error, Result};

pub struct UiContext {
    prefs: Arc<dyn PreferenceStore>,
    sender: Mutex<Option<watch::Sender<Locale>>>,
    current: watch::Receiver<Locale>,
}

impl UiContext {
    /// Resolve the initial locale: the stored preference when it is valid,
    /// otherwise Russian for a Russian system language, otherwise English.
    pub fn load(prefs: Arc<dyn PreferenceStore>, system_language: Option<&str>) -> Self {
        let stored = match prefs.get_preference(LOCALE_PREFERENCE_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read locale preference: {}", e);
                None
            }
        };

        let locale = stored
            .and_then(|value| value.parse::<Locale>().ok())
            .unwrap_or_else(|| {
                system_language
                    .map(Locale::from_system_language)
                    .unwrap_or_default()
            });
        debug!("UI locale resolved to {}", locale);

        let (sender, current) = watch::channel(locale);
        Self {
            prefs,
            sender: Mutex::new(Some(sender)),
            current,
        }
    }

    pub fn locale(&self) -> Locale {
        *self.current.borrow()
    }

    pub fn messages(&self) -> Messages {
        Messages::new(self.locale())
    }

    /// Receiver woken on every locale change. After [`dispose`](Self::dispose)
    /// its `changed()` resolves to an error.
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        match self.lock_sender().as_ref() {
            Some(sender) => sender.subscribe(),
            None => {
                let mut receiver = self.current.clone();
                receiver.borrow_and_update();
                receiver
            }
        }
    }

    /// Switch locale, notify subscribers and persist the choice.
    ///
    /// The in-memory switch happens even if persisting fails; the storage
    /// error is still returned.
    pub fn set_locale(&self, locale: Locale) -> Result<()> {
        {
            let sender = self.lock_sender();
            let sender = sender
                .as_ref()
                .ok_or_else(|| Error::Unexpected("UI context already disposed".into()))?;
            sender.send_if_modified(|current| {
                if *current == locale {
                    return false;
                }
                *current = locale;
                true
            });
        }
        self.prefs
            .set_preference(LOCALE_PREFERENCE_KEY, locale.code())
    }

    pub fn is_disposed(&self) -> bool {
        self.lock_sender().is_none()
    }

    /// End the context. Idempotent.
    pub fn dispose(&self) {
        if self.lock_sender().take().is_some() {
            debug!("UI context disposed");
        }
    }

    fn lock_sender(&self) -> MutexGuard<'_, Option<watch::Sender<Locale>>> {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryPrefs {
        values: Mutex<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl MemoryPrefs {
        fn with(key: &str, value: &str) -> Self {
            let prefs = Self::default();
            prefs
                .values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            prefs
        }

        fn get(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }
    }

    impl PreferenceStore for MemoryPrefs {
        fn get_preference(&self, key: &str) -> Result<Option<String>> {
            Ok(self.get(key))
        }

        fn set_preference(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(Error::Preferences("read-only".into()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_stored_preference_wins() {
        let prefs = Arc::new(MemoryPrefs::with(LOCALE_PREFERENCE_KEY, "en"));
        let ctx = UiContext::load(prefs, Some("ru_RU.UTF-8"));
        assert_eq!(ctx.locale(), Locale::En);
    }

    #[test]
    fn test_invalid_preference_falls_back_to_system_language() {
        let prefs = Arc::new(MemoryPrefs::with(LOCALE_PREFERENCE_KEY, "klingon"));
        assert_eq!(
            UiContext::load(prefs.clone(), Some("ru-RU")).locale(),
            Locale::Ru
        );
        assert_eq!(UiContext::load(prefs, None).locale(), Locale::En);
    }

    #[tokio::test]
    async fn test_set_locale_persists_and_notifies() {
        let prefs = Arc::new(MemoryPrefs::default());
        let ctx = UiContext::load(prefs.clone(), Some("en_US"));
        let mut rx = ctx.subscribe();

        ctx.set_locale(Locale::Ru).unwrap();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Locale::Ru);
        assert_eq!(prefs.get(LOCALE_PREFERENCE_KEY).as_deref(), Some("ru"));
        assert_eq!(ctx.messages().not_found(), "Товар не найден");
    }

    #[test]
    fn test_failed_persist_still_switches() {
        let prefs = Arc::new(MemoryPrefs {
            fail_writes: true,
            ..MemoryPrefs::default()
        });
        let ctx = UiContext::load(prefs, None);

        assert!(ctx.set_locale(Locale::Ru).is_err());
        assert_eq!(ctx.locale(), Locale::Ru);
    }

    #[tokio::test]
    async fn test_dispose_ends_subscriptions() {
        let ctx = UiContext::load(Arc::new(MemoryPrefs::default()), None);
        let mut rx = ctx.subscribe();

        ctx.dispose();
        ctx.dispose();

        assert!(ctx.is_disposed());
        assert!(rx.changed().await.is_err());
        assert!(ctx.set_locale(Locale::Ru).is_err());
        assert_eq!(ctx.locale(), Locale::En);
        assert!(ctx.subscribe().changed().await.is_err());
    }
}
