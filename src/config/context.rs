use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex, RwLock,
};

use crate::core::errors::{FieldServiceError, Result};

use super::{Settings, SettingsManager};

/// Explicit settings context shared by the components that read preferences.
///
/// Every update is persisted first and then pushed to subscribers in update order.
pub struct SettingsContext {
    manager: SettingsManager,
    current: RwLock<Settings>,
    subscribers: Mutex<Vec<Sender<Settings>>>,
}

impl SettingsContext {
    pub fn load(manager: SettingsManager) -> Result<Self> {
        let settings = manager.load()?;
        Ok(Self {
            manager,
            current: RwLock::new(settings),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn snapshot(&self) -> Settings {
        self.current
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Subscribes to changes. The current value is delivered immediately.
    pub fn subscribe(&self) -> Result<SettingsSubscription> {
        let (tx, rx) = mpsc::channel();
        let current = self.snapshot();
        let mut subscribers = self.subscribers.lock().map_err(|_| poisoned())?;
        let _ = tx.send(current);
        subscribers.push(tx);
        Ok(SettingsSubscription { receiver: rx })
    }

    /// Applies `change`, persists the result, and notifies subscribers.
    pub fn update<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut current = self.current.write().map_err(|_| poisoned())?;
        let mut next = current.clone();
        change(&mut next);
        self.manager.save(&next)?;
        *current = next.clone();
        self.broadcast(&next)?;
        tracing::info!(role = ?next.role, "settings updated");
        Ok(next)
    }

    /// Replaces all settings, e.g. after restoring a backup.
    pub fn replace(&self, settings: Settings) -> Result<Settings> {
        self.update(move |current| *current = settings)
    }

    fn broadcast(&self, settings: &Settings) -> Result<()> {
        let mut subscribers = self.subscribers.lock().map_err(|_| poisoned())?;
        subscribers.retain(|tx| tx.send(settings.clone()).is_ok());
        Ok(())
    }
}

fn poisoned() -> FieldServiceError {
    FieldServiceError::ConfigError("settings lock poisoned".into())
}

/// Receiving side of [`SettingsContext::subscribe`].
pub struct SettingsSubscription {
    receiver: Receiver<Settings>,
}

impl SettingsSubscription {
    /// Drains pending values and returns the newest one, if any arrived.
    pub fn latest(&self) -> Option<Settings> {
        self.receiver.try_iter().last()
    }

    /// Blocks until the next value arrives; `None` once the context is gone.
    pub fn recv(&self) -> Option<Settings> {
        self.receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use tempfile::tempdir;

    fn context() -> (tempfile::TempDir, SettingsContext) {
        let temp = tempdir().unwrap();
        let manager = SettingsManager::with_base_dir(Some(temp.path().to_path_buf()));
        let context = SettingsContext::load(manager).unwrap();
        (temp, context)
    }

    #[test]
    fn subscribers_see_latest_value() {
        let (_temp, context) = context();
        let subscription = context.subscribe().unwrap();
        context.update(|s| s.name = "First".into()).unwrap();
        context.update(|s| s.name = "Second".into()).unwrap();
        let latest = subscription.latest().unwrap();
        assert_eq!(latest.name, "Second");
        assert!(subscription.latest().is_none());
    }

    #[test]
    fn subscription_starts_with_current_value() {
        let (_temp, context) = context();
        context.update(|s| s.role = Role::SpecialPioneer).unwrap();
        let subscription = context.subscribe().unwrap();
        assert_eq!(subscription.recv().unwrap().role, Role::SpecialPioneer);
    }

    #[test]
    fn updates_are_persisted() {
        let temp = tempdir().unwrap();
        let manager = SettingsManager::with_base_dir(Some(temp.path().to_path_buf()));
        let context = SettingsContext::load(manager.clone()).unwrap();
        context.update(|s| s.name = "Persisted".into()).unwrap();
        assert_eq!(manager.load().unwrap().name, "Persisted");
    }
}
