use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::repository::CycleStore;
use crate::service::notify::{Notifier, Subscription};

/// Sent to subscribers when the user starts a new billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReset {
    pub start: DateTime<Utc>,
}

pub struct CycleService<S: CycleStore> {
    store: S,
    notifier: Notifier<CycleReset>,
}

impl<S: CycleStore> CycleService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: Notifier::new(),
        }
    }

    /// The current cycle start. The very first read stores `Utc::now()`.
    pub fn current(&self) -> Result<DateTime<Utc>> {
        self.current_or(Utc::now())
    }

    /// Like [`current`](Self::current) with an explicit first-run value.
    /// First-run initialization is not a reset and notifies nobody.
    pub fn current_or(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Some(start) = self.store.load()? {
            return Ok(start);
        }
        info!(start = %now, "initializing billing cycle");
        self.store.save(now)?;
        Ok(now)
    }

    /// Starts a new cycle at `now`. Any instant is accepted. Logs are untouched.
    pub fn reset(&self, now: DateTime<Utc>) -> Result<()> {
        self.store.save(now)?;
        info!(start = %now, "billing cycle reset");
        self.notifier.notify(CycleReset { start: now });
        Ok(())
    }

    pub fn subscribe(&self) -> Subscription<CycleReset> {
        self.notifier.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    #[derive(Default)]
    struct MemoryCycleStore {
        start: Cell<Option<DateTime<Utc>>>,
        saves: Cell<usize>,
    }

    impl CycleStore for MemoryCycleStore {
        fn load(&self) -> Result<Option<DateTime<Utc>>> {
            Ok(self.start.get())
        }

        fn save(&self, start: DateTime<Utc>) -> Result<()> {
            self.start.set(Some(start));
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_first_read_initializes_once() {
        let service = CycleService::new(MemoryCycleStore::default());
        let sub = service.subscribe();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        assert_eq!(service.current_or(t0).unwrap(), t0);
        assert_eq!(service.current_or(t0 + Duration::days(3)).unwrap(), t0);
        assert_eq!(service.store.saves.get(), 1);
        assert!(!sub.changed(), "first-run init must not look like a reset");
    }

    #[test]
    fn test_reset_overwrites_and_notifies() {
        let service = CycleService::new(MemoryCycleStore::default());
        let sub = service.subscribe();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        service.current_or(t0).unwrap();

        // Past instants are accepted too
        let earlier = t0 - Duration::days(30);
        service.reset(earlier).unwrap();

        assert_eq!(service.current().unwrap(), earlier);
        assert_eq!(sub.drain(), vec![CycleReset { start: earlier }]);
    }
}
