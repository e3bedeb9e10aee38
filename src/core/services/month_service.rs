use std::thread;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    config::Settings,
    core::errors::{FieldServiceError, Result},
    domain::{
        common::{first_of_month, shift_month},
        Entry, MonthlyInformation, Time,
    },
    storage::{EntryStore, Store},
};

use super::{
    aggregation::{self, ministry_time_sum},
    goal_service::{GoalCalculator, GoalInput, GoalSummary},
    transfer_service::TransferService,
};

/// Snapshot of one month together with the transfers touching it.
#[derive(Debug, Clone)]
pub struct MonthLedger {
    pub month: NaiveDate,
    pub entries: Vec<Entry>,
    /// Transfers carried into this month from the previous one.
    pub transferred: Vec<Entry>,
    /// Transfers carried out of this month into the next one.
    pub outgoing: Vec<Entry>,
    pub info: MonthlyInformation,
    last_month_entries: Vec<Entry>,
}

impl MonthLedger {
    /// Loads the month; the independent reads run concurrently and are joined.
    pub fn load<S>(store: &S, month: NaiveDate) -> Result<Self>
    where
        S: Store + ?Sized,
    {
        let month = first_of_month(month);
        let previous = shift_month(month, -1);

        let (entries, transferred, outgoing, last_entries, info) = thread::scope(|scope| {
            let entries = scope.spawn(|| store.all_of_month(month));
            let transferred = scope.spawn(|| store.transferred_from(previous));
            let outgoing = scope.spawn(|| store.transferred_from(month));
            let last_entries = scope.spawn(|| store.all_of_month(previous));
            let info = store.info_of_month(month);
            (
                join(entries),
                join(transferred),
                join(outgoing),
                join(last_entries),
                info,
            )
        });

        let ledger = Self {
            month,
            entries: entries?,
            transferred: transferred?,
            outgoing: outgoing?,
            info: info?,
            last_month_entries: last_entries?,
        };
        tracing::debug!(
            month = %ledger.month,
            entries = ledger.entries.len(),
            transferred = ledger.transferred.len(),
            outgoing = ledger.outgoing.len(),
            "month loaded"
        );
        Ok(ledger)
    }

    pub fn previous_month(&self) -> NaiveDate {
        shift_month(self.month, -1)
    }

    pub fn next_month(&self) -> NaiveDate {
        shift_month(self.month, 1)
    }

    /// Ministry time logged in this month, inbound transfers included.
    pub fn logged_ministry_time(&self) -> Time {
        ministry_time_sum(&self.entries)
    }

    /// Logged ministry time minus what was carried into the next month. May be negative.
    pub fn ministry_time(&self) -> Time {
        self.logged_ministry_time() - ministry_time_sum(&self.outgoing)
    }

    pub fn rest(&self) -> Time {
        TransferService::rest(&self.entries, &self.transferred)
    }

    /// Last month's ministry time net of what it already carried into this month.
    pub fn last_month_ministry_time(&self) -> Time {
        ministry_time_sum(&self.last_month_entries) - ministry_time_sum(&self.transferred)
    }

    /// Remainder of last month that may still be carried into this month.
    pub fn rest_of_last_month(&self) -> Time {
        TransferService::carry_suggestion(self.last_month_ministry_time())
    }

    /// Remainder of this month that may be carried into the next one.
    pub fn rest_of_this_month(&self) -> Time {
        TransferService::carry_suggestion(self.ministry_time())
    }

    pub fn placements(&self) -> u32 {
        aggregation::placements(&self.entries)
    }

    pub fn return_visits(&self) -> u32 {
        aggregation::return_visits(&self.entries)
    }

    pub fn video_showings(&self) -> u32 {
        aggregation::video_showings(&self.entries)
    }

    pub fn goal(&self, settings: &Settings) -> GoalSummary {
        GoalCalculator::evaluate(GoalInput {
            month: self.month,
            role: settings.role,
            role_goal: settings.effective_role_goal(),
            manually_set_goal: self.info.goal,
            pioneer_since: settings.pioneer_since,
        })
    }

    pub fn transfer_to_next_month<S>(&mut self, store: &S, minutes: u32) -> Result<Option<Entry>>
    where
        S: EntryStore + ?Sized,
    {
        ensure_within(minutes, self.rest_of_this_month())?;
        let created = TransferService::transfer_to_next_month(store, self.month, minutes)?;
        if let Some(entry) = &created {
            self.outgoing.push(entry.clone());
        }
        Ok(created)
    }

    /// Zero minutes dismisses the suggestion without recording anything.
    pub fn transfer_from_last_month<S>(&mut self, store: &S, minutes: u32) -> Result<Option<Entry>>
    where
        S: EntryStore + ?Sized,
    {
        ensure_within(minutes, self.rest_of_last_month())?;
        let created = TransferService::transfer_from_last_month(store, self.month, minutes)?;
        if let Some(entry) = &created {
            self.entries.push(entry.clone());
            self.entries.sort_by_key(|entry| entry.datetime);
            self.transferred.push(entry.clone());
        }
        Ok(created)
    }

    /// Deletes the transfer and drops it from every in-memory view.
    pub fn undo_transfer<S>(&mut self, store: &S, transfer: &Entry) -> Result<()>
    where
        S: EntryStore + ?Sized,
    {
        TransferService::undo_transfer(store, transfer)?;
        if let Some(id) = transfer.id {
            for view in [&mut self.entries, &mut self.transferred, &mut self.outgoing] {
                view.retain(|entry| entry.id != Some(id));
            }
        }
        Ok(())
    }

    /// Finds a transfer touching this month by id.
    pub fn transfer(&self, id: Uuid) -> Option<&Entry> {
        self.transferred
            .iter()
            .chain(self.outgoing.iter())
            .find(|entry| entry.id == Some(id))
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .map_err(|_| FieldServiceError::StorageError("storage read panicked".into()))?
}

fn ensure_within(minutes: u32, available: Time) -> Result<()> {
    if i64::from(minutes) > available.total_minutes() {
        return Err(FieldServiceError::InvalidInput(format!(
            "{minutes} minutes exceed the {} minutes available for transfer",
            available.total_minutes()
        )));
    }
    Ok(())
}

/// Net ministry time of a month: logged time minus transfers carried out of it.
pub fn net_ministry_time<S>(store: &S, month: NaiveDate) -> Result<Time>
where
    S: EntryStore + ?Sized,
{
    let entries = store.all_of_month(month)?;
    let outgoing = store.transferred_from(month)?;
    Ok(ministry_time_sum(&entries) - ministry_time_sum(&outgoing))
}

/// Ministry time done from the pioneering start through `through`.
pub fn service_year_progress<S>(store: &S, summary: &GoalSummary, through: NaiveDate) -> Result<Time>
where
    S: EntryStore + ?Sized,
{
    let through = first_of_month(through);
    summary
        .service_year
        .months_from(summary.pioneering_start)
        .into_iter()
        .filter(|month| *month <= through)
        .map(|month| net_ministry_time(store, month))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryType, Role};
    use crate::storage::{MemoryStorage, MonthlyInfoStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ministry(day: NaiveDate, hours: u32, minutes: u32) -> Entry {
        Entry::new(EntryType::Ministry, day.and_hms_opt(9, 0, 0).unwrap()).with_time(hours, minutes)
    }

    fn seeded() -> MemoryStorage {
        MemoryStorage::with_entries(vec![
            ministry(date(2024, 1, 10), 10, 25),
            ministry(date(2024, 1, 20), 0, 20),
            ministry(date(2024, 2, 3), 3, 0),
        ])
    }

    #[test]
    fn offers_last_month_remainder() {
        let store = seeded();
        let ledger = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        assert_eq!(ledger.last_month_ministry_time(), Time::positive(10, 45).unwrap());
        assert_eq!(ledger.rest_of_last_month(), Time::positive(0, 45).unwrap());
        assert_eq!(ledger.rest(), Time::positive(3, 0).unwrap());
    }

    #[test]
    fn accepted_transfer_updates_views() {
        let store = seeded();
        let mut ledger = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        let transfer = ledger.transfer_from_last_month(&store, 45).unwrap().unwrap();
        assert_eq!(ledger.logged_ministry_time(), Time::positive(3, 45).unwrap());
        assert_eq!(ledger.rest(), Time::positive(3, 0).unwrap());
        assert_eq!(ledger.rest_of_last_month(), Time::EMPTY);

        let reloaded = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        assert_eq!(reloaded.transferred.len(), 1);
        assert_eq!(reloaded.rest_of_last_month(), Time::EMPTY);

        let january = MonthLedger::load(&store, date(2024, 1, 1)).unwrap();
        assert_eq!(january.ministry_time(), Time::positive(10, 0).unwrap());

        ledger.undo_transfer(&store, &transfer).unwrap();
        assert!(ledger.transferred.is_empty());
        assert_eq!(ledger.logged_ministry_time(), Time::positive(3, 0).unwrap());
        assert_eq!(ledger.rest_of_last_month(), Time::positive(0, 45).unwrap());
    }

    #[test]
    fn transfer_above_suggestion_is_rejected() {
        let store = seeded();
        let mut ledger = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        assert!(ledger.transfer_from_last_month(&store, 50).is_err());
        assert!(ledger.transfer_to_next_month(&store, 1).is_err());
        assert!(store.transferred_from(date(2024, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn dismissing_with_zero_records_nothing() {
        let store = seeded();
        let mut ledger = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        assert!(ledger.transfer_from_last_month(&store, 0).unwrap().is_none());
        assert_eq!(store.all_entries().unwrap().len(), 3);
    }

    #[test]
    fn goal_uses_monthly_override() {
        let store = seeded();
        let mut info = store.info_of_month(date(2024, 2, 1)).unwrap();
        info.goal = Some(42);
        store.save_info(&info).unwrap();
        let ledger = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        let settings = Settings {
            role: Role::RegularPioneer,
            ..Settings::default()
        };
        let goal = ledger.goal(&settings);
        assert_eq!(goal.monthly_goal, 42);
        assert_eq!(goal.yearly_goal, 600);
    }

    #[test]
    fn progress_sums_net_time_of_service_year() {
        let store = seeded();
        TransferService::transfer_to_next_month(&store, date(2024, 1, 1), 45).unwrap();
        let ledger = MonthLedger::load(&store, date(2024, 2, 1)).unwrap();
        let summary = ledger.goal(&Settings {
            role: Role::RegularPioneer,
            ..Settings::default()
        });
        let done = service_year_progress(&store, &summary, date(2024, 2, 1)).unwrap();
        assert_eq!(done, Time::positive(13, 45).unwrap());
    }
}
