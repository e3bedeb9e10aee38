use chrono::NaiveDate;

use crate::{
    core::errors::{FieldServiceError, Result},
    domain::{
        common::{first_of_month, last_of_month, shift_month},
        Entry, Time,
    },
    storage::EntryStore,
};

use super::aggregation::ministry_time_sum;

/// Only the leftover minutes below a whole hour may move between months.
const MAX_TRANSFER_MINUTES: u32 = 59;

pub struct TransferService;

impl TransferService {
    /// Ministry time of a month not accounted for by inbound transfers. Never negative.
    pub fn rest(entries: &[Entry], transferred: &[Entry]) -> Time {
        let rest = ministry_time_sum(entries) - ministry_time_sum(transferred);
        rest.max(Time::EMPTY)
    }

    /// Amount that may be offered for carrying: the sub-hour remainder of a
    /// non-negative ministry time, otherwise nothing.
    pub fn carry_suggestion(ministry_time: Time) -> Time {
        if ministry_time.is_negative() {
            Time::EMPTY
        } else {
            ministry_time.remainder()
        }
    }

    /// Carries `minutes` out of `month` into the first day of the following month.
    ///
    /// Zero minutes records nothing and returns `None`.
    pub fn transfer_to_next_month<S>(store: &S, month: NaiveDate, minutes: u32) -> Result<Option<Entry>>
    where
        S: EntryStore + ?Sized,
    {
        let next = first_of_month(shift_month(first_of_month(month), 1));
        Self::create(store, next, last_of_month(month), minutes)
    }

    /// Carries `minutes` from the previous month into the first day of `month`.
    ///
    /// Zero minutes dismisses the suggestion without recording anything.
    pub fn transfer_from_last_month<S>(store: &S, month: NaiveDate, minutes: u32) -> Result<Option<Entry>>
    where
        S: EntryStore + ?Sized,
    {
        let current = first_of_month(month);
        let previous = shift_month(current, -1);
        Self::create(store, current, last_of_month(previous), minutes)
    }

    /// Hard-deletes a transfer entry.
    pub fn undo_transfer<S>(store: &S, transfer: &Entry) -> Result<()>
    where
        S: EntryStore + ?Sized,
    {
        if !transfer.is_transfer() {
            return Err(FieldServiceError::InvalidInput(format!(
                "{} is not a transfer entry",
                transfer.kind.label()
            )));
        }
        store.delete_entry(transfer)?;
        tracing::info!(id = ?transfer.id, minutes = transfer.minutes, "transfer undone");
        Ok(())
    }

    fn create<S>(store: &S, date: NaiveDate, from: NaiveDate, minutes: u32) -> Result<Option<Entry>>
    where
        S: EntryStore + ?Sized,
    {
        if minutes == 0 {
            return Ok(None);
        }
        if minutes > MAX_TRANSFER_MINUTES {
            return Err(FieldServiceError::InvalidInput(format!(
                "only remainders below a full hour can be transferred (got {minutes} minutes)"
            )));
        }
        let mut entry = Entry::transfer(date, from, minutes);
        entry.id = Some(store.save_entry(&entry)?);
        tracing::info!(%date, %from, minutes, "transfer recorded");
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryType;
    use crate::storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ministry(day: NaiveDate, hours: u32, minutes: u32) -> Entry {
        Entry::new(EntryType::Ministry, day.and_hms_opt(9, 0, 0).unwrap()).with_time(hours, minutes)
    }

    #[test]
    fn transfer_to_next_month_targets_first_day() {
        let store = MemoryStorage::new();
        let entry = TransferService::transfer_to_next_month(&store, date(2023, 12, 1), 40)
            .unwrap()
            .unwrap();
        assert_eq!(entry.date(), date(2024, 1, 1));
        assert_eq!(entry.transferred_from, Some(date(2023, 12, 31)));
        assert_eq!((entry.hours, entry.minutes), (0, 40));
        assert_eq!(store.transferred_from(date(2023, 12, 1)).unwrap().len(), 1);
    }

    #[test]
    fn transfer_from_last_month_uses_previous_month_end() {
        let store = MemoryStorage::new();
        let entry = TransferService::transfer_from_last_month(&store, date(2024, 3, 15), 10)
            .unwrap()
            .unwrap();
        assert_eq!(entry.date(), date(2024, 3, 1));
        assert_eq!(entry.transferred_from, Some(date(2024, 2, 29)));
    }

    #[test]
    fn zero_minutes_records_nothing() {
        let store = MemoryStorage::new();
        assert!(TransferService::transfer_from_last_month(&store, date(2024, 3, 1), 0)
            .unwrap()
            .is_none());
        assert!(TransferService::transfer_to_next_month(&store, date(2024, 3, 1), 0)
            .unwrap()
            .is_none());
        assert!(store.all_entries().unwrap().is_empty());
    }

    #[test]
    fn whole_hours_are_rejected() {
        let store = MemoryStorage::new();
        let err = TransferService::transfer_to_next_month(&store, date(2024, 3, 1), 60).unwrap_err();
        assert!(matches!(err, FieldServiceError::InvalidInput(_)));
    }

    #[test]
    fn rest_is_never_negative() {
        let day = date(2024, 3, 1);
        let entries = vec![ministry(day, 0, 10)];
        let transferred = vec![Entry::transfer(day, date(2024, 2, 29), 45)];
        assert_eq!(TransferService::rest(&entries, &transferred), Time::EMPTY);

        let entries = vec![ministry(day, 2, 10), Entry::transfer(day, date(2024, 2, 29), 45)];
        assert_eq!(
            TransferService::rest(&entries, &transferred),
            Time::positive(2, 10).unwrap()
        );
    }

    #[test]
    fn suggestion_offers_only_sub_hour_remainder() {
        assert_eq!(
            TransferService::carry_suggestion(Time::positive(12, 35).unwrap()),
            Time::positive(0, 35).unwrap()
        );
        assert_eq!(
            TransferService::carry_suggestion(Time::new(0, 35, true).unwrap()),
            Time::EMPTY
        );
    }

    #[test]
    fn undo_deletes_transfer_only() {
        let store = MemoryStorage::new();
        let transfer = TransferService::transfer_to_next_month(&store, date(2024, 3, 1), 15)
            .unwrap()
            .unwrap();
        TransferService::undo_transfer(&store, &transfer).unwrap();
        assert!(store.all_entries().unwrap().is_empty());

        let mut plain = ministry(date(2024, 3, 2), 1, 0);
        plain.id = Some(store.save_entry(&plain).unwrap());
        assert!(TransferService::undo_transfer(&store, &plain).is_err());
        assert_eq!(store.all_entries().unwrap().len(), 1);
    }
}
