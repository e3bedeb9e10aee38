//! Pure classification and reduction helpers over entry sequences.
//!
//! Every function here is total: empty input yields empty or zero aggregates.

use std::{iter::Peekable, vec::IntoIter};

use crate::domain::{common::month_key, Entry, EntryType, Time};

/// Entries counting toward ministry time (ministry and transfers).
pub fn ministries(entries: &[Entry]) -> Vec<&Entry> {
    entries
        .iter()
        .filter(|entry| entry.kind.counts_as_ministry())
        .collect()
}

pub fn theocratic_assignments(entries: &[Entry]) -> Vec<&Entry> {
    of_type(entries, EntryType::TheocraticAssignment)
}

pub fn theocratic_schools(entries: &[Entry]) -> Vec<&Entry> {
    of_type(entries, EntryType::TheocraticSchool)
}

pub fn transfers(entries: &[Entry]) -> Vec<&Entry> {
    of_type(entries, EntryType::Transfer)
}

fn of_type(entries: &[Entry], kind: EntryType) -> Vec<&Entry> {
    entries.iter().filter(|entry| entry.kind == kind).collect()
}

/// Sums hours and minutes with carry. Never negative.
pub fn time_sum<'a, I>(entries: I) -> Time
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().map(Entry::time).sum()
}

pub fn ministry_time_sum(entries: &[Entry]) -> Time {
    time_sum(ministries(entries))
}

pub fn theocratic_assignment_time_sum(entries: &[Entry]) -> Time {
    time_sum(theocratic_assignments(entries))
}

pub fn theocratic_school_time_sum(entries: &[Entry]) -> Time {
    time_sum(theocratic_schools(entries))
}

pub fn placements(entries: &[Entry]) -> u32 {
    counter_sum(entries, |entry| entry.placements)
}

pub fn return_visits(entries: &[Entry]) -> u32 {
    counter_sum(entries, |entry| entry.return_visits)
}

pub fn video_showings(entries: &[Entry]) -> u32 {
    counter_sum(entries, |entry| entry.video_showings)
}

/// Saturates instead of overflowing so the sum stays total.
fn counter_sum(entries: &[Entry], counter: impl Fn(&Entry) -> u32) -> u32 {
    ministries(entries)
        .into_iter()
        .map(counter)
        .fold(0, u32::saturating_add)
}

/// Splits entries into chronological runs sharing the same calendar month.
///
/// The input is sorted by date first, so callers may pass entries in any order.
pub fn split_into_months(mut entries: Vec<Entry>) -> MonthGroups {
    entries.sort_by_key(|entry| entry.datetime);
    MonthGroups {
        inner: entries.into_iter().peekable(),
    }
}

/// Lazy iterator over month groups produced by [`split_into_months`].
pub struct MonthGroups {
    inner: Peekable<IntoIter<Entry>>,
}

impl Iterator for MonthGroups {
    type Item = Vec<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.inner.next()?;
        let key = month_key(first.date());
        let mut group = vec![first];
        while let Some(entry) = self.inner.next_if(|entry| month_key(entry.date()) == key) {
            group.push(entry);
        }
        Some(group)
    }
}
