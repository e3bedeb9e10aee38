mod common;

use common::{date, ministry, setup_test_env};
use field_service::{
    core::{
        errors::FieldServiceError,
        services::{
            net_ministry_time, service_year_progress, MonthLedger, ReportService, SettingsService,
            TransferService,
        },
    },
    domain::{Entry, EntryType, Role, Time},
    storage::{EntryStore, JsonStorage, MonthlyInfoStore},
};

#[test]
fn carry_to_next_month_moves_the_remainder() {
    let env = setup_test_env();
    env.storage.save_entry(&ministry(date(2024, 3, 5), 10, 40)).unwrap();

    let mut march = MonthLedger::load(&env.storage, date(2024, 3, 1)).unwrap();
    assert_eq!(march.rest_of_this_month(), Time::positive(0, 40).unwrap());

    let err = march.transfer_to_next_month(&env.storage, 50).unwrap_err();
    assert!(matches!(err, FieldServiceError::InvalidInput(_)));

    let transfer = march
        .transfer_to_next_month(&env.storage, 40)
        .unwrap()
        .expect("transfer created");
    assert_eq!(transfer.date(), date(2024, 4, 1));
    assert_eq!(transfer.transferred_from, Some(date(2024, 3, 31)));
    assert_eq!(march.ministry_time(), Time::positive(10, 0).unwrap());
    assert!(march.rest_of_this_month().is_empty());

    let april = MonthLedger::load(&env.storage, date(2024, 4, 1)).unwrap();
    assert_eq!(april.transferred.len(), 1);
    assert_eq!(april.ministry_time(), Time::positive(0, 40).unwrap());
    assert!(april.rest_of_last_month().is_empty());
}

#[test]
fn carry_from_last_month_and_undo() {
    let env = setup_test_env();
    env.storage.save_entry(&ministry(date(2024, 1, 20), 3, 25)).unwrap();

    let mut february = MonthLedger::load(&env.storage, date(2024, 2, 1)).unwrap();
    assert_eq!(february.rest_of_last_month(), Time::positive(0, 25).unwrap());

    let transfer = february
        .transfer_from_last_month(&env.storage, 25)
        .unwrap()
        .expect("transfer created");
    assert_eq!(transfer.transferred_from, Some(date(2024, 1, 31)));
    assert_eq!(
        net_ministry_time(&env.storage, date(2024, 1, 1)).unwrap(),
        Time::positive(3, 0).unwrap()
    );

    february.undo_transfer(&env.storage, &transfer).unwrap();
    assert!(february.transferred.is_empty());
    assert!(env.storage.transferred_from(date(2024, 1, 1)).unwrap().is_empty());
    assert_eq!(
        net_ministry_time(&env.storage, date(2024, 1, 1)).unwrap(),
        Time::positive(3, 25).unwrap()
    );
}

#[test]
fn ledger_finds_transfers_touching_the_month() {
    let env = setup_test_env();
    env.storage.save_entry(&ministry(date(2024, 1, 20), 3, 25)).unwrap();
    let mut plain = ministry(date(2024, 2, 3), 1, 0);
    plain.id = Some(env.storage.save_entry(&plain).unwrap());

    let mut february = MonthLedger::load(&env.storage, date(2024, 2, 14)).unwrap();
    assert_eq!(february.previous_month(), date(2024, 1, 1));
    assert_eq!(february.next_month(), date(2024, 3, 1));

    let inbound = february
        .transfer_from_last_month(&env.storage, 25)
        .unwrap()
        .expect("transfer created");
    let id = inbound.id.expect("persisted transfer");
    assert_eq!(february.transfer(id).map(|entry| entry.minutes), Some(25));
    assert!(february.transfer(plain.id.unwrap()).is_none());

    let january = MonthLedger::load(&env.storage, date(2024, 1, 1)).unwrap();
    assert!(january.transfer(id).is_some());
}

#[test]
fn zero_minutes_records_nothing_and_hour_or_more_is_rejected() {
    let env = setup_test_env();
    let month = date(2024, 5, 1);
    assert!(TransferService::transfer_to_next_month(&env.storage, month, 0)
        .unwrap()
        .is_none());
    assert!(TransferService::transfer_to_next_month(&env.storage, month, 60).is_err());
    assert!(env.storage.all_entries().unwrap().is_empty());
}

#[test]
fn undo_rejects_plain_entries() {
    let env = setup_test_env();
    let mut entry = ministry(date(2024, 5, 2), 1, 0);
    entry.id = Some(env.storage.save_entry(&entry).unwrap());
    let err = TransferService::undo_transfer(&env.storage, &entry).unwrap_err();
    assert!(matches!(err, FieldServiceError::InvalidInput(_)));
    assert_eq!(env.storage.all_entries().unwrap().len(), 1);
}

#[test]
fn data_survives_reopening_the_store() {
    let env = setup_test_env();
    let id = env.storage.save_entry(&ministry(date(2024, 6, 3), 2, 0)).unwrap();
    let mut info = env.storage.info_of_month(date(2024, 6, 1)).unwrap();
    info.bible_studies = Some(3);
    env.storage.save_info(&info).unwrap();

    let reopened = JsonStorage::new(Some(env.base.clone())).unwrap();
    assert_eq!(reopened.get_entry(id).unwrap().hours, 2);
    assert_eq!(
        reopened.info_of_month(date(2024, 6, 15)).unwrap().bible_studies,
        Some(3)
    );
}

#[test]
fn pioneer_progress_across_service_year() {
    let env = setup_test_env();
    SettingsService::change_role(&env.settings, Role::RegularPioneer, date(2023, 11, 14)).unwrap();
    let settings = env.settings.snapshot();
    assert_eq!(settings.pioneer_since, Some(date(2023, 11, 1)));

    // October is before the pioneering start and does not count.
    env.storage.save_entry(&ministry(date(2023, 10, 9), 20, 0)).unwrap();
    env.storage.save_entry(&ministry(date(2023, 11, 9), 30, 0)).unwrap();
    env.storage.save_entry(&ministry(date(2023, 12, 9), 45, 30)).unwrap();

    let ledger = MonthLedger::load(&env.storage, date(2023, 12, 1)).unwrap();
    let goal = ledger.goal(&settings);
    assert_eq!(goal.monthly_goal, 50);
    assert_eq!(goal.yearly_goal, 500);

    let done = service_year_progress(&env.storage, &goal, date(2023, 12, 1)).unwrap();
    assert_eq!(done, Time::positive(75, 30).unwrap());
    assert_eq!(goal.yearly_remaining(done), Time::positive(424, 30).unwrap());
}

#[test]
fn report_counts_whole_hours_and_theocratic_notices() {
    let env = setup_test_env();
    let month = date(2024, 3, 1);
    env.storage
        .save_entry(&ministry(date(2024, 3, 2), 4, 50).with_counters(2, 1, 3))
        .unwrap();
    env.storage
        .save_entry(
            &Entry::new(EntryType::TheocraticSchool, common::at(date(2024, 3, 9), 19))
                .with_time(2, 0),
        )
        .unwrap();
    let mut info = env.storage.info_of_month(month).unwrap();
    info.bible_studies = Some(1);
    env.storage.save_info(&info).unwrap();

    let ledger = MonthLedger::load(&env.storage, month).unwrap();
    let report = ReportService::assemble(
        "Anna",
        month,
        &ledger.entries,
        ledger.ministry_time(),
        &ledger.info,
        date(2024, 4, 2),
    );
    assert_eq!(report.ministry_hours, 4);
    assert_eq!(report.placements, 2);
    assert_eq!(report.return_visits, 3);
    assert_eq!(report.bible_studies, 1);
    assert_eq!(report.comments, "2 hours spent on theocratic schools");
    assert!(report.share_text().starts_with("Field service report March"));
}
