use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{
    common::{first_of_month, months_between, shift_month, shift_year},
    Role, Time,
};

/// 2023 months up to September belong to a service year starting in March.
const RESTART_YEAR: i32 = 2023;
const RESTART_LAST_MONTH: u32 = 9;
const RESTART_FIRST_MONTH: u32 = 3;
const SERVICE_YEAR_FIRST_MONTH: u32 = 9;

/// Reporting year boundaries, nominally September through August.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceYear {
    pub begin: NaiveDate,
    pub end: NaiveDate,
    /// First day after the service year's nominal last month.
    pub last_month: NaiveDate,
}

impl ServiceYear {
    /// Service year containing `month`.
    ///
    /// 2023 up to and including September belongs to the restart year
    /// beginning March 1st, 2023.
    pub fn containing(month: NaiveDate) -> Self {
        let begin = if month.year() == RESTART_YEAR && month.month() <= RESTART_LAST_MONTH {
            first_day(RESTART_YEAR, RESTART_FIRST_MONTH)
        } else if month.month() >= SERVICE_YEAR_FIRST_MONTH {
            first_day(month.year(), SERVICE_YEAR_FIRST_MONTH)
        } else {
            first_day(month.year() - 1, SERVICE_YEAR_FIRST_MONTH)
        };
        let last_month = if begin.month() == SERVICE_YEAR_FIRST_MONTH {
            shift_year(begin, 1)
        } else {
            first_day(begin.year(), SERVICE_YEAR_FIRST_MONTH)
        };
        Self {
            begin,
            end: last_month - Duration::days(1),
            last_month,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin <= date && date <= self.end
    }

    /// First days of every month from `from` (clamped to the service year) through the end.
    pub fn months_from(&self, from: NaiveDate) -> Vec<NaiveDate> {
        let mut month = first_of_month(from.max(self.begin));
        let mut months = Vec::new();
        while month < self.last_month {
            months.push(month);
            month = shift_month(month, 1);
        }
        months
    }

    /// Label such as `2023/2024`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.begin.year(), self.end.year())
    }
}

fn first_day(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Inputs to the goal calculation for one month.
#[derive(Debug, Clone, Copy)]
pub struct GoalInput {
    pub month: NaiveDate,
    pub role: Role,
    pub role_goal: u32,
    pub manually_set_goal: Option<u32>,
    pub pioneer_since: Option<NaiveDate>,
}

/// Goal figures for one month and its service year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalSummary {
    pub role: Role,
    pub service_year: ServiceYear,
    pub pioneering_start: NaiveDate,
    pub monthly_goal: u32,
    pub yearly_goal: u32,
}

impl GoalSummary {
    /// Hours still missing toward the yearly goal given the time done so far.
    pub fn yearly_remaining(&self, done: Time) -> Time {
        let goal = Time::from_total_minutes(i64::from(self.yearly_goal) * 60);
        let remaining = goal - done;
        if remaining.is_negative() {
            Time::EMPTY
        } else {
            remaining
        }
    }
}

pub struct GoalCalculator;

impl GoalCalculator {
    /// Pioneering start within the service year, clamped to its beginning.
    pub fn pioneering_start(service_year: &ServiceYear, pioneer_since: Option<NaiveDate>) -> NaiveDate {
        match pioneer_since {
            Some(since) if since >= service_year.begin => since,
            _ => service_year.begin,
        }
    }

    /// Manual overrides always win over the role goal.
    pub fn monthly_goal(manually_set_goal: Option<u32>, role_goal: u32) -> u32 {
        manually_set_goal.unwrap_or(role_goal)
    }

    /// Role goal pro-rated over the months left from the pioneering start.
    pub fn yearly_goal(service_year: &ServiceYear, role_goal: u32, pioneering_start: NaiveDate) -> u32 {
        let months = months_between(pioneering_start, service_year.last_month).max(0);
        role_goal.saturating_mul(months as u32)
    }

    pub fn evaluate(input: GoalInput) -> GoalSummary {
        let service_year = ServiceYear::containing(input.month);
        let pioneering_start = Self::pioneering_start(&service_year, input.pioneer_since);
        GoalSummary {
            role: input.role,
            service_year,
            pioneering_start,
            monthly_goal: Self::monthly_goal(input.manually_set_goal, input.role_goal),
            yearly_goal: Self::yearly_goal(&service_year, input.role_goal, pioneering_start),
        }
    }
}
