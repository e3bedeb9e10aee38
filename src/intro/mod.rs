//! First-run setup flow expressed as intents folded by a pure reducer.

use chrono::{NaiveDate, NaiveTime};

use crate::{
    config::{ReminderSettings, Settings},
    domain::Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntroStep {
    Welcome,
    Name,
    Role,
    PioneerSince,
    Reminder,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroIntent {
    SetName(String),
    SetRole(Role),
    SetPioneerSince(Option<NaiveDate>),
    SetReminder { enabled: bool, time: Option<NaiveTime> },
    Next,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroState {
    pub step: IntroStep,
    pub name: String,
    pub role: Role,
    pub pioneer_since: Option<NaiveDate>,
    pub reminder: ReminderSettings,
}

impl Default for IntroState {
    fn default() -> Self {
        Self {
            step: IntroStep::Welcome,
            name: String::new(),
            role: Role::Publisher,
            pioneer_since: None,
            reminder: ReminderSettings::default(),
        }
    }
}

impl IntroState {
    pub fn is_done(&self) -> bool {
        self.step == IntroStep::Done
    }

    fn can_advance(&self) -> bool {
        match self.step {
            IntroStep::Name => !self.name.trim().is_empty(),
            IntroStep::Done => false,
            _ => true,
        }
    }

    fn next_step(&self) -> IntroStep {
        match self.step {
            IntroStep::Welcome => IntroStep::Name,
            IntroStep::Name => IntroStep::Role,
            IntroStep::Role if self.role.has_yearly_goal() => IntroStep::PioneerSince,
            IntroStep::Role | IntroStep::PioneerSince => IntroStep::Reminder,
            IntroStep::Reminder | IntroStep::Done => IntroStep::Done,
        }
    }

    fn previous_step(&self) -> IntroStep {
        match self.step {
            IntroStep::Welcome | IntroStep::Name => IntroStep::Welcome,
            IntroStep::Role => IntroStep::Name,
            IntroStep::PioneerSince => IntroStep::Role,
            IntroStep::Reminder if self.role.has_yearly_goal() => IntroStep::PioneerSince,
            IntroStep::Reminder => IntroStep::Role,
            IntroStep::Done => IntroStep::Done,
        }
    }

    /// Settings produced by a completed flow.
    pub fn into_settings(self) -> Option<Settings> {
        if !self.is_done() {
            return None;
        }
        Some(Settings {
            name: self.name.trim().to_string(),
            role: self.role,
            pioneer_since: self.pioneer_since.filter(|_| self.role.has_yearly_goal()),
            reminder: self.reminder,
            ..Settings::default()
        })
    }
}

/// Pure state transition. Intents that do not apply leave the state unchanged.
pub fn reduce(state: IntroState, intent: IntroIntent) -> IntroState {
    if state.is_done() {
        return state;
    }
    match intent {
        IntroIntent::SetName(name) => IntroState { name, ..state },
        IntroIntent::SetRole(role) => IntroState { role, ..state },
        IntroIntent::SetPioneerSince(pioneer_since) => IntroState {
            pioneer_since,
            ..state
        },
        IntroIntent::SetReminder { enabled, time } => IntroState {
            reminder: ReminderSettings {
                enabled,
                time: time.unwrap_or(state.reminder.time),
            },
            ..state
        },
        IntroIntent::Next if state.can_advance() => IntroState {
            step: state.next_step(),
            ..state
        },
        IntroIntent::Next => state,
        IntroIntent::Back => IntroState {
            step: state.previous_step(),
            ..state
        },
    }
}

/// Folds a sequence of intents from the initial state.
pub fn run<I>(intents: I) -> IntroState
where
    I: IntoIterator<Item = IntroIntent>,
{
    intents.into_iter().fold(IntroState::default(), reduce)
}
