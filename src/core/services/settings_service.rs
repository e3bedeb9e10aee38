use chrono::NaiveDate;

use crate::{
    config::{Settings, SettingsContext},
    core::errors::Result,
    domain::{common::first_of_month, Role},
};

pub struct SettingsService;

impl SettingsService {
    /// Switches role, applying the goal and pioneering-start side effects.
    ///
    /// Leaving any pioneer role, auxiliary included, drops a role goal equal to
    /// the old default. Entering a pioneer role from a non-pioneer one starts
    /// pioneering this month.
    pub fn apply_role_change(settings: &mut Settings, role: Role, today: NaiveDate) {
        let previous = settings.role;
        if previous == role {
            return;
        }
        if previous.is_pioneer() && settings.role_goal == Some(previous.goal()) {
            settings.role_goal = None;
        }
        if role.is_pioneer() && !previous.is_pioneer() {
            settings.pioneer_since = Some(first_of_month(today));
        }
        settings.role = role;
    }

    pub fn change_role(context: &SettingsContext, role: Role, today: NaiveDate) -> Result<Settings> {
        let updated = context.update(|settings| Self::apply_role_change(settings, role, today))?;
        tracing::info!(role = ?updated.role, pioneer_since = ?updated.pioneer_since, "role changed");
        Ok(updated)
    }

    pub fn set_role_goal(context: &SettingsContext, goal: Option<u32>) -> Result<Settings> {
        context.update(|settings| settings.role_goal = goal)
    }

    pub fn set_name(context: &SettingsContext, name: &str) -> Result<Settings> {
        let name = name.trim().to_string();
        context.update(move |settings| settings.name = name)
    }
}
