use std::time::{Duration, Instant};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::autosave::AutoSave;
use crate::domain::{
    Activity, TemplateEntry, Week, activities_from_template, format_date, is_valid_hours,
    next_activity_id,
};
use crate::stats::{WeekHistoryRow, WeekSummary, week_history};

pub const RESET_PROMPT: &str = "Reset the completed hours of this week?";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("cannot delete the only week: at least one week must remain")]
    SoleWeek,
    #[error("week index {index} is out of range ({len} weeks)")]
    OutOfRange { index: usize, len: usize },
}

/// The user's reply to a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

/// Week collection with a cursor and the live, editable activities of the cursor week.
#[derive(Debug, Clone)]
pub struct WeekPlanner {
    weeks: Vec<Week>,
    cursor: usize,
    live: Vec<Activity>,
    autosave: AutoSave,
}

impl WeekPlanner {
    pub fn new(today: NaiveDate, template: &[TemplateEntry], autosave_delay: Duration) -> Self {
        let week = Week::containing(today, activities_from_template(template));
        info!(week = %week.id, activities = week.activities.len(), "initialized planner");
        Self {
            live: week.activities.clone(),
            weeks: vec![week],
            cursor: 0,
            autosave: AutoSave::new(autosave_delay),
        }
    }

    /// Rebuilds a planner from stored weeks; `None` when there are no weeks.
    pub fn restore(weeks: Vec<Week>, cursor: usize, autosave_delay: Duration) -> Option<Self> {
        if weeks.is_empty() {
            return None;
        }
        let clamped = cursor.min(weeks.len() - 1);
        if clamped != cursor {
            warn!(cursor, weeks = weeks.len(), "stored cursor out of range, clamping");
        }
        Some(Self {
            live: weeks[clamped].activities.clone(),
            weeks,
            cursor: clamped,
            autosave: AutoSave::new(autosave_delay),
        })
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_week(&self) -> &Week {
        &self.weeks[self.cursor]
    }

    pub fn live_activities(&self) -> &[Activity] {
        &self.live
    }

    pub fn activity(&self, id: u32) -> Option<&Activity> {
        self.live.iter().find(|activity| activity.id == id)
    }

    pub fn summary(&self) -> WeekSummary {
        WeekSummary::of(&self.live)
    }

    pub fn history(&self) -> Vec<WeekHistoryRow> {
        week_history(&self.weeks)
    }

    pub fn can_go_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_delete(&self) -> bool {
        self.weeks.len() > 1
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn autosave_delay(&self) -> Duration {
        self.autosave.delay()
    }

    pub fn save(&mut self) {
        self.autosave.cancel();
        let week = &mut self.weeks[self.cursor];
        week.store_activities(&self.live);
        debug!(week = %week.id, completed = week.is_completed(), "saved week");
    }

    /// Runs the debounced save once its quiet period has passed.
    pub fn poll_autosave(&mut self, now: Instant) -> bool {
        if self.autosave.fire_if_due(now) {
            self.save();
            return true;
        }
        false
    }

    pub fn go_to_previous(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.save();
        self.cursor -= 1;
        self.load_cursor_week();
        true
    }

    /// Moves forward, appending a templated week past the end. Returns true if a week was created.
    pub fn go_to_next(&mut self) -> bool {
        self.save();
        if self.cursor + 1 < self.weeks.len() {
            self.cursor += 1;
            self.load_cursor_week();
            return false;
        }
        self.append_following_week();
        true
    }

    pub fn create_new_week(&mut self) {
        self.save();
        self.append_following_week();
    }

    pub fn select_week(&mut self, index: usize) -> Result<(), PlannerError> {
        self.check_index(index)?;
        self.save();
        self.cursor = index;
        self.load_cursor_week();
        Ok(())
    }

    pub fn delete_week(&mut self, index: usize) -> Result<(), PlannerError> {
        if self.weeks.len() <= 1 {
            warn!("refused to delete the only week");
            return Err(PlannerError::SoleWeek);
        }
        self.check_index(index)?;

        let removed = self.weeks.remove(index);
        info!(week = %removed.id, index, "deleted week");

        if index == self.cursor {
            self.cursor = index.saturating_sub(1);
            self.load_cursor_week();
        } else if index < self.cursor {
            self.cursor -= 1;
        }
        Ok(())
    }

    /// Text for the deletion confirmation of week `index`.
    pub fn delete_prompt(&self, index: usize) -> Result<String, PlannerError> {
        if self.weeks.len() <= 1 {
            return Err(PlannerError::SoleWeek);
        }
        self.check_index(index)?;
        let week = &self.weeks[index];
        Ok(format!(
            "Delete week {}? ({} - {})",
            index + 1,
            format_date(week.start_date),
            format_date(week.end_date)
        ))
    }

    /// Zeroes completed hours when the reset prompt was answered with yes.
    pub fn reset_current_week(&mut self, answer: Answer) -> bool {
        if answer == Answer::No {
            return false;
        }
        for activity in &mut self.live {
            activity.completed_hours = 0.0;
        }
        info!(week = %self.current_week().id, "reset week progress");
        self.touch();
        true
    }

    /// Appends an activity to the live list. Returns the new id, or `None` when rejected.
    pub fn add_activity(&mut self, name: &str, target_hours: f64) -> Option<u32> {
        let name = name.trim();
        if name.is_empty() || !is_valid_hours(target_hours) {
            return None;
        }
        let Some(id) = next_activity_id(&self.live) else {
            warn!(name, "no activity ids left in this week");
            return None;
        };
        self.live.push(Activity::new(id, name, target_hours));
        debug!(id, name, target_hours, "added activity");
        self.touch();
        Some(id)
    }

    pub fn remove_activity(&mut self, id: u32) -> bool {
        let before = self.live.len();
        self.live.retain(|activity| activity.id != id);
        if self.live.len() == before {
            return false;
        }
        debug!(id, "removed activity");
        self.touch();
        true
    }

    pub fn set_target_hours(&mut self, id: u32, value: f64) -> bool {
        if !is_valid_hours(value) {
            return false;
        }
        self.update_activity(id, |activity| activity.target_hours = value)
    }

    pub fn set_completed_hours(&mut self, id: u32, value: f64) -> bool {
        if !is_valid_hours(value) {
            return false;
        }
        self.update_activity(id, |activity| activity.completed_hours = value)
    }

    pub fn add_completed_hours(&mut self, id: u32, delta: f64) -> bool {
        if !is_positive_delta(delta) {
            return false;
        }
        self.update_activity(id, |activity| activity.completed_hours += delta)
    }

    pub fn subtract_completed_hours(&mut self, id: u32, delta: f64) -> bool {
        if !is_positive_delta(delta) {
            return false;
        }
        self.update_activity(id, |activity| {
            activity.completed_hours = (activity.completed_hours - delta).max(0.0)
        })
    }

    fn update_activity(&mut self, id: u32, apply: impl FnOnce(&mut Activity)) -> bool {
        let Some(activity) = self.live.iter_mut().find(|activity| activity.id == id) else {
            return false;
        };
        apply(activity);
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.autosave.schedule(Instant::now());
    }

    fn append_following_week(&mut self) {
        let week = self.weeks[self.cursor].following(&self.live);
        info!(week = %week.id, activities = week.activities.len(), "created week");
        self.weeks.push(week);
        self.cursor = self.weeks.len() - 1;
        self.load_cursor_week();
    }

    fn load_cursor_week(&mut self) {
        self.autosave.cancel();
        self.live = self.weeks[self.cursor].activities.clone();
    }

    fn check_index(&self, index: usize) -> Result<(), PlannerError> {
        if index < self.weeks.len() {
            Ok(())
        } else {
            Err(PlannerError::OutOfRange {
                index,
                len: self.weeks.len(),
            })
        }
    }
}

fn is_positive_delta(delta: f64) -> bool {
    delta.is_finite() && delta > 0.0
}
