use chrono::NaiveDate;

use crate::domain::{Activity, Week};

/// Hours in a calendar week.
pub const HOURS_PER_WEEK: f64 = 168.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    Minimal,
    Low,
    Medium,
    High,
    Complete,
}

impl ProgressTier {
    pub fn for_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            ProgressTier::Complete
        } else if percent >= 75.0 {
            ProgressTier::High
        } else if percent >= 50.0 {
            ProgressTier::Medium
        } else if percent >= 25.0 {
            ProgressTier::Low
        } else {
            ProgressTier::Minimal
        }
    }
}

pub fn total_target_hours(activities: &[Activity]) -> f64 {
    activities.iter().map(|activity| activity.target_hours).sum()
}

pub fn total_completed_hours(activities: &[Activity]) -> f64 {
    activities.iter().map(|activity| activity.completed_hours).sum()
}

pub fn remaining_capacity(activities: &[Activity]) -> f64 {
    HOURS_PER_WEEK - total_target_hours(activities)
}

pub fn overall_progress(activities: &[Activity]) -> f64 {
    let target = total_target_hours(activities);
    if target > 0.0 {
        total_completed_hours(activities) / target * 100.0
    } else {
        0.0
    }
}

/// Capped at 100 for display; the stored completed hours are never capped.
pub fn activity_progress(activity: &Activity) -> f64 {
    if activity.target_hours > 0.0 {
        (activity.completed_hours / activity.target_hours * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekSummary {
    pub planned: f64,
    pub completed: f64,
    pub percent: f64,
    pub remaining: f64,
}

impl WeekSummary {
    pub fn of(activities: &[Activity]) -> Self {
        Self {
            planned: total_target_hours(activities),
            completed: total_completed_hours(activities),
            percent: overall_progress(activities),
            remaining: remaining_capacity(activities),
        }
    }

    pub fn is_over_allocated(&self) -> bool {
        self.remaining < 0.0
    }

    pub fn tier(&self) -> ProgressTier {
        ProgressTier::for_percent(self.percent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekHistoryRow {
    pub index: usize,
    pub start_date: NaiveDate,
    pub percent: f64,
    pub tier: ProgressTier,
    pub completed: bool,
}

pub fn week_history(weeks: &[Week]) -> Vec<WeekHistoryRow> {
    weeks
        .iter()
        .enumerate()
        .map(|(index, week)| {
            let percent = overall_progress(&week.activities);
            WeekHistoryRow {
                index,
                start_date: week.start_date,
                percent,
                tier: ProgressTier::for_percent(percent),
                completed: week.is_completed(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: u32, target_hours: f64, completed_hours: f64) -> Activity {
        Activity {
            id,
            name: format!("activity {id}"),
            target_hours,
            completed_hours,
        }
    }

    #[test]
    fn overall_progress_is_zero_without_targets() {
        assert_eq!(overall_progress(&[]), 0.0);
        let progress = overall_progress(&[activity(1, 0.0, 4.0), activity(2, 0.0, 0.0)]);
        assert_eq!(progress, 0.0);
        assert!(!progress.is_nan());
    }

    #[test]
    fn activity_progress_is_capped_for_display_only() {
        let over = activity(1, 2.0, 9.0);
        assert_eq!(activity_progress(&over), 100.0);
        assert_eq!(over.completed_hours, 9.0);
        assert_eq!(activity_progress(&activity(2, 0.0, 3.0)), 0.0);
        assert_eq!(activity_progress(&activity(3, 4.0, 1.0)), 25.0);
    }

    #[test]
    fn overall_progress_is_not_capped() {
        let activities = [activity(1, 2.0, 3.0)];
        assert_eq!(overall_progress(&activities), 150.0);
    }

    #[test]
    fn over_allocation_goes_negative() {
        let summary = WeekSummary::of(&[activity(1, 100.0, 0.0), activity(2, 70.0, 0.0)]);
        assert_eq!(summary.planned, 170.0);
        assert_eq!(summary.remaining, -2.0);
        assert!(summary.is_over_allocated());
    }

    #[test]
    fn tiers_use_inclusive_lower_bounds() {
        assert_eq!(ProgressTier::for_percent(0.0), ProgressTier::Minimal);
        assert_eq!(ProgressTier::for_percent(24.99), ProgressTier::Minimal);
        assert_eq!(ProgressTier::for_percent(25.0), ProgressTier::Low);
        assert_eq!(ProgressTier::for_percent(50.0), ProgressTier::Medium);
        assert_eq!(ProgressTier::for_percent(75.0), ProgressTier::High);
        assert_eq!(ProgressTier::for_percent(99.9), ProgressTier::High);
        assert_eq!(ProgressTier::for_percent(100.0), ProgressTier::Complete);
        assert_eq!(ProgressTier::for_percent(340.0), ProgressTier::Complete);
    }

    #[test]
    fn history_reports_each_stored_week() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let mut first = Week::containing(start, Vec::new());
        first.store_activities(&[activity(1, 4.0, 4.0)]);
        let second = first.following(&first.activities.clone());

        let rows = week_history(&[first, second]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tier, ProgressTier::Complete);
        assert!(rows[0].completed);
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].percent, 0.0);
        assert!(!rows[1].completed);
    }
}
