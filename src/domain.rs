use std::collections::HashSet;

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::stats::overall_progress;

pub const DAYS_PER_WEEK: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub name: String,
    pub target_hours: f64,
    pub completed_hours: f64,
}

impl Activity {
    pub fn new(id: u32, name: impl Into<String>, target_hours: f64) -> Self {
        Self {
            id,
            name: name.into(),
            target_hours,
            completed_hours: 0.0,
        }
    }
}

/// Name and weekly target of an activity, used to seed fresh weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    pub target_hours: f64,
}

impl TemplateEntry {
    pub fn new(name: impl Into<String>, target_hours: f64) -> Self {
        Self {
            name: name.into(),
            target_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub activities: Vec<Activity>,
    completed: bool,
}

impl Week {
    /// Builds the week containing `day`.
    pub fn containing(day: NaiveDate, activities: Vec<Activity>) -> Self {
        let start_date = start_of_week(day);
        Self {
            id: week_id(start_date),
            start_date,
            end_date: start_date + Duration::days(DAYS_PER_WEEK - 1),
            activities,
            completed: false,
        }
    }

    /// The week directly after this one, carrying `template` forward with zeroed hours.
    pub fn following(&self, template: &[Activity]) -> Self {
        Self::containing(
            self.start_date + Duration::days(DAYS_PER_WEEK),
            carry_forward(template),
        )
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn store_activities(&mut self, activities: &[Activity]) {
        self.activities = activities.to_vec();
        self.completed = overall_progress(&self.activities) >= 100.0;
    }

    /// Monday 00:00:00.000 and Sunday 23:59:59.999 in local time.
    pub fn local_bounds(&self) -> (DateTime<Local>, DateTime<Local>) {
        let start = self.start_date.and_time(NaiveTime::MIN);
        let end = self
            .end_date
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_else(|| start + Duration::days(DAYS_PER_WEEK) - Duration::milliseconds(1));
        (resolve_local(start), resolve_local(end))
    }

    /// Checks a week read back from disk and recomputes its completion flag.
    pub fn validate(&mut self) -> Result<(), String> {
        if self.start_date.weekday() != Weekday::Mon {
            return Err(format!("week {} does not start on a Monday", self.id));
        }
        if self.end_date != self.start_date + Duration::days(DAYS_PER_WEEK - 1) {
            return Err(format!("week {} does not end on the following Sunday", self.id));
        }
        if self.id != week_id(self.start_date) {
            return Err(format!("week id {} does not match its start date", self.id));
        }

        let mut seen = HashSet::new();
        for activity in &self.activities {
            if !seen.insert(activity.id) {
                return Err(format!("duplicate activity id {} in week {}", activity.id, self.id));
            }
            if activity.name.trim().is_empty() {
                return Err(format!("activity {} in week {} has no name", activity.id, self.id));
            }
            if !is_valid_hours(activity.target_hours) || !is_valid_hours(activity.completed_hours) {
                return Err(format!("activity {} in week {} has invalid hours", activity.id, self.id));
            }
        }

        self.completed = overall_progress(&self.activities) >= 100.0;
        Ok(())
    }

    pub fn date_range_label(&self) -> String {
        format!("{} - {}", format_date(self.start_date), format_date(self.end_date))
    }
}

pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

pub fn week_id(start_date: NaiveDate) -> String {
    let iso = start_date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Copies names and targets forward, zeroing completed hours.
pub fn carry_forward(activities: &[Activity]) -> Vec<Activity> {
    activities
        .iter()
        .map(|activity| Activity {
            completed_hours: 0.0,
            ..activity.clone()
        })
        .collect()
}

pub fn activities_from_template(template: &[TemplateEntry]) -> Vec<Activity> {
    let mut activities: Vec<Activity> = Vec::with_capacity(template.len());
    for entry in template {
        let name = entry.name.trim();
        if name.is_empty() || !is_valid_hours(entry.target_hours) {
            continue;
        }
        let Some(id) = next_activity_id(&activities) else {
            break;
        };
        activities.push(Activity::new(id, name, entry.target_hours));
    }
    activities
}

/// One past the highest id; `None` once ids are exhausted.
pub fn next_activity_id(activities: &[Activity]) -> Option<u32> {
    activities
        .iter()
        .map(|activity| activity.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

pub fn is_valid_hours(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

pub fn parse_hours(input: &str) -> Option<f64> {
    let value = input.trim().replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub fn seed_template() -> Vec<TemplateEntry> {
    [
        ("Work", 40.0),
        ("Sleep", 56.0),
        ("Exercise", 5.0),
        ("Reading", 4.0),
        ("Study", 6.0),
        ("Cooking", 7.0),
        ("Housework", 4.0),
        ("Family", 10.0),
        ("Friends", 4.0),
        ("Side project", 5.0),
        ("Commute", 5.0),
        ("Rest", 8.0),
    ]
    .into_iter()
    .map(|(name, target_hours)| TemplateEntry::new(name, target_hours))
    .collect()
}

fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(local_datetime) => local_datetime,
        LocalResult::Ambiguous(first, second) => first.min(second),
        LocalResult::None => {
            let mut cursor = naive + Duration::minutes(1);
            for _ in 0..120 {
                if let LocalResult::Single(local_datetime) = Local.from_local_datetime(&cursor) {
                    return local_datetime;
                }
                cursor += Duration::minutes(1);
            }
            Local.from_utc_datetime(&naive)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Timelike, Weekday};

    use super::{
        Activity, TemplateEntry, Week, activities_from_template, format_date, format_hours,
        next_activity_id, parse_hours, start_of_week, week_id,
    };

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn sunday_maps_to_preceding_monday() {
        let sunday = day(2026, 10, 18);
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert_eq!(start_of_week(sunday), day(2026, 10, 12));
        assert_eq!(start_of_week(day(2026, 10, 12)), day(2026, 10, 12));
    }

    #[test]
    fn week_spans_monday_to_sunday() {
        let week = Week::containing(day(2026, 10, 15), Vec::new());
        assert_eq!(week.start_date.weekday(), Weekday::Mon);
        assert_eq!(week.end_date.weekday(), Weekday::Sun);
        assert_eq!((week.end_date - week.start_date).num_days(), 6);
        assert_eq!(week.id, "2026-W42");

        let (start, end) = week.local_bounds();
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn week_id_uses_iso_year() {
        // 2027-01-01 is a Friday that belongs to ISO week 53 of 2026.
        assert_eq!(week_id(start_of_week(day(2027, 1, 1))), "2026-W53");
        assert_eq!(week_id(day(2026, 1, 5)), "2026-W02");
    }

    #[test]
    fn following_week_resets_hours_and_keeps_ids() {
        let mut activity = Activity::new(4, "Reading", 3.0);
        activity.completed_hours = 2.5;
        let week = Week::containing(day(2026, 10, 12), vec![activity.clone()]);
        let next = week.following(&[activity]);

        assert_eq!(next.start_date, day(2026, 10, 19));
        assert_eq!(next.activities.len(), 1);
        assert_eq!(next.activities[0].id, 4);
        assert_eq!(next.activities[0].target_hours, 3.0);
        assert_eq!(next.activities[0].completed_hours, 0.0);
        assert!(!next.is_completed());
    }

    #[test]
    fn template_skips_invalid_entries_and_numbers_sequentially() {
        let activities = activities_from_template(&[
            TemplateEntry::new(" Work ", 40.0),
            TemplateEntry::new("  ", 2.0),
            TemplateEntry::new("Gym", -1.0),
            TemplateEntry::new("Read", 3.0),
        ]);
        let names = activities.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Work", "Read"]);
        assert_eq!(activities[1].id, 2);
        assert_eq!(next_activity_id(&activities), Some(3));
        assert_eq!(next_activity_id(&[]), Some(1));
        assert_eq!(next_activity_id(&[Activity::new(u32::MAX, "Full", 1.0)]), None);
    }

    #[test]
    fn validation_rejects_broken_weeks() {
        let valid = Week::containing(day(2026, 10, 12), vec![Activity::new(1, "Read", 2.0)]);
        assert!(valid.clone().validate().is_ok());

        let mut wednesday = valid.clone();
        wednesday.start_date = day(2026, 10, 14);
        assert!(wednesday.validate().is_err());

        let mut short = valid.clone();
        short.end_date = day(2026, 10, 1);
        assert!(short.validate().is_err());

        let mut duplicate = valid.clone();
        duplicate.activities.push(Activity::new(1, "Gym", 1.0));
        assert!(duplicate.validate().is_err());

        let mut unnamed = valid.clone();
        unnamed.activities[0].name = "  ".to_string();
        assert!(unnamed.validate().is_err());

        let mut negative = valid;
        negative.activities[0].target_hours = -5.0;
        assert!(negative.validate().is_err());
    }

    #[test]
    fn validation_recomputes_completion() {
        let mut week = Week::containing(day(2026, 10, 12), vec![Activity::new(1, "Read", 2.0)]);
        week.completed = true;
        week.validate().expect("week is valid");
        assert!(!week.is_completed());

        week.activities[0].completed_hours = 2.0;
        week.validate().expect("week is valid");
        assert!(week.is_completed());
    }

    #[test]
    fn parses_and_formats_hours() {
        assert_eq!(parse_hours(" 2.5 "), Some(2.5));
        assert_eq!(parse_hours("1,5"), Some(1.5));
        assert_eq!(parse_hours(""), None);
        assert_eq!(parse_hours("abc"), None);
        assert_eq!(parse_hours("inf"), None);
        assert_eq!(format_hours(5.0), "5");
        assert_eq!(format_hours(0.1 + 0.2), "0.3");
        assert_eq!(format_date(day(2026, 3, 9)), "09/03/2026");
    }
}
