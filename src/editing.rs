use crate::domain::{format_hours, parse_hours};
use crate::planner::WeekPlanner;

/// Inline editor state for one activity row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    NotEditing,
    EditingTarget(String),
    EditingProgress(String),
    AddingHours(String),
}

impl EditMode {
    fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            EditMode::NotEditing => None,
            EditMode::EditingTarget(text)
            | EditMode::EditingProgress(text)
            | EditMode::AddingHours(text) => Some(text),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            EditMode::NotEditing => None,
            EditMode::EditingTarget(text)
            | EditMode::EditingProgress(text)
            | EditMode::AddingHours(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursDirection {
    Add,
    Subtract,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Applied(String),
    Rejected(String),
    Idle,
}

/// At most one row is open at a time; opening another row closes the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEditor {
    row: Option<u32>,
    mode: EditMode,
}

impl RowEditor {
    pub fn mode_for(&self, activity_id: u32) -> &EditMode {
        static IDLE: EditMode = EditMode::NotEditing;
        if self.row == Some(activity_id) {
            &self.mode
        } else {
            &IDLE
        }
    }

    pub fn is_open(&self) -> bool {
        self.row.is_some()
    }

    pub fn begin_target(&mut self, planner: &WeekPlanner, activity_id: u32) -> bool {
        let Some(activity) = planner.activity(activity_id) else {
            return false;
        };
        self.open(activity_id, EditMode::EditingTarget(format_hours(activity.target_hours)));
        true
    }

    pub fn begin_progress(&mut self, planner: &WeekPlanner, activity_id: u32) -> bool {
        let Some(activity) = planner.activity(activity_id) else {
            return false;
        };
        self.open(
            activity_id,
            EditMode::EditingProgress(format_hours(activity.completed_hours)),
        );
        true
    }

    pub fn begin_adding_hours(&mut self, planner: &WeekPlanner, activity_id: u32) -> bool {
        if planner.activity(activity_id).is_none() {
            return false;
        }
        self.open(activity_id, EditMode::AddingHours(String::new()));
        true
    }

    pub fn push(&mut self, value: char) {
        if !(value.is_ascii_digit() || value == '.' || value == ',') {
            return;
        }
        if let Some(buffer) = self.mode.buffer_mut() {
            buffer.push(value);
        }
    }

    pub fn pop(&mut self) {
        if let Some(buffer) = self.mode.buffer_mut() {
            buffer.pop();
        }
    }

    pub fn cancel(&mut self) {
        self.row = None;
        self.mode = EditMode::NotEditing;
    }

    /// Applies the open editor. `direction` only matters while adding hours.
    pub fn commit(&mut self, planner: &mut WeekPlanner, direction: HoursDirection) -> EditOutcome {
        let row = self.row.take();
        let mode = std::mem::take(&mut self.mode);
        let Some(activity_id) = row else {
            return EditOutcome::Idle;
        };

        let Some(text) = mode.text() else {
            return EditOutcome::Idle;
        };
        let Some(value) = parse_hours(text) else {
            return EditOutcome::Rejected(format!("'{}' is not a number of hours", text.trim()));
        };

        let (applied, message) = match (&mode, direction) {
            (EditMode::EditingTarget(_), _) => (
                planner.set_target_hours(activity_id, value),
                format!("target set to {}h", format_hours(value)),
            ),
            (EditMode::EditingProgress(_), _) => (
                planner.set_completed_hours(activity_id, value),
                format!("completed set to {}h", format_hours(value)),
            ),
            (EditMode::AddingHours(_), HoursDirection::Add) => (
                planner.add_completed_hours(activity_id, value),
                format!("added {}h", format_hours(value)),
            ),
            (EditMode::AddingHours(_), HoursDirection::Subtract) => (
                planner.subtract_completed_hours(activity_id, value),
                format!("subtracted {}h", format_hours(value)),
            ),
            (EditMode::NotEditing, _) => return EditOutcome::Idle,
        };

        if applied {
            EditOutcome::Applied(message)
        } else {
            EditOutcome::Rejected(format!("{} hours not accepted", format_hours(value)))
        }
    }

    fn open(&mut self, activity_id: u32, mode: EditMode) {
        self.row = Some(activity_id);
        self.mode = mode;
    }
}
