use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::utils::time::{days_between, to_millis};

use super::id::Id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// How pressing a due date is, used to highlight projects in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Due today, tomorrow, or already overdue.
    Warn,
    /// Due within a week.
    Soon,
    Relaxed,
}

impl Urgency {
    pub fn from_days_left(days_left: i64) -> Self {
        if days_left <= 1 {
            Urgency::Warn
        } else if days_left <= 7 {
            Urgency::Soon
        } else {
            Urgency::Relaxed
        }
    }
}

impl Project {
    pub fn new(id: Id, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            due_date: None,
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    /// The due date is cut to milliseconds, the precision it is stored with.
    pub fn with_due_date(self, due_date: Option<DateTime<Utc>>) -> Self {
        Self {
            due_date: due_date.map(to_millis),
            ..self
        }
    }

    /// Whole days between `today` and the local calendar day of the due date.
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.due_date
            .map(|due| days_between(today, due.with_timezone(&Local).date_naive()))
    }

    pub fn urgency(&self, today: NaiveDate) -> Option<Urgency> {
        self.days_left(today).map(Urgency::from_days_left)
    }
}
