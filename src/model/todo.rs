use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::utils::time::to_millis;

use super::id::Id;

/// A finished span of work on a todo. The duration is always derived from the two ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTime {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration: Duration,
}

impl TaskTime {
    /// Returns `None` when `end` precedes `start`. Both ends are cut to milliseconds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        let (start, end) = (to_millis(start), to_millis(end));
        (end >= start).then(|| Self {
            start,
            end,
            duration: end - start,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Sum of the interval durations, `None` if it doesn't fit into a [Duration].
pub fn checked_total(intervals: &[TaskTime]) -> Option<Duration> {
    intervals
        .iter()
        .try_fold(Duration::zero(), |total, interval| total.checked_add(&interval.duration()))
}

/// Work timer of a single todo. Being a single value, a todo can never have two timers running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timer {
    #[default]
    Idle,
    Running { since: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: Id,
    pub project_id: Id,
    pub title: String,
    pub last_worked: Option<DateTime<Utc>>,
    task_time: Vec<TaskTime>,
    timer: Timer,
}

impl Todo {
    pub fn new(id: Id, project_id: Id, title: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            last_worked: None,
            task_time: Vec::new(),
            timer: Timer::Idle,
        }
    }

    /// Rebuilds a todo from already validated parts, e.g. when decoding.
    pub fn from_parts(
        id: Id,
        project_id: Id,
        title: String,
        task_time: Vec<TaskTime>,
        last_worked: Option<DateTime<Utc>>,
        timer: Timer,
    ) -> Self {
        let timer = match timer {
            Timer::Running { since } => Timer::Running {
                since: to_millis(since),
            },
            Timer::Idle => Timer::Idle,
        };
        Self {
            id,
            project_id,
            title,
            last_worked: last_worked.map(to_millis),
            task_time,
            timer,
        }
    }

    pub fn task_time(&self) -> &[TaskTime] {
        &self.task_time
    }

    pub fn timer(&self) -> Timer {
        self.timer
    }

    pub fn is_running(&self) -> bool {
        matches!(self.timer, Timer::Running { .. })
    }

    pub fn task_start_time(&self) -> Option<DateTime<Utc>> {
        match self.timer {
            Timer::Idle => None,
            Timer::Running { since } => Some(since),
        }
    }

    /// Sum of all recorded intervals, saturating at the longest [Duration]. Time of a running
    /// timer is not included.
    pub fn total_duration(&self) -> Duration {
        checked_total(&self.task_time).unwrap_or_else(Duration::max_value)
    }

    /// Time on the running timer, if any.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.task_start_time()
            .map(|since| (now - since).max(Duration::zero()))
    }

    /// Starts the timer. Returns `false` and changes nothing if it is already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        match self.timer {
            Timer::Running { .. } => false,
            Timer::Idle => {
                let since = to_millis(now);
                debug!("Starting timer of {} at {since}", self.id);
                self.timer = Timer::Running { since };
                true
            }
        }
    }

    /// Stops the timer and records the elapsed interval. Returns the recorded interval, or `None`
    /// if the timer was idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<&TaskTime> {
        let Timer::Running { since } = self.timer else {
            return None;
        };
        // A clock that went backwards closes the interval at its own start.
        let end = to_millis(now).max(since);
        let interval = TaskTime::new(since, end)?;
        debug!(
            "Stopping timer of {} after {}ms",
            self.id,
            interval.duration().num_milliseconds()
        );
        self.timer = Timer::Idle;
        self.last_worked = Some(end);
        self.task_time.push(interval);
        self.task_time.last()
    }

    /// Drops the running timer without recording anything. Returns `false` if it was idle.
    pub fn cancel(&mut self) -> bool {
        match self.timer {
            Timer::Idle => false,
            Timer::Running { .. } => {
                debug!("Cancelling timer of {}", self.id);
                self.timer = Timer::Idle;
                true
            }
        }
    }
}
