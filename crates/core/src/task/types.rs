//! Task value types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by due/done markers (`2024-01-01`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Task priority, ordered lowest to highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Inline marker symbol, empty for `None`.
    pub fn marker(self) -> &'static str {
        match self {
            Priority::None => "",
            Priority::Low => "\u{1f53d}",
            Priority::Medium => "\u{1f53c}",
            Priority::High => "\u{23eb}",
        }
    }

    /// Markers in the order the parser probes them.
    pub(crate) const ORDERED: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Recurrence rule for deriving the next due date on completion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Inline marker phrase, empty for `None`.
    pub fn marker(self) -> &'static str {
        match self {
            Recurrence::None => "",
            Recurrence::Daily => "\u{1f501} every day",
            Recurrence::Weekly => "\u{1f501} every week",
            Recurrence::Monthly => "\u{1f501} every month",
            Recurrence::Yearly => "\u{1f501} every year",
        }
    }

    /// Markers in the order the parser probes them.
    pub(crate) const ORDERED: [Recurrence; 4] = [
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            other => Err(format!("unknown recurrence: {other}")),
        }
    }
}

/// One checkbox line parsed from a note.
///
/// Identity is not stored: it is the SHA-256 digest of the canonical
/// serialized line, so any field change yields a new identity and two tasks
/// that serialize identically are indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub done: bool,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub due_date: Option<NaiveDate>,
    pub done_date: Option<NaiveDate>,
}

impl Task {
    /// A fresh, open task with the given description.
    pub fn new(text: impl Into<String>) -> Self {
        Task { text: text.into(), ..Task::default() }
    }
}

impl fmt::Display for Task {
    /// Canonical line form. This is the hashing input, so the field order
    /// (marker, text, priority, recurrence, due date, done date) is fixed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- [{}] {}", if self.done { "x" } else { " " }, self.text)?;
        if self.priority != Priority::None {
            write!(f, " {}", self.priority.marker())?;
        }
        if self.recurrence != Recurrence::None {
            write!(f, " {}", self.recurrence.marker())?;
        }
        if let Some(due) = self.due_date {
            write!(f, " \u{1f4c5} {}", due.format(DATE_FORMAT))?;
        }
        if let Some(done) = self.done_date {
            write!(f, " \u{2705} {}", done.format(DATE_FORMAT))?;
        }
        Ok(())
    }
}
