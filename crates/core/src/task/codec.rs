//! Line-level task grammar: parse, hash, recurrence arithmetic.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;
use sha2::{Digest, Sha256};

use super::types::{DATE_FORMAT, Priority, Recurrence, Task};

static TASK_START: LazyLock<Regex> = LazyLock::new(|| {
    // Matches "- [ ]", "- [x]", "* [X]" with optional leading indentation.
    Regex::new(r"^\s*[*-] \[(x| |X)\]\s*").expect("task marker regex")
});

static DUE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\u{1f4c5} (\d{4}-\d{2}-\d{2})").expect("due date regex"));

static DONE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\u{2705} (\d{4}-\d{2}-\d{2})").expect("done date regex"));

impl Task {
    /// Parse one line of note text. Returns `None` for anything that is not
    /// a checkbox line; that is the normal outcome for prose, not an error.
    ///
    /// Markers are stripped as they are recognized (completion state,
    /// priority, recurrence, due date, done date, in that order); whatever
    /// remains, trimmed, is the task text.
    pub fn parse(line: &str) -> Option<Task> {
        let caps = TASK_START.captures(line)?;
        let mut task = Task { done: &caps[1] != " ", ..Task::default() };

        let matched = caps[0].to_string();
        let mut rest = line.replacen(&matched, "", 1);

        for priority in Priority::ORDERED {
            if rest.contains(priority.marker()) {
                task.priority = priority;
                rest = rest.replacen(priority.marker(), "", 1);
                break;
            }
        }

        for recurrence in Recurrence::ORDERED {
            if rest.contains(recurrence.marker()) {
                task.recurrence = recurrence;
                rest = rest.replacen(recurrence.marker(), "", 1);
                break;
            }
        }

        if let Some(caps) = DUE_DATE_RE.captures(&rest) {
            let whole = caps[0].to_string();
            task.due_date = NaiveDate::parse_from_str(&caps[1], DATE_FORMAT).ok();
            rest = rest.replacen(&whole, "", 1);
        }

        if let Some(caps) = DONE_DATE_RE.captures(&rest) {
            let whole = caps[0].to_string();
            task.done_date = NaiveDate::parse_from_str(&caps[1], DATE_FORMAT).ok();
            rest = rest.replacen(&whole, "", 1);
        }

        task.text = rest.trim().to_string();
        Some(task)
    }

    /// Content-derived identity: hex SHA-256 of the canonical serialized line.
    pub fn hash(&self) -> String {
        let digest = Sha256::digest(self.to_string().as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The due date a recurring task rolls forward to on completion.
    ///
    /// Fixed offsets per recurrence class (+1, +7, +30, +365 days). This is a
    /// calendar-naive approximation, kept as-is on purpose; months and years
    /// are not calendar-accurate.
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        let due = self.due_date?;
        let next = match self.recurrence {
            Recurrence::None => due,
            Recurrence::Daily => due + Duration::days(1),
            Recurrence::Weekly => due + Duration::days(7),
            Recurrence::Monthly => due + Duration::days(30),
            Recurrence::Yearly => due + Duration::days(365),
        };
        Some(next)
    }
}
