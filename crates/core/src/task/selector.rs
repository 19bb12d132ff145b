//! Visibility filter applied when tasks enter the index.

use serde::{Deserialize, Serialize};

use super::types::Task;

/// Which parsed tasks are visible in the index.
///
/// The selector is stored with the index so incremental updates filter with
/// the same policy as the last full refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    /// Every checkbox line.
    #[default]
    All,
    /// Open tasks with a due date.
    Scheduled,
}

impl Selector {
    pub fn selects(self, task: &Task) -> bool {
        match self {
            Selector::All => true,
            Selector::Scheduled => !task.done && task.due_date.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn all_selects_everything() {
        let mut task = Task::new("anything");
        assert!(Selector::All.selects(&task));
        task.done = true;
        assert!(Selector::All.selects(&task));
    }

    #[test]
    fn scheduled_requires_open_and_due() {
        let mut task = Task::new("dated");
        assert!(!Selector::Scheduled.selects(&task));

        task.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(Selector::Scheduled.selects(&task));

        task.done = true;
        assert!(!Selector::Scheduled.selects(&task));
    }
}
