use chrono::NaiveDate;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mdtasks_core::config::ConfigFile;
use mdtasks_core::task::{DATE_FORMAT, Priority, Recurrence, Task};

pub fn add_task(
    cf: &ConfigFile,
    text: &str,
    due: Option<&str>,
    priority: Option<&str>,
    recurrence: Option<&str>,
) -> Result<()> {
    let mut task = Task::new(text);
    if let Some(due) = due {
        task.due_date = Some(
            NaiveDate::parse_from_str(due, DATE_FORMAT)
                .wrap_err_with(|| format!("invalid date '{due}', expected YYYY-MM-DD"))?,
        );
    }
    if let Some(p) = priority {
        task.priority = p.parse::<Priority>().map_err(|e| eyre!(e))?;
    }
    if let Some(r) = recurrence {
        task.recurrence = r.parse::<Recurrence>().map_err(|e| eyre!(e))?;
    }

    let vault = super::open_vault(cf);
    vault.add_task(&task)?;
    println!("Added: {task}");
    Ok(())
}

pub fn new_note(cf: &ConfigFile, title: &str, content: Option<&str>) -> Result<()> {
    let body = match content {
        Some(c) => c.to_string(),
        None => format!("# {title}\n"),
    };

    let vault = super::open_vault(cf);
    vault.add_note(title, &body)?;
    println!("Created note: {title}");
    Ok(())
}
