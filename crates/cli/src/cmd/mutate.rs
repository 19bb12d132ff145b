use chrono::NaiveDate;
use color_eyre::eyre::{Result, WrapErr};
use mdtasks_core::config::ConfigFile;
use mdtasks_core::task::{DATE_FORMAT, Selector};

pub fn done(cf: &ConfigFile, id: &str) -> Result<()> {
    let vault = super::open_vault(cf);
    vault.refresh(Selector::All)?;
    let (hash, task) = super::resolve_task(&vault, id)?;
    vault.done_task(&hash)?;
    println!("Done: {}", task.text);
    Ok(())
}

pub fn snooze(cf: &ConfigFile, id: &str, date: &str) -> Result<()> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .wrap_err_with(|| format!("invalid date '{date}', expected YYYY-MM-DD"))?;

    let vault = super::open_vault(cf);
    vault.refresh(Selector::All)?;
    let (hash, task) = super::resolve_task(&vault, id)?;
    vault.snooze_task(&hash, date)?;
    println!("Snoozed until {date}: {}", task.text);
    Ok(())
}

pub fn remove(cf: &ConfigFile, id: &str) -> Result<()> {
    let vault = super::open_vault(cf);
    vault.refresh(Selector::All)?;
    let (hash, task) = super::resolve_task(&vault, id)?;
    vault.remove_task(&hash)?;
    println!("Removed: {}", task.text);
    Ok(())
}
