use color_eyre::eyre::Result;
use mdtasks_core::config::ConfigFile;
use mdtasks_core::task::Selector;

const SHORT_ID_LEN: usize = 12;

pub fn run(cf: &ConfigFile, all: bool, long: bool) -> Result<()> {
    let vault = super::open_vault(cf);
    let selector = if all { Selector::All } else { Selector::Scheduled };
    vault.refresh(selector)?;

    let mut tasks = vault.get_tasks();
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.text.cmp(&b.text)));

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for task in &tasks {
        let id = task.hash();
        let shown = if long { id.as_str() } else { &id[..SHORT_ID_LEN] };
        println!("{shown}  {task}");
    }
    Ok(())
}
