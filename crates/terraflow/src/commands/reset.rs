use colored::Colorize;
use terraflow_config::LoadedPlan;
use terraflow_core::StateManager;

pub async fn handle(loaded: &LoadedPlan) -> anyhow::Result<()> {
    let state = StateManager::new(loaded.project_root());

    if state.clear().await? {
        println!("{}", "✓ Saved progress removed".green());
    } else {
        println!("{}", "No saved progress".dimmed());
    }

    Ok(())
}
