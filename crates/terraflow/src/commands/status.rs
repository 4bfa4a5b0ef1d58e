use crate::utils;
use colored::Colorize;
use terraflow_config::LoadedPlan;
use terraflow_core::StateManager;

pub async fn handle(loaded: &LoadedPlan) -> anyhow::Result<()> {
    let terraform = utils::fingerprint_queue(loaded)?;
    let state = StateManager::new(loaded.project_root());

    println!("Plan: {}", loaded.path.display().to_string().cyan());

    let head = match state.load().await? {
        Some(saved) if saved.matches(&terraform)? => {
            println!("Last run: {}", saved.updated_at.to_rfc3339().dimmed());
            saved.head
        }
        Some(saved) => {
            println!(
                "{}",
                format!(
                    "Saved progress from {} belongs to a different queue and will be ignored",
                    saved.updated_at.to_rfc3339()
                )
                .yellow()
            );
            0
        }
        None => 0,
    };

    println!();
    for (index, action) in terraform.actions().iter().enumerate() {
        let kind = action.kind().to_string();
        let line = if index < head {
            format!("  {} #{} {}", "✓".green(), index, kind)
        } else if index == head {
            format!("  {} #{} {} {}", "▶".yellow(), index, kind.bold(), "(next)".yellow())
        } else {
            format!("  {} #{} {}", "·".dimmed(), index, kind.dimmed())
        };
        println!("{}", line);
    }

    println!();
    if head == terraform.len() {
        println!("{}", "All actions completed".green());
    } else {
        println!("{}/{} actions completed", head, terraform.len());
    }

    Ok(())
}
