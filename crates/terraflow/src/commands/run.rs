use crate::utils;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use terraflow_config::LoadedPlan;
use terraflow_core::{CancellationToken, StateManager};

/// Where the queue starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// Saved head, if it belongs to this queue
    Resume,
    /// First action; saved state is discarded
    Fresh,
    /// Explicit index
    At(usize),
}

pub async fn handle(
    loaded: &LoadedPlan,
    code_path: Option<PathBuf>,
    binary: Option<String>,
    start: Start,
) -> anyhow::Result<()> {
    println!("Plan: {}", loaded.path.display().to_string().cyan());

    let mut terraform = utils::build_queue(loaded, code_path, binary)?;
    let state = StateManager::new(loaded.project_root());

    match start {
        Start::At(index) => terraform.set_head(index)?,
        Start::Fresh => {
            if state.clear().await? {
                println!("{}", "Saved progress discarded".yellow());
            }
        }
        Start::Resume => {
            match state.restore(&mut terraform).await? {
                Some(head) if head > 0 => {
                    println!("{}", format!("Resuming at action #{}", head).yellow());
                }
                _ => {}
            }
        }
    }

    if terraform.head() == terraform.len() {
        println!(
            "{}",
            format!(
                "All {} actions already completed. Use --reset to run them again.",
                terraform.len()
            )
            .green()
        );
        return Ok(());
    }

    println!();
    for (index, action) in terraform.actions().iter().enumerate().skip(terraform.head()) {
        println!("  • #{} {}", index, action.kind().to_string().cyan());
    }
    println!();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping the running action");
            interrupt.cancel();
        }
    });

    let result = terraform.execute(&cancel).await;
    signal_task.abort();
    let saved = state.save(&terraform).await;

    match result {
        Ok(output) => {
            std::io::stdout().write_all(&output.stdout)?;
            std::io::stderr().write_all(&output.stderr)?;
            println!();
            println!(
                "{}",
                format!("✓ {} actions completed", terraform.len()).green()
            );
            saved.map_err(|e| {
                anyhow::Error::new(e).context(format!(
                    "actions completed but progress could not be saved to {}",
                    state.state_path().display()
                ))
            })?;
            Ok(())
        }
        Err(e) => {
            if let Some((stdout, _)) = e.output() {
                std::io::stdout().write_all(stdout)?;
            }
            if let Some(action) = e.failed_index().and_then(|i| terraform.action(i)) {
                std::io::stderr().write_all(action.output().1)?;
                eprintln!();
                eprintln!("{}", format!("✗ {}", e).red());
                if saved.is_ok() {
                    eprintln!(
                        "  Fix the problem and run {} again to resume at action #{}",
                        "tflow run".cyan(),
                        terraform.head()
                    );
                } else {
                    eprintln!(
                        "  Fix the problem and run {} to resume at action #{}",
                        format!("tflow run --from {}", terraform.head()).cyan(),
                        terraform.head()
                    );
                }
            }
            if let Err(save_err) = saved {
                tracing::warn!("Failed to save queue state: {}", save_err);
                eprintln!(
                    "{}",
                    format!(
                        "⚠ progress could not be saved to {}: {}",
                        state.state_path().display(),
                        save_err
                    )
                    .yellow()
                );
            }
            Err(e.into())
        }
    }
}
