use crate::utils;
use colored::Colorize;
use terraflow_config::LoadedPlan;

pub fn handle(loaded: &LoadedPlan) -> anyhow::Result<()> {
    let binary = utils::display_binary(loaded);

    for (index, action) in loaded.plan.actions.iter().enumerate() {
        let args = action.marshal()?;
        println!(
            "{} {}",
            format!("#{}", index).dimmed(),
            utils::format_command_line(binary, &args)
        );
    }

    Ok(())
}
