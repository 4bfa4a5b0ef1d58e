use std::path::{Path, PathBuf};
use terraflow_config::LoadedPlan;
use terraflow_core::{
    TERRAFORM_BIN, Terraform, TerraformOption, with_actions, with_binary, with_code_path,
    with_env,
};

/// Build the queue described by a plan file, applying CLI overrides.
pub fn build_queue(
    loaded: &LoadedPlan,
    code_path: Option<PathBuf>,
    binary: Option<String>,
) -> anyhow::Result<Terraform> {
    let mut options: Vec<TerraformOption> = vec![with_actions(loaded.plan.actions.clone())];

    let binary = match binary {
        Some(binary) => Some(resolve_binary(&binary, &std::env::current_dir()?)),
        None => loaded
            .plan
            .binary
            .as_deref()
            .map(|binary| resolve_binary(binary, &loaded.project_root())),
    };
    if let Some(binary) = binary {
        options.push(with_binary(binary));
    }

    options.push(with_code_path(
        code_path.unwrap_or_else(|| loaded.code_path()),
    ));

    for (key, value) in &loaded.plan.env {
        options.push(with_env(key.clone(), value.clone()));
    }

    Ok(Terraform::new(options)?)
}

/// Queue holding only the plan's actions; enough for fingerprinting.
pub fn fingerprint_queue(loaded: &LoadedPlan) -> anyhow::Result<Terraform> {
    Ok(Terraform::new([with_actions(loaded.plan.actions.clone())])?)
}

/// Binary named in a plan, for display
pub fn display_binary(loaded: &LoadedPlan) -> &str {
    loaded.plan.binary.as_deref().unwrap_or(TERRAFORM_BIN)
}

/// Anchor a relative binary path to `base`; bare names stay `PATH` lookups.
///
/// The child runs inside the code path, so a relative path would otherwise
/// be resolved from the wrong directory.
pub fn resolve_binary(binary: &str, base: &Path) -> String {
    let path = Path::new(binary);
    if path.is_absolute() || path.components().count() == 1 {
        return binary.to_string();
    }
    base.join(path).display().to_string()
}

/// Render an argument list as a copy-pasteable shell line.
pub fn format_command_line(binary: &str, args: &[String]) -> String {
    std::iter::once(binary)
        .chain(args.iter().map(String::as_str))
        .map(quote)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,@[]".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
