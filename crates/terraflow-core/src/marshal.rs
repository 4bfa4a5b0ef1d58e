//! Option marshaling
//!
//! Turns an action's option table into the argument list handed to the
//! terraform binary. Every action kind declares its options once, as an
//! ordered list of [`Flag`] entries, and shares the single [`marshal`] routine.
//! Option fields are switches, single values or lists; tables hold nothing
//! else, so there is no unknown field kind to skip.

use crate::error::{Result, TerraformError};

/// Value of a single option field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagValue<'a> {
    /// Emits the template alone when set
    Switch(bool),
    /// Emits `template + value` when non-empty
    Value(&'a str),
    /// Emits `template + element` for each non-empty element
    List(&'a [String]),
}

/// One entry of an action's option table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag<'a> {
    /// Literal command-line prefix, e.g. `-auto-approve` or `-target=`
    pub template: &'static str,
    pub value: FlagValue<'a>,
}

impl<'a> Flag<'a> {
    pub fn switch(template: &'static str, on: bool) -> Self {
        Self {
            template,
            value: FlagValue::Switch(on),
        }
    }

    pub fn value(template: &'static str, value: &'a str) -> Self {
        Self {
            template,
            value: FlagValue::Value(value),
        }
    }

    pub fn list(template: &'static str, values: &'a [String]) -> Self {
        Self {
            template,
            value: FlagValue::List(values),
        }
    }
}

/// Build the argument list for one invocation.
///
/// The first element is always the sub-command name. A name that is not a
/// single bare token cannot be a sub-command and is rejected.
pub fn marshal(kind: &str, flags: &[Flag<'_>]) -> Result<Vec<String>> {
    if kind.is_empty() || kind.chars().any(char::is_whitespace) {
        return Err(TerraformError::InvalidAction {
            kind: format!("{:?}", kind),
        });
    }

    let mut args = vec![kind.to_string()];

    for flag in flags {
        match flag.value {
            FlagValue::Switch(true) => args.push(flag.template.to_string()),
            FlagValue::Switch(false) => {}
            FlagValue::Value(value) => {
                if !value.is_empty() {
                    args.push(format!("{}{}", flag.template, value));
                }
            }
            FlagValue::List(values) => {
                args.extend(
                    values
                        .iter()
                        .filter(|v| !v.is_empty())
                        .map(|v| format!("{}{}", flag.template, v)),
                );
            }
        }
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flags_emit_only_kind() {
        let empty: Vec<String> = Vec::new();
        let flags = [
            Flag::switch("-auto-approve", false),
            Flag::value("-backup=", ""),
            Flag::list("-target=", &empty),
        ];
        assert_eq!(marshal("apply", &flags).unwrap(), vec!["apply"]);
    }

    #[test]
    fn test_switch_emits_template_once() {
        let flags = [Flag::switch("-no-color", true)];
        let args = marshal("output", &flags).unwrap();
        assert_eq!(args, vec!["output", "-no-color"]);
        assert_eq!(args.iter().filter(|a| *a == "-no-color").count(), 1);
    }

    #[test]
    fn test_value_concatenates_template() {
        let flags = [Flag::value("-backup=", "/tmp/state.backup")];
        assert_eq!(
            marshal("apply", &flags).unwrap(),
            vec!["apply", "-backup=/tmp/state.backup"]
        );
    }

    #[test]
    fn test_list_skips_empty_elements_and_keeps_order() {
        let targets = vec!["a".to_string(), String::new(), "b".to_string()];
        let flags = [Flag::list("-target=", &targets)];
        let args = marshal("apply", &flags).unwrap();
        assert_eq!(&args[1..], ["-target=a", "-target=b"]);
    }

    #[test]
    fn test_declared_order_is_preserved() {
        let vars = vec!["region=eu-west-1".to_string()];
        let flags = [
            Flag::value("-parallelism=", "4"),
            Flag::switch("-auto-approve", true),
            Flag::list("-var=", &vars),
        ];
        assert_eq!(
            marshal("apply", &flags).unwrap(),
            vec![
                "apply",
                "-parallelism=4",
                "-auto-approve",
                "-var=region=eu-west-1"
            ]
        );
    }

    #[test]
    fn test_invalid_kind_is_rejected() {
        let err = marshal("", &[]).unwrap_err();
        assert!(matches!(err, TerraformError::InvalidAction { .. }));

        let err = marshal("apply now", &[]).unwrap_err();
        match err {
            TerraformError::InvalidAction { kind } => assert_eq!(kind, "\"apply now\""),
            other => panic!("unexpected error: {other}"),
        }
    }
}
