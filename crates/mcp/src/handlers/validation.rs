//! Argument validators run before any upstream call.
//!
//! Each validator stops at the first violation and reports it as
//! `InvalidInput` naming the offending field.

use argonaut_types::{ToolError, WorkflowPhase};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::handlers::args::{CreateTemplateArgs, ListTemplatesArgs, ListWorkflowsArgs, SubmitWorkflowArgs, TemplateArgs, WorkflowArgs};

static DNS_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid DNS label regex"));

const DNS_LABEL_RULE: &str = "must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";

/// True when `value` is a lower-case DNS label.
pub fn is_dns_label(value: &str) -> bool {
    DNS_LABEL.is_match(value)
}

pub fn validate_create_template_args(args: &CreateTemplateArgs) -> Result<(), ToolError> {
    require_non_empty("name", &args.name)?;
    require_dns_label("name", &args.name)?;
    if let Some(namespace) = args.namespace.as_deref() {
        require_non_empty("namespace", namespace)?;
        require_dns_label("namespace", namespace)?;
    }
    if !args.spec.is_object() {
        return Err(ToolError::invalid_input("spec", "spec must be an object"));
    }
    Ok(())
}

/// Shared by `get_workflow_template` and `delete_workflow_template`.
pub fn validate_template_args(args: &TemplateArgs) -> Result<(), ToolError> {
    require_non_empty("name", &args.name)?;
    optional_non_empty("namespace", args.namespace.as_deref())
}

pub fn validate_list_templates_args(args: &ListTemplatesArgs) -> Result<(), ToolError> {
    optional_non_empty("namespace", args.namespace.as_deref())
}

/// Validate a submission and return its parameters as an ordered string map.
pub fn validate_submit_args(args: &SubmitWorkflowArgs) -> Result<Option<IndexMap<String, String>>, ToolError> {
    require_non_empty("template_name", &args.template_name)?;
    optional_non_empty("namespace", args.namespace.as_deref())?;
    let parameters = args.parameters.as_ref().map(string_parameters).transpose()?;
    optional_non_empty("generate_name", args.generate_name.as_deref())?;
    Ok(parameters)
}

/// Shared by `get_workflow_status` and `delete_workflow`.
pub fn validate_workflow_args(args: &WorkflowArgs) -> Result<(), ToolError> {
    require_non_empty("name", &args.name)?;
    optional_non_empty("namespace", args.namespace.as_deref())
}

/// Validate a listing request and return the parsed phase filter.
pub fn validate_list_workflows_args(args: &ListWorkflowsArgs) -> Result<Option<WorkflowPhase>, ToolError> {
    optional_non_empty("namespace", args.namespace.as_deref())?;
    let Some(phase) = args.phase.as_deref() else {
        return Ok(None);
    };
    if phase.trim().is_empty() {
        return Err(ToolError::invalid_input("phase", "phase must be a non-empty string"));
    }
    phase
        .parse::<WorkflowPhase>()
        .map(Some)
        .map_err(|_| ToolError::invalid_input("phase", format!("phase must be one of: {}", WorkflowPhase::valid_values())))
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.is_empty() {
        return Err(ToolError::invalid_input(field, format!("{field} must be a non-empty string")));
    }
    if value.trim().is_empty() {
        return Err(ToolError::invalid_input(field, format!("{field} cannot be empty or whitespace only")));
    }
    Ok(())
}

fn optional_non_empty(field: &str, value: Option<&str>) -> Result<(), ToolError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ToolError::invalid_input(field, format!("{field} must be a non-empty string"))),
        _ => Ok(()),
    }
}

fn require_dns_label(field: &str, value: &str) -> Result<(), ToolError> {
    if is_dns_label(value) {
        Ok(())
    } else {
        Err(ToolError::invalid_input(field, format!("{field} {DNS_LABEL_RULE}")))
    }
}

fn string_parameters(raw: &Value) -> Result<IndexMap<String, String>, ToolError> {
    let Value::Object(entries) = raw else {
        return Err(ToolError::invalid_input("parameters", "parameters must be an object"));
    };
    entries
        .iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key.clone(), text.clone())),
            other => Err(ToolError::invalid_input(
                "parameters",
                format!("parameter '{key}' must be a string, got {}", json_type_name(other)),
            )),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argonaut_types::ErrorKind;
    use proptest::prelude::*;
    use serde_json::json;

    fn create_args(name: &str) -> CreateTemplateArgs {
        CreateTemplateArgs {
            name: name.to_string(),
            namespace: None,
            spec: json!({}),
        }
    }

    fn submit_args(parameters: Value) -> SubmitWorkflowArgs {
        SubmitWorkflowArgs {
            template_name: "hello".into(),
            namespace: None,
            parameters: Some(parameters),
            generate_name: None,
        }
    }

    fn field_of(error: &ToolError) -> &str {
        error.details().and_then(|details| details["field"].as_str()).unwrap_or_default()
    }

    #[test]
    fn create_rejects_bad_names() {
        for name in ["", "   ", "Hello", "-hello", "hello-", "hel_lo", "hello.world"] {
            let error = validate_create_template_args(&create_args(name)).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidInput, "{name:?}");
            assert_eq!(field_of(&error), "name", "{name:?}");
        }
    }

    #[test]
    fn create_checks_namespace_format_only_when_supplied() {
        let mut args = create_args("hello");
        assert!(validate_create_template_args(&args).is_ok());
        args.namespace = Some("Team_A".into());
        assert_eq!(field_of(&validate_create_template_args(&args).unwrap_err()), "namespace");
        args.namespace = Some("team-a".into());
        assert!(validate_create_template_args(&args).is_ok());
    }

    #[test]
    fn create_requires_object_spec() {
        for spec in [Value::Null, json!("text"), json!([1, 2]), json!(3)] {
            let mut args = create_args("hello");
            args.spec = spec;
            let error = validate_create_template_args(&args).unwrap_err();
            assert_eq!(field_of(&error), "spec");
            assert_eq!(error.message(), "Invalid input for field 'spec': spec must be an object");
        }
    }

    #[test]
    fn reads_accept_non_dns_namespace_but_not_blank() {
        let args = TemplateArgs {
            name: "hello".into(),
            namespace: Some("Team_A".into()),
        };
        assert!(validate_template_args(&args).is_ok());

        let blank = WorkflowArgs {
            name: "wf".into(),
            namespace: Some(" ".into()),
        };
        assert_eq!(field_of(&validate_workflow_args(&blank).unwrap_err()), "namespace");
        assert!(validate_list_templates_args(&ListTemplatesArgs { namespace: Some(String::new()) }).is_err());
    }

    #[test]
    fn whitespace_name_has_dedicated_reason() {
        let error = validate_workflow_args(&WorkflowArgs {
            name: "  ".into(),
            namespace: None,
        })
        .unwrap_err();
        assert_eq!(error.details().unwrap()["reason"], "name cannot be empty or whitespace only");
    }

    #[test]
    fn submit_names_first_non_string_parameter() {
        let error = validate_submit_args(&submit_args(json!({ "a": "1", "b": 2, "c": true }))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.details().unwrap()["reason"], "parameter 'b' must be a string, got number");
    }

    #[test]
    fn submit_follows_caller_key_order() {
        let error = validate_submit_args(&submit_args(json!({ "z": "ok", "m": 1, "a": false }))).unwrap_err();
        assert_eq!(error.details().unwrap()["reason"], "parameter 'm' must be a string, got number");

        let parsed = validate_submit_args(&submit_args(json!({ "zeta": "1", "alpha": "2" }))).unwrap().unwrap();
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn submit_rejects_non_object_parameters_and_blank_generate_name() {
        assert_eq!(field_of(&validate_submit_args(&submit_args(json!(["a"]))).unwrap_err()), "parameters");

        let mut args = submit_args(json!({}));
        args.generate_name = Some(" ".into());
        assert_eq!(field_of(&validate_submit_args(&args).unwrap_err()), "generate_name");
    }

    #[test]
    fn submit_without_parameters_yields_none() {
        let mut args = submit_args(json!({}));
        args.parameters = None;
        assert_eq!(validate_submit_args(&args).unwrap(), None);
    }

    #[test]
    fn phase_filter_must_be_known() {
        let parsed = validate_list_workflows_args(&ListWorkflowsArgs {
            namespace: None,
            phase: Some("Succeeded".into()),
        })
        .unwrap();
        assert_eq!(parsed, Some(WorkflowPhase::Succeeded));

        let error = validate_list_workflows_args(&ListWorkflowsArgs {
            namespace: None,
            phase: Some("Done".into()),
        })
        .unwrap_err();
        assert_eq!(
            error.details().unwrap()["reason"],
            "phase must be one of: Pending, Running, Succeeded, Failed, Error, Skipped, Omitted"
        );

        let blank = validate_list_workflows_args(&ListWorkflowsArgs {
            namespace: None,
            phase: Some(String::new()),
        })
        .unwrap_err();
        assert_eq!(blank.details().unwrap()["reason"], "phase must be a non-empty string");
    }

    proptest! {
        #[test]
        fn valid_dns_labels_pass_create(name in "[a-z0-9]([-a-z0-9]{0,40}[a-z0-9])?") {
            prop_assert!(validate_create_template_args(&create_args(&name)).is_ok());
        }

        #[test]
        fn uppercase_names_fail_create(prefix in "[a-z0-9]{0,8}", upper in "[A-Z]", suffix in "[a-z0-9]{0,8}") {
            let name = format!("{prefix}{upper}{suffix}");
            let error = validate_create_template_args(&create_args(&name)).unwrap_err();
            prop_assert_eq!(error.kind(), ErrorKind::InvalidInput);
            prop_assert_eq!(field_of(&error), "name");
        }

        #[test]
        fn edge_hyphens_fail_create(body in "[a-z0-9]{1,10}", leading in any::<bool>()) {
            let name = if leading { format!("-{body}") } else { format!("{body}-") };
            let error = validate_create_template_args(&create_args(&name)).unwrap_err();
            prop_assert_eq!(field_of(&error), "name");
        }

        #[test]
        fn string_parameters_pass_submit(parameters in prop::collection::btree_map("[a-z]{1,8}", ".{0,12}", 0..8)) {
            let raw = serde_json::to_value(&parameters).unwrap();
            let parsed = validate_submit_args(&submit_args(raw)).unwrap().unwrap();
            prop_assert_eq!(parsed.len(), parameters.len());
            for (key, value) in &parameters {
                prop_assert_eq!(parsed.get(key), Some(value));
            }
        }

        #[test]
        fn non_string_parameter_is_named(
            parameters in prop::collection::btree_map("[a-z]{1,8}", "[a-z]{0,8}", 0..6),
            bad_key in "[A-Z]{1,8}",
            bad_value in prop_oneof![Just(json!(1)), Just(json!(false)), Just(json!(null)), Just(json!([])), Just(json!({}))],
        ) {
            let mut raw = serde_json::to_value(&parameters).unwrap();
            raw[bad_key.as_str()] = bad_value;
            let error = validate_submit_args(&submit_args(raw)).unwrap_err();
            prop_assert_eq!(error.kind(), ErrorKind::InvalidInput);
            let reason = error.details().unwrap()["reason"].as_str().unwrap().to_string();
            let expected = format!("parameter '{bad_key}' must be a string");
            prop_assert!(reason.starts_with(&expected));
        }
    }
}
