//! Static tool catalog published through `tools/list`.

use std::fmt;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use schemars::JsonSchema;
use serde_json::Value;

use crate::handlers::args::{CreateTemplateArgs, ListTemplatesArgs, ListWorkflowsArgs, SubmitWorkflowArgs, TemplateArgs, WorkflowArgs};

/// The eight tool names accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    CreateWorkflowTemplate,
    GetWorkflowTemplate,
    ListWorkflowTemplates,
    DeleteWorkflowTemplate,
    SubmitWorkflow,
    GetWorkflowStatus,
    ListWorkflows,
    DeleteWorkflow,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::CreateWorkflowTemplate,
        ToolName::GetWorkflowTemplate,
        ToolName::ListWorkflowTemplates,
        ToolName::DeleteWorkflowTemplate,
        ToolName::SubmitWorkflow,
        ToolName::GetWorkflowStatus,
        ToolName::ListWorkflows,
        ToolName::DeleteWorkflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::CreateWorkflowTemplate => "create_workflow_template",
            ToolName::GetWorkflowTemplate => "get_workflow_template",
            ToolName::ListWorkflowTemplates => "list_workflow_templates",
            ToolName::DeleteWorkflowTemplate => "delete_workflow_template",
            ToolName::SubmitWorkflow => "submit_workflow",
            ToolName::GetWorkflowStatus => "get_workflow_status",
            ToolName::ListWorkflows => "list_workflows",
            ToolName::DeleteWorkflow => "delete_workflow",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    /// Top-level argument keys accepted by this tool.
    pub fn argument_fields(&self) -> &'static [&'static str] {
        match self {
            ToolName::CreateWorkflowTemplate => &["name", "namespace", "spec"],
            ToolName::GetWorkflowTemplate
            | ToolName::DeleteWorkflowTemplate
            | ToolName::GetWorkflowStatus
            | ToolName::DeleteWorkflow => &["name", "namespace"],
            ToolName::ListWorkflowTemplates => &["namespace"],
            ToolName::SubmitWorkflow => &["template_name", "namespace", "parameters", "generate_name"],
            ToolName::ListWorkflows => &["namespace", "phase"],
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ToolName::CreateWorkflowTemplate => {
                "Create a WorkflowTemplate. Input: name (DNS label), optional namespace, spec (Argo WorkflowTemplate spec object). Returns name, namespace, created_at."
            }
            ToolName::GetWorkflowTemplate => "Get one WorkflowTemplate by name. Returns name, namespace, spec, created_at.",
            ToolName::ListWorkflowTemplates => "List WorkflowTemplates in a namespace. Returns templates[] with name, namespace, created_at.",
            ToolName::DeleteWorkflowTemplate => "Delete a WorkflowTemplate by name. Deleting a missing template fails with NotFound.",
            ToolName::SubmitWorkflow => {
                "Run a WorkflowTemplate. Input: template_name, optional namespace, optional parameters (string values), optional generate_name. Returns name, namespace, status, created_at."
            }
            ToolName::GetWorkflowStatus => {
                "Get a workflow's status: phase, progress, timestamps, message, and one entry per execution node."
            }
            ToolName::ListWorkflows => "List workflows in a namespace, optionally filtered by phase.",
            ToolName::DeleteWorkflow => "Delete a workflow by name. Deleting a missing workflow fails with NotFound.",
        }
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        match self {
            ToolName::CreateWorkflowTemplate => schema_object::<CreateTemplateArgs>(),
            ToolName::GetWorkflowTemplate | ToolName::DeleteWorkflowTemplate => schema_object::<TemplateArgs>(),
            ToolName::ListWorkflowTemplates => schema_object::<ListTemplatesArgs>(),
            ToolName::SubmitWorkflow => schema_object::<SubmitWorkflowArgs>(),
            ToolName::GetWorkflowStatus | ToolName::DeleteWorkflow => schema_object::<WorkflowArgs>(),
            ToolName::ListWorkflows => schema_object::<ListWorkflowsArgs>(),
        }
    }

    fn annotations(&self) -> ToolAnnotations {
        let mut annotations = ToolAnnotations::default();
        match self {
            ToolName::GetWorkflowTemplate | ToolName::ListWorkflowTemplates | ToolName::GetWorkflowStatus | ToolName::ListWorkflows => {
                annotations.read_only_hint = Some(true);
            }
            ToolName::DeleteWorkflowTemplate | ToolName::DeleteWorkflow => {
                annotations.read_only_hint = Some(false);
                annotations.destructive_hint = Some(true);
            }
            ToolName::CreateWorkflowTemplate | ToolName::SubmitWorkflow => {
                annotations.read_only_hint = Some(false);
                annotations.destructive_hint = Some(false);
            }
        }
        annotations.open_world_hint = Some(true);
        annotations
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the published tool list, in dispatch-table order.
pub fn tool_catalog() -> Vec<Tool> {
    ToolName::ALL
        .iter()
        .map(|tool_name| {
            let mut tool = Tool::new(tool_name.as_str(), tool_name.description(), tool_name.input_schema());
            tool.annotations = Some(tool_name.annotations());
            tool
        })
        .collect()
}

fn schema_object<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    let object = match serde_json::to_value(schema) {
        Ok(Value::Object(object)) => object,
        _ => JsonObject::new(),
    };
    Arc::new(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_lookup() {
        for tool in ToolName::ALL {
            assert_eq!(ToolName::from_name(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolName::from_name("unknown_tool"), None);
    }

    #[test]
    fn catalog_lists_all_tools_with_object_schemas() {
        let catalog = tool_catalog();
        let names: Vec<&str> = catalog.iter().map(|tool| &*tool.name).collect();
        assert_eq!(
            names,
            vec![
                "create_workflow_template",
                "get_workflow_template",
                "list_workflow_templates",
                "delete_workflow_template",
                "submit_workflow",
                "get_workflow_status",
                "list_workflows",
                "delete_workflow",
            ]
        );
        for tool in &catalog {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }

    #[test]
    fn required_fields_follow_argument_types() {
        let create = ToolName::CreateWorkflowTemplate.input_schema();
        let required: Vec<&str> = create["required"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
        assert!(required.contains(&"name"));
        assert!(required.contains(&"spec"));
        assert!(!required.contains(&"namespace"));

        let submit = ToolName::SubmitWorkflow.input_schema();
        assert_eq!(submit["required"], serde_json::json!(["template_name"]));
        let list = ToolName::ListWorkflows.input_schema();
        let list_required = list.get("required").and_then(Value::as_array).map_or(0, Vec::len);
        assert_eq!(list_required, 0);
    }

    #[test]
    fn argument_fields_match_schema_properties() {
        for tool in ToolName::ALL {
            let schema = tool.input_schema();
            let mut published: Vec<&str> = schema["properties"].as_object().unwrap().keys().map(String::as_str).collect();
            published.sort_unstable();
            let mut declared = tool.argument_fields().to_vec();
            declared.sort_unstable();
            assert_eq!(published, declared, "{tool}");
        }
    }

    #[test]
    fn deletes_are_marked_destructive() {
        let annotations = ToolName::DeleteWorkflow.annotations();
        assert_eq!(annotations.destructive_hint, Some(true));
        assert_eq!(ToolName::ListWorkflows.annotations().read_only_hint, Some(true));
    }
}
