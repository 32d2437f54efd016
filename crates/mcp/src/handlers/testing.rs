//! In-memory `ArgoApi` used by handler and dispatch tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use argonaut_api::ArgoApi;
use argonaut_types::{DEFAULT_NAMESPACE, ObjectMeta, ToolError, Workflow, WorkflowPhase, WorkflowStatus, WorkflowTemplate};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Default)]
pub(crate) struct FakeArgo {
    templates: Mutex<Vec<WorkflowTemplate>>,
    workflows: Mutex<Vec<Workflow>>,
    submit_phase: Mutex<Option<WorkflowPhase>>,
    last_parameters: Mutex<Option<IndexMap<String, String>>>,
    failure: Mutex<Option<ToolError>>,
    calls: AtomicUsize,
}

impl FakeArgo {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn insert_template(&self, template: WorkflowTemplate) {
        self.templates.lock().unwrap().push(template);
    }

    pub(crate) fn template(&self, name: &str, namespace: &str) -> Option<WorkflowTemplate> {
        self.templates
            .lock()
            .unwrap()
            .iter()
            .find(|template| template.metadata.name == name && template.metadata.namespace == namespace)
            .cloned()
    }

    pub(crate) fn insert_workflow(&self, workflow: Workflow) {
        self.workflows.lock().unwrap().push(workflow);
    }

    /// Phase the next submissions report; `None` leaves status empty.
    pub(crate) fn set_submit_phase(&self, phase: Option<WorkflowPhase>) {
        *self.submit_phase.lock().unwrap() = phase;
    }

    pub(crate) fn last_parameters(&self) -> Option<IndexMap<String, String>> {
        self.last_parameters.lock().unwrap().clone()
    }

    /// Make every subsequent call fail with `failure`.
    pub(crate) fn fail_with(&self, failure: ToolError) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    fn enter(&self) -> Result<(), ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ArgoApi for FakeArgo {
    fn default_namespace(&self) -> &str {
        DEFAULT_NAMESPACE
    }

    async fn create_workflow_template(&self, name: &str, namespace: &str, spec: Value) -> Result<WorkflowTemplate, ToolError> {
        self.enter()?;
        if self.template(name, namespace).is_some() {
            return Err(ToolError::already_exists("WorkflowTemplate", name, namespace));
        }
        let template = WorkflowTemplate::new(name, namespace, spec);
        self.insert_template(template.clone());
        Ok(template)
    }

    async fn get_workflow_template(&self, name: &str, namespace: &str) -> Result<WorkflowTemplate, ToolError> {
        self.enter()?;
        self.template(name, namespace)
            .ok_or_else(|| ToolError::not_found("WorkflowTemplate", name, namespace))
    }

    async fn list_workflow_templates(&self, namespace: Option<&str>) -> Result<Vec<WorkflowTemplate>, ToolError> {
        self.enter()?;
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);
        Ok(self
            .templates
            .lock()
            .unwrap()
            .iter()
            .filter(|template| template.metadata.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn delete_workflow_template(&self, name: &str, namespace: &str) -> Result<(), ToolError> {
        self.enter()?;
        let mut templates = self.templates.lock().unwrap();
        let before = templates.len();
        templates.retain(|template| !(template.metadata.name == name && template.metadata.namespace == namespace));
        if templates.len() == before {
            return Err(ToolError::not_found("WorkflowTemplate", name, namespace));
        }
        Ok(())
    }

    async fn submit_workflow(
        &self,
        template_name: &str,
        namespace: &str,
        parameters: Option<&IndexMap<String, String>>,
        generate_name: Option<&str>,
    ) -> Result<Workflow, ToolError> {
        self.enter()?;
        *self.last_parameters.lock().unwrap() = parameters.cloned();
        let name = generate_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{template_name}-{}", chrono::Utc::now().timestamp_millis()));
        let mut workflow = Workflow::from_template(template_name, ObjectMeta::named(name, namespace), parameters);
        if let Some(phase) = *self.submit_phase.lock().unwrap() {
            workflow.status = Some(WorkflowStatus {
                phase: Some(phase),
                ..Default::default()
            });
        }
        self.insert_workflow(workflow.clone());
        Ok(workflow)
    }

    async fn get_workflow(&self, name: &str, namespace: &str) -> Result<Workflow, ToolError> {
        self.enter()?;
        self.workflows
            .lock()
            .unwrap()
            .iter()
            .find(|workflow| workflow.metadata.name == name && workflow.metadata.namespace == namespace)
            .cloned()
            .ok_or_else(|| ToolError::not_found("Workflow", name, namespace))
    }

    async fn list_workflows(&self, namespace: Option<&str>, phase: Option<WorkflowPhase>) -> Result<Vec<Workflow>, ToolError> {
        self.enter()?;
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);
        Ok(self
            .workflows
            .lock()
            .unwrap()
            .iter()
            .filter(|workflow| workflow.metadata.namespace == namespace)
            .filter(|workflow| phase.is_none() || workflow.phase() == phase)
            .cloned()
            .collect())
    }

    async fn delete_workflow(&self, name: &str, namespace: &str) -> Result<(), ToolError> {
        self.enter()?;
        let mut workflows = self.workflows.lock().unwrap();
        let before = workflows.len();
        workflows.retain(|workflow| !(workflow.metadata.name == name && workflow.metadata.namespace == namespace));
        if workflows.len() == before {
            return Err(ToolError::not_found("Workflow", name, namespace));
        }
        Ok(())
    }
}
