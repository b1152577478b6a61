//! Simple template renderer using {{variable}} syntax.

use std::collections::HashMap;

use crate::error::NotificationError;

/// Template identifier of the built-in import summary email.
pub const IMPORT_SUMMARY_TEMPLATE: &str = "siigo-import-summary";

#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub subject: String,
    pub body: String,
}

pub struct TemplateRenderer {
    templates: HashMap<String, Template>,
}

impl TemplateRenderer {
    /// Creates a renderer with the built-in templates registered.
    #[must_use]
    pub fn new() -> Self {
        let mut renderer = Self {
            templates: HashMap::new(),
        };
        renderer.register(Template {
            id: IMPORT_SUMMARY_TEMPLATE.to_string(),
            subject: "Siigo payables import {{status}} ({{request_id}})".to_string(),
            body: "The accounts-payable import {{request_id}} finished with status \
                   {{status}}.\n\nPages processed: {{pages_processed}}\nRows imported: \
                   {{rows_imported}}\nRows failed: {{rows_failed}}\n"
                .to_string(),
        });
        renderer
    }

    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, template_id: &str) -> Option<&Template> {
        self.templates.get(template_id)
    }

    /// Renders a registered template with the given variables.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::TemplateNotFound`] for unknown ids.
    pub fn render(
        &self,
        template_id: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<(String, String), NotificationError> {
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| NotificationError::TemplateNotFound(template_id.to_string()))?;

        let subject = render_string(&template.subject, data);
        let body = render_string(&template.body, data);
        Ok((subject, body))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_string(template: &str, data: &HashMap<String, serde_json::Value>) -> String {
    let mut result = template.to_string();
    for (key, value) in data {
        let placeholder = format!("{{{{{}}}}}", key);
        let replacement = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => String::new(),
            _ => value.to_string(),
        };
        result = result.replace(&placeholder, &replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_registered_template() {
        let mut renderer = TemplateRenderer::new();
        renderer.register(Template {
            id: "greeting".into(),
            subject: "Hello {{name}}".into(),
            body: "Welcome, {{name}}!".into(),
        });

        let mut data = HashMap::new();
        data.insert("name".to_string(), serde_json::json!("Ana"));

        let (subject, body) = renderer.render("greeting", &data).unwrap();
        assert_eq!(subject, "Hello Ana");
        assert_eq!(body, "Welcome, Ana!");
    }

    #[test]
    fn unknown_template_is_an_error() {
        let renderer = TemplateRenderer::new();
        let err = renderer.render("nope", &HashMap::new()).unwrap_err();
        assert!(matches!(err, NotificationError::TemplateNotFound(_)));
    }

    #[test]
    fn import_summary_template_ships_built_in() {
        let renderer = TemplateRenderer::new();
        let mut data = HashMap::new();
        data.insert("request_id".to_string(), serde_json::json!("abc"));
        data.insert("status".to_string(), serde_json::json!("partial"));
        data.insert("pages_processed".to_string(), serde_json::json!(4));
        data.insert("rows_imported".to_string(), serde_json::json!(380));
        data.insert("rows_failed".to_string(), serde_json::json!(20));

        let (subject, body) = renderer.render(IMPORT_SUMMARY_TEMPLATE, &data).unwrap();
        assert!(subject.contains("partial"));
        assert!(body.contains("Rows imported: 380"));
        assert!(body.contains("Rows failed: 20"));
    }

    #[test]
    fn numbers_and_nulls_render_cleanly() {
        let template = "count={{count}} gone={{gone}}";
        let mut data = HashMap::new();
        data.insert("count".to_string(), serde_json::json!(7));
        data.insert("gone".to_string(), serde_json::Value::Null);
        assert_eq!(render_string(template, &data), "count=7 gone=");
    }
}
