//! A tiny placeholder-substituting view engine.
//!
//! Templates are compiled in. `{{key}}` is replaced by the model's `key`
//! field; strings are inserted as-is, other values as JSON.

use anyhow::anyhow;
use mvc_dispatch_core::ViewEngine;
use std::collections::HashMap;

const LAYOUT: &str = r#"<!DOCTYPE html>
<html>
  <head><title>{{title}}</title></head>
  <body>
    <h1>{{title}}</h1>
    <p>Welcome to {{title}}</p>
  </body>
</html>
"#;

/// Compiled-in templates keyed by view name.
#[derive(Debug, Clone)]
pub struct SiteViews {
    templates: HashMap<&'static str, &'static str>,
}

impl Default for SiteViews {
    fn default() -> Self {
        Self {
            templates: HashMap::from([("index", LAYOUT), ("home/index", LAYOUT)]),
        }
    }
}

impl ViewEngine for SiteViews {
    fn render(&self, view: &str, model: &serde_json::Value) -> anyhow::Result<String> {
        let template = self
            .templates
            .get(view)
            .ok_or_else(|| anyhow!("view '{view}' not found"))?;

        let mut html = (*template).to_string();
        if let Some(fields) = model.as_object() {
            for (key, value) in fields {
                let text = value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_string);
                html = html.replace(&format!("{{{{{key}}}}}"), &text);
            }
        }
        Ok(html)
    }
}
