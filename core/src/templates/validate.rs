// templar/src/templates/validate.rs

//! Validation of imported template files. Every problem is collected rather
//! than stopping at the first, and properties we do not know are dropped.

use crate::error::TemplarError;
use crate::templates::types::{ExportedData, Extension, TemplateValue, Templates};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const ID_PART: &str = r"(?:@[a-z0-9-*~][a-z0-9-*._~]*/)?[a-z0-9-~][a-z0-9-._~]*";

fn extension_id_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(&format!(r"^{ID_PART}\.{ID_PART}$")).expect("extension id pattern is valid")
  })
}

fn uuid4_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
      .expect("uuid pattern is valid")
  })
}

fn has_non_whitespace(value: &str) -> bool {
  value.chars().any(|c| !c.is_whitespace())
}

/// Checks a parsed import file and returns its templates.
///
/// The root must be an object holding a non-empty `templates` object. Each
/// template needs a non-blank key, a non-blank `name` and at least one
/// extension; each extension needs an `id` of the form `publisher.name` and
/// may carry a version-4 `uuid`.
pub fn validate_exported_data(data: &Value) -> Result<ExportedData, TemplarError> {
  let mut errors = Vec::new();

  let Some(root) = data.as_object() else {
    return Err(TemplarError::MalformedData {
      errors: vec!["/ must be object".to_string()],
    });
  };

  let templates = match root.get("templates") {
    Some(Value::Object(templates)) => templates,
    Some(_) => {
      return Err(TemplarError::MalformedData {
        errors: vec!["/templates must be object".to_string()],
      })
    }
    None => {
      return Err(TemplarError::MalformedData {
        errors: vec!["/ must have required property 'templates'".to_string()],
      })
    }
  };

  if templates.is_empty() {
    errors.push("/templates must NOT have fewer than 1 properties".to_string());
  }

  let mut valid = Templates::new();
  for (template_id, value) in templates {
    let path = format!("/templates/{template_id}");
    if !has_non_whitespace(template_id) {
      errors.push(format!("{path} property name must match pattern \"\\S+\""));
    }
    if let Some(template_value) = validate_template(&path, value, &mut errors) {
      valid.insert(template_id.clone(), template_value);
    }
  }

  if errors.is_empty() {
    Ok(ExportedData { templates: valid })
  } else {
    Err(TemplarError::MalformedData { errors })
  }
}

fn validate_template(path: &str, value: &Value, errors: &mut Vec<String>) -> Option<TemplateValue> {
  let Some(object) = value.as_object() else {
    errors.push(format!("{path} must be object"));
    return None;
  };
  let before = errors.len();

  let name = match object.get("name") {
    Some(Value::String(name)) if has_non_whitespace(name) => Some(name.clone()),
    Some(Value::String(_)) => {
      errors.push(format!("{path}/name must match format \"non-only-whitespace\""));
      None
    }
    Some(_) => {
      errors.push(format!("{path}/name must be string"));
      None
    }
    None => {
      errors.push(format!("{path} must have required property 'name'"));
      None
    }
  };

  let extensions = match object.get("extensions") {
    Some(Value::Array(items)) => {
      if items.is_empty() {
        errors.push(format!("{path}/extensions must NOT have fewer than 1 items"));
      }
      let extensions: Vec<Extension> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| validate_extension(&format!("{path}/extensions/{index}"), item, errors))
        .collect();
      Some(extensions)
    }
    Some(_) => {
      errors.push(format!("{path}/extensions must be array"));
      None
    }
    None => {
      errors.push(format!("{path} must have required property 'extensions'"));
      None
    }
  };

  if errors.len() != before {
    return None;
  }
  Some(TemplateValue {
    name: name?,
    extensions: extensions?,
  })
}

fn validate_extension(path: &str, value: &Value, errors: &mut Vec<String>) -> Option<Extension> {
  let Some(object) = value.as_object() else {
    errors.push(format!("{path} must be object"));
    return None;
  };
  let before = errors.len();

  let id = match object.get("id") {
    Some(Value::String(id)) if extension_id_pattern().is_match(id) => Some(id.clone()),
    Some(Value::String(_)) => {
      errors.push(format!("{path}/id must match format \"vscode-extension-id\""));
      None
    }
    Some(_) => {
      errors.push(format!("{path}/id must be string"));
      None
    }
    None => {
      errors.push(format!("{path} must have required property 'id'"));
      None
    }
  };

  let uuid = match object.get("uuid") {
    None => None,
    Some(Value::String(uuid)) if uuid4_pattern().is_match(uuid) => Some(uuid.clone()),
    Some(Value::String(_)) => {
      errors.push(format!("{path}/uuid must match format \"uuid4\""));
      None
    }
    Some(_) => {
      errors.push(format!("{path}/uuid must be string"));
      None
    }
  };

  if errors.len() != before {
    return None;
  }
  Some(Extension { id: id?, uuid })
}
