//! Attributes, their forms, and metrics.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use super::object::ObjectInfo;
use crate::error::{Error, Result};

/// One display form of an attribute (e.g. `ID` or `DESC`).
///
/// A form refers back to its attribute by identifier only; the attribute is
/// looked up through whatever registry the caller holds (typically a
/// [`DatasetDefinition`](super::DatasetDefinition)).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeForm {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Server data type name, e.g. `Char` or `Real`.
    #[serde(default)]
    pub data_type: Option<String>,

    /// Identifier of the owning attribute.
    #[serde(skip)]
    pub attribute_id: String,
}

impl AttributeForm {
    /// Replaces the form fields with a refreshed definition.
    pub fn update(&mut self, json: &Value) -> Result<()> {
        let mut form: AttributeForm = serde_json::from_value(json.clone())
            .map_err(|e| Error::decode("attribute form", e.to_string()))?;
        form.attribute_id = std::mem::take(&mut self.attribute_id);
        *self = form;
        Ok(())
    }
}

/// An attribute and its forms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(flatten)]
    pub info: ObjectInfo,

    #[serde(default)]
    pub forms: Vec<AttributeForm>,
}

impl Attribute {
    /// Decodes an attribute definition, linking every form to it.
    pub fn from_json(id: impl Into<String>, json: &Value) -> Result<Self> {
        let mut attribute: Attribute = serde_json::from_value(json.clone())
            .map_err(|e| Error::decode("attribute", e.to_string()))?;
        attribute.info.id = id.into();
        attribute.link_forms();
        Ok(attribute)
    }

    fn link_forms(&mut self) {
        for form in &mut self.forms {
            form.attribute_id = self.info.id.clone();
        }
    }

    /// The attribute identifier.
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// The attribute name, or an empty string when the server sent none.
    pub fn name(&self) -> &str {
        self.info.name.as_deref().unwrap_or_default()
    }

    /// Finds a form by name, ignoring case.
    pub fn form(&self, name: &str) -> Option<&AttributeForm> {
        self.forms.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Replaces every field with a refreshed definition.
    pub fn update(&mut self, json: &Value) -> Result<()> {
        *self = Self::from_json(self.info.id.clone(), json)?;
        Ok(())
    }

    /// Payload used when the attribute appears in a request body.
    pub fn to_payload(&self) -> Value {
        json!({"type": "attribute", "id": self.id(), "name": self.info.name})
    }
}

/// A metric.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(flatten)]
    pub info: ObjectInfo,

    /// True when the server flags the metric as derived (`"true"` or `true`).
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_derived: bool,
}

impl Metric {
    /// Decodes a metric definition.
    pub fn from_json(id: impl Into<String>, json: &Value) -> Result<Self> {
        let mut metric: Metric = serde_json::from_value(json.clone())
            .map_err(|e| Error::decode("metric", e.to_string()))?;
        metric.info.id = id.into();
        Ok(metric)
    }

    /// The metric identifier.
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// The metric name, or an empty string when the server sent none.
    pub fn name(&self) -> &str {
        self.info.name.as_deref().unwrap_or_default()
    }

    /// Payload used when the metric appears in a request body.
    pub fn to_payload(&self) -> Value {
        json!({"type": "metric", "id": self.id(), "name": self.info.name})
    }
}

/// Accepts booleans and any value whose text form is `true` (any case).
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}
