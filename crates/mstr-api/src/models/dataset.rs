//! Dataset (report or cube) definitions and instance results.

use serde::Serialize;
use serde_json::{Map, Value};

use super::attribute::{Attribute, AttributeForm, Metric};
use crate::error::{Error, Result};

const AVAILABLE_OBJECTS: &str = "/result/definition/availableObjects";

/// Attributes and metrics available in a report or cube.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DatasetDefinition {
    pub attributes: Vec<Attribute>,
    pub metrics: Vec<Metric>,
}

impl DatasetDefinition {
    /// Decodes the body of `GET reports/{id}` or `GET cubes/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when `result.definition.availableObjects`
    /// lacks its `attributes` or `metrics` list, or an entry lacks an `id`.
    pub fn from_json(json: &Value) -> Result<Self> {
        let attributes = available_list(json, "attributes")?
            .iter()
            .map(|x| Attribute::from_json(entry_id(x)?, x))
            .collect::<Result<Vec<_>>>()?;
        let metrics = available_list(json, "metrics")?
            .iter()
            .map(|x| Metric::from_json(entry_id(x)?, x))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            attributes,
            metrics,
        })
    }

    /// All attributes with the given name (names are not unique).
    pub fn attributes_named(&self, name: &str) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.info.name.as_deref() == Some(name))
            .collect()
    }

    /// Looks an attribute up by identifier.
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id() == id)
    }

    /// Resolves the attribute that owns `form`.
    pub fn owner_of(&self, form: &AttributeForm) -> Option<&Attribute> {
        self.attribute(&form.attribute_id)
    }

    /// All metrics with the given name.
    pub fn metrics_named(&self, name: &str) -> Vec<&Metric> {
        self.metrics
            .iter()
            .filter(|m| m.info.name.as_deref() == Some(name))
            .collect()
    }
}

fn available_list<'a>(json: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
    json.pointer(&format!("{}/{}", AVAILABLE_OBJECTS, key))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::decode(
                "dataset definition",
                format!("missing `result.definition.availableObjects.{}`", key),
            )
        })
}

fn entry_id(entry: &Value) -> Result<String> {
    entry
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::decode("dataset definition", "object without `id`"))
}

/// Rows produced by running a report or cube instance.
///
/// Each row maps attribute names to element names and metric names to their
/// raw values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DatasetResults {
    pub instance_id: Option<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl DatasetResults {
    /// Flattens the `result.data.root` element hierarchy into rows.
    ///
    /// Elements whose attribute index has no matching attribute name are keyed
    /// `element<depth>`. An instance without data yields no rows.
    pub fn from_json(json: &Value) -> Result<Self> {
        let instance_id = json
            .get("instanceId")
            .and_then(Value::as_str)
            .map(str::to_string);

        let names: Vec<&str> = json
            .pointer("/result/definition/attributes")
            .and_then(Value::as_array)
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|a| a.get("name").and_then(Value::as_str).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        let mut rows = Vec::new();
        if let Some(children) = json.pointer("/result/data/root/children") {
            let children = children
                .as_array()
                .ok_or_else(|| Error::decode("dataset results", "`children` is not a list"))?;
            flatten(children, &names, &Map::new(), &mut rows)?;
        }

        Ok(Self { instance_id, rows })
    }
}

fn flatten(
    children: &[Value],
    names: &[&str],
    parent: &Map<String, Value>,
    rows: &mut Vec<Map<String, Value>>,
) -> Result<()> {
    for child in children {
        let element = child
            .get("element")
            .ok_or_else(|| Error::decode("dataset results", "row without `element`"))?;
        let depth = child.get("depth").and_then(Value::as_i64).unwrap_or_default();
        let key = element
            .get("attributeIndex")
            .and_then(Value::as_u64)
            .and_then(|i| names.get(i as usize))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("element{}", depth));

        // Ancestor elements keep their key when a descendant reuses it.
        let mut row = parent.clone();
        row.entry(key)
            .or_insert_with(|| element.get("name").cloned().unwrap_or(Value::Null));

        match child.get("children").and_then(Value::as_array) {
            Some(grandchildren) => flatten(grandchildren, names, &row, rows)?,
            None => {
                if let Some(metrics) = child.get("metrics").and_then(Value::as_object) {
                    for (name, metric) in metrics {
                        row.insert(name.clone(), metric.get("rv").cloned().unwrap_or(Value::Null));
                    }
                }
                rows.push(row);
            }
        }
    }
    Ok(())
}
