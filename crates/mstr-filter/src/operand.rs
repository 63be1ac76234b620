//! Leaf values of a filter expression: constants and attribute form references.

use std::fmt;

use mstr_api_rs::models::{Attribute, AttributeForm, DatasetDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Data type tag of a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    Date,
    Time,
    TimeStamp,
    Real,
    #[default]
    Char,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::TimeStamp => "TimeStamp",
            DataType::Real => "Real",
            DataType::Char => "Char",
        }
    }

    /// Looks a data type up by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            DataType::Date,
            DataType::Time,
            DataType::TimeStamp,
            DataType::Real,
            DataType::Char,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value compared against a form.
///
/// The value is kept as the text sent to the server.
///
/// # Example
///
/// ```
/// use mstr_filter_rs::{Constant, DataType};
///
/// assert_eq!(Constant::new(3).data_type(), DataType::Char);
/// assert_eq!(Constant::typed(1, DataType::Real).value(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constant {
    value: String,
    data_type: DataType,
}

impl Constant {
    /// Creates a `Char` constant.
    pub fn new(value: impl ToString) -> Self {
        Self::typed(value, DataType::Char)
    }

    pub fn typed(value: impl ToString, data_type: DataType) -> Self {
        Self {
            value: value.to_string(),
            data_type,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "type": "constant",
            "dataType": self.data_type.as_str(),
            "value": self.value,
        })
    }
}

/// Renders the constant so the lexer reads it back unchanged.
///
/// `Char` values are quoted, `Real` values that look like numbers are bare,
/// and everything else carries its type as a prefix: `date'2018-01-01'`.
impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_type {
            DataType::Real if is_number_literal(&self.value) => f.write_str(&self.value),
            DataType::Char => write!(f, "'{}'", escape(&self.value)),
            other => write!(
                f,
                "{}'{}'",
                other.as_str().to_ascii_lowercase(),
                escape(&self.value)
            ),
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Returns true if `text` lexes as a bare number: an optional `-`, then
/// digits with at most one `.`.
pub(crate) fn is_number_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
        && text.parse::<f64>().is_ok()
}

/// Identifier and name of a server object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: String,
    pub name: String,
}

/// A reference to one form of an attribute.
///
/// The attribute is referred to by identifier and name only; the
/// [`Attribute`] itself stays with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormRef {
    pub attribute: ObjectRef,
    pub form: ObjectRef,
    /// Server data type of the form, when known.
    pub data_type: Option<String>,
}

impl FormRef {
    /// References `form` of `attribute`.
    pub fn new(attribute: &Attribute, form: &AttributeForm) -> Self {
        Self {
            attribute: ObjectRef {
                id: attribute.id().to_string(),
                name: attribute.name().to_string(),
            },
            form: ObjectRef {
                id: form.id.clone(),
                name: form.name.clone(),
            },
            data_type: form.data_type.clone(),
        }
    }

    /// References the form of `attribute` with the given name (any case).
    pub fn by_name(attribute: &Attribute, form_name: &str) -> Option<Self> {
        attribute.form(form_name).map(|form| Self::new(attribute, form))
    }

    /// References `form`, resolving its owning attribute in `definition`.
    pub fn resolve(definition: &DatasetDefinition, form: &AttributeForm) -> Option<Self> {
        definition
            .owner_of(form)
            .map(|attribute| Self::new(attribute, form))
    }

    pub fn attribute_id(&self) -> &str {
        &self.attribute.id
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "type": "form",
            "attribute": {"id": self.attribute.id, "name": self.attribute.name},
            "form": {"id": self.form.id, "name": self.form.name},
        })
    }
}

impl fmt::Display for FormRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            display_name(&self.attribute.name),
            display_name(&self.form.name)
        )
    }
}

/// Brackets names that would not lex as a single word.
fn display_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("[{}]", name)
    }
}

/// A leaf of a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Constant(Constant),
    Form(FormRef),
}

impl Operand {
    pub fn to_payload(&self) -> Value {
        match self {
            Operand::Constant(c) => c.to_payload(),
            Operand::Form(f) => f.to_payload(),
        }
    }
}

impl From<Constant> for Operand {
    fn from(c: Constant) -> Self {
        Operand::Constant(c)
    }
}

impl From<FormRef> for Operand {
    fn from(f: FormRef) -> Self {
        Operand::Form(f)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Constant(c) => c.fmt(f),
            Operand::Form(r) => r.fmt(f),
        }
    }
}
