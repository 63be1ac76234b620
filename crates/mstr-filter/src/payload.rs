//! Request bodies carrying a filter.

use serde::Serialize;
use serde_json::Value;

use crate::tree::Expression;

/// Key under which a dataset instance request expects its filter.
pub const VIEW_FILTER_KEY: &str = "viewFilter";

/// A view filter ready to send with `create_instance`.
///
/// ```
/// use mstr_filter_rs::{Constant, Expression, ViewFilter};
///
/// let filter = ViewFilter::new(Expression::leaf(Constant::new("x")));
/// assert!(filter.to_body().get("viewFilter").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewFilter {
    #[serde(rename = "viewFilter")]
    pub expression: Expression,
}

impl ViewFilter {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    /// `{"viewFilter": {...}}`
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(VIEW_FILTER_KEY.to_string(), self.expression.to_payload());
        Value::Object(body)
    }
}

impl From<Expression> for ViewFilter {
    fn from(expression: Expression) -> Self {
        Self::new(expression)
    }
}
