//! View filter expressions for the MicroStrategy REST API.
//!
//! Filters are built from fully parenthesized token sequences (no operator
//! precedence) and serialized into the nested `{operator, operands}` JSON
//! that dataset instance requests accept under `viewFilter`.
//!
//! # Operators
//!
//! | symbol | name | | symbol | name |
//! |---|---|---|---|---|
//! | `==` | Equals | | `!=` | NotEquals |
//! | `>` | Greater | | `>=` | GreaterEqual |
//! | `<` | Less | | `<=` | LessEqual |
//! | `bw` | BeginsWith | | `!bw` | NotBeginsWith |
//! | `ew` | EndsWith | | `!ew` | NotEndsWith |
//! | `cn` | Contains | | `!cn` | NotContains |
//! | `lk` | Like | | `!lk` | NotLike |
//! | `and` | And | | `or` | Or |
//! | `not` | Not (unary) | | | |
//!
//! # Example
//!
//! ```
//! use mstr_api_rs::models::DatasetDefinition;
//! use mstr_filter_rs::{FilterParser, ViewFilter};
//! use serde_json::json;
//!
//! let definition = DatasetDefinition::from_json(&json!({
//!     "result": {"definition": {"availableObjects": {
//!         "attributes": [{"id": "A1", "name": "Region", "forms": [{"id": "F1", "name": "DESC"}]}],
//!         "metrics": []
//!     }}}
//! }))
//! .unwrap();
//!
//! let expression = FilterParser::parse_str("( Region@DESC == 'Europe' )", &definition).unwrap();
//! let body = ViewFilter::new(expression).to_body();
//! assert_eq!(body["viewFilter"]["operator"], "Equals");
//! ```

mod error;
mod lexer;
mod operand;
mod operator;
mod parser;
mod payload;
mod tree;

pub use error::{FilterError, FilterResult};
pub use lexer::{tokenize, FormResolver, Lexer};
pub use operand::{Constant, DataType, FormRef, ObjectRef, Operand};
pub use operator::Operator;
pub use parser::{FilterParser, Token};
pub use payload::{ViewFilter, VIEW_FILTER_KEY};
pub use tree::{Child, Expression, NodeId, NodeValue, TreeBuilder};
