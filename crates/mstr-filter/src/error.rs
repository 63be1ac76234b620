//! Error types for filter building and parsing.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Ways a filter expression can be malformed.
///
/// A parse that fails never yields a partial tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// No tokens were supplied.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// A token appeared where its class is not allowed.
    #[error("unexpected token {token} at position {position}")]
    UnexpectedToken {
        /// Index of the token in the input sequence.
        position: usize,
        token: String,
    },

    /// Input ended while the expression was still open.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// A `)` had no matching `(`.
    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParentheses { position: usize },

    /// An operator would overwrite a node that already holds a value.
    #[error("misplaced operator {operator} at position {position}")]
    MisplacedOperator { position: usize, operator: String },

    /// A built tree breaks an arity or leaf invariant.
    #[error("incomplete expression tree: {reason}")]
    IncompleteTree { reason: String },

    /// An `Attribute@Form` reference did not resolve.
    #[error("unknown form {attribute}@{form}")]
    UnknownForm { attribute: String, form: String },

    /// A quoted constant was not closed.
    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },
}

impl FilterError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(position: usize, token: impl Into<String>) -> Self {
        FilterError::UnexpectedToken {
            position,
            token: token.into(),
        }
    }

    /// Creates an incomplete tree error.
    pub fn incomplete(reason: impl Into<String>) -> Self {
        FilterError::IncompleteTree {
            reason: reason.into(),
        }
    }

    /// Creates an unknown form error.
    pub fn unknown_form(attribute: impl Into<String>, form: impl Into<String>) -> Self {
        FilterError::UnknownForm {
            attribute: attribute.into(),
            form: form.into(),
        }
    }
}
