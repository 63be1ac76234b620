//! Shift/reduce parser turning a flat token sequence into an expression.

use std::fmt;

use tracing::debug;

use crate::error::{FilterError, FilterResult};
use crate::lexer::{tokenize, FormResolver};
use crate::operand::{Constant, FormRef, Operand};
use crate::operator::Operator;
use crate::tree::{Expression, NodeId, TreeBuilder};

/// One element of a filter token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    Operator(Operator),
    Operand(Operand),
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Operator(op)
    }
}

impl From<Operand> for Token {
    fn from(operand: Operand) -> Self {
        Token::Operand(operand)
    }
}

impl From<Constant> for Token {
    fn from(c: Constant) -> Self {
        Token::Operand(c.into())
    }
}

impl From<FormRef> for Token {
    fn from(f: FormRef) -> Self {
        Token::Operand(f.into())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Operand(operand) => write!(f, "{}", operand),
        }
    }
}

/// Token classes used to validate ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Start,
    Open,
    Close,
    Operand,
    Binary,
    Not,
}

impl Class {
    fn of(token: &Token) -> Self {
        match token {
            Token::Open => Class::Open,
            Token::Close => Class::Close,
            Token::Operand(_) => Class::Operand,
            Token::Operator(op) if op.is_unary() => Class::Not,
            Token::Operator(_) => Class::Binary,
        }
    }

    /// Whether `next` may follow a token of this class.
    fn allows(self, next: Class) -> bool {
        match self {
            Class::Start => matches!(next, Class::Open | Class::Operand),
            Class::Open => matches!(next, Class::Open | Class::Operand | Class::Not),
            Class::Operand | Class::Close => matches!(next, Class::Binary | Class::Close),
            Class::Binary | Class::Not => matches!(next, Class::Open | Class::Operand),
        }
    }

    fn can_end(self) -> bool {
        matches!(self, Class::Operand | Class::Close)
    }
}

/// Parser for fully parenthesized filter token sequences.
///
/// There is no operator precedence: every binary comparison or combination
/// must sit in its own pair of parentheses, and `not` is written as
/// `( not X )`.
///
/// # Algorithm
///
/// An explicit stack holds the nodes still waiting for input. `current`
/// starts at the root, which is also pushed.
///
/// ```text
/// (        attach an empty left child, push current, descend
///          (skipped when the next token is `not`)
/// operand  set as current value, pop into current
/// binary   set as current value, attach an empty right child, push, descend
/// )        pop into current
/// not      set as current value, attach an empty left child, push, descend
/// ```
///
/// A well-formed sequence leaves the stack empty.
///
/// # Example
///
/// ```
/// use mstr_filter_rs::{Constant, DataType, FilterParser, Operator, Token};
///
/// let tokens = vec![
///     Token::Open,
///     Constant::new("Europe").into(),
///     Operator::Equals.into(),
///     Constant::typed(1, DataType::Real).into(),
///     Token::Close,
/// ];
/// let expression = FilterParser::parse(tokens).unwrap();
/// assert_eq!(expression.operator(), Some(Operator::Equals));
/// ```
pub struct FilterParser {
    tokens: Vec<Token>,
    position: usize,
    tree: TreeBuilder,
    stack: Vec<NodeId>,
    current: NodeId,
    previous: Class,
}

impl FilterParser {
    /// Parses a token sequence into an expression.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyExpression`] for no tokens,
    /// [`FilterError::UnexpectedToken`] for a token that may not follow its
    /// predecessor, [`FilterError::UnbalancedParentheses`] for an unmatched
    /// `)`, [`FilterError::MisplacedOperator`] when a value would overwrite
    /// another, and [`FilterError::UnexpectedEndOfInput`] when input ends
    /// with open parentheses.
    pub fn parse(tokens: impl IntoIterator<Item = Token>) -> FilterResult<Expression> {
        let tokens: Vec<Token> = tokens.into_iter().collect();
        if tokens.is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let tree = TreeBuilder::new();
        let root = tree.root();
        let mut parser = FilterParser {
            tokens,
            position: 0,
            tree,
            stack: vec![root],
            current: root,
            previous: Class::Start,
        };
        parser.run()?;
        parser.tree.finish()
    }

    /// Lexes filter text and parses the resulting tokens.
    ///
    /// `Attribute@Form` names are resolved through `resolver`, usually a
    /// [`DatasetDefinition`](mstr_api_rs::models::DatasetDefinition).
    pub fn parse_str<R: FormResolver + ?Sized>(
        input: &str,
        resolver: &R,
    ) -> FilterResult<Expression> {
        let tokens = tokenize(input.trim(), resolver)?;
        debug!(tokens = tokens.len(), "Parsing filter");
        Self::parse(tokens)
    }

    fn run(&mut self) -> FilterResult<()> {
        while self.position < self.tokens.len() {
            let token = self.tokens[self.position].clone();
            let class = Class::of(&token);
            if !self.previous.allows(class) {
                return Err(FilterError::unexpected_token(
                    self.position,
                    token.to_string(),
                ));
            }

            match &token {
                Token::Open => self.open(),
                Token::Operand(operand) => {
                    self.occupy(&token)?;
                    self.tree.set_value(self.current, operand.clone());
                    self.current = self.pop(&token)?;
                }
                Token::Operator(op) => {
                    self.occupy(&token)?;
                    self.tree.set_value(self.current, *op);
                    let child = self.tree.new_node();
                    if op.is_unary() {
                        self.tree.attach_left(self.current, child);
                    } else {
                        self.tree.attach_right(self.current, child);
                    }
                    self.stack.push(self.current);
                    self.current = child;
                }
                Token::Close => {
                    // A group must hold a value; `( ( x ) )` wraps nothing.
                    if self.tree.value(self.current).is_none() {
                        return Err(FilterError::unexpected_token(
                            self.position,
                            token.to_string(),
                        ));
                    }
                    self.current = self.pop(&token)?;
                }
            }

            self.previous = class;
            self.position += 1;
        }

        if !self.previous.can_end() || !self.stack.is_empty() {
            debug!(open = self.stack.len(), "Filter input ended early");
            return Err(FilterError::UnexpectedEndOfInput);
        }
        Ok(())
    }

    fn open(&mut self) {
        let next_is_not = matches!(
            self.tokens.get(self.position + 1),
            Some(Token::Operator(Operator::Not))
        );
        if next_is_not {
            return;
        }
        let child = self.tree.new_node();
        self.tree.attach_left(self.current, child);
        self.stack.push(self.current);
        self.current = child;
    }

    /// Refuses to overwrite a node that already holds a value.
    fn occupy(&self, token: &Token) -> FilterResult<()> {
        if self.tree.value(self.current).is_none() {
            return Ok(());
        }
        Err(match token {
            Token::Operator(op) => FilterError::MisplacedOperator {
                position: self.position,
                operator: op.to_string(),
            },
            _ => FilterError::unexpected_token(self.position, token.to_string()),
        })
    }

    fn pop(&mut self, token: &Token) -> FilterResult<NodeId> {
        self.stack.pop().ok_or_else(|| match token {
            Token::Close => FilterError::UnbalancedParentheses {
                position: self.position,
            },
            _ => FilterError::unexpected_token(self.position, token.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::DataType;

    fn c(value: &str) -> Token {
        Constant::new(value).into()
    }

    fn real(value: i64) -> Token {
        Constant::typed(value, DataType::Real).into()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            FilterParser::parse(Vec::new()).unwrap_err(),
            FilterError::EmptyExpression
        );
    }

    #[test]
    fn test_lone_operand_is_a_leaf() {
        let expression = FilterParser::parse(vec![c("a")]).unwrap();
        assert!(expression.is_leaf());
    }

    #[test]
    fn test_simple_comparison() {
        let expression =
            FilterParser::parse(vec![Token::Open, c("a"), Operator::Less.into(), real(3), Token::Close])
                .unwrap();
        assert_eq!(expression.to_string(), "( 'a' < 3 )");
    }

    #[test]
    fn test_not_without_inner_parentheses() {
        let expression = FilterParser::parse(vec![
            Token::Open,
            Operator::Not.into(),
            c("a"),
            Token::Close,
        ])
        .unwrap();
        assert_eq!(expression.to_string(), "( not 'a' )");
    }

    #[test]
    fn test_nested_logical() {
        let tokens = vec![
            Token::Open,
            Token::Open,
            c("a"),
            Operator::Equals.into(),
            real(1),
            Token::Close,
            Operator::And.into(),
            Token::Open,
            Operator::Not.into(),
            Token::Open,
            c("b"),
            Operator::Contains.into(),
            c("x"),
            Token::Close,
            Token::Close,
            Token::Close,
        ];
        let expression = FilterParser::parse(tokens).unwrap();
        assert_eq!(
            expression.to_string(),
            "( ( 'a' == 1 ) and ( not ( 'b' cn 'x' ) ) )"
        );
    }

    #[test]
    fn test_missing_close_paren() {
        let err =
            FilterParser::parse(vec![Token::Open, c("a"), Operator::Equals.into(), real(1)]).unwrap_err();
        assert_eq!(err, FilterError::UnexpectedEndOfInput);
    }

    #[test]
    fn test_extra_close_paren() {
        let err = FilterParser::parse(vec![
            Token::Open,
            c("a"),
            Operator::Equals.into(),
            real(1),
            Token::Close,
            Token::Close,
        ])
        .unwrap_err();
        assert_eq!(err, FilterError::UnbalancedParentheses { position: 5 });
    }

    #[test]
    fn test_consecutive_operands() {
        let err = FilterParser::parse(vec![Token::Open, c("a"), c("b"), Token::Close]).unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedToken { position: 2, .. }));
    }

    #[test]
    fn test_chained_operator_without_parentheses() {
        let err = FilterParser::parse(vec![
            Token::Open,
            c("a"),
            Operator::Equals.into(),
            c("b"),
            Operator::Equals.into(),
            c("c"),
            Token::Close,
        ])
        .unwrap_err();
        assert_eq!(
            err,
            FilterError::MisplacedOperator {
                position: 4,
                operator: "==".to_string()
            }
        );
    }

    #[test]
    fn test_unparenthesized_top_level_combination() {
        let err = FilterParser::parse(vec![
            Token::Open,
            c("a"),
            Operator::Equals.into(),
            c("b"),
            Token::Close,
            Operator::And.into(),
            Token::Open,
            c("c"),
            Operator::Equals.into(),
            c("d"),
            Token::Close,
        ])
        .unwrap_err();
        assert!(matches!(err, FilterError::MisplacedOperator { position: 5, .. }));
    }

    #[test]
    fn test_operator_first() {
        let err = FilterParser::parse(vec![Operator::Equals.into(), c("a")]).unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedToken { position: 0, .. }));
    }

    #[test]
    fn test_not_must_follow_open() {
        let err = FilterParser::parse(vec![Operator::Not.into(), c("a")]).unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedToken { position: 0, .. }));
    }

    #[test]
    fn test_trailing_operator() {
        let err = FilterParser::parse(vec![Token::Open, c("a"), Operator::Or.into()]).unwrap_err();
        assert_eq!(err, FilterError::UnexpectedEndOfInput);
    }

    #[test]
    fn test_redundant_grouping() {
        let err = FilterParser::parse(vec![
            Token::Open,
            Token::Open,
            c("a"),
            Operator::Equals.into(),
            real(1),
            Token::Close,
            Token::Close,
        ])
        .unwrap_err();
        assert_eq!(err, FilterError::unexpected_token(6, ")"));

        let err = FilterParser::parse(vec![Token::Open, c("a"), Token::Close]).unwrap_err();
        assert_eq!(err, FilterError::unexpected_token(2, ")"));
    }

    #[test]
    fn test_empty_parentheses() {
        let err = FilterParser::parse(vec![Token::Open, Token::Close]).unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedToken { position: 1, .. }));
    }
}
