//! Lexer turning filter text into parser tokens.
//!
//! ```text
//! ( Region@DESC == 'Europe' ) and ( not ( [Call Center]@ID > 2 ) )
//! ```
//!
//! - `Attribute@Form` names a form; names containing spaces or symbols are
//!   written in brackets.
//! - `'text'` and `"text"` are `Char` constants; `\` escapes the next character.
//! - A data type name directly before a quote types the constant:
//!   `date'2018-01-01'`, `time'10:00:00'`, `timestamp'...'`, `real'...'`.
//! - Numbers (optionally signed, with a fraction) are `Real` constants.
//! - Operators are their symbols; word operators ignore case and `=` is
//!   accepted for `==`.
//!
//! Positions in lexer errors are byte offsets into the input.

use std::iter::Peekable;
use std::str::CharIndices;

use mstr_api_rs::models::DatasetDefinition;

use crate::error::{FilterError, FilterResult};
use crate::operand::{Constant, DataType, FormRef};
use crate::operator::Operator;
use crate::parser::Token;

/// Resolves `Attribute@Form` names to form references.
pub trait FormResolver {
    fn resolve_form(&self, attribute: &str, form: &str) -> Option<FormRef>;
}

/// Looks attributes up by exact name first, then ignoring case.
impl FormResolver for DatasetDefinition {
    fn resolve_form(&self, attribute: &str, form: &str) -> Option<FormRef> {
        self.attributes_named(attribute)
            .into_iter()
            .find_map(|a| FormRef::by_name(a, form))
            .or_else(|| {
                self.attributes
                    .iter()
                    .filter(|a| a.name().eq_ignore_ascii_case(attribute))
                    .find_map(|a| FormRef::by_name(a, form))
            })
    }
}

/// Lexer for filter text.
pub struct Lexer<'a, R: FormResolver + ?Sized> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    resolver: &'a R,
}

impl<'a, R: FormResolver + ?Sized> Lexer<'a, R> {
    pub fn new(input: &'a str, resolver: &'a R) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            resolver,
        }
    }

    /// Splits the whole input into tokens.
    pub fn tokenize(mut self) -> FilterResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(&(position, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }

            let token = match c {
                '(' => {
                    self.chars.next();
                    Token::Open
                }
                ')' => {
                    self.chars.next();
                    Token::Close
                }
                '\'' | '"' => Constant::new(self.quoted(position, c)?).into(),
                '[' => self.form_reference(position)?,
                '-' | '0'..='9' => self.number(position)?,
                '=' | '!' | '<' | '>' => self.symbol(position)?,
                c if c.is_alphabetic() || c == '_' => self.word(position)?,
                other => return Err(FilterError::unexpected_token(position, other.to_string())),
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn quoted(&mut self, start: usize, quote: char) -> FilterResult<String> {
        self.chars.next();
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(FilterError::UnterminatedString { position: start }),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => return Err(FilterError::UnterminatedString { position: start }),
                },
                Some((_, c)) if c == quote => return Ok(value),
                Some((_, c)) => value.push(c),
            }
        }
    }

    fn number(&mut self, start: usize) -> FilterResult<Token> {
        let mut end = start;
        let mut seen_dot = false;
        if let Some((i, '-')) = self.chars.peek().copied() {
            self.chars.next();
            end = i + 1;
        }
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                seen_dot |= c == '.';
                self.chars.next();
                end = i + c.len_utf8();
            } else {
                break;
            }
        }

        let text = &self.input[start..end];
        if text.parse::<f64>().is_err() {
            return Err(FilterError::unexpected_token(start, text));
        }
        Ok(Constant::typed(text, DataType::Real).into())
    }

    fn symbol(&mut self, start: usize) -> FilterResult<Token> {
        let mut text = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if matches!(c, '=' | '!' | '<' | '>') {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        // `!bw`, `!cn`, `!ew`, `!lk`
        if text == "!" {
            text.push_str(&self.take_word());
        }

        Operator::from_symbol(&text)
            .map(Token::Operator)
            .ok_or_else(|| FilterError::unexpected_token(start, text))
    }

    fn word(&mut self, start: usize) -> FilterResult<Token> {
        let word = self.take_word();
        match self.chars.peek().copied() {
            Some((_, '@')) => return self.finish_form(start, word),
            Some((_, quote @ ('\'' | '"'))) => {
                if let Some(data_type) = DataType::from_name(&word) {
                    let value = self.quoted(start, quote)?;
                    return Ok(Constant::typed(value, data_type).into());
                }
            }
            _ => {}
        }
        Operator::from_symbol(&word)
            .map(Token::Operator)
            .ok_or_else(|| FilterError::unexpected_token(start, word))
    }

    fn form_reference(&mut self, start: usize) -> FilterResult<Token> {
        let attribute = self.bracketed(start)?;
        if !matches!(self.chars.peek(), Some((_, '@'))) {
            return Err(FilterError::unexpected_token(start, format!("[{}]", attribute)));
        }
        self.finish_form(start, attribute)
    }

    /// Reads `@Form` after an attribute name and resolves the pair.
    fn finish_form(&mut self, start: usize, attribute: String) -> FilterResult<Token> {
        self.chars.next();
        let form = match self.chars.peek() {
            Some(&(position, '[')) => self.bracketed(position)?,
            _ => self.take_word(),
        };
        if form.is_empty() {
            return Err(FilterError::unexpected_token(start, format!("{}@", attribute)));
        }

        self.resolver
            .resolve_form(&attribute, &form)
            .map(Token::from)
            .ok_or_else(|| FilterError::unknown_form(attribute, form))
    }

    fn bracketed(&mut self, start: usize) -> FilterResult<String> {
        self.chars.next();
        let mut name = String::new();
        loop {
            match self.chars.next() {
                Some((_, ']')) => return Ok(name),
                Some((_, c)) => name.push(c),
                None => return Err(FilterError::UnterminatedString { position: start }),
            }
        }
    }

    fn take_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        word
    }
}

/// Tokenizes `input`, resolving form names through `resolver`.
pub fn tokenize<R: FormResolver + ?Sized>(input: &str, resolver: &R) -> FilterResult<Vec<Token>> {
    Lexer::new(input, resolver).tokenize()
}
