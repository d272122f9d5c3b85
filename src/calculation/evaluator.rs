//! Restricted arithmetic formula evaluation.
//!
//! Expressions are plain arithmetic over named variables, e.g.
//! `"base_salary / 30 / 8 * overtime_multiplier"`. Evaluation substitutes
//! variable names longest-first as whole words, gates the substituted
//! string on the arithmetic character class, and parses the remainder by
//! recursive descent over `Decimal`.
//!
//! The evaluator never raises to its caller. Any failure (unknown name
//! surviving substitution, parse error, division by zero) degrades to a
//! zero value with a structured warning on the outcome so batch-level
//! diagnostics stay possible without changing the numeric contract.

use rust_decimal::Decimal;

use super::variables::ResolvedVariables;

/// Characters permitted after substitution. This is the sole safety gate.
const ALLOWED_CHARS: &str = "0123456789+-*/.() ";

/// The outcome of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    /// The evaluated value, rounded to 2 decimal places; zero on failure.
    pub value: Decimal,
    /// Set when evaluation degraded to zero instead of completing.
    pub warning: Option<String>,
}

impl EvaluationOutcome {
    /// True when the expression evaluated without degradation.
    pub fn succeeded(&self) -> bool {
        self.warning.is_none()
    }

    fn failed(expression: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            value: Decimal::ZERO,
            warning: Some(format!(
                "formula '{expression}' degraded to 0: {reason}"
            )),
        }
    }
}

/// Evaluates `expression` against the resolved variable set.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{evaluate, ResolvedVariables};
/// use rust_decimal::Decimal;
///
/// let outcome = evaluate("2+3*4", &ResolvedVariables::default());
/// assert_eq!(outcome.value, Decimal::from(14));
/// assert!(outcome.succeeded());
/// ```
pub fn evaluate(expression: &str, variables: &ResolvedVariables) -> EvaluationOutcome {
    let substituted = substitute_variables(expression, variables);

    if substituted.trim().is_empty() {
        return EvaluationOutcome::failed(expression, "empty expression");
    }
    if let Some(bad) = substituted.chars().find(|c| !ALLOWED_CHARS.contains(*c)) {
        return EvaluationOutcome::failed(
            expression,
            format!("disallowed character '{bad}' after substitution"),
        );
    }

    match Parser::new(&substituted).parse() {
        Ok(value) => EvaluationOutcome {
            value: value.round_dp(2),
            warning: None,
        },
        Err(reason) => EvaluationOutcome::failed(expression, reason),
    }
}

/// Replaces whole-word occurrences of variable names with their values,
/// longest names first so `overtime_rate` never clobbers the inside of
/// `overtime_rate_per_hour`. Negative values are parenthesized to keep
/// the substituted string parseable.
fn substitute_variables(expression: &str, variables: &ResolvedVariables) -> String {
    let mut names: Vec<&String> = variables.values().keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut working = expression.to_string();
    for name in names {
        let value = match variables.get(name) {
            Some(v) => v,
            None => continue,
        };
        let rendered = if value.is_sign_negative() {
            format!("({value})")
        } else {
            value.to_string()
        };
        working = replace_whole_word(&working, name, &rendered);
    }
    working
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every occurrence of `name` in `haystack` that is not adjacent
/// to another identifier character.
fn replace_whole_word(haystack: &str, name: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(haystack.len());
    let bytes = haystack.as_bytes();
    let mut i = 0;

    while i < haystack.len() {
        if haystack[i..].starts_with(name) {
            let before_ok = i == 0 || !is_word_char(bytes[i - 1] as char);
            let end = i + name.len();
            let after_ok = end >= haystack.len() || !is_word_char(bytes[end] as char);
            if before_ok && after_ok {
                result.push_str(replacement);
                i = end;
                continue;
            }
        }
        match haystack[i..].chars().next() {
            Some(ch) => {
                result.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }
    result
}

/// Recursive-descent parser over the sanitized arithmetic string.
///
/// Grammar: expr := term (('+'|'-') term)*; term := factor (('*'|'/')
/// factor)*; factor := '-'* primary; primary := number | '(' expr ')'.
struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn parse(mut self) -> Result<Decimal, String> {
        let value = self.expr()?;
        self.skip_spaces();
        match self.chars.peek() {
            None => Ok(value),
            Some(c) => Err(format!("unexpected trailing '{c}'")),
        }
    }

    fn skip_spaces(&mut self) {
        while self.chars.peek() == Some(&' ') {
            self.chars.next();
        }
    }

    fn expr(&mut self) -> Result<Decimal, String> {
        let mut value = self.term()?;
        loop {
            self.skip_spaces();
            match self.chars.peek() {
                Some('+') => {
                    self.chars.next();
                    value = value
                        .checked_add(self.term()?)
                        .ok_or("arithmetic overflow")?;
                }
                Some('-') => {
                    self.chars.next();
                    value = value
                        .checked_sub(self.term()?)
                        .ok_or("arithmetic overflow")?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Decimal, String> {
        let mut value = self.factor()?;
        loop {
            self.skip_spaces();
            match self.chars.peek() {
                Some('*') => {
                    self.chars.next();
                    value = value
                        .checked_mul(self.factor()?)
                        .ok_or("arithmetic overflow")?;
                }
                Some('/') => {
                    self.chars.next();
                    let divisor = self.factor()?;
                    value = value
                        .checked_div(divisor)
                        .ok_or("division by zero")?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<Decimal, String> {
        self.skip_spaces();
        if self.chars.peek() == Some(&'-') {
            self.chars.next();
            return Ok(-self.factor()?);
        }
        if self.chars.peek() == Some(&'+') {
            self.chars.next();
            return self.factor();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Decimal, String> {
        self.skip_spaces();
        match self.chars.peek() {
            Some('(') => {
                self.chars.next();
                let value = self.expr()?;
                self.skip_spaces();
                if self.chars.next() != Some(')') {
                    return Err("missing closing parenthesis".to_string());
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || *c == '.' => self.number(),
            Some(c) => Err(format!("unexpected '{c}'")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn number(&mut self) -> Result<Decimal, String> {
        let mut literal = String::new();
        while let Some(c) = self.chars.peek() {
            if c.is_ascii_digit() || *c == '.' {
                literal.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }
        literal
            .parse::<Decimal>()
            .map_err(|_| format!("invalid number '{literal}'"))
    }
}
