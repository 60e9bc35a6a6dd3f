//! Boolean expressions guarding `@@if@@` and `@@elif@@` branches.
//!
//! ```text
//! or   := and ( "||" and )*
//! and  := not ( "&&" not )*
//! not  := "!" not | atom
//! atom := "(" or ")" | NAME ( ("==" | "!=" | "has") STRING )?
//! ```

use crate::preprocessor::scanner::is_variable_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `NAME == "value"`
    Equals { name: String, value: String },
    /// `NAME != "value"`
    NotEquals { name: String, value: String },
    /// `NAME has "value"`
    Contains { name: String, value: String },
    /// Bare `NAME`, a scalar holding `true` or `false`
    Flag { name: String },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Parses the text captured after `if` or `elif`.
    ///
    /// Returns the reason on failure; the caller attaches the location.
    pub fn parse(text: &str) -> Result<Self, String> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err("empty condition".to_string());
        }

        let mut parser = ConditionParser { tokens, cursor: 0 };
        let condition = parser.or()?;
        match parser.peek() {
            None => Ok(condition),
            Some(Tok::RParen) => Err("unbalanced parentheses".to_string()),
            Some(token) => Err(format!("unexpected {} after condition", token.describe())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Name(String),
    Str(String),
    Eq,
    Ne,
    Has,
    Not,
    And,
    Or,
    LParen,
    RParen,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Name(name) => format!("`{name}`"),
            Tok::Str(value) => format!("string \"{value}\""),
            Tok::Eq => "`==`".to_string(),
            Tok::Ne => "`!=`".to_string(),
            Tok::Has => "`has`".to_string(),
            Tok::Not => "`!`".to_string(),
            Tok::And => "`&&`".to_string(),
            Tok::Or => "`||`".to_string(),
            Tok::LParen => "`(`".to_string(),
            Tok::RParen => "`)`".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Tok>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let token = match ch {
            ' ' | '\t' => continue,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '=' if chars.next_if(|&(_, c)| c == '=').is_some() => Tok::Eq,
            '!' if chars.next_if(|&(_, c)| c == '=').is_some() => Tok::Ne,
            '!' => Tok::Not,
            '&' if chars.next_if(|&(_, c)| c == '&').is_some() => Tok::And,
            '|' if chars.next_if(|&(_, c)| c == '|').is_some() => Tok::Or,
            '"' => Tok::Str(string_literal(&mut chars)?),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some((index, c)) =
                    chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_' || c == ':')
                {
                    end = index + c.len_utf8();
                }
                let word = &text[start..end];
                if word == "has" {
                    Tok::Has
                } else if is_variable_name(word) {
                    Tok::Name(word.to_string())
                } else {
                    return Err(format!("invalid variable name `{word}`"));
                }
            }
            other => return Err(format!("unknown operator `{other}`")),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Reads the rest of a `"..."` literal; the opening quote is already consumed.
fn string_literal<I>(chars: &mut std::iter::Peekable<I>) -> Result<String, String>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, '"')) => return Ok(value),
            Some((_, '\\')) => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                Some((_, other)) => return Err(format!("unknown escape `\\{other}`")),
                None => return Err("unterminated string literal".to_string()),
            },
            Some((_, c)) => value.push(c),
            None => return Err("unterminated string literal".to_string()),
        }
    }
}

struct ConditionParser {
    tokens: Vec<Tok>,
    cursor: usize,
}

impl ConditionParser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<Tok> {
        let token = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        token
    }

    fn eat(&mut self, expected: &Tok) -> bool {
        if self.peek() == Some(expected) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Condition, String> {
        let mut left = self.and()?;
        while self.eat(&Tok::Or) {
            let right = self.and()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Condition, String> {
        let mut left = self.not()?;
        while self.eat(&Tok::And) {
            let right = self.not()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not(&mut self) -> Result<Condition, String> {
        if self.eat(&Tok::Not) {
            return Ok(Condition::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Condition, String> {
        match self.next() {
            Some(Tok::LParen) => {
                let inner = self.or()?;
                if self.eat(&Tok::RParen) {
                    Ok(inner)
                } else {
                    Err("unbalanced parentheses".to_string())
                }
            }
            Some(Tok::Name(name)) => {
                let operator = match self.peek() {
                    Some(op @ (Tok::Eq | Tok::Ne | Tok::Has)) => op.clone(),
                    _ => return Ok(Condition::Flag { name }),
                };
                self.cursor += 1;
                let value = match self.next() {
                    Some(Tok::Str(value)) => value,
                    _ => {
                        return Err(format!(
                            "expected a string literal after {}",
                            operator.describe()
                        ))
                    }
                };
                Ok(match operator {
                    Tok::Eq => Condition::Equals { name, value },
                    Tok::Ne => Condition::NotEquals { name, value },
                    _ => Condition::Contains { name, value },
                })
            }
            Some(token) => Err(format!("expected a variable name, found {}", token.describe())),
            None => Err("expected a variable name at end of condition".to_string()),
        }
    }
}
