//! Builds the directive tree from a token stream.
//!
//! Open conditionals live on an explicit frame stack instead of the call
//! stack, so nesting depth is bounded only by memory.

use std::mem;
use std::path::Path;

use crate::error::{Location, ParseError, ParseErrorKind};
use crate::preprocessor::condition::Condition;
use crate::preprocessor::scanner::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Literal(&'a str),
    Variable { name: &'a str, location: Location },
    Conditional(Conditional<'a>),
}

/// An `@@if@@ ... @@elif@@ ... @@else@@ ... @@endif@@` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional<'a> {
    /// Tried in source order; the first true condition wins.
    pub branches: Vec<Branch<'a>>,
    pub else_body: Option<Vec<Node<'a>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch<'a> {
    pub condition: Condition,
    /// Location of the `@@if@@`/`@@elif@@` marker.
    pub location: Location,
    pub body: Vec<Node<'a>>,
}

impl<'a> Branch<'a> {
    fn new(condition: Condition, location: Location) -> Self {
        Self { condition, location, body: Vec::new() }
    }
}

/// A conditional whose `@@endif@@` has not been seen yet.
struct Frame<'a> {
    done: Vec<Branch<'a>>,
    current: Branch<'a>,
    else_body: Option<Vec<Node<'a>>>,
}

impl<'a> Frame<'a> {
    fn body_mut(&mut self) -> &mut Vec<Node<'a>> {
        match &mut self.else_body {
            Some(body) => body,
            None => &mut self.current.body,
        }
    }

    fn finish(mut self) -> Conditional<'a> {
        self.done.push(self.current);
        Conditional { branches: self.done, else_body: self.else_body }
    }
}

fn body_mut<'s, 'a>(root: &'s mut Vec<Node<'a>>, stack: &'s mut [Frame<'a>]) -> &'s mut Vec<Node<'a>> {
    match stack.last_mut() {
        Some(frame) => frame.body_mut(),
        None => root,
    }
}

/// Builds the node sequence of one file.
///
/// # Errors
/// * `ParseError` naming the file and the position of the offending marker
pub fn parse<'a>(file: &Path, tokens: Vec<Token<'a>>) -> Result<Vec<Node<'a>>, ParseError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame<'a>> = Vec::new();

    for token in tokens {
        let location = Location::new(file, token.position.line, token.position.column);
        let error = |kind| ParseError { location: location.clone(), kind };

        match token.kind {
            TokenKind::Literal => body_mut(&mut root, &mut stack).push(Node::Literal(token.raw)),
            TokenKind::Variable { name } => {
                body_mut(&mut root, &mut stack).push(Node::Variable { name, location })
            }
            TokenKind::Open { condition } => {
                let condition = Condition::parse(condition)
                    .map_err(|reason| error(ParseErrorKind::InvalidCondition(reason)))?;
                stack.push(Frame {
                    done: Vec::new(),
                    current: Branch::new(condition, location),
                    else_body: None,
                });
            }
            TokenKind::Elif { condition } => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| error(ParseErrorKind::BranchOutsideConditional("elif")))?;
                if frame.else_body.is_some() {
                    return Err(error(ParseErrorKind::UnexpectedElifAfterElse));
                }
                let condition = Condition::parse(condition)
                    .map_err(|reason| error(ParseErrorKind::InvalidCondition(reason)))?;
                let finished = mem::replace(&mut frame.current, Branch::new(condition, location));
                frame.done.push(finished);
            }
            TokenKind::Else => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| error(ParseErrorKind::BranchOutsideConditional("else")))?;
                if frame.else_body.is_some() {
                    return Err(error(ParseErrorKind::DuplicateElse));
                }
                frame.else_body = Some(Vec::new());
            }
            TokenKind::Close => {
                let frame = stack.pop().ok_or_else(|| error(ParseErrorKind::UnmatchedClose))?;
                body_mut(&mut root, &mut stack).push(Node::Conditional(frame.finish()));
            }
        }
    }

    match stack.pop() {
        Some(frame) => Err(ParseError {
            location: frame.current.location,
            kind: ParseErrorKind::UnterminatedConditional,
        }),
        None => Ok(root),
    }
}
