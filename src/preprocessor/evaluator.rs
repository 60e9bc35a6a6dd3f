//! Renders a directive tree against a [`Context`].

use std::slice;

use crate::error::{EvaluationError, Location};
use crate::preprocessor::condition::Condition;
use crate::preprocessor::context::{Context, Value, ValueKind};
use crate::preprocessor::parser::{Conditional, Node};

/// Produces the output text of one file.
///
/// Only the selected body of each conditional is visited, so variables used
/// by skipped branches never have to exist.
///
/// # Errors
/// * `EvaluationError::UndefinedVariable` for a name missing from `context`
/// * `EvaluationError::TypeMismatch` when a condition uses a variable of the wrong shape
pub fn render(nodes: &[Node<'_>], context: &Context) -> Result<String, EvaluationError> {
    let mut output = String::new();
    let mut pending: Vec<slice::Iter<'_, Node<'_>>> = vec![nodes.iter()];

    while let Some(siblings) = pending.last_mut() {
        let Some(node) = siblings.next() else {
            pending.pop();
            continue;
        };

        match node {
            Node::Literal(text) => output.push_str(text),
            Node::Variable { name, location } => {
                output.push_str(&lookup(context, name, location)?.to_string());
            }
            Node::Conditional(conditional) => {
                if let Some(body) = select(conditional, context)? {
                    pending.push(body.iter());
                }
            }
        }
    }

    Ok(output)
}

/// First branch whose condition holds, else the `@@else@@` body, else nothing.
fn select<'n, 'a>(
    conditional: &'n Conditional<'a>,
    context: &Context,
) -> Result<Option<&'n [Node<'a>]>, EvaluationError> {
    for branch in &conditional.branches {
        if test(&branch.condition, context, &branch.location)? {
            return Ok(Some(&branch.body));
        }
    }
    Ok(conditional.else_body.as_deref())
}

/// Evaluates a condition with short-circuiting `&&` and `||`.
pub fn test(
    condition: &Condition,
    context: &Context,
    location: &Location,
) -> Result<bool, EvaluationError> {
    match condition {
        Condition::Equals { name, value } => Ok(scalar(context, name, location)? == value.as_str()),
        Condition::NotEquals { name, value } => Ok(scalar(context, name, location)? != value.as_str()),
        Condition::Contains { name, value } => {
            Ok(list(context, name, location)?.iter().any(|item| item == value))
        }
        Condition::Flag { name } => match scalar(context, name, location)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(EvaluationError::TypeMismatch {
                name: name.clone(),
                expected: "`true` or `false`".to_string(),
                found: format!("\"{other}\""),
                location: location.clone(),
            }),
        },
        Condition::Not(inner) => Ok(!test(inner, context, location)?),
        Condition::And(left, right) => {
            Ok(test(left, context, location)? && test(right, context, location)?)
        }
        Condition::Or(left, right) => {
            Ok(test(left, context, location)? || test(right, context, location)?)
        }
    }
}

fn lookup<'c>(
    context: &'c Context,
    name: &str,
    location: &Location,
) -> Result<&'c Value, EvaluationError> {
    context.lookup(name).ok_or_else(|| EvaluationError::UndefinedVariable {
        name: name.to_string(),
        location: location.clone(),
    })
}

fn scalar<'c>(context: &'c Context, name: &str, location: &Location) -> Result<&'c str, EvaluationError> {
    match lookup(context, name, location)? {
        Value::Scalar(value) => Ok(value),
        other => Err(mismatch(name, ValueKind::Scalar, other, location)),
    }
}

fn list<'c>(
    context: &'c Context,
    name: &str,
    location: &Location,
) -> Result<&'c [String], EvaluationError> {
    match lookup(context, name, location)? {
        Value::List(items) => Ok(items),
        other => Err(mismatch(name, ValueKind::List, other, location)),
    }
}

fn mismatch(name: &str, expected: ValueKind, found: &Value, location: &Location) -> EvaluationError {
    EvaluationError::TypeMismatch {
        name: name.to_string(),
        expected: format!("a {expected}"),
        found: format!("a {}", found.kind()),
        location: location.clone(),
    }
}
