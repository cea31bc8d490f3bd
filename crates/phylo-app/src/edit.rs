// ABOUTME: Textual edit operations accepted on the command line (`split:A`, `name:B=Homo`, ...).
// ABOUTME: Each parses into an EditOp that the session applies to its store or selection.

use std::str::FromStr;

use phylo_core::NodeId;

use crate::input::{InputEvent, Target};

#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    Split(NodeId),
    Append(NodeId),
    Insert { parent: NodeId, child: NodeId },
    Remove(NodeId),
    Name(NodeId, Option<String>),
    Length(NodeId, Option<f64>),
    Color(NodeId, Option<String>),
    Width(NodeId, Option<f64>),
    Select(NodeId),
    SelectBranch { parent: NodeId, child: NodeId },
    Clear,
    /// Replay a pointer or panel event, as a front end would deliver it
    Input(InputEvent),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditParseError {
    #[error("unknown edit operation `{0}`")]
    UnknownOperation(String),
    #[error("`{0}` needs a node id")]
    MissingId(String),
    #[error("`{0}` needs PARENT/CHILD")]
    MissingPair(String),
    #[error("`{0}` needs ID=VALUE")]
    MissingValue(String),
    #[error("`{value}` is not a number")]
    BadNumber { value: String },
}

impl FromStr for EditOp {
    type Err = EditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "clear" => return Ok(EditOp::Clear),
            "click-background" => return Ok(EditOp::Input(InputEvent::click(Target::Background))),
            "remove-selected" => return Ok(EditOp::Input(InputEvent::RemoveSelected)),
            "split-selected" => return Ok(EditOp::Input(InputEvent::InsertAboveSelected)),
            _ => {}
        }
        let (op, arg) = s
            .split_once(':')
            .ok_or_else(|| EditParseError::UnknownOperation(s.to_string()))?;

        match op {
            "split" => Ok(EditOp::Split(id(op, arg)?)),
            "append" => Ok(EditOp::Append(id(op, arg)?)),
            "remove" => Ok(EditOp::Remove(id(op, arg)?)),
            "select" => Ok(EditOp::Select(id(op, arg)?)),
            "insert" => {
                let (parent, child) = pair(op, arg)?;
                Ok(EditOp::Insert { parent, child })
            }
            "select-branch" => {
                let (parent, child) = pair(op, arg)?;
                Ok(EditOp::SelectBranch { parent, child })
            }
            "name" => {
                let (node, value) = assignment(op, arg)?;
                Ok(EditOp::Name(node, text(value)))
            }
            "color" => {
                let (node, value) = assignment(op, arg)?;
                Ok(EditOp::Color(node, text(value)))
            }
            "length" => {
                let (node, value) = assignment(op, arg)?;
                Ok(EditOp::Length(node, number(value)?))
            }
            "width" => {
                let (node, value) = assignment(op, arg)?;
                Ok(EditOp::Width(node, number(value)?))
            }
            "click" => Ok(EditOp::Input(InputEvent::click(Target::Node(id(op, arg)?)))),
            "shift-click" => Ok(EditOp::Input(InputEvent::modified_click(Target::Node(id(
                op, arg,
            )?)))),
            "double-click" => Ok(EditOp::Input(InputEvent::DoubleClick(id(op, arg)?))),
            "click-branch" => {
                let (parent, child) = pair(op, arg)?;
                Ok(EditOp::Input(InputEvent::click(Target::Branch { parent, child })))
            }
            "shift-click-branch" => {
                let (parent, child) = pair(op, arg)?;
                Ok(EditOp::Input(InputEvent::modified_click(Target::Branch {
                    parent,
                    child,
                })))
            }
            _ => Err(EditParseError::UnknownOperation(op.to_string())),
        }
    }
}

fn id(op: &str, arg: &str) -> Result<NodeId, EditParseError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(EditParseError::MissingId(op.to_string()));
    }
    Ok(arg.to_string())
}

fn pair(op: &str, arg: &str) -> Result<(NodeId, NodeId), EditParseError> {
    match arg.split_once('/') {
        Some((parent, child)) if !parent.trim().is_empty() && !child.trim().is_empty() => {
            Ok((parent.trim().to_string(), child.trim().to_string()))
        }
        _ => Err(EditParseError::MissingPair(op.to_string())),
    }
}

fn assignment<'a>(op: &str, arg: &'a str) -> Result<(NodeId, &'a str), EditParseError> {
    let (node, value) = arg
        .split_once('=')
        .ok_or_else(|| EditParseError::MissingValue(op.to_string()))?;
    Ok((id(op, node)?, value))
}

// Empty value resets the attribute to absent.
fn text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn number(value: &str) -> Result<Option<f64>, EditParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| EditParseError::BadNumber {
            value: value.to_string(),
        })
}
