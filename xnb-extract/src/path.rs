//! Asset paths: addressing nodes of the content tree
//!
//! A path is a stack of steps rooted at `content`. Tagged composites are
//! transparent: stepping into a node first strips its tag layers, so a path
//! never mentions the tag/payload indirection. The dotted text form
//! (`items.0.texture`) is what the document records.
//!
//! The extraction walk pushes and pops steps on an `AssetPath` while it
//! descends, and the reinjection pass resolves the recorded path with
//! [`AssetPath::resolve_mut`], which applies the same stepping rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// One step of an asset path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Field of a mapping
    Field(String),
    /// Zero-based element of an array
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Position of a node in the content tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AssetPath {
    steps: Vec<PathStep>,
}

impl AssetPath {
    /// The path of `content` itself
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<PathStep> {
        self.steps.pop()
    }

    /// Whether the dotted form parses back to this path.
    ///
    /// Field names containing `.` cannot be spelled, nor can digit-only
    /// names with leading zeros or a root-level field with an empty name.
    pub fn is_addressable(&self) -> bool {
        let unspellable = self.steps.iter().any(|s| match s {
            PathStep::Field(name) => {
                name.contains('.') || (is_numeric(name) && !is_canonical_index(name))
            }
            PathStep::Index(_) => false,
        });
        let empty_root = matches!(self.steps.as_slice(), [PathStep::Field(name)] if name.is_empty());
        !unspellable && !empty_root
    }

    /// Find the node this path addresses
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.steps
            .iter()
            .try_fold(root, |node, step| step_into(node, step))
    }

    /// Find the node this path addresses, mutably
    pub fn resolve_mut<'v>(&self, root: &'v mut Value) -> Option<&'v mut Value> {
        self.steps
            .iter()
            .try_fold(root, |node, step| step_into_mut(node, step))
    }
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn is_canonical_index(segment: &str) -> bool {
    segment
        .parse::<usize>()
        .is_ok_and(|i| i.to_string() == segment)
}

fn step_into<'v>(node: &'v Value, step: &PathStep) -> Option<&'v Value> {
    match (node.untagged(), step) {
        (Value::Array(items), PathStep::Index(i)) => items.get(*i),
        (Value::Map(fields), PathStep::Field(name)) => fields.get(name),
        // Digit-only field names print the same as indices
        (Value::Map(fields), PathStep::Index(i)) => fields.get(&i.to_string()),
        _ => None,
    }
}

fn step_into_mut<'v>(node: &'v mut Value, step: &PathStep) -> Option<&'v mut Value> {
    match (node.untagged_mut(), step) {
        (Value::Array(items), PathStep::Index(i)) => items.get_mut(*i),
        (Value::Map(fields), PathStep::Field(name)) => fields.get_mut(name),
        (Value::Map(fields), PathStep::Index(i)) => fields.get_mut(&i.to_string()),
        _ => None,
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for AssetPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let steps = s
            .split('.')
            .map(|segment| match segment.parse::<usize>() {
                Ok(i) if is_numeric(segment) => PathStep::Index(i),
                _ => PathStep::Field(segment.to_string()),
            })
            .collect();
        Ok(Self { steps })
    }
}

impl From<&str> for AssetPath {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(path) => path,
            Err(never) => match never {},
        }
    }
}

impl Serialize for AssetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(AssetPath::from(text.as_str()))
    }
}
