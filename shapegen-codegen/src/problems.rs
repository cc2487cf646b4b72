//! Diagnostics collected while preparing generators.
//!
//! Problems accumulate across phases. The session checks
//! [`Problems::has_fatal`] after each prepare phase and aborts before any code
//! is generated if a fatal problem was recorded.

use std::fmt;

use indexmap::IndexSet;
use shapegen_model::ShapeId;

/// A diagnostic, optionally tied to a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Problem {
    shape: Option<ShapeId>,
    message: String,
    fatal: bool,
}

impl Problem {
    pub fn new(shape: Option<ShapeId>, message: impl Into<String>, fatal: bool) -> Self {
        Self {
            shape,
            message: message.into(),
            fatal,
        }
    }

    /// A problem that aborts generation.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(None, message, true)
    }

    /// A problem that is reported but does not abort generation.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(None, message, false)
    }

    /// Attach the shape this problem concerns.
    pub fn on(mut self, shape: ShapeId) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn shape(&self) -> Option<&ShapeId> {
        self.shape.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fatal {
            write!(f, "(fatal) ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(shape) = &self.shape {
            write!(f, " {}", shape)?;
        }
        Ok(())
    }
}

/// Insertion-ordered set of problems. Duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problems {
    items: IndexSet<Problem>,
}

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem. Returns false if an equal problem was already present.
    pub fn add(&mut self, problem: Problem) -> bool {
        self.items.insert(problem)
    }

    /// Record a fatal problem about `shape`.
    pub fn fatal(&mut self, shape: Option<&ShapeId>, message: impl Into<String>) -> &mut Self {
        self.add(Problem::new(shape.cloned(), message, true));
        self
    }

    /// Record a non-fatal problem about `shape`.
    pub fn warn(&mut self, shape: Option<&ShapeId>, message: impl Into<String>) -> &mut Self {
        self.add(Problem::new(shape.cloned(), message, false));
        self
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Problem::is_fatal)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.items.iter()
    }

    /// Move every problem from `other` into `self`.
    pub fn merge(&mut self, other: Problems) {
        self.items.extend(other.items);
    }
}

impl<'a> IntoIterator for &'a Problems {
    type Item = &'a Problem;
    type IntoIter = indexmap::set::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return write!(f, "-empty-");
        }
        for (i, problem) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", problem)?;
        }
        Ok(())
    }
}
