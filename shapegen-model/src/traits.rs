//! Constraint and documentation metadata attached to shapes.

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Whether `value` satisfies both bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Inclusive length bounds for strings, blobs and collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Length {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Length {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }
}

/// Traits a shape may carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traits {
    pub range: Option<Range>,
    pub length: Option<Length>,
    pub pattern: Option<String>,
    pub documentation: Option<String>,
    /// Only meaningful on members.
    pub required: bool,
}

impl Traits {
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.range = Some(Range::new(min, max));
        self
    }

    pub fn with_length(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.length = Some(Length::new(min, max));
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// True if any constraint (range, length, pattern) is present.
    pub fn is_constrained(&self) -> bool {
        self.range.is_some() || self.length.is_some() || self.pattern.is_some()
    }
}
