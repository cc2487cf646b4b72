//! Shape identifiers.

use std::{fmt, str::FromStr};

/// Namespace holding the built-in simple shapes every model carries.
pub const PRELUDE_NAMESPACE: &str = "shapegen.api";

/// Absolute shape identifier: `namespace#Name`, or `namespace#Name$member`
/// for a member of an aggregate shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            member: None,
        }
    }

    /// The id of member `member` of this shape.
    pub fn with_member(&self, member: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.into()),
        }
    }

    /// A shape in the prelude namespace.
    pub fn prelude(name: impl Into<String>) -> Self {
        Self::new(PRELUDE_NAMESPACE, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    pub fn is_prelude(&self) -> bool {
        self.namespace == PRELUDE_NAMESPACE
    }

    /// The id with any member part removed.
    pub fn without_member(&self) -> Self {
        Self::new(self.namespace.clone(), self.name.clone())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_namespace(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

impl FromStr for ShapeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = s
            .split_once('#')
            .ok_or_else(|| format!("shape id '{}' is missing a '#' separator", s))?;
        if !is_namespace(namespace) {
            return Err(format!("invalid namespace '{}' in shape id '{}'", namespace, s));
        }
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };
        if !is_identifier(name) {
            return Err(format!("invalid shape name '{}' in shape id '{}'", name, s));
        }
        if let Some(member) = member
            && !is_identifier(member)
        {
            return Err(format!("invalid member name '{}' in shape id '{}'", member, s));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: member.map(str::to_string),
        })
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${}", member)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: ShapeId = "com.example#Percent".parse().unwrap();
        assert_eq!(id.namespace(), "com.example");
        assert_eq!(id.name(), "Percent");
        assert_eq!(id.member(), None);
        assert_eq!(id.to_string(), "com.example#Percent");

        let member: ShapeId = "com.example#User$name".parse().unwrap();
        assert!(member.is_member());
        assert_eq!(member.member(), Some("name"));
        assert_eq!(member.without_member(), "com.example#User".parse().unwrap());
        assert_eq!(member.to_string(), "com.example#User$name");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("Percent".parse::<ShapeId>().is_err());
        assert!("#Percent".parse::<ShapeId>().is_err());
        assert!("com..example#Percent".parse::<ShapeId>().is_err());
        assert!("com.example#1Percent".parse::<ShapeId>().is_err());
        assert!("com.example#User$".parse::<ShapeId>().is_err());
    }

    #[test]
    fn test_prelude() {
        assert!(ShapeId::prelude("String").is_prelude());
        assert!(!ShapeId::new("com.example", "String").is_prelude());
    }
}
