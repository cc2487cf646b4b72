//! The shape graph.

use indexmap::IndexMap;

use crate::{Shape, ShapeId, ShapeKind, Traits};

/// An insertion-ordered graph of shapes.
///
/// Iteration follows insertion order, so traversal is stable for a given
/// model. Every model starts out holding the prelude simple shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    shapes: IndexMap<ShapeId, Shape>,
}

fn prelude() -> [(&'static str, ShapeKind); 13] {
    [
        ("String", ShapeKind::String),
        ("Integer", ShapeKind::Integer),
        ("Long", ShapeKind::Long),
        ("Short", ShapeKind::Short),
        ("Byte", ShapeKind::Byte),
        ("Float", ShapeKind::Float),
        ("Double", ShapeKind::Double),
        ("BigInteger", ShapeKind::BigInteger),
        ("BigDecimal", ShapeKind::BigDecimal),
        ("Boolean", ShapeKind::Boolean),
        ("Blob", ShapeKind::Blob),
        ("Timestamp", ShapeKind::Timestamp),
        ("Document", ShapeKind::Document),
    ]
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// A model holding only the prelude.
    pub fn new() -> Self {
        let mut shapes = IndexMap::new();
        for (name, kind) in prelude() {
            let id = ShapeId::prelude(name);
            shapes.insert(id.clone(), Shape::new(id, kind));
        }
        Self { shapes }
    }

    /// Insert or replace a shape, returning the previous one.
    pub fn insert(&mut self, shape: Shape) -> Option<Shape> {
        self.shapes.insert(shape.id().clone(), shape)
    }

    /// Add a member to a structure or union, inserting the member shape.
    pub fn add_member(
        &mut self,
        parent: &ShapeId,
        name: &str,
        target: ShapeId,
        traits: Traits,
    ) -> Result<ShapeId, String> {
        let member_id = parent.with_member(name);
        let shape = self
            .shapes
            .get_mut(parent)
            .ok_or_else(|| format!("unknown shape '{}'", parent))?;
        let kind = shape.kind().as_str();
        let (ShapeKind::Structure { members } | ShapeKind::Union { members }) =
            shape.kind_mut()
        else {
            return Err(format!("shape '{}' is a {} and cannot have members", parent, kind));
        };
        if members.contains(&member_id) {
            return Err(format!("duplicate member '{}'", member_id));
        }
        members.push(member_id.clone());
        self.insert(
            Shape::new(member_id.clone(), ShapeKind::Member { target }).with_traits(traits),
        );
        Ok(member_id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// All shapes, prelude and members included, in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.shapes.keys()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Member shapes of a structure or union, in declaration order.
    pub fn members(&self, id: &ShapeId) -> Vec<&Shape> {
        match self.get(id).map(Shape::kind) {
            Some(ShapeKind::Structure { members }) | Some(ShapeKind::Union { members }) => {
                members.iter().filter_map(|m| self.get(m)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Non-prelude, non-member shapes that `id` refers to directly, looking
    /// through members to their targets. Order is declaration order without
    /// duplicates.
    pub fn dependencies(&self, id: &ShapeId) -> Vec<&ShapeId> {
        let Some(shape) = self.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&ShapeId> = Vec::new();
        for reference in shape.kind().references() {
            let resolved = match self.get(reference) {
                Some(member) if member.is_member() => member.member_target(),
                _ => Some(reference),
            };
            if let Some(dep) = resolved
                && !dep.is_prelude()
                && !dep.is_member()
                && dep != id
                && !out.contains(&dep)
            {
                out.push(dep);
            }
        }
        out
    }

    /// Pairs of `(referrer, missing)` for references that do not resolve.
    pub fn dangling_references(&self) -> Vec<(&ShapeId, &ShapeId)> {
        self.shapes
            .values()
            .flat_map(|shape| {
                shape
                    .kind()
                    .references()
                    .into_iter()
                    .filter(|r| !self.contains(r))
                    .map(move |r| (shape.id(), r))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ShapeId {
        ShapeId::new("com.example", name)
    }

    #[test]
    fn test_new_model_has_prelude() {
        let model = Model::new();
        assert!(model.contains(&ShapeId::prelude("String")));
        assert!(model.shape_ids().all(ShapeId::is_prelude));
    }

    #[test]
    fn test_add_member() {
        let mut model = Model::new();
        model.insert(Shape::new(id("User"), ShapeKind::Structure { members: vec![] }));

        let name = model
            .add_member(&id("User"), "name", ShapeId::prelude("String"), Traits::default().required())
            .unwrap();

        assert_eq!(name.to_string(), "com.example#User$name");
        let members = model.members(&id("User"));
        assert_eq!(members.len(), 1);
        assert!(members[0].traits().required);
        assert!(
            model
                .add_member(&id("User"), "name", ShapeId::prelude("String"), Traits::default())
                .is_err()
        );
    }

    #[test]
    fn test_add_member_to_union() {
        let mut model = Model::new();
        model.insert(Shape::new(id("Payment"), ShapeKind::Union { members: vec![] }));
        model
            .add_member(&id("Payment"), "card", ShapeId::prelude("String"), Traits::default())
            .unwrap();
        model
            .add_member(&id("Payment"), "iban", ShapeId::prelude("String"), Traits::default())
            .unwrap();

        let names: Vec<String> = model
            .members(&id("Payment"))
            .iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(names, vec!["com.example#Payment$card", "com.example#Payment$iban"]);
    }

    #[test]
    fn test_add_member_to_scalar_fails() {
        let mut model = Model::new();
        model.insert(Shape::new(id("Percent"), ShapeKind::Integer));
        let err = model
            .add_member(&id("Percent"), "x", ShapeId::prelude("String"), Traits::default())
            .unwrap_err();
        assert!(err.contains("integer"));
    }

    #[test]
    fn test_dependencies_look_through_members() {
        let mut model = Model::new();
        model.insert(Shape::new(id("Address"), ShapeKind::Structure { members: vec![] }));
        model.insert(Shape::new(id("User"), ShapeKind::Structure { members: vec![] }));
        model.insert(Shape::new(id("Users"), ShapeKind::List { member: id("User") }));
        model
            .add_member(&id("User"), "home", id("Address"), Traits::default())
            .unwrap();
        model
            .add_member(&id("User"), "work", id("Address"), Traits::default())
            .unwrap();
        model
            .add_member(&id("User"), "name", ShapeId::prelude("String"), Traits::default())
            .unwrap();

        assert_eq!(model.dependencies(&id("User")), vec![&id("Address")]);
        assert_eq!(model.dependencies(&id("Users")), vec![&id("User")]);
        assert!(model.dependencies(&id("Address")).is_empty());
    }

    #[test]
    fn test_dangling_references() {
        let mut model = Model::new();
        model.insert(Shape::new(id("Users"), ShapeKind::List { member: id("User") }));
        assert_eq!(model.dangling_references(), vec![(&id("Users"), &id("User"))]);
    }
}
