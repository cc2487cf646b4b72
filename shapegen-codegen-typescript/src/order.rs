//! Dependency-first ordering of generated modules.

use indexmap::{IndexMap, IndexSet};
use shapegen_model::{Model, ShapeId};

/// A permutation of `0..shapes.len()` placing every shape after the shapes
/// it depends on. Ties keep their input order; cycles are broken where the
/// walk first re-enters a shape.
pub fn dependency_order(model: &Model, shapes: &[&ShapeId]) -> Vec<usize> {
    let mut positions: IndexMap<&ShapeId, Vec<usize>> = IndexMap::new();
    for (index, id) in shapes.iter().enumerate() {
        positions.entry(*id).or_default().push(index);
    }

    let mut walk = Walk {
        model,
        positions: &positions,
        entered: IndexSet::new(),
        order: Vec::with_capacity(shapes.len()),
    };
    for id in positions.keys() {
        walk.visit(*id);
    }
    walk.order
}

struct Walk<'a> {
    model: &'a Model,
    positions: &'a IndexMap<&'a ShapeId, Vec<usize>>,
    entered: IndexSet<&'a ShapeId>,
    order: Vec<usize>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, id: &'a ShapeId) {
        if !self.entered.insert(id) {
            return;
        }
        let (model, positions) = (self.model, self.positions);
        for dep in model.dependencies(id) {
            if let Some((dep, _)) = positions.get_key_value(dep) {
                self.visit(*dep);
            }
        }
        if let Some(indices) = positions.get(id) {
            self.order.extend(indices);
        }
    }
}

#[cfg(test)]
mod tests {
    use shapegen_codegen::testing::sample_model;
    use shapegen_model::{Shape, ShapeKind, Traits};

    use super::*;

    fn id(name: &str) -> ShapeId {
        ShapeId::new("com.example", name)
    }

    #[test]
    fn test_already_sorted_is_identity() {
        let model = sample_model();
        let ids = [id("Percent"), id("Name"), id("Color"), id("Person")];
        let refs: Vec<&ShapeId> = ids.iter().collect();
        assert_eq!(dependency_order(&model, &refs), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_dependencies_move_first() {
        let model = sample_model();
        let ids = [id("Person"), id("Color"), id("Name"), id("Percent")];
        let refs: Vec<&ShapeId> = ids.iter().collect();
        // Person needs Name then Percent
        assert_eq!(dependency_order(&model, &refs), vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut model = Model::new();
        for name in ["A", "B"] {
            model.insert(Shape::new(id(name), ShapeKind::Structure { members: vec![] }));
        }
        model.add_member(&id("A"), "b", id("B"), Traits::default()).unwrap();
        model.add_member(&id("B"), "a", id("A"), Traits::default()).unwrap();

        let ids = [id("A"), id("B")];
        let refs: Vec<&ShapeId> = ids.iter().collect();
        assert_eq!(dependency_order(&model, &refs), vec![1, 0]);
    }

    #[test]
    fn test_dependencies_outside_the_set_are_ignored() {
        let model = sample_model();
        let ids = [id("Person")];
        let refs: Vec<&ShapeId> = ids.iter().collect();
        assert_eq!(dependency_order(&model, &refs), vec![0]);
    }
}
