//! Concrete single-inheritance type tree.

use std::collections::{HashMap, VecDeque};

use crate::error::{HierarchyError, HierarchyResult};
use crate::traits::TypeHierarchy;
use crate::TypeId;

/// A single-inheritance tree of named annotation types.
///
/// Names are interned into dense [`TypeId`]s in declaration order; the root
/// is always `TypeId::new(0)`. Descendant lists are produced breadth-first in
/// declaration order, so they are stable for one tree.
///
/// # Example
///
/// ```rust
/// use span_hierarchy::{TypeHierarchy, TypeTree};
///
/// let mut builder = TypeTree::builder("Annotation");
/// let concept = builder.declare("Concept", "Annotation").unwrap();
/// let tree = builder.build();
///
/// assert_eq!(tree.type_id("Concept"), Some(concept));
/// assert_eq!(tree.type_name(concept), Some("Concept"));
/// assert_eq!(tree.parent_of(concept), Some(tree.root()));
/// ```
#[derive(Debug, Clone)]
pub struct TypeTree {
    names: Vec<String>,
    parents: Vec<Option<TypeId>>,
    children: Vec<Vec<TypeId>>,
    by_name: HashMap<String, TypeId>,
}

impl TypeTree {
    /// Creates a builder whose tree is rooted at `root_name`.
    pub fn builder(root_name: impl Into<String>) -> TypeTreeBuilder {
        TypeTreeBuilder::new(root_name)
    }

    /// Returns the root type.
    pub fn root(&self) -> TypeId {
        TypeId::new(0)
    }

    /// Looks up a type by name.
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a type by name, failing with [`HierarchyError::UnknownType`].
    pub fn resolve(&self, name: &str) -> HierarchyResult<TypeId> {
        self.type_id(name)
            .ok_or_else(|| HierarchyError::UnknownType(name.to_string()))
    }

    /// Gets the direct children of a type in declaration order.
    pub fn children_of(&self, type_id: TypeId) -> &[TypeId] {
        self.children
            .get(type_id.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the number of declared types, including the root.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the tree has no types. A built tree always has a root.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn intern(&mut self, name: String, parent: Option<TypeId>) -> TypeId {
        let id = TypeId::new(self.names.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        self.parents.push(parent);
        self.children.push(Vec::new());
        if let Some(parent) = parent {
            self.children[parent.index()].push(id);
        }
        id
    }
}

impl TypeHierarchy for TypeTree {
    fn parent_of(&self, type_id: TypeId) -> Option<TypeId> {
        self.parents.get(type_id.index()).copied().flatten()
    }

    fn properly_subsumed_types(&self, type_id: TypeId) -> Vec<TypeId> {
        let mut result = Vec::new();
        let mut queue: VecDeque<TypeId> = self.children_of(type_id).iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            result.push(current);
            queue.extend(self.children_of(current).iter().copied());
        }

        result
    }

    fn contains_type(&self, type_id: TypeId) -> bool {
        type_id.index() < self.names.len()
    }

    fn all_types(&self) -> Box<dyn Iterator<Item = TypeId> + '_> {
        Box::new((0..self.names.len() as u32).map(TypeId::new))
    }

    fn type_count(&self) -> usize {
        self.names.len()
    }

    fn type_name(&self, type_id: TypeId) -> Option<&str> {
        self.names.get(type_id.index()).map(String::as_str)
    }
}

/// Builder for [`TypeTree`].
///
/// Parents must be declared before their children, which keeps the tree
/// acyclic by construction.
#[derive(Debug, Clone)]
pub struct TypeTreeBuilder {
    tree: TypeTree,
}

impl TypeTreeBuilder {
    /// Creates a builder with the given root type.
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut tree = TypeTree {
            names: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            by_name: HashMap::new(),
        };
        tree.intern(root_name.into(), None);
        Self { tree }
    }

    /// Declares a new type under an already declared parent.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::DuplicateType`] if `name` is already declared
    /// - [`HierarchyError::UnknownParent`] if `parent` is not declared
    pub fn declare(&mut self, name: impl Into<String>, parent: &str) -> HierarchyResult<TypeId> {
        let name = name.into();
        if self.tree.by_name.contains_key(&name) {
            return Err(HierarchyError::DuplicateType(name));
        }
        let Some(parent_id) = self.tree.type_id(parent) else {
            return Err(HierarchyError::UnknownParent {
                name,
                parent: parent.to_string(),
            });
        };
        Ok(self.tree.intern(name, Some(parent_id)))
    }

    /// Returns true if a type with this name is already declared.
    pub fn contains(&self, name: &str) -> bool {
        self.tree.by_name.contains_key(name)
    }

    /// Builds the TypeTree.
    pub fn build(self) -> TypeTree {
        tracing::debug!(types = self.tree.len(), "built type tree");
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> TypeTree {
        let mut builder = TypeTree::builder("Annotation");
        builder.declare("Token", "Annotation").unwrap();
        builder.declare("Sentence", "Annotation").unwrap();
        builder.declare("Word", "Token").unwrap();
        builder.declare("Punct", "Token").unwrap();
        builder.declare("Cap", "Word").unwrap();
        builder.build()
    }

    #[test]
    fn test_root_is_first_id() {
        let tree = create_test_tree();
        assert_eq!(tree.root(), TypeId::new(0));
        assert_eq!(tree.type_name(tree.root()), Some("Annotation"));
        assert_eq!(tree.parent_of(tree.root()), None);
    }

    #[test]
    fn test_lookup_by_name() {
        let tree = create_test_tree();
        let word = tree.type_id("Word").unwrap();

        assert_eq!(tree.type_name(word), Some("Word"));
        assert_eq!(tree.resolve("Word"), Ok(word));
        assert_eq!(
            tree.resolve("Missing"),
            Err(HierarchyError::UnknownType("Missing".to_string()))
        );
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut builder = TypeTree::builder("Annotation");
        builder.declare("Word", "Annotation").unwrap();

        let err = builder.declare("Word", "Annotation").unwrap_err();
        assert_eq!(err, HierarchyError::DuplicateType("Word".to_string()));
    }

    #[test]
    fn test_root_name_cannot_be_redeclared() {
        let mut builder = TypeTree::builder("Annotation");
        assert!(builder.contains("Annotation"));
        assert!(builder.declare("Annotation", "Annotation").is_err());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut builder = TypeTree::builder("Annotation");

        let err = builder.declare("Word", "Token").unwrap_err();
        assert!(matches!(err, HierarchyError::UnknownParent { .. }));
        assert!(!builder.contains("Word"));
    }

    #[test]
    fn test_properly_subsumed_types_breadth_first() {
        let tree = create_test_tree();
        let names: Vec<&str> = tree
            .properly_subsumed_types(tree.root())
            .into_iter()
            .map(|id| tree.type_name(id).unwrap())
            .collect();

        assert_eq!(names, vec!["Token", "Sentence", "Word", "Punct", "Cap"]);
    }

    #[test]
    fn test_properly_subsumed_types_excludes_self() {
        let tree = create_test_tree();
        let word = tree.type_id("Word").unwrap();
        let cap = tree.type_id("Cap").unwrap();

        assert_eq!(tree.properly_subsumed_types(word), vec![cap]);
        assert!(tree.properly_subsumed_types(cap).is_empty());
    }

    #[test]
    fn test_unknown_ids_are_empty() {
        let tree = create_test_tree();
        let unknown = TypeId::new(500);

        assert!(!tree.contains_type(unknown));
        assert_eq!(tree.parent_of(unknown), None);
        assert!(tree.properly_subsumed_types(unknown).is_empty());
        assert!(tree.children_of(unknown).is_empty());
        assert_eq!(tree.type_name(unknown), None);
    }

    #[test]
    fn test_counts() {
        let tree = create_test_tree();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.type_count(), 6);
        assert_eq!(tree.all_types().count(), 6);
        assert!(!tree.is_empty());
    }
}
