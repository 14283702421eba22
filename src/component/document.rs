use std::fmt;

use derive_more::Display;

use super::{Component, ComponentKind, DuplicatePolicy, TreeError, Visitor};
use crate::{conformance::ConformanceError, property::Property};

/// Handle of a component inside a `Document`.
///
/// Ids are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("#{_0}")]
pub struct ComponentId(usize);

#[derive(Debug, Clone, PartialEq)]
struct Node {
    component: Component,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
}

impl Node {
    fn new(component: Component) -> Self {
        Self {
            component,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A component tree.
///
/// The document owns every component, including the ones created but not
/// attached yet. Slots of components moved out with `extract` stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    root: ComponentId,
    policy: DuplicatePolicy,
}

impl Document {
    pub fn new(root: Component) -> Self {
        Self::with_policy(root, DuplicatePolicy::default())
    }

    pub fn with_policy(root: Component, policy: DuplicatePolicy) -> Self {
        Self {
            nodes: vec![Some(Node::new(root))],
            root: ComponentId(0),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    #[inline]
    pub fn root_id(&self) -> ComponentId {
        self.root
    }

    pub fn root(&self) -> ComponentRef<'_> {
        match self.get(self.root) {
            Some(root) => root,
            // The root slot is never emptied
            None => unreachable!("document without root"),
        }
    }

    pub fn get(&self, id: ComponentId) -> Option<ComponentRef<'_>> {
        self.node(id).map(|node| ComponentRef {
            document: self,
            id,
            node,
        })
    }

    #[inline]
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.node(id).map(|node| &node.component)
    }

    #[inline]
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.node_mut(id).ok().map(|node| &mut node.component)
    }

    /// Number of components owned by the document.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        // There is always a root
        false
    }

    #[inline]
    fn node(&self, id: ComponentId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, id: ComponentId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownComponent(id))
    }

    /// Add a detached component to the document.
    pub fn create(&mut self, component: Component) -> ComponentId {
        self.nodes.push(Some(Node::new(component)));
        ComponentId(self.nodes.len() - 1)
    }

    /// Append `child` to the children of `parent`.
    ///
    /// The child must be detached and must not be an ancestor of `parent`.
    /// Nothing but the tree structure is checked.
    pub fn attach(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), TreeError> {
        self.node_mut(parent)?;
        let node = self.node_mut(child)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        let is_leaf = node.children.is_empty();
        if child == self.root {
            return Err(TreeError::RootAttach);
        }

        // A leaf can only be its own ancestor
        let mut ancestor = if is_leaf && parent != child {
            None
        } else {
            Some(parent)
        };
        while let Some(id) = ancestor {
            if id == child {
                return Err(TreeError::Cycle { parent, child });
            }
            ancestor = self.node(id).and_then(|node| node.parent);
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Remove `child` from the children of `parent`. The child and its
    /// subtree stay in the document, detached.
    pub fn detach(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), TreeError> {
        let node = self.node_mut(parent)?;
        let pos = node
            .children
            .iter()
            .position(|id| *id == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        node.children.remove(pos);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Add a property with the duplicate policy of the document.
    pub fn add_property(
        &mut self,
        id: ComponentId,
        property: Property,
    ) -> Result<Option<Property>, TreeError> {
        let policy = self.policy;
        self.node_mut(id)?.component.add_property(property, policy)
    }

    pub fn remove_property(
        &mut self,
        id: ComponentId,
        name: &str,
    ) -> Result<Vec<Property>, TreeError> {
        Ok(self.node_mut(id)?.component.remove_property(name))
    }

    /// Move the tree of `other` below `parent` and return the id of its
    /// former root. Components of `other` that were not attached are dropped.
    pub fn graft(&mut self, parent: ComponentId, mut other: Document) -> Result<ComponentId, TreeError> {
        self.node_mut(parent)?;
        let id = self.adopt(&mut other.nodes, other.root)?;
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Move the subtree at `root` out of `nodes` into this document, in
    /// pre-order, and return its new id.
    fn adopt(
        &mut self,
        nodes: &mut [Option<Node>],
        root: ComponentId,
    ) -> Result<ComponentId, TreeError> {
        let mut adopted = None;
        let mut pending = vec![(root, None)];
        while let Some((old, parent)) = pending.pop() {
            let Some(node) = nodes.get_mut(old.0).and_then(Option::take) else {
                continue;
            };
            let id = self.create(node.component);
            match parent {
                Some(parent) => {
                    self.node_mut(id)?.parent = Some(parent);
                    self.node_mut(parent)?.children.push(id);
                }
                None => adopted = Some(id),
            }
            pending.extend(node.children.into_iter().rev().map(|child| (child, Some(id))));
        }
        adopted.ok_or(TreeError::UnknownComponent(root))
    }

    /// Move a detached component and its subtree out into a document of its
    /// own.
    pub fn extract(&mut self, id: ComponentId) -> Result<Document, TreeError> {
        if id == self.root {
            return Err(TreeError::RootAttach);
        }
        if self.node_mut(id)?.parent.is_some() {
            return Err(TreeError::AttachedSubtree(id));
        }

        let mut out = Document {
            nodes: Vec::new(),
            root: ComponentId(0),
            policy: self.policy,
        };
        out.root = out.adopt(&mut self.nodes, id)?;
        Ok(out)
    }

    /// Check the whole tree against RFC 5545.
    pub fn conform(&self) -> Result<(), ConformanceError> {
        self.root().conform()
    }
}

/// Read-only view of one component of a `Document`.
#[derive(Clone, Copy)]
pub struct ComponentRef<'a> {
    document: &'a Document,
    id: ComponentId,
    node: &'a Node,
}

impl fmt::Debug for ComponentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("children", &self.node.children)
            .finish()
    }
}

impl<'a> ComponentRef<'a> {
    #[inline]
    pub fn id(self) -> ComponentId {
        self.id
    }

    #[inline]
    pub fn kind(self) -> ComponentKind {
        self.node.component.kind()
    }

    #[inline]
    pub fn name(self) -> &'a str {
        self.node.component.name()
    }

    #[inline]
    pub fn component(self) -> &'a Component {
        &self.node.component
    }

    #[inline]
    pub fn document(self) -> &'a Document {
        self.document
    }

    #[inline]
    pub fn properties(self) -> &'a [Property] {
        self.node.component.properties()
    }

    #[inline]
    pub fn property(self, name: &str) -> Option<&'a Property> {
        self.node.component.property(name)
    }

    pub fn properties_named(self, name: &str) -> impl Iterator<Item = &'a Property> {
        self.node.component.properties_named(name)
    }

    #[inline]
    pub fn has_property(self, name: &str) -> bool {
        self.node.component.has_property(name)
    }

    pub fn parent(self) -> Option<ComponentRef<'a>> {
        self.node.parent.and_then(|id| self.document.get(id))
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = ComponentRef<'a>> {
        let document = self.document;
        self.node
            .children
            .iter()
            .filter_map(move |id| document.get(*id))
    }

    /// Visit this component, its properties and then, depth-first, its
    /// children, unless the visitor does not descend.
    ///
    /// The walk keeps its own stack, so nesting depth is only bounded by
    /// memory.
    pub fn accept<V: Visitor + ?Sized>(self, visitor: &mut V) -> Result<(), V::Error> {
        let mut pending = vec![self];
        while let Some(component) = pending.pop() {
            visitor.visit_component(component)?;
            for property in component.properties() {
                visitor.visit_property(component, property)?;
            }
            if !visitor.descend() {
                break;
            }
            pending.extend(component.children().rev());
        }
        Ok(())
    }

    /// Check this component and its subtree, see `crate::conform`.
    #[inline]
    pub fn conform(self) -> Result<(), ConformanceError> {
        crate::conformance::conform(self)
    }
}
