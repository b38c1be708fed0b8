//! Ontology class hierarchy (`rdfs__subClassOf` closure).

use crate::ids::ClassId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef {
    pub id: ClassId,
    pub label: Option<String>,
}

/// One `(child)-[:rdfs__subClassOf*]->(ancestor)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLink {
    pub child: ClassRef,
    pub ancestor: ClassRef,
}

/// All descendants of one ancestor class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGroup {
    pub ancestor: ClassRef,
    pub children: Vec<ClassRef>,
}

/// Group hierarchy pairs by ancestor, keeping first-seen order for both
/// ancestors and children.
pub fn group_by_ancestor(links: impl IntoIterator<Item = ClassLink>) -> Vec<ClassGroup> {
    let mut groups: Vec<ClassGroup> = Vec::new();
    for link in links {
        match groups.iter_mut().find(|g| g.ancestor == link.ancestor) {
            Some(group) => group.children.push(link.child),
            None => groups.push(ClassGroup {
                ancestor: link.ancestor,
                children: vec![link.child],
            }),
        }
    }
    groups
}
