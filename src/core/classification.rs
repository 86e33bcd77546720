//! Klassifikation der Dokument-Nodes (Container, Block, editierbares Blatt, inert).

use super::NodeId;
use std::collections::BTreeMap;

/// Primäre Klasse eines Nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    /// Drop-Ziel für Reorder (Liste von Kindern)
    Container,
    /// Ziehbare strukturelle Einheit
    StructuralBlock,
    /// Inline-editierbares Text-Blatt
    EditableLeaf,
    /// Weder ziehbar noch editierbar
    Inert,
}

/// Dauerhafte Klassifikations-Markierung eines Nodes.
///
/// Ein Node kann mehrere Rollen tragen (z.B. `<section class="row">` ist
/// Container und Block zugleich); die primäre Klasse folgt der Präzedenz
/// Block > Container > Editable > Inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeRoles {
    pub container: bool,
    pub block: bool,
    pub editable: bool,
}

impl NodeRoles {
    pub const NONE: NodeRoles = NodeRoles {
        container: false,
        block: false,
        editable: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.container && !self.block && !self.editable
    }

    pub fn primary(&self) -> NodeClass {
        if self.block {
            NodeClass::StructuralBlock
        } else if self.container {
            NodeClass::Container
        } else if self.editable {
            NodeClass::EditableLeaf
        } else {
            NodeClass::Inert
        }
    }
}

/// Ergebnis eines Segmentierungs-Durchlaufs.
///
/// Deterministisch geordnet (BTreeMap), damit zwei Durchläufe über einen
/// unveränderten Baum direkt verglichen werden können.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    roles: BTreeMap<NodeId, NodeRoles>,
    /// Welche Fallback-Stufe die Block-Erkennung erreicht hat (1 = regulär)
    pub block_tier: u8,
}

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setzt die Rollen eines Nodes; leere Rollen werden nicht gespeichert.
    pub fn set(&mut self, id: NodeId, roles: NodeRoles) {
        if roles.is_empty() {
            self.roles.remove(&id);
        } else {
            self.roles.insert(id, roles);
        }
    }

    pub fn roles(&self, id: NodeId) -> NodeRoles {
        self.roles.get(&id).copied().unwrap_or_default()
    }

    pub fn class_of(&self, id: NodeId) -> NodeClass {
        self.roles(id).primary()
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        self.roles(id).container
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        self.roles(id).block
    }

    pub fn is_editable(&self, id: NodeId) -> bool {
        self.roles(id).editable
    }

    /// Alle Container in Dokument-ID-Reihenfolge.
    pub fn containers(&self) -> Vec<NodeId> {
        self.filter(|r| r.container)
    }

    /// Alle Blöcke in Dokument-ID-Reihenfolge.
    pub fn blocks(&self) -> Vec<NodeId> {
        self.filter(|r| r.block)
    }

    /// Alle editierbaren Blätter in Dokument-ID-Reihenfolge.
    pub fn editables(&self) -> Vec<NodeId> {
        self.filter(|r| r.editable)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeRoles)> + '_ {
        self.roles.iter().map(|(id, roles)| (*id, *roles))
    }

    fn filter(&self, predicate: impl Fn(&NodeRoles) -> bool) -> Vec<NodeId> {
        self.roles
            .iter()
            .filter(|(_, roles)| predicate(roles))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_class_precedence() {
        let both = NodeRoles {
            container: true,
            block: true,
            editable: false,
        };
        assert_eq!(both.primary(), NodeClass::StructuralBlock);
        assert_eq!(NodeRoles::NONE.primary(), NodeClass::Inert);
    }

    #[test]
    fn empty_roles_are_not_stored() {
        let mut classification = Classification::new();
        classification.set(NodeId(3), NodeRoles::NONE);
        assert!(classification.is_empty());
        classification.set(
            NodeId(3),
            NodeRoles {
                editable: true,
                ..NodeRoles::NONE
            },
        );
        assert_eq!(classification.editables(), vec![NodeId(3)]);
    }
}
