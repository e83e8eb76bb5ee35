//! Visual projection of a slot.
//!
//! The slot's item container is the source of truth; [`VisualTree`] is what a
//! host renderer reflects into the DOM. Hosts diff successive trees, and report
//! reorders they perform natively back through `Slot::sync_visual_order`.

use slotbox_types::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacerNode {
    /// "+" affordance of a multi slot.
    Multi,
    /// Empty-state affordance of a single slot.
    Single { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualNode {
    Placer(PlacerNode),
    Item(ItemId),
    Placeholder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualTree {
    pub nodes: Vec<VisualNode>,
}

impl VisualTree {
    /// Builds the tree: placer first (if any), then items, with the
    /// placeholder spliced in at `placeholder_index` (an index among items).
    pub fn build(
        placer: Option<PlacerNode>,
        items: impl IntoIterator<Item = ItemId>,
        placeholder_index: Option<usize>,
    ) -> Self {
        let mut nodes: Vec<VisualNode> = placer.map(VisualNode::Placer).into_iter().collect();
        let offset = nodes.len();
        nodes.extend(items.into_iter().map(VisualNode::Item));
        if let Some(index) = placeholder_index {
            let at = (offset + index).min(nodes.len());
            nodes.insert(at, VisualNode::Placeholder);
        }
        Self { nodes }
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                VisualNode::Item(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, VisualNode::Placeholder))
            .count()
    }

    /// Position of the placeholder among item nodes, if present.
    pub fn placeholder_index(&self) -> Option<usize> {
        let mut items_before = 0;
        for node in &self.nodes {
            match node {
                VisualNode::Placeholder => return Some(items_before),
                VisualNode::Item(_) => items_before += 1,
                VisualNode::Placer(_) => {}
            }
        }
        None
    }

    pub fn placer(&self) -> Option<&PlacerNode> {
        self.nodes.iter().find_map(|n| match n {
            VisualNode::Placer(p) => Some(p),
            _ => None,
        })
    }
}

/// Label of a single slot's empty-state affordance.
pub fn single_placer_label(type_label: Option<&str>) -> String {
    match type_label {
        Some(label) => format!("Press to add content of type {label}."),
        None => "Press to add content.".to_string(),
    }
}
