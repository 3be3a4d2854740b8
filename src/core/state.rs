use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::node::NodeType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Perspective {
    Architect,
    #[default]
    Engineer,
}

impl Perspective {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "ARCHITECT" => Some(Self::Architect),
            "ENGINEER" => Some(Self::Engineer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Architect => "ARCHITECT",
            Self::Engineer => "ENGINEER",
        }
    }
}

/// Perspective plus per-type visibility toggles. Types without an entry are
/// visible.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub perspective: Perspective,
    pub visible: HashMap<NodeType, bool>,
}

impl FilterState {
    pub fn is_visible(&self, ty: NodeType) -> bool {
        self.visible.get(&ty).copied().unwrap_or(true)
    }

    pub fn set_visible(&mut self, ty: NodeType, visible: bool) {
        self.visible.insert(ty, visible);
    }
}

#[cfg(test)]
mod tests {
    use crate::core::node::NodeType;
    use crate::core::state::FilterState;

    #[test]
    fn unlisted_types_default_to_visible() {
        let filters = FilterState::default();
        assert!(filters.is_visible(NodeType::Table));
        assert!(filters.is_visible(NodeType::Default));
    }

    #[test]
    fn set_visible_overrides_the_default() {
        let mut filters = FilterState::default();
        filters.set_visible(NodeType::Script, false);
        assert!(!filters.is_visible(NodeType::Script));
        filters.set_visible(NodeType::Script, true);
        assert!(filters.is_visible(NodeType::Script));
    }
}
