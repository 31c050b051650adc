//! Arena-indexed asset-class tree.
//!
//! Nodes live in a `Vec`; parent/child links are indices, so traversal is
//! plain array indexing and there are no ownership cycles. The tree is built
//! once per snapshot and only read afterwards.

use std::collections::{HashMap, VecDeque};

use crate::errors::{Result, ValidationError};
use crate::keys::AssetKey;

/// One asset class in the hierarchy.
#[derive(Debug, Clone)]
pub struct AssetNode {
    pub key: AssetKey,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Rooted tree of asset classes used to rank "related" substitutes.
#[derive(Debug, Clone)]
pub struct AssetTree {
    nodes: Vec<AssetNode>,
    index: HashMap<AssetKey, usize>,
}

impl AssetTree {
    pub fn new(root: AssetKey) -> Self {
        let mut index = HashMap::new();
        index.insert(root.clone(), 0);
        AssetTree {
            nodes: vec![AssetNode {
                key: root,
                parent: None,
                children: Vec::new(),
            }],
            index,
        }
    }

    pub fn root(&self) -> &AssetKey {
        &self.nodes[0].key
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.index.contains_key(key)
    }

    /// Adds `key` as the last child of `parent`.
    pub fn add_child(&mut self, parent: &AssetKey, key: AssetKey) -> Result<()> {
        if !key.is_valid() {
            return Err(ValidationError::InvalidInput(
                "Asset class key cannot be empty".to_string(),
            )
            .into());
        }
        if self.index.contains_key(&key) {
            return Err(ValidationError::InvalidInput(format!(
                "Asset class '{}' is already in the hierarchy",
                key
            ))
            .into());
        }
        let parent_index = *self.index.get(parent).ok_or_else(|| {
            ValidationError::MissingField(format!("parent asset class '{}'", parent))
        })?;

        let node_index = self.nodes.len();
        self.nodes.push(AssetNode {
            key: key.clone(),
            parent: Some(parent_index),
            children: Vec::new(),
        });
        self.nodes[parent_index].children.push(node_index);
        self.index.insert(key, node_index);
        Ok(())
    }

    pub fn parent_of(&self, key: &AssetKey) -> Option<&AssetKey> {
        let node = self.index.get(key).map(|i| &self.nodes[*i])?;
        node.parent.map(|p| &self.nodes[p].key)
    }

    pub fn children_of(&self, key: &AssetKey) -> Vec<&AssetKey> {
        match self.index.get(key) {
            Some(i) => self.nodes[*i]
                .children
                .iter()
                .map(|c| &self.nodes[*c].key)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ancestors of `key`, nearest first, root last.
    pub fn ancestors(&self, key: &AssetKey) -> Vec<&AssetKey> {
        let mut out = Vec::new();
        let Some(mut index) = self.index.get(key).copied() else {
            return out;
        };
        while let Some(parent) = self.nodes[index].parent {
            out.push(&self.nodes[parent].key);
            index = parent;
        }
        out
    }

    /// Every other class in the tree ranked by relatedness to `key`,
    /// nearest first.
    ///
    /// Relatedness is breadth-first distance over the undirected tree; at
    /// equal distance the walk visits the parent side before children, so
    /// siblings outrank grandchildren. Unknown keys yield an empty ranking.
    pub fn ranked_related(&self, key: &AssetKey) -> Vec<AssetKey> {
        let Some(start) = self.index.get(key).copied() else {
            return Vec::new();
        };

        let mut visited = vec![false; self.nodes.len()];
        visited[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut ranked = Vec::new();

        while let Some(current) = queue.pop_front() {
            let node = &self.nodes[current];
            let mut neighbors: Vec<usize> = Vec::with_capacity(node.children.len() + 1);
            if let Some(parent) = node.parent {
                neighbors.push(parent);
            }
            neighbors.extend(node.children.iter().copied());

            for neighbor in neighbors {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    ranked.push(self.nodes[neighbor].key.clone());
                    queue.push_back(neighbor);
                }
            }
        }

        ranked
    }
}
