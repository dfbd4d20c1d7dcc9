//! DOF bookkeeping for a chain of two-node frame elements.
//!
//! Node `i` owns the global DOFs `6 i .. 6 i + 6` ordered as
//! translations x, y, z then rotations x, y, z. Element `e` connects nodes
//! `e` and `e + 1`.

use serde::{Deserialize, Serialize};

use crate::types::{DOF_PER_NODE, NODES_PER_ELEMENT};

/// Node, element and DOF index maps of a beam chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DofMap {
    /// Node indices of each element
    pub elem_to_nodes: Vec<Vec<usize>>,
    /// Global DOF indices of each node
    pub nodes_to_dof: Vec<Vec<usize>>,
    /// Global DOF indices of each element (both nodes concatenated)
    pub elem_to_dof: Vec<Vec<usize>>,
}

impl DofMap {
    /// Standard map for `n_elem` frame elements (2 nodes, 6 DOF per node).
    pub fn frame(n_elem: usize) -> Self {
        linear_dof_mapping(n_elem, NODES_PER_ELEMENT, DOF_PER_NODE)
    }

    pub fn num_elements(&self) -> usize {
        self.elem_to_nodes.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes_to_dof.len()
    }

    pub fn num_dofs(&self) -> usize {
        self.nodes_to_dof.iter().map(|d| d.len()).sum()
    }

    /// DOFs of the first node.
    pub fn root_dofs(&self) -> &[usize] {
        self.nodes_to_dof.first().map(|d| d.as_slice()).unwrap_or(&[])
    }

    /// DOFs of the last node.
    pub fn tip_dofs(&self) -> &[usize] {
        self.nodes_to_dof.last().map(|d| d.as_slice()).unwrap_or(&[])
    }
}

/// Build the maps of a linear chain of `n_elem` elements with `nodes_per_elem`
/// nodes each, consecutive elements sharing one node.
pub fn linear_dof_mapping(n_elem: usize, nodes_per_elem: usize, dof_per_node: usize) -> DofMap {
    let stride = nodes_per_elem.saturating_sub(1).max(1);
    let n_nodes = if n_elem == 0 {
        0
    } else {
        n_elem * stride + 1
    };

    let elem_to_nodes: Vec<Vec<usize>> = (0..n_elem)
        .map(|e| (0..nodes_per_elem).map(|k| e * stride + k).collect())
        .collect();

    let nodes_to_dof: Vec<Vec<usize>> = (0..n_nodes)
        .map(|n| (0..dof_per_node).map(|d| n * dof_per_node + d).collect())
        .collect();

    let elem_to_dof = elem_to_nodes
        .iter()
        .map(|nodes| {
            nodes
                .iter()
                .flat_map(|&n| nodes_to_dof[n].iter().copied())
                .collect()
        })
        .collect();

    DofMap {
        elem_to_nodes,
        nodes_to_dof,
        elem_to_dof,
    }
}

/// Contiguous global DOF range of element `iel` in a chain where each element has
/// `nnel` nodes with `ndof` DOFs each.
pub fn element_dof_index(iel: usize, nnel: usize, ndof: usize) -> Vec<usize> {
    let start = iel * nnel.saturating_sub(1) * ndof;
    (start..start + nnel * ndof).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_element_chain() {
        let map = DofMap::frame(2);
        assert_eq!(map.num_elements(), 2);
        assert_eq!(map.num_nodes(), 3);
        assert_eq!(map.num_dofs(), 18);
        assert_eq!(map.elem_to_nodes, vec![vec![0, 1], vec![1, 2]]);
        assert_eq!(map.nodes_to_dof[2], (12..18).collect::<Vec<_>>());
        assert_eq!(map.elem_to_dof[1], (6..18).collect::<Vec<_>>());
        assert_eq!(map.root_dofs(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(map.tip_dofs(), &[12, 13, 14, 15, 16, 17]);
    }

    #[test]
    fn element_dof_index_matches_chain_map() {
        let map = DofMap::frame(5);
        for iel in 0..5 {
            assert_eq!(element_dof_index(iel, 2, 6), map.elem_to_dof[iel]);
        }
    }

    #[test]
    fn three_node_elements_share_end_nodes() {
        let map = linear_dof_mapping(2, 3, 1);
        assert_eq!(map.elem_to_nodes, vec![vec![0, 1, 2], vec![2, 3, 4]]);
        assert_eq!(map.num_nodes(), 5);
    }
}
