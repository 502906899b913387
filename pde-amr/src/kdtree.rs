use pde_types::{AxisBox, MDIndex};

/// A simple array-backed KD-tree over marker points, each node recording
/// the AABB and count of its subtree. Supports `count_in_box` and
/// `points_in_box` in expected sublinear time by pruning subtrees whose
/// AABB misses the query box entirely. Mirrors the `KdTree` companion
/// used by `domainPartition` in the original AMR generator.
#[derive(Clone, Debug)]
pub struct KdTree<const D: usize> {
    nodes: Vec<Node<D>>,
    root: Option<usize>,
}

#[derive(Clone, Debug)]
struct Node<const D: usize> {
    point: MDIndex<D>,
    aabb: AxisBox<D>,
    left: Option<usize>,
    right: Option<usize>,
    count: usize,
}

impl<const D: usize> KdTree<D> {
    /// Build a balanced KD-tree over `points` (deduplicated by the
    /// caller). Empty input yields an empty tree.
    pub fn build(mut points: Vec<MDIndex<D>>) -> Self {
        if points.is_empty() {
            return Self {
                nodes: Vec::new(),
                root: None,
            };
        }
        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build_rec(&mut points, 0, &mut nodes);
        Self { nodes, root: Some(root) }
    }

    fn build_rec(points: &mut [MDIndex<D>], depth: usize, nodes: &mut Vec<Node<D>>) -> usize {
        let axis = depth % D;
        points.sort_by_key(|p| p[axis]);
        let mid = points.len() / 2;
        let (left_pts, rest) = points.split_at_mut(mid);
        let (pivot_slice, right_pts) = rest.split_at_mut(1);
        let pivot = pivot_slice[0];

        let left = if left_pts.is_empty() {
            None
        } else {
            Some(Self::build_rec(left_pts, depth + 1, nodes))
        };
        let right = if right_pts.is_empty() {
            None
        } else {
            Some(Self::build_rec(right_pts, depth + 1, nodes))
        };

        let mut aabb = AxisBox::new(*pivot.as_slice(), *pivot.map(|_, v| v + 1).as_slice());
        if let Some(l) = left {
            aabb = aabb.min_cover_box(&nodes[l].aabb);
        }
        if let Some(r) = right {
            aabb = aabb.min_cover_box(&nodes[r].aabb);
        }
        let count = 1 + left.map_or(0, |l| nodes[l].count) + right.map_or(0, |r| nodes[r].count);

        nodes.push(Node {
            point: pivot,
            aabb,
            left,
            right,
            count,
        });
        nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.root.map_or(0, |r| self.nodes[r].count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of points falling within `query` (inclusive of overlap with
    /// the node's own AABB, recursing only into subtrees whose AABB
    /// intersects `query`).
    pub fn count_in_box(&self, query: &AxisBox<D>) -> i64 {
        self.root.map_or(0, |r| self.count_in_box_rec(r, query))
    }

    fn count_in_box_rec(&self, idx: usize, query: &AxisBox<D>) -> i64 {
        let node = &self.nodes[idx];
        if !node.aabb.intersects(query) {
            return 0;
        }
        let mut total = 0i64;
        if query.in_range(node.point.as_slice()) {
            total += 1;
        }
        if let Some(l) = node.left {
            total += self.count_in_box_rec(l, query);
        }
        if let Some(r) = node.right {
            total += self.count_in_box_rec(r, query);
        }
        total
    }

    /// Collect every point within `query`.
    pub fn points_in_box(&self, query: &AxisBox<D>) -> Vec<MDIndex<D>> {
        let mut out = Vec::new();
        if let Some(r) = self.root {
            self.traverse_in_box(r, query, &mut out);
        }
        out
    }

    fn traverse_in_box(&self, idx: usize, query: &AxisBox<D>, out: &mut Vec<MDIndex<D>>) {
        let node = &self.nodes[idx];
        if !node.aabb.intersects(query) {
            return;
        }
        if query.in_range(node.point.as_slice()) {
            out.push(node.point);
        }
        if let Some(l) = node.left {
            self.traverse_in_box(l, query, out);
        }
        if let Some(r) = node.right {
            self.traverse_in_box(r, query, out);
        }
    }

    pub fn point_in_box(&self, query: &AxisBox<D>) -> bool {
        self.count_in_box(query) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_in_box_matches_brute_force() {
        let pts: Vec<MDIndex<2>> = (0..5)
            .flat_map(|i| (0..5).map(move |j| MDIndex::new([i, j])))
            .collect();
        let tree = KdTree::build(pts.clone());
        let q = AxisBox::<2>::new([1, 1], [4, 4]);
        let brute = pts.iter().filter(|p| q.in_range(p.as_slice())).count() as i64;
        assert_eq!(tree.count_in_box(&q), brute);
    }

    #[test]
    fn empty_tree_counts_zero() {
        let tree = KdTree::<2>::build(Vec::new());
        assert_eq!(tree.count_in_box(&AxisBox::new([0, 0], [10, 10])), 0);
    }
}
