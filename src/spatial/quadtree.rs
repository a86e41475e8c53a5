//! Region quadtree over rectangles, answering point-containment queries.

use log::trace;

use crate::geometry::{Bbox, Point2};

/// A leaf holding more items than this splits, depth permitting.
pub const MAX_PER_NODE: usize = 5;
/// Nodes at this depth never split.
pub const MAX_DEPTH: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

#[derive(Debug, Clone)]
struct Node {
    bounds: Bbox,
    depth: usize,
    /// Indices into `QuadTree::items`; empty once the node has children.
    items: Vec<usize>,
    /// NW, NE, SW, SE.
    children: Option<[NodeIdx; 4]>,
}

impl Node {
    fn leaf(bounds: Bbox, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

/// Quadtree whose nodes live in an arena and link to children by index.
///
/// An item straddling a quadrant boundary is stored in every child it
/// intersects, so [`QuadTree::find`] returns the first match in traversal
/// order (children NW, NE, SW, SE; items in insertion order), not the
/// closest one.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    nodes: Vec<Node>,
    items: Vec<(Bbox, T)>,
}

impl<T> QuadTree<T> {
    /// Empty tree: a single leaf spanning `bounds`.
    pub fn new(bounds: Bbox) -> Self {
        Self {
            nodes: vec![Node::leaf(bounds, 0)],
            items: Vec::new(),
        }
    }

    /// Build a tree over `source`, letting `extract` turn each element into
    /// zero or more `(rectangle, value)` items.
    pub fn build<I, F, E>(bounds: Bbox, source: I, mut extract: F) -> Self
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> E,
        E: IntoIterator<Item = (Bbox, T)>,
    {
        let mut tree = Self::new(bounds);
        for element in source {
            for (rect, value) in extract(element) {
                tree.insert(rect, value);
            }
        }
        tree
    }

    pub fn bounds(&self) -> Bbox {
        self.nodes[0].bounds
    }

    /// Number of items inserted (not counting duplicates across leaves).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node depth; 0 while the root is a leaf.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn items(&self) -> impl Iterator<Item = (&Bbox, &T)> {
        self.items.iter().map(|(rect, value)| (rect, value))
    }

    pub fn insert(&mut self, rect: Bbox, value: T) {
        let item = self.items.len();
        self.items.push((rect, value));
        self.insert_into(NodeIdx(0), item);
    }

    fn insert_into(&mut self, node: NodeIdx, item: usize) {
        if let Some(children) = self.nodes[node.0].children {
            let rect = self.items[item].0;
            for child in children {
                if self.nodes[child.0].bounds.intersects(&rect) {
                    self.insert_into(child, item);
                }
            }
            return;
        }

        let leaf = &mut self.nodes[node.0];
        leaf.items.push(item);
        if leaf.items.len() > MAX_PER_NODE && leaf.depth < MAX_DEPTH {
            self.split(node);
        }
    }

    /// Turn a full leaf into four children and hand its items down.
    fn split(&mut self, node: NodeIdx) {
        let bounds = self.nodes[node.0].bounds;
        let depth = self.nodes[node.0].depth;
        let held = std::mem::take(&mut self.nodes[node.0].items);

        let quadrants = bounds.subdivide();
        let first = self.nodes.len();
        self.nodes
            .extend(quadrants.iter().map(|q| Node::leaf(*q, depth + 1)));
        let children = [
            NodeIdx(first),
            NodeIdx(first + 1),
            NodeIdx(first + 2),
            NodeIdx(first + 3),
        ];
        self.nodes[node.0].children = Some(children);
        trace!("quadtree split at depth {depth} with {} items", held.len());

        for child in children {
            for &item in &held {
                if self.nodes[child.0].bounds.intersects(&self.items[item].0) {
                    self.insert_into(child, item);
                }
            }
        }
    }

    /// First item whose rectangle contains `p` (bounds inclusive). Points
    /// outside the tree bounds never match.
    pub fn find(&self, p: Point2) -> Option<&T> {
        if !self.bounds().contains(p) {
            return None;
        }
        self.find_in(NodeIdx(0), p)
            .map(|item| &self.items[item].1)
    }

    fn find_in(&self, node: NodeIdx, p: Point2) -> Option<usize> {
        let node = &self.nodes[node.0];
        match node.children {
            None => node
                .items
                .iter()
                .copied()
                .find(|&item| self.items[item].0.contains(p)),
            Some(children) => children
                .into_iter()
                .filter(|child| self.nodes[child.0].bounds.contains(p))
                .find_map(|child| self.find_in(child, p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, spacing: f64, size: f64) -> Vec<Bbox> {
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| Bbox::new(i as f64 * spacing, j as f64 * spacing, size, size))
            .collect()
    }

    #[test]
    fn test_single_box() {
        let tree = QuadTree::build(
            Bbox::new(0.0, 0.0, 100.0, 100.0),
            [Bbox::new(0.0, 0.0, 10.0, 10.0)],
            |rect| [(rect, "box")],
        );
        assert_eq!(tree.find(Point2::new(5.0, 5.0)), Some(&"box"));
        assert_eq!(tree.find(Point2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_split_after_max_per_node() {
        let mut tree = QuadTree::new(Bbox::new(0.0, 0.0, 100.0, 100.0));
        for (i, rect) in grid(2, 50.0, 5.0).into_iter().enumerate() {
            tree.insert(rect, i);
        }
        tree.insert(Bbox::new(20.0, 20.0, 5.0, 5.0), 4);
        assert_eq!(tree.node_count(), 1);

        tree.insert(Bbox::new(70.0, 70.0, 5.0, 5.0), 5);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_every_item_found_after_splits() {
        let rects = grid(12, 40.0, 8.0);
        let tree = QuadTree::build(Bbox::new(0.0, 0.0, 480.0, 480.0), rects.iter().enumerate(), |(i, r)| {
            [(*r, i)]
        });
        assert!(tree.depth() >= 2);
        for (i, rect) in rects.iter().enumerate() {
            assert_eq!(tree.find(rect.center()), Some(&i), "item {i} not found");
        }
        // Between grid cells.
        assert_eq!(tree.find(Point2::new(20.0, 20.0)), None);
    }

    #[test]
    fn test_straddling_item_stored_in_every_quadrant() {
        let mut tree = QuadTree::new(Bbox::new(0.0, 0.0, 100.0, 100.0));
        tree.insert(Bbox::new(40.0, 40.0, 20.0, 20.0), "center");
        for i in 0..5 {
            tree.insert(Bbox::new(2.0 + i as f64, 2.0, 1.0, 1.0), "corner");
        }
        assert!(tree.node_count() > 1);
        for p in [(45.0, 45.0), (55.0, 45.0), (45.0, 55.0), (55.0, 55.0)] {
            assert_eq!(tree.find(Point2::new(p.0, p.1)), Some(&"center"));
        }
    }

    #[test]
    fn test_first_match_in_traversal_order() {
        let mut tree = QuadTree::new(Bbox::new(0.0, 0.0, 100.0, 100.0));
        tree.insert(Bbox::new(0.0, 0.0, 30.0, 30.0), "big");
        tree.insert(Bbox::new(9.0, 9.0, 2.0, 2.0), "small");
        // "small" is closer to the query but "big" was inserted first.
        assert_eq!(tree.find(Point2::new(10.0, 10.0)), Some(&"big"));
    }

    #[test]
    fn test_depth_is_capped() {
        let mut tree = QuadTree::new(Bbox::new(0.0, 0.0, 1024.0, 1024.0));
        for i in 0..20 {
            tree.insert(Bbox::new(1.0, 1.0, 0.5, 0.5), i);
        }
        assert_eq!(tree.depth(), MAX_DEPTH);
        assert_eq!(tree.find(Point2::new(1.2, 1.2)), Some(&0));
    }

    #[test]
    fn test_out_of_bounds_point() {
        let tree = QuadTree::build(
            Bbox::new(0.0, 0.0, 100.0, 100.0),
            grid(4, 20.0, 10.0),
            |rect| [(rect, ())],
        );
        assert_eq!(tree.find(Point2::new(-50.0, -50.0)), None);
        assert_eq!(tree.find(Point2::new(500.0, 5.0)), None);
    }

    #[test]
    fn test_empty_tree() {
        let tree: QuadTree<u8> = QuadTree::new(Bbox::new(0.0, 0.0, 10.0, 10.0));
        assert!(tree.is_empty());
        assert_eq!(tree.find(Point2::new(1.0, 1.0)), None);
    }
}
