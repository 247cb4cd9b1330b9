//! Quad-tree spatial partition
//!
//! Rebuilt from scratch every collision pass: insert-only, no per-point
//! removal. A node is a leaf holding up to `capacity` points until it
//! subdivides, after which its points live entirely in the four children.
//! Leaves at `max_depth` stop subdividing and hold overflow without limit,
//! so a stack of coincident points cannot recurse forever.

use glam::Vec2;

use super::entity::Collider;

/// Axis-aligned region stored as center plus half-extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub center: Vec2,
    pub half: Vec2,
}

impl Boundary {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Half-open containment test: `center - half <= p < center + half`
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.center.x - self.half.x
            && p.x < self.center.x + self.half.x
            && p.y >= self.center.y - self.half.y
            && p.y < self.center.y + self.half.y
    }

    /// Whether two regions overlap
    #[inline]
    pub fn intersects(&self, other: &Boundary) -> bool {
        (self.center.x - other.center.x).abs() <= self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() <= self.half.y + other.half.y
    }

    /// Whether a circle overlaps this region
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let dx = (center.x - self.center.x).abs();
        let dy = (center.y - self.center.y).abs();

        if dx > self.half.x + radius || dy > self.half.y + radius {
            return false;
        }
        if dx <= self.half.x || dy <= self.half.y {
            return true;
        }
        // Nearest-corner case
        let corner = (dx - self.half.x).powi(2) + (dy - self.half.y).powi(2);
        corner <= radius * radius
    }
}

/// A quad-tree node; the root doubles as the whole index
pub struct QuadTree {
    boundary: Boundary,
    capacity: usize,
    depth: u8,
    max_depth: u8,
    points: Vec<Collider>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    pub fn new(boundary: Boundary, capacity: usize, max_depth: u8) -> Self {
        Self::node(boundary, capacity, 0, max_depth)
    }

    fn node(boundary: Boundary, capacity: usize, depth: u8, max_depth: u8) -> Self {
        Self {
            boundary,
            capacity,
            depth,
            max_depth,
            points: Vec::new(),
            children: None,
        }
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Reset to a single empty leaf, keeping the point buffer's allocation
    pub fn clear(&mut self) {
        self.points.clear();
        self.children = None;
    }

    /// Insert a point. Returns false if it lies outside this node's region;
    /// the caller treats that entity as untracked for the frame.
    pub fn insert(&mut self, point: Collider) -> bool {
        if !self.boundary.contains(point.pos) {
            return false;
        }

        if self.children.is_none() {
            if self.points.len() < self.capacity || self.depth >= self.max_depth {
                // Room left, or an overflow bucket at the depth cap
                self.points.push(point);
                return true;
            }
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.insert(point) {
                    return true;
                }
            }
        }

        // Float rounding can leave a point on a seam no child claims; keep
        // it here rather than lose it.
        self.points.push(point);
        true
    }

    /// Split into four equal quadrants and push the held points down, so an
    /// internal node delegates entirely to its children.
    fn subdivide(&mut self) {
        let Boundary { center, half } = self.boundary;
        let q = half / 2.0;
        let (capacity, depth, max_depth) = (self.capacity, self.depth + 1, self.max_depth);
        let quadrant =
            |offset: Vec2| QuadTree::node(Boundary::new(center + offset, q), capacity, depth, max_depth);

        let mut children = Box::new([
            quadrant(Vec2::new(-q.x, -q.y)), // northwest
            quadrant(Vec2::new(q.x, -q.y)),  // northeast
            quadrant(Vec2::new(-q.x, q.y)),  // southwest
            quadrant(Vec2::new(q.x, q.y)),   // southeast
        ]);

        let held = std::mem::take(&mut self.points);
        for point in held {
            let mut placed = false;
            for child in children.iter_mut() {
                if child.insert(point) {
                    placed = true;
                    break;
                }
            }
            if !placed {
                self.points.push(point);
            }
        }
        self.children = Some(children);
    }

    /// Collect every point within `radius` of `center` into `found`.
    /// Duplicates cannot occur: each point lives in exactly one node.
    pub fn query_circle(&self, center: Vec2, radius: f32, found: &mut Vec<Collider>) {
        if !self.boundary.intersects_circle(center, radius) {
            return;
        }
        for p in &self.points {
            if p.pos.distance_squared(center) <= radius * radius {
                found.push(*p);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_circle(center, radius, found);
            }
        }
    }

    /// Collect every point inside `range` into `found`
    pub fn query_rect(&self, range: &Boundary, found: &mut Vec<Collider>) {
        if !self.boundary.intersects(range) {
            return;
        }
        for p in &self.points {
            if range.contains(p.pos) {
                found.push(*p);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_rect(range, found);
            }
        }
    }

    /// Number of points held in this subtree
    pub fn len(&self) -> usize {
        let mut count = self.points.len();
        if let Some(children) = &self.children {
            for child in children.iter() {
                count += child.len();
            }
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk every node boundary, parents before children (debug overlay)
    pub fn visit_boundaries(&self, visit: &mut impl FnMut(&Boundary)) {
        visit(&self.boundary);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.visit_boundaries(visit);
            }
        }
    }

    /// Boundary of the deepest node whose region contains `pos`
    pub fn leaf_boundary_for(&self, pos: Vec2) -> Option<Boundary> {
        if !self.boundary.contains(pos) {
            return None;
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                if let Some(boundary) = child.leaf_boundary_for(pos) {
                    return Some(boundary);
                }
            }
        }
        Some(self.boundary)
    }
}

impl std::fmt::Debug for QuadTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadTree")
            .field("boundary", &self.boundary)
            .field("points", &self.len())
            .field("subdivided", &self.children.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use proptest::prelude::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn point(id: u32, x: f32, y: f32) -> Collider {
        Collider {
            id,
            kind: EntityKind::PlayerProjectileNormal,
            pos: Vec2::new(x, y),
            radius: 1.0,
            vel: Vec2::ZERO,
        }
    }

    fn tree() -> QuadTree {
        // 200x200 region centered at (100, 100)
        QuadTree::new(
            Boundary::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0)),
            2,
            8,
        )
    }

    #[test]
    fn test_insert_inside_and_outside() {
        let mut tree = tree();
        assert!(tree.insert(point(1, 50.0, 50.0)));
        assert!(!tree.insert(point(2, 500.0, 50.0)));
        assert!(!tree.insert(point(3, 50.0, -10.0)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_half_open_edges() {
        let mut tree = tree();
        // Min edges are inside, max edges are outside
        assert!(tree.insert(point(1, 0.0, 0.0)));
        assert!(!tree.insert(point(2, 200.0, 100.0)));
        assert!(!tree.insert(point(3, 100.0, 200.0)));
    }

    #[test]
    fn test_subdivision_preserves_all_points() {
        let mut tree = tree();
        // Capacity is 2; the third insert forces a subdivision
        for (i, (x, y)) in [(10.0, 10.0), (190.0, 10.0), (10.0, 190.0), (190.0, 190.0), (100.0, 100.0)]
            .iter()
            .enumerate()
        {
            assert!(tree.insert(point(i as u32, *x, *y)));
        }
        assert_eq!(tree.len(), 5);

        let root = *tree.boundary();
        let mut found = Vec::new();
        tree.query_rect(&root, &mut found);
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_coincident_points_terminate() {
        let mut tree = tree();
        // Without the depth cap these would subdivide forever
        for i in 0..50 {
            assert!(tree.insert(point(i, 42.0, 42.0)));
        }
        assert_eq!(tree.len(), 50);

        let mut found = Vec::new();
        tree.query_circle(Vec2::new(42.0, 42.0), 1.0, &mut found);
        assert_eq!(found.len(), 50);
    }

    #[test]
    fn test_circle_query_radius_is_inclusive() {
        let mut tree = tree();
        tree.insert(point(1, 110.0, 100.0));
        tree.insert(point(2, 111.0, 100.0));

        let mut found = Vec::new();
        tree.query_circle(Vec2::new(100.0, 100.0), 10.0, &mut found);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn test_rect_query_subset() {
        let mut tree = tree();
        for i in 0..20 {
            tree.insert(point(i, 5.0 + 9.0 * i as f32, 50.0));
        }
        let mut found = Vec::new();
        tree.query_rect(
            &Boundary::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 10.0)),
            &mut found,
        );
        // Points at x in [0, 100): ids 0..=10 at x = 5, 14, ..., 95
        assert_eq!(found.len(), 11);
    }

    #[test]
    fn test_leaf_boundary_shrinks_after_subdivision() {
        let mut tree = tree();
        let root = *tree.boundary();
        for i in 0..10 {
            tree.insert(point(i, 20.0 + i as f32, 20.0));
        }
        let leaf = tree.leaf_boundary_for(Vec2::new(20.0, 20.0)).expect("inside root");
        assert!(leaf.half.x < root.half.x);
        assert!(tree.leaf_boundary_for(Vec2::new(500.0, 20.0)).is_none());
    }

    #[test]
    fn test_partition_no_loss_no_duplication() {
        let mut tree = tree();
        let mut rng = Pcg32::seed_from_u64(7);
        let n = 300;
        for i in 0..n {
            let x = rng.random_range(0.0..200.0);
            let y = rng.random_range(0.0..200.0);
            assert!(tree.insert(point(i, x, y)));
        }

        let mut found = Vec::new();
        tree.query_rect(tree.boundary(), &mut found);
        assert_eq!(found.len() as u32, n);

        found.sort_unstable_by_key(|c| c.id);
        found.dedup_by_key(|c| c.id);
        assert_eq!(found.len() as u32, n, "no point may appear twice");
    }

    proptest! {
        #[test]
        fn circle_query_matches_brute_force(
            points in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0), 0..64),
            cx in 0.0f32..200.0,
            cy in 0.0f32..200.0,
            radius in 1.0f32..120.0,
        ) {
            let mut tree = tree();
            for (i, (x, y)) in points.iter().enumerate() {
                prop_assert!(tree.insert(point(i as u32, *x, *y)));
            }

            let center = Vec2::new(cx, cy);
            let mut found = Vec::new();
            tree.query_circle(center, radius, &mut found);
            let mut found_ids: Vec<u32> = found.iter().map(|c| c.id).collect();
            found_ids.sort_unstable();

            let mut expected: Vec<u32> = points
                .iter()
                .enumerate()
                .filter(|(_, (x, y))| Vec2::new(*x, *y).distance_squared(center) <= radius * radius)
                .map(|(i, _)| i as u32)
                .collect();
            expected.sort_unstable();

            prop_assert_eq!(found_ids, expected);
        }
    }
}
