//! Spatial indexing for neighbor queries.
//!
//! A uniform grid buckets every present entity by the cell containing its
//! position. The index is rebuilt from scratch once per tick and is read-only
//! afterwards. Buckets hold the entity's index into its owning collection and
//! the position it had when the index was built, never the entity itself.

use std::collections::HashMap;

use geo::Point;

use super::locatable::Locatable;

/// Integer grid coordinate of a cell.
pub type Cell = (i32, i32);

/// One indexed entity: its slot in the owning collection and its tick-start position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Index into the collection the index was built from.
    pub idx: usize,
    /// Position at build time.
    pub pos: Point<f32>,
}

/// Uniform grid over one entity collection.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<Cell, Vec<Entry>>,
    len: usize,
}

impl SpatialIndex {
    /// Builds a spatial index from the current state of a collection.
    ///
    /// Entities that are not present (dead, eaten) are skipped. Within each
    /// cell, entries keep the collection order.
    pub fn build<T: Locatable>(items: &[T], cell_size: f32) -> Self {
        let mut cells: HashMap<Cell, Vec<Entry>> = HashMap::new();
        let mut len = 0;
        for (idx, item) in items.iter().enumerate() {
            if !item.is_present() {
                continue;
            }
            let pos = item.pos();
            cells
                .entry(cell_of(pos, cell_size))
                .or_default()
                .push(Entry { idx, pos });
            len += 1;
        }
        Self {
            cell_size,
            cells,
            len,
        }
    }

    /// Edge length of a cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell containing a position.
    pub fn cell(&self, pos: Point<f32>) -> Cell {
        cell_of(pos, self.cell_size)
    }

    /// Entries in exactly one cell (empty if none).
    pub fn query(&self, cell: Cell) -> &[Entry] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries in the 3x3 block of cells centered on the cell containing `pos`.
    ///
    /// With a cell size at least the largest query radius, this covers every
    /// entity within that radius. Cells are not wrapped across the field seam.
    pub fn query_neighborhood(&self, pos: Point<f32>) -> impl Iterator<Item = &Entry> + '_ {
        let (cx, cy) = self.cell(pos);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .flat_map(move |cell| self.query(cell).iter())
    }
}

fn cell_of(pos: Point<f32>, cell_size: f32) -> Cell {
    (
        (pos.x() / cell_size).floor() as i32,
        (pos.y() / cell_size).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot(Point<f32>, bool);

    impl Locatable for Dot {
        fn pos(&self) -> Point<f32> {
            self.0
        }

        fn is_present(&self) -> bool {
            self.1
        }
    }

    #[test]
    fn buckets_by_floor_of_position() {
        let dots = vec![
            Dot(Point::new(10.0, 10.0), true),
            Dot(Point::new(199.9, 0.0), true),
            Dot(Point::new(200.0, 0.0), true),
        ];
        let index = SpatialIndex::build(&dots, 200.0);
        assert_eq!(index.len(), 3);
        let origin: Vec<usize> = index.query((0, 0)).iter().map(|e| e.idx).collect();
        assert_eq!(origin, vec![0, 1]);
        assert_eq!(index.query((1, 0)).len(), 1);
        assert!(index.query((5, 5)).is_empty());
    }

    #[test]
    fn skips_absent_entities() {
        let dots = vec![
            Dot(Point::new(10.0, 10.0), false),
            Dot(Point::new(20.0, 10.0), true),
        ];
        let index = SpatialIndex::build(&dots, 100.0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.query((0, 0))[0].idx, 1);
    }

    #[test]
    fn neighborhood_covers_three_by_three_block() {
        let dots: Vec<Dot> = (0..5)
            .flat_map(|x| (0..5).map(move |y| (x, y)))
            .map(|(x, y)| Dot(Point::new(x as f32 * 100.0 + 50.0, y as f32 * 100.0 + 50.0), true))
            .collect();
        let index = SpatialIndex::build(&dots, 100.0);
        let around_center = index.query_neighborhood(Point::new(250.0, 250.0)).count();
        assert_eq!(around_center, 9);
        let around_corner = index.query_neighborhood(Point::new(10.0, 10.0)).count();
        assert_eq!(around_corner, 4);
    }

    #[test]
    fn empty_population_yields_empty_neighborhoods() {
        let dots: Vec<Dot> = Vec::new();
        let index = SpatialIndex::build(&dots, 100.0);
        assert!(index.is_empty());
        assert_eq!(index.query_neighborhood(Point::new(0.0, 0.0)).count(), 0);
    }
}
