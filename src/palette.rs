//! Deterministic process color allocation.
//!
//! Colors are handed out in order of first appearance along a
//! golden-angle hue sequence, `hue = index * 137.508 mod 360`, which keeps
//! consecutive processes visually far apart.

use std::collections::HashMap;

use crate::models::ColorBase;

/// Golden angle in degrees.
pub const GOLDEN_ANGLE: f64 = 137.508;

/// Hue of the `index`-th allocated color.
#[inline]
pub fn hue_at(index: usize) -> f64 {
    (index as f64 * GOLDEN_ANGLE) % 360.0
}

/// First-appearance mapping from process id to color base.
///
/// Identity is only stable within one run: [`reset`](Self::reset) restarts
/// the sequence at index 0.
#[derive(Debug, Clone, Default)]
pub struct ColorAllocator {
    assigned: HashMap<String, ColorBase>,
    next_index: usize,
}

impl ColorAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the color for `process_id`, allocating the next hue on first sight.
    pub fn color_for(&mut self, process_id: &str) -> ColorBase {
        if let Some(color) = self.assigned.get(process_id) {
            return *color;
        }
        let color = ColorBase::from_hue(hue_at(self.next_index));
        self.next_index += 1;
        self.assigned.insert(process_id.to_string(), color);
        color
    }

    /// Looks up a color without allocating.
    pub fn get(&self, process_id: &str) -> Option<ColorBase> {
        self.assigned.get(process_id).copied()
    }

    /// Number of allocated colors.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Clears the mapping and restarts the hue sequence.
    pub fn reset(&mut self) {
        self.assigned.clear();
        self.next_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_sequence_follows_allocation_order() {
        let mut alloc = ColorAllocator::new();
        let ids = ["P3", "P1", "X", "P2", "P10"];
        for (i, id) in ids.iter().enumerate() {
            let c = alloc.color_for(id);
            assert!((c.hue - hue_at(i)).abs() < 1e-9, "{id} at {i}");
        }
        assert!((hue_at(1) - 137.508).abs() < 1e-9);
        assert!((hue_at(3) - 52.524).abs() < 1e-9); // 412.524 mod 360
    }

    #[test]
    fn test_color_for_is_idempotent() {
        let mut alloc = ColorAllocator::new();
        let first = alloc.color_for("P1");
        alloc.color_for("P2");
        assert_eq!(alloc.color_for("P1"), first);
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn test_distinct_processes_distinct_colors() {
        let mut alloc = ColorAllocator::new();
        let colors: Vec<_> = (0..50).map(|i| alloc.color_for(&format!("P{i}"))).collect();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut alloc = ColorAllocator::new();
        alloc.color_for("P1");
        let p2_before = alloc.color_for("P2");
        alloc.reset();
        assert!(alloc.is_empty());
        assert!(alloc.get("P2").is_none());
        let p2_after = alloc.color_for("P2");
        assert!((p2_after.hue - hue_at(0)).abs() < 1e-9);
        assert_ne!(p2_before, p2_after);
    }
}
