//! Named vertex weight maps.

use hashbrown::HashMap;

/// A named, sparse mapping from vertex index to weight in `[0, 1]`.
///
/// Groups are authored with the base mesh (skinning weights) and treated
/// as read-only region masks by the garment pipeline. Many groups may
/// reference the same vertex.
///
/// # Example
///
/// ```
/// use mesh_types::VertexGroup;
///
/// let mut hips = VertexGroup::new("Hips", 0);
/// hips.set_weight(3, 0.8);
/// hips.set_weight(4, 1.7); // clamped
///
/// assert_eq!(hips.weight(3), Some(0.8));
/// assert_eq!(hips.weight(4), Some(1.0));
/// assert_eq!(hips.weight(5), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexGroup {
    /// Raw group name as authored (usually a bone name).
    pub name: String,

    /// Position of the group in its owning mesh's group list.
    pub index: u32,

    weights: HashMap<u32, f64>,
}

impl VertexGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
            weights: HashMap::new(),
        }
    }

    /// Builder-style weight assignment.
    #[must_use]
    pub fn with_weights(mut self, weights: impl IntoIterator<Item = (u32, f64)>) -> Self {
        for (vertex, weight) in weights {
            self.set_weight(vertex, weight);
        }
        self
    }

    /// Assign a weight, clamped to `[0, 1]`. Non-finite weights are ignored.
    pub fn set_weight(&mut self, vertex: u32, weight: f64) {
        if weight.is_finite() {
            self.weights.insert(vertex, weight.clamp(0.0, 1.0));
        }
    }

    /// Weight of a vertex, or `None` if the group has no entry for it.
    #[inline]
    #[must_use]
    pub fn weight(&self, vertex: u32) -> Option<f64> {
        self.weights.get(&vertex).copied()
    }

    /// Iterate over `(vertex, weight)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.weights.iter().map(|(&v, &w)| (v, w))
    }

    /// Number of vertices with an entry.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when the group has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Rewrite vertex indices through `remap` (old index to new index).
    ///
    /// Entries whose vertex maps to `None` or lies outside `remap` are
    /// dropped. When several old vertices collapse onto the same new one,
    /// the largest weight wins.
    pub fn remap(&mut self, remap: &[Option<u32>]) {
        let mut remapped = HashMap::with_capacity(self.weights.len());
        for (&old, &weight) in &self.weights {
            let Some(new) = remap.get(old as usize).copied().flatten() else {
                continue;
            };
            remapped
                .entry(new)
                .and_modify(|w: &mut f64| *w = w.max(weight))
                .or_insert(weight);
        }
        self.weights = remapped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_clamped_and_filtered() {
        let mut group = VertexGroup::new("Spine", 2);
        group.set_weight(0, -0.5);
        group.set_weight(1, f64::NAN);
        assert_eq!(group.weight(0), Some(0.0));
        assert_eq!(group.weight(1), None);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn remap_drops_deleted_and_merges_collapsed() {
        let mut group = VertexGroup::new("Hips", 0).with_weights([(0, 0.2), (1, 0.9), (2, 0.5)]);
        group.remap(&[Some(0), Some(0), None]);

        assert_eq!(group.len(), 1);
        assert_eq!(group.weight(0), Some(0.9));
    }
}
