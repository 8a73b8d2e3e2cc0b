//! Height bands.

use std::collections::BTreeMap;

use mesh_types::{IndexedMesh, Point3, Vector3};

/// Band key for a height: `round(z / resolution)`.
///
/// Keys are integers so that neighbouring heights never split into two
/// bands through floating-point noise in the rounded height itself.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn band_key(z: f64, resolution: f64) -> i64 {
    (z / resolution).round() as i64
}

/// Vertices sharing one rounded height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PleatBand {
    /// Rounded height key, see [`band_key`].
    pub key: i64,
    /// Member vertex indices, ascending.
    pub members: Vec<u32>,
}

impl PleatBand {
    /// Number of member vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the band has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Nominal height of the band.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self, resolution: f64) -> f64 {
        self.key as f64 * resolution
    }

    /// Arithmetic mean of the member positions.
    #[must_use]
    pub fn centroid(&self, mesh: &IndexedMesh) -> Option<Point3<f64>> {
        let mut sum = Vector3::zeros();
        let mut count = 0_u32;
        for &v in &self.members {
            if let Some(vertex) = mesh.vertices.get(v as usize) {
                sum += vertex.position.coords;
                count += 1;
            }
        }
        (count > 0).then(|| Point3::from(sum / f64::from(count)))
    }

    /// Members ordered by `atan2(y - c.y, x - c.x)`.
    ///
    /// The sort is stable: members on the same ray from the centroid keep
    /// their index order.
    #[must_use]
    pub fn sorted_by_angle(&self, mesh: &IndexedMesh, centroid: &Point3<f64>) -> Vec<u32> {
        let mut keyed: Vec<(f64, u32)> = self
            .members
            .iter()
            .filter_map(|&v| {
                let p = mesh.vertices.get(v as usize)?.position;
                Some(((p.y - centroid.y).atan2(p.x - centroid.x), v))
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.into_iter().map(|(_, v)| v).collect()
    }
}

/// Group every vertex with a finite height into bands, lowest band first.
#[must_use]
pub fn classify_bands(mesh: &IndexedMesh, resolution: f64) -> Vec<PleatBand> {
    let mut bands: BTreeMap<i64, Vec<u32>> = BTreeMap::new();
    for (index, vertex) in mesh.vertices.iter().enumerate() {
        let z = vertex.position.z;
        if !z.is_finite() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = index as u32;
        bands.entry(band_key(z, resolution)).or_default().push(index);
    }
    bands
        .into_iter()
        .map(|(key, members)| PleatBand { key, members })
        .collect()
}
