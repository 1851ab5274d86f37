//! Build configuration

use crate::errors::{SdfError, SdfResult};
use crate::float_types::{DEFAULT_MARGIN, Real, tolerance};

/// Deepest level the integer point lattice can address.
///
/// Lattice coordinates are `u32` at resolution `2^(max_level + 1)`.
pub const MAX_SUPPORTED_LEVEL: u32 = 20;

/// How face normals are combined into a vertex pseudo-normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexNormalWeighting {
    /// Plain mean over the incident faces.
    #[default]
    Uniform,
    /// Each incident face weighted by its interior angle at the vertex.
    Angle,
}

/// Parameters for [`LevelsetOctree::construct_with`](crate::LevelsetOctree::construct_with).
///
/// ```
/// use levelset_octree::OctreeConfig;
///
/// let config = OctreeConfig::default().with_max_level(5);
/// assert_eq!(config.max_level, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeConfig {
    /// Deepest subdivision level; the root is level 0.
    pub max_level: u32,
    /// Factor applied to the mesh bounding box extents to form the root cell.
    pub margin: Real,
    /// Pseudo-normal used to sign distances whose closest feature is a vertex.
    pub vertex_normals: VertexNormalWeighting,
    /// Barycentric slack for point location and the on-boundary flag.
    pub location_tolerance: Real,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_level: 4,
            margin: DEFAULT_MARGIN,
            vertex_normals: VertexNormalWeighting::Uniform,
            location_tolerance: tolerance(),
        }
    }
}

impl OctreeConfig {
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_margin(mut self, margin: Real) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_vertex_normals(mut self, weighting: VertexNormalWeighting) -> Self {
        self.vertex_normals = weighting;
        self
    }

    pub fn with_location_tolerance(mut self, location_tolerance: Real) -> Self {
        self.location_tolerance = location_tolerance;
        self
    }

    /// Check the parameters before any state is touched.
    pub fn validate(&self) -> SdfResult<()> {
        if self.max_level == 0 {
            return Err(SdfError::InvalidConfig(
                "max_level must be at least 1".to_string(),
            ));
        }
        if self.max_level > MAX_SUPPORTED_LEVEL {
            return Err(SdfError::InvalidConfig(format!(
                "max_level {} exceeds the supported {}",
                self.max_level, MAX_SUPPORTED_LEVEL
            )));
        }
        // the root must strictly contain the mesh
        if !self.margin.is_finite() || self.margin <= 1.0 {
            return Err(SdfError::InvalidConfig(format!(
                "margin must be finite and greater than 1, got {}",
                self.margin
            )));
        }
        if !self.location_tolerance.is_finite() || self.location_tolerance < 0.0 {
            return Err(SdfError::InvalidConfig(format!(
                "location_tolerance must be finite and non-negative, got {}",
                self.location_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(OctreeConfig::default().with_max_level(0).validate().is_err());
        assert!(
            OctreeConfig::default()
                .with_max_level(MAX_SUPPORTED_LEVEL + 1)
                .validate()
                .is_err()
        );
        assert!(
            OctreeConfig::default()
                .with_max_level(MAX_SUPPORTED_LEVEL)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn rejects_shrinking_margin() {
        let config = OctreeConfig::default().with_margin(1.0);
        assert!(matches!(config.validate(), Err(SdfError::InvalidConfig(_))));
    }
}
