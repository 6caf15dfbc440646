use crate::{
    polygon::Polygon,
    shape::{ShapeOutline, WorldTransform},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockingSettings {
    /// Optional floor: loops enclosing no more than this area are discarded.
    ///
    /// Loops without a meaningful area are always discarded, whatever this is set to.
    pub min_area: f32,
    /// Produced polygons are inflated by this radius to keep agents clear of obstacles
    pub agent_radius: f32,
}

impl BlockingSettings {
    pub fn new() -> Self {
        Self {
            min_area: 0.0,
            agent_radius: 0.0,
        }
    }
}

impl Default for BlockingSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts collision shapes into world space blocking polygons.
///
/// Each loop of each shape becomes one counter-clockwise [`Polygon`]. Overlapping polygons
/// are neither merged nor deduplicated. Loops that cannot form a polygon are skipped.
#[derive(Debug, Clone, Default)]
pub struct PathBlockingGeometry {
    settings: BlockingSettings,
}

impl PathBlockingGeometry {
    pub fn new(settings: BlockingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BlockingSettings {
        &self.settings
    }

    pub fn calculate<'a, S, T>(
        &self,
        obstacles: impl IntoIterator<Item = (&'a S, &'a T)>,
    ) -> Vec<Polygon>
    where
        S: ShapeOutline + ?Sized + 'a,
        T: WorldTransform + ?Sized + 'a,
    {
        let mut polygons = Vec::new();

        for (index, (shape, transform)) in obstacles.into_iter().enumerate() {
            let affine = transform.world_affine();

            for outline in shape.local_loops() {
                let points = outline.into_iter().map(|p| affine.transform_point2(p));

                match Polygon::from_loop(points, self.settings.min_area) {
                    Ok(polygon) if self.settings.agent_radius > 0.0 => {
                        polygons.push(polygon.inflated(self.settings.agent_radius))
                    }
                    Ok(polygon) => polygons.push(polygon),
                    Err(reason) => {
                        tracing::debug!(index, %reason, "skipping degenerate obstacle loop");
                    }
                }
            }
        }

        tracing::trace!(count = polygons.len(), "calculated path blocking geometry");
        polygons
    }
}

/// Calculates blocking polygons using [`BlockingSettings::default`]
pub fn calculate_path_blocking_geometry<'a, S, T>(
    obstacles: impl IntoIterator<Item = (&'a S, &'a T)>,
) -> Vec<Polygon>
where
    S: ShapeOutline + ?Sized + 'a,
    T: WorldTransform + ?Sized + 'a,
{
    PathBlockingGeometry::default().calculate(obstacles)
}
