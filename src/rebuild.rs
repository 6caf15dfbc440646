use crate::{
    blocking::PathBlockingGeometry,
    error::RebuildError,
    navmesh::{NavmeshHandle, SharedNavmesh},
    polygon::Polygon,
    shape::{ShapeOutline, WorldTransform},
};

/// Turns blocking geometry into a navmesh, typically by calling into a navigation library.
pub trait NavmeshCompiler {
    type Mesh;
    type Error: std::error::Error + 'static;

    fn compile(&self, obstacles: &[Polygon]) -> Result<Self::Mesh, Self::Error>;
}

impl<F, M, E> NavmeshCompiler for F
where
    F: Fn(&[Polygon]) -> Result<M, E>,
    E: std::error::Error + 'static,
{
    type Mesh = M;
    type Error = E;

    fn compile(&self, obstacles: &[Polygon]) -> Result<M, E> {
        (self)(obstacles)
    }
}

/// Extracts blocking geometry, compiles it and binds the result to `handle`.
///
/// When compilation fails the previously bound mesh is kept. Returns the number of
/// obstacle polygons the mesh was compiled from.
pub fn rebuild_navmesh<'a, S, T, C>(
    builder: &PathBlockingGeometry,
    obstacles: impl IntoIterator<Item = (&'a S, &'a T)>,
    compiler: &C,
    handle: &mut NavmeshHandle<C::Mesh>,
) -> Result<usize, RebuildError<C::Error>>
where
    S: ShapeOutline + ?Sized + 'a,
    T: WorldTransform + ?Sized + 'a,
    C: NavmeshCompiler,
{
    let polygons = builder.calculate(obstacles);
    let mesh = compiler.compile(&polygons).map_err(RebuildError::Compile)?;

    handle.set_mesh(Some(mesh));
    tracing::info!(
        obstacles = polygons.len(),
        generation = handle.generation(),
        "rebuilt navmesh"
    );

    Ok(polygons.len())
}

impl<M> SharedNavmesh<M> {
    /// Like [`rebuild_navmesh`], but only holds the write lock for the swap itself.
    ///
    /// Queries keep running against the previous mesh while the new one compiles, and the
    /// previous mesh is released once the lock has been dropped.
    pub fn rebuild<'a, S, T, C>(
        &self,
        builder: &PathBlockingGeometry,
        obstacles: impl IntoIterator<Item = (&'a S, &'a T)>,
        compiler: &C,
    ) -> Result<usize, RebuildError<C::Error>>
    where
        S: ShapeOutline + ?Sized + 'a,
        T: WorldTransform + ?Sized + 'a,
        C: NavmeshCompiler<Mesh = M>,
    {
        let polygons = builder.calculate(obstacles);
        let mesh = compiler.compile(&polygons).map_err(RebuildError::Compile)?;

        let (old, generation) = self.swap_mesh(Some(mesh))?;
        drop(old);
        tracing::info!(
            obstacles = polygons.len(),
            generation,
            "rebuilt shared navmesh"
        );

        Ok(polygons.len())
    }
}
