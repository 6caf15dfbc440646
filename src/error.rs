/// Why a loop of points cannot act as blocking geometry
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DegenerateLoop {
    #[error("loop has {0} distinct points, at least 3 are required")]
    TooFewPoints(usize),
    #[error("loop encloses an area of {0}, which is below the threshold")]
    ZeroArea(f32),
    #[error("loop contains a non-finite point")]
    NonFinite,
}

#[derive(Debug, thiserror::Error)]
pub enum NavmeshError {
    #[error("navmesh lock was poisoned by a panicking thread")]
    Poisoned,
    #[error("navmesh is being replaced")]
    Busy,
}

#[derive(Debug, thiserror::Error)]
pub enum RebuildError<E>
where
    E: std::error::Error + 'static,
{
    #[error("failed to compile navmesh from obstacle geometry")]
    Compile(#[source] E),
    #[error(transparent)]
    Navmesh(#[from] NavmeshError),
}
