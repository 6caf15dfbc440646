use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

use crate::error::NavmeshError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavmeshState {
    Empty,
    Bound,
}

/// Sole owner of a compiled navmesh.
///
/// The mesh is released by dropping it, which happens exactly once: either when it is
/// replaced through [`NavmeshHandle::set_mesh`] or when the handle itself is dropped.
/// Borrowers obtained through [`NavmeshHandle::get_mesh`] cannot outlive a replacement.
#[derive(Debug)]
pub struct NavmeshHandle<M> {
    mesh: Option<M>,
    generation: u64,
}

impl<M> NavmeshHandle<M> {
    pub fn new() -> Self {
        Self {
            mesh: None,
            generation: 0,
        }
    }

    /// Releases the current mesh, if any, then takes ownership of `mesh`.
    ///
    /// Passing `None` clears the handle.
    pub fn set_mesh(&mut self, mesh: Option<M>) {
        if self.mesh.is_none() && mesh.is_none() {
            return;
        }

        if let Some(old) = self.mesh.take() {
            drop(old);
            tracing::debug!(generation = self.generation, "released navmesh");
        }

        self.generation += 1;
        self.mesh = mesh;

        if self.mesh.is_some() {
            tracing::debug!(generation = self.generation, "bound navmesh");
        }
    }

    /// Stores `mesh` and hands back the previous one unreleased, so that it can be dropped
    /// after any lock guarding this handle is gone.
    pub(crate) fn swap_mesh(&mut self, mesh: Option<M>) -> Option<M> {
        if self.mesh.is_none() && mesh.is_none() {
            return None;
        }

        self.generation += 1;
        std::mem::replace(&mut self.mesh, mesh)
    }

    pub fn get_mesh(&self) -> Option<&M> {
        self.mesh.as_ref()
    }

    pub fn state(&self) -> NavmeshState {
        if self.mesh.is_some() {
            NavmeshState::Bound
        } else {
            NavmeshState::Empty
        }
    }

    pub fn is_bound(&self) -> bool {
        self.mesh.is_some()
    }

    /// Number of times the owned mesh has changed
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<M> Default for NavmeshHandle<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`NavmeshHandle`] shared between the thread that rebuilds the mesh and the threads
/// that query it.
///
/// Queries hold the read lock for their whole duration and replacement requires the write
/// lock, so a mesh is never released while a query still borrows it.
#[derive(Debug)]
pub struct SharedNavmesh<M> {
    inner: Arc<RwLock<NavmeshHandle<M>>>,
}

impl<M> Clone for SharedNavmesh<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M> Default for SharedNavmesh<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> SharedNavmesh<M> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(NavmeshHandle::new())),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, NavmeshHandle<M>>, NavmeshError> {
        self.inner.read().map_err(|_| NavmeshError::Poisoned)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, NavmeshHandle<M>>, NavmeshError> {
        self.inner.write().map_err(|_| NavmeshError::Poisoned)
    }

    /// Runs `f` against the current mesh while holding the read lock.
    ///
    /// Returns `None` when no mesh is bound.
    pub fn query<R>(&self, f: impl FnOnce(&M) -> R) -> Result<Option<R>, NavmeshError> {
        let handle = self.read()?;
        Ok(handle.get_mesh().map(f))
    }

    /// Like [`SharedNavmesh::query`], but fails with [`NavmeshError::Busy`] instead of
    /// waiting while the mesh is being replaced.
    pub fn try_query<R>(&self, f: impl FnOnce(&M) -> R) -> Result<Option<R>, NavmeshError> {
        match self.inner.try_read() {
            Ok(handle) => Ok(handle.get_mesh().map(f)),
            Err(TryLockError::WouldBlock) => Err(NavmeshError::Busy),
            Err(TryLockError::Poisoned(_)) => Err(NavmeshError::Poisoned),
        }
    }

    /// Waits for in-flight queries to finish, then replaces the mesh.
    ///
    /// The previous mesh is released after the write lock is dropped, so queries do not
    /// wait on its release.
    pub fn set_mesh(&self, mesh: Option<M>) -> Result<(), NavmeshError> {
        let (old, generation) = self.swap_mesh(mesh)?;
        if let Some(old) = old {
            drop(old);
            tracing::debug!(generation, "released previous navmesh");
        }

        Ok(())
    }

    /// Replaces the mesh under the write lock and returns the previous one unreleased,
    /// along with the new generation.
    pub(crate) fn swap_mesh(&self, mesh: Option<M>) -> Result<(Option<M>, u64), NavmeshError> {
        let mut handle = self.write()?;
        let old = handle.swap_mesh(mesh);
        Ok((old, handle.generation()))
    }

    pub fn state(&self) -> Result<NavmeshState, NavmeshError> {
        Ok(self.read()?.state())
    }

    pub fn generation(&self) -> Result<u64, NavmeshError> {
        Ok(self.read()?.generation())
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            mpsc, Arc,
        },
        thread,
        time::Duration,
    };

    use super::{NavmeshHandle, NavmeshState, SharedNavmesh};
    use crate::error::NavmeshError;

    /// Mesh stand-in that counts how often it has been released
    #[derive(Debug)]
    struct MockMesh {
        id: u32,
        releases: Arc<AtomicUsize>,
    }

    impl MockMesh {
        fn new(id: u32) -> (Self, Arc<AtomicUsize>) {
            let releases = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    id,
                    releases: releases.clone(),
                },
                releases,
            )
        }
    }

    impl Drop for MockMesh {
        fn drop(&mut self) {
            let previous = self.releases.fetch_add(1, Ordering::SeqCst);
            assert_eq!(previous, 0, "mesh {} released twice", self.id);
        }
    }

    /// Counts the releases that happen while nobody holds its owner's lock
    struct LockObserver {
        navmesh: SharedNavmesh<LockObserver>,
        unlocked_releases: Arc<AtomicUsize>,
    }

    impl Drop for LockObserver {
        fn drop(&mut self) {
            if self.navmesh.try_query(|_| ()).is_ok() {
                self.unlocked_releases.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn starts_empty() {
        let handle = NavmeshHandle::<MockMesh>::new();
        assert_eq!(handle.state(), NavmeshState::Empty);
        assert!(handle.get_mesh().is_none());
        assert_eq!(handle.generation(), 0);
    }

    #[test]
    fn replace_releases_previous_once() {
        let (mesh_a, released_a) = MockMesh::new(1);
        let (mesh_b, released_b) = MockMesh::new(2);

        let mut handle = NavmeshHandle::new();

        handle.set_mesh(Some(mesh_a));
        assert_eq!(handle.state(), NavmeshState::Bound);
        assert_eq!(handle.get_mesh().map(|v| v.id), Some(1));
        assert_eq!(released_a.load(Ordering::SeqCst), 0);

        handle.set_mesh(Some(mesh_b));
        assert_eq!(released_a.load(Ordering::SeqCst), 1);
        assert_eq!(handle.get_mesh().map(|v| v.id), Some(2));
        assert_eq!(released_b.load(Ordering::SeqCst), 0);

        handle.set_mesh(None);
        assert_eq!(handle.state(), NavmeshState::Empty);
        assert!(handle.get_mesh().is_none());
        assert_eq!(released_a.load(Ordering::SeqCst), 1);
        assert_eq!(released_b.load(Ordering::SeqCst), 1);
        assert_eq!(handle.generation(), 3);
    }

    #[test]
    fn clearing_empty_handle_is_noop() {
        let (mesh, released) = MockMesh::new(1);
        let mut handle = NavmeshHandle::new();

        handle.set_mesh(None);
        handle.set_mesh(None);
        assert_eq!(handle.generation(), 0);

        handle.set_mesh(Some(mesh));
        handle.set_mesh(None);
        handle.set_mesh(None);
        handle.set_mesh(None);

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(handle.generation(), 2);
    }

    #[test]
    fn drop_releases_owned_mesh() {
        let (mesh, released) = MockMesh::new(1);

        let mut handle = NavmeshHandle::new();
        handle.set_mesh(Some(mesh));
        drop(handle);

        assert_eq!(released.load(Ordering::SeqCst), 1);

        drop(NavmeshHandle::<MockMesh>::new());
    }

    #[test]
    fn shared_query_sees_current_mesh() {
        let shared = SharedNavmesh::new();
        assert_eq!(shared.query(|v: &MockMesh| v.id).unwrap(), None);

        let (mesh, released) = MockMesh::new(7);
        shared.set_mesh(Some(mesh)).unwrap();

        let clone = shared.clone();
        assert_eq!(clone.query(|v| v.id).unwrap(), Some(7));
        assert_eq!(clone.state().unwrap(), NavmeshState::Bound);

        shared.set_mesh(None).unwrap();
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(clone.generation().unwrap(), 2);
    }

    #[test]
    fn replacement_waits_for_inflight_query() {
        let shared = SharedNavmesh::new();
        let (mesh, released) = MockMesh::new(1);
        shared.set_mesh(Some(mesh)).unwrap();

        let (started_tx, started_rx) = mpsc::channel();
        let (finish_tx, finish_rx) = mpsc::channel::<()>();

        let reader = {
            let shared = shared.clone();
            let released = released.clone();
            thread::spawn(move || {
                shared
                    .query(|mesh| {
                        started_tx.send(()).unwrap();
                        finish_rx.recv().unwrap();
                        // Still alive while the query borrows it
                        assert_eq!(released.load(Ordering::SeqCst), 0);
                        mesh.id
                    })
                    .unwrap()
            })
        };

        started_rx.recv().unwrap();

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || shared.set_mesh(None).unwrap())
        };

        thread::sleep(Duration::from_millis(20));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        finish_tx.send(()).unwrap();
        assert_eq!(reader.join().unwrap(), Some(1));
        writer.join().unwrap();

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(shared.state().unwrap(), NavmeshState::Empty);
    }

    #[test]
    fn previous_mesh_is_released_outside_the_lock() {
        let shared = SharedNavmesh::<LockObserver>::new();
        let unlocked_releases = Arc::new(AtomicUsize::new(0));
        let observer = || LockObserver {
            navmesh: shared.clone(),
            unlocked_releases: unlocked_releases.clone(),
        };

        shared.set_mesh(Some(observer())).unwrap();
        shared.set_mesh(Some(observer())).unwrap();
        assert_eq!(unlocked_releases.load(Ordering::SeqCst), 1);

        shared.set_mesh(None).unwrap();
        assert_eq!(unlocked_releases.load(Ordering::SeqCst), 2);
        assert_eq!(shared.generation().unwrap(), 3);
    }

    #[test]
    fn try_query_does_not_wait_for_writer() {
        let shared = SharedNavmesh::new();
        let (mesh, _released) = MockMesh::new(3);
        shared.set_mesh(Some(mesh)).unwrap();

        {
            let _guard = shared.write().unwrap();
            assert!(matches!(
                shared.try_query(|v| v.id),
                Err(NavmeshError::Busy)
            ));
        }

        assert_eq!(shared.try_query(|v| v.id).unwrap(), Some(3));
    }
}
