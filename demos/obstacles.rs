use std::{convert::Infallible, f32::consts::FRAC_PI_4, thread};

use glam::{vec2, Vec2};
use obstruct::{
    blocking::{BlockingSettings, PathBlockingGeometry},
    navmesh::SharedNavmesh,
    polygon::Polygon,
    shape::{CollisionShape, Transform2D},
};
use tracing_subscriber::EnvFilter;

/// Stand-in for a navigation library's compiled mesh
#[derive(Debug)]
struct ObstacleMesh {
    obstacles: Vec<Polygon>,
}

impl ObstacleMesh {
    fn is_blocked(&self, point: Vec2) -> bool {
        self.obstacles.iter().any(|v| v.contains_point(point))
    }
}

impl Drop for ObstacleMesh {
    fn drop(&mut self) {
        tracing::info!(obstacles = self.obstacles.len(), "releasing obstacle mesh");
    }
}

fn compile(obstacles: &[Polygon]) -> Result<ObstacleMesh, Infallible> {
    Ok(ObstacleMesh {
        obstacles: obstacles.to_vec(),
    })
}

struct Entity {
    collider: CollisionShape,
    transform: Transform2D,
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("obstruct=debug".parse()?))
        .init();

    let mut entities = vec![
        Entity {
            collider: CollisionShape::rect(4.0, 0.5),
            transform: Transform2D::from_translation(vec2(0.0, 3.0)),
        },
        Entity {
            collider: CollisionShape::rect(4.0, 0.5),
            transform: Transform2D::from_translation(vec2(3.0, 0.0)).with_rotation(FRAC_PI_4),
        },
        Entity {
            collider: CollisionShape::circle(0.5, 12),
            transform: Transform2D::from_translation(vec2(-2.0, -1.0)),
        },
        // A collider that has not been given an outline yet
        Entity {
            collider: CollisionShape::Polygon(vec![Vec2::ZERO]),
            transform: Transform2D::IDENTITY,
        },
    ];

    let builder = PathBlockingGeometry::new(BlockingSettings {
        agent_radius: 0.2,
        ..Default::default()
    });

    let navmesh = SharedNavmesh::new();
    let count = navmesh.rebuild(
        &builder,
        entities.iter().map(|v| (&v.collider, &v.transform)),
        &compile,
    )?;
    tracing::info!(count, "initial navmesh");

    let sample = vec2(0.0, 3.1);
    let query = {
        let navmesh = navmesh.clone();
        thread::spawn(move || navmesh.query(|mesh| mesh.is_blocked(sample)))
    };
    let blocked = query
        .join()
        .map_err(|_| anyhow::anyhow!("query thread panicked"))??;
    tracing::info!(?sample, ?blocked, "queried first mesh");

    entities[0].transform.translation = vec2(0.0, 6.0);
    navmesh.rebuild(
        &builder,
        entities.iter().map(|v| (&v.collider, &v.transform)),
        &compile,
    )?;

    let blocked = navmesh.query(|mesh| mesh.is_blocked(sample))?;
    tracing::info!(?sample, ?blocked, generation = navmesh.generation()?, "queried rebuilt mesh");

    navmesh.set_mesh(None)?;

    Ok(())
}
