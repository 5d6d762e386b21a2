//! Octree Demo
//!
//! Builds an octree over randomly scattered ships and walks through its
//! lifecycle:
//! - Insert ships (spheres) into the root leaf
//! - Subdivide to the configured depth
//! - Broad-phase lookup of the regions one ship touches
//! - Record wireframe gizmos for every node
//! - Collapse back into a single leaf
//!
//! Usage: `octree_demo [config.toml|config.ron]`

use rand::Rng;
use spatial_octree::prelude::*;
use thiserror::Error;

// Entity counts
const NUM_SHIPS: usize = 40;

// Ship sizes
const MIN_SHIP_RADIUS: f32 = 0.5;
const MAX_SHIP_RADIUS: f32 = 3.0;

/// A ship approximated by its bounding sphere
#[derive(Debug, Clone)]
struct Ship {
    id: usize,
    position: Vec3,
    radius: f32,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("octree: {0}")]
    Octree(#[from] OctreeError),
}

/// Set up env_logger, falling back to `level` when `RUST_LOG` is unset
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

fn load_config() -> Result<OctreeConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => OctreeConfig::load_from_file(&path)?,
        None => OctreeConfig::default().with_subdivision_depth(2),
    };
    Ok(config)
}

fn spawn_ships(bounds: &Bounds) -> Vec<Ship> {
    let mut rng = rand::thread_rng();
    let (min, max) = (bounds.min(), bounds.max());

    (0..NUM_SHIPS)
        .map(|id| Ship {
            id,
            position: Vec3::new(
                rng.gen_range(min.x..=max.x),
                rng.gen_range(min.y..=max.y),
                rng.gen_range(min.z..=max.z),
            ),
            radius: rng.gen_range(MIN_SHIP_RADIUS..MAX_SHIP_RADIUS),
        })
        .collect()
}

fn log_stats(label: &str, root: &SpatialNode<Ship>) {
    log::info!(
        "{}: {} nodes, {} leaves, max depth {}, {} item memberships",
        label,
        root.node_count(),
        root.leaves().len(),
        root.max_depth(),
        root.item_count()
    );
}

fn run(config: &OctreeConfig) -> Result<(), DemoError> {
    let predicate = OverlapPredicate::sphere(|ship: &Ship| (ship.position, ship.radius));
    let mut root = SpatialNode::new(config.bounds, predicate);

    let ships = spawn_ships(&config.bounds);
    let accepted = root.insert_all(ships.iter().cloned());
    log::info!("Inserted {} of {} ships", accepted, ships.len());

    root.subdivide_to_depth(config.subdivision_depth)?;
    log_stats("Subdivided", &root);

    if let Some(probe) = ships.first() {
        let regions = root.find_nodes_containing(probe);
        let leaves = regions.iter().filter(|node| node.is_leaf()).count();
        log::info!(
            "Ship {} (r = {:.2}) touches {} nodes, {} of them leaves",
            probe.id,
            probe.radius,
            regions.len(),
            leaves
        );

        let neighbours: Vec<usize> = root
            .query_sphere(probe.position, probe.radius)
            .iter()
            .map(|ship| ship.id)
            .filter(|id| *id != probe.id)
            .collect();
        log::info!("Broad-phase candidates near ship {}: {:?}", probe.id, neighbours);
    }

    let mut debug_draw = DebugDrawSystem::new();
    debug_draw.gizmo_duration = 1.0;
    debug_draw.draw_octree(&root);
    log::info!("Recorded {} gizmo boxes", debug_draw.shape_count());

    if !root.is_leaf() {
        root.collapse()?;
    }
    log_stats("Collapsed", &root);

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_logging(&config.log_level);

    println!("=== Octree Demo ===");
    println!("Root center {:?}, size {:?}", config.bounds.center, config.bounds.size);
    println!("Subdivision depth: {}", config.subdivision_depth);
    println!();

    run(&config)?;
    Ok(())
}
