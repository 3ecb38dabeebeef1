//! Galaxy3D scene graph demo
//!
//! Builds a scene of clustered crates, culls it with a camera frustum,
//! erases every crate the camera sees from inside the walk, then dumps the
//! octree through the logger.

use std::cell::Cell;
use std::rc::Rc;
use galaxy_3d_scene_graph::galaxy3d::{self, log::LogSeverity};
use galaxy_3d_scene_graph::galaxy3d::math::AABB;
use galaxy_3d_scene_graph::galaxy3d::scene::{
    Frustum, IndexedObject, NodeKey, Octree, OctreeConfig, SceneGraph, SceneObserver,
};
use galaxy_3d_scene_graph::log;
use glam::{Mat4, Vec3};

const SOURCE: &str = "galaxy3d_demo";

struct Crate {
    id: u32,
    bounds: Cell<AABB>,
    visible: Cell<bool>,
}

#[derive(Clone)]
struct CrateRef(Rc<Crate>);

impl IndexedObject for CrateRef {
    type Id = u32;

    fn id(&self) -> u32 {
        self.0.id
    }

    fn world_aabb(&self) -> AABB {
        self.0.bounds.get()
    }

    fn visible(&self) -> bool {
        self.0.visible.get()
    }
}

/// Counts what the scene graph reports
#[derive(Default)]
struct StatsObserver {
    inserted: Cell<usize>,
    erased: Cell<usize>,
}

impl SceneObserver<CrateRef> for StatsObserver {
    fn on_scene_node_insert(&self, _node: &CrateRef) {
        self.inserted.set(self.inserted.get() + 1);
    }

    fn on_scene_node_erase(&self, _node: &CrateRef) {
        self.erased.set(self.erased.get() + 1);
    }
}

fn info(message: String) {
    log::log(LogSeverity::Info, SOURCE, message);
}

fn spawn_cluster(graph: &SceneGraph<CrateRef>, first_id: u32, center: Vec3, count: u32) {
    for i in 0..count {
        let offset = Vec3::new((i % 8) as f32, ((i / 8) % 8) as f32, (i / 64) as f32) * 3.0;
        let object = CrateRef(Rc::new(Crate {
            id: first_id + i,
            bounds: Cell::new(AABB::from_origin_extents(center + offset, Vec3::ONE)),
            // Every fifth crate is hidden
            visible: Cell::new(i % 5 != 0),
        }));
        graph.insert(object);
    }
}

fn dump_tree(octree: &Octree<CrateRef>, key: NodeKey, depth: usize) {
    let Some(node) = octree.node(key) else {
        return;
    };
    let bounds = node.bounds();
    info(format!(
        "{}node at {:?} extents {:?}: {} members",
        "  ".repeat(depth),
        bounds.origin,
        bounds.extents,
        node.member_count()
    ));
    for &child in node.children() {
        if !octree.node(child).is_some_and(|c| c.is_leaf() && c.member_count() == 0) {
            dump_tree(octree, child, depth + 1);
        }
    }
}

fn main() -> galaxy3d::Result<()> {
    log::set_min_severity(LogSeverity::Debug);

    let graph = SceneGraph::with_config(OctreeConfig::with_max_world_coord(262144.0))?;
    let observer = Rc::new(StatsObserver::default());
    graph.add_scene_observer(observer.clone());

    spawn_cluster(&graph, 0, Vec3::new(200.0, 20.0, -40.0), 100);
    spawn_cluster(&graph, 1000, Vec3::new(-300.0, -20.0, 150.0), 100);
    spawn_cluster(&graph, 2000, Vec3::new(90000.0, 0.0, 0.0), 10);
    info(format!(
        "Scene built: {} crates, {} octree nodes, depth {}",
        graph.len(),
        graph.space_partition().node_count(),
        graph.space_partition().depth()
    ));

    // Camera in front of the first cluster, looking down -Z
    let eye = Vec3::new(210.0, 30.0, 60.0);
    let view = Mat4::look_at_rh(eye, eye - Vec3::Z, Vec3::Y);
    let projection = Mat4::perspective_rh(70f32.to_radians(), 16.0 / 9.0, 0.1, 500.0);
    let frustum = Frustum::from_view_projection(&(projection * view));

    let stats = graph.foreach_visible_node_in_volume(&frustum, |object| {
        graph.erase(object);
        true
    });
    info(format!(
        "Frustum walk: {} nodes visited, {} skipped, {} crates seen and erased",
        stats.visited_nodes, stats.skipped_nodes, stats.visited_members
    ));
    info(format!(
        "Observer: {} inserted, {} erased, {} crates left",
        observer.inserted.get(),
        observer.erased.get(),
        graph.len()
    ));

    graph.check_invariants()?;

    let octree = graph.space_partition();
    dump_tree(&octree, octree.root_key(), 0);

    Ok(())
}
