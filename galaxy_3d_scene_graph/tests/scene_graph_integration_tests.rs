//! Integration tests for the scene graph public API
//!
//! These tests drive SceneGraph through the galaxy3d namespace only:
//! subdivision, root growth, culled walks and mid-walk mutations.
//!
//! Run with: cargo test --test scene_graph_integration_tests

use galaxy_3d_scene_graph::galaxy3d::math::AABB;
use galaxy_3d_scene_graph::galaxy3d::scene::{
    Frustum, IndexedObject, OctreeConfig, SceneGraph, VolumeIntersection, VolumeTest,
};
use galaxy_3d_scene_graph::glam::{Mat4, Vec3};
use std::cell::Cell;
use std::rc::Rc;

// ============================================================================
// TEST OBJECT
// ============================================================================

struct Body {
    id: u32,
    bounds: Cell<AABB>,
}

#[derive(Clone)]
struct BodyRef(Rc<Body>);

impl IndexedObject for BodyRef {
    type Id = u32;

    fn id(&self) -> u32 {
        self.0.id
    }

    fn world_aabb(&self) -> AABB {
        self.0.bounds.get()
    }
}

fn body(id: u32, center: Vec3) -> BodyRef {
    BodyRef(Rc::new(Body {
        id,
        bounds: Cell::new(AABB::from_origin_extents(center, Vec3::splat(0.5))),
    }))
}

fn cluster(count: u32, first_id: u32, center: Vec3) -> Vec<BodyRef> {
    (0..count)
        .map(|i| body(first_id + i, center + Vec3::new((i % 6) as f32, (i % 4) as f32, (i % 2) as f32)))
        .collect()
}

fn visit_ids<V: VolumeTest>(graph: &SceneGraph<BodyRef>, volume: &V) -> Vec<u32> {
    let mut ids = Vec::new();
    graph.foreach_node_in_volume(volume, |node| {
        ids.push(node.id());
        true
    });
    ids
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_integration_clustered_insertions_subdivide_root() {
    let graph = SceneGraph::new();
    let bodies = cluster(40, 0, Vec3::splat(50.0));

    for (index, node) in bodies.iter().enumerate() {
        graph.insert(node.clone());

        let partition = graph.space_partition();
        if index + 1 < 32 {
            assert!(partition.root().is_leaf());
        } else {
            assert_eq!(partition.root().children().len(), 8);
            assert_eq!(partition.root().member_count(), 0);
        }
    }

    assert_eq!(graph.len(), 40);
    graph.check_invariants().unwrap();
}

#[test]
fn test_integration_far_object_grows_root_and_is_visited_once() {
    let graph = SceneGraph::with_config(OctreeConfig::with_max_world_coord(262144.0)).unwrap();
    let far = body(7, Vec3::new(100000.0, 0.0, 0.0));
    graph.insert(far.clone());

    {
        let partition = graph.space_partition();
        let root_bounds = partition.root().bounds();
        assert!(root_bounds.extents.x > 100000.0);
        assert!(root_bounds.contains(&far.world_aabb()));
    }

    let mut visits = 0;
    graph.foreach_node(|node| {
        assert_eq!(node.id(), 7);
        visits += 1;
        true
    });
    assert_eq!(visits, 1);
}

#[test]
fn test_integration_growth_stops_at_max_world_coord() {
    let graph = SceneGraph::with_config(OctreeConfig::with_max_world_coord(4096.0)).unwrap();
    let beyond = body(1, Vec3::new(50000.0, 0.0, 0.0));
    graph.insert(beyond.clone());

    let partition = graph.space_partition();
    assert_eq!(partition.root().bounds().extents, Vec3::splat(4096.0));
    assert_eq!(partition.find_node(1), Some(partition.root_key()));
}

#[test]
fn test_integration_erase_never_inserted() {
    let graph = SceneGraph::new();
    for node in cluster(10, 0, Vec3::ZERO) {
        graph.insert(node);
    }
    let counts_before: Vec<usize> = graph.space_partition().nodes().map(|(_, n)| n.member_count()).collect();

    let stranger = body(999, Vec3::ZERO);
    graph.erase(&stranger);

    let counts_after: Vec<usize> = graph.space_partition().nodes().map(|(_, n)| n.member_count()).collect();
    assert_eq!(counts_before, counts_after);
    assert_eq!(graph.len(), 10);
    assert!(!graph.contains(&stranger));
}

#[test]
fn test_integration_erase_visited_node_mid_walk() {
    let graph = SceneGraph::new();
    let mut bodies = cluster(40, 0, Vec3::splat(50.0));
    bodies.extend(cluster(40, 100, Vec3::splat(-200.0)));
    for node in &bodies {
        graph.insert(node.clone());
    }

    let mut seen = Vec::new();
    graph.foreach_node(|node| {
        if node.id() % 2 == 0 {
            graph.erase(node);
        }
        seen.push(node.id());
        true
    });

    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), seen.len(), "a member was visited twice");
    assert_eq!(seen.len(), 80, "a member was skipped");

    assert_eq!(graph.len(), 40);
    assert!(bodies.iter().all(|b| graph.contains(b) == (b.id() % 2 == 1)));
    graph.check_invariants().unwrap();
}

#[test]
fn test_integration_frustum_walk_culls_far_cluster() {
    let graph = SceneGraph::new();
    let near = cluster(40, 0, Vec3::splat(300.0));
    let far = cluster(40, 100, Vec3::splat(-300.0));
    for node in near.iter().chain(&far) {
        graph.insert(node.clone());
    }

    // Camera above the near cluster, looking down -Z
    let projection = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 200.0);
    let view = Mat4::look_at_rh(Vec3::new(302.0, 302.0, 400.0), Vec3::new(302.0, 302.0, 300.0), Vec3::Y);
    let frustum = Frustum::from_view_projection(&(projection * view));
    assert_eq!(
        frustum.test_aabb(&AABB::from_origin_extents(Vec3::splat(-300.0), Vec3::splat(10.0))),
        VolumeIntersection::Outside
    );

    let mut ids = visit_ids(&graph, &frustum);
    ids.sort();

    assert_eq!(ids, (0..40).collect::<Vec<_>>());
    assert!(graph.last_walk_stats().skipped_nodes > 0);
}

#[test]
fn test_integration_box_walk_includes_partial_subtrees() {
    let graph = SceneGraph::new();
    let bodies = cluster(40, 0, Vec3::splat(50.0));
    for node in &bodies {
        graph.insert(node.clone());
    }

    // The query box only clips the cluster's node, members are still reported
    let query = AABB::from_min_max(Vec3::splat(52.0), Vec3::splat(60.0));
    let ids = visit_ids(&graph, &query);

    assert_eq!(ids.len(), 40);
}

#[test]
fn test_integration_invariants_hold_under_mixed_workload() {
    let graph = SceneGraph::with_config(OctreeConfig::with_max_world_coord(16384.0)).unwrap();
    let mut live: Vec<BodyRef> = Vec::new();
    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };

    for id in 0..400u32 {
        let position = Vec3::new(
            (next() % 6000) as f32 - 3000.0,
            (next() % 600) as f32 - 300.0,
            (next() % 600) as f32 - 300.0,
        );
        let node = body(id, position);
        graph.insert(node.clone());
        live.push(node);

        match next() % 5 {
            0 => {
                let index = (next() as usize) % live.len();
                let victim = live.swap_remove(index);
                graph.erase(&victim);
            }
            1 => {
                let index = (next() as usize) % live.len();
                let mover = &live[index];
                let offset = Vec3::new((next() % 200) as f32 - 100.0, 0.0, 0.0);
                mover.0.bounds.set(AABB::from_origin_extents(mover.world_aabb().origin + offset, Vec3::splat(0.5)));
                graph.node_bounds_changed(mover);
            }
            _ => {}
        }
    }

    // Erase a third of the survivors from inside a walk
    let mut walked = 0;
    graph.foreach_node(|node| {
        walked += 1;
        if node.id() % 3 == 0 {
            graph.erase(node);
        }
        true
    });
    live.retain(|b| b.id() % 3 != 0);

    assert_eq!(graph.len(), live.len());
    assert!(walked >= live.len());
    graph.check_invariants().unwrap();

    let partition = graph.space_partition();
    for node in &live {
        let key = partition.find_node(node.id()).unwrap();
        let owner = partition.node(key).unwrap();
        assert!(owner.bounds().contains(&node.world_aabb()));
    }
}
