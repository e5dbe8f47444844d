//! End-to-end pipeline tests.

use std::panic::{AssertUnwindSafe, catch_unwind};

use arbor_config::{Config, RenderMode};
use arbor_lsystem::{Constant, Grammar, RandomSource};
use arbor_mesh::InstanceShape;

use crate::{GenerationContext, GenerationRequest, Generator, Geometry, GeometryMode, auto_scale};

fn branching_request() -> GenerationRequest {
    let mut request = GenerationRequest::new(Grammar::parse("F", "F=F[+F][-F]"), 2);
    request.params.angle = 30f32.to_radians();
    request.params.variance = 0.0;
    request.params.step_length = 1.0;
    request
}

fn mesh(geometry: &Geometry) -> &arbor_mesh::TubeMesh {
    match geometry {
        Geometry::Continuous(mesh) => mesh,
        Geometry::Discrete(_) => panic!("expected a tube mesh"),
    }
}

#[test]
fn test_branching_string_is_reproducible() {
    let request = branching_request();
    let context = GenerationContext::new(&request);
    assert_eq!(
        context.string().to_string(),
        "F[+F][-F][+F[+F][-F]][-F[+F][-F]]"
    );
}

#[test]
fn test_branching_mesh_counts() {
    let request = branching_request();
    let output = Generator::new()
        .generate_with(&request, &mut Constant(0.5))
        .unwrap();
    let stats = output.stats;
    let mesh = mesh(&output.geometry);

    assert_eq!(stats.segments, 9);
    // Every branch bends away from its parent ring.
    assert_eq!(stats.pivots, 8);
    assert_eq!(stats.rings, 1 + 9 + 8);
    assert_eq!(mesh.vertex_count(), (stats.segments + 1 + stats.pivots) * 8);
    assert_eq!(mesh.triangle_count(), (stats.rings - 1) * 2 * 8);
    assert_eq!(mesh.colors.len(), mesh.positions.len());
    assert_eq!(stats.max_depth, 2);
}

#[test]
fn test_branching_bounds() {
    let request = branching_request();
    let output = Generator::new()
        .generate_with(&request, &mut Constant(0.5))
        .unwrap();
    let bounds = output.bounds.unwrap();
    // Trunk, a 30° branch, then a child turned back upright.
    let expected = 2.0 + 30f32.to_radians().cos();
    assert!((bounds.max.y - expected).abs() < 1e-5);
    assert_eq!(bounds.min.y, 0.0);
    assert!((bounds.max.x + bounds.min.x).abs() < 1e-5);
}

#[test]
fn test_straight_chain_height() {
    let mut request = GenerationRequest::new(Grammar::new("FFFFF"), 0);
    request.params.step_length = 2.5;
    let output = Generator::new().generate(&request).unwrap();
    let bounds = output.bounds.unwrap();
    assert!((bounds.size().y - 12.5).abs() < 1e-5);
    assert_eq!(output.stats.pivots, 0);
}

#[test]
fn test_seeded_runs_match() {
    let mut request = branching_request();
    request.params.variance = 10f32.to_radians();
    request.seed = Some(1234);
    let generator = Generator::new();
    let a = generator.generate(&request).unwrap();
    let b = generator.generate(&request).unwrap();
    assert_eq!(a.seed, Some(1234));
    assert_eq!(a.geometry, b.geometry);
    assert_eq!(a.bounds, b.bounds);
}

#[test]
fn test_discrete_mode() {
    let mut request = branching_request();
    request.mode = GeometryMode::Discrete(InstanceShape::Cuboid);
    let output = Generator::new()
        .generate_with(&request, &mut Constant(0.5))
        .unwrap();
    let Geometry::Discrete(instances) = &output.geometry else {
        panic!("expected instances");
    };
    assert_eq!(instances.len(), 9);
    assert_eq!(output.branch_colors.len(), 9);
    assert_eq!(output.stats.vertices, 0);
}

#[test]
fn test_recolor_without_regenerating() {
    let request = branching_request();
    let mut output = Generator::new()
        .generate_with(&request, &mut Constant(0.5))
        .unwrap();
    output.recolor([0.2; 3], [0.2; 3]);
    let mesh = mesh(&output.geometry);
    assert!(mesh.colors.iter().all(|c| (c - 0.2).abs() < 1e-6));
}

#[test]
fn test_leaves_follow_leaf_scale() {
    let mut request = GenerationRequest::new(Grammar::parse("A", "A=F[+FL][-FL]FL"), 1);
    request.params.step_length = 2.0;
    request.params.leaf_scale = 0.5;
    request.params.tips_only = true;
    let mut output = Generator::new()
        .generate_with(&request, &mut Constant(0.5))
        .unwrap();
    assert_eq!(output.stats.leaves, 3);
    assert!(output.leaves.iter().all(|l| l.current.scale == 0.5));
    output.leaves.rescale(2.0);
    assert!(output.leaves.iter().all(|l| l.current.scale == 2.0));
}

#[test]
fn test_string_cap_reported() {
    let mut request = GenerationRequest::new(Grammar::parse("F", "F=FF"), 12);
    request.limits.max_string_length = 100;
    let output = Generator::new().generate(&request).unwrap();
    assert!(output.stats.string_truncated);
    assert_eq!(output.stats.string_length, 128);
}

#[test]
fn test_segment_cap_reported() {
    let mut request = GenerationRequest::new(Grammar::new(&"F".repeat(50)), 0);
    request.mode = GeometryMode::Discrete(InstanceShape::Cylinder);
    request.limits.max_segments = 10;
    let output = Generator::new().generate(&request).unwrap();
    assert_eq!(output.stats.segments, 10);
    assert!(output.stats.geometry_truncated);
}

#[test]
fn test_empty_axiom() {
    let request = GenerationRequest::new(Grammar::new(""), 3);
    let output = Generator::new().generate(&request).unwrap();
    assert_eq!(output.stats.segments, 0);
    assert_eq!(output.stats.rings, 1);
    // Only the origin was visited.
    assert_eq!(output.bounds.unwrap().size().y, 0.0);
    assert_eq!(auto_scale(output.bounds.as_ref(), true, 60.0), 1.0);
}

/// Tries to start a second run from inside the first.
struct Reentrant<'a> {
    generator: &'a Generator,
    request: &'a GenerationRequest,
    nested_dropped: Option<bool>,
}

impl RandomSource for Reentrant<'_> {
    fn next_unit(&mut self) -> f32 {
        if self.nested_dropped.is_none() {
            let nested = self
                .generator
                .generate_with(self.request, &mut Constant(0.5));
            self.nested_dropped = Some(nested.is_none());
        }
        0.5
    }
}

#[test]
fn test_request_in_flight_is_dropped() {
    let generator = Generator::new();
    let request = branching_request();
    let mut rng = Reentrant {
        generator: &generator,
        request: &request,
        nested_dropped: None,
    };
    let output = generator.generate_with(&request, &mut rng);
    assert!(output.is_some());
    assert_eq!(rng.nested_dropped, Some(true));
    assert!(!generator.is_busy());
    assert!(generator.generate(&request).is_some());
}

struct Exploding;

impl RandomSource for Exploding {
    fn next_unit(&mut self) -> f32 {
        panic!("random source failed");
    }
}

#[test]
fn test_flag_cleared_after_panic() {
    let generator = Generator::new();
    let request = branching_request();
    let result = catch_unwind(AssertUnwindSafe(|| {
        generator.generate_with(&request, &mut Exploding)
    }));
    assert!(result.is_err());
    assert!(!generator.is_busy());
}

#[test]
fn test_request_from_config() {
    let mut config = Config::default();
    config.apply_preset("pine").unwrap();
    config.grammar.iterations = 3;
    config.render.mode = RenderMode::Discrete;
    config.turtle.seed = Some(5);

    let request = GenerationRequest::from_config(&config).unwrap();
    assert!((request.params.angle - 22f32.to_radians()).abs() < 1e-6);
    let expected_mode = GeometryMode::Discrete(InstanceShape::Cylinder);
    assert_eq!(request.mode, expected_mode);

    let output = Generator::new().generate(&request).unwrap();
    assert_eq!(output.seed, Some(5));
    assert!(output.stats.segments > 0);
    let summary = format!("Segments: {} | Leaves: 0", output.stats.segments);
    assert_eq!(output.stats.to_string(), summary);
    assert_eq!(output.leaf_color, config.palette().unwrap().leaf);
}

#[test]
fn test_request_from_config_rejects_bad_color() {
    let mut config = Config::default();
    config.render.base_color = "brown".to_string();
    assert!(GenerationRequest::from_config(&config).is_err());
}
