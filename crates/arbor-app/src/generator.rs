//! One generation run: expand, interpret, build geometry, color.
//!
//! A [`Generator`] runs at most one request at a time. A request that
//! arrives while another is in flight is dropped, not queued.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use arbor_config::{BranchShape, Config, ConfigError, Palette, RenderMode};
use arbor_lsystem::{
    Anchor, Emitter, Expansion, Grammar, LString, LeafInstances, RandomSource, RngSource, Segment,
    TurtleParams, TurtleState, interpret,
};
use arbor_math::Bounds;
use arbor_mesh::{
    BranchInstances, DEFAULT_MAX_SEGMENTS, DEFAULT_MAX_VERTICES, DEFAULT_RADIAL_SEGMENTS,
    HeightGradient, InstanceBuilder, InstanceShape, TubeBuilder, TubeMesh,
};
use rand::Rng;

/// How forward-draws become geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryMode {
    /// Connected tube mesh with the given ring resolution.
    Continuous { radial_segments: u32 },
    /// One instance per segment.
    Discrete(InstanceShape),
}

/// Output size caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_string_length: usize,
    pub max_segments: usize,
    pub max_vertices: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_string_length: arbor_lsystem::DEFAULT_MAX_LENGTH,
            max_segments: DEFAULT_MAX_SEGMENTS,
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

/// Everything needed for one run.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub grammar: Grammar,
    pub iterations: u32,
    pub params: TurtleParams,
    pub mode: GeometryMode,
    pub limits: Limits,
    pub palette: Palette,
    /// `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Request with default turtle settings, continuous mode and a
    /// white-to-white palette.
    pub fn new(grammar: Grammar, iterations: u32) -> Self {
        Self {
            grammar,
            iterations,
            params: TurtleParams::default(),
            mode: GeometryMode::Continuous {
                radial_segments: DEFAULT_RADIAL_SEGMENTS,
            },
            limits: Limits::default(),
            palette: Palette {
                base: [1.0; 3],
                tip: [1.0; 3],
                leaf: [1.0; 3],
            },
            seed: None,
        }
    }

    /// Builds a request from configuration. Fails only on malformed colors.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let turtle = &config.turtle;
        let mode = match config.render.mode {
            RenderMode::Continuous => GeometryMode::Continuous {
                radial_segments: config.render.radial_segments,
            },
            RenderMode::Discrete => GeometryMode::Discrete(match config.render.shape {
                BranchShape::Cylinder => InstanceShape::Cylinder,
                BranchShape::Cuboid => InstanceShape::Cuboid,
            }),
        };

        Ok(Self {
            grammar: Grammar::parse(&config.grammar.axiom, &config.grammar.rules),
            iterations: config.grammar.iterations,
            params: TurtleParams {
                angle: turtle.angle_deg.to_radians(),
                variance: turtle.variance_deg.to_radians(),
                step_length: turtle.step_length,
                base_width: turtle.base_width,
                taper: turtle.taper,
                leaf_scale: turtle.leaf_scale,
                tips_only: turtle.tips_only,
            },
            mode,
            limits: Limits {
                max_string_length: config.limits.max_string_length,
                max_segments: config.limits.max_segments,
                max_vertices: config.limits.max_vertices,
            },
            palette: config.palette()?,
            seed: turtle.seed,
        })
    }
}

/// Branch geometry of a run.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Continuous(TubeMesh),
    Discrete(BranchInstances),
}

/// Counters describing a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub string_length: usize,
    pub iterations_run: u32,
    /// Expansion stopped at the length cap.
    pub string_truncated: bool,
    pub segments: usize,
    pub leaves: usize,
    pub max_depth: usize,
    pub rings: usize,
    pub pivots: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Interpretation stopped at the segment or vertex cap.
    pub geometry_truncated: bool,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segments: {} | Leaves: {}", self.segments, self.leaves)
    }
}

/// Result of a run, ready to hand to a renderer.
#[derive(Clone, Debug)]
pub struct GenerationOutput {
    pub geometry: Geometry,
    pub leaves: LeafInstances,
    /// Turtle positions visited. Never empty for a completed run.
    pub bounds: Option<Bounds>,
    /// Per-instance colors in discrete mode; empty in continuous mode, where
    /// colors live on the mesh.
    pub branch_colors: Vec<[f32; 3]>,
    /// Linear RGB for every leaf.
    pub leaf_color: [f32; 3],
    pub stats: GenerationStats,
    /// Seed used, when the generator drew the random stream itself.
    pub seed: Option<u64>,
}

impl GenerationOutput {
    /// Recolors branches from their heights without regenerating.
    pub fn recolor(&mut self, base: [f32; 3], tip: [f32; 3]) {
        match &mut self.geometry {
            Geometry::Continuous(mesh) => {
                mesh.recolor(&HeightGradient::new(base, tip, self.bounds.as_ref()));
            }
            Geometry::Discrete(instances) => {
                self.branch_colors = instances.colors(base, tip, self.bounds.as_ref());
            }
        }
    }
}

/// The emitter selected by a request's geometry mode.
#[derive(Debug)]
enum GeometryBuilder {
    Tube(TubeBuilder),
    Instances(InstanceBuilder),
}

impl Emitter for GeometryBuilder {
    fn begin(&mut self, state: &TurtleState) -> Option<Anchor> {
        match self {
            GeometryBuilder::Tube(b) => b.begin(state),
            GeometryBuilder::Instances(b) => b.begin(state),
        }
    }

    fn emit(&mut self, segment: &Segment, from: Option<Anchor>) -> Option<Anchor> {
        match self {
            GeometryBuilder::Tube(b) => b.emit(segment, from),
            GeometryBuilder::Instances(b) => b.emit(segment, from),
        }
    }

    fn saturated(&self) -> bool {
        match self {
            GeometryBuilder::Tube(b) => b.saturated(),
            GeometryBuilder::Instances(b) => b.saturated(),
        }
    }
}

/// Per-run state, owned by one request and consumed into its output.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    request: &'a GenerationRequest,
    expansion: Expansion,
    builder: GeometryBuilder,
}

impl<'a> GenerationContext<'a> {
    /// Expands the grammar and prepares the emitter.
    pub fn new(request: &'a GenerationRequest) -> Self {
        let grammar = &request.grammar;
        let limits = &request.limits;
        let expansion = grammar.expand(request.iterations, limits.max_string_length);
        let builder = match request.mode {
            GeometryMode::Continuous { radial_segments } => {
                GeometryBuilder::Tube(TubeBuilder::new(radial_segments, limits.max_vertices))
            }
            GeometryMode::Discrete(shape) => {
                GeometryBuilder::Instances(InstanceBuilder::new(shape, limits.max_segments))
            }
        };
        Self {
            request,
            expansion,
            builder,
        }
    }

    /// The expanded string.
    pub fn string(&self) -> &LString {
        &self.expansion.string
    }

    /// Interprets the string and assembles the output.
    pub fn run<R: RandomSource + ?Sized>(mut self, rng: &mut R) -> GenerationOutput {
        let interpretation = interpret(
            self.expansion.string.as_slice(),
            &self.request.params,
            &mut self.builder,
            rng,
        );
        let bounds = interpretation.bounds.bounds();

        let mut stats = GenerationStats {
            string_length: self.expansion.string.len(),
            iterations_run: self.expansion.iterations_run,
            string_truncated: self.expansion.truncated,
            segments: interpretation.segments,
            leaves: interpretation.leaves.len(),
            max_depth: interpretation.max_depth,
            geometry_truncated: interpretation.stopped_early,
            ..Default::default()
        };

        let palette = self.request.palette;
        let mut output = GenerationOutput {
            geometry: match self.builder {
                GeometryBuilder::Tube(b) => {
                    let mesh = b.finish();
                    stats.rings = mesh.ring_count();
                    stats.pivots = mesh.pivot_count();
                    stats.vertices = mesh.vertex_count();
                    stats.triangles = mesh.triangle_count();
                    Geometry::Continuous(mesh)
                }
                GeometryBuilder::Instances(b) => Geometry::Discrete(b.finish()),
            },
            leaves: interpretation.leaves,
            bounds,
            branch_colors: Vec::new(),
            leaf_color: palette.leaf,
            stats,
            seed: None,
        };
        output.recolor(palette.base, palette.tip);
        output
    }
}

/// Clears the in-flight flag when dropped, including during unwinding.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs generation requests one at a time.
#[derive(Debug, Default)]
pub struct Generator {
    in_flight: AtomicBool,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a request is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs `request` with a ChaCha stream seeded from the request, or from
    /// a fresh seed. Returns `None` if a run is already in flight.
    pub fn generate(&self, request: &GenerationRequest) -> Option<GenerationOutput> {
        let seed = request.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = RngSource::seeded(seed);
        let mut output = self.generate_with(request, &mut rng)?;
        output.seed = Some(seed);
        Some(output)
    }

    /// Runs `request` with a caller-supplied random source. Returns `None`
    /// if a run is already in flight.
    pub fn generate_with<R: RandomSource + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Option<GenerationOutput> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::debug!("Generation already in flight, dropping request");
            return None;
        };

        let context = GenerationContext::new(request);
        log::debug!(
            "Expanded {} rules to {} symbols in {} iterations",
            request.grammar.rule_count(),
            context.string().len(),
            context.expansion.iterations_run
        );
        log::trace!("Expanded string: {}", context.string());
        Some(context.run(rng))
    }
}
