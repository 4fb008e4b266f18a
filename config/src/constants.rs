//! # Configuration Constants
//!
//! Centralized constants for the building reconstruction pipeline. All
//! geometry tolerances, slope snapping thresholds, and safety limits are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Slopes**: Degree thresholds for snapping near-degenerate roof slopes
//! - **Limits**: Maximum values for safety bounds
//! - **Materials**: Well-known material names

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance. This value is chosen to balance precision with
/// robustness against floating-point errors.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for merging nearly-identical skeleton nodes.
///
/// Slightly larger tolerance used when wavefront events land on the same
/// point (e.g. all hexagon edges collapsing onto one peak). Nodes closer
/// than this are treated as a single skeleton vertex.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn vertices_should_merge(v1: [f64; 3], v2: [f64; 3]) -> bool {
///     let dx = v1[0] - v2[0];
///     let dy = v1[1] - v2[1];
///     let dz = v1[2] - v2[2];
///     (dx * dx + dy * dy + dz * dz).sqrt() < VERTEX_MERGE_EPSILON
/// }
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-6;

/// Epsilon for feature-width bookkeeping, in meters.
///
/// The sum of resolved feature widths must match the owning edge length
/// within this tolerance. Coarser than [`EPSILON`] because widths are
/// authored in meters and accumulate over a cursor walk.
///
/// # Example
///
/// ```rust
/// use config::constants::WIDTH_EPSILON;
///
/// let edge_length: f64 = 10.0;
/// let resolved_sum: f64 = 10.0 + 1e-6;
/// assert!((edge_length - resolved_sum).abs() < WIDTH_EPSILON);
/// ```
pub const WIDTH_EPSILON: f64 = 1e-4;

// =============================================================================
// SLOPE CONSTANTS
// =============================================================================

/// Slopes above this many degrees snap to exactly 90 (vertical).
///
/// Near-vertical roof planes produce numerically unstable wavefront events;
/// authored slopes past this threshold are treated as true walls.
///
/// # Example
///
/// ```rust
/// use config::constants::SLOPE_VERTICAL_SNAP_DEG;
///
/// let authored = 89.3_f64;
/// let clamped = if authored > SLOPE_VERTICAL_SNAP_DEG { 90.0 } else { authored };
/// assert_eq!(clamped, 90.0);
/// ```
pub const SLOPE_VERTICAL_SNAP_DEG: f64 = 89.0;

/// Slopes below this many degrees snap to exactly 0 (flat).
///
/// The mirror of [`SLOPE_VERTICAL_SNAP_DEG`] at the flat end of the range.
///
/// # Example
///
/// ```rust
/// use config::constants::SLOPE_FLAT_SNAP_DEG;
///
/// let authored = 0.4_f64;
/// let clamped = if authored < SLOPE_FLAT_SNAP_DEG { 0.0 } else { authored };
/// assert_eq!(clamped, 0.0);
/// ```
pub const SLOPE_FLAT_SNAP_DEG: f64 = 1.0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Minimum number of vertices in a level footprint.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_FOOTPRINT_VERTICES;
///
/// let ring_len = 4;
/// assert!(ring_len >= MIN_FOOTPRINT_VERTICES);
/// ```
pub const MIN_FOOTPRINT_VERTICES: usize = 3;

/// Maximum number of stories a single level may declare.
///
/// Protects against absurd authored values producing gigabyte meshes.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_STORIES;
///
/// assert!(MAX_STORIES >= 100);
/// ```
pub const MAX_STORIES: u32 = 500;

/// Maximum number of wavefront events the skeleton solver will process
/// for one contour before giving up.
///
/// A correct run on an N-edge contour needs O(N) events; this bound only
/// trips on numerically stuck inputs.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_SKELETON_EVENTS;
///
/// assert!(MAX_SKELETON_EVENTS >= 1024);
/// ```
pub const MAX_SKELETON_EVENTS: usize = 65_536;

// =============================================================================
// MATERIAL CONSTANTS
// =============================================================================

/// Name of the placeholder material substituted for missing assets.
///
/// A façade or material name that cannot be resolved degrades to this
/// handle instead of failing the build.
///
/// # Example
///
/// ```rust
/// use config::constants::PLACEHOLDER_MATERIAL;
///
/// assert!(!PLACEHOLDER_MATERIAL.is_empty());
/// ```
pub const PLACEHOLDER_MATERIAL: &str = "placeholder";

/// Well-known material name used for window glazing panels.
///
/// # Example
///
/// ```rust
/// use config::constants::WINDOW_MATERIAL;
///
/// assert_eq!(WINDOW_MATERIAL, "window");
/// ```
pub const WINDOW_MATERIAL: &str = "window";

/// Well-known material name used for door panels.
///
/// # Example
///
/// ```rust
/// use config::constants::DOOR_MATERIAL;
///
/// assert_eq!(DOOR_MATERIAL, "door");
/// ```
pub const DOOR_MATERIAL: &str = "door";

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance propagated into the geometry kernels.
    pub tolerance: f64,
    /// Feature-width tolerance in meters.
    pub width_tolerance: f64,
    /// Name of the missing-asset fallback material.
    pub placeholder_material: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            width_tolerance: WIDTH_EPSILON,
            placeholder_material: PLACEHOLDER_MATERIAL.to_string(),
        }
    }
}
