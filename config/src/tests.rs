//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper structures.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_width_epsilon_coarser_than_merge_epsilon() {
    assert!(
        WIDTH_EPSILON >= VERTEX_MERGE_EPSILON,
        "meter-scale bookkeeping should be the coarsest tolerance"
    );
}

// =============================================================================
// SLOPE TESTS
// =============================================================================

#[test]
fn test_slope_snap_thresholds_are_symmetric() {
    assert!((SLOPE_FLAT_SNAP_DEG - (90.0 - SLOPE_VERTICAL_SNAP_DEG)).abs() < EPSILON);
}

#[test]
fn test_slope_snap_range_is_valid() {
    assert!(SLOPE_FLAT_SNAP_DEG > 0.0);
    assert!(SLOPE_VERTICAL_SNAP_DEG < 90.0);
    assert!(SLOPE_FLAT_SNAP_DEG < SLOPE_VERTICAL_SNAP_DEG);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_min_footprint_vertices_is_triangle() {
    assert_eq!(MIN_FOOTPRINT_VERTICES, 3);
}

#[test]
fn test_max_stories_is_sane() {
    assert!(MAX_STORIES >= 100);
    assert!(MAX_STORIES <= 10_000);
}

#[test]
fn test_max_skeleton_events_bound() {
    assert!(MAX_SKELETON_EVENTS >= 1024);
}

// =============================================================================
// MATERIAL TESTS
// =============================================================================

#[test]
fn test_material_names_are_distinct() {
    assert_ne!(PLACEHOLDER_MATERIAL, WINDOW_MATERIAL);
    assert_ne!(PLACEHOLDER_MATERIAL, DOOR_MATERIAL);
    assert_ne!(WINDOW_MATERIAL, DOOR_MATERIAL);
}

#[test]
fn test_global_config_default() {
    let config = GlobalConfig::default();
    assert_eq!(config.tolerance, EPSILON);
    assert_eq!(config.width_tolerance, WIDTH_EPSILON);
    assert_eq!(config.placeholder_material, PLACEHOLDER_MATERIAL);
}
