//! Ingestion of dotted chunk property keys into typed phase fields.
//!
//! The writer scatters `<property name=".." value=".."/>` elements at many
//! depths below a chunk; they all funnel through [`apply`]. The table is
//! data-driven so adding a key is a one-line change. Numeric conversion is
//! lenient: malformed values read as zero, matching the writer's own
//! tooling.

use crate::chunk::Chunk;
use crate::phases::{AlignmentLevel, DenseCloudLevel, DepthFilter};

fn as_i64(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

fn as_f64(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn as_flag(value: &str) -> bool {
    as_i64(value) != 0
}

fn fit_flags(chunk: &mut Chunk, value: &str) {
    for token in value.split_whitespace() {
        match token {
            "f" => chunk.optimize.f = true,
            "cx" => chunk.optimize.cx = true,
            "cy" => chunk.optimize.cy = true,
            "b1" => chunk.optimize.b1 = true,
            "b2" => chunk.optimize.b2 = true,
            "k1" => chunk.optimize.k1 = true,
            "k2" => chunk.optimize.k2 = true,
            "k3" => chunk.optimize.k3 = true,
            "k4" => chunk.optimize.k4 = true,
            "p1" => chunk.optimize.p1 = true,
            "p2" => chunk.optimize.p2 = true,
            "p3" => chunk.optimize.p3 = true,
            "p4" => chunk.optimize.p4 = true,
            _ => {}
        }
    }
}

fn ignore(_: &mut Chunk, _: &str) {}

type Setter = fn(&mut Chunk, &str);

// Recognized-but-unused keys map to `ignore` so they do not hit the
// unknown-key log path.
static PROPERTY_TABLE: &[(&str, Setter)] = &[
    // texture generation
    ("atlas/atlas_blend_mode", |c, v| {
        c.texture_generation.blend_mode = as_i64(v)
    }),
    ("atlas/atlas_count", |c, v| {
        c.texture_generation.count = as_i64(v)
    }),
    ("atlas/atlas_height", |c, v| {
        c.texture_generation.height = as_i64(v)
    }),
    ("atlas/atlas_mapping_mode", |c, v| {
        c.texture_generation.mapping_mode = as_i64(v)
    }),
    ("atlas/atlas_width", |c, v| {
        c.texture_generation.width = as_i64(v)
    }),
    // model generation
    ("model/depth_downscale", ignore),
    ("model/depth_filter_mode", ignore),
    ("model/mesh_face_count", |c, v| {
        c.model_generation.face_count = as_i64(v)
    }),
    ("model/mesh_interpolation", |c, v| {
        c.model_generation.interpolation = as_i64(v) == 1
    }),
    ("model/mesh_object_type", ignore),
    ("model/mesh_source_data", |c, v| {
        c.model_generation.dense_source = as_i64(v) == 1
    }),
    ("model/resolution", |c, v| {
        c.model_generation.resolution = as_f64(v)
    }),
    // dense cloud
    ("dense_cloud/depth_downscale", |c, v| {
        c.dense_cloud.level = DenseCloudLevel::from_code(as_i64(v))
    }),
    ("dense_cloud/depth_filter_mode", |c, v| {
        c.dense_cloud.filter = DepthFilter::from_code(as_i64(v))
    }),
    ("dense_cloud/density", ignore),
    ("dense_cloud/resolution", ignore),
    // image alignment
    ("match/match_downscale", |c, v| {
        c.alignment.level = AlignmentLevel::from_code(as_i64(v))
    }),
    ("match/match_filter_mask", |c, v| {
        c.alignment.masked = as_flag(v)
    }),
    ("match/match_point_limit", |c, v| {
        c.alignment.feature_limit = as_i64(v)
    }),
    ("match/match_tiepoint_limit", |c, v| {
        c.alignment.tie_point_limit = as_i64(v)
    }),
    ("match/match_select_pairs", ignore),
    // durations
    ("match/duration", |c, v| {
        c.alignment.match_duration = as_f64(v)
    }),
    ("align/duration", |c, v| {
        c.alignment.align_duration = as_f64(v)
    }),
    ("optimize/duration", |c, v| c.optimize.duration = as_f64(v)),
    ("dense_cloud/duration", |c, v| {
        c.dense_cloud.duration = as_f64(v)
    }),
    ("model/duration", |c, v| {
        c.model_generation.duration = as_f64(v)
    }),
    ("atlas/duration_blend", |c, v| {
        c.texture_generation.blend_duration = as_f64(v)
    }),
    ("atlas/duration_uv", |c, v| {
        c.texture_generation.uv_duration = as_f64(v)
    }),
    // optimization flags
    ("optimize/fit_flags", fit_flags),
    ("optimize/fit_aspect", |c, v| {
        c.optimize.aspect = as_flag(v)
    }),
    ("optimize/fit_f", |c, v| c.optimize.f = as_flag(v)),
    ("optimize/fit_cxcy", |c, v| {
        let on = as_flag(v);
        c.optimize.cx = on;
        c.optimize.cy = on;
    }),
    ("optimize/fit_k1k2k3", |c, v| {
        let on = as_flag(v);
        c.optimize.k1 = on;
        c.optimize.k2 = on;
        c.optimize.k3 = on;
    }),
    ("optimize/fit_k4", |c, v| c.optimize.k4 = as_flag(v)),
    ("optimize/fit_p1p2", |c, v| {
        let on = as_flag(v);
        c.optimize.p1 = on;
        c.optimize.p2 = on;
    }),
    ("optimize/fit_skew", |c, v| c.optimize.skew = as_flag(v)),
    // reference accuracy settings
    ("accuracy_tiepoints", ignore),
    ("accuracy_cameras", ignore),
    ("accuracy_cameras_ypr", ignore),
    ("accuracy_markers", ignore),
    ("accuracy_scalebars", ignore),
    ("accuracy_projections", ignore),
];

/// Apply one dotted property to the chunk. Unrecognized keys are accepted
/// and dropped.
pub fn apply(chunk: &mut Chunk, name: &str, value: &str) {
    match PROPERTY_TABLE.iter().find(|(key, _)| *key == name) {
        Some((_, setter)) => setter(chunk, value),
        None => log::debug!("unrecognized chunk property '{name}' = '{value}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_properties_land_in_typed_fields() {
        let mut chunk = Chunk::default();
        apply(&mut chunk, "match/match_downscale", "1");
        apply(&mut chunk, "match/match_point_limit", "40000");
        apply(&mut chunk, "match/match_tiepoint_limit", "4000000");
        apply(&mut chunk, "match/match_filter_mask", "1");
        assert_eq!(chunk.alignment.level, AlignmentLevel::High);
        assert_eq!(chunk.alignment.feature_limit, 40000);
        assert_eq!(chunk.alignment.tie_point_limit, 4000000);
        assert!(chunk.alignment.masked);
    }

    #[test]
    fn compound_fit_keys_set_their_group() {
        let mut chunk = Chunk::default();
        apply(&mut chunk, "optimize/fit_cxcy", "1");
        assert!(chunk.optimize.cx);
        assert!(chunk.optimize.cy);
        assert!(!chunk.optimize.f);
        assert!(!chunk.optimize.k1);

        apply(&mut chunk, "optimize/fit_k1k2k3", "1");
        assert!(chunk.optimize.k1 && chunk.optimize.k2 && chunk.optimize.k3);
        assert!(!chunk.optimize.k4);
    }

    #[test]
    fn fit_flags_token_list() {
        let mut chunk = Chunk::default();
        apply(&mut chunk, "optimize/fit_flags", "f cx cy k1 k2 junk");
        assert!(chunk.optimize.f);
        assert!(chunk.optimize.cx && chunk.optimize.cy);
        assert!(chunk.optimize.k1 && chunk.optimize.k2);
        assert!(!chunk.optimize.k3);
        assert!(!chunk.optimize.aspect);
    }

    #[test]
    fn malformed_numbers_read_as_zero() {
        let mut chunk = Chunk::default();
        apply(&mut chunk, "match/match_point_limit", "not-a-number");
        assert_eq!(chunk.alignment.feature_limit, 0);
        apply(&mut chunk, "model/resolution", "");
        assert_eq!(chunk.model_generation.resolution, 0.0);
    }

    #[test]
    fn unknown_keys_are_dropped_without_effect() {
        let mut chunk = Chunk::default();
        apply(&mut chunk, "future/new_setting", "17");
        assert_eq!(chunk.alignment.feature_limit, 0);
        assert_eq!(chunk.texture_generation.count, 0);
    }

    #[test]
    fn dense_cloud_codes_decode_to_levels() {
        let mut chunk = Chunk::default();
        apply(&mut chunk, "dense_cloud/depth_downscale", "1");
        apply(&mut chunk, "dense_cloud/depth_filter_mode", "2");
        assert_eq!(chunk.dense_cloud.level, DenseCloudLevel::UltraHigh);
        assert_eq!(chunk.dense_cloud.filter, DepthFilter::Aggressive);
    }
}
