//! Ordinal status scoring for the four processing phases.
//!
//! Every scorer is a pure function from chunk-level counts to a score in
//! `0..=5`, where 0 is best and 5 means the phase never ran. Scores are
//! derived on demand and never stored.

/// Five-bucket ladder shared by the ratio-based phases. The `0.95` boundary
/// is exclusive, so a ratio of exactly `0.95` scores 0.
fn ratio_bucket(numerator: i64, denominator: i64) -> u8 {
    let ratio = numerator as f64 / denominator as f64;
    if ratio < 0.100 {
        4
    } else if ratio < 0.3333 {
        3
    } else if ratio < 0.6667 {
        2
    } else if ratio < 0.950 {
        1
    } else {
        0
    }
}

/// Score the image alignment phase from the number of aligned images out of
/// the total camera count. No aligned images at all scores 5.
pub fn alignment_status(aligned: usize, total: usize) -> u8 {
    if aligned == 0 {
        return 5;
    }
    ratio_bucket(aligned as i64, total as i64)
}

/// Score the dense cloud phase from the number of depth maps out of the
/// total camera count. Zero depth maps scores 5 when the phase never ran
/// (`level_known == false`) and 3 when it ran but produced nothing.
pub fn dense_cloud_status(depth_images: i64, total: usize, level_known: bool) -> u8 {
    if depth_images == 0 {
        return if level_known { 3 } else { 5 };
    }
    ratio_bucket(depth_images, total as i64)
}

/// Score the mesh generation phase from the face count. A negative count
/// means no mesh exists and scores 5.
pub fn model_status(face_count: i64) -> u8 {
    if face_count < 0 {
        5
    } else if face_count < 5_000 {
        4
    } else if face_count < 10_000 {
        3
    } else if face_count < 50_000 {
        2
    } else if face_count < 1_000_000 {
        1
    } else {
        0
    }
}

/// Score the texture generation phase from the atlas raster dimensions,
/// bucketing on the smaller of width and height.
pub fn texture_status(width: i64, height: i64) -> u8 {
    if width == 0 || height == 0 {
        return 5;
    }
    let side = width.min(height);
    if side < 1024 {
        4
    } else if side < 2048 {
        3
    } else if side < 3072 {
        2
    } else if side < 4096 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_empty_chunk_scores_five() {
        assert_eq!(alignment_status(0, 0), 5);
        assert_eq!(alignment_status(0, 100), 5);
    }

    #[test]
    fn alignment_ratio_ladder() {
        assert_eq!(alignment_status(9, 100), 4);
        assert_eq!(alignment_status(33, 100), 3);
        assert_eq!(alignment_status(66, 100), 2);
        assert_eq!(alignment_status(94, 100), 1);
        assert_eq!(alignment_status(100, 100), 0);
    }

    #[test]
    fn alignment_ninety_five_percent_boundary_is_exclusive() {
        assert_eq!(alignment_status(95, 100), 0);
    }

    #[test]
    fn alignment_is_idempotent() {
        assert_eq!(alignment_status(42, 100), alignment_status(42, 100));
    }

    #[test]
    fn dense_cloud_distinguishes_never_ran_from_ran_empty() {
        assert_eq!(dense_cloud_status(0, 50, false), 5);
        assert_eq!(dense_cloud_status(0, 50, true), 3);
        assert_eq!(dense_cloud_status(50, 50, true), 0);
        assert_eq!(dense_cloud_status(5, 100, true), 4);
    }

    #[test]
    fn model_face_count_ladder() {
        assert_eq!(model_status(-1), 5);
        assert_eq!(model_status(4_999), 4);
        assert_eq!(model_status(5_000), 3);
        assert_eq!(model_status(10_000), 2);
        assert_eq!(model_status(50_000), 1);
        assert_eq!(model_status(1_000_000), 0);
    }

    #[test]
    fn texture_scores_on_the_smaller_dimension() {
        assert_eq!(texture_status(0, 4096), 5);
        assert_eq!(texture_status(4096, 0), 5);
        assert_eq!(texture_status(512, 4096), 4);
        assert_eq!(texture_status(4096, 1024), 3);
        assert_eq!(texture_status(2048, 4096), 2);
        assert_eq!(texture_status(3072, 4096), 1);
        assert_eq!(texture_status(4096, 4096), 0);
    }
}
