//! Per-phase processing parameters recorded in a chunk.
//!
//! Values arrive through the chunk property table and mirror what the
//! desktop application writes into the project XML. Codes outside the
//! documented ranges decode to the `Unknown` variant.

/// Detail level used for the image alignment phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentLevel {
    /// No alignment data recorded.
    #[default]
    Unknown,
    /// Full resolution matching.
    High,
    /// Half resolution matching.
    Medium,
    /// Quarter resolution matching.
    Low,
}

impl AlignmentLevel {
    /// Decode the numeric `match/match_downscale` property value.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::High,
            2 => Self::Medium,
            3 => Self::Low,
            _ => Self::Unknown,
        }
    }

    /// Short label used in one-line phase summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "??",
            Self::High => "High",
            Self::Medium => "Med",
            Self::Low => "Low",
        }
    }

    /// Long human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown Detail",
            Self::High => "High Detail",
            Self::Medium => "Medium Detail",
            Self::Low => "Low Detail",
        }
    }
}

/// Detail level used for the dense cloud reconstruction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenseCloudLevel {
    /// No dense cloud data recorded.
    #[default]
    Unknown,
    /// Full resolution depth maps.
    UltraHigh,
    /// Half resolution depth maps.
    High,
    /// Quarter resolution depth maps.
    Medium,
    /// Eighth resolution depth maps.
    Low,
    /// Sixteenth resolution depth maps.
    Lowest,
}

impl DenseCloudLevel {
    /// Decode the numeric `dense_cloud/depth_downscale` property value.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::UltraHigh,
            2 => Self::High,
            3 => Self::Medium,
            4 => Self::Low,
            5 => Self::Lowest,
            _ => Self::Unknown,
        }
    }

    /// Short label used in one-line phase summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "??",
            Self::UltraHigh => "Ultra",
            Self::High => "High",
            Self::Medium => "Med",
            Self::Low => "Low",
            Self::Lowest => "Lowest",
        }
    }

    /// Long human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown Detail",
            Self::UltraHigh => "Ultra High Detail",
            Self::High => "High Detail",
            Self::Medium => "Medium Detail",
            Self::Low => "Low Detail",
            Self::Lowest => "Lowest Detail",
        }
    }
}

/// Depth map filtering mode used for the dense cloud phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthFilter {
    /// No filter data recorded.
    #[default]
    Unknown,
    /// Filtering switched off.
    Disabled,
    /// Aggressive outlier removal.
    Aggressive,
    /// Moderate outlier removal.
    Moderate,
    /// Mild outlier removal.
    Mild,
}

impl DepthFilter {
    /// Decode the numeric `dense_cloud/depth_filter_mode` property value.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Disabled,
            2 => Self::Aggressive,
            3 => Self::Moderate,
            4 => Self::Mild,
            _ => Self::Unknown,
        }
    }

    /// Short label used in one-line phase summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "??",
            Self::Disabled => "None",
            Self::Aggressive => "Agg",
            Self::Moderate => "Mod",
            Self::Mild => "Mild",
        }
    }

    /// Long human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown Filter",
            Self::Disabled => "Filter Disabled",
            Self::Aggressive => "Aggressive Filter",
            Self::Moderate => "Moderate Filter",
            Self::Mild => "Mild Filter",
        }
    }
}

/// Parameters of the image alignment phase.
#[derive(Debug, Clone, Default)]
pub struct AlignmentPhase {
    /// Matching detail level.
    pub level: AlignmentLevel,
    /// Whether image masks constrained matching.
    pub masked: bool,
    /// Key point limit per image.
    pub feature_limit: i64,
    /// Tie point limit per image.
    pub tie_point_limit: i64,
    /// Seconds spent matching features.
    pub match_duration: f64,
    /// Seconds spent aligning cameras.
    pub align_duration: f64,
}

/// Camera optimization flags and timing.
#[derive(Debug, Clone, Default)]
pub struct OptimizePhase {
    /// Seconds spent optimizing.
    pub duration: f64,
    /// Aspect ratio fitted.
    pub aspect: bool,
    /// Focal length fitted.
    pub f: bool,
    /// Principal point x fitted.
    pub cx: bool,
    /// Principal point y fitted.
    pub cy: bool,
    /// Affinity coefficient fitted.
    pub b1: bool,
    /// Non-orthogonality coefficient fitted.
    pub b2: bool,
    /// Tangential distortion p1 fitted.
    pub p1: bool,
    /// Tangential distortion p2 fitted.
    pub p2: bool,
    /// Tangential distortion p3 fitted.
    pub p3: bool,
    /// Tangential distortion p4 fitted.
    pub p4: bool,
    /// Radial distortion k1 fitted.
    pub k1: bool,
    /// Radial distortion k2 fitted.
    pub k2: bool,
    /// Radial distortion k3 fitted.
    pub k3: bool,
    /// Radial distortion k4 fitted.
    pub k4: bool,
    /// Skew coefficient fitted.
    pub skew: bool,
}

impl OptimizePhase {
    /// Labels of the enabled optimization flags, in report order.
    pub fn enabled_labels(&self) -> Vec<&'static str> {
        let flags = [
            (self.aspect, "aspect"),
            (self.f, "f"),
            (self.cx, "Cx"),
            (self.cy, "Cy"),
            (self.b1, "B1"),
            (self.b2, "B2"),
            (self.p1, "P1"),
            (self.p2, "P2"),
            (self.p3, "P3"),
            (self.p4, "P4"),
            (self.k1, "k1"),
            (self.k2, "k2"),
            (self.k3, "k3"),
            (self.k4, "k4"),
            (self.skew, "skew"),
        ];
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, label)| *label)
            .collect()
    }
}

/// Parameters of the dense cloud reconstruction phase.
#[derive(Debug, Clone, Default)]
pub struct DenseCloudPhase {
    /// Depth map detail level.
    pub level: DenseCloudLevel,
    /// Depth map filtering mode.
    pub filter: DepthFilter,
    /// Number of depth maps computed.
    pub images_used: i64,
    /// Seconds spent reconstructing.
    pub duration: f64,
}

/// Parameters of the mesh generation phase.
#[derive(Debug, Clone, Default)]
pub struct ModelGenerationPhase {
    /// Surface resolution in model units.
    pub resolution: f64,
    /// Requested face count.
    pub face_count: i64,
    /// Whether the dense cloud was the source data.
    pub dense_source: bool,
    /// Whether hole interpolation was enabled.
    pub interpolation: bool,
    /// Seconds spent generating the mesh.
    pub duration: f64,
}

/// Parameters of the texture generation phase.
#[derive(Debug, Clone, Default)]
pub struct TextureGenerationPhase {
    /// Atlas blend mode code.
    pub blend_mode: i64,
    /// Atlas mapping mode code.
    pub mapping_mode: i64,
    /// Number of texture atlases.
    pub count: i64,
    /// Atlas width in pixels.
    pub width: i64,
    /// Atlas height in pixels.
    pub height: i64,
    /// Seconds spent generating UV coordinates.
    pub uv_duration: f64,
    /// Seconds spent blending the atlas.
    pub blend_duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_codes_decode_to_unknown() {
        assert_eq!(AlignmentLevel::from_code(0), AlignmentLevel::Unknown);
        assert_eq!(AlignmentLevel::from_code(9), AlignmentLevel::Unknown);
        assert_eq!(DenseCloudLevel::from_code(-1), DenseCloudLevel::Unknown);
        assert_eq!(DepthFilter::from_code(42), DepthFilter::Unknown);
    }

    #[test]
    fn labels_match_report_vocabulary() {
        assert_eq!(AlignmentLevel::from_code(1).label(), "High");
        assert_eq!(DenseCloudLevel::from_code(1).label(), "Ultra");
        assert_eq!(DepthFilter::from_code(2).label(), "Agg");
        assert_eq!(DepthFilter::Unknown.label(), "??");
    }

    #[test]
    fn enabled_optimize_labels_keep_report_order() {
        let phase = OptimizePhase {
            f: true,
            cx: true,
            cy: true,
            k1: true,
            skew: true,
            ..Default::default()
        };
        assert_eq!(phase.enabled_labels(), vec!["f", "Cx", "Cy", "k1", "skew"]);
    }
}
