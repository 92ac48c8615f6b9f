use crate::error::ProjectError;
use crate::xml::{seek_element, StartTag, XmlEvent, XmlStream};

/// A physical camera body and lens description with its calibration.
///
/// Scalar calibration values default to 1.0 when the document does not
/// provide them, matching the writer's conventions.
#[derive(Debug, Clone)]
pub struct Sensor {
    /// Sensor id referenced by cameras.
    pub id: i64,
    /// Display label.
    pub label: String,
    /// Sensor type attribute, e.g. `frame`.
    pub sensor_type: String,
    /// Raster width in pixels.
    pub width: i64,
    /// Raster height in pixels.
    pub height: i64,
    /// Physical pixel width in mm.
    pub pixel_width: f64,
    /// Physical pixel height in mm.
    pub pixel_height: f64,
    /// Nominal focal length in mm.
    pub focal_length: f64,
    /// Whether the calibration was held fixed.
    pub fixed: bool,
    /// Focal length in pixels, x.
    pub fx: f64,
    /// Focal length in pixels, y.
    pub fy: f64,
    /// Principal point x.
    pub cx: f64,
    /// Principal point y.
    pub cy: f64,
    /// Affinity coefficient.
    pub b1: f64,
    /// Non-orthogonality coefficient.
    pub b2: f64,
    /// Skew coefficient.
    pub skew: f64,
    /// Radial distortion k1.
    pub k1: f64,
    /// Radial distortion k2.
    pub k2: f64,
    /// Radial distortion k3.
    pub k3: f64,
    /// Radial distortion k4.
    pub k4: f64,
    /// Tangential distortion p1.
    pub p1: f64,
    /// Tangential distortion p2.
    pub p2: f64,
    /// Tangential distortion p3.
    pub p3: f64,
    /// Tangential distortion p4.
    pub p4: f64,
    /// Band labels for multispectral sensors.
    pub bands: Vec<String>,
    /// Covariance parameter list, verbatim.
    pub covariance_params: String,
    /// Covariance coefficients, when present.
    pub covariance_coeffs: Option<Vec<f64>>,
}

impl Sensor {
    fn new(id: i64, label: String) -> Self {
        Self {
            id,
            label,
            sensor_type: String::new(),
            width: 0,
            height: 0,
            pixel_width: 0.0,
            pixel_height: 0.0,
            focal_length: 0.0,
            fixed: false,
            fx: 1.0,
            fy: 1.0,
            cx: 1.0,
            cy: 1.0,
            b1: 1.0,
            b2: 1.0,
            skew: 1.0,
            k1: 1.0,
            k2: 1.0,
            k3: 1.0,
            k4: 1.0,
            p1: 1.0,
            p2: 1.0,
            p3: 1.0,
            p4: 1.0,
            bands: Vec::new(),
            covariance_params: String::new(),
            covariance_coeffs: None,
        }
    }

    /// Parse a sensor from the front of a document, skipping any wrapper
    /// tags. `Ok(None)` means the document holds a different entity type.
    pub fn from_stream(stream: &mut XmlStream) -> Result<Option<Self>, ProjectError> {
        match seek_element(stream, "sensor")? {
            Some(tag) => Self::from_tag(&tag, stream).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a sensor whose start tag was just consumed.
    pub(crate) fn from_tag(tag: &StartTag, stream: &mut XmlStream) -> Result<Self, ProjectError> {
        let mut sensor = Self::new(
            tag.attr_i64("id", 0),
            tag.attr("label").unwrap_or_default().to_string(),
        );
        sensor.sensor_type = tag.attr("type").unwrap_or_default().to_string();

        let mut in_calibration = false;
        let mut in_bands = false;
        let mut in_covariance = false;

        loop {
            match stream.next_event()? {
                XmlEvent::Start(child) => match child.name.as_str() {
                    "calibration" => in_calibration = true,
                    "bands" => in_bands = true,
                    "covariance" => in_covariance = true,
                    "resolution" if !in_calibration => {
                        sensor.width = child.attr_i64("width", 0);
                        sensor.height = child.attr_i64("height", 0);
                    }
                    "band" if in_bands => {
                        sensor
                            .bands
                            .push(child.attr("label").unwrap_or_default().to_string());
                    }
                    "property" => sensor.apply_property(&child),
                    "params" if in_covariance => {
                        sensor.covariance_params = stream.read_element_text("params")?;
                    }
                    "coeffs" if in_covariance => {
                        let text = stream.read_element_text("coeffs")?;
                        sensor.covariance_coeffs = Some(
                            text.split_whitespace()
                                .map(|v| v.parse().unwrap_or(0.0))
                                .collect(),
                        );
                    }
                    name => {
                        if let Some(slot) = sensor.calibration_slot(name) {
                            let name = name.to_string();
                            *slot = stream.read_element_text(&name)?.trim().parse().unwrap_or(0.0);
                        }
                    }
                },
                XmlEvent::End(name) => match name.as_str() {
                    "calibration" => in_calibration = false,
                    "bands" => in_bands = false,
                    "covariance" => in_covariance = false,
                    "sensor" => return Ok(sensor),
                    _ => {}
                },
                XmlEvent::Eof => {
                    return Err(stream.parse_error("document ended inside <sensor>"))
                }
                XmlEvent::Text(_) => {}
            }
        }
    }

    fn apply_property(&mut self, tag: &StartTag) {
        let value = tag.attr("value").unwrap_or_default();
        match tag.attr("name").unwrap_or_default() {
            "fixed" => self.fixed = value == "true",
            "pixel_width" => self.pixel_width = value.parse().unwrap_or(0.0),
            "pixel_height" => self.pixel_height = value.parse().unwrap_or(0.0),
            "focal_length" => self.focal_length = value.parse().unwrap_or(0.0),
            _ => {}
        }
    }

    fn calibration_slot(&mut self, name: &str) -> Option<&mut f64> {
        Some(match name {
            "fx" => &mut self.fx,
            "fy" => &mut self.fy,
            "cx" => &mut self.cx,
            "cy" => &mut self.cy,
            "b1" => &mut self.b1,
            "b2" => &mut self.b2,
            "skew" => &mut self.skew,
            "k1" => &mut self.k1,
            "k2" => &mut self.k2,
            "k3" => &mut self.k3,
            "k4" => &mut self.k4,
            "p1" => &mut self.p1,
            "p2" => &mut self.p2,
            "p3" => &mut self.p3,
            "p4" => &mut self.p4,
            _ => return None,
        })
    }
}
