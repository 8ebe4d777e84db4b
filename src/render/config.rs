//! Symbology configuration accepted by the renderer.

use super::RenderError;
use super::options::{DataMatrix, EncodingMode, OutputOption, SymbologyType};
use serde::{Deserialize, Serialize};

/// Options for one rendered symbol.
///
/// Field names follow the JavaScript API (`camelCase`). Unknown keys are
/// rejected when deserializing rather than ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SymbologyConfig {
    /// Barcode type
    pub symbology: SymbologyType,

    /// Symbol height in X-dimensions (linear symbologies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// Quiet zone left and right, in X-dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitespace_width: Option<u32>,

    /// Width of boundary bars or box, in X-dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,

    /// Rendering switches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_options: Option<OutputOption>,

    /// Bar colour, `RRGGBB` or `RRGGBBAA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,

    /// Space colour, `RRGGBB` or `RRGGBBAA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Image scale factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,

    /// Symbology-specific option 1 (usually error correction level)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option1: Option<i32>,

    /// Symbology-specific option 2 (usually size or version)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option2: Option<i32>,

    /// Symbology-specific option 3 (e.g. the Data Matrix shape hint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option3: Option<i32>,

    /// Print the human-readable interpretation under linear symbols
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_human_readable_text: Option<bool>,

    /// Output path for file rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Primary message (MaxiCode, composite symbologies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,

    /// Input interpretation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<EncodingMode>,

    /// Extended Channel Interpretation code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eci: Option<u32>,

    /// Clockwise rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<u16>,
}

/// Highest ECI code the native library accepts.
const MAX_ECI: u32 = 999_999;

impl SymbologyConfig {
    /// Configuration with only the symbology set.
    pub const fn new(symbology: SymbologyType) -> Self {
        Self {
            symbology,
            height: None,
            whitespace_width: None,
            border_width: None,
            output_options: None,
            foreground_color: None,
            background_color: None,
            scale: None,
            option1: None,
            option2: None,
            option3: None,
            show_human_readable_text: None,
            file_name: None,
            primary: None,
            encoding: None,
            eci: None,
            rotation: None,
        }
    }

    /// Set the Data Matrix shape hint (stored in `option3`).
    #[must_use]
    pub fn with_data_matrix_shape(mut self, shape: DataMatrix) -> Self {
        self.option3 = Some(u32::from(shape) as i32);
        self
    }

    /// Reject values the native library would refuse or misinterpret.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidOption`] naming the first offending option.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (option, colour) in [
            ("foregroundColor", &self.foreground_color),
            ("backgroundColor", &self.background_color),
        ] {
            if let Some(colour) = colour {
                if !is_hex_colour(colour) {
                    return Err(RenderError::invalid(
                        option,
                        format!("{colour:?} is not RRGGBB or RRGGBBAA hex"),
                    ));
                }
            }
        }

        if let Some(scale) = self.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(RenderError::invalid("scale", format!("{scale} is not positive")));
            }
        }

        if let Some(height) = self.height {
            if !(height.is_finite() && height > 0.0) {
                return Err(RenderError::invalid("height", format!("{height} is not positive")));
            }
        }

        if let Some(rotation) = self.rotation {
            if !matches!(rotation, 0 | 90 | 180 | 270) {
                return Err(RenderError::invalid(
                    "rotation",
                    format!("{rotation} is not one of 0, 90, 180, 270"),
                ));
            }
        }

        if let Some(eci) = self.eci {
            if eci > MAX_ECI {
                return Err(RenderError::invalid("eci", format!("{eci} exceeds {MAX_ECI}")));
            }
        }

        Ok(())
    }
}

fn is_hex_colour(value: &str) -> bool {
    matches!(value.len(), 6 | 8) && value.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let config: SymbologyConfig = serde_json::from_str(
            r#"{
                "symbology": 58,
                "scale": 2.5,
                "foregroundColor": "1a2b3c",
                "backgroundColor": "FFFFFF80",
                "outputOptions": 4,
                "showHumanReadableText": false,
                "encoding": 1,
                "rotation": 90
            }"#,
        )
        .unwrap();

        assert_eq!(config.symbology, SymbologyType::Qr);
        assert_eq!(config.output_options, Some(OutputOption::BOX));
        assert_eq!(config.encoding, Some(EncodingMode::Unicode));
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = serde_json::from_str::<SymbologyConfig>(r#"{"symbology": 20, "colour": "000000"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown field `colour`"));
    }

    #[test]
    fn test_unknown_symbology_rejected() {
        assert!(serde_json::from_str::<SymbologyConfig>(r#"{"symbology": 12345}"#).is_err());
    }

    #[test]
    fn test_colour_validation() {
        let mut config = SymbologyConfig::new(SymbologyType::Code128);
        for bad in ["fff", "12345g", "#000000", "0000000"] {
            config.foreground_color = Some(bad.to_string());
            assert!(
                matches!(config.validate(), Err(RenderError::InvalidOption { .. })),
                "{bad} accepted"
            );
        }
        config.foreground_color = Some("00ff00aa".to_string());
        config.validate().unwrap();
    }

    #[test]
    fn test_scale_and_rotation_validation() {
        let mut config = SymbologyConfig::new(SymbologyType::Aztec);
        config.scale = Some(0.0);
        assert!(config.validate().is_err());
        config.scale = Some(f32::NAN);
        assert!(config.validate().is_err());
        config.scale = Some(1.0);
        config.rotation = Some(45);
        assert!(config.validate().is_err());
        config.rotation = Some(270);
        config.validate().unwrap();
    }

    #[test]
    fn test_data_matrix_shape() {
        let config = SymbologyConfig::new(SymbologyType::DataMatrix).with_data_matrix_shape(DataMatrix::Square);
        assert_eq!(config.option3, Some(100));
    }
}
