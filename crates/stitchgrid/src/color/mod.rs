//! Color analysis: space math, palette clustering, and harmony schemes.

pub mod harmony;
pub mod quantize;
pub mod space;

pub use harmony::{
    generate_gradient_sequence, generate_palette, ColorTransition, GradientConfig, Scheme,
    TransitionStyle,
};
pub use quantize::{extract_palette, ExtractedColor, QuantizeConfig};
pub use space::{contrast_ratio, hex_to_hsl, hsl_to_hex, name_color, relative_luminance, Hsl, Rgb};
