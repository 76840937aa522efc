//! sRGB <-> CIE XYZ <-> CIE L*a*b* conversion (D65, 2° observer)
//!
//! Every other part of the engine goes through these functions; there is no
//! second implementation of hex parsing or Lab conversion in the crate.

use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};

use crate::models::{LabColor, LchColor, MatchError, Result, RgbColor, XyzColor};

/// D65 reference white, Y normalized to 1.0
pub const D65_WHITE: [f64; 3] = [0.95047, 1.0, 1.08883];

const LAB_EPSILON: f64 = 0.008856;
const LAB_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

fn rgb_to_xyz_matrix() -> Matrix3<f64> {
    Matrix3::new(
        0.4124, 0.3576, 0.1805, //
        0.2126, 0.7152, 0.0722, //
        0.0193, 0.1192, 0.9505,
    )
}

fn xyz_to_rgb_matrix() -> Matrix3<f64> {
    Matrix3::new(
        3.2406, -1.5372, -0.4986, //
        -0.9689, 1.8758, 0.0415, //
        0.0557, -0.2040, 1.0570,
    )
}

/// Parse a 3- or 6-digit hex color, with or without `#`, case-insensitive
pub fn parse_hex(input: &str) -> Result<RgbColor> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MatchError::invalid_color(input, "non-hex character"));
    }

    let channel = |s: &str| {
        u8::from_str_radix(s, 16).map_err(|e| MatchError::invalid_color(input, e.to_string()))
    };

    match digits.len() {
        3 => {
            // #abc -> #aabbcc
            let nibble = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
            Ok(RgbColor::new(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Ok(RgbColor::new(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        n => Err(MatchError::invalid_color(
            input,
            format!("expected 3 or 6 hex digits, got {n}"),
        )),
    }
}

impl FromStr for RgbColor {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex(s)
    }
}

/// sRGB gamma expansion of one 8-bit channel
#[inline]
pub fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse gamma, returning a value in [0, 1] before quantization
#[inline]
pub fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Linearize and project 8-bit sRGB onto XYZ
pub fn rgb_to_xyz(rgb: RgbColor) -> XyzColor {
    let linear = Vector3::new(
        srgb_to_linear(rgb.r),
        srgb_to_linear(rgb.g),
        srgb_to_linear(rgb.b),
    );
    let xyz = rgb_to_xyz_matrix() * linear;
    XyzColor {
        x: xyz[0],
        y: xyz[1],
        z: xyz[2],
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let t = f * f * f;
    if t > LAB_EPSILON {
        t
    } else {
        (f - LAB_OFFSET) / LAB_SLOPE
    }
}

/// XYZ to L*a*b* relative to the D65 white
pub fn xyz_to_lab(xyz: XyzColor) -> LabColor {
    let [xn, yn, zn] = D65_WHITE;
    let fx = lab_f(xyz.x / xn);
    let fy = lab_f(xyz.y / yn);
    let fz = lab_f(xyz.z / zn);

    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Inverse of `xyz_to_lab`
pub fn lab_to_xyz(lab: LabColor) -> XyzColor {
    let [xn, yn, zn] = D65_WHITE;
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    XyzColor {
        x: xn * lab_f_inv(fx),
        y: yn * lab_f_inv(fy),
        z: zn * lab_f_inv(fz),
    }
}

/// Convert XYZ back to 8-bit sRGB, clamping out-of-gamut values
pub fn xyz_to_rgb(xyz: XyzColor) -> RgbColor {
    let linear = xyz_to_rgb_matrix() * Vector3::new(xyz.x, xyz.y, xyz.z);
    let quantize = |c: f64| (linear_to_srgb(c) * 255.0).round() as u8;
    RgbColor::new(quantize(linear[0]), quantize(linear[1]), quantize(linear[2]))
}

/// Full forward path, 8-bit sRGB to L*a*b*
pub fn rgb_to_lab(rgb: RgbColor) -> LabColor {
    xyz_to_lab(rgb_to_xyz(rgb))
}

/// L*a*b* to the nearest in-gamut 8-bit sRGB color
pub fn lab_to_rgb(lab: LabColor) -> RgbColor {
    xyz_to_rgb(lab_to_xyz(lab))
}

/// Parse a hex color and convert it to L*a*b*
pub fn hex_to_lab(hex: &str) -> Result<LabColor> {
    parse_hex(hex).map(rgb_to_lab)
}

/// Cylindrical form of a Lab color, hue in degrees [0, 360)
pub fn lab_to_lch(lab: LabColor) -> LchColor {
    LchColor {
        l: lab.l,
        c: lab.chroma(),
        h: lab.hue_degrees(),
    }
}
