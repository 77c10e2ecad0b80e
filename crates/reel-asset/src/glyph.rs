//! Synthesized placeholder previews
//!
//! A placeholder is a flat background with a centered white mark. The mark
//! is a type glyph when the image is large enough to draw one legibly, a
//! short bitmap label (`IMG`, `VID`, `AUD`, `FILE`) otherwise, and nothing
//! at all for images too small even for the label.

use crate::types::AssetType;
use image::{Rgb, RgbImage};

/// Placeholder background, `#1a1a2e`
pub const BACKGROUND: Rgb<u8> = Rgb([0x1a, 0x1a, 0x2e]);
pub const FOREGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

/// Smallest edge on which a glyph is drawn
const GLYPH_MIN_EDGE: u32 = 32;

/// Which mark ended up on the placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderMark {
    Glyph,
    Label,
    Blank,
}

/// Render a placeholder for `kind`; `None` stands for an unclassified file.
pub fn render_placeholder(width: u32, height: u32, kind: Option<AssetType>) -> (RgbImage, PlaceholderMark) {
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);

    if draw_glyph(&mut img, kind) {
        return (img, PlaceholderMark::Glyph);
    }
    if draw_label(&mut img, label_for(kind)) {
        return (img, PlaceholderMark::Label);
    }
    (img, PlaceholderMark::Blank)
}

pub fn label_for(kind: Option<AssetType>) -> &'static str {
    match kind {
        Some(AssetType::Image) => "IMG",
        Some(AssetType::Video) => "VID",
        Some(AssetType::Audio) => "AUD",
        None => "FILE",
    }
}

/// Shape membership in unit coordinates, origin top-left
fn glyph_shape(kind: Option<AssetType>) -> fn(f32, f32) -> bool {
    match kind {
        Some(AssetType::Image) => picture,
        Some(AssetType::Video) => play,
        Some(AssetType::Audio) => note,
        None => folder,
    }
}

fn draw_glyph(img: &mut RgbImage, kind: Option<AssetType>) -> bool {
    let (w, h) = img.dimensions();
    let edge = w.min(h);
    if edge < GLYPH_MIN_EDGE {
        return false;
    }

    let side = edge / 2;
    let x0 = (w - side) / 2;
    let y0 = (h - side) / 2;
    let inside = glyph_shape(kind);

    for dy in 0..side {
        for dx in 0..side {
            let u = (dx as f32 + 0.5) / side as f32;
            let v = (dy as f32 + 0.5) / side as f32;
            if inside(u, v) {
                img.put_pixel(x0 + dx, y0 + dy, FOREGROUND);
            }
        }
    }
    true
}

fn picture(x: f32, y: f32) -> bool {
    let border = x < 0.08 || x > 0.92 || y < 0.08 || y > 0.92;
    let sun = (x - 0.7).powi(2) + (y - 0.3).powi(2) < 0.01;
    let mountain = (0.35..=0.85).contains(&y) && (x - 0.4).abs() <= (y - 0.35) * 0.56;
    border || sun || mountain
}

fn play(x: f32, y: f32) -> bool {
    x >= 0.25 && (y - 0.5).abs() <= (0.85 - x) * (0.35 / 0.6)
}

fn note(x: f32, y: f32) -> bool {
    let stem = (0.55..=0.63).contains(&x) && (0.15..=0.75).contains(&y);
    let flag = (0.63..=0.85).contains(&x) && (0.15..=0.27).contains(&y);
    let head = ((x - 0.47) / 0.16).powi(2) + ((y - 0.75) / 0.11).powi(2) <= 1.0;
    stem || flag || head
}

fn folder(x: f32, y: f32) -> bool {
    let tab = (0.1..=0.45).contains(&x) && (0.2..=0.32).contains(&y);
    let body = (0.1..=0.9).contains(&x) && (0.3..=0.8).contains(&y);
    tab || body
}

const FONT_W: u32 = 5;
const FONT_H: u32 = 7;

/// 5x7 bitmaps, one row per byte, high bit on the left
fn font_rows(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        _ => return None,
    };
    Some(rows)
}

fn draw_label(img: &mut RgbImage, label: &str) -> bool {
    let glyphs: Option<Vec<[u8; 7]>> = label.chars().map(font_rows).collect();
    let Some(glyphs) = glyphs else {
        return false;
    };
    if glyphs.is_empty() {
        return false;
    }

    let (w, h) = img.dimensions();
    // one column of spacing between letters
    let cols = glyphs.len() as u32 * (FONT_W + 1) - 1;
    let scale = (w / cols).min(h / FONT_H).min(8);
    if scale == 0 {
        return false;
    }

    let x0 = (w - cols * scale) / 2;
    let y0 = (h - FONT_H * scale) / 2;

    for (i, rows) in glyphs.iter().enumerate() {
        let gx = x0 + i as u32 * (FONT_W + 1) * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..FONT_W {
                if bits & (1 << (FONT_W - 1 - col)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        img.put_pixel(gx + col * scale + sx, y0 + row as u32 * scale + sy, FOREGROUND);
                    }
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_foreground(img: &RgbImage) -> usize {
        img.pixels().filter(|p| **p == FOREGROUND).count()
    }

    #[test]
    fn test_glyph_on_full_size() {
        for kind in [
            Some(AssetType::Image),
            Some(AssetType::Video),
            Some(AssetType::Audio),
            None,
        ] {
            let (img, mark) = render_placeholder(256, 256, kind);
            assert_eq!(img.dimensions(), (256, 256));
            assert_eq!(mark, PlaceholderMark::Glyph);
            assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
            assert!(count_foreground(&img) > 0);
        }
    }

    #[test]
    fn test_play_glyph_is_centered() {
        let (img, _) = render_placeholder(256, 256, Some(AssetType::Video));
        assert_eq!(*img.get_pixel(128, 128), FOREGROUND);
        assert_eq!(*img.get_pixel(255, 255), BACKGROUND);
    }

    #[test]
    fn test_label_when_glyph_does_not_fit() {
        let (img, mark) = render_placeholder(24, 12, Some(AssetType::Image));
        assert_eq!(mark, PlaceholderMark::Label);
        assert!(count_foreground(&img) > 0);
    }

    #[test]
    fn test_blank_when_nothing_fits() {
        let (img, mark) = render_placeholder(4, 4, Some(AssetType::Audio));
        assert_eq!(mark, PlaceholderMark::Blank);
        assert_eq!(count_foreground(&img), 0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(label_for(Some(AssetType::Image)), "IMG");
        assert_eq!(label_for(Some(AssetType::Video)), "VID");
        assert_eq!(label_for(Some(AssetType::Audio)), "AUD");
        assert_eq!(label_for(None), "FILE");
        for label in ["IMG", "VID", "AUD", "FILE"] {
            assert!(label.chars().all(|c| font_rows(c).is_some()));
        }
    }
}
