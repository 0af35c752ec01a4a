use ratatui::style::Color;

use crate::cli::ColorArg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

/// Colours for everything drawn around the storm.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub button_text: Color,
    pub button_border: Color,
    pub button_hover_text: Color,
    pub button_hover_border: Color,
    pub hint: Color,
}

pub fn detect_color_capability(mode: ColorArg) -> ColorCapability {
    let term = std::env::var("TERM").ok();
    let colorterm = std::env::var("COLORTERM").ok();
    let no_color = std::env::var("NO_COLOR").ok();
    detect_color_capability_from(
        mode,
        term.as_deref(),
        colorterm.as_deref(),
        no_color.as_deref(),
    )
}

pub fn detect_color_capability_from(
    mode: ColorArg,
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    if should_force_basic16(mode, term, no_color) {
        return ColorCapability::Basic16;
    }
    if mode == ColorArg::Always || supports_truecolor(colorterm, term) {
        return ColorCapability::TrueColor;
    }
    if term
        .unwrap_or_default()
        .to_lowercase()
        .contains("256color")
    {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

fn should_force_basic16(mode: ColorArg, term: Option<&str>, no_color: Option<&str>) -> bool {
    mode == ColorArg::Never
        || (mode == ColorArg::Auto && no_color.is_some_and(|value| !value.is_empty()))
        || (mode == ColorArg::Auto && term.is_some_and(|value| value.eq_ignore_ascii_case("dumb")))
}

fn supports_truecolor(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    let term = term.unwrap_or_default().to_lowercase();
    truecolor_hint(&colorterm) || truecolor_hint(&term)
}

fn truecolor_hint(value: &str) -> bool {
    value.contains("truecolor") || value.contains("24bit") || value.ends_with("direct")
}

pub fn theme_for(capability: ColorCapability) -> Theme {
    match capability {
        ColorCapability::Basic16 => Theme {
            button_text: Color::Gray,
            button_border: Color::DarkGray,
            button_hover_text: Color::White,
            button_hover_border: Color::LightCyan,
            hint: Color::DarkGray,
        },
        _ => Theme {
            button_text: quantize(Color::Rgb(194, 207, 224), capability),
            button_border: quantize(Color::Rgb(60, 72, 98), capability),
            button_hover_text: quantize(Color::Rgb(255, 255, 255), capability),
            button_hover_border: quantize(Color::Rgb(115, 208, 255), capability),
            hint: quantize(Color::Rgb(90, 98, 120), capability),
        },
    }
}

pub fn quantize(color: Color, capability: ColorCapability) -> Color {
    match (capability, color) {
        (ColorCapability::TrueColor, c) => c,
        (ColorCapability::Xterm256, Color::Rgb(r, g, b)) => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        (ColorCapability::Basic16, Color::Rgb(r, g, b)) => basic16_from_rgb(r, g, b),
        (_, c) => c,
    }
}

// Bolts are white cores over pale blue glow, so only brightness and a
// blue/other split matter at 16 colours.
fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;
    let max = rf.max(gf.max(bf));
    let min = rf.min(gf.min(bf));
    let light = (max + min) / 2.0;
    let bluish = bf - rf > 0.08;

    match (light, bluish) {
        (l, _) if l < 0.12 => Color::DarkGray,
        (l, true) if l < 0.45 => Color::Blue,
        (_, true) => Color::LightCyan,
        (l, false) if l < 0.40 => Color::DarkGray,
        (l, false) if l < 0.72 => Color::Gray,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_forces_basic16() {
        let cap =
            detect_color_capability_from(ColorArg::Never, Some("xterm-256color"), Some("truecolor"), None);
        assert_eq!(cap, ColorCapability::Basic16);
    }

    #[test]
    fn no_color_env_only_applies_in_auto_mode() {
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("xterm-256color"), None, Some("1")),
            ColorCapability::Basic16
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Always, Some("xterm-256color"), None, Some("1")),
            ColorCapability::TrueColor
        );
    }

    #[test]
    fn detects_truecolor_and_256() {
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("xterm"), Some("24bit"), None),
            ColorCapability::TrueColor
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("screen-256color"), None, None),
            ColorCapability::Xterm256
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("dumb"), None, None),
            ColorCapability::Basic16
        );
    }

    #[test]
    fn quantize_maps_white_to_cube_corner() {
        assert_eq!(
            quantize(Color::Rgb(255, 255, 255), ColorCapability::Xterm256),
            Color::Indexed(231)
        );
        assert_eq!(
            quantize(Color::Rgb(255, 255, 255), ColorCapability::Basic16),
            Color::White
        );
    }

    #[test]
    fn faint_glow_stays_blue_at_16_colors() {
        assert_eq!(
            quantize(Color::Rgb(173, 216, 255), ColorCapability::Basic16),
            Color::LightCyan
        );
        assert_eq!(
            quantize(Color::Rgb(35, 43, 51), ColorCapability::Basic16),
            Color::DarkGray
        );
    }
}
