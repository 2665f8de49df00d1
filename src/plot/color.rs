use plotters::style::RGBColor;

use crate::error::AppError;

/// Subset of the xkcd color survey names, addressed as `xkcd:<name>`.
const XKCD_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("azure", (0x06, 0x9a, 0xf3)),
    ("black", (0x00, 0x00, 0x00)),
    ("blue", (0x03, 0x43, 0xdf)),
    ("gold", (0xdb, 0xb4, 0x0c)),
    ("green", (0x15, 0xb0, 0x1a)),
    ("grey", (0x92, 0x95, 0x91)),
    ("lime", (0xaa, 0xff, 0x32)),
    ("magenta", (0xc2, 0x00, 0x78)),
    ("navy", (0x01, 0x15, 0x3e)),
    ("orange", (0xf9, 0x73, 0x06)),
    ("purple", (0x7e, 0x1e, 0x9c)),
    ("red", (0xe5, 0x00, 0x00)),
    ("sky blue", (0x75, 0xbb, 0xfd)),
    ("teal", (0x02, 0x93, 0x86)),
];

/// Tableau palette, addressed as `tab:<name>` or `C0`..`C9`.
const TABLEAU_COLORS: [(&str, (u8, u8, u8)); 10] = [
    ("blue", (0x1f, 0x77, 0xb4)),
    ("orange", (0xff, 0x7f, 0x0e)),
    ("green", (0x2c, 0xa0, 0x2c)),
    ("red", (0xd6, 0x27, 0x28)),
    ("purple", (0x94, 0x67, 0xbd)),
    ("brown", (0x8c, 0x56, 0x4b)),
    ("pink", (0xe3, 0x77, 0xc2)),
    ("gray", (0x7f, 0x7f, 0x7f)),
    ("olive", (0xbc, 0xbd, 0x22)),
    ("cyan", (0x17, 0xbe, 0xcf)),
];

/// Parse a color identifier.
///
/// Accepts `#rrggbb`, single-letter shorthands (`k`, `r`, ...), `xkcd:<name>`,
/// `tab:<name>`, `C<digit>` and CSS/SVG color names.
pub fn parse_color(name: &str) -> Result<RGBColor, AppError> {
    let key = name.trim().to_ascii_lowercase();
    lookup(&key).ok_or_else(|| AppError::input(format!("Unknown color '{name}'.")))
}

fn lookup(key: &str) -> Option<RGBColor> {
    if let Some(hex) = key.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(rest) = key.strip_prefix("xkcd:") {
        return find(XKCD_COLORS, rest);
    }
    if let Some(rest) = key.strip_prefix("tab:") {
        return find(&TABLEAU_COLORS, rest);
    }
    if let Some(digit) = key.strip_prefix('c').and_then(|d| d.parse::<usize>().ok()) {
        return TABLEAU_COLORS.get(digit).map(|&(_, (r, g, b))| RGBColor(r, g, b));
    }

    let short = match key {
        "b" => Some((0, 0, 255)),
        "g" => Some((0, 128, 0)),
        "r" => Some((255, 0, 0)),
        "c" => Some((0, 191, 191)),
        "m" => Some((191, 0, 191)),
        "y" => Some((191, 191, 0)),
        "k" => Some((0, 0, 0)),
        "w" => Some((255, 255, 255)),
        _ => None,
    };
    if let Some((r, g, b)) = short {
        return Some(RGBColor(r, g, b));
    }

    palette::named::from_str(key).map(|c| RGBColor(c.red, c.green, c.blue))
}

fn find(table: &[(&str, (u8, u8, u8))], name: &str) -> Option<RGBColor> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, (r, g, b))| RGBColor(r, g, b))
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Colors assigned to catalogs by index, wrapping around.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    colors: Vec<RGBColor>,
}

impl ColorCycle {
    pub fn parse(names: &[String]) -> Result<Self, AppError> {
        if names.is_empty() {
            return Err(AppError::input("At least one color is required."));
        }
        let colors = names
            .iter()
            .map(|n| parse_color(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    /// Color of catalog `index`: `colors[index mod len]`.
    pub fn color_for(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_COLORS;

    #[test]
    fn default_colors_all_resolve() {
        let names: Vec<String> = DEFAULT_COLORS.iter().map(|s| s.to_string()).collect();
        let cycle = ColorCycle::parse(&names).unwrap();
        assert_eq!(cycle.color_for(0), RGBColor(0, 0, 0));
        assert_eq!(cycle.color_for(1), RGBColor(255, 0, 0));
        assert_eq!(cycle.color_for(2), RGBColor(255, 215, 0));
        assert_eq!(cycle.color_for(3), RGBColor(0, 255, 0));
        assert_eq!(cycle.color_for(4), RGBColor(0x06, 0x9a, 0xf3));
    }

    #[test]
    fn cycle_wraps_by_modulo() {
        let names = vec!["red".to_string(), "#0000ff".to_string()];
        let cycle = ColorCycle::parse(&names).unwrap();
        for n in 0..7 {
            assert_eq!(cycle.color_for(n), cycle.color_for(n % 2));
        }
        assert_eq!(cycle.color_for(5), RGBColor(0, 0, 255));
    }

    #[test]
    fn accepts_shorthands_and_palettes() {
        assert_eq!(parse_color("k").unwrap(), RGBColor(0, 0, 0));
        assert_eq!(parse_color("C1").unwrap(), RGBColor(0xff, 0x7f, 0x0e));
        assert_eq!(parse_color("tab:blue").unwrap(), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(parse_color("xkcd:Sky Blue").unwrap(), RGBColor(0x75, 0xbb, 0xfd));
        assert_eq!(parse_color("#A0b1C2").unwrap(), RGBColor(0xa0, 0xb1, 0xc2));
        assert_eq!(parse_color("SteelBlue").unwrap(), RGBColor(70, 130, 180));
    }

    #[test]
    fn unknown_colors_are_input_errors() {
        for bad in ["not-a-color", "#12345", "#gg0000", "xkcd:nonsense", "C12"] {
            let err = parse_color(bad).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{bad}");
        }
        assert!(ColorCycle::parse(&[]).is_err());
    }
}
