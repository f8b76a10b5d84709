use iced::Color;
use regex::Regex;

/// Two-digit lowercase hex for a single color channel.
///
/// Channel values are not range-checked: anything above 255 produces a
/// hex string longer than two digits, which the caller gets back as-is.
pub fn component_to_hex(c: u32) -> String {
    let hex = format!("{:x}", c);
    if hex.len() == 1 {
        format!("0{}", hex)
    } else {
        hex
    }
}

/// Convert an `rgb(r, g, b)` or `rgba(r, g, b, a)` string to `#rrggbb`.
///
/// Whitespace after the commas is optional and the alpha channel is
/// ignored. Anything that fails to parse comes back as `"#000000"` so a
/// bad color in the dataset never takes the view down.
pub fn rgb_str_to_hex(text: &str) -> String {
    let Ok(re) = Regex::new(r"rgba?\((\d{1,3}), ?(\d{1,3}), ?(\d{1,3})") else {
        return "#000000".to_string();
    };

    match re.captures(text) {
        Some(caps) => {
            let channel = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
            format!(
                "#{}{}{}",
                component_to_hex(channel(1)),
                component_to_hex(channel(2)),
                component_to_hex(channel(3)),
            )
        }
        None => "#000000".to_string(),
    }
}

/// Parse a `#rrggbb` string into a renderer color, black on failure.
pub fn hex_to_color(hex: &str) -> Color {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::BLACK;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).unwrap_or(0) as f32 / 255.0
    };
    Color::from_rgb(channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rgb_string_converts() {
        assert_eq!(rgb_str_to_hex("rgb(255, 0, 16)"), "#ff0010");
        assert_eq!(rgb_str_to_hex("rgb(0,0,0)"), "#000000");
        assert_eq!(rgb_str_to_hex("rgba(12, 34, 56, 0.5)"), "#0c2238");
    }

    #[test]
    fn malformed_color_falls_back_to_black() {
        assert_eq!(rgb_str_to_hex("not-a-color"), "#000000");
        assert_eq!(rgb_str_to_hex(""), "#000000");
        assert_eq!(rgb_str_to_hex("rgb(1, 2)"), "#000000");
        assert_eq!(rgb_str_to_hex("#ff0010"), "#000000");
    }

    #[test]
    fn out_of_range_channel_widens_instead_of_clamping() {
        // Known quirk carried over from the channel formatter: values
        // above 255 keep their full hex width.
        assert_eq!(component_to_hex(999), "3e7");
        assert_eq!(rgb_str_to_hex("rgb(999, 0, 0)"), "#3e70000");
    }

    #[test]
    fn hex_parses_to_renderer_color() {
        let c = hex_to_color("#ff0000");
        assert_eq!((c.r, c.g, c.b), (1.0, 0.0, 0.0));
        assert_eq!(hex_to_color("garbage"), Color::BLACK);
        assert_eq!(hex_to_color("#12345"), Color::BLACK);
    }

    proptest! {
        #[test]
        fn component_hex_round_trips(c in 0u32..=255) {
            let hex = component_to_hex(c);
            prop_assert_eq!(hex.len(), 2);
            prop_assert_eq!(u32::from_str_radix(&hex, 16).unwrap(), c);
        }
    }
}
