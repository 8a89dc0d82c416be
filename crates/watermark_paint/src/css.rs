//! CSS value parsing
//!
//! Only the subset a watermark needs: colors as accepted by a canvas
//! `fillStyle`, and the `"<size>px <family>"` font shorthand.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::{delimited, preceded, terminated},
    IResult,
};

use crate::color::Color;
use crate::text::FontSpec;

/// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`, or a name
pub fn parse_css_color(input: &str) -> Option<Color> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let functional = alt((parse_hex_color, parse_rgb_function));
    if let Ok((_, color)) = all_consuming(functional)(input) {
        return Some(color);
    }

    parse_named_color(input)
}

/// Parse a canvas font shorthand such as `24px Arial, sans-serif`
pub fn parse_font(input: &str) -> Option<FontSpec> {
    let result: IResult<&str, f32> = terminated(
        preceded(multispace0, float),
        preceded(tag_no_case("px"), multispace0),
    )(input);

    let (family, size) = result.ok()?;
    let family = family.trim();
    if family.is_empty() || !size.is_finite() || size <= 0.0 {
        return None;
    }
    Some(FontSpec::new(size, family))
}

fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(ws, char(','), ws)(input)
}

fn channel(input: &str) -> IResult<&str, f32> {
    // Percentages scale to the 0-255 channel range
    let (input, value) = float(input)?;
    let (input, percent) = opt(char('%'))(input)?;
    let value = if percent.is_some() {
        value * 255.0 / 100.0
    } else {
        value
    };
    Ok((input, value.clamp(0.0, 255.0) / 255.0))
}

fn alpha(input: &str) -> IResult<&str, f32> {
    let (input, value) = float(input)?;
    let (input, percent) = opt(char('%'))(input)?;
    let value = if percent.is_some() { value / 100.0 } else { value };
    Ok((input, value.clamp(0.0, 1.0)))
}

/// Parse hex color: #RGB, #RRGGBB, or #RRGGBBAA
fn parse_hex_color(input: &str) -> IResult<&str, Color> {
    let (rest, _) = char('#')(input)?;
    let (rest, hex) = take_while1(|c: char| c.is_ascii_hexdigit())(rest)?;

    let expanded = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 | 8 => hex.to_string(),
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )))
        }
    };

    let value = u32::from_str_radix(&expanded, 16).map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::HexDigit))
    })?;

    let color = if expanded.len() == 8 {
        Color::from_rgba8(
            (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        )
    } else {
        Color::from_hex(value)
    };
    Ok((rest, color))
}

/// Parse `rgb()` or `rgba()` (aliases) in either the comma form
/// `rgb(r, g, b[, a])` or the space form `rgb(r g b[ / a])`
fn parse_rgb_function(input: &str) -> IResult<&str, Color> {
    let (input, _) = terminated(alt((tag_no_case("rgba"), tag_no_case("rgb"))), ws)(input)?;
    let (input, _) = terminated(char('('), ws)(input)?;
    let (input, (r, g, b, a)) = alt((comma_channels, space_channels))(input)?;
    let (input, _) = preceded(ws, char(')'))(input)?;
    Ok((input, Color::new(r, g, b, a.unwrap_or(1.0))))
}

type Channels = (f32, f32, f32, Option<f32>);

fn comma_channels(input: &str) -> IResult<&str, Channels> {
    let (input, r) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, b) = channel(input)?;
    let (input, a) = opt(preceded(comma, alpha))(input)?;
    Ok((input, (r, g, b, a)))
}

fn space_channels(input: &str) -> IResult<&str, Channels> {
    let (input, r) = channel(input)?;
    let (input, _) = multispace1(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = multispace1(input)?;
    let (input, b) = channel(input)?;
    let (input, a) = opt(preceded(delimited(ws, char('/'), ws), alpha))(input)?;
    Ok((input, (r, g, b, a)))
}

/// Parse named colors
fn parse_named_color(name: &str) -> Option<Color> {
    if name.eq_ignore_ascii_case("transparent") {
        return Some(Color::TRANSPARENT);
    }

    let hex = match name.to_ascii_lowercase().as_str() {
        "black" => 0x000000,
        "white" => 0xFFFFFF,
        "red" => 0xFF0000,
        "green" => 0x008000,
        "lime" => 0x00FF00,
        "blue" => 0x0000FF,
        "navy" => 0x000080,
        "yellow" => 0xFFFF00,
        "orange" => 0xFFA500,
        "gold" => 0xFFD700,
        "cyan" | "aqua" => 0x00FFFF,
        "teal" => 0x008080,
        "magenta" | "fuchsia" => 0xFF00FF,
        "purple" => 0x800080,
        "pink" => 0xFFC0CB,
        "brown" => 0xA52A2A,
        "maroon" => 0x800000,
        "olive" => 0x808000,
        "silver" => 0xC0C0C0,
        "gray" | "grey" => 0x808080,
        "darkgray" | "darkgrey" => 0xA9A9A9,
        "lightgray" | "lightgrey" => 0xD3D3D3,
        "whitesmoke" => 0xF5F5F5,
        _ => return None,
    };
    Some(Color::from_hex(hex))
}
