//! Attribute text parsing.

use std::collections::HashMap;

use crate::math::Color;

use super::{AttributeError, AttributeResult};

/// Split a comma separated list, trimming every item. Empty text is an empty list.
pub fn split_list(text: &str) -> Vec<&str> {
	if text.trim().is_empty() {
		return Vec::new();
	}
	text.split(',').map(str::trim).collect()
}

pub fn parse_list<T>(text: &str, parse: impl Fn(&str) -> AttributeResult<T>) -> AttributeResult<Vec<T>> {
	split_list(text).into_iter().map(parse).collect()
}

pub fn parse_bool(text: &str) -> AttributeResult<bool> {
	let text = text.trim();
	if ["true", "yes", "on", "1"].iter().any(|t| text.eq_ignore_ascii_case(t)) {
		Ok(true)
	} else if ["false", "no", "off", "0"].iter().any(|t| text.eq_ignore_ascii_case(t)) {
		Ok(false)
	} else {
		Err(AttributeError::NotBool(text.to_owned()))
	}
}

fn hex_digits(text: &str) -> Option<&str> {
	text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

/// Decimal or `0x` prefixed hexadecimal.
pub fn parse_u32(text: &str) -> AttributeResult<u32> {
	let text = text.trim();
	let parsed = match hex_digits(text) {
		Some(hex) => u32::from_str_radix(hex, 16),
		None => text.parse::<u32>(),
	};
	parsed.map_err(|_| AttributeError::NotInteger(text.to_owned()))
}

/// Signed decimal, or `0x` prefixed hexadecimal reinterpreted as two's complement.
pub fn parse_i32(text: &str) -> AttributeResult<i32> {
	let text = text.trim();
	let parsed = match hex_digits(text) {
		Some(hex) => u32::from_str_radix(hex, 16).map(|bits| bits as i32),
		None => text.parse::<i32>(),
	};
	parsed.map_err(|_| AttributeError::NotInteger(text.to_owned()))
}

pub fn parse_f32(text: &str) -> AttributeResult<f32> {
	let text = text.trim();
	text.parse::<f32>().map_err(|_| AttributeError::NotNumber(text.to_owned()))
}

pub fn parse_f64(text: &str) -> AttributeResult<f64> {
	let text = text.trim();
	text.parse::<f64>().map_err(|_| AttributeError::NotNumber(text.to_owned()))
}

/// Number with an optional unit suffix, converted to radians.
///
/// `deg`/`d` mark degrees, `rad`/`r` or no suffix mark radians.
pub fn parse_angle(text: &str) -> AttributeResult<f64> {
	let text = text.trim();
	let err = || AttributeError::NotAngle(text.to_owned());

	let (number, degrees) = if let Some(n) = text.strip_suffix("deg") {
		(n, true)
	} else if let Some(n) = text.strip_suffix("rad") {
		(n, false)
	} else if let Some(n) = text.strip_suffix('d') {
		(n, true)
	} else if let Some(n) = text.strip_suffix('r') {
		(n, false)
	} else {
		(text, false)
	};

	let value = number.trim().parse::<f64>().map_err(|_| err())?;
	Ok(if degrees { value.to_radians() } else { value })
}

/// `#RRGGBB`, `#RRGGBBAA`, or 3 to 4 comma separated float components.
pub fn parse_color(text: &str) -> AttributeResult<Color> {
	let text = text.trim();
	if let Some(hex) = text.strip_prefix('#') {
		return parse_hex_color(hex).ok_or_else(|| AttributeError::NotColor(text.to_owned()));
	}

	let components = parse_list(text, parse_f32).map_err(|_| AttributeError::NotColor(text.to_owned()))?;
	match components[..] {
		[r, g, b] => Ok(Color::new(r, g, b, 1.0)),
		[r, g, b, a] => Ok(Color::new(r, g, b, a)),
		_ => Err(AttributeError::NotColor(text.to_owned())),
	}
}

fn parse_hex_color(hex: &str) -> Option<Color> {
	let value = u32::from_str_radix(hex, 16).ok()?;
	match hex.len() {
		6 => Some(Color::from_rgba_u32((value << 8) | 0xff)),
		8 => Some(Color::from_rgba_u32(value)),
		_ => None,
	}
}

/// Either a list of `#` hex colors, or a flat float list of 4 components per color.
pub fn parse_colors(text: &str) -> AttributeResult<Vec<Color>> {
	let items = split_list(text);
	if items.iter().all(|item| item.starts_with('#')) {
		return items.into_iter().map(parse_color).collect();
	}

	let floats = items.into_iter().map(parse_f32).collect::<AttributeResult<Vec<_>>>()?;
	if floats.len() % 4 != 0 {
		return Err(AttributeError::WrongComponentCount {
			expected: 4,
			got: floats.len(),
		});
	}
	Ok(floats
		.chunks_exact(4)
		.map(|c| Color::new(c[0], c[1], c[2], c[3]))
		.collect())
}

/// Comma separated bit numbers as a mask.
pub fn parse_bits(text: &str) -> AttributeResult<u32> {
	let mut mask = 0;
	for item in split_list(text) {
		let bit = item
			.parse::<u32>()
			.ok()
			.filter(|bit| *bit < u32::BITS)
			.ok_or_else(|| AttributeError::NotBitNumber(item.to_owned()))?;
		mask |= 1 << bit;
	}
	Ok(mask)
}

pub fn parse_enum(text: &str, names: &[&str]) -> AttributeResult<usize> {
	let text = text.trim();
	names
		.iter()
		.position(|name| *name == text)
		.ok_or_else(|| AttributeError::UnknownEnumName {
			name: text.to_owned(),
			expected: names.iter().map(|name| (*name).to_owned()).collect(),
		})
}

/// Comma separated enum names as a mask of `1 << position` bits.
pub fn parse_enum_bits(text: &str, names: &[&str]) -> AttributeResult<u32> {
	let mut mask = 0;
	for position in parse_list(text, |item| parse_enum(item, names))? {
		if position >= u32::BITS as usize {
			return Err(AttributeError::NotBitNumber(names[position].to_owned()));
		}
		mask |= 1 << position;
	}
	Ok(mask)
}

/// Substitute `{name}` references with values from `params`.
pub fn evaluate_params(text: &str, params: &HashMap<String, String>) -> AttributeResult<String> {
	let mut out = String::with_capacity(text.len());
	let mut rest = text;
	while let Some(start) = rest.find('{') {
		out.push_str(&rest[..start]);
		let after = &rest[start + 1..];
		let end = after
			.find('}')
			.ok_or_else(|| AttributeError::UnterminatedParameter(text.to_owned()))?;
		let name = after[..end].trim();
		let value = params
			.get(name)
			.ok_or_else(|| AttributeError::UnknownParameter(name.to_owned()))?;
		out.push_str(value);
		rest = &after[end + 1..];
	}
	out.push_str(rest);
	Ok(out)
}
