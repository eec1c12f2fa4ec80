//! Name and value transforms
//!
//! A transform group (`compose` or `ios-swift`) decides how each token kind is
//! rendered as a source-code literal. Named transforms layered on top of the
//! group adjust that behaviour for one platform configuration.

use super::math::format_number;
use super::token::Token;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Base px size used to convert `rem` values
const REM_BASE_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformGroup {
    #[serde(rename = "compose")]
    Compose,
    #[serde(rename = "ios-swift")]
    IosSwift,
}

impl TransformGroup {
    pub fn name(&self) -> &'static str {
        match self {
            TransformGroup::Compose => "compose",
            TransformGroup::IosSwift => "ios-swift",
        }
    }
}

impl fmt::Display for TransformGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named transform applied on top of a transform group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transform {
    /// Token names in lowerCamelCase
    #[serde(rename = "name/camel")]
    NameCamel,

    /// Token names in UpperCamelCase
    #[serde(rename = "name/pascal")]
    NamePascal,

    /// Composite typography rendered as one `TextStyle(...)` expression
    #[serde(rename = "typography/compose/shorthand")]
    TypographyComposeShorthand,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::NameCamel => "name/camel",
            Transform::NamePascal => "name/pascal",
            Transform::TypographyComposeShorthand => "typography/compose/shorthand",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One generated member (`val name = value` / `static let name = value`)
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub value: String,
}

/// A token after transformation for one platform
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
    /// Usually one entry; expanded composites produce one per field
    pub entries: Vec<Entry>,
    /// Dotted path of the aliased token when authored as `{...}`
    pub alias_of: Option<String>,
}

/// Transforms resolved for one platform configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    pub group: TransformGroup,
    pub pascal_names: bool,
    pub typography_shorthand: bool,
}

impl TransformContext {
    pub fn new(group: TransformGroup, transforms: &[Transform]) -> Self {
        let mut ctx = Self {
            group,
            pascal_names: false,
            typography_shorthand: false,
        };
        for transform in transforms {
            match transform {
                Transform::NameCamel => ctx.pascal_names = false,
                Transform::NamePascal => ctx.pascal_names = true,
                Transform::TypographyComposeShorthand => ctx.typography_shorthand = true,
            }
        }
        ctx
    }

    pub fn name(&self, segments: &[String]) -> String {
        let camel = camel_case(segments);
        if self.pascal_names {
            capitalize(&camel)
        } else {
            camel
        }
    }

    /// Transform one resolved token
    pub fn render(&self, token: &Token) -> Rendered {
        let name = self.name(&token.path);
        let alias_of = token
            .original
            .as_str()
            .and_then(super::resolve::whole_reference)
            .map(str::to_string);

        let entries = match (&token.value, token.kind()) {
            (Value::Object(_), Some("typography"))
                if self.typography_shorthand && self.group == TransformGroup::Compose =>
            {
                vec![Entry {
                    name: name.clone(),
                    value: compose_text_style(&token.value),
                }]
            }
            (Value::Object(_), _) | (Value::Array(_), _) => self.expand(&name, &token.value),
            (value, kind) => vec![Entry {
                name: name.clone(),
                value: self.literal(value, kind),
            }],
        };

        Rendered {
            name,
            path: token.dotted_path(),
            description: token.description.clone(),
            entries,
            alias_of,
        }
    }

    /// One entry per composite field, `<name><Field>`
    fn expand(&self, name: &str, value: &Value) -> Vec<Entry> {
        match value {
            Value::Array(items) if items.len() == 1 => self.expand(name, &items[0]),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .flat_map(|(i, item)| self.expand(&format!("{}{}", name, i + 1), item))
                .collect(),
            Value::Object(fields) => fields
                .iter()
                .map(|(field, field_value)| Entry {
                    name: format!("{}{}", name, capitalize(&camel_case(&[field.clone()]))),
                    value: self.literal(field_value, field_kind(field)),
                })
                .collect(),
            other => vec![Entry {
                name: name.to_string(),
                value: self.literal(other, None),
            }],
        }
    }

    /// Render a scalar value of the given kind
    pub fn literal(&self, value: &Value, kind: Option<&str>) -> String {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => return b.to_string(),
            Value::Null => return self.string_literal(""),
            other => return self.string_literal(&other.to_string()),
        };

        let rendered = match kind {
            Some("color") => parse_color(&text).map(|c| self.color(c)),
            Some("fontSizes") => self.dimension(&text, DimensionUnit::Sp),
            Some("lineHeights") | Some("letterSpacing") => {
                self.dimension(&text, DimensionUnit::Sp)
            }
            Some(
                "spacing" | "sizing" | "borderRadius" | "borderWidth" | "dimension"
                | "paragraphSpacing" | "paragraphIndent",
            ) => self.dimension(&text, DimensionUnit::Dp),
            Some("fontWeights") => font_weight(&text).map(|w| self.font_weight(w)),
            Some("opacity") => parse_ratio(&text).map(|v| self.float(v)),
            Some("number") => text.trim().parse::<f64>().ok().map(|v| self.number(v)),
            _ => None,
        };

        match rendered {
            Some(literal) => literal,
            None => {
                if matches!(
                    kind,
                    Some("color" | "fontSizes" | "spacing" | "sizing" | "dimension" | "opacity")
                ) {
                    warn!("Could not transform {:?} value '{}', emitting a string", kind, text);
                }
                self.string_literal(&text)
            }
        }
    }

    fn color(&self, c: Rgba) -> String {
        match self.group {
            TransformGroup::Compose => format!(
                "Color(0x{:02X}{:02X}{:02X}{:02X})",
                (c.a * 255.0).round() as u8,
                c.r,
                c.g,
                c.b
            ),
            TransformGroup::IosSwift => format!(
                "UIColor(red: {:.3}, green: {:.3}, blue: {:.3}, alpha: {})",
                c.r as f64 / 255.0,
                c.g as f64 / 255.0,
                c.b as f64 / 255.0,
                format_number(c.a)
            ),
        }
    }

    fn dimension(&self, text: &str, unit: DimensionUnit) -> Option<String> {
        let (value, suffix) = split_unit(text)?;
        let (value, unit) = match suffix {
            "" | "px" | "dp" | "pt" | "sp" => (value, unit),
            "rem" => (value * REM_BASE_PX, unit),
            // Relative to font size
            "%" => (value / 100.0, DimensionUnit::Em),
            "em" => (value, DimensionUnit::Em),
            _ => return None,
        };

        Some(match self.group {
            TransformGroup::Compose => format!("{}.{}", format_number(value), unit.suffix()),
            TransformGroup::IosSwift => format!("CGFloat({})", format_number(value)),
        })
    }

    fn font_weight(&self, weight: u16) -> String {
        match self.group {
            TransformGroup::Compose => format!("FontWeight({})", weight),
            TransformGroup::IosSwift => {
                let name = match weight {
                    0..=149 => "ultraLight",
                    150..=249 => "thin",
                    250..=349 => "light",
                    350..=449 => "regular",
                    450..=549 => "medium",
                    550..=649 => "semibold",
                    650..=749 => "bold",
                    750..=849 => "heavy",
                    _ => "black",
                };
                format!("UIFont.Weight.{}", name)
            }
        }
    }

    fn float(&self, value: f64) -> String {
        match self.group {
            TransformGroup::Compose => format!("{}f", format_number(value)),
            TransformGroup::IosSwift => format!("CGFloat({})", format_number(value)),
        }
    }

    fn number(&self, value: f64) -> String {
        if value.fract() == 0.0 {
            format_number(value)
        } else {
            self.float(value)
        }
    }

    fn string_literal(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for c in text.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '$' if self.group == TransformGroup::Compose => out.push_str("\\$"),
                c if c.is_control() => match self.group {
                    TransformGroup::Compose => out.push_str(&format!("\\u{:04x}", c as u32)),
                    TransformGroup::IosSwift => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
                },
                other => out.push(other),
            }
        }
        out.push('"');
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DimensionUnit {
    Dp,
    Sp,
    Em,
}

impl DimensionUnit {
    fn suffix(&self) -> &'static str {
        match self {
            DimensionUnit::Dp => "dp",
            DimensionUnit::Sp => "sp",
            DimensionUnit::Em => "em",
        }
    }
}

/// Kind implied by a composite field name
pub(crate) fn field_kind(field: &str) -> Option<&'static str> {
    Some(match field {
        "fontFamily" => "fontFamilies",
        "fontWeight" => "fontWeights",
        "fontSize" => "fontSizes",
        "lineHeight" => "lineHeights",
        "letterSpacing" => "letterSpacing",
        "paragraphSpacing" => "paragraphSpacing",
        "paragraphIndent" => "paragraphIndent",
        "color" => "color",
        "width" => "borderWidth",
        "x" | "y" | "blur" | "spread" => "dimension",
        _ => return None,
    })
}

/// `TextStyle(...)` for a composite typography value
fn compose_text_style(value: &Value) -> String {
    let ctx = TransformContext::new(TransformGroup::Compose, &[]);
    let mut args = Vec::new();

    let get = |key: &str| value.get(key).filter(|v| !v.is_null());
    if let Some(size) = get("fontSize") {
        args.push(format!("fontSize = {}", ctx.literal(size, Some("fontSizes"))));
    }
    if let Some(weight) = get("fontWeight") {
        args.push(format!(
            "fontWeight = {}",
            ctx.literal(weight, Some("fontWeights"))
        ));
    }
    if let Some(line_height) = get("lineHeight") {
        args.push(format!(
            "lineHeight = {}",
            ctx.literal(line_height, Some("lineHeights"))
        ));
    }
    if let Some(spacing) = get("letterSpacing") {
        args.push(format!(
            "letterSpacing = {}",
            ctx.literal(spacing, Some("letterSpacing"))
        ));
    }
    if let Some(decoration) = get("textDecoration").and_then(Value::as_str) {
        let decoration = match decoration {
            "underline" => Some("TextDecoration.Underline"),
            "line-through" | "lineThrough" => Some("TextDecoration.LineThrough"),
            "none" => Some("TextDecoration.None"),
            _ => None,
        };
        if let Some(decoration) = decoration {
            args.push(format!("textDecoration = {}", decoration));
        }
    }

    format!("TextStyle({})", args.join(", "))
}

/// Split path segments into words and join them in lowerCamelCase
pub fn camel_case(segments: &[String]) -> String {
    let mut words: Vec<String> = Vec::new();
    for segment in segments {
        let mut current = String::new();
        let mut prev_lower = false;
        for c in segment.chars() {
            if !c.is_ascii_alphanumeric() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&capitalize(&lower));
        }
    }

    // Identifiers cannot start with a digit
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Split `"16px"` into `(16.0, "px")`
fn split_unit(text: &str) -> Option<(f64, &str)> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(text.len());
    let value = text[..split].parse::<f64>().ok()?;
    Some((value, text[split..].trim()))
}

/// `"50%"` → 0.5, `"0.5"` → 0.5
fn parse_ratio(text: &str) -> Option<f64> {
    let (value, unit) = split_unit(text)?;
    match unit {
        "" => Some(value),
        "%" => Some(value / 100.0),
        _ => None,
    }
}

fn font_weight(text: &str) -> Option<u16> {
    if let Ok(weight) = text.trim().parse::<u16>() {
        return Some(weight);
    }
    let normalized: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    Some(match normalized.as_str() {
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" => 300,
        "regular" | "normal" | "book" => 400,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "extrabold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgba {
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}

fn parse_color(text: &str) -> Option<Rgba> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let (body, has_alpha) = if let Some(body) = text.strip_prefix("rgba(") {
        (body, true)
    } else if let Some(body) = text.strip_prefix("rgb(") {
        (body, false)
    } else {
        return None;
    };
    let parts: Vec<&str> = body.strip_suffix(')')?.split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: if has_alpha {
            parse_ratio(parts[3])?.clamp(0.0, 1.0)
        } else {
            1.0
        },
    })
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let a = if expanded.len() == 8 {
        byte(6)? as f64 / 255.0
    } else {
        1.0
    };
    Some(Rgba {
        r: byte(0)?,
        g: byte(2)?,
        b: byte(4)?,
        a: (a * 100.0).round() / 100.0,
    })
}
