//! Typed accessors over [`Element`] trees.
//!
//! The documents handled here follow a small set of conventions: scalars
//! live in a `value=` attribute of a named child, vectors in `x`/`y`/`z`
//! (and `w`) attributes, free text and whitespace-joined lists in the
//! element body, and list containers hold `<Item>` entries.

use glam::{Quat, Vec2, Vec3, Vec4};

use crate::{Element, XmlError};

/// Scalar types that can live in a `value=` attribute or in element text.
pub trait XmlScalar: Sized {
    fn parse_xml(text: &str) -> Option<Self>;
    fn to_xml(&self) -> String;
}

macro_rules! int_scalar {
    ($($t:ty),+) => {
        $(impl XmlScalar for $t {
            fn parse_xml(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }

            fn to_xml(&self) -> String {
                self.to_string()
            }
        })+
    };
}

int_scalar!(u8, i8, u16, i16, u32, i32, u64, i64);

impl XmlScalar for bool {
    fn parse_xml(text: &str) -> Option<Self> {
        match text.trim() {
            "true" | "True" | "1" => Some(true),
            "false" | "False" | "0" => Some(false),
            _ => None,
        }
    }

    fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl XmlScalar for f32 {
    fn parse_xml(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn to_xml(&self) -> String {
        fmt_f32(*self)
    }
}

impl XmlScalar for String {
    fn parse_xml(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }

    fn to_xml(&self) -> String {
        self.clone()
    }
}

/// Formats with 7 significant digits and trailing zeros stripped, the
/// precision the reference exporter uses for positions and directions.
pub fn fmt_f32(value: f32) -> String {
    if value == 0.0 || !value.is_finite() {
        // also collapses -0.0
        return "0".to_owned();
    }
    let exponent = value.abs().log10().floor() as i32;
    let decimals = (6 - exponent).clamp(0, 9) as usize;
    let mut text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

fn parse_scalar<T: XmlScalar>(owner: &Element, raw: &str, what: &str) -> Result<T, XmlError> {
    T::parse_xml(raw).ok_or_else(|| {
        XmlError::schema(
            &owner.name,
            format!("{} has ill-typed value \"{}\"", what, raw),
        )
    })
}

/// Reads a required `<name value="…"/>` child.
pub fn read_value<T: XmlScalar>(parent: &Element, name: &str) -> Result<T, XmlError> {
    let child = parent.expect_child(name)?;
    let raw = child
        .attr("value")
        .ok_or_else(|| XmlError::schema(name, "missing value attribute"))?;
    parse_scalar(child, raw, "value attribute")
}

/// Reads an optional `<name value="…"/>` child, `default` when absent.
/// A present but ill-typed value is still an error.
pub fn read_value_or<T: XmlScalar>(parent: &Element, name: &str, default: T) -> Result<T, XmlError> {
    match parent.child(name).and_then(|c| c.attr("value").map(|v| (c, v))) {
        Some((child, raw)) => parse_scalar(child, raw, "value attribute"),
        None => Ok(default),
    }
}

pub fn write_value<T: XmlScalar>(parent: &mut Element, name: &str, value: &T) {
    parent.push(Element::new(name).with_attr("value", value.to_xml()));
}

/// Reads a required attribute off the element itself (`type=`, `value=`).
pub fn read_attr<T: XmlScalar>(element: &Element, key: &str) -> Result<T, XmlError> {
    let raw = element
        .attr(key)
        .ok_or_else(|| XmlError::schema(&element.name, format!("missing attribute {}", key)))?;
    parse_scalar(element, raw, key)
}

fn vec_component(element: &Element, key: &str) -> Result<f32, XmlError> {
    let raw = element
        .attr(key)
        .ok_or_else(|| XmlError::schema(&element.name, format!("missing {} component", key)))?;
    parse_scalar(element, raw, key)
}

pub fn read_vec3(parent: &Element, name: &str) -> Result<Vec3, XmlError> {
    let child = parent.expect_child(name)?;
    Ok(Vec3::new(
        vec_component(child, "x")?,
        vec_component(child, "y")?,
        vec_component(child, "z")?,
    ))
}

pub fn read_vec3_or(parent: &Element, name: &str, default: Vec3) -> Result<Vec3, XmlError> {
    match parent.child(name) {
        Some(_) => read_vec3(parent, name),
        None => Ok(default),
    }
}

pub fn write_vec3(parent: &mut Element, name: &str, v: Vec3) {
    parent.push(
        Element::new(name)
            .with_attr("x", fmt_f32(v.x))
            .with_attr("y", fmt_f32(v.y))
            .with_attr("z", fmt_f32(v.z)),
    );
}

pub fn read_vec4(parent: &Element, name: &str) -> Result<Vec4, XmlError> {
    let child = parent.expect_child(name)?;
    Ok(Vec4::new(
        vec_component(child, "x")?,
        vec_component(child, "y")?,
        vec_component(child, "z")?,
        vec_component(child, "w")?,
    ))
}

pub fn write_vec4(parent: &mut Element, name: &str, v: Vec4) {
    parent.push(
        Element::new(name)
            .with_attr("x", fmt_f32(v.x))
            .with_attr("y", fmt_f32(v.y))
            .with_attr("z", fmt_f32(v.z))
            .with_attr("w", fmt_f32(v.w)),
    );
}

pub fn read_quat(parent: &Element, name: &str) -> Result<Quat, XmlError> {
    let child = parent.expect_child(name)?;
    Ok(Quat::from_xyzw(
        vec_component(child, "x")?,
        vec_component(child, "y")?,
        vec_component(child, "z")?,
        vec_component(child, "w")?,
    ))
}

pub fn read_quat_or(parent: &Element, name: &str, default: Quat) -> Result<Quat, XmlError> {
    match parent.child(name) {
        Some(_) => read_quat(parent, name),
        None => Ok(default),
    }
}

pub fn write_quat(parent: &mut Element, name: &str, q: Quat) {
    parent.push(
        Element::new(name)
            .with_attr("x", fmt_f32(q.x))
            .with_attr("y", fmt_f32(q.y))
            .with_attr("z", fmt_f32(q.z))
            .with_attr("w", fmt_f32(q.w)),
    );
}

pub fn read_vec2(parent: &Element, name: &str) -> Result<Vec2, XmlError> {
    let child = parent.expect_child(name)?;
    Ok(Vec2::new(
        vec_component(child, "x")?,
        vec_component(child, "y")?,
    ))
}

pub fn write_vec2(parent: &mut Element, name: &str, v: Vec2) {
    parent.push(
        Element::new(name)
            .with_attr("x", fmt_f32(v.x))
            .with_attr("y", fmt_f32(v.y)),
    );
}

/// Body text of an optional child, empty when absent.
pub fn read_text(parent: &Element, name: &str) -> String {
    parent
        .child(name)
        .map(|c| c.text.trim().to_owned())
        .unwrap_or_default()
}

pub fn write_text(parent: &mut Element, name: &str, text: &str) {
    let mut child = Element::new(name);
    if !text.is_empty() {
        child.text = text.to_owned();
    }
    parent.push(child);
}

/// Whitespace-separated scalars in the element body.
pub fn read_text_list<T: XmlScalar>(parent: &Element, name: &str) -> Result<Vec<T>, XmlError> {
    let Some(child) = parent.child(name) else {
        return Ok(Vec::new());
    };
    child
        .text
        .split_whitespace()
        .map(|token| parse_scalar(child, token, "list entry"))
        .collect()
}

pub fn write_text_list<T: XmlScalar>(parent: &mut Element, name: &str, values: &[T]) {
    let text = values
        .iter()
        .map(XmlScalar::to_xml)
        .collect::<Vec<_>>()
        .join(" ");
    write_text(parent, name, &text);
}

/// Splits a comma-or-whitespace separated token list ("Polygons, Vehicle").
pub fn split_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(", ")
}

/// Pushes an empty `<name/>` container with the given items, or just the
/// empty tag when there are none.
pub fn write_items(parent: &mut Element, name: &str, items: Vec<Element>) {
    let mut container = Element::new(name);
    container.children = items;
    parent.push(container);
}
