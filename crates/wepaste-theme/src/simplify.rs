//! Minimal CSS simplification.
//!
//! Reduces trivial `calc()` expressions to literal values so the destination
//! editor, which drops `calc()` entirely, still gets usable numbers.

use std::sync::LazyLock;

use regex::Regex;

static SIMPLE_CALC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"calc\(\s*(-?[\d.]+)(px|em|rem|%)?\s*([+\-*/])\s*(-?[\d.]+)(px|em|rem|%)?\s*\)",
    )
    .expect("invalid calc regex")
});

/// Reduce `calc(a op b)` where the operand units allow a literal result.
///
/// Additions and subtractions need matching (or absent) units; products need
/// at most one unit; quotients need a unitless divisor. Anything else is
/// left as written.
#[must_use]
pub fn simplify_css(css: &str) -> String {
    SIMPLE_CALC
        .replace_all(css, |caps: &regex::Captures| {
            reduce(caps).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

fn reduce(caps: &regex::Captures) -> Option<String> {
    let a: f64 = caps[1].parse().ok()?;
    let b: f64 = caps[4].parse().ok()?;
    let unit_a = caps.get(2).map_or("", |m| m.as_str());
    let unit_b = caps.get(5).map_or("", |m| m.as_str());
    let op = &caps[3];

    let (value, unit) = match op {
        "+" | "-" if unit_a == unit_b => {
            let v = if op == "+" { a + b } else { a - b };
            (v, unit_a)
        }
        "*" if unit_a.is_empty() || unit_b.is_empty() => {
            (a * b, if unit_a.is_empty() { unit_b } else { unit_a })
        }
        "/" if unit_b.is_empty() && b != 0.0 => (a / b, unit_a),
        _ => return None,
    };

    // Trim trailing zeros so 24.0px prints as 24px.
    let mut text = format!("{value:.4}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    Some(format!("{text}{unit}"))
}
