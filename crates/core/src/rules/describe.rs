use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::{display_value, is_set, WeaponDef};

/// Description shown for an empty or unrecognised weapon selection.
pub const NO_DATA: &str = "No Data";

const NONE: &str = "None";

static STRENGTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d*[dD]\d+|\d+(?:\.\d+)?)(?:[+-](?:\d*[dD]\d+|\d+(?:\.\d+)?))*$")
        .expect("invalid strength regex")
});

static TERM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+-]?)(?:(\d*)[dD](\d+)|(\d+(?:\.\d+)?))").expect("invalid strength term regex")
});

/// Every attribute of a weapon as `key: value` lines.
pub fn describe_weapon(weapon: &WeaponDef) -> String {
    let fields = [
        ("weight", weapon.weight.as_ref()),
        ("aim_assist", weapon.aim_assist.as_ref()),
        ("strength", weapon.strength.as_ref()),
        ("damage", weapon.damage.as_ref()),
        ("range", weapon.range.as_ref()),
    ];
    let mut lines: Vec<String> = fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| format!("{key}: {}", display_value(value))))
        .collect();
    if !weapon.keywords.is_empty() {
        lines.push(format!("keywords: {}", weapon.keywords.join(", ")));
    }
    lines.extend(
        weapon
            .extra
            .iter()
            .map(|(key, value)| format!("{key}: {}", display_value(value))),
    );
    lines.join("\n")
}

/// Fixed-format weapon card: damage type, aim assist, strength, damage,
/// range and remaining keywords.
pub fn weapon_summary(weapon: Option<&WeaponDef>) -> String {
    let Some(weapon) = weapon else {
        return NO_DATA.to_string();
    };

    let aim = match &weapon.aim_assist {
        Some(Value::Number(number)) => number
            .as_f64()
            .map(|aim| (aim.round() as i64).to_string())
            .unwrap_or_else(|| number.to_string()),
        other => shown_or_none(other.as_ref()),
    };
    let strength = match &weapon.strength {
        Some(Value::String(raw)) if !raw.is_empty() => parse_strength(raw)
            .map(|expr| expr.to_string())
            .unwrap_or_else(|| raw.clone()),
        other => shown_or_none(other.as_ref()),
    };
    let tags = weapon.tags();

    format!(
        "Damage Type: {}\nAim Assist: {}\nStrength: {}\nDamage: {}\nRange: {}\nKeywords: {}",
        weapon.damage_type().unwrap_or(NONE),
        aim,
        strength,
        shown_or_none(weapon.damage.as_ref()),
        shown_or_none(weapon.range.as_ref()),
        if tags.is_empty() {
            NONE.to_string()
        } else {
            tags.join(", ")
        }
    )
}

fn shown_or_none(value: Option<&Value>) -> String {
    match value {
        Some(value) if is_set(Some(value)) => display_value(value),
        _ => NONE.to_string(),
    }
}

/// One term of a strength expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrengthTerm {
    /// Plain number.
    Flat(f64),
    /// `NdS` dice roll; `count` is absent for the `dS` shorthand.
    Dice {
        /// Number of dice.
        count: Option<u32>,
        /// Sides per die.
        sides: u32,
    },
}

/// Parsed strength: signed terms joined by `+` or `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthExpr {
    terms: Vec<(bool, StrengthTerm)>,
}

impl StrengthExpr {
    /// Sum of the expression when it contains no dice.
    pub fn constant(&self) -> Option<f64> {
        self.terms
            .iter()
            .map(|(negative, term)| match term {
                StrengthTerm::Flat(value) if *negative => Some(-value),
                StrengthTerm::Flat(value) => Some(*value),
                StrengthTerm::Dice { .. } => None,
            })
            .sum()
    }
}

impl fmt::Display for StrengthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(total) = self.constant() {
            return write!(f, "{total}");
        }
        for (index, (negative, term)) in self.terms.iter().enumerate() {
            if *negative {
                f.write_str("-")?;
            } else if index > 0 {
                f.write_str("+")?;
            }
            match term {
                StrengthTerm::Flat(value) => write!(f, "{value}")?,
                StrengthTerm::Dice { count, sides } => {
                    if let Some(count) = count {
                        write!(f, "{count}")?;
                    }
                    write!(f, "d{sides}")?;
                }
            }
        }
        Ok(())
    }
}

/// Parse a strength field: numbers and dice (`2d6`, `d6`) joined by `+`/`-`.
///
/// Whitespace is ignored. Anything outside that grammar yields `None` and is
/// shown verbatim by [`weapon_summary`].
pub fn parse_strength(raw: &str) -> Option<StrengthExpr> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if !STRENGTH_RE.is_match(&compact) {
        return None;
    }

    let mut terms = Vec::new();
    for caps in TERM_RE.captures_iter(&compact) {
        let negative = caps.get(1).map(|m| m.as_str() == "-").unwrap_or(false);
        let term = match (caps.get(3), caps.get(4)) {
            (Some(sides), _) => {
                let count = caps
                    .get(2)
                    .map(|m| m.as_str())
                    .filter(|count| !count.is_empty())
                    .map(str::parse)
                    .transpose()
                    .ok()?;
                StrengthTerm::Dice {
                    count,
                    sides: sides.as_str().parse().ok()?,
                }
            }
            (None, Some(value)) => StrengthTerm::Flat(value.as_str().parse().ok()?),
            (None, None) => return None,
        };
        terms.push((negative, term));
    }
    Some(StrengthExpr { terms })
}
