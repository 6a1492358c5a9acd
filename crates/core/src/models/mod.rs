//! Shared domain models.

mod mech;

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ParseSlotError, RosterError};

pub use mech::{ConfiguredMech, MechId, MechTemplate};

/// Named equipment position on a mech.
///
/// The derived ordering is the canonical slot order used when listing or
/// saving a loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Left arm mount.
    LeftArm,
    /// Right arm mount.
    RightArm,
    /// Left back mount.
    BackLeft,
    /// Right back mount.
    BackRight,
}

impl Slot {
    /// Every slot in canonical order.
    pub const ALL: [Slot; 4] = [Slot::LeftArm, Slot::RightArm, Slot::BackLeft, Slot::BackRight];

    /// Slots present on every configured mech.
    pub const ARMS: [Slot; 2] = [Slot::LeftArm, Slot::RightArm];

    /// Identifier used in save files.
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::LeftArm => "left_arm",
            Slot::RightArm => "right_arm",
            Slot::BackLeft => "back_left",
            Slot::BackRight => "back_right",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Slot::LeftArm => "Left Arm Weapon",
            Slot::RightArm => "Right Arm Weapon",
            Slot::BackLeft => "Left Back Weapon",
            Slot::BackRight => "Right Back Weapon",
        }
    }

    /// Whether the slot takes back weapons rather than arm weapons.
    pub fn is_back(self) -> bool {
        matches!(self, Slot::BackLeft | Slot::BackRight)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s.trim())
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

/// Capacity tier of a mech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeightClass {
    /// Carries up to 15.
    Light,
    /// Carries up to 20.
    #[default]
    Medium,
    /// Carries up to 25.
    Heavy,
}

impl WeightClass {
    /// Case-insensitive match against `light`, `medium` or `heavy`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "medium" => Some(Self::Medium),
            "heavy" => Some(Self::Heavy),
            _ => None,
        }
    }

    /// Resolve the class from a declared type and a keyword list.
    ///
    /// The first keyword naming a class overrides the declared type; an
    /// unrecognised or missing type falls back to medium.
    pub fn resolve(mech_type: Option<&str>, keywords: &[String]) -> Self {
        keywords
            .iter()
            .find_map(|keyword| Self::parse(keyword))
            .or_else(|| mech_type.and_then(Self::parse))
            .unwrap_or_default()
    }

    /// Maximum carrying weight of the class.
    pub fn max_carry(self) -> f64 {
        match self {
            Self::Light => 15.0,
            Self::Medium => 20.0,
            Self::Heavy => 25.0,
        }
    }

    /// Lowercase class name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arm or back weapon definition.
///
/// Display fields are kept as raw JSON values; only `weight` is interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeaponDef {
    /// Catalog key.
    #[serde(default, skip_serializing)]
    pub name: String,
    /// Weight counted against the carrying capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    /// Aim assist rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim_assist: Option<Value>,
    /// Strength, either a number or dice notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<Value>,
    /// Damage value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<Value>,
    /// Range value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Value>,
    /// Damage type followed by tags.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Attributes the rules do not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WeaponDef {
    /// Weapon with a numeric weight and no display data.
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight: if weight >= 0.0 && weight.fract() == 0.0 {
                Some(Value::from(weight as u64))
            } else {
                serde_json::Number::from_f64(weight).map(Value::Number)
            },
            ..Self::default()
        }
    }

    /// Numeric weight; absent counts as zero.
    pub fn weight(&self) -> Result<f64, RosterError> {
        let malformed = |value: &Value| RosterError::MalformedCatalogData {
            item: self.name.clone(),
            field: "weight",
            value: value.to_string(),
        };
        match &self.weight {
            None | Some(Value::Null) => Ok(0.0),
            Some(value @ Value::Number(number)) => number
                .as_f64()
                .filter(|weight| *weight >= 0.0)
                .ok_or_else(|| malformed(value)),
            Some(value) => Err(malformed(value)),
        }
    }

    /// First keyword, conventionally the damage type.
    pub fn damage_type(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }

    /// Keywords after the damage type.
    pub fn tags(&self) -> &[String] {
        self.keywords.get(1..).unwrap_or_default()
    }
}

/// Wargear definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WargearDef {
    /// Catalog key.
    #[serde(default, skip_serializing)]
    pub name: String,
    /// Rules text.
    #[serde(default)]
    pub description: String,
    /// Maximum number of mechs in a roster that may equip it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl WargearDef {
    /// Build a definition, mostly useful for fixtures.
    pub fn new(name: impl Into<String>, description: impl Into<String>, limit: Option<u32>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            limit,
        }
    }
}

/// Render a catalog value for display; sequences are joined with `, `.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Number(num) => num.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => "*".to_string(),
    }
}

/// Whether a display value counts as set (non-null, non-zero, non-empty).
pub(crate) fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(num)) => num.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Bool(true)) => true,
    }
}
