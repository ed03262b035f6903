//! Reader state: the named dimensions a module is declared to move.
//!
//! Five dimensions are always part of the schema:
//! - `genre` (situational frame)
//! - `power_balance` (who holds control)
//! - `emotional_tone`
//! - `threat_level` in `[0, 1]`
//! - `agency_level` in `[0, 1]`
//!
//! Authors may add any number of extension fields holding scalars. A field
//! is either set or absent; `None` is absence, never a value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default absolute tolerance for numeric comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// A scalar extension value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Compare two scalars, treating numbers within `tolerance` as equal.
    ///
    /// Integers and floats compare numerically with each other. NaN is never
    /// equal to anything.
    pub fn approx_eq(&self, other: &Scalar, tolerance: f64) -> bool {
        match (self, other) {
            (Scalar::Float(a), Scalar::Float(b)) => (a - b).abs() <= tolerance,
            (Scalar::Integer(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Integer(a)) => {
                (*a as f64 - b).abs() <= tolerance
            }
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Short type name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Reader state before or after a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReaderState {
    pub genre: Option<String>,
    pub power_balance: Option<String>,
    pub emotional_tone: Option<String>,
    pub threat_level: Option<f64>,
    pub agency_level: Option<f64>,
    /// Author-defined fields, serialized alongside the required ones.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Scalar>,
}

impl ReaderState {
    /// Required dimensions, in schema order.
    pub const REQUIRED_FIELDS: [&'static str; 5] = [
        "genre",
        "power_balance",
        "emotional_tone",
        "threat_level",
        "agency_level",
    ];

    /// Dimensions constrained to `[0, 1]`.
    pub const BOUNDED_FIELDS: [&'static str; 2] = ["threat_level", "agency_level"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_required(name: &str) -> bool {
        Self::REQUIRED_FIELDS.contains(&name)
    }

    /// Value of a field by name, required or extension.
    pub fn get(&self, name: &str) -> Option<Scalar> {
        match name {
            "genre" => self.genre.clone().map(Scalar::Text),
            "power_balance" => self.power_balance.clone().map(Scalar::Text),
            "emotional_tone" => self.emotional_tone.clone().map(Scalar::Text),
            "threat_level" => self.threat_level.map(Scalar::Float),
            "agency_level" => self.agency_level.map(Scalar::Float),
            other => self.extensions.get(other).cloned(),
        }
    }

    /// Set a field by name.
    ///
    /// Required text fields accept only strings and bounded fields accept
    /// only numbers; the error is a human-readable reason. Ranges are not
    /// checked here, see [`ReaderState::check`].
    pub fn set(&mut self, name: &str, value: Scalar) -> Result<(), String> {
        match name {
            "genre" | "power_balance" | "emotional_tone" => {
                let text = match value {
                    Scalar::Text(text) => text,
                    other => return Err(format!("must be a string, found {}", other.kind())),
                };
                match name {
                    "genre" => self.genre = Some(text),
                    "power_balance" => self.power_balance = Some(text),
                    _ => self.emotional_tone = Some(text),
                }
            }
            "threat_level" | "agency_level" => {
                let number = match value {
                    Scalar::Float(x) => x,
                    Scalar::Integer(i) => i as f64,
                    other => return Err(format!("must be a number, found {}", other.kind())),
                };
                if name == "threat_level" {
                    self.threat_level = Some(number);
                } else {
                    self.agency_level = Some(number);
                }
            }
            other => {
                self.extensions.insert(other.to_string(), value);
            }
        }
        Ok(())
    }

    /// Names of all fields that are set, required fields first.
    pub fn present_fields(&self) -> Vec<&str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|name| self.has_required(name))
            .chain(self.extensions.keys().map(String::as_str))
            .collect()
    }

    fn has_required(&self, name: &str) -> bool {
        match name {
            "genre" => self.genre.is_some(),
            "power_balance" => self.power_balance.is_some(),
            "emotional_tone" => self.emotional_tone.is_some(),
            "threat_level" => self.threat_level.is_some(),
            "agency_level" => self.agency_level.is_some(),
            _ => false,
        }
    }

    /// Required fields that are absent, in schema order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|name| !self.has_required(name))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        Self::REQUIRED_FIELDS.iter().all(|name| self.has_required(name))
    }

    /// True when no field at all is set.
    pub fn is_blank(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Field-wise equality.
    ///
    /// Every field set in either state must be set in both with equal
    /// values. A field absent from both does not take part.
    pub fn equivalent(&self, other: &ReaderState, tolerance: f64) -> bool {
        self.covers(other, tolerance) && other.covers(self, tolerance)
    }

    fn covers(&self, other: &ReaderState, tolerance: f64) -> bool {
        self.present_fields().into_iter().all(|name| {
            match (self.get(name), other.get(name)) {
                (Some(a), Some(b)) => a.approx_eq(&b, tolerance),
                _ => false,
            }
        })
    }

    /// Equality restricted to fields set in both states.
    pub fn agrees_on_shared(&self, other: &ReaderState, tolerance: f64) -> bool {
        self.present_fields().into_iter().all(|name| {
            match (self.get(name), other.get(name)) {
                (Some(a), Some(b)) => a.approx_eq(&b, tolerance),
                _ => true,
            }
        })
    }

    /// Check value constraints, returning the offending field and reason.
    pub fn check(&self) -> Result<(), (String, String)> {
        for (name, value) in [
            ("threat_level", self.threat_level),
            ("agency_level", self.agency_level),
        ] {
            if let Some(x) = value {
                if !(0.0..=1.0).contains(&x) {
                    return Err((name.to_string(), format!("must be within [0, 1], found {}", x)));
                }
            }
        }

        for (name, value) in &self.extensions {
            if Self::is_required(name) {
                return Err((name.clone(), "is a required field stored as an extension".to_string()));
            }
            if let Scalar::Float(x) = value {
                if !x.is_finite() {
                    return Err((name.clone(), format!("must be a finite number, found {}", x)));
                }
            }
        }

        Ok(())
    }
}
