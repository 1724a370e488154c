//! Physical-quantity parsing for the document-decoding boundary.
//!
//! Numeric attributes in the source format are free-form strings that may
//! carry a unit suffix (`"12.5"`, `"12.5m"`, `"0.3 km"`).  Every front end
//! funnels them through this module, so the model itself only ever holds
//! SI doubles.
//!
//! | Quantity | Default | Accepted suffixes                         |
//! |----------|---------|-------------------------------------------|
//! | length   | `m`     | `m`, `km`, `cm`, `mm`, `ft`, `mi`/`mile`  |
//! | speed    | `m/s`   | `m/s`, `km/h`, `kmh`, `mph`               |
//!
//! With the `serde` feature, [`de`] exposes the same parsers as
//! `deserialize_with` helpers, so typed documents accept either a bare
//! number or a suffixed string for every length and speed field.

use crate::error::{CoreError, CoreResult};
use crate::validation::ValidationError;

// ── Constrained doubles ───────────────────────────────────────────────────────

/// A finite double `>= 0` (schema type `t_grEqZero`).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct NonNegative(f64);

impl NonNegative {
    pub fn new(value: f64) -> CoreResult<Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::Constraint { value, constraint: ">= 0" })
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// A finite double `> 0` (schema type `t_grZero`).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Positive(f64);

impl Positive {
    pub fn new(value: f64) -> CoreResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::Constraint { value, constraint: "> 0" })
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for NonNegative {
    type Error = CoreError;
    fn try_from(value: f64) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Positive {
    type Error = CoreError;
    fn try_from(value: f64) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<NonNegative> for f64 {
    fn from(v: NonNegative) -> f64 {
        v.0
    }
}

impl From<Positive> for f64 {
    fn from(v: Positive) -> f64 {
        v.0
    }
}

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Split `"12.5 km"` into `("12.5", "km")`.
fn split_unit(raw: &str) -> (&str, &str) {
    let trimmed = raw.trim();
    let split = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic() || *c == '/')
        .last()
        .map_or(trimmed.len(), |(i, _)| i);
    let (number, unit) = trimmed.split_at(split);
    (number.trim_end(), unit)
}

fn parse_number(raw: &str, number: &str) -> CoreResult<f64> {
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::Number(raw.trim().to_owned()))
}

/// Parse a length into metres.
pub fn parse_length(raw: &str) -> CoreResult<f64> {
    let (number, unit) = split_unit(raw);
    let value = parse_number(raw, number)?;
    let factor = match unit {
        "" | "m" => 1.0,
        "km" => 1_000.0,
        "cm" => 0.01,
        "mm" => 0.001,
        "ft" => 0.3048,
        "mi" | "mile" => 1_609.344,
        other => {
            return Err(CoreError::Unit { value: raw.trim().to_owned(), unit: other.to_owned() });
        }
    };
    Ok(value * factor)
}

/// Parse a speed into metres per second.
pub fn parse_speed(raw: &str) -> CoreResult<f64> {
    let (number, unit) = split_unit(raw);
    let value = parse_number(raw, number)?;
    let factor = match unit {
        "" | "m/s" | "mps" => 1.0,
        "km/h" | "kmh" => 1.0 / 3.6,
        "mph" => 0.447_04,
        other => {
            return Err(CoreError::Unit { value: raw.trim().to_owned(), unit: other.to_owned() });
        }
    };
    Ok(value * factor)
}

// ── Decoding helper ───────────────────────────────────────────────────────────

/// Decode one attribute, recording a [`ValidationError::Parse`] on failure.
///
/// Front ends call this for every numeric attribute and attach the
/// collected errors to the document so validation reports them alongside
/// structural problems.  A failing optional attribute is non-fatal; a
/// failing required one rejects the document.
pub fn decode_attr<T>(
    entity:    &str,
    attribute: &'static str,
    raw:       &str,
    required:  bool,
    parse:     impl Fn(&str) -> CoreResult<T>,
    sink:      &mut Vec<ValidationError>,
) -> Option<T> {
    match parse(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            sink.push(ValidationError::Parse {
                entity: entity.to_owned(),
                attribute,
                value: raw.to_owned(),
                reason: err.to_string(),
                required,
            });
            None
        }
    }
}

// ── Serde boundary ────────────────────────────────────────────────────────────

/// `deserialize_with` helpers: a JSON number is taken as SI, a string goes
/// through [`parse_length`] / [`parse_speed`].
#[cfg(feature = "serde")]
pub mod de {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    use crate::error::CoreResult;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn decode<'de, D: Deserializer<'de>>(d: D, parse: fn(&str) -> CoreResult<f64>) -> Result<f64, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Number(v) => Ok(v),
            Raw::Text(text) => parse(&text).map_err(D::Error::custom),
        }
    }

    pub fn length<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        decode(d, super::parse_length)
    }

    pub fn speed<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        decode(d, super::parse_speed)
    }

    pub fn opt_speed<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Option::<Raw>::deserialize(d)?
            .map(|raw| match raw {
                Raw::Number(v) => Ok(v),
                Raw::Text(text) => super::parse_speed(&text).map_err(D::Error::custom),
            })
            .transpose()
    }
}
