//! Document header.

use odr_core::Extensions;

/// Projected extent of the document, in the document's coordinate frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east:  f64,
    pub west:  f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Header {
    pub rev_major:  u16,
    pub rev_minor:  u16,
    pub name:       Option<String>,
    pub version:    Option<String>,
    pub date:       Option<String>,
    pub bounds:     Option<Bounds>,
    pub vendor:     Option<String>,
    pub extensions: Extensions,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            rev_major:  1,
            rev_minor:  6,
            name:       None,
            version:    None,
            date:       None,
            bounds:     None,
            vendor:     None,
            extensions: Extensions::new(),
        }
    }
}
