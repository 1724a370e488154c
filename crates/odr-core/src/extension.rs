//! Vendor extension slot.
//!
//! Any document entity may carry an `<include>`, `<userData>` or
//! `<dataQuality>` child.  They are attached by composition as a list of
//! [`Extension`]s; the core never interprets them.

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extension {
    /// Reference to an external file merged by the front end.
    Include { file: String },
    /// Opaque vendor payload.
    UserData { code: String, value: Option<String> },
    /// Measurement accuracy metadata.
    DataQuality {
        /// Absolute horizontal/vertical position error, metres.
        error_xy: Option<f64>,
        error_z:  Option<f64>,
        /// Free-form description of the raw data source.
        raw_data: Option<String>,
    },
}

/// Extensions attached to one entity.
pub type Extensions = Vec<Extension>;
