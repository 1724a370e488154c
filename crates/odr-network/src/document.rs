//! The unvalidated document tree handed over by a decoding front end.
//!
//! A [`Document`] offers no queries: it is checked with
//! [`Document::validate`] and frozen into a [`RoadNetwork`] with
//! [`Document::into_network`].  Roads and junctions sit behind `Arc` so a
//! network's copy-on-write edits share every entity they do not touch.

use std::sync::Arc;

use odr_core::{ValidationConfig, ValidationError};

use crate::error::NetworkResult;
use crate::header::Header;
use crate::junction::{Controller, Junction, JunctionGroup};
use crate::network::RoadNetwork;
use crate::road::Road;

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Document {
    pub header:          Header,
    pub roads:           Vec<Arc<Road>>,
    pub junctions:       Vec<Arc<Junction>>,
    pub controllers:     Vec<Controller>,
    pub junction_groups: Vec<JunctionGroup>,
    /// Attribute decoding failures recorded by the front end (see
    /// `odr_core::units::decode_attr`); reported with the validation result.
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    pub parse_errors:    Vec<ValidationError>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_road(&mut self, road: Road) -> &mut Self {
        self.roads.push(Arc::new(road));
        self
    }

    pub fn push_junction(&mut self, junction: Junction) -> &mut Self {
        self.junctions.push(Arc::new(junction));
        self
    }

    pub fn push_controller(&mut self, controller: Controller) -> &mut Self {
        self.controllers.push(controller);
        self
    }

    /// First road with this id (linear scan; documents are not indexed
    /// until validated).
    pub fn road(&self, id: &str) -> Option<&Road> {
        self.roads.iter().map(Arc::as_ref).find(|r| r.id.as_str() == id)
    }

    /// Mutable access to a road, cloning it first if it is shared with
    /// another document.
    pub fn road_mut(&mut self, id: &str) -> Option<&mut Road> {
        self.roads
            .iter_mut()
            .find(|r| r.id.as_str() == id)
            .map(Arc::make_mut)
    }

    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junctions.iter().map(Arc::as_ref).find(|j| j.id.as_str() == id)
    }

    pub fn junction_mut(&mut self, id: &str) -> Option<&mut Junction> {
        self.junctions
            .iter_mut()
            .find(|j| j.id.as_str() == id)
            .map(Arc::make_mut)
    }

    /// Validate with default tolerances.
    pub fn validate(&self) -> Vec<ValidationError> {
        crate::validate::validate_with(self, &ValidationConfig::default())
    }

    pub fn validate_with(&self, cfg: &ValidationConfig) -> Vec<ValidationError> {
        crate::validate::validate_with(self, cfg)
    }

    /// Validate and freeze with default tolerances.
    pub fn into_network(self) -> NetworkResult<RoadNetwork> {
        RoadNetwork::from_document(self, ValidationConfig::default())
    }
}
