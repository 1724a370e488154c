//! Lane offset: a lateral shift of the center lane away from the road's
//! reference line.

use odr_core::poly::{eval_records, is_sorted_by_start};
use odr_core::{ElementId, PolyRecord, ValidationError};

/// `t(s)` shift of lane 0 as road-s-keyed cubic records.  Absent records
/// mean no shift.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LaneOffset {
    pub records: Vec<PolyRecord>,
}

impl LaneOffset {
    pub fn new(records: Vec<PolyRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn t(&self, s: f64) -> f64 {
        eval_records(&self.records, s).unwrap_or(0.0)
    }

    pub fn check(&self, road: &ElementId, out: &mut Vec<ValidationError>) {
        if is_sorted_by_start(&self.records) {
            return;
        }
        if let Some(i) = self.records.windows(2).position(|w| w[1].start < w[0].start) {
            out.push(ValidationError::RecordOrder {
                entity: format!("road {road}"),
                what:   "laneOffset",
                index:  i + 1,
            });
        }
    }
}
