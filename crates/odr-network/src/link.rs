//! Road-level links: which road or junction a road continues into at each
//! of its ends.

use odr_core::ElementId;
use odr_lanes::RoadEnd;

/// Kind of element a [`RoadLink`] points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementType {
    Road,
    Junction,
}

/// Which end of the linked road the link attaches to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContactPoint {
    Start,
    End,
}

impl ContactPoint {
    /// The road end this contact point names.
    pub fn road_end(self) -> RoadEnd {
        match self {
            ContactPoint::Start => RoadEnd::Start,
            ContactPoint::End => RoadEnd::End,
        }
    }
}

/// Travel direction along the linked element's s-axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementDir {
    Plus,
    Minus,
}

/// Where on the linked element the link attaches.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attachment {
    /// One of the linked road's ends.
    Contact(ContactPoint),
    /// A point along the linked element, for virtual junctions.
    Along { element_s: f64, element_dir: ElementDir },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLink {
    pub element_type: ElementType,
    pub element_id:   ElementId,
    pub attachment:   Option<Attachment>,
}

impl RoadLink {
    pub fn road(id: impl Into<ElementId>, contact: ContactPoint) -> Self {
        Self {
            element_type: ElementType::Road,
            element_id:   id.into(),
            attachment:   Some(Attachment::Contact(contact)),
        }
    }

    /// Link into the middle of road `id` at `element_s`, as used inside
    /// virtual junctions.
    pub fn road_along(id: impl Into<ElementId>, element_s: f64, element_dir: ElementDir) -> Self {
        Self {
            element_type: ElementType::Road,
            element_id:   id.into(),
            attachment:   Some(Attachment::Along { element_s, element_dir }),
        }
    }

    pub fn junction(id: impl Into<ElementId>) -> Self {
        Self {
            element_type: ElementType::Junction,
            element_id:   id.into(),
            attachment:   None,
        }
    }

    /// `true` if the element id is the `-1` "no link" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.element_id.is_none_sentinel()
    }
}

/// Predecessor (at s = 0) and successor (at s = length) links of a road.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoadLinks {
    pub predecessor: Option<RoadLink>,
    pub successor:   Option<RoadLink>,
}

impl RoadLinks {
    /// The link leaving the road at `end`, with sentinel links treated as
    /// absent.
    pub fn at(&self, end: RoadEnd) -> Option<&RoadLink> {
        let link = match end {
            RoadEnd::Start => self.predecessor.as_ref(),
            RoadEnd::End => self.successor.as_ref(),
        };
        link.filter(|l| !l.is_sentinel())
    }

    /// Which end of this road links to junction `junction`, if any.
    pub fn end_into_junction(&self, junction: &ElementId) -> Option<RoadEnd> {
        [RoadEnd::End, RoadEnd::Start].into_iter().find(|&end| {
            self.at(end)
                .is_some_and(|l| l.element_type == ElementType::Junction && &l.element_id == junction)
        })
    }
}
