//! Document-wide id registry.
//!
//! Built in one pass once every road is present; all cross-references are
//! resolved through it afterwards.  The first entity with a given id wins
//! the slot and later ones are reported as duplicates.

use rustc_hash::FxHashMap;

use odr_core::{ElementId, JunctionIdx, RoadIdx, ValidationError};

use crate::document::Document;

#[derive(Clone, Debug, Default)]
pub struct Registry {
    roads:       FxHashMap<ElementId, RoadIdx>,
    junctions:   FxHashMap<ElementId, JunctionIdx>,
    controllers: FxHashMap<ElementId, usize>,
    groups:      FxHashMap<ElementId, usize>,
    /// Signal id → owning road and position in its signal list.
    signals:     FxHashMap<ElementId, (RoadIdx, usize)>,
    /// Object id → owning road and position in its object list.
    objects:     FxHashMap<ElementId, (RoadIdx, usize)>,
}

/// Insert unless present; report the duplicate otherwise.
fn register<V>(
    map:  &mut FxHashMap<ElementId, V>,
    id:   &ElementId,
    kind: &'static str,
    idx:  V,
    out:  &mut Vec<ValidationError>,
) {
    if map.contains_key(id) {
        out.push(ValidationError::DuplicateId {
            scope: "document".to_owned(),
            kind,
            id: id.to_string(),
        });
    } else {
        map.insert(id.clone(), idx);
    }
}

/// Arena index for position `i`, or a report that the arena is full.
fn arena_idx<I: TryFrom<usize>>(
    i:     usize,
    kind:  &'static str,
    count: usize,
    out:   &mut Vec<ValidationError>,
) -> Option<I> {
    let idx = I::try_from(i).ok();
    if idx.is_none() {
        out.push(ValidationError::TooManyElements { kind, count });
    }
    idx
}

impl Registry {
    pub fn build(doc: &Document, out: &mut Vec<ValidationError>) -> Self {
        let mut reg = Registry::default();
        reg.roads.reserve(doc.roads.len());

        for (i, road) in doc.roads.iter().enumerate() {
            let Some(idx) = arena_idx::<RoadIdx>(i, "road", doc.roads.len(), out) else {
                break;
            };
            register(&mut reg.roads, &road.id, "road", idx, out);
            for (k, signal) in road.signals.iter().enumerate() {
                register(&mut reg.signals, &signal.id, "signal", (idx, k), out);
            }
            for (k, object) in road.objects.iter().enumerate() {
                register(&mut reg.objects, &object.id, "object", (idx, k), out);
            }
        }
        for (i, junction) in doc.junctions.iter().enumerate() {
            let Some(idx) = arena_idx::<JunctionIdx>(i, "junction", doc.junctions.len(), out) else {
                break;
            };
            register(&mut reg.junctions, &junction.id, "junction", idx, out);
        }
        for (i, controller) in doc.controllers.iter().enumerate() {
            register(&mut reg.controllers, &controller.id, "controller", i, out);
        }
        for (i, group) in doc.junction_groups.iter().enumerate() {
            register(&mut reg.groups, &group.id, "junctionGroup", i, out);
        }
        reg
    }

    #[inline]
    pub fn road(&self, id: &str) -> Option<RoadIdx> {
        self.roads.get(id).copied()
    }

    #[inline]
    pub fn junction(&self, id: &str) -> Option<JunctionIdx> {
        self.junctions.get(id).copied()
    }

    pub fn controller(&self, id: &str) -> Option<usize> {
        self.controllers.get(id).copied()
    }

    pub fn group(&self, id: &str) -> Option<usize> {
        self.groups.get(id).copied()
    }

    pub fn signal(&self, id: &str) -> Option<(RoadIdx, usize)> {
        self.signals.get(id).copied()
    }

    pub fn object(&self, id: &str) -> Option<(RoadIdx, usize)> {
        self.objects.get(id).copied()
    }
}
