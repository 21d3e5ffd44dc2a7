// 🔎 Slot Finder - Nearest available slot
// Full linear scan; size is an eligibility filter, distance is the only ranking key

use crate::model::{ParkingMap, SizeClass, SlotCoord};
use serde::Serialize;

/// Result of a slot search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotRef {
    pub entrance: usize,
    pub slot: usize,
    pub distance: f64,
}

impl SlotRef {
    pub fn coord(&self) -> SlotCoord {
        SlotCoord {
            entrance: self.entrance,
            slot: self.slot,
        }
    }
}

/// Find the closest empty slot a vehicle of class `size` fits in.
///
/// Ties on distance go to the first slot in scan order (lower entrance,
/// then lower slot), so only a strictly smaller distance replaces the best.
pub fn find_nearest(map: &ParkingMap, size: SizeClass) -> Option<SlotRef> {
    let mut best: Option<SlotRef> = None;

    for (coord, slot) in map.iter() {
        if !slot.is_free() || !size.fits(slot.size) {
            continue;
        }

        let closer = match best {
            Some(current) => slot.distance < current.distance,
            None => true,
        };

        if closer {
            best = Some(SlotRef {
                entrance: coord.entrance,
                slot: coord.slot,
                distance: slot.distance,
            });
        }
    }

    best
}

// ============================================================================
// TESTS
// ============================================================================
