//! Revealed trips as handed to the renderer.

use std::sync::Arc;

use crate::domain::{Trip, Variant};
use crate::filter::HotelCeiling;
use crate::variants::select_and_order;

/// A revealed trip with its variants in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTrip {
    pub trip: Arc<Trip>,

    /// Positions into `trip.variants()`, in display order.
    pub order: Vec<usize>,

    /// Position into `trip.variants()` of the default variant.
    pub chosen: Option<usize>,
}

impl DisplayTrip {
    pub fn new(trip: Arc<Trip>, ceiling: HotelCeiling) -> Self {
        let selection = select_and_order(trip.variants(), ceiling);
        let order = selection.order.clone();
        let chosen = selection.chosen_index();
        Self {
            trip,
            order,
            chosen,
        }
    }

    /// Variants in display order.
    pub fn ordered_variants(&self) -> impl Iterator<Item = &Variant> {
        self.order.iter().map(|&i| &self.trip.variants()[i])
    }

    pub fn chosen_variant(&self) -> Option<&Variant> {
        self.chosen.map(|i| &self.trip.variants()[i])
    }
}

/// Build display entries for a batch of trips.
pub fn display_batch(trips: &[Arc<Trip>], ceiling: HotelCeiling) -> Vec<DisplayTrip> {
    trips
        .iter()
        .map(|trip| DisplayTrip::new(Arc::clone(trip), ceiling))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(hotels_and_minutes: &[(u32, u32)]) -> Arc<Trip> {
        let variants = hotels_and_minutes
            .iter()
            .map(|&(h, m)| Variant::new(vec![], vec![], 3, h, m))
            .collect();
        Arc::new(Trip::new("t1", variants).unwrap())
    }

    #[test]
    fn binding_ceiling_chooses_fewest_hotels() {
        let display = DisplayTrip::new(trip(&[(3, 100), (1, 400)]), HotelCeiling::AtMost(2));

        assert_eq!(display.chosen, Some(1));
        assert_eq!(display.chosen_variant().unwrap().hotel_changes, 1);
        let hotels: Vec<u32> = display.ordered_variants().map(|v| v.hotel_changes).collect();
        assert_eq!(hotels, vec![1, 3]);
    }

    #[test]
    fn non_binding_ceiling_chooses_fastest() {
        let display = DisplayTrip::new(trip(&[(1, 400), (3, 100)]), HotelCeiling::AtMost(5));

        assert_eq!(display.chosen_variant().unwrap().travel_minutes, 100);
    }

    #[test]
    fn batch_preserves_order() {
        let a = trip(&[(0, 10)]);
        let b = trip(&[(0, 20)]);
        let batch = display_batch(&[a.clone(), b.clone()], HotelCeiling::Unbounded);

        assert!(Arc::ptr_eq(&batch[0].trip, &a));
        assert!(Arc::ptr_eq(&batch[1].trip, &b));
    }
}
