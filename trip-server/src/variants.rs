//! Variant ordering and selection for displayed trips.
//!
//! Each trip carries several variants. Which one is shown by default, and in
//! what order the alternatives are listed, depends on whether the user's
//! hotel-change ceiling actually constrains the trip.

use crate::domain::Variant;
use crate::filter::HotelCeiling;

/// Ordered variants of one trip plus the one to display by default.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    /// Variants in display order.
    pub ordered: Vec<&'a Variant>,

    /// Positions of `ordered` in the input slice.
    pub order: Vec<usize>,

    /// The default variant, or `None` when no variant satisfies the ceiling.
    pub chosen: Option<&'a Variant>,
}

impl Selection<'_> {
    /// Position of the chosen variant in the input slice.
    pub fn chosen_index(&self) -> Option<usize> {
        self.chosen.map(|_| self.order[0])
    }
}

/// Order a trip's variants and pick the default.
///
/// If the ceiling covers every variant, hotel changes stop discriminating and
/// variants are ordered fastest first. Otherwise compliant variants come
/// first, fewest hotel changes first, followed by the non-compliant ones in
/// their original order. All sorts are stable.
pub fn select_and_order(variants: &[Variant], ceiling: HotelCeiling) -> Selection<'_> {
    let max_possible = variants.iter().map(|v| v.hotel_changes).max().unwrap_or(0);

    let mut order: Vec<usize> = (0..variants.len()).collect();
    let valid_count;

    if ceiling.covers(max_possible) {
        order.sort_by_key(|&i| variants[i].travel_minutes);
        valid_count = order.len();
    } else {
        let (mut valid, invalid): (Vec<usize>, Vec<usize>) = order
            .into_iter()
            .partition(|&i| ceiling.admits(variants[i].hotel_changes));

        valid.sort_by_key(|&i| variants[i].hotel_changes);
        valid_count = valid.len();

        order = valid;
        order.extend(invalid);
    }

    let ordered: Vec<&Variant> = order.iter().map(|&i| &variants[i]).collect();
    let chosen = if valid_count > 0 {
        ordered.first().copied()
    } else {
        None
    };

    Selection {
        ordered,
        order,
        chosen,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn variants_strategy() -> impl Strategy<Value = Vec<Variant>> {
        prop::collection::vec(
            (0u32..6, 0u32..5).prop_map(|(hotels, slot)| {
                // Coarse travel slots make ties common
                Variant::new(vec![], vec![], 2, hotels, slot * 60)
            }),
            0..12,
        )
    }

    fn ceiling_strategy() -> impl Strategy<Value = HotelCeiling> {
        prop_oneof![
            Just(HotelCeiling::Unbounded),
            (0u32..7).prop_map(HotelCeiling::AtMost),
        ]
    }

    fn keys(selection: &Selection<'_>) -> Vec<(u32, u32)> {
        selection
            .ordered
            .iter()
            .map(|v| (v.hotel_changes, v.travel_minutes))
            .collect()
    }

    proptest! {
        /// Ordering is a permutation of the input
        #[test]
        fn ordering_is_permutation(variants in variants_strategy(), ceiling in ceiling_strategy()) {
            let selection = select_and_order(&variants, ceiling);
            let mut order = selection.order.clone();
            order.sort_unstable();
            prop_assert_eq!(order, (0..variants.len()).collect::<Vec<_>>());
        }

        /// Chosen variant, if any, satisfies the ceiling and is first
        #[test]
        fn chosen_is_compliant(variants in variants_strategy(), ceiling in ceiling_strategy()) {
            let selection = select_and_order(&variants, ceiling);
            match selection.chosen {
                Some(chosen) => {
                    prop_assert!(ceiling.admits(chosen.hotel_changes));
                    prop_assert!(std::ptr::eq(chosen, selection.ordered[0]));
                }
                None => {
                    prop_assert!(variants.iter().all(|v| !ceiling.admits(v.hotel_changes)));
                }
            }
        }

        /// Compliant variants always precede non-compliant ones
        #[test]
        fn compliant_before_non_compliant(variants in variants_strategy(), ceiling in ceiling_strategy()) {
            let selection = select_and_order(&variants, ceiling);
            let flags: Vec<bool> = selection
                .ordered
                .iter()
                .map(|v| ceiling.admits(v.hotel_changes))
                .collect();
            prop_assert!(flags.windows(2).all(|w| w[0] || !w[1]));
        }

        /// Same inputs give the same output; shuffling equal-key variants
        /// leaves the key sequence unchanged
        #[test]
        fn deterministic_under_equal_key_shuffle(
            variants in variants_strategy(),
            ceiling in ceiling_strategy(),
            seed in any::<u64>(),
        ) {
            let first = select_and_order(&variants, ceiling);
            let second = select_and_order(&variants, ceiling);
            prop_assert_eq!(&first.order, &second.order);

            // Swap adjacent variants that share both keys
            let mut shuffled = variants.clone();
            for i in 1..shuffled.len() {
                let same = shuffled[i - 1].hotel_changes == shuffled[i].hotel_changes
                    && shuffled[i - 1].travel_minutes == shuffled[i].travel_minutes;
                if same && (seed >> (i % 64)) & 1 == 1 {
                    shuffled.swap(i - 1, i);
                }
            }
            let reshuffled = select_and_order(&shuffled, ceiling);
            prop_assert_eq!(keys(&first), keys(&reshuffled));
        }
    }
}
