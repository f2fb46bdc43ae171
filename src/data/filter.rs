use std::collections::BTreeSet;

use super::model::{PenguinDataset, PenguinRecord, Species};

// ---------------------------------------------------------------------------
// Filter predicate: body-mass ceiling and species selection
// ---------------------------------------------------------------------------

/// The two user-controlled filter parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Strict upper bound on body mass in grams.
    pub mass_max: f64,
    /// Species to keep. Empty means nothing is shown.
    pub species: BTreeSet<Species>,
}

impl Default for FilterState {
    /// Slider at its maximum and every species checked.
    fn default() -> Self {
        Self {
            mass_max: 6000.0,
            species: Species::ALL.into_iter().collect(),
        }
    }
}

impl FilterState {
    /// Whether a single record passes both predicates.
    ///
    /// A record without a body mass never passes: a missing value is not
    /// less than any threshold.
    pub fn accepts(&self, record: &PenguinRecord) -> bool {
        self.species.contains(&record.species)
            && record.body_mass_g.is_some_and(|mass| mass < self.mass_max)
    }
}

/// Return indices of records that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &PenguinDataset, filter: &FilterState) -> Vec<usize> {
    if filter.species.is_empty() {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filter.accepts(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_birds() -> PenguinDataset {
        PenguinDataset::from_records(vec![
            PenguinRecord::new(Species::Adelie, "Torgersen", Some(3000.0)),
            PenguinRecord::new(Species::Gentoo, "Biscoe", Some(5000.0)),
            PenguinRecord::new(Species::Chinstrap, "Dream", Some(6500.0)),
        ])
    }

    #[test]
    fn threshold_excludes_heavy_bird() {
        let ds = three_birds();
        assert_eq!(filtered_indices(&ds, &FilterState::default()), vec![0, 1]);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let ds = three_birds();
        let filter = FilterState {
            species: BTreeSet::new(),
            ..FilterState::default()
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        let ds = three_birds();
        let filter = FilterState {
            mass_max: 5000.0,
            ..FilterState::default()
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![0]);
    }

    #[test]
    fn minimum_threshold_excludes_everything_at_or_above_it() {
        let ds = PenguinDataset::from_records(vec![
            PenguinRecord::new(Species::Adelie, "Dream", Some(2000.0)),
            PenguinRecord::new(Species::Adelie, "Dream", Some(1999.0)),
            PenguinRecord::new(Species::Gentoo, "Biscoe", Some(4500.0)),
        ]);
        let filter = FilterState {
            mass_max: 2000.0,
            ..FilterState::default()
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![1]);
    }

    #[test]
    fn missing_mass_never_passes() {
        let ds = PenguinDataset::from_records(vec![
            PenguinRecord::new(Species::Adelie, "Torgersen", None),
            PenguinRecord::new(Species::Adelie, "Torgersen", Some(3400.0)),
        ]);
        let filter = FilterState {
            mass_max: f64::INFINITY,
            ..FilterState::default()
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![1]);
    }

    // -- property tests --

    fn arb_species() -> impl Strategy<Value = Species> {
        prop_oneof![
            Just(Species::Adelie),
            Just(Species::Chinstrap),
            Just(Species::Gentoo),
        ]
    }

    fn arb_record() -> impl Strategy<Value = PenguinRecord> {
        (arb_species(), prop::option::weighted(0.9, 2500.0f64..6500.0))
            .prop_map(|(species, mass)| PenguinRecord::new(species, "Biscoe", mass))
    }

    fn arb_dataset() -> impl Strategy<Value = PenguinDataset> {
        prop::collection::vec(arb_record(), 0..60).prop_map(PenguinDataset::from_records)
    }

    fn arb_selection() -> impl Strategy<Value = BTreeSet<Species>> {
        prop::sample::subsequence(Species::ALL.to_vec(), 0..=3)
            .prop_map(|picked| picked.into_iter().collect())
    }

    fn arb_filter() -> impl Strategy<Value = FilterState> {
        (2000.0f64..6000.0, arb_selection())
            .prop_map(|(mass_max, species)| FilterState { mass_max, species })
    }

    proptest! {
        #[test]
        fn view_is_ordered_subset_matching_predicates(ds in arb_dataset(), f in arb_filter()) {
            let view = filtered_indices(&ds, &f);
            prop_assert!(view.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(view.iter().all(|&i| i < ds.len()));
            for (i, rec) in ds.records.iter().enumerate() {
                let passes = f.species.contains(&rec.species)
                    && rec.body_mass_g.is_some_and(|m| m < f.mass_max);
                prop_assert_eq!(view.contains(&i), passes);
            }
        }

        #[test]
        fn recomputation_is_idempotent(ds in arb_dataset(), f in arb_filter()) {
            prop_assert_eq!(filtered_indices(&ds, &f), filtered_indices(&ds, &f));
        }

        #[test]
        fn widening_never_shrinks_view(
            ds in arb_dataset(),
            f in arb_filter(),
            extra in arb_selection(),
            raise in 0.0f64..2000.0,
        ) {
            let narrow = filtered_indices(&ds, &f);
            let mut wide_filter = f.clone();
            wide_filter.species.extend(extra);
            wide_filter.mass_max += raise;
            let wide = filtered_indices(&ds, &wide_filter);
            prop_assert!(narrow.iter().all(|i| wide.contains(i)));
        }
    }
}
