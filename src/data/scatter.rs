use super::model::{PenguinDataset, Species};

/// Points of one species for the bill length / bill depth scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPoints {
    pub species: Species,
    /// `[bill_length_mm, bill_depth_mm]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Group the view into per-species point lists.
///
/// Records missing either bill measurement are left out, as are species with
/// no points. Groups come out in `Species` order.
pub fn bill_scatter(dataset: &PenguinDataset, view: &[usize]) -> Vec<SpeciesPoints> {
    Species::ALL
        .into_iter()
        .filter_map(|species| {
            let points: Vec<[f64; 2]> = view
                .iter()
                .filter_map(|&i| dataset.records.get(i))
                .filter(|r| r.species == species)
                .filter_map(|r| Some([r.bill_length_mm?, r.bill_depth_mm?]))
                .collect();
            (!points.is_empty()).then_some(SpeciesPoints { species, points })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PenguinRecord;

    #[test]
    fn groups_points_by_species_in_fixed_order() {
        let ds = PenguinDataset::from_records(vec![
            PenguinRecord::new(Species::Gentoo, "Biscoe", Some(5000.0)).with_bill(47.0, 15.0),
            PenguinRecord::new(Species::Adelie, "Dream", Some(3500.0)).with_bill(39.0, 18.0),
            PenguinRecord::new(Species::Adelie, "Dream", Some(3600.0)),
            PenguinRecord::new(Species::Gentoo, "Biscoe", Some(5100.0)).with_bill(48.0, 16.0),
        ]);
        let series = bill_scatter(&ds, &[0, 1, 2, 3]);
        assert_eq!(
            series,
            vec![
                SpeciesPoints {
                    species: Species::Adelie,
                    points: vec![[39.0, 18.0]],
                },
                SpeciesPoints {
                    species: Species::Gentoo,
                    points: vec![[47.0, 15.0], [48.0, 16.0]],
                },
            ]
        );
    }

    #[test]
    fn empty_view_has_no_series() {
        let ds = PenguinDataset::from_records(vec![PenguinRecord::new(
            Species::Adelie,
            "Dream",
            Some(3500.0),
        )
        .with_bill(39.0, 18.0)]);
        assert!(bill_scatter(&ds, &[]).is_empty());
    }
}
