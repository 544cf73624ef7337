mod common;

use common::strategies::*;
use garage_core::models::BicycleRecord;
use garage_core::registry::Garage;
use proptest::prelude::*;
use std::thread;

fn garage_from(fleet: &[BicycleRecord]) -> Garage {
    let garage = Garage::new();
    garage.seed(fleet.iter().cloned());
    garage
}

proptest! {
    /// Property: concurrent adds keep every record
    #[test]
    fn concurrent_adds_keep_every_record(batches in prop::collection::vec(fleet_strategy(), 1..6)) {
        let garage = Garage::new();
        thread::scope(|scope| {
            for batch in &batches {
                let garage = &garage;
                scope.spawn(move || {
                    for record in batch {
                        garage.add(record.clone());
                    }
                });
            }
        });

        let expected: usize = batches.iter().map(Vec::len).sum();
        prop_assert_eq!(garage.len(), expected);
    }

    /// Property: every record ends at its initial speed plus the sum of all deltas
    #[test]
    fn concurrent_deltas_sum_per_record(
        fleet in fleet_strategy(),
        deltas in prop::collection::vec(delta_strategy(), 1..8),
    ) {
        let garage = garage_from(&fleet);
        thread::scope(|scope| {
            for &delta in &deltas {
                let garage = &garage;
                scope.spawn(move || garage.increase_speed_safe(delta));
            }
        });

        let total: i32 = deltas.iter().sum();
        let expected: Vec<i32> = fleet.iter().map(|b| b.speed() + total).collect();
        let actual: Vec<i32> = garage.all().iter().map(BicycleRecord::speed).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: filter returns the order-preserving matching subsequence, every time
    #[test]
    fn filter_is_matching_subsequence(
        fleet in fleet_strategy(),
        delta in delta_strategy(),
        threshold in speed_strategy(),
    ) {
        let garage = garage_from(&fleet);
        garage.increase_speed_safe(delta);

        let view = garage.faster_than(threshold);
        let first = view.to_vec();
        let second = view.to_vec();

        let expected: Vec<BicycleRecord> = garage
            .all()
            .iter()
            .filter(|b| b.speed() > threshold)
            .cloned()
            .collect();
        prop_assert_eq!(&first, &expected);
        prop_assert_eq!(first, second);
    }

    /// Property: sorting is a stable ascending permutation
    #[test]
    fn sorted_by_speed_is_stable(fleet in fleet_strategy()) {
        let garage = garage_from(&fleet);
        let sorted = garage.sorted_by_speed();

        prop_assert_eq!(sorted.len(), fleet.len());
        prop_assert!(sorted.windows(2).all(|w| w[0].speed() <= w[1].speed()));

        let mut expected = fleet.clone();
        expected.sort_by_key(BicycleRecord::speed);
        prop_assert_eq!(sorted, expected);
    }

    /// Property: the average lies between the slowest and fastest record
    #[test]
    fn average_within_bounds(fleet in fleet_strategy()) {
        let garage = garage_from(&fleet);
        match garage.average_speed() {
            None => prop_assert!(fleet.is_empty()),
            Some(average) => {
                let min = fleet.iter().map(BicycleRecord::speed).min().unwrap_or_default();
                let max = fleet.iter().map(BicycleRecord::speed).max().unwrap_or_default();
                prop_assert!(average >= f64::from(min) && average <= f64::from(max));
            }
        }
    }
}
