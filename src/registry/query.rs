//! Query operators over registry snapshots.
//!
//! Aggregation, projection and ordering all run on a [`GarageSnapshot`], so
//! a query sees one consistent state even while mutation workers run.

use super::garage::{Garage, GarageSnapshot};
use crate::models::BicycleRecord;

impl GarageSnapshot {
    /// Mean speed, or `None` for an empty snapshot
    pub fn average_speed(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total: i64 = self.iter().map(|b| i64::from(b.speed())).sum();
        Some(total as f64 / self.len() as f64)
    }

    /// Model names of the records matching `predicate`, in insertion order
    pub fn models_where<P>(&self, predicate: P) -> Vec<String>
    where
        P: Fn(&BicycleRecord) -> bool,
    {
        self.iter()
            .filter(|b| predicate(b))
            .map(|b| b.model().to_string())
            .collect()
    }

    pub fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&BicycleRecord) -> bool,
    {
        self.iter().filter(|b| predicate(b)).count()
    }

    /// Ascending by speed; records with equal speed keep insertion order
    pub fn sorted_by_speed(&self) -> Vec<BicycleRecord> {
        let mut sorted = self.to_vec();
        sorted.sort_by(BicycleRecord::cmp_by_speed);
        sorted
    }
}

impl Garage {
    pub fn average_speed(&self) -> Option<f64> {
        self.all().average_speed()
    }

    pub fn sorted_by_speed(&self) -> Vec<BicycleRecord> {
        self.all().sorted_by_speed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garage() -> Garage {
        let garage = Garage::new();
        garage.add(BicycleRecord::new("Giant", 35));
        garage.add(BicycleRecord::new("Trek", 42));
        garage.add(BicycleRecord::new("Cube", 28));
        garage.add(BicycleRecord::new("Scott", 40));
        garage
    }

    #[test]
    fn test_average_speed() {
        assert_eq!(garage().average_speed(), Some(36.25));
        assert_eq!(Garage::new().average_speed(), None);
    }

    #[test]
    fn test_models_where() {
        let snapshot = garage().all();
        assert_eq!(snapshot.models_where(|b| b.speed() > 35), vec!["Trek", "Scott"]);
        assert_eq!(snapshot.count_where(|b| b.speed() >= 35), 3);
    }

    #[test]
    fn test_sorted_by_speed_is_stable() {
        let garage = garage();
        garage.add(BicycleRecord::new("Merida", 35));

        let models: Vec<String> = garage
            .sorted_by_speed()
            .iter()
            .map(|b| b.model().to_string())
            .collect();
        assert_eq!(models, vec!["Cube", "Giant", "Merida", "Scott", "Trek"]);
    }
}
