//! Region catalog built from a regions snapshot.
//!
//! The catalog keeps regions in snapshot order, which approximates the order
//! the world processes them in during an update. It is never re-sorted. Each
//! region carries its cumulative population: the total population of every
//! region ahead of it, which is how far into the update it sits.
//!
//! # Invariants
//!
//! - `cumulative_population[0] == 0`
//! - `cumulative_population[i] == cumulative_population[i - 1] + population[i - 1]`
//! - `total_population == cumulative_population[last] + population[last]`
//!
//! A catalog is immutable once built. A reload builds a new one and swaps it
//! in whole.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::CoreError;

/// One entry of the regions snapshot, as read from the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRecord {
    /// Region name as it appears in the snapshot.
    pub name: String,
    /// Number of nations resident in the region.
    pub population: u64,
    /// Endorsements held by the region's delegate.
    pub endorsements: u64,
}

/// A region with its derived position in the update order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Region name as it appears in the snapshot.
    pub name: String,
    /// Number of nations resident in the region.
    pub population: u64,
    /// Total population of all regions that update before this one.
    pub cumulative_population: u64,
    /// Endorsements held by the region's delegate.
    pub endorsements: u64,
    /// Whether the region has no founder.
    pub founderless: bool,
}

/// Ordered, immutable snapshot of all regions in the world.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    index: BTreeMap<String, usize>,
    total_population: u64,
}

/// Normalise a region name or API identifier into a lookup key.
///
/// API identifiers use underscores where display names use spaces, and
/// neither is case sensitive.
pub fn region_key(name: &str) -> String {
    name.trim().to_lowercase().replace('_', " ")
}

impl RegionCatalog {
    /// Build a catalog from snapshot records in file order.
    ///
    /// `founderless` holds region names (in any case, with spaces or
    /// underscores) that have no founder.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Data`] if the snapshot is empty, contains a
    /// blank or duplicate name, has zero total population, or its population
    /// sum overflows. No partial catalog is ever returned.
    pub fn build<I>(records: I, founderless: &BTreeSet<String>) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = RegionRecord>,
    {
        let founderless: BTreeSet<String> = founderless.iter().map(|n| region_key(n)).collect();

        let mut regions = Vec::new();
        let mut index = BTreeMap::new();
        let mut running: u64 = 0;

        for record in records {
            let key = region_key(&record.name);
            if key.is_empty() {
                return Err(CoreError::data(format!(
                    "region at position {} has an empty name",
                    regions.len()
                )));
            }
            if index.insert(key.clone(), regions.len()).is_some() {
                return Err(CoreError::data(format!(
                    "duplicate region in snapshot: {}",
                    record.name
                )));
            }

            let cumulative_population = running;
            running = running.checked_add(record.population).ok_or_else(|| {
                CoreError::data("cumulative population overflows u64")
            })?;

            regions.push(Region {
                founderless: founderless.contains(&key),
                name: record.name,
                population: record.population,
                cumulative_population,
                endorsements: record.endorsements,
            });
        }

        if regions.is_empty() {
            return Err(CoreError::data("regions snapshot contains no regions"));
        }
        if running == 0 {
            return Err(CoreError::data("regions snapshot has zero total population"));
        }

        Ok(Self {
            regions,
            index,
            total_population: running,
        })
    }

    /// Look up a region by name, ignoring case and `_`/space differences.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no region has this name.
    pub fn lookup(&self, name: &str) -> Result<&Region, CoreError> {
        self.index
            .get(&region_key(name))
            .and_then(|&i| self.regions.get(i))
            .ok_or_else(|| CoreError::not_found(name))
    }

    /// Whether a region with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&region_key(name))
    }

    /// Sum of all region populations.
    pub const fn total_population(&self) -> u64 {
        self.total_population
    }

    /// Number of regions in the catalog.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always false for a successfully built catalog.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in update order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Founderless regions in update order.
    pub fn founderless(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.founderless)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn record(name: &str, population: u64) -> RegionRecord {
        RegionRecord {
            name: name.to_owned(),
            population,
            endorsements: 0,
        }
    }

    fn abc() -> RegionCatalog {
        RegionCatalog::build(
            vec![record("A", 10), record("B", 20), record("C", 30)],
            &BTreeSet::new(),
        )
        .unwrap()
    }

    #[test]
    fn cumulative_population_is_prefix_sum() {
        let pops = [7_u64, 0, 13, 2, 40, 1];
        let records = pops
            .iter()
            .enumerate()
            .map(|(i, &p)| record(&format!("region {i}"), p));
        let catalog = RegionCatalog::build(records, &BTreeSet::new()).unwrap();

        let mut expected = 0;
        for (region, &pop) in catalog.iter().zip(pops.iter()) {
            assert_eq!(region.cumulative_population, expected);
            expected += pop;
        }
        assert_eq!(catalog.total_population(), pops.iter().sum::<u64>());
    }

    #[test]
    fn keeps_snapshot_order() {
        let catalog = RegionCatalog::build(
            vec![record("Zeta", 1), record("Alpha", 1), record("Mu", 1)],
            &BTreeSet::new(),
        )
        .unwrap();
        let names: Vec<&str> = catalog.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn abc_scenario_totals() {
        let catalog = abc();
        assert_eq!(catalog.lookup("A").unwrap().cumulative_population, 0);
        assert_eq!(catalog.lookup("B").unwrap().cumulative_population, 10);
        assert_eq!(catalog.lookup("C").unwrap().cumulative_population, 30);
        assert_eq!(catalog.total_population(), 60);
    }

    #[test]
    fn lookup_ignores_case_and_underscores() {
        let catalog = RegionCatalog::build(
            vec![record("The North Pacific", 5)],
            &BTreeSet::new(),
        )
        .unwrap();
        assert!(catalog.lookup("the_north_pacific").is_ok());
        assert!(catalog.lookup("THE NORTH PACIFIC").is_ok());
        assert!(catalog.contains(" the north pacific "));
    }

    #[test]
    fn lookup_unknown_is_not_found() {
        let err = abc().lookup("Lazarus").unwrap_err();
        assert_eq!(err, CoreError::not_found("Lazarus"));
    }

    #[test]
    fn marks_founderless_by_membership() {
        let founderless: BTreeSet<String> = ["b".to_owned()].into_iter().collect();
        let catalog = RegionCatalog::build(
            vec![record("A", 10), record("B", 20), record("C", 30)],
            &founderless,
        )
        .unwrap();
        let names: Vec<&str> = catalog.founderless().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B"]);
        assert!(!catalog.lookup("A").unwrap().founderless);
    }

    #[test]
    fn empty_snapshot_fails_closed() {
        let err = RegionCatalog::build(Vec::new(), &BTreeSet::new()).unwrap_err();
        assert!(matches!(err, CoreError::Data { .. }));
    }

    #[test]
    fn duplicate_region_fails_closed() {
        let err = RegionCatalog::build(
            vec![record("A", 1), record("a", 2)],
            &BTreeSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Data { .. }));
    }

    #[test]
    fn zero_population_fails_closed() {
        let err = RegionCatalog::build(vec![record("A", 0)], &BTreeSet::new()).unwrap_err();
        assert!(matches!(err, CoreError::Data { .. }));
    }

    #[test]
    fn population_overflow_fails_closed() {
        let err = RegionCatalog::build(
            vec![record("A", u64::MAX), record("B", 1)],
            &BTreeSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Data { .. }));
    }
}
