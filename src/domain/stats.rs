//! Aggregate statistics over the dataset, used in refresh summaries.

use std::collections::HashSet;

use crate::domain::entities::Company;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetStats {
    pub companies: usize,
    pub unique_goods: usize,
    pub unique_professions: usize,
    pub average_discount: f64,
}

/// Distinct good names across all companies; empty names don't count.
pub fn unique_goods(companies: &[Company]) -> usize {
    let mut names = HashSet::new();
    for company in companies {
        for good in &company.goods {
            if !good.produced_good.is_empty() {
                names.insert(good.produced_good.as_str());
            }
        }
    }
    names.len()
}

/// Mean percent discount over every listing; 0 for an empty dataset.
pub fn average_discount(companies: &[Company]) -> f64 {
    let discounts: Vec<u32> = companies
        .iter()
        .flat_map(|company| company.goods.iter().map(|good| good.discount_percent))
        .collect();
    if discounts.is_empty() {
        return 0.0;
    }
    f64::from(discounts.iter().sum::<u32>()) / discounts.len() as f64
}

/// Every profession in use across the dataset.
pub fn unique_professions(companies: &[Company]) -> HashSet<String> {
    companies
        .iter()
        .flat_map(|company| company.professions.iter().cloned())
        .collect()
}

pub fn dataset_stats(companies: &[Company]) -> DatasetStats {
    DatasetStats {
        companies: companies.len(),
        unique_goods: unique_goods(companies),
        unique_professions: unique_professions(companies).len(),
        average_discount: average_discount(companies),
    }
}
