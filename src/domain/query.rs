//! Search and lookup helpers over the dataset.
//!
//! Lookups match names exactly; searches are case-insensitive substring
//! matches.

use crate::domain::entities::{Company, Good};

/// Companies offering at least one of the selected professions.
/// An empty selection selects everything.
pub fn filter_by_professions(companies: &[Company], selected: &[String]) -> Vec<Company> {
    if selected.is_empty() {
        return companies.to_vec();
    }
    companies
        .iter()
        .filter(|company| {
            selected
                .iter()
                .any(|wanted| company.professions.iter().any(|have| have == wanted))
        })
        .cloned()
        .collect()
}

/// Companies whose name contains the search term.
pub fn filter_by_company_name(companies: &[Company], search: &str) -> Vec<Company> {
    if search.is_empty() {
        return companies.to_vec();
    }
    let needle = search.to_lowercase();
    companies
        .iter()
        .filter(|company| company.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Companies offering at least one good whose name contains the search term.
pub fn filter_by_goods_name(companies: &[Company], search: &str) -> Vec<Company> {
    if search.is_empty() {
        return companies.to_vec();
    }
    let needle = search.to_lowercase();
    companies
        .iter()
        .filter(|company| {
            company
                .goods
                .iter()
                .any(|good| good.produced_good.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// All three filters in sequence.
pub fn apply_all_filters(
    companies: &[Company],
    professions: &[String],
    company_search: &str,
    goods_search: &str,
) -> Vec<Company> {
    let filtered = filter_by_professions(companies, professions);
    let filtered = filter_by_company_name(&filtered, company_search);
    filter_by_goods_name(&filtered, goods_search)
}

/// Exact-name company lookup.
pub fn find_company<'a>(companies: &'a [Company], name: &str) -> Option<&'a Company> {
    companies.iter().find(|company| company.name == name)
}

/// One company's offer for a good, flattened for price comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    pub company: String,
    pub good: Good,
}

/// Every offer for `good_name` across all companies, cheapest first.
pub fn cheapest_offers(companies: &[Company], good_name: &str) -> Vec<Offer> {
    let mut offers: Vec<Offer> = companies
        .iter()
        .flat_map(|company| {
            company
                .goods
                .iter()
                .filter(|good| good.produced_good.eq_ignore_ascii_case(good_name))
                .map(|good| Offer {
                    company: company.name.clone(),
                    good: good.clone(),
                })
        })
        .collect();
    offers.sort_by(|a, b| a.good.guildees_pay.partial_cmp(&b.good.guildees_pay).unwrap());
    offers
}
