//! Pre-persist validation of company listings.
//!
//! Violations are surfaced to the caller, never repaired in place.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::entities::Company;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{company}: all produced-goods fields must be filled")]
    EmptyGoodName { company: String },
    #[error("{company}: duplicate goods found: {}", .duplicates.join(", "))]
    DuplicateGoods {
        company: String,
        duplicates: Vec<String>,
    },
}

/// Within one company, good names must form a set: no blanks, no repeats.
pub fn validate_company(company: &Company) -> Result<(), ValidationError> {
    if company
        .goods
        .iter()
        .any(|good| good.produced_good.trim().is_empty())
    {
        return Err(ValidationError::EmptyGoodName {
            company: company.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for good in &company.goods {
        if !seen.insert(good.produced_good.as_str())
            && !duplicates.contains(&good.produced_good)
        {
            duplicates.push(good.produced_good.clone());
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DuplicateGoods {
            company: company.name.clone(),
            duplicates,
        })
    }
}

/// Every violation across the dataset, one entry per offending company.
pub fn validate_dataset(companies: &[Company]) -> Vec<ValidationError> {
    companies
        .iter()
        .filter_map(|company| validate_company(company).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Good;

    fn company_with(goods: &[&str]) -> Company {
        Company {
            name: "Acme".to_string(),
            goods: goods
                .iter()
                .map(|name| Good {
                    produced_good: (*name).to_string(),
                    ..Good::default()
                })
                .collect(),
            ..Company::default()
        }
    }

    #[test]
    fn unique_non_empty_goods_pass() {
        assert_eq!(validate_company(&company_with(&["Steel", "Iron"])), Ok(()));
    }

    #[test]
    fn empty_good_name_is_rejected() {
        let result = validate_company(&company_with(&["Steel", ""]));
        assert_eq!(
            result,
            Err(ValidationError::EmptyGoodName {
                company: "Acme".to_string()
            })
        );
    }

    #[test]
    fn duplicates_are_named_once_each() {
        let result = validate_company(&company_with(&["Steel", "Iron", "Steel", "Steel"]));
        assert_eq!(
            result,
            Err(ValidationError::DuplicateGoods {
                company: "Acme".to_string(),
                duplicates: vec!["Steel".to_string()],
            })
        );
    }

    #[test]
    fn dataset_validation_collects_per_company() {
        let companies = vec![
            company_with(&["Steel"]),
            company_with(&["Ale", "Ale"]),
            company_with(&["Water"]),
        ];
        let errors = validate_dataset(&companies);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::DuplicateGoods { .. }));
    }
}
