//! Public JSON snapshots for third-party consumers.
//!
//! Two documents, refreshed together: `all_goods.json` keyed by good with
//! listings sorted cheapest-first, and `all_companies.json` keyed by
//! company. An external mechanism publishes the files; this module only
//! renders and writes them.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Error as SerdeError;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::domain::entities::{Company, Good};
use crate::util::timezone;

pub const GOODS_SNAPSHOT: &str = "all_goods.json";
pub const COMPANIES_SNAPSHOT: &str = "all_companies.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// One company's offer inside the goods-keyed snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct ListingEntry {
    pub company: String,
    pub good: String,
    pub planet_produced: String,
    pub guildees_pay: f64,
    pub live_exc_price: u32,
    pub live_avg_price: u32,
    pub guild_max: u32,
    pub guild_min: u32,
    pub discount_percent: u32,
    pub discount_fixed: u32,
    pub timezone: String,
    pub professions: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GoodSnapshot {
    pub good: String,
    pub cheapest_price: f64,
    pub cheapest_company: Option<String>,
    pub cheapest_planet: Option<String>,
    pub listings_count: usize,
    pub listings: Vec<ListingEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GoodEntry {
    pub good: String,
    pub planet_produced: String,
    pub guildees_pay: f64,
    pub live_exc_price: u32,
    pub live_avg_price: u32,
    pub guild_max: u32,
    pub guild_min: u32,
    pub discount_percent: u32,
    pub discount_fixed: u32,
}

impl From<&Good> for GoodEntry {
    fn from(good: &Good) -> Self {
        Self {
            good: good.produced_good.clone(),
            planet_produced: good.planet_produced.clone(),
            guildees_pay: good.guildees_pay,
            live_exc_price: good.live_exc_price,
            live_avg_price: good.live_avg_price,
            guild_max: good.guild_max,
            guild_min: good.guild_min,
            discount_percent: good.discount_percent,
            discount_fixed: good.discount_fixed,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CompanySnapshot {
    pub name: String,
    pub industry: String,
    pub professions: Vec<String>,
    pub timezone: String,
    pub local_time: String,
    pub goods_count: usize,
    pub goods: Vec<GoodEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompanyEnvelope {
    pub company: CompanySnapshot,
}

#[derive(Serialize)]
struct GoodsDocument {
    status: &'static str,
    last_updated: String,
    goods_count: usize,
    data: Vec<GoodSnapshot>,
}

#[derive(Serialize)]
struct CompaniesDocument {
    status: &'static str,
    last_updated: String,
    companies_count: usize,
    data: Vec<CompanyEnvelope>,
}

#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub goods: usize,
    pub companies: usize,
    pub goods_path: PathBuf,
    pub companies_path: PathBuf,
}

/// Goods-keyed view: one snapshot per good name (sorted), listings sorted
/// cheapest-first with the winner summarized up front.
pub fn goods_snapshot(companies: &[Company]) -> Vec<GoodSnapshot> {
    let mut by_good: BTreeMap<String, Vec<ListingEntry>> = BTreeMap::new();
    for company in companies {
        let timezone_label = timezone::format_offset(company.timezone_offset_minutes);
        for good in &company.goods {
            if good.produced_good.is_empty() {
                continue;
            }
            by_good
                .entry(good.produced_good.clone())
                .or_default()
                .push(ListingEntry {
                    company: company.name.clone(),
                    good: good.produced_good.clone(),
                    planet_produced: good.planet_produced.clone(),
                    guildees_pay: good.guildees_pay,
                    live_exc_price: good.live_exc_price,
                    live_avg_price: good.live_avg_price,
                    guild_max: good.guild_max,
                    guild_min: good.guild_min,
                    discount_percent: good.discount_percent,
                    discount_fixed: good.discount_fixed,
                    timezone: timezone_label.clone(),
                    professions: company.professions.clone(),
                });
        }
    }

    by_good
        .into_iter()
        .map(|(good, mut listings)| {
            listings.sort_by(|a, b| a.guildees_pay.partial_cmp(&b.guildees_pay).unwrap());
            GoodSnapshot {
                cheapest_price: listings.first().map(|l| l.guildees_pay).unwrap_or(0.0),
                cheapest_company: listings.first().map(|l| l.company.clone()),
                cheapest_planet: listings.first().map(|l| l.planet_produced.clone()),
                listings_count: listings.len(),
                good,
                listings,
            }
        })
        .collect()
}

/// Company-keyed view: companies sorted by name, goods sorted by name;
/// companies without goods are left out.
pub fn company_snapshots(companies: &[Company]) -> Vec<CompanySnapshot> {
    let mut snapshots: Vec<CompanySnapshot> = companies
        .iter()
        .filter(|company| !company.goods.is_empty())
        .map(|company| {
            let mut goods: Vec<&Good> = company.goods.iter().collect();
            goods.sort_by(|a, b| a.produced_good.cmp(&b.produced_good));
            CompanySnapshot {
                name: company.name.clone(),
                industry: company.industry.clone(),
                professions: company.professions.clone(),
                timezone: timezone::format_offset(company.timezone_offset_minutes),
                local_time: timezone::local_time_display(company.timezone_offset_minutes),
                goods_count: goods.len(),
                goods: goods.into_iter().map(GoodEntry::from).collect(),
            }
        })
        .collect();
    snapshots.sort_by(|a, b| a.name.cmp(&b.name));
    snapshots
}

/// Render and write both snapshot documents into `export_dir`.
pub fn export_snapshots(
    companies: &[Company],
    export_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    fs::create_dir_all(export_dir)?;
    let last_updated = OffsetDateTime::now_utc().format(&Rfc3339)?;

    let goods = goods_snapshot(companies);
    let goods_path = export_dir.join(GOODS_SNAPSHOT);
    let goods_count = goods.len();
    let document = GoodsDocument {
        status: "success",
        last_updated: last_updated.clone(),
        goods_count,
        data: goods,
    };
    fs::write(&goods_path, serde_json::to_string_pretty(&document)?)?;
    info!(count = goods_count, path = %goods_path.display(), "exported goods snapshot");

    let snapshots = company_snapshots(companies);
    let companies_path = export_dir.join(COMPANIES_SNAPSHOT);
    let companies_count = snapshots.len();
    let document = CompaniesDocument {
        status: "success",
        last_updated,
        companies_count,
        data: snapshots
            .into_iter()
            .map(|company| CompanyEnvelope { company })
            .collect(),
    };
    fs::write(&companies_path, serde_json::to_string_pretty(&document)?)?;
    info!(count = companies_count, path = %companies_path.display(), "exported companies snapshot");

    Ok(ExportSummary {
        goods: goods_count,
        companies: companies_count,
        goods_path,
        companies_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller(name: &str, offset: i32, goods: &[(&str, f64)]) -> Company {
        Company {
            name: name.to_string(),
            industry: "Metallurgy".to_string(),
            professions: vec!["Metallurgy".to_string()],
            timezone_offset_minutes: offset,
            goods: goods
                .iter()
                .map(|(good, pay)| Good {
                    produced_good: (*good).to_string(),
                    guildees_pay: *pay,
                    ..Good::default()
                })
                .collect(),
        }
    }

    #[test]
    fn goods_view_sorts_listings_cheapest_first() {
        let companies = vec![
            seller("ZorkCorp", 60, &[("Steel", 770.0)]),
            seller("Pear Inc", 0, &[("Steel", 760.0)]),
        ];

        let snapshots = goods_snapshot(&companies);

        assert_eq!(snapshots.len(), 1);
        let steel = &snapshots[0];
        assert_eq!(steel.good, "Steel");
        assert_eq!(steel.cheapest_price, 760.0);
        assert_eq!(steel.cheapest_company.as_deref(), Some("Pear Inc"));
        assert_eq!(steel.listings_count, 2);
        assert_eq!(steel.listings[0].company, "Pear Inc");
        assert_eq!(steel.listings[0].timezone, "UTC +00:00");
    }

    #[test]
    fn goods_view_is_sorted_by_good_name() {
        let companies = vec![seller("A", 0, &[("Truss", 460.0), ("Ale", 70.0)])];
        let snapshots = goods_snapshot(&companies);
        assert_eq!(snapshots[0].good, "Ale");
        assert_eq!(snapshots[1].good, "Truss");
    }

    #[test]
    fn company_view_sorts_and_skips_empty_companies() {
        let companies = vec![
            seller("ZorkCorp", 60, &[("Steel", 770.0), ("Glass", 75.0)]),
            seller("Empty Co", 0, &[]),
            seller("Bane Inc.", -420, &[("Water", 23.0)]),
        ];

        let snapshots = company_snapshots(&companies);

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].name, "Bane Inc.");
        assert_eq!(snapshots[1].name, "ZorkCorp");
        assert_eq!(snapshots[1].goods[0].good, "Glass");
        assert_eq!(snapshots[1].goods_count, 2);
        assert_eq!(snapshots[0].timezone, "UTC -07:00");
    }

    #[test]
    fn snapshot_files_land_in_the_export_dir() {
        let dir = std::env::temp_dir().join(format!(
            "guild_price_board_export_{}",
            std::process::id()
        ));
        let companies = vec![seller("Flip Co", -420, &[("Rations", 34.5)])];

        let summary = export_snapshots(&companies, &dir).unwrap();

        assert_eq!(summary.goods, 1);
        assert_eq!(summary.companies, 1);
        let goods_doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.goods_path).unwrap()).unwrap();
        assert_eq!(goods_doc["status"], "success");
        assert_eq!(goods_doc["goods_count"], 1);
        assert_eq!(goods_doc["data"][0]["good"], "Rations");
        assert_eq!(goods_doc["data"][0]["cheapest_price"], 34.5);

        let companies_doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.companies_path).unwrap()).unwrap();
        assert_eq!(companies_doc["companies_count"], 1);
        assert_eq!(companies_doc["data"][0]["company"]["name"], "Flip Co");

        let _ = fs::remove_dir_all(dir);
    }
}
