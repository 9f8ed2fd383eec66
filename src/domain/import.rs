//! Reconstructs the company/goods model from the guild sheet's tabular export.
//!
//! The sheet is human-edited: companies own a run of rows (one listing per
//! row, plus overflow rows for long profession lists), placeholder text
//! stands in for empty dropdowns, and header rows repeat where sections were
//! pasted together. Parsing is tolerant: a bad row is logged and skipped,
//! never fatal to the import.

use thiserror::Error;
use tracing::warn;

use crate::domain::entities::{Company, Good};
use crate::util::timezone;

/// Literal that anchors the header row and resets carry-forward context.
const HEADER_ANCHOR: &str = "Company Name";
/// How many leading rows are scanned for the header anchor.
const HEADER_SCAN_LIMIT: usize = 50;
/// Dropdown placeholders that mean "no profession selected".
const PROFESSION_PLACEHOLDERS: [&str; 3] =
    ["select profession(s)", "select profession", "unknown"];
/// Dropdown placeholder that means "no planet selected".
const PLANET_PLACEHOLDER: &str = "select planet";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("no 'Company Name' header row found in the sheet")]
    HeaderNotFound,
}

/// Column positions of the guild sheet export.
///
/// The layout is a convention with the spreadsheet maintainers; keeping every
/// offset here makes a sheet reshuffle a one-line change instead of a hunt
/// for index literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub company: usize,
    pub profession: usize,
    pub timezone: usize,
    pub good: usize,
    pub planet: usize,
    pub pay: usize,
    pub max: usize,
    pub min: usize,
    pub discount_percent: usize,
    pub discount_fixed: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            company: 0,
            profession: 1,
            timezone: 2,
            good: 12,
            planet: 13,
            pay: 14,
            max: 17,
            min: 18,
            discount_percent: 19,
            discount_fixed: 20,
        }
    }
}

/// Bounds-checked view over one sheet row; out-of-range columns read as blank.
struct RowView<'a> {
    index: usize,
    cells: &'a [String],
}

impl RowView<'_> {
    fn text(&self, column: usize) -> &str {
        self.cells
            .get(column)
            .map(|cell| cell.trim())
            .unwrap_or("")
    }

    /// Currency/percent cell: `$`, `%` and thousands separators stripped.
    /// Blank cells are 0; garbage is logged and defaults to 0 so one typo
    /// never sinks the row.
    fn number(&self, column: usize) -> f64 {
        let cell = self.text(column);
        let cleaned: String = cell
            .chars()
            .filter(|ch| !matches!(ch, '$' | '%' | ','))
            .collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return 0.0;
        }
        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                warn!(row = self.index, column, cell, "unparseable numeric cell, defaulting to 0");
                0.0
            }
        }
    }
}

/// Context carried across rows. A company owns several consecutive rows, so
/// the parser remembers whose rows it is currently reading until a new
/// identity appears or a repeated header resets the section.
#[derive(Clone, Debug, Default)]
struct CarryForward {
    company: Option<String>,
    industry: String,
    professions: Vec<String>,
    timezone_offset_minutes: i32,
}

impl CarryForward {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Parse a materialized 2-D grid of cells into companies.
///
/// Fails only when the header anchor is missing; otherwise returns the
/// (possibly empty) accumulated companies even if rows were skipped.
/// Duplicate goods are deliberately let through; flagging them is the
/// validator's job, after the import.
pub fn parse_sheet(rows: &[Vec<String>], layout: &SheetLayout) -> Result<Vec<Company>, SheetError> {
    let header = rows
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|cells| RowView { index: 0, cells }.text(layout.company) == HEADER_ANCHOR)
        .ok_or(SheetError::HeaderNotFound)?;

    let mut companies: Vec<Company> = Vec::new();
    let mut context = CarryForward::default();

    for (index, cells) in rows.iter().enumerate().skip(header + 1) {
        let row = RowView { index, cells };
        let name_cell = row.text(layout.company);

        // A repeated header starts a new embedded section.
        if name_cell == HEADER_ANCHOR {
            context.reset();
            continue;
        }

        if !name_cell.is_empty() {
            let industry_cell = row.text(layout.profession);
            context.company = Some(name_cell.to_string());
            context.industry = if industry_cell.is_empty() {
                "Unknown".to_string()
            } else {
                industry_cell.to_string()
            };
            context.professions = split_professions(&context.industry);
            context.timezone_offset_minutes =
                timezone::parse_offset_minutes(row.text(layout.timezone));
        }

        let Some(company_name) = context.company.clone() else {
            continue;
        };

        // Long profession lists wrap onto rows with a blank identity column.
        if name_cell.is_empty() {
            let extra = row.text(layout.profession);
            if !extra.is_empty()
                && !is_profession_placeholder(extra)
                && !context.professions.iter().any(|known| known == extra)
            {
                context.professions.push(extra.to_string());
                if let Some(existing) = companies.iter_mut().find(|c| c.name == company_name) {
                    if !existing.professions.iter().any(|known| known == extra) {
                        existing.professions.push(extra.to_string());
                    }
                }
            }
        }

        let good_name = row.text(layout.good);
        if good_name.is_empty() {
            continue;
        }

        let planet = row.text(layout.planet);
        let planet_produced = if planet.eq_ignore_ascii_case(PLANET_PLACEHOLDER) {
            String::new()
        } else {
            planet.to_string()
        };

        let good = Good {
            produced_good: good_name.to_string(),
            planet_produced,
            live_exc_price: 0,
            live_avg_price: 0,
            guild_max: as_amount(row.number(layout.max)),
            guild_min: as_amount(row.number(layout.min)),
            discount_percent: as_amount(row.number(layout.discount_percent)),
            discount_fixed: as_amount(row.number(layout.discount_fixed)),
            guildees_pay: row.number(layout.pay).max(0.0).trunc(),
        };

        // Companies materialize lazily on their first listing; a company row
        // that never produces a listing never reaches the output.
        match companies.iter_mut().find(|c| c.name == company_name) {
            Some(existing) => existing.goods.push(good),
            None => companies.push(Company {
                name: company_name,
                industry: context.industry.clone(),
                professions: if context.professions.is_empty() {
                    vec![context.industry.clone()]
                } else {
                    context.professions.clone()
                },
                timezone_offset_minutes: context.timezone_offset_minutes,
                goods: vec![good],
            }),
        }
    }

    Ok(companies)
}

/// Split the industry/profession cell on comma, ampersand and the word
/// "and"; drop placeholder tokens and duplicates, keep order.
fn split_professions(industry: &str) -> Vec<String> {
    if industry.eq_ignore_ascii_case("unknown") {
        return Vec::new();
    }
    let normalized = industry
        .replace('\n', ",")
        .replace('&', ",")
        .replace(" and ", ",");
    let mut professions: Vec<String> = Vec::new();
    for token in normalized.split(',') {
        let token = token.trim();
        if token.is_empty() || is_profession_placeholder(token) {
            continue;
        }
        if !professions.iter().any(|known| known == token) {
            professions.push(token.to_string());
        }
    }
    professions
}

fn is_profession_placeholder(token: &str) -> bool {
    PROFESSION_PLACEHOLDERS
        .iter()
        .any(|placeholder| token.eq_ignore_ascii_case(placeholder))
}

fn as_amount(value: f64) -> u32 {
    value.max(0.0).trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a grid row with cells at the default layout's positions.
    fn row(company: &str, profession: &str, tz: &str, good: &str, cells: &[(usize, &str)]) -> Vec<String> {
        let mut out = vec![String::new(); 21];
        out[0] = company.to_string();
        out[1] = profession.to_string();
        out[2] = tz.to_string();
        out[12] = good.to_string();
        for (column, value) in cells {
            out[*column] = (*value).to_string();
        }
        out
    }

    fn header() -> Vec<String> {
        row("Company Name", "Industry", "Timezone", "Produced Goods", &[])
    }

    #[test]
    fn missing_header_is_an_error() {
        let grid = vec![row("Acme", "Mining", "UTC +00:00", "Steel", &[])];
        assert_eq!(
            parse_sheet(&grid, &SheetLayout::default()),
            Err(SheetError::HeaderNotFound)
        );
    }

    #[test]
    fn single_company_single_good_round_trip() {
        let grid = vec![
            header(),
            row(
                "Acme",
                "Mining, Hauling",
                "UTC +01:00",
                "Steel",
                &[(13, "Vertex"), (14, "$760"), (17, "850"), (18, "720"), (19, "5%"), (20, "0")],
            ),
        ];

        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();

        assert_eq!(companies.len(), 1);
        let company = &companies[0];
        assert_eq!(company.name, "Acme");
        assert_eq!(company.professions, vec!["Mining", "Hauling"]);
        assert_eq!(company.timezone_offset_minutes, 60);
        assert_eq!(company.goods.len(), 1);
        let good = &company.goods[0];
        assert_eq!(good.produced_good, "Steel");
        assert_eq!(good.planet_produced, "Vertex");
        assert_eq!(good.guildees_pay, 760.0);
        assert_eq!(good.guild_max, 850);
        assert_eq!(good.guild_min, 720);
        assert_eq!(good.discount_percent, 5);
        assert_eq!(good.live_exc_price, 0);
        assert_eq!(good.live_avg_price, 0);
    }

    #[test]
    fn listings_carry_forward_to_the_current_company() {
        let grid = vec![
            header(),
            row("Flip Co", "Agriculture", "UTC -07:00", "Rations", &[(19, "20")]),
            row("", "", "", "Pie", &[(19, "15")]),
            row("", "", "", "Coffee", &[(19, "15")]),
        ];

        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].goods.len(), 3);
        assert_eq!(companies[0].goods[2].produced_good, "Coffee");
        assert_eq!(companies[0].timezone_offset_minutes, -420);
    }

    #[test]
    fn wrapped_profession_rows_extend_an_existing_company() {
        let grid = vec![
            header(),
            row("Acme", "Mining", "UTC +00:00", "Steel", &[]),
            row("", "Hauling", "", "Iron", &[]),
            row("", "Mining", "", "", &[]),
        ];

        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();

        assert_eq!(companies[0].professions, vec!["Mining", "Hauling"]);
        assert_eq!(companies[0].goods.len(), 2);
    }

    #[test]
    fn placeholder_professions_fall_back_to_the_industry_label() {
        let grid = vec![
            header(),
            row("Acme", "Select Profession(s)", "UTC +00:00", "Steel", &[]),
        ];

        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();

        assert_eq!(companies[0].industry, "Select Profession(s)");
        assert_eq!(companies[0].professions, vec!["Select Profession(s)"]);
    }

    #[test]
    fn professions_split_on_ampersand_and_the_word_and() {
        assert_eq!(
            split_professions("Chemistry & Construction and Science"),
            vec!["Chemistry", "Construction", "Science"]
        );
    }

    #[test]
    fn repeated_header_resets_carry_forward() {
        let grid = vec![
            header(),
            row("Acme", "Mining", "UTC +00:00", "Steel", &[]),
            header(),
            row("", "", "", "Orphaned", &[]),
            row("Bane Inc.", "Agriculture", "UTC -07:00", "Water", &[]),
        ];

        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();

        // "Orphaned" had no company context after the reset and is dropped.
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].goods.len(), 1);
        assert_eq!(companies[1].name, "Bane Inc.");
    }

    #[test]
    fn rows_without_a_good_add_no_listing() {
        let grid = vec![header(), row("Acme", "Mining", "UTC +00:00", "", &[])];
        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();
        assert!(companies.is_empty());
    }

    #[test]
    fn planet_placeholder_becomes_empty() {
        let grid = vec![
            header(),
            row("Acme", "Mining", "UTC +00:00", "Steel", &[(13, "Select Planet")]),
        ];
        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();
        assert_eq!(companies[0].goods[0].planet_produced, "");
    }

    #[test]
    fn garbage_numeric_cells_default_to_zero() {
        let grid = vec![
            header(),
            row("Acme", "Mining", "UTC +00:00", "Steel", &[(17, "n/a"), (18, "-50"), (19, "$1,250")]),
        ];
        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();
        let good = &companies[0].goods[0];
        assert_eq!(good.guild_max, 0);
        assert_eq!(good.guild_min, 0);
        assert_eq!(good.discount_percent, 1250);
    }

    #[test]
    fn short_rows_read_as_blank_columns() {
        let short = vec!["Acme".to_string(), "Mining".to_string()];
        let grid = vec![header(), short, row("", "", "", "Steel", &[])];

        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme");
        assert_eq!(companies[0].goods[0].produced_good, "Steel");
    }

    #[test]
    fn duplicate_goods_pass_through_for_the_validator() {
        let grid = vec![
            header(),
            row("Acme", "Mining", "UTC +00:00", "Steel", &[]),
            row("", "", "", "Steel", &[]),
        ];
        let companies = parse_sheet(&grid, &SheetLayout::default()).unwrap();
        assert_eq!(companies[0].goods.len(), 2);
    }

    #[test]
    fn custom_layout_moves_the_columns() {
        let layout = SheetLayout {
            company: 0,
            profession: 1,
            timezone: 2,
            good: 3,
            planet: 4,
            pay: 5,
            max: 6,
            min: 7,
            discount_percent: 8,
            discount_fixed: 9,
        };
        let grid = vec![
            vec!["Company Name".to_string()],
            vec![
                "Acme".to_string(),
                "Mining".to_string(),
                "UTC +00:00".to_string(),
                "Steel".to_string(),
                String::new(),
                "760".to_string(),
                "850".to_string(),
                "720".to_string(),
                "5".to_string(),
                "0".to_string(),
            ],
        ];

        let companies = parse_sheet(&grid, &layout).unwrap();

        assert_eq!(companies[0].goods[0].guild_max, 850);
        assert_eq!(companies[0].goods[0].discount_percent, 5);
    }
}
