/// Financial report aggregation and CSV serialization
///
/// The builder takes already-fetched payments, expenses, and renovation
/// line items for a property and a calendar year and buckets them in
/// application code. No queries happen here; the route layer fetches the
/// three row sets concurrently and hands them in.
///
/// Income is rent payments by `paid_on` month. Expense buckets combine the
/// expenses table and dated renovation line items, since both are cash out
/// the door. The category breakdown covers the expenses table only;
/// renovation spend is surfaced as its own line.
///
/// All amounts are in cents. A year with no rows yields twelve zeroed
/// months rather than an error.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::expense::{Expense, ExpenseCategory};
use crate::models::payment::Payment;
use crate::models::renovation::RenovationItem;

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotals {
    /// Month number, 1 through 12
    pub month: u32,

    /// Rent received in cents
    pub income_cents: i64,

    /// Expenses plus renovation spend in cents
    pub expense_cents: i64,

    /// Income minus expenses in cents
    pub net_cents: i64,
}

/// Total for one expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Expense category
    pub category: ExpenseCategory,

    /// Total in cents
    pub total_cents: i64,
}

/// Financial report for one property over one calendar year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Property the report covers
    pub property_id: Uuid,

    /// Calendar year
    pub year: i32,

    /// Per-month totals, always twelve entries, January first
    pub months: Vec<MonthTotals>,

    /// Expense-table totals per category, in display order
    pub categories: Vec<CategoryTotal>,

    /// Renovation line item spend in cents
    pub renovation_cents: i64,

    /// Rent received over the year in cents
    pub total_income_cents: i64,

    /// Expenses plus renovation spend over the year in cents
    pub total_expense_cents: i64,

    /// Income minus expenses over the year in cents
    pub net_cents: i64,
}

/// First and last day of a calendar year, for range queries
pub fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    // Both dates exist for every year sqlx can store
    let from = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let to = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (from, to)
}

/// Builds a financial report from already-fetched rows
///
/// Rows outside `year` are ignored, so callers may pass unfiltered data.
pub fn build_financial_report(
    property_id: Uuid,
    year: i32,
    payments: &[Payment],
    expenses: &[Expense],
    renovation_items: &[RenovationItem],
) -> FinancialReport {
    let mut income = [0i64; 12];
    let mut expense = [0i64; 12];
    let mut category_totals = [0i64; 7];
    let mut renovation_cents = 0i64;

    for payment in payments {
        if payment.paid_on.year() == year {
            income[payment.paid_on.month0() as usize] += payment.amount_cents;
        }
    }

    for row in expenses {
        if row.incurred_on.year() != year {
            continue;
        }
        expense[row.incurred_on.month0() as usize] += row.amount_cents;
        let slot = ExpenseCategory::all()
            .iter()
            .position(|c| *c == row.category)
            .unwrap_or(category_totals.len() - 1);
        category_totals[slot] += row.amount_cents;
    }

    for item in renovation_items {
        if let Some(purchased_on) = item.purchased_on {
            if purchased_on.year() == year {
                expense[purchased_on.month0() as usize] += item.cost_cents;
                renovation_cents += item.cost_cents;
            }
        }
    }

    let months: Vec<MonthTotals> = (0..12)
        .map(|i| MonthTotals {
            month: i as u32 + 1,
            income_cents: income[i],
            expense_cents: expense[i],
            net_cents: income[i] - expense[i],
        })
        .collect();

    let categories: Vec<CategoryTotal> = ExpenseCategory::all()
        .iter()
        .enumerate()
        .map(|(i, category)| CategoryTotal {
            category: *category,
            total_cents: category_totals[i],
        })
        .collect();

    let total_income_cents: i64 = income.iter().sum();
    let total_expense_cents: i64 = expense.iter().sum();

    FinancialReport {
        property_id,
        year,
        months,
        categories,
        renovation_cents,
        total_income_cents,
        total_expense_cents,
        net_cents: total_income_cents - total_expense_cents,
    }
}

impl FinancialReport {
    /// Serializes the report as CSV
    ///
    /// Monthly rows first, then the category breakdown, then totals.
    /// Amounts are rendered as dollars with two decimal places.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        push_row(&mut out, &["month", "income", "expenses", "net"]);
        for month in &self.months {
            push_row(
                &mut out,
                &[
                    &format!("{}-{:02}", self.year, month.month),
                    &format_dollars(month.income_cents),
                    &format_dollars(month.expense_cents),
                    &format_dollars(month.net_cents),
                ],
            );
        }

        out.push('\n');
        push_row(&mut out, &["category", "total"]);
        for entry in &self.categories {
            push_row(
                &mut out,
                &[entry.category.as_str(), &format_dollars(entry.total_cents)],
            );
        }
        push_row(
            &mut out,
            &["renovations", &format_dollars(self.renovation_cents)],
        );

        out.push('\n');
        push_row(&mut out, &["total income", &format_dollars(self.total_income_cents)]);
        push_row(
            &mut out,
            &["total expenses", &format_dollars(self.total_expense_cents)],
        );
        push_row(&mut out, &["net", &format_dollars(self.net_cents)]);

        out
    }
}

/// Renders cents as a dollar amount with two decimal places
fn format_dollars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Appends one CSV row, quoting fields that need it
fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

/// Quotes a field if it contains a comma, quote, or newline
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        let mut quoted = String::with_capacity(field.len() + 2);
        quoted.push('"');
        for c in field.chars() {
            if c == '"' {
                quoted.push('"');
            }
            quoted.push(c);
        }
        quoted.push('"');
        quoted
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::PaymentMethod;
    use chrono::Utc;

    fn payment(amount_cents: i64, paid_on: NaiveDate) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            lease_id: Uuid::new_v4(),
            amount_cents,
            paid_on,
            method: PaymentMethod::Transfer,
            memo: None,
            created_at: Utc::now(),
        }
    }

    fn expense(amount_cents: i64, incurred_on: NaiveDate, category: ExpenseCategory) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            amount_cents,
            incurred_on,
            category,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(cost_cents: i64, purchased_on: Option<NaiveDate>) -> RenovationItem {
        RenovationItem {
            id: Uuid::new_v4(),
            renovation_id: Uuid::new_v4(),
            description: "materials".to_string(),
            cost_cents,
            purchased_on,
            vendor: None,
            created_at: Utc::now(),
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_empty_year_yields_twelve_zeroed_months() {
        let report = build_financial_report(Uuid::new_v4(), 2025, &[], &[], &[]);

        assert_eq!(report.months.len(), 12);
        assert!(report.months.iter().all(|m| m.income_cents == 0
            && m.expense_cents == 0
            && m.net_cents == 0));
        assert_eq!(report.months[0].month, 1);
        assert_eq!(report.months[11].month, 12);
        assert_eq!(report.total_income_cents, 0);
        assert_eq!(report.total_expense_cents, 0);
        assert_eq!(report.net_cents, 0);
    }

    #[test]
    fn test_buckets_by_month() {
        let payments = vec![
            payment(150_000, date(2025, 1, 5)),
            payment(150_000, date(2025, 1, 20)),
            payment(150_000, date(2025, 3, 5)),
        ];
        let expenses = vec![expense(40_000, date(2025, 1, 15), ExpenseCategory::Repairs)];

        let report = build_financial_report(Uuid::new_v4(), 2025, &payments, &expenses, &[]);

        assert_eq!(report.months[0].income_cents, 300_000);
        assert_eq!(report.months[0].expense_cents, 40_000);
        assert_eq!(report.months[0].net_cents, 260_000);
        assert_eq!(report.months[1].income_cents, 0);
        assert_eq!(report.months[2].income_cents, 150_000);
        assert_eq!(report.total_income_cents, 450_000);
        assert_eq!(report.net_cents, 410_000);
    }

    #[test]
    fn test_rows_outside_year_ignored() {
        let payments = vec![
            payment(100_000, date(2024, 12, 31)),
            payment(100_000, date(2025, 1, 1)),
            payment(100_000, date(2026, 1, 1)),
        ];

        let report = build_financial_report(Uuid::new_v4(), 2025, &payments, &[], &[]);

        assert_eq!(report.total_income_cents, 100_000);
    }

    #[test]
    fn test_renovation_items_count_as_expenses() {
        let items = vec![
            item(25_000, Some(date(2025, 6, 10))),
            item(10_000, None),
        ];

        let report = build_financial_report(Uuid::new_v4(), 2025, &[], &[], &items);

        assert_eq!(report.renovation_cents, 25_000);
        assert_eq!(report.months[5].expense_cents, 25_000);
        assert_eq!(report.total_expense_cents, 25_000);
        assert_eq!(report.net_cents, -25_000);
    }

    #[test]
    fn test_category_totals_in_display_order() {
        let expenses = vec![
            expense(10_000, date(2025, 2, 1), ExpenseCategory::Taxes),
            expense(5_000, date(2025, 2, 2), ExpenseCategory::Taxes),
            expense(2_000, date(2025, 7, 1), ExpenseCategory::Other),
        ];

        let report = build_financial_report(Uuid::new_v4(), 2025, &[], &expenses, &[]);

        assert_eq!(report.categories.len(), 7);
        let taxes = report
            .categories
            .iter()
            .find(|c| c.category == ExpenseCategory::Taxes)
            .unwrap();
        assert_eq!(taxes.total_cents, 15_000);
        assert_eq!(report.categories[6].category, ExpenseCategory::Other);
        assert_eq!(report.categories[6].total_cents, 2_000);
    }

    #[test]
    fn test_year_bounds() {
        let (from, to) = year_bounds(2025);
        assert_eq!(from, date(2025, 1, 1));
        assert_eq!(to, date(2025, 12, 31));
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0), "0.00");
        assert_eq!(format_dollars(150_000), "1500.00");
        assert_eq!(format_dollars(12_345), "123.45");
        assert_eq!(format_dollars(-9), "-0.09");
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_shape() {
        let payments = vec![payment(100_000, date(2025, 1, 5))];
        let report = build_financial_report(Uuid::new_v4(), 2025, &payments, &[], &[]);
        let csv = report.to_csv();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("month,income,expenses,net"));
        assert_eq!(lines.next(), Some("2025-01,1000.00,0.00,1000.00"));
        assert!(csv.contains("category,total"));
        assert!(csv.contains("total income,1000.00"));
        assert!(csv.contains("net,1000.00"));
    }
}
