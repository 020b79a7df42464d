use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Invoice {
    pub id: i32,
    pub customer_id: i32,
    /// Amount in cents
    pub amount: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Row of the paginated invoices table, joined with its customer
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct InvoiceRow {
    pub id: i32,
    pub customer_id: i32,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub amount: i32,
    pub status: InvoiceStatus,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LatestInvoiceRaw {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LatestInvoice {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub email: String,
    /// Display string, e.g. `$1,234.56`
    pub amount: String,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct InvoiceFormRaw {
    pub id: i32,
    pub customer_id: i32,
    pub amount: i32,
    pub status: InvoiceStatus,
}

/// Invoice as loaded into the edit form, amount in dollars
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub id: i32,
    pub customer_id: i32,
    pub amount: f64,
    pub status: InvoiceStatus,
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct InvoiceAmountRow {
    pub amount: i32,
    pub name: String,
}

/// Raw aggregate of the paid/pending sums; either side is `None` when no invoices exist
#[derive(sqlx::FromRow, Debug, Clone, Default)]
pub struct InvoiceStatusTotals {
    pub paid: Option<i64>,
    pub pending: Option<i64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}
