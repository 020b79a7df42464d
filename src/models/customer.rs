use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct CustomerField {
    pub id: i32,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CustomerSummaryRaw {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: i64,
    pub total_paid: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}
