mod memory;
mod placeholder;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::config::Config;
use crate::models::{
    CustomerField, CustomerSummaryRaw, Invoice, InvoiceAmountRow, InvoiceFormRaw, InvoiceRow,
    InvoiceStatusTotals, LatestInvoiceRaw, Revenue,
};

pub use memory::MemoryStore;

/// Raw access to the dashboard tables. Every method issues one statement and
/// returns the store's own error untouched; translating failures is the
/// gateway's job.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn revenue(&self) -> Result<Vec<Revenue>>;

    /// Most recent invoices joined with their customer, newest first
    async fn latest_invoices(&self, limit: i64) -> Result<Vec<LatestInvoiceRaw>>;

    async fn count_invoices(&self) -> Result<i64>;

    async fn count_customers(&self) -> Result<i64>;

    async fn invoice_status_totals(&self) -> Result<InvoiceStatusTotals>;

    /// Invoices whose customer name, email, amount, date or status contains
    /// `query` (case-insensitive), newest first
    async fn filtered_invoices(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<InvoiceRow>>;

    async fn count_filtered_invoices(&self, query: &str) -> Result<i64>;

    async fn invoice_by_id(&self, id: i32) -> Result<Option<InvoiceFormRaw>>;

    async fn customers(&self) -> Result<Vec<CustomerField>>;

    /// Per-customer invoice totals for customers whose name or email contains `query`
    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummaryRaw>>;

    async fn all_invoices(&self) -> Result<Vec<Invoice>>;

    async fn invoices_with_amount(&self, amount: i32) -> Result<Vec<InvoiceAmountRow>>;

    /// Delete every revenue row and insert `rows` in their place
    async fn replace_revenue(&self, rows: &[Revenue]) -> Result<()>;
}

/// Build an ILIKE pattern matching `query` as a literal substring
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// PostgreSQL-backed store over a connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(config.database_url()?)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.get_pool()).await?;

        Ok(())
    }
}

const INVOICE_FILTER: &str = r#"
    customers.name ILIKE $1 OR
    customers.email ILIKE $1 OR
    invoices.amount::text ILIKE $1 OR
    invoices.date::text ILIKE $1 OR
    invoices.status ILIKE $1
"#;

#[async_trait]
impl InvoiceStore for Database {
    async fn revenue(&self) -> Result<Vec<Revenue>> {
        let revenue = sqlx::query_as::<_, Revenue>(
            r#"
            SELECT month, revenue
            FROM revenue
            ORDER BY array_position(
                ARRAY['Jan','Feb','Mar','Apr','May','Jun','Jul','Aug','Sep','Oct','Nov','Dec']::text[],
                month::text
            )
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(revenue)
    }

    async fn latest_invoices(&self, limit: i64) -> Result<Vec<LatestInvoiceRaw>> {
        let invoices = sqlx::query_as::<_, LatestInvoiceRaw>(
            r#"
            SELECT invoices.amount, customers.name, customers.image_url, customers.email, invoices.id
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.get_pool())
        .await?;

        Ok(invoices)
    }

    async fn count_invoices(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn count_customers(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn invoice_status_totals(&self) -> Result<InvoiceStatusTotals> {
        let totals = sqlx::query_as::<_, InvoiceStatusTotals>(
            r#"
            SELECT
                SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END)::bigint AS paid,
                SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END)::bigint AS pending
            FROM invoices
            "#,
        )
        .fetch_one(self.get_pool())
        .await?;

        Ok(totals)
    }

    async fn filtered_invoices(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<InvoiceRow>> {
        let sql = format!(
            r#"
            SELECT
                invoices.id,
                invoices.customer_id,
                invoices.amount,
                invoices.date,
                invoices.status,
                customers.name,
                customers.email,
                customers.image_url
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {INVOICE_FILTER}
            ORDER BY invoices.date DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let invoices = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(like_pattern(query))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.get_pool())
            .await?;

        Ok(invoices)
    }

    async fn count_filtered_invoices(&self, query: &str) -> Result<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {INVOICE_FILTER}
            "#
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(like_pattern(query))
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn invoice_by_id(&self, id: i32) -> Result<Option<InvoiceFormRaw>> {
        let invoice = sqlx::query_as::<_, InvoiceFormRaw>(
            r#"
            SELECT invoices.id, invoices.customer_id, invoices.amount, invoices.status
            FROM invoices
            WHERE invoices.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(invoice)
    }

    async fn customers(&self) -> Result<Vec<CustomerField>> {
        let customers =
            sqlx::query_as::<_, CustomerField>("SELECT id, name FROM customers ORDER BY name ASC")
                .fetch_all(self.get_pool())
                .await?;

        Ok(customers)
    }

    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummaryRaw>> {
        let customers = sqlx::query_as::<_, CustomerSummaryRaw>(
            r#"
            SELECT
                customers.id,
                customers.name,
                customers.email,
                customers.image_url,
                COUNT(invoices.id) AS total_invoices,
                COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_pending,
                COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE
                customers.name ILIKE $1 OR
                customers.email ILIKE $1
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(self.get_pool())
        .await?;

        Ok(customers)
    }

    async fn all_invoices(&self) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT id, customer_id, amount, status, date FROM invoices",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(invoices)
    }

    async fn invoices_with_amount(&self, amount: i32) -> Result<Vec<InvoiceAmountRow>> {
        let rows = sqlx::query_as::<_, InvoiceAmountRow>(
            r#"
            SELECT invoices.amount, customers.name
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE invoices.amount = $1
            "#,
        )
        .bind(amount)
        .fetch_all(self.get_pool())
        .await?;

        Ok(rows)
    }

    async fn replace_revenue(&self, rows: &[Revenue]) -> Result<()> {
        // The connection goes back to the pool when it drops, on success or error
        let mut conn = self.pool.acquire().await?;

        sqlx::query("DELETE FROM revenue").execute(&mut *conn).await?;

        if rows.is_empty() {
            return Ok(());
        }

        let mut insert = QueryBuilder::<Postgres>::new("INSERT INTO revenue (month, revenue) ");
        insert.push_values(rows, |mut row, revenue| {
            row.push_bind(revenue.month.clone())
                .push_bind(revenue.revenue);
        });
        insert.build().execute(&mut *conn).await?;

        Ok(())
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connection established"
    );

    Ok(db)
}
