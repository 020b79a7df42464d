use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{placeholder, InvoiceStore};
use crate::models::{
    Customer, CustomerField, CustomerSummaryRaw, Invoice, InvoiceAmountRow, InvoiceFormRaw,
    InvoiceRow, InvoiceStatus, InvoiceStatusTotals, LatestInvoiceRaw, Revenue,
};

/// In-process tables with the same query semantics as the PostgreSQL store.
/// Backs `--demo` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<Vec<Customer>>,
    invoices: RwLock<Vec<Invoice>>,
    revenue: RwLock<Vec<Revenue>>,
}

impl MemoryStore {
    pub fn new(customers: Vec<Customer>, invoices: Vec<Invoice>, revenue: Vec<Revenue>) -> Self {
        Self {
            customers: RwLock::new(customers),
            invoices: RwLock::new(invoices),
            revenue: RwLock::new(revenue),
        }
    }

    /// Store preloaded with the sample customers, invoices and a year of revenue
    pub fn placeholder() -> Self {
        Self::new(
            placeholder::customers(),
            placeholder::invoices(),
            placeholder::revenue(),
        )
    }

    /// Inner join of invoices with their customers, newest first
    async fn joined(&self) -> Vec<(Invoice, Customer)> {
        let customers = self.customers.read().await;
        let invoices = self.invoices.read().await;

        let mut joined: Vec<(Invoice, Customer)> = invoices
            .iter()
            .filter_map(|invoice| {
                customers
                    .iter()
                    .find(|c| c.id == invoice.customer_id)
                    .map(|customer| (invoice.clone(), customer.clone()))
            })
            .collect();

        joined.sort_by(|a, b| b.0.date.cmp(&a.0.date));
        joined
    }

    async fn matching_invoices(&self, query: &str) -> Vec<(Invoice, Customer)> {
        let needle = query.to_lowercase();

        self.joined()
            .await
            .into_iter()
            .filter(|(invoice, customer)| {
                contains(&customer.name, &needle)
                    || contains(&customer.email, &needle)
                    || contains(&invoice.amount.to_string(), &needle)
                    || contains(&invoice.date.format("%Y-%m-%d").to_string(), &needle)
                    || contains(invoice.status.as_str(), &needle)
            })
            .collect()
    }
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn revenue(&self) -> Result<Vec<Revenue>> {
        let mut revenue = self.revenue.read().await.clone();
        revenue.sort_by_key(Revenue::month_index);
        Ok(revenue)
    }

    async fn latest_invoices(&self, limit: i64) -> Result<Vec<LatestInvoiceRaw>> {
        let latest = self
            .joined()
            .await
            .into_iter()
            .take(to_usize(limit))
            .map(|(invoice, customer)| LatestInvoiceRaw {
                id: invoice.id,
                name: customer.name,
                image_url: customer.image_url,
                email: customer.email,
                amount: invoice.amount,
            })
            .collect();

        Ok(latest)
    }

    async fn count_invoices(&self) -> Result<i64> {
        Ok(self.invoices.read().await.len() as i64)
    }

    async fn count_customers(&self) -> Result<i64> {
        Ok(self.customers.read().await.len() as i64)
    }

    async fn invoice_status_totals(&self) -> Result<InvoiceStatusTotals> {
        let invoices = self.invoices.read().await;
        if invoices.is_empty() {
            return Ok(InvoiceStatusTotals::default());
        }

        let sum = |status: InvoiceStatus| {
            invoices
                .iter()
                .filter(|i| i.status == status)
                .map(|i| i64::from(i.amount))
                .sum::<i64>()
        };

        Ok(InvoiceStatusTotals {
            paid: Some(sum(InvoiceStatus::Paid)),
            pending: Some(sum(InvoiceStatus::Pending)),
        })
    }

    async fn filtered_invoices(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<InvoiceRow>> {
        let rows = self
            .matching_invoices(query)
            .await
            .into_iter()
            .skip(to_usize(offset))
            .take(to_usize(limit))
            .map(|(invoice, customer)| InvoiceRow {
                id: invoice.id,
                customer_id: invoice.customer_id,
                name: customer.name,
                email: customer.email,
                image_url: customer.image_url,
                date: invoice.date,
                amount: invoice.amount,
                status: invoice.status,
            })
            .collect();

        Ok(rows)
    }

    async fn count_filtered_invoices(&self, query: &str) -> Result<i64> {
        Ok(self.matching_invoices(query).await.len() as i64)
    }

    async fn invoice_by_id(&self, id: i32) -> Result<Option<InvoiceFormRaw>> {
        let invoices = self.invoices.read().await;

        Ok(invoices.iter().find(|i| i.id == id).map(|i| InvoiceFormRaw {
            id: i.id,
            customer_id: i.customer_id,
            amount: i.amount,
            status: i.status,
        }))
    }

    async fn customers(&self) -> Result<Vec<CustomerField>> {
        let mut customers: Vec<CustomerField> = self
            .customers
            .read()
            .await
            .iter()
            .map(|c| CustomerField {
                id: c.id,
                name: c.name.clone(),
            })
            .collect();

        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummaryRaw>> {
        let needle = query.to_lowercase();
        let customers = self.customers.read().await;
        let invoices = self.invoices.read().await;

        let mut summaries: Vec<CustomerSummaryRaw> = customers
            .iter()
            .filter(|c| contains(&c.name, &needle) || contains(&c.email, &needle))
            .map(|c| {
                let owned: Vec<&Invoice> = invoices.iter().filter(|i| i.customer_id == c.id).collect();
                let total = |status: InvoiceStatus| {
                    owned
                        .iter()
                        .filter(|i| i.status == status)
                        .map(|i| i64::from(i.amount))
                        .sum::<i64>()
                };

                CustomerSummaryRaw {
                    id: c.id,
                    name: c.name.clone(),
                    email: c.email.clone(),
                    image_url: c.image_url.clone(),
                    total_invoices: owned.len() as i64,
                    total_pending: total(InvoiceStatus::Pending),
                    total_paid: total(InvoiceStatus::Paid),
                }
            })
            .collect();

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn all_invoices(&self) -> Result<Vec<Invoice>> {
        Ok(self.invoices.read().await.clone())
    }

    async fn invoices_with_amount(&self, amount: i32) -> Result<Vec<InvoiceAmountRow>> {
        let rows = self
            .joined()
            .await
            .into_iter()
            .filter(|(invoice, _)| invoice.amount == amount)
            .map(|(invoice, customer)| InvoiceAmountRow {
                amount: invoice.amount,
                name: customer.name,
            })
            .collect();

        Ok(rows)
    }

    async fn replace_revenue(&self, rows: &[Revenue]) -> Result<()> {
        let mut revenue = self.revenue.write().await;
        revenue.clear();
        revenue.extend_from_slice(rows);

        Ok(())
    }
}
