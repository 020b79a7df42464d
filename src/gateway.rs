use std::sync::Arc;

use crate::db::InvoiceStore;
use crate::error::DataFetchError;
use crate::format::format_currency;
use crate::models::{
    CardSummary, CustomerField, CustomerSummary, Invoice, InvoiceAmountRow, InvoiceForm,
    InvoiceRow, LatestInvoice, Revenue,
};
use crate::pagination::{self, ITEMS_PER_PAGE};

const LATEST_INVOICE_COUNT: i64 = 5;

const REVENUE_FAILED: &str = "Failed to fetch revenue data.";
const LATEST_INVOICES_FAILED: &str = "Failed to fetch the latest invoices.";
const CARD_DATA_FAILED: &str = "Failed to fetch card data.";
const INVOICES_FAILED: &str = "Failed to fetch invoices.";
const INVOICE_PAGES_FAILED: &str = "Failed to fetch total number of invoices.";
const INVOICE_FAILED: &str = "Failed to fetch invoice.";
const CUSTOMERS_FAILED: &str = "Failed to fetch all customers.";
const CUSTOMER_TABLE_FAILED: &str = "Failed to fetch customer table.";
const QUERY_FAILED: &str = "Query failed";

/// Log the store's error and replace it with a user-safe message
fn fetch_failed(message: &'static str) -> impl FnOnce(anyhow::Error) -> DataFetchError {
    move |err| {
        tracing::error!("Database Error: {:#}", err);
        DataFetchError::new(message)
    }
}

/// Read operations behind every dashboard page. Each call issues its own
/// queries and fails at most once; nothing is cached or retried.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn InvoiceStore>,
}

impl Gateway {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn InvoiceStore {
        self.store.as_ref()
    }

    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, DataFetchError> {
        tracing::debug!("Fetching revenue data...");

        self.store
            .revenue()
            .await
            .map_err(fetch_failed(REVENUE_FAILED))
    }

    /// The five most recent invoices with their amounts already formatted
    pub async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>, DataFetchError> {
        let rows = self
            .store
            .latest_invoices(LATEST_INVOICE_COUNT)
            .await
            .map_err(fetch_failed(LATEST_INVOICES_FAILED))?;

        Ok(rows
            .into_iter()
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                image_url: row.image_url,
                email: row.email,
                amount: format_currency(i64::from(row.amount)),
            })
            .collect())
    }

    /// Counts and paid/pending totals for the summary cards.
    ///
    /// The three aggregates run concurrently; the first failure abandons the
    /// others and fails the whole call.
    pub async fn fetch_card_data(&self) -> Result<CardSummary, DataFetchError> {
        let (number_of_invoices, number_of_customers, totals) = tokio::try_join!(
            self.store.count_invoices(),
            self.store.count_customers(),
            self.store.invoice_status_totals(),
        )
        .map_err(fetch_failed(CARD_DATA_FAILED))?;

        Ok(CardSummary {
            number_of_invoices,
            number_of_customers,
            total_paid_invoices: format_currency(totals.paid.unwrap_or(0)),
            total_pending_invoices: format_currency(totals.pending.unwrap_or(0)),
        })
    }

    /// One page of invoices matching `query`. `current_page` is 1-indexed.
    pub async fn fetch_filtered_invoices(
        &self,
        query: &str,
        current_page: i64,
    ) -> Result<Vec<InvoiceRow>, DataFetchError> {
        self.store
            .filtered_invoices(query, ITEMS_PER_PAGE, pagination::offset(current_page))
            .await
            .map_err(fetch_failed(INVOICES_FAILED))
    }

    pub async fn fetch_invoice_pages(&self, query: &str) -> Result<i64, DataFetchError> {
        let count = self
            .store
            .count_filtered_invoices(query)
            .await
            .map_err(fetch_failed(INVOICE_PAGES_FAILED))?;

        Ok(pagination::page_count(count, ITEMS_PER_PAGE))
    }

    /// Invoice prepared for the edit form, or `None` when no row has this id
    pub async fn fetch_invoice_by_id(&self, id: i32) -> Result<Option<InvoiceForm>, DataFetchError> {
        let invoice = self
            .store
            .invoice_by_id(id)
            .await
            .map_err(fetch_failed(INVOICE_FAILED))?;

        Ok(invoice.map(|raw| InvoiceForm {
            id: raw.id,
            customer_id: raw.customer_id,
            // cents to dollars
            amount: f64::from(raw.amount) / 100.0,
            status: raw.status,
        }))
    }

    pub async fn fetch_customers(&self) -> Result<Vec<CustomerField>, DataFetchError> {
        self.store
            .customers()
            .await
            .map_err(fetch_failed(CUSTOMERS_FAILED))
    }

    pub async fn fetch_filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummary>, DataFetchError> {
        let rows = self
            .store
            .filtered_customers(query)
            .await
            .map_err(fetch_failed(CUSTOMER_TABLE_FAILED))?;

        Ok(rows
            .into_iter()
            .map(|row| CustomerSummary {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                total_invoices: row.total_invoices,
                total_pending: format_currency(row.total_pending),
                total_paid: format_currency(row.total_paid),
            })
            .collect())
    }

    pub async fn fetch_all_invoices(&self) -> Result<Vec<Invoice>, DataFetchError> {
        self.store
            .all_invoices()
            .await
            .map_err(fetch_failed(INVOICES_FAILED))
    }

    pub async fn fetch_invoices_with_amount(&self, amount: i32) -> Result<Vec<InvoiceAmountRow>, DataFetchError> {
        self.store
            .invoices_with_amount(amount)
            .await
            .map_err(fetch_failed(QUERY_FAILED))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{
        Customer, CustomerSummaryRaw, InvoiceFormRaw, InvoiceStatus, InvoiceStatusTotals,
        LatestInvoiceRaw,
    };
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;

    /// Wraps a `MemoryStore` and fails one named operation. With `stall` set,
    /// every other operation never completes.
    pub(crate) struct BrokenStore {
        pub inner: MemoryStore,
        pub broken: &'static str,
        pub stall: bool,
    }

    impl BrokenStore {
        pub fn failing(broken: &'static str) -> Self {
            Self {
                inner: MemoryStore::placeholder(),
                broken,
                stall: false,
            }
        }

        async fn gate(&self, op: &'static str) -> Result<()> {
            if op == self.broken {
                bail!("connection reset by peer while running {}", op);
            }
            if self.stall {
                std::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    #[async_trait]
    impl InvoiceStore for BrokenStore {
        async fn revenue(&self) -> Result<Vec<Revenue>> {
            self.gate("revenue").await?;
            self.inner.revenue().await
        }

        async fn latest_invoices(&self, limit: i64) -> Result<Vec<LatestInvoiceRaw>> {
            self.gate("latest_invoices").await?;
            self.inner.latest_invoices(limit).await
        }

        async fn count_invoices(&self) -> Result<i64> {
            self.gate("count_invoices").await?;
            self.inner.count_invoices().await
        }

        async fn count_customers(&self) -> Result<i64> {
            self.gate("count_customers").await?;
            self.inner.count_customers().await
        }

        async fn invoice_status_totals(&self) -> Result<InvoiceStatusTotals> {
            self.gate("invoice_status_totals").await?;
            self.inner.invoice_status_totals().await
        }

        async fn filtered_invoices(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<InvoiceRow>> {
            self.gate("filtered_invoices").await?;
            self.inner.filtered_invoices(query, limit, offset).await
        }

        async fn count_filtered_invoices(&self, query: &str) -> Result<i64> {
            self.gate("count_filtered_invoices").await?;
            self.inner.count_filtered_invoices(query).await
        }

        async fn invoice_by_id(&self, id: i32) -> Result<Option<InvoiceFormRaw>> {
            self.gate("invoice_by_id").await?;
            self.inner.invoice_by_id(id).await
        }

        async fn customers(&self) -> Result<Vec<CustomerField>> {
            self.gate("customers").await?;
            self.inner.customers().await
        }

        async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummaryRaw>> {
            self.gate("filtered_customers").await?;
            self.inner.filtered_customers(query).await
        }

        async fn all_invoices(&self) -> Result<Vec<Invoice>> {
            self.gate("all_invoices").await?;
            self.inner.all_invoices().await
        }

        async fn invoices_with_amount(&self, amount: i32) -> Result<Vec<InvoiceAmountRow>> {
            self.gate("invoices_with_amount").await?;
            self.inner.invoices_with_amount(amount).await
        }

        async fn replace_revenue(&self, rows: &[Revenue]) -> Result<()> {
            self.gate("replace_revenue").await?;
            self.inner.replace_revenue(rows).await
        }
    }

    fn placeholder_gateway() -> Gateway {
        Gateway::new(Arc::new(MemoryStore::placeholder()))
    }

    fn customer(id: i32, name: &str) -> Customer {
        Customer {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            image_url: format!("/customers/{}.png", id),
        }
    }

    fn invoice(id: i32, customer_id: i32, amount: i32, day: u32) -> Invoice {
        Invoice {
            id,
            customer_id,
            amount,
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2023, 5, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn latest_invoices_are_newest_first_and_formatted() {
        let gateway = placeholder_gateway();

        let latest = gateway.fetch_latest_invoices().await.unwrap();
        assert_eq!(latest.len(), 5);
        assert!(latest.iter().all(|i| i.amount.starts_with('$')));

        let all = gateway.fetch_all_invoices().await.unwrap();
        let dates: Vec<NaiveDate> = latest
            .iter()
            .map(|l| all.iter().find(|i| i.id == l.id).unwrap().date)
            .collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn latest_invoices_with_fewer_rows() {
        let store = MemoryStore::new(
            vec![customer(1, "Solo")],
            vec![invoice(1, 1, 100, 1), invoice(2, 1, 200, 2)],
            vec![],
        );
        let gateway = Gateway::new(Arc::new(store));

        let latest = gateway.fetch_latest_invoices().await.unwrap();
        assert_eq!(latest.iter().map(|l| l.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(latest[0].amount, "$2.00");
    }

    #[tokio::test]
    async fn card_data_formats_totals() {
        let store = MemoryStore::new(
            vec![customer(1, "Ann"), customer(2, "Bob")],
            vec![
                invoice(1, 1, 250000, 1),
                Invoice {
                    status: InvoiceStatus::Pending,
                    ..invoice(2, 2, 1999, 2)
                },
            ],
            vec![],
        );
        let gateway = Gateway::new(Arc::new(store));

        let cards = gateway.fetch_card_data().await.unwrap();
        assert_eq!(
            cards,
            CardSummary {
                number_of_invoices: 2,
                number_of_customers: 2,
                total_paid_invoices: "$2,500.00".to_string(),
                total_pending_invoices: "$19.99".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn card_data_defaults_missing_sums_to_zero() {
        let gateway = Gateway::new(Arc::new(MemoryStore::default()));

        let cards = gateway.fetch_card_data().await.unwrap();
        assert_eq!(cards.number_of_invoices, 0);
        assert_eq!(cards.total_paid_invoices, "$0.00");
        assert_eq!(cards.total_pending_invoices, "$0.00");
    }

    #[tokio::test]
    async fn card_data_fails_when_any_aggregate_fails() {
        for broken in ["count_invoices", "count_customers", "invoice_status_totals"] {
            let gateway = Gateway::new(Arc::new(BrokenStore::failing(broken)));

            let err = gateway.fetch_card_data().await.unwrap_err();
            assert_eq!(err.message(), "Failed to fetch card data.");
        }
    }

    #[tokio::test]
    async fn card_data_fails_fast_without_waiting_for_other_queries() {
        let store = BrokenStore {
            inner: MemoryStore::placeholder(),
            broken: "count_customers",
            stall: true,
        };
        let gateway = Gateway::new(Arc::new(store));

        let result = tokio::time::timeout(Duration::from_secs(1), gateway.fetch_card_data())
            .await
            .expect("card data should fail without waiting on stalled queries");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failures_hide_the_store_error() {
        let gateway = Gateway::new(Arc::new(BrokenStore::failing("latest_invoices")));

        let err = gateway.fetch_latest_invoices().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch the latest invoices.");
        assert!(!err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn each_operation_reports_its_own_message() {
        let gateway = Gateway::new(Arc::new(BrokenStore::failing("revenue")));
        assert_eq!(
            gateway.fetch_revenue().await.unwrap_err().message(),
            "Failed to fetch revenue data."
        );

        let gateway = Gateway::new(Arc::new(BrokenStore::failing("count_filtered_invoices")));
        assert_eq!(
            gateway.fetch_invoice_pages("").await.unwrap_err().message(),
            "Failed to fetch total number of invoices."
        );

        let gateway = Gateway::new(Arc::new(BrokenStore::failing("filtered_customers")));
        assert_eq!(
            gateway.fetch_filtered_customers("").await.unwrap_err().message(),
            "Failed to fetch customer table."
        );

        let gateway = Gateway::new(Arc::new(BrokenStore::failing("customers")));
        assert_eq!(
            gateway.fetch_customers().await.unwrap_err().message(),
            "Failed to fetch all customers."
        );
    }

    #[tokio::test]
    async fn filtered_invoices_match_amount_as_text() {
        let store = MemoryStore::new(
            vec![customer(1, "Jane"), customer(2, "Omar")],
            vec![invoice(1, 1, 66600, 10), invoice(2, 2, 12000, 11)],
            vec![],
        );
        let gateway = Gateway::new(Arc::new(store));

        let rows = gateway.fetch_filtered_invoices("666", 1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].amount, 66600);
    }

    #[tokio::test]
    async fn filtered_invoices_are_paginated_by_six() {
        let invoices = (1..=14).map(|id| invoice(id, 1, 1000 + id, id as u32)).collect();
        let store = MemoryStore::new(vec![customer(1, "Pager")], invoices, vec![]);
        let gateway = Gateway::new(Arc::new(store));

        let first = gateway.fetch_filtered_invoices("", 1).await.unwrap();
        let second = gateway.fetch_filtered_invoices("", 2).await.unwrap();
        let third = gateway.fetch_filtered_invoices("", 3).await.unwrap();

        assert_eq!(first.len(), 6);
        assert_eq!(second.len(), 6);
        assert_eq!(third.len(), 2);
        // newest first, so page 2 starts at the 7th newest
        assert_eq!(first[0].id, 14);
        assert_eq!(second[0].id, 8);
        assert_eq!(third.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);

        assert_eq!(gateway.fetch_invoice_pages("").await.unwrap(), 3);
        assert_eq!(gateway.fetch_invoice_pages("no such customer").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invoice_by_id_converts_to_dollars() {
        let gateway = placeholder_gateway();

        let form = gateway.fetch_invoice_by_id(1).await.unwrap().unwrap();
        assert_eq!(form.amount, 157.95);
        assert_eq!(form.status, InvoiceStatus::Pending);

        assert_eq!(gateway.fetch_invoice_by_id(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn customers_are_alphabetical() {
        let gateway = placeholder_gateway();

        let customers = gateway.fetch_customers().await.unwrap();
        let names: Vec<&str> = customers.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn filtered_customers_format_totals() {
        let gateway = placeholder_gateway();

        let rows = gateway.fetch_filtered_customers("delba").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Delba de Oliveira");
        assert_eq!(rows[0].total_invoices, 3);
        assert_eq!(rows[0].total_pending, "$203.48");
        assert_eq!(rows[0].total_paid, "$15.00");
    }

    #[tokio::test]
    async fn query_rows_match_exact_amount() {
        let gateway = placeholder_gateway();

        let rows = gateway.fetch_invoices_with_amount(666).await.unwrap();
        assert_eq!(
            rows,
            vec![InvoiceAmountRow {
                amount: 666,
                name: "Evil Rabbit".to_string()
            }]
        );
    }
}
