mod customer;
mod invoice;
mod revenue;

pub use customer::{Customer, CustomerField, CustomerSummary, CustomerSummaryRaw};
pub use invoice::{
    CardSummary, Invoice, InvoiceAmountRow, InvoiceForm, InvoiceFormRaw, InvoiceRow,
    InvoiceStatus, InvoiceStatusTotals, LatestInvoice, LatestInvoiceRaw,
};
pub use revenue::Revenue;
