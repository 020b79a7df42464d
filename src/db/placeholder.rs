use chrono::NaiveDate;

use crate::models::{Customer, Invoice, InvoiceStatus, Revenue};
use crate::seed::REVENUE_SEED;

const CUSTOMERS: [(i32, &str, &str, &str); 6] = [
    (1, "Evil Rabbit", "evil@rabbit.com", "/customers/evil-rabbit.png"),
    (2, "Delba de Oliveira", "delba@oliveira.com", "/customers/delba-de-oliveira.png"),
    (3, "Lee Robinson", "lee@robinson.com", "/customers/lee-robinson.png"),
    (4, "Michael Novotny", "michael@novotny.com", "/customers/michael-novotny.png"),
    (5, "Amy Burns", "amy@burns.com", "/customers/amy-burns.png"),
    (6, "Balazs Orban", "balazs@orban.com", "/customers/balazs-orban.png"),
];

// (customer_id, amount in cents, status, yyyy, mm, dd)
const INVOICES: [(i32, i32, InvoiceStatus, i32, u32, u32); 13] = [
    (1, 15795, InvoiceStatus::Pending, 2022, 12, 6),
    (2, 20348, InvoiceStatus::Pending, 2022, 11, 14),
    (5, 3040, InvoiceStatus::Paid, 2022, 10, 29),
    (4, 44800, InvoiceStatus::Paid, 2023, 9, 10),
    (6, 34577, InvoiceStatus::Pending, 2023, 8, 5),
    (3, 54246, InvoiceStatus::Pending, 2023, 7, 16),
    (1, 666, InvoiceStatus::Pending, 2023, 6, 27),
    (4, 32545, InvoiceStatus::Paid, 2023, 6, 9),
    (5, 1250, InvoiceStatus::Paid, 2023, 6, 17),
    (6, 8546, InvoiceStatus::Paid, 2023, 6, 7),
    (2, 500, InvoiceStatus::Paid, 2023, 8, 19),
    (6, 8945, InvoiceStatus::Paid, 2023, 6, 3),
    (2, 1000, InvoiceStatus::Paid, 2022, 6, 5),
];

pub fn customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|(id, name, email, image_url)| Customer {
            id: *id,
            name: name.to_string(),
            email: email.to_string(),
            image_url: image_url.to_string(),
        })
        .collect()
}

pub fn invoices() -> Vec<Invoice> {
    INVOICES
        .iter()
        .zip(1..)
        .filter_map(|((customer_id, amount, status, y, m, d), id)| {
            Some(Invoice {
                id,
                customer_id: *customer_id,
                amount: *amount,
                status: *status,
                date: NaiveDate::from_ymd_opt(*y, *m, *d)?,
            })
        })
        .collect()
}

pub fn revenue() -> Vec<Revenue> {
    REVENUE_SEED
        .iter()
        .map(|(month, revenue)| Revenue::new(month, *revenue))
        .collect()
}
