use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

/// Physical dispatch lifecycle shared by storefront orders and delivery orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    Generated,
    Dispatched,
    InTransit,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i32,
    pub invoice_number: String,
    pub order_id: i32,
    pub dealer_name: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Applies a status change, stamping `paid_at` the first time it is paid.
    pub fn apply_status(&mut self, status: InvoiceStatus, now: DateTime<Utc>) {
        if status == InvoiceStatus::Paid && self.paid_at.is_none() {
            self.paid_at = Some(now);
        }
        self.status = status;
    }
}

/// A dispatch record for an order, distinct from the order's commercial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub id: i32,
    pub do_number: String,
    pub order_id: i32,
    pub courier: String,
    pub tracking_number: Option<String>,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl DeliveryOrder {
    /// Applies a status change, stamping dispatch and delivery times once.
    pub fn apply_status(&mut self, status: DeliveryStatus, now: DateTime<Utc>) {
        match status {
            DeliveryStatus::Dispatched if self.dispatched_at.is_none() => {
                self.dispatched_at = Some(now)
            }
            DeliveryStatus::Delivered if self.delivered_at.is_none() => {
                self.delivered_at = Some(now)
            }
            _ => {}
        }
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn status_text_round_trips_through_snake_case() {
        assert_eq!(DeliveryStatus::InTransit.to_string(), "in_transit");
        assert_eq!(
            DeliveryStatus::from_str("in_transit").unwrap(),
            DeliveryStatus::InTransit
        );
        assert!(InvoiceStatus::from_str("refunded").is_err());
    }

    #[test]
    fn delivery_timestamps_are_stamped_once() {
        let created = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let mut record = DeliveryOrder {
            id: 1,
            do_number: "DO-1".into(),
            order_id: 1,
            courier: "BlueDart".into(),
            tracking_number: None,
            status: DeliveryStatus::Generated,
            created_at: created,
            dispatched_at: None,
            delivered_at: None,
        };

        let first = Utc.with_ymd_and_hms(2026, 1, 6, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 1, 7, 9, 0, 0).unwrap();
        record.apply_status(DeliveryStatus::Dispatched, first);
        record.apply_status(DeliveryStatus::Dispatched, second);

        assert_eq!(record.dispatched_at, Some(first));
        assert_eq!(record.delivered_at, None);
        assert_eq!(record.status, DeliveryStatus::Dispatched);

        record.apply_status(DeliveryStatus::Delivered, second);
        assert_eq!(record.delivered_at, Some(second));
        assert_eq!(record.dispatched_at, Some(first));
        assert_eq!(record.status, DeliveryStatus::Delivered);
    }

    #[test]
    fn invoice_paid_at_is_set_when_paid() {
        let issued = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let mut invoice = Invoice {
            id: 1,
            invoice_number: "INV-1".into(),
            order_id: 1,
            dealer_name: "Acme".into(),
            amount: 100,
            status: InvoiceStatus::Sent,
            issued_at: issued,
            due_date: issued,
            paid_at: None,
        };
        invoice.apply_status(InvoiceStatus::Overdue, issued);
        assert_eq!(invoice.paid_at, None);
        invoice.apply_status(InvoiceStatus::Paid, issued);
        assert_eq!(invoice.paid_at, Some(issued));
    }
}
