//! Plain records served by the RPC layer.
//!
//! Entities carry no behaviour beyond conversion helpers. All monetary
//! amounts are integer minor currency units.

pub mod billing;
pub mod dealer;
pub mod order;
pub mod product;

pub use billing::{DeliveryOrder, DeliveryStatus, Invoice, InvoiceStatus};
pub use dealer::{AgentProfile, CartLine, Dealer, DealerOrder, DealerOrderStatus, LoyaltyTier};
pub use order::{Order, OrderItem, PaymentStatus};
pub use product::Product;
