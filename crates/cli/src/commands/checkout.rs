//! Checkout command.
//!
//! Walks the same steps as the storefront checkout (shipping, payment,
//! warranty, review) from command-line arguments, then places the order.
//!
//! # Usage
//!
//! ```bash
//! pneushop checkout \
//!     --first-name Leila --last-name "Ben Salah" \
//!     --address "4 avenue Habib Bourguiba" --city Sousse --postal-code 4000 \
//!     --phone "+216 73 222 333" --payment cash_on_delivery \
//!     --warranty-client-name "Leila Ben Salah" --warranty-registration "210 TU 1234"
//! ```

use clap::Args;
use serde::Serialize;

use pneushop_core::types::order::DEFAULT_COUNTRY;
use pneushop_core::{PaymentMethod, PaymentType, ShippingAddress, WarrantyInfo};
use pneushop_storefront::checkout::{CheckoutFlow, CheckoutSummary};
use pneushop_storefront::orders::OrderReceipt;

use super::{CliError, open_session, print_json};

/// Checkout details.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub company: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub postal_code: String,

    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    #[arg(long)]
    pub phone: String,

    /// Payment method (`card`, `paypal`, `bank_transfer`, `cash_on_delivery`)
    #[arg(long, default_value = "cash_on_delivery")]
    pub payment: PaymentType,

    /// Card holder name, required for card payments
    #[arg(long)]
    pub holder_name: Option<String>,

    /// Accept the warranty card for this client name
    #[arg(long, requires = "warranty_registration")]
    pub warranty_client_name: Option<String>,

    #[arg(long, requires = "warranty_client_name")]
    pub warranty_registration: Option<String>,

    #[arg(long, requires = "warranty_client_name")]
    pub warranty_mileage: Option<String>,

    /// Delivery notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl CheckoutArgs {
    fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
        }
    }

    fn payment_method(&self) -> PaymentMethod {
        PaymentMethod {
            kind: self.payment,
            holder_name: self.holder_name.clone(),
        }
    }

    fn warranty(&self) -> WarrantyInfo {
        match (&self.warranty_client_name, &self.warranty_registration) {
            (Some(client_name), Some(registration)) => WarrantyInfo {
                accepted: true,
                client_name: client_name.clone(),
                vehicle_registration: registration.clone(),
                vehicle_mileage: self.warranty_mileage.clone().unwrap_or_default(),
            },
            _ => WarrantyInfo::declined(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckoutOutput {
    receipt: OrderReceipt,
    summary: CheckoutSummary,
}

/// Place an order for the current cart.
pub async fn run(args: CheckoutArgs) -> Result<(), CliError> {
    let mut session = open_session()?;
    let summary = session.begin_checkout()?;

    let mut flow = CheckoutFlow::new();
    flow.submit_shipping(args.shipping_address())?;
    flow.submit_payment(args.payment_method())?;
    flow.submit_warranty(args.warranty())?;
    if let Some(notes) = &args.notes {
        flow.set_notes(notes.clone());
    }

    let receipt = session.place_order(flow.form()?).await?;
    flow.mark_placed()?;

    tracing::info!(order_id = %receipt.order_id, source = ?receipt.source, "Order placed");
    print_json(&CheckoutOutput { receipt, summary })
}
