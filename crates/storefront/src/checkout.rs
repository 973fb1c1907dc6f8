//! Checkout: pricing summary, input validation and the step flow.
//!
//! ```text
//! shipping → payment → warranty → review → placed
//! ```
//!
//! Each step validates its own input before advancing. Going back is allowed
//! until the order is placed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pneushop_core::{PaymentMethod, PaymentType, ShippingAddress, WarrantyInfo, round_currency};

/// Subtotal from which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Shipping charged below [`FREE_SHIPPING_THRESHOLD`].
pub const FLAT_SHIPPING_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// VAT (TVA) applied to the subtotal, 19 %.
pub const VAT_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

const MIN_PHONE_DIGITS: usize = 8;

/// Reasons checkout cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please log in to place an order")]
    LoginRequired,

    #[error("Invalid checkout details: {}", describe_fields(.0))]
    InvalidFields(Vec<FieldError>),

    /// The requested action does not belong to the current step.
    #[error("Cannot {action} during the {step} step")]
    WrongStep {
        step: CheckoutStep,
        action: &'static str,
    },
}

/// A validation message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Price breakdown shown before placing the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CheckoutSummary {
    /// Compute shipping, VAT and total from the cart subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let subtotal = round_currency(subtotal);
        let shipping = if subtotal >= FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_RATE
        };
        let shipping = round_currency(shipping);
        let tax = round_currency(subtotal * VAT_RATE);

        Self {
            subtotal,
            shipping,
            tax,
            total: round_currency(subtotal + shipping + tax),
        }
    }

    #[must_use]
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Everything the shopper enters during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub warranty: Option<WarrantyInfo>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Run every step's validation at once.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidFields` with all messages collected.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let mut errors = shipping_errors(&self.shipping_address);
        errors.extend(payment_errors(&self.payment_method));
        if let Some(warranty) = &self.warranty {
            errors.extend(warranty_errors(warranty));
        }
        into_result(errors)
    }
}

/// Validate a shipping address.
///
/// # Errors
///
/// Returns `CheckoutError::InvalidFields` listing each missing or malformed
/// field.
pub fn validate_shipping_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    into_result(shipping_errors(address))
}

fn shipping_errors(address: &ShippingAddress) -> Vec<FieldError> {
    let required = [
        ("firstName", &address.first_name, "First name is required"),
        ("lastName", &address.last_name, "Last name is required"),
        ("address", &address.address, "Address is required"),
        ("city", &address.city, "City is required"),
        ("postalCode", &address.postal_code, "Postal code is required"),
        ("country", &address.country, "Country is required"),
        ("phone", &address.phone, "Phone is required"),
    ];

    let mut errors: Vec<FieldError> = required
        .into_iter()
        .filter(|(_, value, _)| value.trim().is_empty())
        .map(|(field, _, message)| FieldError::new(field, message))
        .collect();

    let digits = address.phone.chars().filter(char::is_ascii_digit).count();
    if !address.phone.trim().is_empty() && digits < MIN_PHONE_DIGITS {
        errors.push(FieldError::new(
            "phone",
            format!("Phone must contain at least {MIN_PHONE_DIGITS} digits"),
        ));
    }
    errors
}

fn payment_errors(payment: &PaymentMethod) -> Vec<FieldError> {
    let missing_holder = payment
        .holder_name
        .as_deref()
        .is_none_or(|name| name.trim().is_empty());

    if payment.kind == PaymentType::Card && missing_holder {
        vec![FieldError::new("holderName", "Card holder name is required")]
    } else {
        Vec::new()
    }
}

fn warranty_errors(warranty: &WarrantyInfo) -> Vec<FieldError> {
    if !warranty.accepted {
        return Vec::new();
    }

    let mut errors = Vec::new();
    if warranty.client_name.trim().is_empty() {
        errors.push(FieldError::new("clientName", "Client name is required"));
    }
    if warranty.vehicle_registration.trim().is_empty() {
        errors.push(FieldError::new(
            "vehicleRegistration",
            "Vehicle registration is required",
        ));
    }
    let mileage = warranty.vehicle_mileage.trim();
    if !mileage.is_empty() && !mileage.chars().all(|c| c.is_ascii_digit() || c == ' ') {
        errors.push(FieldError::new("vehicleMileage", "Mileage must be a number"));
    }
    errors
}

fn into_result(errors: Vec<FieldError>) -> Result<(), CheckoutError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::InvalidFields(errors))
    }
}

// =============================================================================
// Step flow
// =============================================================================

/// Checkout steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Warranty,
    Review,
    Placed,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Warranty => "warranty",
            Self::Review => "review",
            Self::Placed => "placed",
        })
    }
}

/// Walks the shopper through the checkout steps.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    shipping_address: Option<ShippingAddress>,
    payment_method: Option<PaymentMethod>,
    warranty: Option<WarrantyInfo>,
    notes: Option<String>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Shipping step: store the address and move to payment.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside the shipping step, or `InvalidFields`.
    pub fn submit_shipping(&mut self, address: ShippingAddress) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Shipping, "submit a shipping address")?;
        validate_shipping_address(&address)?;
        self.shipping_address = Some(address);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Payment step: store the payment choice and move to warranty.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside the payment step, or `InvalidFields`.
    pub fn submit_payment(&mut self, payment: PaymentMethod) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "submit a payment method")?;
        into_result(payment_errors(&payment))?;
        self.payment_method = Some(payment);
        self.step = CheckoutStep::Warranty;
        Ok(())
    }

    /// Warranty step: accept or decline the warranty card, then review.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` outside the warranty step, or `InvalidFields`.
    pub fn submit_warranty(&mut self, warranty: WarrantyInfo) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Warranty, "submit warranty details")?;
        into_result(warranty_errors(&warranty))?;
        self.warranty = Some(warranty);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Attach free-form delivery notes. Allowed at any step before placement.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        if self.step != CheckoutStep::Placed {
            self.notes = Some(notes.into());
        }
    }

    /// Return to the previous step. No-op on the first step and after
    /// placement.
    pub const fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Shipping | CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Warranty => CheckoutStep::Payment,
            CheckoutStep::Review => CheckoutStep::Warranty,
            CheckoutStep::Placed => CheckoutStep::Placed,
        };
    }

    /// The collected form, available once every step has been passed.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` unless the flow is at review.
    pub fn form(&self) -> Result<CheckoutForm, CheckoutError> {
        let wrong_step = || CheckoutError::WrongStep {
            step: self.step,
            action: "review the order",
        };
        if self.step != CheckoutStep::Review {
            return Err(wrong_step());
        }

        Ok(CheckoutForm {
            shipping_address: self.shipping_address.clone().ok_or_else(wrong_step)?,
            payment_method: self.payment_method.clone().ok_or_else(wrong_step)?,
            warranty: self.warranty.clone(),
            notes: self.notes.clone(),
        })
    }

    /// Mark the order as placed. Further changes are rejected.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` unless the flow is at review.
    pub fn mark_placed(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Review, "place the order")?;
        self.step = CheckoutStep::Placed;
        Ok(())
    }

    const fn expect_step(
        &self,
        expected: CheckoutStep,
        action: &'static str,
    ) -> Result<(), CheckoutError> {
        if self.step as u8 == expected as u8 {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                step: self.step,
                action,
            })
        }
    }
}
