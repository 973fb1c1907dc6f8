//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. The backend issues
//! numeric ids, but the storefront carries them as strings so that locally
//! synthesized identifiers share the same type.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pneushop_core::define_id;
/// define_id!(SupplierId);
/// define_id!(DeliveryId);
///
/// let supplier = SupplierId::new("12");
/// let delivery = DeliveryId::new("12");
///
/// // These are different types, so this won't compile:
/// // let _: SupplierId = delivery;
/// assert_eq!(supplier.as_str(), delivery.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

/// Prefix of identifiers synthesized by the storefront when the backend could
/// not confirm an order.
pub const LOCAL_ORDER_PREFIX: &str = "ORD-";

impl OrderId {
    /// Build an ID from the numeric identifier assigned by the backend.
    #[must_use]
    pub fn from_remote(id: u64) -> Self {
        Self(id.to_string())
    }

    /// Build a locally synthesized ID (`ORD-<millis>-<suffix>`).
    ///
    /// The prefix keeps local ids out of the backend's numeric id space.
    #[must_use]
    pub fn local(timestamp_millis: i64, suffix: &str) -> Self {
        Self(format!("{LOCAL_ORDER_PREFIX}{timestamp_millis}-{suffix}"))
    }

    /// Whether this ID was synthesized locally rather than issued by the backend.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ORDER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_order_id_is_not_local() {
        let id = OrderId::from_remote(42);
        assert_eq!(id.as_str(), "42");
        assert!(!id.is_local());
    }

    #[test]
    fn test_local_order_id_format() {
        let id = OrderId::local(1_700_000_000_000, "k3j9x0abc");
        assert_eq!(id.as_str(), "ORD-1700000000000-k3j9x0abc");
        assert!(id.is_local());
        assert!(id.as_str().parse::<u64>().is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = ProductId::new("P1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"P1\"");
        let parsed: ProductId = serde_json::from_str("\"P1\"").unwrap();
        assert_eq!(parsed, id);
    }
}
