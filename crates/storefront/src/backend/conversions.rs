//! Conversions between backend payloads and storefront types.

use rust_decimal::Decimal;

use pneushop_core::{
    CartLine, OrderLine, Product, ProductId, ShippingAddress, TireSpecifications, round_currency,
};

use super::types::{
    AddressPayload, OrderItemPayload, ProductListResponse, ProductPage, ProductPayload,
    id_to_string,
};

/// Convert a catalog payload into a product snapshot.
pub fn convert_product(payload: ProductPayload) -> Product {
    let stock = u32::try_from(payload.stock.max(0)).unwrap_or(u32::MAX);

    let specifications = match (
        payload.width,
        payload.height,
        payload.diameter,
        payload.load_index,
        payload.speed_rating,
    ) {
        (Some(width), Some(height), Some(diameter), Some(load_index), Some(speed_rating)) => {
            Some(TireSpecifications {
                width,
                height,
                diameter,
                load_index,
                speed_rating,
                season: payload.season.unwrap_or_default(),
            })
        }
        _ => None,
    };

    Product {
        id: ProductId::new(id_to_string(&payload.id)),
        name: payload.name,
        brand: payload.brand,
        model: payload.size.unwrap_or_default(),
        price: payload.price,
        old_price: payload.old_price,
        stock,
        in_stock: stock > 0,
        specifications,
    }
}

/// Convert a catalog listing. A bare list counts as a single page.
pub fn convert_product_page(response: ProductListResponse) -> ProductPage {
    match response {
        ProductListResponse::Paginated {
            results,
            count,
            next,
            previous,
        } => {
            let products: Vec<Product> = results.into_iter().map(convert_product).collect();
            ProductPage {
                count: count.unwrap_or(products.len() as u64),
                products,
                next,
                previous,
            }
        }
        ProductListResponse::Plain(results) => {
            let products: Vec<Product> = results.into_iter().map(convert_product).collect();
            ProductPage {
                count: products.len() as u64,
                products,
                next: None,
                previous: None,
            }
        }
    }
}

/// Normalize a cart line for `POST orders/`, amounts at two decimal places.
pub fn convert_line_item(line: &CartLine) -> OrderItemPayload {
    let frozen = OrderLine::from(line);
    let unit_price = round_currency(frozen.unit_price);
    OrderItemPayload {
        product_id: frozen.product_id.to_string(),
        quantity: frozen.quantity,
        unit_price,
        total_price: round_currency(unit_price * Decimal::from(frozen.quantity)),
        product_name: frozen.product_name,
        specifications: frozen.specifications,
    }
}

impl From<&ShippingAddress> for AddressPayload {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            company: address.company.clone(),
            address: address.address.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
        }
    }
}

impl From<AddressPayload> for ShippingAddress {
    fn from(payload: AddressPayload) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            company: payload.company,
            address: payload.address,
            city: payload.city,
            postal_code: payload.postal_code,
            country: payload.country,
            phone: payload.phone,
        }
    }
}
