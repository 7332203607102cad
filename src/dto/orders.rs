use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Order, OrderItem},
    pricing::{CartLine, OrderTotals},
};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CheckoutItem {
    #[serde(alias = "variantId")]
    pub variant_id: Uuid,
    pub qty: i32,
}

impl From<CheckoutItem> for CartLine {
    fn from(item: CheckoutItem) -> Self {
        CartLine {
            variant_id: item.variant_id,
            qty: item.qty,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    /// Falls back to the caller's default address when omitted.
    #[serde(default, alias = "addressId")]
    pub address_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub totals: OrderTotals,
}

/// `pending`, `shipped` or `delivered`; anything else is rejected as a bad request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderWithItems>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checkout_accepts_either_key_style() {
        let id = Uuid::new_v4();
        let camel: CheckoutRequest =
            serde_json::from_value(json!({ "items": [{ "variantId": id, "qty": 2 }] }))
                .expect("camelCase body");
        let snake: CheckoutRequest = serde_json::from_value(
            json!({ "items": [{ "variant_id": id, "qty": 2 }], "address_id": id }),
        )
        .expect("snake_case body");

        assert_eq!(camel.items[0].variant_id, id);
        assert!(camel.address_id.is_none());
        assert_eq!(snake.address_id, Some(id));
    }

    #[test]
    fn checkout_response_uses_camel_case_keys() {
        let body = serde_json::to_value(CheckoutResponse {
            order_id: Uuid::nil(),
            totals: OrderTotals {
                subtotal_cent: 100,
                discount_cent: 0,
                tax_cent: 19,
                shipping_cent: 0,
                total_cent: 119,
            },
        })
        .expect("serialize");
        assert_eq!(body["orderId"], json!(Uuid::nil()));
        assert_eq!(body["totals"]["totalCent"], json!(119));
        assert!(body["totals"].get("total_cent").is_none());
    }
}
