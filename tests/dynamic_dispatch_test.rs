mod common;

use common::{countries, physical_fixture};
use ppcp_button::domain::ports::{ConsignmentGatewayBox, ProviderOrderApiBox};
use ppcp_button::domain::order::{CreateOrderRequest, ProviderOrderStatus};
use ppcp_button::infrastructure::in_memory::{InMemoryPaypal, InMemoryStorefront};

#[tokio::test]
async fn test_collaborators_as_trait_objects() {
    let gateway: ConsignmentGatewayBox = Box::new(InMemoryStorefront::new(physical_fixture()));
    let orders: ProviderOrderApiBox = Box::new(InMemoryPaypal::new());

    // Verify Send + Sync by spawning tasks
    let gateway_handle = tokio::spawn(async move { gateway.get_store_countries().await.unwrap() });

    let orders_handle = tokio::spawn(async move {
        let order_id = orders
            .create_order(CreateOrderRequest {
                cart_id: "cart-1".to_string(),
                is_credit: false,
            })
            .await
            .unwrap();
        orders.capture(&order_id).await.unwrap()
    });

    assert_eq!(gateway_handle.await.unwrap(), countries());
    assert_eq!(orders_handle.await.unwrap(), ProviderOrderStatus::Completed);
}
