mod common;

use rust_decimal::Decimal;
use storefront::{
    dto::orders::PaymentBadge,
    error::AppError,
    gateway::StoreGateway,
    models::{OrderStatus, PaymentStatus},
    services::order_service,
    tracker::OrderAction,
};

use common::{harness, place_order};

// Integration flow: add to cart -> create order -> land on the payment page.
#[tokio::test]
async fn create_order_navigates_to_its_payment_page() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    assert!(!order_id.is_empty());

    let order = h.gateway.order(&order_id).expect("order stored");
    assert_eq!(order.order_status, OrderStatus::Pending);
    assert_eq!(order.total, Decimal::new(1998, 2));
    assert_eq!(order.payments.len(), 1);
    assert_eq!(
        order.payments[0].stripe_status,
        PaymentStatus::RequiresPaymentMethod
    );

    let cart = h.state.gateway.get_cart(&h.customer).await?;
    assert!(cart.is_some_and(|c| c.cart_items.is_empty()));
    Ok(())
}

#[tokio::test]
async fn create_order_location_points_at_payments() -> anyhow::Result<()> {
    let h = harness();
    storefront::services::cart_service::add_to_cart(
        &h.state,
        &h.customer,
        storefront::dto::cart::AddToCartRequest {
            product_id: "p2".into(),
            quantity: Some(1),
        },
    )
    .await?;

    let nav = order_service::create_order(&h.state, &h.customer)
        .await?
        .data
        .unwrap();
    assert_eq!(nav.location, format!("/payments/{}", nav.view.order_id));
    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_be_ordered() {
    let h = harness();

    let err = order_service::create_order(&h.state, &h.customer)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::RemoteMutation {
            operation: "createOrder",
            ..
        }
    ));
    assert!(!h.gateway.calls().iter().any(|c| c == "createOrder"));
}

#[tokio::test]
async fn pending_order_with_open_attempt_offers_retry_and_cancel() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;

    let detail = order_service::get_order(&h.state, &h.customer, &order_id)
        .await?
        .data
        .unwrap();
    assert_eq!(
        detail.actions,
        vec![
            OrderAction::RetryPayment,
            OrderAction::CancelPayment,
            OrderAction::CancelOrder
        ]
    );
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].product.name, "Ferris Mug");
    Ok(())
}

#[tokio::test]
async fn closed_orders_offer_nothing() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;

    for status in [OrderStatus::Completed, OrderStatus::Canceled] {
        h.gateway.set_order_status(&order_id, status);
        let detail = order_service::get_order(&h.state, &h.customer, &order_id)
            .await?
            .data
            .unwrap();
        assert!(detail.actions.is_empty(), "{status} must have no actions");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let h = harness();

    let err = order_service::get_order(&h.state, &h.customer, "ord_missing")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn cancel_order_reloads_the_canceled_order() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;

    let detail = order_service::cancel_order(&h.state, &h.customer, &order_id)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.status, OrderStatus::Canceled);
    assert!(detail.actions.is_empty());
    assert_eq!(
        h.gateway.calls(),
        vec!["getOrderById", "cancelOrder", "getOrderById"]
    );
    Ok(())
}

#[tokio::test]
async fn cancel_order_still_pending_is_reported() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    h.gateway.force_cancel_status(OrderStatus::Pending);

    let err = order_service::cancel_order(&h.state, &h.customer, &order_id)
        .await
        .unwrap_err();
    assert!(err.is_mutation_failure());
    match err {
        AppError::CancellationRejected { order_id: id, status } => {
            assert_eq!(id, order_id);
            assert_eq!(status, OrderStatus::Pending);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(h.gateway.calls(), vec!["getOrderById", "cancelOrder"]);
    Ok(())
}

#[tokio::test]
async fn canceled_order_cannot_be_canceled_again() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    h.gateway.set_order_status(&order_id, OrderStatus::Canceled);

    let err = order_service::cancel_order(&h.state, &h.customer, &order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidSelection(_)));
    assert!(!h.gateway.calls().iter().any(|c| c == "cancelOrder"));
    Ok(())
}

#[tokio::test]
async fn new_payment_intent_gets_a_fresh_id() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    let first = h.gateway.order(&order_id).unwrap().payments[0].id.clone();
    h.gateway
        .set_payment_status(&first, PaymentStatus::PaymentFailed);
    h.gateway.set_order_status(&order_id, OrderStatus::Failed);

    let nav = order_service::generate_new_payment_intent(&h.state, &h.customer, &order_id)
        .await?
        .data
        .unwrap();
    assert_ne!(nav.view.payment_id, first);
    assert_eq!(
        nav.location,
        format!("/payments/{order_id}/{}", nav.view.payment_id)
    );

    let order = h.gateway.order(&order_id).unwrap();
    assert_eq!(order.order_status, OrderStatus::Pending);
    assert_eq!(order.payments.len(), 2);
    Ok(())
}

#[tokio::test]
async fn completed_order_gets_no_new_intent() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    h.gateway.set_order_status(&order_id, OrderStatus::Completed);

    let err = order_service::generate_new_payment_intent(&h.state, &h.customer, &order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidSelection(_)));
    assert!(
        !h.gateway
            .calls()
            .iter()
            .any(|c| c == "generateNewPaymentIntent")
    );
    Ok(())
}

#[tokio::test]
async fn succeeded_attempt_blocks_a_new_intent() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    let first = h.gateway.order(&order_id).unwrap().payments[0].id.clone();
    h.gateway.set_payment_status(&first, PaymentStatus::Succeeded);

    let err = order_service::generate_new_payment_intent(&h.state, &h.customer, &order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidSelection(_)));
    assert_eq!(h.gateway.calls(), vec!["getOrderById"]);
    assert_eq!(h.gateway.order(&order_id).unwrap().payments.len(), 1);
    Ok(())
}

#[tokio::test]
async fn open_attempt_is_retried_not_replaced() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;

    let err = order_service::generate_new_payment_intent(&h.state, &h.customer, &order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidSelection(_)));
    assert!(
        !h.gateway
            .calls()
            .iter()
            .any(|c| c == "generateNewPaymentIntent")
    );
    Ok(())
}

#[tokio::test]
async fn reused_attempt_id_is_rejected() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    let first = h.gateway.order(&order_id).unwrap().payments[0].id.clone();
    h.gateway
        .set_payment_status(&first, PaymentStatus::from("canceled"));
    h.gateway.reuse_last_payment_id();

    let err = order_service::generate_new_payment_intent(&h.state, &h.customer, &order_id)
        .await
        .unwrap_err();
    match err {
        AppError::RemoteMutation { operation, message } => {
            assert_eq!(operation, "generateNewPaymentIntent");
            assert!(message.contains(&first));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(
        h.gateway.calls(),
        vec!["getOrderById", "generateNewPaymentIntent"]
    );
    Ok(())
}

#[tokio::test]
async fn orders_list_shows_selected_detail_with_badges() -> anyhow::Result<()> {
    let h = harness();
    let order_id = place_order(&h).await?;
    let first = h.gateway.order(&order_id).unwrap().payments[0].id.clone();
    h.gateway.set_payment_status(&first, PaymentStatus::Succeeded);

    let list = order_service::list_orders(&h.state, &h.customer, Some(order_id.as_str()))
        .await?
        .data
        .unwrap();
    assert_eq!(list.items.len(), 1);
    let selected = list.selected.expect("selected order");
    assert_eq!(selected.id, order_id);
    assert_eq!(selected.payments[0].badge, PaymentBadge::Succeeded);
    assert_eq!(selected.payments[0].status, PaymentStatus::SUCCEEDED);
    // Still PENDING until the backend completes it; no second charge is offered.
    assert_eq!(selected.actions, vec![OrderAction::CancelOrder]);

    let list = order_service::list_orders(&h.state, &h.customer, Some("ord_missing"))
        .await?
        .data
        .unwrap();
    assert!(list.selected.is_none());
    Ok(())
}
