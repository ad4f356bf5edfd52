use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartView},
        orders::{
            CreatedOrderView, GeneratedPayment, Navigation, OrderDetail, OrderList, OrderSummary,
            PaymentBadge, PaymentLine,
        },
        payments::{
            ConfirmPaymentRequest, ConfirmationView, PaymentForm, PaymentPage, ProcessorRedirect,
        },
        products::{PageCursor, ProductPage, ProductPageLinks},
    },
    models::{Cart, CartItem, Order, OrderItem, OrderStatus, PageInfo, PaymentIntent, Product},
    response::{ApiResponse, Meta},
    routes::{cart, confirm, health, orders, params, payments, products},
    tracker::{AttemptSource, InvalidPayment, OrderAction},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        cart::cart_view,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::cancel_order,
        orders::generate_payment,
        payments::payment_page,
        payments::payment_page_for_attempt,
        payments::confirm_payment,
        payments::confirm_payment_for_attempt,
        payments::cancel_payment,
        confirm::confirmation
    ),
    components(
        schemas(
            Product,
            PageInfo,
            Cart,
            CartItem,
            Order,
            OrderItem,
            OrderStatus,
            PaymentIntent,
            OrderAction,
            AttemptSource,
            InvalidPayment,
            AddToCartRequest,
            CartView,
            PageCursor,
            ProductPageLinks,
            ProductPage,
            OrderSummary,
            OrderDetail,
            OrderList,
            PaymentBadge,
            PaymentLine,
            CreatedOrderView,
            GeneratedPayment,
            PaymentForm,
            PaymentPage,
            ConfirmPaymentRequest,
            ProcessorRedirect,
            ConfirmationView,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<ProductPage>,
            ApiResponse<OrderList>,
            ApiResponse<OrderDetail>,
            ApiResponse<PaymentPage>,
            ApiResponse<Navigation<CreatedOrderView>>,
            ApiResponse<Navigation<GeneratedPayment>>,
            ApiResponse<Navigation<ProcessorRedirect>>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment attempt endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
