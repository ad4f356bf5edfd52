//! GraphQL documents sent to the gateway.

macro_rules! product_fields {
    () => {
        r#"
fragment ProductFields on Product {
  id
  name
  price
  description
  stock
  isDisabled
  categoryId
  images {
    url
  }
}
"#
    };
}

macro_rules! cart_fields {
    () => {
        r#"
fragment CartFields on Cart {
  id
  userId
  cartItems {
    id
    quantity
    product {
      ...ProductFields
    }
  }
}
"#
    };
}

macro_rules! payment_fields {
    () => {
        r#"
fragment PaymentFields on PaymentIntent {
  id
  orderId
  stripePaymentId
  stripeClientSecret
  stripeStatus
  stripeAmount
  stripeCurrency
  stripePaymentMethod
  createdAt
  updatedAt
}
"#
    };
}

macro_rules! order_fields {
    () => {
        r#"
fragment OrderFields on Order {
  id
  total
  orderStatus
  createdAt
  updatedAt
  userId
  orderItems {
    id
    quantity
    orderId
    product {
      name
      price
      images {
        url
      }
    }
  }
  payments {
    ...PaymentFields
  }
}
"#
    };
}

pub const GET_PRODUCTS: &str = concat!(
    r#"
query GetProducts($first: Int, $after: String) {
  getProducts(getProductsInput: { first: $first, after: $after }) {
    edges {
      node {
        ...ProductFields
      }
      cursor
    }
    pageInfo {
      startCursor
      endCursor
      hasPreviousPage
      hasNextPage
    }
  }
}
"#,
    product_fields!()
);

pub const GET_CART: &str = concat!(
    r#"
query GetCart {
  getCart {
    ...CartFields
  }
}
"#,
    cart_fields!(),
    product_fields!()
);

pub const ADD_ITEM_TO_CART: &str = concat!(
    r#"
mutation AddItemToCart($input: AddItemToCartInput!) {
  addItemToCart(addItemToCartInput: $input) {
    ...CartFields
  }
}
"#,
    cart_fields!(),
    product_fields!()
);

pub const REMOVE_CART_ITEM: &str = r#"
mutation RemoveCartItem($cartItemIdDto: IdDto!) {
  removeCartItem(cartItemIdDto: $cartItemIdDto)
}
"#;

pub const CREATE_ORDER: &str = r#"
mutation CreateOrder {
  createOrder {
    client_secret
    order {
      id
    }
  }
}
"#;

pub const GET_ORDERS: &str = concat!(
    r#"
query GetOrders {
  getOrders {
    ...OrderFields
  }
}
"#,
    order_fields!(),
    payment_fields!()
);

pub const GET_ORDER_BY_ID: &str = concat!(
    r#"
query GetOrderById($orderIdDto: IdDto!) {
  getOrderById(orderIdDto: $orderIdDto) {
    ...OrderFields
  }
}
"#,
    order_fields!(),
    payment_fields!()
);

pub const CANCEL_ORDER: &str = r#"
mutation CancelOrder($orderIdDto: IdDto!) {
  cancelOrder(orderIdDto: $orderIdDto) {
    id
    orderStatus
  }
}
"#;

pub const GENERATE_NEW_PAYMENT_INTENT: &str = concat!(
    r#"
mutation GenerateNewPaymentIntent($orderIdDto: IdDto!) {
  generateNewPaymentIntent(orderIdDto: $orderIdDto) {
    ...PaymentFields
  }
}
"#,
    payment_fields!()
);

pub const CANCEL_PAYMENT: &str = r#"
mutation CancelPayment($paymentIdDto: IdDto!) {
  cancelPayment(paymentIdDto: $paymentIdDto)
}
"#;
