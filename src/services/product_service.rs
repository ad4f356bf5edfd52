use crate::{
    dto::products::{PageCursor, ProductPage, ProductPageLinks},
    error::AppResult,
    middleware::auth::Customer,
    models::PageInfo,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    customer: &Customer,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductPage>> {
    let first = query
        .first
        .unwrap_or(state.config.products_page_size)
        .clamp(1, 100);
    let after = query.after.filter(|c| !c.is_empty());
    let trail = query.trail.as_deref().map(parse_trail).unwrap_or_default();

    let connection = state
        .gateway
        .get_products(customer, first, after.as_deref())
        .await?;

    let links = page_links(first, after.as_deref(), &trail, &connection.page_info);
    let items: Vec<_> = connection.edges.into_iter().map(|edge| edge.node).collect();
    let meta = Meta::new(first, items.len() as i64);
    let data = ProductPage {
        items,
        page_info: connection.page_info,
        links,
    };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

fn parse_trail(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Next and previous page cursors for the page loaded with `after`.
///
/// `trail` holds the `after` values of the pages visited before this one, so
/// "previous" pops it and "next" pushes the current cursor onto it.
pub fn page_links(
    first: i64,
    after: Option<&str>,
    trail: &[String],
    page_info: &PageInfo,
) -> ProductPageLinks {
    let next = match (&page_info.end_cursor, page_info.has_next_page) {
        (Some(end), true) => {
            let mut next_trail = trail.to_vec();
            if let Some(current) = after {
                next_trail.push(current.to_string());
            }
            Some(PageCursor {
                first,
                after: Some(end.clone()),
                trail: next_trail,
            })
        }
        _ => None,
    };

    let previous = after.map(|_| match trail.split_last() {
        Some((last, rest)) => PageCursor {
            first,
            after: Some(last.clone()),
            trail: rest.to_vec(),
        },
        None => PageCursor {
            first,
            after: None,
            trail: Vec::new(),
        },
    });

    ProductPageLinks { next, previous }
}
