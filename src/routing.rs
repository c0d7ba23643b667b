//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    favicon::get_favicon,
    not_found::get_404_not_found,
    pages::{get_index_page, get_log_in_page, get_register_page, get_reset_password_page},
    report::export_report_endpoint,
    transaction::{
        create_transaction_form_endpoint, create_transaction_json_endpoint,
        get_transactions_endpoint, post_get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::RESET_PASSWORD_VIEW, get(get_reset_password_page))
        .route(endpoints::FAVICON, get(get_favicon));

    let api_routes = Router::new()
        .route(endpoints::ADD_FORM, post(create_transaction_form_endpoint))
        .route(
            endpoints::ADD_TRANSACTION,
            post(create_transaction_json_endpoint),
        )
        .route(
            endpoints::GET_TRANSACTIONS,
            get(get_transactions_endpoint).post(post_get_transactions_endpoint),
        )
        .route(endpoints::EXPORT_REPORT, get(export_report_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, static_files)
        .fallback(get_404_not_found)
        .with_state(state)
}
