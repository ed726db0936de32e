use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::db::Store;
use crate::handlers::{asset_flow, asset_group, asset_type, auth, dashboard, partner, product, unit};
use crate::middleware::auth::authenticate;

#[derive(Clone)]
pub struct CatalogState {
    pub store: Store,
}

/// Full route table. Everything except login/register/logout sits behind the
/// cookie session middleware; per-role checks happen inside the handlers.
pub fn catalog_router(state: CatalogState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/users", get(auth::list_users))
        .route("/asset-group/paginate", post(asset_group::paginate))
        .route("/asset-group", post(asset_group::create))
        .route("/asset-group/import", post(asset_group::import))
        .route("/asset-group/suggest-code", get(asset_group::suggest_code))
        .route("/asset-group/export-template", get(asset_group::export_template))
        .route("/asset-group/export-groups", get(asset_group::export_groups))
        .route("/asset-group/active-groups", get(asset_group::active))
        .route(
            "/asset-group/{id}",
            get(asset_group::get)
                .put(asset_group::update)
                .delete(asset_group::delete),
        )
        .route("/asset-type/paginate", post(asset_type::paginate))
        .route("/asset-type", post(asset_type::create))
        .route("/asset-type/suggest-code", get(asset_type::suggest_code))
        .route("/asset-type/active-types", get(asset_type::active))
        .route(
            "/asset-type/{id}",
            get(asset_type::get)
                .put(asset_type::update)
                .delete(asset_type::delete),
        )
        .route("/asset-flow/paginate", post(asset_flow::paginate))
        .route("/asset-flow", post(asset_flow::create))
        .route("/asset-flow/suggest-code", get(asset_flow::suggest_code))
        .route("/asset-flow/active-flows", get(asset_flow::active))
        .route(
            "/asset-flow/{id}",
            get(asset_flow::get)
                .put(asset_flow::update)
                .delete(asset_flow::delete),
        )
        .route("/partner/paginate", post(partner::paginate))
        .route("/partner", post(partner::create))
        .route("/partner/active-partners", get(partner::active))
        .route(
            "/partner/{id}",
            get(partner::get).put(partner::update).delete(partner::delete),
        )
        .route("/product/paginate", post(product::paginate))
        .route("/product", post(product::create))
        .route("/product/suggest-code", get(product::suggest_code))
        .route(
            "/product/{id}",
            get(product::get).put(product::update).delete(product::delete),
        )
        .route("/unit/all", get(unit::list))
        .route("/unit", post(unit::create))
        .route("/dashboard/barchart", get(dashboard::barchart))
        .route("/dashboard/linechart", get(dashboard::linechart))
        .route("/dashboard/product-partner", get(dashboard::product_partner))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    public.merge(protected).with_state(state)
}
