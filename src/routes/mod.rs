//! Route table of the shop.
//!
//! Scopes are grouped by audience and each carries its guard:
//!
//! | Prefix | Guard |
//! |---|---|
//! | `/api/auth` | none (`check-auth` requires a session) |
//! | `/api/shop/products`, `/api/shop/search`, `/api/shop/brands`, `/api/common/feature` | none |
//! | `/api/shop/cart`, `/api/shop/address`, `/api/shop/coupons`, `/api/shop/samples`, `/api/orders` | [`AuthMiddleware::required`] |
//! | `/api/admin/*` | [`AuthMiddleware::admin`] |
//!
//! ```rust,ignore
//! let app = App::new()
//!     .app_data(routes::json_config())
//!     .app_data(routes::query_config())
//!     .configure(routes::configure_all_routes);
//! ```

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::config::UploadConfig;
use crate::core::errors::AppError;
use crate::handlers;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::health::health_check);

    configure_auth_routes(cfg);
    configure_shop_routes(cfg);
    configure_order_routes(cfg);
    configure_admin_routes(cfg);

    cfg.service(
        actix_files::Files::new(&UploadConfig::public_path(), UploadConfig::root_dir())
            .prefer_utf8(true),
    );
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::logout)
            .service(handlers::auth::check_auth),
    );
}

fn configure_shop_routes(cfg: &mut web::ServiceConfig) {
    // public catalog
    cfg.service(
        web::scope("/api/shop/products")
            .service(handlers::products::get_filtered_products)
            .service(handlers::products::get_product_details),
    )
    .service(web::scope("/api/shop/search").service(handlers::products::search_products))
    .service(web::scope("/api/shop/brands").service(handlers::brands::list_brands))
    .service(web::scope("/api/common/feature").service(handlers::features::get_feature_images));

    cfg.service(
        web::scope("/api/shop/cart")
            .wrap(AuthMiddleware::required())
            .service(handlers::carts::add_to_cart)
            .service(handlers::carts::fetch_cart)
            .service(handlers::carts::update_cart_quantity)
            .service(handlers::carts::remove_cart_item)
            .service(handlers::carts::clear_cart),
    )
    .service(
        web::scope("/api/shop/address")
            .wrap(AuthMiddleware::required())
            .service(handlers::addresses::add_address)
            .service(handlers::addresses::fetch_addresses)
            .service(handlers::addresses::edit_address)
            .service(handlers::addresses::delete_address),
    )
    .service(
        web::scope("/api/shop/coupons")
            .wrap(AuthMiddleware::required())
            .service(handlers::coupons::validate_coupon),
    )
    .service(
        web::scope("/api/shop/samples")
            .wrap(AuthMiddleware::required())
            .service(handlers::samples::check_sample_eligibility)
            .service(handlers::samples::list_my_samples),
    );
}

fn configure_order_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .wrap(AuthMiddleware::required())
            .service(handlers::orders::create_order)
            .service(handlers::orders::upload_payment_proof)
            .service(handlers::orders::list_my_orders)
            .service(handlers::orders::get_order_details)
            .service(handlers::orders::cancel_order),
    );
}

fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(AuthMiddleware::admin())
            .service(
                web::scope("/products")
                    .service(handlers::admin_products::upload_product_image)
                    .service(handlers::admin_products::add_product)
                    .service(handlers::admin_products::fetch_all_products)
                    .service(handlers::admin_products::edit_product)
                    .service(handlers::admin_products::delete_product),
            )
            .service(
                web::scope("/orders")
                    .service(handlers::admin_orders::list_all_orders)
                    .service(handlers::admin_orders::get_order)
                    .service(handlers::admin_orders::update_order_status)
                    .service(handlers::admin_orders::update_payment_status),
            )
            .service(
                web::scope("/users")
                    .service(handlers::users::list_users)
                    .service(handlers::users::get_user)
                    .service(handlers::users::update_user_role)
                    .service(handlers::users::update_user_status)
                    .service(handlers::users::delete_user),
            )
            .service(
                web::scope("/coupons")
                    .service(handlers::coupons::create_coupon)
                    .service(handlers::coupons::list_coupons)
                    .service(handlers::coupons::get_coupon)
                    .service(handlers::coupons::update_coupon)
                    .service(handlers::coupons::toggle_coupon)
                    .service(handlers::coupons::delete_coupon),
            )
            .service(
                web::scope("/brands")
                    .service(handlers::brands::upload_brand_logo)
                    .service(handlers::brands::create_brand)
                    .service(handlers::brands::list_all_brands)
                    .service(handlers::brands::update_brand)
                    .service(handlers::brands::delete_brand),
            )
            .service(
                web::scope("/features")
                    .service(handlers::features::upload_feature_image)
                    .service(handlers::features::add_feature_image)
                    .service(handlers::features::delete_feature_image),
            )
            .service(
                web::scope("/samples")
                    .service(handlers::samples::list_sample_requests)
                    .service(handlers::samples::update_sample_status),
            )
            .service(
                web::scope("/notifications")
                    .service(handlers::notifications::notification_stream),
            ),
    );
}

/// Malformed JSON bodies answer with the shop's error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            let message = match &err {
                error::JsonPayloadError::ContentType => "expected a JSON body".to_string(),
                other => other.to_string(),
            };
            error::InternalError::from_response(err, bad_request(message)).into()
        })
}

/// Same envelope for unparsable query strings.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = err.to_string();
        error::InternalError::from_response(err, bad_request(message)).into()
    })
}

fn bad_request(message: String) -> HttpResponse {
    actix_web::ResponseError::error_response(&AppError::ValidationError(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[allow(dead_code)]
        quantity: i64,
    }

    async fn echo(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_bad_json_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/echo", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/echo")
            .insert_header(("Content-Type", "application/json"))
            .set_payload(r#"{"quantity":"two"}"#)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Validation error"));
    }

    #[actix_web::test]
    async fn test_admin_scope_requires_session() {
        let app = test::init_service(App::new().configure(configure_admin_routes)).await;

        let req = test::TestRequest::get().uri("/api/admin/orders").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
