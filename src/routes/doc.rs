use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{AddressSnapshot, ProductCondition},
    dto::{
        addresses::{AddressForm, Profile},
        admin::{Dashboard, DashboardPurchase, PurgeCounts, SetAdminForm},
        auth::{LoginForm, RegisterForm},
        cart::{CartAction, CartLineDto, CartSummary, CartUpdateForm},
        checkout::{
            CheckoutErrorBody, ConfirmPurchaseRequest, ConfirmPurchaseResponse, PurchaseDetails,
            PurchaseItem,
        },
        products::ProductList,
        reports::{ReportRangeQuery, ReportView},
    },
    middleware::auth::SESSION_COOKIE,
    models::{Address, CartItem, Product, PurchaseEvent, Report, User},
    response::{ApiResponse, Meta, NoticeLevel},
    routes::{admin, auth, cart, checkout, health, home, profile, shop},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
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
        home::home,
        auth::register,
        auth::login,
        auth::logout,
        shop::list_products,
        shop::sell_product,
        cart::cart_page,
        cart::add_to_cart,
        cart::update_item,
        profile::profile_page,
        profile::add_address,
        profile::delete_address,
        checkout::confirm_purchase,
        checkout::purchase_details,
        admin::dashboard,
        admin::generate_report,
        admin::view_report,
        admin::download_report,
        admin::delete_report,
        admin::delete_all_reports,
        admin::add_sample_products,
        admin::delete_all_products,
        admin::delete_all_purchases,
        admin::set_admin_flag
    ),
    components(
        schemas(
            User,
            Product,
            ProductCondition,
            Address,
            AddressSnapshot,
            CartItem,
            PurchaseEvent,
            Report,
            RegisterForm,
            LoginForm,
            AddressForm,
            Profile,
            CartAction,
            CartUpdateForm,
            CartLineDto,
            CartSummary,
            ConfirmPurchaseRequest,
            ConfirmPurchaseResponse,
            CheckoutErrorBody,
            PurchaseItem,
            PurchaseDetails,
            ProductList,
            ReportRangeQuery,
            ReportView,
            Dashboard,
            DashboardPurchase,
            SetAdminForm,
            PurgeCounts,
            NoticeLevel,
            Meta,
            ApiResponse<ProductList>,
            ApiResponse<CartSummary>,
            ApiResponse<Profile>,
            ApiResponse<Dashboard>,
            ApiResponse<ReportView>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Home", description = "Landing page and notices"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Shop", description = "Browsing and listing items for sale"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Profile", description = "Addresses and purchase history"),
        (name = "Checkout", description = "Purchase confirmation and receipts"),
        (name = "Admin", description = "Admin dashboard and maintenance"),
        (name = "Reports", description = "CSV purchase reports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
