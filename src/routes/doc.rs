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
        accounts::{AccountList, AddressList},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        catalog::{BrandList, CategoryList, DiscountList},
        orders::{OrderList, OrderWithItems},
        products::{ImageList, ProductList, ReviewList},
        shipping::ShippingUnitList,
        wishlist::WishlistWithItems,
    },
    models::{
        Account, Address, Brand, Category, Discount, Order, OrderItem, Product, ProductImage,
        ProductReview, ShippingUnit, WishlistItem,
    },
    response::{ApiResponse, Meta},
    routes::{
        accounts, admin, auth, catalog, health, orders, params, products as product_routes,
        wishlist,
    },
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
        auth::register,
        auth::login,
        accounts::get_me,
        accounts::update_me,
        accounts::list_my_addresses,
        accounts::create_address,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::list_images,
        product_routes::list_reviews,
        product_routes::create_review,
        product_routes::delete_review,
        catalog::list_brands,
        catalog::list_categories,
        catalog::list_shipping_units,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::delete_order,
        orders::add_item,
        orders::update_item_quantity,
        orders::remove_item,
        orders::set_discount_amount,
        orders::attach_discount,
        orders::detach_discount,
        wishlist::get_wishlist,
        wishlist::add_item,
        wishlist::remove_item,
        admin::list_accounts,
        admin::get_account,
        admin::get_account_by_username,
        admin::get_account_by_phone,
        admin::update_account,
        admin::delete_account,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::add_image,
        admin::set_default_image,
        admin::delete_image,
        admin::attach_brand,
        admin::detach_brand,
        admin::attach_category,
        admin::detach_category,
        admin::create_brand,
        admin::delete_brand,
        admin::create_category,
        admin::delete_category,
        admin::list_discounts,
        admin::create_discount,
        admin::update_discount,
        admin::delete_discount,
        admin::list_shipping_units,
        admin::create_shipping_unit,
        admin::update_shipping_unit,
        admin::delete_shipping_unit,
        admin::list_all_orders,
        admin::update_order_status
    ),
    components(
        schemas(
            Account,
            Address,
            Product,
            ProductImage,
            ProductReview,
            Brand,
            Category,
            Order,
            OrderItem,
            Discount,
            ShippingUnit,
            WishlistItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AccountList,
            AddressList,
            ProductList,
            ImageList,
            ReviewList,
            BrandList,
            CategoryList,
            DiscountList,
            ShippingUnitList,
            OrderList,
            OrderWithItems,
            WishlistWithItems,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Account>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<WishlistWithItems>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Accounts", description = "Profile and address endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Catalog", description = "Brand, category and shipping unit lookups"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
