pub mod brands;
pub mod categories;
pub mod discount_orders;
pub mod discounts;
pub mod order_items;
pub mod orders;
pub mod product_brands;
pub mod product_categories;
pub mod product_images;
pub mod product_reviews;
pub mod products;
pub mod roles;
pub mod shipping_units;
pub mod user_account_roles;
pub mod user_accounts;
pub mod user_addresses;
pub mod wishlist_items;
pub mod wishlists;

pub use brands::Entity as Brands;
pub use categories::Entity as Categories;
pub use discount_orders::Entity as DiscountOrders;
pub use discounts::Entity as Discounts;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_brands::Entity as ProductBrands;
pub use product_categories::Entity as ProductCategories;
pub use product_images::Entity as ProductImages;
pub use product_reviews::Entity as ProductReviews;
pub use products::Entity as Products;
pub use roles::Entity as Roles;
pub use shipping_units::Entity as ShippingUnits;
pub use user_account_roles::Entity as UserAccountRoles;
pub use user_accounts::Entity as UserAccounts;
pub use user_addresses::Entity as UserAddresses;
pub use wishlist_items::Entity as WishlistItems;
pub use wishlists::Entity as Wishlists;
