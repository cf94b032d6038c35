pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod wishlist;
