pub mod addresses;
pub mod cart_items;
pub mod products;
pub mod purchase_events;
pub mod purchases;
pub mod reports;
pub mod users;

pub use addresses::Entity as Addresses;
pub use cart_items::Entity as CartItems;
pub use products::Entity as Products;
pub use purchase_events::Entity as PurchaseEvents;
pub use purchases::Entity as Purchases;
pub use reports::Entity as Reports;
pub use users::Entity as Users;
