//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod feedback;
pub mod product;
pub mod sales_record;
pub mod transaction_item;
pub mod user;

// Re-export specific types to avoid conflicts
pub use feedback::{Column as FeedbackColumn, Entity as Feedback, Model as FeedbackModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sales_record::{
    Column as SalesRecordColumn, Entity as SalesRecord, Model as SalesRecordModel,
};
pub use transaction_item::{
    Column as TransactionItemColumn, Entity as TransactionItem, Model as TransactionItemModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
