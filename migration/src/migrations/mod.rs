pub mod m202510010001_create_users;
pub mod m202510010002_create_conversations;
pub mod m202510010003_create_conversation_messages;
pub mod m202510010004_create_categories;
pub mod m202510010005_create_products;
