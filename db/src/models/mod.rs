pub mod category;
pub mod conversation_messages;
pub mod conversations;
pub mod product;
pub mod user;

pub use category::Entity as Category;
pub use conversation_messages::Entity as ConversationMessage;
pub use conversations::Entity as Conversation;
pub use product::Entity as Product;
pub use user::Entity as User;
