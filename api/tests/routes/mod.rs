mod auth_test;
mod catalog_test;
mod chat_test;
mod health_test;
