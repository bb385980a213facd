pub mod app;

pub use app::{get_json_body, make_test_app, make_test_app_with_cache};
