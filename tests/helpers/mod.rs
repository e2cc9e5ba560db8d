#![allow(dead_code)]

mod test_app;
mod test_postgres;

pub use test_app::{TEST_JWT_SECRET, TestApp, test_settings};
pub use test_postgres::TestPostgres;
