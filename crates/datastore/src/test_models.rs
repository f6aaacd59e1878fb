//! Models shared by the unit tests, matching the tables made by [create_test_tables].
use crate::{Database, Model};

#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "users")]
pub struct User {
    #[model(primary_key)]
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

impl User {
    pub fn new(id: i64, name: &str, phone: &str, address: Option<&str>) -> Self {
        User {
            id,
            name: name.into(),
            phone: phone.into(),
            address: address.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "user_edited_histories")]
pub struct UserEditedHistory {
    pub datetime: String,
    pub note: Option<String>,
}

impl UserEditedHistory {
    pub fn new(datetime: &str, note: Option<&str>) -> Self {
        UserEditedHistory {
            datetime: datetime.into(),
            note: note.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "order_lines")]
pub struct OrderLine {
    #[model(primary_key)]
    pub order_id: i64,
    #[model(primary_key)]
    pub line_no: i64,
    pub quantity: i64,
}

impl OrderLine {
    pub fn new(order_id: i64, line_no: i64, quantity: i64) -> Self {
        OrderLine {
            order_id,
            line_no,
            quantity,
        }
    }
}

pub fn create_test_tables(db: &Database) {
    db.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            address TEXT
        );
        CREATE TABLE IF NOT EXISTS user_edited_histories (
            datetime TEXT NOT NULL,
            note TEXT
        );
        CREATE TABLE IF NOT EXISTS order_lines (
            order_id INTEGER NOT NULL,
            line_no INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            PRIMARY KEY (order_id, line_no)
        );
        "#,
    )
    .expect("Test tables should be created");
}
