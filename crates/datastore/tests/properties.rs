//! End to end checks against file-backed databases, using models defined outside the crate.
use lite_datastore::*;
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "users")]
struct User {
    #[model(primary_key)]
    id: i64,
    name: String,
    phone: String,
    address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "user_edited_histories")]
struct UserEditedHistory {
    datetime: String,
    note: Option<String>,
}

/// A column of no fixed affinity, plus every storage class.
#[derive(Clone, Debug, PartialEq, Model)]
#[model(table = "samples")]
struct Sample {
    #[model(primary_key)]
    key: String,
    reading: Option<f64>,
    raw: Vec<u8>,
    anything: Value,
    flag: bool,
}

fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.into(),
        phone: format!("{:03}", id),
        address: Some("Japan".into()),
    }
}

fn create_db() -> (tempfile::TempDir, std::path::PathBuf) {
    lite_logging::log_to_stderr();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let mut scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
    scope
        .execute_batch(
            r#"
            CREATE TABLE users (
                id INTEGER NOT NULL PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT
            );
            CREATE TABLE user_edited_histories (
                datetime TEXT NOT NULL,
                note TEXT
            );
            CREATE TABLE samples (
                key TEXT NOT NULL PRIMARY KEY,
                reading REAL,
                raw BLOB NOT NULL,
                anything,
                flag INTEGER NOT NULL
            );
            "#,
        )
        .unwrap();
    scope.commit().unwrap();
    scope.finish().unwrap();
    (dir, path)
}

#[test]
fn derived_metadata() {
    assert_eq!(User::table_name(), "users");
    assert_eq!(User::field_names(), vec!["id", "name", "phone", "address"]);
    assert_eq!(User::primary_key_names(), &["id"]);
    assert!(UserEditedHistory::primary_key_names().is_empty());

    let nullable = Sample::TABLE
        .iter_columns()
        .filter(|c| c.is_nullable())
        .map(|c| c.get_name())
        .collect::<Vec<_>>();
    assert_eq!(nullable, vec!["reading"]);
}

#[test]
fn every_storage_class_round_trips() {
    let (_dir, path) = create_db();
    let scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();

    let samples = vec![
        Sample {
            key: "a".into(),
            reading: Some(1.25),
            raw: vec![0, 1, 2],
            anything: Value::Text("text".into()),
            flag: true,
        },
        Sample {
            key: "b".into(),
            reading: None,
            raw: vec![],
            anything: Value::Null,
            flag: false,
        },
        Sample {
            key: "c".into(),
            reading: Some(-3.0),
            raw: vec![255],
            anything: Value::Integer(7),
            flag: false,
        },
    ];
    assert_eq!(scope.bulk_insert(&samples, false).unwrap(), 3);

    let loaded = scope.find_all::<Sample>(None, None).unwrap();
    let loaded = loaded.into_iter().map(Record::into_inner).collect::<Vec<_>>();
    assert_eq!(loaded, samples);
}

#[test]
fn find_all_returns_insertion_order() {
    let (_dir, path) = create_db();
    let scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
    // Keyless, so rows come back in rowid order.
    let rows = ["c", "a", "b"]
        .iter()
        .map(|n| UserEditedHistory {
            datetime: "2022/10/31 10:12:34".into(),
            note: Some(n.to_string()),
        })
        .collect::<Vec<_>>();
    for r in rows.iter() {
        scope.insert(r, true).unwrap();
    }
    let got = scope.find_all::<UserEditedHistory>(None, None).unwrap();
    assert_eq!(got.iter().map(|r| r.get().clone()).collect::<Vec<_>>(), rows);
}

#[test]
fn keyless_delete_matches_the_whole_row() {
    let (_dir, path) = create_db();
    let scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
    let history = |note: &str| UserEditedHistory {
        datetime: "2022/10/31 10:12:34".into(),
        note: Some(note.into()),
    };
    scope
        .bulk_insert(&[history("note"), history("other"), history("third")], true)
        .unwrap();

    assert_eq!(scope.delete_by_record(&history("note")).unwrap(), 1);
    let left = scope
        .find_all::<UserEditedHistory>(
            Some("datetime = ?"),
            Some(Params::positional(["2022/10/31 10:12:34"])),
        )
        .unwrap();
    assert_eq!(left, vec![Record::new(history("other")), Record::new(history("third"))]);
}

#[test]
fn rollback_isolation() {
    let (_dir, path) = create_db();

    let mut a = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
    a.insert(&user(1, "TestUser"), true).unwrap();
    {
        let b = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
        assert!(b.find::<User>(&[1.into()]).unwrap().is_none());
    }
    a.commit().unwrap();
    drop(a);

    let c = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
    assert_eq!(c.find::<User>(&[1.into()]).unwrap().unwrap(), user(1, "TestUser"));
}

#[test]
fn bulk_insert_duplicate_keys() {
    let (_dir, path) = create_db();
    let users = [user(1, "a"), user(2, "b"), user(2, "c")];

    {
        let mut scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
        assert_eq!(scope.bulk_insert(&users, true).unwrap(), 2);
        scope.commit().unwrap();
        assert_eq!(scope.find_all::<User>(None, None).unwrap().len(), 2);
        assert_eq!(scope.find::<User>(&[2.into()]).unwrap().unwrap().name, "b");
        scope.delete::<User>(None, None).unwrap();
        scope.commit().unwrap();
    }

    {
        let scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
        let err = scope.bulk_insert(&users, false).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    // The failed call was never committed.
    let scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();
    assert!(scope.find_all::<User>(None, None).unwrap().is_empty());
}

#[test]
fn update_by_record_twice() {
    let (_dir, path) = create_db();
    let mut scope = TransactionScope::open(&path, IsolationLevel::Immediate).unwrap();
    scope.insert(&user(1, "TestUser"), true).unwrap();

    let mut r = scope.find::<User>(&[1.into()]).unwrap().unwrap();
    r.address = None;
    assert_eq!(r.changed_fields(), vec![("address", Value::Null)]);
    assert_eq!(scope.update_by_record(&mut r).unwrap(), 1);
    assert!(r.changed_fields().is_empty());
    assert_eq!(scope.update_by_record(&mut r).unwrap(), 0);
    scope.commit().unwrap();
}

#[test]
fn clause_pairing_applies_to_every_operation() {
    let (_dir, path) = create_db();
    let scope = TransactionScope::open(&path, IsolationLevel::Deferred).unwrap();

    let only_clause = || (Some("id = ?"), None);
    let only_params = || (None, Some(Params::positional([1])));
    for (clause, params) in [only_clause(), only_params()] {
        let results = [
            scope.find_by::<User>(clause, params.clone()).err(),
            scope.find_all::<User>(clause, params.clone()).err(),
            scope
                .update::<User>(&[("name", "x".into())], clause, params.clone())
                .err(),
            scope.delete::<User>(clause, params.clone()).err(),
        ];
        for r in results {
            assert_eq!(
                r.as_ref().and_then(|e| e.as_usage()),
                Some(&UsageError::ClauseParamsMismatch)
            );
        }
    }

    assert!(scope.find_by::<User>(None, None).is_ok());
    assert!(scope
        .find_all::<User>(Some("id = :id"), Some(Params::named().with("id", 1)))
        .is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        ..Default::default()
    })]
    #[test]
    fn insert_then_find_is_identity(
        id in any::<i64>(),
        name in ".{0,16}",
        phone in "[0-9]{0,12}",
        address in proptest::option::of(".{0,16}"),
    ) {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE users (id INTEGER NOT NULL PRIMARY KEY, name TEXT NOT NULL, phone TEXT NOT NULL, address TEXT)",
        ).unwrap();

        let u = User { id, name, phone, address };
        prop_assert_eq!(db.insert(&u, true).unwrap(), 1);
        let keys = u.primary_key_values().into_iter().map(|(_, v)| v).collect::<Vec<_>>();
        let found = db.find::<User>(&keys).unwrap();
        prop_assert_eq!(found.map(Record::into_inner), Some(u));
    }
}
