use super::*;
use crate::model::Gender;

const SELECT_PREFIX: &str =
    "SELECT id, name, surname, patronymic, age, gender, country FROM users WHERE 1=1";

fn placeholder_count(text: &str) -> usize {
    text.matches('$').count()
}

fn full_filter() -> UserFilter {
    UserFilter::new()
        .with_name("Ana")
        .with_surname("Petrova")
        .with_patronymic("Ivanovna")
        .with_age(31)
        .with_gender(Gender::Female)
        .with_country("RU")
}

// ==================== SELECT ====================

#[test]
fn select_without_filter_is_only_pagination() {
    let stmt = UserStatements::default().select(&Pagination::new(10, 0), &UserFilter::new());

    assert_eq!(stmt.text(), format!("{SELECT_PREFIX} LIMIT $1 OFFSET $2"));
    assert_eq!(stmt.args(), &[Value::BigInt(10), Value::BigInt(0)]);
}

#[test]
fn select_with_every_attribute_follows_fixed_order() {
    let stmt = UserStatements::default().select(&Pagination::new(5, 15), &full_filter());

    assert_eq!(
        stmt.text(),
        format!(
            "{SELECT_PREFIX} AND name = $1 AND surname = $2 AND patronymic = $3 \
             AND age = $4 AND gender = $5 AND country = $6 LIMIT $7 OFFSET $8"
        )
    );
    assert_eq!(
        stmt.args(),
        &[
            Value::Text("Ana".into()),
            Value::Text("Petrova".into()),
            Value::Text("Ivanovna".into()),
            Value::Int(31),
            Value::Text("female".into()),
            Value::Text("RU".into()),
            Value::BigInt(5),
            Value::BigInt(15),
        ]
    );
}

#[test]
fn select_skips_absent_attributes_without_gaps() {
    let filter = UserFilter::new().with_surname("Smith").with_country("US");
    let stmt = UserStatements::default().select(&Pagination::new(20, 40), &filter);

    assert_eq!(
        stmt.text(),
        format!("{SELECT_PREFIX} AND surname = $1 AND country = $2 LIMIT $3 OFFSET $4")
    );
    assert_eq!(
        stmt.args(),
        &[
            Value::Text("Smith".into()),
            Value::Text("US".into()),
            Value::BigInt(20),
            Value::BigInt(40),
        ]
    );
}

#[test]
fn select_placeholder_count_is_present_plus_two() {
    let filters = [
        UserFilter::new(),
        UserFilter::new().with_age(40),
        UserFilter::new().with_name("a").with_gender(Gender::Male),
        UserFilter::new().with_patronymic("p").with_age(1).with_country("c"),
        full_filter(),
    ];
    let statements = UserStatements::default();

    for filter in &filters {
        let stmt = statements.select(&Pagination::new(3, 9), filter);
        let k = filter.present_count();

        assert_eq!(placeholder_count(stmt.text()), k + 2);
        assert_eq!(stmt.args().len(), k + 2);
        assert_eq!(&stmt.args()[k..], &[Value::BigInt(3), Value::BigInt(9)]);
    }
}

#[test]
fn select_filters_on_age_zero() {
    let stmt =
        UserStatements::default().select(&Pagination::new(10, 0), &UserFilter::new().with_age(0));

    assert_eq!(stmt.text(), format!("{SELECT_PREFIX} AND age = $1 LIMIT $2 OFFSET $3"));
    assert_eq!(stmt.args()[0], Value::Int(0));
}

#[test]
fn select_is_idempotent() {
    let statements = UserStatements::default();
    let page = Pagination::new(7, 14);
    let filter = full_filter();

    assert_eq!(statements.select(&page, &filter), statements.select(&page, &filter));
}

#[test]
fn select_never_interpolates_values() {
    let statements = UserStatements::default();
    let page = Pagination::new(10, 0);
    let benign = statements.select(&page, &UserFilter::new().with_name("Ana"));

    for hostile in ["O'Brien", "x'; DROP TABLE users; --", "$1", "a$2;b"] {
        let stmt = statements.select(&page, &UserFilter::new().with_name(hostile));

        assert_eq!(stmt.text(), benign.text());
        assert_eq!(stmt.args()[0], Value::Text(hostile.to_string()));
    }
}

#[test]
fn select_uses_configured_table() {
    let statements = UserStatements::new("directory.people").unwrap();
    let stmt = statements.select(&Pagination::new(1, 0), &UserFilter::new());

    assert_eq!(
        stmt.text(),
        "SELECT id, name, surname, patronymic, age, gender, country FROM directory.people \
         WHERE 1=1 LIMIT $1 OFFSET $2"
    );
}

#[test]
fn new_rejects_unsafe_table_names() {
    assert!(UserStatements::new("users; DROP TABLE users").is_err());
    assert!(UserStatements::new("").is_err());
    assert!(UserStatements::new("9users").is_err());
}

// ==================== UPDATE ====================

#[test]
fn update_without_attributes_is_rejected() {
    let err = UserStatements::default()
        .update(&UserRecord::for_id(5))
        .unwrap_err();

    assert!(matches!(err, DirectoryError::MalformedUpdate { id: 5 }));
}

#[test]
fn update_single_attribute_has_no_stray_comma() {
    let mut record = UserRecord::for_id(5);
    record.name = Some("Ana".into());

    let stmt = UserStatements::default().update(&record).unwrap();

    assert_eq!(stmt.text(), "UPDATE users SET name = $1 WHERE id = $2");
    assert_eq!(stmt.args(), &[Value::Text("Ana".into()), Value::Int(5)]);
}

#[test]
fn update_skipped_leading_attribute_has_no_leading_comma() {
    let mut record = UserRecord::for_id(8);
    record.country = Some("DE".into());
    record.age = Some(0);

    let stmt = UserStatements::default().update(&record).unwrap();

    assert_eq!(stmt.text(), "UPDATE users SET country = $1, age = $2 WHERE id = $3");
    assert_eq!(
        stmt.args(),
        &[Value::Text("DE".into()), Value::Int(0), Value::Int(8)]
    );
}

#[test]
fn update_all_attributes_in_canonical_order() {
    let record = UserRecord {
        id: 11,
        name: Some("Ivan".into()),
        surname: Some("Ivanov".into()),
        patronymic: Some("Ivanovich".into()),
        age: Some(42),
        gender: Some(Gender::Male),
        country: Some("KZ".into()),
    };

    let stmt = UserStatements::default().update(&record).unwrap();

    assert_eq!(
        stmt.text(),
        "UPDATE users SET name = $1, surname = $2, patronymic = $3, country = $4, \
         gender = $5, age = $6 WHERE id = $7"
    );
    assert_eq!(
        stmt.args(),
        &[
            Value::Text("Ivan".into()),
            Value::Text("Ivanov".into()),
            Value::Text("Ivanovich".into()),
            Value::Text("KZ".into()),
            Value::Text("male".into()),
            Value::Int(42),
            Value::Int(11),
        ]
    );
}

#[test]
fn update_is_idempotent() {
    let mut record = UserRecord::for_id(2);
    record.surname = Some("Lee".into());
    record.gender = Some(Gender::Female);
    let statements = UserStatements::default();

    assert_eq!(
        statements.update(&record).unwrap(),
        statements.update(&record).unwrap()
    );
}

// ==================== INSERT / DELETE / by id ====================

#[test]
fn insert_binds_absent_attributes_as_null() {
    let record = UserRecord {
        id: 0,
        name: Some("Dmitriy".into()),
        surname: Some("Ushakov".into()),
        patronymic: None,
        age: Some(43),
        gender: Some(Gender::Male),
        country: Some("UA".into()),
    };

    let stmt = UserStatements::default().insert(&record);

    assert_eq!(
        stmt.text(),
        "INSERT INTO users (name, surname, patronymic, age, country, gender) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id"
    );
    assert_eq!(
        stmt.args(),
        &[
            Value::Text("Dmitriy".into()),
            Value::Text("Ushakov".into()),
            Value::Null,
            Value::Int(43),
            Value::Text("UA".into()),
            Value::Text("male".into()),
        ]
    );
}

#[test]
fn delete_and_select_by_id_bind_the_id() {
    let statements = UserStatements::default();

    let delete = statements.delete(9);
    assert_eq!(delete.text(), "DELETE FROM users WHERE id = $1");
    assert_eq!(delete.args(), &[Value::Int(9)]);

    let by_id = statements.select_by_id(9);
    assert_eq!(
        by_id.text(),
        "SELECT id, name, surname, patronymic, age, gender, country FROM users WHERE id = $1"
    );
    assert_eq!(by_id.args(), &[Value::Int(9)]);
}
