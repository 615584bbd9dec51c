mod common;

use std::error::Error as _;

use bigdecimal::BigDecimal;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use common::{number, open, text};
use num_bigint::BigInt;
use orars::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
use orars::params::{BindFrame, BindValue, InputSize, SizeDirectives, VarKind};
use orars::types::{LobData, LobKind, LobLocator};
use orars::{
    returning_clause, ColumnDescriptor, DriverValue, ExactDecimal, FieldInfo, FieldKind, OraRsError, Param, Params,
    RewriteError, Settings, SqlValue, TypeCode,
};

fn naive(h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

#[test]
fn test_positional_parameters_become_numbered_binds() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute(
            "SELECT * FROM t WHERE a = %s AND b = %s",
            vec![Param::from(1), Param::from("x")],
        )
        .unwrap();

    driver.assert_last_query(
        "SELECT * FROM t WHERE a = :arg0 AND b = :arg1",
        &BindFrame::Positional(vec![BindValue::Integer(BigInt::from(1)), BindValue::Text("x".to_string())]),
    );
    assert_eq!(driver.last_query().unwrap().input_sizes, None);
}

#[test]
fn test_named_parameters_keep_their_names() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute(
            "UPDATE t SET name = %(name)s WHERE id = %(id)s;",
            Params::named([("name", Param::from("Ada")), ("id", Param::from(7))]),
        )
        .unwrap();

    driver.assert_last_query(
        "UPDATE t SET name = :name WHERE id = :id",
        &BindFrame::Named(
            [
                ("id".to_string(), BindValue::Integer(BigInt::from(7))),
                ("name".to_string(), BindValue::Text("Ada".to_string())),
            ]
            .into_iter()
            .collect(),
        ),
    );
}

#[test]
fn test_statement_without_parameters_is_sent_verbatim() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute("SELECT '100%' FROM dual;", Params::None)
        .unwrap();

    driver.assert_last_query("SELECT '100%' FROM dual", &BindFrame::Positional(vec![]));
}

#[test]
fn test_missing_named_parameter_is_not_sent() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    let err = cursor
        .execute(
            "SELECT * FROM t WHERE a = %(a)s AND b = %(b)s",
            Params::named([("a", 1)]),
        )
        .err()
        .unwrap();

    assert!(matches!(
        err,
        OraRsError::Rewrite(RewriteError::MissingParameter(ref name)) if name == "b"
    ));
    driver.assert_query_count(0);
}

#[test]
fn test_booleans_are_sent_as_numbers() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute("UPDATE t SET a = %s, b = %s", vec![true, false])
        .unwrap();

    assert_eq!(
        driver.last_query().unwrap().params,
        vec![BindFrame::Positional(vec![BindValue::Integer(BigInt::from(1)), BindValue::Integer(BigInt::from(0))])]
    );
}

#[test]
fn test_long_text_gets_lob_directive() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute("INSERT INTO t (body) VALUES (%s)", vec!["x".repeat(5000)])
        .unwrap();
    assert_eq!(
        driver.last_query().unwrap().input_sizes,
        Some(SizeDirectives::Positional(vec![Some(InputSize::Clob)]))
    );

    cursor
        .execute("INSERT INTO t (body) VALUES (%s)", vec!["x".repeat(10)])
        .unwrap();
    assert_eq!(driver.last_query().unwrap().input_sizes, None);
}

#[test]
fn test_executemany_widens_sizes_across_batch() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .executemany(
            "INSERT INTO t (id, body) VALUES (%s, %s)",
            vec![
                vec![Param::from(1), Param::from("x".repeat(5000))],
                vec![Param::from(2), Param::from("short")],
            ],
        )
        .unwrap();

    let query = driver.last_query().unwrap();
    assert!(query.many);
    assert_eq!(query.sql, "INSERT INTO t (id, body) VALUES (:arg0, :arg1)");
    assert_eq!(query.params.len(), 2);
    assert_eq!(
        query.input_sizes,
        Some(SizeDirectives::Positional(vec![None, Some(InputSize::Clob)]))
    );
    driver.assert_query_count(1);
}

#[test]
fn test_executemany_with_empty_batch_does_nothing() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .executemany("INSERT INTO t (id) VALUES (%s)", Vec::<Vec<Param>>::new())
        .unwrap();

    driver.assert_query_count(0);
}

#[test]
fn test_null_into_not_null_is_an_integrity_violation() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_error(1400, "ORA-01400: cannot insert NULL into (\"APP\".\"T\".\"NAME\")");

    let err = cursor
        .execute("INSERT INTO t (name) VALUES (%s)", vec![Option::<String>::None])
        .err()
        .unwrap();

    assert!(matches!(err, OraRsError::IntegrityViolation(_)));
    assert_eq!(
        err.source().unwrap().to_string(),
        "ORA-01400: cannot insert NULL into (\"APP\".\"T\".\"NAME\")"
    );
}

#[test]
fn test_executemany_reclassifies_too() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_error(1400, "ORA-01400: cannot insert NULL");

    let err = cursor
        .executemany("INSERT INTO t (name) VALUES (%s)", vec![vec!["a"], vec!["b"]])
        .unwrap_err();

    assert!(matches!(err, OraRsError::IntegrityViolation(_)));
}

#[test]
fn test_deferred_parent_key_failure_is_an_integrity_violation() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_error(
        2091,
        "ORA-02091: transaction rolled back\nORA-02291: integrity constraint (APP.FK_T) violated - parent key not found",
    );

    let err = cursor
        .execute("INSERT INTO child (parent_id) VALUES (%s)", vec![99])
        .err()
        .unwrap();

    assert!(matches!(err, OraRsError::IntegrityViolation(ref inner) if inner.code == Some(2091)));
}

#[test]
fn test_decimals_survive_a_round_trip() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    let price: ExactDecimal = "1.50".parse().unwrap();
    let hundreds: ExactDecimal = "1.23E+4".parse().unwrap();
    cursor
        .execute(
            "INSERT INTO t (price, hundreds) VALUES (%s, %s)",
            vec![price.clone(), hundreds.clone()],
        )
        .unwrap();
    assert_eq!(
        driver.last_query().unwrap().params,
        vec![BindFrame::Positional(vec![
            BindValue::Decimal(ExactDecimal::new(150, 2)),
            BindValue::Decimal(ExactDecimal::new(123, -2)),
        ])]
    );
    assert_eq!(hundreds.to_string(), "12300");

    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::number("PRICE", 10, 2))
            .column(ColumnDescriptor::number("HUNDREDS", 10, -2))
            .row(vec![number(&price.to_string()), number(&hundreds.to_string())])
            .build(),
    );
    let row = cursor
        .execute("SELECT price, hundreds FROM t", Params::None)
        .unwrap()
        .fetchone()
        .unwrap()
        .unwrap();

    // Trailing zeros of a fixed-scale column are kept.
    assert_eq!(row.get("PRICE").unwrap(), &SqlValue::Decimal(price));
    match row.get("HUNDREDS").unwrap() {
        SqlValue::Decimal(decoded) => {
            assert_eq!(decoded, &ExactDecimal::new(12300, 0));
            assert_eq!(BigDecimal::from(decoded.clone()), BigDecimal::from(hundreds));
        }
        other => panic!("expected decimal, got {other:?}"),
    }
}

#[test]
fn test_other_driver_errors_surface_verbatim() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_error(942, "ORA-00942: table or view does not exist");

    let err = cursor
        .execute("SELECT * FROM missing", Params::None)
        .err()
        .unwrap();

    match err {
        OraRsError::Driver(inner) => {
            assert_eq!(inner.code, Some(942));
            assert_eq!(inner.message, "ORA-00942: table or view does not exist");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_rows_are_decoded_with_column_metadata() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::unconstrained_number("ID").not_null())
            .column(ColumnDescriptor::number("PRICE", 10, 2))
            .column(ColumnDescriptor::new("NAME", TypeCode::String))
            .row(vec![number("1"), number("123.45"), text("Widget")])
            .row(vec![number("2"), DriverValue::Null, DriverValue::Null])
            .build(),
    );

    let rows = cursor
        .execute("SELECT id, price, name FROM products", Params::None)
        .unwrap()
        .fetchall()
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id").unwrap(), &SqlValue::from(1));
    assert_eq!(
        rows[0].get("PRICE").unwrap(),
        &SqlValue::Decimal(ExactDecimal::new(12345, 2))
    );
    assert_eq!(rows[0].get("NAME").unwrap(), &SqlValue::Text("Widget".to_string()));
    assert_eq!(rows[1].get("NAME").unwrap(), &SqlValue::Null);
    assert!(matches!(
        rows[1].get("missing"),
        Err(OraRsError::ColumnNotFound(_))
    ));
    assert_eq!(cursor.description().len(), 3);
}

#[test]
fn test_field_metadata_restores_booleans_and_empty_strings() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::number("ACTIVE", 1, 0))
            .column(ColumnDescriptor::new("NICKNAME", TypeCode::String))
            .column(ColumnDescriptor::number("AGE", 3, 0))
            .row(vec![number("1"), DriverValue::Null, DriverValue::Null])
            .row(vec![number("0"), text("Al"), number("40")])
            .build(),
    );

    let rows = cursor
        .execute("SELECT active, nickname, age FROM people", Params::None)
        .unwrap()
        .with_fields([FieldKind::Boolean, FieldKind::Char, FieldKind::Integer])
        .fetchall()
        .unwrap();

    assert_eq!(
        rows[0].values(),
        &[SqlValue::Bool(true), SqlValue::Text(String::new()), SqlValue::Null]
    );
    assert_eq!(
        rows[1].values(),
        &[SqlValue::Bool(false), SqlValue::Text("Al".to_string()), SqlValue::from(40)]
    );
}

#[test]
fn test_field_metadata_is_cleared_by_next_execution() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    let response = InMemoryTestResponseBuilder::new()
        .column(ColumnDescriptor::number("FLAG", 1, 0))
        .row(vec![number("1")])
        .build();
    driver.push_response(response.clone());
    driver.push_response(response);

    cursor
        .execute("SELECT flag FROM t", Params::None)
        .unwrap()
        .with_fields([FieldInfo::new(FieldKind::Boolean)]);
    cursor.execute("SELECT flag FROM t", Params::None).unwrap();

    let row = cursor.fetchone().unwrap().unwrap();
    assert_eq!(row.value(0), Some(&SqlValue::from(1)));
}

#[test]
fn test_lobs_are_read_before_rows_are_returned() {
    let driver = InMemoryTestDriver::new()
        .with_lob(10, LobData::Text("a".repeat(8000)))
        .with_lob(11, LobData::Text("short".to_string()));
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::new("BODY", TypeCode::Clob))
            .row(vec![DriverValue::Lob(LobLocator { id: 10, kind: LobKind::Clob })])
            .row(vec![DriverValue::Lob(LobLocator { id: 11, kind: LobKind::Clob })])
            .build(),
    );

    let rows = cursor
        .execute("SELECT body FROM documents", Params::None)
        .unwrap()
        .fetchall()
        .unwrap();

    assert_eq!(driver.lob_reads(), vec![10, 11]);
    assert_eq!(rows[0].value(0), Some(&SqlValue::Text("a".repeat(8000))));
    assert_eq!(rows[1].value(0), Some(&SqlValue::Text("short".to_string())));
}

#[test]
fn test_fetchmany_defaults_to_array_size() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default().with_array_size(2));
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::number("N", 5, 0))
            .row(vec![number("1")])
            .row(vec![number("2")])
            .row(vec![number("3")])
            .build(),
    );

    cursor.execute("SELECT n FROM t", Params::None).unwrap();

    assert_eq!(cursor.array_size(), 2);
    assert_eq!(cursor.fetchmany(None).unwrap().len(), 2);
    assert_eq!(cursor.fetchmany(None).unwrap().len(), 1);
    assert!(cursor.fetchmany(Some(5)).unwrap().is_empty());
    assert!(cursor.fetchone().unwrap().is_none());
}

#[test]
fn test_zero_array_size_still_fetches() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default().with_array_size(0));
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::number("N", 5, 0))
            .row(vec![number("1")])
            .row(vec![number("2")])
            .build(),
    );

    cursor.execute("SELECT n FROM t", Params::None).unwrap();

    assert_eq!(cursor.array_size(), 1);
    assert_eq!(driver.cursor_options().last().unwrap().array_size, 1);
    assert_eq!(cursor.fetchmany(None).unwrap().len(), 1);
    assert_eq!(cursor.fetchmany(None).unwrap().len(), 1);
    assert!(cursor.fetchmany(None).unwrap().is_empty());
}

#[test]
fn test_rows_iterator() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::new("NAME", TypeCode::String))
            .row(vec![text("a")])
            .row(vec![text("b")])
            .build(),
    );

    cursor.execute("SELECT name FROM t", Params::None).unwrap();
    let names: Vec<SqlValue> = cursor
        .rows()
        .map(|row| row.unwrap().into_values().remove(0))
        .collect();

    assert_eq!(
        names,
        vec![SqlValue::Text("a".to_string()), SqlValue::Text("b".to_string())]
    );
}

#[test]
fn test_aware_datetimes_are_bound_as_utc() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default().with_use_tz(true));
    let mut cursor = connection.cursor().unwrap();
    let created = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .unwrap();

    cursor
        .execute("INSERT INTO t (created) VALUES (%s)", vec![created])
        .unwrap();

    let query = driver.last_query().unwrap();
    assert_eq!(
        query.params,
        vec![BindFrame::Positional(vec![BindValue::Timestamp(naive(11, 0))])]
    );
    assert_eq!(
        query.input_sizes,
        Some(SizeDirectives::Positional(vec![Some(InputSize::Timestamp)]))
    );
}

#[test]
fn test_aware_datetime_without_tz_support_is_rejected() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    let err = cursor
        .execute(
            "INSERT INTO t (created) VALUES (%s)",
            vec![Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()],
        )
        .err()
        .unwrap();

    assert!(matches!(err, OraRsError::ConfigurationContradiction(_)));
    driver.assert_query_count(0);
}

#[test]
fn test_timestamps_come_back_as_utc_when_tz_active() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default().with_use_tz(true));
    let mut cursor = connection.cursor().unwrap();
    driver.push_response(
        InMemoryTestResponseBuilder::new()
            .column(ColumnDescriptor::new("CREATED", TypeCode::Timestamp))
            .row(vec![DriverValue::Timestamp(naive(11, 0))])
            .build(),
    );

    let row = cursor
        .execute("SELECT created FROM t", Params::None)
        .unwrap()
        .fetchone()
        .unwrap()
        .unwrap();

    assert_eq!(
        row.get("CREATED").unwrap(),
        &SqlValue::DateTimeUtc(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())
    );
}

#[test]
fn test_returned_insert_id() {
    let driver = InMemoryTestDriver::new().with_returned_value(number("42"));
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    let (clause, id) = returning_clause("id");
    cursor
        .execute(
            &format!("INSERT INTO t (name) VALUES (%s) {clause}"),
            vec![Param::from("Ada"), id],
        )
        .unwrap();

    let query = driver.last_query().unwrap();
    assert_eq!(
        query.sql,
        "INSERT INTO t (name) VALUES (:arg0) RETURNING \"ID\" INTO :arg1"
    );
    assert!(matches!(
        query.params[0],
        BindFrame::Positional(ref values) if matches!(values[1], BindValue::Variable(_))
    ));
    assert_eq!(cursor.fetch_returned_insert_id().unwrap(), BigInt::from(42));
}

#[test]
fn test_returned_insert_id_wider_than_i128() {
    let id = "1234567890123456789012345678901234567890";
    let driver = InMemoryTestDriver::new().with_returned_value(number(id));
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute(
            "INSERT INTO t (name) VALUES (%s) RETURNING id INTO %s",
            vec![Param::from("Ada"), Param::insert_id()],
        )
        .unwrap();

    assert_eq!(cursor.fetch_returned_insert_id().unwrap().to_string(), id);
}

#[test]
#[should_panic(expected = "already read")]
fn test_returned_insert_id_can_only_be_read_once() {
    let driver = InMemoryTestDriver::new().with_returned_value(number("42"));
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    cursor
        .execute(
            "INSERT INTO t (name) VALUES (%s) RETURNING id INTO %s",
            vec![Param::from("Ada"), Param::insert_id()],
        )
        .unwrap();

    let _ = cursor.fetch_returned_insert_id();
    let _ = cursor.fetch_returned_insert_id();
}

#[test]
#[should_panic(expected = "no insert id variable was bound")]
fn test_returned_insert_id_after_failed_execution() {
    let driver = InMemoryTestDriver::new();
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();
    driver.push_error(1400, "ORA-01400: cannot insert NULL");

    let result = cursor.execute(
        "INSERT INTO t (name) VALUES (%s) RETURNING id INTO %s",
        vec![Param::from(Option::<String>::None), Param::insert_id()],
    );
    assert!(result.is_err());

    let _ = cursor.fetch_returned_insert_id();
}

#[test]
fn test_allocated_variables_pass_through() {
    let driver = InMemoryTestDriver::new().with_returned_value(number("7"));
    let mut connection = open(&driver, Settings::default());
    let mut cursor = connection.cursor().unwrap();

    let var = cursor.var(VarKind::Number).unwrap();
    cursor.execute("BEGIN %s := 7; END;", vec![var]).unwrap();

    let query = driver.last_query().unwrap();
    assert_eq!(query.sql, "BEGIN :arg0 := 7; END");
    assert_eq!(
        query.params,
        vec![BindFrame::Positional(vec![BindValue::Variable(var)])]
    );
    assert_eq!(cursor.variable_value(&var).unwrap(), SqlValue::from(7));
}
