use showbill_core::db::open_db_in_memory;
use showbill_core::{
    DomainObject, MapperError, MapperRegistry, PersonMapper, PersonOfInterest, RecordMapper,
    WriteOp,
};

#[test]
fn all_on_empty_table_returns_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);

    assert!(mapper.all().unwrap().is_empty());
}

#[test]
fn insert_returns_generated_id_without_touching_object() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);

    let person = PersonOfInterest::new("Vera");
    let id = mapper.insert(&person).unwrap();

    assert!(person.id().is_none());
    let loaded = mapper.find_by_key(id).unwrap();
    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.name, "Vera");
}

#[test]
fn all_returns_rows_in_storage_order_with_ids() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);

    let first = mapper.insert(&PersonOfInterest::new("Vera")).unwrap();
    let second = mapper.insert(&PersonOfInterest::new("Oleg")).unwrap();

    let persons = mapper.all().unwrap();
    let rows: Vec<_> = persons
        .iter()
        .map(|person| (person.id(), person.name.as_str()))
        .collect();
    assert_eq!(rows, vec![(Some(first), "Vera"), (Some(second), "Oleg")]);
}

#[test]
fn find_by_key_misses_with_record_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);

    let err = mapper.find_by_key(42).unwrap_err();
    assert!(matches!(
        err,
        MapperError::RecordNotFound {
            table: "person_of_interest",
            id: 42
        }
    ));
}

#[test]
fn update_and_delete_target_row_by_id() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);

    let id = mapper.insert(&PersonOfInterest::new("Vera")).unwrap();
    let mut person = mapper.find_by_key(id).unwrap();
    person.name = "Vera N.".to_string();
    mapper.update(&person).unwrap();
    assert_eq!(mapper.find_by_key(id).unwrap().name, "Vera N.");

    mapper.delete(&person).unwrap();
    assert!(matches!(
        mapper.find_by_key(id),
        Err(MapperError::RecordNotFound { .. })
    ));
}

#[test]
fn update_and_delete_require_identifier() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);
    let transient = PersonOfInterest::new("nobody");

    assert!(matches!(
        mapper.update(&transient),
        Err(MapperError::MissingIdentifier {
            op: WriteOp::Update,
            ..
        })
    ));
    assert!(matches!(
        mapper.delete(&transient),
        Err(MapperError::MissingIdentifier {
            op: WriteOp::Delete,
            ..
        })
    ));
}

#[test]
fn writes_against_missing_rows_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);
    let ghost = PersonOfInterest::with_id(7, "ghost");

    assert!(matches!(
        mapper.update(&ghost),
        Err(MapperError::RecordNotFound { id: 7, .. })
    ));
    assert!(matches!(
        mapper.delete(&ghost),
        Err(MapperError::RecordNotFound { id: 7, .. })
    ));
}

#[test]
fn driver_failure_is_wrapped_as_write_failed() {
    let conn = open_db_in_memory().unwrap();
    let mapper = PersonMapper::new(&conn);
    conn.execute_batch("DROP TABLE person_of_interest;").unwrap();

    let err = mapper.insert(&PersonOfInterest::new("Vera")).unwrap_err();
    assert!(std::error::Error::source(&err).is_some());
    match err {
        MapperError::WriteFailed { op, table, .. } => {
            assert_eq!(op, WriteOp::Insert);
            assert_eq!(table, "person_of_interest");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn registry_lists_persons_by_type_tag() {
    let conn = open_db_in_memory().unwrap();
    let registry = MapperRegistry::try_new(&conn).unwrap();
    registry
        .person_mapper()
        .insert(&PersonOfInterest::new("Vera"))
        .unwrap();

    let showbill_core::Mapper::PersonOfInterest(mapper) = registry
        .get_mapper_for_type("person_of_interest")
        .unwrap();
    let persons = mapper.all().unwrap();

    assert_eq!(persons.len(), 1);
    assert_eq!(persons[0].name, "Vera");
}
