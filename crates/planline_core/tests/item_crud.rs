//! Item CRUD behavior: validation, partial updates, and soft deletion.

use planline_core::db::open_db_in_memory;
use planline_core::{
    ItemKind, ItemService, ItemServiceError, ItemStatus, ItemUpdate, ProjectId, ProjectService,
    SqliteItemRepository, SqliteOrderStore, SqliteProjectRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn item_service(conn: &Connection) -> ItemService<SqliteItemRepository<'_>, SqliteOrderStore<'_>> {
    let items = SqliteItemRepository::try_new(conn).unwrap();
    let order_store = SqliteOrderStore::try_new(conn).unwrap();
    ItemService::new(items, order_store)
}

fn project_service(
    conn: &Connection,
) -> ProjectService<SqliteProjectRepository<'_>, SqliteOrderStore<'_>> {
    let projects = SqliteProjectRepository::try_new(conn).unwrap();
    let order_store = SqliteOrderStore::try_new(conn).unwrap();
    ProjectService::new(projects, order_store)
}

fn create_project(conn: &Connection, name: &str) -> ProjectId {
    project_service(conn).create_project(name).unwrap().uuid
}

#[test]
fn created_items_are_trimmed_and_start_as_todo() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);

    let item = service
        .create_item(project_uuid, ItemKind::Story, "  write release notes  ")
        .unwrap();

    assert_eq!(item.title, "write release notes");
    assert_eq!(item.kind, ItemKind::Story);
    assert_eq!(item.status, ItemStatus::Todo);
    assert_eq!(item.project_uuid, project_uuid);
    assert!(!item.is_deleted);
}

#[test]
fn blank_titles_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);

    let err = service
        .create_item(project_uuid, ItemKind::Task, "   ")
        .unwrap_err();

    assert!(matches!(err, ItemServiceError::InvalidTitle));
    assert!(service.list_items(project_uuid).unwrap().is_empty());
}

#[test]
fn items_cannot_be_created_under_an_unknown_project() {
    let conn = open_db_in_memory().unwrap();
    let service = item_service(&conn);

    let missing = Uuid::new_v4();
    let err = service
        .create_item(missing, ItemKind::Task, "orphan")
        .unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ProjectNotFound(uuid) if uuid == missing
    ));
}

#[test]
fn items_cannot_be_created_under_a_deleted_project() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    project_service(&conn).delete_project(project_uuid).unwrap();
    let service = item_service(&conn);

    let err = service
        .create_item(project_uuid, ItemKind::Task, "late arrival")
        .unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ProjectNotFound(uuid) if uuid == project_uuid
    ));
}

#[test]
fn partial_update_changes_only_the_provided_fields() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let item = service
        .create_item(project_uuid, ItemKind::Task, "draft plan")
        .unwrap();

    let updated = service
        .update_item(
            item.uuid,
            ItemUpdate {
                status: Some(ItemStatus::InProgress),
                ..ItemUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.title, "draft plan");
    assert_eq!(updated.kind, ItemKind::Task);
    assert_eq!(updated.status, ItemStatus::InProgress);
}

#[test]
fn content_updates_never_move_an_item() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let first = service
        .create_item(project_uuid, ItemKind::Task, "first")
        .unwrap();
    service
        .create_item(project_uuid, ItemKind::Task, "second")
        .unwrap();

    let updated = service
        .update_item(
            first.uuid,
            ItemUpdate {
                title: Some("first, revised".to_string()),
                kind: Some(ItemKind::Epic),
                status: Some(ItemStatus::Done),
            },
        )
        .unwrap();

    assert_eq!(updated.order_key, first.order_key);
    let titles: Vec<String> = service
        .list_items(project_uuid)
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, vec!["first, revised", "second"]);
}

#[test]
fn updating_to_a_blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let item = service
        .create_item(project_uuid, ItemKind::Task, "keep me")
        .unwrap();

    let err = service
        .update_item(
            item.uuid,
            ItemUpdate {
                title: Some("  ".to_string()),
                ..ItemUpdate::default()
            },
        )
        .unwrap_err();

    assert!(matches!(err, ItemServiceError::InvalidTitle));
    assert_eq!(service.get_item(item.uuid).unwrap().title, "keep me");
}

#[test]
fn deleted_items_disappear_from_reads() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let item = service
        .create_item(project_uuid, ItemKind::Task, "short-lived")
        .unwrap();

    service.delete_item(item.uuid).unwrap();

    assert!(matches!(
        service.get_item(item.uuid).unwrap_err(),
        ItemServiceError::ItemNotFound(uuid) if uuid == item.uuid
    ));
    assert!(service.list_items(project_uuid).unwrap().is_empty());
}

#[test]
fn deleting_an_item_twice_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let item = service
        .create_item(project_uuid, ItemKind::Task, "short-lived")
        .unwrap();

    service.delete_item(item.uuid).unwrap();
    let err = service.delete_item(item.uuid).unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ItemNotFound(uuid) if uuid == item.uuid
    ));
}

#[test]
fn updating_an_unknown_item_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    create_project(&conn, "alpha");
    let service = item_service(&conn);

    let missing = Uuid::new_v4();
    let err = service
        .update_item(missing, ItemUpdate::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ItemNotFound(uuid) if uuid == missing
    ));
}
