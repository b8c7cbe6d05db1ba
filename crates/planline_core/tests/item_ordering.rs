//! Per-project item ordering behavior against a real SQLite connection.

use planline_core::db::open_db_in_memory;
use planline_core::{
    Item, ItemKind, ItemService, ItemServiceError, MoveOutcome, ProjectId, ProjectService,
    SqliteItemRepository, SqliteOrderStore, SqliteProjectRepository, ORDER_STEP,
};
use rusqlite::Connection;
use uuid::Uuid;

fn item_service(conn: &Connection) -> ItemService<SqliteItemRepository<'_>, SqliteOrderStore<'_>> {
    let items = SqliteItemRepository::try_new(conn).unwrap();
    let order_store = SqliteOrderStore::try_new(conn).unwrap();
    ItemService::new(items, order_store)
}

fn create_project(conn: &Connection, name: &str) -> ProjectId {
    let projects = SqliteProjectRepository::try_new(conn).unwrap();
    let order_store = SqliteOrderStore::try_new(conn).unwrap();
    ProjectService::new(projects, order_store)
        .create_project(name)
        .unwrap()
        .uuid
}

fn titles_in_order(
    service: &ItemService<SqliteItemRepository<'_>, SqliteOrderStore<'_>>,
    project_uuid: ProjectId,
) -> Vec<String> {
    service
        .list_items(project_uuid)
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect()
}

fn seed_three(
    service: &ItemService<SqliteItemRepository<'_>, SqliteOrderStore<'_>>,
    project_uuid: ProjectId,
) -> (Item, Item, Item) {
    let first = service
        .create_item(project_uuid, ItemKind::Task, "first")
        .unwrap();
    let second = service
        .create_item(project_uuid, ItemKind::Task, "second")
        .unwrap();
    let third = service
        .create_item(project_uuid, ItemKind::Task, "third")
        .unwrap();
    (first, second, third)
}

#[test]
fn first_item_in_an_empty_project_gets_the_step_key() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);

    let item = service
        .create_item(project_uuid, ItemKind::Task, "first")
        .unwrap();

    assert_eq!(item.order_key, ORDER_STEP);
}

#[test]
fn appended_items_get_strictly_increasing_step_keys() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);

    let (first, second, third) = seed_three(&service, project_uuid);

    assert_eq!(first.order_key, ORDER_STEP);
    assert_eq!(second.order_key, 2 * ORDER_STEP);
    assert_eq!(third.order_key, 3 * ORDER_STEP);
    assert_eq!(
        titles_in_order(&service, project_uuid),
        vec!["first", "second", "third"]
    );
}

#[test]
fn move_down_swaps_keys_with_the_next_sibling_only() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let (first, second, third) = seed_three(&service, project_uuid);

    let outcome = service.move_down(first.uuid).unwrap();

    assert_eq!(outcome, MoveOutcome::Moved);
    assert_eq!(
        titles_in_order(&service, project_uuid),
        vec!["second", "first", "third"]
    );
    assert_eq!(service.get_item(first.uuid).unwrap().order_key, second.order_key);
    assert_eq!(service.get_item(second.uuid).unwrap().order_key, first.order_key);
    assert_eq!(service.get_item(third.uuid).unwrap().order_key, third.order_key);
}

#[test]
fn boundary_moves_are_successful_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let (first, _, third) = seed_three(&service, project_uuid);

    assert_eq!(
        service.move_up(first.uuid).unwrap(),
        MoveOutcome::AlreadyAtEdge
    );
    assert_eq!(
        service.move_down(third.uuid).unwrap(),
        MoveOutcome::AlreadyAtEdge
    );
    assert_eq!(
        titles_in_order(&service, project_uuid),
        vec!["first", "second", "third"]
    );
}

#[test]
fn moving_an_unknown_item_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    seed_three(&service, project_uuid);

    let missing = Uuid::new_v4();
    let err = service.move_down(missing).unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ItemNotFound(uuid) if uuid == missing
    ));
}

#[test]
fn ordering_scopes_of_different_projects_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let alpha_uuid = create_project(&conn, "alpha");
    let beta_uuid = create_project(&conn, "beta");
    let service = item_service(&conn);

    let (alpha_first, ..) = seed_three(&service, alpha_uuid);
    let (beta_first, beta_second, beta_third) = seed_three(&service, beta_uuid);

    // Same keys in both scopes: each project starts its own ladder.
    assert_eq!(alpha_first.order_key, beta_first.order_key);

    service.move_down(alpha_first.uuid).unwrap();

    assert_eq!(
        titles_in_order(&service, alpha_uuid),
        vec!["second", "first", "third"]
    );
    assert_eq!(
        titles_in_order(&service, beta_uuid),
        vec!["first", "second", "third"]
    );
    assert_eq!(
        service.get_item(beta_first.uuid).unwrap().order_key,
        beta_first.order_key
    );
    assert_eq!(
        service.get_item(beta_second.uuid).unwrap().order_key,
        beta_second.order_key
    );
    assert_eq!(
        service.get_item(beta_third.uuid).unwrap().order_key,
        beta_third.order_key
    );
}

#[test]
fn set_order_key_moves_an_item_within_its_own_project() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let (_, _, third) = seed_three(&service, project_uuid);

    let updated = service.set_order_key(third.uuid, 500).unwrap();

    assert_eq!(updated.order_key, 500);
    assert_eq!(
        titles_in_order(&service, project_uuid),
        vec!["third", "first", "second"]
    );
}

#[test]
fn reorder_assigns_step_spaced_keys_in_the_given_sequence() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let (first, second, third) = seed_three(&service, project_uuid);

    service
        .reorder(project_uuid, &[third.uuid, first.uuid, second.uuid])
        .unwrap();

    assert_eq!(
        titles_in_order(&service, project_uuid),
        vec!["third", "first", "second"]
    );
    assert_eq!(service.get_item(third.uuid).unwrap().order_key, ORDER_STEP);
    assert_eq!(service.get_item(first.uuid).unwrap().order_key, 2 * ORDER_STEP);
    assert_eq!(service.get_item(second.uuid).unwrap().order_key, 3 * ORDER_STEP);
}

#[test]
fn partial_reorder_leaves_unlisted_items_untouched() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let (first, second, third) = seed_three(&service, project_uuid);

    service
        .reorder(project_uuid, &[second.uuid, first.uuid])
        .unwrap();

    assert_eq!(service.get_item(second.uuid).unwrap().order_key, ORDER_STEP);
    assert_eq!(service.get_item(first.uuid).unwrap().order_key, 2 * ORDER_STEP);
    assert_eq!(service.get_item(third.uuid).unwrap().order_key, third.order_key);
}

#[test]
fn reorder_rejects_items_from_another_project() {
    let conn = open_db_in_memory().unwrap();
    let alpha_uuid = create_project(&conn, "alpha");
    let beta_uuid = create_project(&conn, "beta");
    let service = item_service(&conn);

    let (alpha_first, alpha_second, _) = seed_three(&service, alpha_uuid);
    let (beta_first, ..) = seed_three(&service, beta_uuid);

    let err = service
        .reorder(alpha_uuid, &[alpha_second.uuid, beta_first.uuid])
        .unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ItemNotFound(uuid) if uuid == beta_first.uuid
    ));
    assert_eq!(
        service.get_item(alpha_first.uuid).unwrap().order_key,
        alpha_first.order_key
    );
    assert_eq!(
        service.get_item(alpha_second.uuid).unwrap().order_key,
        alpha_second.order_key
    );
}

#[test]
fn reorder_under_an_unknown_project_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = item_service(&conn);

    let missing = Uuid::new_v4();
    let err = service.reorder(missing, &[]).unwrap_err();

    assert!(matches!(
        err,
        ItemServiceError::ProjectNotFound(uuid) if uuid == missing
    ));
}

#[test]
fn deleting_an_item_leaves_sibling_keys_untouched() {
    let conn = open_db_in_memory().unwrap();
    let project_uuid = create_project(&conn, "alpha");
    let service = item_service(&conn);
    let (first, second, third) = seed_three(&service, project_uuid);

    service.delete_item(second.uuid).unwrap();

    assert_eq!(
        titles_in_order(&service, project_uuid),
        vec!["first", "third"]
    );
    assert_eq!(service.get_item(first.uuid).unwrap().order_key, first.order_key);
    assert_eq!(service.get_item(third.uuid).unwrap().order_key, third.order_key);
}

#[test]
fn renumber_compacts_one_project_without_touching_another() {
    let conn = open_db_in_memory().unwrap();
    let alpha_uuid = create_project(&conn, "alpha");
    let beta_uuid = create_project(&conn, "beta");
    let service = item_service(&conn);

    let (alpha_first, alpha_second, alpha_third) = seed_three(&service, alpha_uuid);
    let (beta_first, ..) = seed_three(&service, beta_uuid);

    service.set_order_key(alpha_first.uuid, 12_345).unwrap();
    service.delete_item(alpha_second.uuid).unwrap();

    let renumbered = service.renumber(alpha_uuid).unwrap();

    assert_eq!(renumbered, 2);
    assert_eq!(
        service.get_item(alpha_third.uuid).unwrap().order_key,
        ORDER_STEP
    );
    assert_eq!(
        service.get_item(alpha_first.uuid).unwrap().order_key,
        2 * ORDER_STEP
    );
    assert_eq!(
        service.get_item(beta_first.uuid).unwrap().order_key,
        beta_first.order_key
    );
}
