// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{admin, open_ticket, requester, route_network_to_bruno, seeded_store, supervisor};
use crate::error::ApiError;
use crate::handlers;
use crate::notify::NullSink;
use crate::request_response::{CategoryInfo, CreateCategoryRequest, CreateRuleRequest, RuleInfo};
use ops_ticket_persistence::Persistence;

#[test]
fn test_category_management_requires_an_administrator() {
    let mut store: Persistence = seeded_store();
    let request: CreateCategoryRequest = CreateCategoryRequest {
        name: String::from("Hardware"),
    };

    for actor in [requester(), supervisor()] {
        let result = handlers::create_category(&mut store, &actor, &request);
        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    }
    assert!(handlers::create_category(&mut store, &admin(), &request).is_ok());
}

#[test]
fn test_created_category_derives_its_value() {
    let mut store: Persistence = seeded_store();

    let created: CategoryInfo = handlers::create_category(
        &mut store,
        &admin(),
        &CreateCategoryRequest {
            name: String::from("Soporte Técnico"),
        },
    )
    .expect("category created");

    assert_eq!(created.value, "soporte_tecnico");
    let listed: Vec<CategoryInfo> =
        handlers::list_categories(&mut store).expect("listing succeeds");
    assert_eq!(listed.len(), 2);
}

#[test]
fn test_duplicate_category_is_a_conflict() {
    let mut store: Persistence = seeded_store();

    let result = handlers::create_category(
        &mut store,
        &admin(),
        &CreateCategoryRequest {
            name: String::from("Network"),
        },
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_category_rename_rederives_value_and_keeps_tickets() {
    let mut store: Persistence = seeded_store();
    let ticket = open_ticket(&mut store, &NullSink).ticket;
    let category_id: i64 = handlers::list_categories(&mut store).expect("listing")[0].category_id;

    let renamed: CategoryInfo = handlers::update_category(
        &mut store,
        &admin(),
        category_id,
        &CreateCategoryRequest {
            name: String::from("Red Local"),
        },
    )
    .expect("category renamed");

    assert_eq!(renamed.value, "red_local");
    let reread = handlers::get_ticket(&mut store, &admin(), ticket.ticket_id)
        .expect("ticket readable");
    assert_eq!(reread.category, "Red Local");
}

#[test]
fn test_category_rename_requires_an_administrator() {
    let mut store: Persistence = seeded_store();
    let category_id: i64 = handlers::list_categories(&mut store).expect("listing")[0].category_id;

    let result = handlers::update_category(
        &mut store,
        &supervisor(),
        category_id,
        &CreateCategoryRequest {
            name: String::from("Red Local"),
        },
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_referenced_category_cannot_be_deleted() {
    let mut store: Persistence = seeded_store();
    open_ticket(&mut store, &NullSink);
    let category_id: i64 = handlers::list_categories(&mut store).expect("listing")[0].category_id;

    let result = handlers::delete_category(&mut store, &admin(), category_id);

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_rule_requires_an_existing_category() {
    let mut store: Persistence = seeded_store();

    let result = handlers::create_rule(
        &mut store,
        &admin(),
        &CreateRuleRequest {
            category: String::from("missing"),
            shift: String::from("weekday_morning"),
            supervisor_id: 2,
            supervisor_name: String::from("bruno"),
        },
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_rule_pair_is_unique() {
    let mut store: Persistence = seeded_store();
    route_network_to_bruno(&mut store);

    let result = handlers::create_rule(
        &mut store,
        &admin(),
        &CreateRuleRequest {
            category: String::from("network"),
            shift: String::from("weekday_morning"),
            supervisor_id: 3,
            supervisor_name: String::from("carla"),
        },
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_rule_deletion_is_not_retroactive() {
    let mut store: Persistence = seeded_store();
    route_network_to_bruno(&mut store);
    let ticket = open_ticket(&mut store, &NullSink).ticket;
    let rules: Vec<RuleInfo> =
        handlers::list_rules(&mut store, &admin()).expect("rules listed");

    handlers::delete_rule(&mut store, &admin(), rules[0].rule_id).expect("rule deleted");

    let still_routed = handlers::get_ticket(&mut store, &admin(), ticket.ticket_id)
        .expect("ticket readable");
    assert_eq!(still_routed.supervisor.map(|s| s.username), Some(String::from("bruno")));
}
