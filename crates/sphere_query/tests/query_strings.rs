//! Rendered query strings compared verbatim against the server contract.

use sphere_query::{
    selector, Arguments, FilterGroup, FilterItem, FilterOperator, Operation, PaginationOptions,
    SelectQuery, Selector,
};
use sphere_schema::EntityTag;

/// Find-by-id with pagination, as sent by the partner finder.
#[test]
fn test_find_partner_by_id_query() {
    let query = SelectQuery::from_data_selector(
        Operation::SelectOne,
        &selector! { partner { id, name } },
    )
    .unwrap()
    .arguments(Arguments::by_id(1).paginate(PaginationOptions::new().page(1).per_page(1)));

    insta::assert_snapshot!(
        query.build().unwrap(),
        @r#"{selectOne (filters: {groups: [{items: [{name: "id", operator: "EQUALS", value: ["1"]}]}]}, pagination: {page: 1, perPage: 1}) { data { partner { id name } } errors { message } }}"#
    );
}

/// Find-by-id without pagination.
#[test]
fn test_find_arrow_company_by_id_query() {
    let query = SelectQuery::select_one(EntityTag::ArrowCompany, selector! { id, name })
        .arguments(Arguments::by_id(3));

    insta::assert_snapshot!(
        query.build().unwrap(),
        @r#"{selectOne (filters: {groups: [{items: [{name: "id", operator: "EQUALS", value: ["3"]}]}]}) { data { arrowCompany { id name } } errors { message } }}"#
    );
}

/// Many-entity listing with every pagination field.
#[test]
fn test_select_all_end_customers_query() {
    let query = SelectQuery::select_all(EntityTag::EndCustomer, selector! { id, name })
        .paginate(PaginationOptions::new().page(1).per_page(2))
        .with_all_pagination_fields();

    insta::assert_snapshot!(
        query.build().unwrap(),
        @"{selectAll (pagination: {page: 1, perPage: 2}) { data { endCustomer { id name } } errors { message } pagination { currentPage next perPage previous total totalPage totalPages } }}"
    );
}

/// ORed groups of ANDed items, with relations in the selection.
#[test]
fn test_filtered_select_all_query() {
    let selection: Selector = "id name contacts { email } country { code }".parse().unwrap();
    let query = SelectQuery::select_all(EntityTag::Partner, selection)
        .filter(
            FilterGroup::new()
                .item(FilterItem::equals("active", true))
                .item(FilterItem::new("id", FilterOperator::In, [10, 11])),
        )
        .filter(FilterItem::new("name", FilterOperator::Contains, ["Arrow"]));

    insta::assert_snapshot!(
        query.build().unwrap(),
        @r#"{selectAll (filters: {groups: [{items: [{name: "active", operator: "EQUALS", value: ["true"]}, {name: "id", operator: "IN", value: ["10", "11"]}]}, {items: [{name: "name", operator: "CONTAINS", value: ["Arrow"]}]}]}) { data { partner { id name contacts { email } country { code } } } errors { message } }}"#
    );
}

/// Building the same query twice yields byte-identical strings.
#[test]
fn test_rendering_is_idempotent() {
    let build = || {
        SelectQuery::select_all(EntityTag::Workgroup, selector! { id, code, name })
            .filter(FilterItem::equals("code", "FR"))
            .paginate(PaginationOptions::new().per_page(50))
            .with_all_pagination_fields()
            .build()
            .unwrap()
    };

    assert_eq!(build(), build());
}

/// JSON-shaped selectors keep their key order.
#[test]
fn test_json_selector_order() {
    let data = Selector::from_json(&serde_json::json!({
        "endCustomer": { "name": true, "id": true, "reference": false }
    }))
    .unwrap();
    let query = SelectQuery::from_data_selector(Operation::SelectOne, &data).unwrap();

    assert_eq!(
        query.build().unwrap(),
        "{selectOne { data { endCustomer { name id } } errors { message } }}"
    );
}
