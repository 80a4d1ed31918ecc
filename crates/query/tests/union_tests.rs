//! Rendering tests for UNION ALL chains across per-resource-type
//! partitions, the whole-system search shape.

use helios_query::{alias, bind, render, BindValue, Select, SqliteTranslator};

fn partition(resource_type: &str, logical_id: &str) -> Select {
    Select::select(["LOGICAL_RESOURCE_ID"])
        .from(format!("{}_LOGICAL_RESOURCES", resource_type), alias("LR"))
        .where_clause()
        .col("LR", "LOGICAL_ID")
        .eq(bind(logical_id))
        .build()
        .unwrap()
}

#[test]
fn test_three_member_union_all_chain() {
    let mut chain = partition("Patient", "p1");
    chain.set_union_all(partition("Observation", "o1"));
    chain.set_union_all(partition("Encounter", "e1"));

    let (sql, binds) = render(&chain, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT LOGICAL_RESOURCE_ID FROM Patient_LOGICAL_RESOURCES AS LR \
         WHERE LR.LOGICAL_ID = ? \
         UNION ALL \
         SELECT LOGICAL_RESOURCE_ID FROM Observation_LOGICAL_RESOURCES AS LR \
         WHERE LR.LOGICAL_ID = ? \
         UNION ALL \
         SELECT LOGICAL_RESOURCE_ID FROM Encounter_LOGICAL_RESOURCES AS LR \
         WHERE LR.LOGICAL_ID = ?"
    );

    // Bind capture re-runs per member, in chain order.
    assert_eq!(sql.matches('?').count(), binds.len());
    let values: Vec<&BindValue> = binds.iter().map(|marker| marker.value()).collect();
    assert_eq!(
        values,
        vec![
            &BindValue::String("p1".to_string()),
            &BindValue::String("o1".to_string()),
            &BindValue::String("e1".to_string()),
        ]
    );
}

#[test]
fn test_union_members_keep_their_own_predicates() {
    let mut chain = partition("Patient", "p1");
    chain.set_union_all(partition("Observation", "o1"));

    let second = chain.union_all_next().unwrap();
    assert!(second.where_clause().is_some());
    assert!(second.union_all_next().is_none());
}

#[test]
fn test_union_render_is_repeatable() {
    let mut chain = partition("Patient", "p1");
    chain.set_union_all(partition("Observation", "o1"));

    let first = render(&chain, &SqliteTranslator);
    let second = render(&chain, &SqliteTranslator);
    assert_eq!(first, second);
}
