//! Rendering tests for the SELECT statement model.
//!
//! These assert literal SQL strings: the renderer's output is part of its
//! contract, and bind-marker order must match `?` positions exactly.

use helios_query::{
    alias, bind, col, literal, on, render, BindValue, QueryBuildError, Select, SqliteTranslator,
};

#[test]
fn test_simple_select() {
    let select = Select::select(["1"])
        .from("Patient_TOKEN_VALUES_V", alias("param"))
        .where_clause()
        .col("param", "PARAMETER_NAME_ID")
        .eq(1274)
        .build()
        .unwrap();

    let (sql, binds) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT 1 FROM Patient_TOKEN_VALUES_V AS param WHERE param.PARAMETER_NAME_ID = 1274"
    );
    assert!(binds.is_empty());
}

#[test]
fn test_select_without_where() {
    let select = Select::select(["COUNT(*)"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .build()
        .unwrap();

    let (sql, binds) = render(&select, &SqliteTranslator);
    assert_eq!(sql, "SELECT COUNT(*) FROM Patient_LOGICAL_RESOURCES AS LR0");
    assert!(binds.is_empty());
}

#[test]
fn test_select_distinct() {
    let select = Select::select_distinct(["R0.RESOURCE_ID", "R0.LOGICAL_RESOURCE_ID"])
        .from("Patient_RESOURCES", alias("R0"))
        .build()
        .unwrap();

    let (sql, _) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT DISTINCT R0.RESOURCE_ID, R0.LOGICAL_RESOURCE_ID FROM Patient_RESOURCES AS R0"
    );
}

#[test]
fn test_inner_join_on_condition() {
    let select = Select::select(["R.RESOURCE_ID", "R.DATA", "LR.LOGICAL_ID"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR"))
        .inner_join(
            "Patient_RESOURCES",
            alias("R"),
            on("LR", "CURRENT_RESOURCE_ID").eq(col("R", "RESOURCE_ID")),
        )
        .build()
        .unwrap();

    let (sql, binds) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT R.RESOURCE_ID, R.DATA, LR.LOGICAL_ID \
         FROM Patient_LOGICAL_RESOURCES AS LR \
         INNER JOIN Patient_RESOURCES AS R ON LR.CURRENT_RESOURCE_ID = R.RESOURCE_ID"
    );
    assert!(binds.is_empty());
}

#[test]
fn test_join_on_condition_with_multiple_terms() {
    let select = Select::select(["1"])
        .from("Observation_LOGICAL_RESOURCES", alias("LR1"))
        .inner_join(
            "Observation_TOKEN_VALUES_V",
            alias("P2"),
            on("P2", "LOGICAL_RESOURCE_ID")
                .eq(col("LR1", "LOGICAL_RESOURCE_ID"))
                .and("P2", "PARAMETER_NAME_ID")
                .eq(1274),
        )
        .build()
        .unwrap();

    let (sql, _) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT 1 FROM Observation_LOGICAL_RESOURCES AS LR1 \
         INNER JOIN Observation_TOKEN_VALUES_V AS P2 \
         ON P2.LOGICAL_RESOURCE_ID = LR1.LOGICAL_RESOURCE_ID \
         AND P2.PARAMETER_NAME_ID = 1274"
    );
}

#[test]
fn test_sub_select_as_from_source() {
    let logical_resources = Select::select(["LR0.LOGICAL_RESOURCE_ID", "LR0.CURRENT_RESOURCE_ID"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .where_clause()
        .col("LR0", "IS_DELETED")
        .eq(literal("N"))
        .build()
        .unwrap();

    let select = Select::select(["R.RESOURCE_ID", "R.DATA"])
        .from_select(logical_resources, alias("LR"))
        .inner_join(
            "Patient_RESOURCES",
            alias("R"),
            on("LR", "CURRENT_RESOURCE_ID").eq(col("R", "RESOURCE_ID")),
        )
        .build()
        .unwrap();

    let (sql, _) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT R.RESOURCE_ID, R.DATA FROM \
         (SELECT LR0.LOGICAL_RESOURCE_ID, LR0.CURRENT_RESOURCE_ID \
         FROM Patient_LOGICAL_RESOURCES AS LR0 WHERE LR0.IS_DELETED = 'N') AS LR \
         INNER JOIN Patient_RESOURCES AS R ON LR.CURRENT_RESOURCE_ID = R.RESOURCE_ID"
    );
}

fn str_value_filter(param_alias: &str, parent_alias: &str, name_id: i32, value: &str) -> Select {
    Select::select(["1"])
        .from("Patient_STR_VALUES", alias(param_alias))
        .where_clause()
        .col(param_alias, "PARAMETER_NAME_ID")
        .eq(name_id)
        .and()
        .col(param_alias, "STR_VALUE")
        .eq(bind(value))
        .and()
        .col(param_alias, "LOGICAL_RESOURCE_ID")
        .eq(col(parent_alias, "LOGICAL_RESOURCE_ID"))
        .build()
        .unwrap()
}

#[test]
fn test_correlated_exists_composition() {
    let family = str_value_filter("P1", "LR0", 1246, "Jones");
    let given = str_value_filter("P2", "LR0", 1247, "Amy");

    let select = Select::select(["LR0.LOGICAL_RESOURCE_ID"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .where_clause()
        .exists(family)
        .and()
        .exists(given)
        .build()
        .unwrap();

    let (sql, binds) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT LR0.LOGICAL_RESOURCE_ID FROM Patient_LOGICAL_RESOURCES AS LR0 \
         WHERE EXISTS (SELECT 1 FROM Patient_STR_VALUES AS P1 \
         WHERE P1.PARAMETER_NAME_ID = 1246 AND P1.STR_VALUE = ? \
         AND P1.LOGICAL_RESOURCE_ID = LR0.LOGICAL_RESOURCE_ID) \
         AND EXISTS (SELECT 1 FROM Patient_STR_VALUES AS P2 \
         WHERE P2.PARAMETER_NAME_ID = 1247 AND P2.STR_VALUE = ? \
         AND P2.LOGICAL_RESOURCE_ID = LR0.LOGICAL_RESOURCE_ID)"
    );

    // Binds from the first subquery come strictly before the second's.
    let values: Vec<&BindValue> = binds.iter().map(|marker| marker.value()).collect();
    assert_eq!(
        values,
        vec![
            &BindValue::String("Jones".to_string()),
            &BindValue::String("Amy".to_string()),
        ]
    );
}

#[test]
fn test_composite_nested_exists() {
    // Innermost: city LIKE filter on the chained Observation.
    let city = Select::select(["1"])
        .from("Observation_STR_VALUES", alias("P3"))
        .where_clause()
        .col("P3", "LOGICAL_RESOURCE_ID")
        .eq(col("LR2", "LOGICAL_RESOURCE_ID"))
        .and()
        .col("P3", "PARAMETER_NAME_ID")
        .eq(1396)
        .and()
        .col("P3", "STR_VALUE")
        .like(bind("Seattle%"))
        .escape('+')
        .build()
        .unwrap();

    // Middle: the chained resource, joined to its token values.
    let chained = Select::select(["1"])
        .from("Observation_LOGICAL_RESOURCES", alias("LR2"))
        .inner_join(
            "Observation_TOKEN_VALUES_V",
            alias("P2"),
            on("P2", "LOGICAL_RESOURCE_ID")
                .eq(col("LR2", "LOGICAL_RESOURCE_ID"))
                .and("P2", "PARAMETER_NAME_ID")
                .eq(1274),
        )
        .where_clause()
        .col("LR2", "IS_DELETED")
        .eq(literal("N"))
        .and()
        .col("LR2", "LOGICAL_RESOURCE_ID")
        .eq(col("LR1", "LOGICAL_RESOURCE_ID"))
        .and()
        .exists(city)
        .build()
        .unwrap();

    let select = Select::select(["LR1.LOGICAL_RESOURCE_ID", "LR1.LOGICAL_ID"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR1"))
        .where_clause()
        .col("LR1", "IS_DELETED")
        .eq(literal("N"))
        .and()
        .exists(chained)
        .build()
        .unwrap();

    let (sql, binds) = render(&select, &SqliteTranslator);
    assert_eq!(
        sql,
        "SELECT LR1.LOGICAL_RESOURCE_ID, LR1.LOGICAL_ID \
         FROM Patient_LOGICAL_RESOURCES AS LR1 \
         WHERE LR1.IS_DELETED = 'N' \
         AND EXISTS (SELECT 1 FROM Observation_LOGICAL_RESOURCES AS LR2 \
         INNER JOIN Observation_TOKEN_VALUES_V AS P2 \
         ON P2.LOGICAL_RESOURCE_ID = LR2.LOGICAL_RESOURCE_ID \
         AND P2.PARAMETER_NAME_ID = 1274 \
         WHERE LR2.IS_DELETED = 'N' \
         AND LR2.LOGICAL_RESOURCE_ID = LR1.LOGICAL_RESOURCE_ID \
         AND EXISTS (SELECT 1 FROM Observation_STR_VALUES AS P3 \
         WHERE P3.LOGICAL_RESOURCE_ID = LR2.LOGICAL_RESOURCE_ID \
         AND P3.PARAMETER_NAME_ID = 1396 \
         AND P3.STR_VALUE LIKE ? ESCAPE '+'))"
    );
    assert_eq!(binds.len(), 1);
    assert_eq!(
        binds[0].value(),
        &BindValue::String("Seattle%".to_string())
    );
}

#[test]
fn test_bind_count_matches_placeholder_count() {
    let filter = str_value_filter("P1", "LR0", 1246, "Jones");
    let select = Select::select(["LR0.LOGICAL_RESOURCE_ID"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .where_clause()
        .col("LR0", "LOGICAL_ID")
        .eq(bind("patient-123"))
        .and()
        .exists(filter)
        .build()
        .unwrap();

    let (sql, binds) = render(&select, &SqliteTranslator);
    assert_eq!(sql.matches('?').count(), binds.len());
    assert_eq!(binds.len(), 2);
}

#[test]
fn test_render_is_deterministic_and_non_mutating() {
    let select = Select::select(["LR0.LOGICAL_RESOURCE_ID"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .where_clause()
        .col("LR0", "LOGICAL_ID")
        .eq(bind("patient-123"))
        .build()
        .unwrap();
    let snapshot = select.clone();

    let first = render(&select, &SqliteTranslator);
    let second = render(&select, &SqliteTranslator);
    assert_eq!(first, second);
    assert_eq!(select, snapshot);
}

#[test]
fn test_empty_projection_is_rejected() {
    let result = Select::select(Vec::<String>::new())
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .build();
    assert_eq!(result.unwrap_err(), QueryBuildError::EmptyProjection);
}

#[test]
fn test_missing_from_is_rejected() {
    let result = Select::select(["1"]).build();
    assert_eq!(result.unwrap_err(), QueryBuildError::MissingFrom);
}

#[test]
fn test_where_builder_propagates_fragment_errors() {
    let result = Select::select(["1"])
        .from("Patient_LOGICAL_RESOURCES", alias("LR0"))
        .where_clause()
        .left_paren()
        .col("LR0", "IS_DELETED")
        .eq(literal("N"))
        .build();
    assert_eq!(result.unwrap_err(), QueryBuildError::UnclosedParens { open: 1 });
}
