use squash_analyzer::resolve::DependencyResolver;
use squash_schema::{Relationship, SchemaModel};
use squash_types::{SquashErrorKind, UnresolvedTable};

fn model_with(tables: &[(&str, Vec<&str>)]) -> SchemaModel {
    let mut model = SchemaModel::new();
    for (name, foreign_tables) in tables {
        let table = model.create_or_alter(name);
        for foreign in foreign_tables {
            table.add_relationship(Relationship::new(format!("{}_id", foreign), "id", *foreign));
        }
    }
    model
}

#[test]
fn test_foreign_tables_come_first() {
    let model = model_with(&[("b", vec!["a"]), ("a", vec![]), ("c", vec!["c"])]);
    let order = DependencyResolver::new(&model).resolve().unwrap();
    assert_eq!(order, vec!["a", "c", "b"]);
}

#[test]
fn test_self_reference_resolves_alone() {
    let model = model_with(&[("categories", vec!["categories"])]);
    let order = DependencyResolver::new(&model).resolve().unwrap();
    assert_eq!(order, vec!["categories"]);
}

#[test]
fn test_independent_tables_keep_creation_order() {
    let model = model_with(&[("users", vec![]), ("teams", vec![]), ("logs", vec![])]);
    let order = DependencyResolver::new(&model).resolve().unwrap();
    assert_eq!(order, vec!["users", "teams", "logs"]);
}

#[test]
fn test_chain_needs_several_passes() {
    let model = model_with(&[
        ("invoices", vec!["orders", "users"]),
        ("orders", vec!["users"]),
        ("users", vec!["teams"]),
        ("teams", vec![]),
    ]);
    let order = DependencyResolver::new(&model).resolve().unwrap();
    assert_eq!(order, vec!["teams", "users", "orders", "invoices"]);
}

#[test]
fn test_empty_model() {
    let model = SchemaModel::new();
    assert!(DependencyResolver::new(&model).resolve().unwrap().is_empty());
}

#[test]
fn test_mutual_cycle_is_reported() {
    let model = model_with(&[("users", vec![]), ("a", vec!["b"]), ("b", vec!["a", "users"])]);
    let err = DependencyResolver::new(&model).resolve().unwrap_err();

    assert!(!err.is_recoverable());
    let SquashErrorKind::UnresolvableDependencies { unresolved } = err.kind() else {
        panic!("Expected unresolvable dependencies, got {:?}", err);
    };
    assert_eq!(
        unresolved,
        &vec![
            UnresolvedTable { table: "a".into(), waiting_on: vec!["b".into()] },
            UnresolvedTable { table: "b".into(), waiting_on: vec!["a".into()] },
        ]
    );
    assert_eq!(
        err.to_string(),
        "Cannot resolve foreign key order for: a (depends on b); b (depends on a)"
    );
}

#[test]
fn test_missing_foreign_table_is_reported() {
    let mut model = model_with(&[("posts", vec![])]);
    let posts = model.table_mut("posts").unwrap();
    posts.add_relationship(Relationship::new("author_id", "id", "authors"));
    posts.add_relationship(Relationship::new("editor_id", "id", "authors"));

    let err = DependencyResolver::new(&model).resolve().unwrap_err();
    let SquashErrorKind::UnresolvableDependencies { unresolved } = err.kind() else {
        panic!("Expected unresolvable dependencies, got {:?}", err);
    };
    assert_eq!(unresolved[0].waiting_on, vec!["authors".to_string()]);
}
