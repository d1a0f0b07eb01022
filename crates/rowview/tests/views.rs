use pretty_assertions::assert_eq;
use rowview::{
    data::Type, object, row, Binding, CacheConfig, Conversion, Descriptor, ErrorPolicy, Model,
    Result, Row, TransformerCache, Views,
};
use std::sync::Arc;
use std_util::prelude::*;

fn user_view() -> Descriptor {
    Descriptor::builder("User")
        .column("name", Type::String)
        .column("age", Type::String)
        .model(
            Model::new("User")
                .field(Binding::column("fullName", "name", Type::String))
                .field(Binding::column("age", "age", Type::I64).convert(Conversion::Parse)),
        )
        .build()
}

fn rows(values: &[(&str, &str)]) -> Vec<Result<Row>> {
    values
        .iter()
        .map(|(name, age)| Ok(Row::from_pairs([("name", *name), ("age", *age)])))
        .collect()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn query_maps_rows() {
    init_tracing();

    let views = Views::new();
    let out = assert_ok!(views.query(&user_view(), row::from_iter(rows(&[("Ann", "30"), ("Bo", "")]))))
        .collect::<Vec<_>>();

    assert_eq!(out.len(), 2);
    assert_eq!(
        assert_ok!(&out[0]),
        &object! { "fullName" => "Ann", "age" => 30_i64 }
    );
    assert_eq!(out[1].as_ref().unwrap_err().row_ordinal(), Some(1));
}

#[test]
fn compilation_errors_surface_before_rows_are_read() {
    let views = Views::new();
    let view = Descriptor::builder("User")
        .column("name", Type::String)
        .model(Model::new("User").field(Binding::column("email", "email", Type::String)))
        .build();

    let err = assert_err!(views.query(&view, row::from_iter(rows(&[("Ann", "30")]))));
    assert!(err.is_compilation());
    assert!(!err.is_row_mapping());
}

#[test]
fn clones_share_the_cache() {
    let views = Views::new();
    let other = views.clone().policy(ErrorPolicy::Skip);

    let view = user_view();
    let a = assert_ok!(views.transformer(&view));
    let b = assert_ok!(other.transformer(&view));

    assert!(a.ptr_eq(&b));
    assert_eq!(views.stats().compilations, 1);

    let out = assert_ok!(
        assert_ok!(other.query(&view, row::from_iter(rows(&[("Ann", ""), ("Bo", "41")])))).collect_all()
    );
    assert_eq!(out, vec![object! { "fullName" => "Bo", "age" => 41_i64 }]);
}

#[test]
fn invalidate_recompiles() {
    let views = Views::from_config(&CacheConfig::default());
    let view = user_view();

    let before = assert_ok!(views.transformer(&view));
    views.invalidate(&view);
    let after = assert_ok!(views.transformer(&view));

    assert!(!before.ptr_eq(&after));
    assert_eq!(views.stats().compilations, 2);

    views.invalidate_all();
    assert_eq!(views.stats().entries, 0);
}

#[test]
fn shared_cache_instance() {
    let cache = Arc::new(TransformerCache::builder().name("shared").build());
    let a = Views::with_cache(cache.clone());
    let b = Views::with_cache(cache.clone());

    assert_ok!(a.transformer(&user_view()));
    assert!(b.cache().contains(user_view().signature()));

    b.close();
    assert_eq!(cache.stats().entries, 0);
}

#[tokio::test]
async fn query_stream() {
    let views = Views::new();
    let rows = tokio_stream::iter(rows(&[("Ann", "30")]));

    let out = assert_ok!(assert_ok!(views.query_stream(&user_view(), rows)).collect().await);
    assert_eq!(out, vec![object! { "fullName" => "Ann", "age" => 30_i64 }]);
}
