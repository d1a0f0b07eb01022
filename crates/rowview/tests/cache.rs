use rowview::{
    data::Type, err, Binding, CacheConfig, Compile, Compiler, Conversion, Descriptor, Error, Model,
    Result, Row, Transformer, TransformerCache,
};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst},
        mpsc, Arc, Mutex,
    },
    thread,
    time::Duration,
};
use std_util::prelude::*;

fn view(root: &str) -> Descriptor {
    Descriptor::builder(root)
        .column("name", Type::String)
        .column("age", Type::String)
        .model(
            Model::new(root)
                .field(Binding::column("fullName", "name", Type::String))
                .field(Binding::column("age", "age", Type::I64).convert(Conversion::Parse)),
        )
        .build()
}

/// The default compiler, counting its invocations and slowed down so
/// concurrent callers overlap.
fn counting(count: Arc<AtomicUsize>) -> impl Compile {
    move |descriptor: &Descriptor| -> Result<Transformer> {
        count.fetch_add(1, SeqCst);
        thread::sleep(Duration::from_millis(50));
        Compiler::new().compile(descriptor)
    }
}

// ---------------------------------------------------------------------------
// Compile once
// ---------------------------------------------------------------------------

#[test]
fn repeated_lookups_compile_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let cache = TransformerCache::builder().compiler(counting(count.clone())).build();
    let view = view("User");

    let a = assert_ok!(cache.get_or_compile(&view));
    let b = assert_ok!(cache.get_or_compile(&view));

    assert_eq!(count.load(SeqCst), 1);
    assert!(a.ptr_eq(&b));
}

#[test]
fn concurrent_lookups_compile_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(TransformerCache::builder().compiler(counting(count.clone())).build());
    let view = Arc::new(view("User"));

    let transformers = run_concurrently(16, {
        let cache = cache.clone();
        let view = view.clone();
        move |_| cache.get_or_compile(&view)
    });

    let transformers: Vec<Transformer> = transformers.into_iter().map(|res| assert_ok!(res)).collect();

    assert_eq!(count.load(SeqCst), 1);
    assert!(transformers.iter().all(|t| t.ptr_eq(&transformers[0])));

    let stats = cache.stats();
    assert_eq!(stats.compilations, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 15);
    assert_eq!(stats.entries, 1);
}

#[test]
fn equal_descriptors_share_a_transformer() {
    let cache = TransformerCache::new();

    let a = assert_ok!(cache.get_or_compile(&view("User")));
    let b = assert_ok!(cache.get_or_compile(&view("User")));

    assert!(a.ptr_eq(&b));
    assert_eq!(cache.stats().compilations, 1);
}

#[test]
fn distinct_signatures_do_not_wait_for_each_other() {
    let (tx, rx) = mpsc::channel::<()>();
    let rx = Mutex::new(rx);

    // Compiling `Slow` only finishes once `Fast` has been compiled.
    let compiler = move |descriptor: &Descriptor| -> Result<Transformer> {
        if descriptor.root() == "Slow" {
            rx.lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .map_err(|_| err!("`Fast` did not compile while `Slow` was compiling"))?;
        }
        Compiler::new().compile(descriptor)
    };

    let cache = Arc::new(TransformerCache::builder().compiler(compiler).build());

    let slow = thread::spawn({
        let cache = cache.clone();
        move || cache.get_or_compile(&view("Slow"))
    });

    thread::sleep(Duration::from_millis(20));
    assert_ok!(cache.get_or_compile(&view("Fast")));
    tx.send(()).unwrap();

    assert_ok!(slow.join().unwrap());
}

// ---------------------------------------------------------------------------
// Invalidation
// ---------------------------------------------------------------------------

#[test]
fn invalidate_then_recompile() {
    let count = Arc::new(AtomicUsize::new(0));
    let cache = TransformerCache::builder().compiler(counting(count.clone())).build();
    let view = view("User");

    let old = assert_ok!(cache.get_or_compile(&view));
    cache.invalidate(view.signature());
    assert!(!cache.contains(view.signature()));

    let new = assert_ok!(cache.get_or_compile(&view));
    assert_eq!(count.load(SeqCst), 2);
    assert!(!old.ptr_eq(&new));

    // The invalidated handle keeps working.
    let row = Row::from_pairs([("name", "Ann"), ("age", "30")]);
    assert_eq!(assert_ok!(old.apply(&row)), assert_ok!(new.apply(&row)));
}

#[test]
fn invalidate_all() {
    let cache = TransformerCache::new();
    let a = view("A");
    let b = view("B");

    assert_ok!(cache.get_or_compile(&a));
    assert_ok!(cache.get_or_compile(&b));

    cache.invalidate_all();

    assert!(!cache.contains(a.signature()));
    assert!(!cache.contains(b.signature()));
    assert_eq!(cache.stats().entries, 0);
}

#[test]
fn invalidate_during_compilation() {
    let count = Arc::new(AtomicUsize::new(0));
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let started_tx = Mutex::new(started_tx);
    let release_rx = Mutex::new(release_rx);

    let compiler = {
        let count = count.clone();
        move |descriptor: &Descriptor| -> Result<Transformer> {
            count.fetch_add(1, SeqCst);
            started_tx
                .lock()
                .unwrap()
                .send(())
                .map_err(|_| err!("nobody is waiting for the compilation"))?;
            release_rx
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .map_err(|_| err!("compilation was never released"))?;
            Compiler::new().compile(descriptor)
        }
    };

    let cache = Arc::new(TransformerCache::builder().compiler(compiler).build());
    let view = Arc::new(view("User"));

    let pending = thread::spawn({
        let cache = cache.clone();
        let view = view.clone();
        move || cache.get_or_compile(&view)
    });

    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    cache.invalidate(view.signature());
    cache.invalidate_all();
    thread::sleep(Duration::from_millis(10));
    release_tx.send(()).unwrap();

    let compiled = assert_ok!(pending.join().unwrap());

    // Invalidation does not cancel the compilation; its result is stored.
    assert!(cache.contains(view.signature()));
    let cached = assert_ok!(cache.get_or_compile(&view));
    assert!(cached.ptr_eq(&compiled));
    assert_eq!(count.load(SeqCst), 1);
}

#[test]
fn close_releases_entries() {
    let cache = TransformerCache::new();
    let view = view("User");
    let transformer = assert_ok!(cache.get_or_compile(&view));

    cache.close();

    assert_eq!(cache.stats().entries, 0);
    assert!(cache.get(view.signature()).is_none());
    assert_ok!(transformer.apply(&Row::from_pairs([("name", "Ann"), ("age", "30")])));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn compilation_errors_are_not_cached() {
    let count = Arc::new(AtomicUsize::new(0));

    let compiler = {
        let count = count.clone();
        move |descriptor: &Descriptor| -> Result<Transformer> {
            if count.fetch_add(1, SeqCst) == 0 {
                return Err(Error::transformer_rejected("first attempt fails"));
            }
            Compiler::new().compile(descriptor)
        }
    };

    let cache = TransformerCache::builder().compiler(compiler).build();
    let view = view("User");

    let err = assert_err!(cache.get_or_compile(&view));
    assert!(err.is_compilation());
    assert!(!cache.contains(view.signature()));

    assert_ok!(cache.get_or_compile(&view));
    assert_eq!(count.load(SeqCst), 2);

    let stats = cache.stats();
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.compilations, 1);
    assert_eq!(stats.misses, 2);
}

#[test]
fn concurrent_failures_are_shared_not_cached() {
    let count = Arc::new(AtomicUsize::new(0));
    let failing = Arc::new(AtomicBool::new(true));

    let compiler = {
        let count = count.clone();
        let failing = failing.clone();
        move |descriptor: &Descriptor| -> Result<Transformer> {
            count.fetch_add(1, SeqCst);
            thread::sleep(Duration::from_millis(100));
            if failing.load(SeqCst) {
                return Err(Error::transformer_rejected("schema is unavailable"));
            }
            Compiler::new().compile(descriptor)
        }
    };

    let cache = Arc::new(TransformerCache::builder().compiler(compiler).build());
    let view = Arc::new(view("User"));

    let errors = run_concurrently(8, {
        let cache = cache.clone();
        let view = view.clone();
        move |_| cache.get_or_compile(&view).err()
    });

    for err in &errors {
        let err = err.as_ref().expect("every caller sees the failure");
        assert!(err.is_compilation());
        assert_eq!(
            err.to_string(),
            "compilation failed: transformer rejected: schema is unavailable"
        );
    }

    // Waiting callers received the in-flight failure instead of compiling again.
    let attempts = count.load(SeqCst);
    assert!(attempts < 8, "{attempts} compilations for 8 callers");
    assert!(!cache.contains(view.signature()));

    failing.store(false, SeqCst);
    assert_ok!(cache.get_or_compile(&view));
    assert_eq!(count.load(SeqCst), attempts + 1);

    let stats = cache.stats();
    assert_eq!(stats.failures, attempts as u64);
    assert_eq!(stats.compilations, 1);
    assert_eq!(stats.entries, 1);
}

#[test]
fn invalid_view_fails_every_time() {
    let cache = TransformerCache::new();
    let view = Descriptor::builder("User")
        .column("name", Type::String)
        .model(Model::new("User").field(Binding::column("email", "email", Type::String)))
        .build();

    assert!(assert_err!(cache.get_or_compile(&view)).is_compilation());
    assert!(assert_err!(cache.get_or_compile(&view)).is_compilation());

    assert_eq!(cache.stats().failures, 2);
    assert_eq!(cache.stats().entries, 0);
}

#[test]
fn transformer_for_another_signature_is_refused() {
    let other = view("Other");
    let compiler = move |_: &Descriptor| Compiler::new().compile(&other);

    let cache = TransformerCache::builder().compiler(compiler).build();
    let view = view("User");

    let err = assert_err!(cache.get_or_compile(&view));
    assert!(err.is_cache_state());
    assert!(!cache.contains(view.signature()));
}

// ---------------------------------------------------------------------------
// Eviction and metadata
// ---------------------------------------------------------------------------

#[test]
fn bounded_capacity() {
    let cache = TransformerCache::builder().max_capacity(2).build();

    let views: Vec<_> = ["A", "B", "C", "D", "E"].into_iter().map(view).collect();
    let transformers: Vec<_> = views
        .iter()
        .map(|view| assert_ok!(cache.get_or_compile(view)))
        .collect();

    let stats = cache.stats();
    assert!(stats.entries <= 2, "{stats}");
    assert!(stats.evictions >= 3, "{stats}");

    // Evicted handles keep working.
    let row = Row::from_pairs([("name", "Ann"), ("age", "30")]);
    for transformer in &transformers {
        assert_ok!(transformer.apply(&row));
    }
}

#[test]
fn time_to_live() {
    let cache = TransformerCache::builder()
        .time_to_live(Duration::from_millis(50))
        .build();
    let view = view("User");

    let first = assert_ok!(cache.get_or_compile(&view));
    thread::sleep(Duration::from_millis(120));

    assert!(!cache.contains(view.signature()));

    let second = assert_ok!(cache.get_or_compile(&view));
    assert!(!first.ptr_eq(&second));
    assert_eq!(cache.stats().compilations, 2);
}

#[test]
fn time_to_idle() {
    let cache = TransformerCache::builder()
        .time_to_idle(Duration::from_millis(200))
        .build();
    let view = view("User");

    let first = assert_ok!(cache.get_or_compile(&view));

    // Outlives the idle timeout in total, but is never idle for that long.
    for _ in 0..3 {
        thread::sleep(Duration::from_millis(100));
        assert!(assert_ok!(cache.get_or_compile(&view)).ptr_eq(&first));
    }

    thread::sleep(Duration::from_millis(400));
    assert!(!cache.contains(view.signature()));

    let second = assert_ok!(cache.get_or_compile(&view));
    assert!(!first.ptr_eq(&second));
    assert_eq!(cache.stats().compilations, 2);
}

#[test]
fn entry_metadata() {
    let cache = TransformerCache::new();
    let view = view("User");

    assert!(cache.entry(view.signature()).is_none());

    for _ in 0..3 {
        assert_ok!(cache.get_or_compile(&view));
    }

    let info = cache.entry(view.signature()).unwrap();
    assert_eq!(&info.signature, view.signature());
    assert_eq!(info.hits, 2);
    assert!(info.last_access >= info.inserted_at);
}

#[test]
fn built_from_config() {
    let config: CacheConfig = serde_json::from_str(
        r#"{ "name": "tenant-a", "max_capacity": 16, "tti_seconds": 600 }"#,
    )
    .unwrap();

    let cache = TransformerCache::from_config(&config);
    assert_eq!(cache.name(), Some("tenant-a"));

    assert_ok!(cache.get_or_compile(&view("User")));
    assert_eq!(cache.stats().entries, 1);
}

#[test]
fn stats_display() {
    let cache = TransformerCache::new();
    let view = view("User");

    assert_ok!(cache.get_or_compile(&view));
    assert_ok!(cache.get_or_compile(&view));

    assert_eq!(
        cache.stats().to_string(),
        "entries=1 hits=1 misses=1 compilations=1 failures=0 evictions=0 hit_rate=50.0%"
    );
}
