//! Concurrency tests for the context-scoped cache
//!
//! Verifies the write-once and clear-once guarantees under contention, and
//! task-local propagation of the context across await points.

use ctxcache::{Context, ErrorKind, TypedKey};
use futures::future::join_all;
use std::sync::{Arc, Barrier};
use std::thread;

const WORKERS: usize = 32;

#[test]
fn test_concurrent_set_exactly_one_wins() {
    let key = TypedKey::<usize>::new("winner");
    let (ctx, _teardown) = ctxcache::init(&Context::background());
    ctxcache::declare(&ctx, &[key.clone()]);

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|i| {
            let ctx = ctx.clone();
            let key = key.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                ctxcache::set(&ctx, &key, i).map(|()| i)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .collect();

    let winners: Vec<usize> = results.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::ValueAlreadySet));

    assert_eq!(ctxcache::get(&ctx, &key).unwrap(), winners[0]);
}

#[test]
fn test_concurrent_teardown_clears_once() {
    let (ctx, teardown) = ctxcache::init(&Context::background());
    let key = TypedKey::<String>::new("k");
    ctxcache::declare(&ctx, &[key.clone()]);
    ctxcache::set(&ctx, &key, "v".to_string()).unwrap();

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|i| {
            let teardown = teardown.clone();
            let ctx = ctx.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Race a fresh handle from a repeated init against the original
                let (_, alias) = ctxcache::init(&ctx);
                assert_eq!(alias, teardown);
                if i % 2 == 0 {
                    alias.cancel()
                } else {
                    teardown.cancel()
                }
            })
        })
        .collect();

    let cleared = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .filter(|cleared| *cleared)
        .count();

    assert_eq!(cleared, 1);
    assert!(ctxcache::is_cleared(&ctx));
    assert!(!ctxcache::contains(&ctx, &key));
}

#[test]
fn test_readers_never_see_partial_state() {
    let key = TypedKey::<Vec<u32>>::new("payload");
    let (ctx, _teardown) = ctxcache::init(&Context::background());
    ctxcache::declare(&ctx, &[key.clone()]);

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            let key = key.clone();
            thread::spawn(move || loop {
                match ctxcache::get(&ctx, &key) {
                    Ok(payload) => return payload,
                    Err(e) => assert_eq!(e.kind(), ErrorKind::ValueNotSet),
                }
                thread::yield_now();
            })
        })
        .collect();

    ctxcache::set(&ctx, &key, (0..100).collect()).unwrap();

    for reader in readers {
        let payload = reader.join().expect("reader panicked");
        assert_eq!(payload.len(), 100);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_on_distinct_keys() {
    let (ctx, teardown) = ctxcache::init(&Context::background());
    let keys: Vec<TypedKey<u64>> = (0..64).map(|i| ctxcache::key(format!("task-{}", i))).collect();
    ctxcache::declare(&ctx, &keys);

    let tasks = keys.iter().cloned().enumerate().map(|(i, key)| {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            ctxcache::set(&ctx, &key, i as u64 * 10)
        })
    });

    for result in join_all(tasks).await {
        result.expect("task panicked").unwrap();
    }

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(ctxcache::get(&ctx, key).unwrap(), i as u64 * 10);
    }

    let report = teardown.cancel_with_report().unwrap();
    assert_eq!(report.removed, 64);
}

#[tokio::test]
async fn test_task_local_scope() {
    const TRACE_ID: TypedKey<String> = TypedKey::new("trace_id");

    let (ctx, teardown) = ctxcache::init(&Context::background());
    let _guard = teardown.guard();
    ctxcache::declare(&ctx, &[TRACE_ID]);

    async fn handler() -> ctxcache::Result<String> {
        let ctx = Context::current_or_background();
        ctxcache::set(&ctx, &TRACE_ID, "abc".to_string())?;
        tokio::task::yield_now().await;
        ctxcache::get(&Context::current_or_background(), &TRACE_ID)
    }

    let trace_id = ctx.clone().scope(handler()).await.unwrap();
    assert_eq!(trace_id, "abc");

    // Outside the scope there is no current context, hence no cache
    let err = handler().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheNotInitialized);
}

#[tokio::test]
async fn test_keep_alive_for_background_task() {
    let task_id = TypedKey::<String>::new("task_id");
    let (ctx, teardown) = ctxcache::init(&Context::background());
    ctxcache::declare(&ctx, &[task_id.clone()]);
    ctxcache::set(&ctx, &task_id, "task-12345".to_string()).unwrap();
    ctxcache::keep_alive(&ctx, &task_id);

    let (started_tx, started_rx) = tokio::sync::oneshot::channel();
    let (go_tx, go_rx) = tokio::sync::oneshot::channel::<()>();

    let background = tokio::spawn({
        let ctx = ctx.clone();
        let task_id = task_id.clone();
        async move {
            let before = ctxcache::get(&ctx, &task_id);
            let _ = started_tx.send(());
            let _ = go_rx.await;
            (before, ctxcache::contains(&ctx, &task_id), ctxcache::get(&ctx, &task_id))
        }
    });

    started_rx.await.unwrap();
    teardown.cancel();
    go_tx.send(()).unwrap();

    let (before, retained, after) = background.await.unwrap();
    assert_eq!(before.unwrap(), "task-12345");
    assert!(retained);
    assert_eq!(after.unwrap_err().kind(), ErrorKind::CacheAlreadyCleared);
}
