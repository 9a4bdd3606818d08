//! Dispatch, completion and registration running on several threads at once.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use pretty_assertions::assert_eq;
use switchboard_console::{
    BufferSink, CommandSpec, CommandStatus, Console, MatchMode, handler_fn,
};
use switchboard_perms::{PermissionStore, Principal, StaticDirectory};

const THREADS: usize = 8;
const ROUNDS: usize = 200;

fn console() -> Arc<Console> {
    let store = PermissionStore::new(Arc::new(StaticDirectory::new()));
    Arc::new(Console::new(Arc::new(store)))
}

#[test]
fn concurrent_dispatch_releases_entries() {
    let console = console();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    console
        .register(CommandSpec::new(
            "counter bump",
            handler_fn(move |args| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = writeln!(args.out, "ok");
                CommandStatus::Success
            }),
        ))
        .unwrap();

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let console = Arc::clone(&console);
            thread::spawn(move || {
                let mut out = BufferSink::new(1);
                for _ in 0..ROUNDS {
                    console
                        .execute(Principal::UNRESTRICTED, &mut out, "counter bump")
                        .unwrap();
                }
                out.take().lines().count()
            })
        })
        .collect();

    let lines: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
    assert_eq!(lines, THREADS * ROUNDS);
    assert_eq!(calls.load(Ordering::SeqCst), THREADS * ROUNDS);

    let entry = console
        .registry()
        .find(&["counter", "bump"], MatchMode::ExactOnly)
        .unwrap();
    assert_eq!(entry.in_use(), 0);
}

#[test]
fn registration_races_with_dispatch_and_completion() {
    let console = console();
    let before = console.registry().len();

    let writers: Vec<_> = (0..THREADS / 2)
        .map(|n| {
            let console = Arc::clone(&console);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let pattern = format!("race{n} cmd{round}");
                    let spec = CommandSpec::new(pattern, handler_fn(|_| CommandStatus::Success));
                    let id = console.register(spec).unwrap();
                    console.unregister(id).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..THREADS / 2)
        .map(|_| {
            let console = Arc::clone(&console);
            thread::spawn(move || {
                let mut out = BufferSink::new(1);
                for _ in 0..ROUNDS {
                    console
                        .execute(Principal::UNRESTRICTED, &mut out, "core show uptime seconds")
                        .unwrap();
                    let candidates = console.complete_all("core show ", "");
                    assert!(candidates.iter().any(|c| c == "uptime"));
                    out.take();
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(console.registry().len(), before);
}

#[test]
fn unregister_while_running_keeps_the_call_alive() {
    let console = console();
    let (entered_tx, entered_rx) = std::sync::mpsc::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let release_rx = parking_lot::Mutex::new(release_rx);

    let id = console
        .register(CommandSpec::new(
            "slow op",
            handler_fn(move |args| {
                let _ = entered_tx.send(());
                let _ = release_rx.lock().recv();
                let _ = write!(args.out, "done");
                CommandStatus::Success
            }),
        ))
        .unwrap();

    let runner = {
        let console = Arc::clone(&console);
        thread::spawn(move || {
            let mut out = BufferSink::new(1);
            let result = console.execute(Principal::UNRESTRICTED, &mut out, "slow op");
            (result, out.take())
        })
    };

    entered_rx.recv().unwrap();
    let entry = console.unregister(id).unwrap();
    assert_eq!(entry.in_use(), 1);
    assert!(console.registry().get(id).is_none());

    release_tx.send(()).unwrap();
    let (result, output) = runner.join().unwrap();
    assert_eq!(result, Ok(()));
    assert_eq!(output, "done");
    assert_eq!(entry.in_use(), 0);
}
