use rect_tree::{SpatialIndex, SplitPolicy, TreeResult};
use rect_tree_int_test::test_util::{cleanup, create_test_context, run_test, ALL_POLICIES};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_multi_threaded_insert() {
    for policy in ALL_POLICIES {
        run_test(
            || create_test_context(policy),
            |ctx| {
                let tree = ctx.tree();
                let num_threads = 5;
                let inserts_per_thread = 60;
                let barrier = Arc::new(Barrier::new(num_threads));

                let mut handles = vec![];
                for thread_id in 0..num_threads {
                    let tree_clone = tree.clone();
                    let barrier_clone = Arc::clone(&barrier);
                    handles.push(thread::spawn(move || -> TreeResult<()> {
                        barrier_clone.wait();
                        for i in 0..inserts_per_thread {
                            let point = [thread_id as f64 * 10.0 + (i % 7) as f64, i as f64];
                            tree_clone.insert(&point)?;
                        }
                        Ok(())
                    }));
                }
                for handle in handles {
                    handle.join().expect("writer thread panicked")?;
                }

                assert_eq!(tree.size(), (num_threads * inserts_per_thread) as u64);
                let report = tree.check_integrity();
                assert!(report.is_valid, "{}: {:?}", ctx.policy(), report.errors);
                Ok(())
            },
            cleanup,
        )
    }
}

#[test]
fn test_concurrent_readers_and_writer() {
    run_test(
        || create_test_context(SplitPolicy::RStar),
        |ctx| {
            let tree = ctx.tree();
            let ids = (0..100)
                .map(|i| tree.insert(&[i as f64, (i * 3 % 17) as f64]))
                .collect::<TreeResult<Vec<_>>>()?;
            let ids = Arc::new(ids);

            let writer = {
                let tree = tree.clone();
                let ids = Arc::clone(&ids);
                thread::spawn(move || -> TreeResult<()> {
                    for id in ids.iter().step_by(2) {
                        tree.remove(*id)?;
                    }
                    Ok(())
                })
            };
            let readers: Vec<_> = (0..3)
                .map(|_| {
                    let tree = tree.clone();
                    let ids = Arc::clone(&ids);
                    thread::spawn(move || {
                        // Odd ids are never removed
                        for id in ids.iter().skip(1).step_by(2) {
                            assert!(tree.contains(*id));
                        }
                    })
                })
                .collect();

            writer.join().expect("writer thread panicked")?;
            for reader in readers {
                reader.join().expect("reader thread panicked");
            }
            assert_eq!(tree.size(), 50);
            Ok(())
        },
        cleanup,
    )
}
