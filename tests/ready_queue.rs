#![cfg(feature = "priq")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slab_rbtree::{Error, ReadyQueue};

mod common;
use common::init_logging;

#[test]
fn serves_like_a_stable_sort() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(11);
    let mut q = ReadyQueue::new();
    let mut reference = Vec::new();
    for seq in 0..400u32 {
        let prio = rng.gen_range(-4..4);
        q.push(prio, seq).unwrap();
        reference.push((prio, seq));
    }
    // a stable sort by priority keeps arrival order within a class
    reference.sort_by_key(|&(prio, _)| prio);

    let mut served = Vec::new();
    while let Some(entry) = q.pop() {
        served.push(entry);
    }
    assert_eq!(served, reference);
    assert!(q.is_empty());
}

#[test]
fn yield_and_cancel() {
    let mut q = ReadyQueue::new();
    let main = q.push(0, "main").unwrap();
    let net = q.push(0, "net").unwrap();
    let log = q.push(2, "log").unwrap();

    q.requeue(main).unwrap();
    assert_eq!(q.best(), Some(net));
    assert_eq!(q.remove(net), Ok("net"));
    assert_eq!(q.remove(net), Err(Error::NotLinked(net)));

    let order: Vec<_> = q.iter().map(|(id, r)| (id, *r.item())).collect();
    assert_eq!(order, [(main, "main"), (log, "log")]);
    assert_eq!(q.len(), 2);
    assert_eq!(q.get(log).map(|r| r.prio()), Some(2));
}
