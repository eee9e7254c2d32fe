use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use log_entry_matcher::{
    Attributes, KeyId, Matcher, MatcherSet, Predicate, SimpleMatcher, TagId,
};

const WAKELOCK: TagId = TagId(10);
const SCREEN_STATE: TagId = TagId(29);
const STATE: KeyId = KeyId(1);
const UID: KeyId = KeyId(2);
const TAG_NAME: KeyId = KeyId(3);
const BATTERY_LEVEL: KeyId = KeyId(4);
const PACKAGE_VERSION: KeyId = KeyId(1003);

fn a_rule() -> Matcher {
    Matcher::or(vec![
        Matcher::and(vec![
            SimpleMatcher::new([WAKELOCK])
                .with_predicate(Predicate::eq_int(STATE, 1))
                .with_predicate(Predicate::eq_string(TAG_NAME, "sync"))
                .into(),
            Matcher::nor(vec![SimpleMatcher::new([WAKELOCK])
                .with_predicate(Predicate::lt_int(UID, 10_000))
                .into()]),
        ]),
        Matcher::nand(vec![
            SimpleMatcher::new([SCREEN_STATE])
                .with_predicate(Predicate::gte_float(BATTERY_LEVEL, 15.0))
                .into(),
            SimpleMatcher::new([SCREEN_STATE])
                .with_predicate(Predicate::gt_int(PACKAGE_VERSION, 4))
                .into(),
        ]),
    ])
}

fn an_event() -> Attributes {
    Attributes::new()
        .with_integer(STATE, 1)
        .with_integer(UID, 10_042)
        .with_string(TAG_NAME, "sync")
        .with_float(BATTERY_LEVEL, 42.5)
        .with_integer(PACKAGE_VERSION, 7)
}

pub fn matches(c: &mut Criterion) {
    let rule = a_rule();
    let attributes = an_event();
    c.bench_function("matches", |b| {
        b.iter(|| std::hint::black_box(rule.matches(WAKELOCK, &attributes)))
    });
}

pub fn insert_rule(c: &mut Criterion) {
    c.bench_function("insert", |b| {
        b.iter_batched(
            || (MatcherSet::<u64>::new(), a_rule()),
            |(mut set, rule)| {
                let _ = std::hint::black_box(set.insert(1, rule));
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn search(c: &mut Criterion) {
    let mut set = MatcherSet::new();
    for id in 0..64u64 {
        set.insert(id, a_rule()).unwrap();
    }
    c.bench_function("search", |b| {
        b.iter_batched(
            an_event,
            |attributes| {
                let _ = std::hint::black_box(set.search(SCREEN_STATE, &attributes));
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, matches, insert_rule, search);
criterion_main!(benches);
