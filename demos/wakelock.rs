use log_entry_matcher::{
    Attributes, KeyId, LogEvent, Matcher, MatcherSet, Predicate, SimpleMatcher, TagId,
};

const WAKELOCK: TagId = TagId(10);
const STATE: KeyId = KeyId(1);
const PACKAGE_VERSION: KeyId = KeyId(1003);

fn main() {
    let mut rules = MatcherSet::new();
    rules
        .insert(
            "wakelock_acquired",
            SimpleMatcher::new([WAKELOCK])
                .with_predicate(Predicate::eq_int(STATE, 1))
                .into(),
        )
        .unwrap();
    rules
        .insert(
            "outdated_package",
            Matcher::nand(vec![SimpleMatcher::new([WAKELOCK])
                .with_predicate(Predicate::gte_int(PACKAGE_VERSION, 4))
                .into()]),
        )
        .unwrap();

    let event = LogEvent::new(
        WAKELOCK,
        Attributes::new()
            .with_integer(STATE, 1)
            .with_integer(PACKAGE_VERSION, 3),
    );

    let report = rules.search_event(&event);
    for id in report.matches() {
        println!("{id}: {}", rules.get(id).unwrap());
    }
}
