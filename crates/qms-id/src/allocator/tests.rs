use crate::{
    Allocation, BasicAllocator, CalendarSource, Error, FallbackPolicy, FixedCalendar, Identifier,
    Partition, Prefix, PrefixSource, PrefixTable, Result, YearMonth, allocate, next_in_partition,
};
use core::cell::Cell;

struct MockCalendar {
    period: YearMonth,
}

impl CalendarSource for MockCalendar {
    fn current_period(&self) -> YearMonth {
        self.period
    }
}

struct MockStepCalendar {
    values: Vec<YearMonth>,
    index: Cell<usize>,
}

impl CalendarSource for MockStepCalendar {
    fn current_period(&self) -> YearMonth {
        self.values[self.index.get()]
    }
}

fn period(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn partition(prefix: &str, year: i32, month: u32) -> Partition {
    Partition::new(Prefix::new(prefix).unwrap(), period(year, month))
}

fn test_table() -> PrefixTable {
    PrefixTable::new(
        [("food-safety", "CCFS"), ("non-food-safety", "CCNFS"), ("generic", "PREFIX")],
        FallbackPolicy::DefaultPrefix(Prefix::new("CCNFS").unwrap()),
    )
    .unwrap()
}

fn matches_identifier_shape(s: &str, prefix: &str, period: &str) -> bool {
    let Some(rest) = s.strip_prefix(&format!("{prefix}-{period}-")) else {
        return false;
    };
    rest.len() >= 3 && rest.bytes().all(|b| b.is_ascii_digit())
}

trait AllocationExt {
    fn unwrap_id(self) -> String;
}

impl AllocationExt for Result<Allocation> {
    fn unwrap_id(self) -> String {
        match self {
            Ok(allocation) => allocation.id.to_string(),
            Err(e) => panic!("unexpected allocation error: {e}"),
        }
    }
}

fn run_allocates_after_highest_in_partition<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    let issued = ["CCFS-2025-10-001", "CCFS-2025-10-002", "CCNFS-2025-10-005"];
    assert_eq!(alloc("food-safety", &issued).unwrap_id(), "CCFS-2025-10-003");
}

fn run_empty_partition_starts_at_one<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    assert_eq!(alloc("food-safety", &[]).unwrap_id(), "CCFS-2025-10-001");
    let other_partitions = ["CCNFS-2025-10-004", "CCFS-2025-09-010", "CCFS-2024-10-020"];
    assert_eq!(
        alloc("food-safety", &other_partitions).unwrap_id(),
        "CCFS-2025-10-001"
    );
}

fn run_pure_over_same_snapshot<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    let issued = vec!["CCFS-2025-10-001", "CCFS-2025-10-007"];
    let first = alloc("food-safety", &issued).unwrap_id();
    let second = alloc("food-safety", &issued).unwrap_id();
    assert_eq!(first, "CCFS-2025-10-008");
    assert_eq!(first, second);
    assert_eq!(issued, vec!["CCFS-2025-10-001", "CCFS-2025-10-007"]);
}

fn run_skips_malformed_entries<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    let issued = [
        "CCFS-2025-10-002",
        "CCFS-2025-10-9",
        "CCFS-2025-10-77",
        "CCFS-2025-10-abc",
        "CCFS-2025-10-0500",
        "CCFS-2025-10-004-copy",
        "CCFS-2025-10-",
        "CCFS-2025-10-000",
        "CCFS-2025-10-LEGACY-07",
    ];
    assert_eq!(alloc("food-safety", &issued).unwrap_id(), "CCFS-2025-10-003");
}

fn run_counts_legacy_trailing_segment<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    let issued = ["CCFS-2025-10-002", "CCFS-2025-10-LEGACY-007"];
    assert_eq!(alloc("food-safety", &issued).unwrap_id(), "CCFS-2025-10-008");

    let issued = ["CCFS-2025-10-002", "CCFS-2025-10-IMPORT-1200"];
    assert_eq!(alloc("food-safety", &issued).unwrap_id(), "CCFS-2025-10-1201");
}

fn run_output_matches_shape<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    let cases: [&[&str]; 4] = [
        &[],
        &["CCFS-2025-10-041"],
        &["CCFS-2025-10-998"],
        &["CCFS-2025-10-1234"],
    ];
    for issued in cases {
        let id = alloc("food-safety", issued).unwrap_id();
        assert!(matches_identifier_shape(&id, "CCFS", "2025-10"), "{id}");
        assert!(id.parse::<Identifier>().is_ok(), "{id}");
    }
}

fn run_widens_past_999<F>(alloc: F)
where
    F: Fn(&str, &[&str]) -> Result<Allocation>,
{
    assert_eq!(
        alloc("generic", &["PREFIX-2025-10-999"]).unwrap_id(),
        "PREFIX-2025-10-1000"
    );
    assert_eq!(
        alloc("generic", &["PREFIX-2025-10-999", "PREFIX-2025-10-1000"]).unwrap_id(),
        "PREFIX-2025-10-1001"
    );
}

fn with_october_allocator(f: impl Fn(&dyn Fn(&str, &[&str]) -> Result<Allocation>)) {
    let table = test_table();
    let calendar = MockCalendar {
        period: period(2025, 10),
    };

    // Free function.
    f(&|category, issued| allocate(&table, category, issued.iter(), &calendar));

    // Bound allocator.
    let allocator = BasicAllocator::new(test_table(), FixedCalendar(period(2025, 10)));
    f(&|category, issued| allocator.allocate(category, issued));
}

#[test]
fn allocates_after_highest_in_partition() {
    with_october_allocator(|alloc| run_allocates_after_highest_in_partition(alloc));
}

#[test]
fn empty_partition_starts_at_one() {
    with_october_allocator(|alloc| run_empty_partition_starts_at_one(alloc));
}

#[test]
fn pure_over_same_snapshot() {
    with_october_allocator(|alloc| run_pure_over_same_snapshot(alloc));
}

#[test]
fn skips_malformed_entries() {
    with_october_allocator(|alloc| run_skips_malformed_entries(alloc));
}

#[test]
fn counts_legacy_trailing_segment() {
    with_october_allocator(|alloc| run_counts_legacy_trailing_segment(alloc));
}

#[test]
fn output_matches_shape() {
    with_october_allocator(|alloc| run_output_matches_shape(alloc));
}

#[test]
fn widens_past_999() {
    with_october_allocator(|alloc| run_widens_past_999(alloc));
}

#[test]
fn non_food_safety_in_january_starts_fresh() {
    let allocator = BasicAllocator::new(
        PrefixTable::complaints(),
        MockCalendar {
            period: period(2025, 1),
        },
    );
    let allocation = allocator
        .allocate("non-food-safety", Vec::<String>::new())
        .unwrap();
    assert_eq!(allocation.id.to_string(), "CCNFS-2025-01-001");
    assert_eq!(allocation.prefix_source, PrefixSource::Mapped);
    assert!(!allocation.used_fallback());
}

#[test]
fn highest_005_yields_006() {
    let p = partition("RCA", 2025, 6);
    let issued = ["RCA-2025-06-001", "RCA-2025-06-005", "RCA-2025-06-003"];
    assert_eq!(next_in_partition(&p, issued).unwrap().to_string(), "RCA-2025-06-006");
}

#[test]
fn gaps_are_never_filled() {
    let p = partition("RCA", 2025, 6);
    let issued = ["RCA-2025-06-002", "RCA-2025-06-010"];
    assert_eq!(next_in_partition(&p, issued).unwrap().sequence(), 11);
}

#[test]
fn partitions_are_isolated() {
    let issued = [
        "CCFS-2025-10-009",
        "CCNFS-2025-11-004",
        "CCFS-2024-11-030",
        "CCFSX-2025-11-050",
    ];
    // Same prefix and month, different year; different prefix, same month.
    assert_eq!(
        next_in_partition(&partition("CCFS", 2025, 11), issued).unwrap().to_string(),
        "CCFS-2025-11-001"
    );
    assert_eq!(
        next_in_partition(&partition("CCFS", 2025, 10), issued).unwrap().to_string(),
        "CCFS-2025-10-010"
    );
    assert_eq!(
        next_in_partition(&partition("CCNFS", 2025, 11), issued).unwrap().to_string(),
        "CCNFS-2025-11-005"
    );
}

#[test]
fn month_rollover_switches_partition() {
    let calendar = MockStepCalendar {
        values: vec![period(2025, 12), period(2026, 1)],
        index: Cell::new(0),
    };
    let allocator = BasicAllocator::new(PrefixTable::complaints(), &calendar);
    let mut issued = Vec::new();

    for expected in ["CCFS-2025-12-001", "CCFS-2025-12-002"] {
        let id = allocator.allocate("food-safety", &issued).unwrap().id;
        assert_eq!(id.to_string(), expected);
        issued.push(id.to_string());
    }

    calendar.index.set(1);
    let id = allocator.allocate("food-safety", &issued).unwrap().id;
    assert_eq!(id.to_string(), "CCFS-2026-01-001");
}

#[test]
fn sequential_allocations_are_monotonic() {
    let allocator = BasicAllocator::new(PrefixTable::complaints(), FixedCalendar(period(2025, 10)));
    let mut issued: Vec<String> = Vec::new();
    let mut last = 0;

    for _ in 0..1_500 {
        let id = allocator.allocate("food-safety", &issued).unwrap().id;
        assert_eq!(id.sequence(), last + 1);
        last = id.sequence();
        issued.push(id.to_string());
    }
    assert_eq!(issued[998], "CCFS-2025-10-999");
    assert_eq!(issued[999], "CCFS-2025-10-1000");
    assert_eq!(issued[1_499], "CCFS-2025-10-1500");
}

#[test]
fn fallback_is_visible() {
    let allocator = BasicAllocator::new(PrefixTable::complaints(), FixedCalendar(period(2025, 10)));
    let allocation = allocator.allocate("packaging", ["CCNFS-2025-10-004"]).unwrap();
    assert_eq!(allocation.id.to_string(), "CCNFS-2025-10-005");
    assert_eq!(allocation.prefix_source, PrefixSource::Fallback);
    assert!(allocation.used_fallback());
}

#[test]
fn reject_policy_surfaces_unknown_category() {
    let allocator = BasicAllocator::new(
        PrefixTable::complaints_with(FallbackPolicy::Reject),
        FixedCalendar(period(2025, 10)),
    );
    let err = allocator.allocate("packaging", Vec::<String>::new()).unwrap_err();
    assert_eq!(
        err,
        Error::UnknownCategory {
            category: "packaging".into()
        }
    );
    assert!(err.is_invalid_input());
}

#[test]
fn exhausted_partition_is_an_error() {
    let p = partition("CCFS", 2025, 10);
    let issued = [format!("CCFS-2025-10-{}", u32::MAX)];
    assert_eq!(
        next_in_partition(&p, &issued).unwrap_err(),
        Error::SequenceExhausted {
            partition: "CCFS-2025-10".into()
        }
    );
}

#[test]
fn partition_for_reports_source() {
    let allocator = BasicAllocator::new(PrefixTable::complaints(), FixedCalendar(period(2025, 10)));
    let (p, source) = allocator.partition_for("food-safety").unwrap();
    assert_eq!(p.key(), "CCFS-2025-10-");
    assert_eq!(source, PrefixSource::Mapped);
    let (p, source) = allocator.partition_for("unknown").unwrap();
    assert_eq!(p.key(), "CCNFS-2025-10-");
    assert_eq!(source, PrefixSource::Fallback);
}
