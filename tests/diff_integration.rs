use std::cell::Cell;

use histdelta::diff::{
    DiffAlgorithm, Edit, EditKind, EditList, HistogramDiff, MyersDiff, RawText, RawTextComparator,
    Sequence, SequenceComparator, SliceComparator,
};
use histdelta::engine::{self, Algorithm, DiffOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Check that `edits` is ordered, non-empty, and that the unchanged runs
/// between them pair up equal elements.  Returns the edit cost.
fn check_edits<S, C>(cmp: &C, a: &S, b: &S, edits: &EditList) -> usize
where
    S: Sequence + ?Sized,
    C: SequenceComparator<S>,
{
    let (mut pa, mut pb) = (0, 0);
    let mut cost = 0;
    for e in edits {
        assert!(!e.is_empty(), "empty edit {e} in {edits}");
        assert!(e.begin_a >= pa && e.begin_b >= pb, "unordered {edits}");
        assert_eq!(e.begin_a - pa, e.begin_b - pb, "gap mismatch before {e}");
        for i in 0..e.begin_a - pa {
            assert!(cmp.equals(a, pa + i, b, pb + i), "unequal kept element before {e}");
        }
        cost += e.len_a() + e.len_b();
        pa = e.end_a;
        pb = e.end_b;
    }
    assert!(pa <= a.len() && pb <= b.len());
    assert_eq!(a.len() - pa, b.len() - pb, "tail mismatch in {edits}");
    for i in 0..a.len() - pa {
        assert!(cmp.equals(a, pa + i, b, pb + i), "unequal tail element");
    }
    cost
}

fn random_seq(rng: &mut StdRng, alphabet: u8) -> Vec<u8> {
    let len = rng.random_range(0..120);
    (0..len).map(|_| b'a' + rng.random_range(0..alphabet)).collect()
}

fn mutate(rng: &mut StdRng, base: &[u8], alphabet: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(base.len() + 8);
    for &c in base {
        match rng.random_range(0..10) {
            0 => {}
            1 => out.push(b'a' + rng.random_range(0..alphabet)),
            2 => {
                out.push(c);
                out.push(b'a' + rng.random_range(0..alphabet));
            }
            _ => out.push(c),
        }
    }
    out
}

struct Counting<'c>(&'c Cell<usize>);

impl DiffAlgorithm for Counting<'_> {
    fn diff_non_common<S, C>(&self, cmp: &C, a: &S, b: &S) -> EditList
    where
        S: Sequence + ?Sized,
        C: SequenceComparator<S>,
    {
        self.0.set(self.0.get() + 1);
        MyersDiff.diff_non_common(cmp, a, b)
    }
}

// ---------------------------------------------------------------------------
// Random sequences
// ---------------------------------------------------------------------------

#[test]
fn random_diffs_are_valid() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..300 {
        let alphabet = [2, 4, 26][round % 3];
        let a = random_seq(&mut rng, alphabet);
        let b = if round % 2 == 0 {
            mutate(&mut rng, &a, alphabet)
        } else {
            random_seq(&mut rng, alphabet)
        };

        let hist = HistogramDiff::new().diff(&SliceComparator, &a[..], &b[..]);
        let myers = MyersDiff.diff(&SliceComparator, &a[..], &b[..]);
        let hist_cost = check_edits(&SliceComparator, &a[..], &b[..], &hist);
        let myers_cost = check_edits(&SliceComparator, &a[..], &b[..], &myers);
        // Myers is minimal; histogram may only be as good or worse.
        assert!(myers_cost <= hist_cost, "round {round}: {myers} vs {hist}");
    }
}

#[test]
fn any_chain_cap_gives_valid_edits() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let a = random_seq(&mut rng, 3);
        let b = mutate(&mut rng, &a, 3);
        let cap = rng.random_range(1..8);

        let calls = Cell::new(0);
        let alg = HistogramDiff::new()
            .with_max_chain_length(cap)
            .with_fallback(Counting(&calls));
        let edits = alg.diff(&SliceComparator, &a[..], &b[..]);
        check_edits(&SliceComparator, &a[..], &b[..], &edits);

        let bare = HistogramDiff::new().with_max_chain_length(cap).without_fallback();
        let edits = bare.diff(&SliceComparator, &a[..], &b[..]);
        check_edits(&SliceComparator, &a[..], &b[..], &edits);
    }
}

#[test]
fn generous_chain_cap_never_falls_back() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let a = random_seq(&mut rng, 2);
        let b = mutate(&mut rng, &a, 2);
        let calls = Cell::new(0);
        let alg = HistogramDiff::new()
            .with_max_chain_length(a.len() + 1)
            .with_fallback(Counting(&calls));
        let edits = alg.diff(&SliceComparator, &a[..], &b[..]);
        check_edits(&SliceComparator, &a[..], &b[..], &edits);
        assert_eq!(calls.get(), 0);
    }
}

#[test]
fn repetitive_region_consults_fallback() {
    let calls = Cell::new(0);
    let alg = HistogramDiff::new()
        .with_max_chain_length(1)
        .with_fallback(Counting(&calls));
    let edits = alg.diff(&SliceComparator, &b"xaaay"[..], &b"waaw"[..]);
    assert_eq!(calls.get(), 1);
    assert_eq!(&*edits, &[Edit::new(0, 2, 0, 1), Edit::new(4, 5, 3, 4)]);

    let bare = HistogramDiff::new().with_max_chain_length(1).without_fallback();
    let edits = bare.diff(&SliceComparator, &b"xaaay"[..], &b"waaw"[..]);
    assert_eq!(&*edits, &[Edit::new(0, 5, 0, 4)]);
}

#[test]
fn larger_chain_cap_can_defer_more() {
    let (a, b) = (&b"babaaa"[..], &b"aaaab"[..]);
    let run = |cap| {
        let calls = Cell::new(0);
        let alg = HistogramDiff::new()
            .with_max_chain_length(cap)
            .with_fallback(Counting(&calls));
        let edits = alg.diff(&SliceComparator, a, b);
        check_edits(&SliceComparator, a, b, &edits);
        (calls.get(), edits)
    };

    // Cap 2 keeps the four "a"s out of the search and splits on "ab".
    let (calls, edits) = run(2);
    assert_eq!(calls, 0);
    assert_eq!(&*edits, &[Edit::new(0, 1, 0, 3), Edit::new(3, 6, 5, 5)]);

    // Cap 3 lets the longer "aaa" run win with count 4, over the bound.
    let (calls, _) = run(3);
    assert_eq!(calls, 1);
    let bare = HistogramDiff::new().with_max_chain_length(3).without_fallback();
    assert_eq!(&*bare.diff(&SliceComparator, a, b), &[Edit::new(0, 6, 0, 5)]);

    // No element occurs more than four times in A, so cap 4 never defers.
    assert_eq!(run(4).0, 0);
}

#[test]
fn long_repetitive_region_falls_back_and_rebuilds() {
    // "a" occurs far more often than the default bucket bound, so the whole
    // region goes to Myers with about 8000 edits to find.
    let mut a = vec![b'x'];
    a.extend_from_slice(&[b'a'; 4000]);
    a.push(b'y');
    let mut b = vec![b'z'];
    b.extend_from_slice(&[b'b'; 2000]);
    b.push(b'a');
    b.extend_from_slice(&[b'b'; 2000]);
    b.push(b'w');

    let calls = Cell::new(0);
    let alg = HistogramDiff::new().with_fallback(Counting(&calls));
    let edits = alg.diff(&SliceComparator, &a[..], &b[..]);
    assert_eq!(calls.get(), 1);
    assert_eq!(edits.len(), 2);
    let cost = check_edits(&SliceComparator, &a[..], &b[..], &edits);
    assert_eq!(cost, a.len() + b.len() - 2);

    let mut rebuilt = Vec::with_capacity(b.len());
    let mut pa = 0;
    for e in &edits {
        rebuilt.extend_from_slice(&a[pa..e.begin_a]);
        rebuilt.extend_from_slice(&b[e.begin_b..e.end_b]);
        pa = e.end_a;
    }
    rebuilt.extend_from_slice(&a[pa..]);
    assert_eq!(rebuilt, b);
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn numbered(n: usize) -> String {
    (0..n).map(|i| format!("line {i}\n")).collect()
}

#[test]
fn inserted_line_is_one_insert() {
    let a = numbered(10);
    let mut b = String::new();
    for (i, line) in a.lines().enumerate() {
        b.push_str(line);
        b.push('\n');
        if i == 4 {
            b.push_str("new line\n");
        }
    }
    let edits = engine::diff_text(a.as_bytes(), b.as_bytes());
    assert_eq!(&*edits, &[Edit::new(5, 5, 5, 6)]);
    assert_eq!(edits[0].kind(), EditKind::Insert);
}

#[test]
fn deleted_block_is_one_delete() {
    let a = numbered(20);
    let b: String = a
        .lines()
        .enumerate()
        .filter(|(i, _)| !(8..12).contains(i))
        .map(|(_, l)| format!("{l}\n"))
        .collect();
    let edits = engine::diff_text(a.as_bytes(), b.as_bytes());
    assert_eq!(&*edits, &[Edit::new(8, 12, 8, 8)]);
    assert_eq!(edits.to_string(), "EditList[DELETE(8-12,8-8)]");
}

#[test]
fn source_file_edit() {
    let a = b"fn main() {\n    let x = 1;\n    println!(\"{x}\");\n}\n\nfn helper() {\n}\n";
    let b = b"fn main() {\n    let x = 2;\n    println!(\"{x}\");\n}\n\nfn helper() {\n    todo()\n}\n";
    let ta = RawText::new(a);
    let tb = RawText::new(b);
    let cmp = RawTextComparator::Default;
    for edits in [
        HistogramDiff::new().diff(&cmp, &ta, &tb),
        MyersDiff.diff(&cmp, &ta, &tb),
    ] {
        check_edits(&cmp, &ta, &tb, &edits);
        assert_eq!(&*edits, &[Edit::new(1, 2, 1, 2), Edit::new(6, 6, 6, 7)]);
    }
}

#[test]
fn missing_final_newline_is_a_change() {
    let edits = engine::diff_text(b"a\nb\n", b"a\nb");
    assert_eq!(&*edits, &[Edit::new(1, 2, 1, 2)]);
}

#[test]
fn whitespace_comparators() {
    let a = b"if x {\n\treturn 1;\n}\n";
    let b = b"if x {\n  return 1;   \n}\n";
    let trailing = b"if x {\n\treturn 1;   \n}\n";

    let opts = |comparator| DiffOptions {
        comparator,
        ..Default::default()
    };
    assert_eq!(engine::diff_text(a, b).len(), 1);
    assert!(
        engine::diff_text_with_options(a, b, &opts(RawTextComparator::IgnoreAllWhitespace))
            .is_empty()
    );
    assert_eq!(
        engine::diff_text_with_options(a, b, &opts(RawTextComparator::IgnoreTrailingWhitespace))
            .len(),
        1
    );
    assert!(
        engine::diff_text_with_options(a, trailing, &opts(RawTextComparator::IgnoreTrailingWhitespace))
            .is_empty()
    );
}

#[test]
fn random_text_algorithms_are_valid() {
    let mut rng = StdRng::seed_from_u64(99);
    let words = ["{", "}", "return;", "x += 1;", "", "let y = x;", "// note"];
    for _ in 0..50 {
        let n = rng.random_range(0..60);
        let a: String = (0..n)
            .map(|_| format!("{}\n", words[rng.random_range(0..words.len())]))
            .collect();
        let mut b = String::new();
        for line in a.lines() {
            if rng.random_range(0..6) != 0 {
                b.push_str(line);
                b.push('\n');
            }
            if rng.random_range(0..8) == 0 {
                b.push_str(words[rng.random_range(0..words.len())]);
                b.push('\n');
            }
        }

        let (ta, tb) = (RawText::new(a.as_bytes()), RawText::new(b.as_bytes()));
        let cmp = RawTextComparator::Default;
        for algorithm in [Algorithm::Histogram, Algorithm::Myers] {
            let opts = DiffOptions {
                algorithm,
                ..Default::default()
            };
            let edits = engine::diff_text_with_options(a.as_bytes(), b.as_bytes(), &opts);
            check_edits(&cmp, &ta, &tb, &edits);
        }
    }
}
