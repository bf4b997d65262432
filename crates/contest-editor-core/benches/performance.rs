use std::sync::Arc;

use contest_editor_core::{
    ContestDefinition, ContestEditor, ContestEditorConfig, FileDescriptor, MemorySurface,
    MockJudge, TestCase, TestCaseReport, TranscriptEntry, TranscriptStore, Verdict,
    compute_heights,
};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn large_source(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        out.push_str(&format!("    total += values[{i}] * weights[{i}];\n"));
    }
    out
}

fn bench_transcript_append(c: &mut Criterion) {
    c.bench_function("transcript_append/10k_entries", |b| {
        b.iter_batched(
            TranscriptStore::new,
            |mut store| {
                for i in 0..10_000 {
                    store.append(TranscriptEntry::output(format!("line {i}")));
                }
                black_box(store.take_scroll_request());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_layout_recompute(c: &mut Criterion) {
    c.bench_function("layout/compute_heights", |b| {
        b.iter(|| {
            for total in 0..1_000u32 {
                black_box(compute_heights(black_box(total), total % 2 == 0, 40));
            }
        })
    });
}

fn bench_report_build(c: &mut Criterion) {
    let cases: Vec<TestCase> = (0..500)
        .map(|i| {
            let case = TestCase::new(format!("case {i}"), i % 7 != 0);
            if i % 3 == 0 { case.hidden() } else { case }
        })
        .collect();
    c.bench_function("report/500_cases", |b| {
        b.iter(|| black_box(TestCaseReport::new(black_box(&cases))))
    });
}

fn bench_snapshot_for_submission(c: &mut Criterion) {
    let contest = ContestDefinition {
        files: vec![
            FileDescriptor::new("main.cpp", "cpp", large_source(20_000)),
            FileDescriptor::new("util.h", "cpp", large_source(2_000)),
        ],
        ..ContestDefinition::default()
    };
    c.bench_function("submission/begin_finish_20k_lines", |b| {
        b.iter_batched(
            || {
                ContestEditor::new(
                    ContestEditorConfig::default(),
                    contest.clone(),
                    MemorySurface::new(),
                    Arc::new(MockJudge::accepting(Verdict::evaluated(vec![]))),
                )
            },
            |mut editor| {
                let ticket = editor.begin_submission().unwrap();
                black_box(ticket.files().len());
                editor
                    .finish_submission(ticket, Ok(Verdict::evaluated(vec![])))
                    .unwrap();
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_transcript_append,
    bench_layout_recompute,
    bench_report_build,
    bench_snapshot_for_submission
);
criterion_main!(benches);
