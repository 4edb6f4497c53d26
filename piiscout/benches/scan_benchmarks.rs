use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use piiscout::catalog::{PatternCatalog, SourceFormat};
use piiscout::search::{match_all, MatchOptions};
use piiscout::{aggregate, enumerate, render};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs::File, io::Write};
use tempfile::TempDir;

const CATALOG: &str = r#"{
    "email_matches": "[a-z0-9._%+-]+@[a-z0-9.-]+\\.[a-z]{2,}",
    "secret": ["password\\s*=\\s*\\S+", "api[_-]?key\\s*[:=]\\s*\\S+"],
    "ipv4": "\\b\\d{1,3}\\.\\d{1,3}\\.\\d{1,3}\\.\\d{1,3}\\b",
    "ssn": "\\b\\d{3}-\\d{2}-\\d{4}\\b"
}"#;

fn create_test_tree(dir: &Path, file_count: usize, lines_per_file: usize) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.join(format!("test_{}.cfg", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(
                file,
                "line {} host=10.0.{}.{} user{}@example.com password = hunter{} nothing else",
                j,
                i % 255,
                j % 255,
                j,
                j
            )?;
        }
    }
    Ok(())
}

fn setup(file_count: usize, lines_per_file: usize) -> (TempDir, Vec<PathBuf>, Arc<PatternCatalog>) {
    let dir = TempDir::new().unwrap();
    create_test_tree(dir.path(), file_count, lines_per_file).unwrap();
    let files = enumerate(dir.path(), &None).unwrap();
    let catalog = Arc::new(PatternCatalog::parse(CATALOG, SourceFormat::Json).unwrap());
    (dir, files, catalog)
}

fn bench_scan_with_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_with_workers");
    let (_dir, files, catalog) = setup(100, 200);

    for workers in [1, 2, 4, 8].iter() {
        let options = MatchOptions {
            concurrency: *workers,
            ..MatchOptions::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(workers), workers, |b, _| {
            b.iter(|| {
                black_box(match_all(files.clone(), Arc::clone(&catalog), &options).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_scan_file_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_file_sizes");

    for lines in [10, 1_000, 20_000].iter() {
        let (_dir, files, catalog) = setup(10, *lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), lines, |b, _| {
            b.iter(|| {
                black_box(
                    match_all(files.clone(), Arc::clone(&catalog), &MatchOptions::default())
                        .unwrap(),
                );
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let (_dir, files, catalog) = setup(50, 200);
    let output = match_all(files, catalog, &MatchOptions::default()).unwrap();

    c.bench_function("render_reports", |b| {
        b.iter(|| {
            let aggregated = aggregate(&output.file_results);
            black_box(render(&output, &aggregated, "results.json").unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_scan_with_workers,
    bench_scan_file_sizes,
    bench_render
);
criterion_main!(benches);
