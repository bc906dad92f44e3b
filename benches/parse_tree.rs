//! Benchmarks for parsing and analyzing large dependency trees
//!
//! Multi-module builds print trees with thousands of lines; parsing,
//! conflict grouping and flattening for the TUI should stay well below a
//! frame budget.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mvnscope::analysis::{conflict_groups, group_weights, TreeStats};
use mvnscope::config::AnalysisConfig;
use mvnscope::parser::parse_str;
use mvnscope::ui::tree::{flatten_forest, TreeNode};

/// Build `mvn dependency:tree` style text with roughly `total_nodes` lines.
///
/// Artifact ids repeat every 50 nodes with a different version so the
/// conflict radar has work to do.
fn create_tree_text(total_nodes: usize, max_depth: usize, children_per_node: usize) -> String {
    fn add_children(
        out: &mut String,
        node_count: &mut usize,
        total_nodes: usize,
        depth: usize,
        max_depth: usize,
        children_per_node: usize,
    ) {
        if *node_count >= total_nodes || depth > max_depth {
            return;
        }

        for i in 0..children_per_node {
            if *node_count >= total_nodes {
                break;
            }
            let n = *node_count;
            *node_count += 1;

            out.push_str("[INFO] ");
            out.push_str(&"|  ".repeat(depth - 1));
            out.push_str(if i + 1 == children_per_node { "\\- " } else { "+- " });
            out.push_str(&format!(
                "org.group{}:artifact-{}:jar:{}.0.0:compile\n",
                n % 7,
                n % 50,
                n % 3
            ));

            add_children(out, node_count, total_nodes, depth + 1, max_depth, children_per_node);
        }
    }

    let mut out = String::from("[INFO] com.example:bench:jar:1.0.0\n");
    let mut node_count = 1;
    add_children(&mut out, &mut node_count, total_nodes, 1, max_depth, children_per_node);
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_str");

    for size in [100, 1000, 5000].iter() {
        let text = create_tree_text(*size, 8, 5);

        group.bench_with_input(BenchmarkId::new("nodes", size), &text, |b, text| {
            b.iter(|| black_box(parse_str(text)));
        });
    }

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let config = AnalysisConfig::default();

    for size in [1000, 5000].iter() {
        let forest = parse_str(&create_tree_text(*size, 8, 5));

        group.bench_with_input(BenchmarkId::new("conflicts", size), &forest, |b, forest| {
            b.iter(|| black_box(conflict_groups(forest)));
        });
        group.bench_with_input(BenchmarkId::new("group_weights", size), &forest, |b, forest| {
            b.iter(|| black_box(group_weights(forest, &config)));
        });
        group.bench_with_input(BenchmarkId::new("stats", size), &forest, |b, forest| {
            b.iter(|| black_box(TreeStats::collect(forest)));
        });
    }

    group.finish();
}

/// Flattening with every node expanded, the worst case for the TUI
fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_flatten");

    for size in [1000, 5000].iter() {
        let forest = parse_str(&create_tree_text(*size, 8, 5));
        let mut roots = TreeNode::from_forest(&forest);
        for root in roots.iter_mut() {
            expand_all(root);
        }

        group.bench_with_input(BenchmarkId::new("nodes", size), &roots, |b, roots| {
            b.iter(|| black_box(flatten_forest(roots)));
        });
    }

    group.finish();
}

fn expand_all(node: &mut TreeNode) {
    node.expanded = true;
    for child in node.children.iter_mut() {
        expand_all(child);
    }
}

criterion_group!(benches, bench_parse, bench_analysis, bench_flatten);
criterion_main!(benches);
