//! How each driver family draws its snapshots
//!
//! [`Scene`] is implemented on the same zero-sized markers that implement
//! [`Visualization`], so the app and panes stay generic over the driver.

use crate::algorithms::backtracking::{Arrangement, Backtracking, SearchFrame};
use crate::algorithms::dynamic::{DpFrame, DpSolution, DynamicProgramming};
use crate::algorithms::greedy::{Greedy, GreedySolution, GreedyView};
use crate::algorithms::recursion::{Recursion, RecursionView};
use crate::algorithms::sorting::{SortView, Sorting, Tag};
use crate::engine::Visualization;
use crate::structures::array::{ArrayFamily, ArrayView};
use crate::structures::binary_tree::{BinaryTreeFamily, TreeView};
use crate::structures::graph::{GraphFamily, GraphView};
use crate::structures::hash_table::{HashTableFamily, HashView};
use crate::structures::linked_list::{LinkedListFamily, ListView};
use crate::structures::queue::{QueueFamily, QueueView};
use crate::structures::stack::{StackFamily, StackView};
use crate::structures::Op;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub trait Scene: Visualization {
    const TITLE: &'static str;

    fn kind_label(kind: Self::Kind) -> &'static str;

    /// Draw one recorded snapshot
    fn draw(snapshot: &Self::Snapshot) -> Vec<Line<'static>>;

    /// One-line summary of a finished run's payload
    fn summarize(solution: &Self::Solution) -> String;
}

fn plain() -> Style {
    Style::default().fg(DEFAULT_THEME.fg)
}

fn muted() -> Style {
    Style::default().fg(DEFAULT_THEME.comment)
}

fn marked(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), marked(DEFAULT_THEME.heading)))
}

/// Cells in a row, with the ones in `highlight` emphasized
fn cells<T: ToString>(values: &[T], highlight: &[usize]) -> Line<'static> {
    let mut spans = Vec::with_capacity(values.len() * 2);
    for (i, value) in values.iter().enumerate() {
        let style = if highlight.contains(&i) {
            marked(DEFAULT_THEME.secondary)
        } else {
            plain()
        };
        spans.push(Span::styled(format!("[{:>3}]", value.to_string()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn tag_color(tag: Tag) -> Color {
    match tag {
        Tag::Default => DEFAULT_THEME.fg,
        Tag::Comparing | Tag::Current => DEFAULT_THEME.active_call,
        Tag::Swapping => DEFAULT_THEME.error,
        Tag::Sorted => DEFAULT_THEME.success,
        Tag::Pivot => DEFAULT_THEME.pivot,
        Tag::Subarray | Tag::Heap => DEFAULT_THEME.primary,
        Tag::Counting | Tag::Bucket | Tag::Radix => DEFAULT_THEME.bin,
    }
}

impl Scene for Sorting {
    const TITLE: &'static str = "Sorting";

    fn kind_label(kind: Self::Kind) -> &'static str {
        kind.label()
    }

    fn draw(snapshot: &SortView) -> Vec<Line<'static>> {
        let widest = snapshot
            .array
            .iter()
            .map(|e| e.value.unsigned_abs())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut lines = vec![Line::from(vec![
            Span::styled(format!("comparisons {}  ", snapshot.comparisons), muted()),
            Span::styled(format!("swaps {}", snapshot.swaps), muted()),
        ])];
        for element in &snapshot.array {
            let width = (u128::from(element.value.unsigned_abs()) * 40 / u128::from(widest)) as usize;
            let style = Style::default().fg(tag_color(element.tag));
            lines.push(Line::from(vec![
                Span::styled(format!("{:>6} ", element.value), style),
                Span::styled("█".repeat(width.max(1)), style),
            ]));
        }
        for (i, bin) in snapshot.aux.iter().enumerate() {
            if !bin.is_empty() {
                lines.push(Line::from(Span::styled(format!("bin {:>2}: {:?}", i, bin), muted())));
            }
        }
        lines
    }

    fn summarize(solution: &Vec<i64>) -> String {
        format!("sorted: {:?}", solution)
    }
}

impl Scene for DynamicProgramming {
    const TITLE: &'static str = "Dynamic Programming";

    fn kind_label(kind: Self::Kind) -> &'static str {
        kind.label()
    }

    fn draw(frame: &DpFrame) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(frame.table.len() + 2);
        for (r, row) in frame.table.iter().enumerate() {
            let mut spans = Vec::with_capacity(row.len());
            for (c, value) in row.iter().enumerate() {
                let style = if frame.current == Some((r, c)) {
                    let color = if frame.update {
                        DEFAULT_THEME.success
                    } else {
                        DEFAULT_THEME.active_call
                    };
                    marked(color)
                } else if frame.comparing == Some((r, c)) {
                    marked(DEFAULT_THEME.secondary)
                } else if frame.path.contains(&(r, c)) {
                    marked(DEFAULT_THEME.pivot)
                } else {
                    plain()
                };
                spans.push(Span::styled(format!("{:>4}", value), style));
            }
            lines.push(Line::from(spans));
        }
        if let Some(solution) = &frame.solution {
            lines.push(Line::raw(""));
            lines.push(heading(Self::summarize(solution)));
        }
        lines
    }

    fn summarize(solution: &DpSolution) -> String {
        match solution {
            DpSolution::Subsequence { length, sequence } => {
                format!("length {}: {:?}", length, sequence)
            }
            DpSolution::Knapsack { max_value, items } => {
                format!("value {} using items {:?}", max_value, items)
            }
            DpSolution::EditScript {
                distance,
                operations,
            } => {
                let script: Vec<String> = operations.iter().map(ToString::to_string).collect();
                format!("distance {}: {}", distance, script.join(", "))
            }
        }
    }
}

impl Scene for Backtracking {
    const TITLE: &'static str = "Backtracking";

    fn kind_label(kind: Self::Kind) -> &'static str {
        kind.label()
    }

    fn draw(frame: &SearchFrame) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!("solutions found: {}", frame.solutions_found),
            muted(),
        ))];
        match &frame.arrangement {
            Arrangement::Sequence(prefix) => lines.push(cells(prefix, &[])),
            Arrangement::Grid(grid) => {
                // a 0/1 grid is a queens board
                let queens = grid.iter().flatten().all(|&d| d <= 1);
                for (r, row) in grid.iter().enumerate() {
                    let spans: Vec<Span> = row
                        .iter()
                        .enumerate()
                        .map(|(c, &d)| {
                            let text = match d {
                                0 => " · ".to_string(),
                                1 if queens => " ♛ ".to_string(),
                                d => format!(" {} ", d),
                            };
                            let style = if frame.focus == Some((r, c)) {
                                marked(DEFAULT_THEME.secondary)
                            } else {
                                plain()
                            };
                            Span::styled(text, style)
                        })
                        .collect();
                    lines.push(Line::from(spans));
                }
            }
        }
        lines
    }

    fn summarize(solutions: &Vec<Arrangement>) -> String {
        match solutions.first() {
            Some(Arrangement::Sequence(first)) => {
                format!("{} solutions, first {:?}", solutions.len(), first)
            }
            _ => format!("{} solutions", solutions.len()),
        }
    }
}

impl Scene for Recursion {
    const TITLE: &'static str = "Recursion";

    fn kind_label(kind: Self::Kind) -> &'static str {
        kind.label()
    }

    fn draw(view: &RecursionView) -> Vec<Line<'static>> {
        let mut lines = vec![heading("call stack")];
        for (depth, call) in view.call_stack.iter().enumerate() {
            let style = if depth + 1 == view.call_stack.len() {
                marked(DEFAULT_THEME.active_call)
            } else {
                Style::default().fg(DEFAULT_THEME.outer_call)
            };
            lines.push(Line::from(Span::styled(
                format!("{}{}", "  ".repeat(depth), call),
                style,
            )));
        }
        if !view.pegs.is_empty() {
            lines.push(Line::raw(""));
            lines.push(heading(format!("pegs ({} moves)", view.moves.len())));
            for peg in &view.pegs {
                let disks: Vec<String> = peg.disks.iter().map(ToString::to_string).collect();
                lines.push(Line::from(vec![
                    Span::styled(format!("{} | ", peg.name), muted()),
                    Span::styled(disks.join(" "), plain()),
                ]));
            }
        }
        lines
    }

    fn summarize(result: &u64) -> String {
        format!("result {}", result)
    }
}

impl Scene for Greedy {
    const TITLE: &'static str = "Greedy";

    fn kind_label(kind: Self::Kind) -> &'static str {
        kind.label()
    }

    fn draw(view: &GreedyView) -> Vec<Line<'static>> {
        match view {
            GreedyView::Change {
                coins,
                current,
                used,
                remaining,
            } => {
                let highlight: Vec<usize> = current.iter().copied().collect();
                let mut lines = vec![heading("coins"), cells(coins, &highlight)];
                lines.push(Line::from(Span::styled(format!("remaining {}", remaining), plain())));
                for u in used {
                    lines.push(Line::from(Span::styled(
                        format!("{} x {}", u.count, u.coin),
                        marked(DEFAULT_THEME.success),
                    )));
                }
                lines
            }
            GreedyView::Activities {
                activities,
                current,
                selected,
                last_end,
            } => {
                let mut lines = vec![heading(format!("activities (last end {})", last_end))];
                for (i, a) in activities.iter().enumerate() {
                    let style = if selected.contains(a) {
                        marked(DEFAULT_THEME.success)
                    } else if *current == Some(i) {
                        marked(DEFAULT_THEME.secondary)
                    } else {
                        plain()
                    };
                    lines.push(Line::from(Span::styled(
                        format!("#{:<3} {:>4} - {:<4}", a.id, a.start, a.end),
                        style,
                    )));
                }
                lines
            }
        }
    }

    fn summarize(solution: &GreedySolution) -> String {
        match solution {
            GreedySolution::Change { remaining: 0, .. } => {
                format!("{} coins", solution.total_coins())
            }
            GreedySolution::Change { remaining, .. } => {
                format!("{} coins, {} left unpaid", solution.total_coins(), remaining)
            }
            GreedySolution::Activities(selected) => {
                let ids: Vec<String> = selected.iter().map(|a| a.id.to_string()).collect();
                format!("selected {}", ids.join(", "))
            }
        }
    }
}

impl Scene for ArrayFamily {
    const TITLE: &'static str = "Array";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &ArrayView) -> Vec<Line<'static>> {
        let indices: Vec<usize> = (0..view.data.len()).collect();
        vec![
            Line::from(Span::styled(format!("length {}", view.data.len()), muted())),
            cells(&view.data, &view.highlight),
            Line::from(Span::styled(
                indices
                    .iter()
                    .map(|i| format!(" {:>3}  ", i))
                    .collect::<String>(),
                muted(),
            )),
        ]
    }

    fn summarize(_: &()) -> String {
        String::new()
    }
}

impl Scene for StackFamily {
    const TITLE: &'static str = "Stack";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &StackView) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!("{}/{}", view.items.len(), view.capacity),
            muted(),
        ))];
        for (i, value) in view.items.iter().enumerate().rev() {
            let style = if view.highlight.contains(&i) {
                marked(DEFAULT_THEME.secondary)
            } else {
                plain()
            };
            let marker = if i + 1 == view.items.len() { " <- top" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("| {:>5} |", value), style),
                Span::styled(marker, muted()),
            ]));
        }
        lines.push(Line::from(Span::styled("+-------+", muted())));
        lines
    }

    fn summarize(_: &()) -> String {
        String::new()
    }
}

impl Scene for QueueFamily {
    const TITLE: &'static str = "Queue";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &QueueView) -> Vec<Line<'static>> {
        let slots: Vec<String> = view
            .slots
            .iter()
            .map(|s| s.map_or_else(|| "·".to_string(), |v| v.to_string()))
            .collect();
        let markers: String = (0..view.slots.len())
            .map(|i| match (view.front == Some(i), view.rear == Some(i)) {
                (true, true) => "  F/R ",
                (true, false) => "   F  ",
                (false, true) => "   R  ",
                (false, false) => "      ",
            })
            .collect();
        vec![cells(&slots, &view.highlight), Line::from(Span::styled(markers, muted()))]
    }

    fn summarize(_: &()) -> String {
        String::new()
    }
}

impl Scene for LinkedListFamily {
    const TITLE: &'static str = "Linked List";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &ListView) -> Vec<Line<'static>> {
        let mut spans = vec![Span::styled("head -> ", muted())];
        for (i, value) in view.values.iter().enumerate() {
            let style = if view.highlight.contains(&i) {
                marked(DEFAULT_THEME.secondary)
            } else {
                plain()
            };
            spans.push(Span::styled(format!("({})", value), style));
            spans.push(Span::styled(" -> ", muted()));
        }
        spans.push(Span::styled("null", muted()));
        vec![Line::from(spans)]
    }

    fn summarize(_: &()) -> String {
        String::new()
    }
}

impl Scene for BinaryTreeFamily {
    const TITLE: &'static str = "Binary Search Tree";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &TreeView) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!("size {}  depth {}", view.size(), view.depth()),
            muted(),
        ))];
        for level in view.levels() {
            let mut spans = Vec::with_capacity(level.len() * 2);
            let mut previous: Option<usize> = None;
            for (index, value) in level {
                // Missing nodes between two present ones collapse to one marker
                if previous.is_some_and(|p| index > p.saturating_add(1)) {
                    spans.push(Span::styled("  ·  ", muted()));
                }
                let style = if view.highlight.contains(&index) {
                    marked(DEFAULT_THEME.secondary)
                } else {
                    plain()
                };
                spans.push(Span::styled(format!("{:^5}", value), style));
                previous = Some(index);
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn summarize(_: &()) -> String {
        String::new()
    }
}

impl Scene for HashTableFamily {
    const TITLE: &'static str = "Hash Table";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &HashView) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "size {}  capacity {}  load {:.2}  collisions {}",
                view.size,
                view.capacity(),
                view.load_factor(),
                view.collisions
            ),
            muted(),
        ))];
        for (i, chain) in view.buckets.iter().enumerate() {
            let bucket_style = if view.highlight_buckets.contains(&i) {
                marked(DEFAULT_THEME.secondary)
            } else {
                muted()
            };
            let mut spans = vec![Span::styled(format!("[{:>2}]", i), bucket_style)];
            for entry in chain {
                let style = if view.highlight_keys.contains(&entry.key) {
                    marked(DEFAULT_THEME.success)
                } else {
                    plain()
                };
                spans.push(Span::styled(" -> ", muted()));
                spans.push(Span::styled(format!("{}={}", entry.key, entry.value), style));
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn summarize(_: &()) -> String {
        String::new()
    }
}

impl Scene for GraphFamily {
    const TITLE: &'static str = "Graph";

    fn kind_label(kind: Op) -> &'static str {
        kind.label()
    }

    fn draw(view: &GraphView) -> Vec<Line<'static>> {
        let mut lines = vec![heading("nodes")];
        let nodes: Vec<Span> = view
            .nodes
            .iter()
            .map(|n| {
                let style = if view.highlight_nodes.contains(&n.id) {
                    marked(DEFAULT_THEME.secondary)
                } else if view.visited.contains(&n.id) {
                    marked(DEFAULT_THEME.success)
                } else {
                    plain()
                };
                Span::styled(format!("{}({}) ", n.id, n.label), style)
            })
            .collect();
        lines.push(Line::from(nodes));

        lines.push(heading("edges"));
        for edge in &view.edges {
            let touches = |pairs: &[(String, String)]| {
                pairs.iter().any(|(a, b)| {
                    (a == &edge.source && b == &edge.target)
                        || (a == &edge.target && b == &edge.source)
                })
            };
            let style = if touches(&view.highlight_edges) {
                marked(DEFAULT_THEME.secondary)
            } else if touches(&view.visited_edges) {
                marked(DEFAULT_THEME.success)
            } else {
                plain()
            };
            lines.push(Line::from(Span::styled(
                format!("{} - {} ({})", edge.source, edge.target, edge.weight),
                style,
            )));
        }
        if !view.visited.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("order: {}", view.visited.join(" -> ")),
                muted(),
            )));
        }
        lines
    }

    fn summarize(order: &Vec<String>) -> String {
        format!("order: {}", order.join(" -> "))
    }
}
