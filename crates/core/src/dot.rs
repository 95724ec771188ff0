#![forbid(unsafe_code)]

//! Graphviz `dot` source for one project graph.
//!
//! Output is a pure function of the reconciled graph, the project id and the
//! layout direction: pairs come out in sorted order, then styled nodes sorted
//! by name, then unstyled nodes sorted by name.

use crate::graph::ProjectGraph;
use crate::ids::ProjectId;
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankDir {
    #[default]
    LeftToRight,
    TopToBottom,
}

impl RankDir {
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::TopToBottom
        } else {
            Self::LeftToRight
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom)
    }
}

/// Click target of a bubble: the flip endpoint for that bubble.
pub fn flip_link(project: ProjectId, bubble: &str, rankdir: RankDir) -> String {
    let encoded = form_urlencoded::byte_serialize(bubble.as_bytes()).collect::<String>();
    let mut out = format!("/flip?pID={project}&bubble={encoded}");
    if rankdir.is_vertical() {
        out.push_str("&vertical");
    }
    out
}

pub fn render_dot(project: ProjectId, graph: &ProjectGraph, rankdir: RankDir) -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    if !rankdir.is_vertical() {
        out.push_str("\trankdir=\"LR\"\n");
    }

    for pair in graph.pairs() {
        let _ = writeln!(out, "\t{} -> {}", quote(&pair.left), quote(&pair.right));
    }

    for (name, state) in graph.styled() {
        let href = quote(&flip_link(project, name, rankdir));
        match state.fill_color() {
            Some(color) => {
                let _ = writeln!(
                    out,
                    "\t{} [href={href},style=filled,fillcolor={color}]",
                    quote(name)
                );
            }
            None => {
                let _ = writeln!(out, "\t{} [href={href}]", quote(name));
            }
        }
    }

    for name in graph.unstyled() {
        let href = quote(&flip_link(project, name, rankdir));
        let _ = writeln!(out, "\t{} [href={href}]", quote(name));
    }

    out.push_str("}\n");
    out
}

/// Double-quoted dot ID. Any name, including ones with quotes or spaces, is
/// safe inside it.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BubbleRow, BubbleState, Pair};

    fn pid(value: i64) -> ProjectId {
        ProjectId::try_new(value).unwrap()
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<Pair> {
        raw.iter()
            .map(|(left, right)| Pair::new(left, right).unwrap())
            .collect()
    }

    #[test]
    fn renders_sorted_arcs_then_unstyled_nodes() {
        let graph = ProjectGraph::reconcile(
            pairs(&[("design", "build"), ("build", "ship")]),
            Vec::new(),
        );
        let src = render_dot(pid(3), &graph, RankDir::LeftToRight);
        assert_eq!(
            src,
            "digraph G {\n\
             \trankdir=\"LR\"\n\
             \t\"build\" -> \"ship\"\n\
             \t\"design\" -> \"build\"\n\
             \t\"build\" [href=\"/flip?pID=3&bubble=build\"]\n\
             \t\"design\" [href=\"/flip?pID=3&bubble=design\"]\n\
             \t\"ship\" [href=\"/flip?pID=3&bubble=ship\"]\n\
             }\n"
        );
    }

    #[test]
    fn styled_nodes_carry_fill_colors() {
        let graph = ProjectGraph::reconcile(
            pairs(&[("a", "b"), ("b", "c"), ("c", "d")]),
            vec![
                BubbleRow {
                    bubble: "d".to_string(),
                    state: BubbleState::Aborted,
                },
                BubbleRow {
                    bubble: "b".to_string(),
                    state: BubbleState::Started,
                },
                BubbleRow {
                    bubble: "c".to_string(),
                    state: BubbleState::Done,
                },
                BubbleRow {
                    bubble: "a".to_string(),
                    state: BubbleState::Initial,
                },
            ],
        );
        let src = render_dot(pid(1), &graph, RankDir::TopToBottom);
        assert!(!src.contains("rankdir"));
        let nodes = src
            .lines()
            .filter(|line| line.contains("[href="))
            .collect::<Vec<_>>();
        assert_eq!(
            nodes,
            vec![
                "\t\"a\" [href=\"/flip?pID=1&bubble=a&vertical\"]",
                "\t\"b\" [href=\"/flip?pID=1&bubble=b&vertical\",style=filled,fillcolor=yellow]",
                "\t\"c\" [href=\"/flip?pID=1&bubble=c&vertical\",style=filled,fillcolor=lightgreen]",
                "\t\"d\" [href=\"/flip?pID=1&bubble=d&vertical\",style=filled,fillcolor=red]",
            ]
        );
    }

    #[test]
    fn names_with_quotes_and_spaces_are_escaped() {
        let graph = ProjectGraph::reconcile(pairs(&[("say \"hi\"", "a\\b")]), Vec::new());
        let src = render_dot(pid(9), &graph, RankDir::LeftToRight);
        assert!(src.contains("\t\"say \\\"hi\\\"\" -> \"a\\\\b\"\n"));
        assert!(src.contains("bubble=say+%22hi%22"));
        assert!(src.contains("bubble=a%5Cb"));
    }

    #[test]
    fn names_differing_only_by_carriage_return_stay_distinct() {
        let graph = ProjectGraph::reconcile(
            pairs(&[("a\rb", "x"), ("ab", "y")]),
            vec![BubbleRow {
                bubble: "a\rb".to_string(),
                state: BubbleState::Done,
            }],
        );
        let src = render_dot(pid(4), &graph, RankDir::LeftToRight);
        assert!(src.contains("\t\"a\\rb\" -> \"x\"\n"));
        assert!(src.contains("\t\"ab\" -> \"y\"\n"));
        assert_eq!(src.lines().filter(|l| l.starts_with("\t\"ab\" [")).count(), 1);
        assert!(src.contains(
            "\t\"a\\rb\" [href=\"/flip?pID=4&bubble=a%0Db\",style=filled,fillcolor=lightgreen]\n"
        ));
        assert!(src.contains("\t\"ab\" [href=\"/flip?pID=4&bubble=ab\"]\n"));
    }

    #[test]
    fn output_is_independent_of_read_order() {
        let rows = |order: &[&str]| {
            order
                .iter()
                .map(|name| BubbleRow {
                    bubble: name.to_string(),
                    state: BubbleState::Done,
                })
                .collect::<Vec<_>>()
        };
        let first = ProjectGraph::reconcile(
            pairs(&[("x", "y"), ("w", "x"), ("y", "z")]),
            rows(&["z", "w"]),
        );
        let second = ProjectGraph::reconcile(
            pairs(&[("y", "z"), ("x", "y"), ("w", "x")]),
            rows(&["w", "z"]),
        );
        assert_eq!(
            render_dot(pid(2), &first, RankDir::LeftToRight),
            render_dot(pid(2), &second, RankDir::LeftToRight)
        );
    }

    #[test]
    fn empty_graph_is_still_valid_dot() {
        let src = render_dot(pid(1), &ProjectGraph::default(), RankDir::TopToBottom);
        assert_eq!(src, "digraph G {\n}\n");
    }
}
