//! DOT rendering of a transition table.

use crate::core::State;
use crate::machine::transition::Transition;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;

/// Online Graphviz renderer that reads the DOT source from the URL fragment.
pub const RENDERER_URL: &str = "https://dreampuf.github.io/GraphvizOnline/#";

/// Everything but unreserved URL characters and `/` is escaped.
const FRAGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Render the table as a Graphviz `digraph`, one edge per transition in
/// registration order.
pub fn to_dot<S: State>(transitions: &[Transition<S>]) -> String {
    let mut dot = String::from("digraph G {");
    for transition in transitions {
        let _ = write!(
            dot,
            "{}->{}[label=\"{}\"];",
            quote_id(transition.from().name()),
            quote_id(transition.to().name()),
            escape(&transition.trigger().to_string())
        );
    }
    dot.push('}');
    dot
}

/// Link that opens `dot` in the online renderer.
pub fn renderer_link(dot: &str) -> String {
    format!("{RENDERER_URL}{}", utf8_percent_encode(dot, FRAGMENT))
}

fn is_plain_id(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_id(name: &str) -> String {
    if is_plain_id(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name))
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TransitionId, Trigger};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Presence {
        Home,
        Away,
        Leaving,
        OnTheWay,
    }

    impl State for Presence {
        fn name(&self) -> &str {
            match self {
                Self::Home => "HOME",
                Self::Away => "AWAY",
                Self::Leaving => "LEAVING",
                Self::OnTheWay => "on the way",
            }
        }

        fn all() -> &'static [Self] {
            &[Self::Home, Self::Away, Self::Leaving, Self::OnTheWay]
        }
    }

    fn edge(id: usize, from: Presence, trigger: Trigger, to: Presence) -> Transition<Presence> {
        Transition {
            id: TransitionId(id),
            from,
            trigger,
            to,
            on_transition: None,
        }
    }

    #[test]
    fn empty_table_renders_empty_graph() {
        assert_eq!(to_dot::<Presence>(&[]), "digraph G {}");
    }

    #[test]
    fn edges_follow_registration_order() {
        let table = vec![
            edge(0, Presence::Home, Trigger::state_neq("tracker", "home"), Presence::Leaving),
            edge(1, Presence::Leaving, Trigger::timeout_secs(30), Presence::Away),
            edge(2, Presence::Away, Trigger::state_eq("tracker", "home"), Presence::Home),
        ];

        assert_eq!(
            to_dot(&table),
            "digraph G {\
             HOME->LEAVING[label=\"tracker != home\"];\
             LEAVING->AWAY[label=\"timeout 30 s\"];\
             AWAY->HOME[label=\"tracker == home\"];}"
        );
    }

    #[test]
    fn parallel_edges_are_kept_separate() {
        let table = vec![
            edge(0, Presence::Home, Trigger::state_on("a"), Presence::Away),
            edge(1, Presence::Home, Trigger::state_off("b"), Presence::Away),
        ];

        assert_eq!(
            to_dot(&table),
            "digraph G {HOME->AWAY[label=\"a\"];HOME->AWAY[label=\"!b\"];}"
        );
    }

    #[test]
    fn names_and_labels_are_escaped() {
        let table = vec![edge(
            0,
            Presence::OnTheWay,
            Trigger::state_eq("input_text.note", "say \"hi\""),
            Presence::Home,
        )];

        assert_eq!(
            to_dot(&table),
            "digraph G {\"on the way\"->HOME[label=\"input_text.note == say \\\"hi\\\"\"];}"
        );
    }

    #[test]
    fn renderer_link_encodes_dot_source() {
        let table = vec![edge(
            0,
            Presence::Leaving,
            Trigger::timeout_secs(30),
            Presence::Away,
        )];

        assert_eq!(
            renderer_link(&to_dot(&table)),
            "https://dreampuf.github.io/GraphvizOnline/#\
             digraph%20G%20%7BLEAVING-%3EAWAY%5Blabel%3D%22timeout%2030%20s%22%5D%3B%7D"
        );
    }

    #[test]
    fn renderer_link_keeps_unreserved_characters() {
        assert_eq!(
            renderer_link("sensor.t_1-a~b/c"),
            format!("{RENDERER_URL}sensor.t_1-a~b/c")
        );
    }
}
