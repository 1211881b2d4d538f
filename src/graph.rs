//! DOT graph export of a configuration.
//!
//! The output is meant for Graphviz: one node per state, a solid labelled
//! edge per declared rule and a dashed edge from each substate to its
//! parent. Inherited rules are not repeated on substates.

use crate::builder::Configuration;
use crate::core::{State, Trigger};

/// Render `config` as a Graphviz `digraph`.
///
/// ```
/// use substate::builder::ConfigurationBuilder;
/// use substate::graph::to_dot;
/// use substate::{state_enum, trigger_enum};
///
/// state_enum! {
///     enum Shipment { Draft, Initialized }
/// }
/// trigger_enum! {
///     enum Request { ProcessingRequested }
/// }
///
/// let mut builder = ConfigurationBuilder::new();
/// builder.permit(Shipment::Draft, Request::ProcessingRequested, Shipment::Initialized)?;
/// let config = builder.build()?;
/// let dot = to_dot(&config);
///
/// assert!(dot.contains("\"Draft\" -> \"Initialized\" [label=\"ProcessingRequested\"];"));
/// # Ok::<(), substate::builder::ConfigError>(())
/// ```
pub fn to_dot<S: State, T: Trigger>(config: &Configuration<S, T>) -> String {
    let mut dot = String::from("digraph StateMachine {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box];\n\n");

    for state in config.states() {
        dot.push_str(&format!("  \"{}\";\n", escape(state.name())));
    }

    if !config.states().is_empty() {
        dot.push('\n');
    }

    for rule in config.rules() {
        dot.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            escape(rule.source.name()),
            escape(rule.target.name()),
            escape(rule.trigger.name())
        ));
    }

    for state in config.states() {
        if let Some(parent) = config.parent_of(state) {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [style=dashed, label=\"substate of\"];\n",
                escape(state.name()),
                escape(parent.name())
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Escape a name for use inside a quoted DOT identifier.
fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
