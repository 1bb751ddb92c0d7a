//! Counter node: counts `increment` pulses.

use crate::error::Result;
use crate::graph::{Node, NodeSchema, ValueKind};
use crate::value::ParamData;

pub const TYPE_TAG: &str = "counter";

/// Ports of the `counter` type.
pub fn schema() -> NodeSchema {
    NodeSchema::new()
        .parameter("step", ValueKind::Number)
        .trigger("increment")
        .trigger("reset")
        .out_value("count", ValueKind::Number)
        .out_trigger("wrapped")
        .parameter("limit", ValueKind::Number)
}

/// Ports:
///
/// - `step` (number, default 1): added to the count on each `increment`
/// - `limit` (number or null): when set, the count wraps to 0 on reaching it
///   and `wrapped` fires
/// - `count` (number): current count, starts at 0
pub fn build(node: &mut Node) -> Result<()> {
    node.add_parameter("step", 1)?;
    node.add_parameter("limit", ParamData::Null)?;
    node.add_out_value("count", Some(ParamData::from(0)))?;
    node.add_out_trigger("wrapped")?;

    node.add_trigger("increment", |node| {
        let count = current(node, "count").unwrap_or(0.0);
        let step = node.state().get("step").and_then(ParamData::as_number).unwrap_or(1.0);
        let mut next = count + step;

        let limit = node.state().get("limit").and_then(ParamData::as_number);
        let wrapped = limit.is_some_and(|limit| next >= limit);
        if wrapped {
            next = 0.0;
        }

        if let Err(err) = node.send_out("count", next) {
            node.report_error(err.to_string());
        }
        if wrapped {
            if let Err(err) = node.trigger_out("wrapped") {
                node.report_error(err.to_string());
            }
        }
    })?;

    node.add_trigger("reset", |node| {
        if let Err(err) = node.send_out("count", 0) {
            node.report_error(err.to_string());
        }
    })?;

    Ok(())
}

fn current(node: &Node, output: &str) -> Option<f64> {
    node.output_value(output).and_then(ParamData::as_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn counter() -> Node {
        let mut node = Node::new("c")
            .with_type(TYPE_TAG)
            .with_schema(Arc::new(schema()));
        build(&mut node).unwrap();
        node
    }

    #[test]
    fn increments_by_step() {
        let mut node = counter();
        node.trigger("increment").unwrap();
        node.trigger("increment").unwrap();
        assert_eq!(node.output_value("count"), Some(&ParamData::from(2)));

        node.set("step", 5);
        node.commit_changes();
        node.trigger("increment").unwrap();
        assert_eq!(node.output_value("count"), Some(&ParamData::from(7)));

        node.trigger("reset").unwrap();
        assert_eq!(node.output_value("count"), Some(&ParamData::from(0)));
    }

    #[test]
    fn wraps_at_limit() {
        let mut node = counter();
        node.set("limit", 2);
        node.commit_changes();
        node.drain_events();

        node.trigger("increment").unwrap();
        node.trigger("increment").unwrap();
        assert_eq!(node.output_value("count"), Some(&ParamData::from(0)));

        let fired = node.drain_events().len();
        // count, count, wrapped
        assert_eq!(fired, 3);
    }
}
