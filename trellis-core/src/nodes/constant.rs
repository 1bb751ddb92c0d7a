//! Constant node: republishes its `value` parameter on its `value` output.

use crate::error::Result;
use crate::graph::{Node, NodeBehavior, NodeSchema, ValueKind};
use crate::value::{ParamData, State};

pub const TYPE_TAG: &str = "constant";

/// Ports of the `constant` type.
pub fn schema() -> NodeSchema {
    NodeSchema::new()
        .parameter("value", ValueKind::Any)
        .out_value("value", ValueKind::Any)
}

/// Register the `constant` ports and behavior on `node`.
pub fn build(node: &mut Node) -> Result<()> {
    node.add_parameter("value", ParamData::Null)?;
    node.add_out_value("value", None)?;
    node.set_behavior(Constant);
    Ok(())
}

struct Constant;

impl NodeBehavior for Constant {
    fn node_did_update(&mut self, node: &mut Node, prev: &State) {
        let Some(value) = node.state().get("value").cloned() else {
            return;
        };
        if prev.get("value") == Some(&value) && node.output_value("value").is_some() {
            return;
        }
        if let Err(err) = node.send_out("value", value) {
            node.report_error(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeEvent, ParamAddress};

    #[test]
    fn republishes_changes_only() {
        let mut node = Node::new("k");
        build(&mut node).unwrap();
        node.drain_events();

        node.set("value", 3);
        node.commit_changes();
        assert_eq!(node.output_value("value"), Some(&ParamData::from(3)));

        node.set("value", 3);
        node.commit_changes();

        assert_eq!(
            node.drain_events(),
            [NodeEvent::Fired {
                address: ParamAddress::new("k", "value")
            }]
        );
    }
}
