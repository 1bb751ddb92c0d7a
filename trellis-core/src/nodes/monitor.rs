//! Monitor node: a display endpoint. Holds whatever arrives on `value` and
//! fires `changed` when it differs from the previous value.

use crate::error::Result;
use crate::graph::{Node, NodeBehavior, NodeSchema, ValueKind};
use crate::value::{ParamData, State};

pub const TYPE_TAG: &str = "monitor";

/// Ports of the `monitor` type.
pub fn schema() -> NodeSchema {
    NodeSchema::new()
        .parameter("value", ValueKind::Any)
        .out_trigger("changed")
}

/// Register the `monitor` ports and behavior on `node`.
pub fn build(node: &mut Node) -> Result<()> {
    node.add_parameter("value", ParamData::Null)?;
    node.add_out_trigger("changed")?;
    node.set_behavior(Monitor);
    Ok(())
}

struct Monitor;

impl NodeBehavior for Monitor {
    fn node_did_update(&mut self, node: &mut Node, prev: &State) {
        if prev.get("value") == node.state().get("value") {
            return;
        }
        tracing::debug!(node = %node.id(), value = ?node.state().get("value"), "monitor updated");
        if let Err(err) = node.trigger_out("changed") {
            node.report_error(err.to_string());
        }
    }
}
