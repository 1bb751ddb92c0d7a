//! Ambient node: samples a [`Context`] cell into the graph.
//!
//! The context is handed to the factory, so the same node type can read a
//! device handle in one registry and a test double in another.

use crate::error::Result;
use crate::graph::{Node, NodeBehavior, NodeSchema, ValueKind};
use crate::reactive::Context;
use crate::value::ParamData;

pub const TYPE_TAG: &str = "ambient";

/// Ports of the `ambient` type.
pub fn schema() -> NodeSchema {
    NodeSchema::new()
        .trigger("sample")
        .out_value("value", ValueKind::Any)
}

/// Builds a factory bound to `context`.
pub fn factory(context: Context<ParamData>) -> impl Fn(&mut Node) -> Result<()> + Send + Sync {
    move |node| {
        node.add_out_value("value", None)?;

        let reader = context.clone();
        node.add_trigger("sample", move |node| {
            let value = reader.get().unwrap_or_default();
            if let Err(err) = node.send_out("value", value) {
                node.report_error(err.to_string());
            }
        })?;

        node.set_behavior(Ambient {
            context: context.clone(),
        });
        Ok(())
    }
}

struct Ambient {
    context: Context<ParamData>,
}

impl NodeBehavior for Ambient {
    // Publish whatever the cell already holds so links made later start with it.
    fn node_did_create(&mut self, node: &mut Node) {
        if let Some(value) = self.context.get() {
            if let Err(err) = node.send_out("value", value) {
                node.report_error(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_the_injected_context() {
        let context = Context::new(ParamData::from("gpu0"));
        let mut node = Node::new("device");
        factory(context.clone())(&mut node).unwrap();

        node.trigger("sample").unwrap();
        assert_eq!(node.output_value("value"), Some(&ParamData::from("gpu0")));

        context.set(ParamData::from("gpu1"));
        node.trigger("sample").unwrap();
        assert_eq!(node.output_value("value"), Some(&ParamData::from("gpu1")));
    }
}
