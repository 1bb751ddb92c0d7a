//! Stock Node Types
//!
//! A handful of small node types used by the replay tool and the tests. Real
//! patches register their own types (shader programs, textures, timers) next
//! to these.

pub mod ambient;
pub mod constant;
pub mod counter;
pub mod monitor;

use crate::graph::NodeRegistry;
use crate::reactive::Context;
use crate::value::ParamData;

/// A registry with every stock type. `ambient` nodes read `ambient`.
pub fn builtin_registry(ambient: Context<ParamData>) -> NodeRegistry {
    NodeRegistry::new()
        .with(counter::TYPE_TAG, counter::schema(), counter::build)
        .with(constant::TYPE_TAG, constant::schema(), constant::build)
        .with(monitor::TYPE_TAG, monitor::schema(), monitor::build)
        .with(ambient::TYPE_TAG, ambient::schema(), ambient::factory(ambient))
}
