//! Entity/component composition.
//!
//! An [`Entity`] owns its components and child entities outright. Every
//! lifecycle call fans out to components first, then children, both in
//! attachment order.

mod component;
mod entity;
mod lifecycle;

pub use component::{AsAny, Component, ComponentContext, ComponentKind, Siblings};
pub(crate) use component::short_type_name;
pub use entity::{Entity, EntityId};
pub use lifecycle::Lifecycle;
