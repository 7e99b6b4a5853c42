//! Role-based, field-level authorization.
//!
//! The pieces compose left to right: [`resolve_role`] places the caller
//! relative to an entity, [`TouchedFields`] names what a partial update
//! mentions, [`FieldPolicy`] says what each role may change, and
//! [`authorize`] turns the three into a [`Decision`]. Comments follow the
//! separate identity rules in [`can_comment`] and [`can_modify_comment`].

mod comments;
mod engine;
mod identity;
mod policy;

pub use comments::{can_comment, can_modify_comment};
pub use engine::{Decision, authorize};
pub use identity::{Role, Stakeholders, resolve_role};
pub use policy::{AllowedFields, FieldPolicy, project_field_policy, task_field_policy};

use std::collections::BTreeSet;
use std::fmt::Debug;

/// A named, mutable field of an entity.
pub trait TrackedField: Copy + Ord + Debug + 'static {
    /// Every field of the entity.
    const ALL: &'static [Self];

    /// Returns the transport name of the field.
    fn as_str(&self) -> &'static str;

    /// Looks a field up by its transport name.
    fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == name)
    }
}

/// Field-set extraction for partial updates.
///
/// Reports every field the payload mentioned, whether or not the value
/// differs from what is stored.
pub trait TouchedFields {
    /// Field vocabulary of the target entity.
    type Field: TrackedField;

    /// Returns the mentioned fields.
    fn touched_fields(&self) -> BTreeSet<Self::Field>;
}
