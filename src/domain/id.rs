//! Identifiers for lists and tasks
//!
//! IDs are opaque strings. Freshly allocated ones are 15 random ASCII
//! alphanumeric characters (e.g. `aBcD3FgHiJkLmNo`), but anything found in
//! an imported file is accepted as-is: only uniqueness within the owning
//! collection matters.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of generated identifiers
pub const ID_LENGTH: usize = 15;

/// Anything stored in a collection and addressed by ID
pub trait Identified {
    type Id: PartialEq + From<String>;

    fn id(&self) -> &Self::Id;
}

/// Task ID, unique within the list that owns the task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

/// List ID, unique within the list collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ListId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ListId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ListId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Generates a random alphanumeric string of [`ID_LENGTH`] characters
fn random_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Generates an ID that collides with no item of `items`
pub fn generate_id<T: Identified>(items: &[T]) -> T::Id {
    generate_id_with(&mut rand::rng(), items)
}

/// Same as [`generate_id`] with an explicit randomness source
pub fn generate_id_with<T, R>(rng: &mut R, items: &[T]) -> T::Id
where
    T: Identified,
    R: Rng + ?Sized,
{
    loop {
        let candidate = T::Id::from(random_string(rng));
        if !items.iter().any(|item| item.id() == &candidate) {
            return candidate;
        }
    }
}
