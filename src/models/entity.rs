//! Human-readable labels for states, actions and observations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an entity of a model is identified for display.
///
/// The solvers only see indices; labels are resolved once when the model is
/// built and used for logging and output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    /// A plain name, e.g. `"tiger-left"`.
    Named(String),
    /// A bare index.
    Indexed(usize),
    /// A point in a factored space, one value per factor.
    Factored(Vec<usize>),
    /// A joint entity made of per-agent names.
    Joint(Vec<String>),
}

impl EntityLabel {
    /// Shorthand for [`EntityLabel::Named`].
    pub fn named(name: impl Into<String>) -> Self {
        EntityLabel::Named(name.into())
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Named(name) => f.write_str(name),
            EntityLabel::Indexed(index) => write!(f, "{}", index),
            EntityLabel::Factored(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
            EntityLabel::Joint(names) => write!(f, "<{}>", names.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(EntityLabel::named("listen").to_string(), "listen");
        assert_eq!(EntityLabel::Indexed(3).to_string(), "3");
        assert_eq!(EntityLabel::Factored(vec![1, 0, 2]).to_string(), "(1, 0, 2)");
        assert_eq!(
            EntityLabel::Joint(vec!["left".into(), "right".into()]).to_string(),
            "<left, right>"
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&EntityLabel::Factored(vec![1, 2])).unwrap();
        assert_eq!(json, r#"{"factored":[1,2]}"#);
        let back: EntityLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntityLabel::Factored(vec![1, 2]));
    }
}
