use serde::{Deserialize, Serialize};

use crate::serde_util::{optional_count, optional_text, text};

/// A bull registered for a client; selectable on OPU rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bull {
    pub id: i64,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub race: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub registration: Option<String>,
    #[serde(default, deserialize_with = "optional_count")]
    pub user_id: Option<i64>,
}

impl Bull {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            race: None,
            registration: None,
            user_id: None,
        }
    }

    /// Looks a bull up by id in an already loaded list.
    pub fn find(bulls: &[Bull], id: i64) -> Option<&Bull> {
        bulls.iter().find(|bull| bull.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_list() {
        let bulls = vec![Bull::new(1, "Titan"), Bull::new(2, "Brutus")];
        assert_eq!(Bull::find(&bulls, 2).map(|b| b.name.as_str()), Some("Brutus"));
        assert!(Bull::find(&bulls, 3).is_none());
    }
}
