use serde::{Deserialize, Serialize};

/// Field-presence constraint applied to a scroll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// The field is present and holds a non-null value.
    Exists { field: String },

    /// The field is absent or null.
    Missing { field: String },

    /// Every nested constraint must hold.
    And(Vec<Filter>),
}

impl Filter {
    pub fn exists(field: &str) -> Self {
        Filter::Exists {
            field: field.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Filter::Missing {
            field: field.to_string(),
        }
    }

    /// Combines two constraints, flattening nested `And` groups.
    pub fn and(self, other: Filter) -> Self {
        let mut clauses = match self {
            Filter::And(clauses) => clauses,
            single => vec![single],
        };
        match other {
            Filter::And(more) => clauses.extend(more),
            single => clauses.push(single),
        }
        Filter::And(clauses)
    }

    /// Fields referenced by this filter, in clause order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Filter::Exists { field } | Filter::Missing { field } => vec![field.as_str()],
            Filter::And(clauses) => clauses.iter().flat_map(|c| c.fields()).collect(),
        }
    }
}
