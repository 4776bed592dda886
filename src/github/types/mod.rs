use serde::{Deserialize, Serialize};

pub mod protection;

#[derive(Deserialize, Serialize, Debug)]
pub struct GraphQLError {
    pub message: String,
}

/// Envelope of every GraphQL answer.
#[derive(Deserialize, Debug)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

impl<T> GraphQLResponse<T> {
    /// Returns the data, or the joined error messages when GitHub reported any.
    pub fn into_data(self) -> Result<Option<T>, String> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ")),
            _ => Ok(self.data),
        }
    }
}
