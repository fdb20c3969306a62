//! Operation catalog: the fixed vocabulary of GraphQL requests.
//!
//! Every entry is a zero-sized type implementing [`Operation`]. The type pairs
//! a request template (kind, name, declared variables, selection) with the
//! Rust types used for its variables and its root-field payload. Nothing here
//! performs I/O; the transport receives the rendered [`GraphqlRequest`].

mod macros;
pub(crate) use macros::define_operation;

pub mod account;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod lectures;
pub mod media;
pub mod progress;
pub mod quizzes;
pub mod reminders;
pub mod sections;


use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether an operation reads or writes server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read-only request.
    Query,
    /// State-changing request.
    Mutation,
}

impl OperationKind {
    /// GraphQL keyword introducing the operation.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One `$name: Type = default` declaration in an operation header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDecl {
    /// Variable name without the leading `$`.
    pub name: &'static str,
    /// GraphQL type expression, e.g. `Int!` or `[Int!]!`.
    pub graphql_type: &'static str,
    /// Default value literal in GraphQL syntax.
    pub default: Option<&'static str>,
}

impl VariableDecl {
    /// Declare a variable.
    #[must_use]
    pub const fn new(
        name: &'static str,
        graphql_type: &'static str,
        default: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            graphql_type,
            default,
        }
    }

    /// A variable must be supplied when its type is non-null and it has no
    /// default.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.graphql_type.ends_with('!') && self.default.is_none()
    }
}

/// Variables for operations that declare none. Serialises as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoVariables {}

/// Wire-level request body: `{ query, operationName, variables }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    /// Rendered GraphQL document.
    pub query: String,
    /// Operation name, echoed for server-side logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Variable values; always a JSON object.
    pub variables: Value,
}

impl GraphqlRequest {
    /// Build a request from a raw document, e.g. for ad hoc tooling.
    #[must_use]
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: normalise_variables(variables),
        }
    }

    /// Attach an operation name.
    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Name used in logs, falling back to `anonymous`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.operation_name.as_deref().unwrap_or("anonymous")
    }
}

fn normalise_variables(variables: Value) -> Value {
    match variables {
        Value::Null => Value::Object(Map::new()),
        other => other,
    }
}

/// A catalog entry.
///
/// # Examples
/// ```
/// use lms_client::domain::operations::Operation;
/// use lms_client::domain::operations::sections::DeleteSection;
///
/// let document = DeleteSection::document();
/// assert!(document.starts_with("mutation DeleteSection($sectionId: Int!)"));
/// ```
pub trait Operation: Send + Sync + 'static {
    /// Variables object sent with the request.
    type Variables: Serialize + Send + Sync;
    /// Payload found under [`Operation::ROOT_FIELD`] in the response data.
    type Output: DeserializeOwned + Send;

    /// Query or mutation.
    const KIND: OperationKind;
    /// Operation name placed in the document header.
    const NAME: &'static str;
    /// Root field selected by the operation.
    const ROOT_FIELD: &'static str;
    /// Ordered variable declarations.
    const VARIABLES: &'static [VariableDecl];
    /// Arguments and selection set following the root field.
    const SELECTION: &'static str;

    /// Render the full GraphQL document.
    fn document() -> String {
        render_document(
            Self::KIND,
            Self::NAME,
            Self::VARIABLES,
            Self::ROOT_FIELD,
            Self::SELECTION,
        )
    }

    /// Build the wire request for `variables`.
    ///
    /// # Errors
    ///
    /// Returns an error when the variables cannot be serialised to JSON.
    fn request(variables: &Self::Variables) -> Result<GraphqlRequest, serde_json::Error> {
        let variables = serde_json::to_value(variables)?;
        Ok(GraphqlRequest::new(Self::document(), variables).with_operation_name(Self::NAME))
    }

    /// Extract and decode the root-field payload from response `data`.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload does not match [`Operation::Output`].
    fn decode(data: Value) -> Result<Self::Output, serde_json::Error> {
        let root = match data {
            Value::Object(mut fields) => fields.remove(Self::ROOT_FIELD).unwrap_or(Value::Null),
            _ => Value::Null,
        };
        serde_json::from_value(root)
    }
}

/// Render `<kind> <Name>(<decls>) { <root><selection> }`.
#[must_use]
pub fn render_document(
    kind: OperationKind,
    name: &str,
    variables: &[VariableDecl],
    root_field: &str,
    selection: &str,
) -> String {
    let mut document = format!("{kind} {name}");
    if !variables.is_empty() {
        let declarations = variables
            .iter()
            .map(|decl| match decl.default {
                Some(default) => format!("${}: {} = {default}", decl.name, decl.graphql_type),
                None => format!("${}: {}", decl.name, decl.graphql_type),
            })
            .collect::<Vec<_>>()
            .join(", ");
        document.push('(');
        document.push_str(&declarations);
        document.push(')');
    }
    document.push_str(" { ");
    document.push_str(root_field);
    document.push_str(selection);
    document.push_str(" }");
    document
}

/// Payloads of mutations that report `{ success, message }` alongside data.
pub trait MutationOutcome {
    /// Server-reported success flag.
    fn succeeded(&self) -> bool;
    /// Optional server message, used as the failure text.
    fn message(&self) -> Option<&str>;
}

/// Implement [`MutationOutcome`] for payload structs with `success` and
/// `message` fields.
macro_rules! impl_mutation_outcome {
    ($($payload:ty),* $(,)?) => {
        $(
            impl $crate::domain::operations::MutationOutcome for $payload {
                fn succeeded(&self) -> bool {
                    self.success
                }

                fn message(&self) -> Option<&str> {
                    self.message.as_deref()
                }
            }
        )*
    };
}

pub(crate) use impl_mutation_outcome;

/// Bare `{ success, message }` acknowledgement returned by deletes and
/// reorders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    /// Server-reported success flag.
    pub success: bool,
    /// Optional server message.
    #[serde(default)]
    pub message: Option<String>,
}

impl_mutation_outcome!(Acknowledgement);
