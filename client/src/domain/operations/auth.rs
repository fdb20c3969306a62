//! Authentication operations.
//!
//! The plain email/password contract is the authoritative one; the variant
//! carrying an OTP and instructor flag is not part of the catalog.

use super::define_operation;
use crate::domain::auth::{AuthPayload, LoginCredentials, Registration};

define_operation! {
    /// Exchange email and password for a session token.
    mutation Login {
        variables: LoginCredentials,
        output: AuthPayload,
        root: "login",
        declare: ["email": "String!", "password": "String!"],
        selection: "(email: $email, password: $password) { success message token refreshToken user { id email firstName lastName role } }",
    }
}

define_operation! {
    /// Create an account and sign in.
    mutation Register {
        variables: Registration,
        output: AuthPayload,
        root: "register",
        declare: [
            "firstName": "String!",
            "lastName": "String!",
            "email": "String!",
            "password": "String!",
        ],
        selection: "(firstName: $firstName, lastName: $lastName, email: $email, password: $password) { success message token refreshToken user { id email firstName lastName role } }",
    }
}
