//! Profile and preferences operations.

use super::{Acknowledgement, NoVariables, define_operation};
use crate::domain::account::{
    PasswordChange, PreferencesPayload, PreferencesUpdate, ProfilePayload, ProfileUpdate,
    UserPreferences, UserProfile,
};

define_operation! {
    /// Profile of the signed-in user; `null` when the token is not accepted.
    query GetMyProfile {
        variables: NoVariables,
        output: Option<UserProfile>,
        root: "me",
        declare: [],
        selection: " { id email firstName lastName role bio headline website avatar }",
    }
}

define_operation! {
    /// Edit profile fields.
    mutation UpdateProfile {
        variables: ProfileUpdate,
        output: ProfilePayload,
        root: "updateProfile",
        declare: [
            "firstName": "String",
            "lastName": "String",
            "bio": "String",
            "headline": "String",
            "website": "String",
            "avatar": "String",
        ],
        selection: "(firstName: $firstName, lastName: $lastName, bio: $bio, headline: $headline, website: $website, avatar: $avatar) { success message user { id email firstName lastName role bio headline website avatar } }",
    }
}

define_operation! {
    /// Change the account password.
    mutation ChangePassword {
        variables: PasswordChange,
        output: Acknowledgement,
        root: "changePassword",
        declare: ["currentPassword": "String!", "newPassword": "String!"],
        selection: "(currentPassword: $currentPassword, newPassword: $newPassword) { success message }",
    }
}

define_operation! {
    /// Preferences of the signed-in user.
    query GetMyPreferences {
        variables: NoVariables,
        output: Option<UserPreferences>,
        root: "myPreferences",
        declare: [],
        selection: " { language timezone emailNotifications pushNotifications theme }",
    }
}

define_operation! {
    /// Edit preferences.
    mutation UpdatePreferences {
        variables: PreferencesUpdate,
        output: PreferencesPayload,
        root: "updatePreferences",
        declare: [
            "language": "String",
            "timezone": "String",
            "emailNotifications": "Boolean",
            "pushNotifications": "Boolean",
            "theme": "String",
        ],
        selection: "(language: $language, timezone: $timezone, emailNotifications: $emailNotifications, pushNotifications: $pushNotifications, theme: $theme) { success message preferences { language timezone emailNotifications pushNotifications theme } }",
    }
}
