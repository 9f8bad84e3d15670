use super::handlers::{health, types, user_login, user_register};
use crate::users::PublicUser;
use utoipa::{
    OpenApi,
    openapi::{Contact, InfoBuilder, License},
};

#[derive(OpenApi)]
#[openapi(
    paths(health::health, user_register::register, user_login::login),
    components(schemas(
        health::Health,
        user_register::UserRegister,
        user_login::UserLogin,
        types::AuthSuccess,
        types::AuthFailure,
        PublicUser,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// `OpenAPI` document for every JSON endpoint, with info taken from Cargo metadata.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info = cargo_info();
    doc
}

fn cargo_info() -> utoipa::openapi::Info {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();
    info
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    match author.split_once('<') {
        Some((name, email)) => (non_empty(name), non_empty(email.trim_end_matches('>'))),
        None => (non_empty(author), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Loginbox"));
            assert_eq!(contact.email.as_deref(), Some("team@loginbox.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some_and(|l| l.name == "BSD-3-Clause"));
    }

    #[test]
    fn openapi_documents_auth_routes() {
        let spec = openapi();
        assert!(spec.paths.paths.contains_key("/api/register"));
        assert!(spec.paths.paths.contains_key("/api/login"));
        assert!(spec.paths.paths.contains_key("/health"));
        let tags = spec.tags.unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
    }

    #[test]
    fn parse_author_variants() {
        assert_eq!(
            parse_author("Team <team@example.com>"),
            (Some("Team"), Some("team@example.com"))
        );
        assert_eq!(parse_author("Solo"), (Some("Solo"), None));
        assert_eq!(parse_author("<x@y.z>"), (None, Some("x@y.z")));
    }
}
