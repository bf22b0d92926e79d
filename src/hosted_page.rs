//! Signed URLs for Chargify hosted pages.
//!
//! Hosted pages (such as the payment update form) are linked to with a
//! token derived from the page name, the subscription id and the site's
//! shared key:
//!
//! `token = hex(sha1("<page>--<id>--<shared_key>"))[..10]`
//!
//! No network call is involved.

use sha1::{Digest, Sha1};

use crate::config::ChargifyConfig;

/// Number of hex characters kept from the digest.
pub const TOKEN_LEN: usize = 10;

/// Page name of the payment update form.
pub const UPDATE_PAYMENT_PAGE: &str = "update_payment";

/// Compute the signing token for a page and subscription id.
pub fn hosted_page_token(page: &str, id: u64, shared_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{page}--{id}--{shared_key}").as_bytes());
    let mut token = hex::encode(hasher.finalize());
    token.truncate(TOKEN_LEN);
    token
}

/// Build `https://<subdomain>.chargify.com/<page>/<id>/<token>`.
///
/// # Example
///
/// ```
/// use chargify::{hosted_page_url, ChargifyConfig};
///
/// let config = ChargifyConfig::new("acme", "api-key", "secret");
/// let url = hosted_page_url(&config, "update_payment", 42);
/// assert_eq!(url, "https://acme.chargify.com/update_payment/42/f128049662");
/// ```
pub fn hosted_page_url(config: &ChargifyConfig, page: &str, id: u64) -> String {
    let token = hosted_page_token(page, id, config.shared_key());
    format!("{}{page}/{id}/{token}", config.site_url())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChargifyConfig {
        ChargifyConfig::new("acme", "api-key", "secret")
    }

    #[test]
    fn test_known_token() {
        // sha1("update_payment--42--secret") = f1280496620ebaf5ea28496bd32cea737fc218c9
        assert_eq!(hosted_page_token("update_payment", 42, "secret"), "f128049662");
    }

    #[test]
    fn test_url_format() {
        assert_eq!(
            hosted_page_url(&config(), UPDATE_PAYMENT_PAGE, 42),
            "https://acme.chargify.com/update_payment/42/f128049662"
        );
    }

    #[test]
    fn test_token_is_deterministic() {
        let first = hosted_page_token("update_payment", 42, "secret");
        let second = hosted_page_token("update_payment", 42, "secret");
        assert_eq!(first, second);
        assert_eq!(first.len(), TOKEN_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_changes_with_each_input() {
        let base = hosted_page_token("update_payment", 42, "secret");
        assert_ne!(base, hosted_page_token("cancel", 42, "secret"));
        assert_ne!(base, hosted_page_token("update_payment", 43, "secret"));
        assert_ne!(base, hosted_page_token("update_payment", 42, "other"));
    }

    #[test]
    fn test_url_ignores_api_url_override() {
        let config = config().with_api_url("http://127.0.0.1:3000");
        assert!(hosted_page_url(&config, "update_payment", 42).starts_with("https://acme.chargify.com/"));
    }
}
