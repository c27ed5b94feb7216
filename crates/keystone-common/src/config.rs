use http::{HeaderName, HeaderValue};
use smol_str::SmolStr;
use url::Url;

use crate::locale::LanguageCode;
use crate::rpc::Service;

/// Settings shared by every call made on behalf of one app.
///
/// Read-only once built; share it by reference (or behind an `Arc`) across
/// concurrent calls.
///
/// ```
/// use keystone_common::RequestConfiguration;
///
/// let config = RequestConfiguration::new()
///     .api_key("APIKey")
///     .tenant_id("tenant-1")
///     .build();
/// assert_eq!(config.tenant_id.as_deref(), Some("tenant-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
#[builder(start_fn = new)]
pub struct RequestConfiguration {
    /// API key sent as the `key` query parameter
    #[builder(into)]
    pub api_key: SmolStr,
    /// Tenant to scope tenant-aware operations to
    #[builder(into)]
    pub tenant_id: Option<SmolStr>,
    /// Locale sent in the `X-Firebase-Locale` header
    pub language_code: Option<LanguageCode>,
    /// App id sent in the `X-Firebase-GMPID` header
    #[builder(into)]
    pub app_id: Option<SmolStr>,
    /// Client version sent in the `X-Client-Version` header
    #[builder(into)]
    pub client_version: Option<SmolStr>,
    /// `host:port` of a local emulator; all traffic goes there over plain http
    #[builder(into)]
    pub emulator_host: Option<SmolStr>,
    /// Replacement origin for the identity toolkit service
    pub identity_toolkit_host: Option<Url>,
    /// Replacement origin for the identity platform service
    pub identity_platform_host: Option<Url>,
    /// Headers added to every request
    #[builder(default)]
    pub extra_headers: Vec<(HeaderName, HeaderValue)>,
}

impl RequestConfiguration {
    /// Origin override configured for `service`, if any.
    pub fn host_override(&self, service: Service) -> Option<&Url> {
        match service {
            Service::IdentityToolkit => self.identity_toolkit_host.as_ref(),
            Service::IdentityPlatform => self.identity_platform_host.as_ref(),
        }
    }

    /// Returns true when calls should go to a local emulator.
    pub fn uses_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = RequestConfiguration::new().api_key("APIKey").build();
        assert_eq!(config.api_key, "APIKey");
        assert!(config.tenant_id.is_none());
        assert!(config.extra_headers.is_empty());
        assert!(!config.uses_emulator());
        assert!(config.host_override(Service::IdentityToolkit).is_none());
    }

    #[test]
    fn host_overrides_are_per_service() {
        let config = RequestConfiguration::new()
            .api_key("k")
            .identity_platform_host(Url::parse("https://idp.example.test").unwrap())
            .maybe_language_code(LanguageCode::new("fr").ok())
            .build();
        assert!(config.host_override(Service::IdentityToolkit).is_none());
        assert_eq!(
            config
                .host_override(Service::IdentityPlatform)
                .map(Url::as_str),
            Some("https://idp.example.test/")
        );
        assert_eq!(config.language_code.as_ref().map(|l| l.as_str()), Some("fr"));
    }
}
